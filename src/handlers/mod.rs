// handlers/mod.rs - Handler tiers
//
// Public (no auth) → Protected (bearer token required). The router in lib.rs
// layers the JWT guard over every protected route.
pub mod protected;
pub mod public;
