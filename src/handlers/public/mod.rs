// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Token acquisition plus the service banner, health check and 404 fallback.
pub mod auth;
pub mod system;

pub use system::{health, not_found, root};
