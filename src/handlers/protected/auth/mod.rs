// handlers/protected/auth/mod.rs - Account management for the signed-in user
pub mod account;

pub use account::me_delete;
