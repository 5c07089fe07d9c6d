//! HTTP API for mixer-bot

pub mod health;
pub mod interactions;
pub mod signature;
pub mod types;

pub use health::health_routes;
pub use interactions::handle_interaction;
pub use signature::{parse_public_key, verify_signature};
