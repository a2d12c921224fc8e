//! API layer - HTTP endpoints and middleware

pub mod auth;
pub mod dataset;
pub mod health;
pub mod iris;
pub mod middleware;
pub mod parameters;
pub mod router;
pub mod state;
pub mod types;

pub use middleware::{RequireAdmin, RequireUser};
pub use router::create_router_with_state;
pub use state::AppState;
