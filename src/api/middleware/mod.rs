//! API middleware components

pub mod auth;
pub mod client_ip;
pub mod metrics;

pub use auth::{extract_bearer_token, RequireAdmin, RequireUser};
pub use client_ip::ClientIp;
pub use metrics::metrics_middleware;
