//! Infrastructure layer - External service implementations

pub mod dataset;
pub mod firebase;
pub mod http_client;
pub mod identity;
pub mod iris;
pub mod logging;
pub mod observability;
pub mod parameters;
pub mod rate_limit;
pub mod services;
