//! Identity domain
//!
//! Verified identities, role claims and the identity provider contract used
//! for registration, login and user administration.

mod authorization;
mod entity;
mod provider;

pub use authorization::{require_admin, require_role};
pub use entity::{IdentityClaims, Role, SignUpResult};
pub use provider::IdentityProvider;

#[cfg(test)]
pub use provider::MockIdentityProvider;
