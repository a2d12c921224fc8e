//! Local identity provider

mod in_memory;
mod password;

pub use in_memory::InMemoryIdentityProvider;
pub use password::{Argon2Hasher, PasswordHasher};
