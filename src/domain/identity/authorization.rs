//! Role checks over verified claims

use super::{IdentityClaims, Role};
use crate::domain::DomainError;

/// Require `claims` to carry `role`
pub fn require_role(claims: &IdentityClaims, role: Role) -> Result<(), DomainError> {
    if claims.has_role(role) {
        Ok(())
    } else {
        Err(DomainError::forbidden("Unauthorized access"))
    }
}

pub fn require_admin(claims: &IdentityClaims) -> Result<(), DomainError> {
    require_role(claims, Role::Admin)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_passes() {
        let claims = IdentityClaims::new("a@b.c", "u1", Some(Role::Admin));
        assert!(require_admin(&claims).is_ok());
    }

    #[test]
    fn test_default_and_missing_roles_fail() {
        let default = IdentityClaims::new("a@b.c", "u1", Some(Role::Default));
        let none = IdentityClaims::new("a@b.c", "u1", None);

        assert!(matches!(require_admin(&default), Err(DomainError::Forbidden { .. })));
        assert!(matches!(require_admin(&none), Err(DomainError::Forbidden { .. })));
    }
}
