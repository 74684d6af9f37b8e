use crate::auth::{Permission, Role};
use crate::types::internal::auth::Claims;

/// Resolved identity for the current request, decoded from the session
/// cookie. Threaded explicitly into every domain action so authorization
/// inputs are visible in signatures rather than ambient.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub permissions: Vec<Permission>,
    pub avatar: Option<String>,
}

impl Session {
    /// Build a session from validated claims. An unrecognized role name
    /// means the token predates the current role set; treat it as no
    /// session rather than guessing.
    pub fn from_claims(claims: Claims) -> Option<Self> {
        let role = Role::parse(&claims.role)?;
        let permissions = claims
            .permissions
            .iter()
            .filter_map(|name| Permission::parse(name))
            .collect();
        Some(Self {
            user_id: claims.sub,
            name: claims.name,
            email: claims.email,
            role,
            permissions,
            avatar: claims.image,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(role: &str) -> Claims {
        Claims {
            sub: "u-1".to_string(),
            name: "Test".to_string(),
            email: "t@example.com".to_string(),
            role: role.to_string(),
            permissions: vec!["VIEW_MEMBERS".to_string(), "BOGUS".to_string()],
            image: None,
            iat: 0,
            exp: 0,
        }
    }

    #[test]
    fn builds_session_and_drops_unknown_permissions() {
        let session = Session::from_claims(claims("RECEPTIONIST")).unwrap();
        assert_eq!(session.role, Role::Receptionist);
        assert_eq!(session.permissions, vec![Permission::ViewMembers]);
    }

    #[test]
    fn unknown_role_yields_no_session() {
        assert!(Session::from_claims(claims("JANITOR")).is_none());
    }
}
