use serde::{Deserialize, Serialize};

use crate::auth::permission::Permission;

/// Staff roles. CUSTOM derives nothing: the user record carries an
/// explicit permission set instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    SuperAdmin,
    Admin,
    Trainer,
    Receptionist,
    Helper,
    Custom,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "SUPER_ADMIN",
            Role::Admin => "ADMIN",
            Role::Trainer => "TRAINER",
            Role::Receptionist => "RECEPTIONIST",
            Role::Helper => "HELPER",
            Role::Custom => "CUSTOM",
        }
    }

    pub fn parse(value: &str) -> Option<Role> {
        match value {
            "SUPER_ADMIN" => Some(Role::SuperAdmin),
            "ADMIN" => Some(Role::Admin),
            "TRAINER" => Some(Role::Trainer),
            "RECEPTIONIST" => Some(Role::Receptionist),
            "HELPER" => Some(Role::Helper),
            "CUSTOM" => Some(Role::Custom),
            _ => None,
        }
    }

    /// Default capability set for the built-in roles. CUSTOM returns an
    /// empty slice; its permissions live on the user record.
    pub fn default_permissions(&self) -> &'static [Permission] {
        use Permission::*;
        match self {
            Role::SuperAdmin | Role::Admin => Permission::ALL,
            Role::Trainer => &[
                ViewMembers,
                MarkAttendance,
                ManageWorkouts,
                ManageDiets,
            ],
            Role::Receptionist => &[
                ViewMembers,
                CreateMembers,
                EditMembers,
                ViewLeads,
                CreateLeads,
                EditLeads,
                ViewBilling,
                CreatePayments,
                MarkAttendance,
            ],
            Role::Helper => &[ViewMembers, MarkAttendance],
            Role::Custom => &[],
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_every_role_name() {
        for role in [
            Role::SuperAdmin,
            Role::Admin,
            Role::Trainer,
            Role::Receptionist,
            Role::Helper,
            Role::Custom,
        ] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
    }

    #[test]
    fn unknown_role_name_is_rejected() {
        assert_eq!(Role::parse("MANAGER"), None);
        assert_eq!(Role::parse("admin"), None);
    }

    #[test]
    fn custom_role_has_no_default_permissions() {
        assert!(Role::Custom.default_permissions().is_empty());
    }

    #[test]
    fn admin_defaults_cover_every_permission() {
        assert_eq!(Role::Admin.default_permissions(), Permission::ALL);
    }
}
