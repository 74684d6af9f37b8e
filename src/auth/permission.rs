use serde::{Deserialize, Serialize};

/// Named capabilities carried in the session token and, for CUSTOM-role
/// users, stored on the user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Permission {
    ViewMembers,
    CreateMembers,
    EditMembers,
    DeleteMembers,
    ViewLeads,
    CreateLeads,
    EditLeads,
    DeleteLeads,
    ViewBilling,
    CreatePayments,
    ViewReports,
    ManageStaff,
    ManageSettings,
    ManagePlans,
    MarkAttendance,
    ManageWorkouts,
    ManageDiets,
}

impl Permission {
    pub const ALL: &'static [Permission] = &[
        Permission::ViewMembers,
        Permission::CreateMembers,
        Permission::EditMembers,
        Permission::DeleteMembers,
        Permission::ViewLeads,
        Permission::CreateLeads,
        Permission::EditLeads,
        Permission::DeleteLeads,
        Permission::ViewBilling,
        Permission::CreatePayments,
        Permission::ViewReports,
        Permission::ManageStaff,
        Permission::ManageSettings,
        Permission::ManagePlans,
        Permission::MarkAttendance,
        Permission::ManageWorkouts,
        Permission::ManageDiets,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::ViewMembers => "VIEW_MEMBERS",
            Permission::CreateMembers => "CREATE_MEMBERS",
            Permission::EditMembers => "EDIT_MEMBERS",
            Permission::DeleteMembers => "DELETE_MEMBERS",
            Permission::ViewLeads => "VIEW_LEADS",
            Permission::CreateLeads => "CREATE_LEADS",
            Permission::EditLeads => "EDIT_LEADS",
            Permission::DeleteLeads => "DELETE_LEADS",
            Permission::ViewBilling => "VIEW_BILLING",
            Permission::CreatePayments => "CREATE_PAYMENTS",
            Permission::ViewReports => "VIEW_REPORTS",
            Permission::ManageStaff => "MANAGE_STAFF",
            Permission::ManageSettings => "MANAGE_SETTINGS",
            Permission::ManagePlans => "MANAGE_PLANS",
            Permission::MarkAttendance => "MARK_ATTENDANCE",
            Permission::ManageWorkouts => "MANAGE_WORKOUTS",
            Permission::ManageDiets => "MANAGE_DIETS",
        }
    }

    pub fn parse(value: &str) -> Option<Permission> {
        Permission::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == value)
    }

    /// Parse a JSON array of permission names, dropping unknown entries.
    pub fn parse_set(json: &str) -> Vec<Permission> {
        serde_json::from_str::<Vec<String>>(json)
            .map(|names| names.iter().filter_map(|n| Permission::parse(n)).collect())
            .unwrap_or_default()
    }

    /// Serialize a permission set to the JSON column format.
    pub fn to_json(set: &[Permission]) -> String {
        let names: Vec<&str> = set.iter().map(|p| p.as_str()).collect();
        serde_json::to_string(&names).unwrap_or_else(|_| "[]".to_string())
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
