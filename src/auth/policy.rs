use crate::auth::{Permission, Role};
use crate::errors::AuthError;
use crate::types::internal::Session;

/// Guarded domain actions. One variant per operation that is restricted
/// beyond "any authenticated user".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ViewMembers,
    CreateMember,
    EditMember,
    DeleteMember,
    ViewLeads,
    CreateLead,
    EditLead,
    DeleteLead,
    ViewBilling,
    CreatePayment,
    ViewReports,
    ManageStaff,
    ManageSettings,
    ManagePlans,
    MarkAttendance,
    ManageWorkouts,
    ManageDiets,
}

impl Action {
    fn required_permission(&self) -> Permission {
        match self {
            Action::ViewMembers => Permission::ViewMembers,
            Action::CreateMember => Permission::CreateMembers,
            Action::EditMember => Permission::EditMembers,
            Action::DeleteMember => Permission::DeleteMembers,
            Action::ViewLeads => Permission::ViewLeads,
            Action::CreateLead => Permission::CreateLeads,
            Action::EditLead => Permission::EditLeads,
            Action::DeleteLead => Permission::DeleteLeads,
            Action::ViewBilling => Permission::ViewBilling,
            Action::CreatePayment => Permission::CreatePayments,
            Action::ViewReports => Permission::ViewReports,
            Action::ManageStaff => Permission::ManageStaff,
            Action::ManageSettings => Permission::ManageSettings,
            Action::ManagePlans => Permission::ManagePlans,
            Action::MarkAttendance => Permission::MarkAttendance,
            Action::ManageWorkouts => Permission::ManageWorkouts,
            Action::ManageDiets => Permission::ManageDiets,
        }
    }
}

/// The single policy-evaluation point. Pure: admin roles pass, the CUSTOM
/// role consults the explicit permission set carried by the session, the
/// remaining built-in roles consult their fixed defaults.
pub fn decide(role: Role, permissions: &[Permission], action: Action) -> bool {
    let required = action.required_permission();
    match role {
        Role::SuperAdmin | Role::Admin => true,
        Role::Custom => permissions.contains(&required),
        _ => role.default_permissions().contains(&required),
    }
}

/// Evaluate the policy for a session, mapping a deny to the generic
/// unauthorized error the API surfaces.
pub fn authorize(session: &Session, action: Action) -> Result<(), AuthError> {
    if decide(session.role, &session.permissions, action) {
        Ok(())
    } else {
        Err(AuthError::forbidden())
    }
}
