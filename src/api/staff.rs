use std::sync::Arc;

use poem_openapi::{param::Path, payload::Json, OpenApi, Tags};

use crate::api::{current_session, SessionAuth};
use crate::auth::{authorize, Action, Permission, Role};
use crate::errors::AuthError;
use crate::services::TokenService;
use crate::stores::{NewUser, UserStore, UserUpdate};
use crate::types::dto::common::ActionResponse;
use crate::types::dto::staff::{
    CreateTrainerRequest, CreateUserRequest, UpdateUserRequest, UserActionResponse, UserDto,
};
use crate::types::internal::Session;

/// Staff account management API endpoints
pub struct StaffApi {
    users: Arc<UserStore>,
    tokens: Arc<TokenService>,
}

impl StaffApi {
    pub fn new(users: Arc<UserStore>, tokens: Arc<TokenService>) -> Self {
        Self { users, tokens }
    }
}

/// API tags for staff endpoints
#[derive(Tags)]
enum StaffTags {
    /// Staff account management
    Staff,
    /// Trainer accounts
    Trainers,
}

/// Only a SUPER_ADMIN may hand out admin-level roles; a plain ADMIN is
/// limited to the non-admin roles.
fn check_role_assignment(session: &Session, target: Role) -> Result<(), AuthError> {
    if matches!(target, Role::Admin | Role::SuperAdmin) && session.role != Role::SuperAdmin {
        return Err(AuthError::forbidden());
    }
    Ok(())
}

fn parse_permissions(names: Option<Vec<String>>) -> Vec<Permission> {
    names
        .unwrap_or_default()
        .iter()
        .filter_map(|n| Permission::parse(n))
        .collect()
}

#[OpenApi(prefix_path = "/staff")]
impl StaffApi {
    /// List staff accounts
    #[oai(path = "/", method = "get", tag = "StaffTags::Staff")]
    async fn list(&self, auth: SessionAuth) -> Result<Json<Vec<UserDto>>, AuthError> {
        let session = current_session(&self.tokens, &auth)?;
        authorize(&session, Action::ManageStaff)?;

        let users = self
            .users
            .list()
            .await
            .map_err(|e| AuthError::internal_error(e.caller_message("Failed to list users")))?;
        Ok(Json(users.into_iter().map(Into::into).collect()))
    }

    /// Create a staff account
    #[oai(path = "/", method = "post", tag = "StaffTags::Staff")]
    async fn create(
        &self,
        auth: SessionAuth,
        body: Json<CreateUserRequest>,
    ) -> Result<Json<UserActionResponse>, AuthError> {
        let session = current_session(&self.tokens, &auth)?;
        authorize(&session, Action::ManageStaff)?;

        let Some(role) = Role::parse(&body.role) else {
            return Ok(Json(UserActionResponse::failed(format!(
                "Unknown role: {}",
                body.role
            ))));
        };
        check_role_assignment(&session, role)?;

        let body = body.0;
        let result = self
            .users
            .create(
                &session,
                NewUser {
                    name: body.name,
                    email: body.email,
                    password: body.password,
                    role,
                    permissions: parse_permissions(body.permissions),
                    phone: body.phone,
                },
            )
            .await;

        Ok(Json(match result {
            Ok(user) => UserActionResponse::ok(UserDto::from(user)),
            Err(e) => UserActionResponse::failed(e.caller_message("Failed to create user")),
        }))
    }

    /// Fetch one staff account
    #[oai(path = "/:id", method = "get", tag = "StaffTags::Staff")]
    async fn get(
        &self,
        auth: SessionAuth,
        id: Path<String>,
    ) -> Result<Json<UserActionResponse>, AuthError> {
        let session = current_session(&self.tokens, &auth)?;
        authorize(&session, Action::ManageStaff)?;

        let result = self.users.get(&id.0).await;
        Ok(Json(match result {
            Ok(Some(user)) => UserActionResponse::ok(UserDto::from(user)),
            Ok(None) => UserActionResponse::failed("User not found".to_string()),
            Err(e) => UserActionResponse::failed(e.caller_message("Failed to fetch user")),
        }))
    }

    /// Update a staff account
    #[oai(path = "/:id", method = "put", tag = "StaffTags::Staff")]
    async fn update(
        &self,
        auth: SessionAuth,
        id: Path<String>,
        body: Json<UpdateUserRequest>,
    ) -> Result<Json<UserActionResponse>, AuthError> {
        let session = current_session(&self.tokens, &auth)?;
        authorize(&session, Action::ManageStaff)?;

        let body = body.0;
        let role = match body.role.as_deref() {
            None => None,
            Some(raw) => {
                let Some(role) = Role::parse(raw) else {
                    return Ok(Json(UserActionResponse::failed(format!(
                        "Unknown role: {raw}"
                    ))));
                };
                check_role_assignment(&session, role)?;
                Some(role)
            }
        };

        let result = self
            .users
            .update(
                &session,
                &id.0,
                UserUpdate {
                    name: body.name,
                    email: body.email,
                    role,
                    permissions: body.permissions.map(|p| parse_permissions(Some(p))),
                    phone: body.phone,
                    password: body.password,
                },
            )
            .await;

        Ok(Json(match result {
            Ok(user) => UserActionResponse::ok(UserDto::from(user)),
            Err(e) => UserActionResponse::failed(e.caller_message("Failed to update user")),
        }))
    }

    /// Deactivate a staff account. Accounts are never hard-deleted.
    #[oai(path = "/:id", method = "delete", tag = "StaffTags::Staff")]
    async fn delete(
        &self,
        auth: SessionAuth,
        id: Path<String>,
    ) -> Result<Json<ActionResponse>, AuthError> {
        let session = current_session(&self.tokens, &auth)?;
        authorize(&session, Action::ManageStaff)?;

        if session.user_id == id.0 {
            return Ok(Json(ActionResponse::failed(
                "Cannot delete your own account".to_string(),
            )));
        }

        let target = self
            .users
            .get(&id.0)
            .await
            .map_err(|e| AuthError::internal_error(e.caller_message("Failed to fetch user")))?;
        let Some(target) = target else {
            return Ok(Json(ActionResponse::failed("User not found".to_string())));
        };

        // A plain ADMIN cannot remove admin-level accounts.
        let target_role = Role::parse(&target.role);
        if session.role == Role::Admin
            && matches!(target_role, Some(Role::Admin) | Some(Role::SuperAdmin))
        {
            return Err(AuthError::forbidden());
        }

        let result = self.users.deactivate(&session, &id.0).await;
        Ok(Json(match result {
            Ok(()) => ActionResponse::ok(),
            Err(e) => ActionResponse::failed(e.caller_message("Failed to delete user")),
        }))
    }
}

/// Trainer accounts API endpoints. A trainer is a staff account with
/// the TRAINER role.
pub struct TrainersApi {
    users: Arc<UserStore>,
    tokens: Arc<TokenService>,
}

impl TrainersApi {
    pub fn new(users: Arc<UserStore>, tokens: Arc<TokenService>) -> Self {
        Self { users, tokens }
    }
}

#[OpenApi(prefix_path = "/trainers")]
impl TrainersApi {
    /// List active trainers
    #[oai(path = "/", method = "get", tag = "StaffTags::Trainers")]
    async fn list(&self, auth: SessionAuth) -> Result<Json<Vec<UserDto>>, AuthError> {
        let _session = current_session(&self.tokens, &auth)?;

        let trainers = self
            .users
            .list_trainers()
            .await
            .map_err(|e| AuthError::internal_error(e.caller_message("Failed to list trainers")))?;
        Ok(Json(trainers.into_iter().map(Into::into).collect()))
    }

    /// Create a trainer account
    #[oai(path = "/", method = "post", tag = "StaffTags::Trainers")]
    async fn create(
        &self,
        auth: SessionAuth,
        body: Json<CreateTrainerRequest>,
    ) -> Result<Json<UserActionResponse>, AuthError> {
        let session = current_session(&self.tokens, &auth)?;
        authorize(&session, Action::ManageStaff)?;

        let body = body.0;
        let result = self
            .users
            .create(
                &session,
                NewUser {
                    name: body.name,
                    email: body.email,
                    password: body.password,
                    role: Role::Trainer,
                    permissions: Vec::new(),
                    phone: body.phone,
                },
            )
            .await;

        Ok(Json(match result {
            Ok(user) => UserActionResponse::ok(UserDto::from(user)),
            Err(e) => UserActionResponse::failed(e.caller_message("Failed to create trainer")),
        }))
    }

    /// Update a trainer's contact details
    #[oai(path = "/:id", method = "put", tag = "StaffTags::Trainers")]
    async fn update(
        &self,
        auth: SessionAuth,
        id: Path<String>,
        body: Json<UpdateUserRequest>,
    ) -> Result<Json<UserActionResponse>, AuthError> {
        let session = current_session(&self.tokens, &auth)?;
        authorize(&session, Action::ManageStaff)?;

        let body = body.0;
        let result = self
            .users
            .update(
                &session,
                &id.0,
                UserUpdate {
                    name: body.name,
                    email: body.email,
                    // A trainer stays a trainer through this surface.
                    role: None,
                    permissions: None,
                    phone: body.phone,
                    password: body.password,
                },
            )
            .await;

        Ok(Json(match result {
            Ok(user) => UserActionResponse::ok(UserDto::from(user)),
            Err(e) => UserActionResponse::failed(e.caller_message("Failed to update trainer")),
        }))
    }

    /// Deactivate a trainer account
    #[oai(path = "/:id", method = "delete", tag = "StaffTags::Trainers")]
    async fn deactivate(
        &self,
        auth: SessionAuth,
        id: Path<String>,
    ) -> Result<Json<ActionResponse>, AuthError> {
        let session = current_session(&self.tokens, &auth)?;
        authorize(&session, Action::ManageStaff)?;

        let result = self.users.deactivate(&session, &id.0).await;
        Ok(Json(match result {
            Ok(()) => ActionResponse::ok(),
            Err(e) => ActionResponse::failed(e.caller_message("Failed to deactivate trainer")),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::ActivityLogStore;
    use migration::{Migrator, MigratorTrait};
    use poem_openapi::auth::ApiKey;
    use sea_orm::Database;

    const TEST_SECRET: &str = "test-secret-key-minimum-32-characters-long";

    async fn setup() -> (StaffApi, TrainersApi, Arc<TokenService>) {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");
        Migrator::up(&db, None).await.expect("Failed to run migrations");

        let tokens = Arc::new(TokenService::new(TEST_SECRET.to_string()));
        let activity = Arc::new(ActivityLogStore::new(db.clone()));
        let users = Arc::new(UserStore::new(db, "test-pepper".to_string(), activity));
        (
            StaffApi::new(users.clone(), tokens.clone()),
            TrainersApi::new(users, tokens.clone()),
            tokens,
        )
    }

    fn auth_as(tokens: &TokenService, user_id: &str, role: Role) -> SessionAuth {
        let session = Session {
            user_id: user_id.to_string(),
            name: "Boss".to_string(),
            email: "boss@gym.test".to_string(),
            role,
            permissions: role.default_permissions().to_vec(),
            avatar: None,
        };
        SessionAuth(ApiKey {
            key: tokens.issue_session(&session).unwrap(),
        })
    }

    fn account(role: &str, email: &str) -> CreateUserRequest {
        CreateUserRequest {
            name: "New Staff".to_string(),
            email: email.to_string(),
            password: "password123".to_string(),
            role: role.to_string(),
            permissions: None,
            phone: None,
        }
    }

    #[tokio::test]
    async fn admin_can_create_receptionist_but_not_admin() {
        let (staff, _trainers, tokens) = setup().await;

        let auth = auth_as(&tokens, "admin-1", Role::Admin);
        let ok = staff
            .create(auth, Json(account("RECEPTIONIST", "r@gym.test")))
            .await
            .unwrap();
        assert!(ok.0.success);

        let auth = auth_as(&tokens, "admin-1", Role::Admin);
        let denied = staff.create(auth, Json(account("ADMIN", "a@gym.test"))).await;
        assert!(matches!(denied, Err(AuthError::Forbidden(_))));
    }

    #[tokio::test]
    async fn super_admin_can_create_admin_accounts() {
        let (staff, _trainers, tokens) = setup().await;
        let auth = auth_as(&tokens, "root-1", Role::SuperAdmin);
        let created = staff
            .create(auth, Json(account("ADMIN", "a@gym.test")))
            .await
            .unwrap();
        assert!(created.0.success);
        assert_eq!(created.0.data.unwrap().role, "ADMIN");
    }

    #[tokio::test]
    async fn receptionist_cannot_manage_staff() {
        let (staff, _trainers, tokens) = setup().await;
        let auth = auth_as(&tokens, "desk-1", Role::Receptionist);
        let result = staff.list(auth).await;
        assert!(matches!(result, Err(AuthError::Forbidden(_))));
    }

    #[tokio::test]
    async fn self_deletion_is_a_soft_failure() {
        let (staff, _trainers, tokens) = setup().await;
        let auth = auth_as(&tokens, "admin-1", Role::Admin);
        let result = staff.delete(auth, Path("admin-1".to_string())).await.unwrap();
        assert!(!result.0.success);
        assert_eq!(
            result.0.error.as_deref(),
            Some("Cannot delete your own account")
        );
    }

    #[tokio::test]
    async fn admin_cannot_deactivate_admin_accounts() {
        let (staff, _trainers, tokens) = setup().await;

        let auth = auth_as(&tokens, "root-1", Role::SuperAdmin);
        let created = staff
            .create(auth, Json(account("ADMIN", "other-admin@gym.test")))
            .await
            .unwrap();
        let target_id = created.0.data.unwrap().id;

        let auth = auth_as(&tokens, "admin-1", Role::Admin);
        let result = staff.delete(auth, Path(target_id)).await;
        assert!(matches!(result, Err(AuthError::Forbidden(_))));
    }

    #[tokio::test]
    async fn trainer_creation_and_listing() {
        let (_staff, trainers, tokens) = setup().await;

        let auth = auth_as(&tokens, "admin-1", Role::Admin);
        let created = trainers
            .create(
                auth,
                Json(CreateTrainerRequest {
                    name: "John Trainer".to_string(),
                    email: "coach@gym.test".to_string(),
                    password: "trainer123".to_string(),
                    phone: None,
                }),
            )
            .await
            .unwrap();
        assert!(created.0.success);
        assert_eq!(created.0.data.as_ref().unwrap().role, "TRAINER");

        let auth = auth_as(&tokens, "desk-1", Role::Receptionist);
        let listed = trainers.list(auth).await.unwrap();
        assert_eq!(listed.0.len(), 1);
    }
}
