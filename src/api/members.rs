use std::sync::Arc;

use poem_openapi::{
    param::{Path, Query},
    payload::Json,
    OpenApi, Tags,
};

use crate::api::{current_session, SessionAuth};
use crate::auth::{authorize, Action};
use crate::errors::AuthError;
use crate::services::TokenService;
use crate::stores::{MemberQuery, MemberStore, MemberUpdate, NewMember, NotificationStore};
use crate::types::dto::common::ActionResponse;
use crate::types::dto::members::{
    CreateMemberRequest, MemberActionResponse, MemberDto, MemberListResponse, UpdateMemberRequest,
};
use crate::types::internal::MemberStatus;

/// Member records API endpoints
pub struct MembersApi {
    members: Arc<MemberStore>,
    notifications: Arc<NotificationStore>,
    tokens: Arc<TokenService>,
}

impl MembersApi {
    pub fn new(
        members: Arc<MemberStore>,
        notifications: Arc<NotificationStore>,
        tokens: Arc<TokenService>,
    ) -> Self {
        Self {
            members,
            notifications,
            tokens,
        }
    }
}

/// API tags for member endpoints
#[derive(Tags)]
enum MemberTags {
    /// Member records
    Members,
}

#[OpenApi(prefix_path = "/members")]
impl MembersApi {
    /// List members with search, filters and pagination
    #[oai(path = "/", method = "get", tag = "MemberTags::Members")]
    #[allow(clippy::too_many_arguments)]
    async fn list(
        &self,
        auth: SessionAuth,
        search: Query<Option<String>>,
        status: Query<Option<String>>,
        trainer_id: Query<Option<String>>,
        page: Query<Option<u64>>,
        limit: Query<Option<u64>>,
    ) -> Result<Json<MemberListResponse>, AuthError> {
        let session = current_session(&self.tokens, &auth)?;
        authorize(&session, Action::ViewMembers)?;

        let status = match status.0.as_deref() {
            None => None,
            Some(raw) => Some(
                MemberStatus::parse(raw)
                    .ok_or_else(|| AuthError::internal_error(format!("Unknown status: {raw}")))?,
            ),
        };

        let page = self
            .members
            .list(MemberQuery {
                search: search.0,
                status,
                trainer_id: trainer_id.0,
                page: page.0.unwrap_or(1),
                limit: limit.0.unwrap_or(20),
            })
            .await
            .map_err(|e| AuthError::internal_error(e.caller_message("Failed to list members")))?;

        Ok(Json(MemberListResponse {
            members: page.members.into_iter().map(Into::into).collect(),
            total: page.total,
            pages: page.pages,
            current_page: page.current_page,
        }))
    }

    /// Create a member; a membership number is generated and the record
    /// starts PENDING
    #[oai(path = "/", method = "post", tag = "MemberTags::Members")]
    async fn create(
        &self,
        auth: SessionAuth,
        body: Json<CreateMemberRequest>,
    ) -> Result<Json<MemberActionResponse>, AuthError> {
        let session = current_session(&self.tokens, &auth)?;
        authorize(&session, Action::CreateMember)?;

        let body = body.0;
        let result = self
            .members
            .create(
                &session,
                NewMember {
                    name: body.name,
                    phone: body.phone,
                    email: body.email,
                    address: body.address,
                    city: body.city,
                    state: body.state,
                    pincode: body.pincode,
                    date_of_birth: body.date_of_birth,
                    gender: body.gender,
                    emergency_name: body.emergency_name,
                    emergency_contact: body.emergency_contact,
                    blood_group: body.blood_group,
                    medical_conditions: body.medical_conditions,
                    trainer_id: body.trainer_id,
                    notes: body.notes,
                },
            )
            .await;

        Ok(Json(match result {
            Ok(member) => {
                if let Err(e) = self
                    .notifications
                    .announce_new_member(&member.id, &member.name, &member.membership_number)
                    .await
                {
                    tracing::warn!(error = %e, "failed to announce new member");
                }
                MemberActionResponse::ok(MemberDto::from(member))
            }
            Err(e) => MemberActionResponse::failed(e.caller_message("Failed to create member")),
        }))
    }

    /// Fetch one member
    #[oai(path = "/:id", method = "get", tag = "MemberTags::Members")]
    async fn get(
        &self,
        auth: SessionAuth,
        id: Path<String>,
    ) -> Result<Json<MemberActionResponse>, AuthError> {
        let session = current_session(&self.tokens, &auth)?;
        authorize(&session, Action::ViewMembers)?;

        let result = self.members.get(&id.0).await;
        Ok(Json(match result {
            Ok(Some(member)) => MemberActionResponse::ok(MemberDto::from(member)),
            Ok(None) => MemberActionResponse::failed("Member not found".to_string()),
            Err(e) => MemberActionResponse::failed(e.caller_message("Failed to fetch member")),
        }))
    }

    /// Update a member
    #[oai(path = "/:id", method = "put", tag = "MemberTags::Members")]
    async fn update(
        &self,
        auth: SessionAuth,
        id: Path<String>,
        body: Json<UpdateMemberRequest>,
    ) -> Result<Json<MemberActionResponse>, AuthError> {
        let session = current_session(&self.tokens, &auth)?;
        authorize(&session, Action::EditMember)?;

        let body = body.0;
        let result = self
            .members
            .update(
                &session,
                &id.0,
                MemberUpdate {
                    name: body.name,
                    phone: body.phone,
                    email: body.email,
                    address: body.address,
                    city: body.city,
                    state: body.state,
                    trainer_id: body.trainer_id,
                    notes: body.notes,
                },
            )
            .await;

        Ok(Json(match result {
            Ok(member) => MemberActionResponse::ok(MemberDto::from(member)),
            Err(e) => MemberActionResponse::failed(e.caller_message("Failed to update member")),
        }))
    }

    /// Delete a member
    #[oai(path = "/:id", method = "delete", tag = "MemberTags::Members")]
    async fn delete(
        &self,
        auth: SessionAuth,
        id: Path<String>,
    ) -> Result<Json<ActionResponse>, AuthError> {
        let session = current_session(&self.tokens, &auth)?;
        authorize(&session, Action::DeleteMember)?;

        let result = self.members.delete(&session, &id.0).await;
        Ok(Json(match result {
            Ok(()) => ActionResponse::ok(),
            Err(e) => ActionResponse::failed(e.caller_message("Failed to delete member")),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use crate::stores::ActivityLogStore;
    use crate::types::internal::Session;
    use migration::{Migrator, MigratorTrait};
    use poem_openapi::auth::ApiKey;
    use sea_orm::Database;

    const TEST_SECRET: &str = "test-secret-key-minimum-32-characters-long";

    async fn setup() -> (MembersApi, Arc<TokenService>) {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");
        Migrator::up(&db, None).await.expect("Failed to run migrations");

        let tokens = Arc::new(TokenService::new(TEST_SECRET.to_string()));
        let activity = Arc::new(ActivityLogStore::new(db.clone()));
        let members = Arc::new(MemberStore::new(db.clone(), activity));
        let notifications = Arc::new(NotificationStore::new(db));
        (MembersApi::new(members, notifications, tokens.clone()), tokens)
    }

    fn auth_for(tokens: &TokenService, role: Role) -> SessionAuth {
        let session = Session {
            user_id: "staff-1".to_string(),
            name: "Front Desk".to_string(),
            email: "desk@gym.test".to_string(),
            role,
            permissions: role.default_permissions().to_vec(),
            avatar: None,
        };
        SessionAuth(ApiKey {
            key: tokens.issue_session(&session).unwrap(),
        })
    }

    fn jane() -> CreateMemberRequest {
        CreateMemberRequest {
            name: "Jane Doe".to_string(),
            phone: "9998887777".to_string(),
            email: None,
            address: None,
            city: None,
            state: None,
            pincode: None,
            date_of_birth: None,
            gender: None,
            emergency_name: None,
            emergency_contact: None,
            blood_group: None,
            medical_conditions: None,
            trainer_id: None,
            notes: None,
        }
    }

    #[tokio::test]
    async fn create_assigns_membership_number_and_announces() {
        let (api, tokens) = setup().await;
        let auth = auth_for(&tokens, Role::Receptionist);

        let response = api.create(auth, Json(jane())).await.unwrap();
        assert!(response.0.success);
        let member = response.0.data.unwrap();
        assert_eq!(member.membership_number, "PBF1001");
        assert_eq!(member.status, "PENDING");

        let feed = api.notifications.feed().await.unwrap();
        assert_eq!(feed.members.len(), 1);
    }

    #[tokio::test]
    async fn helper_cannot_create_members() {
        let (api, tokens) = setup().await;
        let auth = auth_for(&tokens, Role::Helper);
        let result = api.create(auth, Json(jane())).await;
        assert!(matches!(result, Err(AuthError::Forbidden(_))));
    }

    #[tokio::test]
    async fn receptionist_cannot_delete_members() {
        let (api, tokens) = setup().await;
        let auth = auth_for(&tokens, Role::Receptionist);
        let created = api.create(auth, Json(jane())).await.unwrap();
        let id = created.0.data.unwrap().id;

        let auth = auth_for(&tokens, Role::Receptionist);
        let result = api.delete(auth, Path(id.clone())).await;
        assert!(matches!(result, Err(AuthError::Forbidden(_))));

        let auth = auth_for(&tokens, Role::Admin);
        let deleted = api.delete(auth, Path(id)).await.unwrap();
        assert!(deleted.0.success);
    }
}
