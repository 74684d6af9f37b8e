use std::sync::Arc;

use poem_openapi::{param::Path, payload::Json, OpenApi, Tags};

use crate::api::{current_session, SessionAuth};
use crate::auth::{authorize, Action};
use crate::errors::AuthError;
use crate::services::TokenService;
use crate::stores::{AssignMembership, MembershipStore, NewPlan, PlanUpdate};
use crate::types::dto::common::ActionResponse;
use crate::types::dto::memberships::{
    AssignMembershipRequest, CreatePlanRequest, MembershipActionResponse, MembershipDto,
    PlanActionResponse, PlanDto, UpdatePlanRequest,
};
use crate::types::internal::DiscountType;

/// Membership plans and assignments API endpoints
pub struct MembershipsApi {
    memberships: Arc<MembershipStore>,
    tokens: Arc<TokenService>,
}

impl MembershipsApi {
    pub fn new(memberships: Arc<MembershipStore>, tokens: Arc<TokenService>) -> Self {
        Self {
            memberships,
            tokens,
        }
    }
}

/// API tags for membership endpoints
#[derive(Tags)]
enum MembershipTags {
    /// Plans and assignments
    Memberships,
}

#[OpenApi(prefix_path = "/memberships")]
impl MembershipsApi {
    /// List active plans
    #[oai(path = "/", method = "get", tag = "MembershipTags::Memberships")]
    async fn list_plans(&self, auth: SessionAuth) -> Result<Json<Vec<PlanDto>>, AuthError> {
        let _session = current_session(&self.tokens, &auth)?;

        let plans = self
            .memberships
            .list_plans()
            .await
            .map_err(|e| AuthError::internal_error(e.caller_message("Failed to list plans")))?;
        Ok(Json(plans.into_iter().map(Into::into).collect()))
    }

    /// Fetch one plan
    #[oai(path = "/:id", method = "get", tag = "MembershipTags::Memberships")]
    async fn get_plan(
        &self,
        auth: SessionAuth,
        id: Path<String>,
    ) -> Result<Json<PlanActionResponse>, AuthError> {
        let _session = current_session(&self.tokens, &auth)?;

        let result = self.memberships.get_plan(&id.0).await;
        Ok(Json(match result {
            Ok(Some(plan)) => PlanActionResponse::ok(PlanDto::from(plan)),
            Ok(None) => PlanActionResponse::failed("Plan not found".to_string()),
            Err(e) => PlanActionResponse::failed(e.caller_message("Failed to fetch plan")),
        }))
    }

    /// Create a plan
    #[oai(path = "/", method = "post", tag = "MembershipTags::Memberships")]
    async fn create_plan(
        &self,
        auth: SessionAuth,
        body: Json<CreatePlanRequest>,
    ) -> Result<Json<PlanActionResponse>, AuthError> {
        let session = current_session(&self.tokens, &auth)?;
        authorize(&session, Action::ManagePlans)?;

        let body = body.0;
        let result = self
            .memberships
            .create_plan(
                &session,
                NewPlan {
                    name: body.name,
                    description: body.description,
                    duration_days: body.duration_days,
                    price: body.price,
                    features: body.features.unwrap_or_default(),
                    color: body.color,
                    popular: body.popular.unwrap_or(false),
                    sort_order: body.sort_order.unwrap_or(0),
                },
            )
            .await;

        Ok(Json(match result {
            Ok(plan) => PlanActionResponse::ok(PlanDto::from(plan)),
            Err(e) => PlanActionResponse::failed(e.caller_message("Failed to create membership plan")),
        }))
    }

    /// Update a plan
    #[oai(path = "/:id", method = "put", tag = "MembershipTags::Memberships")]
    async fn update_plan(
        &self,
        auth: SessionAuth,
        id: Path<String>,
        body: Json<UpdatePlanRequest>,
    ) -> Result<Json<PlanActionResponse>, AuthError> {
        let session = current_session(&self.tokens, &auth)?;
        authorize(&session, Action::ManagePlans)?;

        let body = body.0;
        let result = self
            .memberships
            .update_plan(
                &session,
                &id.0,
                PlanUpdate {
                    name: body.name,
                    description: body.description,
                    duration_days: body.duration_days,
                    price: body.price,
                    features: body.features,
                    color: body.color,
                    popular: body.popular,
                    active: body.active,
                },
            )
            .await;

        Ok(Json(match result {
            Ok(plan) => PlanActionResponse::ok(PlanDto::from(plan)),
            Err(e) => PlanActionResponse::failed(e.caller_message("Failed to update membership plan")),
        }))
    }

    /// Deactivate a plan; refused while active memberships reference it
    #[oai(path = "/:id", method = "delete", tag = "MembershipTags::Memberships")]
    async fn delete_plan(
        &self,
        auth: SessionAuth,
        id: Path<String>,
    ) -> Result<Json<ActionResponse>, AuthError> {
        let session = current_session(&self.tokens, &auth)?;
        authorize(&session, Action::ManagePlans)?;

        let result = self.memberships.delete_plan(&session, &id.0).await;
        Ok(Json(match result {
            Ok(()) => ActionResponse::ok(),
            Err(e) => ActionResponse::failed(e.caller_message("Failed to delete membership plan")),
        }))
    }

    /// Assign a plan to a member
    #[oai(path = "/assign", method = "post", tag = "MembershipTags::Memberships")]
    async fn assign(
        &self,
        auth: SessionAuth,
        body: Json<AssignMembershipRequest>,
    ) -> Result<Json<MembershipActionResponse>, AuthError> {
        let session = current_session(&self.tokens, &auth)?;
        authorize(&session, Action::EditMember)?;

        let discount_type = match body.discount_type.as_deref() {
            None => None,
            Some(raw) => {
                let Some(parsed) = DiscountType::parse(raw) else {
                    return Ok(Json(MembershipActionResponse::failed(format!(
                        "Unknown discount type: {raw}"
                    ))));
                };
                Some(parsed)
            }
        };

        let body = body.0;
        let result = self
            .memberships
            .assign(
                &session,
                AssignMembership {
                    member_id: body.member_id,
                    plan_id: body.plan_id,
                    start_date: body.start_date,
                    discount: body.discount,
                    discount_type,
                    notes: body.notes,
                },
            )
            .await;

        Ok(Json(match result {
            Ok(membership) => MembershipActionResponse::ok(MembershipDto::from(membership)),
            Err(e) => MembershipActionResponse::failed(e.caller_message("Failed to assign membership")),
        }))
    }

    /// Renew a membership on its current plan from today
    #[oai(path = "/:id/renew", method = "post", tag = "MembershipTags::Memberships")]
    async fn renew(
        &self,
        auth: SessionAuth,
        id: Path<String>,
    ) -> Result<Json<MembershipActionResponse>, AuthError> {
        let session = current_session(&self.tokens, &auth)?;
        authorize(&session, Action::EditMember)?;

        let result = self.memberships.renew(&session, &id.0).await;
        Ok(Json(match result {
            Ok(membership) => MembershipActionResponse::ok(MembershipDto::from(membership)),
            Err(e) => MembershipActionResponse::failed(e.caller_message("Failed to renew membership")),
        }))
    }
}
