use std::sync::Arc;

use poem_openapi::{param::Path, payload::Json, OpenApi, Tags};

use crate::api::{current_session, SessionAuth};
use crate::auth::{authorize, Action};
use crate::errors::AuthError;
use crate::services::{LeadConversionService, TokenService};
use crate::stores::{LeadStore, LeadUpdate, NewLead};
use crate::types::dto::common::ActionResponse;
use crate::types::dto::leads::{
    ConvertLeadResponse, CreateLeadRequest, LeadActionResponse, LeadBoardResponse, LeadDto,
    LeadStatsResponse, StatusCount, UpdateLeadRequest, UpdateLeadStatusRequest,
};
use crate::types::internal::{LeadSource, LeadStatus};

/// Leads pipeline API endpoints
pub struct LeadsApi {
    leads: Arc<LeadStore>,
    conversion: Arc<LeadConversionService>,
    tokens: Arc<TokenService>,
}

impl LeadsApi {
    pub fn new(
        leads: Arc<LeadStore>,
        conversion: Arc<LeadConversionService>,
        tokens: Arc<TokenService>,
    ) -> Self {
        Self {
            leads,
            conversion,
            tokens,
        }
    }
}

/// API tags for lead endpoints
#[derive(Tags)]
enum LeadTags {
    /// Leads pipeline
    Leads,
}

#[OpenApi(prefix_path = "/leads")]
impl LeadsApi {
    /// Leads grouped by pipeline state
    #[oai(path = "/", method = "get", tag = "LeadTags::Leads")]
    async fn board(&self, auth: SessionAuth) -> Result<Json<LeadBoardResponse>, AuthError> {
        let session = current_session(&self.tokens, &auth)?;
        authorize(&session, Action::ViewLeads)?;

        let board = self
            .leads
            .board()
            .await
            .map_err(|e| AuthError::internal_error(e.caller_message("Failed to list leads")))?;

        Ok(Json(LeadBoardResponse {
            new: board.new.into_iter().map(Into::into).collect(),
            contacted: board.contacted.into_iter().map(Into::into).collect(),
            follow_up: board.follow_up.into_iter().map(Into::into).collect(),
            converted: board.converted.into_iter().map(Into::into).collect(),
            lost: board.lost.into_iter().map(Into::into).collect(),
        }))
    }

    /// Create a lead; it starts NEW and assigned to the caller
    #[oai(path = "/", method = "post", tag = "LeadTags::Leads")]
    async fn create(
        &self,
        auth: SessionAuth,
        body: Json<CreateLeadRequest>,
    ) -> Result<Json<LeadActionResponse>, AuthError> {
        let session = current_session(&self.tokens, &auth)?;
        authorize(&session, Action::CreateLead)?;

        let Some(source) = LeadSource::parse(&body.source) else {
            return Ok(Json(LeadActionResponse::failed(format!(
                "Unknown lead source: {}",
                body.source
            ))));
        };

        let body = body.0;
        let result = self
            .leads
            .create(
                &session,
                NewLead {
                    name: body.name,
                    phone: body.phone,
                    email: body.email,
                    source,
                    interested_plan: body.interested_plan,
                    notes: body.notes,
                    follow_up_date: body.follow_up_date,
                },
            )
            .await;

        Ok(Json(match result {
            Ok(lead) => LeadActionResponse::ok(LeadDto::from(lead)),
            Err(e) => LeadActionResponse::failed(e.caller_message("Failed to create lead")),
        }))
    }

    /// Pipeline statistics
    #[oai(path = "/stats", method = "get", tag = "LeadTags::Leads")]
    async fn stats(&self, auth: SessionAuth) -> Result<Json<LeadStatsResponse>, AuthError> {
        let session = current_session(&self.tokens, &auth)?;
        authorize(&session, Action::ViewLeads)?;

        let stats = self
            .leads
            .stats()
            .await
            .map_err(|e| AuthError::internal_error(e.caller_message("Failed to compute lead stats")))?;

        Ok(Json(LeadStatsResponse {
            total: stats.total,
            converted: stats.converted,
            conversion_rate: stats.conversion_rate,
            status_counts: stats
                .status_counts
                .into_iter()
                .map(|(key, count)| StatusCount { key, count })
                .collect(),
            source_counts: stats
                .source_counts
                .into_iter()
                .map(|(key, count)| StatusCount { key, count })
                .collect(),
        }))
    }

    /// Fetch one lead
    #[oai(path = "/:id", method = "get", tag = "LeadTags::Leads")]
    async fn get(
        &self,
        auth: SessionAuth,
        id: Path<String>,
    ) -> Result<Json<LeadActionResponse>, AuthError> {
        let session = current_session(&self.tokens, &auth)?;
        authorize(&session, Action::ViewLeads)?;

        let result = self.leads.get(&id.0).await;
        Ok(Json(match result {
            Ok(Some(lead)) => LeadActionResponse::ok(LeadDto::from(lead)),
            Ok(None) => LeadActionResponse::failed("Lead not found".to_string()),
            Err(e) => LeadActionResponse::failed(e.caller_message("Failed to fetch lead")),
        }))
    }

    /// Update a lead's captured fields
    #[oai(path = "/:id", method = "put", tag = "LeadTags::Leads")]
    async fn update(
        &self,
        auth: SessionAuth,
        id: Path<String>,
        body: Json<UpdateLeadRequest>,
    ) -> Result<Json<LeadActionResponse>, AuthError> {
        let session = current_session(&self.tokens, &auth)?;
        authorize(&session, Action::EditLead)?;

        let body = body.0;
        let result = self
            .leads
            .update(
                &session,
                &id.0,
                LeadUpdate {
                    name: body.name,
                    phone: body.phone,
                    email: body.email,
                    notes: body.notes,
                    follow_up_date: body.follow_up_date,
                    interested_plan: body.interested_plan,
                },
            )
            .await;

        Ok(Json(match result {
            Ok(lead) => LeadActionResponse::ok(LeadDto::from(lead)),
            Err(e) => LeadActionResponse::failed(e.caller_message("Failed to update lead")),
        }))
    }

    /// Write a pipeline status directly
    #[oai(path = "/:id/status", method = "post", tag = "LeadTags::Leads")]
    async fn update_status(
        &self,
        auth: SessionAuth,
        id: Path<String>,
        body: Json<UpdateLeadStatusRequest>,
    ) -> Result<Json<LeadActionResponse>, AuthError> {
        let session = current_session(&self.tokens, &auth)?;
        authorize(&session, Action::EditLead)?;

        let Some(status) = LeadStatus::parse(&body.status) else {
            return Ok(Json(LeadActionResponse::failed(format!(
                "Unknown lead status: {}",
                body.status
            ))));
        };

        let result = self.leads.update_status(&session, &id.0, status).await;
        Ok(Json(match result {
            Ok(lead) => LeadActionResponse::ok(LeadDto::from(lead)),
            Err(e) => LeadActionResponse::failed(e.caller_message("Failed to update lead status")),
        }))
    }

    /// Confirm conversion: the lead becomes CONVERTED and its captured
    /// fields come back to pre-populate member creation. The member is
    /// not created here.
    #[oai(path = "/:id/convert", method = "post", tag = "LeadTags::Leads")]
    async fn convert(
        &self,
        auth: SessionAuth,
        id: Path<String>,
    ) -> Result<Json<ConvertLeadResponse>, AuthError> {
        let session = current_session(&self.tokens, &auth)?;
        authorize(&session, Action::EditLead)?;

        let result = self.conversion.confirm(&session, &id.0).await;
        Ok(Json(match result {
            Ok(captured) => ConvertLeadResponse {
                success: true,
                error: None,
                lead_id: Some(captured.lead_id),
                name: Some(captured.name),
                phone: Some(captured.phone),
                email: captured.email,
            },
            Err(e) => ConvertLeadResponse::failed(e.caller_message("Failed to convert lead")),
        }))
    }

    /// Decline conversion: the lead becomes LOST
    #[oai(path = "/:id/decline", method = "post", tag = "LeadTags::Leads")]
    async fn decline(
        &self,
        auth: SessionAuth,
        id: Path<String>,
    ) -> Result<Json<ActionResponse>, AuthError> {
        let session = current_session(&self.tokens, &auth)?;
        authorize(&session, Action::EditLead)?;

        let result = self.conversion.decline(&session, &id.0).await;
        Ok(Json(match result {
            Ok(()) => ActionResponse::ok(),
            Err(e) => ActionResponse::failed(e.caller_message("Failed to update lead status")),
        }))
    }

    /// Delete a lead
    #[oai(path = "/:id", method = "delete", tag = "LeadTags::Leads")]
    async fn delete(
        &self,
        auth: SessionAuth,
        id: Path<String>,
    ) -> Result<Json<ActionResponse>, AuthError> {
        let session = current_session(&self.tokens, &auth)?;
        authorize(&session, Action::DeleteLead)?;

        let result = self.leads.delete(&session, &id.0).await;
        Ok(Json(match result {
            Ok(()) => ActionResponse::ok(),
            Err(e) => ActionResponse::failed(e.caller_message("Failed to delete lead")),
        }))
    }
}
