use std::sync::Arc;

use poem_openapi::{param::Path, payload::Json, OpenApi, Tags};

use crate::api::{current_session, SessionAuth};
use crate::errors::AuthError;
use crate::services::TokenService;
use crate::stores::CatalogStore;
use crate::types::dto::catalog::{
    CreateCatalogEntryRequest, CreateExerciseRequest, DietTypeDto, ExerciseDto, FitnessGoalDto,
};
use crate::types::dto::common::ActionResponse;

/// Catalog API endpoints: fitness goals, exercise library, diet types.
/// Any authenticated staff member may manage the catalog.
pub struct CatalogApi {
    catalog: Arc<CatalogStore>,
    tokens: Arc<TokenService>,
}

impl CatalogApi {
    pub fn new(catalog: Arc<CatalogStore>, tokens: Arc<TokenService>) -> Self {
        Self { catalog, tokens }
    }
}

/// API tags for catalog endpoints
#[derive(Tags)]
enum CatalogTags {
    /// Reference data for workout and diet planning
    Catalog,
}

#[OpenApi(prefix_path = "/catalog")]
impl CatalogApi {
    // Fitness goals

    /// List fitness goals
    #[oai(path = "/goals", method = "get", tag = "CatalogTags::Catalog")]
    async fn list_goals(&self, auth: SessionAuth) -> Result<Json<Vec<FitnessGoalDto>>, AuthError> {
        let _session = current_session(&self.tokens, &auth)?;
        let goals = self
            .catalog
            .list_goals()
            .await
            .map_err(|e| AuthError::internal_error(e.caller_message("Failed to list fitness goals")))?;
        Ok(Json(goals.into_iter().map(Into::into).collect()))
    }

    /// Create a fitness goal
    #[oai(path = "/goals", method = "post", tag = "CatalogTags::Catalog")]
    async fn create_goal(
        &self,
        auth: SessionAuth,
        body: Json<CreateCatalogEntryRequest>,
    ) -> Result<Json<ActionResponse>, AuthError> {
        let session = current_session(&self.tokens, &auth)?;
        let body = body.0;
        let result = self
            .catalog
            .create_goal(&session, &body.name, body.description)
            .await;
        Ok(Json(match result {
            Ok(_) => ActionResponse::ok(),
            Err(e) => ActionResponse::failed(e.caller_message("Failed to create fitness goal")),
        }))
    }

    /// Delete a fitness goal; default or in-use goals are refused
    #[oai(path = "/goals/:id", method = "delete", tag = "CatalogTags::Catalog")]
    async fn delete_goal(
        &self,
        auth: SessionAuth,
        id: Path<String>,
    ) -> Result<Json<ActionResponse>, AuthError> {
        let session = current_session(&self.tokens, &auth)?;
        let result = self.catalog.delete_goal(&session, &id.0).await;
        Ok(Json(match result {
            Ok(()) => ActionResponse::ok(),
            Err(e) => ActionResponse::failed(e.caller_message("Failed to delete fitness goal")),
        }))
    }

    /// Seed the built-in fitness goals (idempotent)
    #[oai(path = "/goals/seed", method = "post", tag = "CatalogTags::Catalog")]
    async fn seed_goals(&self, auth: SessionAuth) -> Result<Json<ActionResponse>, AuthError> {
        let _session = current_session(&self.tokens, &auth)?;
        let result = self.catalog.seed_default_goals().await;
        Ok(Json(match result {
            Ok(()) => ActionResponse::ok(),
            Err(e) => ActionResponse::failed(e.caller_message("Failed to seed fitness goals")),
        }))
    }

    // Exercise library

    /// List exercises
    #[oai(path = "/exercises", method = "get", tag = "CatalogTags::Catalog")]
    async fn list_exercises(&self, auth: SessionAuth) -> Result<Json<Vec<ExerciseDto>>, AuthError> {
        let _session = current_session(&self.tokens, &auth)?;
        let exercises = self
            .catalog
            .list_exercises()
            .await
            .map_err(|e| AuthError::internal_error(e.caller_message("Failed to list exercises")))?;
        Ok(Json(exercises.into_iter().map(Into::into).collect()))
    }

    /// Add an exercise to the library
    #[oai(path = "/exercises", method = "post", tag = "CatalogTags::Catalog")]
    async fn create_exercise(
        &self,
        auth: SessionAuth,
        body: Json<CreateExerciseRequest>,
    ) -> Result<Json<ActionResponse>, AuthError> {
        let session = current_session(&self.tokens, &auth)?;
        let result = self
            .catalog
            .create_exercise(
                &session,
                &body.name,
                &body.category,
                &body.equipment,
                &body.difficulty,
            )
            .await;
        Ok(Json(match result {
            Ok(_) => ActionResponse::ok(),
            Err(e) => ActionResponse::failed(e.caller_message("Failed to create exercise")),
        }))
    }

    /// Delete an exercise; default rows are refused
    #[oai(path = "/exercises/:id", method = "delete", tag = "CatalogTags::Catalog")]
    async fn delete_exercise(
        &self,
        auth: SessionAuth,
        id: Path<String>,
    ) -> Result<Json<ActionResponse>, AuthError> {
        let session = current_session(&self.tokens, &auth)?;
        let result = self.catalog.delete_exercise(&session, &id.0).await;
        Ok(Json(match result {
            Ok(()) => ActionResponse::ok(),
            Err(e) => ActionResponse::failed(e.caller_message("Failed to delete exercise")),
        }))
    }

    /// Seed the built-in exercise library (idempotent)
    #[oai(path = "/exercises/seed", method = "post", tag = "CatalogTags::Catalog")]
    async fn seed_exercises(&self, auth: SessionAuth) -> Result<Json<ActionResponse>, AuthError> {
        let _session = current_session(&self.tokens, &auth)?;
        let result = self.catalog.seed_default_exercises().await;
        Ok(Json(match result {
            Ok(()) => ActionResponse::ok(),
            Err(e) => ActionResponse::failed(e.caller_message("Failed to seed exercises")),
        }))
    }

    // Diet types

    /// List diet types
    #[oai(path = "/diet-types", method = "get", tag = "CatalogTags::Catalog")]
    async fn list_diet_types(&self, auth: SessionAuth) -> Result<Json<Vec<DietTypeDto>>, AuthError> {
        let _session = current_session(&self.tokens, &auth)?;
        let diet_types = self
            .catalog
            .list_diet_types()
            .await
            .map_err(|e| AuthError::internal_error(e.caller_message("Failed to list diet types")))?;
        Ok(Json(diet_types.into_iter().map(Into::into).collect()))
    }

    /// Create a diet type
    #[oai(path = "/diet-types", method = "post", tag = "CatalogTags::Catalog")]
    async fn create_diet_type(
        &self,
        auth: SessionAuth,
        body: Json<CreateCatalogEntryRequest>,
    ) -> Result<Json<ActionResponse>, AuthError> {
        let session = current_session(&self.tokens, &auth)?;
        let body = body.0;
        let result = self
            .catalog
            .create_diet_type(&session, &body.name, body.description)
            .await;
        Ok(Json(match result {
            Ok(_) => ActionResponse::ok(),
            Err(e) => ActionResponse::failed(e.caller_message("Failed to create diet type")),
        }))
    }

    /// Delete a diet type; default or in-use rows are refused
    #[oai(path = "/diet-types/:id", method = "delete", tag = "CatalogTags::Catalog")]
    async fn delete_diet_type(
        &self,
        auth: SessionAuth,
        id: Path<String>,
    ) -> Result<Json<ActionResponse>, AuthError> {
        let session = current_session(&self.tokens, &auth)?;
        let result = self.catalog.delete_diet_type(&session, &id.0).await;
        Ok(Json(match result {
            Ok(()) => ActionResponse::ok(),
            Err(e) => ActionResponse::failed(e.caller_message("Failed to delete diet type")),
        }))
    }

    /// Seed the built-in diet types (idempotent)
    #[oai(path = "/diet-types/seed", method = "post", tag = "CatalogTags::Catalog")]
    async fn seed_diet_types(&self, auth: SessionAuth) -> Result<Json<ActionResponse>, AuthError> {
        let _session = current_session(&self.tokens, &auth)?;
        let result = self.catalog.seed_default_diet_types().await;
        Ok(Json(match result {
            Ok(()) => ActionResponse::ok(),
            Err(e) => ActionResponse::failed(e.caller_message("Failed to seed diet types")),
        }))
    }
}
