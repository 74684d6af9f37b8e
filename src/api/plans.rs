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
use crate::stores::{DietPlanUpdate, NewDietPlan, NewWorkoutPlan, PlanStore, WorkoutPlanUpdate};
use crate::types::dto::common::ActionResponse;
use crate::types::dto::plans::{
    CreateDietPlanRequest, CreateWorkoutPlanRequest, DietPlanDto, UpdateDietPlanRequest,
    UpdateWorkoutPlanRequest, WorkoutPlanDto,
};

/// API tags for plan endpoints
#[derive(Tags)]
enum PlanTags {
    /// Member workout plans
    Workouts,
    /// Member diet plans
    Diets,
}

/// Workout plans API endpoints
pub struct WorkoutsApi {
    plans: Arc<PlanStore>,
    tokens: Arc<TokenService>,
}

impl WorkoutsApi {
    pub fn new(plans: Arc<PlanStore>, tokens: Arc<TokenService>) -> Self {
        Self { plans, tokens }
    }
}

#[OpenApi(prefix_path = "/workouts")]
impl WorkoutsApi {
    /// List workout plans, optionally for one member
    #[oai(path = "/", method = "get", tag = "PlanTags::Workouts")]
    async fn list(
        &self,
        auth: SessionAuth,
        member_id: Query<Option<String>>,
    ) -> Result<Json<Vec<WorkoutPlanDto>>, AuthError> {
        let _session = current_session(&self.tokens, &auth)?;
        let plans = self
            .plans
            .list_workouts(member_id.0.as_deref())
            .await
            .map_err(|e| AuthError::internal_error(e.caller_message("Failed to list workout plans")))?;
        Ok(Json(plans.into_iter().map(Into::into).collect()))
    }

    /// Create a workout plan
    #[oai(path = "/", method = "post", tag = "PlanTags::Workouts")]
    async fn create(
        &self,
        auth: SessionAuth,
        body: Json<CreateWorkoutPlanRequest>,
    ) -> Result<Json<ActionResponse>, AuthError> {
        let session = current_session(&self.tokens, &auth)?;
        authorize(&session, Action::ManageWorkouts)?;

        let body = body.0;
        let result = self
            .plans
            .create_workout(
                &session,
                NewWorkoutPlan {
                    member_id: body.member_id,
                    name: body.name,
                    description: body.description,
                    exercises: body.exercises.into_iter().map(Into::into).collect(),
                    difficulty: body.difficulty,
                    goal_id: body.goal_id,
                    start_date: body.start_date,
                    end_date: body.end_date,
                },
            )
            .await;

        Ok(Json(match result {
            Ok(_) => ActionResponse::ok(),
            Err(e) => ActionResponse::failed(e.caller_message("Failed to create workout plan")),
        }))
    }

    /// Fetch one workout plan
    #[oai(path = "/:id", method = "get", tag = "PlanTags::Workouts")]
    async fn get(
        &self,
        auth: SessionAuth,
        id: Path<String>,
    ) -> Result<Json<Option<WorkoutPlanDto>>, AuthError> {
        let _session = current_session(&self.tokens, &auth)?;
        let plan = self
            .plans
            .get_workout(&id.0)
            .await
            .map_err(|e| AuthError::internal_error(e.caller_message("Failed to fetch workout plan")))?;
        Ok(Json(plan.map(Into::into)))
    }

    /// Update a workout plan
    #[oai(path = "/:id", method = "put", tag = "PlanTags::Workouts")]
    async fn update(
        &self,
        auth: SessionAuth,
        id: Path<String>,
        body: Json<UpdateWorkoutPlanRequest>,
    ) -> Result<Json<ActionResponse>, AuthError> {
        let session = current_session(&self.tokens, &auth)?;
        authorize(&session, Action::ManageWorkouts)?;

        let body = body.0;
        let result = self
            .plans
            .update_workout(
                &session,
                &id.0,
                WorkoutPlanUpdate {
                    name: body.name,
                    description: body.description,
                    exercises: body
                        .exercises
                        .map(|e| e.into_iter().map(Into::into).collect()),
                    difficulty: body.difficulty,
                    goal_id: body.goal_id,
                    start_date: body.start_date,
                    end_date: body.end_date,
                },
            )
            .await;

        Ok(Json(match result {
            Ok(_) => ActionResponse::ok(),
            Err(e) => ActionResponse::failed(e.caller_message("Failed to update workout plan")),
        }))
    }

    /// Deactivate a workout plan
    #[oai(path = "/:id", method = "delete", tag = "PlanTags::Workouts")]
    async fn deactivate(
        &self,
        auth: SessionAuth,
        id: Path<String>,
    ) -> Result<Json<ActionResponse>, AuthError> {
        let session = current_session(&self.tokens, &auth)?;
        authorize(&session, Action::ManageWorkouts)?;

        let result = self.plans.deactivate_workout(&session, &id.0).await;
        Ok(Json(match result {
            Ok(()) => ActionResponse::ok(),
            Err(e) => ActionResponse::failed(e.caller_message("Failed to delete workout plan")),
        }))
    }
}

/// Diet plans API endpoints
pub struct DietsApi {
    plans: Arc<PlanStore>,
    tokens: Arc<TokenService>,
}

impl DietsApi {
    pub fn new(plans: Arc<PlanStore>, tokens: Arc<TokenService>) -> Self {
        Self { plans, tokens }
    }
}

#[OpenApi(prefix_path = "/diets")]
impl DietsApi {
    /// List diet plans, optionally for one member
    #[oai(path = "/", method = "get", tag = "PlanTags::Diets")]
    async fn list(
        &self,
        auth: SessionAuth,
        member_id: Query<Option<String>>,
    ) -> Result<Json<Vec<DietPlanDto>>, AuthError> {
        let _session = current_session(&self.tokens, &auth)?;
        let plans = self
            .plans
            .list_diets(member_id.0.as_deref())
            .await
            .map_err(|e| AuthError::internal_error(e.caller_message("Failed to list diet plans")))?;
        Ok(Json(plans.into_iter().map(Into::into).collect()))
    }

    /// Create a diet plan
    #[oai(path = "/", method = "post", tag = "PlanTags::Diets")]
    async fn create(
        &self,
        auth: SessionAuth,
        body: Json<CreateDietPlanRequest>,
    ) -> Result<Json<ActionResponse>, AuthError> {
        let session = current_session(&self.tokens, &auth)?;
        authorize(&session, Action::ManageDiets)?;

        let body = body.0;
        let result = self
            .plans
            .create_diet(
                &session,
                NewDietPlan {
                    member_id: body.member_id,
                    name: body.name,
                    description: body.description,
                    diet_type_id: body.diet_type_id,
                    meals: body.meals.into_iter().map(Into::into).collect(),
                    total_calories: body.total_calories,
                },
            )
            .await;

        Ok(Json(match result {
            Ok(_) => ActionResponse::ok(),
            Err(e) => ActionResponse::failed(e.caller_message("Failed to create diet plan")),
        }))
    }

    /// Fetch one diet plan
    #[oai(path = "/:id", method = "get", tag = "PlanTags::Diets")]
    async fn get(
        &self,
        auth: SessionAuth,
        id: Path<String>,
    ) -> Result<Json<Option<DietPlanDto>>, AuthError> {
        let _session = current_session(&self.tokens, &auth)?;
        let plan = self
            .plans
            .get_diet(&id.0)
            .await
            .map_err(|e| AuthError::internal_error(e.caller_message("Failed to fetch diet plan")))?;
        Ok(Json(plan.map(Into::into)))
    }

    /// Update a diet plan
    #[oai(path = "/:id", method = "put", tag = "PlanTags::Diets")]
    async fn update(
        &self,
        auth: SessionAuth,
        id: Path<String>,
        body: Json<UpdateDietPlanRequest>,
    ) -> Result<Json<ActionResponse>, AuthError> {
        let session = current_session(&self.tokens, &auth)?;
        authorize(&session, Action::ManageDiets)?;

        let body = body.0;
        let result = self
            .plans
            .update_diet(
                &session,
                &id.0,
                DietPlanUpdate {
                    name: body.name,
                    description: body.description,
                    diet_type_id: body.diet_type_id,
                    meals: body.meals.map(|m| m.into_iter().map(Into::into).collect()),
                    total_calories: body.total_calories,
                },
            )
            .await;

        Ok(Json(match result {
            Ok(_) => ActionResponse::ok(),
            Err(e) => ActionResponse::failed(e.caller_message("Failed to update diet plan")),
        }))
    }

    /// Deactivate a diet plan
    #[oai(path = "/:id", method = "delete", tag = "PlanTags::Diets")]
    async fn deactivate(
        &self,
        auth: SessionAuth,
        id: Path<String>,
    ) -> Result<Json<ActionResponse>, AuthError> {
        let session = current_session(&self.tokens, &auth)?;
        authorize(&session, Action::ManageDiets)?;

        let result = self.plans.deactivate_diet(&session, &id.0).await;
        Ok(Json(match result {
            Ok(()) => ActionResponse::ok(),
            Err(e) => ActionResponse::failed(e.caller_message("Failed to delete diet plan")),
        }))
    }
}
