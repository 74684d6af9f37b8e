use poem_openapi::Object;

use crate::stores::{ExerciseSet, Meal};
use crate::types::db::{diet_plan, workout_plan};

/// One exercise line in a workout plan
#[derive(Object, Debug)]
pub struct ExerciseSetDto {
    pub name: String,
    pub sets: u32,
    pub reps: u32,
    pub weight: f64,
    pub rest_time: u32,
    pub notes: Option<String>,
}

impl From<ExerciseSetDto> for ExerciseSet {
    fn from(dto: ExerciseSetDto) -> Self {
        Self {
            name: dto.name,
            sets: dto.sets,
            reps: dto.reps,
            weight: dto.weight,
            rest_time: dto.rest_time,
            notes: dto.notes.unwrap_or_default(),
        }
    }
}

/// One meal line in a diet plan
#[derive(Object, Debug)]
pub struct MealDto {
    pub name: String,
    pub time: String,
    pub items: Vec<String>,
    pub calories: u32,
}

impl From<MealDto> for Meal {
    fn from(dto: MealDto) -> Self {
        Self {
            name: dto.name,
            time: dto.time,
            items: dto.items,
            calories: dto.calories,
        }
    }
}

/// Request model for creating a workout plan
#[derive(Object, Debug)]
pub struct CreateWorkoutPlanRequest {
    pub member_id: String,

    #[oai(validator(min_length = 1, max_length = 200))]
    pub name: String,

    pub description: Option<String>,
    pub exercises: Vec<ExerciseSetDto>,
    pub difficulty: Option<String>,
    pub goal_id: Option<String>,
    pub start_date: Option<i64>,
    pub end_date: Option<i64>,
}

/// Request model for updating a workout plan
#[derive(Object, Debug)]
pub struct UpdateWorkoutPlanRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub exercises: Option<Vec<ExerciseSetDto>>,
    pub difficulty: Option<String>,
    pub goal_id: Option<String>,
    pub start_date: Option<i64>,
    pub end_date: Option<i64>,
}

/// Request model for updating a diet plan
#[derive(Object, Debug)]
pub struct UpdateDietPlanRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub diet_type_id: Option<String>,
    pub meals: Option<Vec<MealDto>>,
    pub total_calories: Option<i32>,
}

/// Request model for creating a diet plan
#[derive(Object, Debug)]
pub struct CreateDietPlanRequest {
    pub member_id: String,

    #[oai(validator(min_length = 1, max_length = 200))]
    pub name: String,

    pub description: Option<String>,
    pub diet_type_id: Option<String>,
    pub meals: Vec<MealDto>,
    pub total_calories: Option<i32>,
}

/// Response model representing a workout plan; exercises stay as the
/// stored JSON payload
#[derive(Object, Debug)]
pub struct WorkoutPlanDto {
    pub id: String,
    pub member_id: String,
    pub name: String,
    pub description: Option<String>,
    pub exercises: String,
    pub difficulty: Option<String>,
    pub goal_id: Option<String>,
    pub start_date: Option<i64>,
    pub end_date: Option<i64>,
    pub active: bool,
    pub created_at: i64,
}

impl From<workout_plan::Model> for WorkoutPlanDto {
    fn from(model: workout_plan::Model) -> Self {
        Self {
            id: model.id,
            member_id: model.member_id,
            name: model.name,
            description: model.description,
            exercises: model.exercises,
            difficulty: model.difficulty,
            goal_id: model.goal_id,
            start_date: model.start_date,
            end_date: model.end_date,
            active: model.active,
            created_at: model.created_at,
        }
    }
}

/// Response model representing a diet plan
#[derive(Object, Debug)]
pub struct DietPlanDto {
    pub id: String,
    pub member_id: String,
    pub name: String,
    pub description: Option<String>,
    pub diet_type_id: Option<String>,
    pub meals: String,
    pub total_calories: Option<i32>,
    pub active: bool,
    pub created_at: i64,
}

impl From<diet_plan::Model> for DietPlanDto {
    fn from(model: diet_plan::Model) -> Self {
        Self {
            id: model.id,
            member_id: model.member_id,
            name: model.name,
            description: model.description,
            diet_type_id: model.diet_type_id,
            meals: model.meals,
            total_calories: model.total_calories,
            active: model.active,
            created_at: model.created_at,
        }
    }
}
