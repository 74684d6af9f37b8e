use poem_openapi::Object;

use crate::types::db::{diet_type, exercise, fitness_goal};

/// Request model for creating a named catalog entry
#[derive(Object, Debug)]
pub struct CreateCatalogEntryRequest {
    #[oai(validator(min_length = 1, max_length = 200))]
    pub name: String,

    pub description: Option<String>,
}

/// Request model for adding an exercise to the library
#[derive(Object, Debug)]
pub struct CreateExerciseRequest {
    #[oai(validator(min_length = 1, max_length = 200))]
    pub name: String,

    pub category: String,
    pub equipment: String,
    pub difficulty: String,
}

#[derive(Object, Debug)]
pub struct FitnessGoalDto {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub is_default: bool,
}

impl From<fitness_goal::Model> for FitnessGoalDto {
    fn from(model: fitness_goal::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            is_default: model.is_default,
        }
    }
}

#[derive(Object, Debug)]
pub struct ExerciseDto {
    pub id: String,
    pub name: String,
    pub category: String,
    pub equipment: String,
    pub difficulty: String,
    pub is_default: bool,
}

impl From<exercise::Model> for ExerciseDto {
    fn from(model: exercise::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            category: model.category,
            equipment: model.equipment,
            difficulty: model.difficulty,
            is_default: model.is_default,
        }
    }
}

#[derive(Object, Debug)]
pub struct DietTypeDto {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub is_default: bool,
}

impl From<diet_type::Model> for DietTypeDto {
    fn from(model: diet_type::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            is_default: model.is_default,
        }
    }
}
