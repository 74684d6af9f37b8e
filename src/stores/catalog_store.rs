use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use serde_json::json;
use uuid::Uuid;

use crate::errors::DomainError;
use crate::stores::ActivityLogStore;
use crate::types::db::diet_type::{self, Entity as DietType};
use crate::types::db::exercise::{self, Entity as Exercise};
use crate::types::db::fitness_goal::{self, Entity as FitnessGoal};
use crate::types::db::{diet_plan, workout_plan};
use crate::types::internal::Session;

/// Reference data behind workout and diet planning: fitness goals,
/// the exercise library, and diet types. Seeded default rows cannot be
/// deleted, and rows referenced by plans cannot be deleted.
pub struct CatalogStore {
    db: DatabaseConnection,
    activity: Arc<ActivityLogStore>,
}

const DEFAULT_GOALS: &[(&str, &str)] = &[
    ("Weight Loss", "Lose body weight and reduce body fat"),
    ("Muscle Gain", "Build muscle mass and strength"),
    ("Endurance", "Improve cardiovascular fitness and stamina"),
    ("Maintenance", "Maintain current weight and fitness level"),
    ("General Fitness", "Overall health and fitness improvement"),
];

const DEFAULT_DIET_TYPES: &[(&str, &str)] = &[
    ("Weight Loss", "Calorie deficit diet for weight reduction"),
    ("Muscle Gain", "High protein diet for muscle building"),
    ("Maintenance", "Balanced diet to maintain current weight"),
    ("Keto", "Low-carb, high-fat ketogenic diet"),
    ("Vegetarian", "Plant-based diet excluding meat"),
];

const DEFAULT_EXERCISES: &[(&str, &str, &str, &str)] = &[
    ("Barbell Squat", "Legs", "Barbell", "Intermediate"),
    ("Bench Press", "Chest", "Barbell", "Intermediate"),
    ("Deadlift", "Back", "Barbell", "Advanced"),
    ("Overhead Press", "Shoulders", "Barbell", "Intermediate"),
    ("Pull Up", "Back", "Bodyweight", "Intermediate"),
    ("Push Up", "Chest", "Bodyweight", "Beginner"),
    ("Dumbbell Curl", "Arms", "Dumbbell", "Beginner"),
    ("Plank", "Core", "Bodyweight", "Beginner"),
    ("Treadmill Run", "Cardio", "Treadmill", "Beginner"),
    ("Lat Pulldown", "Back", "Machine", "Beginner"),
];

impl CatalogStore {
    pub fn new(db: DatabaseConnection, activity: Arc<ActivityLogStore>) -> Self {
        Self { db, activity }
    }

    // Fitness goals

    pub async fn list_goals(&self) -> Result<Vec<fitness_goal::Model>, DomainError> {
        FitnessGoal::find()
            .order_by_asc(fitness_goal::Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::database("list_goals", e))
    }

    pub async fn create_goal(
        &self,
        session: &Session,
        name: &str,
        description: Option<String>,
    ) -> Result<fitness_goal::Model, DomainError> {
        let duplicate = FitnessGoal::find()
            .filter(fitness_goal::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::database("check_goal_name", e))?;
        if duplicate.is_some() {
            return Err(DomainError::validation(
                "Fitness goal with this name already exists",
            ));
        }

        let record = fitness_goal::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            name: Set(name.to_string()),
            description: Set(description),
            is_default: Set(false),
            created_at: Set(Utc::now().timestamp()),
        };
        let created = record
            .insert(&self.db)
            .await
            .map_err(|e| DomainError::database("create_goal", e))?;

        self.activity
            .record(&session.user_id, "CREATE", "FitnessGoal", &created.id, json!({"name": name}))
            .await;

        Ok(created)
    }

    pub async fn delete_goal(&self, session: &Session, id: &str) -> Result<(), DomainError> {
        let goal = FitnessGoal::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::database("get_goal", e))?
            .ok_or(DomainError::NotFound("Fitness goal"))?;

        if goal.is_default {
            return Err(DomainError::validation("Cannot delete default fitness goals"));
        }

        let usage = workout_plan::Entity::find()
            .filter(workout_plan::Column::GoalId.eq(id))
            .count(&self.db)
            .await
            .map_err(|e| DomainError::database("count_goal_usage", e))?;
        if usage > 0 {
            return Err(DomainError::validation(
                "Cannot delete fitness goal that is being used by workout plans",
            ));
        }

        FitnessGoal::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| DomainError::database("delete_goal", e))?;

        self.activity
            .record(&session.user_id, "DELETE", "FitnessGoal", id, json!({"name": goal.name}))
            .await;

        Ok(())
    }

    /// Idempotent: existing rows are left alone.
    pub async fn seed_default_goals(&self) -> Result<(), DomainError> {
        for (name, description) in DEFAULT_GOALS {
            let existing = FitnessGoal::find()
                .filter(fitness_goal::Column::Name.eq(*name))
                .one(&self.db)
                .await
                .map_err(|e| DomainError::database("seed_goals", e))?;
            if existing.is_none() {
                let record = fitness_goal::ActiveModel {
                    id: Set(Uuid::new_v4().to_string()),
                    name: Set(name.to_string()),
                    description: Set(Some(description.to_string())),
                    is_default: Set(true),
                    created_at: Set(Utc::now().timestamp()),
                };
                record
                    .insert(&self.db)
                    .await
                    .map_err(|e| DomainError::database("seed_goals", e))?;
            }
        }
        Ok(())
    }

    // Exercise library

    pub async fn list_exercises(&self) -> Result<Vec<exercise::Model>, DomainError> {
        Exercise::find()
            .order_by_asc(exercise::Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::database("list_exercises", e))
    }

    pub async fn create_exercise(
        &self,
        session: &Session,
        name: &str,
        category: &str,
        equipment: &str,
        difficulty: &str,
    ) -> Result<exercise::Model, DomainError> {
        let duplicate = Exercise::find()
            .filter(exercise::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::database("check_exercise_name", e))?;
        if duplicate.is_some() {
            return Err(DomainError::validation(
                "Exercise with this name already exists",
            ));
        }

        let record = exercise::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            name: Set(name.to_string()),
            category: Set(category.to_string()),
            equipment: Set(equipment.to_string()),
            difficulty: Set(difficulty.to_string()),
            is_default: Set(false),
            created_at: Set(Utc::now().timestamp()),
        };
        let created = record
            .insert(&self.db)
            .await
            .map_err(|e| DomainError::database("create_exercise", e))?;

        self.activity
            .record(&session.user_id, "CREATE", "Exercise", &created.id, json!({"name": name}))
            .await;

        Ok(created)
    }

    pub async fn delete_exercise(&self, session: &Session, id: &str) -> Result<(), DomainError> {
        let item = Exercise::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::database("get_exercise", e))?
            .ok_or(DomainError::NotFound("Exercise"))?;

        if item.is_default {
            return Err(DomainError::validation("Cannot delete default exercises"));
        }

        Exercise::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| DomainError::database("delete_exercise", e))?;

        self.activity
            .record(&session.user_id, "DELETE", "Exercise", id, json!({"name": item.name}))
            .await;

        Ok(())
    }

    pub async fn seed_default_exercises(&self) -> Result<(), DomainError> {
        for (name, category, equipment, difficulty) in DEFAULT_EXERCISES {
            let existing = Exercise::find()
                .filter(exercise::Column::Name.eq(*name))
                .one(&self.db)
                .await
                .map_err(|e| DomainError::database("seed_exercises", e))?;
            if existing.is_none() {
                let record = exercise::ActiveModel {
                    id: Set(Uuid::new_v4().to_string()),
                    name: Set(name.to_string()),
                    category: Set(category.to_string()),
                    equipment: Set(equipment.to_string()),
                    difficulty: Set(difficulty.to_string()),
                    is_default: Set(true),
                    created_at: Set(Utc::now().timestamp()),
                };
                record
                    .insert(&self.db)
                    .await
                    .map_err(|e| DomainError::database("seed_exercises", e))?;
            }
        }
        Ok(())
    }

    // Diet types

    pub async fn list_diet_types(&self) -> Result<Vec<diet_type::Model>, DomainError> {
        DietType::find()
            .order_by_asc(diet_type::Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::database("list_diet_types", e))
    }

    pub async fn create_diet_type(
        &self,
        session: &Session,
        name: &str,
        description: Option<String>,
    ) -> Result<diet_type::Model, DomainError> {
        let duplicate = DietType::find()
            .filter(diet_type::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::database("check_diet_type_name", e))?;
        if duplicate.is_some() {
            return Err(DomainError::validation(
                "Diet type with this name already exists",
            ));
        }

        let record = diet_type::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            name: Set(name.to_string()),
            description: Set(description),
            is_default: Set(false),
            created_at: Set(Utc::now().timestamp()),
        };
        let created = record
            .insert(&self.db)
            .await
            .map_err(|e| DomainError::database("create_diet_type", e))?;

        self.activity
            .record(&session.user_id, "CREATE", "DietType", &created.id, json!({"name": name}))
            .await;

        Ok(created)
    }

    pub async fn delete_diet_type(&self, session: &Session, id: &str) -> Result<(), DomainError> {
        let item = DietType::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::database("get_diet_type", e))?
            .ok_or(DomainError::NotFound("Diet type"))?;

        if item.is_default {
            return Err(DomainError::validation("Cannot delete default diet types"));
        }

        let usage = diet_plan::Entity::find()
            .filter(diet_plan::Column::DietTypeId.eq(id))
            .count(&self.db)
            .await
            .map_err(|e| DomainError::database("count_diet_type_usage", e))?;
        if usage > 0 {
            return Err(DomainError::validation(
                "Cannot delete diet type that is being used by diet plans",
            ));
        }

        DietType::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| DomainError::database("delete_diet_type", e))?;

        self.activity
            .record(&session.user_id, "DELETE", "DietType", id, json!({"name": item.name}))
            .await;

        Ok(())
    }

    pub async fn seed_default_diet_types(&self) -> Result<(), DomainError> {
        for (name, description) in DEFAULT_DIET_TYPES {
            let existing = DietType::find()
                .filter(diet_type::Column::Name.eq(*name))
                .one(&self.db)
                .await
                .map_err(|e| DomainError::database("seed_diet_types", e))?;
            if existing.is_none() {
                let record = diet_type::ActiveModel {
                    id: Set(Uuid::new_v4().to_string()),
                    name: Set(name.to_string()),
                    description: Set(Some(description.to_string())),
                    is_default: Set(true),
                    created_at: Set(Utc::now().timestamp()),
                };
                record
                    .insert(&self.db)
                    .await
                    .map_err(|e| DomainError::database("seed_diet_types", e))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use crate::stores::{MemberStore, NewMember, NewWorkoutPlan, PlanStore};
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;

    struct Fixture {
        db: DatabaseConnection,
        store: CatalogStore,
        session: Session,
    }

    async fn setup() -> Fixture {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");
        Migrator::up(&db, None).await.expect("Failed to run migrations");

        let activity = Arc::new(ActivityLogStore::new(db.clone()));
        let store = CatalogStore::new(db.clone(), activity);
        let session = Session {
            user_id: "admin-1".to_string(),
            name: "Admin".to_string(),
            email: "admin@gym.test".to_string(),
            role: Role::Admin,
            permissions: Vec::new(),
            avatar: None,
        };
        Fixture { db, store, session }
    }

    #[tokio::test]
    async fn duplicate_goal_name_is_rejected() {
        let f = setup().await;
        f.store.create_goal(&f.session, "Powerlifting", None).await.unwrap();
        let result = f.store.create_goal(&f.session, "Powerlifting", None).await;
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn default_goal_cannot_be_deleted() {
        let f = setup().await;
        f.store.seed_default_goals().await.unwrap();

        let goals = f.store.list_goals().await.unwrap();
        let default = goals.iter().find(|g| g.is_default).unwrap();

        let result = f.store.delete_goal(&f.session, &default.id).await;
        assert!(matches!(result, Err(DomainError::Validation(_))));

        // Record intact.
        let still_there = f.store.list_goals().await.unwrap();
        assert!(still_there.iter().any(|g| g.id == default.id));
    }

    #[tokio::test]
    async fn goal_used_by_a_workout_plan_cannot_be_deleted() {
        let f = setup().await;
        let goal = f.store.create_goal(&f.session, "Powerlifting", None).await.unwrap();

        let activity = Arc::new(ActivityLogStore::new(f.db.clone()));
        let members = Arc::new(MemberStore::new(f.db.clone(), activity.clone()));
        let plans = PlanStore::new(f.db.clone(), activity);
        let member = members
            .create(
                &f.session,
                NewMember {
                    name: "Jane".to_string(),
                    phone: "1".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        plans
            .create_workout(
                &f.session,
                NewWorkoutPlan {
                    member_id: member.id,
                    name: "Strength Block".to_string(),
                    description: None,
                    exercises: Vec::new(),
                    difficulty: None,
                    goal_id: Some(goal.id.clone()),
                    start_date: None,
                    end_date: None,
                },
            )
            .await
            .unwrap();

        let result = f.store.delete_goal(&f.session, &goal.id).await;
        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert!(f.store.list_goals().await.unwrap().iter().any(|g| g.id == goal.id));
    }

    #[tokio::test]
    async fn custom_goal_without_usage_deletes() {
        let f = setup().await;
        let goal = f.store.create_goal(&f.session, "Powerlifting", None).await.unwrap();
        f.store.delete_goal(&f.session, &goal.id).await.unwrap();
        assert!(f.store.list_goals().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn default_exercise_and_diet_type_cannot_be_deleted() {
        let f = setup().await;
        f.store.seed_default_exercises().await.unwrap();
        f.store.seed_default_diet_types().await.unwrap();

        let exercise = &f.store.list_exercises().await.unwrap()[0];
        assert!(matches!(
            f.store.delete_exercise(&f.session, &exercise.id).await,
            Err(DomainError::Validation(_))
        ));

        let diet_type = &f.store.list_diet_types().await.unwrap()[0];
        assert!(matches!(
            f.store.delete_diet_type(&f.session, &diet_type.id).await,
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn seeding_twice_does_not_duplicate() {
        let f = setup().await;
        f.store.seed_default_goals().await.unwrap();
        f.store.seed_default_goals().await.unwrap();
        assert_eq!(f.store.list_goals().await.unwrap().len(), DEFAULT_GOALS.len());
    }
}
