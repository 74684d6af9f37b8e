use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::errors::DomainError;
use crate::stores::ActivityLogStore;
use crate::types::db::diet_plan::{self, Entity as DietPlan};
use crate::types::db::workout_plan::{self, Entity as WorkoutPlan};
use crate::types::internal::Session;

/// One exercise line in a workout plan, stored as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseSet {
    pub name: String,
    pub sets: u32,
    pub reps: u32,
    pub weight: f64,
    pub rest_time: u32,
    #[serde(default)]
    pub notes: String,
}

/// One meal line in a diet plan, stored as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meal {
    pub name: String,
    pub time: String,
    pub items: Vec<String>,
    pub calories: u32,
}

#[derive(Debug, Clone)]
pub struct NewWorkoutPlan {
    pub member_id: String,
    pub name: String,
    pub description: Option<String>,
    pub exercises: Vec<ExerciseSet>,
    pub difficulty: Option<String>,
    pub goal_id: Option<String>,
    pub start_date: Option<i64>,
    pub end_date: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct WorkoutPlanUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub exercises: Option<Vec<ExerciseSet>>,
    pub difficulty: Option<String>,
    pub goal_id: Option<String>,
    pub start_date: Option<i64>,
    pub end_date: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct DietPlanUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub diet_type_id: Option<String>,
    pub meals: Option<Vec<Meal>>,
    pub total_calories: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct NewDietPlan {
    pub member_id: String,
    pub name: String,
    pub description: Option<String>,
    pub diet_type_id: Option<String>,
    pub meals: Vec<Meal>,
    pub total_calories: Option<i32>,
}

/// Member workout and diet plans. Plans are deactivated, not deleted,
/// so a member's history stays queryable.
pub struct PlanStore {
    db: DatabaseConnection,
    activity: Arc<ActivityLogStore>,
}

impl PlanStore {
    pub fn new(db: DatabaseConnection, activity: Arc<ActivityLogStore>) -> Self {
        Self { db, activity }
    }

    pub async fn create_workout(
        &self,
        session: &Session,
        data: NewWorkoutPlan,
    ) -> Result<workout_plan::Model, DomainError> {
        let record = workout_plan::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            member_id: Set(data.member_id.clone()),
            name: Set(data.name),
            description: Set(data.description),
            exercises: Set(serde_json::to_string(&data.exercises).unwrap_or_else(|_| "[]".into())),
            difficulty: Set(data.difficulty),
            goal_id: Set(data.goal_id),
            start_date: Set(data.start_date),
            end_date: Set(data.end_date),
            active: Set(true),
            created_at: Set(Utc::now().timestamp()),
        };

        let created = record
            .insert(&self.db)
            .await
            .map_err(|e| DomainError::database("create_workout_plan", e))?;

        self.activity
            .record(
                &session.user_id,
                "CREATE",
                "WorkoutPlan",
                &created.id,
                json!({"name": created.name, "memberId": data.member_id}),
            )
            .await;

        Ok(created)
    }

    pub async fn list_workouts(
        &self,
        member_id: Option<&str>,
    ) -> Result<Vec<workout_plan::Model>, DomainError> {
        let mut query = WorkoutPlan::find();
        if let Some(member_id) = member_id {
            query = query.filter(workout_plan::Column::MemberId.eq(member_id));
        }
        query
            .order_by_desc(workout_plan::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::database("list_workout_plans", e))
    }

    pub async fn get_workout(&self, id: &str) -> Result<Option<workout_plan::Model>, DomainError> {
        WorkoutPlan::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::database("get_workout_plan", e))
    }

    pub async fn update_workout(
        &self,
        session: &Session,
        id: &str,
        data: WorkoutPlanUpdate,
    ) -> Result<workout_plan::Model, DomainError> {
        let existing = self
            .get_workout(id)
            .await?
            .ok_or(DomainError::NotFound("Workout plan"))?;

        let mut record: workout_plan::ActiveModel = existing.into();
        if let Some(name) = data.name {
            record.name = Set(name);
        }
        if let Some(description) = data.description {
            record.description = Set(Some(description));
        }
        if let Some(exercises) = data.exercises {
            record.exercises =
                Set(serde_json::to_string(&exercises).unwrap_or_else(|_| "[]".into()));
        }
        if let Some(difficulty) = data.difficulty {
            record.difficulty = Set(Some(difficulty));
        }
        if let Some(goal_id) = data.goal_id {
            record.goal_id = Set(Some(goal_id));
        }
        if let Some(start_date) = data.start_date {
            record.start_date = Set(Some(start_date));
        }
        if let Some(end_date) = data.end_date {
            record.end_date = Set(Some(end_date));
        }

        let updated = record
            .update(&self.db)
            .await
            .map_err(|e| DomainError::database("update_workout_plan", e))?;

        self.activity
            .record(&session.user_id, "UPDATE", "WorkoutPlan", id, json!({"name": updated.name}))
            .await;

        Ok(updated)
    }

    pub async fn deactivate_workout(&self, session: &Session, id: &str) -> Result<(), DomainError> {
        let existing = self
            .get_workout(id)
            .await?
            .ok_or(DomainError::NotFound("Workout plan"))?;

        let mut record: workout_plan::ActiveModel = existing.into();
        record.active = Set(false);
        record
            .update(&self.db)
            .await
            .map_err(|e| DomainError::database("deactivate_workout_plan", e))?;

        self.activity
            .record(&session.user_id, "DELETE", "WorkoutPlan", id, json!({}))
            .await;

        Ok(())
    }

    pub async fn create_diet(
        &self,
        session: &Session,
        data: NewDietPlan,
    ) -> Result<diet_plan::Model, DomainError> {
        let record = diet_plan::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            member_id: Set(data.member_id.clone()),
            name: Set(data.name),
            description: Set(data.description),
            diet_type_id: Set(data.diet_type_id),
            meals: Set(serde_json::to_string(&data.meals).unwrap_or_else(|_| "[]".into())),
            total_calories: Set(data.total_calories),
            active: Set(true),
            created_at: Set(Utc::now().timestamp()),
        };

        let created = record
            .insert(&self.db)
            .await
            .map_err(|e| DomainError::database("create_diet_plan", e))?;

        self.activity
            .record(
                &session.user_id,
                "CREATE",
                "DietPlan",
                &created.id,
                json!({"name": created.name, "memberId": data.member_id}),
            )
            .await;

        Ok(created)
    }

    pub async fn list_diets(
        &self,
        member_id: Option<&str>,
    ) -> Result<Vec<diet_plan::Model>, DomainError> {
        let mut query = DietPlan::find();
        if let Some(member_id) = member_id {
            query = query.filter(diet_plan::Column::MemberId.eq(member_id));
        }
        query
            .order_by_desc(diet_plan::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::database("list_diet_plans", e))
    }

    pub async fn get_diet(&self, id: &str) -> Result<Option<diet_plan::Model>, DomainError> {
        DietPlan::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::database("get_diet_plan", e))
    }

    pub async fn update_diet(
        &self,
        session: &Session,
        id: &str,
        data: DietPlanUpdate,
    ) -> Result<diet_plan::Model, DomainError> {
        let existing = self
            .get_diet(id)
            .await?
            .ok_or(DomainError::NotFound("Diet plan"))?;

        let mut record: diet_plan::ActiveModel = existing.into();
        if let Some(name) = data.name {
            record.name = Set(name);
        }
        if let Some(description) = data.description {
            record.description = Set(Some(description));
        }
        if let Some(diet_type_id) = data.diet_type_id {
            record.diet_type_id = Set(Some(diet_type_id));
        }
        if let Some(meals) = data.meals {
            record.meals = Set(serde_json::to_string(&meals).unwrap_or_else(|_| "[]".into()));
        }
        if let Some(total_calories) = data.total_calories {
            record.total_calories = Set(Some(total_calories));
        }

        let updated = record
            .update(&self.db)
            .await
            .map_err(|e| DomainError::database("update_diet_plan", e))?;

        self.activity
            .record(&session.user_id, "UPDATE", "DietPlan", id, json!({"name": updated.name}))
            .await;

        Ok(updated)
    }

    pub async fn deactivate_diet(&self, session: &Session, id: &str) -> Result<(), DomainError> {
        let existing = self
            .get_diet(id)
            .await?
            .ok_or(DomainError::NotFound("Diet plan"))?;

        let mut record: diet_plan::ActiveModel = existing.into();
        record.active = Set(false);
        record
            .update(&self.db)
            .await
            .map_err(|e| DomainError::database("deactivate_diet_plan", e))?;

        self.activity
            .record(&session.user_id, "DELETE", "DietPlan", id, json!({}))
            .await;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use crate::stores::{MemberStore, NewMember};
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;

    struct Fixture {
        store: PlanStore,
        session: Session,
        member_id: String,
    }

    async fn setup() -> Fixture {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");
        Migrator::up(&db, None).await.expect("Failed to run migrations");

        let activity = Arc::new(ActivityLogStore::new(db.clone()));
        let members = Arc::new(MemberStore::new(db.clone(), activity.clone()));
        let store = PlanStore::new(db, activity);
        let session = Session {
            user_id: "coach-1".to_string(),
            name: "Coach".to_string(),
            email: "coach@gym.test".to_string(),
            role: Role::Trainer,
            permissions: Vec::new(),
            avatar: None,
        };
        let member_id = members
            .create(
                &session,
                NewMember {
                    name: "Jane".to_string(),
                    phone: "1".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .id;

        Fixture {
            store,
            session,
            member_id,
        }
    }

    #[tokio::test]
    async fn workout_plan_round_trips_exercises_json() {
        let f = setup().await;
        let created = f
            .store
            .create_workout(
                &f.session,
                NewWorkoutPlan {
                    member_id: f.member_id.clone(),
                    name: "Push Day".to_string(),
                    description: None,
                    exercises: vec![ExerciseSet {
                        name: "Bench Press".to_string(),
                        sets: 5,
                        reps: 5,
                        weight: 80.0,
                        rest_time: 120,
                        notes: String::new(),
                    }],
                    difficulty: Some("Intermediate".to_string()),
                    goal_id: None,
                    start_date: None,
                    end_date: None,
                },
            )
            .await
            .unwrap();

        let parsed: Vec<ExerciseSet> = serde_json::from_str(&created.exercises).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].name, "Bench Press");
        assert_eq!(parsed[0].sets, 5);
    }

    #[tokio::test]
    async fn list_workouts_filters_by_member() {
        let f = setup().await;
        f.store
            .create_workout(
                &f.session,
                NewWorkoutPlan {
                    member_id: f.member_id.clone(),
                    name: "Plan A".to_string(),
                    description: None,
                    exercises: Vec::new(),
                    difficulty: None,
                    goal_id: None,
                    start_date: None,
                    end_date: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(f.store.list_workouts(Some(&f.member_id)).await.unwrap().len(), 1);
        assert!(f.store.list_workouts(Some("other")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn deactivated_diet_plan_is_kept_but_inactive() {
        let f = setup().await;
        let created = f
            .store
            .create_diet(
                &f.session,
                NewDietPlan {
                    member_id: f.member_id.clone(),
                    name: "Cut".to_string(),
                    description: None,
                    diet_type_id: None,
                    meals: Vec::new(),
                    total_calories: Some(1800),
                },
            )
            .await
            .unwrap();

        f.store.deactivate_diet(&f.session, &created.id).await.unwrap();

        let stored = f.store.get_diet(&created.id).await.unwrap().unwrap();
        assert!(!stored.active);
    }
}
