use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "workout_plans")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub member_id: String,
    pub name: String,
    pub description: Option<String>,
    // JSON array of {name, sets, reps, weight, rest_time, notes}
    pub exercises: String,
    pub difficulty: Option<String>,
    pub goal_id: Option<String>,
    pub start_date: Option<i64>,
    pub end_date: Option<i64>,
    pub active: bool,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
