use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "memberships")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub member_id: String,
    pub plan_id: String,
    pub start_date: i64,
    pub end_date: i64,
    pub amount: i64,
    pub discount: Option<i64>,
    pub discount_type: Option<String>,
    pub final_amount: i64,
    pub active: bool,
    pub notes: Option<String>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
