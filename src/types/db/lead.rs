use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "leads")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub source: String,
    pub status: String,
    pub interested_plan: Option<String>,
    pub notes: Option<String>,
    pub follow_up_date: Option<i64>,
    pub last_contact_date: Option<i64>,
    // Stamped only when status becomes CONVERTED.
    pub converted_date: Option<i64>,
    pub assigned_to: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
