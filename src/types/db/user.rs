use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,

    // Role name plus a JSON array of permission names.
    // The permission list is authoritative only for the CUSTOM role.
    pub role: String,
    pub permissions: String,

    pub phone: Option<String>,
    pub avatar: Option<String>,

    // Soft delete; inactive users cannot authenticate.
    pub active: bool,
    pub last_login: Option<i64>,

    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
