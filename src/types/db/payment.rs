use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub member_id: String,
    // GST-inclusive total
    pub amount: i64,
    pub payment_mode: String,
    pub transaction_id: Option<String>,
    #[sea_orm(unique)]
    pub invoice_number: String,
    pub gst_number: Option<String>,
    pub gst_percentage: Option<i32>,
    pub gst_amount: Option<i64>,
    pub notes: Option<String>,
    pub created_by: String,
    pub payment_date: i64,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
