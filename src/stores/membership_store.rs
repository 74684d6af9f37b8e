use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use serde_json::json;
use uuid::Uuid;

use crate::errors::DomainError;
use crate::stores::{ActivityLogStore, MemberStore};
use crate::types::db::membership::{self, Entity as Membership};
use crate::types::db::membership_plan::{self, Entity as MembershipPlan};
use crate::types::internal::{DiscountType, MemberStatus, Session};

const DAY_SECONDS: i64 = 24 * 60 * 60;

#[derive(Debug, Clone)]
pub struct NewPlan {
    pub name: String,
    pub description: Option<String>,
    pub duration_days: i32,
    pub price: i64,
    pub features: Vec<String>,
    pub color: Option<String>,
    pub popular: bool,
    pub sort_order: i32,
}

#[derive(Debug, Clone)]
pub struct PlanUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub duration_days: Option<i32>,
    pub price: Option<i64>,
    pub features: Option<Vec<String>>,
    pub color: Option<String>,
    pub popular: Option<bool>,
    pub active: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct AssignMembership {
    pub member_id: String,
    pub plan_id: String,
    pub start_date: i64,
    pub discount: Option<i64>,
    pub discount_type: Option<DiscountType>,
    pub notes: Option<String>,
}

pub struct MembershipStore {
    db: DatabaseConnection,
    members: Arc<MemberStore>,
    activity: Arc<ActivityLogStore>,
}

impl MembershipStore {
    pub fn new(
        db: DatabaseConnection,
        members: Arc<MemberStore>,
        activity: Arc<ActivityLogStore>,
    ) -> Self {
        Self {
            db,
            members,
            activity,
        }
    }

    pub async fn list_plans(&self) -> Result<Vec<membership_plan::Model>, DomainError> {
        MembershipPlan::find()
            .filter(membership_plan::Column::Active.eq(true))
            .order_by_asc(membership_plan::Column::SortOrder)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::database("list_plans", e))
    }

    pub async fn get_plan(&self, id: &str) -> Result<Option<membership_plan::Model>, DomainError> {
        MembershipPlan::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::database("get_plan", e))
    }

    pub async fn create_plan(
        &self,
        session: &Session,
        data: NewPlan,
    ) -> Result<membership_plan::Model, DomainError> {
        let duplicate = MembershipPlan::find()
            .filter(membership_plan::Column::Name.eq(data.name.as_str()))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::database("check_plan_name", e))?;
        if duplicate.is_some() {
            return Err(DomainError::validation("A plan with this name already exists"));
        }

        let record = membership_plan::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            name: Set(data.name),
            description: Set(data.description),
            duration_days: Set(data.duration_days),
            price: Set(data.price),
            features: Set(serde_json::to_string(&data.features).unwrap_or_else(|_| "[]".into())),
            color: Set(data.color),
            popular: Set(data.popular),
            active: Set(true),
            sort_order: Set(data.sort_order),
            created_at: Set(Utc::now().timestamp()),
        };

        let created = record
            .insert(&self.db)
            .await
            .map_err(|e| DomainError::database("create_plan", e))?;

        self.activity
            .record(
                &session.user_id,
                "CREATE",
                "MembershipPlan",
                &created.id,
                json!({"name": created.name}),
            )
            .await;

        Ok(created)
    }

    pub async fn update_plan(
        &self,
        session: &Session,
        id: &str,
        data: PlanUpdate,
    ) -> Result<membership_plan::Model, DomainError> {
        let existing = self
            .get_plan(id)
            .await?
            .ok_or(DomainError::NotFound("Plan"))?;

        let mut record: membership_plan::ActiveModel = existing.into();
        if let Some(name) = data.name {
            record.name = Set(name);
        }
        if let Some(description) = data.description {
            record.description = Set(Some(description));
        }
        if let Some(duration) = data.duration_days {
            record.duration_days = Set(duration);
        }
        if let Some(price) = data.price {
            record.price = Set(price);
        }
        if let Some(features) = data.features {
            record.features = Set(serde_json::to_string(&features).unwrap_or_else(|_| "[]".into()));
        }
        if let Some(color) = data.color {
            record.color = Set(Some(color));
        }
        if let Some(popular) = data.popular {
            record.popular = Set(popular);
        }
        if let Some(active) = data.active {
            record.active = Set(active);
        }

        let updated = record
            .update(&self.db)
            .await
            .map_err(|e| DomainError::database("update_plan", e))?;

        self.activity
            .record(&session.user_id, "UPDATE", "MembershipPlan", id, json!({"name": updated.name}))
            .await;

        Ok(updated)
    }

    /// Soft-delete a plan. Refused while any active membership still
    /// references it.
    pub async fn delete_plan(&self, session: &Session, id: &str) -> Result<(), DomainError> {
        let existing = self
            .get_plan(id)
            .await?
            .ok_or(DomainError::NotFound("Plan"))?;

        let in_use = Membership::find()
            .filter(membership::Column::PlanId.eq(id))
            .filter(membership::Column::Active.eq(true))
            .count(&self.db)
            .await
            .map_err(|e| DomainError::database("count_plan_memberships", e))?;
        if in_use > 0 {
            return Err(DomainError::validation(format!(
                "Cannot delete plan with {} active memberships. Deactivate it instead.",
                in_use
            )));
        }

        let mut record: membership_plan::ActiveModel = existing.into();
        record.active = Set(false);
        record
            .update(&self.db)
            .await
            .map_err(|e| DomainError::database("delete_plan", e))?;

        self.activity
            .record(&session.user_id, "DELETE", "MembershipPlan", id, json!({}))
            .await;

        Ok(())
    }

    pub async fn active_membership(
        &self,
        member_id: &str,
    ) -> Result<Option<membership::Model>, DomainError> {
        Membership::find()
            .filter(membership::Column::MemberId.eq(member_id))
            .filter(membership::Column::Active.eq(true))
            .order_by_desc(membership::Column::EndDate)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::database("active_membership", e))
    }

    pub async fn get(&self, id: &str) -> Result<Option<membership::Model>, DomainError> {
        Membership::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::database("get_membership", e))
    }

    /// Assign a plan to a member: prior active memberships are
    /// deactivated, the end date derives from the plan duration, the
    /// discount is applied, and the member becomes ACTIVE.
    pub async fn assign(
        &self,
        session: &Session,
        data: AssignMembership,
    ) -> Result<membership::Model, DomainError> {
        let plan = self
            .get_plan(&data.plan_id)
            .await?
            .ok_or(DomainError::NotFound("Plan"))?;

        let member = self
            .members
            .get(&data.member_id)
            .await?
            .ok_or(DomainError::NotFound("Member"))?;

        let end_date = data.start_date + i64::from(plan.duration_days) * DAY_SECONDS;

        let mut final_amount = plan.price;
        if let Some(discount) = data.discount {
            final_amount = match data.discount_type {
                Some(DiscountType::Percentage) => plan.price - plan.price * discount / 100,
                _ => plan.price - discount,
            };
        }

        Membership::update_many()
            .col_expr(membership::Column::Active, sea_orm::sea_query::Expr::value(false))
            .filter(membership::Column::MemberId.eq(data.member_id.as_str()))
            .filter(membership::Column::Active.eq(true))
            .exec(&self.db)
            .await
            .map_err(|e| DomainError::database("deactivate_memberships", e))?;

        let record = membership::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            member_id: Set(data.member_id.clone()),
            plan_id: Set(data.plan_id.clone()),
            start_date: Set(data.start_date),
            end_date: Set(end_date),
            amount: Set(plan.price),
            discount: Set(data.discount),
            discount_type: Set(data.discount_type.map(|d| d.as_str().to_string())),
            final_amount: Set(final_amount),
            active: Set(true),
            notes: Set(data.notes),
            created_at: Set(Utc::now().timestamp()),
        };

        let created = record
            .insert(&self.db)
            .await
            .map_err(|e| DomainError::database("assign_membership", e))?;

        self.members
            .set_status(&data.member_id, MemberStatus::Active)
            .await?;

        self.activity
            .record(
                &session.user_id,
                "CREATE",
                "Membership",
                &created.id,
                json!({"memberName": member.name, "planName": plan.name}),
            )
            .await;

        Ok(created)
    }

    /// Renew from today on the same plan; the prior row is deactivated.
    pub async fn renew(&self, session: &Session, membership_id: &str) -> Result<membership::Model, DomainError> {
        let current = self
            .get(membership_id)
            .await?
            .ok_or(DomainError::NotFound("Membership"))?;

        let plan = self
            .get_plan(&current.plan_id)
            .await?
            .ok_or(DomainError::NotFound("Plan"))?;

        let start_date = Utc::now().timestamp();
        let end_date = start_date + i64::from(plan.duration_days) * DAY_SECONDS;

        let mut prior: membership::ActiveModel = current.clone().into();
        prior.active = Set(false);
        prior
            .update(&self.db)
            .await
            .map_err(|e| DomainError::database("deactivate_membership", e))?;

        let record = membership::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            member_id: Set(current.member_id.clone()),
            plan_id: Set(current.plan_id.clone()),
            start_date: Set(start_date),
            end_date: Set(end_date),
            amount: Set(plan.price),
            discount: Set(None),
            discount_type: Set(None),
            final_amount: Set(plan.price),
            active: Set(true),
            notes: Set(None),
            created_at: Set(start_date),
        };

        let created = record
            .insert(&self.db)
            .await
            .map_err(|e| DomainError::database("renew_membership", e))?;

        self.members
            .set_status(&current.member_id, MemberStatus::Active)
            .await?;

        self.activity
            .record(
                &session.user_id,
                "RENEW",
                "Membership",
                &created.id,
                json!({"planName": plan.name}),
            )
            .await;

        Ok(created)
    }

    /// Extend a membership past its current end by the plan duration and
    /// reactivate it. Used by billing when a renewal payment lands on an
    /// expired membership.
    pub async fn extend(&self, membership_id: &str) -> Result<membership::Model, DomainError> {
        let current = self
            .get(membership_id)
            .await?
            .ok_or(DomainError::NotFound("Membership"))?;
        let plan = self
            .get_plan(&current.plan_id)
            .await?
            .ok_or(DomainError::NotFound("Plan"))?;

        let new_end = current.end_date + i64::from(plan.duration_days) * DAY_SECONDS;
        let member_id = current.member_id.clone();

        let mut record: membership::ActiveModel = current.into();
        record.end_date = Set(new_end);
        record.active = Set(true);
        let updated = record
            .update(&self.db)
            .await
            .map_err(|e| DomainError::database("extend_membership", e))?;

        self.members.set_status(&member_id, MemberStatus::Active).await?;

        Ok(updated)
    }

    /// Active memberships ending inside [from, to], for the notification
    /// window scans.
    pub async fn expiring_between(
        &self,
        from: i64,
        to: i64,
    ) -> Result<Vec<membership::Model>, DomainError> {
        Membership::find()
            .filter(membership::Column::Active.eq(true))
            .filter(membership::Column::EndDate.gte(from))
            .filter(membership::Column::EndDate.lte(to))
            .all(&self.db)
            .await
            .map_err(|e| DomainError::database("expiring_memberships", e))
    }
}
