use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use serde_json::json;
use uuid::Uuid;

use crate::errors::DomainError;
use crate::types::db::lead::{self, Entity as Lead};
use crate::types::db::member::{self, Entity as Member};
use crate::types::db::membership::{self, Entity as Membership};
use crate::types::db::membership_plan::Entity as MembershipPlan;
use crate::types::db::notification::{self, Entity as Notification};
use crate::types::internal::{LeadStatus, NotificationKind, NotificationStatus};

const HOUR_SECONDS: i64 = 60 * 60;
const DAY_SECONDS: i64 = 24 * HOUR_SECONDS;

/// Counts returned by the polling endpoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotificationCounts {
    pub leads: u64,
    pub payments: u64,
    pub members: u64,
}

/// Non-dismissed notifications grouped the way the header bell shows
/// them.
#[derive(Debug, Default)]
pub struct NotificationFeed {
    pub leads: Vec<notification::Model>,
    pub payments: Vec<notification::Model>,
    pub members: Vec<notification::Model>,
    pub total: u64,
    pub unread: u64,
}

/// Human text for how far away a deadline is.
fn format_time_remaining(now: i64, target: i64) -> String {
    let diff = target - now;
    if diff < 0 {
        return "overdue".to_string();
    }
    let minutes = diff / 60;
    let hours = diff / HOUR_SECONDS;
    let days = diff / DAY_SECONDS;
    if minutes < 60 {
        if minutes == 1 {
            "1 minute".to_string()
        } else {
            format!("{} minutes", minutes)
        }
    } else if hours < 24 {
        if hours == 1 {
            "1 hour".to_string()
        } else {
            format!("{} hours", hours)
        }
    } else if days == 1 {
        "1 day".to_string()
    } else {
        format!("{} days", days)
    }
}

/// In-app notifications, maintained by the externally-polled check
/// endpoint. One live notification per (kind, entity); entries that
/// leave their window are dismissed.
pub struct NotificationStore {
    db: DatabaseConnection,
}

impl NotificationStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Run all three window scans. Invoked by polling, never by a
    /// server-owned scheduler.
    pub async fn check_all(&self) -> Result<NotificationCounts, DomainError> {
        let leads = self.check_lead_follow_ups().await?;
        let (payments, members) = self.check_membership_windows().await?;
        Ok(NotificationCounts {
            leads,
            payments,
            members,
        })
    }

    /// Leads whose follow-up lands between one hour ago and two hours
    /// from now, excluding already-converted ones.
    async fn check_lead_follow_ups(&self) -> Result<u64, DomainError> {
        let now = Utc::now().timestamp();
        let window_start = now - HOUR_SECONDS;
        let window_end = now + 2 * HOUR_SECONDS;

        let due = Lead::find()
            .filter(lead::Column::FollowUpDate.gte(window_start))
            .filter(lead::Column::FollowUpDate.lte(window_end))
            .filter(lead::Column::Status.ne(LeadStatus::Converted.as_str()))
            .all(&self.db)
            .await
            .map_err(|e| DomainError::database("leads_due_follow_up", e))?;

        let mut live_ids = Vec::with_capacity(due.len());
        for item in &due {
            let Some(follow_up) = item.follow_up_date else {
                continue;
            };
            let remaining = format_time_remaining(now, follow_up);
            self.upsert(
                NotificationKind::LeadFollowUp,
                "Lead",
                &item.id,
                "Lead Follow-up Reminder",
                &format!("Follow up with {} in {}", item.name, remaining),
                json!({
                    "leadName": item.name,
                    "leadPhone": item.phone,
                    "followUpDate": follow_up,
                }),
            )
            .await?;
            live_ids.push(item.id.clone());
        }

        self.dismiss_stale(NotificationKind::LeadFollowUp, &live_ids).await?;
        Ok(live_ids.len() as u64)
    }

    /// Active memberships expiring inside the next three days feed both
    /// the payment-due and the membership-expiring groups.
    async fn check_membership_windows(&self) -> Result<(u64, u64), DomainError> {
        let now = Utc::now().timestamp();
        let today = now - now.rem_euclid(DAY_SECONDS);
        let window_end = today + 4 * DAY_SECONDS - 1;

        let expiring = Membership::find()
            .filter(membership::Column::Active.eq(true))
            .filter(membership::Column::EndDate.gte(today))
            .filter(membership::Column::EndDate.lte(window_end))
            .all(&self.db)
            .await
            .map_err(|e| DomainError::database("expiring_memberships", e))?;

        let mut payment_ids = Vec::with_capacity(expiring.len());
        let mut member_ids = Vec::with_capacity(expiring.len());

        for item in &expiring {
            let holder = Member::find_by_id(&item.member_id)
                .one(&self.db)
                .await
                .map_err(|e| DomainError::database("membership_member", e))?;
            let Some(holder) = holder else {
                continue;
            };
            let plan = MembershipPlan::find_by_id(&item.plan_id)
                .one(&self.db)
                .await
                .map_err(|e| DomainError::database("membership_plan", e))?;
            let plan_name = plan.as_ref().map_or("", |p| p.name.as_str());
            let remaining = format_time_remaining(now, item.end_date);

            self.upsert(
                NotificationKind::PaymentDue,
                "Payment",
                &item.id,
                "Payment Due Reminder",
                &format!(
                    "Payment due for {} - Membership expires in {}",
                    holder.name, remaining
                ),
                json!({
                    "memberName": holder.name,
                    "memberId": holder.id,
                    "membershipNumber": holder.membership_number,
                    "planName": plan_name,
                    "amount": item.final_amount,
                    "endDate": item.end_date,
                }),
            )
            .await?;
            payment_ids.push(item.id.clone());

            self.upsert(
                NotificationKind::MembershipExpiring,
                "Member",
                &item.member_id,
                "Membership Expiring Soon",
                &format!("{}'s membership expires in {}", holder.name, remaining),
                json!({
                    "memberName": holder.name,
                    "membershipNumber": holder.membership_number,
                    "planName": plan_name,
                    "endDate": item.end_date,
                }),
            )
            .await?;
            member_ids.push(item.member_id.clone());
        }

        self.dismiss_stale(NotificationKind::PaymentDue, &payment_ids).await?;
        self.dismiss_stale(NotificationKind::MembershipExpiring, &member_ids).await?;

        Ok((payment_ids.len() as u64, member_ids.len() as u64))
    }

    /// Announce a freshly created member. Deduplicated per member;
    /// callers treat failures as best-effort.
    pub async fn announce_new_member(
        &self,
        member_id: &str,
        name: &str,
        membership_number: &str,
    ) -> Result<(), DomainError> {
        let existing = Notification::find()
            .filter(notification::Column::Kind.eq(NotificationKind::NewMember.as_str()))
            .filter(notification::Column::EntityId.eq(member_id))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::database("find_new_member_notification", e))?;
        if existing.is_some() {
            return Ok(());
        }

        self.insert(
            NotificationKind::NewMember,
            "Member",
            member_id,
            "New Member Added",
            &format!("New member {} ({}) has been added", name, membership_number),
            json!({"memberName": name, "membershipNumber": membership_number}),
        )
        .await
    }

    /// Update the live notification for (kind, entity) or create one.
    async fn upsert(
        &self,
        kind: NotificationKind,
        entity_type: &str,
        entity_id: &str,
        title: &str,
        message: &str,
        metadata: serde_json::Value,
    ) -> Result<(), DomainError> {
        let existing = Notification::find()
            .filter(notification::Column::Kind.eq(kind.as_str()))
            .filter(notification::Column::EntityId.eq(entity_id))
            .filter(notification::Column::Status.ne(NotificationStatus::Dismissed.as_str()))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::database("find_notification", e))?;

        match existing {
            Some(entry) => {
                let mut record: notification::ActiveModel = entry.into();
                record.message = Set(message.to_string());
                record.metadata = Set(Some(metadata.to_string()));
                record
                    .update(&self.db)
                    .await
                    .map_err(|e| DomainError::database("update_notification", e))?;
                Ok(())
            }
            None => {
                self.insert(kind, entity_type, entity_id, title, message, metadata)
                    .await
            }
        }
    }

    async fn insert(
        &self,
        kind: NotificationKind,
        entity_type: &str,
        entity_id: &str,
        title: &str,
        message: &str,
        metadata: serde_json::Value,
    ) -> Result<(), DomainError> {
        let record = notification::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            kind: Set(kind.as_str().to_string()),
            title: Set(title.to_string()),
            message: Set(message.to_string()),
            entity_type: Set(entity_type.to_string()),
            entity_id: Set(Some(entity_id.to_string())),
            status: Set(NotificationStatus::Unread.as_str().to_string()),
            metadata: Set(Some(metadata.to_string())),
            created_at: Set(Utc::now().timestamp()),
            read_at: Set(None),
            dismissed_at: Set(None),
        };
        record
            .insert(&self.db)
            .await
            .map_err(|e| DomainError::database("insert_notification", e))?;
        Ok(())
    }

    /// Dismiss live notifications of a kind whose entity left the window.
    async fn dismiss_stale(
        &self,
        kind: NotificationKind,
        live_entity_ids: &[String],
    ) -> Result<(), DomainError> {
        let mut query = Notification::update_many()
            .col_expr(
                notification::Column::Status,
                sea_orm::sea_query::Expr::value(NotificationStatus::Dismissed.as_str()),
            )
            .col_expr(
                notification::Column::DismissedAt,
                sea_orm::sea_query::Expr::value(Utc::now().timestamp()),
            )
            .filter(notification::Column::Kind.eq(kind.as_str()))
            .filter(notification::Column::Status.ne(NotificationStatus::Dismissed.as_str()));
        if !live_entity_ids.is_empty() {
            query = query.filter(
                notification::Column::EntityId
                    .is_not_in(live_entity_ids.iter().map(String::as_str)),
            );
        }
        query
            .exec(&self.db)
            .await
            .map_err(|e| DomainError::database("dismiss_stale_notifications", e))?;
        Ok(())
    }

    /// The 100 most recent non-dismissed notifications, grouped.
    pub async fn feed(&self) -> Result<NotificationFeed, DomainError> {
        let items = Notification::find()
            .filter(notification::Column::Status.ne(NotificationStatus::Dismissed.as_str()))
            .order_by_desc(notification::Column::CreatedAt)
            .limit(100)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::database("list_notifications", e))?;

        let mut feed = NotificationFeed {
            total: items.len() as u64,
            unread: items
                .iter()
                .filter(|n| n.status == NotificationStatus::Unread.as_str())
                .count() as u64,
            ..Default::default()
        };
        for item in items {
            match item.kind.as_str() {
                "LEAD_FOLLOW_UP" => feed.leads.push(item),
                "PAYMENT_DUE" => feed.payments.push(item),
                "MEMBERSHIP_EXPIRING" | "NEW_MEMBER" => feed.members.push(item),
                other => tracing::warn!(kind = other, "unknown notification kind"),
            }
        }
        Ok(feed)
    }

    pub async fn mark_read(&self, id: &str) -> Result<(), DomainError> {
        let existing = Notification::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::database("get_notification", e))?
            .ok_or(DomainError::NotFound("Notification"))?;

        let mut record: notification::ActiveModel = existing.into();
        record.status = Set(NotificationStatus::Read.as_str().to_string());
        record.read_at = Set(Some(Utc::now().timestamp()));
        record
            .update(&self.db)
            .await
            .map_err(|e| DomainError::database("mark_notification_read", e))?;
        Ok(())
    }

    pub async fn dismiss(&self, id: &str) -> Result<(), DomainError> {
        let existing = Notification::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::database("get_notification", e))?
            .ok_or(DomainError::NotFound("Notification"))?;

        let mut record: notification::ActiveModel = existing.into();
        record.status = Set(NotificationStatus::Dismissed.as_str().to_string());
        record.dismissed_at = Set(Some(Utc::now().timestamp()));
        record
            .update(&self.db)
            .await
            .map_err(|e| DomainError::database("dismiss_notification", e))?;
        Ok(())
    }

    pub async fn mark_all_read(&self) -> Result<(), DomainError> {
        Notification::update_many()
            .col_expr(
                notification::Column::Status,
                sea_orm::sea_query::Expr::value(NotificationStatus::Read.as_str()),
            )
            .col_expr(
                notification::Column::ReadAt,
                sea_orm::sea_query::Expr::value(Utc::now().timestamp()),
            )
            .filter(notification::Column::Status.eq(NotificationStatus::Unread.as_str()))
            .exec(&self.db)
            .await
            .map_err(|e| DomainError::database("mark_all_notifications_read", e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use crate::stores::{
        ActivityLogStore, AssignMembership, LeadStore, LeadUpdate, MemberStore, MembershipStore,
        NewLead, NewMember, NewPlan,
    };
    use crate::types::internal::{LeadSource, Session};
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;
    use std::sync::Arc;

    struct Fixture {
        db: DatabaseConnection,
        store: NotificationStore,
        leads: LeadStore,
        members: Arc<MemberStore>,
        memberships: MembershipStore,
        session: Session,
    }

    async fn setup() -> Fixture {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");
        Migrator::up(&db, None).await.expect("Failed to run migrations");

        let activity = Arc::new(ActivityLogStore::new(db.clone()));
        let members = Arc::new(MemberStore::new(db.clone(), activity.clone()));
        let memberships = MembershipStore::new(db.clone(), members.clone(), activity.clone());
        let leads = LeadStore::new(db.clone(), activity);
        let store = NotificationStore::new(db.clone());
        let session = Session {
            user_id: "staff-1".to_string(),
            name: "Front Desk".to_string(),
            email: "desk@gym.test".to_string(),
            role: Role::Receptionist,
            permissions: Vec::new(),
            avatar: None,
        };
        Fixture {
            db,
            store,
            leads,
            members,
            memberships,
            session,
        }
    }

    #[tokio::test]
    async fn follow_up_inside_window_creates_a_notification() {
        let f = setup().await;
        f.leads
            .create(
                &f.session,
                NewLead {
                    name: "Jane Doe".to_string(),
                    phone: "9998887777".to_string(),
                    email: None,
                    source: LeadSource::WalkIn,
                    interested_plan: None,
                    notes: None,
                    follow_up_date: Some(Utc::now().timestamp() + HOUR_SECONDS),
                },
            )
            .await
            .unwrap();

        let counts = f.store.check_all().await.unwrap();
        assert_eq!(counts.leads, 1);

        let feed = f.store.feed().await.unwrap();
        assert_eq!(feed.leads.len(), 1);
        assert!(feed.leads[0].message.contains("Jane Doe"));
        assert_eq!(feed.unread, 1);
    }

    #[tokio::test]
    async fn checking_twice_updates_instead_of_duplicating() {
        let f = setup().await;
        f.leads
            .create(
                &f.session,
                NewLead {
                    name: "Jane Doe".to_string(),
                    phone: "9998887777".to_string(),
                    email: None,
                    source: LeadSource::WalkIn,
                    interested_plan: None,
                    notes: None,
                    follow_up_date: Some(Utc::now().timestamp() + HOUR_SECONDS),
                },
            )
            .await
            .unwrap();

        f.store.check_all().await.unwrap();
        f.store.check_all().await.unwrap();

        let feed = f.store.feed().await.unwrap();
        assert_eq!(feed.leads.len(), 1);
    }

    #[tokio::test]
    async fn follow_up_leaving_the_window_is_dismissed() {
        let f = setup().await;
        let created = f
            .leads
            .create(
                &f.session,
                NewLead {
                    name: "Jane Doe".to_string(),
                    phone: "9998887777".to_string(),
                    email: None,
                    source: LeadSource::WalkIn,
                    interested_plan: None,
                    notes: None,
                    follow_up_date: Some(Utc::now().timestamp() + HOUR_SECONDS),
                },
            )
            .await
            .unwrap();
        f.store.check_all().await.unwrap();

        // Push the follow-up a week out; the lead leaves the window.
        f.leads
            .update(
                &f.session,
                &created.id,
                LeadUpdate {
                    follow_up_date: Some(Utc::now().timestamp() + 7 * DAY_SECONDS),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let counts = f.store.check_all().await.unwrap();

        assert_eq!(counts.leads, 0);
        let feed = f.store.feed().await.unwrap();
        assert!(feed.leads.is_empty());
    }

    #[tokio::test]
    async fn expiring_membership_feeds_payment_and_member_groups() {
        let f = setup().await;
        let member = f
            .members
            .create(
                &f.session,
                NewMember {
                    name: "Jane Doe".to_string(),
                    phone: "9998887777".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let plan = f
            .memberships
            .create_plan(
                &f.session,
                NewPlan {
                    name: "Monthly Basic".to_string(),
                    description: None,
                    duration_days: 30,
                    price: 1500,
                    features: Vec::new(),
                    color: None,
                    popular: false,
                    sort_order: 1,
                },
            )
            .await
            .unwrap();
        // Start 28 days ago: the membership ends in ~2 days.
        f.memberships
            .assign(
                &f.session,
                AssignMembership {
                    member_id: member.id.clone(),
                    plan_id: plan.id,
                    start_date: Utc::now().timestamp() - 28 * DAY_SECONDS,
                    discount: None,
                    discount_type: None,
                    notes: None,
                },
            )
            .await
            .unwrap();

        let counts = f.store.check_all().await.unwrap();
        assert_eq!(counts.payments, 1);
        assert_eq!(counts.members, 1);

        let feed = f.store.feed().await.unwrap();
        assert_eq!(feed.payments.len(), 1);
        assert_eq!(feed.members.len(), 1);
        assert!(feed.payments[0].message.contains("Jane Doe"));
    }

    #[tokio::test]
    async fn new_member_announcement_is_deduplicated() {
        let f = setup().await;
        f.store.announce_new_member("m-1", "Jane Doe", "PBF1001").await.unwrap();
        f.store.announce_new_member("m-1", "Jane Doe", "PBF1001").await.unwrap();

        let feed = f.store.feed().await.unwrap();
        assert_eq!(feed.members.len(), 1);
    }

    #[tokio::test]
    async fn read_and_dismiss_transitions() {
        let f = setup().await;
        f.store.announce_new_member("m-1", "Jane Doe", "PBF1001").await.unwrap();
        let feed = f.store.feed().await.unwrap();
        let id = feed.members[0].id.clone();

        f.store.mark_read(&id).await.unwrap();
        let feed = f.store.feed().await.unwrap();
        assert_eq!(feed.unread, 0);
        assert_eq!(feed.total, 1);

        f.store.dismiss(&id).await.unwrap();
        let feed = f.store.feed().await.unwrap();
        assert_eq!(feed.total, 0);

        let raw = Notification::find_by_id(&id).one(&f.db).await.unwrap().unwrap();
        assert_eq!(raw.status, "DISMISSED");
        assert!(raw.dismissed_at.is_some());
    }

    #[test]
    fn time_remaining_formats() {
        assert_eq!(format_time_remaining(100, 50), "overdue");
        assert_eq!(format_time_remaining(0, 60), "1 minute");
        assert_eq!(format_time_remaining(0, 30 * 60), "30 minutes");
        assert_eq!(format_time_remaining(0, 2 * HOUR_SECONDS), "2 hours");
        assert_eq!(format_time_remaining(0, DAY_SECONDS), "1 day");
        assert_eq!(format_time_remaining(0, 3 * DAY_SECONDS), "3 days");
    }
}
