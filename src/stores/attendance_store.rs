use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde_json::json;
use uuid::Uuid;

use crate::errors::DomainError;
use crate::stores::{ActivityLogStore, MemberStore};
use crate::types::db::attendance::{self, Entity as Attendance};
use crate::types::internal::{MemberStatus, Session};

const DAY_SECONDS: i64 = 24 * 60 * 60;

/// Midnight-truncated day bucket for a timestamp.
fn day_start(ts: i64) -> i64 {
    ts - ts.rem_euclid(DAY_SECONDS)
}

pub struct AttendanceStore {
    db: DatabaseConnection,
    members: Arc<MemberStore>,
    activity: Arc<ActivityLogStore>,
}

impl AttendanceStore {
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

    /// Mark attendance for today. First call checks the member in; a
    /// later call carrying a check-out time closes the visit and records
    /// the duration. A second check-in without a check-out is an error.
    pub async fn mark(
        &self,
        session: &Session,
        member_id: &str,
        check_in: Option<i64>,
        check_out: Option<i64>,
    ) -> Result<attendance::Model, DomainError> {
        let now = Utc::now().timestamp();
        let today = day_start(now);

        let existing = Attendance::find()
            .filter(attendance::Column::MemberId.eq(member_id))
            .filter(attendance::Column::Date.eq(today))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::database("find_attendance", e))?;

        let (record, action) = match existing {
            Some(entry) => {
                let Some(out) = check_out else {
                    return Err(DomainError::validation("Already checked in today"));
                };
                if entry.check_out.is_some() {
                    return Err(DomainError::validation("Already checked out today"));
                }
                let duration = ((out - entry.check_in) / 60) as i32;
                let mut model: attendance::ActiveModel = entry.into();
                model.check_out = Set(Some(out));
                model.duration_minutes = Set(Some(duration));
                let updated = model
                    .update(&self.db)
                    .await
                    .map_err(|e| DomainError::database("checkout_attendance", e))?;
                (updated, "CHECKOUT")
            }
            None => {
                let model = attendance::ActiveModel {
                    id: Set(Uuid::new_v4().to_string()),
                    member_id: Set(member_id.to_string()),
                    date: Set(today),
                    check_in: Set(check_in.unwrap_or(now)),
                    check_out: Set(None),
                    duration_minutes: Set(None),
                };
                let created = model
                    .insert(&self.db)
                    .await
                    .map_err(|e| DomainError::database("checkin_attendance", e))?;
                (created, "CHECKIN")
            }
        };

        self.activity
            .record(
                &session.user_id,
                action,
                "Attendance",
                &record.id,
                json!({"memberId": member_id}),
            )
            .await;

        Ok(record)
    }

    /// Check a member in by membership number at the front desk. Only
    /// ACTIVE members pass.
    pub async fn quick_check_in(
        &self,
        session: &Session,
        membership_number: &str,
    ) -> Result<attendance::Model, DomainError> {
        let member = self
            .members
            .find_by_membership_number(membership_number)
            .await?
            .ok_or(DomainError::NotFound("Member"))?;

        if member.status != MemberStatus::Active.as_str() {
            return Err(DomainError::validation("Membership is not active"));
        }

        self.mark(session, &member.id, Some(Utc::now().timestamp()), None)
            .await
    }

    /// Entries for one day, newest check-in first.
    pub async fn list_for_day(&self, day: i64) -> Result<Vec<attendance::Model>, DomainError> {
        Attendance::find()
            .filter(attendance::Column::Date.eq(day_start(day)))
            .order_by_desc(attendance::Column::CheckIn)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::database("list_attendance", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use crate::stores::NewMember;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;

    struct Fixture {
        members: Arc<MemberStore>,
        store: AttendanceStore,
        session: Session,
    }

    async fn setup() -> Fixture {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");
        Migrator::up(&db, None).await.expect("Failed to run migrations");

        let activity = Arc::new(ActivityLogStore::new(db.clone()));
        let members = Arc::new(MemberStore::new(db.clone(), activity.clone()));
        let store = AttendanceStore::new(db, members.clone(), activity);
        let session = Session {
            user_id: "desk-1".to_string(),
            name: "Front Desk".to_string(),
            email: "desk@gym.test".to_string(),
            role: Role::Receptionist,
            permissions: Vec::new(),
            avatar: None,
        };
        Fixture {
            members,
            store,
            session,
        }
    }

    async fn seed_member(f: &Fixture, active: bool) -> (String, String) {
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
        if active {
            f.members
                .set_status(&member.id, MemberStatus::Active)
                .await
                .unwrap();
        }
        (member.id, member.membership_number)
    }

    #[tokio::test]
    async fn check_in_then_checkout_records_duration() {
        let f = setup().await;
        let (member_id, _) = seed_member(&f, true).await;

        let entry = f.store.mark(&f.session, &member_id, None, None).await.unwrap();
        assert!(entry.check_out.is_none());

        let out = entry.check_in + 90 * 60;
        let closed = f
            .store
            .mark(&f.session, &member_id, None, Some(out))
            .await
            .unwrap();
        assert_eq!(closed.check_out, Some(out));
        assert_eq!(closed.duration_minutes, Some(90));
    }

    #[tokio::test]
    async fn double_check_in_is_rejected() {
        let f = setup().await;
        let (member_id, _) = seed_member(&f, true).await;

        f.store.mark(&f.session, &member_id, None, None).await.unwrap();
        let again = f.store.mark(&f.session, &member_id, None, None).await;
        assert!(matches!(again, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn quick_check_in_requires_active_membership() {
        let f = setup().await;
        let (_, number) = seed_member(&f, false).await;

        let result = f.store.quick_check_in(&f.session, &number).await;
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn quick_check_in_by_membership_number() {
        let f = setup().await;
        let (member_id, number) = seed_member(&f, true).await;

        let entry = f.store.quick_check_in(&f.session, &number).await.unwrap();
        assert_eq!(entry.member_id, member_id);

        let today = f.store.list_for_day(Utc::now().timestamp()).await.unwrap();
        assert_eq!(today.len(), 1);
    }

    #[tokio::test]
    async fn quick_check_in_for_unknown_number_is_not_found() {
        let f = setup().await;
        let result = f.store.quick_check_in(&f.session, "PBF9999").await;
        assert!(matches!(result, Err(DomainError::NotFound(_))));
    }
}
