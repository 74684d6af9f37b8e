use std::sync::Arc;

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, QuerySelect, Set};
use serde_json::json;
use uuid::Uuid;

use crate::errors::DomainError;
use crate::stores::ActivityLogStore;
use crate::types::db::lead::{self, Entity as Lead};
use crate::types::internal::{LeadSource, LeadStatus, Session};

/// Fields captured when a prospect first walks in or calls.
#[derive(Debug, Clone)]
pub struct NewLead {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub source: LeadSource,
    pub interested_plan: Option<String>,
    pub notes: Option<String>,
    pub follow_up_date: Option<i64>,
}

/// Partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct LeadUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub notes: Option<String>,
    pub follow_up_date: Option<i64>,
    pub interested_plan: Option<String>,
}

/// Leads grouped by pipeline state, newest first within each group.
#[derive(Debug, Default)]
pub struct LeadBoard {
    pub new: Vec<lead::Model>,
    pub contacted: Vec<lead::Model>,
    pub follow_up: Vec<lead::Model>,
    pub converted: Vec<lead::Model>,
    pub lost: Vec<lead::Model>,
}

#[derive(Debug)]
pub struct LeadStats {
    pub total: u64,
    pub converted: u64,
    pub conversion_rate: f64,
    pub status_counts: Vec<(String, u64)>,
    pub source_counts: Vec<(String, u64)>,
}

pub struct LeadStore {
    db: DatabaseConnection,
    activity: Arc<ActivityLogStore>,
}

impl LeadStore {
    pub fn new(db: DatabaseConnection, activity: Arc<ActivityLogStore>) -> Self {
        Self { db, activity }
    }

    /// Create a lead in the NEW state, assigned to the creating user,
    /// with the first contact stamped now.
    pub async fn create(&self, session: &Session, data: NewLead) -> Result<lead::Model, DomainError> {
        let now = Utc::now().timestamp();
        let record = lead::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            name: Set(data.name),
            phone: Set(data.phone),
            email: Set(data.email),
            source: Set(data.source.as_str().to_string()),
            status: Set(LeadStatus::New.as_str().to_string()),
            interested_plan: Set(data.interested_plan),
            notes: Set(data.notes),
            follow_up_date: Set(data.follow_up_date),
            last_contact_date: Set(Some(now)),
            converted_date: Set(None),
            assigned_to: Set(session.user_id.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let created = record
            .insert(&self.db)
            .await
            .map_err(|e| DomainError::database("create_lead", e))?;

        self.activity
            .record(
                &session.user_id,
                "CREATE",
                "Lead",
                &created.id,
                json!({"name": created.name, "source": created.source}),
            )
            .await;

        Ok(created)
    }

    pub async fn get(&self, id: &str) -> Result<Option<lead::Model>, DomainError> {
        Lead::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::database("get_lead", e))
    }

    /// Update captured fields, refreshing the last-contact stamp.
    pub async fn update(
        &self,
        session: &Session,
        id: &str,
        data: LeadUpdate,
    ) -> Result<lead::Model, DomainError> {
        let existing = self
            .get(id)
            .await?
            .ok_or(DomainError::NotFound("Lead"))?;

        let now = Utc::now().timestamp();
        let mut record: lead::ActiveModel = existing.into();
        if let Some(name) = data.name {
            record.name = Set(name);
        }
        if let Some(phone) = data.phone {
            record.phone = Set(phone);
        }
        if let Some(email) = data.email {
            record.email = Set(Some(email));
        }
        if let Some(notes) = data.notes {
            record.notes = Set(Some(notes));
        }
        if let Some(follow_up) = data.follow_up_date {
            record.follow_up_date = Set(Some(follow_up));
        }
        if let Some(plan) = data.interested_plan {
            record.interested_plan = Set(Some(plan));
        }
        record.last_contact_date = Set(Some(now));
        record.updated_at = Set(now);

        let updated = record
            .update(&self.db)
            .await
            .map_err(|e| DomainError::database("update_lead", e))?;

        self.activity
            .record(&session.user_id, "UPDATE", "Lead", id, json!({"name": updated.name}))
            .await;

        Ok(updated)
    }

    /// Write a new pipeline state. CONVERTED stamps the conversion date;
    /// every transition refreshes the last-contact stamp. The data layer
    /// does not police terminal states - concurrent writers race with
    /// last-write-wins semantics.
    pub async fn update_status(
        &self,
        session: &Session,
        id: &str,
        status: LeadStatus,
    ) -> Result<lead::Model, DomainError> {
        let existing = self
            .get(id)
            .await?
            .ok_or(DomainError::NotFound("Lead"))?;

        let now = Utc::now().timestamp();
        let mut record: lead::ActiveModel = existing.into();
        record.status = Set(status.as_str().to_string());
        if status == LeadStatus::Converted {
            record.converted_date = Set(Some(now));
        }
        record.last_contact_date = Set(Some(now));
        record.updated_at = Set(now);

        let updated = record
            .update(&self.db)
            .await
            .map_err(|e| DomainError::database("update_lead_status", e))?;

        self.activity
            .record(
                &session.user_id,
                "UPDATE",
                "Lead",
                id,
                json!({"status": status.as_str()}),
            )
            .await;

        Ok(updated)
    }

    /// The 100 most recent leads, grouped by status.
    pub async fn board(&self) -> Result<LeadBoard, DomainError> {
        let leads = Lead::find()
            .order_by_desc(lead::Column::CreatedAt)
            .limit(100)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::database("list_leads", e))?;

        let mut board = LeadBoard::default();
        for item in leads {
            match LeadStatus::parse(&item.status) {
                Some(LeadStatus::New) => board.new.push(item),
                Some(LeadStatus::Contacted) => board.contacted.push(item),
                Some(LeadStatus::FollowUp) => board.follow_up.push(item),
                Some(LeadStatus::Converted) => board.converted.push(item),
                Some(LeadStatus::Lost) => board.lost.push(item),
                None => tracing::warn!(lead_id = %item.id, status = %item.status, "unknown lead status"),
            }
        }
        Ok(board)
    }

    pub async fn stats(&self) -> Result<LeadStats, DomainError> {
        let leads = Lead::find()
            .all(&self.db)
            .await
            .map_err(|e| DomainError::database("lead_stats", e))?;

        let total = leads.len() as u64;
        let mut status_counts: Vec<(String, u64)> = Vec::new();
        let mut source_counts: Vec<(String, u64)> = Vec::new();
        for item in &leads {
            bump(&mut status_counts, &item.status);
            bump(&mut source_counts, &item.source);
        }
        let converted = leads
            .iter()
            .filter(|l| l.status == LeadStatus::Converted.as_str())
            .count() as u64;
        let conversion_rate = if total > 0 {
            (converted as f64 / total as f64) * 100.0
        } else {
            0.0
        };

        Ok(LeadStats {
            total,
            converted,
            conversion_rate,
            status_counts,
            source_counts,
        })
    }

    pub async fn delete(&self, session: &Session, id: &str) -> Result<(), DomainError> {
        let existing = self
            .get(id)
            .await?
            .ok_or(DomainError::NotFound("Lead"))?;

        Lead::delete_by_id(&existing.id)
            .exec(&self.db)
            .await
            .map_err(|e| DomainError::database("delete_lead", e))?;

        self.activity
            .record(&session.user_id, "DELETE", "Lead", id, json!({"name": existing.name}))
            .await;

        Ok(())
    }
}

fn bump(counts: &mut Vec<(String, u64)>, key: &str) {
    match counts.iter_mut().find(|(k, _)| k == key) {
        Some((_, n)) => *n += 1,
        None => counts.push((key.to_string(), 1)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;

    async fn setup() -> (DatabaseConnection, LeadStore) {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");
        Migrator::up(&db, None).await.expect("Failed to run migrations");

        let activity = Arc::new(ActivityLogStore::new(db.clone()));
        let store = LeadStore::new(db.clone(), activity);
        (db, store)
    }

    fn staff_session() -> Session {
        Session {
            user_id: "staff-1".to_string(),
            name: "Front Desk".to_string(),
            email: "desk@gym.test".to_string(),
            role: Role::Receptionist,
            permissions: Vec::new(),
            avatar: None,
        }
    }

    fn walk_in(name: &str) -> NewLead {
        NewLead {
            name: name.to_string(),
            phone: "9998887777".to_string(),
            email: None,
            source: LeadSource::WalkIn,
            interested_plan: None,
            notes: None,
            follow_up_date: None,
        }
    }

    #[tokio::test]
    async fn created_lead_starts_new_and_assigned_to_creator() {
        let (_db, store) = setup().await;
        let session = staff_session();

        let created = store.create(&session, walk_in("Jane Doe")).await.unwrap();

        assert_eq!(created.status, "NEW");
        assert_eq!(created.assigned_to, "staff-1");
        assert!(created.last_contact_date.is_some());
        assert!(created.converted_date.is_none());
    }

    #[tokio::test]
    async fn converting_stamps_converted_date() {
        let (_db, store) = setup().await;
        let session = staff_session();
        let created = store.create(&session, walk_in("Jane Doe")).await.unwrap();

        let updated = store
            .update_status(&session, &created.id, LeadStatus::Converted)
            .await
            .unwrap();

        assert_eq!(updated.status, "CONVERTED");
        assert!(updated.converted_date.is_some());
    }

    #[tokio::test]
    async fn losing_does_not_stamp_converted_date() {
        let (_db, store) = setup().await;
        let session = staff_session();
        let created = store.create(&session, walk_in("No Show")).await.unwrap();

        let updated = store
            .update_status(&session, &created.id, LeadStatus::Lost)
            .await
            .unwrap();

        assert_eq!(updated.status, "LOST");
        assert!(updated.converted_date.is_none());
    }

    #[tokio::test]
    async fn update_refreshes_last_contact_date() {
        let (_db, store) = setup().await;
        let session = staff_session();
        let created = store.create(&session, walk_in("Jane Doe")).await.unwrap();

        let updated = store
            .update(
                &session,
                &created.id,
                LeadUpdate {
                    notes: Some("called back".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.notes.as_deref(), Some("called back"));
        assert!(updated.last_contact_date.unwrap() >= created.last_contact_date.unwrap());
    }

    #[tokio::test]
    async fn status_update_on_missing_lead_is_not_found() {
        let (_db, store) = setup().await;
        let result = store
            .update_status(&staff_session(), "missing", LeadStatus::Contacted)
            .await;
        assert!(matches!(result, Err(DomainError::NotFound(_))));
    }

    #[tokio::test]
    async fn board_groups_by_status() {
        let (_db, store) = setup().await;
        let session = staff_session();
        let a = store.create(&session, walk_in("A")).await.unwrap();
        let _b = store.create(&session, walk_in("B")).await.unwrap();
        store
            .update_status(&session, &a.id, LeadStatus::Converted)
            .await
            .unwrap();

        let board = store.board().await.unwrap();
        assert_eq!(board.new.len(), 1);
        assert_eq!(board.converted.len(), 1);
        assert!(board.lost.is_empty());
    }

    #[tokio::test]
    async fn stats_count_conversions() {
        let (_db, store) = setup().await;
        let session = staff_session();
        let a = store.create(&session, walk_in("A")).await.unwrap();
        store.create(&session, walk_in("B")).await.unwrap();
        store
            .update_status(&session, &a.id, LeadStatus::Converted)
            .await
            .unwrap();

        let stats = store.stats().await.unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.converted, 1);
        assert!((stats.conversion_rate - 50.0).abs() < f64::EPSILON);
    }
}
