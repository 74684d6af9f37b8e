use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde_json::json;
use uuid::Uuid;

use crate::errors::DomainError;
use crate::stores::ActivityLogStore;
use crate::types::db::member::{self, Entity as Member};
use crate::types::internal::{MemberStatus, Session};

const MEMBERSHIP_NUMBER_PREFIX: &str = "PBF";

#[derive(Debug, Clone, Default)]
pub struct NewMember {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub date_of_birth: Option<i64>,
    pub gender: Option<String>,
    pub emergency_name: Option<String>,
    pub emergency_contact: Option<String>,
    pub blood_group: Option<String>,
    pub medical_conditions: Option<String>,
    pub trainer_id: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct MemberUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub trainer_id: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct MemberQuery {
    pub search: Option<String>,
    pub status: Option<MemberStatus>,
    pub trainer_id: Option<String>,
    pub page: u64,
    pub limit: u64,
}

#[derive(Debug)]
pub struct MemberPage {
    pub members: Vec<member::Model>,
    pub total: u64,
    pub pages: u64,
    pub current_page: u64,
}

pub struct MemberStore {
    db: DatabaseConnection,
    activity: Arc<ActivityLogStore>,
}

impl MemberStore {
    pub fn new(db: DatabaseConnection, activity: Arc<ActivityLogStore>) -> Self {
        Self { db, activity }
    }

    /// Create a member in PENDING state with the next membership number.
    pub async fn create(&self, session: &Session, data: NewMember) -> Result<member::Model, DomainError> {
        let membership_number = self.next_membership_number().await?;
        let now = Utc::now().timestamp();

        let record = member::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            membership_number: Set(membership_number.clone()),
            name: Set(data.name),
            phone: Set(data.phone),
            email: Set(data.email),
            address: Set(data.address),
            city: Set(data.city),
            state: Set(data.state),
            pincode: Set(data.pincode),
            date_of_birth: Set(data.date_of_birth),
            gender: Set(data.gender),
            emergency_name: Set(data.emergency_name),
            emergency_contact: Set(data.emergency_contact),
            blood_group: Set(data.blood_group),
            medical_conditions: Set(data.medical_conditions),
            trainer_id: Set(data.trainer_id),
            status: Set(MemberStatus::Pending.as_str().to_string()),
            notes: Set(data.notes),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let created = record
            .insert(&self.db)
            .await
            .map_err(|e| DomainError::database("create_member", e))?;

        self.activity
            .record(
                &session.user_id,
                "CREATE",
                "Member",
                &created.id,
                json!({"membershipNumber": membership_number, "name": created.name}),
            )
            .await;

        Ok(created)
    }

    /// Next number in the PBF series. Derived from the most recently
    /// created member; concurrent creates race and the loser hits the
    /// unique constraint.
    async fn next_membership_number(&self) -> Result<String, DomainError> {
        let last = Member::find()
            .order_by_desc(member::Column::CreatedAt)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::database("last_membership_number", e))?;

        let last_number = last
            .and_then(|m| m.membership_number[MEMBERSHIP_NUMBER_PREFIX.len()..].parse::<u32>().ok())
            .unwrap_or(1000);

        Ok(format!("{}{:04}", MEMBERSHIP_NUMBER_PREFIX, last_number + 1))
    }

    pub async fn get(&self, id: &str) -> Result<Option<member::Model>, DomainError> {
        Member::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::database("get_member", e))
    }

    pub async fn find_by_membership_number(
        &self,
        number: &str,
    ) -> Result<Option<member::Model>, DomainError> {
        Member::find()
            .filter(member::Column::MembershipNumber.eq(number))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::database("find_member_by_number", e))
    }

    pub async fn list(&self, query: MemberQuery) -> Result<MemberPage, DomainError> {
        let page = query.page.max(1);
        let limit = if query.limit == 0 { 20 } else { query.limit };

        let mut condition = Condition::all();
        if let Some(search) = &query.search {
            let pattern = format!("%{}%", search);
            condition = condition.add(
                Condition::any()
                    .add(member::Column::Name.like(&pattern))
                    .add(member::Column::Phone.like(&pattern))
                    .add(member::Column::MembershipNumber.like(&pattern))
                    .add(member::Column::Email.like(&pattern)),
            );
        }
        if let Some(status) = query.status {
            condition = condition.add(member::Column::Status.eq(status.as_str()));
        }
        if let Some(trainer_id) = &query.trainer_id {
            condition = condition.add(member::Column::TrainerId.eq(trainer_id.as_str()));
        }

        let total = Member::find()
            .filter(condition.clone())
            .count(&self.db)
            .await
            .map_err(|e| DomainError::database("count_members", e))?;

        let members = Member::find()
            .filter(condition)
            .order_by_desc(member::Column::CreatedAt)
            .offset((page - 1) * limit)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::database("list_members", e))?;

        Ok(MemberPage {
            members,
            total,
            pages: total.div_ceil(limit),
            current_page: page,
        })
    }

    pub async fn update(
        &self,
        session: &Session,
        id: &str,
        data: MemberUpdate,
    ) -> Result<member::Model, DomainError> {
        let existing = self
            .get(id)
            .await?
            .ok_or(DomainError::NotFound("Member"))?;

        let mut record: member::ActiveModel = existing.into();
        if let Some(name) = data.name {
            record.name = Set(name);
        }
        if let Some(phone) = data.phone {
            record.phone = Set(phone);
        }
        if let Some(email) = data.email {
            record.email = Set(Some(email));
        }
        if let Some(address) = data.address {
            record.address = Set(Some(address));
        }
        if let Some(city) = data.city {
            record.city = Set(Some(city));
        }
        if let Some(state) = data.state {
            record.state = Set(Some(state));
        }
        if let Some(trainer_id) = data.trainer_id {
            record.trainer_id = Set(Some(trainer_id));
        }
        if let Some(notes) = data.notes {
            record.notes = Set(Some(notes));
        }
        record.updated_at = Set(Utc::now().timestamp());

        let updated = record
            .update(&self.db)
            .await
            .map_err(|e| DomainError::database("update_member", e))?;

        self.activity
            .record(&session.user_id, "UPDATE", "Member", id, json!({"name": updated.name}))
            .await;

        Ok(updated)
    }

    /// Flip the membership status. Used by billing and membership
    /// assignment when a member becomes ACTIVE.
    pub async fn set_status(&self, id: &str, status: MemberStatus) -> Result<(), DomainError> {
        let existing = self
            .get(id)
            .await?
            .ok_or(DomainError::NotFound("Member"))?;

        let mut record: member::ActiveModel = existing.into();
        record.status = Set(status.as_str().to_string());
        record.updated_at = Set(Utc::now().timestamp());
        record
            .update(&self.db)
            .await
            .map_err(|e| DomainError::database("set_member_status", e))?;
        Ok(())
    }

    pub async fn delete(&self, session: &Session, id: &str) -> Result<(), DomainError> {
        let existing = self
            .get(id)
            .await?
            .ok_or(DomainError::NotFound("Member"))?;

        Member::delete_by_id(&existing.id)
            .exec(&self.db)
            .await
            .map_err(|e| DomainError::database("delete_member", e))?;

        self.activity
            .record(&session.user_id, "DELETE", "Member", id, json!({"name": existing.name}))
            .await;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;

    async fn setup() -> MemberStore {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");
        Migrator::up(&db, None).await.expect("Failed to run migrations");
        let activity = Arc::new(ActivityLogStore::new(db.clone()));
        MemberStore::new(db, activity)
    }

    fn admin_session() -> Session {
        Session {
            user_id: "admin-1".to_string(),
            name: "Admin".to_string(),
            email: "admin@gym.test".to_string(),
            role: Role::Admin,
            permissions: Vec::new(),
            avatar: None,
        }
    }

    fn new_member(name: &str, phone: &str) -> NewMember {
        NewMember {
            name: name.to_string(),
            phone: phone.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn first_member_gets_pbf1001_and_pending_status() {
        let store = setup().await;
        let created = store
            .create(&admin_session(), new_member("Jane Doe", "9998887777"))
            .await
            .unwrap();

        assert_eq!(created.membership_number, "PBF1001");
        assert_eq!(created.status, "PENDING");
    }

    #[tokio::test]
    async fn membership_numbers_increase() {
        let store = setup().await;
        let session = admin_session();
        let first = store.create(&session, new_member("A", "1")).await.unwrap();
        let second = store.create(&session, new_member("B", "2")).await.unwrap();

        assert_eq!(first.membership_number, "PBF1001");
        assert_eq!(second.membership_number, "PBF1002");
    }

    #[tokio::test]
    async fn search_matches_name_phone_and_number() {
        let store = setup().await;
        let session = admin_session();
        store.create(&session, new_member("Jane Doe", "9998887777")).await.unwrap();
        store.create(&session, new_member("Bob Roy", "1112223333")).await.unwrap();

        for term in ["Jane", "999888", "PBF1001"] {
            let page = store
                .list(MemberQuery {
                    search: Some(term.to_string()),
                    ..Default::default()
                })
                .await
                .unwrap();
            assert_eq!(page.total, 1, "search term {term}");
            assert_eq!(page.members[0].name, "Jane Doe");
        }
    }

    #[tokio::test]
    async fn status_filter_and_set_status() {
        let store = setup().await;
        let session = admin_session();
        let created = store.create(&session, new_member("Jane", "1")).await.unwrap();
        store.create(&session, new_member("Bob", "2")).await.unwrap();

        store.set_status(&created.id, MemberStatus::Active).await.unwrap();

        let page = store
            .list(MemberQuery {
                status: Some(MemberStatus::Active),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.members[0].id, created.id);
    }

    #[tokio::test]
    async fn pagination_reports_pages() {
        let store = setup().await;
        let session = admin_session();
        for i in 0..5 {
            store
                .create(&session, new_member(&format!("M{i}"), &format!("{i}")))
                .await
                .unwrap();
        }

        let page = store
            .list(MemberQuery {
                page: 2,
                limit: 2,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.total, 5);
        assert_eq!(page.pages, 3);
        assert_eq!(page.current_page, 2);
        assert_eq!(page.members.len(), 2);
    }

    #[tokio::test]
    async fn delete_removes_member() {
        let store = setup().await;
        let session = admin_session();
        let created = store.create(&session, new_member("Jane", "1")).await.unwrap();

        store.delete(&session, &created.id).await.unwrap();
        assert!(store.get(&created.id).await.unwrap().is_none());
    }
}
