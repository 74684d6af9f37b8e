use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde_json::json;
use uuid::Uuid;

use crate::errors::DomainError;
use crate::stores::{ActivityLogStore, MemberStore, MembershipStore};
use crate::types::db::payment::{self, Entity as Payment};
use crate::types::internal::{PaymentMode, Session};

#[derive(Debug, Clone)]
pub struct NewPayment {
    pub member_id: String,
    /// Base amount before GST
    pub amount: i64,
    pub payment_mode: PaymentMode,
    pub notes: Option<String>,
    /// When set, a renewal: an expired membership is extended
    pub membership_id: Option<String>,
    pub gst_number: Option<String>,
    pub gst_percentage: Option<i32>,
}

#[derive(Debug, Clone, Default)]
pub struct PaymentQuery {
    pub member_id: Option<String>,
    pub start_date: Option<i64>,
    pub end_date: Option<i64>,
    pub mode: Option<PaymentMode>,
    pub search: Option<String>,
    pub page: u64,
    pub limit: u64,
}

#[derive(Debug)]
pub struct PaymentPage {
    pub payments: Vec<payment::Model>,
    pub total: u64,
    pub total_amount: i64,
    pub pages: u64,
    pub current_page: u64,
}

#[derive(Debug)]
pub struct PaymentStats {
    pub total_revenue: i64,
    pub total_transactions: u64,
    pub average_transaction: i64,
    pub by_mode: Vec<(String, i64, u64)>,
}

pub struct PaymentStore {
    db: DatabaseConnection,
    members: Arc<MemberStore>,
    memberships: Arc<MembershipStore>,
    activity: Arc<ActivityLogStore>,
}

impl PaymentStore {
    pub fn new(
        db: DatabaseConnection,
        members: Arc<MemberStore>,
        memberships: Arc<MembershipStore>,
        activity: Arc<ActivityLogStore>,
    ) -> Self {
        Self {
            db,
            members,
            memberships,
            activity,
        }
    }

    /// Record a payment. Invoice and transaction numbers embed the
    /// current year+month and restart their 5-digit sequence monthly.
    /// A renewal payment against an expired membership extends it and
    /// reactivates the member.
    pub async fn create(&self, session: &Session, data: NewPayment) -> Result<payment::Model, DomainError> {
        let member = self
            .members
            .get(&data.member_id)
            .await?
            .ok_or(DomainError::NotFound("Member"))?;

        let now = Utc::now();
        let month_tag = now.format("%Y%m").to_string();
        let invoice_number = self.next_number("INV", &month_tag).await?;
        let transaction_id = self.next_number("TXN", &month_tag).await?;

        let mut gst_amount = None;
        let mut total_amount = data.amount;
        if let Some(pct) = data.gst_percentage {
            if pct > 0 {
                let gst = data.amount * i64::from(pct) / 100;
                gst_amount = Some(gst);
                total_amount = data.amount + gst;
            }
        }

        let record = payment::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            member_id: Set(data.member_id.clone()),
            amount: Set(total_amount),
            payment_mode: Set(data.payment_mode.as_str().to_string()),
            transaction_id: Set(Some(transaction_id)),
            invoice_number: Set(invoice_number.clone()),
            gst_number: Set(data.gst_number),
            gst_percentage: Set(data.gst_percentage),
            gst_amount: Set(gst_amount),
            notes: Set(data.notes),
            created_by: Set(session.user_id.clone()),
            payment_date: Set(now.timestamp()),
            created_at: Set(now.timestamp()),
        };

        let created = record
            .insert(&self.db)
            .await
            .map_err(|e| DomainError::database("create_payment", e))?;

        // Renewal: only an already-expired membership is extended here;
        // anything else is just a recorded payment.
        if let Some(membership_id) = &data.membership_id {
            if let Some(membership) = self.memberships.get(membership_id).await? {
                if membership.end_date < now.timestamp() {
                    self.memberships.extend(membership_id).await?;
                }
            }
        }

        self.activity
            .record(
                &session.user_id,
                "CREATE",
                "Payment",
                &created.id,
                json!({
                    "amount": total_amount,
                    "invoiceNumber": invoice_number,
                    "memberName": member.name,
                }),
            )
            .await;

        Ok(created)
    }

    /// Next number in the monthly series for the given prefix, e.g.
    /// INV20250801 -> "INV202508" + 5-digit sequence.
    async fn next_number(&self, prefix: &str, month_tag: &str) -> Result<String, DomainError> {
        let series = format!("{}{}", prefix, month_tag);
        let column = if prefix == "INV" {
            payment::Column::InvoiceNumber
        } else {
            payment::Column::TransactionId
        };

        let last = Payment::find()
            .filter(column.like(format!("{}%", series)))
            .order_by_desc(payment::Column::CreatedAt)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::database("last_payment_number", e))?;

        let sequence = last
            .and_then(|p| {
                let number = if prefix == "INV" {
                    Some(p.invoice_number)
                } else {
                    p.transaction_id
                };
                number.and_then(|n| n[n.len().saturating_sub(5)..].parse::<u32>().ok())
            })
            .map_or(1, |n| n + 1);

        Ok(format!("{}{:05}", series, sequence))
    }

    pub async fn get(&self, id: &str) -> Result<Option<payment::Model>, DomainError> {
        Payment::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::database("get_payment", e))
    }

    pub async fn list(&self, query: PaymentQuery) -> Result<PaymentPage, DomainError> {
        let page = query.page.max(1);
        let limit = if query.limit == 0 { 50 } else { query.limit };

        let mut condition = Condition::all();
        if let Some(member_id) = &query.member_id {
            condition = condition.add(payment::Column::MemberId.eq(member_id.as_str()));
        }
        if let Some(mode) = query.mode {
            condition = condition.add(payment::Column::PaymentMode.eq(mode.as_str()));
        }
        if let (Some(start), Some(end)) = (query.start_date, query.end_date) {
            condition = condition
                .add(payment::Column::PaymentDate.gte(start))
                .add(payment::Column::PaymentDate.lte(end));
        }
        if let Some(search) = &query.search {
            let pattern = format!("%{}%", search);
            condition = condition.add(
                Condition::any()
                    .add(payment::Column::InvoiceNumber.like(&pattern))
                    .add(payment::Column::TransactionId.like(&pattern)),
            );
        }

        let total = Payment::find()
            .filter(condition.clone())
            .count(&self.db)
            .await
            .map_err(|e| DomainError::database("count_payments", e))?;

        let matching = Payment::find()
            .filter(condition.clone())
            .all(&self.db)
            .await
            .map_err(|e| DomainError::database("sum_payments", e))?;
        let total_amount = matching.iter().map(|p| p.amount).sum();

        let payments = Payment::find()
            .filter(condition)
            .order_by_desc(payment::Column::PaymentDate)
            .offset((page - 1) * limit)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::database("list_payments", e))?;

        Ok(PaymentPage {
            payments,
            total,
            total_amount,
            pages: total.div_ceil(limit),
            current_page: page,
        })
    }

    /// Revenue totals since the given timestamp, broken down by mode.
    pub async fn stats_since(&self, since: i64) -> Result<PaymentStats, DomainError> {
        let payments = Payment::find()
            .filter(payment::Column::PaymentDate.gte(since))
            .all(&self.db)
            .await
            .map_err(|e| DomainError::database("payment_stats", e))?;

        let total_revenue: i64 = payments.iter().map(|p| p.amount).sum();
        let total_transactions = payments.len() as u64;
        let average_transaction = if total_transactions > 0 {
            total_revenue / total_transactions as i64
        } else {
            0
        };

        let mut by_mode: Vec<(String, i64, u64)> = Vec::new();
        for p in &payments {
            match by_mode.iter_mut().find(|(mode, _, _)| *mode == p.payment_mode) {
                Some((_, amount, count)) => {
                    *amount += p.amount;
                    *count += 1;
                }
                None => by_mode.push((p.payment_mode.clone(), p.amount, 1)),
            }
        }

        Ok(PaymentStats {
            total_revenue,
            total_transactions,
            average_transaction,
            by_mode,
        })
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
        store: PaymentStore,
        session: Session,
        member_id: String,
    }

    async fn setup() -> Fixture {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");
        Migrator::up(&db, None).await.expect("Failed to run migrations");

        let activity = Arc::new(ActivityLogStore::new(db.clone()));
        let members = Arc::new(MemberStore::new(db.clone(), activity.clone()));
        let memberships = Arc::new(MembershipStore::new(
            db.clone(),
            members.clone(),
            activity.clone(),
        ));
        let store = PaymentStore::new(db, members.clone(), memberships, activity);
        let session = Session {
            user_id: "admin-1".to_string(),
            name: "Admin".to_string(),
            email: "admin@gym.test".to_string(),
            role: Role::Admin,
            permissions: Vec::new(),
            avatar: None,
        };
        let member_id = members
            .create(
                &session,
                NewMember {
                    name: "Jane Doe".to_string(),
                    phone: "9998887777".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .id;

        Fixture {
            store,
            session,
            member_id,
        }
    }

    fn cash_payment(member_id: &str, amount: i64) -> NewPayment {
        NewPayment {
            member_id: member_id.to_string(),
            amount,
            payment_mode: PaymentMode::Cash,
            notes: None,
            membership_id: None,
            gst_number: None,
            gst_percentage: None,
        }
    }

    #[tokio::test]
    async fn invoice_numbers_embed_month_and_count_up() {
        let f = setup().await;
        let first = f.store.create(&f.session, cash_payment(&f.member_id, 1500)).await.unwrap();
        let second = f.store.create(&f.session, cash_payment(&f.member_id, 1500)).await.unwrap();

        let month_tag = Utc::now().format("%Y%m").to_string();
        assert_eq!(first.invoice_number, format!("INV{}00001", month_tag));
        assert_eq!(second.invoice_number, format!("INV{}00002", month_tag));
        assert_eq!(
            second.transaction_id.as_deref(),
            Some(format!("TXN{}00002", month_tag).as_str())
        );
    }

    #[tokio::test]
    async fn gst_is_added_on_top_of_the_base_amount() {
        let f = setup().await;
        let payment = f
            .store
            .create(
                &f.session,
                NewPayment {
                    gst_percentage: Some(18),
                    gst_number: Some("27AAAAA0000A1Z5".to_string()),
                    ..cash_payment(&f.member_id, 1500)
                },
            )
            .await
            .unwrap();

        assert_eq!(payment.gst_amount, Some(270));
        assert_eq!(payment.amount, 1770);
    }

    #[tokio::test]
    async fn payment_for_unknown_member_is_not_found() {
        let f = setup().await;
        let result = f.store.create(&f.session, cash_payment("missing", 100)).await;
        assert!(matches!(result, Err(DomainError::NotFound(_))));
    }

    #[tokio::test]
    async fn list_filters_by_mode_and_sums_totals() {
        let f = setup().await;
        f.store.create(&f.session, cash_payment(&f.member_id, 1000)).await.unwrap();
        f.store
            .create(
                &f.session,
                NewPayment {
                    payment_mode: PaymentMode::Upi,
                    ..cash_payment(&f.member_id, 500)
                },
            )
            .await
            .unwrap();

        let page = f
            .store
            .list(PaymentQuery {
                mode: Some(PaymentMode::Cash),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.total_amount, 1000);

        let all = f.store.list(PaymentQuery::default()).await.unwrap();
        assert_eq!(all.total, 2);
        assert_eq!(all.total_amount, 1500);
    }

    #[tokio::test]
    async fn stats_group_by_mode() {
        let f = setup().await;
        f.store.create(&f.session, cash_payment(&f.member_id, 1000)).await.unwrap();
        f.store.create(&f.session, cash_payment(&f.member_id, 500)).await.unwrap();

        let stats = f.store.stats_since(0).await.unwrap();
        assert_eq!(stats.total_revenue, 1500);
        assert_eq!(stats.total_transactions, 2);
        assert_eq!(stats.average_transaction, 750);
        assert_eq!(stats.by_mode, vec![("CASH".to_string(), 1500, 2)]);
    }
}
