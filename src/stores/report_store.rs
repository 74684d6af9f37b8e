use chrono::{Datelike, NaiveDate, Utc};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use crate::errors::DomainError;
use crate::types::db::membership::{self, Entity as Membership};
use crate::types::db::membership_plan::Entity as MembershipPlan;
use crate::types::db::payment::{self, Entity as Payment};

#[derive(Debug, Clone)]
pub struct MonthlyRevenue {
    pub month: String,
    pub revenue: i64,
    pub count: u64,
}

#[derive(Debug, Clone)]
pub struct ModeDistribution {
    pub mode: String,
    pub amount: i64,
    pub count: u64,
}

#[derive(Debug, Clone)]
pub struct PlanRevenue {
    pub plan: String,
    pub revenue: i64,
    pub count: u64,
}

/// Summary aggregates for the dashboard. File export of these numbers
/// is a separate concern and not handled here.
pub struct ReportStore {
    db: DatabaseConnection,
}

impl ReportStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Revenue per calendar month for the trailing `months` months,
    /// oldest first.
    pub async fn monthly_revenue(&self, months: u32) -> Result<Vec<MonthlyRevenue>, DomainError> {
        let today = Utc::now().date_naive();
        let mut out = Vec::with_capacity(months as usize);

        for offset in (0..months).rev() {
            let (year, month) = back_months(today.year(), today.month(), offset);
            let start = NaiveDate::from_ymd_opt(year, month, 1)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|dt| dt.and_utc().timestamp())
                .unwrap_or_default();
            let (next_year, next_month) = if month == 12 {
                (year + 1, 1)
            } else {
                (year, month + 1)
            };
            let end = NaiveDate::from_ymd_opt(next_year, next_month, 1)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|dt| dt.and_utc().timestamp() - 1)
                .unwrap_or_default();

            let rows = Payment::find()
                .filter(payment::Column::PaymentDate.gte(start))
                .filter(payment::Column::PaymentDate.lte(end))
                .all(&self.db)
                .await
                .map_err(|e| DomainError::database("monthly_revenue", e))?;

            let label = NaiveDate::from_ymd_opt(year, month, 1)
                .map(|d| d.format("%b %Y").to_string())
                .unwrap_or_default();
            out.push(MonthlyRevenue {
                month: label,
                revenue: rows.iter().map(|p| p.amount).sum(),
                count: rows.len() as u64,
            });
        }

        Ok(out)
    }

    pub async fn payment_mode_distribution(&self) -> Result<Vec<ModeDistribution>, DomainError> {
        let payments = Payment::find()
            .all(&self.db)
            .await
            .map_err(|e| DomainError::database("mode_distribution", e))?;

        let mut out: Vec<ModeDistribution> = Vec::new();
        for p in payments {
            match out.iter_mut().find(|d| d.mode == p.payment_mode) {
                Some(entry) => {
                    entry.amount += p.amount;
                    entry.count += 1;
                }
                None => out.push(ModeDistribution {
                    mode: p.payment_mode,
                    amount: p.amount,
                    count: 1,
                }),
            }
        }
        Ok(out)
    }

    /// Active-membership revenue grouped by plan, highest first.
    pub async fn revenue_by_plan(&self) -> Result<Vec<PlanRevenue>, DomainError> {
        let active = Membership::find()
            .filter(membership::Column::Active.eq(true))
            .all(&self.db)
            .await
            .map_err(|e| DomainError::database("active_memberships", e))?;

        let mut out: Vec<(String, PlanRevenue)> = Vec::new();
        for item in active {
            let plan_name = MembershipPlan::find_by_id(&item.plan_id)
                .one(&self.db)
                .await
                .map_err(|e| DomainError::database("membership_plan", e))?
                .map_or_else(|| "Unknown".to_string(), |p| p.name);

            match out.iter_mut().find(|(key, _)| *key == item.plan_id) {
                Some((_, entry)) => {
                    entry.revenue += item.final_amount;
                    entry.count += 1;
                }
                None => out.push((
                    item.plan_id.clone(),
                    PlanRevenue {
                        plan: plan_name,
                        revenue: item.final_amount,
                        count: 1,
                    },
                )),
            }
        }

        let mut plans: Vec<PlanRevenue> = out.into_iter().map(|(_, v)| v).collect();
        plans.sort_by(|a, b| b.revenue.cmp(&a.revenue));
        Ok(plans)
    }
}

fn back_months(year: i32, month: u32, offset: u32) -> (i32, u32) {
    let total = year * 12 + month as i32 - 1 - offset as i32;
    (total.div_euclid(12), (total.rem_euclid(12) + 1) as u32)
}
