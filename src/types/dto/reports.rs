use poem_openapi::Object;

use crate::stores::{ModeDistribution, MonthlyRevenue, PlanRevenue};

#[derive(Object, Debug)]
pub struct MonthlyRevenueDto {
    pub month: String,
    pub revenue: i64,
    pub count: u64,
}

impl From<MonthlyRevenue> for MonthlyRevenueDto {
    fn from(row: MonthlyRevenue) -> Self {
        Self {
            month: row.month,
            revenue: row.revenue,
            count: row.count,
        }
    }
}

#[derive(Object, Debug)]
pub struct ModeDistributionDto {
    pub mode: String,
    pub amount: i64,
    pub count: u64,
}

impl From<ModeDistribution> for ModeDistributionDto {
    fn from(row: ModeDistribution) -> Self {
        Self {
            mode: row.mode,
            amount: row.amount,
            count: row.count,
        }
    }
}

#[derive(Object, Debug)]
pub struct PlanRevenueDto {
    pub plan: String,
    pub revenue: i64,
    pub count: u64,
}

impl From<PlanRevenue> for PlanRevenueDto {
    fn from(row: PlanRevenue) -> Self {
        Self {
            plan: row.plan,
            revenue: row.revenue,
            count: row.count,
        }
    }
}
