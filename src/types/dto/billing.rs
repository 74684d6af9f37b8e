use poem_openapi::Object;

use crate::types::db::payment;

/// Request model for recording a payment
#[derive(Object, Debug)]
pub struct CreatePaymentRequest {
    pub member_id: String,

    /// Base amount before GST, whole currency units
    #[oai(validator(minimum(value = "1")))]
    pub amount: i64,

    /// Payment mode (CASH, CARD, UPI, BANK_TRANSFER, OTHER)
    pub payment_mode: String,

    pub notes: Option<String>,

    /// When set, a renewal against this membership
    pub membership_id: Option<String>,

    pub gst_number: Option<String>,

    /// GST percentage applied on top of the base amount
    #[oai(validator(minimum(value = "0"), maximum(value = "100")))]
    pub gst_percentage: Option<i32>,
}

/// Response model representing a payment
#[derive(Object, Debug)]
pub struct PaymentDto {
    pub id: String,
    pub member_id: String,
    /// GST-inclusive total
    pub amount: i64,
    pub payment_mode: String,
    pub transaction_id: Option<String>,
    pub invoice_number: String,
    pub gst_number: Option<String>,
    pub gst_percentage: Option<i32>,
    pub gst_amount: Option<i64>,
    pub notes: Option<String>,
    pub created_by: String,
    pub payment_date: i64,
}

impl From<payment::Model> for PaymentDto {
    fn from(model: payment::Model) -> Self {
        Self {
            id: model.id,
            member_id: model.member_id,
            amount: model.amount,
            payment_mode: model.payment_mode,
            transaction_id: model.transaction_id,
            invoice_number: model.invoice_number,
            gst_number: model.gst_number,
            gst_percentage: model.gst_percentage,
            gst_amount: model.gst_amount,
            notes: model.notes,
            created_by: model.created_by,
            payment_date: model.payment_date,
        }
    }
}

/// Mutation result carrying the payment
#[derive(Object, Debug)]
pub struct PaymentActionResponse {
    pub success: bool,
    pub error: Option<String>,
    pub data: Option<PaymentDto>,
}

impl PaymentActionResponse {
    pub fn ok(payment: PaymentDto) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(payment),
        }
    }

    pub fn failed(error: String) -> Self {
        Self {
            success: false,
            error: Some(error),
            data: None,
        }
    }
}

/// One page of the payment list with totals
#[derive(Object, Debug)]
pub struct PaymentListResponse {
    pub payments: Vec<PaymentDto>,
    pub total: u64,
    pub total_amount: i64,
    pub pages: u64,
    pub current_page: u64,
}

#[derive(Object, Debug)]
pub struct ModeBreakdown {
    pub mode: String,
    pub amount: i64,
    pub count: u64,
}

/// Revenue summary for a period
#[derive(Object, Debug)]
pub struct PaymentStatsResponse {
    pub total_revenue: i64,
    pub total_transactions: u64,
    pub average_transaction: i64,
    pub by_mode: Vec<ModeBreakdown>,
}
