use std::sync::Arc;

use chrono::Utc;
use poem_openapi::{
    param::{Path, Query},
    payload::Json,
    OpenApi, Tags,
};

use crate::api::{current_session, SessionAuth};
use crate::auth::{authorize, Action};
use crate::errors::AuthError;
use crate::services::TokenService;
use crate::stores::{NewPayment, PaymentQuery, PaymentStore};
use crate::types::dto::billing::{
    CreatePaymentRequest, ModeBreakdown, PaymentActionResponse, PaymentDto, PaymentListResponse,
    PaymentStatsResponse,
};
use crate::types::internal::PaymentMode;

/// Billing API endpoints
pub struct BillingApi {
    payments: Arc<PaymentStore>,
    tokens: Arc<TokenService>,
}

impl BillingApi {
    pub fn new(payments: Arc<PaymentStore>, tokens: Arc<TokenService>) -> Self {
        Self { payments, tokens }
    }
}

/// API tags for billing endpoints
#[derive(Tags)]
enum BillingTags {
    /// Payments and revenue
    Billing,
}

#[OpenApi(prefix_path = "/billing")]
impl BillingApi {
    /// Record a payment; invoice and transaction numbers are generated
    #[oai(path = "/payments", method = "post", tag = "BillingTags::Billing")]
    async fn create(
        &self,
        auth: SessionAuth,
        body: Json<CreatePaymentRequest>,
    ) -> Result<Json<PaymentActionResponse>, AuthError> {
        let session = current_session(&self.tokens, &auth)?;
        authorize(&session, Action::CreatePayment)?;

        let Some(mode) = PaymentMode::parse(&body.payment_mode) else {
            return Ok(Json(PaymentActionResponse::failed(format!(
                "Unknown payment mode: {}",
                body.payment_mode
            ))));
        };

        let body = body.0;
        let result = self
            .payments
            .create(
                &session,
                NewPayment {
                    member_id: body.member_id,
                    amount: body.amount,
                    payment_mode: mode,
                    notes: body.notes,
                    membership_id: body.membership_id,
                    gst_number: body.gst_number,
                    gst_percentage: body.gst_percentage,
                },
            )
            .await;

        Ok(Json(match result {
            Ok(payment) => PaymentActionResponse::ok(PaymentDto::from(payment)),
            Err(e) => PaymentActionResponse::failed(e.caller_message("Failed to process payment")),
        }))
    }

    /// List payments with filters and running totals
    #[oai(path = "/payments", method = "get", tag = "BillingTags::Billing")]
    #[allow(clippy::too_many_arguments)]
    async fn list(
        &self,
        auth: SessionAuth,
        member_id: Query<Option<String>>,
        start_date: Query<Option<i64>>,
        end_date: Query<Option<i64>>,
        mode: Query<Option<String>>,
        search: Query<Option<String>>,
        page: Query<Option<u64>>,
        limit: Query<Option<u64>>,
    ) -> Result<Json<PaymentListResponse>, AuthError> {
        let session = current_session(&self.tokens, &auth)?;
        authorize(&session, Action::ViewBilling)?;

        let mode = match mode.0.as_deref() {
            None => None,
            Some(raw) => Some(
                PaymentMode::parse(raw)
                    .ok_or_else(|| AuthError::internal_error(format!("Unknown mode: {raw}")))?,
            ),
        };

        let page = self
            .payments
            .list(PaymentQuery {
                member_id: member_id.0,
                start_date: start_date.0,
                end_date: end_date.0,
                mode,
                search: search.0,
                page: page.0.unwrap_or(1),
                limit: limit.0.unwrap_or(50),
            })
            .await
            .map_err(|e| AuthError::internal_error(e.caller_message("Failed to list payments")))?;

        Ok(Json(PaymentListResponse {
            payments: page.payments.into_iter().map(Into::into).collect(),
            total: page.total,
            total_amount: page.total_amount,
            pages: page.pages,
            current_page: page.current_page,
        }))
    }

    /// Fetch one payment
    #[oai(path = "/payments/:id", method = "get", tag = "BillingTags::Billing")]
    async fn get(
        &self,
        auth: SessionAuth,
        id: Path<String>,
    ) -> Result<Json<PaymentActionResponse>, AuthError> {
        let session = current_session(&self.tokens, &auth)?;
        authorize(&session, Action::ViewBilling)?;

        let result = self.payments.get(&id.0).await;
        Ok(Json(match result {
            Ok(Some(payment)) => PaymentActionResponse::ok(PaymentDto::from(payment)),
            Ok(None) => PaymentActionResponse::failed("Payment not found".to_string()),
            Err(e) => PaymentActionResponse::failed(e.caller_message("Failed to fetch payment")),
        }))
    }

    /// Revenue summary for a period (today, week, month, year)
    #[oai(path = "/stats", method = "get", tag = "BillingTags::Billing")]
    async fn stats(
        &self,
        auth: SessionAuth,
        period: Query<Option<String>>,
    ) -> Result<Json<PaymentStatsResponse>, AuthError> {
        let session = current_session(&self.tokens, &auth)?;
        authorize(&session, Action::ViewBilling)?;

        let now = Utc::now().timestamp();
        let since = match period.0.as_deref().unwrap_or("month") {
            "today" => now - now.rem_euclid(24 * 60 * 60),
            "week" => now - 7 * 24 * 60 * 60,
            "month" => now - 30 * 24 * 60 * 60,
            "year" => now - 365 * 24 * 60 * 60,
            other => {
                return Err(AuthError::internal_error(format!(
                    "Unknown period: {other}"
                )))
            }
        };

        let stats = self
            .payments
            .stats_since(since)
            .await
            .map_err(|e| AuthError::internal_error(e.caller_message("Failed to compute stats")))?;

        Ok(Json(PaymentStatsResponse {
            total_revenue: stats.total_revenue,
            total_transactions: stats.total_transactions,
            average_transaction: stats.average_transaction,
            by_mode: stats
                .by_mode
                .into_iter()
                .map(|(mode, amount, count)| ModeBreakdown {
                    mode,
                    amount,
                    count,
                })
                .collect(),
        }))
    }
}
