//! PayOS payment link endpoints under `/payments`.

use tracing::instrument;

use lumiere_core::PaymentOrderCode;

use crate::client::{ApiClient, segment};
use crate::error::ApiError;
use crate::models::{CancelPaymentRequest, CreatePaymentRequest, PaymentInfo, PaymentLink};

#[derive(Debug, Clone)]
pub struct PaymentService {
    client: ApiClient,
}

impl PaymentService {
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Ask the backend to open a hosted checkout for an order.
    ///
    /// # Errors
    ///
    /// Returns the backend error if no link could be created (e.g. PayOS is
    /// not configured or the order is already paid).
    #[instrument(skip(self, request), fields(order_id = %request.order_id, amount = %request.amount))]
    pub async fn create_payment_link(
        &self,
        request: &CreatePaymentRequest,
    ) -> Result<PaymentLink, ApiError> {
        let link: PaymentLink = self.client.post("payments/create", request).await?;
        tracing::info!(order_code = %link.order_code, "Payment link created");
        Ok(link)
    }

    /// Current state of a payment.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(order_code = %order_code))]
    pub async fn payment_info(&self, order_code: &PaymentOrderCode) -> Result<PaymentInfo, ApiError> {
        self.client
            .get(&format!("payments/info/{}", segment(order_code.as_str())))
            .await
    }

    /// Cancel an unpaid payment link.
    ///
    /// # Errors
    ///
    /// Returns the backend error if the payment can no longer be cancelled.
    #[instrument(skip(self), fields(order_code = %order_code))]
    pub async fn cancel_payment(
        &self,
        order_code: &PaymentOrderCode,
        reason: Option<&str>,
    ) -> Result<PaymentInfo, ApiError> {
        let body = CancelPaymentRequest {
            cancellation_reason: reason.map(str::to_string),
        };
        self.client
            .post(
                &format!("payments/cancel/{}", segment(order_code.as_str())),
                &body,
            )
            .await
    }
}
