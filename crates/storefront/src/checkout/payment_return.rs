//! What happens when the customer comes back from the payment gateway.
//!
//! The checkout flow leaves `paymentOrderCode` and `orderId` in the session
//! store before redirecting. The success and cancel pages read them back,
//! ask the backend for the payment state, and forget them once the payment
//! can no longer change.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use lumiere_api::models::PaymentInfo;
use lumiere_api::services::PaymentService;
use lumiere_api::storage::keys;
use lumiere_api::{ApiClient, KeyValueStore, StorageError, retry_with_backoff};
use lumiere_core::{OrderId, PaymentOrderCode};

use super::{CheckoutError, OrderSummary};

const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_BACKOFF_BASE_MS: u64 = 500;

/// Correlation IDs of an online payment in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingPayment {
    pub order_code: PaymentOrderCode,
    /// Absent if only the order code was stored.
    pub order_id: Option<OrderId>,
}

/// Payment return and cancel handling.
#[derive(Clone)]
pub struct PaymentReturn {
    payments: PaymentService,
    session: Arc<dyn KeyValueStore>,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl PaymentReturn {
    #[must_use]
    pub fn new(client: ApiClient, session: Arc<dyn KeyValueStore>) -> Self {
        Self {
            payments: PaymentService::new(client),
            session,
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_base_ms: DEFAULT_BACKOFF_BASE_MS,
        }
    }

    /// Override the lookup retry policy.
    #[must_use]
    pub const fn with_retry(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    /// The payment the customer was sent to pay, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be read.
    pub fn pending(&self) -> Result<Option<PendingPayment>, StorageError> {
        let Some(order_code) = self
            .session
            .get(keys::PAYMENT_ORDER_CODE)?
            .filter(|code| !code.is_empty())
        else {
            return Ok(None);
        };
        let order_id = self
            .session
            .get(keys::ORDER_ID)?
            .filter(|id| !id.is_empty())
            .map(OrderId::new);

        Ok(Some(PendingPayment {
            order_code: PaymentOrderCode::new(order_code),
            order_id,
        }))
    }

    /// Look up the pending payment and forget it once it is paid, cancelled,
    /// expired or failed.
    ///
    /// Transient lookup failures are retried with back-off. Returns
    /// `Ok(None)` when nothing is pending.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::Payment` if the lookup keeps failing; the
    /// correlation IDs are kept so the page can try again.
    #[instrument(skip(self))]
    pub async fn reconcile(&self) -> Result<Option<PaymentInfo>, CheckoutError> {
        let Some(pending) = self.pending()? else {
            return Ok(None);
        };

        let info = retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            self.payments.payment_info(&pending.order_code)
        })
        .await
        .map_err(CheckoutError::Payment)?;

        info!(order_code = %info.order_code, status = ?info.status, "Payment status");
        if info.status.is_terminal() {
            self.forget();
        }
        Ok(Some(info))
    }

    /// Cancel the pending payment and forget it.
    ///
    /// Returns `Ok(None)` when nothing is pending.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::Payment` if the backend refuses; the
    /// correlation IDs are kept.
    #[instrument(skip(self))]
    pub async fn cancel(&self, reason: Option<&str>) -> Result<Option<PaymentInfo>, CheckoutError> {
        let Some(pending) = self.pending()? else {
            return Ok(None);
        };

        let info = self
            .payments
            .cancel_payment(&pending.order_code, reason)
            .await
            .map_err(CheckoutError::Payment)?;

        info!(order_code = %info.order_code, "Payment cancelled");
        self.forget();
        Ok(Some(info))
    }

    /// Summary of the last cash-on-delivery order. A malformed summary reads
    /// as absent.
    #[must_use]
    pub fn last_order(&self) -> Option<OrderSummary> {
        let raw = match self.session.get(keys::LAST_ORDER) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(error = %e, "Failed to read last order");
                return None;
            }
        };
        serde_json::from_str(&raw)
            .inspect_err(|e| warn!(error = %e, "Stored last order is malformed"))
            .ok()
    }

    /// Forget the last cash-on-delivery order summary.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be written.
    pub fn clear_last_order(&self) -> Result<(), StorageError> {
        self.session.remove(keys::LAST_ORDER)
    }

    fn forget(&self) {
        for key in [keys::PAYMENT_ORDER_CODE, keys::ORDER_ID] {
            if let Err(e) = self.session.remove(key) {
                warn!(key, error = %e, "Failed to clear payment session key");
            }
        }
    }
}

impl std::fmt::Debug for PaymentReturn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentReturn")
            .field("max_retries", &self.max_retries)
            .field("backoff_base_ms", &self.backoff_base_ms)
            .finish_non_exhaustive()
    }
}
