//! The submit state machine.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tracing::{info, instrument, warn};

use lumiere_api::models::{CreateOrderItem, CreateOrderRequest, CreatePaymentRequest, Order};
use lumiere_api::services::{OrderService, PaymentService};
use lumiere_api::storage::keys;
use lumiere_api::{ApiClient, KeyValueStore};
use lumiere_core::{OrderId, PaymentMethod, PaymentOrderCode};

use super::form::CheckoutForm;
use super::{CheckoutError, OrderSummary};
use crate::cart::{CartItem, CartStore};
use crate::config::StorefrontConfig;

/// PayOS limits the transfer description to 25 characters.
const PAYMENT_DESCRIPTION_MAX: usize = 25;

/// Where the checkout currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckoutState {
    #[default]
    Idle,
    Submitting,
    OrderCreated,
    /// Cash-on-delivery order placed; show the success page.
    Completed,
    /// Online order placed; send the customer to the payment page.
    Redirecting,
}

/// Result of a successful submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// Cash on delivery: nothing left to do but show the order.
    Completed { order: Order },
    /// Online payment: navigate to `checkout_url`.
    Redirect {
        checkout_url: String,
        order_code: PaymentOrderCode,
        order_id: OrderId,
    },
}

/// Return and cancel URLs handed to the payment gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnUrls {
    pub return_url: String,
    pub cancel_url: String,
}

impl ReturnUrls {
    /// `{storefront}/payment/success` and `{storefront}/payment/cancel`.
    #[must_use]
    pub fn from_config(config: &StorefrontConfig) -> Self {
        Self {
            return_url: config.payment_return_url(),
            cancel_url: config.payment_cancel_url(),
        }
    }
}

/// Drives one customer's checkout.
///
/// At most one submit runs at a time; a second call while one is in flight
/// fails fast with [`CheckoutError::InFlight`].
pub struct CheckoutFlow {
    orders: OrderService,
    payments: PaymentService,
    cart: CartStore,
    session: Arc<dyn KeyValueStore>,
    urls: ReturnUrls,
    state: Mutex<CheckoutState>,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag when a submit ends, however it ends.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl CheckoutFlow {
    /// Create a flow placing orders through `client`, reading `cart` and
    /// stashing correlation IDs in the `session` store.
    #[must_use]
    pub fn new(
        client: ApiClient,
        cart: CartStore,
        session: Arc<dyn KeyValueStore>,
        urls: ReturnUrls,
    ) -> Self {
        Self {
            orders: OrderService::new(client.clone()),
            payments: PaymentService::new(client),
            cart,
            session,
            urls,
            state: Mutex::new(CheckoutState::Idle),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> CheckoutState {
        *self
            .state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Whether submit should be enabled.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        !self.in_flight.load(Ordering::Acquire)
    }

    fn set_state(&self, state: CheckoutState) {
        *self
            .state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = state;
    }

    /// Validate the form, place the order and finish it according to
    /// `method`.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::InFlight`] if a submit is already running
    /// - [`CheckoutError::Invalid`] if the form has invalid fields
    /// - [`CheckoutError::EmptyCart`] if there is nothing to order
    /// - [`CheckoutError::Order`] if the backend rejects the order
    /// - [`CheckoutError::PaymentLink`] if an online order was created but no
    ///   payment link could be opened; the cart is left untouched
    #[instrument(skip(self, form), fields(method = ?method))]
    pub async fn submit(
        &self,
        form: &CheckoutForm,
        method: PaymentMethod,
    ) -> Result<CheckoutOutcome, CheckoutError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(CheckoutError::InFlight);
        }
        let _guard = InFlightGuard(&self.in_flight);

        let result = self.run(form, method).await;
        if result.is_err() {
            self.set_state(CheckoutState::Idle);
        }
        result
    }

    async fn run(
        &self,
        form: &CheckoutForm,
        method: PaymentMethod,
    ) -> Result<CheckoutOutcome, CheckoutError> {
        let valid = form.validate()?;
        let items = self.cart.items();
        if items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        self.set_state(CheckoutState::Submitting);

        let request = CreateOrderRequest {
            items: items.iter().map(order_line).collect(),
            customer_name: valid.name,
            customer_email: valid.email,
            customer_phone: valid.phone,
            shipping_address: valid.address,
            payment_method: method,
            region: valid.region,
            mentor_code: valid.mentor_code,
            note: valid.note,
        };
        let order = self
            .orders
            .create(&request)
            .await
            .map_err(CheckoutError::Order)?;

        self.set_state(CheckoutState::OrderCreated);

        match method {
            PaymentMethod::Cod => self.complete_cod(order),
            PaymentMethod::Online => self.start_online_payment(order).await,
        }
    }

    fn complete_cod(&self, order: Order) -> Result<CheckoutOutcome, CheckoutError> {
        let summary = OrderSummary::from_order(&order);
        match serde_json::to_string(&summary) {
            Ok(json) => self.stash(keys::LAST_ORDER, &json),
            Err(e) => warn!(error = %e, "Failed to encode order summary"),
        }

        self.cart.clear()?;
        self.set_state(CheckoutState::Completed);
        info!(order_id = %order.id, total = %order.total_amount, "Cash-on-delivery order placed");
        Ok(CheckoutOutcome::Completed { order })
    }

    async fn start_online_payment(&self, order: Order) -> Result<CheckoutOutcome, CheckoutError> {
        let request = CreatePaymentRequest {
            order_id: order.id.clone(),
            amount: order.total_amount,
            description: Some(payment_description(&order)),
            return_url: self.urls.return_url.clone(),
            cancel_url: self.urls.cancel_url.clone(),
        };

        let link = match self.payments.create_payment_link(&request).await {
            Ok(link) => link,
            Err(source) => {
                warn!(order_id = %order.id, error = %source, "Payment link creation failed, cart kept");
                return Err(CheckoutError::PaymentLink {
                    order_id: order.id,
                    source,
                });
            }
        };

        self.stash(keys::PAYMENT_ORDER_CODE, link.order_code.as_str());
        self.stash(keys::ORDER_ID, order.id.as_str());
        self.cart.clear()?;
        self.set_state(CheckoutState::Redirecting);
        info!(order_id = %order.id, order_code = %link.order_code, "Redirecting to payment gateway");

        Ok(CheckoutOutcome::Redirect {
            checkout_url: link.checkout_url,
            order_code: link.order_code,
            order_id: order.id,
        })
    }

    /// Best-effort session write; failures are logged only.
    fn stash(&self, key: &str, value: &str) {
        if let Err(e) = self.session.set(key, value) {
            warn!(key, error = %e, "Failed to write checkout session key");
        }
    }
}

impl std::fmt::Debug for CheckoutFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckoutFlow")
            .field("state", &self.state())
            .field("in_flight", &self.in_flight.load(Ordering::Relaxed))
            .field("urls", &self.urls)
            .finish_non_exhaustive()
    }
}

fn order_line(item: &CartItem) -> CreateOrderItem {
    CreateOrderItem {
        product_id: item.product.id.clone(),
        quantity: item.quantity,
        price: item.product.price,
    }
}

fn payment_description(order: &Order) -> String {
    format!("Lumiere {}", order.reference())
        .chars()
        .take(PAYMENT_DESCRIPTION_MAX)
        .collect()
}
