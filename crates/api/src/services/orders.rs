//! Order endpoints under `/orders`.

use tracing::instrument;

use lumiere_core::{OrderId, OrderStatus};

use crate::client::{ApiClient, segment};
use crate::error::ApiError;
use crate::models::{
    CreateOrderRequest, ListResponse, Order, OrderQuery, UpdateOrderStatusRequest,
};

#[derive(Debug, Clone)]
pub struct OrderService {
    client: ApiClient,
}

impl OrderService {
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Submit a new order.
    ///
    /// # Errors
    ///
    /// Returns the backend error if the order is rejected.
    #[instrument(skip(self, request), fields(items = request.items.len(), method = ?request.payment_method))]
    pub async fn create(&self, request: &CreateOrderRequest) -> Result<Order, ApiError> {
        let order: Order = self.client.post("orders", request).await?;
        tracing::info!(order_id = %order.id, total = %order.total_amount, "Order created");
        Ok(order)
    }

    /// Orders placed by the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` when not signed in.
    #[instrument(skip(self))]
    pub async fn my_orders(&self) -> Result<Vec<Order>, ApiError> {
        Ok(self
            .client
            .get::<ListResponse<Order>>("orders/my-orders")
            .await?
            .into_items())
    }

    /// All orders (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn list(&self, query: &OrderQuery) -> Result<Vec<Order>, ApiError> {
        Ok(self
            .client
            .get_query::<ListResponse<Order>, _>("orders", query)
            .await?
            .into_items())
    }

    /// One order by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn get(&self, id: &OrderId) -> Result<Order, ApiError> {
        self.client
            .get(&format!("orders/{}", segment(id.as_str())))
            .await
    }

    /// Move an order to `status` (admin). Transition rules are enforced by
    /// the backend.
    ///
    /// # Errors
    ///
    /// Returns the backend error if the transition is not allowed.
    #[instrument(skip(self), fields(order_id = %id, status = %status))]
    pub async fn update_status(&self, id: &OrderId, status: OrderStatus) -> Result<Order, ApiError> {
        self.client
            .patch(
                &format!("orders/{}/status", segment(id.as_str())),
                &UpdateOrderStatusRequest { status },
            )
            .await
    }
}
