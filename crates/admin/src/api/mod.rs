//! Typed API boundary for the store backend.
//!
//! The backend is a plain JSON-over-HTTP resource API with one awkward
//! property: creating an order returns nothing, not even the new order's
//! identifier. Every operation here is a single request/response with no
//! server-pushed events.
//!
//! # Architecture
//!
//! - [`OrderApi`] - the operation set the composition engine consumes.
//!   The engine is generic over it so tests can script responses without a
//!   server.
//! - [`RestClient`] - the `reqwest`-backed implementation.
//! - [`conversions`] - the single normalization step that turns the
//!   backend's loosely-shaped payloads into the typed structs in [`types`].

mod conversions;
mod rest;
pub mod types;

pub use rest::RestClient;
pub use types::*;

use shopdesk_core::{CustomerId, OrderId, ProductId};
use thiserror::Error;

/// Errors that can occur when talking to the backend API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (transport-level).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message derived from the response body.
        message: String,
    },

    /// Response body could not be normalized into a typed struct.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Operations the order-composition engine performs against the backend.
///
/// Mirrors the backend's resource API one-to-one, including its quirks:
/// `create_order` does not return the created order's identifier, and
/// `delete_order_line` is keyed by `(order, customer, product)` rather
/// than by line ID.
#[allow(async_fn_in_trait)]
pub trait OrderApi {
    /// Create an order header. The backend assigns an identifier but does
    /// not return it.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails. The call is not
    /// idempotent, so callers must not retry it.
    async fn create_order(&self, order: &NewOrder) -> Result<(), ApiError>;

    /// List order headers, optionally restricted to one customer.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    async fn list_orders(&self, customer: Option<CustomerId>) -> Result<Vec<OrderHeader>, ApiError>;

    /// Update an order header.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    async fn update_order(&self, update: &OrderUpdate) -> Result<(), ApiError>;

    /// Attach a line to an existing order.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    async fn create_order_line(&self, line: &NewOrderLine) -> Result<(), ApiError>;

    /// Update an existing line's quantity.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    async fn update_order_line(&self, update: &OrderLineUpdate) -> Result<(), ApiError>;

    /// Delete the line carrying `product` on `order`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    async fn delete_order_line(
        &self,
        order: OrderId,
        customer: CustomerId,
        product: ProductId,
    ) -> Result<(), ApiError>;

    /// List all order lines. The backend offers no per-order filter, so
    /// callers filter client-side.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    async fn list_order_lines(&self) -> Result<Vec<OrderLine>, ApiError>;

    /// List the full catalog.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    async fn list_catalog(&self) -> Result<Vec<CatalogItem>, ApiError>;
}

impl<T: OrderApi> OrderApi for &T {
    async fn create_order(&self, order: &NewOrder) -> Result<(), ApiError> {
        (**self).create_order(order).await
    }

    async fn list_orders(&self, customer: Option<CustomerId>) -> Result<Vec<OrderHeader>, ApiError> {
        (**self).list_orders(customer).await
    }

    async fn update_order(&self, update: &OrderUpdate) -> Result<(), ApiError> {
        (**self).update_order(update).await
    }

    async fn create_order_line(&self, line: &NewOrderLine) -> Result<(), ApiError> {
        (**self).create_order_line(line).await
    }

    async fn update_order_line(&self, update: &OrderLineUpdate) -> Result<(), ApiError> {
        (**self).update_order_line(update).await
    }

    async fn delete_order_line(
        &self,
        order: OrderId,
        customer: CustomerId,
        product: ProductId,
    ) -> Result<(), ApiError> {
        (**self).delete_order_line(order, customer, product).await
    }

    async fn list_order_lines(&self) -> Result<Vec<OrderLine>, ApiError> {
        (**self).list_order_lines().await
    }

    async fn list_catalog(&self) -> Result<Vec<CatalogItem>, ApiError> {
        (**self).list_catalog().await
    }
}
