//! Line synchronization for orders that already have an identifier.
//!
//! Every selection mutation in edit mode is pushed to the backend
//! immediately: toggle-on creates a line, toggle-off deletes one, a
//! quantity edit updates one. The synchronizer keeps a snapshot of the
//! order's persisted lines so it can address updates and deletes by the
//! backend-assigned line identifier, and re-reads that snapshot after each
//! mutation so the working set never drifts from what the backend holds.

use shopdesk_core::{CustomerId, OrderId, ProductId};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::api::types::{NewOrderLine, OrderLine, OrderLineUpdate};
use crate::api::{ApiError, OrderApi};

use super::selection::SelectionState;

/// Errors that can occur while synchronizing order lines.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Backend call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// No persisted line exists for a product the selection believes is
    /// persisted. This is a desynchronization bug, not a recoverable
    /// condition.
    #[error("no persisted line for product {product} on order {order}")]
    LineMissing {
        /// Order being edited.
        order: OrderId,
        /// Product with no matching line.
        product: ProductId,
    },
}

/// A line-create that failed while attaching lines to a new order.
#[derive(Debug)]
pub struct LineFailure {
    /// Product whose line was not created.
    pub product: ProductId,
    /// What went wrong.
    pub error: ApiError,
}

/// Synchronizes one order's persisted lines with selection changes.
pub struct LineSynchronizer<A> {
    api: A,
    order: OrderId,
    customer: CustomerId,
    lines: Vec<OrderLine>,
}

impl<A: OrderApi> LineSynchronizer<A> {
    /// Create a synchronizer for `order`. Call [`Self::hydrate`] before
    /// issuing edits so updates and deletes can be addressed by line ID.
    pub const fn new(api: A, order: OrderId, customer: CustomerId) -> Self {
        Self {
            api,
            order,
            customer,
            lines: Vec::new(),
        }
    }

    /// The current persisted-lines snapshot for this order.
    #[must_use]
    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    /// Re-read the order's persisted lines from the backend.
    ///
    /// The backend serves lines unfiltered; the snapshot keeps only this
    /// order's.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the read fails.
    #[instrument(skip(self), fields(order = %self.order))]
    pub async fn hydrate(&mut self) -> Result<&[OrderLine], ApiError> {
        let all = self.api.list_order_lines().await?;
        self.lines = all.into_iter().filter(|l| l.order == self.order).collect();
        debug!(count = self.lines.len(), "hydrated persisted lines");
        Ok(&self.lines)
    }

    /// A product was toggled on: create its line.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Api`] if the create or the follow-up read
    /// fails.
    #[instrument(skip(self), fields(order = %self.order))]
    pub async fn product_selected(
        &mut self,
        product: ProductId,
        quantity: u32,
    ) -> Result<(), SyncError> {
        self.create_line(product, quantity).await?;
        self.hydrate().await?;
        Ok(())
    }

    /// A product was toggled off: delete its persisted line.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::LineMissing`] if no persisted line carries the
    /// product - the client and backend have desynchronized and the error
    /// must surface. Returns [`SyncError::Api`] if the delete fails.
    #[instrument(skip(self), fields(order = %self.order))]
    pub async fn product_deselected(&mut self, product: ProductId) -> Result<(), SyncError> {
        if self.find_line(product).is_none() {
            return Err(SyncError::LineMissing {
                order: self.order,
                product,
            });
        }
        self.api
            .delete_order_line(self.order, self.customer, product)
            .await?;
        self.hydrate().await?;
        Ok(())
    }

    /// A product's quantity changed.
    ///
    /// Updates the persisted line when one exists. When none does (the
    /// line was never created), falls back to a create - an update is
    /// never sent without a target identifier.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Api`] if the write or the follow-up read
    /// fails.
    #[instrument(skip(self), fields(order = %self.order))]
    pub async fn quantity_changed(
        &mut self,
        product: ProductId,
        quantity: u32,
    ) -> Result<(), SyncError> {
        match self.find_line(product) {
            Some(existing) => {
                let update = OrderLineUpdate {
                    line: existing.id,
                    order: self.order,
                    customer: self.customer,
                    product,
                    quantity,
                };
                self.api.update_order_line(&update).await?;
            }
            None => {
                debug!(%product, "no persisted line yet, creating instead of updating");
                self.create_line(product, quantity).await?;
            }
        }
        self.hydrate().await?;
        Ok(())
    }

    /// Attach every selection entry as a new line.
    ///
    /// Used once by order creation after the new order's identifier is
    /// discovered. Each create is independent: failures are collected and
    /// returned, never rolled back - the already-attached lines and the
    /// header itself stay valid.
    #[instrument(skip(self, selection), fields(order = %self.order))]
    pub async fn attach_all(&mut self, selection: &SelectionState) -> Vec<LineFailure> {
        let mut failures = Vec::new();
        for (product, quantity) in selection.iter() {
            if let Err(error) = self.create_line(product, quantity).await {
                tracing::warn!(%product, %error, "line create failed");
                failures.push(LineFailure { product, error });
            }
        }
        failures
    }

    async fn create_line(&self, product: ProductId, quantity: u32) -> Result<(), ApiError> {
        let line = NewOrderLine {
            order: self.order,
            customer: self.customer,
            product,
            quantity,
        };
        self.api.create_order_line(&line).await
    }

    fn find_line(&self, product: ProductId) -> Option<&OrderLine> {
        self.lines.iter().find(|l| l.product == product)
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::{Call, MockApi, line};

    use super::*;

    fn synchronizer(api: &MockApi) -> LineSynchronizer<&MockApi> {
        LineSynchronizer::new(api, OrderId::new(7), CustomerId::new(2))
    }

    #[tokio::test]
    async fn test_hydrate_filters_to_order() {
        let api = MockApi::new();
        api.seed_lines(vec![line(1, 7, 10, 1), line(2, 8, 11, 1)]);

        let mut sync = synchronizer(&api);
        sync.hydrate().await.expect("hydrate");

        assert_eq!(sync.lines().len(), 1);
        assert_eq!(sync.lines()[0].product, ProductId::new(10));
    }

    #[tokio::test]
    async fn test_product_selected_creates_line() {
        let api = MockApi::new();
        let mut sync = synchronizer(&api);

        sync.product_selected(ProductId::new(10), 1).await.expect("select");

        assert_eq!(api.count(|c| matches!(c, Call::CreateLine(_))), 1);
        // The follow-up read makes the new backend-assigned line visible
        assert_eq!(sync.lines().len(), 1);
        assert_eq!(sync.lines()[0].quantity, 1);
    }

    #[tokio::test]
    async fn test_product_deselected_deletes_line() {
        let api = MockApi::new();
        api.seed_lines(vec![line(1, 7, 10, 2)]);

        let mut sync = synchronizer(&api);
        sync.hydrate().await.expect("hydrate");
        sync.product_deselected(ProductId::new(10)).await.expect("deselect");

        assert_eq!(api.count(|c| matches!(c, Call::DeleteLine(_))), 1);
        assert!(sync.lines().is_empty());
    }

    #[tokio::test]
    async fn test_deselect_without_persisted_line_fails_loudly() {
        let api = MockApi::new();
        let mut sync = synchronizer(&api);

        let err = sync
            .product_deselected(ProductId::new(10))
            .await
            .expect_err("must fail");

        assert!(matches!(err, SyncError::LineMissing { .. }));
        // No delete call was issued for a line we cannot address
        assert_eq!(api.count(|c| matches!(c, Call::DeleteLine(_))), 0);
    }

    #[tokio::test]
    async fn test_quantity_change_updates_by_line_id() {
        let api = MockApi::new();
        api.seed_lines(vec![line(1, 7, 10, 2)]);

        let mut sync = synchronizer(&api);
        sync.hydrate().await.expect("hydrate");
        sync.quantity_changed(ProductId::new(10), 5).await.expect("update");

        assert_eq!(
            api.count(|c| matches!(c, Call::UpdateLine(id) if *id == shopdesk_core::OrderLineId::new(1))),
            1
        );
        assert_eq!(sync.lines()[0].quantity, 5);
    }

    #[tokio::test]
    async fn test_quantity_change_without_line_falls_back_to_create() {
        let api = MockApi::new();
        let mut sync = synchronizer(&api);

        sync.quantity_changed(ProductId::new(10), 3).await.expect("create");

        assert_eq!(api.count(|c| matches!(c, Call::UpdateLine(_))), 0);
        assert_eq!(api.count(|c| matches!(c, Call::CreateLine(_))), 1);
        assert_eq!(sync.lines()[0].quantity, 3);
    }
}
