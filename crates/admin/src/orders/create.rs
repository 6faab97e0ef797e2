//! Order creation: submit, discover, attach.
//!
//! The backend's order-create endpoint returns nothing - not even the new
//! order's identifier. Creation therefore runs as a three-step protocol:
//!
//! 1. **Submit**: snapshot the customer's current order-id set, then POST
//!    the header.
//! 2. **Discover**: poll the customer's order list (bounded attempts,
//!    fixed delay) and take the first identifier absent from the snapshot
//!    as the new order's.
//! 3. **Attach**: create one line per selection entry against the
//!    discovered identifier.
//!
//! The header create is not idempotent, so nothing here ever retries it;
//! only the discovery *read* loops. Two sessions creating orders for the
//! same customer concurrently can each observe the other's order as new -
//! the diff cannot tell them apart without backend support for a
//! correlation key, so the race is logged rather than papered over.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use chrono::Utc;
use rust_decimal::Decimal;
use shopdesk_core::{CustomerId, OrderId, OrderStatus, ProductId};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::api::types::{CatalogItem, NewOrder};
use crate::api::{ApiError, OrderApi};

use super::selection::SelectionState;
use super::sync::{LineFailure, LineSynchronizer};
use super::totals::order_total;

/// Polling parameters for new-order discovery.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Hard ceiling on `list_orders` polls.
    pub attempts: u32,
    /// Fixed delay between consecutive polls.
    pub delay: Duration,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            attempts: 10,
            delay: Duration::from_millis(500),
        }
    }
}

/// Where an in-flight creation currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreatePhase {
    /// Nothing started.
    Idle,
    /// Header create in flight.
    Submitting,
    /// Polling the order list for the new identifier.
    Discovering,
    /// Creating lines against the discovered identifier.
    AttachingLines,
    /// All line creates attempted.
    Done,
    /// Creation aborted during submit or discovery.
    Failed,
}

/// What the operator chose before pressing "create order".
#[derive(Debug, Clone)]
pub struct OrderDraft {
    /// Chosen customer, if one was selected.
    pub customer: Option<CustomerId>,
    /// Payment method label.
    pub payment_method: String,
    /// Initial status for the header.
    pub status: OrderStatus,
}

/// Outcome of a completed creation.
///
/// `failed` being non-empty is the partial-attachment case: the header
/// exists and is valid, some lines are missing. Callers surface the
/// affected products to the operator; nothing is rolled back.
#[derive(Debug)]
pub struct OrderCreated {
    /// The discovered identifier of the new order.
    pub order: OrderId,
    /// Amount submitted with the header.
    pub amount: Decimal,
    /// Products whose lines were attached.
    pub attached: Vec<ProductId>,
    /// Products whose line creates failed.
    pub failed: Vec<LineFailure>,
}

impl OrderCreated {
    /// Whether every selected line was attached.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Errors that abort order creation.
#[derive(Debug, Error)]
pub enum CreateOrderError {
    /// No customer chosen; rejected before any network call.
    #[error("no customer selected")]
    NoCustomer,

    /// Empty selection; rejected before any network call.
    #[error("no products selected")]
    EmptySelection,

    /// Reading the customer's existing orders for the pre-create snapshot
    /// failed. No mutation happened; the whole operation is safe to retry.
    #[error("failed to read existing orders: {0}")]
    Snapshot(#[source] ApiError),

    /// The header create call failed. Not retried - the call is not
    /// idempotent and a retry after a timeout could create a duplicate
    /// order.
    #[error("order submission failed: {0}")]
    Submit(#[source] ApiError),

    /// The polling ceiling was reached without observing a new order.
    /// The create may still have succeeded server-side: the operator must
    /// refresh the order list and verify before trying again.
    #[error(
        "order submitted but its identifier was not discovered after {attempts} attempts; \
         refresh the order list and verify before retrying"
    )]
    DiscoveryExhausted {
        /// How many polls were made.
        attempts: u32,
    },
}

/// Poll `customer`'s order list until an identifier appears that is absent
/// from `before`.
///
/// Makes at most `config.attempts` `list_orders` calls with `config.delay`
/// between consecutive calls. Read failures count as attempts and are
/// logged; the loop never retries anything but the read. If several new
/// identifiers show up at once the first is taken and the ambiguity is
/// logged - see the module docs on the concurrent-creation race.
///
/// # Errors
///
/// Returns [`CreateOrderError::DiscoveryExhausted`] when the ceiling is
/// reached without a new identifier.
#[instrument(skip(api, before, config), fields(attempts = config.attempts))]
pub async fn discover_new_order<A: OrderApi>(
    api: &A,
    customer: CustomerId,
    before: &HashSet<OrderId>,
    config: &DiscoveryConfig,
) -> Result<OrderId, CreateOrderError> {
    for attempt in 1..=config.attempts {
        match api.list_orders(Some(customer)).await {
            Ok(orders) => {
                let new: Vec<OrderId> = orders
                    .iter()
                    .map(|o| o.id)
                    .filter(|id| !before.contains(id))
                    .collect();
                if let Some(first) = new.first() {
                    if new.len() > 1 {
                        warn!(
                            candidates = new.len(),
                            "multiple new orders observed; attribution is ambiguous \
                             under concurrent creation"
                        );
                    }
                    info!(order = %first, attempt, "discovered new order");
                    return Ok(*first);
                }
            }
            Err(error) => {
                warn!(attempt, %error, "order list fetch failed during discovery");
            }
        }
        if attempt < config.attempts {
            tokio::time::sleep(config.delay).await;
        }
    }
    Err(CreateOrderError::DiscoveryExhausted {
        attempts: config.attempts,
    })
}

/// Drives one order through submit, discovery, and line attachment.
pub struct OrderCreation<A> {
    api: A,
    discovery: DiscoveryConfig,
    phase: CreatePhase,
}

impl<A: OrderApi> OrderCreation<A> {
    /// Create an idle orchestrator.
    pub const fn new(api: A, discovery: DiscoveryConfig) -> Self {
        Self {
            api,
            discovery,
            phase: CreatePhase::Idle,
        }
    }

    /// Current phase. After [`Self::run`] resolves this is either `Done`
    /// or `Failed`.
    #[must_use]
    pub const fn phase(&self) -> CreatePhase {
        self.phase
    }

    /// Run the creation protocol end to end.
    ///
    /// Validation happens synchronously before any network call. Once the
    /// header create is issued there is no cancellation and no retry.
    ///
    /// # Errors
    ///
    /// See [`CreateOrderError`]. Per-line attachment failures are *not*
    /// errors: they come back inside [`OrderCreated::failed`].
    #[instrument(skip_all, fields(customer = ?draft.customer, products = selection.len()))]
    pub async fn run(
        &mut self,
        draft: &OrderDraft,
        selection: &SelectionState,
        catalog: &HashMap<ProductId, CatalogItem>,
    ) -> Result<OrderCreated, CreateOrderError> {
        // Validation: rejected synchronously, no network call made.
        let customer = draft.customer.ok_or(CreateOrderError::NoCustomer)?;
        if selection.is_empty() {
            return Err(CreateOrderError::EmptySelection);
        }

        self.phase = CreatePhase::Submitting;
        let amount = order_total(selection, catalog, Utc::now());

        // Snapshot the ids that exist *before* the create, so the diff in
        // the discovery phase can single out the new one.
        let before: HashSet<OrderId> = match self.api.list_orders(Some(customer)).await {
            Ok(orders) => orders.iter().map(|o| o.id).collect(),
            Err(e) => {
                self.phase = CreatePhase::Failed;
                return Err(CreateOrderError::Snapshot(e));
            }
        };

        let header = NewOrder {
            customer,
            payment_method: draft.payment_method.clone(),
            status: draft.status,
            amount,
        };
        if let Err(e) = self.api.create_order(&header).await {
            self.phase = CreatePhase::Failed;
            return Err(CreateOrderError::Submit(e));
        }
        info!(%customer, %amount, "order header submitted");

        self.phase = CreatePhase::Discovering;
        let order = match discover_new_order(&self.api, customer, &before, &self.discovery).await {
            Ok(order) => order,
            Err(e) => {
                self.phase = CreatePhase::Failed;
                return Err(e);
            }
        };

        self.phase = CreatePhase::AttachingLines;
        let mut synchronizer = LineSynchronizer::new(&self.api, order, customer);
        let failed = synchronizer.attach_all(selection).await;

        self.phase = CreatePhase::Done;
        let attached: Vec<ProductId> = selection
            .iter()
            .map(|(product, _)| product)
            .filter(|p| !failed.iter().any(|f| f.product == *p))
            .collect();
        if failed.is_empty() {
            info!(%order, lines = attached.len(), "order created");
        } else {
            warn!(
                %order,
                attached = attached.len(),
                failed = failed.len(),
                "order created with missing lines"
            );
        }

        Ok(OrderCreated {
            order,
            amount,
            attached,
            failed,
        })
    }
}
