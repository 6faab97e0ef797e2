//! Order composition engine.
//!
//! Composing an order is the one workflow in Shopdesk with real state: the
//! backend's order-create endpoint returns nothing, so the client has to
//! discover the new order's identifier by diffing the customer's order
//! list, then attach the selected lines one HTTP call at a time.
//!
//! # Modules
//!
//! - [`pricing`] - resolve an item's effective unit price under the
//!   layered promotion model
//! - [`selection`] - the in-memory product/quantity working set
//! - [`totals`] - derive the order total from a selection
//! - [`sync`] - translate selection changes into line create/update/delete
//!   calls for an existing order
//! - [`create`] - the create → discover → attach state machine for new
//!   orders

pub mod create;
pub mod pricing;
pub mod selection;
pub mod sync;
pub mod totals;

pub use create::{
    CreateOrderError, CreatePhase, DiscoveryConfig, OrderCreated, OrderCreation, OrderDraft,
    discover_new_order,
};
pub use pricing::effective_unit_price;
pub use selection::{SelectionMode, SelectionState};
pub use sync::{LineFailure, LineSynchronizer, SyncError};
pub use totals::order_total;
