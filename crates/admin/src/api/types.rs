//! Typed domain structs produced by the API boundary.
//!
//! Everything in here is fully normalized: money is `Decimal`, time is
//! `chrono`, identifiers are the `shopdesk-core` newtypes, and every
//! optional discount source is `None` unless the backend supplied a usable
//! (finite) value. Core logic never sees the raw payload shapes.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shopdesk_core::{CustomerId, OrderId, OrderLineId, OrderStatus, ProductId};

// =============================================================================
// Catalog
// =============================================================================

/// A sellable catalog item with its layered discount sources.
///
/// At most one discount source is applied at evaluation time; see
/// [`crate::orders::pricing::effective_unit_price`] for the precedence rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Backend-assigned product ID.
    pub id: ProductId,
    /// Brand label.
    pub brand: String,
    /// Model label.
    pub model: String,
    /// Undiscounted unit price.
    pub base_price: Decimal,
    /// Item-level promotion, if any.
    pub promotion: Option<ItemPromotion>,
    /// Precomputed sale price for the item's category, if the category is
    /// currently on sale.
    pub category_sale_price: Option<Decimal>,
    /// Precomputed sale price for the item's subcategory, if the
    /// subcategory is currently on sale. Wins over every other source.
    pub subcategory_sale_price: Option<Decimal>,
}

/// An item-level percentage promotion with an optional validity window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemPromotion {
    /// Percentage off the base price (e.g. `20` for 20% off).
    pub percentage: Decimal,
    /// First day the promotion applies. `None` means no lower bound.
    pub starts_on: Option<NaiveDate>,
    /// Last day the promotion applies, inclusive. `None` means no upper
    /// bound.
    pub ends_on: Option<NaiveDate>,
    /// Backend-precomputed discounted price. When present it is used
    /// instead of deriving the price from `percentage`.
    pub sale_price: Option<Decimal>,
}

// =============================================================================
// Orders
// =============================================================================

/// An order record excluding its line items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderHeader {
    /// Backend-assigned order ID.
    pub id: OrderId,
    /// Owning customer. Immutable once set.
    pub customer: CustomerId,
    /// Payment method label (free text on the backend).
    pub payment_method: String,
    /// Lifecycle status.
    pub status: OrderStatus,
    /// Order total as submitted with the header.
    pub amount: Decimal,
    /// Carrier tracking link, if one has been attached.
    pub tracking_link: Option<String>,
    /// Carrier tracking number, if one has been attached.
    pub tracking_number: Option<String>,
}

/// One product + quantity entry attached to an order header.
///
/// Existence and identifier are authoritative only on the backend; the
/// client never fabricates one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    /// Backend-assigned line ID.
    pub id: OrderLineId,
    /// Owning order.
    pub order: OrderId,
    /// Product referenced by this line.
    pub product: ProductId,
    /// Quantity, always >= 1.
    pub quantity: u32,
    /// Unit price snapshotted at the time the line was created, if the
    /// backend recorded one.
    pub unit_price: Option<Decimal>,
}

// =============================================================================
// Request payloads
// =============================================================================

/// Payload for creating an order header.
///
/// The backend assigns the identifier but does not return it; see
/// [`crate::orders::create`] for how the client discovers it.
#[derive(Debug, Clone, Serialize)]
pub struct NewOrder {
    /// Owning customer.
    pub customer: CustomerId,
    /// Payment method label.
    pub payment_method: String,
    /// Initial status.
    pub status: OrderStatus,
    /// Order total.
    pub amount: Decimal,
}

/// Payload for updating an order header.
#[derive(Debug, Clone, Serialize)]
pub struct OrderUpdate {
    /// Order to update.
    pub order: OrderId,
    /// New status.
    pub status: OrderStatus,
    /// Payment method label.
    pub payment_method: String,
    /// Order total.
    pub amount: Decimal,
    /// Carrier tracking link.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_link: Option<String>,
    /// Carrier tracking number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,
}

/// Payload for creating an order line.
#[derive(Debug, Clone, Serialize)]
pub struct NewOrderLine {
    /// Owning order.
    pub order: OrderId,
    /// Owning customer (denormalized by the backend).
    pub customer: CustomerId,
    /// Product to attach.
    pub product: ProductId,
    /// Quantity, >= 1.
    pub quantity: u32,
}

/// Payload for updating an order line's quantity.
#[derive(Debug, Clone, Serialize)]
pub struct OrderLineUpdate {
    /// Line to update. Updates are never sent without a target identifier.
    pub line: OrderLineId,
    /// Owning order.
    pub order: OrderId,
    /// Owning customer.
    pub customer: CustomerId,
    /// Product on the line.
    pub product: ProductId,
    /// New quantity, >= 1.
    pub quantity: u32,
}
