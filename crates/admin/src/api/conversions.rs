//! Normalization of raw backend payloads into typed domain structs.
//!
//! The backend's JSON is loosely shaped: the same field is served under
//! several names depending on which endpoint produced it, prices arrive as
//! raw floats that may be non-finite, and dates are strings in more than
//! one format. Everything is normalized exactly once, here; nothing past
//! this module ever branches on alternative field names.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::Deserialize;
use shopdesk_core::{CustomerId, OrderId, OrderLineId, OrderStatus, ProductId};

use super::types::{CatalogItem, ItemPromotion, OrderHeader, OrderLine};
use super::ApiError;

// =============================================================================
// Raw payload shapes
// =============================================================================

#[derive(Debug, Deserialize)]
pub(super) struct RawCatalogItem {
    #[serde(alias = "_id")]
    id: i64,
    #[serde(default, alias = "brand_name")]
    brand: Option<String>,
    #[serde(default, alias = "model_name")]
    model: Option<String>,
    #[serde(alias = "base_price", alias = "unit_price")]
    price: f64,
    #[serde(default, alias = "discount_percent", alias = "promo_percentage")]
    percentage: Option<f64>,
    #[serde(default, alias = "promo_start", alias = "starts_on")]
    start_date: Option<String>,
    #[serde(default, alias = "promo_end", alias = "ends_on")]
    end_date: Option<String>,
    #[serde(default, alias = "promo_price", alias = "discounted_price")]
    sale_price: Option<f64>,
    #[serde(default, alias = "category_promo_price")]
    category_sale_price: Option<f64>,
    #[serde(default, alias = "subcategory_promo_price")]
    subcategory_sale_price: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawOrderHeader {
    #[serde(alias = "_id")]
    id: i64,
    #[serde(alias = "customer_id", alias = "client")]
    customer: i64,
    #[serde(default, alias = "payment", alias = "payment_mode")]
    payment_method: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default, alias = "total", alias = "total_amount")]
    amount: Option<f64>,
    #[serde(default, alias = "tracking_url")]
    tracking_link: Option<String>,
    #[serde(default, alias = "tracking")]
    tracking_number: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawOrderLine {
    #[serde(alias = "_id")]
    id: i64,
    #[serde(alias = "order_id")]
    order: i64,
    #[serde(alias = "product_id")]
    product: i64,
    #[serde(alias = "qty")]
    quantity: u32,
    #[serde(default, alias = "price")]
    unit_price: Option<f64>,
}

// =============================================================================
// Helpers
// =============================================================================

/// Convert an optional raw float to a `Decimal`, dropping non-finite values.
///
/// `Decimal::from_f64` returns `None` for NaN and infinities, which is how
/// the "present and finite" precondition of the price resolver is
/// established.
fn finite_decimal(value: Option<f64>) -> Option<Decimal> {
    value.and_then(Decimal::from_f64)
}

/// Parse a backend date string.
///
/// Accepts plain dates (`2026-03-01`) and full RFC 3339 timestamps, which
/// both occur in the wild.
fn parse_date(value: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    chrono::DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.date_naive())
}

// =============================================================================
// Conversions
// =============================================================================

pub(super) fn convert_catalog_item(raw: RawCatalogItem) -> Result<CatalogItem, ApiError> {
    let base_price = Decimal::from_f64(raw.price)
        .ok_or_else(|| ApiError::Parse(format!("product {}: non-finite price", raw.id)))?;

    // A promotion exists only if the backend sent a percentage. An
    // unparseable window bound drops the whole promotion rather than
    // silently widening its window.
    let promotion = match finite_decimal(raw.percentage) {
        Some(percentage) => {
            let starts_on = raw.start_date.as_deref().map(parse_date);
            let ends_on = raw.end_date.as_deref().map(parse_date);
            match (starts_on, ends_on) {
                (Some(None), _) | (_, Some(None)) => {
                    tracing::warn!(
                        product = raw.id,
                        "dropping promotion with unparseable validity date"
                    );
                    None
                }
                (starts_on, ends_on) => Some(ItemPromotion {
                    percentage,
                    starts_on: starts_on.flatten(),
                    ends_on: ends_on.flatten(),
                    sale_price: finite_decimal(raw.sale_price),
                }),
            }
        }
        None => None,
    };

    Ok(CatalogItem {
        id: ProductId::new(raw.id),
        brand: raw.brand.unwrap_or_default(),
        model: raw.model.unwrap_or_default(),
        base_price,
        promotion,
        category_sale_price: finite_decimal(raw.category_sale_price),
        subcategory_sale_price: finite_decimal(raw.subcategory_sale_price),
    })
}

pub(super) fn convert_order(raw: RawOrderHeader) -> Result<OrderHeader, ApiError> {
    let status = match raw.status.as_deref() {
        None => OrderStatus::default(),
        Some(s) => s
            .parse()
            .map_err(|e: shopdesk_core::InvalidOrderStatus| {
                ApiError::Parse(format!("order {}: {e}", raw.id))
            })?,
    };

    Ok(OrderHeader {
        id: OrderId::new(raw.id),
        customer: CustomerId::new(raw.customer),
        payment_method: raw.payment_method.unwrap_or_default(),
        status,
        amount: finite_decimal(raw.amount).unwrap_or(Decimal::ZERO),
        tracking_link: raw.tracking_link,
        tracking_number: raw.tracking_number,
    })
}

pub(super) fn convert_order_line(raw: RawOrderLine) -> OrderLine {
    OrderLine {
        id: OrderLineId::new(raw.id),
        order: OrderId::new(raw.order),
        product: ProductId::new(raw.product),
        quantity: raw.quantity.max(1),
        unit_price: finite_decimal(raw.unit_price),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item_from_json(json: &str) -> CatalogItem {
        let raw: RawCatalogItem = serde_json::from_str(json).expect("raw item");
        convert_catalog_item(raw).expect("convert")
    }

    #[test]
    fn test_catalog_item_alternate_field_names() {
        let a = item_from_json(r#"{"id": 1, "brand": "Acme", "model": "X", "price": 10.0}"#);
        let b = item_from_json(
            r#"{"_id": 1, "brand_name": "Acme", "model_name": "X", "unit_price": 10.0}"#,
        );
        assert_eq!(a, b);
    }

    #[test]
    fn test_unrepresentable_sale_prices_are_dropped() {
        let raw: RawCatalogItem = serde_json::from_str(
            r#"{"id": 2, "price": 10.0, "category_promo_price": null,
                "subcategory_promo_price": 1e30}"#,
        )
        .expect("raw item");
        let item = convert_catalog_item(raw).expect("convert");
        assert_eq!(item.category_sale_price, None);
        // 1e30 exceeds what a money decimal can hold; it must not become a price
        assert_eq!(item.subcategory_sale_price, None);
    }

    #[test]
    fn test_promotion_with_window() {
        let item = item_from_json(
            r#"{"id": 3, "price": 100.0, "discount_percent": 20,
                "promo_start": "2026-03-01", "promo_end": "2026-03-31T00:00:00Z"}"#,
        );
        let promo = item.promotion.expect("promotion");
        assert_eq!(promo.percentage, Decimal::from(20));
        assert_eq!(
            promo.starts_on,
            NaiveDate::from_ymd_opt(2026, 3, 1)
        );
        assert_eq!(promo.ends_on, NaiveDate::from_ymd_opt(2026, 3, 31));
    }

    #[test]
    fn test_unparseable_promo_date_drops_promotion() {
        let item = item_from_json(
            r#"{"id": 4, "price": 50.0, "discount_percent": 10, "promo_end": "soon"}"#,
        );
        assert!(item.promotion.is_none());
    }

    #[test]
    fn test_order_unknown_status_is_rejected() {
        let raw: RawOrderHeader = serde_json::from_str(
            r#"{"id": 9, "customer": 2, "status": "refunded", "total": 12.5}"#,
        )
        .expect("raw order");
        assert!(matches!(convert_order(raw), Err(ApiError::Parse(_))));
    }

    #[test]
    fn test_order_defaults() {
        let raw: RawOrderHeader =
            serde_json::from_str(r#"{"_id": 9, "client": 2}"#).expect("raw order");
        let order = convert_order(raw).expect("convert");
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.amount, Decimal::ZERO);
        assert_eq!(order.payment_method, "");
    }

    #[test]
    fn test_order_line_quantity_floor() {
        let raw: RawOrderLine =
            serde_json::from_str(r#"{"id": 1, "order": 2, "product": 3, "qty": 0}"#)
                .expect("raw line");
        assert_eq!(convert_order_line(raw).quantity, 1);
    }
}
