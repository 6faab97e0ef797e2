//! Effective sale price resolution.
//!
//! A catalog item can carry up to three independent discount sources: a
//! subcategory-level sale price, a category-level sale price, and an
//! item-level percentage promotion with a validity window. Exactly one
//! source applies at a time; discounts never stack.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shopdesk_core::apply_percentage_discount;

use crate::api::types::{CatalogItem, ItemPromotion};

/// Resolve the unit price to charge for `item` at `now`.
///
/// Precedence, first applicable wins:
/// 1. Subcategory sale price, used as-is.
/// 2. Category sale price, used as-is.
/// 3. Item promotion, if its window contains `now`: the backend's
///    precomputed sale price when present, otherwise
///    `base × (1 − percentage/100)` rounded to two decimals.
/// 4. The base price.
///
/// The result is never negative. Pure: deterministic for a fixed `now`.
#[must_use]
pub fn effective_unit_price(item: &CatalogItem, now: DateTime<Utc>) -> Decimal {
    let price = resolve(item, now);
    price.max(Decimal::ZERO)
}

fn resolve(item: &CatalogItem, now: DateTime<Utc>) -> Decimal {
    if let Some(price) = item.subcategory_sale_price {
        return price;
    }
    if let Some(price) = item.category_sale_price {
        return price;
    }
    if let Some(promotion) = &item.promotion
        && promotion_active(promotion, now)
    {
        if let Some(price) = promotion.sale_price {
            return price;
        }
        return apply_percentage_discount(item.base_price, promotion.percentage);
    }
    item.base_price
}

/// Whether an item promotion applies at `now`.
///
/// A missing start or end bound is unbounded on that side; the end bound
/// is inclusive of its whole day. A non-positive percentage never
/// discounts, regardless of window.
#[must_use]
pub fn promotion_active(promotion: &ItemPromotion, now: DateTime<Utc>) -> bool {
    if promotion.percentage <= Decimal::ZERO {
        return false;
    }
    let today = now.date_naive();
    let started = promotion.starts_on.is_none_or(|start| start <= today);
    let not_ended = promotion.ends_on.is_none_or(|end| today <= end);
    started && not_ended
}
