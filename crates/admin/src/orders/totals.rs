//! Order total derivation.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shopdesk_core::{ProductId, round_money};

use crate::api::types::CatalogItem;

use super::pricing::effective_unit_price;
use super::selection::SelectionState;

/// Compute the monetary total of a selection.
///
/// Sums `effective_unit_price × quantity` over every entry, rounded to two
/// decimals. The empty selection totals zero. A selected product missing
/// from the catalog index contributes nothing; that indicates a stale
/// index, so it is logged.
#[must_use]
pub fn order_total(
    selection: &SelectionState,
    catalog: &HashMap<ProductId, CatalogItem>,
    now: DateTime<Utc>,
) -> Decimal {
    let total = selection
        .iter()
        .filter_map(|(product, quantity)| {
            let Some(item) = catalog.get(&product) else {
                tracing::warn!(%product, "selected product missing from catalog index");
                return None;
            };
            Some(effective_unit_price(item, now) * Decimal::from(quantity))
        })
        .sum();
    round_money(total)
}
