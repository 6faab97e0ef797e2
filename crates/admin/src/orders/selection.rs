//! In-memory working set of selected products and quantities.
//!
//! The selection reflects the operator's intent before the network has
//! confirmed anything. In create mode the whole set is buffered until an
//! order identifier exists; in edit mode each mutation is pushed through
//! [`crate::orders::sync::LineSynchronizer`] as it happens.

use std::collections::BTreeMap;

use shopdesk_core::{OrderId, ProductId};

use crate::api::types::OrderLine;

/// Upper quantity bound accepted per line.
pub const MAX_QUANTITY: u32 = 999;

/// Whether the selection backs a new order or an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    /// Composing a new order; nothing is persisted yet.
    Create,
    /// Editing an order that already has an identifier.
    Edit,
}

/// The working set of `{product → quantity}` for one composition session.
///
/// Side-effect free: mutations touch only this map. Keys are unique per
/// product; an entry disappears when its product is deselected.
#[derive(Debug, Clone)]
pub struct SelectionState {
    mode: SelectionMode,
    entries: BTreeMap<ProductId, u32>,
}

impl SelectionState {
    /// Create an empty selection.
    #[must_use]
    pub const fn new(mode: SelectionMode) -> Self {
        Self {
            mode,
            entries: BTreeMap::new(),
        }
    }

    /// The mode this selection was created in.
    #[must_use]
    pub const fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Flip a product in or out of the selection.
    ///
    /// Adds at quantity 1 when absent, removes when present. Returns
    /// `true` if the product is selected afterwards.
    pub fn toggle(&mut self, product: ProductId) -> bool {
        if self.entries.remove(&product).is_some() {
            false
        } else {
            self.entries.insert(product, 1);
            true
        }
    }

    /// Set a product's quantity, clamped to `1..=999`.
    ///
    /// In create mode an unselected product is implicitly added. In edit
    /// mode it is not: persisted lines only ever come into existence via
    /// an explicit toggle, and this returns `false` without changing
    /// anything.
    pub fn set_quantity(&mut self, product: ProductId, quantity: u32) -> bool {
        let quantity = quantity.clamp(1, MAX_QUANTITY);
        match self.entries.get_mut(&product) {
            Some(existing) => {
                *existing = quantity;
                true
            }
            None if self.mode == SelectionMode::Create => {
                self.entries.insert(product, quantity);
                true
            }
            None => false,
        }
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Replace the working set with the persisted lines of `order`.
    ///
    /// Used when entering edit mode, so the selection starts out mirroring
    /// what the backend already holds.
    pub fn snapshot_from(&mut self, order: OrderId, lines: &[OrderLine]) {
        self.entries = lines
            .iter()
            .filter(|line| line.order == order)
            .map(|line| (line.product, line.quantity))
            .collect();
    }

    /// Quantity for `product`, if selected.
    #[must_use]
    pub fn quantity(&self, product: ProductId) -> Option<u32> {
        self.entries.get(&product).copied()
    }

    /// Whether `product` is selected.
    #[must_use]
    pub fn contains(&self, product: ProductId) -> bool {
        self.entries.contains_key(&product)
    }

    /// Whether nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of selected products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterate over `(product, quantity)` pairs in product-id order.
    pub fn iter(&self) -> impl Iterator<Item = (ProductId, u32)> + '_ {
        self.entries.iter().map(|(product, qty)| (*product, *qty))
    }
}

#[cfg(test)]
mod tests {
    use shopdesk_core::OrderLineId;

    use super::*;

    fn line(order: i64, product: i64, quantity: u32) -> OrderLine {
        OrderLine {
            id: OrderLineId::new(product * 10),
            order: OrderId::new(order),
            product: ProductId::new(product),
            quantity,
            unit_price: None,
        }
    }

    #[test]
    fn test_toggle_is_its_own_inverse() {
        let mut selection = SelectionState::new(SelectionMode::Create);
        selection.toggle(ProductId::new(1));
        selection.set_quantity(ProductId::new(1), 5);

        let before: Vec<_> = selection.iter().collect();
        assert!(selection.toggle(ProductId::new(2)));
        assert!(!selection.toggle(ProductId::new(2)));
        let after: Vec<_> = selection.iter().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_toggle_adds_at_quantity_one() {
        let mut selection = SelectionState::new(SelectionMode::Create);
        selection.toggle(ProductId::new(3));
        assert_eq!(selection.quantity(ProductId::new(3)), Some(1));
    }

    #[test]
    fn test_set_quantity_clamps() {
        let mut selection = SelectionState::new(SelectionMode::Create);
        selection.set_quantity(ProductId::new(1), 0);
        assert_eq!(selection.quantity(ProductId::new(1)), Some(1));
        selection.set_quantity(ProductId::new(1), 5000);
        assert_eq!(selection.quantity(ProductId::new(1)), Some(MAX_QUANTITY));
    }

    #[test]
    fn test_set_quantity_implicit_add_only_in_create_mode() {
        let mut create = SelectionState::new(SelectionMode::Create);
        assert!(create.set_quantity(ProductId::new(1), 2));
        assert_eq!(create.quantity(ProductId::new(1)), Some(2));

        let mut edit = SelectionState::new(SelectionMode::Edit);
        assert!(!edit.set_quantity(ProductId::new(1), 2));
        assert!(edit.is_empty());
    }

    #[test]
    fn test_snapshot_from_filters_to_order() {
        let mut selection = SelectionState::new(SelectionMode::Edit);
        let lines = vec![line(7, 1, 2), line(7, 2, 3), line(8, 9, 1)];
        selection.snapshot_from(OrderId::new(7), &lines);

        assert_eq!(selection.len(), 2);
        assert_eq!(selection.quantity(ProductId::new(1)), Some(2));
        assert_eq!(selection.quantity(ProductId::new(2)), Some(3));
        assert!(!selection.contains(ProductId::new(9)));
    }

    #[test]
    fn test_clear() {
        let mut selection = SelectionState::new(SelectionMode::Create);
        selection.toggle(ProductId::new(1));
        selection.clear();
        assert!(selection.is_empty());
    }
}
