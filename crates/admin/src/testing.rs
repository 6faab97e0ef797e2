//! Shared test doubles for the order-composition engine.
//!
//! `MockApi` is a scripted, in-memory [`OrderApi`] implementation. It
//! records every call, serves `list_orders` from a queue of canned
//! responses (the last response sticks), and keeps a mutable line store so
//! synchronizer tests can observe create/update/delete effects.

use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;

use rust_decimal::Decimal;
use shopdesk_core::{CustomerId, OrderId, OrderLineId, OrderStatus, ProductId};

use crate::api::types::{
    CatalogItem, NewOrder, NewOrderLine, OrderHeader, OrderLine, OrderLineUpdate, OrderUpdate,
};
use crate::api::{ApiError, OrderApi};

/// One recorded API call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CreateOrder(CustomerId),
    ListOrders(Option<CustomerId>),
    UpdateOrder(OrderId),
    CreateLine(ProductId),
    UpdateLine(OrderLineId),
    DeleteLine(ProductId),
    ListLines,
    ListCatalog,
}

#[derive(Default)]
pub struct MockApi {
    calls: Mutex<Vec<Call>>,
    list_orders_queue: Mutex<VecDeque<Vec<OrderHeader>>>,
    lines: Mutex<Vec<OrderLine>>,
    next_line_id: Mutex<i64>,
    fail_line_creates_for: Mutex<HashSet<ProductId>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self {
            next_line_id: Mutex::new(1000),
            ..Self::default()
        }
    }

    /// Queue a `list_orders` response. The last queued response is served
    /// for every call after the queue drains.
    pub fn push_orders(&self, orders: Vec<OrderHeader>) {
        self.list_orders_queue
            .lock()
            .expect("lock poisoned")
            .push_back(orders);
    }

    /// Seed the persisted line store.
    pub fn seed_lines(&self, lines: Vec<OrderLine>) {
        *self.lines.lock().expect("lock poisoned") = lines;
    }

    /// Make `create_order_line` fail for the given product.
    pub fn fail_line_creates_for(&self, product: ProductId) {
        self.fail_line_creates_for
            .lock()
            .expect("lock poisoned")
            .insert(product);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("lock poisoned").clone()
    }

    pub fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| matches(c)).count()
    }

    pub fn current_lines(&self) -> Vec<OrderLine> {
        self.lines.lock().expect("lock poisoned").clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().expect("lock poisoned").push(call);
    }
}

impl OrderApi for MockApi {
    async fn create_order(&self, order: &NewOrder) -> Result<(), ApiError> {
        self.record(Call::CreateOrder(order.customer));
        Ok(())
    }

    async fn list_orders(&self, customer: Option<CustomerId>) -> Result<Vec<OrderHeader>, ApiError> {
        self.record(Call::ListOrders(customer));
        let mut queue = self.list_orders_queue.lock().expect("lock poisoned");
        if queue.len() > 1 {
            Ok(queue.pop_front().unwrap_or_default())
        } else {
            Ok(queue.front().cloned().unwrap_or_default())
        }
    }

    async fn update_order(&self, update: &OrderUpdate) -> Result<(), ApiError> {
        self.record(Call::UpdateOrder(update.order));
        Ok(())
    }

    async fn create_order_line(&self, line: &NewOrderLine) -> Result<(), ApiError> {
        self.record(Call::CreateLine(line.product));
        if self
            .fail_line_creates_for
            .lock()
            .expect("lock poisoned")
            .contains(&line.product)
        {
            return Err(ApiError::Api {
                status: 500,
                message: format!("line create rejected for product {}", line.product),
            });
        }
        let mut next_id = self.next_line_id.lock().expect("lock poisoned");
        *next_id += 1;
        self.lines.lock().expect("lock poisoned").push(OrderLine {
            id: OrderLineId::new(*next_id),
            order: line.order,
            product: line.product,
            quantity: line.quantity,
            unit_price: None,
        });
        Ok(())
    }

    async fn update_order_line(&self, update: &OrderLineUpdate) -> Result<(), ApiError> {
        self.record(Call::UpdateLine(update.line));
        let mut lines = self.lines.lock().expect("lock poisoned");
        if let Some(line) = lines.iter_mut().find(|l| l.id == update.line) {
            line.quantity = update.quantity;
        }
        Ok(())
    }

    async fn delete_order_line(
        &self,
        order: OrderId,
        _customer: CustomerId,
        product: ProductId,
    ) -> Result<(), ApiError> {
        self.record(Call::DeleteLine(product));
        self.lines
            .lock()
            .expect("lock poisoned")
            .retain(|l| !(l.order == order && l.product == product));
        Ok(())
    }

    async fn list_order_lines(&self) -> Result<Vec<OrderLine>, ApiError> {
        self.record(Call::ListLines);
        Ok(self.current_lines())
    }

    async fn list_catalog(&self) -> Result<Vec<CatalogItem>, ApiError> {
        self.record(Call::ListCatalog);
        Ok(Vec::new())
    }
}

// =============================================================================
// Fixture helpers
// =============================================================================

pub fn order(id: i64, customer: i64) -> OrderHeader {
    OrderHeader {
        id: OrderId::new(id),
        customer: CustomerId::new(customer),
        payment_method: "card".to_owned(),
        status: OrderStatus::Pending,
        amount: Decimal::ZERO,
        tracking_link: None,
        tracking_number: None,
    }
}

pub fn line(id: i64, order: i64, product: i64, quantity: u32) -> OrderLine {
    OrderLine {
        id: OrderLineId::new(id),
        order: OrderId::new(order),
        product: ProductId::new(product),
        quantity,
        unit_price: None,
    }
}

pub fn item(id: i64, price: i64) -> CatalogItem {
    CatalogItem {
        id: ProductId::new(id),
        brand: "Acme".to_owned(),
        model: format!("M{id}"),
        base_price: Decimal::from(price),
        promotion: None,
        category_sale_price: None,
        subcategory_sale_price: None,
    }
}
