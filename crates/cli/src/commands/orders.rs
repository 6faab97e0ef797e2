//! Order listing, creation, and status changes.

use std::collections::HashMap;
use std::error::Error;

use shopdesk_admin::api::types::OrderUpdate;
use shopdesk_admin::api::{OrderApi, RestClient};
use shopdesk_admin::config::AdminConfig;
use shopdesk_admin::orders::{OrderCreation, OrderDraft, SelectionMode, SelectionState};
use shopdesk_core::{CustomerId, OrderId, OrderStatus, ProductId};

fn client() -> Result<(RestClient, AdminConfig), Box<dyn Error>> {
    let config = AdminConfig::from_env()?;
    let client = RestClient::new(&config)?;
    Ok((client, config))
}

/// List orders, optionally restricted to one customer.
pub async fn list(customer: Option<i64>) -> Result<(), Box<dyn Error>> {
    let (client, _) = client()?;
    let orders = client.list_orders(customer.map(CustomerId::new)).await?;

    println!("{:>8}  {:>8}  {:<12}  {:>10}  {}", "order", "customer", "status", "amount", "payment");
    for order in orders {
        println!(
            "{:>8}  {:>8}  {:<12}  {:>10}  {}",
            order.id.to_string(),
            order.customer.to_string(),
            order.status.to_string(),
            order.amount.to_string(),
            order.payment_method
        );
    }
    Ok(())
}

/// Compose and create an order from `<product>[:<quantity>]` line specs.
pub async fn create(
    customer: i64,
    line_specs: &[String],
    payment: String,
) -> Result<(), Box<dyn Error>> {
    let (client, config) = client()?;

    let mut selection = SelectionState::new(SelectionMode::Create);
    for spec in line_specs {
        let (product, quantity) = parse_line_spec(spec)?;
        selection.set_quantity(product, quantity);
    }

    let catalog: HashMap<_, _> = client
        .list_catalog()
        .await?
        .into_iter()
        .map(|item| (item.id, item))
        .collect();

    let draft = OrderDraft {
        customer: Some(CustomerId::new(customer)),
        payment_method: payment,
        status: OrderStatus::Pending,
    };

    let mut creation = OrderCreation::new(client, config.discovery);
    let created = creation.run(&draft, &selection, &catalog).await?;

    println!("created order {} for {}", created.order, created.amount);
    if !created.is_complete() {
        println!("warning: some lines were not attached; add them manually:");
        for failure in &created.failed {
            println!("  product {}: {}", failure.product, failure.error);
        }
    }
    Ok(())
}

/// Change an order's status, preserving its other header fields.
pub async fn set_status(order: i64, status: &str) -> Result<(), Box<dyn Error>> {
    let status: OrderStatus = status.parse()?;
    let (client, _) = client()?;

    let order_id = OrderId::new(order);
    let header = client
        .list_orders(None)
        .await?
        .into_iter()
        .find(|o| o.id == order_id)
        .ok_or_else(|| format!("no order with id {order_id}"))?;

    client
        .update_order(&OrderUpdate {
            order: order_id,
            status,
            payment_method: header.payment_method,
            amount: header.amount,
            tracking_link: header.tracking_link,
            tracking_number: header.tracking_number,
        })
        .await?;

    println!("order {order_id} is now {status}");
    Ok(())
}

fn parse_line_spec(spec: &str) -> Result<(ProductId, u32), Box<dyn Error>> {
    let (product, quantity) = match spec.split_once(':') {
        Some((product, quantity)) => (product, quantity.parse::<u32>()?),
        None => (spec, 1),
    };
    let product: i64 = product.parse()?;
    Ok((ProductId::new(product), quantity))
}
