//! Catalog browsing.

use std::error::Error;

use chrono::Utc;
use shopdesk_admin::api::{OrderApi, RestClient};
use shopdesk_admin::config::AdminConfig;
use shopdesk_admin::orders::effective_unit_price;

/// List catalog items with their base and effective prices.
pub async fn list() -> Result<(), Box<dyn Error>> {
    let config = AdminConfig::from_env()?;
    let client = RestClient::new(&config)?;

    let now = Utc::now();
    let items = client.list_catalog().await?;

    println!(
        "{:>8}  {:<16}  {:<16}  {:>10}  {:>10}",
        "product", "brand", "model", "base", "effective"
    );
    for item in items {
        let effective = effective_unit_price(&item, now);
        println!(
            "{:>8}  {:<16}  {:<16}  {:>10}  {:>10}",
            item.id.to_string(),
            item.brand,
            item.model,
            item.base_price.to_string(),
            effective.to_string()
        );
    }
    Ok(())
}
