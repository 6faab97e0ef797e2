//! `reqwest`-backed implementation of [`OrderApi`].

use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use shopdesk_core::{CustomerId, OrderId, ProductId};
use tracing::instrument;

use crate::config::AdminConfig;

use super::conversions::{convert_catalog_item, convert_order, convert_order_line};
use super::types::{
    CatalogItem, NewOrder, NewOrderLine, OrderHeader, OrderLine, OrderLineUpdate, OrderUpdate,
};
use super::{ApiError, OrderApi};

/// HTTP client for the store backend.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct RestClient {
    inner: Arc<RestClientInner>,
}

struct RestClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl RestClient {
    /// Create a new backend client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Parse`] if the API token cannot be used as a
    /// header value, or [`ApiError::Http`] if the HTTP client fails to
    /// build.
    pub fn new(config: &AdminConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();

        let auth_value = format!("Bearer {}", config.api_token.expose_secret());
        let mut auth_header = HeaderValue::from_str(&auth_value)
            .map_err(|e| ApiError::Parse(format!("Invalid API token format: {e}")))?;
        auth_header.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_header);

        let client = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self {
            inner: Arc::new(RestClientInner {
                client,
                base_url: config.api_base_url.as_str().trim_end_matches('/').to_owned(),
            }),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// Surface non-success responses as [`ApiError::Api`] with a message
    /// taken from the response body.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(ApiError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.inner.client.get(self.url(path)).send().await?;
        let response = Self::check(response).await?;
        response
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }

    async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        let response = self
            .inner
            .client
            .request(method, self.url(path))
            .json(body)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}

impl OrderApi for RestClient {
    #[instrument(skip(self, order), fields(customer = %order.customer))]
    async fn create_order(&self, order: &NewOrder) -> Result<(), ApiError> {
        self.send_json(reqwest::Method::POST, "/orders", order).await
    }

    #[instrument(skip(self))]
    async fn list_orders(&self, customer: Option<CustomerId>) -> Result<Vec<OrderHeader>, ApiError> {
        let path = customer.map_or_else(
            || "/orders".to_owned(),
            |c| format!("/orders?customer={c}"),
        );
        let raw: Vec<super::conversions::RawOrderHeader> = self.get_json(&path).await?;
        raw.into_iter().map(convert_order).collect()
    }

    #[instrument(skip(self, update), fields(order = %update.order))]
    async fn update_order(&self, update: &OrderUpdate) -> Result<(), ApiError> {
        let path = format!("/orders/{}", update.order);
        self.send_json(reqwest::Method::PUT, &path, update).await
    }

    #[instrument(skip(self, line), fields(order = %line.order, product = %line.product))]
    async fn create_order_line(&self, line: &NewOrderLine) -> Result<(), ApiError> {
        self.send_json(reqwest::Method::POST, "/order-lines", line)
            .await
    }

    #[instrument(skip(self, update), fields(line = %update.line))]
    async fn update_order_line(&self, update: &OrderLineUpdate) -> Result<(), ApiError> {
        let path = format!("/order-lines/{}", update.line);
        self.send_json(reqwest::Method::PUT, &path, update).await
    }

    #[instrument(skip(self))]
    async fn delete_order_line(
        &self,
        order: OrderId,
        customer: CustomerId,
        product: ProductId,
    ) -> Result<(), ApiError> {
        // The backend keys line deletion by (order, customer, product),
        // not by line ID.
        let path = format!("/order-lines?order={order}&customer={customer}&product={product}");
        let response = self.inner.client.delete(self.url(&path)).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_order_lines(&self) -> Result<Vec<OrderLine>, ApiError> {
        let raw: Vec<super::conversions::RawOrderLine> = self.get_json("/order-lines").await?;
        Ok(raw.into_iter().map(convert_order_line).collect())
    }

    #[instrument(skip(self))]
    async fn list_catalog(&self) -> Result<Vec<CatalogItem>, ApiError> {
        let raw: Vec<super::conversions::RawCatalogItem> = self.get_json("/catalog").await?;
        raw.into_iter().map(convert_catalog_item).collect()
    }
}
