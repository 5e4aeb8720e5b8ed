//! Authenticated REST connector for products, bars, and orders.
//!
//! Two logical request paths share the profile host: a public path for
//! market data and a private path that carries the [`Auth`] header set.
//! For concurrent queries the connector offers *isolated* variants that
//! build a fresh client (fresh connection pool, fresh TCP+TLS) per call,
//! so no two tasks ever contend for one stream.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::{Client, Method};

use crate::auth::Auth;
use crate::config;
use crate::events::Bar;
use crate::orders::{LimitOrder, MarketOrder, OrderDetails, OrderResponse, Status};
use crate::products::ProductMap;
use crate::universe::Universe;

pub mod bars_scheduler;
pub mod data;

/// `User-Agent` sent with every request; the venue rejects anonymous
/// clients.
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Granularity of minute bars, in seconds.
pub const GRANULARITY_MINUTE: u32 = 60;
/// Granularity of daily bars, in seconds.
pub const GRANULARITY_DAY: u32 = 86_400;

/// REST connector over the compiled venue profile.
#[derive(Debug)]
pub struct Connector {
    auth: Arc<Auth>,
    client: Client,
    /// Monotonic source of `client_oid` values for order placement.
    unique_order_id: AtomicU64,
}

impl Connector {
    /// Build the connector with a shared client for sequential calls.
    #[must_use]
    pub fn new(auth: Arc<Auth>) -> Self {
        Self {
            auth,
            client: Client::new(),
            unique_order_id: AtomicU64::new(0),
        }
    }

    /// `GET /products`: every tradable pair the venue exposes, as the
    /// product map plus the available universe.
    ///
    /// # Errors
    ///
    /// Will return `Err` on transport failure or if the response is not
    /// the expected product array.
    pub async fn get_products(&self) -> Result<(ProductMap, Universe)> {
        let body = self.get_public("/products").await?;
        let raw_products: Vec<data::RawProduct> =
            serde_json::from_str(&body).context("unexpected /products response")?;

        let mut product_map = ProductMap::new();
        let available_universe = Universe::new();

        for raw_product in raw_products {
            let product: crate::products::Product = raw_product.try_into()?;

            available_universe.insert(product.id.clone());
            product_map.insert(product.id.clone(), Arc::new(product));
        }

        Ok((product_map, available_universe))
    }

    /// `GET /products/{id}/candles`: historical bars for one product.
    /// Bar epochs are the raw interval-start times. A non-array response
    /// is logged and yields no bars.
    ///
    /// # Errors
    ///
    /// Will return `Err` on transport failure.
    pub async fn get_bars(
        &self,
        product_id: &str,
        granularity: u32,
        start: &str,
        end: &str,
    ) -> Result<Vec<Bar>> {
        let body = self.get_raw_bars(product_id, granularity, start, end).await?;

        let Ok(rows) = serde_json::from_str::<Vec<data::RawBarRow>>(&body) else {
            log::error!("No bars received for {product_id} | {body}");
            return Ok(Vec::new());
        };

        Ok(rows
            .iter()
            .map(|row| data::bar_from_row(product_id, row, 0))
            .collect())
    }

    /// Minute bars ([`GRANULARITY_MINUTE`]).
    ///
    /// # Errors
    ///
    /// Will return `Err` on transport failure.
    pub async fn get_minute_bars(
        &self,
        product_id: &str,
        start: &str,
        end: &str,
    ) -> Result<Vec<Bar>> {
        self.get_bars(product_id, GRANULARITY_MINUTE, start, end)
            .await
    }

    /// Daily bars ([`GRANULARITY_DAY`]).
    ///
    /// # Errors
    ///
    /// Will return `Err` on transport failure.
    pub async fn get_daily_bars(
        &self,
        product_id: &str,
        start: &str,
        end: &str,
    ) -> Result<Vec<Bar>> {
        self.get_bars(product_id, GRANULARITY_DAY, start, end).await
    }

    /// Raw candles response body, fetched over an isolated session so
    /// concurrent bar-query workers never share a stream.
    ///
    /// # Errors
    ///
    /// Will return `Err` on transport failure.
    pub async fn get_raw_bars(
        &self,
        product_id: &str,
        granularity: u32,
        start: &str,
        end: &str,
    ) -> Result<String> {
        let target = format!(
            "/products/{product_id}/candles?granularity={granularity}&start={start}&end={end}"
        );

        self.get_public_isolated(&target).await
    }

    /// `POST /orders` with a limit order body.
    ///
    /// # Errors
    ///
    /// Will return `Err` on transport failure; rejections are returned as
    /// classified [`OrderResponse`] codes, never as errors.
    pub async fn place_limit_order(&self, order: &LimitOrder) -> Result<OrderResponse> {
        let request = data::NewOrderRequest {
            product_id: &order.security_id,
            client_oid: self.next_client_oid(),
            order_type: "limit",
            side: order.side.as_str(),
            price: Some(order.price.to_string()),
            size: order.quantity.to_string(),
        };

        self.submit_order(&request).await
    }

    /// `POST /orders` with a market order body.
    ///
    /// # Errors
    ///
    /// Will return `Err` on transport failure; rejections are returned as
    /// classified [`OrderResponse`] codes, never as errors.
    pub async fn place_market_order(&self, order: &MarketOrder) -> Result<OrderResponse> {
        let request = data::NewOrderRequest {
            product_id: &order.security_id,
            client_oid: self.next_client_oid(),
            order_type: "market",
            side: order.side.as_str(),
            price: None,
            size: order.quantity.to_string(),
        };

        self.submit_order(&request).await
    }

    /// `GET /orders/{id}`: the full record of one of our orders, `None`
    /// if the venue reports a failure message.
    ///
    /// # Errors
    ///
    /// Will return `Err` on transport failure or a malformed success
    /// response.
    pub async fn get_order(&self, order_id: &str) -> Result<Option<OrderDetails>> {
        let target = format!("/orders/{order_id}");
        let body = self
            .request_private_isolated(Method::GET, &target, String::new())
            .await?;

        let value: serde_json::Value =
            serde_json::from_str(&body).context("unexpected order response")?;

        if let Some(message) = value.get("message").and_then(serde_json::Value::as_str) {
            log::error!("Failed to get order {order_id} | Message: {message}");
            return Ok(None);
        }

        let raw: data::RawOrderDetails = serde_json::from_value(value)?;

        Ok(Some(raw.try_into()?))
    }

    /// `GET /orders`: our orders, optionally filtered by product and
    /// status. Rows that fail to decode are logged and skipped.
    ///
    /// # Errors
    ///
    /// Will return `Err` on transport failure.
    pub async fn get_all_orders(
        &self,
        product_id: Option<&str>,
        status: Option<Status>,
    ) -> Result<Vec<OrderDetails>> {
        let mut target = String::from("/orders");

        if let Some(product_id) = product_id {
            target.push_str("?productId=");
            target.push_str(product_id);
        }

        if let Some(status) = status_filter(status) {
            target.push(if product_id.is_some() { '&' } else { '?' });
            target.push_str("status=");
            target.push_str(status);
        }

        let body = self
            .request_private(Method::GET, &target, String::new())
            .await?;

        let Ok(values) = serde_json::from_str::<Vec<serde_json::Value>>(&body) else {
            log::error!("Failed to get orders | {body}");
            return Ok(Vec::new());
        };

        let mut orders = Vec::with_capacity(values.len());
        for value in values {
            match serde_json::from_value::<data::RawOrderDetails>(value)
                .map_err(anyhow::Error::from)
                .and_then(|raw| Ok(OrderDetails::try_from(raw)?))
            {
                Ok(details) => orders.push(details),
                Err(error) => log::error!("Skipping undecodable order row: {error:#}"),
            }
        }

        Ok(orders)
    }

    /// `DELETE /orders/{id}`: cancel one order. `false` if the venue
    /// reports a failure message.
    ///
    /// # Errors
    ///
    /// Will return `Err` on transport failure.
    pub async fn cancel_order(&self, order_id: &str) -> Result<bool> {
        let target = format!("/orders/{order_id}");
        let body = self
            .request_private_isolated(Method::DELETE, &target, String::new())
            .await?;

        if let Some(message) = failure_message(&body) {
            log::error!("Failed to cancel order {order_id} | Message: {message}");
            return Ok(false);
        }

        Ok(true)
    }

    /// `DELETE /orders`: cancel every open order, optionally scoped to
    /// one product. Returns the canceled order ids.
    ///
    /// # Errors
    ///
    /// Will return `Err` on transport failure.
    pub async fn cancel_all_orders(&self, product_id: Option<&str>) -> Result<Vec<String>> {
        let body = match product_id {
            Some(product_id) => {
                let target = format!("/orders?productId={product_id}");
                self.request_private_isolated(Method::DELETE, &target, String::new())
                    .await?
            }
            None => {
                self.request_private(Method::DELETE, "/orders", String::new())
                    .await?
            }
        };

        let Ok(order_ids) = serde_json::from_str::<Vec<String>>(&body) else {
            log::error!("Failed to cancel orders | {body}");
            return Ok(Vec::new());
        };

        Ok(order_ids)
    }

    async fn submit_order(&self, request: &data::NewOrderRequest<'_>) -> Result<OrderResponse> {
        let body = serde_json::to_string(request)?;
        let response = self.request_private(Method::POST, "/orders", body).await?;

        Ok(data::decode_order_response(&response))
    }

    fn next_client_oid(&self) -> String {
        self.unique_order_id.fetch_add(1, Ordering::Relaxed).to_string()
    }

    async fn get_public(&self, target: &str) -> Result<String> {
        let response = self
            .client
            .get(format!("{}{target}", config::REST_URL))
            .header("User-Agent", USER_AGENT)
            .send()
            .await?;

        Ok(response.text().await?)
    }

    async fn get_public_isolated(&self, target: &str) -> Result<String> {
        let response = Client::new()
            .get(format!("{}{target}", config::REST_URL))
            .header("User-Agent", USER_AGENT)
            .send()
            .await?;

        Ok(response.text().await?)
    }

    async fn request_private(&self, method: Method, target: &str, body: String) -> Result<String> {
        self.send_private(&self.client, method, target, body).await
    }

    async fn request_private_isolated(
        &self,
        method: Method,
        target: &str,
        body: String,
    ) -> Result<String> {
        self.send_private(&Client::new(), method, target, body).await
    }

    async fn send_private(
        &self,
        client: &Client,
        method: Method,
        target: &str,
        body: String,
    ) -> Result<String> {
        let mut request = client
            .request(method.clone(), format!("{}{target}", config::REST_URL))
            .header("User-Agent", USER_AGENT);

        for (name, value) in self.auth.rest_headers(method.as_str(), target, &body) {
            request = request.header(name, value);
        }

        if !body.is_empty() {
            request = request.body(body);
        }

        let response = request.send().await?;

        Ok(response.text().await?)
    }
}

/// The wire value for a status filter; `Unknown` (and `None`) mean no
/// filter, i.e. every order.
fn status_filter(status: Option<Status>) -> Option<&'static str> {
    match status? {
        Status::Received => Some("received"),
        Status::Open => Some("open"),
        Status::Done => Some("done"),
        Status::Unknown => None,
    }
}

fn failure_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;

    value
        .get("message")
        .and_then(serde_json::Value::as_str)
        .map(str::to_owned)
}
