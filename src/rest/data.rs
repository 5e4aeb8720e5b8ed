//! Raw wire types for the REST endpoints and their conversions.
//!
//! The venue delivers every numeric field as a decimal string; the raw
//! types keep them as `String` and the `TryFrom` conversions parse them
//! into the crate's `f64` data model.

use serde::{Deserialize, Serialize};

use crate::error::AdapterError;
use crate::events::Bar;
use crate::orders::{OrderDetails, OrderResponse, ResponseCode, Side, Status, Type};
use crate::products::Product;
use crate::utils::{iso_to_epoch_ns, NS_IN_SECOND};

/// One row of the candles endpoint:
/// `[epochSec, low, high, open, close, volume]`, epoch at the *start* of
/// the aggregation interval.
pub type RawBarRow = (u64, f64, f64, f64, f64, f64);

/// Build a [`Bar`] from a candle row. `close_offset_secs` shifts the raw
/// interval-start epoch to the event's close time (0 for historical
/// queries, 60 for the minute scheduler).
#[must_use]
pub fn bar_from_row(product_id: &str, row: &RawBarRow, close_offset_secs: u64) -> Bar {
    let (epoch_secs, low, high, open, close, volume) = *row;

    Bar {
        epoch_time_ns: (epoch_secs + close_offset_secs) * NS_IN_SECOND,
        product_id: product_id.to_owned(),
        open,
        high,
        low,
        close,
        volume,
    }
}

/// Raw product descriptor from `GET /products`.
#[derive(Deserialize, Debug)]
pub struct RawProduct {
    /// Security identifier, e.g. `BTC-USD`.
    pub id: String,
    /// Human-readable name.
    pub display_name: String,
    /// Base currency code.
    pub base_currency: String,
    /// Quote currency code.
    pub quote_currency: String,
    /// Smallest order size.
    pub base_min_size: String,
    /// Largest order size.
    pub base_max_size: String,
    /// Order size increment.
    pub base_increment: String,
    /// Price increment.
    pub quote_increment: String,
    /// Present and `true` when the venue has halted trading.
    #[serde(default)]
    pub trading_disabled: Option<bool>,
    /// Whether margin trading is enabled.
    pub margin_enabled: bool,
}

impl TryFrom<RawProduct> for Product {
    type Error = AdapterError;

    fn try_from(value: RawProduct) -> Result<Self, Self::Error> {
        Ok(Self {
            base_min_size: value.base_min_size.parse()?,
            base_max_size: value.base_max_size.parse()?,
            base_increment: value.base_increment.parse()?,
            quote_increment: value.quote_increment.parse()?,
            trading_enabled: !value.trading_disabled.unwrap_or(false),
            margin_enabled: value.margin_enabled,
            id: value.id,
            display_name: value.display_name,
            base_currency: value.base_currency,
            quote_currency: value.quote_currency,
        })
    }
}

/// Body of `POST /orders`.
#[derive(Serialize, Debug)]
pub struct NewOrderRequest<'a> {
    /// Security identifier.
    pub product_id: &'a str,
    /// Process-local unique client order id.
    pub client_oid: String,
    /// `limit` or `market`.
    #[serde(rename = "type")]
    pub order_type: &'static str,
    /// `buy` or `sell`.
    pub side: &'static str,
    /// Limit price; omitted for market orders.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    /// Quantity in base currency.
    pub size: String,
}

#[derive(Deserialize, Debug)]
struct RawOrderAck {
    id: Option<String>,
    message: Option<String>,
}

/// Classify an order-placement response body.
///
/// Absence of a `message` field means the order was accepted; otherwise
/// the message text selects the failure code, and unclassified messages
/// are logged raw.
#[must_use]
pub fn decode_order_response(body: &str) -> OrderResponse {
    let Ok(ack) = serde_json::from_str::<RawOrderAck>(body) else {
        log::error!("Unforeseen order response: {body}");
        return OrderResponse {
            id: String::new(),
            code: ResponseCode::UnforeseenFailure,
        };
    };

    if let Some(message) = ack.message {
        let code = match message.as_str() {
            "Insufficient funds" => ResponseCode::InsufficientFunds,
            "product_id is not a valid product" => ResponseCode::InvalidProduct,
            "Unauthorized." | "Invalid API Key" | "invalid signature" | "Invalid Passphrase"
            | "invalid timestamp" => ResponseCode::Unauthorized,
            _ => {
                log::error!("Unforeseen order failure with message: {message}");
                ResponseCode::UnforeseenFailure
            }
        };

        return OrderResponse {
            id: String::new(),
            code,
        };
    }

    OrderResponse {
        id: ack.id.unwrap_or_default(),
        code: ResponseCode::Success,
    }
}

/// Raw order record from the order-query endpoints.
///
/// Market orders have no `price` field.
#[derive(Deserialize, Debug)]
pub struct RawOrderDetails {
    /// Venue-assigned order identifier.
    pub id: String,
    /// `limit` or `market`.
    #[serde(rename = "type")]
    pub order_type: String,
    /// `buy` or `sell`.
    pub side: String,
    /// Lifecycle status string.
    pub status: String,
    /// Creation time, ISO-8601.
    pub created_at: String,
    /// Security identifier.
    pub product_id: String,
    /// Limit price, absent for market orders.
    #[serde(default)]
    pub price: Option<String>,
    /// Ordered quantity.
    pub size: String,
    /// Quantity filled so far.
    pub filled_size: String,
    /// Fees charged so far.
    pub fill_fees: String,
}

impl TryFrom<RawOrderDetails> for OrderDetails {
    type Error = AdapterError;

    fn try_from(value: RawOrderDetails) -> Result<Self, Self::Error> {
        let is_market = value.order_type == "market";

        Ok(Self {
            order_type: if is_market { Type::Market } else { Type::Limit },
            side: if value.side == "buy" {
                Side::Buy
            } else {
                Side::Sell
            },
            status: match value.status.as_str() {
                "received" => Status::Received,
                "open" => Status::Open,
                "done" => Status::Done,
                _ => Status::Unknown,
            },
            epoch_time_ns: iso_to_epoch_ns(&value.created_at)?,
            price: match value.price {
                Some(price) if !is_market => price.parse()?,
                _ => 0.0,
            },
            quantity: value.size.parse()?,
            quantity_filled: value.filled_size.parse()?,
            fees: value.fill_fees.parse()?,
            id: value.id,
            security_id: value.product_id,
        })
    }
}
