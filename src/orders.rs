//! Order types for the trading surface.

use std::fmt;

/// Order flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Type {
    /// Executes at the market price.
    Market,
    /// Rests at a limit price.
    Limit,
    /// Anything the venue reports that we do not model.
    Unknown,
}

/// Order direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Buy the base currency.
    Buy,
    /// Sell the base currency.
    Sell,
}

impl Side {
    /// The wire value the venue expects.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        }
    }
}

/// Where an order is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Acknowledged by the venue, not yet on the book.
    Received,
    /// Resting on the book.
    Open,
    /// Filled or canceled.
    Done,
    /// Anything the venue reports that we do not model.
    Unknown,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Status::Received => "received",
            Status::Open => "open",
            Status::Done => "done",
            Status::Unknown => "unknown",
        })
    }
}

/// An order resting at a limit price.
#[derive(Debug, Clone, PartialEq)]
pub struct LimitOrder {
    /// Direction.
    pub side: Side,
    /// Security identifier.
    pub security_id: String,
    /// Limit price.
    pub price: f64,
    /// Quantity in base currency.
    pub quantity: f64,
}

/// An order executing at the market price.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketOrder {
    /// Direction.
    pub side: Side,
    /// Security identifier.
    pub security_id: String,
    /// Quantity in base currency.
    pub quantity: f64,
}

/// Outcome of an order placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderResponse {
    /// Venue-assigned order identifier; empty unless successful.
    pub id: String,
    /// Classified outcome.
    pub code: ResponseCode,
}

/// Classification of an order-placement response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseCode {
    /// The order was accepted.
    Success,
    /// Credentials were rejected.
    Unauthorized,
    /// The account cannot cover the order.
    InsufficientFunds,
    /// The product identifier is unknown to the venue.
    InvalidProduct,
    /// A failure message we do not classify (logged raw).
    UnforeseenFailure,
    /// Placeholder for a response that has not been produced.
    Empty,
}

impl fmt::Display for OrderResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            ResponseCode::Empty => write!(f, "[EMPTY] Order response has not been initialized"),
            ResponseCode::Success => write!(f, "[SUCCESS] Order ID: {}", self.id),
            ResponseCode::Unauthorized => write!(f, "[UNAUTHORIZED]"),
            ResponseCode::InsufficientFunds => write!(f, "[INSUFFICIENT FUNDS]"),
            ResponseCode::InvalidProduct => write!(f, "[INVALID PRODUCT]"),
            ResponseCode::UnforeseenFailure => write!(f, "[UNFORESEEN ERROR]"),
        }
    }
}

/// Full order record as returned by the order-query endpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDetails {
    /// Venue-assigned order identifier.
    pub id: String,
    /// Order flavor.
    pub order_type: Type,
    /// Direction.
    pub side: Side,
    /// Lifecycle status.
    pub status: Status,
    /// Creation time, ns since epoch.
    pub epoch_time_ns: u64,
    /// Security identifier.
    pub security_id: String,
    /// Limit price; zero for market orders.
    pub price: f64,
    /// Ordered quantity.
    pub quantity: f64,
    /// Quantity filled so far.
    pub quantity_filled: f64,
    /// Fees charged so far.
    pub fees: f64,
}

impl fmt::Display for OrderDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Order ID: {} | Security ID: {} | Status: {} | Price: {} | Quantity: {} | Filled: {} | Fees: {}",
            self.id, self.security_id, self.status, self.price, self.quantity, self.quantity_filled, self.fees
        )
    }
}
