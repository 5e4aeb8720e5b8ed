//! Crate prelude.

use hmac::Hmac;
pub use hmac::Mac;
use sha2::Sha256;

pub use crate::adapter::{Adapter, Trader};
pub use crate::error::AdapterError;
pub use crate::events::{Bar, Event, OrderStatus, Tick, Trade, Transaction};
pub use crate::orders::{
    LimitOrder, MarketOrder, OrderDetails, OrderResponse, ResponseCode, Side, Status,
};
pub use crate::strategy::Strategy;
pub use crate::universe::Universe;

/// Hashing type for request signatures.
pub type HmacSha256 = Hmac<Sha256>;
