//! Tradable product descriptors.

use std::collections::HashMap;
use std::sync::Arc;

/// Descriptor of a tradable pair. Populated once by
/// [`crate::rest::Connector::get_products`] and read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Security identifier, e.g. `BTC-USD`.
    pub id: String,
    /// Human-readable name, e.g. `BTC/USD`.
    pub display_name: String,
    /// Base currency code.
    pub base_currency: String,
    /// Quote currency code.
    pub quote_currency: String,
    /// Smallest order size in base currency.
    pub base_min_size: f64,
    /// Largest order size in base currency.
    pub base_max_size: f64,
    /// Order size increment in base currency.
    pub base_increment: f64,
    /// Price increment in quote currency.
    pub quote_increment: f64,
    /// Whether trading is currently enabled.
    pub trading_enabled: bool,
    /// Whether margin trading is enabled.
    pub margin_enabled: bool,
}

/// Shared handle to a product descriptor.
pub type ProductRef = Arc<Product>;

/// Security identifier to product descriptor map.
pub type ProductMap = HashMap<String, ProductRef>;
