//! Lifecycle and per-event callback contract consumed by the adapter.

use async_trait::async_trait;

use crate::adapter::Trader;
use crate::events::{Bar, OrderStatus, Tick, Trade, Transaction};

/// The contract a trading strategy implements.
///
/// The adapter owns the strategy; every callback receives a [`Trader`]
/// handle for issuing orders and universe changes, so no back-pointer is
/// needed. Callbacks run on the single feeder task in event order; they
/// must not block indefinitely, and long work is the strategy's
/// responsibility to offload.
#[async_trait]
pub trait Strategy: Send {
    /// Called once from the adapter constructor, before any I/O.
    async fn on_init(&mut self, trader: &Trader);

    /// Called from [`crate::adapter::Adapter::run`] after the stream is
    /// connected, before the bar poller and the feeder start.
    async fn on_start(&mut self, trader: &Trader);

    /// A bar closed for a subscribed product.
    async fn on_bar(&mut self, trader: &Trader, bar: Bar);

    /// The top of the book moved for a subscribed product.
    async fn on_tick(&mut self, trader: &Trader, tick: Tick);

    /// A trade printed for a subscribed product.
    async fn on_trade(&mut self, trader: &Trader, trade: Trade);

    /// One of our orders changed lifecycle state.
    async fn on_order_status(&mut self, trader: &Trader, order_status: OrderStatus);

    /// One of our orders (partially) filled.
    async fn on_transaction(&mut self, trader: &Trader, transaction: Transaction);

    /// Called after a worker failure, before the process exits.
    async fn on_exit(&mut self);
}
