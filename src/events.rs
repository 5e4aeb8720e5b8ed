//! Typed market and account events, and the queue that serializes them.
//!
//! All epoch times are nanoseconds since the UNIX epoch.

use std::fmt;

use crate::orders::Status;

/// Aggregate of the trades in one interval; `epoch_time_ns` is the close
/// time of the interval.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    /// Close time of the aggregation interval, ns since epoch.
    pub epoch_time_ns: u64,
    /// Security identifier, e.g. `BTC-USD`.
    pub product_id: String,
    /// Open price.
    pub open: f64,
    /// High price.
    pub high: f64,
    /// Low price.
    pub low: f64,
    /// Close price.
    pub close: f64,
    /// Traded volume.
    pub volume: f64,
}

impl fmt::Display for Bar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Time since epoch: {} | Security ID: {} | Open: {} | High: {} | Low: {} | Close: {} | Volume: {}",
            self.epoch_time_ns, self.product_id, self.open, self.high, self.low, self.close, self.volume
        )
    }
}

/// Top-of-book snapshot after an update; `is_buy_side` marks which side
/// triggered it.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    /// Exchange time of the update, ns since epoch.
    pub epoch_time_ns: u64,
    /// Security identifier.
    pub product_id: String,
    /// Best bid price.
    pub bid: f64,
    /// Best ask price.
    pub ask: f64,
    /// Residual volume at the best bid.
    pub bid_volume: f64,
    /// Residual volume at the best ask.
    pub ask_volume: f64,
    /// Whether the bid side triggered this update.
    pub is_buy_side: bool,
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Time since epoch: {} | Security ID: {} | Bid Price: {} | Ask Price: {} | Bid Volume: {} | Ask Volume: {} | isBuySide: {}",
            self.epoch_time_ns, self.product_id, self.bid, self.ask, self.bid_volume, self.ask_volume, self.is_buy_side
        )
    }
}

/// An exchange-wide trade print.
#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    /// Exchange time of the trade, ns since epoch.
    pub epoch_time_ns: u64,
    /// Security identifier.
    pub product_id: String,
    /// Price of the trade.
    pub last_price: f64,
    /// Size of the trade.
    pub last_size: f64,
    /// Whether the taker bought.
    pub is_buy_side: bool,
}

impl fmt::Display for Trade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Time since epoch: {} | Security ID: {} | Last Price: {} | Last Size: {} | isBuySide: {}",
            self.epoch_time_ns, self.product_id, self.last_price, self.last_size, self.is_buy_side
        )
    }
}

/// Lifecycle update for one of our own orders.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderStatus {
    /// Exchange order identifier.
    pub order_id: String,
    /// Exchange time of the update, ns since epoch.
    pub epoch_time_ns: u64,
    /// Security identifier.
    pub product_id: String,
    /// Where the order is in its lifecycle.
    pub status: Status,
    /// Quantity not yet filled.
    pub quantity_left: f64,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Time since epoch: {} | Security ID: {} | Order ID: {} | Status: {} | Quantity Left: {}",
            self.epoch_time_ns, self.product_id, self.order_id, self.status, self.quantity_left
        )
    }
}

/// A fill against one of our own orders.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// Our order identifier (maker or taker side, whichever is ours).
    pub order_id: String,
    /// Exchange time of the fill, ns since epoch.
    pub epoch_time_ns: u64,
    /// Security identifier.
    pub product_id: String,
    /// Fill price.
    pub price: f64,
    /// Fill quantity.
    pub quantity: f64,
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Time since epoch: {} | Security ID: {} | Order ID: {} | Price: {} | Quantity: {}",
            self.epoch_time_ns, self.product_id, self.order_id, self.price, self.quantity
        )
    }
}

/// The tagged union every producer enqueues and the feeder demultiplexes.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Interval aggregate synthesized by the bars scheduler.
    Bar(Bar),
    /// Top-of-book update derived from the level2 channel.
    Tick(Tick),
    /// Exchange-wide trade print from the ticker channel.
    Trade(Trade),
    /// Own-order lifecycle update from the user channel.
    OrderStatus(OrderStatus),
    /// Own-order fill from the user channel.
    Transaction(Transaction),
}

pub mod queue {
    //! Bounded, blocking multi-producer / single-consumer event queue.
    //!
    //! Dequeue order equals enqueue order; a full queue blocks producers
    //! (events are never dropped), an empty queue blocks the consumer.
    //! The queue is never closed by the pipeline; the process terminates
    //! to stop it.

    use anyhow::Result;
    use tokio::sync::mpsc;

    use super::Event;
    use crate::error::AdapterError;

    /// Maximum number of queued events before producers block.
    pub const CAPACITY: usize = 1000;

    /// Create the event queue, returning the producer and consumer halves.
    #[must_use]
    pub fn bounded() -> (Sender, Receiver) {
        let (tx, rx) = mpsc::channel(CAPACITY);

        (Sender { tx }, Receiver { rx })
    }

    /// Cloneable producer half.
    #[derive(Debug, Clone)]
    pub struct Sender {
        tx: mpsc::Sender<Event>,
    }

    impl Sender {
        /// Place an event at the back of the queue, waiting while the
        /// queue is at capacity.
        ///
        /// # Errors
        ///
        /// Will return [`AdapterError::QueueClosed`] if the consumer half
        /// has been dropped (the pipeline is already shutting down).
        pub async fn enqueue(&self, event: Event) -> Result<()> {
            self.tx
                .send(event)
                .await
                .map_err(|_| AdapterError::QueueClosed.into())
        }
    }

    /// Single consumer half.
    #[derive(Debug)]
    pub struct Receiver {
        rx: mpsc::Receiver<Event>,
    }

    impl Receiver {
        /// Take the event at the front of the queue, waiting while the
        /// queue is empty. Returns `None` once every producer is gone.
        pub async fn dequeue(&mut self) -> Option<Event> {
            self.rx.recv().await
        }
    }
}
