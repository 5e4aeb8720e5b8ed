//! Composition root: wires auth, connectors, queue, and the strategy.

use std::sync::Arc;

use anyhow::Result;
use parking_lot::RwLock;
use tokio::task::JoinError;

use crate::auth::Auth;
use crate::config::Config;
use crate::events::{queue, Bar, Event};
use crate::orders::{LimitOrder, MarketOrder, OrderDetails, OrderResponse, Status};
use crate::products::{ProductMap, ProductRef};
use crate::rest;
use crate::rest::bars_scheduler::BarsScheduler;
use crate::strategy::Strategy;
use crate::stream;
use crate::stream::handler::Handler;
use crate::universe::Universe;

/// The handle strategies use to trade and to manage their subscriptions.
///
/// One instance is shared by the adapter's workers and passed to every
/// strategy callback.
#[derive(Debug)]
pub struct Trader {
    rest: Arc<rest::Connector>,
    stream: stream::Connector,
    current_universe: Arc<Universe>,
    available_universe: Universe,
    product_map: RwLock<ProductMap>,
}

impl Trader {
    /// Refresh the product map from `GET /products` and return the
    /// universe of every listed product.
    ///
    /// The product map is written here and read-only afterwards; call
    /// this from `on_init`/`on_start` before trading begins.
    ///
    /// # Errors
    ///
    /// Will return `Err` on transport failure or a malformed product
    /// listing.
    pub async fn available_universe(&self) -> Result<Universe> {
        let (product_map, available) = self.rest.get_products().await?;

        *self.product_map.write() = product_map;
        self.available_universe.update(&available);

        Ok(available)
    }

    /// Snapshot of the currently subscribed universe.
    #[must_use]
    pub fn current_universe(&self) -> Universe {
        (*self.current_universe).clone()
    }

    /// Swap the subscribed universe: unsubscribe the old set, replace it,
    /// subscribe the new one. This is the only mutator of the current
    /// universe; call it from strategy callbacks.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the stream is not connected.
    pub fn update_universe(&self, universe: &Universe) -> Result<()> {
        self.stream.unsubscribe_products(&self.current_universe)?;
        self.current_universe.update(universe);
        self.stream.subscribe_products(&self.current_universe)
    }

    /// Details for one product; `None` if the venue does not list it.
    #[must_use]
    pub fn lookup_product_details(&self, product_id: &str) -> Option<ProductRef> {
        self.product_map.read().get(product_id).cloned()
    }

    /// Historical bars for one product between two ISO timestamps.
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
        self.rest.get_bars(product_id, granularity, start, end).await
    }

    /// Place a limit order.
    ///
    /// # Errors
    ///
    /// Will return `Err` on transport failure; rejections come back as
    /// classified [`OrderResponse`] codes.
    pub async fn place_limit_order(&self, order: &LimitOrder) -> Result<OrderResponse> {
        self.rest.place_limit_order(order).await
    }

    /// Place a market order.
    ///
    /// # Errors
    ///
    /// Will return `Err` on transport failure; rejections come back as
    /// classified [`OrderResponse`] codes.
    pub async fn place_market_order(&self, order: &MarketOrder) -> Result<OrderResponse> {
        self.rest.place_market_order(order).await
    }

    /// Query one of our orders.
    ///
    /// # Errors
    ///
    /// Will return `Err` on transport failure.
    pub async fn get_order(&self, order_id: &str) -> Result<Option<OrderDetails>> {
        self.rest.get_order(order_id).await
    }

    /// Query our orders, optionally filtered by product and status.
    ///
    /// # Errors
    ///
    /// Will return `Err` on transport failure.
    pub async fn get_all_orders(
        &self,
        product_id: Option<&str>,
        status: Option<Status>,
    ) -> Result<Vec<OrderDetails>> {
        self.rest.get_all_orders(product_id, status).await
    }

    /// Cancel one order; `false` if the venue rejected the cancel.
    ///
    /// # Errors
    ///
    /// Will return `Err` on transport failure.
    pub async fn cancel_order(&self, order_id: &str) -> Result<bool> {
        self.rest.cancel_order(order_id).await
    }

    /// Cancel every open order, optionally scoped to one product.
    /// Returns the canceled order ids.
    ///
    /// # Errors
    ///
    /// Will return `Err` on transport failure.
    pub async fn cancel_all_orders(&self, product_id: Option<&str>) -> Result<Vec<String>> {
        self.rest.cancel_all_orders(product_id).await
    }
}

/// The runtime: owns the strategy and the event queue, wires the stream
/// handler and the bars scheduler, and supervises the worker tasks.
pub struct Adapter {
    trader: Arc<Trader>,
    strategy: Box<dyn Strategy>,
    events_tx: queue::Sender,
    events_rx: queue::Receiver,
}

impl std::fmt::Debug for Adapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Adapter")
            .field("trader", &self.trader)
            .finish_non_exhaustive()
    }
}

impl Adapter {
    /// Construct the adapter from loaded configuration and run the
    /// strategy's `on_init` before any I/O.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the configured secret key is not valid
    /// Base64 (fatal at construction).
    pub async fn new(config: &Config, mut strategy: Box<dyn Strategy>) -> Result<Self> {
        let auth = Arc::new(Auth::new(config.active_credentials())?);
        let (events_tx, events_rx) = queue::bounded();

        let trader = Arc::new(Trader {
            rest: Arc::new(rest::Connector::new(Arc::clone(&auth))),
            stream: stream::Connector::new(auth),
            current_universe: Arc::new(Universe::new()),
            available_universe: Universe::new(),
            product_map: RwLock::new(ProductMap::new()),
        });

        strategy.on_init(&trader).await;

        Ok(Self {
            trader,
            strategy,
            events_tx,
            events_rx,
        })
    }

    /// The trader handle, for wiring outside of callbacks.
    #[must_use]
    pub fn trader(&self) -> &Arc<Trader> {
        &self.trader
    }

    /// Connect the stream, run `on_start`, spawn the bar poller and the
    /// stream reader, and feed the strategy on the calling task.
    ///
    /// Never returns in nominal operation: the first worker failure logs
    /// its component message, runs `on_exit`, and terminates the process
    /// with exit code 1.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the initial stream connection fails.
    pub async fn run(self) -> Result<()> {
        let Self {
            trader,
            mut strategy,
            events_tx,
            mut events_rx,
        } = self;

        let reader = trader.stream.connect().await?;
        strategy.on_start(&trader).await;

        let scheduler = BarsScheduler::new(
            Arc::clone(&trader.rest),
            Arc::clone(&trader.current_universe),
            events_tx.clone(),
        );
        let scheduler_handle = tokio::spawn(scheduler.query_bars_forever());

        let handler = Handler::new(events_tx.clone());
        let stream_trader = Arc::clone(&trader);
        let stream_handle =
            tokio::spawn(async move { stream_trader.stream.stream_forever(reader, handler).await });

        // The feed loop runs here and never finishes (this adapter still
        // holds a queue sender), so the select resolves only when a
        // worker dies.
        let failure_message;
        tokio::select! {
            outcome = scheduler_handle => {
                failure_message = "[ERROR] Scheduler bars querying failed.";
                log::error!("{}", worker_error(&outcome));
            }
            outcome = stream_handle => {
                failure_message = "[ERROR] Stream connector failed.";
                log::error!("{}", worker_error(&outcome));
            }
            _ = feed_strategy_forever(&mut strategy, &trader, &mut events_rx) => {
                failure_message = "[ERROR] Event queue closed.";
            }
        }

        log::error!("{failure_message}");
        strategy.on_exit().await;
        std::process::exit(1);
    }
}

/// Dequeue events forever, dispatching each to the matching strategy
/// callback on this task.
async fn feed_strategy_forever(
    strategy: &mut Box<dyn Strategy>,
    trader: &Arc<Trader>,
    events: &mut queue::Receiver,
) {
    while let Some(event) = events.dequeue().await {
        match event {
            Event::Bar(bar) => strategy.on_bar(trader, bar).await,
            Event::Tick(tick) => strategy.on_tick(trader, tick).await,
            Event::Trade(trade) => strategy.on_trade(trader, trade).await,
            Event::OrderStatus(order_status) => {
                strategy.on_order_status(trader, order_status).await;
            }
            Event::Transaction(transaction) => {
                strategy.on_transaction(trader, transaction).await;
            }
        }
    }
}

fn worker_error(outcome: &Result<Result<()>, JoinError>) -> String {
    match outcome {
        Ok(Ok(())) => "worker returned unexpectedly".to_owned(),
        Ok(Err(error)) => format!("{error:#}"),
        Err(join_error) => join_error.to_string(),
    }
}
