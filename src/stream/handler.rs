//! Per-frame decoder producing typed events.
//!
//! The handler is owned by the single stream-reader task; the tick
//! tracker and the self-order set are therefore unshared state.

use std::collections::{HashMap, HashSet};

use anyhow::Result;

use crate::error::AdapterError;
use crate::events::{queue, Event, OrderStatus, Tick, Trade, Transaction};
use crate::orders::Status;
use crate::stream::data::{BookLevel, Frame, L2Change};
use crate::utils::iso_to_epoch_ns;

/// Decodes raw feed frames into events on the queue.
#[derive(Debug)]
pub struct Handler {
    events: queue::Sender,
    /// Last known top-of-book per product, seeded by `snapshot` frames.
    /// An `l2update` arriving before its snapshot is dropped.
    tick_tracker: HashMap<String, Tick>,
    /// Ids of our in-flight orders: `received` seen, `done` not yet.
    /// Decides maker/taker attribution for `match` frames.
    my_order_ids: HashSet<String>,
}

impl Handler {
    /// Build a handler enqueuing onto `events`.
    #[must_use]
    pub fn new(events: queue::Sender) -> Self {
        Self {
            events,
            tick_tracker: HashMap::new(),
            my_order_ids: HashSet::new(),
        }
    }

    /// Decode one raw frame and enqueue whatever events it produces.
    ///
    /// Malformed frames are logged and dropped; the read loop must not
    /// die from one bad message.
    pub async fn on_message(&mut self, message: &str) {
        let frame = match serde_json::from_str::<Frame>(message) {
            Ok(frame) => frame,
            Err(error) => {
                log::error!("Failed to decode stream frame: {error} | {message}");
                return;
            }
        };

        let outcome = match frame {
            Frame::Subscriptions {} => {
                log::info!("subscription event: {message}");
                Ok(())
            }
            Frame::Snapshot {
                product_id,
                bids,
                asks,
            } => self.handle_snapshot(product_id, &bids, &asks),
            Frame::L2update {
                product_id,
                time,
                changes,
            } => self.handle_tick(&product_id, &time, &changes).await,
            Frame::Ticker {
                product_id,
                time,
                price,
                last_size,
                side,
            } => self.handle_trade(product_id, &time, &price, &last_size, &side).await,
            Frame::Received {
                order_id,
                product_id,
                time,
                size,
            } => self.handle_order_receipt(order_id, product_id, &time, &size).await,
            Frame::Open {
                order_id,
                product_id,
                time,
                remaining_size,
            } => {
                self.handle_order_open(order_id, product_id, &time, &remaining_size)
                    .await
            }
            Frame::Done {
                order_id,
                product_id,
                time,
            } => self.handle_order_done(order_id, product_id, &time).await,
            Frame::Match {
                maker_order_id,
                taker_order_id,
                product_id,
                time,
                price,
                size,
            } => {
                self.handle_order_match(
                    maker_order_id,
                    taker_order_id,
                    product_id,
                    &time,
                    &price,
                    &size,
                )
                .await
            }
            Frame::Error {} => {
                log::error!("Error encountered: {message}");
                Ok(())
            }
            Frame::Unrecognized => {
                log::warn!("Unrecognized event: {message}");
                Ok(())
            }
        };

        if let Err(error) = outcome {
            log::error!("Failed to process stream frame: {error:#} | {message}");
        }
    }

    /// Record the best levels of a book snapshot; no event is emitted.
    /// The snapshot only seeds the tracker for subsequent updates.
    fn handle_snapshot(
        &mut self,
        product_id: String,
        bids: &[BookLevel],
        asks: &[BookLevel],
    ) -> Result<()> {
        let (bid, bid_volume) = best_level(bids, "bids")?;
        let (ask, ask_volume) = best_level(asks, "asks")?;

        self.tick_tracker.insert(
            product_id.clone(),
            Tick {
                epoch_time_ns: 0,
                product_id,
                bid,
                ask,
                bid_volume,
                ask_volume,
                is_buy_side: true,
            },
        );

        Ok(())
    }

    /// Apply the first change row of an `l2update` to the tracked
    /// top-of-book and enqueue the updated tick.
    async fn handle_tick(
        &mut self,
        product_id: &str,
        time: &str,
        changes: &[L2Change],
    ) -> Result<()> {
        // Updates racing ahead of their snapshot are dropped.
        let Some(current_tick) = self.tick_tracker.get_mut(product_id) else {
            return Ok(());
        };

        let (side, updated_price, updated_volume) = changes
            .first()
            .ok_or(AdapterError::MalformedField("changes"))?;
        let updated_price: f64 = updated_price.parse().map_err(AdapterError::from)?;
        let updated_volume: f64 = updated_volume.parse().map_err(AdapterError::from)?;

        // A zero residual means the level evaporated; we track only the
        // top of the book, so there is nothing to report.
        if updated_volume == 0.0 {
            return Ok(());
        }

        current_tick.epoch_time_ns = iso_to_epoch_ns(time)?;

        if side.as_str() == "buy" {
            current_tick.bid = updated_price;
            current_tick.bid_volume = updated_volume;
            current_tick.is_buy_side = true;
        } else {
            current_tick.ask = updated_price;
            current_tick.ask_volume = updated_volume;
            current_tick.is_buy_side = false;
        }

        let tick = current_tick.clone();
        self.events.enqueue(Event::Tick(tick)).await
    }

    async fn handle_trade(
        &mut self,
        product_id: String,
        time: &str,
        price: &str,
        last_size: &str,
        side: &str,
    ) -> Result<()> {
        let trade = Trade {
            epoch_time_ns: iso_to_epoch_ns(time)?,
            product_id,
            last_price: price.parse().map_err(AdapterError::from)?,
            last_size: last_size.parse().map_err(AdapterError::from)?,
            is_buy_side: side == "buy",
        };

        self.events.enqueue(Event::Trade(trade)).await
    }

    /// Track the order id and report the receipt.
    async fn handle_order_receipt(
        &mut self,
        order_id: String,
        product_id: String,
        time: &str,
        size: &str,
    ) -> Result<()> {
        self.my_order_ids.insert(order_id.clone());

        let order_status = OrderStatus {
            order_id,
            epoch_time_ns: iso_to_epoch_ns(time)?,
            product_id,
            status: Status::Received,
            quantity_left: size.parse().map_err(AdapterError::from)?,
        };

        self.events.enqueue(Event::OrderStatus(order_status)).await
    }

    async fn handle_order_open(
        &mut self,
        order_id: String,
        product_id: String,
        time: &str,
        remaining_size: &str,
    ) -> Result<()> {
        let order_status = OrderStatus {
            order_id,
            epoch_time_ns: iso_to_epoch_ns(time)?,
            product_id,
            status: Status::Open,
            quantity_left: remaining_size.parse().map_err(AdapterError::from)?,
        };

        self.events.enqueue(Event::OrderStatus(order_status)).await
    }

    /// Stop tracking the order id and report completion.
    async fn handle_order_done(
        &mut self,
        order_id: String,
        product_id: String,
        time: &str,
    ) -> Result<()> {
        self.my_order_ids.remove(&order_id);

        let order_status = OrderStatus {
            order_id,
            epoch_time_ns: iso_to_epoch_ns(time)?,
            product_id,
            status: Status::Done,
            quantity_left: 0.0,
        };

        self.events.enqueue(Event::OrderStatus(order_status)).await
    }

    /// Attribute the fill to our side of the match: maker if the maker
    /// order id is ours, taker otherwise.
    async fn handle_order_match(
        &mut self,
        maker_order_id: String,
        taker_order_id: String,
        product_id: String,
        time: &str,
        price: &str,
        size: &str,
    ) -> Result<()> {
        let is_maker = self.my_order_ids.contains(&maker_order_id);

        let transaction = Transaction {
            order_id: if is_maker {
                maker_order_id
            } else {
                taker_order_id
            },
            epoch_time_ns: iso_to_epoch_ns(time)?,
            product_id,
            price: price.parse().map_err(AdapterError::from)?,
            quantity: size.parse().map_err(AdapterError::from)?,
        };

        self.events.enqueue(Event::Transaction(transaction)).await
    }
}

fn best_level(levels: &[BookLevel], field: &'static str) -> Result<(f64, f64)> {
    let (price, volume) = levels.first().ok_or(AdapterError::MalformedField(field))?;

    Ok((
        price.parse().map_err(AdapterError::from)?,
        volume.parse().map_err(AdapterError::from)?,
    ))
}
