//! Minute-aligned bar poller.
//!
//! The feed does not push bars, so this driver queries the candles
//! endpoint for every product in the current universe once per minute and
//! synthesizes [`Bar`] events. Batches fire at the 10th second of the
//! minute, when the previous minute's bar is reliably published.

use std::sync::Arc;

use anyhow::Result;
use futures_util::{stream, StreamExt};
use tokio::time::{sleep, Duration};

use crate::events::{queue, Event};
use crate::rest::{data, Connector, GRANULARITY_MINUTE};
use crate::universe::Universe;
use crate::utils::{epoch_now_ms, epoch_secs_to_iso, MS_IN_MINUTE, SECS_IN_MINUTE};

/// Concurrent bar-query workers per batch. Eight keeps the aggregate
/// request rate under the public 10 req/s cap even with sub-second
/// dispatch bursts.
#[cfg(not(feature = "sandbox"))]
pub const BAR_QUERY_POOL: usize = 8;
/// Concurrent bar-query workers per batch; the sandbox caps lower.
#[cfg(feature = "sandbox")]
pub const BAR_QUERY_POOL: usize = 2;

/// Milliseconds into the minute at which a batch fires.
const QUERY_OFFSET_MS: u64 = 10_000;
/// Offsets past this roll the first batch into the next minute.
const LATE_CUTOFF_MS: u64 = 50_000;

/// Given the offset into the current minute, the milliseconds to sleep
/// before the first batch and whether that batch belongs to the next
/// minute. Steady state lands every batch in `[:10, :11)`.
#[must_use]
pub fn alignment_sleep(offset_ms: u64) -> (u64, bool) {
    if offset_ms < QUERY_OFFSET_MS {
        (QUERY_OFFSET_MS - offset_ms, false)
    } else if offset_ms > LATE_CUTOFF_MS {
        (MS_IN_MINUTE - offset_ms + QUERY_OFFSET_MS, true)
    } else {
        // Already inside the [:10, :50) window.
        (0, false)
    }
}

/// Cooperative driver enqueuing one synthetic [`Bar`] per product per
/// minute.
#[derive(Debug)]
pub struct BarsScheduler {
    connector: Arc<Connector>,
    current_universe: Arc<Universe>,
    events: queue::Sender,
    current_minute: u64,
}

impl BarsScheduler {
    /// Build the scheduler over the shared connector and the live view of
    /// the subscribed universe.
    #[must_use]
    pub fn new(
        connector: Arc<Connector>,
        current_universe: Arc<Universe>,
        events: queue::Sender,
    ) -> Self {
        Self {
            connector,
            current_universe,
            events,
            current_minute: 0,
        }
    }

    /// Align on the 10th second of the minute, then drive one batch per
    /// minute forever. Per-product failures are logged and skipped; only
    /// a panic in the driver itself reaches the supervisor.
    ///
    /// # Errors
    ///
    /// Never returns in nominal operation.
    pub async fn query_bars_forever(mut self) -> Result<()> {
        let now_ms = epoch_now_ms();
        self.current_minute = now_ms / MS_IN_MINUTE;

        let (sleep_ms, rolled_minute) = alignment_sleep(now_ms % MS_IN_MINUTE);
        if rolled_minute {
            self.current_minute += 1;
        }
        sleep(Duration::from_millis(sleep_ms)).await;

        // First batch runs detached while we re-align on the next
        // minute's mark.
        self.spawn_batch();
        let offset_ms = epoch_now_ms().saturating_sub(self.current_minute * MS_IN_MINUTE);
        sleep(Duration::from_millis(
            MS_IN_MINUTE.saturating_sub(offset_ms) + QUERY_OFFSET_MS,
        ))
        .await;

        loop {
            self.current_minute += 1;
            self.spawn_batch();
            sleep(Duration::from_secs(SECS_IN_MINUTE)).await;
        }
    }

    fn spawn_batch(&self) {
        let connector = Arc::clone(&self.connector);
        let universe = Arc::clone(&self.current_universe);
        let events = self.events.clone();
        let current_minute = self.current_minute;

        tokio::spawn(async move {
            query_batch(&connector, &universe, &events, current_minute).await;
        });
    }
}

/// One rate-limited batch: a candles query per subscribed product, pooled
/// at [`BAR_QUERY_POOL`] concurrent workers over isolated sessions.
async fn query_batch(
    connector: &Arc<Connector>,
    universe: &Universe,
    events: &queue::Sender,
    current_minute: u64,
) {
    // The venue stamps bars with the interval open, so the last closed
    // minute is current_minute - 1; a 5 second window is enough to catch
    // exactly that bar.
    let end_secs = (current_minute - 1) * SECS_IN_MINUTE;
    let end = epoch_secs_to_iso(end_secs);
    let start = epoch_secs_to_iso(end_secs - 5);

    stream::iter(universe.snapshot())
        .for_each_concurrent(BAR_QUERY_POOL, |product_id| {
            let end = end.clone();
            let start = start.clone();

            async move {
                if let Err(error) =
                    query_product_bar(connector, events, &product_id, &start, &end).await
                {
                    log::error!("Bar query failed for {product_id}: {error:#}");
                }
            }
        })
        .await;
}

/// Query one product and enqueue the first (most recent closed minute)
/// bar of the response, if any.
async fn query_product_bar(
    connector: &Connector,
    events: &queue::Sender,
    product_id: &str,
    start: &str,
    end: &str,
) -> Result<()> {
    let body = connector
        .get_raw_bars(product_id, GRANULARITY_MINUTE, start, end)
        .await?;

    let Ok(rows) = serde_json::from_str::<Vec<data::RawBarRow>>(&body) else {
        log::error!("Invalid bars response for {product_id} {body}");
        return Ok(());
    };

    let Some(row) = rows.first() else {
        log::error!("No bars received for {product_id} {body}");
        return Ok(());
    };

    events
        .enqueue(Event::Bar(data::bar_from_row(
            product_id,
            row,
            SECS_IN_MINUTE,
        )))
        .await
}
