//! Raw frame shapes for the websocket feed, dispatched on the `type` tag.

use serde::Deserialize;

/// A `[price, size]` book level from a snapshot.
pub type BookLevel = (String, String);

/// A `[side, newPrice, newVolumeAtThatLevel]` change row from an
/// `l2update`. The volume is the *residual* volume at the level, not a
/// delta.
pub type L2Change = (String, String, String);

/// Every frame shape the feed can deliver.
#[derive(Deserialize, Debug)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Frame {
    /// Acknowledgement of a subscribe/unsubscribe request.
    Subscriptions {},
    /// Full initial picture of the book at subscription.
    Snapshot {
        /// Security identifier.
        product_id: String,
        /// Bid levels, best first.
        bids: Vec<BookLevel>,
        /// Ask levels, best first.
        asks: Vec<BookLevel>,
    },
    /// Differential update of a single price level.
    L2update {
        /// Security identifier.
        product_id: String,
        /// Exchange time, ISO-8601.
        time: String,
        /// Change rows; only the first is applied.
        changes: Vec<L2Change>,
    },
    /// Exchange-wide trade print from the ticker channel.
    Ticker {
        /// Security identifier.
        product_id: String,
        /// Exchange time, ISO-8601.
        time: String,
        /// Trade price.
        price: String,
        /// Trade size.
        last_size: String,
        /// Taker side, `buy` or `sell`.
        side: String,
    },
    /// One of our orders was acknowledged by the venue.
    Received {
        /// Venue-assigned order identifier.
        order_id: String,
        /// Security identifier.
        product_id: String,
        /// Exchange time, ISO-8601.
        time: String,
        /// Ordered quantity.
        size: String,
    },
    /// One of our orders is resting on the book.
    Open {
        /// Venue-assigned order identifier.
        order_id: String,
        /// Security identifier.
        product_id: String,
        /// Exchange time, ISO-8601.
        time: String,
        /// Quantity still unfilled.
        remaining_size: String,
    },
    /// One of our orders left the book (filled or canceled).
    Done {
        /// Venue-assigned order identifier.
        order_id: String,
        /// Security identifier.
        product_id: String,
        /// Exchange time, ISO-8601.
        time: String,
    },
    /// A trade print involving one of our orders.
    Match {
        /// Order id of the liquidity provider.
        maker_order_id: String,
        /// Order id of the liquidity taker.
        taker_order_id: String,
        /// Security identifier.
        product_id: String,
        /// Exchange time, ISO-8601.
        time: String,
        /// Fill price.
        price: String,
        /// Fill size.
        size: String,
    },
    /// Venue-reported error; logged, no event.
    Error {},
    /// Anything we do not recognize; logged, no event.
    #[serde(other)]
    Unrecognized,
}
