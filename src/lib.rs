#![allow(
    clippy::module_name_repetitions,
    clippy::cast_sign_loss,
    rustdoc::broken_intra_doc_links
)]
#![warn(
    missing_debug_implementations,
    missing_docs,
    rust_2018_idioms,
    unreachable_pub
)]
#![deny(unused_must_use)]

//! An exchange-adapter runtime for algorithmic trading against CoinbasePro.
//!
//! The crate normalizes the real-time WebSocket feed and the polled REST
//! candle endpoint into one totally-ordered, type-tagged [`events::Event`]
//! stream that a user [`strategy::Strategy`] consumes through lifecycle
//! callbacks, and exposes a thin trading surface (place/query/cancel
//! orders) over the same REST session.
//!
//! To run a strategy, refer to [`crate::adapter::Adapter`].
//!
//! Venue selection (sandbox vs live) is a compile-time switch: build with
//! the `sandbox` feature to target the CoinbasePro sandbox.

pub mod adapter;
pub mod auth;
pub mod config;
pub mod error;
pub mod events;
pub mod orders;
pub mod prelude;
pub mod products;
pub mod rest;
pub mod strategy;
pub mod stream;
pub mod universe;
pub mod utils;
