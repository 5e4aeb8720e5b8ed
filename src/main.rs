//! Thin CLI: wire a demo strategy into the adapter and run it.

use anyhow::Result;
use async_trait::async_trait;

use coinbasepro_connect::adapter::{Adapter, Trader};
use coinbasepro_connect::config::Config;
use coinbasepro_connect::events::{Bar, OrderStatus, Tick, Trade, Transaction};
use coinbasepro_connect::strategy::Strategy;
use coinbasepro_connect::universe::Universe;

/// Products the demo subscribes to at start, if the venue lists them.
const DEMO_PRODUCTS: [&str; 2] = ["BTC-USD", "ETH-USD"];

/// A strategy that subscribes a small fixed universe and logs every
/// event it is fed.
#[derive(Debug, Default)]
struct DemoStrategy;

#[async_trait]
impl Strategy for DemoStrategy {
    async fn on_init(&mut self, _trader: &Trader) {
        log::info!("[On Init]");
    }

    async fn on_start(&mut self, trader: &Trader) {
        log::info!("[On Start]");

        match trader.available_universe().await {
            Ok(available) => {
                let wanted: Universe = DEMO_PRODUCTS.iter().copied().collect();
                wanted.intersection(&available);

                if let Err(error) = trader.update_universe(&wanted) {
                    log::error!("Failed to subscribe demo universe: {error:#}");
                }
            }
            Err(error) => log::error!("Failed to fetch available universe: {error:#}"),
        }
    }

    async fn on_bar(&mut self, _trader: &Trader, bar: Bar) {
        log::info!("{bar}");
    }

    async fn on_tick(&mut self, _trader: &Trader, tick: Tick) {
        log::info!("{tick}");
    }

    async fn on_trade(&mut self, _trader: &Trader, trade: Trade) {
        log::info!("{trade}");
    }

    async fn on_order_status(&mut self, _trader: &Trader, order_status: OrderStatus) {
        log::info!("{order_status}");
    }

    async fn on_transaction(&mut self, _trader: &Trader, transaction: Transaction) {
        log::info!("{transaction}");
    }

    async fn on_exit(&mut self) {
        log::info!("[On Exit]");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::load("config.yaml")?;
    let adapter = Adapter::new(&config, Box::new(DemoStrategy)).await?;

    adapter.run().await
}
