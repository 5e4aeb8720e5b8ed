//! Crate config module: `config.yaml` credentials and venue endpoints.
//!
//! The active venue profile is selected at compile time with the `sandbox`
//! cargo feature, which switches the REST/WS hosts, the credential block
//! read from the configuration file, and the bar-query pool size.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// REST API base URL for the selected profile.
#[cfg(feature = "sandbox")]
pub const REST_URL: &str = "https://api-public.sandbox.exchange.coinbase.com";
/// REST API base URL for the selected profile.
#[cfg(not(feature = "sandbox"))]
pub const REST_URL: &str = "https://api.exchange.coinbase.com";

/// Websocket feed URL for the selected profile.
#[cfg(feature = "sandbox")]
pub const WS_URL: &str = "wss://ws-feed-public.sandbox.exchange.coinbase.com";
/// Websocket feed URL for the selected profile.
#[cfg(not(feature = "sandbox"))]
pub const WS_URL: &str = "wss://ws-feed.exchange.coinbase.com";

/// The whole configuration file.
#[derive(Deserialize, Debug)]
pub struct Config {
    /// Per-venue credential blocks.
    pub coinbasepro: VenueConfig,
}

/// The `coinbasepro` section of the configuration file.
#[derive(Deserialize, Debug)]
pub struct VenueConfig {
    /// Credentials for the sandbox venue.
    pub sandbox: Credentials,
    /// Credentials for the live venue.
    pub live: Credentials,
}

/// One credential block. The secret key is stored Base64-encoded, exactly
/// as the venue hands it out; [`crate::auth::Auth`] decodes it.
#[derive(Deserialize, Debug, Clone)]
pub struct Credentials {
    /// User API key.
    #[serde(rename = "apiKey")]
    pub api_key: String,
    /// API key passphrase.
    #[serde(rename = "passPhrase")]
    pub pass_phrase: String,
    /// Base64-encoded secret key.
    #[serde(rename = "secretKey")]
    pub secret_key: String,
}

impl Config {
    /// Load and parse the configuration file.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the file cannot be read or is not valid YAML of
    /// the expected shape. Both are fatal at construction.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;

        serde_yaml::from_str(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// The credential block matching the compiled venue profile.
    #[must_use]
    pub fn active_credentials(&self) -> &Credentials {
        #[cfg(feature = "sandbox")]
        {
            &self.coinbasepro.sandbox
        }
        #[cfg(not(feature = "sandbox"))]
        {
            &self.coinbasepro.live
        }
    }
}
