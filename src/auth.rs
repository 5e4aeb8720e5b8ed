//! Request authentication for the CoinbasePro venue.
//!
//! REST requests carry the `CB-ACCESS-*` header set; websocket
//! subscriptions carry the same credentials as body fields. Both sign a
//! timestamped message with HMAC-SHA256 keyed by the Base64-decoded secret.

use anyhow::Result;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hmac::Mac;

use crate::config::Credentials;
use crate::error::AdapterError;
use crate::prelude::HmacSha256;
use crate::utils::epoch_now_secs;

/// The fixed request the venue expects websocket subscriptions to sign.
const WS_VERIFY_TARGET: &str = "GET/users/self/verify";

/// Authentication state shared by the REST and stream connectors.
pub struct Auth {
    api_key: String,
    pass_phrase: String,
    /// Base64-decoded secret, used directly as the HMAC key.
    secret_key: Vec<u8>,
}

impl std::fmt::Debug for Auth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print credentials.
        f.debug_struct("Auth").finish_non_exhaustive()
    }
}

/// Credential fields attached to a websocket subscription frame.
#[derive(Debug, serde::Serialize)]
pub struct WsAuthFields {
    /// Seconds since epoch, as a string.
    pub timestamp: String,
    /// User API key.
    pub key: String,
    /// Base64 HMAC over `timestamp || "GET" || "/users/self/verify"`.
    pub signature: String,
    /// API key passphrase.
    pub passphrase: String,
}

impl Auth {
    /// Build the authenticator from a credential block, decoding the
    /// Base64 secret.
    ///
    /// # Errors
    ///
    /// Will return [`AdapterError::InvalidSecretKey`] if the configured
    /// secret is not valid Base64. This is fatal at construction.
    pub fn new(credentials: &Credentials) -> Result<Self> {
        let secret_key = BASE64
            .decode(credentials.secret_key.trim())
            .map_err(|_| AdapterError::InvalidSecretKey)?;

        Ok(Self {
            api_key: credentials.api_key.clone(),
            pass_phrase: credentials.pass_phrase.clone(),
            secret_key,
        })
    }

    /// Seconds since the UNIX epoch as a string (CoinbasePro signs with
    /// second precision).
    #[must_use]
    pub fn timestamp_string() -> String {
        epoch_now_secs().to_string()
    }

    /// Base64-encoded HMAC-SHA256 of `message`, keyed by the decoded
    /// secret, with whitespace stripped.
    #[must_use]
    pub fn sign(&self, message: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(&self.secret_key)
            .expect("HMAC accepts keys of any length");
        mac.update(message.as_bytes());

        let mut signature = BASE64.encode(mac.finalize().into_bytes());
        signature.retain(|character| character != ' ' && character != '\n');

        signature
    }

    /// The header set for an authenticated REST request. `request_target`
    /// includes the query string; `body` is empty for bodiless methods.
    ///
    /// Signed string: `timestamp || HTTP_METHOD || request_target || body`.
    #[must_use]
    pub fn rest_headers(
        &self,
        method: &str,
        request_target: &str,
        body: &str,
    ) -> Vec<(&'static str, String)> {
        let timestamp = Self::timestamp_string();
        let message = format!("{timestamp}{method}{request_target}{body}");
        let signature = self.sign(&message);

        vec![
            ("Content-Type", "application/json".to_owned()),
            ("CB-ACCESS-KEY", self.api_key.clone()),
            ("CB-ACCESS-TIMESTAMP", timestamp),
            ("CB-ACCESS-SIGN", signature),
            ("CB-ACCESS-PASSPHRASE", self.pass_phrase.clone()),
        ]
    }

    /// The credential fields for a websocket subscription frame, signing
    /// the venue's fixed verification target.
    #[must_use]
    pub fn ws_auth_fields(&self) -> WsAuthFields {
        let timestamp = Self::timestamp_string();
        let signature = self.sign(&format!("{timestamp}{WS_VERIFY_TARGET}"));

        WsAuthFields {
            timestamp,
            key: self.api_key.clone(),
            signature,
            passphrase: self.pass_phrase.clone(),
        }
    }
}
