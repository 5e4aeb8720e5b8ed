//! Signature and header properties of the authenticator.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use coinbasepro_connect::auth::Auth;
use coinbasepro_connect::config::Credentials;
use coinbasepro_connect::prelude::{HmacSha256, Mac};

fn credentials() -> Credentials {
    Credentials {
        api_key: "the-api-key".to_owned(),
        pass_phrase: "the-passphrase".to_owned(),
        secret_key: BASE64.encode(b"super-secret-hmac-key"),
    }
}

fn expected_signature(key: &[u8], message: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(key).unwrap();
    mac.update(message.as_bytes());

    BASE64
        .encode(mac.finalize().into_bytes())
        .replace([' ', '\n'], "")
}

#[test]
fn sign_uses_decoded_secret_and_strips_whitespace() {
    let auth = Auth::new(&credentials()).unwrap();

    let signature = auth.sign("1641471180GET/orders");

    assert_eq!(
        signature,
        expected_signature(b"super-secret-hmac-key", "1641471180GET/orders")
    );
    assert!(!signature.contains(' '));
    assert!(!signature.contains('\n'));
}

#[test]
fn invalid_base64_secret_is_fatal_at_construction() {
    let mut bad = credentials();
    bad.secret_key = "not;;;base64".to_owned();

    assert!(Auth::new(&bad).is_err());
}

#[test]
fn rest_headers_carry_the_full_set() {
    let auth = Auth::new(&credentials()).unwrap();

    let headers = auth.rest_headers("GET", "/orders?status=open", "");
    let lookup = |name: &str| {
        headers
            .iter()
            .find(|(header, _)| *header == name)
            .map(|(_, value)| value.clone())
            .unwrap_or_else(|| panic!("missing header {name}"))
    };

    assert_eq!(lookup("Content-Type"), "application/json");
    assert_eq!(lookup("CB-ACCESS-KEY"), "the-api-key");
    assert_eq!(lookup("CB-ACCESS-PASSPHRASE"), "the-passphrase");

    // The signature must cover timestamp || method || target || body.
    let timestamp = lookup("CB-ACCESS-TIMESTAMP");
    let message = format!("{timestamp}GET/orders?status=open");
    assert_eq!(
        lookup("CB-ACCESS-SIGN"),
        expected_signature(b"super-secret-hmac-key", &message)
    );
}

#[test]
fn rest_headers_include_the_body_in_the_signature() {
    let auth = Auth::new(&credentials()).unwrap();
    let body = r#"{"product_id":"BTC-USD"}"#;

    let headers = auth.rest_headers("POST", "/orders", body);
    let timestamp = &headers
        .iter()
        .find(|(name, _)| *name == "CB-ACCESS-TIMESTAMP")
        .unwrap()
        .1;
    let signature = &headers
        .iter()
        .find(|(name, _)| *name == "CB-ACCESS-SIGN")
        .unwrap()
        .1;

    let message = format!("{timestamp}POST/orders{body}");
    assert_eq!(
        *signature,
        expected_signature(b"super-secret-hmac-key", &message)
    );
}

#[test]
fn ws_auth_fields_sign_the_verify_target() {
    let auth = Auth::new(&credentials()).unwrap();

    let fields = auth.ws_auth_fields();

    assert_eq!(fields.key, "the-api-key");
    assert_eq!(fields.passphrase, "the-passphrase");

    let message = format!("{}GET/users/self/verify", fields.timestamp);
    assert_eq!(
        fields.signature,
        expected_signature(b"super-secret-hmac-key", &message)
    );
}
