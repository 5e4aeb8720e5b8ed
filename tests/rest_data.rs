//! Decoding of REST response bodies: order classification, candle rows,
//! order details.

use coinbasepro_connect::orders::{OrderDetails, ResponseCode, Side, Status, Type};
use coinbasepro_connect::rest::data::{
    bar_from_row, decode_order_response, RawBarRow, RawOrderDetails,
};

#[test]
fn order_response_without_message_is_success() {
    let response = decode_order_response(r#"{"id":"abc","status":"pending"}"#);

    assert_eq!(response.id, "abc");
    assert_eq!(response.code, ResponseCode::Success);
}

#[test]
fn order_response_classifies_insufficient_funds() {
    let response = decode_order_response(r#"{"message":"Insufficient funds"}"#);

    assert_eq!(response.id, "");
    assert_eq!(response.code, ResponseCode::InsufficientFunds);
}

#[test]
fn order_response_classifies_invalid_product() {
    let response = decode_order_response(r#"{"message":"product_id is not a valid product"}"#);

    assert_eq!(response.code, ResponseCode::InvalidProduct);
}

#[test]
fn order_response_classifies_unauthorized_variants() {
    for message in [
        "Unauthorized.",
        "Invalid API Key",
        "invalid signature",
        "Invalid Passphrase",
        "invalid timestamp",
    ] {
        let body = format!(r#"{{"message":"{message}"}}"#);
        assert_eq!(
            decode_order_response(&body).code,
            ResponseCode::Unauthorized,
            "message {message:?} should classify as unauthorized"
        );
    }
}

#[test]
fn order_response_falls_back_to_unforeseen_failure() {
    let response = decode_order_response(r#"{"message":"sandbox is on fire"}"#);

    assert_eq!(response.code, ResponseCode::UnforeseenFailure);
}

#[test]
fn candle_rows_parse_and_offset_to_close_time() {
    let body = "[[1704067140, 100.0, 102.0, 101.0, 101.5, 5.0], [1704067080, 99.0, 101.0, 100.0, 100.5, 2.0]]";
    let rows: Vec<RawBarRow> = serde_json::from_str(body).unwrap();

    // Scheduler call: epoch shifted to the interval close.
    let bar = bar_from_row("BTC-USD", &rows[0], 60);
    assert_eq!(bar.epoch_time_ns, (1_704_067_140 + 60) * 1_000_000_000);
    assert_eq!(bar.product_id, "BTC-USD");
    assert_eq!(bar.open, 101.0);
    assert_eq!(bar.high, 102.0);
    assert_eq!(bar.low, 100.0);
    assert_eq!(bar.close, 101.5);
    assert_eq!(bar.volume, 5.0);

    // Historical call: raw interval-start epoch.
    let historical = bar_from_row("BTC-USD", &rows[1], 0);
    assert_eq!(historical.epoch_time_ns, 1_704_067_080 * 1_000_000_000);
}

#[test]
fn limit_order_details_decode() {
    let raw: RawOrderDetails = serde_json::from_str(
        r#"{
            "id": "c8c4effb-fb92-4413-8f03-af876f05757f",
            "price": "49999",
            "size": "0.00100000",
            "product_id": "BTC-USD",
            "side": "sell",
            "type": "limit",
            "created_at": "2022-01-09T09:13:00.400937Z",
            "fill_fees": "0.0000000000000000",
            "filled_size": "0.00000000",
            "executed_value": "0.0000000000000000",
            "status": "done",
            "settled": false
        }"#,
    )
    .unwrap();

    let details = OrderDetails::try_from(raw).unwrap();

    assert_eq!(details.id, "c8c4effb-fb92-4413-8f03-af876f05757f");
    assert_eq!(details.order_type, Type::Limit);
    assert_eq!(details.side, Side::Sell);
    assert_eq!(details.status, Status::Done);
    assert_eq!(details.security_id, "BTC-USD");
    assert_eq!(details.price, 49999.0);
    assert_eq!(details.quantity, 0.001);
    assert_eq!(details.quantity_filled, 0.0);
    assert_eq!(details.fees, 0.0);
    assert_eq!(details.epoch_time_ns, 1_641_719_580_400_937_000);
}

#[test]
fn market_order_details_have_zero_price() {
    let raw: RawOrderDetails = serde_json::from_str(
        r#"{
            "id": "ee463aed-7a5d-4bb3-a320-5695f2ef7646",
            "size": "1.23",
            "product_id": "BTC-USD",
            "side": "buy",
            "type": "market",
            "created_at": "2022-01-07T13:56:17.598637Z",
            "fill_fees": "0.5",
            "filled_size": "1.23",
            "status": "open"
        }"#,
    )
    .unwrap();

    let details = OrderDetails::try_from(raw).unwrap();

    assert_eq!(details.order_type, Type::Market);
    assert_eq!(details.side, Side::Buy);
    assert_eq!(details.status, Status::Open);
    assert_eq!(details.price, 0.0);
    assert_eq!(details.quantity_filled, 1.23);
}

#[test]
fn unmodeled_status_decodes_as_unknown() {
    let raw: RawOrderDetails = serde_json::from_str(
        r#"{
            "id": "x",
            "price": "1",
            "size": "1",
            "product_id": "BTC-USD",
            "side": "buy",
            "type": "limit",
            "created_at": "2022-01-09T09:13:00Z",
            "fill_fees": "0",
            "filled_size": "0",
            "status": "pending"
        }"#,
    )
    .unwrap();

    assert_eq!(OrderDetails::try_from(raw).unwrap().status, Status::Unknown);
}
