//! Datetime conversion round trips.

use coinbasepro_connect::utils::{epoch_secs_to_iso, iso_to_epoch_ns};

#[test]
fn iso_to_epoch_ns_handles_whole_seconds() {
    assert_eq!(
        iso_to_epoch_ns("2024-01-01T00:00:00.000Z").unwrap(),
        1_704_067_200_000_000_000
    );
    assert_eq!(
        iso_to_epoch_ns("2024-01-01T00:00:00Z").unwrap(),
        1_704_067_200_000_000_000
    );
}

#[test]
fn iso_to_epoch_ns_keeps_fractional_seconds() {
    assert_eq!(
        iso_to_epoch_ns("2017-09-02T17:05:49.250000Z").unwrap(),
        1_504_371_949_250_000_000
    );
    assert_eq!(
        iso_to_epoch_ns("2022-01-07T13:56:17.598637Z").unwrap(),
        1_641_563_777_598_637_000
    );
}

#[test]
fn iso_to_epoch_ns_rejects_garbage() {
    assert!(iso_to_epoch_ns("yesterday at noon").is_err());
    assert!(iso_to_epoch_ns("").is_err());
}

#[test]
fn epoch_secs_to_iso_formats_the_candle_window() {
    assert_eq!(epoch_secs_to_iso(1_704_067_140), "2023-12-31T23:59:00");
    assert_eq!(epoch_secs_to_iso(0), "1970-01-01T00:00:00");
}

#[test]
fn iso_round_trip() {
    let epoch_secs = 1_704_067_140;
    let iso = format!("{}Z", epoch_secs_to_iso(epoch_secs));

    assert_eq!(
        iso_to_epoch_ns(&iso).unwrap(),
        epoch_secs * 1_000_000_000
    );
}
