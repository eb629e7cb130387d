//! Command-translation tests against the mock adapter.
//!
//! Each test drives the driver through its public API and asserts on the
//! exact command text the adapter transmitted, plus the raw-passthrough
//! behavior of queries.

use ssa3000x::adapters::{HardwareAdapter, MockAdapter};
use ssa3000x::instrument::{FileType, SweepMode, TraceMode};
use ssa3000x::{Ssa3000x, SsaError};

/// Driver wired to a connected mock, plus a handle to its transcript.
async fn connected_driver(responses: &[&str]) -> (Ssa3000x, MockAdapter) {
    let mut adapter = MockAdapter::with_responses(responses.iter().copied());
    adapter.connect().await.unwrap();
    let handle = adapter.clone();
    (Ssa3000x::with_adapter(Box::new(adapter)), handle)
}

#[tokio::test]
async fn get_returns_raw_response_unmodified() {
    let (mut sa, handle) = connected_driver(&["3.75000000000E+09"]).await;

    let response = sa.center_frequency().await.unwrap();

    assert_eq!(response, "3.75000000000E+09");
    assert_eq!(handle.sent_commands().await, vec!["SENS:FREQ:CENT?"]);
}

#[tokio::test]
async fn every_get_is_one_write_then_one_read() {
    let (mut sa, handle) = connected_driver(&[
        "Siglent Technologies,SSA3075X,SSA5PGCD6R0697,3.2.2.5.0",
        "AUTO",
        "1",
    ])
    .await;

    sa.identity().await.unwrap();
    sa.sweep_mode().await.unwrap();
    sa.sweep_continuity().await.unwrap();

    // One transmitted query per call, nothing else
    assert_eq!(
        handle.sent_commands().await,
        vec!["*IDN?", "SENS:SWE:MODE?", "INIT:CONT?"]
    );
}

#[tokio::test]
async fn set_operations_format_value_and_unit() {
    let (mut sa, handle) = connected_driver(&[]).await;

    sa.set_center_frequency(250.0, "MHz").await.unwrap();
    sa.set_start_frequency(1.0, "GHz").await.unwrap();
    sa.set_stop_frequency(2.5, "GHz").await.unwrap();
    sa.set_span(100.0, "MHz").await.unwrap();
    sa.set_reference_level(0.0, "DBM").await.unwrap();
    sa.set_attenuation_db(20.0).await.unwrap();

    assert_eq!(
        handle.sent_commands().await,
        vec![
            "SENS:FREQ:CENT 250 MHz",
            "SENS:FREQ:STAR 1 GHz",
            "SENS:FREQ:STOP 2.5 GHz",
            "SENS:FREQ:SPAN 100 MHz",
            "DISP:WIND:TRAC:Y:RLEV 0 DBM",
            "SENS:POW:RF:ATT 20",
        ]
    );
}

#[tokio::test]
async fn out_of_domain_unit_still_transmits() {
    let (mut sa, handle) = connected_driver(&[]).await;

    // Permissive validation: a warning is logged but the command goes out
    sa.set_center_frequency(100.0, "furlongs").await.unwrap();

    assert_eq!(
        handle.sent_commands().await,
        vec!["SENS:FREQ:CENT 100 furlongs"]
    );
}

#[tokio::test]
async fn out_of_range_trace_index_still_transmits() {
    let (mut sa, handle) = connected_driver(&[]).await;

    sa.set_trace_mode(5, "WRIT").await.unwrap();

    assert_eq!(handle.sent_commands().await, vec![":TRAC5:MODE WRIT"]);
}

#[tokio::test]
async fn sweep_time_set_form_has_no_separating_space() {
    let (mut sa, handle) = connected_driver(&[]).await;

    sa.set_sweep_time(20.0, "ms").await.unwrap();

    assert_eq!(handle.sent_commands().await, vec!["SENS:SWE:TIME 20ms"]);
}

#[tokio::test]
async fn save_measurement_quotes_the_filename() {
    let (mut sa, handle) = connected_driver(&[]).await;

    sa.save_measurement("JPG", "measurement_test.jpg")
        .await
        .unwrap();

    assert_eq!(
        handle.sent_commands().await,
        vec!["MMEM:STOR JPG,'measurement_test.jpg'"]
    );
}

#[tokio::test]
async fn span_presets_and_switches() {
    let (mut sa, handle) = connected_driver(&[]).await;

    sa.set_full_span().await.unwrap();
    sa.set_zero_span().await.unwrap();
    sa.set_auto_attenuation("ON").await.unwrap();
    sa.set_auto_preamp_gain("OFF").await.unwrap();
    sa.set_sweep_continuity("OFF").await.unwrap();
    sa.shutdown().await.unwrap();

    assert_eq!(
        handle.sent_commands().await,
        vec![
            "SENS:FREQ:SPAN:FULL",
            "SENS:FREQ:SPAN:ZERO",
            "SENS:POW:RF:ATT:AUTO ON",
            "SENS:POW:RF:GAIN:STAT OFF",
            "INIT:CONT OFF",
            "SYST:POW:OFF",
        ]
    );
}

#[tokio::test]
async fn trace_queries_address_the_requested_trace() {
    let (mut sa, handle) = connected_driver(&["MAXH", "-30.25,-31.50"]).await;

    assert_eq!(sa.trace_mode(2).await.unwrap(), "MAXH");
    assert_eq!(sa.trace_data(3).await.unwrap(), "-30.25,-31.50");

    assert_eq!(
        handle.sent_commands().await,
        vec![":TRAC2:MODE?", ":TRAC3:DATA?"]
    );
}

#[tokio::test]
async fn typed_enums_produce_the_same_wire_tokens() {
    let (mut sa, handle) = connected_driver(&[]).await;

    sa.set_sweep_mode(SweepMode::Fft.as_str()).await.unwrap();
    sa.set_trace_mode(1, TraceMode::Write.as_str()).await.unwrap();
    sa.save_measurement(FileType::Csv.as_str(), "sweep.csv")
        .await
        .unwrap();

    assert_eq!(
        handle.sent_commands().await,
        vec![
            "SENS:SWE:MODE FFT",
            ":TRAC1:MODE WRIT",
            "MMEM:STOR CSV,'sweep.csv'",
        ]
    );
}

#[tokio::test]
async fn operations_without_a_session_return_not_connected() {
    let adapter = MockAdapter::new();
    let handle = adapter.clone();
    let mut sa = Ssa3000x::with_adapter(Box::new(adapter));

    let query_err = sa.identity().await.unwrap_err();
    let set_err = sa.set_center_frequency(100.0, "MHz").await.unwrap_err();

    for err in [&query_err, &set_err] {
        assert!(matches!(
            err.downcast_ref::<SsaError>(),
            Some(SsaError::NotConnected)
        ));
        assert!(err.to_string().contains("not connected"));
    }

    // Nothing reached the transport
    assert!(handle.sent_commands().await.is_empty());
}

#[tokio::test]
async fn close_drops_the_session() {
    let (mut sa, _handle) = connected_driver(&[]).await;
    assert!(sa.is_connected());

    sa.close().await.unwrap();

    assert!(!sa.is_connected());
    let err = sa.set_full_span().await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<SsaError>(),
        Some(SsaError::NotConnected)
    ));
}
