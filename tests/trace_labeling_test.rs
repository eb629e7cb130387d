//! End-to-end trace workflow: fetch trace data through the driver, then
//! label the samples with per-point frequencies from the sweep helpers.

use ssa3000x::adapters::{HardwareAdapter, MockAdapter};
use ssa3000x::{sweep, Ssa3000x};

fn synthetic_trace(points: usize) -> String {
    (0..points)
        .map(|i| format!("{:.2}", -90.0 + (i % 50) as f64))
        .collect::<Vec<_>>()
        .join(",")
}

#[tokio::test]
async fn trace_samples_line_up_with_frequency_axis() {
    let raw = synthetic_trace(sweep::TRACE_POINTS);
    let mut adapter = MockAdapter::with_responses([
        "1.00000000000E+09", // SENS:FREQ:STAR?
        "2.50000000000E+09", // SENS:FREQ:STOP?
        raw.as_str(),
    ]);
    adapter.connect().await.unwrap();
    let mut sa = Ssa3000x::with_adapter(Box::new(adapter));

    let start: f64 = sa.start_frequency().await.unwrap().parse().unwrap();
    let stop: f64 = sa.stop_frequency().await.unwrap().parse().unwrap();
    let samples = sweep::parse_trace_samples(&sa.trace_data(1).await.unwrap()).unwrap();
    let frequencies = sweep::trace_frequencies(start, stop);

    assert_eq!(samples.len(), sweep::TRACE_POINTS);
    assert_eq!(frequencies.len(), samples.len());
    assert!((frequencies[0] - 1.0e9).abs() < 1e-3);
    assert!((frequencies[750] - 2.5e9).abs() < 1e-3);
    assert_eq!(samples[0], -90.0);
}
