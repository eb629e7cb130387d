//! Swept-acquisition helpers.
//!
//! A single SSA3000X sweep always acquires [`TRACE_POINTS`] samples spread
//! evenly between the start and stop frequency. The instrument reports
//! amplitudes only; these helpers recover the frequency axis and parse the
//! comma-separated sample text returned by a trace-data query.

use anyhow::{Context, Result};
use log::trace;

/// Number of acquisition points per sweep. Fixed characteristic of the
/// SSA3000X family, matching the length of every trace-data response.
pub const TRACE_POINTS: usize = 751;

/// Frequency of each acquisition point for a linear sweep from `start_hz` to
/// `stop_hz`, in ascending index order matching the instrument's trace-data
/// ordering.
///
/// Neighbouring points are `(stop_hz - start_hz) / 750` apart; index 0 maps
/// to `start_hz` and index 750 to `stop_hz`.
pub fn trace_frequencies(start_hz: f64, stop_hz: f64) -> Vec<f64> {
    let spacing = (stop_hz - start_hz) / (TRACE_POINTS - 1) as f64;
    trace!("trace point spacing: {spacing} Hz");

    (0..TRACE_POINTS)
        .map(|i| start_hz + i as f64 * spacing)
        .collect()
}

/// Parse the comma-separated amplitude text of a trace-data response into
/// samples. Empty fields (e.g. a trailing comma) are skipped.
pub fn parse_trace_samples(raw: &str) -> Result<Vec<f64>> {
    raw.split(',')
        .map(str::trim)
        .filter(|field| !field.is_empty())
        .map(|field| {
            field
                .parse::<f64>()
                .with_context(|| format!("Failed to parse trace sample: '{field}'"))
        })
        .collect()
}
