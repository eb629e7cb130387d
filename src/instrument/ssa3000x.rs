//! Siglent SSA3000X-family spectrum analyzer driver
//!
//! Translates typed operations into the analyzer's SCPI command set: one
//! formatted command per call, written through a [`HardwareAdapter`], with
//! queries reading back a single line of text returned raw (no numeric
//! parsing, no unit normalization).
//!
//! ## Parameter validation
//!
//! Enumerated parameters (frequency unit, trace mode, ...) are checked
//! against the values the instrument accepts, but a violation only logs a
//! warning; the command is still formatted and transmitted, so an operator
//! can probe undocumented values at will. Typed enums ([`FrequencyUnit`],
//! [`SweepMode`], ...) are provided for call sites that want the compiler's
//! help.
//!
//! ## Example
//!
//! ```rust,ignore
//! let settings = Settings::new(None)?;
//! let mut sa = Ssa3000x::connect(&settings).await?;
//! println!("{}", sa.identity().await?);
//! sa.set_center_frequency(250.0, "MHz").await?;
//! let raw = sa.trace_data(1).await?;
//! ```

use std::fmt;

use anyhow::Result;
use log::{debug, warn};

#[cfg(feature = "instrument_visa")]
use log::{error, info};

use crate::adapters::HardwareAdapter;
use crate::error::SsaError;

#[cfg(feature = "instrument_visa")]
use crate::adapters::VisaAdapter;
#[cfg(feature = "instrument_visa")]
use crate::config::Settings;

/// Display name of the reference unit, used in log output.
pub const DEVICE_NAME: &str = "SSA3075X";

/// Frequency units accepted by the frequency commands.
pub const FREQUENCY_UNITS: [&str; 4] = ["Hz", "kHz", "MHz", "GHz"];

/// Power and voltage units accepted by the reference-level command.
pub const AMPLITUDE_UNITS: [&str; 5] = ["DBM", "DBMV", "DBuV", "V", "W"];

/// Time units accepted by the sweep-time command.
pub const TIME_UNITS: [&str; 4] = ["ks", "s", "ms", "us"];

/// Switch states accepted by the on/off commands.
pub const SWITCH_STATES: [&str; 2] = ["ON", "OFF"];

/// Sweep modes accepted by the sweep-mode command.
pub const SWEEP_MODES: [&str; 3] = ["AUTO", "FFT", "SWE"];

/// Trace modes accepted by the trace-mode command.
pub const TRACE_MODES: [&str; 6] = ["WRIT", "MAXH", "MINH", "VIEW", "BLAN", "AVER"];

/// File types the instrument can store a measurement as.
pub const FILE_TYPES: [&str; 8] = ["STA", "TRC", "COR", "CSV", "LIM", "JPG", "BMP", "PNG"];

/// Traces the instrument holds.
pub const TRACE_INDICES: std::ops::RangeInclusive<u8> = 1..=4;

/// Frequency order of magnitude for frequency commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrequencyUnit {
    /// Hertz.
    Hz,
    /// Kilohertz.
    KiloHertz,
    /// Megahertz.
    MegaHertz,
    /// Gigahertz.
    GigaHertz,
}

impl FrequencyUnit {
    /// The token the instrument expects on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            FrequencyUnit::Hz => "Hz",
            FrequencyUnit::KiloHertz => "kHz",
            FrequencyUnit::MegaHertz => "MHz",
            FrequencyUnit::GigaHertz => "GHz",
        }
    }
}

/// Power or voltage unit for the reference level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AmplitudeUnit {
    /// Decibel-milliwatts.
    Dbm,
    /// Decibel-millivolts.
    Dbmv,
    /// Decibel-microvolts.
    Dbuv,
    /// Volts.
    Volt,
    /// Watts.
    Watt,
}

impl AmplitudeUnit {
    /// The token the instrument expects on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            AmplitudeUnit::Dbm => "DBM",
            AmplitudeUnit::Dbmv => "DBMV",
            AmplitudeUnit::Dbuv => "DBuV",
            AmplitudeUnit::Volt => "V",
            AmplitudeUnit::Watt => "W",
        }
    }
}

/// Time order of magnitude for the sweep time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeUnit {
    /// Kiloseconds.
    KiloSecond,
    /// Seconds.
    Second,
    /// Milliseconds.
    MilliSecond,
    /// Microseconds.
    MicroSecond,
}

impl TimeUnit {
    /// The token the instrument expects on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            TimeUnit::KiloSecond => "ks",
            TimeUnit::Second => "s",
            TimeUnit::MilliSecond => "ms",
            TimeUnit::MicroSecond => "us",
        }
    }
}

/// On/off state for the switchable functions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Switch {
    /// Function enabled.
    On,
    /// Function disabled.
    Off,
}

impl Switch {
    /// The token the instrument expects on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Switch::On => "ON",
            Switch::Off => "OFF",
        }
    }
}

/// Sweep mode of the analyzer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SweepMode {
    /// Instrument picks swept or FFT per span.
    Auto,
    /// FFT acquisition.
    Fft,
    /// Swept acquisition; required for manual sweep time.
    Swept,
}

impl SweepMode {
    /// The token the instrument expects on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            SweepMode::Auto => "AUTO",
            SweepMode::Fft => "FFT",
            SweepMode::Swept => "SWE",
        }
    }
}

/// Mode of one of the four traces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TraceMode {
    /// Clear/write: refresh on every sweep.
    Write,
    /// Keep the maximum of each point.
    MaxHold,
    /// Keep the minimum of each point.
    MinHold,
    /// Freeze and display.
    View,
    /// Freeze without display.
    Blank,
    /// Rolling average.
    Average,
}

impl TraceMode {
    /// The token the instrument expects on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            TraceMode::Write => "WRIT",
            TraceMode::MaxHold => "MAXH",
            TraceMode::MinHold => "MINH",
            TraceMode::View => "VIEW",
            TraceMode::Blank => "BLAN",
            TraceMode::Average => "AVER",
        }
    }
}

/// File type for measurements saved on the instrument's own storage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileType {
    /// Instrument state.
    State,
    /// Trace data.
    Trace,
    /// Correction table.
    Correction,
    /// Comma-separated samples.
    Csv,
    /// Limit lines.
    Limit,
    /// JPEG screenshot.
    Jpg,
    /// Bitmap screenshot.
    Bmp,
    /// PNG screenshot.
    Png,
}

impl FileType {
    /// The token the instrument expects on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            FileType::State => "STA",
            FileType::Trace => "TRC",
            FileType::Correction => "COR",
            FileType::Csv => "CSV",
            FileType::Limit => "LIM",
            FileType::Jpg => "JPG",
            FileType::Bmp => "BMP",
            FileType::Png => "PNG",
        }
    }
}

macro_rules! impl_display_as_str {
    ($($ty:ty),+) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })+
    };
}

impl_display_as_str!(
    FrequencyUnit,
    AmplitudeUnit,
    TimeUnit,
    Switch,
    SweepMode,
    TraceMode,
    FileType
);

fn check_frequency_unit(unit: &str) {
    if !FREQUENCY_UNITS.contains(&unit) {
        warn!("Unexpected frequency order of magnitude: {unit}");
    }
}

fn check_amplitude_unit(unit: &str) {
    if !AMPLITUDE_UNITS.contains(&unit) {
        warn!("Unexpected voltage or power unit: {unit}");
    }
}

fn check_time_unit(unit: &str) {
    if !TIME_UNITS.contains(&unit) {
        warn!("Unexpected time magnitude: {unit}");
    }
}

fn check_switch_state(state: &str) {
    if !SWITCH_STATES.contains(&state) {
        warn!("Unexpected state: {state}");
    }
}

fn check_sweep_mode(mode: &str) {
    if !SWEEP_MODES.contains(&mode) {
        warn!("Unexpected sweep mode: {mode}");
    }
}

fn check_trace_mode(mode: &str) {
    if !TRACE_MODES.contains(&mode) {
        warn!("Unexpected trace mode: {mode}");
    }
}

fn check_trace_index(trace: u8) {
    if !TRACE_INDICES.contains(&trace) {
        warn!("Unrecognized trace number: {trace}");
    }
}

fn check_file_type(ftype: &str) {
    if !FILE_TYPES.contains(&ftype) {
        warn!("Unexpected file type: {ftype}");
    }
}

/// Driver for SSA3000X-family spectrum analyzers.
///
/// Owns the single session to the instrument; every operation goes through
/// it and nothing else may open a second one on the same value. Callers must
/// serialize operations themselves, the driver does not arbitrate concurrent
/// use.
pub struct Ssa3000x {
    adapter: Box<dyn HardwareAdapter>,
}

impl Ssa3000x {
    /// Discover the analyzer on the VISA bus and open the session.
    ///
    /// Scans resources matching the configured search pattern and opens the
    /// first whose identity contains the configured device description,
    /// applying the configured terminator and timeout.
    #[cfg(feature = "instrument_visa")]
    pub async fn connect(settings: &Settings) -> Result<Self> {
        let mut adapter = VisaAdapter::from_settings(&settings.connection);
        match adapter.connect().await {
            Ok(()) => {
                info!(
                    "{DEVICE_NAME}: correctly detected and connected ({})",
                    adapter.info()
                );
                Ok(Self {
                    adapter: Box::new(adapter),
                })
            }
            Err(e) => {
                error!(
                    "{DEVICE_NAME}: device not detected, check connection cables, drivers or instrument at OS settings. Current instrument description: '{}'",
                    settings.connection.device_description
                );
                Err(e)
            }
        }
    }

    /// Stub without the `instrument_visa` feature.
    #[cfg(not(feature = "instrument_visa"))]
    pub async fn connect(_settings: &crate::config::Settings) -> Result<Self> {
        Err(SsaError::VisaFeatureDisabled.into())
    }

    /// Build a driver around an already-configured adapter. Used by tests
    /// (mock transport) and callers bringing their own bus implementation.
    pub fn with_adapter(adapter: Box<dyn HardwareAdapter>) -> Self {
        Self { adapter }
    }

    /// Whether the session is live.
    pub fn is_connected(&self) -> bool {
        self.adapter.is_connected()
    }

    /// Human-readable summary of the underlying transport.
    pub fn info(&self) -> String {
        self.adapter.info()
    }

    /// Close the session. The instrument keeps running.
    pub async fn close(&mut self) -> Result<()> {
        self.adapter.disconnect().await
    }

    async fn send(&mut self, command: &str) -> Result<()> {
        if !self.adapter.is_connected() {
            return Err(SsaError::NotConnected.into());
        }
        debug!("Sending: {command}");
        self.adapter.send(command).await
    }

    async fn query(&mut self, command: &str) -> Result<String> {
        if !self.adapter.is_connected() {
            return Err(SsaError::NotConnected.into());
        }
        debug!("Sending: {command}");
        self.adapter.query(command).await
    }

    /// Query the device identity (`*IDN?`).
    pub async fn identity(&mut self) -> Result<String> {
        self.query("*IDN?").await
    }

    /// Turn the analyzer off.
    pub async fn shutdown(&mut self) -> Result<()> {
        self.send("SYST:POW:OFF").await
    }

    /// Save the current measurement on the instrument's own storage.
    ///
    /// `ftype` picks the format (see [`FILE_TYPES`]); CSV and the image
    /// formats are the usual choices.
    pub async fn save_measurement(&mut self, ftype: &str, fname: &str) -> Result<()> {
        check_file_type(ftype);
        self.send(&format!("MMEM:STOR {ftype},'{fname}'")).await
    }

    /// Query the center frequency. Returns the raw response,
    /// e.g. `3.75000000000E+09`.
    pub async fn center_frequency(&mut self) -> Result<String> {
        self.query("SENS:FREQ:CENT?").await
    }

    /// Set the center frequency, e.g. `set_center_frequency(250.0, "MHz")`.
    pub async fn set_center_frequency(&mut self, value: f64, unit: &str) -> Result<()> {
        check_frequency_unit(unit);
        self.send(&format!("SENS:FREQ:CENT {value} {unit}")).await
    }

    /// Query the start frequency of the span.
    pub async fn start_frequency(&mut self) -> Result<String> {
        self.query("SENS:FREQ:STAR?").await
    }

    /// Set the start frequency of the span.
    pub async fn set_start_frequency(&mut self, value: f64, unit: &str) -> Result<()> {
        check_frequency_unit(unit);
        self.send(&format!("SENS:FREQ:STAR {value} {unit}")).await
    }

    /// Query the stop frequency of the span.
    pub async fn stop_frequency(&mut self) -> Result<String> {
        self.query("SENS:FREQ:STOP?").await
    }

    /// Set the stop frequency of the span.
    pub async fn set_stop_frequency(&mut self, value: f64, unit: &str) -> Result<()> {
        check_frequency_unit(unit);
        self.send(&format!("SENS:FREQ:STOP {value} {unit}")).await
    }

    /// Query the span width. Returns the raw response,
    /// e.g. `7.50000000000E+09`.
    pub async fn span(&mut self) -> Result<String> {
        self.query("SENS:FREQ:SPAN?").await
    }

    /// Set the span width.
    pub async fn set_span(&mut self, value: f64, unit: &str) -> Result<()> {
        check_frequency_unit(unit);
        self.send(&format!("SENS:FREQ:SPAN {value} {unit}")).await
    }

    /// Sweep the full frequency range of the instrument.
    pub async fn set_full_span(&mut self) -> Result<()> {
        self.send("SENS:FREQ:SPAN:FULL").await
    }

    /// Zero span: time-domain view at the center frequency.
    pub async fn set_zero_span(&mut self) -> Result<()> {
        self.send("SENS:FREQ:SPAN:ZERO").await
    }

    /// Query the reference level, e.g. `3.000000000E+01`.
    pub async fn reference_level(&mut self) -> Result<String> {
        self.query("DISP:WIND:TRAC:Y:RLEV?").await
    }

    /// Set the reference level, e.g. `set_reference_level(0.0, "DBM")`.
    pub async fn set_reference_level(&mut self, value: f64, unit: &str) -> Result<()> {
        check_amplitude_unit(unit);
        self.send(&format!("DISP:WIND:TRAC:Y:RLEV {value} {unit}"))
            .await
    }

    /// Query the auto-attenuation state (`1` or `0`).
    pub async fn auto_attenuation(&mut self) -> Result<String> {
        self.query("SENS:POW:RF:ATT:AUTO?").await
    }

    /// Enable or disable automatic input attenuation.
    pub async fn set_auto_attenuation(&mut self, state: &str) -> Result<()> {
        check_switch_state(state);
        self.send(&format!("SENS:POW:RF:ATT:AUTO {state}")).await
    }

    /// Query the input attenuation in dB.
    pub async fn attenuation_db(&mut self) -> Result<String> {
        self.query("SENS:POW:RF:ATT?").await
    }

    /// Set the input attenuation in dB.
    pub async fn set_attenuation_db(&mut self, value: f64) -> Result<()> {
        self.send(&format!("SENS:POW:RF:ATT {value}")).await
    }

    /// Query the auto preamplifier gain state (`1` or `0`).
    pub async fn auto_preamp_gain(&mut self) -> Result<String> {
        self.query("SENS:POW:RF:GAIN:STAT?").await
    }

    /// Enable or disable the input preamplifier.
    pub async fn set_auto_preamp_gain(&mut self, state: &str) -> Result<()> {
        check_switch_state(state);
        self.send(&format!("SENS:POW:RF:GAIN:STAT {state}")).await
    }

    /// Query the sweep mode, e.g. `AUTO`.
    pub async fn sweep_mode(&mut self) -> Result<String> {
        self.query("SENS:SWE:MODE?").await
    }

    /// Set the sweep mode (see [`SWEEP_MODES`]).
    pub async fn set_sweep_mode(&mut self, mode: &str) -> Result<()> {
        check_sweep_mode(mode);
        self.send(&format!("SENS:SWE:MODE {mode}")).await
    }

    /// Query the sweep time, e.g. `9.303200000E-02`.
    pub async fn sweep_time(&mut self) -> Result<String> {
        self.query("SENS:SWE:TIME?").await
    }

    /// Set the sweep time. Only honored when the sweep mode is `SWE`.
    ///
    /// The instrument takes value and unit without a separating space
    /// (`SENS:SWE:TIME 20ms`).
    pub async fn set_sweep_time(&mut self, value: f64, unit: &str) -> Result<()> {
        check_time_unit(unit);
        self.send(&format!("SENS:SWE:TIME {value}{unit}")).await
    }

    /// Query whether the sweep is free-running (`1`) or stopped (`0`).
    pub async fn sweep_continuity(&mut self) -> Result<String> {
        self.query("INIT:CONT?").await
    }

    /// Freeze (`OFF`) or restart (`ON`) continuous sweeping.
    pub async fn set_sweep_continuity(&mut self, state: &str) -> Result<()> {
        check_switch_state(state);
        self.send(&format!("INIT:CONT {state}")).await
    }

    /// Query the mode of trace `trace` (1-4).
    pub async fn trace_mode(&mut self, trace: u8) -> Result<String> {
        check_trace_index(trace);
        self.query(&format!(":TRAC{trace}:MODE?")).await
    }

    /// Set the mode of trace `trace` (1-4), see [`TRACE_MODES`].
    pub async fn set_trace_mode(&mut self, trace: u8, mode: &str) -> Result<()> {
        check_trace_mode(mode);
        check_trace_index(trace);
        self.send(&format!(":TRAC{trace}:MODE {mode}")).await
    }

    /// Query the displayed data of trace `trace` (1-4).
    ///
    /// Returns the raw comma-separated sample text (751 values); see
    /// [`crate::sweep`] for the frequency axis and sample parsing.
    pub async fn trace_data(&mut self, trace: u8) -> Result<String> {
        check_trace_index(trace);
        self.query(&format!(":TRAC{trace}:DATA?")).await
    }
}
