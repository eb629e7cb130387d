//! Diagnostic command-line tool for SSA3000X-family spectrum analyzers.
//!
//! Connects once, runs a single operation, and prints the raw instrument
//! response. Errors are printed and the process exits nonzero; nothing
//! propagates past the binary boundary.

use clap::{Parser, Subcommand};
use ssa3000x::{sweep, Settings, Ssa3000x};

#[derive(Parser)]
#[command(
    name = "ssa3000x",
    about = "Remote control for Siglent SSA3000X-family spectrum analyzers",
    version
)]
struct Cli {
    /// Path to a TOML settings file (default: config/default.toml).
    #[arg(long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Query the device identity.
    Idn,
    /// Get the center frequency, or set it when VALUE is given.
    CenterFreq {
        /// Frequency magnitude.
        value: Option<f64>,
        /// Frequency unit (Hz/kHz/MHz/GHz).
        #[arg(default_value = "MHz")]
        unit: String,
    },
    /// Get the start frequency of the span, or set it when VALUE is given.
    StartFreq {
        /// Frequency magnitude.
        value: Option<f64>,
        /// Frequency unit (Hz/kHz/MHz/GHz).
        #[arg(default_value = "MHz")]
        unit: String,
    },
    /// Get the stop frequency of the span, or set it when VALUE is given.
    StopFreq {
        /// Frequency magnitude.
        value: Option<f64>,
        /// Frequency unit (Hz/kHz/MHz/GHz).
        #[arg(default_value = "MHz")]
        unit: String,
    },
    /// Get the span width, or set it when VALUE is given.
    Span {
        /// Frequency magnitude.
        value: Option<f64>,
        /// Frequency unit (Hz/kHz/MHz/GHz).
        #[arg(default_value = "MHz")]
        unit: String,
    },
    /// Sweep the instrument's full frequency range.
    FullSpan,
    /// Switch to zero span.
    ZeroSpan,
    /// Get the reference level, or set it when VALUE is given.
    RefLevel {
        /// Amplitude magnitude.
        value: Option<f64>,
        /// Amplitude unit (DBM/DBMV/DBuV/V/W).
        #[arg(default_value = "DBM")]
        unit: String,
    },
    /// Get the input attenuation in dB, or set it when VALUE is given.
    Attenuation {
        /// Attenuation in dB.
        value: Option<f64>,
    },
    /// Get or set the auto-attenuation state (ON/OFF).
    AutoAttenuation {
        /// New state.
        state: Option<String>,
    },
    /// Get or set the auto preamplifier gain state (ON/OFF).
    PreampGain {
        /// New state.
        state: Option<String>,
    },
    /// Get or set the sweep mode (AUTO/FFT/SWE).
    SweepMode {
        /// New mode.
        mode: Option<String>,
    },
    /// Get the sweep time, or set it when VALUE is given (sweep mode SWE).
    SweepTime {
        /// Time magnitude.
        value: Option<f64>,
        /// Time unit (ks/s/ms/us).
        #[arg(default_value = "ms")]
        unit: String,
    },
    /// Get or set sweep continuity (OFF freezes the acquisition).
    SweepContinuity {
        /// New state (ON/OFF).
        state: Option<String>,
    },
    /// Get or set the mode of a trace (1-4).
    TraceMode {
        /// Trace index.
        trace: u8,
        /// New mode (WRIT/MAXH/MINH/VIEW/BLAN/AVER).
        mode: Option<String>,
    },
    /// Dump trace samples, optionally labeled with per-point frequencies.
    TraceData {
        /// Trace index.
        trace: u8,
        /// Print "frequency amplitude" pairs instead of the raw response.
        #[arg(long)]
        freqs: bool,
    },
    /// Save the current measurement on the instrument's own storage.
    Save {
        /// File type (STA/TRC/COR/CSV/LIM/JPG/BMP/PNG).
        file_type: String,
        /// File name on the instrument.
        file_name: String,
    },
    /// Turn the analyzer off.
    Shutdown,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let settings = match Settings::new(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load settings: {e}");
            std::process::exit(1);
        }
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(&settings.log_level),
    )
    .init();

    if let Err(e) = run(cli.command, &settings).await {
        eprintln!("{e:#}");
        std::process::exit(1);
    }
}

async fn run(command: Command, settings: &Settings) -> anyhow::Result<()> {
    let mut sa = Ssa3000x::connect(settings).await?;

    match command {
        Command::Idn => println!("{}", sa.identity().await?),
        Command::CenterFreq { value: Some(v), unit } => sa.set_center_frequency(v, &unit).await?,
        Command::CenterFreq { value: None, .. } => println!("{}", sa.center_frequency().await?),
        Command::StartFreq { value: Some(v), unit } => sa.set_start_frequency(v, &unit).await?,
        Command::StartFreq { value: None, .. } => println!("{}", sa.start_frequency().await?),
        Command::StopFreq { value: Some(v), unit } => sa.set_stop_frequency(v, &unit).await?,
        Command::StopFreq { value: None, .. } => println!("{}", sa.stop_frequency().await?),
        Command::Span { value: Some(v), unit } => sa.set_span(v, &unit).await?,
        Command::Span { value: None, .. } => println!("{}", sa.span().await?),
        Command::FullSpan => sa.set_full_span().await?,
        Command::ZeroSpan => sa.set_zero_span().await?,
        Command::RefLevel { value: Some(v), unit } => sa.set_reference_level(v, &unit).await?,
        Command::RefLevel { value: None, .. } => println!("{}", sa.reference_level().await?),
        Command::Attenuation { value: Some(v) } => sa.set_attenuation_db(v).await?,
        Command::Attenuation { value: None } => println!("{}", sa.attenuation_db().await?),
        Command::AutoAttenuation { state: Some(s) } => sa.set_auto_attenuation(&s).await?,
        Command::AutoAttenuation { state: None } => println!("{}", sa.auto_attenuation().await?),
        Command::PreampGain { state: Some(s) } => sa.set_auto_preamp_gain(&s).await?,
        Command::PreampGain { state: None } => println!("{}", sa.auto_preamp_gain().await?),
        Command::SweepMode { mode: Some(m) } => sa.set_sweep_mode(&m).await?,
        Command::SweepMode { mode: None } => println!("{}", sa.sweep_mode().await?),
        Command::SweepTime { value: Some(v), unit } => sa.set_sweep_time(v, &unit).await?,
        Command::SweepTime { value: None, .. } => println!("{}", sa.sweep_time().await?),
        Command::SweepContinuity { state: Some(s) } => sa.set_sweep_continuity(&s).await?,
        Command::SweepContinuity { state: None } => println!("{}", sa.sweep_continuity().await?),
        Command::TraceMode { trace, mode: Some(m) } => sa.set_trace_mode(trace, &m).await?,
        Command::TraceMode { trace, mode: None } => println!("{}", sa.trace_mode(trace).await?),
        Command::TraceData { trace, freqs } => {
            let raw = sa.trace_data(trace).await?;
            if freqs {
                let start: f64 = sa.start_frequency().await?.trim().parse()?;
                let stop: f64 = sa.stop_frequency().await?.trim().parse()?;
                let samples = sweep::parse_trace_samples(&raw)?;
                for (frequency, amplitude) in
                    sweep::trace_frequencies(start, stop).iter().zip(samples.iter())
                {
                    println!("{frequency} {amplitude}");
                }
            } else {
                println!("{raw}");
            }
        }
        Command::Save { file_type, file_name } => {
            sa.save_measurement(&file_type, &file_name).await?;
        }
        Command::Shutdown => sa.shutdown().await?,
    }

    Ok(())
}
