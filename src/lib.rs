//! Remote control for Siglent SSA3000X-family spectrum analyzers.
//!
//! This library is a command-translation layer between a host application and
//! a bench spectrum analyzer reachable over a VISA-style instrument bus. Each
//! operation formats one SCPI command, writes it to the instrument, and for
//! queries reads back a single line of text which is returned raw.
//!
//! Transport details live behind the [`adapters::HardwareAdapter`] trait:
//! [`adapters::VisaAdapter`] talks to real hardware (feature
//! `instrument_visa`), [`adapters::MockAdapter`] replays canned responses for
//! tests.

pub mod adapters;
pub mod config;
pub mod error;
pub mod instrument;
pub mod sweep;

pub use config::Settings;
pub use error::{SsaError, SsaResult};
pub use instrument::Ssa3000x;
