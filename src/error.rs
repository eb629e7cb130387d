//! Custom error types for the crate.
//!
//! This module defines the primary error type, `SsaError`. Using the
//! `thiserror` crate, it provides a centralized way to handle the failure
//! conditions the driver can hit: configuration problems, a missing or
//! not-yet-opened instrument session, and transport-level I/O.
//!
//! Every failure is surfaced as a structured error; callers decide what to
//! do with it. The `ssa3000x` binary prints and continues at its outer edge
//! to keep interactive sessions running.

use thiserror::Error;

/// Convenience alias for results using the crate error type.
pub type SsaResult<T> = std::result::Result<T, SsaError>;

/// Errors surfaced by the spectrum-analyzer driver.
#[derive(Error, Debug)]
pub enum SsaError {
    /// Configuration file or environment override could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Underlying transport I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An operation was issued with no live instrument session.
    #[error("Device not connected, use connect() first")]
    NotConnected,

    /// Bus discovery found no resource matching the expected identity.
    #[error("Device not detected, check connection cables, drivers or instrument at OS settings. Current instrument description: '{description}'")]
    DeviceNotFound {
        /// The identity substring discovery was looking for.
        description: String,
    },

    /// Instrument rejected an operation at the bus level.
    #[error("Instrument error: {0}")]
    Instrument(String),

    /// Operation needs the `instrument_visa` feature.
    #[error("VISA support not enabled. Rebuild with --features instrument_visa")]
    VisaFeatureDisabled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_connected_display() {
        let err = SsaError::NotConnected;
        assert!(err.to_string().contains("not connected"));
        assert!(err.to_string().contains("connect()"));
    }

    #[test]
    fn test_device_not_found_names_description() {
        let err = SsaError::DeviceNotFound {
            description: "SSA5PGCD6R0697".to_string(),
        };
        assert!(err.to_string().contains("SSA5PGCD6R0697"));
        assert!(err.to_string().contains("not detected"));
    }

    #[test]
    fn test_instrument_error_display() {
        let err = SsaError::Instrument("query rejected".to_string());
        assert_eq!(err.to_string(), "Instrument error: query rejected");
    }
}
