//! VISA hardware adapter for USB/GPIB/Ethernet instruments
//!
//! Wraps the `visa-rs` crate behind the `instrument_visa` feature. Discovery
//! enumerates bus resources matching a search expression and opens the first
//! whose resource identity contains the expected device-description
//! substring.
//!
//! Blocking VISA I/O runs on Tokio's blocking task executor so the async
//! runtime is never stalled.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;

use super::HardwareAdapter;
use crate::config::ConnectionSettings;

#[cfg(feature = "instrument_visa")]
use super::AdapterError;
#[cfg(feature = "instrument_visa")]
use crate::error::SsaError;
#[cfg(feature = "instrument_visa")]
use anyhow::Context;
#[cfg(feature = "instrument_visa")]
use log::debug;
#[cfg(feature = "instrument_visa")]
use std::sync::Arc;
#[cfg(feature = "instrument_visa")]
use tokio::sync::Mutex;

#[cfg(not(feature = "instrument_visa"))]
use anyhow::anyhow;

/// VISA adapter for instrument communication.
///
/// Supports resource identities like:
/// - `USB0::0xF4EC::0x1300::SSA5PGCD6R0697::INSTR` (USB-TMC)
/// - `GPIB0::18::INSTR` (GPIB interface)
/// - `TCPIP0::192.168.1.100::INSTR` (Ethernet/LXI)
pub struct VisaAdapter {
    /// Identity substring selecting the device during discovery.
    pub(crate) device_description: String,

    /// VISA search expression for resource enumeration.
    pub(crate) resource_pattern: String,

    /// Read/write timeout.
    pub(crate) timeout: Duration,

    /// Line terminator for commands (typically "\n" for SCPI).
    pub(crate) line_terminator: String,

    /// Identity of the resource selected by discovery, once open.
    resource_name: Option<String>,

    /// The actual VISA session (behind Arc<Mutex> for async access).
    #[cfg(feature = "instrument_visa")]
    instrument: Option<Arc<Mutex<visa_rs::Instrument>>>,
}

impl VisaAdapter {
    /// Create a new VISA adapter selecting devices whose identity contains
    /// `device_description`, with default pattern, timeout and terminator.
    pub fn new(device_description: String) -> Self {
        Self::from_settings(&ConnectionSettings {
            device_description,
            ..ConnectionSettings::default()
        })
    }

    /// Create an adapter from connection settings.
    pub fn from_settings(settings: &ConnectionSettings) -> Self {
        Self {
            device_description: settings.device_description.clone(),
            resource_pattern: settings.resource_pattern.clone(),
            timeout: Duration::from_millis(settings.timeout_ms),
            line_terminator: settings.line_terminator.clone(),
            resource_name: None,
            #[cfg(feature = "instrument_visa")]
            instrument: None,
        }
    }

    /// Set read/write timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set line terminator for commands.
    pub fn with_line_terminator(mut self, terminator: String) -> Self {
        self.line_terminator = terminator;
        self
    }

    /// Identity of the open resource, if any.
    pub fn resource_name(&self) -> Option<&str> {
        self.resource_name.as_deref()
    }
}

/// Scan the bus and open the first resource whose identity contains
/// `description`. Runs on a blocking thread.
#[cfg(feature = "instrument_visa")]
fn open_matching_resource(
    pattern: &str,
    description: &str,
    timeout: Duration,
) -> Result<(String, visa_rs::Instrument)> {
    use std::ffi::CString;
    use visa_rs::enums::attribute::AttrTmoValue;
    use visa_rs::flags::AccessMode;
    use visa_rs::DefaultRM;

    let rm = DefaultRM::new().context("Failed to create VISA resource manager")?;
    let expr = CString::new(pattern)
        .context("Invalid VISA search expression")?
        .into();
    let list = rm
        .find_res_list(&expr)
        .context("Failed to enumerate VISA resources")?;

    for res in list {
        let res = res.context("Failed to read VISA resource entry")?;
        let name = res.to_string();
        if !name.contains(description) {
            continue;
        }

        let instr = rm
            .open(&res, AccessMode::NO_LOCK, timeout)
            .with_context(|| format!("Failed to open VISA resource: {name}"))?;
        if let Some(tmo) = AttrTmoValue::new_checked(timeout.as_millis() as u32) {
            instr
                .set_attr(tmo.into())
                .context("Failed to set VISA I/O timeout")?;
        }
        return Ok((name, instr));
    }

    Err(SsaError::DeviceNotFound {
        description: description.to_string(),
    }
    .into())
}

#[async_trait]
impl HardwareAdapter for VisaAdapter {
    #[cfg(feature = "instrument_visa")]
    async fn connect(&mut self) -> Result<()> {
        let pattern = self.resource_pattern.clone();
        let description = self.device_description.clone();
        let timeout = self.timeout;

        let (name, instrument) =
            tokio::task::spawn_blocking(move || open_matching_resource(&pattern, &description, timeout))
                .await
                .context("VISA open task panicked")??;

        debug!(
            "VISA resource '{}' opened with {}ms timeout",
            name,
            self.timeout.as_millis()
        );
        self.resource_name = Some(name);
        self.instrument = Some(Arc::new(Mutex::new(instrument)));
        Ok(())
    }

    #[cfg(not(feature = "instrument_visa"))]
    async fn connect(&mut self) -> Result<()> {
        Err(anyhow!(
            "VISA support not enabled. Rebuild with --features instrument_visa"
        ))
    }

    async fn disconnect(&mut self) -> Result<()> {
        #[cfg(feature = "instrument_visa")]
        if self.instrument.is_some() {
            self.instrument = None;
            debug!(
                "VISA resource '{}' closed",
                self.resource_name.as_deref().unwrap_or("<unknown>")
            );
        }
        self.resource_name = None;
        Ok(())
    }

    #[cfg(feature = "instrument_visa")]
    async fn send(&mut self, command: &str) -> Result<()> {
        let instrument = self
            .instrument
            .as_ref()
            .ok_or(AdapterError::NotConnected)
            .map_err(anyhow::Error::from)?
            .clone();

        let payload = format!("{}{}", command, self.line_terminator);
        let command_for_log = command.to_string();

        // Execute blocking VISA I/O on a dedicated thread
        tokio::task::spawn_blocking(move || {
            use std::io::Write;

            let guard = instrument.blocking_lock();
            (&*guard)
                .write_all(payload.as_bytes())
                .with_context(|| format!("VISA write failed for: {command_for_log}"))?;

            debug!("VISA command sent: {}", command_for_log.trim());
            Ok(())
        })
        .await
        .context("VISA I/O task panicked")?
    }

    #[cfg(not(feature = "instrument_visa"))]
    async fn send(&mut self, _command: &str) -> Result<()> {
        Err(anyhow!(
            "VISA support not enabled. Rebuild with --features instrument_visa"
        ))
    }

    #[cfg(feature = "instrument_visa")]
    async fn query(&mut self, command: &str) -> Result<String> {
        let instrument = self
            .instrument
            .as_ref()
            .ok_or(AdapterError::NotConnected)
            .map_err(anyhow::Error::from)?
            .clone();

        let payload = format!("{}{}", command, self.line_terminator);
        let command_for_log = command.to_string();

        tokio::task::spawn_blocking(move || -> Result<String> {
            use std::io::{BufRead, BufReader, Write};

            let guard = instrument.blocking_lock();
            (&*guard)
                .write_all(payload.as_bytes())
                .with_context(|| format!("VISA write failed for: {command_for_log}"))?;

            let mut reader = BufReader::new(&*guard);
            let mut line = String::new();
            reader
                .read_line(&mut line)
                .with_context(|| format!("VISA read failed for: {command_for_log}"))?;

            let response = line.trim().to_string();
            debug!("VISA query '{}' -> '{}'", command_for_log.trim(), response);
            Ok(response)
        })
        .await
        .context("VISA I/O task panicked")?
    }

    #[cfg(not(feature = "instrument_visa"))]
    async fn query(&mut self, _command: &str) -> Result<String> {
        Err(anyhow!(
            "VISA support not enabled. Rebuild with --features instrument_visa"
        ))
    }

    fn is_connected(&self) -> bool {
        #[cfg(feature = "instrument_visa")]
        {
            self.instrument.is_some()
        }

        #[cfg(not(feature = "instrument_visa"))]
        {
            false
        }
    }

    fn adapter_type(&self) -> &str {
        "visa"
    }

    fn info(&self) -> String {
        format!(
            "VisaAdapter({} @ {}ms timeout)",
            self.resource_name
                .as_deref()
                .unwrap_or(&self.device_description),
            self.timeout.as_millis()
        )
    }

    fn default_config(&self) -> serde_json::Value {
        json!({
            "device_description": self.device_description,
            "resource_pattern": self.resource_pattern,
            "timeout_ms": self.timeout.as_millis() as u64,
            "line_terminator": self.line_terminator,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visa_adapter_creation() {
        let adapter = VisaAdapter::new("SSA5PGCD6R0697".to_string());
        assert_eq!(adapter.adapter_type(), "visa");
        assert!(!adapter.is_connected());
        assert_eq!(adapter.device_description, "SSA5PGCD6R0697");
        assert_eq!(adapter.resource_pattern, "?*INSTR");
        assert_eq!(adapter.timeout, Duration::from_secs(5));
        assert_eq!(adapter.line_terminator, "\n");
    }

    #[test]
    fn test_visa_adapter_builder() {
        let adapter = VisaAdapter::new("SSA5PGCD6R0697".to_string())
            .with_timeout(Duration::from_millis(2000))
            .with_line_terminator("\r\n".to_string());

        assert_eq!(adapter.timeout, Duration::from_millis(2000));
        assert_eq!(adapter.line_terminator, "\r\n");
    }

    #[test]
    fn test_from_settings() {
        let settings = ConnectionSettings {
            device_description: "SSA3021X-1234".to_string(),
            resource_pattern: "USB?*INSTR".to_string(),
            timeout_ms: 3000,
            line_terminator: "\n".to_string(),
        };
        let adapter = VisaAdapter::from_settings(&settings);
        assert_eq!(adapter.device_description, "SSA3021X-1234");
        assert_eq!(adapter.resource_pattern, "USB?*INSTR");
        assert_eq!(adapter.timeout, Duration::from_millis(3000));
    }

    #[test]
    fn test_info_string() {
        let adapter = VisaAdapter::new("SSA5PGCD6R0697".to_string())
            .with_timeout(Duration::from_millis(3000));
        let info = adapter.info();
        assert!(info.contains("SSA5PGCD6R0697"));
        assert!(info.contains("3000ms"));
    }
}
