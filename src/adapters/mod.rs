//! Hardware adapter implementations
//!
//! This module contains implementations of the [`HardwareAdapter`] trait,
//! providing low-level I/O abstraction over the instrument bus so the command
//! layer never touches transport details.

use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;

pub mod mock_adapter;
pub mod visa_adapter;

pub use mock_adapter::MockAdapter;
pub use visa_adapter::VisaAdapter;

/// Errors raised by hardware adapters.
#[derive(Error, Debug)]
pub enum AdapterError {
    /// No open transport session.
    #[error("Adapter not connected")]
    NotConnected,

    /// Transport could not be opened.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// A write was rejected by the transport.
    #[error("Send failed: {0}")]
    SendFailed(String),

    /// A write-then-read exchange was rejected by the transport.
    #[error("Query failed: {0}")]
    QueryFailed(String),
}

/// Low-level line-oriented transport to an instrument.
///
/// One `send` performs exactly one write; one `query` performs exactly one
/// write followed by exactly one read. Adapters guard their own I/O with a
/// mutex, but callers must serialize operations themselves; interleaving
/// commands from concurrent tasks is unsupported.
#[async_trait]
pub trait HardwareAdapter: Send + Sync {
    /// Open the underlying transport.
    async fn connect(&mut self) -> Result<()>;

    /// Close the underlying transport.
    async fn disconnect(&mut self) -> Result<()>;

    /// Write a single command, appending the line terminator. No read.
    async fn send(&mut self, command: &str) -> Result<()>;

    /// Write a single query and read back one line of text, terminator
    /// stripped, otherwise unmodified.
    async fn query(&mut self, command: &str) -> Result<String>;

    /// Whether a live session is held.
    fn is_connected(&self) -> bool;

    /// Short transport identifier (e.g. "visa", "mock").
    fn adapter_type(&self) -> &str;

    /// Human-readable adapter summary.
    fn info(&self) -> String;

    /// Adapter configuration as a JSON document.
    fn default_config(&self) -> serde_json::Value;
}
