//! Mock adapter for tests
//!
//! Records every command sent and answers queries from a scripted queue of
//! canned responses, so command translation can be verified without hardware.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::json;
use tokio::sync::Mutex;

use super::{AdapterError, HardwareAdapter};

/// In-memory adapter used by unit and integration tests.
///
/// Cloning shares the transcript and the response queue, so a test can keep a
/// handle for inspection while the driver owns the boxed adapter.
#[derive(Clone)]
pub struct MockAdapter {
    connected: Arc<AtomicBool>,
    sent: Arc<Mutex<Vec<String>>>,
    responses: Arc<Mutex<VecDeque<String>>>,
}

impl MockAdapter {
    /// Create a disconnected mock with no scripted responses.
    pub fn new() -> Self {
        Self {
            connected: Arc::new(AtomicBool::new(false)),
            sent: Arc::new(Mutex::new(Vec::new())),
            responses: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    /// Create a disconnected mock preloaded with canned query responses,
    /// returned in order.
    pub fn with_responses<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            connected: Arc::new(AtomicBool::new(false)),
            sent: Arc::new(Mutex::new(Vec::new())),
            responses: Arc::new(Mutex::new(responses.into_iter().map(Into::into).collect())),
        }
    }

    /// Append one canned response to the queue.
    pub async fn push_response(&self, response: impl Into<String>) {
        self.responses.lock().await.push_back(response.into());
    }

    /// Commands sent so far, queries included, in transmission order.
    pub async fn sent_commands(&self) -> Vec<String> {
        self.sent.lock().await.clone()
    }
}

impl Default for MockAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HardwareAdapter for MockAdapter {
    async fn connect(&mut self) -> Result<()> {
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<()> {
        self.connected.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn send(&mut self, command: &str) -> Result<()> {
        if !self.is_connected() {
            return Err(AdapterError::NotConnected.into());
        }
        self.sent.lock().await.push(command.to_string());
        Ok(())
    }

    async fn query(&mut self, command: &str) -> Result<String> {
        if !self.is_connected() {
            return Err(AdapterError::NotConnected.into());
        }
        self.sent.lock().await.push(command.to_string());
        Ok(self.responses.lock().await.pop_front().unwrap_or_default())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn adapter_type(&self) -> &str {
        "mock"
    }

    fn info(&self) -> String {
        "MockAdapter".to_string()
    }

    fn default_config(&self) -> serde_json::Value {
        json!({})
    }
}
