use async_trait::async_trait;
use std::time::Duration;
use tokio::net::TcpStream;
use crate::errors::{QueueError, QueueResult};
use crate::models::Tool;

/// Reaches a remote resource and reports the tools it can run.
#[async_trait]
pub trait ResourceConnector: Send + Sync {
    async fn connect(&self, address: &str, key: &str) -> QueueResult<Vec<Tool>>;
}

/// Probes the resource over TCP and advertises a fixed tool catalog for it.
pub struct TcpConnector {
    timeout: Duration,
    catalog: Vec<Tool>,
}

impl TcpConnector {
    pub fn new(timeout: Duration, catalog: Vec<Tool>) -> Self {
        Self { timeout, catalog }
    }
}

#[async_trait]
impl ResourceConnector for TcpConnector {
    async fn connect(&self, address: &str, key: &str) -> QueueResult<Vec<Tool>> {
        if key.is_empty() {
            return Err(QueueError::Connection(address.to_string(), "empty resource key".into()));
        }

        tracing::debug!(address, timeout_ms = self.timeout.as_millis() as u64, "Probing resource");
        match tokio::time::timeout(self.timeout, TcpStream::connect(address)).await {
            Ok(Ok(_stream)) => Ok(self.catalog.clone()),
            Ok(Err(e)) => Err(QueueError::Connection(address.to_string(), e.to_string())),
            Err(_) => Err(QueueError::Connection(address.to_string(), "timed out".into())),
        }
    }
}
