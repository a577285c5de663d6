//! NATS client abstraction for the catalog's persistent backends

use async_nats::jetstream::{self, kv};
use async_nats::ConnectOptions;
use std::time::Duration;
use tracing::{debug, info};

use crate::errors::{CatalogError, CatalogResult};

/// Configuration for NATS connection
#[derive(Debug, Clone)]
pub struct NatsConfig {
    /// NATS server URLs
    pub servers: Vec<String>,
    /// Client name
    pub name: String,
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Request timeout
    pub request_timeout: Duration,
    /// Key-value bucket holding VM details
    pub detail_bucket: String,
}

impl Default for NatsConfig {
    fn default() -> Self {
        Self {
            servers: vec!["nats://localhost:4222".to_string()],
            name: "cim-offering-catalog".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(5),
            detail_bucket: "vm_details".to_string(),
        }
    }
}

impl NatsConfig {
    /// Overlay `NATS_URL` (comma separated), `NATS_CLIENT_NAME` and
    /// `NATS_DETAIL_BUCKET` on the defaults
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(urls) = std::env::var("NATS_URL") {
            let servers: Vec<String> = urls
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
            if !servers.is_empty() {
                config.servers = servers;
            }
        }
        if let Ok(name) = std::env::var("NATS_CLIENT_NAME") {
            config.name = name;
        }
        if let Ok(bucket) = std::env::var("NATS_DETAIL_BUCKET") {
            config.detail_bucket = bucket;
        }
        config
    }
}

/// NATS client wrapper providing catalog-specific operations
#[derive(Clone)]
pub struct NatsClient {
    jetstream: jetstream::Context,
}

impl NatsClient {
    /// Create a new NATS client with the given configuration
    pub async fn new(config: &NatsConfig) -> CatalogResult<Self> {
        let connect_options = ConnectOptions::new()
            .name(&config.name)
            .connection_timeout(config.connect_timeout)
            .request_timeout(Some(config.request_timeout));

        let client = async_nats::connect_with_options(config.servers.join(","), connect_options)
            .await
            .map_err(|e| CatalogError::Storage(format!("NATS connection error: {e}")))?;

        info!("Connected to NATS at {:?}", config.servers);

        Ok(Self {
            jetstream: jetstream::new(client),
        })
    }

    /// Open a key-value bucket, creating it on first use
    ///
    /// History is kept at one revision: the bucket is a current-state table,
    /// not an audit log.
    pub async fn key_value(&self, bucket: &str) -> CatalogResult<kv::Store> {
        match self.jetstream.get_key_value(bucket).await {
            Ok(store) => {
                debug!(bucket, "Opened existing key-value bucket");
                Ok(store)
            }
            Err(_) => {
                let store = self
                    .jetstream
                    .create_key_value(kv::Config {
                        bucket: bucket.to_string(),
                        history: 1,
                        ..Default::default()
                    })
                    .await
                    .map_err(|e| CatalogError::Storage(format!("KV bucket {bucket}: {e}")))?;
                info!(bucket, "Created key-value bucket");
                Ok(store)
            }
        }
    }
}
