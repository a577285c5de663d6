// Copyright (c) 2025 - Cowboy AI, Inc.
//! NATS JetStream key-value backend for VM details
//!
//! Each `(vm_id, name)` pair is one bucket entry, so the bucket itself
//! enforces key uniqueness and `put` gives last-writer-wins upserts.
//!
//! # Key layout
//!
//! ```text
//! vm.<vm_id>.<encoded name>
//! ```
//!
//! Detail names may contain characters KV keys do not allow; every byte
//! outside `[A-Za-z0-9-]` is written as `_XX` (upper-case hex).

use async_nats::jetstream::kv;
use async_trait::async_trait;
use futures::StreamExt;
use tracing::debug;

use crate::domain::{VmDetail, VmId};
use crate::errors::{CatalogError, CatalogResult};
use crate::nats::{NatsClient, NatsConfig};
use crate::store::VmDetailStore;

/// Bucket operations the detail store relies on
#[async_trait]
pub trait DetailBucket: Send + Sync {
    async fn get(&self, key: &str) -> CatalogResult<Option<Vec<u8>>>;

    /// Unconditional write, returns the new revision
    async fn put(&self, key: &str, value: Vec<u8>) -> CatalogResult<u64>;

    /// Write only if `key` holds no value yet
    async fn create(&self, key: &str, value: Vec<u8>) -> CatalogResult<u64>;

    async fn delete(&self, key: &str) -> CatalogResult<()>;

    /// Every live key in the bucket
    async fn keys(&self) -> CatalogResult<Vec<String>>;
}

#[async_trait]
impl DetailBucket for kv::Store {
    async fn get(&self, key: &str) -> CatalogResult<Option<Vec<u8>>> {
        kv::Store::get(self, key)
            .await
            .map(|entry| entry.map(|bytes| bytes.to_vec()))
            .map_err(|e| CatalogError::Storage(format!("KV get {key}: {e}")))
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> CatalogResult<u64> {
        kv::Store::put(self, key, value.into())
            .await
            .map_err(|e| CatalogError::Storage(format!("KV put {key}: {e}")))
    }

    async fn create(&self, key: &str, value: Vec<u8>) -> CatalogResult<u64> {
        // revision 0: the key must not exist yet
        kv::Store::update(self, key, value.into(), 0)
            .await
            .map_err(|e| CatalogError::Storage(format!("KV create {key}: {e}")))
    }

    async fn delete(&self, key: &str) -> CatalogResult<()> {
        kv::Store::delete(self, key)
            .await
            .map_err(|e| CatalogError::Storage(format!("KV delete {key}: {e}")))
    }

    async fn keys(&self) -> CatalogResult<Vec<String>> {
        let mut stream = kv::Store::keys(self)
            .await
            .map_err(|e| CatalogError::Storage(format!("KV keys: {e}")))?;

        let mut keys = Vec::new();
        while let Some(key) = stream.next().await {
            keys.push(key.map_err(|e| CatalogError::Storage(format!("KV keys: {e}")))?);
        }
        Ok(keys)
    }
}

/// VM detail store backed by a JetStream key-value bucket
pub struct NatsVmDetailStore<B = kv::Store> {
    bucket: B,
}

impl NatsVmDetailStore<kv::Store> {
    /// Connect and open the configured detail bucket
    pub async fn connect(config: &NatsConfig) -> CatalogResult<Self> {
        let client = NatsClient::new(config).await?;
        let kv = client.key_value(&config.detail_bucket).await?;
        Ok(Self::new(kv))
    }
}

impl<B: DetailBucket> NatsVmDetailStore<B> {
    pub fn new(bucket: B) -> Self {
        Self { bucket }
    }

    async fn read(&self, key: &str) -> CatalogResult<Option<VmDetail>> {
        match self.bucket.get(key).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn write(&self, key: &str, detail: &VmDetail) -> CatalogResult<()> {
        self.bucket.put(key, serde_json::to_vec(detail)?).await?;
        Ok(())
    }

    async fn keys_matching(&self, predicate: impl Fn(&str) -> bool) -> CatalogResult<Vec<String>> {
        let mut keys = self.bucket.keys().await?;
        keys.retain(|key| predicate(key));
        Ok(keys)
    }

    async fn read_all(&self, keys: Vec<String>) -> CatalogResult<Vec<VmDetail>> {
        let mut details = Vec::with_capacity(keys.len());
        for key in keys {
            // a key listed a moment ago may have been deleted since
            if let Some(detail) = self.read(&key).await? {
                details.push(detail);
            }
        }
        Ok(details)
    }
}

#[async_trait]
impl<B: DetailBucket> VmDetailStore for NatsVmDetailStore<B> {
    async fn upsert(&self, vm_id: VmId, name: &str, value: &str) -> CatalogResult<VmDetail> {
        let key = detail_key(vm_id, name);

        if let Some(mut existing) = self.read(&key).await? {
            existing.overwrite(value);
            self.write(&key, &existing).await?;
            return Ok(existing);
        }

        let detail = VmDetail::new(vm_id, name, value);
        match self.bucket.create(&key, serde_json::to_vec(&detail)?).await {
            Ok(revision) => {
                debug!(%vm_id, name, revision, "Created VM detail");
                Ok(detail)
            }
            Err(create_err) => {
                // a concurrent writer created the row first; keep its id
                let mut winner = self.read(&key).await?.ok_or(create_err)?;
                winner.overwrite(value);
                self.write(&key, &winner).await?;
                Ok(winner)
            }
        }
    }

    async fn find(&self, vm_id: VmId, name: &str) -> CatalogResult<Option<VmDetail>> {
        self.read(&detail_key(vm_id, name)).await
    }

    async fn list_for_vm(&self, vm_id: VmId) -> CatalogResult<Vec<VmDetail>> {
        let prefix = vm_prefix(vm_id);
        let keys = self.keys_matching(|key| key.starts_with(&prefix)).await?;
        let mut details = self.read_all(keys).await?;
        details.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(details)
    }

    async fn remove(&self, vm_id: VmId, name: &str) -> CatalogResult<bool> {
        let key = detail_key(vm_id, name);
        if self.read(&key).await?.is_none() {
            return Ok(false);
        }
        self.bucket.delete(&key).await?;
        Ok(true)
    }

    async fn remove_all(&self, vm_id: VmId) -> CatalogResult<usize> {
        let prefix = vm_prefix(vm_id);
        let keys = self.keys_matching(|key| key.starts_with(&prefix)).await?;
        let count = keys.len();
        for key in keys {
            self.bucket.delete(&key).await?;
        }
        debug!(%vm_id, count, "Removed VM details");
        Ok(count)
    }

    async fn find_by_name(&self, name: &str) -> CatalogResult<Vec<VmDetail>> {
        let suffix = format!(".{}", encode_name(name));
        let keys = self
            .keys_matching(|key| key.starts_with("vm.") && key.ends_with(&suffix))
            .await?;
        let mut details: Vec<VmDetail> = self
            .read_all(keys)
            .await?
            .into_iter()
            .filter(|detail| detail.name == name)
            .collect();
        details.sort_by_key(|detail| detail.vm_id);
        Ok(details)
    }
}

fn vm_prefix(vm_id: VmId) -> String {
    format!("vm.{vm_id}.")
}

fn detail_key(vm_id: VmId, name: &str) -> String {
    format!("{}{}", vm_prefix(vm_id), encode_name(name))
}

fn encode_name(name: &str) -> String {
    let mut encoded = String::with_capacity(name.len());
    for byte in name.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("_{byte:02X}"));
        }
    }
    encoded
}
