// Copyright (c) 2025 - Cowboy AI, Inc.
//! VM Metadata Store
//!
//! Validated key-value attributes of virtual machines. Each VM owns zero or
//! more uniquely named entries; writing an existing name overwrites it in
//! place. Atomicity of a single upsert is delegated to the backend's unique
//! key, the store adds no locking of its own.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::invariants::{validate_detail_name, validate_detail_value};
use crate::domain::{VmDetail, VmId};
use crate::errors::{CatalogError, CatalogResult};
use crate::store::VmDetailStore;

/// Validating front of a [`VmDetailStore`] backend
#[derive(Clone)]
pub struct VmMetadataStore {
    backend: Arc<dyn VmDetailStore>,
}

impl VmMetadataStore {
    pub fn new(backend: Arc<dyn VmDetailStore>) -> Self {
        Self { backend }
    }

    /// Insert or overwrite `name` for `vm_id`
    ///
    /// # Errors
    /// - `Validation` for an empty or over-long name, or a value over 1024 characters
    pub async fn set(&self, vm_id: VmId, name: &str, value: &str) -> CatalogResult<VmDetail> {
        validate_detail_name(name)?;
        validate_detail_value(value)?;

        let detail = self.backend.upsert(vm_id, name, value).await?;
        info!(%vm_id, name, detail_id = %detail.id, "Set VM detail");
        Ok(detail)
    }

    /// Value stored under `name`, or `NotFound`
    pub async fn get(&self, vm_id: VmId, name: &str) -> CatalogResult<String> {
        self.backend
            .find(vm_id, name)
            .await?
            .map(|detail| detail.value)
            .ok_or_else(|| CatalogError::not_found("VM detail", format!("{vm_id}/{name}")))
    }

    /// Every detail of a VM as a name → value map
    pub async fn list_for(&self, vm_id: VmId) -> CatalogResult<BTreeMap<String, String>> {
        let details = self.backend.list_for_vm(vm_id).await?;
        debug!(%vm_id, count = details.len(), "Listed VM details");
        Ok(details
            .into_iter()
            .map(|detail| (detail.name, detail.value))
            .collect())
    }

    /// Full detail records, ordered by name
    pub async fn details_for(&self, vm_id: VmId) -> CatalogResult<Vec<VmDetail>> {
        self.backend.list_for_vm(vm_id).await
    }

    /// Remove `name`; absent keys are not an error
    pub async fn delete(&self, vm_id: VmId, name: &str) -> CatalogResult<()> {
        let removed = self.backend.remove(vm_id, name).await?;
        debug!(%vm_id, name, removed, "Deleted VM detail");
        Ok(())
    }

    /// Drop every detail of a destroyed VM
    pub async fn remove_all(&self, vm_id: VmId) -> CatalogResult<usize> {
        let count = self.backend.remove_all(vm_id).await?;
        info!(%vm_id, count, "Removed all VM details");
        Ok(count)
    }

    /// VMs holding `name = value`, ascending
    pub async fn vms_with(&self, name: &str, value: &str) -> CatalogResult<Vec<VmId>> {
        self.vms_where(name, |stored| stored == value).await
    }

    /// VMs holding a detail `name` whose value satisfies `predicate`, ascending
    pub async fn vms_where(
        &self,
        name: &str,
        predicate: impl Fn(&str) -> bool + Send,
    ) -> CatalogResult<Vec<VmId>> {
        let mut vms: Vec<VmId> = self
            .backend
            .find_by_name(name)
            .await?
            .into_iter()
            .filter(|detail| predicate(&detail.value))
            .map(|detail| detail.vm_id)
            .collect();
        vms.sort();
        vms.dedup();
        Ok(vms)
    }
}
