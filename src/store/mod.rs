// Copyright (c) 2025 - Cowboy AI, Inc.
//! Store Abstraction
//!
//! Repository traits for the records the catalog reads and writes. The core
//! never depends on a specific persistence mechanism; backends implement
//! these traits.
//!
//! # Backends
//!
//! - [`memory`] - `tokio::sync::RwLock` guarded maps, used by tests and the
//!   seed-file CLI
//! - [`nats`] - NATS JetStream key-value bucket for VM details
//!
//! # Store Requirements
//!
//! 1. **Unique keys**: `(vm_id, name)` never maps to two detail rows
//! 2. **Atomic writes**: a single upsert or re-parent is all-or-nothing
//! 3. **Ordered ids**: offering and domain ids ascend in creation order
//! 4. **Generations**: every domain write bumps [`DomainStore::generation`]

use async_trait::async_trait;

use crate::domain::{Domain, DomainId, DiskOffering, NewDiskOffering, OfferingId, VmDetail, VmId};
use crate::errors::CatalogResult;

pub mod memory;
pub mod nats;
pub mod seed;

pub use memory::{InMemoryCatalog, InMemoryVmDetailStore};
pub use nats::{DetailBucket, NatsVmDetailStore};
pub use seed::CatalogSeed;

/// Persistence of the domain tree
#[async_trait]
pub trait DomainStore: Send + Sync {
    /// Counter bumped by every domain write
    async fn generation(&self) -> CatalogResult<u64>;

    /// All domains together with the generation they belong to, read atomically
    async fn snapshot(&self) -> CatalogResult<(u64, Vec<Domain>)>;

    /// Create a child of `parent`
    ///
    /// # Errors
    /// - `NotFound` if the parent does not exist
    /// - `Conflict` if the parent already has a child with this name
    async fn insert_domain(&self, parent: DomainId, name: String) -> CatalogResult<Domain>;

    /// Re-parent a leaf domain
    ///
    /// # Errors
    /// - `NotFound` for an unknown domain or parent
    /// - `Validation` when moving the root or making a domain its own parent
    /// - `Conflict` when the domain has children or the name clashes under the new parent
    async fn set_parent(&self, id: DomainId, new_parent: DomainId) -> CatalogResult<Domain>;
}

/// Pure lookup and persistence of offering records
#[async_trait]
pub trait OfferingStore: Send + Sync {
    async fn get_offering(&self, id: OfferingId) -> CatalogResult<Option<DiskOffering>>;

    /// All offerings in ascending id order
    async fn list_offerings(&self) -> CatalogResult<Vec<DiskOffering>>;

    /// Offerings owned by exactly `domain`, ascending id order
    async fn list_offerings_owned_by(&self, domain: DomainId) -> CatalogResult<Vec<DiskOffering>>;

    async fn insert_offering(&self, offering: NewDiskOffering) -> CatalogResult<DiskOffering>;

    /// Replace an existing record; `NotFound` if it is gone
    async fn replace_offering(&self, offering: DiskOffering) -> CatalogResult<()>;

    /// Returns whether a record was removed
    async fn remove_offering(&self, id: OfferingId) -> CatalogResult<bool>;
}

/// Raw persistence of VM details
///
/// Implementations enforce `(vm_id, name)` uniqueness; validation happens in
/// [`crate::metadata::VmMetadataStore`].
#[async_trait]
pub trait VmDetailStore: Send + Sync {
    /// Insert or overwrite in place, keeping the row id
    async fn upsert(&self, vm_id: VmId, name: &str, value: &str) -> CatalogResult<VmDetail>;

    async fn find(&self, vm_id: VmId, name: &str) -> CatalogResult<Option<VmDetail>>;

    /// All details of one VM ordered by name
    async fn list_for_vm(&self, vm_id: VmId) -> CatalogResult<Vec<VmDetail>>;

    /// Returns whether a row was removed
    async fn remove(&self, vm_id: VmId, name: &str) -> CatalogResult<bool>;

    /// Remove every detail of a VM, returning how many were removed
    async fn remove_all(&self, vm_id: VmId) -> CatalogResult<usize>;

    /// Details named `name` across all VMs, ascending VM id
    async fn find_by_name(&self, name: &str) -> CatalogResult<Vec<VmDetail>>;
}
