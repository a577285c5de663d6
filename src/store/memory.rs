// Copyright (c) 2025 - Cowboy AI, Inc.
//! In-memory store backends

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::domain::{
    Domain, DomainId, DiskOffering, NewDiskOffering, OfferingId, ValidationError, VmDetail, VmId,
};
use crate::errors::{CatalogError, CatalogResult};
use crate::hierarchy::DomainHierarchy;
use crate::store::{CatalogSeed, DomainStore, OfferingStore, VmDetailStore};

#[derive(Debug)]
struct CatalogState {
    domains: BTreeMap<DomainId, Domain>,
    offerings: BTreeMap<OfferingId, DiskOffering>,
    next_domain_id: u64,
    next_offering_id: u64,
    generation: u64,
}

impl CatalogState {
    fn sibling_name_taken(&self, parent: DomainId, name: &str, except: Option<DomainId>) -> bool {
        self.domains.values().any(|d| {
            d.parent_id == Some(parent)
                && Some(d.id) != except
                && d.name.eq_ignore_ascii_case(name)
        })
    }

    fn has_children(&self, id: DomainId) -> bool {
        self.domains.values().any(|d| d.parent_id == Some(id))
    }
}

/// Domain tree and offering catalog held in process memory
///
/// One lock guards both tables so a domain write and its generation bump
/// are observed together.
#[derive(Debug)]
pub struct InMemoryCatalog {
    state: RwLock<CatalogState>,
}

impl InMemoryCatalog {
    /// Catalog holding only a root domain with id 1
    pub fn new(root_name: impl Into<String>) -> Self {
        let root = Domain::root(DomainId(1), root_name);
        let mut domains = BTreeMap::new();
        domains.insert(root.id, root);

        Self {
            state: RwLock::new(CatalogState {
                domains,
                offerings: BTreeMap::new(),
                next_domain_id: 2,
                next_offering_id: 1,
                generation: 1,
            }),
        }
    }

    /// Load a validated seed
    ///
    /// The domain list must form a single rooted tree and every offering
    /// owner must be one of its domains.
    pub fn from_seed(seed: CatalogSeed) -> CatalogResult<Self> {
        DomainHierarchy::new(seed.domains.iter().cloned())?;

        let mut domains = BTreeMap::new();
        for domain in seed.domains {
            domain.validate()?;
            if domains.insert(domain.id, domain.clone()).is_some() {
                return Err(CatalogError::Conflict(format!(
                    "duplicate domain id {} in seed",
                    domain.id
                )));
            }
        }

        let mut offerings = BTreeMap::new();
        for offering in seed.disk_offerings {
            offering.validate()?;
            if let Some(owner) = offering.owner_domain_id {
                if !domains.contains_key(&owner) {
                    return Err(CatalogError::not_found(DomainId::kind(), owner));
                }
            }
            if offerings.insert(offering.id, offering.clone()).is_some() {
                return Err(CatalogError::Conflict(format!(
                    "duplicate disk offering id {} in seed",
                    offering.id
                )));
            }
        }

        let next_domain_id = domains.keys().next_back().map_or(1, |id| id.get() + 1);
        let next_offering_id = offerings.keys().next_back().map_or(1, |id| id.get() + 1);

        info!(
            domains = domains.len(),
            offerings = offerings.len(),
            "Loaded catalog seed"
        );

        Ok(Self {
            state: RwLock::new(CatalogState {
                domains,
                offerings,
                next_domain_id,
                next_offering_id,
                generation: 1,
            }),
        })
    }
}

#[async_trait]
impl DomainStore for InMemoryCatalog {
    async fn generation(&self) -> CatalogResult<u64> {
        Ok(self.state.read().await.generation)
    }

    async fn snapshot(&self) -> CatalogResult<(u64, Vec<Domain>)> {
        let state = self.state.read().await;
        Ok((state.generation, state.domains.values().cloned().collect()))
    }

    async fn insert_domain(&self, parent: DomainId, name: String) -> CatalogResult<Domain> {
        let mut state = self.state.write().await;
        if !state.domains.contains_key(&parent) {
            return Err(CatalogError::not_found(DomainId::kind(), parent));
        }
        if state.sibling_name_taken(parent, &name, None) {
            return Err(CatalogError::Conflict(format!(
                "domain {parent} already has a child named {name:?}"
            )));
        }

        let domain = Domain::child(DomainId(state.next_domain_id), parent, name);
        domain.validate()?;
        state.next_domain_id += 1;
        state.generation += 1;
        state.domains.insert(domain.id, domain.clone());

        debug!(domain_id = %domain.id, parent_id = %parent, "Inserted domain");
        Ok(domain)
    }

    async fn set_parent(&self, id: DomainId, new_parent: DomainId) -> CatalogResult<Domain> {
        let mut state = self.state.write().await;
        let current = state
            .domains
            .get(&id)
            .cloned()
            .ok_or_else(|| CatalogError::not_found(DomainId::kind(), id))?;

        if current.is_root() {
            return Err(ValidationError::RootCannotMove.into());
        }
        if id == new_parent {
            return Err(ValidationError::SelfParent(id).into());
        }
        if !state.domains.contains_key(&new_parent) {
            return Err(CatalogError::not_found(DomainId::kind(), new_parent));
        }
        if state.has_children(id) {
            return Err(CatalogError::Conflict(format!(
                "domain {id} has children and cannot be moved"
            )));
        }
        if state.sibling_name_taken(new_parent, &current.name, Some(id)) {
            return Err(CatalogError::Conflict(format!(
                "domain {new_parent} already has a child named {:?}",
                current.name
            )));
        }

        let mut moved = current;
        moved.parent_id = Some(new_parent);
        state.domains.insert(id, moved.clone());
        state.generation += 1;

        debug!(domain_id = %id, parent_id = %new_parent, "Re-parented domain");
        Ok(moved)
    }
}

#[async_trait]
impl OfferingStore for InMemoryCatalog {
    async fn get_offering(&self, id: OfferingId) -> CatalogResult<Option<DiskOffering>> {
        Ok(self.state.read().await.offerings.get(&id).cloned())
    }

    async fn list_offerings(&self) -> CatalogResult<Vec<DiskOffering>> {
        Ok(self.state.read().await.offerings.values().cloned().collect())
    }

    async fn list_offerings_owned_by(&self, domain: DomainId) -> CatalogResult<Vec<DiskOffering>> {
        Ok(self
            .state
            .read()
            .await
            .offerings
            .values()
            .filter(|o| o.owner_domain_id == Some(domain))
            .cloned()
            .collect())
    }

    async fn insert_offering(&self, offering: NewDiskOffering) -> CatalogResult<DiskOffering> {
        let mut state = self.state.write().await;
        if let Some(owner) = offering.owner_domain_id {
            if !state.domains.contains_key(&owner) {
                return Err(CatalogError::not_found(DomainId::kind(), owner));
            }
        }

        let offering = offering.into_offering(OfferingId(state.next_offering_id));
        offering.validate()?;
        state.next_offering_id += 1;
        state.offerings.insert(offering.id, offering.clone());
        Ok(offering)
    }

    async fn replace_offering(&self, offering: DiskOffering) -> CatalogResult<()> {
        let mut state = self.state.write().await;
        match state.offerings.get_mut(&offering.id) {
            Some(existing) => {
                *existing = offering;
                Ok(())
            }
            None => Err(CatalogError::not_found(OfferingId::kind(), offering.id)),
        }
    }

    async fn remove_offering(&self, id: OfferingId) -> CatalogResult<bool> {
        Ok(self.state.write().await.offerings.remove(&id).is_some())
    }
}

/// VM details held in process memory, keyed by VM then by name
#[derive(Debug, Default)]
pub struct InMemoryVmDetailStore {
    details: RwLock<HashMap<VmId, BTreeMap<String, VmDetail>>>,
}

impl InMemoryVmDetailStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VmDetailStore for InMemoryVmDetailStore {
    async fn upsert(&self, vm_id: VmId, name: &str, value: &str) -> CatalogResult<VmDetail> {
        let mut details = self.details.write().await;
        let entries = details.entry(vm_id).or_default();
        let detail = match entries.get_mut(name) {
            Some(existing) => {
                existing.overwrite(value);
                existing.clone()
            }
            None => {
                let detail = VmDetail::new(vm_id, name, value);
                entries.insert(name.to_string(), detail.clone());
                detail
            }
        };
        Ok(detail)
    }

    async fn find(&self, vm_id: VmId, name: &str) -> CatalogResult<Option<VmDetail>> {
        Ok(self
            .details
            .read()
            .await
            .get(&vm_id)
            .and_then(|entries| entries.get(name))
            .cloned())
    }

    async fn list_for_vm(&self, vm_id: VmId) -> CatalogResult<Vec<VmDetail>> {
        Ok(self
            .details
            .read()
            .await
            .get(&vm_id)
            .map(|entries| entries.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn remove(&self, vm_id: VmId, name: &str) -> CatalogResult<bool> {
        let mut details = self.details.write().await;
        let Some(entries) = details.get_mut(&vm_id) else {
            return Ok(false);
        };
        let removed = entries.remove(name).is_some();
        if entries.is_empty() {
            details.remove(&vm_id);
        }
        Ok(removed)
    }

    async fn remove_all(&self, vm_id: VmId) -> CatalogResult<usize> {
        Ok(self
            .details
            .write()
            .await
            .remove(&vm_id)
            .map_or(0, |entries| entries.len()))
    }

    async fn find_by_name(&self, name: &str) -> CatalogResult<Vec<VmDetail>> {
        let details = self.details.read().await;
        let mut found: Vec<VmDetail> = details
            .values()
            .filter_map(|entries| entries.get(name))
            .cloned()
            .collect();
        found.sort_by_key(|detail| detail.vm_id);
        Ok(found)
    }
}
