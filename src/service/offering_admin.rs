// Copyright (c) 2025 - Cowboy AI, Inc.
//! Offering Administration Service
//!
//! Write side of the catalog: domains and disk offerings.
//!
//! # Authority
//!
//! Writes flow upward through the tree: a caller administers its own domain
//! and every descendant. Global offerings belong to the root domain.
//!
//! # Failure order
//!
//! 1. Offering neither administered nor visible → `NotFound` (existence is
//!    not confirmed)
//! 2. Visible but not administered by the caller → `PermissionDenied`
//! 3. Referenced by a VM detail → `Conflict`

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::CatalogConfig;
use crate::domain::invariants::validate_name;
use crate::domain::{
    DiskOffering, DiskOfferingUpdate, Domain, DomainId, NewDiskOffering, OfferingId,
};
use crate::errors::{CatalogError, CatalogResult};
use crate::hierarchy::{DomainHierarchy, HierarchyCache};
use crate::metadata::VmMetadataStore;
use crate::store::{DomainStore, OfferingStore};
use crate::visibility::VisibilityResolver;

pub struct OfferingAdminService {
    domains: Arc<dyn DomainStore>,
    offerings: Arc<dyn OfferingStore>,
    metadata: VmMetadataStore,
    hierarchy: Arc<HierarchyCache>,
    offering_reference_key: String,
}

impl OfferingAdminService {
    pub fn new(
        domains: Arc<dyn DomainStore>,
        offerings: Arc<dyn OfferingStore>,
        metadata: VmMetadataStore,
        hierarchy: Arc<HierarchyCache>,
        config: &CatalogConfig,
    ) -> Self {
        Self {
            domains,
            offerings,
            metadata,
            hierarchy,
            offering_reference_key: config.offering_reference_key.clone(),
        }
    }

    async fn current_hierarchy(&self, caller: DomainId) -> CatalogResult<Arc<DomainHierarchy>> {
        let hierarchy = self.hierarchy.current(self.domains.as_ref()).await?;
        hierarchy.require(caller)?;
        Ok(hierarchy)
    }

    fn ensure_manages_domain(
        hierarchy: &DomainHierarchy,
        caller: DomainId,
        domain: DomainId,
    ) -> CatalogResult<()> {
        if VisibilityResolver::new(hierarchy).can_manage_domain(caller, domain) {
            Ok(())
        } else {
            warn!(%caller, %domain, "Rejected domain write outside caller scope");
            Err(CatalogError::PermissionDenied(format!(
                "domain {} does not administer domain {}",
                hierarchy.path_names(caller)?,
                hierarchy.path_names(domain)?
            )))
        }
    }

    /// Create `name` under `parent`
    pub async fn create_domain(
        &self,
        caller: DomainId,
        parent: DomainId,
        name: &str,
    ) -> CatalogResult<Domain> {
        validate_name("domain name", name)?;
        let hierarchy = self.current_hierarchy(caller).await?;
        hierarchy.require(parent)?;
        Self::ensure_manages_domain(&hierarchy, caller, parent)?;

        let domain = self.domains.insert_domain(parent, name.to_string()).await?;
        info!(%caller, domain_id = %domain.id, parent_id = %parent, "Created domain");
        Ok(domain)
    }

    /// Re-parent a leaf domain
    ///
    /// The caller must administer both the current and the new parent.
    pub async fn move_domain(
        &self,
        caller: DomainId,
        id: DomainId,
        new_parent: DomainId,
    ) -> CatalogResult<Domain> {
        let hierarchy = self.current_hierarchy(caller).await?;
        let domain = hierarchy.require(id)?;
        hierarchy.require(new_parent)?;

        if let Some(old_parent) = domain.parent_id {
            Self::ensure_manages_domain(&hierarchy, caller, old_parent)?;
        }
        Self::ensure_manages_domain(&hierarchy, caller, new_parent)?;

        let moved = self.domains.set_parent(id, new_parent).await?;
        info!(%caller, domain_id = %id, parent_id = %new_parent, "Moved domain");
        Ok(moved)
    }

    pub async fn create_offering(
        &self,
        caller: DomainId,
        offering: NewDiskOffering,
    ) -> CatalogResult<DiskOffering> {
        offering.validate()?;
        let hierarchy = self.current_hierarchy(caller).await?;

        match offering.owner_domain_id {
            Some(owner) => {
                hierarchy.require(owner)?;
                Self::ensure_manages_domain(&hierarchy, caller, owner)?;
            }
            None if caller != hierarchy.root() => {
                warn!(%caller, "Rejected global offering from non-root domain");
                return Err(CatalogError::PermissionDenied(
                    "global offerings can only be created from the root domain".to_string(),
                ));
            }
            None => {}
        }

        let created = self.offerings.insert_offering(offering).await?;
        info!(%caller, offering_id = %created.id, "Created disk offering");
        Ok(created)
    }

    pub async fn update_offering(
        &self,
        caller: DomainId,
        id: OfferingId,
        update: DiskOfferingUpdate,
    ) -> CatalogResult<DiskOffering> {
        let current = self.load_for_write(caller, id).await?;
        if update.is_empty() {
            return Ok(current);
        }
        self.ensure_unreferenced(id).await?;

        let updated = update.apply_to(&current)?;
        self.offerings.replace_offering(updated.clone()).await?;
        info!(%caller, offering_id = %id, "Updated disk offering");
        Ok(updated)
    }

    pub async fn delete_offering(&self, caller: DomainId, id: OfferingId) -> CatalogResult<()> {
        self.load_for_write(caller, id).await?;
        self.ensure_unreferenced(id).await?;

        if !self.offerings.remove_offering(id).await? {
            return Err(CatalogError::not_found(OfferingId::kind(), id));
        }
        info!(%caller, offering_id = %id, "Deleted disk offering");
        Ok(())
    }

    async fn load_for_write(&self, caller: DomainId, id: OfferingId) -> CatalogResult<DiskOffering> {
        let hierarchy = self.current_hierarchy(caller).await?;
        let resolver = VisibilityResolver::new(&hierarchy);

        let offering = self
            .offerings
            .get_offering(id)
            .await?
            .filter(|o| resolver.can_manage(caller, o) || resolver.is_visible(caller, o))
            .ok_or_else(|| CatalogError::not_found(OfferingId::kind(), id))?;

        if !resolver.can_manage(caller, &offering) {
            warn!(%caller, offering_id = %id, "Rejected offering write outside caller scope");
            return Err(CatalogError::PermissionDenied(format!(
                "domain {} does not administer disk offering {id}",
                hierarchy.path_names(caller)?
            )));
        }
        Ok(offering)
    }

    async fn ensure_unreferenced(&self, id: OfferingId) -> CatalogResult<()> {
        let vms = self
            .metadata
            .vms_where(&self.offering_reference_key, |value| {
                value.parse::<OfferingId>().is_ok_and(|referenced| referenced == id)
            })
            .await?;
        if vms.is_empty() {
            return Ok(());
        }

        let vm_list: Vec<String> = vms.iter().map(ToString::to_string).collect();
        warn!(offering_id = %id, vms = %vm_list.join(","), "Offering is referenced by VMs");
        Err(CatalogError::Conflict(format!(
            "disk offering {id} is referenced by VM(s) {}",
            vm_list.join(", ")
        )))
    }
}
