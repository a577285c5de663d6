// Copyright (c) 2025 - Cowboy AI, Inc.
//! Service Layer for the Offering Catalog
//!
//! Application services that compose the store traits, the hierarchy cache
//! and the visibility rules.
//!
//! # Architecture
//!
//! ```text
//! API request (validated)
//!     ↓
//! Service Layer (this module)
//!     ↓
//! HierarchyCache ── DomainStore
//!     ↓
//! VisibilityResolver
//!     ↓
//! OfferingStore / VmMetadataStore
//! ```
//!
//! Reads never take locks beyond the store's own; both services share one
//! [`HierarchyCache`] so a domain write made through the admin service is
//! seen by the next query.

use std::sync::Arc;

use crate::config::CatalogConfig;
use crate::errors::CatalogResult;
use crate::hierarchy::HierarchyCache;
use crate::metadata::VmMetadataStore;
use crate::store::{
    CatalogSeed, DomainStore, InMemoryCatalog, InMemoryVmDetailStore, OfferingStore, VmDetailStore,
};

pub mod offering_admin;
pub mod offering_query;

pub use offering_admin::OfferingAdminService;
pub use offering_query::{
    ListOptions, OfferingFilter, OfferingOrder, OfferingPage, OfferingQueryService, PageRequest,
    StoreOfferingQueryService,
};

/// Query, admin and metadata services wired to one set of stores
pub struct CatalogServices {
    pub query: Arc<StoreOfferingQueryService>,
    pub admin: Arc<OfferingAdminService>,
    pub metadata: VmMetadataStore,
    pub config: CatalogConfig,
}

impl CatalogServices {
    pub fn new(
        domains: Arc<dyn DomainStore>,
        offerings: Arc<dyn OfferingStore>,
        details: Arc<dyn VmDetailStore>,
        config: CatalogConfig,
    ) -> Self {
        let hierarchy = Arc::new(HierarchyCache::new());
        let metadata = VmMetadataStore::new(details);

        let query = Arc::new(StoreOfferingQueryService::new(
            Arc::clone(&domains),
            Arc::clone(&offerings),
            Arc::clone(&hierarchy),
            &config,
        ));
        let admin = Arc::new(OfferingAdminService::new(
            domains,
            offerings,
            metadata.clone(),
            hierarchy,
            &config,
        ));

        Self {
            query,
            admin,
            metadata,
            config,
        }
    }

    /// Everything in process memory, loaded from a seed
    pub fn in_memory(seed: CatalogSeed, config: CatalogConfig) -> CatalogResult<Self> {
        let catalog = Arc::new(InMemoryCatalog::from_seed(seed)?);
        Ok(Self::new(
            catalog.clone(),
            catalog,
            Arc::new(InMemoryVmDetailStore::new()),
            config,
        ))
    }

    /// Same wiring with a caller-supplied detail backend
    pub fn in_memory_with_details(
        seed: CatalogSeed,
        details: Arc<dyn VmDetailStore>,
        config: CatalogConfig,
    ) -> CatalogResult<Self> {
        let catalog = Arc::new(InMemoryCatalog::from_seed(seed)?);
        Ok(Self::new(catalog.clone(), catalog, details, config))
    }
}
