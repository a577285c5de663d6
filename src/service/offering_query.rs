// Copyright (c) 2025 - Cowboy AI, Inc.
//! Offering Query Service
//!
//! Answers "which disk offerings can this caller see", optionally narrowed
//! by id, name, keyword or owning domain.
//!
//! # Resolution
//!
//! ```text
//! id set?  ──yes──> single record (other filters ignored)
//!   │no
//!   ▼
//! domain_id set? ──yes──> offerings owned exactly by that domain
//!   │no                    │
//!   ▼                      ▼
//! all offerings ──> name / keyword predicates
//!                          │
//!                          ▼
//!                  visibility per candidate
//!                          │
//!                          ▼
//!                   sort ──> page
//! ```
//!
//! Hidden records are dropped silently: an id lookup for an offering the
//! caller cannot see returns an empty page, exactly like an unknown id.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{CatalogConfig, NameMatchMode};
use crate::domain::{DiskOffering, DomainId, OfferingId};
use crate::errors::{CatalogError, CatalogResult};
use crate::hierarchy::{DomainHierarchy, HierarchyCache};
use crate::store::{DomainStore, OfferingStore};
use crate::visibility::VisibilityResolver;

/// Optional narrowing criteria; all unset lists every visible offering
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OfferingFilter {
    pub id: Option<OfferingId>,
    pub name: Option<String>,
    pub domain_id: Option<DomainId>,
    pub keyword: Option<String>,
}

impl OfferingFilter {
    pub fn by_id(id: OfferingId) -> Self {
        Self {
            id: Some(id),
            ..Default::default()
        }
    }

    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn by_domain(domain_id: DomainId) -> Self {
        Self {
            domain_id: Some(domain_id),
            ..Default::default()
        }
    }
}

/// Result ordering; ties always fall back to ascending id
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferingOrder {
    #[default]
    IdAsc,
    IdDesc,
    NameAsc,
    NameDesc,
    CreatedAsc,
}

impl OfferingOrder {
    fn compare(&self, a: &DiskOffering, b: &DiskOffering) -> Ordering {
        let primary = match self {
            OfferingOrder::IdAsc => Ordering::Equal,
            OfferingOrder::IdDesc => b.id.cmp(&a.id),
            OfferingOrder::NameAsc => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            OfferingOrder::NameDesc => b.name.to_lowercase().cmp(&a.name.to_lowercase()),
            OfferingOrder::CreatedAsc => a.created_at.cmp(&b.created_at),
        };
        primary.then_with(|| a.id.cmp(&b.id))
    }

    pub fn sort(&self, offerings: &mut [DiskOffering]) {
        offerings.sort_by(|a, b| self.compare(a, b));
    }
}

/// 1-based page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub page_size: usize,
}

impl PageRequest {
    pub fn new(page: usize, page_size: usize) -> Self {
        Self { page, page_size }
    }

    fn window<T>(&self, items: Vec<T>) -> Vec<T> {
        let start = self.page.saturating_sub(1).saturating_mul(self.page_size);
        items.into_iter().skip(start).take(self.page_size).collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListOptions {
    pub order: OfferingOrder,
    /// `None` returns every match
    pub page: Option<PageRequest>,
}

/// One page of visible offerings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OfferingPage {
    /// Visible matches before paging
    pub total: usize,
    pub items: Vec<DiskOffering>,
    /// Names of the owning domains of `items`
    pub owner_names: BTreeMap<DomainId, String>,
}

impl OfferingPage {
    pub fn ids(&self) -> Vec<OfferingId> {
        self.items.iter().map(|o| o.id).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Read side of the offering catalog
#[async_trait]
pub trait OfferingQueryService: Send + Sync {
    /// List offerings visible to `caller`
    ///
    /// # Errors
    /// - `NotFound` if `caller` or `filter.domain_id` is not a known domain
    async fn list(
        &self,
        caller: DomainId,
        filter: OfferingFilter,
        options: ListOptions,
    ) -> CatalogResult<OfferingPage>;

    /// Resolve one offering; hidden and absent are both `NotFound`
    async fn get(&self, caller: DomainId, id: OfferingId) -> CatalogResult<DiskOffering>;
}

/// [`OfferingQueryService`] over the store traits
pub struct StoreOfferingQueryService {
    domains: Arc<dyn DomainStore>,
    offerings: Arc<dyn OfferingStore>,
    hierarchy: Arc<HierarchyCache>,
    name_match: NameMatchMode,
}

impl StoreOfferingQueryService {
    pub fn new(
        domains: Arc<dyn DomainStore>,
        offerings: Arc<dyn OfferingStore>,
        hierarchy: Arc<HierarchyCache>,
        config: &CatalogConfig,
    ) -> Self {
        Self {
            domains,
            offerings,
            hierarchy,
            name_match: config.name_match,
        }
    }

    /// Current domain tree snapshot
    pub async fn hierarchy(&self) -> CatalogResult<Arc<DomainHierarchy>> {
        self.hierarchy.current(self.domains.as_ref()).await
    }

    async fn candidates(
        &self,
        hierarchy: &DomainHierarchy,
        filter: &OfferingFilter,
    ) -> CatalogResult<Vec<DiskOffering>> {
        if let Some(id) = filter.id {
            return Ok(self.offerings.get_offering(id).await?.into_iter().collect());
        }

        let mut candidates = match filter.domain_id {
            Some(domain_id) => {
                hierarchy.require(domain_id)?;
                self.offerings.list_offerings_owned_by(domain_id).await?
            }
            None => self.offerings.list_offerings().await?,
        };

        if let Some(name) = &filter.name {
            candidates.retain(|o| self.name_match.matches(&o.name, name));
        }
        if let Some(keyword) = &filter.keyword {
            let keyword = keyword.to_lowercase();
            candidates.retain(|o| {
                o.name.to_lowercase().contains(&keyword)
                    || o.display_text.to_lowercase().contains(&keyword)
            });
        }
        Ok(candidates)
    }
}

#[async_trait]
impl OfferingQueryService for StoreOfferingQueryService {
    async fn list(
        &self,
        caller: DomainId,
        filter: OfferingFilter,
        options: ListOptions,
    ) -> CatalogResult<OfferingPage> {
        let hierarchy = self.hierarchy().await?;
        hierarchy.require(caller)?;

        let candidates = self.candidates(&hierarchy, &filter).await?;
        let candidate_count = candidates.len();

        let resolver = VisibilityResolver::new(&hierarchy);
        let mut visible: Vec<DiskOffering> = candidates
            .into_iter()
            .filter(|o| resolver.is_visible(caller, o))
            .collect();
        options.order.sort(&mut visible);

        let total = visible.len();
        let items = match options.page {
            Some(page) => page.window(visible),
            None => visible,
        };

        let owner_names = items
            .iter()
            .filter_map(|o| o.owner_domain_id)
            .filter_map(|id| hierarchy.get(id).map(|d| (id, d.name.clone())))
            .collect();

        debug!(
            %caller,
            candidates = candidate_count,
            visible = total,
            returned = items.len(),
            "Listed disk offerings"
        );

        Ok(OfferingPage {
            total,
            items,
            owner_names,
        })
    }

    async fn get(&self, caller: DomainId, id: OfferingId) -> CatalogResult<DiskOffering> {
        let hierarchy = self.hierarchy().await?;
        hierarchy.require(caller)?;

        let resolver = VisibilityResolver::new(&hierarchy);
        self.offerings
            .get_offering(id)
            .await?
            .filter(|o| resolver.is_visible(caller, o))
            .ok_or_else(|| CatalogError::not_found(OfferingId::kind(), id))
    }
}
