// Copyright (c) 2025 - Cowboy AI, Inc.
//! Domain Hierarchy
//!
//! Immutable snapshot of the domain tree answering ancestry questions.
//!
//! All walks are iterative parent-pointer loops, so depth is bounded by the
//! tree, never by the call stack. A snapshot is validated on construction
//! (single root, known parents, no cycles), which lets every walk assume
//! termination.
//!
//! [`HierarchyCache`] keeps the last snapshot together with the store
//! generation it was built from and rebuilds whenever a domain write has
//! happened since.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::{Domain, DomainId, ValidationError};
use crate::errors::{CatalogError, CatalogResult};
use crate::store::DomainStore;

/// Validated, read-only view of the domain tree
#[derive(Debug, Clone)]
pub struct DomainHierarchy {
    domains: HashMap<DomainId, Domain>,
    children: HashMap<DomainId, Vec<DomainId>>,
    root: DomainId,
}

impl DomainHierarchy {
    /// Build a snapshot from a flat list of domains
    ///
    /// # Errors
    /// - `NoRoot` / `MultipleRoots` unless exactly one domain lacks a parent
    /// - `UnknownParent` when a parent id is not in the list
    /// - `CycleDetected` when a parent chain loops
    pub fn new(domains: impl IntoIterator<Item = Domain>) -> Result<Self, ValidationError> {
        let domains: HashMap<DomainId, Domain> =
            domains.into_iter().map(|d| (d.id, d)).collect();

        let mut root: Option<DomainId> = None;
        let mut children: HashMap<DomainId, Vec<DomainId>> = HashMap::new();

        for domain in domains.values() {
            match domain.parent_id {
                None => {
                    if let Some(existing) = root {
                        let (first, second) = if existing < domain.id {
                            (existing, domain.id)
                        } else {
                            (domain.id, existing)
                        };
                        return Err(ValidationError::MultipleRoots { first, second });
                    }
                    root = Some(domain.id);
                }
                Some(parent) if parent == domain.id => {
                    return Err(ValidationError::SelfParent(domain.id));
                }
                Some(parent) => {
                    if !domains.contains_key(&parent) {
                        return Err(ValidationError::UnknownParent {
                            domain: domain.id,
                            parent,
                        });
                    }
                    children.entry(parent).or_default().push(domain.id);
                }
            }
        }

        let root = root.ok_or(ValidationError::NoRoot)?;
        for ids in children.values_mut() {
            ids.sort();
        }

        let hierarchy = Self {
            domains,
            children,
            root,
        };
        hierarchy.check_acyclic()?;
        Ok(hierarchy)
    }

    /// Every domain must reach the root; a chain longer than the number of
    /// domains can only be a loop.
    fn check_acyclic(&self) -> Result<(), ValidationError> {
        let limit = self.domains.len();
        let mut reaches_root: HashSet<DomainId> = HashSet::with_capacity(limit);
        reaches_root.insert(self.root);

        for start in self.domains.keys() {
            let mut chain = Vec::new();
            let mut current = *start;
            while !reaches_root.contains(&current) {
                if chain.len() > limit {
                    return Err(ValidationError::CycleDetected(*start));
                }
                chain.push(current);
                current = match self.domains.get(&current).and_then(|d| d.parent_id) {
                    Some(parent) => parent,
                    None => return Err(ValidationError::CycleDetected(*start)),
                };
            }
            reaches_root.extend(chain);
        }
        Ok(())
    }

    pub fn root(&self) -> DomainId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    pub fn contains(&self, id: DomainId) -> bool {
        self.domains.contains_key(&id)
    }

    pub fn get(&self, id: DomainId) -> Option<&Domain> {
        self.domains.get(&id)
    }

    /// Look up a domain, failing with `NotFound`
    pub fn require(&self, id: DomainId) -> CatalogResult<&Domain> {
        self.get(id)
            .ok_or_else(|| CatalogError::not_found(DomainId::kind(), id))
    }

    /// Direct children in ascending id order
    pub fn children(&self, id: DomainId) -> &[DomainId] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_children(&self, id: DomainId) -> bool {
        !self.children(id).is_empty()
    }

    /// True iff `ancestor` is `descendant` itself or a proper ancestor of it
    ///
    /// Unknown ids on either side yield `false`.
    pub fn is_ancestor_of(&self, ancestor: DomainId, descendant: DomainId) -> bool {
        if !self.contains(ancestor) {
            return false;
        }
        let mut current = self.get(descendant);
        while let Some(domain) = current {
            if domain.id == ancestor {
                return true;
            }
            current = domain.parent_id.and_then(|parent| self.get(parent));
        }
        false
    }

    /// Ids from `id` up to the root, both inclusive
    pub fn path_to_root(&self, id: DomainId) -> CatalogResult<Vec<DomainId>> {
        let start = self.require(id)?;
        let mut path = vec![start.id];
        let mut current = start.parent_id;
        while let Some(parent) = current {
            path.push(parent);
            current = self.domains.get(&parent).and_then(|d| d.parent_id);
        }
        Ok(path)
    }

    /// Slash separated names from the root down to `id`, e.g. `ROOT/eng/ci`
    pub fn path_names(&self, id: DomainId) -> CatalogResult<String> {
        let path = self.path_to_root(id)?;
        let names: Vec<&str> = path
            .iter()
            .rev()
            .filter_map(|d| self.get(*d).map(|domain| domain.name.as_str()))
            .collect();
        Ok(names.join("/"))
    }

    /// `id` and every domain below it, breadth first
    pub fn subtree(&self, id: DomainId) -> CatalogResult<Vec<DomainId>> {
        self.require(id)?;
        let mut out = vec![id];
        let mut next = 0;
        while next < out.len() {
            let current = out[next];
            out.extend_from_slice(self.children(current));
            next += 1;
        }
        Ok(out)
    }
}

/// Generation-checked cache of the domain snapshot
///
/// The cached tree is reused only while the store reports the generation it
/// was built from; any domain write invalidates it.
#[derive(Default)]
pub struct HierarchyCache {
    cached: RwLock<Option<(u64, Arc<DomainHierarchy>)>>,
}

impl HierarchyCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot, rebuilt if the store has moved on
    pub async fn current(&self, store: &dyn DomainStore) -> CatalogResult<Arc<DomainHierarchy>> {
        let generation = store.generation().await?;
        if let Some((cached_generation, hierarchy)) = self.cached.read().await.as_ref() {
            if *cached_generation == generation {
                return Ok(Arc::clone(hierarchy));
            }
        }

        let (generation, domains) = store.snapshot().await?;
        let hierarchy = Arc::new(DomainHierarchy::new(domains)?);
        debug!(generation, domains = hierarchy.len(), "Rebuilt domain hierarchy");

        let mut cached = self.cached.write().await;
        match cached.as_ref() {
            Some((newer, existing)) if *newer > generation => Ok(Arc::clone(existing)),
            _ => {
                *cached = Some((generation, Arc::clone(&hierarchy)));
                Ok(hierarchy)
            }
        }
    }
}
