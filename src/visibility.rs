// Copyright (c) 2025 - Cowboy AI, Inc.
//! Visibility Resolver
//!
//! Decides whether a caller scoped to one domain may see, or manage, an
//! offering owned by another.
//!
//! # Visibility
//!
//! An offering is visible when any of these hold:
//! 1. it has no owner (global)
//! 2. it is public
//! 3. its owner is the caller's domain or an ancestor of it
//!
//! Rule 3 is directional: ownership flows down the tree. A parent-domain
//! caller does not see offerings owned by a child, and siblings never see
//! each other's offerings.
//!
//! # Management
//!
//! Mutations run the other way: administrators of the owning domain or any
//! ancestor of it may manage an offering; global offerings belong to the
//! root.

use crate::domain::{DiskOffering, DomainId};
use crate::hierarchy::DomainHierarchy;

/// Stateless policy evaluated against a hierarchy snapshot
#[derive(Debug, Clone, Copy)]
pub struct VisibilityResolver<'a> {
    hierarchy: &'a DomainHierarchy,
}

impl<'a> VisibilityResolver<'a> {
    pub fn new(hierarchy: &'a DomainHierarchy) -> Self {
        Self { hierarchy }
    }

    pub fn is_visible(&self, caller: DomainId, offering: &DiskOffering) -> bool {
        match offering.owner_domain_id {
            None => true,
            Some(_) if offering.is_public => true,
            Some(owner) => self.hierarchy.is_ancestor_of(owner, caller),
        }
    }

    pub fn can_manage(&self, caller: DomainId, offering: &DiskOffering) -> bool {
        match offering.owner_domain_id {
            None => caller == self.hierarchy.root(),
            Some(owner) => self.can_manage_domain(caller, owner),
        }
    }

    /// Caller administers `domain` directly or through an ancestor
    pub fn can_manage_domain(&self, caller: DomainId, domain: DomainId) -> bool {
        self.hierarchy.is_ancestor_of(caller, domain)
    }
}
