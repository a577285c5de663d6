// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Offering Visibility
//!
//! Trees are generated as parent vectors: domain `i + 2` hangs below
//! domain `parents[i] + 1`, which is always an earlier id, so every
//! generated list is a valid single-rooted tree.

use cim_offering_catalog::domain::{DiskOffering, Domain, DomainId, NewDiskOffering, OfferingId};
use cim_offering_catalog::{DomainHierarchy, VisibilityResolver};
use proptest::prelude::*;

// ============================================================================
// Generators
// ============================================================================

fn arb_parents() -> impl Strategy<Value = Vec<usize>> {
    (1usize..40).prop_flat_map(|size| {
        (0..size)
            .map(|i| 0..=i)
            .collect::<Vec<_>>()
    })
}

fn build_tree(parents: &[usize]) -> DomainHierarchy {
    let mut domains = vec![Domain::root(DomainId(1), "ROOT")];
    for (i, parent) in parents.iter().enumerate() {
        let id = DomainId(i as u64 + 2);
        domains.push(Domain::child(id, DomainId(*parent as u64 + 1), format!("d{}", id)));
    }
    DomainHierarchy::new(domains).expect("generated tree is valid")
}

fn private_offering(owner: DomainId) -> DiskOffering {
    NewDiskOffering::builder("private")
        .owner(owner)
        .disk_size_gb(1)
        .build()
        .into_offering(OfferingId(1))
}

fn domain_count(parents: &[usize]) -> u64 {
    parents.len() as u64 + 1
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// A global offering is visible from every domain
    #[test]
    fn prop_global_visible_everywhere(parents in arb_parents(), caller in 0u64..64) {
        let tree = build_tree(&parents);
        let caller = DomainId(caller % domain_count(&parents) + 1);
        let offering = NewDiskOffering::builder("global")
            .disk_size_gb(1)
            .build()
            .into_offering(OfferingId(1));

        prop_assert!(VisibilityResolver::new(&tree).is_visible(caller, &offering));
    }

    /// A public offering is visible from every domain whoever owns it
    #[test]
    fn prop_public_visible_everywhere(
        parents in arb_parents(),
        owner in 0u64..64,
        caller in 0u64..64,
    ) {
        let tree = build_tree(&parents);
        let n = domain_count(&parents);
        let mut offering = private_offering(DomainId(owner % n + 1));
        offering.is_public = true;

        prop_assert!(VisibilityResolver::new(&tree).is_visible(DomainId(caller % n + 1), &offering));
    }

    /// A private offering is visible exactly on the owner's subtree
    #[test]
    fn prop_private_visible_iff_owner_on_path(
        parents in arb_parents(),
        owner in 0u64..64,
        caller in 0u64..64,
    ) {
        let tree = build_tree(&parents);
        let n = domain_count(&parents);
        let owner = DomainId(owner % n + 1);
        let caller = DomainId(caller % n + 1);

        let on_path = tree.path_to_root(caller).unwrap().contains(&owner);
        let visible = VisibilityResolver::new(&tree).is_visible(caller, &private_offering(owner));

        prop_assert_eq!(visible, on_path);
    }

    /// Visibility is inherited downward: every descendant of a domain that
    /// sees an offering sees it too
    #[test]
    fn prop_visibility_inherited_by_subtree(
        parents in arb_parents(),
        owner in 0u64..64,
        caller in 0u64..64,
    ) {
        let tree = build_tree(&parents);
        let n = domain_count(&parents);
        let offering = private_offering(DomainId(owner % n + 1));
        let caller = DomainId(caller % n + 1);
        let resolver = VisibilityResolver::new(&tree);

        if resolver.is_visible(caller, &offering) {
            for below in tree.subtree(caller).unwrap() {
                prop_assert!(resolver.is_visible(below, &offering));
            }
        }
    }

    /// Administration flows down, visibility flows up: for a private
    /// offering both hold only in the owning domain
    #[test]
    fn prop_manage_and_visible_only_for_owner(
        parents in arb_parents(),
        owner in 0u64..64,
        caller in 0u64..64,
    ) {
        let tree = build_tree(&parents);
        let n = domain_count(&parents);
        let owner = DomainId(owner % n + 1);
        let offering = private_offering(owner);
        let caller = DomainId(caller % n + 1);
        let resolver = VisibilityResolver::new(&tree);

        prop_assert_eq!(
            resolver.can_manage(caller, &offering) && resolver.is_visible(caller, &offering),
            caller == owner
        );
        prop_assert!(resolver.can_manage(tree.root(), &offering));
    }

    /// Ancestry agrees with subtree membership
    #[test]
    fn prop_ancestor_matches_subtree(parents in arb_parents(), a in 0u64..64, b in 0u64..64) {
        let tree = build_tree(&parents);
        let n = domain_count(&parents);
        let a = DomainId(a % n + 1);
        let b = DomainId(b % n + 1);

        prop_assert_eq!(tree.is_ancestor_of(a, b), tree.subtree(a).unwrap().contains(&b));
        prop_assert!(tree.is_ancestor_of(tree.root(), b));
    }
}
