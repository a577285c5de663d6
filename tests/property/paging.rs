// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Listing Pages
//!
//! Walking every page of a listing must reproduce the unpaged listing, and
//! every page must report the same total.

use cim_offering_catalog::domain::{DiskOffering, Domain, DomainId, OfferingId};
use cim_offering_catalog::service::{
    ListOptions, OfferingFilter, OfferingOrder, OfferingQueryService, PageRequest,
};
use cim_offering_catalog::store::CatalogSeed;
use cim_offering_catalog::{CatalogConfig, CatalogServices};
use chrono::Utc;
use proptest::prelude::*;

fn arb_order() -> impl Strategy<Value = OfferingOrder> {
    prop_oneof![
        Just(OfferingOrder::IdAsc),
        Just(OfferingOrder::IdDesc),
        Just(OfferingOrder::NameAsc),
        Just(OfferingOrder::NameDesc),
        Just(OfferingOrder::CreatedAsc),
    ]
}

/// (owner 0..3 where 0 = global, is_public, name suffix)
fn arb_offerings() -> impl Strategy<Value = Vec<(u64, bool, u8)>> {
    prop::collection::vec((0u64..4, any::<bool>(), 0u8..5), 0..30)
}

fn catalog(offerings: &[(u64, bool, u8)]) -> CatalogServices {
    let now = Utc::now();
    let domains = vec![
        Domain::root(DomainId(1), "ROOT"),
        Domain::child(DomainId(2), DomainId(1), "A"),
        Domain::child(DomainId(3), DomainId(2), "B"),
    ];
    let disk_offerings = offerings
        .iter()
        .enumerate()
        .map(|(i, (owner, is_public, suffix))| DiskOffering {
            id: OfferingId(i as u64 + 1),
            name: format!("offering-{suffix}"),
            display_text: String::new(),
            owner_domain_id: (*owner > 0).then(|| DomainId(*owner)),
            is_public: *is_public,
            disk_size_gb: 1,
            customized: false,
            min_iops: None,
            max_iops: None,
            created_at: now,
        })
        .collect();

    CatalogServices::in_memory(
        CatalogSeed {
            domains,
            disk_offerings,
        },
        CatalogConfig::default(),
    )
    .expect("generated catalog is valid")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_pages_concatenate_to_full_listing(
        offerings in arb_offerings(),
        caller in 1u64..4,
        page_size in 1usize..7,
        order in arb_order(),
    ) {
        let services = catalog(&offerings);
        let caller = DomainId(caller);

        tokio_test::block_on(async {
            let full = services
                .query
                .list(caller, OfferingFilter::default(), ListOptions { order, page: None })
                .await
                .unwrap();

            let mut walked = Vec::new();
            let mut page = 1;
            loop {
                let options = ListOptions {
                    order,
                    page: Some(PageRequest::new(page, page_size)),
                };
                let chunk = services
                    .query
                    .list(caller, OfferingFilter::default(), options)
                    .await
                    .unwrap();
                prop_assert_eq!(chunk.total, full.total);
                prop_assert!(chunk.items.len() <= page_size);
                if chunk.is_empty() {
                    break;
                }
                walked.extend(chunk.ids());
                page += 1;
            }

            prop_assert_eq!(walked, full.ids());
            prop_assert_eq!(full.total, full.items.len());
            Ok::<(), TestCaseError>(())
        })?;
    }
}
