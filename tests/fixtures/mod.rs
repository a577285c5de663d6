// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test Fixtures for cim-offering-catalog
//!
//! Deterministic catalog shared by the integration suites.
//!
//! ```text
//! ROOT(1) ─┬─ A(2) ── B(4)
//!          └─ C(3)
//! ```
//!
//! | id | name          | owner | public |
//! |----|---------------|-------|--------|
//! | 1  | global-small  | -     | no     |
//! | 2  | a-fast        | A     | no     |
//! | 3  | c-private     | C     | no     |
//! | 4  | b-public      | B     | yes    |
//! | 5  | a-archive     | A     | no     |
//! | 6  | root-private  | ROOT  | no     |
#![allow(dead_code)]

use chrono::{DateTime, Utc};

use cim_offering_catalog::domain::{DiskOffering, Domain, DomainId, OfferingId};
use cim_offering_catalog::store::CatalogSeed;
use cim_offering_catalog::{CatalogConfig, CatalogServices};

pub const ROOT: DomainId = DomainId(1);
pub const A: DomainId = DomainId(2);
pub const C: DomainId = DomainId(3);
pub const B: DomainId = DomainId(4);

pub const GLOBAL_SMALL: OfferingId = OfferingId(1);
pub const A_FAST: OfferingId = OfferingId(2);
pub const C_PRIVATE: OfferingId = OfferingId(3);
pub const B_PUBLIC: OfferingId = OfferingId(4);
pub const A_ARCHIVE: OfferingId = OfferingId(5);
pub const ROOT_PRIVATE: OfferingId = OfferingId(6);

// Fixed test timestamp (2026-01-19T12:00:00Z)
pub const FIXED_TIMESTAMP: &str = "2026-01-19T12:00:00Z";

pub fn fixed_timestamp() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(FIXED_TIMESTAMP)
        .expect("Invalid timestamp in test fixture")
        .with_timezone(&Utc)
}

fn domain(id: DomainId, parent: Option<DomainId>, name: &str) -> Domain {
    Domain {
        id,
        parent_id: parent,
        name: name.to_string(),
        created_at: fixed_timestamp(),
    }
}

fn offering(
    id: OfferingId,
    name: &str,
    display_text: &str,
    owner: Option<DomainId>,
    is_public: bool,
) -> DiskOffering {
    DiskOffering {
        id,
        name: name.to_string(),
        display_text: display_text.to_string(),
        owner_domain_id: owner,
        is_public,
        disk_size_gb: 10 * id.get(),
        customized: false,
        min_iops: None,
        max_iops: None,
        created_at: fixed_timestamp(),
    }
}

pub fn seed() -> CatalogSeed {
    CatalogSeed {
        domains: vec![
            domain(ROOT, None, "ROOT"),
            domain(A, Some(ROOT), "A"),
            domain(C, Some(ROOT), "C"),
            domain(B, Some(A), "B"),
        ],
        disk_offerings: vec![
            offering(GLOBAL_SMALL, "global-small", "Small disk", None, false),
            offering(A_FAST, "a-fast", "Fast SSD", Some(A), false),
            offering(C_PRIVATE, "c-private", "C only", Some(C), false),
            offering(B_PUBLIC, "b-public", "Shared by B", Some(B), true),
            offering(A_ARCHIVE, "a-archive", "Archive tier", Some(A), false),
            offering(ROOT_PRIVATE, "root-private", "Root scoped", Some(ROOT), false),
        ],
    }
}

pub fn services() -> CatalogServices {
    services_with(CatalogConfig::default())
}

pub fn services_with(config: CatalogConfig) -> CatalogServices {
    CatalogServices::in_memory(seed(), config).expect("Invalid fixture seed")
}
