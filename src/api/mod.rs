// Copyright (c) 2025 - Cowboy AI, Inc.
//! API boundary
//!
//! Explicit request structs, validated before they reach the services, and
//! tagged response envelopes. Transport and dispatch live elsewhere.

pub mod request;
pub mod response;

pub use request::{ListDiskOfferingsQuery, ListDiskOfferingsRequest};
pub use response::{AsyncJobResponse, DiskOfferingResponse, ListResponse};

use tracing::debug;

use crate::config::{operations, CatalogConfig};
use crate::domain::DomainId;
use crate::errors::CatalogResult;
use crate::service::OfferingQueryService;

/// Item array key of the disk offering list envelope
pub const DISK_OFFERING_ITEM_KEY: &str = "diskoffering";

/// Validate and run a `listDiskOfferings` request for `caller`
pub async fn list_disk_offerings(
    service: &dyn OfferingQueryService,
    config: &CatalogConfig,
    caller: DomainId,
    request: &ListDiskOfferingsRequest,
) -> CatalogResult<ListResponse<DiskOfferingResponse>> {
    let query = request.validate(config)?;
    debug!(%caller, ?query, "Validated listDiskOfferings request");

    let page = service.list(caller, query.filter, query.options).await?;
    let items = page
        .items
        .iter()
        .map(|offering| {
            let owner_name = offering
                .owner_domain_id
                .and_then(|id| page.owner_names.get(&id))
                .map(String::as_str);
            DiskOfferingResponse::from_offering(offering, owner_name)
        })
        .collect();

    Ok(ListResponse::new(
        &config.response_tags,
        operations::LIST_DISK_OFFERINGS,
        DISK_OFFERING_ITEM_KEY,
        page.total,
        items,
    ))
}
