// Copyright (c) 2025 - Cowboy AI, Inc.
//! Request structs validated at the API boundary

use serde::{Deserialize, Serialize};

use crate::config::CatalogConfig;
use crate::domain::{DomainId, OfferingId, ValidationError};
use crate::service::{ListOptions, OfferingFilter, OfferingOrder, PageRequest};

/// Raw parameters of `listDiskOfferings`, as received from the transport
///
/// Every field is optional and untyped; [`ListDiskOfferingsRequest::validate`]
/// turns it into a typed query before anything reaches the service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListDiskOfferingsRequest {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default, rename = "domainid")]
    pub domain_id: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub keyword: Option<String>,

    #[serde(default)]
    pub page: Option<String>,

    #[serde(default, rename = "pagesize")]
    pub page_size: Option<String>,

    /// `id`, `-id`, `name`, `-name` or `created`
    #[serde(default, rename = "sortby")]
    pub sort_by: Option<String>,
}

/// Typed, validated form of [`ListDiskOfferingsRequest`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListDiskOfferingsQuery {
    pub filter: OfferingFilter,
    pub options: ListOptions,
}

impl ListDiskOfferingsRequest {
    pub fn validate(&self, config: &CatalogConfig) -> Result<ListDiskOfferingsQuery, ValidationError> {
        let filter = OfferingFilter {
            id: parse_field::<OfferingId>("id", &self.id)?,
            domain_id: parse_field::<DomainId>("domainid", &self.domain_id)?,
            name: non_blank(&self.name),
            keyword: non_blank(&self.keyword),
        };

        let page = match parse_field::<usize>("page", &self.page)? {
            Some(0) => {
                return Err(ValidationError::InvalidParameter {
                    field: "page",
                    value: "0".to_string(),
                })
            }
            Some(page) => page,
            None => 1,
        };
        let page_size = match parse_field::<usize>("pagesize", &self.page_size)? {
            Some(0) => {
                return Err(ValidationError::InvalidParameter {
                    field: "pagesize",
                    value: "0".to_string(),
                })
            }
            Some(size) if size > config.max_page_size => {
                return Err(ValidationError::PageSizeTooLarge {
                    requested: size,
                    max: config.max_page_size,
                })
            }
            Some(size) => size,
            None => config.default_page_size,
        };

        let order = match non_blank(&self.sort_by).as_deref() {
            None | Some("id") => OfferingOrder::IdAsc,
            Some("-id") => OfferingOrder::IdDesc,
            Some("name") => OfferingOrder::NameAsc,
            Some("-name") => OfferingOrder::NameDesc,
            Some("created") => OfferingOrder::CreatedAsc,
            Some(other) => {
                return Err(ValidationError::InvalidParameter {
                    field: "sortby",
                    value: other.to_string(),
                })
            }
        };

        Ok(ListDiskOfferingsQuery {
            filter,
            options: ListOptions {
                order,
                page: Some(PageRequest::new(page, page_size)),
            },
        })
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn parse_field<T: std::str::FromStr>(
    field: &'static str,
    value: &Option<String>,
) -> Result<Option<T>, ValidationError> {
    match non_blank(value) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|_| ValidationError::InvalidParameter { field, value: raw }),
    }
}
