// Copyright (c) 2025 - Cowboy AI, Inc.
//! Catalog configuration
//!
//! Loaded from a JSON file, from environment variables, or both (file
//! first, environment overrides). NATS connection settings live in
//! [`crate::nats::NatsConfig`] and are read from the environment only.

use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{CatalogError, CatalogResult};

/// How the `name` filter of a listing compares against offering names
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameMatchMode {
    /// Case-sensitive equality
    #[default]
    Exact,
    /// Case-insensitive containment
    Substring,
}

impl NameMatchMode {
    pub fn matches(&self, candidate: &str, pattern: &str) -> bool {
        match self {
            NameMatchMode::Exact => candidate == pattern,
            NameMatchMode::Substring => candidate
                .to_lowercase()
                .contains(&pattern.to_lowercase()),
        }
    }
}

impl FromStr for NameMatchMode {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exact" => Ok(NameMatchMode::Exact),
            "substring" => Ok(NameMatchMode::Substring),
            other => Err(CatalogError::Configuration(format!(
                "unknown name match mode {other:?}, expected exact or substring"
            ))),
        }
    }
}

/// Operation names understood by [`ResponseTags`]
pub mod operations {
    pub const LIST_DISK_OFFERINGS: &str = "listDiskOfferings";
    pub const QUERY_ASYNC_JOB: &str = "queryAsyncJobResult";
}

/// Operation → response-envelope tag table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseTags(HashMap<String, String>);

impl Default for ResponseTags {
    fn default() -> Self {
        let mut tags = HashMap::new();
        tags.insert(
            operations::LIST_DISK_OFFERINGS.to_string(),
            "listdiskofferingsresponse".to_string(),
        );
        tags.insert(
            operations::QUERY_ASYNC_JOB.to_string(),
            "queryasyncjobresultresponse".to_string(),
        );
        Self(tags)
    }
}

impl ResponseTags {
    /// Tag for an operation; unknown operations fall back to
    /// `<lowercased operation>response`
    pub fn tag_for(&self, operation: &str) -> String {
        self.0
            .get(operation)
            .cloned()
            .unwrap_or_else(|| format!("{}response", operation.to_lowercase()))
    }

    pub fn set(&mut self, operation: impl Into<String>, tag: impl Into<String>) {
        self.0.insert(operation.into(), tag.into());
    }
}

/// Catalog behaviour knobs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Comparison used by the `name` filter
    pub name_match: NameMatchMode,

    /// Page size when a request does not name one
    pub default_page_size: usize,

    /// Upper bound accepted from requests
    pub max_page_size: usize,

    /// Detail name whose value records the disk offering a VM was built from
    pub offering_reference_key: String,

    pub response_tags: ResponseTags,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            name_match: NameMatchMode::default(),
            default_page_size: 500,
            max_page_size: 5000,
            offering_reference_key: "diskOfferingId".to_string(),
            response_tags: ResponseTags::default(),
        }
    }
}

impl CatalogConfig {
    /// Defaults overlaid with `CATALOG_NAME_MATCH`, `CATALOG_DEFAULT_PAGE_SIZE`,
    /// `CATALOG_MAX_PAGE_SIZE` and `CATALOG_OFFERING_REFERENCE_KEY`
    pub fn from_env() -> CatalogResult<Self> {
        Self::default().with_env_overrides()
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            CatalogError::Configuration(format!("cannot read config {}: {e}", path.display()))
        })?;
        let config: Self = serde_json::from_str(&raw)
            .map_err(|e| CatalogError::Configuration(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_env_overrides(mut self) -> CatalogResult<Self> {
        if let Ok(mode) = std::env::var("CATALOG_NAME_MATCH") {
            self.name_match = mode.parse()?;
        }
        if let Ok(size) = std::env::var("CATALOG_DEFAULT_PAGE_SIZE") {
            self.default_page_size = parse_size("CATALOG_DEFAULT_PAGE_SIZE", &size)?;
        }
        if let Ok(size) = std::env::var("CATALOG_MAX_PAGE_SIZE") {
            self.max_page_size = parse_size("CATALOG_MAX_PAGE_SIZE", &size)?;
        }
        if let Ok(key) = std::env::var("CATALOG_OFFERING_REFERENCE_KEY") {
            self.offering_reference_key = key;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> CatalogResult<()> {
        if self.default_page_size == 0 || self.max_page_size == 0 {
            return Err(CatalogError::Configuration(
                "page sizes must be positive".to_string(),
            ));
        }
        if self.default_page_size > self.max_page_size {
            return Err(CatalogError::Configuration(format!(
                "default page size {} exceeds max page size {}",
                self.default_page_size, self.max_page_size
            )));
        }
        if self.offering_reference_key.is_empty() {
            return Err(CatalogError::Configuration(
                "offering reference key must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_size(var: &str, raw: &str) -> CatalogResult<usize> {
    raw.trim()
        .parse()
        .map_err(|_| CatalogError::Configuration(format!("{var} is not a number: {raw:?}")))
}
