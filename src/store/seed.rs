// Copyright (c) 2025 - Cowboy AI, Inc.
//! JSON catalog seed

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{DiskOffering, Domain};
use crate::errors::{CatalogError, CatalogResult};

/// Domains and offerings loaded at startup
///
/// ```json
/// {
///   "domains": [{ "id": 1, "name": "ROOT" }, { "id": 2, "parent_id": 1, "name": "eng" }],
///   "disk_offerings": [{ "id": 1, "name": "small", "disk_size_gb": 5 }]
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSeed {
    pub domains: Vec<Domain>,

    #[serde(default)]
    pub disk_offerings: Vec<DiskOffering>,
}

impl CatalogSeed {
    pub fn from_json_str(json: &str) -> CatalogResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            CatalogError::Configuration(format!("cannot read seed {}: {e}", path.display()))
        })?;
        Self::from_json_str(&raw)
    }
}
