// Copyright (c) 2025 - Cowboy AI, Inc.
//! VM detail record - one named attribute of a virtual machine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{DetailId, VmId};
use super::invariants::{validate_detail_name, validate_detail_value, ValidationResult};

/// Key-value attribute attached to a VM
///
/// `(vm_id, name)` is unique; an overwrite keeps `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VmDetail {
    pub id: DetailId,
    pub vm_id: VmId,
    pub name: String,
    pub value: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VmDetail {
    pub fn new(vm_id: VmId, name: impl Into<String>, value: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: DetailId::generate(),
            vm_id,
            name: name.into(),
            value: value.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite the value in place
    pub fn overwrite(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.updated_at = Utc::now();
    }

    pub fn validate(&self) -> ValidationResult {
        validate_detail_name(&self.name)?;
        validate_detail_value(&self.value)
    }
}
