// Copyright (c) 2025 - Cowboy AI, Inc.
//! Disk Offering Entity
//!
//! A disk offering is an administrator-defined template (size, IOPS class)
//! selected when provisioning a VM. Ownership by a domain scopes who may see
//! and manage it; an offering without an owner is global.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{DomainId, OfferingId};
use super::invariants::{
    validate_disk_size, validate_display_text, validate_iops, validate_name, ValidationResult,
};

/// Disk offering record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskOffering {
    /// Store-assigned id, ascending in creation order
    pub id: OfferingId,

    pub name: String,

    #[serde(default)]
    pub display_text: String,

    /// Owning domain; `None` means the offering is global
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_domain_id: Option<DomainId>,

    /// Public offerings are visible across all scopes
    #[serde(default)]
    pub is_public: bool,

    #[serde(default)]
    pub disk_size_gb: u64,

    /// Size chosen by the requester at provisioning time
    #[serde(default)]
    pub customized: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_iops: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_iops: Option<u64>,

    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl DiskOffering {
    pub fn is_global(&self) -> bool {
        self.owner_domain_id.is_none()
    }

    pub fn validate(&self) -> ValidationResult {
        validate_name("offering name", &self.name)?;
        validate_display_text(&self.display_text)?;
        validate_disk_size(self.disk_size_gb, self.customized)?;
        validate_iops(self.min_iops, self.max_iops)
    }
}

/// Offering fields supplied by an administrator; the store assigns the id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDiskOffering {
    pub name: String,
    pub display_text: String,
    pub owner_domain_id: Option<DomainId>,
    pub is_public: bool,
    pub disk_size_gb: u64,
    pub customized: bool,
    pub min_iops: Option<u64>,
    pub max_iops: Option<u64>,
}

impl NewDiskOffering {
    /// Builder pattern for fluent construction
    pub fn builder(name: impl Into<String>) -> NewDiskOfferingBuilder {
        NewDiskOfferingBuilder::new(name)
    }

    pub fn validate(&self) -> ValidationResult {
        validate_name("offering name", &self.name)?;
        validate_display_text(&self.display_text)?;
        validate_disk_size(self.disk_size_gb, self.customized)?;
        validate_iops(self.min_iops, self.max_iops)
    }

    /// Materialize the record once the store has picked an id
    pub fn into_offering(self, id: OfferingId) -> DiskOffering {
        DiskOffering {
            id,
            name: self.name,
            display_text: self.display_text,
            owner_domain_id: self.owner_domain_id,
            is_public: self.is_public,
            disk_size_gb: self.disk_size_gb,
            customized: self.customized,
            min_iops: self.min_iops,
            max_iops: self.max_iops,
            created_at: Utc::now(),
        }
    }
}

/// Builder for [`NewDiskOffering`]
#[derive(Debug, Clone)]
pub struct NewDiskOfferingBuilder {
    inner: NewDiskOffering,
}

impl NewDiskOfferingBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            inner: NewDiskOffering {
                display_text: name.clone(),
                name,
                owner_domain_id: None,
                is_public: false,
                disk_size_gb: 0,
                customized: false,
                min_iops: None,
                max_iops: None,
            },
        }
    }

    pub fn display_text(mut self, text: impl Into<String>) -> Self {
        self.inner.display_text = text.into();
        self
    }

    pub fn owner(mut self, domain_id: DomainId) -> Self {
        self.inner.owner_domain_id = Some(domain_id);
        self
    }

    pub fn public(mut self, is_public: bool) -> Self {
        self.inner.is_public = is_public;
        self
    }

    pub fn disk_size_gb(mut self, size: u64) -> Self {
        self.inner.disk_size_gb = size;
        self
    }

    pub fn customized(mut self, customized: bool) -> Self {
        self.inner.customized = customized;
        self
    }

    pub fn iops(mut self, min: u64, max: u64) -> Self {
        self.inner.min_iops = Some(min);
        self.inner.max_iops = Some(max);
        self
    }

    pub fn build(self) -> NewDiskOffering {
        self.inner
    }
}

/// Partial update; `None` leaves the field unchanged
///
/// Ownership is not updatable: moving an offering between scopes would
/// change who can see it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskOfferingUpdate {
    pub name: Option<String>,
    pub display_text: Option<String>,
    pub is_public: Option<bool>,
    pub min_iops: Option<u64>,
    pub max_iops: Option<u64>,
}

impl DiskOfferingUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.display_text.is_none()
            && self.is_public.is_none()
            && self.min_iops.is_none()
            && self.max_iops.is_none()
    }

    /// Apply to a copy of `offering` and validate the result
    pub fn apply_to(&self, offering: &DiskOffering) -> Result<DiskOffering, super::ValidationError> {
        let mut updated = offering.clone();
        if let Some(name) = &self.name {
            updated.name = name.clone();
        }
        if let Some(text) = &self.display_text {
            updated.display_text = text.clone();
        }
        if let Some(is_public) = self.is_public {
            updated.is_public = is_public;
        }
        if self.min_iops.is_some() {
            updated.min_iops = self.min_iops;
        }
        if self.max_iops.is_some() {
            updated.max_iops = self.max_iops;
        }
        updated.validate()?;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ValidationError;

    #[test]
    fn test_builder_defaults_display_text_to_name() {
        let new = NewDiskOffering::builder("small").disk_size_gb(5).build();
        assert_eq!(new.display_text, "small");
        assert!(new.owner_domain_id.is_none());

        let offering = new.into_offering(OfferingId(1));
        assert!(offering.is_global());
        assert!(offering.validate().is_ok());
    }

    #[test]
    fn test_fixed_offering_needs_size() {
        let offering = NewDiskOffering::builder("broken").build().into_offering(OfferingId(2));
        assert_eq!(offering.validate(), Err(ValidationError::InvalidDiskSize));

        let custom = NewDiskOffering::builder("custom")
            .customized(true)
            .build()
            .into_offering(OfferingId(3));
        assert!(custom.validate().is_ok());
    }

    #[test]
    fn test_update_apply() {
        let offering = NewDiskOffering::builder("medium")
            .disk_size_gb(20)
            .iops(100, 200)
            .build()
            .into_offering(OfferingId(4));

        let update = DiskOfferingUpdate {
            display_text: Some("Medium disk".to_string()),
            is_public: Some(true),
            ..Default::default()
        };
        let updated = update.apply_to(&offering).unwrap();
        assert_eq!(updated.display_text, "Medium disk");
        assert!(updated.is_public);
        assert_eq!(updated.name, "medium");

        let bad = DiskOfferingUpdate {
            min_iops: Some(500),
            ..Default::default()
        };
        assert!(bad.apply_to(&offering).is_err());
        assert!(DiskOfferingUpdate::default().is_empty());
    }
}
