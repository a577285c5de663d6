// Copyright (c) 2025 - Cowboy AI, Inc.
//! Catalog Domain Models
//!
//! Plain data structs for the offering catalog and VM metadata, with
//! validation invariants kept as pure functions.
//!
//! # Entities
//!
//! - [`Domain`] - node of the organizational scope tree
//! - [`DiskOffering`] - resource template, optionally owned by a domain
//! - [`VmDetail`] - one named attribute of a virtual machine
//!
//! # Identifiers
//!
//! - [`DomainId`], [`OfferingId`], [`VmId`] - numeric, creation ordered
//! - [`DetailId`] - UUID v7, assigned by the metadata backend

pub mod ids;
pub mod invariants;
pub mod offering;
pub mod scope;
pub mod vm_detail;

pub use ids::{DetailId, DomainId, OfferingId, VmId};
pub use invariants::{ValidationError, ValidationResult};
pub use offering::{DiskOffering, DiskOfferingUpdate, NewDiskOffering, NewDiskOfferingBuilder};
pub use scope::Domain;
pub use vm_detail::VmDetail;
