//! Offering catalog for the Composable Information Machine
//!
//! Decides which disk offerings a caller can see and select given its place
//! in the domain tree, resolves lookups by id, name and owning domain, and
//! keeps free-form per-VM metadata.

pub mod api;
pub mod config;
pub mod domain;
pub mod errors;
pub mod hierarchy;
pub mod metadata;
pub mod nats;
pub mod service;
pub mod store;
pub mod visibility;

// Re-export commonly used types
pub use config::{CatalogConfig, NameMatchMode, ResponseTags};
pub use domain::{DiskOffering, Domain, DomainId, OfferingId, VmDetail, VmId};
pub use errors::{CatalogError, CatalogResult};
pub use hierarchy::{DomainHierarchy, HierarchyCache};
pub use metadata::VmMetadataStore;
pub use nats::{NatsClient, NatsConfig};
pub use service::{CatalogServices, OfferingFilter, OfferingQueryService};
pub use visibility::VisibilityResolver;
