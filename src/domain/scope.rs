// Copyright (c) 2025 - Cowboy AI, Inc.
//! Domain entity - a node in the organizational scope tree

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::DomainId;
use super::invariants::{validate_name, ValidationResult};

/// Organizational scope used to own and filter offerings
///
/// # Invariants
/// - `parent_id` is `None` only for the root
/// - The parent chain never forms a cycle
/// - A domain with children is never re-parented
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    pub id: DomainId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<DomainId>,

    pub name: String,

    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Domain {
    /// Create the root of a tree
    pub fn root(id: DomainId, name: impl Into<String>) -> Self {
        Self {
            id,
            parent_id: None,
            name: name.into(),
            created_at: Utc::now(),
        }
    }

    /// Create a child of `parent_id`
    pub fn child(id: DomainId, parent_id: DomainId, name: impl Into<String>) -> Self {
        Self {
            id,
            parent_id: Some(parent_id),
            name: name.into(),
            created_at: Utc::now(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    pub fn validate(&self) -> ValidationResult {
        validate_name("domain name", &self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_and_child() {
        let root = Domain::root(DomainId(1), "ROOT");
        let child = Domain::child(DomainId(2), root.id, "engineering");
        assert!(root.is_root());
        assert!(!child.is_root());
        assert_eq!(child.parent_id, Some(DomainId(1)));
    }

    #[test]
    fn test_seed_json_without_timestamp() {
        let domain: Domain =
            serde_json::from_str(r#"{"id": 4, "parent_id": 1, "name": "ops"}"#).unwrap();
        assert_eq!(domain.id, DomainId(4));
        assert!(domain.validate().is_ok());
    }
}
