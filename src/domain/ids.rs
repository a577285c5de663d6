// Copyright (c) 2025 - Cowboy AI, Inc.
//! Typed identifiers
//!
//! Domains, offerings and VMs are addressed by store-generated numeric ids
//! whose ascending order is creation order. Detail rows use time-ordered
//! UUIDs because the metadata backends assign them without a shared counter.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            pub const fn new(value: u64) -> Self {
                Self(value)
            }

            pub const fn get(self) -> u64 {
                self.0
            }

            /// Human readable kind used in not-found errors
            pub const fn kind() -> &'static str {
                $label
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse::<u64>().map(Self)
            }
        }
    };
}

numeric_id!(
    /// Identifier of a node in the domain tree
    DomainId,
    "domain"
);

numeric_id!(
    /// Identifier of a disk offering
    OfferingId,
    "disk offering"
);

numeric_id!(
    /// Identifier of a virtual machine (owned by the VM lifecycle, not this crate)
    VmId,
    "virtual machine"
);

/// Store-assigned identifier of a single VM detail row
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DetailId(Uuid);

impl DetailId {
    pub fn generate() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for DetailId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
