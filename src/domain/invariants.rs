// Copyright (c) 2025 - Cowboy AI, Inc.
//! Pure Validation Functions - Catalog Invariants
//!
//! Field-level rules for domains, disk offerings and VM details. Every
//! function is pure and returns a [`ValidationResult`]; callers decide
//! whether a failure is fatal.

use super::ids::DomainId;

/// Maximum length of a VM detail value, in characters
pub const MAX_DETAIL_VALUE_LENGTH: usize = 1024;

/// Maximum length of a VM detail name, in characters
pub const MAX_DETAIL_NAME_LENGTH: usize = 255;

/// Maximum length of domain and offering names
pub const MAX_NAME_LENGTH: usize = 255;

/// Maximum length of an offering's display text
pub const MAX_DISPLAY_TEXT_LENGTH: usize = 4096;

/// Validation result with detailed error information
pub type ValidationResult = Result<(), ValidationError>;

/// Validation error with context
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Detail name must not be empty")]
    EmptyDetailName,

    #[error("Detail name is {len} characters, maximum is {max}")]
    DetailNameTooLong { len: usize, max: usize },

    #[error("Detail value is {len} characters, maximum is {max}")]
    DetailValueTooLong { len: usize, max: usize },

    #[error("{field} must not be empty")]
    EmptyName { field: &'static str },

    #[error("{field} is {len} characters, maximum is {max}")]
    NameTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("Disk size must be positive for a non-customized offering")]
    InvalidDiskSize,

    #[error("Minimum IOPS {min} exceeds maximum IOPS {max}")]
    InvalidIopsRange { min: u64, max: u64 },

    #[error("Domain tree has no root")]
    NoRoot,

    #[error("Domain tree has more than one root: {first} and {second}")]
    MultipleRoots { first: DomainId, second: DomainId },

    #[error("Domain {domain} references unknown parent {parent}")]
    UnknownParent { domain: DomainId, parent: DomainId },

    #[error("Domain {0} is part of a parent cycle")]
    CycleDetected(DomainId),

    #[error("The root domain cannot be moved")]
    RootCannotMove,

    #[error("Domain {0} cannot be its own parent")]
    SelfParent(DomainId),

    #[error("Invalid value for parameter {field}: {value}")]
    InvalidParameter { field: &'static str, value: String },

    #[error("Page size {requested} exceeds maximum of {max}")]
    PageSizeTooLarge { requested: usize, max: usize },
}

/// Validate a VM detail key
///
/// # Rules
/// - Must not be empty or whitespace only
/// - At most [`MAX_DETAIL_NAME_LENGTH`] characters
pub fn validate_detail_name(name: &str) -> ValidationResult {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyDetailName);
    }
    let len = name.chars().count();
    if len > MAX_DETAIL_NAME_LENGTH {
        return Err(ValidationError::DetailNameTooLong {
            len,
            max: MAX_DETAIL_NAME_LENGTH,
        });
    }
    Ok(())
}

/// Validate a VM detail value
///
/// Empty values are allowed; length is counted in characters, not bytes.
pub fn validate_detail_value(value: &str) -> ValidationResult {
    let len = value.chars().count();
    if len > MAX_DETAIL_VALUE_LENGTH {
        return Err(ValidationError::DetailValueTooLong {
            len,
            max: MAX_DETAIL_VALUE_LENGTH,
        });
    }
    Ok(())
}

/// Validate a human-facing name (domains, offerings)
pub fn validate_name(field: &'static str, name: &str) -> ValidationResult {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName { field });
    }
    let len = name.chars().count();
    if len > MAX_NAME_LENGTH {
        return Err(ValidationError::NameTooLong {
            field,
            len,
            max: MAX_NAME_LENGTH,
        });
    }
    Ok(())
}

pub fn validate_display_text(text: &str) -> ValidationResult {
    let len = text.chars().count();
    if len > MAX_DISPLAY_TEXT_LENGTH {
        return Err(ValidationError::NameTooLong {
            field: "display text",
            len,
            max: MAX_DISPLAY_TEXT_LENGTH,
        });
    }
    Ok(())
}

/// Validate disk sizing
///
/// # Rules
/// - Customized offerings take their size at provisioning time, any value is accepted
/// - Fixed offerings need a positive size
pub fn validate_disk_size(disk_size_gb: u64, customized: bool) -> ValidationResult {
    if !customized && disk_size_gb == 0 {
        return Err(ValidationError::InvalidDiskSize);
    }
    Ok(())
}

/// Validate the IOPS class bounds, when both are present
pub fn validate_iops(min_iops: Option<u64>, max_iops: Option<u64>) -> ValidationResult {
    if let (Some(min), Some(max)) = (min_iops, max_iops) {
        if min > max {
            return Err(ValidationError::InvalidIopsRange { min, max });
        }
    }
    Ok(())
}
