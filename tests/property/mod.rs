// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests Module
//!
//! Random domain trees and offering catalogs checked against the
//! visibility and paging rules.

mod paging;
mod visibility;
