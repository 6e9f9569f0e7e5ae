//! Version layer for compiler version selection
//!
//! This module provides the version type, the ordered catalog of installable
//! versions, the resolution algorithm, and the providers that fetch and cache
//! catalogs.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Providers  │────▶│    Cache    │     │  Resolver   │
//! │(list.json,  │     │  (SQLite)   │     │(clause→ver) │
//! │ local file) │     └─────────────┘     └─────────────┘
//! └─────────────┘            │                   ▲
//!        │                   ▼                   │
//!        └──────────▶  VersionCatalog ───────────┘
//! ```
//!
//! # Modules
//!
//! - [`cache`]: SQLite-based catalog cache with refresh interval
//! - [`catalog`]: Newest-first list of installable versions
//! - [`error`]: Error types for cache, provider and resolution
//! - [`provider`]: Provider trait for fetching catalogs
//! - [`providers`]: Concrete providers (binaries server, local file, cached)
//! - [`resolver`]: Clause reconciliation and per-comparator resolution
//! - [`semver`]: `SemanticVersion` with an optional patch component

pub mod cache;
pub mod catalog;
pub mod error;
pub mod provider;
pub mod providers;
pub mod resolver;
pub mod semver;
