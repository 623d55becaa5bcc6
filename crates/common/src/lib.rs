//! Dangle Common - Shared types and traits
//!
//! This crate provides the core types, traits, and errors used across
//! the Dangle workspace.
//!
//! Key pieces:
//! - `ProbeResult`: one record per checked subdomain, serialized with
//!   optional fields omitted rather than nulled
//! - `Prober` / `CnameLookup`: async seams between the engine and its
//!   network collaborators
//! - `ProbeError` / `DangleError`: per-probe and application error types

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{DangleError, DangleResult, ProbeError};
pub use traits::{CnameLookup, Prober};
pub use types::{BatchJob, BatchSummary, ProbeOptions, ProbeResult};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
