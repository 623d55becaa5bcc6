//! Signature Catalog - takeover error-page detection
//!
//! Known "unclaimed resource" error pages of third-party hosting services,
//! kept as an ordered list of (service, regex) entries:
//! - entries are scanned in order and the first match wins
//! - the built-in catalog is initialised once and shared read-only
//! - a broken entry never matches and never aborts the scan

mod catalog;

pub use catalog::{SignatureCatalog, SignatureEntry, BUILTIN_SIGNATURES};
