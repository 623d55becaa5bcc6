//! Core traits for Dangle components
//!
//! The engine talks to the network only through these seams, so tests can
//! swap in stubs for DNS or for whole probes.

use crate::types::ProbeResult;
use async_trait::async_trait;

/// Evaluates one hostname. Implementations never fail: every error is
/// folded into the returned `ProbeResult`.
#[async_trait]
pub trait Prober: Send + Sync {
    /// Probe a single subdomain
    async fn probe(&self, subdomain: &str) -> ProbeResult;

    /// Prober name/identifier
    fn name(&self) -> &str;
}

/// DNS canonical-name lookup.
#[async_trait]
pub trait CnameLookup: Send + Sync {
    /// Canonical name for a bare host (no scheme, port or path). The error
    /// string is a human-readable cause.
    async fn lookup_cname(&self, host: &str) -> Result<String, String>;
}
