//! Core data types for the Dangle takeover checker
//!
//! `ProbeResult` is the wire record: optional fields are skipped entirely
//! when unset, never serialized as `null`. Callers depend on that.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

use crate::error::ProbeError;

/// Outcome of probing a single subdomain.
///
/// `service` is set exactly when `vulnerable` is true. Use the builder
/// methods rather than poking the two fields separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeResult {
    /// Input hostname, exactly as received.
    pub subdomain: String,
    pub vulnerable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl ProbeResult {
    /// Fresh, not-vulnerable result for `subdomain`.
    #[inline]
    #[must_use]
    pub fn new<S: Into<String>>(subdomain: S) -> Self {
        Self {
            subdomain: subdomain.into(),
            vulnerable: false,
            service: None,
            cname: None,
            http_status: None,
            error_message: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn with_cname(mut self, cname: String) -> Self {
        self.cname = Some(cname);
        self
    }

    #[inline]
    #[must_use]
    pub fn with_http_status(mut self, status: u16) -> Self {
        self.http_status = Some(status);
        self
    }

    /// Mark vulnerable, attributing the takeover to `service`.
    #[inline]
    #[must_use]
    pub fn with_service<S: Into<String>>(mut self, service: S) -> Self {
        self.vulnerable = true;
        self.service = Some(service.into());
        self
    }

    /// Record a failure. A later error replaces an earlier one.
    #[inline]
    #[must_use]
    pub fn with_error(mut self, error: ProbeError) -> Self {
        self.error_message = Some(error.to_string());
        self
    }

    /// Record a failure in place.
    #[inline]
    pub fn set_error(&mut self, error: ProbeError) {
        self.error_message = Some(error.to_string());
    }

    #[inline]
    #[must_use]
    pub fn is_vulnerable(&self) -> bool {
        self.vulnerable
    }

    #[inline]
    #[must_use]
    pub fn has_error(&self) -> bool {
        self.error_message.is_some()
    }
}

/// Probe tuning options.
///
/// Every field defaults to "unset": no HTTP timeout, no concurrency cap,
/// the client's stock user agent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProbeOptions {
    /// Whole-request timeout for the HTTP fetch. `None` waits forever.
    pub http_timeout: Option<Duration>,
    /// Upper bound on probes in flight per batch. `None` spawns one task per
    /// hostname with no bound.
    pub max_concurrency: Option<usize>,
    pub user_agent: Option<String>,
}

impl ProbeOptions {
    #[inline]
    #[must_use]
    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = Some(timeout);
        self
    }

    #[inline]
    #[must_use]
    pub fn with_max_concurrency(mut self, limit: usize) -> Self {
        self.max_concurrency = Some(limit);
        self
    }

    #[inline]
    #[must_use]
    pub fn with_user_agent<S: Into<String>>(mut self, agent: S) -> Self {
        self.user_agent = Some(agent.into());
        self
    }
}

/// One caller-supplied list of hostnames, tagged for log correlation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchJob {
    pub id: Uuid,
    pub subdomains: Vec<String>,
}

impl BatchJob {
    #[inline]
    #[must_use]
    pub fn new(subdomains: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            subdomains,
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.subdomains.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subdomains.is_empty()
    }
}

/// Counters for a finished batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: usize,
    pub vulnerable: usize,
    pub errored: usize,
    pub elapsed: Duration,
}

impl BatchSummary {
    /// Count one finished probe.
    pub fn update(&mut self, result: &ProbeResult) {
        self.total = self.total.saturating_add(1);
        if result.vulnerable {
            self.vulnerable = self.vulnerable.saturating_add(1);
        }
        if result.error_message.is_some() {
            self.errored = self.errored.saturating_add(1);
        }
    }

    /// Probes per second.
    #[inline]
    #[must_use]
    pub fn rate(&self) -> f32 {
        if self.elapsed.as_secs_f32() == 0.0 {
            0.0
        } else {
            self.total as f32 / self.elapsed.as_secs_f32()
        }
    }
}
