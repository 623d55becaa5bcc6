//! Ordered takeover signature catalog
//!
//! Each entry pairs a service name with a regex that is searched for
//! anywhere in a response body. Order matters: `find_match` reports the
//! first entry that matches.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// Built-in (service, pattern) pairs, in match order.
pub const BUILTIN_SIGNATURES: &[(&str, &str)] = &[
    ("AWS/S3", r"The specified bucket does not exist"),
    ("GitHub", r"There isn't a GitHub Pages site here"),
    ("Heroku", r"no such app"),
    ("Fastly", r"Fastly error: unknown domain"),
    ("Shopify", r"Sorry, this shop is currently unavailable."),
    ("BitBucket", r"Repository not found"),
];

static BUILTIN: Lazy<Arc<SignatureCatalog>> = Lazy::new(|| {
    Arc::new(SignatureCatalog::from_entries(
        BUILTIN_SIGNATURES.iter().copied(),
    ))
});

/// One catalog entry. A pattern that failed to compile is kept as `None`
/// and never matches.
#[derive(Clone)]
pub struct SignatureEntry {
    service: String,
    pattern: Option<Regex>,
}

impl SignatureEntry {
    /// Compile `pattern` for `service`. Compilation errors are logged, not
    /// returned.
    pub fn new<S: Into<String>>(service: S, pattern: &str) -> Self {
        let service = service.into();
        let pattern = match Regex::new(pattern) {
            Ok(re) => Some(re),
            Err(e) => {
                warn!(service = %service, error = %e, "signature pattern rejected; entry will never match");
                None
            }
        };
        Self { service, pattern }
    }

    #[inline]
    pub fn service(&self) -> &str {
        &self.service
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.pattern.is_some()
    }

    /// Presence test anywhere in `text`.
    #[inline]
    pub fn matches(&self, text: &str) -> bool {
        self.pattern.as_ref().is_some_and(|re| re.is_match(text))
    }
}

impl fmt::Debug for SignatureEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignatureEntry")
            .field("service", &self.service)
            .field("pattern", &self.pattern.as_ref().map(Regex::as_str))
            .finish()
    }
}

/// Immutable ordered list of signatures.
#[derive(Debug, Clone)]
pub struct SignatureCatalog {
    entries: Vec<SignatureEntry>,
}

impl SignatureCatalog {
    /// Process-wide built-in catalog, compiled on first use.
    pub fn builtin() -> Arc<SignatureCatalog> {
        Arc::clone(&BUILTIN)
    }

    /// Build a catalog from (service, pattern) pairs, keeping their order.
    pub fn from_entries<I, S, P>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, P)>,
        S: Into<String>,
        P: AsRef<str>,
    {
        let entries = entries
            .into_iter()
            .map(|(service, pattern)| SignatureEntry::new(service, pattern.as_ref()))
            .collect();
        Self { entries }
    }

    #[inline]
    pub fn entries(&self) -> &[SignatureEntry] {
        &self.entries
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First entry whose pattern occurs in `text`.
    pub fn find_match(&self, text: &str) -> Option<&SignatureEntry> {
        self.entries.iter().find(|entry| entry.matches(text))
    }

    /// Like `find_match`, for raw response bytes. Invalid UTF-8 is replaced
    /// before matching.
    pub fn find_match_bytes(&self, body: &[u8]) -> Option<&SignatureEntry> {
        let text = String::from_utf8_lossy(body);
        self.find_match(&text)
    }
}
