// crates/prober/src/prober.rs
//! HTTP takeover prober implementation

use async_trait::async_trait;
use std::error::Error as StdError;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::target::ProbeTarget;
use dangle_common::{
    CnameLookup, DangleError, DangleResult, ProbeError, ProbeOptions, ProbeResult, Prober,
};
use dangle_signatures::SignatureCatalog;

/// Resolves, fetches and classifies one hostname at a time.
///
/// Cheap to share: the HTTP client pools connections internally and is
/// safe to use from many tasks at once.
pub struct HttpProber {
    client: reqwest::Client,
    resolver: Arc<dyn CnameLookup>,
    catalog: Arc<SignatureCatalog>,
}

impl HttpProber {
    /// Prober with default options and the built-in catalog.
    pub fn new(resolver: Arc<dyn CnameLookup>) -> DangleResult<Self> {
        Self::with_options(resolver, &ProbeOptions::default())
    }

    /// Prober whose HTTP client honours `options`.
    pub fn with_options(
        resolver: Arc<dyn CnameLookup>,
        options: &ProbeOptions,
    ) -> DangleResult<Self> {
        Ok(Self {
            client: build_client(options)?,
            resolver,
            catalog: SignatureCatalog::builtin(),
        })
    }

    /// Replace the signature catalog.
    pub fn with_catalog(mut self, catalog: Arc<SignatureCatalog>) -> Self {
        self.catalog = catalog;
        self
    }

    /// Replace the HTTP client.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    pub fn catalog(&self) -> &SignatureCatalog {
        &self.catalog
    }

    async fn resolve(&self, target: &ProbeTarget, result: &mut ProbeResult) {
        match self.resolver.lookup_cname(target.dns_host()).await {
            Ok(cname) => {
                debug!(host = target.dns_host(), cname = %cname, "resolved");
                result.cname = Some(cname);
            }
            Err(cause) => {
                debug!(host = target.dns_host(), %cause, "CNAME lookup failed");
                result.set_error(ProbeError::DnsLookupFailed(cause));
            }
        }
    }
}

/// Build the shared client. Unset options leave reqwest's defaults in place,
/// which means no overall request timeout.
pub fn build_client(options: &ProbeOptions) -> DangleResult<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = options.http_timeout {
        builder = builder.timeout(timeout);
    }
    if let Some(agent) = &options.user_agent {
        builder = builder.user_agent(agent.as_str());
    }
    builder
        .build()
        .map_err(|e| DangleError::HttpClient(e.to_string()))
}

/// Flatten an error and its sources into one line. reqwest's top-level
/// message alone rarely names the actual cause.
fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut message = err.to_string();
    let mut current = err.source();
    while let Some(cause) = current {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        current = cause.source();
    }
    message
}

#[async_trait]
impl Prober for HttpProber {
    /// Probe a single subdomain. DNS failure is recorded but does not stop
    /// the fetch; fetch or body failures end the probe as not vulnerable.
    #[instrument(skip(self))]
    async fn probe(&self, subdomain: &str) -> ProbeResult {
        let target = ProbeTarget::parse(subdomain);
        let mut result = ProbeResult::new(subdomain);

        self.resolve(&target, &mut result).await;

        let response = match self.client.get(target.url()).send().await {
            Ok(response) => response,
            Err(e) => {
                debug!(url = target.url(), error = %e, "request failed");
                result.set_error(ProbeError::HttpRequestFailed(error_chain(&e)));
                return result;
            }
        };

        result.http_status = Some(response.status().as_u16());

        // `bytes()` consumes the response, so the connection goes back to
        // the pool (or is closed) on both arms.
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => {
                debug!(url = target.url(), error = %e, "body read failed");
                result.set_error(ProbeError::BodyReadFailed(error_chain(&e)));
                return result;
            }
        };

        if let Some(entry) = self.catalog.find_match_bytes(&body) {
            debug!(service = entry.service(), "takeover signature matched");
            result = result.with_service(entry.service());
        }
        result
    }

    fn name(&self) -> &str {
        "HTTP Takeover Prober"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;
    use std::time::Duration;

    #[derive(Debug)]
    struct Outer(Inner);
    #[derive(Debug)]
    struct Inner;

    impl fmt::Display for Outer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("error sending request")
        }
    }
    impl fmt::Display for Inner {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("connection refused")
        }
    }
    impl StdError for Inner {}
    impl StdError for Outer {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn error_chain_includes_causes() {
        assert_eq!(
            error_chain(&Outer(Inner)),
            "error sending request: connection refused"
        );
    }

    #[test]
    fn client_builds_with_options() {
        let options = ProbeOptions::default()
            .with_http_timeout(Duration::from_secs(3))
            .with_user_agent("dangle-test");
        assert!(build_client(&options).is_ok());
        assert!(build_client(&ProbeOptions::default()).is_ok());
    }
}
