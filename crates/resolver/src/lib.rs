//! CNAME Resolver - canonical-name lookups over trust-dns
//!
//! `DnsResolver` answers "what does this host point at?" for the probe:
//! - a CNAME record yields the end of its alias chain, e.g.
//!   `bucket.s3.amazonaws.com.`
//! - a name that exists but has no CNAME yields the name itself, fully
//!   qualified (what the system resolver reports as the canonical name)
//! - a name that does not resolve at all is an error
//!
//! Only CNAME retrieval is performed; no other record types are analysed.

use async_trait::async_trait;
use dangle_common::{CnameLookup, DangleError, DangleResult};
use std::net::IpAddr;
use tracing::{debug, warn};
use trust_dns_resolver::config::{ResolverConfig, ResolverOpts};
use trust_dns_resolver::error::ResolveErrorKind;
use trust_dns_resolver::proto::rr::{Record, RecordType};
use trust_dns_resolver::TokioAsyncResolver;

pub struct DnsResolver {
    inner: TokioAsyncResolver,
}

impl DnsResolver {
    /// Resolver using the host's `/etc/resolv.conf` (or platform equivalent).
    pub fn from_system_conf() -> DangleResult<Self> {
        let inner = TokioAsyncResolver::tokio_from_system_conf()
            .map_err(|e| DangleError::Resolver(e.to_string()))?;
        Ok(Self { inner })
    }

    /// Resolver with an explicit upstream configuration.
    pub fn with_config(config: ResolverConfig, opts: ResolverOpts) -> Self {
        Self {
            inner: TokioAsyncResolver::tokio(config, opts),
        }
    }

    /// System configuration when readable, public defaults otherwise.
    pub fn system_or_default() -> Self {
        match Self::from_system_conf() {
            Ok(resolver) => resolver,
            Err(e) => {
                warn!(error = %e, "falling back to default resolver configuration");
                Self::default()
            }
        }
    }

    /// Look up the canonical name of `host`.
    pub async fn canonical_name(&self, host: &str) -> Result<String, String> {
        let host = host.trim().trim_end_matches('.');
        if host.is_empty() {
            return Err("empty hostname".to_string());
        }
        if host.parse::<IpAddr>().is_ok() {
            return Err(format!("{host} is an IP address, not a hostname"));
        }

        let first_hop = match self.inner.lookup(host, RecordType::CNAME).await {
            Ok(lookup) => {
                let hop = follow_chain(host, lookup.records()).or_else(|| {
                    lookup
                        .iter()
                        .find_map(|rdata| rdata.as_cname())
                        .map(|cname| cname.0.to_utf8())
                });
                if hop.is_none() {
                    debug!(host, "CNAME answer carried no CNAME data");
                }
                hop
            }
            Err(e) if matches!(e.kind(), ResolveErrorKind::NoRecordsFound { .. }) => {
                debug!(host, "no CNAME record; checking that the name exists");
                None
            }
            Err(e) => return Err(e.to_string()),
        };

        // The address lookup carries the whole alias chain when it resolves.
        // A dangling alias still reports its first hop.
        match self.inner.lookup_ip(host).await {
            Ok(ips) => Ok(follow_chain(host, ips.as_lookup().records())
                .or(first_hop)
                .unwrap_or_else(|| fully_qualified(host))),
            Err(e) => first_hop.ok_or_else(|| e.to_string()),
        }
    }
}

impl Default for DnsResolver {
    fn default() -> Self {
        Self::with_config(ResolverConfig::default(), ResolverOpts::default())
    }
}

#[async_trait]
impl CnameLookup for DnsResolver {
    async fn lookup_cname(&self, host: &str) -> Result<String, String> {
        self.canonical_name(host).await
    }
}

fn fully_qualified(host: &str) -> String {
    format!("{}.", host.trim_end_matches('.'))
}

/// Walk CNAME records starting at `host` and return the last alias target.
fn follow_chain(host: &str, records: &[Record]) -> Option<String> {
    let mut current = fully_qualified(host).to_ascii_lowercase();
    let mut target = None;
    // Each record can be one hop at most; this also stops alias loops.
    for _ in 0..records.len() {
        let next = records.iter().find_map(|record| {
            let cname = record.data()?.as_cname()?;
            (record.name().to_utf8().to_ascii_lowercase() == current).then(|| cname.0.to_utf8())
        });
        match next {
            Some(alias) => {
                current = fully_qualified(&alias).to_ascii_lowercase();
                target = Some(alias);
            }
            None => break,
        }
    }
    target
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;
    use trust_dns_resolver::proto::rr::rdata::{A, CNAME};
    use trust_dns_resolver::proto::rr::{Name, RData};

    #[test]
    fn test_fully_qualified() {
        assert_eq!(fully_qualified("example.com"), "example.com.");
        assert_eq!(fully_qualified("example.com."), "example.com.");
    }

    fn cname(from: &str, to: &str) -> Record {
        Record::from_rdata(
            Name::from_ascii(from).unwrap(),
            300,
            RData::CNAME(CNAME(Name::from_ascii(to).unwrap())),
        )
    }

    fn a(name: &str) -> Record {
        Record::from_rdata(
            Name::from_ascii(name).unwrap(),
            300,
            RData::A(A(Ipv4Addr::new(192, 0, 2, 1))),
        )
    }

    #[test]
    fn test_chain_resolves_to_last_alias() {
        let records = vec![
            cname("shop.example.com.", "shops.myshopify.com."),
            cname("shops.myshopify.com.", "edge.myshopify.com."),
            a("edge.myshopify.com."),
        ];
        assert_eq!(
            follow_chain("shop.example.com", &records).as_deref(),
            Some("edge.myshopify.com.")
        );
    }

    #[test]
    fn test_chain_order_and_case_do_not_matter() {
        let records = vec![
            cname("b.example.net.", "c.example.org."),
            cname("A.Example.com.", "b.example.net."),
        ];
        assert_eq!(
            follow_chain("a.example.com.", &records).as_deref(),
            Some("c.example.org.")
        );
    }

    #[test]
    fn test_chain_without_alias() {
        assert_eq!(follow_chain("example.com", &[a("example.com.")]), None);
        assert_eq!(follow_chain("example.com", &[]), None);
    }

    #[test]
    fn test_chain_loop_terminates() {
        let records = vec![
            cname("a.example.com.", "b.example.com."),
            cname("b.example.com.", "a.example.com."),
        ];
        assert!(follow_chain("a.example.com", &records).is_some());
    }

    #[tokio::test]
    async fn test_empty_host_rejected() {
        let resolver = DnsResolver::default();
        let err = resolver.lookup_cname("   ").await.unwrap_err();
        assert_eq!(err, "empty hostname");
    }

    #[tokio::test]
    async fn test_ip_literal_rejected() {
        let resolver = DnsResolver::default();
        let err = resolver.lookup_cname("127.0.0.1").await.unwrap_err();
        assert!(err.contains("IP address"));

        let err = resolver.lookup_cname("::1").await.unwrap_err();
        assert!(err.contains("IP address"));
    }
}
