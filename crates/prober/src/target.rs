//! Hostname normalisation for a single probe

use reqwest::Url;

/// A caller-supplied hostname split into the two forms a probe needs: the
/// URL to fetch and the bare host to resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeTarget {
    url: String,
    dns_host: String,
}

impl ProbeTarget {
    /// Prepend `http://` unless the input already carries an `http://` or
    /// `https://` scheme (case-insensitive).
    pub fn parse(input: &str) -> Self {
        let url = if has_http_scheme(input) {
            input.to_string()
        } else {
            format!("http://{input}")
        };
        let dns_host = bare_host(&url);
        Self { url, dns_host }
    }

    #[inline]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Host without scheme, userinfo, port or path.
    #[inline]
    pub fn dns_host(&self) -> &str {
        &self.dns_host
    }
}

fn has_http_scheme(input: &str) -> bool {
    starts_with_ignore_case(input, "http://") || starts_with_ignore_case(input, "https://")
}

fn starts_with_ignore_case(s: &str, prefix: &str) -> bool {
    s.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

fn bare_host(url: &str) -> String {
    if let Ok(parsed) = Url::parse(url) {
        if let Some(host) = parsed.host_str() {
            return host
                .trim_start_matches('[')
                .trim_end_matches(']')
                .to_string();
        }
    }

    // Unparseable URL: strip the scheme and anything after the authority.
    let rest = url
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(url);
    let authority = rest.split(['/', '?', '#']).next().unwrap_or(rest);
    let authority = authority.rsplit_once('@').map_or(authority, |(_, h)| h);
    authority.to_string()
}
