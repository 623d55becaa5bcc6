// runner.rs
use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use crate::output::print_results;
use dangle_common::{BatchJob, DangleResult, ProbeOptions};
use dangle_orchestrator::Orchestrator;
use dangle_prober::HttpProber;
use dangle_resolver::DnsResolver;

/// Wire the resolver, prober and orchestrator together. One prober (and so
/// one HTTP client) is shared by every batch the orchestrator runs.
pub fn build_orchestrator(options: &ProbeOptions) -> Result<Orchestrator> {
    let resolver = Arc::new(DnsResolver::system_or_default());
    let prober =
        HttpProber::with_options(resolver, options).context("Failed to build HTTP prober")?;

    info!(
        signatures = prober.catalog().len(),
        http_timeout = ?options.http_timeout,
        max_concurrency = ?options.max_concurrency,
        "Prober ready"
    );
    Ok(Orchestrator::from_options(Arc::new(prober), options))
}

pub async fn run_check(
    mut subdomains: Vec<String>,
    input: Option<PathBuf>,
    output_format: String,
    options: ProbeOptions,
) -> Result<()> {
    if let Some(path) = input {
        let from_file = read_subdomains(&path)
            .with_context(|| format!("Failed to read subdomains from {}", path.display()))?;
        info!("Loaded {} subdomain(s) from {}", from_file.len(), path.display());
        subdomains.extend(from_file);
    }
    if subdomains.is_empty() {
        bail!("No subdomains specified");
    }

    let orchestrator = build_orchestrator(&options)?;
    let (results, summary) = orchestrator.run(BatchJob::new(subdomains)).await;
    print_results(&results, &summary, &output_format)?;
    Ok(())
}

fn read_subdomains(path: &Path) -> DangleResult<Vec<String>> {
    let text = std::fs::read_to_string(path)?;
    Ok(parse_subdomain_list(&text))
}

/// One subdomain per line; blank lines and `#` comments are skipped.
fn parse_subdomain_list(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.split('#').next().unwrap_or("").trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list() {
        let text = "a.example.com\n\n# staging\nb.example.com  # old bucket\n   \nhttps://c.example.com\n";
        assert_eq!(
            parse_subdomain_list(text),
            vec!["a.example.com", "b.example.com", "https://c.example.com"]
        );
    }

    #[test]
    fn test_parse_list_keeps_duplicates() {
        let text = "a.example.com\na.example.com\n";
        assert_eq!(parse_subdomain_list(text).len(), 2);
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_subdomains(Path::new("/nonexistent/dangle/hosts.txt")).unwrap_err();
        assert!(err.to_string().starts_with("I/O error"));
    }

    #[tokio::test]
    async fn test_check_requires_subdomains() {
        let err = run_check(Vec::new(), None, "text".into(), ProbeOptions::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("No subdomains"));
    }
}
