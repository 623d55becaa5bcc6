use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use dangle_common::{DangleError, DangleResult, ProbeOptions};

#[derive(Parser)]
#[command(name = "dangle")]
#[command(version)]
#[command(about = "Dangling subdomain takeover checker", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check subdomains once and print the results
    Check {
        /// Subdomains to check. Example: shop.example.com https://cdn.example.com
        subdomains: Vec<String>,

        /// File with one subdomain per line ('#' starts a comment)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output format: text, json, csv
        #[arg(short, long, default_value = "text", value_parser = ["text", "json", "csv"])]
        output_format: String,

        #[command(flatten)]
        probe: ProbeArgs,
    },

    /// Serve POST /api/check over HTTP
    Serve {
        /// Address to listen on
        #[arg(short, long, default_value = "0.0.0.0:8080")]
        listen: SocketAddr,

        #[command(flatten)]
        probe: ProbeArgs,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct ProbeArgs {
    /// HTTP request timeout in seconds (default: none)
    #[arg(long)]
    pub http_timeout: Option<u64>,

    /// Max probes in flight per batch (default: unbounded)
    #[arg(short = 'c', long)]
    pub max_concurrency: Option<usize>,

    /// User-Agent header for HTTP requests
    #[arg(long)]
    pub user_agent: Option<String>,
}

impl ProbeArgs {
    pub fn to_options(&self) -> DangleResult<ProbeOptions> {
        let mut options = ProbeOptions::default();

        if let Some(secs) = self.http_timeout {
            if secs == 0 {
                return Err(DangleError::Config(
                    "--http-timeout must be at least 1 second".into(),
                ));
            }
            options = options.with_http_timeout(Duration::from_secs(secs));
        }
        if let Some(limit) = self.max_concurrency {
            if limit == 0 {
                return Err(DangleError::Config(
                    "--max-concurrency must be at least 1".into(),
                ));
            }
            options = options.with_max_concurrency(limit);
        }
        if let Some(agent) = &self.user_agent {
            options = options.with_user_agent(agent.clone());
        }
        Ok(options)
    }
}
