mod args;
mod output;
mod runner;
mod server;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use args::{Cli, Commands};
use runner::{build_orchestrator, run_check};
use server::{start_server, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Check {
            subdomains,
            input,
            output_format,
            probe,
        } => {
            run_check(subdomains, input, output_format, probe.to_options()?).await?;
        }
        Commands::Serve { listen, probe } => {
            let orchestrator = build_orchestrator(&probe.to_options()?)?;
            start_server(ServerConfig { listen_addr: listen }, orchestrator).await?;
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let log_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    // Logs go to stderr so `check -o json` output stays parseable.
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
