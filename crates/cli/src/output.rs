//! Output formatting for check results

use anyhow::Result;
use serde::Serialize;
use std::time::Duration;

use dangle_common::{BatchSummary, ProbeResult};

/// Same shape as the HTTP API response body.
#[derive(Serialize)]
struct JsonReport<'a> {
    results: &'a [ProbeResult],
}

/// Print check results in the specified format
pub fn print_results(results: &[ProbeResult], summary: &BatchSummary, format: &str) -> Result<()> {
    match format.trim().to_lowercase().as_str() {
        "json" | "j" => print_json(results)?,
        "csv" | "c" => print_csv(results),
        "text" | "table" | "t" | "" => print_table(results, summary),
        other => {
            eprintln!("Warning: Unknown format '{}', using default table format", other);
            print_table(results, summary);
        }
    }
    Ok(())
}

/// Print results as an ASCII table, in input order
fn print_table(results: &[ProbeResult], summary: &BatchSummary) {
    if results.is_empty() {
        println!("\nNo results to display.\n");
        return;
    }

    println!("\n{:-<100}", "");
    println!(
        "{:<36} {:<12} {:<11} {:<6} {:<33}",
        "SUBDOMAIN", "STATUS", "SERVICE", "HTTP", "CNAME / ERROR"
    );
    println!("{:-<100}", "");

    for result in results {
        let status = if result.vulnerable {
            "VULNERABLE"
        } else if result.http_status.is_none() && result.error_message.is_some() {
            "error"
        } else {
            "ok"
        };
        let http = result
            .http_status
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string());
        let detail = result
            .error_message
            .as_deref()
            .or(result.cname.as_deref())
            .unwrap_or("-");

        println!(
            "{:<36} {:<12} {:<11} {:<6} {:<33}",
            truncate(&result.subdomain, 35),
            status,
            result.service.as_deref().unwrap_or("-"),
            http,
            truncate(detail, 60)
        );
    }

    println!("{:-<100}", "");
    println!("\nSummary:");
    println!("  Total checked: {}", summary.total);
    println!("  Vulnerable: {}", summary.vulnerable);
    println!("  With errors: {}", summary.errored);
    println!("  Duration: {}", format_duration(summary.elapsed));
    println!();
}

/// Print results as JSON
fn print_json(results: &[ProbeResult]) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&JsonReport { results })?);
    Ok(())
}

/// Print results as CSV
fn print_csv(results: &[ProbeResult]) {
    println!("subdomain,vulnerable,service,cname,http_status,error_message");

    for result in results {
        println!(
            "{},{},{},{},{},{}",
            csv_field(&result.subdomain),
            result.vulnerable,
            csv_field(result.service.as_deref().unwrap_or("")),
            csv_field(result.cname.as_deref().unwrap_or("")),
            result.http_status.map(|s| s.to_string()).unwrap_or_default(),
            csv_field(result.error_message.as_deref().unwrap_or(""))
        );
    }
}

fn csv_field(value: &str) -> String {
    let escaped = value
        .replace('"', "\"\"")
        .replace('\n', " ")
        .replace('\r', "");
    format!("\"{}\"", escaped)
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let head: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

/// Format duration in a human-readable way
fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs < 1.0 {
        format!("{:.0}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{:.2}s", secs)
    } else {
        let mins = duration.as_secs() / 60;
        format!("{}m {}s", mins, duration.as_secs() % 60)
    }
}
