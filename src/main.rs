use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use academy_solver::error::SolverError;
use academy_solver::lab::config::{LabConfig, PayloadConfig, MAX_CONCURRENCY};
use academy_solver::lab::http_client::LabClient;
use academy_solver::lab::types::{ExtractOptions, ExtractionReport};
use academy_solver::lab::{self, status};

#[derive(Parser)]
#[command(name = "academy-solver")]
#[command(version = "0.3.0")]
#[command(about = "Solvers for PortSwigger Web Security Academy labs", long_about = None)]
struct Cli {
    /// Lab instance ID (the 32 hex digits in front of .web-security-academy.net)
    #[arg(short, long, global = true, env = "SID")]
    server: Option<String>,

    /// Full lab root URL, overrides --server
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Log filter (error, warn, info, debug, trace or an EnvFilter directive) [default: warn]
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Default the log filter to debug (an explicit --log-level still wins)
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the lab title and whether it is solved
    Status,

    /// Blind SQL injection with conditional responses (LAB ONLY)
    #[command(name = "blind-conditional")]
    BlindConditional {
        /// Payload configuration file (YAML overriding the default templates)
        #[arg(long)]
        payload_file: Option<PathBuf>,

        /// Characters extracted at the same time (max: 20)
        #[arg(short, long, default_value = "4")]
        concurrency: usize,

        /// Longest password the length search considers
        #[arg(long, default_value = "64")]
        max_length: usize,

        /// Candidate characters, strictly ascending
        #[arg(long, default_value = "0123456789abcdefghijklmnopqrstuvwxyz")]
        charset: String,

        /// Request timeout in seconds
        #[arg(long, default_value = "30")]
        timeout: u64,

        /// Do not draw the search boards on the terminal
        #[arg(long)]
        no_live: bool,

        /// Output format: json, yaml, or text
        #[arg(short, long, default_value = "text", value_parser = ["text", "json", "yaml"])]
        output: String,

        /// Output file path (if not specified, writes to stdout)
        #[arg(long)]
        output_file: Option<PathBuf>,

        /// Short output mode (no per-character table)
        #[arg(long)]
        short: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = log_filter(cli.log_level.as_deref(), cli.debug);
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|e| {
        eprintln!("⚠️  Invalid log level {:?} ({}), falling back to warn", filter, e);
        EnvFilter::new("warn")
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Setup graceful shutdown
    let (shutdown_tx, mut shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                eprintln!("\nReceived shutdown signal, cleaning up...");
                let _ = shutdown_tx.send(());
            }
            Err(e) => {
                eprintln!("Error setting up signal handler: {}", e);
            }
        }
    });

    tokio::select! {
        result = run_command(cli) => {
            if let Err(e) = result {
                eprintln!("\n⛔ {}", e);
                std::process::exit(1);
            }
        },
        _ = &mut shutdown_rx => {
            eprintln!("Shutting down gracefully");
            std::process::exit(130);
        }
    }
}

/// Filter directive for the subscriber: explicit level, else debug or warn
fn log_filter(log_level: Option<&str>, debug: bool) -> &str {
    match log_level {
        Some(level) => level,
        None if debug => "debug",
        None => "warn",
    }
}

async fn run_command(cli: Cli) -> Result<(), SolverError> {
    let config = LabConfig {
        server_id: cli.server.unwrap_or_default(),
        base_url: cli.base_url,
        ..Default::default()
    };

    match cli.command {
        Commands::Status => handle_status(config).await,
        Commands::BlindConditional {
            payload_file,
            concurrency,
            max_length,
            charset,
            timeout,
            no_live,
            output,
            output_file,
            short,
        } => {
            let payload_config = match &payload_file {
                Some(path) => {
                    let payloads = LabConfig::load_payloads_from_file(path)?;
                    eprintln!("✓ Loaded payload configuration from: {}", path.display());
                    payloads
                }
                None => PayloadConfig::default(),
            };

            let config = LabConfig {
                max_concurrency: concurrency.min(MAX_CONCURRENCY),
                max_length,
                charset,
                timeout_secs: timeout,
                payload_config,
                payload_file,
                ..config
            };
            let options = ExtractOptions { live: !no_live };

            handle_blind_conditional(config, options, output, output_file, short).await
        }
    }
}

// ============================================================================
// LAB STATUS
// ============================================================================

async fn handle_status(config: LabConfig) -> Result<(), SolverError> {
    config.validate()?;
    let client = LabClient::new(&config)?;
    let lab_status = status::fetch_status(&client).await?;

    println!("Lab: {}", client.base());
    println!(
        "Title: {}",
        lab_status.title.as_deref().unwrap_or("<unknown>")
    );
    println!(
        "Status: {}",
        if lab_status.solved { "✅ solved" } else { "❌ not solved" }
    );
    Ok(())
}

// ============================================================================
// BLIND SQL INJECTION
// ============================================================================

async fn handle_blind_conditional(
    config: LabConfig,
    options: ExtractOptions,
    output_format: String,
    output_file: Option<PathBuf>,
    short: bool,
) -> Result<(), SolverError> {
    config.validate()?;

    eprintln!("\n🚀 Starting blind SQL injection extraction");
    eprintln!("   Target: {}", config.lab_url()?);
    eprintln!(
        "   Started at: {}\n",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );

    let report = lab::extract_secret(&config, options).await?;

    match output_format.as_str() {
        "json" => write_output(serde_json::to_string_pretty(&report)?, output_file)?,
        "yaml" => write_output(serde_yaml::to_string(&report)?, output_file)?,
        _ => {
            lab::print_report(&report, short);
            if let Some(path) = output_file {
                std::fs::write(&path, report_text(&report))?;
                println!("\n✓ Results also saved to: {}", path.display());
            }
        }
    }

    Ok(())
}

fn write_output(content: String, output_file: Option<PathBuf>) -> Result<(), SolverError> {
    match output_file {
        Some(path) => {
            std::fs::write(&path, content)?;
            println!("✓ Results saved to: {}", path.display());
        }
        None => println!("{}", content),
    }
    Ok(())
}

fn report_text(report: &ExtractionReport) -> String {
    let mut text = String::new();
    text.push_str("BLIND SQL INJECTION EXTRACTION RESULTS\n");
    text.push_str(&format!("Lab: {}\n", report.lab_url));
    text.push_str(&format!("Username: {}\n", report.username));
    text.push_str(&format!("Password: {}\n", report.secret));
    text.push_str(&format!("Probes: {}\n", report.total_probes));
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_log_level_wins_over_debug() {
        let cli = Cli::try_parse_from(["academy-solver", "--debug", "--log-level", "info", "status"]).unwrap();
        assert_eq!(log_filter(cli.log_level.as_deref(), cli.debug), "info");
    }

    #[test]
    fn test_debug_changes_default_level() {
        let cli = Cli::try_parse_from(["academy-solver", "-d", "status"]).unwrap();
        assert_eq!(log_filter(cli.log_level.as_deref(), cli.debug), "debug");

        let cli = Cli::try_parse_from(["academy-solver", "status"]).unwrap();
        assert_eq!(log_filter(cli.log_level.as_deref(), cli.debug), "warn");
    }
}
