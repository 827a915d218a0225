//! # AI-IQ - AI Readiness Survey
//!
//! The main binary for the AI IQ maturity survey.
//!
//! This application provides:
//! - CLI interface for scoring answer files and reading results
//! - HTTP JSON API server (axum-based)
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                 apps/aiiq (THE BINARY)               │
//! │                                                      │
//! │  ┌─────────────┐   ┌─────────────┐   ┌────────────┐  │
//! │  │    CLI      │   │  HTTP API   │   │   Config   │  │
//! │  │   (clap)    │   │   (axum)    │   │   (toml)   │  │
//! │  └──────┬──────┘   └──────┬──────┘   └─────┬──────┘  │
//! │         └─────────────────┼────────────────┘         │
//! │                           ▼                          │
//! │                  ┌─────────────────┐                 │
//! │                  │    aiiq-core    │                 │
//! │                  │ (scoring+store) │                 │
//! │                  └─────────────────┘                 │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Fill in a form and score it
//! aiiq template > answers.json
//! aiiq score -f answers.json --name "Ada" --email ada@example.com
//!
//! # Results (password from aiiq.toml or AIIQ_PASSWORD)
//! aiiq summary --password "$AIIQ_PASSWORD"
//!
//! # Start the HTTP server
//! aiiq server --host 0.0.0.0 --port 8080
//! ```

use aiiq::cli;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    // AIIQ_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("AIIQ_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let default_filter = if cli.verbose {
        "aiiq=debug,aiiq_core=debug,tower_http=debug"
    } else {
        "aiiq=info,tower_http=debug"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    // Template output is meant to be redirected into a file.
    let machine_output = cli.json_mode || matches!(cli.command, Some(cli::Commands::Template));
    if !cli.quiet && !machine_output {
        print_banner();
    }

    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the startup banner.
fn print_banner() {
    println!(
        r#"
   █████╗ ██╗      ██╗ ██████╗
  ██╔══██╗██║      ██║██╔═══██╗
  ███████║██║█████╗██║██║   ██║
  ██╔══██║██║╚════╝██║██║▄▄ ██║
  ██║  ██║██║      ██║╚██████╔╝
  ╚═╝  ╚═╝╚═╝      ╚═╝ ╚══▀▀═╝

  AI Readiness Survey v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
