//! # AI-IQ CLI Module
//!
//! This module implements the CLI interface for the survey.
//!
//! ## Available Commands
//!
//! - `questions` - Show the survey questions
//! - `template` - Print a blank answers file
//! - `score` - Score an answers file (stored when name and email are given)
//! - `list` - List stored submissions (password)
//! - `show` - Show one submission (password)
//! - `delete` - Delete one submission (password)
//! - `summary` - Aggregate results (password)
//! - `server` - Start the HTTP server
//! - `config` - Show the resolved configuration

mod commands;

use crate::config::AppConfig;
use aiiq_core::AiIqError;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// AI-IQ - AI readiness maturity survey
///
/// Scores Likert answers per dimension into a composite AI IQ and a
/// maturity level, and keeps identified submissions in a CSV store.
#[derive(Parser, Debug)]
#[command(name = "aiiq")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the TOML config file (default: aiiq.toml if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the CSV store (overrides config and AIIQ_STORE)
    #[arg(short = 'S', long, global = true)]
    pub store: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the survey questions and answer scale
    Questions,

    /// Print a blank answers file (every answer Neutral)
    Template,

    /// Score an answers file
    Score {
        /// Path to the answers file (JSON, see `template`)
        #[arg(short, long)]
        file: PathBuf,

        /// Respondent name (overrides the file)
        #[arg(short, long)]
        name: Option<String>,

        /// Respondent email (overrides the file)
        #[arg(short, long)]
        email: Option<String>,

        /// Score only, never store
        #[arg(long)]
        dry_run: bool,
    },

    /// List stored submissions
    List {
        /// Results password
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Show one submission with its chart and text answers
    Show {
        /// Respondent ID
        id: u64,

        /// Results password
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Delete one submission
    Delete {
        /// Respondent ID
        id: u64,

        /// Results password
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Aggregate results across all respondents
    Summary {
        /// Results password
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Start HTTP server
    Server {
        /// Host to bind to
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },

    /// Show the resolved configuration
    Config,
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), AiIqError> {
    let config = AppConfig::load(cli.config.as_deref())?.with_store(cli.store);
    let json_mode = cli.json_mode;

    if cli.verbose {
        match &config.source {
            Some(path) => tracing::info!("Configuration loaded from {}", path.display()),
            None => tracing::info!("No config file, using defaults and environment"),
        }
    }

    match cli.command {
        Some(Commands::Questions) | None => cmd_questions(&config, json_mode),
        Some(Commands::Template) => cmd_template(&config),
        Some(Commands::Score {
            file,
            name,
            email,
            dry_run,
        }) => cmd_score(&config, json_mode, &file, name, email, dry_run),
        Some(Commands::List { password }) => cmd_list(&config, json_mode, password.as_deref()),
        Some(Commands::Show { id, password }) => {
            cmd_show(&config, json_mode, id, password.as_deref())
        }
        Some(Commands::Delete { id, password }) => {
            cmd_delete(&config, json_mode, id, password.as_deref())
        }
        Some(Commands::Summary { password }) => {
            cmd_summary(&config, json_mode, password.as_deref())
        }
        Some(Commands::Server { host, port }) => cmd_server(&config, &host, port).await,
        Some(Commands::Config) => cmd_config(&config, json_mode),
    }
}
