//! CLI argument definitions and parsing structures
//!
//! This module defines the command-line interface structure using clap,
//! including the main `Cli` struct and the subcommand enum.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// rolecraft - role-aware generation from issues and linked documents
#[derive(Parser, Debug)]
#[command(name = "rolecraft")]
#[command(about = "Generate test cases or user stories from an issue and its linked document")]
#[command(long_about = r#"
rolecraft turns an issue and its linked document into role-specific output:
test cases for a Tester, user stories for a BusinessAnalyst.

EXAMPLES:
  # Serve the HTTP API on the default address (127.0.0.1:3000)
  rolecraft serve

  # Serve on another address
  rolecraft serve --bind 0.0.0.0:8080

  # Run one workflow from the command line
  rolecraft generate --role Tester --issue DEMO1 --document DOC1

  # Same, printing the JSON envelope
  rolecraft generate --role BusinessAnalyst --issue DEMO1 --document DOC1 --json

  # Show the effective configuration and where each value came from
  rolecraft config

CONFIGURATION:
  Configuration is loaded with precedence: CLI flags > environment > config file > defaults
  Config file is discovered by searching upward from CWD for .rolecraft/config.toml
  Use --config to specify an explicit config file path

EXIT CODES:
  0 success, 1 unexpected error, 2 invalid input, 3 data not found, 70 generation failed
"#)]
#[command(version)]
pub struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding JIRA-<id>.json and CONFLUENCE-<id>.json fixtures
    #[arg(long, global = true)]
    pub fixtures_dir: Option<PathBuf>,

    /// Generation provider: openai or openrouter
    #[arg(long, global = true)]
    pub llm_provider: Option<String>,

    /// Model to request from the generation provider
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Sampling temperature (0.0 - 2.0)
    #[arg(long, global = true)]
    pub temperature: Option<f32>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the HTTP API
    Serve {
        /// Address to listen on (default 127.0.0.1:3000, PORT env honoured)
        #[arg(long)]
        bind: Option<String>,
    },

    /// Run a single workflow and print the output
    Generate {
        /// Tester or BusinessAnalyst
        #[arg(long)]
        role: String,

        /// Issue identifier
        #[arg(long)]
        issue: String,

        /// Linked document identifier
        #[arg(long)]
        document: String,

        /// Print the JSON envelope instead of the bare output
        #[arg(long)]
        json: bool,
    },

    /// Show the effective configuration with source attribution
    Config,
}

/// Build the clap `Command` (used by tests and completions).
pub fn build_cli() -> clap::Command {
    <Cli as clap::CommandFactory>::command()
}
