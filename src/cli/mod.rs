//! Command-line interface for rolecraft
//!
//! ## Module Structure
//!
//! - `args`: CLI argument definitions and parsing structures (clap)
//! - `run`: Main entry point and command dispatch
//! - `commands`: Command implementations
//! - `tests`: Test module (cfg(test) only)

pub mod args;
mod commands;
mod run;

#[cfg(test)]
mod tests;

pub use args::{build_cli, Cli, Commands};
pub use commands::{generate_envelope, render_effective_config};
pub use run::run;
