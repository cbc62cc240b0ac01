//! Command-line interface for blogsmith.
//!
//! Provides the CLI commands for generating, listing, regenerating and
//! downloading blogs, and for running the HTTP server.

/// Individual CLI command implementations.
pub mod commands;

/// Output format shared by listing commands.
pub mod format;

use anyhow::{Context, Result};
use blogsmith::config::Config;
use blogsmith::workflow::{AppContext, BlogWorkflow, WorkflowError};
use colored::Colorize;

pub use format::OutputFormat;

/// Loads configuration and builds the workflow.
///
/// Must run before the tokio runtime is entered: building the generation
/// client creates a blocking HTTP client.
pub fn open_workflow() -> Result<BlogWorkflow> {
    let config = Config::load()?;
    open_workflow_with(&config)
}

pub fn open_workflow_with(config: &Config) -> Result<BlogWorkflow> {
    let ctx = AppContext::from_config(config)?;
    Ok(BlogWorkflow::new(ctx))
}

/// Creates the runtime used by commands that talk to the provider.
pub fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new().context("Failed to create tokio runtime")
}

/// Prints the user-facing messages of a workflow error and converts it
/// into the command's error.
pub fn report_failure(err: WorkflowError) -> anyhow::Error {
    let mut messages = err.user_warnings();
    let headline = messages.pop().unwrap_or_else(|| err.to_string());
    for note in messages {
        eprintln!("{} {}", "Warning:".yellow(), note);
    }
    anyhow::anyhow!(headline)
}
