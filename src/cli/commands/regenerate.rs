//! Regenerate command - replace a blog's content with a fresh generation.
//!
//! Uses the blog's original title and tone. If the provider call fails the
//! stored blog is left unchanged, so the command can simply be re-run.

use anyhow::Result;
use colored::Colorize;

use crate::cli::{open_workflow, report_failure, runtime};

/// Arguments for the regenerate command.
#[derive(clap::Args)]
#[command(after_help = "EXAMPLES:\n    \
    blogsmith regenerate 12     Regenerate blog 12")]
pub struct Args {
    /// Blog ID
    #[arg(value_name = "ID")]
    pub id: i64,
}

/// Executes the regenerate command.
pub fn run(args: Args) -> Result<()> {
    let workflow = open_workflow()?;
    let rt = runtime()?;

    let blog = rt
        .block_on(workflow.regenerate(args.id))
        .map_err(report_failure)?;

    println!(
        "{} '{}' successfully.",
        "Regenerated".green(),
        blog.title
    );
    println!(
        "{}",
        format!("Updated at {}", blog.updated_at.format("%Y-%m-%d %H:%M:%S")).dimmed()
    );

    Ok(())
}
