//! Download command - save a blog as a wrapped plain-text file.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::cli::{open_workflow, report_failure};

/// Arguments for the download command.
#[derive(clap::Args)]
#[command(after_help = "EXAMPLES:\n    \
    blogsmith download 12                 Save to ./<title>-<timestamp>.txt\n    \
    blogsmith download 12 --dir exports   Save into exports/\n    \
    blogsmith download 12 -o -            Print to stdout")]
pub struct Args {
    /// Blog ID
    #[arg(value_name = "ID")]
    pub id: i64,

    /// Write to this file instead ('-' for stdout)
    #[arg(short, long, value_name = "FILE", conflicts_with = "dir")]
    pub output: Option<PathBuf>,

    /// Directory for the generated filename
    #[arg(short, long, value_name = "DIR")]
    pub dir: Option<PathBuf>,
}

/// Executes the download command.
pub fn run(args: Args) -> Result<()> {
    let workflow = open_workflow()?;
    let download = workflow.download(args.id).map_err(report_failure)?;

    let path = match args.output {
        Some(path) if path.as_os_str() == "-" => {
            let mut stdout = std::io::stdout().lock();
            for line in &download.lines {
                stdout.write_all(line.as_bytes())?;
            }
            stdout.flush()?;
            return Ok(());
        }
        Some(path) => path,
        None => args
            .dir
            .unwrap_or_else(|| PathBuf::from("."))
            .join(&download.filename),
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(&path, download.body())
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("{} {}", "Saved".green(), path.display());
    Ok(())
}
