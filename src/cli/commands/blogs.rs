//! Blogs command - list stored blogs.
//!
//! Shows blogs ordered by when they were last generated, with a short
//! preview of each.

use anyhow::Result;
use colored::Colorize;

use crate::cli::format::markdown_cards;
use crate::cli::{open_workflow, report_failure, OutputFormat};

/// Arguments for the blogs command.
#[derive(clap::Args)]
#[command(after_help = "EXAMPLES:\n    \
    blogsmith blogs                    List all blogs\n    \
    blogsmith blogs --limit 3          Show the 3 most recent\n    \
    blogsmith blogs --format json      Output as JSON\n    \
    blogsmith blogs --format markdown  Output as markdown")]
pub struct Args {
    /// Maximum number of blogs to display
    #[arg(short, long, value_name = "N")]
    pub limit: Option<usize>,

    /// Output format: text (default), json, markdown
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Executes the blogs command.
pub fn run(args: Args) -> Result<()> {
    let workflow = open_workflow()?;

    let cards = match args.limit {
        Some(limit) => workflow.list_recent(limit),
        None => workflow.list_all(),
    }
    .map_err(report_failure)?;

    if cards.is_empty() {
        println!("{}", "No blogs found.".dimmed());
        println!();
        println!("Run 'blogsmith generate \"<title>\"' to create one.");
        return Ok(());
    }

    match args.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&cards)?;
            println!("{json}");
        }
        OutputFormat::Markdown => print!("{}", markdown_cards(&cards)),
        OutputFormat::Text => {
            const ID_WIDTH: usize = 6;
            const UPDATED_WIDTH: usize = 16;
            const TONE_WIDTH: usize = 14;

            println!(
                "{}",
                format!(
                    "{:<ID_WIDTH$}  {:<UPDATED_WIDTH$}  {:<TONE_WIDTH$}  {}",
                    "ID", "UPDATED", "TONE", "TITLE"
                )
                .bold()
            );

            for card in &cards {
                let updated = card.updated_at.format("%Y-%m-%d %H:%M").to_string();
                println!(
                    "{:<ID_WIDTH$}  {:<UPDATED_WIDTH$}  {:<TONE_WIDTH$}  {}",
                    card.id.to_string().cyan(),
                    updated.dimmed(),
                    card.tone.yellow(),
                    card.title
                );
                println!("        {}", card.preview.replace('\n', " ").dimmed());
            }

            let total = workflow.count().map_err(report_failure)?;
            if (cards.len() as i64) < total {
                println!();
                println!(
                    "{}",
                    format!("Showing {} of {} blogs.", cards.len(), total).dimmed()
                );
            }
        }
    }

    Ok(())
}
