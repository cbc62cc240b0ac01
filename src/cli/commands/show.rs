//! Show command - display a single blog.

use anyhow::Result;
use colored::Colorize;

use crate::cli::format::markdown_blog;
use crate::cli::{open_workflow, report_failure, OutputFormat};

/// Arguments for the show command.
#[derive(clap::Args)]
#[command(after_help = "EXAMPLES:\n    \
    blogsmith show 12                    View blog 12\n    \
    blogsmith show 12 --format markdown  Output as markdown\n    \
    blogsmith show 12 --format json      Output as JSON")]
pub struct Args {
    /// Blog ID
    #[arg(value_name = "ID")]
    pub id: i64,

    /// Output format: text (default), json, markdown
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Executes the show command.
pub fn run(args: Args) -> Result<()> {
    let workflow = open_workflow()?;
    let blog = workflow.get_blog(args.id).map_err(report_failure)?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&blog)?),
        OutputFormat::Markdown => print!("{}", markdown_blog(&blog)),
        OutputFormat::Text => {
            println!("{} {}", "Blog".bold(), blog.id.to_string().cyan());
            println!("  {}  {}", "Title:".dimmed(), blog.title.bold());
            println!("  {}  {}", "Tone:".dimmed(), blog.tone_label());
            println!(
                "  {}  {}",
                "Created:".dimmed(),
                blog.created_at.format("%Y-%m-%d %H:%M:%S")
            );
            println!(
                "  {}  {}",
                "Updated:".dimmed(),
                blog.updated_at.format("%Y-%m-%d %H:%M:%S")
            );
            println!();
            println!("{}", blog.content);
        }
    }

    Ok(())
}
