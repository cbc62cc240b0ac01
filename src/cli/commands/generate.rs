//! Generate command - create blogs from a list of titles.
//!
//! Titles can be passed as arguments, read from a file, or piped on stdin.
//! They are parsed exactly like the web form: comma or newline separated,
//! de-duplicated, and capped at ten per batch.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::cli::format::markdown_batch;
use crate::cli::{open_workflow, report_failure, runtime, OutputFormat};
use blogsmith::workflow::parse_tone;

/// Arguments for the generate command.
#[derive(clap::Args)]
#[command(after_help = "EXAMPLES:\n    \
    blogsmith generate \"Rust for Beginners\"                  One blog\n    \
    blogsmith generate \"SEO Basics, Email Marketing\"         Two blogs\n    \
    blogsmith generate -i titles.txt --tone Formal           Titles from a file\n    \
    cat titles.txt | blogsmith generate -i -                 Titles from stdin")]
pub struct Args {
    /// Blog titles (comma or newline separated)
    #[arg(value_name = "TITLES")]
    pub titles: Vec<String>,

    /// Read additional titles from a file ('-' for stdin)
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Tone: Neutral, Formal, Conversational, or Technical
    #[arg(short, long, default_value = "Neutral", value_name = "TONE")]
    pub tone: String,

    /// Output format: text (default), json, markdown
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Executes the generate command.
///
/// Generates every title in order and stores them together. If any title
/// fails, nothing is stored.
pub fn run(args: Args) -> Result<()> {
    let raw = collect_titles(&args)?;
    let tone = parse_tone(Some(&args.tone)).map_err(report_failure)?;

    let workflow = open_workflow()?;
    let rt = runtime()?;

    let report = rt
        .block_on(workflow.generate_batch(&raw, tone))
        .map_err(report_failure)?;

    for warning in &report.warnings {
        eprintln!("{} {}", "Warning:".yellow(), warning);
    }

    match args.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&report.blogs)?;
            println!("{json}");
        }
        OutputFormat::Markdown => print!("{}", markdown_batch(&report.blogs)),
        OutputFormat::Text => {
            println!("{}", report.message().green());
            for blog in &report.blogs {
                println!("  {:>4}  {}", blog.id.to_string().cyan(), blog.title);
            }
            println!();
            println!(
                "{}",
                "Run 'blogsmith show <id>' to read a blog.".dimmed()
            );
        }
    }

    Ok(())
}

/// Joins positional titles and the input file into one raw title list.
fn collect_titles(args: &Args) -> Result<String> {
    let mut raw = args.titles.join("\n");

    if let Some(path) = &args.input {
        let text = if path.as_os_str() == "-" {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read titles from stdin")?;
            buf
        } else {
            std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?
        };
        if !raw.is_empty() {
            raw.push('\n');
        }
        raw.push_str(&text);
    }

    Ok(raw)
}
