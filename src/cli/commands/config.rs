//! Config command - inspect configuration

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use blogsmith::config::{Config, ENV_API_KEY};
use blogsmith::storage::db::resolve_database_url;

#[derive(clap::Args)]
#[command(after_help = "EXAMPLES:\n    \
    blogsmith config              Show resolved configuration\n    \
    blogsmith config path         Print the config file location")]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<ConfigCommand>,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show resolved configuration
    Show,
    /// Print the path of the config file
    Path,
}

pub fn run(args: Args) -> Result<()> {
    match args.command {
        Some(ConfigCommand::Show) | None => show_config(),
        Some(ConfigCommand::Path) => {
            println!("{}", Config::config_path()?.display());
            Ok(())
        }
    }
}

fn show_config() -> Result<()> {
    let config = Config::load()?;

    println!("{}", "Blogsmith Configuration".bold());
    println!();

    let path = Config::config_path()?;
    let file_note = if path.exists() { "" } else { " (not found)" };
    println!("  {}  {}{}", "Config file:".dimmed(), path.display(), file_note.dimmed());

    let database = resolve_database_url(config.database_url())
        .map(|location| location.to_string())
        .unwrap_or_else(|e| format!("{} ({e})", config.database_url()));
    println!("  {}  {}", "Database:".dimmed(), database);
    println!("  {}  {}", "Bind:".dimmed(), config.bind_addr()?);

    println!();
    println!("{}", "Generation:".bold());
    println!("  {}  {}", "Model:".dimmed(), config.model());
    println!("  {}  {}", "Base URL:".dimmed(), config.base_url());
    println!(
        "  {}  {}s",
        "Timeout:".dimmed(),
        config.request_timeout().as_secs()
    );
    match config.masked_api_key() {
        Some(masked) => println!("  {} API key {}", "✓".green(), masked),
        None => println!("  {} {} is not set", "✗".red(), ENV_API_KEY),
    }

    Ok(())
}
