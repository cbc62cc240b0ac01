use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

mod cli;

use cli::commands;

/// The main CLI command line interface.
#[derive(Parser)]
#[command(name = "blogsmith")]
#[command(version)]
#[command(about = "Generate blog posts from titles with an AI model")]
#[command(long_about = "Blogsmith turns a list of titles into blog posts using an\n\
    OpenAI model, stores them in SQLite, and lets you regenerate or\n\
    download them from the command line or over HTTP.")]
#[command(after_help = "EXAMPLES:\n    \
    blogsmith generate \"Rust for Beginners\"   Generate one blog\n    \
    blogsmith blogs                           List stored blogs\n    \
    blogsmith show 3                          Read a blog\n    \
    blogsmith regenerate 3                    Regenerate a blog\n    \
    blogsmith download 3                      Save a blog as text\n    \
    blogsmith serve                           Run the HTTP API\n\n    \
    For more information about a command, run 'blogsmith <command> --help'.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Also write logs to this file
    #[arg(long, global = true, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

/// Available CLI subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Generate blogs from a list of titles
    #[command(long_about = "Generates one blog per title, in order, and stores the batch\n\
        in a single transaction. Titles are comma or newline separated,\n\
        de-duplicated ignoring case, and capped at ten per batch.\n\
        If any title fails, no blogs from the batch are stored.")]
    Generate(commands::generate::Args),

    /// List stored blogs
    #[command(long_about = "Displays stored blogs, most recently generated first, with\n\
        their tone and a short content preview.")]
    Blogs(commands::blogs::Args),

    /// Show a single blog
    #[command(long_about = "Displays a blog's full content and metadata.\n\
        \n\
        Supports multiple output formats:\n\
        - text: colored terminal output (default)\n\
        - json: machine-readable structured output\n\
        - markdown: formatted for documentation")]
    Show(commands::show::Args),

    /// Regenerate a blog's content
    #[command(long_about = "Generates new content for an existing blog using its original\n\
        title and tone. On failure the stored blog is left unchanged.")]
    Regenerate(commands::regenerate::Args),

    /// Save a blog as a wrapped plain-text file
    #[command(long_about = "Writes the blog's title, tone and content, wrapped at 80\n\
        characters, to a file named after the title and the current time.")]
    Download(commands::download::Args),

    /// Run the HTTP API
    #[command(long_about = "Serves the generate, list, regenerate and download endpoints\n\
        over HTTP. Listing and downloading work even when no API key is set.")]
    Serve(commands::serve::Args),

    /// View configuration settings
    #[command(long_about = "Shows the resolved configuration. Values come from environment\n\
        variables (and a .env file), then ~/.blogsmith/config.yaml, then defaults.")]
    Config(commands::config::Args),

    /// Generate shell completion scripts
    Completions(commands::completions::Args),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();

    let _guard = init_logging(cli.verbose, cli.log_file.as_deref());

    match cli.command {
        Commands::Generate(args) => commands::generate::run(args),
        Commands::Blogs(args) => commands::blogs::run(args),
        Commands::Show(args) => commands::show::run(args),
        Commands::Regenerate(args) => commands::regenerate::run(args),
        Commands::Download(args) => commands::download::run(args),
        Commands::Serve(args) => commands::serve::run(args),
        Commands::Config(args) => commands::config::run(args),
        Commands::Completions(args) => {
            commands::completions::generate_completions(&mut Cli::command(), args.shell);
            Ok(())
        }
    }
}

/// Initializes tracing to stderr and, optionally, a log file.
///
/// The returned guard must be held until exit so buffered file output is
/// flushed.
fn init_logging(verbose: bool, log_file: Option<&Path>) -> Option<WorkerGuard> {
    let filter = if verbose {
        "blogsmith=debug"
    } else {
        "blogsmith=info"
    };
    let env_filter = || {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into())
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .without_time()
        .with_writer(std::io::stderr)
        .with_filter(env_filter());

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let file_appender = tracing_appender::rolling::never(
                path.parent()
                    .filter(|p| !p.as_os_str().is_empty())
                    .unwrap_or(Path::new(".")),
                path.file_name().unwrap_or_default(),
            );
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_filter(env_filter());
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .init();

    guard
}
