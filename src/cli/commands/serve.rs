//! Serve command - run the HTTP API.
//!
//! Serves the generate, list, regenerate and download endpoints until
//! interrupted with Ctrl-C.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;

use crate::cli::{open_workflow_with, runtime};
use blogsmith::config::Config;
use blogsmith::web;

/// Arguments for the serve command.
#[derive(clap::Args)]
#[command(after_help = "EXAMPLES:\n    \
    blogsmith serve                          Listen on 127.0.0.1:8000\n    \
    blogsmith serve --bind 0.0.0.0:8080      Listen on all interfaces\n    \
    blogsmith --log-file serve.log serve     Also write logs to a file")]
pub struct Args {
    /// Address to listen on (overrides BLOGSMITH_BIND)
    #[arg(short, long, value_name = "ADDR")]
    pub bind: Option<SocketAddr>,
}

/// Executes the serve command.
pub fn run(args: Args) -> Result<()> {
    let mut config = Config::load()?;
    if let Some(bind) = args.bind {
        config.bind = Some(bind.to_string());
    }
    let addr = config.bind_addr()?;

    // Built outside the runtime; this handle also keeps the last reference
    // to the blocking HTTP client out of async context.
    let workflow = Arc::new(open_workflow_with(&config)?);

    if let Err(reason) = workflow.context().generator() {
        eprintln!("{} {}", "Warning:".yellow(), reason);
        eprintln!(
            "{}",
            "Blogs can be listed and downloaded, but generation is disabled.".dimmed()
        );
    }

    println!("{} http://{}", "Serving on".green(), addr);
    println!("{}", "Press Ctrl-C to stop.".dimmed());

    let rt = runtime()?;
    rt.block_on(web::serve(Arc::clone(&workflow), addr, shutdown_signal()))?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
}
