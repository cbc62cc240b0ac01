//! CLI commands for blogsmith.
//!
//! Each submodule implements a single CLI command with its argument
//! parsing and execution logic.

/// List stored blogs.
pub mod blogs;

/// Shell completion scripts.
pub mod completions;

/// Configuration viewing.
pub mod config;

/// Save a blog as wrapped plain text.
pub mod download;

/// Generate a batch of blogs from titles.
pub mod generate;

/// Replace a blog's content with a fresh generation.
pub mod regenerate;

/// Run the HTTP API.
pub mod serve;

/// Display a single blog.
pub mod show;
