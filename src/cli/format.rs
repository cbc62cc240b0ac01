//! Output formats for CLI commands.
//!
//! `OutputFormat` is accepted by every command that prints blogs. The
//! markdown renderers live here so `show`, `blogs` and `generate` agree on
//! headings and metadata lines.

use clap::ValueEnum;

use blogsmith::storage::Blog;
use blogsmith::workflow::BlogCard;

/// How a command prints blogs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Colored terminal output (default).
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
    /// Markdown, ready to paste into a document or CMS.
    Markdown,
}

const TIMESTAMP: &str = "%Y-%m-%d %H:%M UTC";

/// A full blog: title heading, metadata line, then the content.
pub fn markdown_blog(blog: &Blog) -> String {
    format!(
        "# {}\n\n*Tone: {} | Updated: {}*\n\n{}\n",
        blog.title,
        blog.tone_label(),
        blog.updated_at.format(TIMESTAMP),
        blog.content
    )
}

/// A listing: one section per card with its preview.
pub fn markdown_cards(cards: &[BlogCard]) -> String {
    let mut out = String::from("# Blogs\n");
    for card in cards {
        out.push_str(&format!(
            "\n## {}\n\n*ID {} | Tone: {} | Updated: {}*\n\n{}\n",
            card.title,
            card.id,
            card.tone,
            card.updated_at.format(TIMESTAMP),
            card.preview
        ));
    }
    out
}

/// A freshly generated batch, every blog in full.
pub fn markdown_batch(blogs: &[Blog]) -> String {
    blogs
        .iter()
        .map(markdown_blog)
        .collect::<Vec<_>>()
        .join("\n---\n\n")
}
