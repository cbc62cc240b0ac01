//! Blog generation workflows.
//!
//! [`BlogWorkflow`] coordinates the title parser, the generation client and
//! the blog store:
//!
//! - **Batch generation**: parse titles, generate each one in order, and
//!   commit every blog in one transaction. The first failure aborts the
//!   batch and nothing is stored.
//! - **Regeneration**: replace one blog's content. A failed call leaves the
//!   stored blog untouched, so retrying is always safe.
//! - **Download**: render a blog as wrapped plain text.
//!
//! All failures come back as [`WorkflowError`] values; the HTTP and CLI
//! surfaces turn them into user-facing messages.

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::Config;
use crate::generate::{GenerateError, GenerationClient};
use crate::storage::{Blog, Database, NewBlog, SharedDatabase, Tone};
use crate::text::{self, parse_titles, DOWNLOAD_WIDTH, PREVIEW_LENGTH};

/// Number of blogs shown on the home view.
pub const HOME_RECENT_LIMIT: usize = 3;

/// Shown when the generator is unavailable and no reason was recorded.
const NOT_CONFIGURED_FALLBACK: &str = "OpenAI API is not configured.";

/// Process-wide dependencies, built once at startup.
pub struct AppContext {
    store: SharedDatabase,
    generator: Result<GenerationClient, String>,
}

impl AppContext {
    /// Wraps an opened store and the outcome of building the generator.
    pub fn new(store: Database, generator: Result<GenerationClient, GenerateError>) -> Self {
        let generator = generator.map_err(|e| {
            tracing::warn!("Blog generation unavailable: {e}");
            e.to_string()
        });
        Self {
            store: store.into_shared(),
            generator,
        }
    }

    /// Opens the configured database and builds the generation client.
    ///
    /// A missing API key is not an error here: generation is recorded as
    /// unavailable and every generation request reports it.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let store = Database::open_url(config.database_url())
            .with_context(|| format!("Failed to open database '{}'", config.database_url()))?;
        Ok(Self::new(store, GenerationClient::from_config(config)))
    }

    /// The generation client, or the reason it is unavailable.
    pub fn generator(&self) -> Result<&GenerationClient, &str> {
        self.generator.as_ref().map_err(String::as_str)
    }
}

/// A listing entry with a content preview.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlogCard {
    pub id: i64,
    pub title: String,
    pub preview: String,
    pub content: String,
    pub tone: &'static str,
    pub updated_at: DateTime<Utc>,
}

impl From<&Blog> for BlogCard {
    fn from(blog: &Blog) -> Self {
        Self {
            id: blog.id,
            title: blog.title.clone(),
            preview: text::summarize(&blog.content, PREVIEW_LENGTH),
            content: blog.content.clone(),
            tone: blog.tone_label(),
            updated_at: blog.updated_at,
        }
    }
}

/// Result of a committed batch.
#[derive(Debug, Clone)]
pub struct BatchReport {
    /// Stored blogs, in title order.
    pub blogs: Vec<Blog>,
    /// Parser warnings (e.g. truncation) that did not stop the batch.
    pub warnings: Vec<String>,
}

impl BatchReport {
    pub fn message(&self) -> String {
        format!("Generated {} blog(s) successfully.", self.blogs.len())
    }
}

/// A blog rendered for plain-text download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogDownload {
    pub filename: String,
    /// Newline-terminated lines: title, tone, blank line, wrapped content.
    pub lines: Vec<String>,
}

impl BlogDownload {
    pub fn body(&self) -> String {
        self.lines.concat()
    }

    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.filename)
    }
}

/// Errors surfaced by the workflows.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    /// The request had nothing usable to generate from.
    #[error("{}", .warnings.join(" "))]
    Validation { warnings: Vec<String> },

    /// The generation client could not be built at startup.
    #[error("{message}")]
    Configuration {
        message: String,
        warnings: Vec<String>,
    },

    /// The provider call for `title` failed.
    #[error("Failed to generate '{title}': {source}")]
    Generation {
        title: String,
        #[source]
        source: GenerateError,
        warnings: Vec<String>,
    },

    /// No blog has this id.
    #[error("Blog not found.")]
    NotFound(i64),

    /// The blog store failed.
    #[error("Storage error: {0:#}")]
    Storage(anyhow::Error),
}

impl WorkflowError {
    /// Messages to show the user: parser warnings followed by the error.
    pub fn user_warnings(&self) -> Vec<String> {
        match self {
            WorkflowError::Validation { warnings } if warnings.is_empty() => {
                vec!["Provide at least one title to generate.".to_string()]
            }
            WorkflowError::Validation { warnings } => warnings.clone(),
            WorkflowError::Configuration { warnings, .. }
            | WorkflowError::Generation { warnings, .. } => {
                let mut all = warnings.clone();
                all.push(self.to_string());
                all
            }
            _ => vec![self.to_string()],
        }
    }
}

/// Parses a tone form value, reporting unknown tones as validation errors.
pub fn parse_tone(input: Option<&str>) -> Result<Tone, WorkflowError> {
    Tone::from_input(input).map_err(|e| WorkflowError::Validation { warnings: vec![e] })
}

/// Orchestrates parsing, generation and persistence.
pub struct BlogWorkflow {
    ctx: AppContext,
}

impl BlogWorkflow {
    pub fn new(ctx: AppContext) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    fn generator(&self, warnings: &[String]) -> Result<&GenerationClient, WorkflowError> {
        self.ctx.generator().map_err(|reason| {
            let message = if reason.is_empty() {
                NOT_CONFIGURED_FALLBACK.to_string()
            } else {
                reason.to_string()
            };
            WorkflowError::Configuration {
                message,
                warnings: warnings.to_vec(),
            }
        })
    }

    /// Runs `f` with the store locked. The lock is released before returning.
    fn with_store<T>(
        &self,
        f: impl FnOnce(&mut Database) -> anyhow::Result<T>,
    ) -> Result<T, WorkflowError> {
        let mut db = self
            .ctx
            .store
            .lock()
            .map_err(|_| WorkflowError::Storage(anyhow::anyhow!("Database lock poisoned")))?;
        f(&mut db).map_err(WorkflowError::Storage)
    }

    /// Generates and stores one blog per title in `raw`.
    ///
    /// Titles are generated sequentially in submission order. Blogs are
    /// only written once every title has succeeded, in a single
    /// transaction, so readers never observe part of a batch.
    pub async fn generate_batch(
        &self,
        raw: &str,
        tone: Tone,
    ) -> Result<BatchReport, WorkflowError> {
        let parsed = parse_titles(raw);
        if parsed.titles.is_empty() {
            return Err(WorkflowError::Validation {
                warnings: parsed.warnings,
            });
        }

        let generator = self.generator(&parsed.warnings)?;
        let stored_tone = tone.into_stored();

        let mut drafts = Vec::with_capacity(parsed.titles.len());
        for title in &parsed.titles {
            match generator.generate(title, stored_tone).await {
                Ok(generated) => {
                    tracing::info!(title = %title, model = %generated.model, "Generated blog");
                    drafts.push(NewBlog {
                        title: title.clone(),
                        content: generated.content,
                        tone: stored_tone,
                    });
                }
                Err(source) => {
                    tracing::warn!(title = %title, "Generation failed, aborting batch: {source}");
                    return Err(WorkflowError::Generation {
                        title: title.clone(),
                        source,
                        warnings: parsed.warnings,
                    });
                }
            }
        }

        let blogs = self.with_store(|db| db.create_blogs(&drafts))?;
        tracing::info!(count = blogs.len(), "Committed blog batch");

        Ok(BatchReport {
            blogs,
            warnings: parsed.warnings,
        })
    }

    /// Regenerates the content of an existing blog.
    ///
    /// The stored blog is only updated after the provider call succeeds;
    /// on failure it is left exactly as it was.
    pub async fn regenerate(&self, id: i64) -> Result<Blog, WorkflowError> {
        let generator = self.generator(&[])?;
        let mut blog = self.get_blog(id)?;

        let generated = generator
            .generate(&blog.title, blog.tone)
            .await
            .map_err(|source| WorkflowError::Generation {
                title: blog.title.clone(),
                source,
                warnings: Vec::new(),
            })?;

        self.with_store(|db| db.update_content(&mut blog, &generated.content))?;
        tracing::info!(id, title = %blog.title, "Regenerated blog");
        Ok(blog)
    }

    pub fn get_blog(&self, id: i64) -> Result<Blog, WorkflowError> {
        self.with_store(|db| db.get_blog(id))?
            .ok_or(WorkflowError::NotFound(id))
    }

    /// Renders a blog as a plain-text download.
    pub fn download(&self, id: i64) -> Result<BlogDownload, WorkflowError> {
        let blog = self.get_blog(id)?;
        Ok(render_download(&blog, text::download_filename(&blog.title, ".txt")))
    }

    pub fn list_all(&self) -> Result<Vec<BlogCard>, WorkflowError> {
        let blogs = self.with_store(|db| db.list_all())?;
        Ok(blogs.iter().map(BlogCard::from).collect())
    }

    pub fn list_recent(&self, limit: usize) -> Result<Vec<BlogCard>, WorkflowError> {
        let blogs = self.with_store(|db| db.list_recent(limit))?;
        Ok(blogs.iter().map(BlogCard::from).collect())
    }

    pub fn count(&self) -> Result<i64, WorkflowError> {
        self.with_store(|db| db.blog_count())
    }
}

/// Lays out the download body for `blog`.
fn render_download(blog: &Blog, filename: String) -> BlogDownload {
    let mut lines = vec![
        format!("{}\n", blog.title),
        format!("Tone: {}\n", blog.tone_label()),
        "\n".to_string(),
    ];
    lines.extend(text::chunk_lines(&blog.content, DOWNLOAD_WIDTH).map(|line| line + "\n"));
    BlogDownload { filename, lines }
}
