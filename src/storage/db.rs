//! SQLite storage layer for blogsmith

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};

use super::models::{Blog, NewBlog, Tone};
use crate::text::normalize_whitespace;

/// Database handle shared between concurrent requests.
///
/// The lock is only held for the duration of a single store operation and
/// never across an await point.
pub type SharedDatabase = Arc<Mutex<Database>>;

/// Default connection string when `DATABASE_URL` is unset.
pub const DEFAULT_DATABASE_URL: &str = "sqlite:///./blogs.db";

const BLOG_COLUMNS: &str = "id, title, content, tone, created_at, updated_at";

/// Where a connection string points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    /// Private in-memory database.
    Memory,
    /// SQLite database file.
    File(PathBuf),
}

impl std::fmt::Display for DatabaseLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatabaseLocation::Memory => write!(f, "in-memory"),
            DatabaseLocation::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Resolves a `DATABASE_URL` value to a SQLite location.
///
/// Accepts `sqlite://` style URLs (including the `sqlite+aiosqlite` driver
/// form), where `sqlite:///rel.db` is relative and `sqlite:////abs.db` is
/// absolute, as well as bare file paths and `:memory:`.
pub fn resolve_database_url(url: &str) -> Result<DatabaseLocation> {
    let url = url.trim();
    if url.is_empty() || url == ":memory:" {
        return Ok(DatabaseLocation::Memory);
    }

    let Some((scheme, rest)) = url.split_once("://") else {
        return Ok(DatabaseLocation::File(PathBuf::from(url)));
    };

    if scheme != "sqlite" && !scheme.starts_with("sqlite+") {
        bail!("Unsupported database URL scheme '{scheme}'. Only SQLite is supported.");
    }

    let path = rest.strip_prefix('/').unwrap_or(rest);
    if path.is_empty() || path == ":memory:" {
        Ok(DatabaseLocation::Memory)
    } else {
        Ok(DatabaseLocation::File(PathBuf::from(path)))
    }
}

/// Database connection wrapper
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create the database
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database at {}", path.display()))?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open the database a `DATABASE_URL` value points at
    pub fn open_url(url: &str) -> Result<Self> {
        match resolve_database_url(url)? {
            DatabaseLocation::Memory => Self::open_in_memory(),
            DatabaseLocation::File(path) => Self::open(&path),
        }
    }

    /// Wraps the database for sharing across tasks.
    pub fn into_shared(self) -> SharedDatabase {
        Arc::new(Mutex::new(self))
    }

    fn migrate(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS blogs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                content TEXT NOT NULL,
                tone TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_blogs_updated_at ON blogs(updated_at);
            "#,
        )?;
        Ok(())
    }

    // ==================== Writes ====================

    /// Insert a single blog
    pub fn create_blog(&mut self, draft: &NewBlog) -> Result<Blog> {
        let mut blogs = self.create_blogs(std::slice::from_ref(draft))?;
        blogs.pop().context("Insert returned no blog")
    }

    /// Insert a batch of blogs in one transaction.
    ///
    /// Either every blog is written or none is. Rows are inserted in slice
    /// order, so ids follow the order of `drafts`.
    pub fn create_blogs(&mut self, drafts: &[NewBlog]) -> Result<Vec<Blog>> {
        let now = Utc::now().trunc_subsecs(6);
        let stamp = format_timestamp(now);
        let tx = self.conn.transaction()?;
        let mut blogs = Vec::with_capacity(drafts.len());

        {
            let mut stmt = tx.prepare(
                "INSERT INTO blogs (title, content, tone, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?4)",
            )?;

            for draft in drafts {
                let title = draft.title.trim();
                if title.is_empty() {
                    bail!("Blog title must not be empty");
                }
                let content = normalize_whitespace(&draft.content);
                let tone = draft.tone.and_then(Tone::into_stored);

                stmt.execute(params![title, content, tone.map(|t| t.as_str()), stamp])?;

                blogs.push(Blog {
                    id: tx.last_insert_rowid(),
                    title: title.to_string(),
                    content,
                    tone,
                    created_at: now,
                    updated_at: now,
                });
            }
        }

        tx.commit().context("Failed to commit blogs")?;
        Ok(blogs)
    }

    /// Replace a blog's content and refresh its `updated_at`.
    ///
    /// `blog` is only modified once the row has been written.
    pub fn update_content(&self, blog: &mut Blog, content: &str) -> Result<()> {
        let content = normalize_whitespace(content);
        let updated_at = Utc::now().trunc_subsecs(6).max(blog.created_at);

        let changed = self.conn.execute(
            "UPDATE blogs SET content = ?1, updated_at = ?2 WHERE id = ?3",
            params![content, format_timestamp(updated_at), blog.id],
        )?;
        if changed == 0 {
            bail!("Blog {} no longer exists", blog.id);
        }

        blog.content = content;
        blog.updated_at = updated_at;
        Ok(())
    }

    // ==================== Reads ====================

    /// Get a blog by ID
    pub fn get_blog(&self, id: i64) -> Result<Option<Blog>> {
        self.conn
            .query_row(
                &format!("SELECT {BLOG_COLUMNS} FROM blogs WHERE id = ?1"),
                params![id],
                Self::row_to_blog,
            )
            .optional()
            .context("Failed to get blog")
    }

    /// List the most recently updated blogs
    pub fn list_recent(&self, limit: usize) -> Result<Vec<Blog>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {BLOG_COLUMNS} FROM blogs ORDER BY updated_at DESC, id ASC LIMIT ?1"
        ))?;
        let rows = stmt.query_map(params![limit], Self::row_to_blog)?;
        rows.collect::<Result<Vec<_>, _>>()
            .context("Failed to list recent blogs")
    }

    /// List every blog, most recently updated first
    pub fn list_all(&self) -> Result<Vec<Blog>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {BLOG_COLUMNS} FROM blogs ORDER BY updated_at DESC, id ASC"
        ))?;
        let rows = stmt.query_map([], Self::row_to_blog)?;
        rows.collect::<Result<Vec<_>, _>>()
            .context("Failed to list blogs")
    }

    /// Get total blog count
    pub fn blog_count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM blogs", [], |row| row.get(0))?;
        Ok(count)
    }

    fn row_to_blog(row: &rusqlite::Row) -> rusqlite::Result<Blog> {
        let tone = match row.get::<_, Option<String>>(3)? {
            Some(value) => Some(value.parse::<Tone>().map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(3, Type::Text, e.into())
            })?),
            None => None,
        };

        Ok(Blog {
            id: row.get(0)?,
            title: row.get(1)?,
            content: row.get(2)?,
            tone,
            created_at: parse_timestamp(4, &row.get::<_, String>(4)?)?,
            updated_at: parse_timestamp(5, &row.get::<_, String>(5)?)?,
        })
    }
}

/// Fixed-width RFC 3339 so timestamps sort correctly as text.
///
/// Callers truncate to microseconds first so values survive a round trip.
fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(idx: usize, value: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
