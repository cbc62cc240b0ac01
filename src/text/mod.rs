//! Text helpers shared by the generation workflow and the output surfaces.
//!
//! Generated articles pass through [`normalize_whitespace`] before they are
//! stored. Listing views use [`summarize`] for previews, and plain-text
//! downloads are named by [`download_filename`] and wrapped by
//! [`chunk_lines`].

pub mod titles;

use std::str::{Lines, SplitWhitespace};
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

pub use titles::{parse_titles, ParsedTitles, MAX_BLOGS_PER_BATCH, MIN_BLOGS_PER_BATCH};

/// Default preview length (in characters) for listing cards.
pub const PREVIEW_LENGTH: usize = 150;

/// Default column width for plain-text downloads.
pub const DOWNLOAD_WIDTH: usize = 80;

/// Marker appended to truncated previews.
const ELLIPSIS: &str = "...";

static UNSAFE_FILENAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9]+").expect("filename pattern is valid"));

/// Normalizes whitespace in generated text.
///
/// Converts CRLF line endings to LF, collapses runs of 3+ consecutive
/// newlines down to 2 (one blank line) so paragraph breaks survive, and
/// trims leading/trailing whitespace.
pub fn normalize_whitespace(text: &str) -> String {
    let unified = text.replace("\r\n", "\n");
    let trimmed = unified.trim();
    let mut result = String::with_capacity(trimmed.len());
    let mut consecutive_newlines = 0u32;

    for ch in trimmed.chars() {
        if ch == '\n' {
            consecutive_newlines += 1;
            if consecutive_newlines <= 2 {
                result.push(ch);
            }
        } else {
            consecutive_newlines = 0;
            result.push(ch);
        }
    }

    result
}

/// Shortens `text` to a preview of at most `limit` characters.
///
/// Text that already fits is returned unchanged. Otherwise the first
/// `limit - 1` characters are kept, cut back to the last whitespace so no
/// word is split, and `...` is appended. Whole words are dropped until the
/// ellipsis fits. When no whole word fits before the ellipsis the text is
/// hard-cut, and a limit too small for the ellipsis keeps only the first
/// `limit` characters.
pub fn summarize(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    if limit <= ELLIPSIS.len() {
        return text.chars().take(limit).collect();
    }

    let keep = limit.saturating_sub(1);
    let head: String = text.chars().take(keep).collect();
    let at_boundary = text.chars().nth(keep).is_some_and(char::is_whitespace);

    let mut cut = if at_boundary {
        head.trim_end()
    } else {
        match head.rfind(char::is_whitespace) {
            Some(idx) => head[..idx].trim_end(),
            None => "",
        }
    };

    while !cut.is_empty() && cut.chars().count() + ELLIPSIS.len() > limit {
        cut = match cut.rfind(char::is_whitespace) {
            Some(idx) => cut[..idx].trim_end(),
            None => "",
        };
    }

    if cut.is_empty() {
        let hard: String = text
            .chars()
            .take(limit.saturating_sub(ELLIPSIS.len()))
            .collect();
        return format!("{hard}{ELLIPSIS}");
    }

    format!("{cut}{ELLIPSIS}")
}

/// Builds a filesystem-safe download filename for a blog title.
///
/// Every run of non-alphanumeric characters becomes a single hyphen,
/// leading/trailing hyphens are stripped, and `blog` is used when nothing
/// is left. A UTC timestamp (`YYYYMMDDHHMMSS`) and `suffix` are appended.
pub fn download_filename(title: &str, suffix: &str) -> String {
    download_filename_at(title, suffix, Utc::now())
}

/// Same as [`download_filename`] with an explicit timestamp.
pub fn download_filename_at(title: &str, suffix: &str, at: DateTime<Utc>) -> String {
    let replaced = UNSAFE_FILENAME_CHARS.replace_all(title, "-");
    let safe = replaced.trim_matches('-');
    let stem = if safe.is_empty() { "blog" } else { safe };
    format!("{stem}-{}{suffix}", at.format("%Y%m%d%H%M%S"))
}

/// Wraps `text` into lines of at most `width` characters.
///
/// Each source line is trimmed; blank lines yield an empty string. Words
/// are packed greedily, and a word longer than `width` is emitted on its
/// own line without being split. The iterator is lazy and borrows `text`.
pub fn chunk_lines(text: &str, width: usize) -> ChunkLines<'_> {
    ChunkLines {
        lines: text.lines(),
        words: None,
        current: String::new(),
        current_width: 0,
        width,
    }
}

/// Iterator returned by [`chunk_lines`].
#[derive(Debug)]
pub struct ChunkLines<'a> {
    lines: Lines<'a>,
    words: Option<SplitWhitespace<'a>>,
    current: String,
    current_width: usize,
    width: usize,
}

impl Iterator for ChunkLines<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            if let Some(words) = self.words.as_mut() {
                for word in words.by_ref() {
                    let word_width = word.chars().count();
                    if self.current.is_empty() {
                        self.current.push_str(word);
                        self.current_width = word_width;
                        continue;
                    }
                    if self.current_width + 1 + word_width > self.width {
                        let line = std::mem::replace(&mut self.current, word.to_string());
                        self.current_width = word_width;
                        return Some(line);
                    }
                    self.current.push(' ');
                    self.current.push_str(word);
                    self.current_width += 1 + word_width;
                }
                self.words = None;
                self.current_width = 0;
                return Some(std::mem::take(&mut self.current));
            }

            let line = self.lines.next()?.trim();
            if line.is_empty() {
                return Some(String::new());
            }
            self.words = Some(line.split_whitespace());
        }
    }
}
