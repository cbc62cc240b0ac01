//! Parsing of free-form title input into a generation batch.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Maximum number of titles processed in one batch.
pub const MAX_BLOGS_PER_BATCH: usize = 10;

/// Minimum number of titles a batch needs to be generated.
pub const MIN_BLOGS_PER_BATCH: usize = 1;

static TITLE_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,\n\r]+").expect("separator pattern is valid"));

/// Outcome of parsing user-supplied titles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedTitles {
    /// Cleaned titles in submission order.
    pub titles: Vec<String>,
    /// Human-readable notes about dropped or invalid input.
    pub warnings: Vec<String>,
}

/// Parses raw text into a batch of titles.
///
/// Titles are separated by commas or line breaks. Tokens are trimmed,
/// empty ones dropped, and duplicates removed case-insensitively (the
/// first spelling wins). At most [`MAX_BLOGS_PER_BATCH`] titles are kept.
/// This never fails; problems are reported through `warnings`.
pub fn parse_titles(raw: &str) -> ParsedTitles {
    let mut warnings = Vec::new();

    let tokens: Vec<&str> = TITLE_SEPARATOR
        .split(raw)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .collect();

    if tokens.is_empty() {
        warnings.push("No valid titles were provided.".to_string());
        return ParsedTitles {
            titles: Vec::new(),
            warnings,
        };
    }

    let mut titles = unique_preserve_order(&tokens);

    if titles.len() > MAX_BLOGS_PER_BATCH {
        warnings.push(format!(
            "Only the first {MAX_BLOGS_PER_BATCH} titles will be processed."
        ));
        titles.truncate(MAX_BLOGS_PER_BATCH);
    }

    if titles.len() < MIN_BLOGS_PER_BATCH {
        warnings.push("Enter at least one title to generate a blog.".to_string());
    }

    ParsedTitles { titles, warnings }
}

/// Removes case-insensitive duplicates, keeping the first occurrence.
fn unique_preserve_order(items: &[&str]) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .iter()
        .filter(|item| seen.insert(item.to_lowercase()))
        .map(|item| item.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_titles_dedupes_case_insensitively() {
        let parsed = parse_titles("A, A, a,, B\nC");
        assert_eq!(parsed.titles, vec!["A", "B", "C"]);
        assert!(parsed.warnings.is_empty());
    }

    #[test]
    fn test_parse_titles_keeps_first_casing() {
        let parsed = parse_titles("rust tips\nRust Tips\nRUST TIPS");
        assert_eq!(parsed.titles, vec!["rust tips"]);
    }

    #[test]
    fn test_parse_titles_only_separators() {
        let parsed = parse_titles(",, ,");
        assert!(parsed.titles.is_empty());
        assert!(parsed
            .warnings
            .contains(&"No valid titles were provided.".to_string()));
    }

    #[test]
    fn test_parse_titles_empty_string() {
        let parsed = parse_titles("");
        assert!(parsed.titles.is_empty());
        assert_eq!(parsed.warnings, vec!["No valid titles were provided."]);
    }

    #[test]
    fn test_parse_titles_truncates_to_batch_size() {
        let raw = (1..=15)
            .map(|i| format!("Title {i}"))
            .collect::<Vec<_>>()
            .join(", ");
        let parsed = parse_titles(&raw);

        assert_eq!(parsed.titles.len(), MAX_BLOGS_PER_BATCH);
        assert_eq!(parsed.titles[0], "Title 1");
        assert_eq!(parsed.titles[9], "Title 10");
        assert_eq!(parsed.warnings.len(), 1);
        assert!(parsed.warnings[0].contains("10"));
    }

    #[test]
    fn test_parse_titles_duplicates_do_not_count_toward_cap() {
        let raw = "One, one, Two, two, Three";
        let parsed = parse_titles(raw);
        assert_eq!(parsed.titles, vec!["One", "Two", "Three"]);
        assert!(parsed.warnings.is_empty());
    }

    #[test]
    fn test_parse_titles_handles_crlf_and_padding() {
        let parsed = parse_titles("  First title \r\n\r\n  Second title  \r\n");
        assert_eq!(parsed.titles, vec!["First title", "Second title"]);
    }

    #[test]
    fn test_parse_titles_never_exceeds_bounds() {
        let inputs = [
            "",
            "\n\n\n",
            "a",
            "a,b,c,d,e,f,g,h,i,j,k,l,m,n,o,p,q,r,s,t,u,v,w,x,y,z",
            "  \t  ",
            "émoji 🚀, ÉMOJI 🚀",
        ];
        for raw in inputs {
            let parsed = parse_titles(raw);
            assert!(parsed.titles.len() <= MAX_BLOGS_PER_BATCH, "{raw:?}");
            assert!(parsed.titles.iter().all(|t| !t.trim().is_empty()));
        }
    }
}
