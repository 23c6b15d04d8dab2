//! Table of contents extraction from raw markdown.

use crate::util::anchor_id;

/// Deepest heading level listed in a table of contents.
pub const MAX_TOC_DEPTH: u8 = 3;

/// Table of contents entry.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct TocEntry {
    /// Heading text without the `#` markers.
    pub text: String,
    /// Anchor ID the rendered heading carries.
    pub anchor_id: String,
    /// Heading level (1-3).
    pub depth: u8,
}

/// Extract heading lines (`#` to `###` followed by one space) in document order.
///
/// Works on raw text line by line, so it runs before style repair and does
/// not need a markdown parse.
///
/// # Examples
///
/// ```
/// use o24_renderer::extract_toc;
///
/// let toc = extract_toc("# Title\n\nSome text\n## Sub\n");
/// assert_eq!(toc.len(), 2);
/// assert_eq!(toc[1].anchor_id, "sub");
/// assert_eq!(toc[1].depth, 2);
/// ```
pub fn extract_toc(content: &str) -> Vec<TocEntry> {
    content.lines().filter_map(parse_heading_line).collect()
}

pub(crate) fn parse_heading_line(line: &str) -> Option<TocEntry> {
    let hashes = line.bytes().take_while(|&b| b == b'#').count();
    let depth = u8::try_from(hashes).ok()?;
    if depth == 0 || depth > MAX_TOC_DEPTH {
        return None;
    }
    let text = line[hashes..].strip_prefix(' ')?.trim();
    Some(TocEntry {
        text: text.to_owned(),
        anchor_id: anchor_id(text),
        depth,
    })
}

/// Check whether content already carries its own H1.
///
/// True when any line of the trimmed content starts with `#` followed by
/// whitespace (or nothing).
pub fn has_top_level_heading(content: &str) -> bool {
    content.trim().split(['\n', '\r']).any(|line| {
        let mut chars = line.chars();
        chars.next() == Some('#') && chars.next().is_none_or(char::is_whitespace)
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn entry(text: &str, anchor_id: &str, depth: u8) -> TocEntry {
        TocEntry {
            text: text.to_owned(),
            anchor_id: anchor_id.to_owned(),
            depth,
        }
    }

    #[test]
    fn test_extract_toc_basic() {
        let toc = extract_toc("# Title\n\nSome text\n## Sub\n");

        assert_eq!(toc, vec![entry("Title", "title", 1), entry("Sub", "sub", 2)]);
    }

    #[test]
    fn test_extract_toc_three_levels() {
        let toc = extract_toc("# A\n## B\n### C\n#### D\n##### E\n");

        assert_eq!(
            toc,
            vec![entry("A", "a", 1), entry("B", "b", 2), entry("C", "c", 3)]
        );
    }

    #[test]
    fn test_extract_toc_requires_space() {
        let toc = extract_toc("#NoSpace\n#\n text # not heading\n  ## indented\n");

        assert!(toc.is_empty());
    }

    #[test]
    fn test_extract_toc_trims_text() {
        let toc = extract_toc("##   Spaced out   \n");

        assert_eq!(toc, vec![entry("Spaced out", "spaced-out", 2)]);
    }

    #[test]
    fn test_extract_toc_crlf() {
        let toc = extract_toc("# One\r\n## Two\r\n");

        assert_eq!(toc, vec![entry("One", "one", 1), entry("Two", "two", 2)]);
    }

    #[test]
    fn test_extract_toc_punctuation_anchor() {
        let toc = extract_toc("## What's New? (2024)\n");

        assert_eq!(toc[0].anchor_id, "what-s-new-2024-");
    }

    #[test]
    fn test_extract_toc_empty_heading_text() {
        let toc = extract_toc("# \n");

        assert_eq!(toc, vec![entry("", "", 1)]);
    }

    #[test]
    fn test_has_top_level_heading_at_start() {
        assert!(has_top_level_heading("# My Doc\n\nBody"));
        assert!(has_top_level_heading("\n\n  # My Doc\n"));
    }

    #[test]
    fn test_has_top_level_heading_later_line() {
        assert!(has_top_level_heading("Intro text\n\n# Heading\n"));
    }

    #[test]
    fn test_has_top_level_heading_ignores_subheadings() {
        assert!(!has_top_level_heading("## Only sub\n### Deeper\n"));
        assert!(!has_top_level_heading("#hashtag\n"));
        assert!(!has_top_level_heading(""));
    }
}
