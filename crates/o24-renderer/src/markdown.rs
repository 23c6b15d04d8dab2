//! Markdown to HTML rendering.

use std::ops::Range;

use pulldown_cmark::{CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd, html};

use crate::toc::parse_heading_line;
use crate::util::anchor_id;

/// Result of rendering markdown.
#[derive(Clone, Debug, Default)]
pub struct RenderResult {
    /// Rendered HTML content.
    pub html: String,
    /// Text of the first H1 heading, if any.
    pub title: Option<String>,
}

/// Markdown renderer with raw HTML passthrough.
///
/// Headings get `id` attributes computed with [`anchor_id`]. Every entry
/// produced by [`extract_toc`](crate::extract_toc) for the same markdown
/// names an existing heading id.
#[derive(Clone, Debug)]
pub struct MarkdownRenderer {
    gfm: bool,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownRenderer {
    /// Create a new renderer with GFM enabled by default.
    #[must_use]
    pub fn new() -> Self {
        Self { gfm: true }
    }

    /// Enable or disable GitHub Flavored Markdown features.
    ///
    /// GFM is enabled by default. When enabled, the parser supports:
    /// - Tables
    /// - Strikethrough (`~~text~~`)
    /// - Task lists (`- [ ] item`)
    #[must_use]
    pub fn with_gfm(mut self, enabled: bool) -> Self {
        self.gfm = enabled;
        self
    }

    /// Get parser options based on GFM configuration.
    #[must_use]
    pub fn parser_options(&self) -> Options {
        if self.gfm {
            Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_GFM
        } else {
            Options::empty()
        }
    }

    /// Render markdown to HTML.
    pub fn render(&self, markdown: &str) -> RenderResult {
        let mut events: Vec<(Event<'_>, Range<usize>)> =
            Parser::new_ext(markdown, self.parser_options())
                .into_offset_iter()
                .collect();

        // (index of the heading start event, plain heading text)
        let mut headings: Vec<(usize, String)> = Vec::new();
        let mut current: Option<(usize, String)> = None;
        for (index, (event, _)) in events.iter().enumerate() {
            match event {
                Event::Start(Tag::Heading { .. }) => current = Some((index, String::new())),
                Event::Text(text) | Event::Code(text) => {
                    if let Some((_, buf)) = current.as_mut() {
                        buf.push_str(text);
                    }
                }
                Event::End(TagEnd::Heading(_)) => {
                    if let Some(heading) = current.take() {
                        headings.push(heading);
                    }
                }
                _ => {}
            }
        }

        let mut title = None;
        for (index, text) in headings {
            let text = text.trim();
            let Some((Event::Start(Tag::Heading { level, id, .. }), range)) =
                events.get_mut(index)
            else {
                continue;
            };
            if title.is_none() && *level == HeadingLevel::H1 {
                title = Some(text.to_owned());
            }
            if id.is_none() {
                *id = Some(CowStr::from(heading_id(&markdown[range.clone()], text)));
            }
        }

        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut out, events.into_iter().map(|(event, _)| event));
        RenderResult { html: out, title }
    }
}

/// Id for a heading spanning `source`.
///
/// Headings that [`extract_toc`](crate::extract_toc) lists take their id from
/// the raw line, markup included, so table of contents links always resolve.
/// Other headings use their rendered text.
fn heading_id(source: &str, text: &str) -> String {
    source
        .lines()
        .next()
        .and_then(parse_heading_line)
        .map_or_else(|| anchor_id(text), |entry| entry.anchor_id)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_heading_ids_match_toc() {
        let result = MarkdownRenderer::new().render("# Hello World\n\n## Sub `code` part\n");

        assert!(result.html.contains(r#"<h1 id="hello-world">Hello World</h1>"#));
        assert!(result.html.contains(r#"<h2 id="sub-code-part">"#));
    }

    #[test]
    fn test_heading_ids_with_inline_markup_match_toc() {
        let markdown = "# T\n\n## **Bold** heading\n\n## See [API](https://x.io)\n\n### `cfg` flags\n";

        let result = MarkdownRenderer::new().render(markdown);

        let toc = crate::extract_toc(markdown);
        assert_eq!(toc.len(), 4);
        for entry in &toc {
            assert!(
                result.html.contains(&format!(r#"id="{}""#, entry.anchor_id)),
                "no heading id for {:?} in {}",
                entry.anchor_id,
                result.html
            );
        }
    }

    #[test]
    fn test_deep_heading_id_from_text() {
        let result = MarkdownRenderer::new().render("#### **Deep** one\n");

        assert!(result.html.contains(r#"<h4 id="deep-one">"#));
    }

    #[test]
    fn test_title_from_first_h1() {
        let result = MarkdownRenderer::new().render("## Intro\n\n# Main\n\n# Second\n");

        assert_eq!(result.title.as_deref(), Some("Main"));
    }

    #[test]
    fn test_no_title_without_h1() {
        let result = MarkdownRenderer::new().render("Just text\n");

        assert_eq!(result.title, None);
        assert_eq!(result.html, "<p>Just text</p>\n");
    }

    #[test]
    fn test_gfm_table() {
        let result = MarkdownRenderer::new().render("| A | B |\n|---|---|\n| 1 | 2 |\n");

        assert!(result.html.contains("<table>"));
        assert!(result.html.contains("<td>1</td>"));
    }

    #[test]
    fn test_gfm_strikethrough_and_tasklist() {
        let result = MarkdownRenderer::new().render("~~old~~\n\n- [x] done\n");

        assert!(result.html.contains("<del>old</del>"));
        assert!(result.html.contains(r#"type="checkbox""#));
    }

    #[test]
    fn test_gfm_disabled() {
        let result = MarkdownRenderer::new()
            .with_gfm(false)
            .render("| A | B |\n|---|---|\n| 1 | 2 |\n");

        assert!(!result.html.contains("<table>"));
    }

    #[test]
    fn test_raw_html_passthrough() {
        let result = MarkdownRenderer::new()
            .render("<div style=\"color: red\">\n\n**bold**\n\n</div>\n");

        assert!(result.html.contains(r#"<div style="color: red">"#));
        assert!(result.html.contains("<strong>bold</strong>"));
    }
}
