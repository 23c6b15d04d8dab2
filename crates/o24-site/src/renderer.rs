//! Rendering of dynamic documents.

use o24_renderer::{
    MarkdownRenderer, TocEntry, escape_html, extract_toc, has_top_level_heading,
    repair_inline_styles,
};
use o24_store::Document;
use serde::Serialize;

/// Displayable form of a dynamic document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedDoc {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Headings of the raw content.
    pub toc: Vec<TocEntry>,
    /// Content after style repair, still markdown.
    pub body: String,
    /// Final HTML: optional title heading, lead paragraph, rendered body.
    pub html: String,
    /// Whether `html` starts with a heading synthesized from the title.
    pub show_title: bool,
}

/// Render a document for display.
///
/// A heading with the document title is added only when the content has no
/// H1 of its own. A non-empty description becomes a lead paragraph.
pub fn render_document(document: &Document) -> RenderedDoc {
    let content = document.content.as_str();
    let body = repair_inline_styles(content).into_owned();
    let toc = extract_toc(content);
    let show_title = !has_top_level_heading(content);
    let description = Some(document.description.trim())
        .filter(|d| !d.is_empty())
        .map(str::to_owned);

    let mut html = String::with_capacity(body.len() * 3 / 2);
    if show_title {
        html.push_str("<h1>");
        html.push_str(&escape_html(&document.title));
        html.push_str("</h1>\n");
    }
    if let Some(description) = &description {
        html.push_str("<p class=\"lead\">");
        html.push_str(&escape_html(description));
        html.push_str("</p>\n");
    }
    html.push_str(&MarkdownRenderer::new().render(&body).html);

    RenderedDoc {
        title: document.title.clone(),
        description,
        toc,
        body,
        html,
        show_title,
    }
}
