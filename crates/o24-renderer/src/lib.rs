//! Markdown preprocessing and rendering for O24DOC.
//!
//! Documents reach the renderer as raw markdown mixed with HTML. Before they can
//! be displayed they go through three pure, synchronous steps:
//!
//! - [`repair_inline_styles`]: rewrites JSX-style `style={{ ... }}` objects into
//!   plain `style="..."` attributes
//! - [`extract_toc`]: scans heading lines into a table of contents
//! - [`MarkdownRenderer`]: GFM markdown to HTML with raw HTML passthrough
//!
//! None of these perform I/O, so they are usable (and tested) without a store.
//!
//! # Example
//!
//! ```
//! use o24_renderer::{MarkdownRenderer, extract_toc, repair_inline_styles};
//!
//! let source = "# Intro\n\n<div style={{ marginTop: \"1rem\" }}>hi</div>\n";
//! let toc = extract_toc(source);
//! let result = MarkdownRenderer::new().render(&repair_inline_styles(source));
//!
//! assert_eq!(toc[0].anchor_id, "intro");
//! assert!(result.html.contains(r#"style="margin-top: 1rem""#));
//! ```

mod markdown;
mod style;
mod toc;
mod util;

pub use markdown::{MarkdownRenderer, RenderResult};
pub use style::repair_inline_styles;
pub use toc::{MAX_TOC_DEPTH, TocEntry, extract_toc, has_top_level_heading};
pub use util::{anchor_id, escape_html, slugify, titlecase_from_slug};
