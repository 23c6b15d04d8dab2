//! Static page source.
//!
//! The static half of the site is compiled once at startup from a directory
//! of markdown files and never changes for the life of the process. Any other
//! generator can plug in through [`StaticSource`].
//!
//! # Directory layout
//!
//! ```text
//! docs/
//! ├── index.md            -> /
//! ├── about.md            -> /about
//! └── docs/
//!     ├── meta.yaml       (title, description, order)
//!     ├── index.md        -> /docs
//!     └── overview.md     -> /docs/overview
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use o24_renderer::{
    MarkdownRenderer, TocEntry, extract_toc, repair_inline_styles, titlecase_from_slug,
};
use serde::{Deserialize, Serialize};

use crate::page_map::{PageNode, normalize_route, segments_route};

const META_FILENAME: &str = "meta.yaml";
const INDEX_NAME: &str = "index";

/// Compiled static page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticPage {
    pub route: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub toc: Vec<TocEntry>,
    /// Rendered HTML body.
    pub html: String,
}

/// Failure to materialize a static page.
#[derive(Debug, thiserror::Error)]
pub enum StaticPageError {
    #[error("No compiled page for route {0}")]
    NotFound(String),
}

/// Build-time page generator: a page tree plus an import function.
pub trait StaticSource: Send + Sync {
    /// Compiled page tree.
    fn page_map(&self) -> &[PageNode];

    /// Materialize the page at `segments` (empty for the root page).
    fn import_page(&self, segments: &[&str]) -> Result<Arc<StaticPage>, StaticPageError>;
}

/// Folder settings read from `meta.yaml`.
#[derive(Debug, Default, Deserialize)]
struct FolderMeta {
    title: Option<String>,
    description: Option<String>,
    /// Entry names listed first, in this order.
    #[serde(default)]
    order: Vec<String>,
}

/// Static pages compiled from a markdown directory.
#[derive(Debug)]
pub struct FsPageSource {
    source_dir: PathBuf,
    tree: Vec<PageNode>,
    pages: HashMap<String, Arc<StaticPage>>,
}

impl FsPageSource {
    /// Compile every markdown file under `source_dir`.
    ///
    /// Unreadable files and malformed `meta.yaml` are logged and skipped.
    /// A missing directory yields an empty tree.
    pub fn load(source_dir: impl Into<PathBuf>) -> Self {
        let source_dir = source_dir.into();
        let mut pages = HashMap::new();
        let tree = if source_dir.is_dir() {
            let meta = read_meta(&source_dir);
            let mut compiler = Compiler {
                renderer: MarkdownRenderer::new(),
                pages: &mut pages,
            };
            compiler.compile_directory(&source_dir, "", &meta, "Home")
        } else {
            tracing::warn!(path = %source_dir.display(), "Docs directory not found, static tree is empty");
            Vec::new()
        };
        tracing::info!(path = %source_dir.display(), pages = pages.len(), "Compiled static pages");

        Self {
            source_dir,
            tree,
            pages,
        }
    }

    /// Directory the pages were compiled from.
    #[must_use]
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Number of compiled pages.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

impl StaticSource for FsPageSource {
    fn page_map(&self) -> &[PageNode] {
        &self.tree
    }

    fn import_page(&self, segments: &[&str]) -> Result<Arc<StaticPage>, StaticPageError> {
        lookup(&self.pages, segments)
    }
}

/// In-memory static source with an explicit tree.
///
/// Routes present in the tree but never given a page fail to import, just like
/// a generator whose page map and compiled output disagree.
#[derive(Debug, Default)]
pub struct MemorySource {
    tree: Vec<PageNode>,
    pages: HashMap<String, Arc<StaticPage>>,
}

impl MemorySource {
    #[must_use]
    pub fn new(tree: Vec<PageNode>) -> Self {
        Self {
            tree,
            pages: HashMap::new(),
        }
    }

    /// Compile `markdown` as the page at `route`.
    #[must_use]
    pub fn with_page(mut self, route: &str, markdown: &str) -> Self {
        let fallback = titlecase_from_slug(normalize_route(route).rsplit('/').next().unwrap_or_default());
        let page = compile_page(&MarkdownRenderer::new(), route, markdown, None, &fallback, None);
        self.pages
            .insert(normalize_route(route).to_owned(), Arc::new(page));
        self
    }
}

impl StaticSource for MemorySource {
    fn page_map(&self) -> &[PageNode] {
        &self.tree
    }

    fn import_page(&self, segments: &[&str]) -> Result<Arc<StaticPage>, StaticPageError> {
        lookup(&self.pages, segments)
    }
}

fn lookup(
    pages: &HashMap<String, Arc<StaticPage>>,
    segments: &[&str],
) -> Result<Arc<StaticPage>, StaticPageError> {
    let route = segments_route(segments);
    pages
        .get(normalize_route(&route))
        .map(Arc::clone)
        .ok_or(StaticPageError::NotFound(route))
}

struct Compiler<'a> {
    renderer: MarkdownRenderer,
    pages: &'a mut HashMap<String, Arc<StaticPage>>,
}

impl Compiler<'_> {
    /// Compile one directory level into sorted nodes.
    fn compile_directory(
        &mut self,
        dir: &Path,
        route_prefix: &str,
        meta: &FolderMeta,
        folder_title: &str,
    ) -> Vec<PageNode> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(path = %dir.display(), error = %e, "Failed to read docs directory");
                return Vec::new();
            }
        };

        let mut nodes = Vec::new();
        for entry in entries.filter_map(Result::ok) {
            let file_name = entry.file_name().to_string_lossy().into_owned();
            if file_name.starts_with('.') || file_name.starts_with('_') {
                continue;
            }
            let path = entry.path();

            if entry.file_type().is_ok_and(|t| t.is_dir()) {
                if let Some(folder) = self.compile_folder(&path, &file_name, route_prefix) {
                    nodes.push(folder);
                }
            } else if path.extension().is_some_and(|ext| ext == "md") {
                let Some(stem) = path.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
                    continue;
                };
                if let Some(page) = self.compile_file(&path, &stem, route_prefix, meta, folder_title) {
                    nodes.push(page);
                }
            }
        }

        nodes.sort_by(|a, b| {
            sort_rank(meta, &a.name)
                .cmp(&sort_rank(meta, &b.name))
                .then_with(|| a.name.cmp(&b.name))
        });
        nodes
    }

    fn compile_folder(&mut self, dir: &Path, name: &str, route_prefix: &str) -> Option<PageNode> {
        let route = format!("{route_prefix}/{name}");
        let meta = read_meta(dir);
        let title = meta
            .title
            .clone()
            .unwrap_or_else(|| titlecase_from_slug(name));
        let children = self.compile_directory(dir, &route, &meta, &title);
        if children.is_empty() {
            tracing::debug!(path = %dir.display(), "Skipping folder without pages");
            return None;
        }

        let folder = PageNode::folder(name, route, title, children);
        Some(match meta.description {
            Some(description) => folder.with_description(description),
            None => folder,
        })
    }

    fn compile_file(
        &mut self,
        path: &Path,
        stem: &str,
        route_prefix: &str,
        meta: &FolderMeta,
        folder_title: &str,
    ) -> Option<PageNode> {
        let markdown = match fs::read_to_string(path) {
            Ok(markdown) => markdown,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read page, skipping");
                return None;
            }
        };

        let is_index = stem == INDEX_NAME;
        let route = match (is_index, route_prefix) {
            (true, "") => "/".to_owned(),
            (true, prefix) => prefix.to_owned(),
            (false, prefix) => format!("{prefix}/{stem}"),
        };
        let page = if is_index {
            compile_page(
                &self.renderer,
                &route,
                &markdown,
                meta.title.as_deref(),
                folder_title,
                meta.description.clone(),
            )
        } else {
            compile_page(&self.renderer, &route, &markdown, None, &titlecase_from_slug(stem), None)
        };

        let mut node = PageNode::page(stem, route.clone(), page.title.clone());
        node.description.clone_from(&page.description);
        self.pages
            .insert(normalize_route(&route).to_owned(), Arc::new(page));
        Some(node)
    }
}

/// Title precedence: `meta.yaml` title, first H1, fallback.
fn compile_page(
    renderer: &MarkdownRenderer,
    route: &str,
    markdown: &str,
    meta_title: Option<&str>,
    fallback_title: &str,
    description: Option<String>,
) -> StaticPage {
    let toc = extract_toc(markdown);
    let rendered = renderer.render(&repair_inline_styles(markdown));
    let title = meta_title
        .map(str::to_owned)
        .or(rendered.title)
        .unwrap_or_else(|| fallback_title.to_owned());

    StaticPage {
        route: route.to_owned(),
        title,
        description,
        toc,
        html: rendered.html,
    }
}

/// Listed entries first (by position), then `index`, then the rest.
fn sort_rank(meta: &FolderMeta, name: &str) -> usize {
    if let Some(position) = meta.order.iter().position(|n| n == name) {
        position
    } else if name == INDEX_NAME {
        meta.order.len()
    } else {
        meta.order.len() + 1
    }
}

fn read_meta(dir: &Path) -> FolderMeta {
    let path = dir.join(META_FILENAME);
    let Ok(content) = fs::read_to_string(&path) else {
        return FolderMeta::default();
    };
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return FolderMeta::default();
    }
    serde_yaml::from_str(trimmed).unwrap_or_else(|e| {
        tracing::warn!(path = %path.display(), error = %e, "Invalid meta.yaml, ignoring");
        FolderMeta::default()
    })
}
