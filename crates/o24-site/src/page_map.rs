//! Page tree nodes and route helpers.

use o24_store::DocumentSummary;
use serde::Serialize;

/// Kind of page tree node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
    Page,
    Folder,
}

/// Node in a page tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageNode {
    /// Last route segment (`index` for folder index pages).
    pub name: String,
    /// Absolute route, e.g. `/docs/srs/overview`.
    pub route: String,
    /// Display title.
    pub title: String,
    #[serde(rename = "type")]
    pub kind: PageKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Child nodes, only ever non-empty for folders.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<PageNode>,
}

impl PageNode {
    /// Create a page node.
    #[must_use]
    pub fn page(
        name: impl Into<String>,
        route: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            route: route.into(),
            title: title.into(),
            kind: PageKind::Page,
            description: None,
            children: Vec::new(),
        }
    }

    /// Create a folder node.
    #[must_use]
    pub fn folder(
        name: impl Into<String>,
        route: impl Into<String>,
        title: impl Into<String>,
        children: Vec<PageNode>,
    ) -> Self {
        Self {
            name: name.into(),
            route: route.into(),
            title: title.into(),
            kind: PageKind::Folder,
            description: None,
            children,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn is_folder(&self) -> bool {
        self.kind == PageKind::Folder
    }
}

/// Canonical form of a route: trailing slashes removed.
///
/// The root route `/` normalizes to the empty string.
///
/// # Examples
///
/// ```
/// use o24_site::normalize_route;
///
/// assert_eq!(normalize_route("/docs/intro/"), "/docs/intro");
/// assert_eq!(normalize_route("/docs/intro"), "/docs/intro");
/// assert_eq!(normalize_route("/"), "");
/// ```
pub fn normalize_route(route: &str) -> &str {
    route.trim_end_matches('/')
}

/// Route for a sequence of path segments: `["docs", "intro"]` -> `/docs/intro`.
pub fn segments_route(segments: &[&str]) -> String {
    format!("/{}", segments.join("/"))
}

/// Depth-first search for a node whose normalized route equals `route`'s.
pub fn find_route<'a>(nodes: &'a [PageNode], route: &str) -> Option<&'a PageNode> {
    let target = normalize_route(route);
    for node in nodes {
        if normalize_route(&node.route) == target {
            return Some(node);
        }
        if let Some(found) = find_route(&node.children, route) {
            return Some(found);
        }
    }
    None
}

/// Visit every node depth-first, parents before children.
pub fn visit_nodes<'a>(nodes: &'a [PageNode], f: &mut impl FnMut(&'a PageNode)) {
    for node in nodes {
        f(node);
        visit_nodes(&node.children, f);
    }
}

/// Folder that gathers dynamic documents of one category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavGroup {
    /// Document category collected into this folder.
    pub category: String,
    /// Folder route segment.
    pub name: String,
    /// Folder title.
    pub title: String,
}

/// Build dynamic page nodes from store summaries (already in display order).
///
/// Documents whose category has a [`NavGroup`] become children of that
/// group's folder at `<mount>/<group>/<slug>`; all others become pages at
/// `<mount>/<slug>`. Group folders come first, in configuration order, and
/// are omitted when empty.
pub fn dynamic_page_map(
    summaries: &[DocumentSummary],
    mount_route: &str,
    groups: &[NavGroup],
) -> Vec<PageNode> {
    let mount = normalize_route(mount_route);
    let mut nodes = Vec::new();

    for group in groups {
        let folder_route = format!("{mount}/{}", group.name);
        let children: Vec<PageNode> = summaries
            .iter()
            .filter(|doc| doc.category == group.category)
            .map(|doc| document_node(doc, &folder_route))
            .collect();
        if !children.is_empty() {
            nodes.push(PageNode::folder(
                group.name.clone(),
                folder_route,
                group.title.clone(),
                children,
            ));
        }
    }

    nodes.extend(
        summaries
            .iter()
            .filter(|doc| !groups.iter().any(|g| g.category == doc.category))
            .map(|doc| document_node(doc, mount)),
    );
    nodes
}

fn document_node(doc: &DocumentSummary, parent_route: &str) -> PageNode {
    let node = PageNode::page(
        doc.slug.clone(),
        format!("{parent_route}/{}", doc.slug),
        doc.title.clone(),
    );
    if doc.description.is_empty() {
        node
    } else {
        node.with_description(doc.description.clone())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn summary(slug: &str, category: &str) -> DocumentSummary {
        let now = std::time::SystemTime::UNIX_EPOCH.into();
        DocumentSummary {
            id: slug.to_owned(),
            title: slug.to_uppercase(),
            slug: slug.to_owned(),
            description: String::new(),
            category: category.to_owned(),
            display_order: 0,
            created_at: now,
            updated_at: now,
        }
    }

    fn srs_group() -> NavGroup {
        NavGroup {
            category: "srs".to_owned(),
            name: "srs".to_owned(),
            title: "Requirements".to_owned(),
        }
    }

    #[test]
    fn test_normalize_route_idempotent() {
        for route in ["", "/", "/docs", "/docs/", "/docs//", "a//b/"] {
            let once = normalize_route(route);
            assert_eq!(normalize_route(once), once);
        }
    }

    #[test]
    fn test_segments_route() {
        assert_eq!(segments_route(&["docs", "intro"]), "/docs/intro");
        assert_eq!(segments_route(&[]), "/");
    }

    #[test]
    fn test_find_route_nested() {
        let tree = vec![PageNode::folder(
            "docs",
            "/docs",
            "Docs",
            vec![PageNode::page("intro", "/docs/intro/", "Intro")],
        )];

        assert_eq!(find_route(&tree, "/docs/intro").unwrap().title, "Intro");
        assert_eq!(find_route(&tree, "/docs/").unwrap().title, "Docs");
        assert!(find_route(&tree, "/docs/other").is_none());
    }

    #[test]
    fn test_visit_nodes_order() {
        let tree = vec![
            PageNode::folder("a", "/a", "A", vec![PageNode::page("b", "/a/b", "B")]),
            PageNode::page("c", "/c", "C"),
        ];
        let mut routes = Vec::new();

        visit_nodes(&tree, &mut |node| routes.push(node.route.as_str()));

        assert_eq!(routes, vec!["/a", "/a/b", "/c"]);
    }

    #[test]
    fn test_dynamic_page_map_flat() {
        let nodes = dynamic_page_map(
            &[summary("intro", "general"), summary("setup", "general")],
            "/docs",
            &[],
        );

        let routes: Vec<&str> = nodes.iter().map(|n| n.route.as_str()).collect();
        assert_eq!(routes, vec!["/docs/intro", "/docs/setup"]);
        assert_eq!(nodes[0].title, "INTRO");
        assert_eq!(nodes[0].kind, PageKind::Page);
    }

    #[test]
    fn test_dynamic_page_map_groups_first() {
        let nodes = dynamic_page_map(
            &[
                summary("intro", "general"),
                summary("login", "srs"),
                summary("billing", "srs"),
            ],
            "/docs/",
            &[srs_group()],
        );

        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].route, "/docs/srs");
        assert_eq!(nodes[0].title, "Requirements");
        assert!(nodes[0].is_folder());
        let children: Vec<&str> = nodes[0].children.iter().map(|n| n.route.as_str()).collect();
        assert_eq!(children, vec!["/docs/srs/login", "/docs/srs/billing"]);
        assert_eq!(nodes[1].route, "/docs/intro");
    }

    #[test]
    fn test_dynamic_page_map_skips_empty_group() {
        let nodes = dynamic_page_map(&[summary("intro", "general")], "/docs", &[srs_group()]);

        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].route, "/docs/intro");
    }

    #[test]
    fn test_dynamic_page_map_description() {
        let mut doc = summary("intro", "general");
        doc.description = "Start here".to_owned();

        let nodes = dynamic_page_map(&[doc], "/docs", &[]);

        assert_eq!(nodes[0].description.as_deref(), Some("Start here"));
    }

    #[test]
    fn test_page_node_serializes_type() {
        let value = serde_json::to_value(PageNode::page("intro", "/docs/intro", "Intro")).unwrap();

        assert_eq!(value["type"], "page");
        assert!(value.get("children").is_none());
        assert!(value.get("description").is_none());
    }
}
