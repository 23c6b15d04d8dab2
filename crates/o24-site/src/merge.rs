//! Merging the static page tree with dynamic document routes.
//!
//! The merged space is rebuilt on every navigation request and never cached.
//! Static routes always win: a dynamic entry whose normalized route is already
//! taken is dropped before it reaches the tree.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::page_map::{PageNode, normalize_route, visit_nodes};

/// Source a merged route came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteOrigin {
    Static,
    Dynamic,
}

impl std::fmt::Display for RouteOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Static => f.write_str("static"),
            Self::Dynamic => f.write_str("dynamic"),
        }
    }
}

/// Navigation tree combining both sources, plus the origin of every route.
#[derive(Clone, Debug, Default)]
pub struct MergedRouteSpace {
    tree: Vec<PageNode>,
    origins: BTreeMap<String, RouteOrigin>,
}

impl MergedRouteSpace {
    /// Merge `dynamic` entries into the top-level folder named `mount_point`.
    ///
    /// Dynamic entries keep their relative order. Folders among them lose
    /// colliding children and are dropped if nothing remains. Without a mount
    /// folder the dynamic entries are discarded.
    pub fn merge(static_tree: &[PageNode], dynamic: Vec<PageNode>, mount_point: &str) -> Self {
        let mut origins = BTreeMap::new();
        visit_nodes(static_tree, &mut |node| {
            origins
                .entry(normalize_route(&node.route).to_owned())
                .or_insert(RouteOrigin::Static);
        });

        let mut taken: BTreeSet<String> = origins.keys().cloned().collect();
        let accepted = retain_new_routes(dynamic, &mut taken);

        let mut tree = static_tree.to_vec();
        match tree
            .iter_mut()
            .find(|node| node.is_folder() && node.name == mount_point)
        {
            Some(folder) => {
                visit_nodes(&accepted, &mut |node| {
                    origins
                        .entry(normalize_route(&node.route).to_owned())
                        .or_insert(RouteOrigin::Dynamic);
                });
                folder.children.extend(accepted);
            }
            None if !accepted.is_empty() => {
                tracing::debug!(
                    mount_point,
                    dropped = accepted.len(),
                    "No mount folder in static tree, dynamic entries dropped"
                );
            }
            None => {}
        }

        Self { tree, origins }
    }

    /// Origin of a route, if present.
    #[must_use]
    pub fn origin(&self, route: &str) -> Option<RouteOrigin> {
        self.origins.get(normalize_route(route)).copied()
    }

    #[must_use]
    pub fn contains(&self, route: &str) -> bool {
        self.origins.contains_key(normalize_route(route))
    }

    /// All normalized routes with their origin, sorted by route.
    pub fn routes(&self) -> impl Iterator<Item = (&str, RouteOrigin)> {
        self.origins.iter().map(|(route, origin)| (route.as_str(), *origin))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.origins.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.origins.is_empty()
    }

    /// Merged navigation tree.
    #[must_use]
    pub fn tree(&self) -> &[PageNode] {
        &self.tree
    }

    #[must_use]
    pub fn into_tree(self) -> Vec<PageNode> {
        self.tree
    }
}

fn retain_new_routes(nodes: Vec<PageNode>, taken: &mut BTreeSet<String>) -> Vec<PageNode> {
    nodes
        .into_iter()
        .filter_map(|mut node| {
            let route = normalize_route(&node.route).to_owned();
            if taken.contains(&route) {
                tracing::debug!(route = %route, "Dynamic route shadowed");
                return None;
            }
            if node.is_folder() {
                node.children = retain_new_routes(std::mem::take(&mut node.children), taken);
                if node.children.is_empty() {
                    return None;
                }
            }
            taken.insert(route);
            Some(node)
        })
        .collect()
}
