//! HTTP request handlers.

pub(crate) mod docs;
pub(crate) mod login;
pub(crate) mod navigation;
pub(crate) mod pages;
pub(crate) mod views;

/// Split a URL path into non-empty segments.
///
/// `""`, `"/"` and `"docs//intro/"` yield `[]`, `[]` and `["docs", "intro"]`.
pub(crate) fn path_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}
