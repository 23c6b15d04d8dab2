//! HTML templates.
//!
//! Every page shares one layout: header, navigation sidebar, content and
//! an optional table of contents. Templates never run scripts.

use maud::{DOCTYPE, Markup, PreEscaped, html};
use o24_renderer::TocEntry;
use o24_site::PageNode;

use crate::middleware::auth::LOGIN_PATH;
use crate::state::AppState;

const CSS: &str = r"
*{box-sizing:border-box}
body{margin:0;font:16px/1.6 system-ui,sans-serif;color:#1f2328;background:#fff}
a{color:#0b5cad;text-decoration:none}
a:hover{text-decoration:underline}
.site-header{display:flex;align-items:baseline;gap:1rem;padding:.75rem 1.5rem;border-bottom:1px solid #d0d7de}
.brand{font-weight:700;font-size:1.1rem;color:inherit}
.tagline{color:#59636e;font-size:.9rem}
.layout{display:grid;grid-template-columns:16rem minmax(0,1fr) 14rem;gap:2rem;padding:1.5rem}
.sidebar ul,.toc ul{list-style:none;margin:0;padding-left:.9rem}
.sidebar>ul,.toc>ul{padding-left:0}
.sidebar li,.toc li{margin:.2rem 0}
.sidebar a.active{font-weight:600;color:#1f2328}
.folder-title{font-weight:600;color:#59636e}
.content{min-width:0}
.content pre{overflow:auto;padding:1rem;background:#f6f8fa;border-radius:6px}
.content table{border-collapse:collapse}
.content td,.content th{border:1px solid #d0d7de;padding:.3rem .6rem}
.lead{font-size:1.15rem;color:#59636e}
.toc{font-size:.9rem}
.toc-title{font-weight:600;margin-bottom:.4rem}
.toc-depth-2{padding-left:.8rem}
.toc-depth-3{padding-left:1.6rem}
.not-found{padding:3rem 0}
.login{max-width:22rem;margin:4rem auto}
.login input{width:100%;padding:.5rem;margin:.5rem 0}
.error{color:#cf222e}
@media (max-width:60rem){.layout{grid-template-columns:1fr}.toc{display:none}}
";

/// Full page with navigation, content and table of contents.
pub(crate) fn page(
    state: &AppState,
    nav: &[PageNode],
    current: &str,
    title: &str,
    content_html: &str,
    toc: &[TocEntry],
) -> Markup {
    layout(
        state,
        Some(title),
        html! {
            div class="layout" {
                (sidebar(nav, current))
                main class="content" {
                    (PreEscaped(content_html))
                }
                (table_of_contents(toc))
            }
        },
    )
}

/// Not-found view. Navigation stays usable.
pub(crate) fn not_found(state: &AppState, nav: &[PageNode], current: &str) -> Markup {
    layout(
        state,
        Some("Page not found"),
        html! {
            div class="layout" {
                (sidebar(nav, current))
                main class="content not-found" {
                    h1 { "Page not found" }
                    p { "Nothing is published at " code { (current) } "." }
                    p { a href="/" { "Back to the home page" } }
                }
            }
        },
    )
}

/// Password form, with an error message after a failed attempt.
pub(crate) fn login(state: &AppState, error: Option<&str>) -> Markup {
    layout(
        state,
        Some("Sign in"),
        html! {
            main class="login" {
                h1 { "Sign in" }
                p { "This site is password protected." }
                @if let Some(error) = error {
                    p class="error" { (error) }
                }
                form method="post" action=(LOGIN_PATH) {
                    label for="password" { "Password" }
                    input id="password" type="password" name="password" autocomplete="current-password" required autofocus;
                    button type="submit" { "Continue" }
                }
            }
        },
    )
}

fn layout(state: &AppState, title: Option<&str>, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                @if !state.site_description.is_empty() {
                    meta name="description" content=(state.site_description);
                }
                title {
                    @if let Some(title) = title {
                        (title) " | "
                    }
                    (state.site_title)
                }
                style { (PreEscaped(CSS)) }
            }
            body {
                header class="site-header" {
                    a class="brand" href="/" { (state.site_title) }
                    @if !state.site_description.is_empty() {
                        span class="tagline" { (state.site_description) }
                    }
                }
                (body)
            }
        }
    }
}

fn sidebar(nav: &[PageNode], current: &str) -> Markup {
    html! {
        nav class="sidebar" aria-label="Documentation" {
            (nav_list(nav, current))
        }
    }
}

fn nav_list(nodes: &[PageNode], current: &str) -> Markup {
    html! {
        ul {
            @for node in nodes {
                li {
                    @if node.is_folder() {
                        span class="folder-title" { (node.title) }
                        (nav_list(&node.children, current))
                    } @else {
                        a.active[node.route == current] href=(node.route) title=[node.description.as_deref()] {
                            (node.title)
                        }
                    }
                }
            }
        }
    }
}

fn table_of_contents(toc: &[TocEntry]) -> Markup {
    html! {
        @if !toc.is_empty() {
            aside class="toc" aria-label="On this page" {
                div class="toc-title" { "On this page" }
                ul {
                    @for entry in toc {
                        li class={ "toc-depth-" (entry.depth) } {
                            a href={ "#" (entry.anchor_id) } { (entry.text) }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use o24_site::{MemorySource, Site, SiteConfig};
    use o24_store::MockStore;
    use pretty_assertions::assert_eq;

    use super::*;

    fn state() -> AppState {
        AppState {
            site: Site::new(
                Arc::new(MemorySource::default()),
                Arc::new(MockStore::new()),
                SiteConfig::default(),
            ),
            gate: None,
            site_title: "Handbook".to_owned(),
            site_description: String::new(),
            verbose: false,
            version: "test".to_owned(),
        }
    }

    fn nav() -> Vec<PageNode> {
        vec![
            PageNode::page("index", "/", "Home"),
            PageNode::folder(
                "docs",
                "/docs",
                "Docs",
                vec![PageNode::page("intro", "/docs/intro", "Intro & Setup")],
            ),
        ]
    }

    #[test]
    fn test_page_marks_current_route() {
        let html = page(&state(), &nav(), "/docs/intro", "Intro", "<p>Body</p>", &[]).into_string();

        assert_eq!(html.matches(r#"class="active""#).count(), 1);
        assert!(html.contains("Intro &amp; Setup</a>"));
        assert!(html.contains("<p>Body</p>"));
        assert!(html.contains("<title>Intro | Handbook</title>"));
        assert!(!html.contains("On this page"));
    }

    #[test]
    fn test_page_renders_toc() {
        let toc = vec![TocEntry {
            text: "Sub".to_owned(),
            anchor_id: "sub".to_owned(),
            depth: 2,
        }];

        let html = page(&state(), &nav(), "/", "Home", "", &toc).into_string();

        assert!(html.contains(r##"<li class="toc-depth-2"><a href="#sub">Sub</a></li>"##));
    }

    #[test]
    fn test_not_found_escapes_route() {
        let html = not_found(&state(), &nav(), "/<script>").into_string();

        assert!(html.contains("Page not found"));
        assert!(html.contains("/&lt;script&gt;"));
    }

    #[test]
    fn test_login_shows_error() {
        let html = login(&state(), Some("Incorrect password")).into_string();

        assert!(html.contains(r#"<p class="error">Incorrect password</p>"#));
        assert!(html.contains(r#"action="/login""#));
    }
}
