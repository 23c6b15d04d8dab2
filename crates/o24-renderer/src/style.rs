//! Inline style object repair.
//!
//! Authors paste HTML written for JSX, where inline styles are objects:
//! `style={{ marginTop: "1rem", color: "red" }}`. A markdown renderer passes
//! that through as garbage, so every such object is rewritten to a plain
//! attribute (`style="margin-top: 1rem; color: red"`) before rendering.

use std::borrow::Cow;

const OPEN: &str = "style={{";
const CLOSE: &str = "}}";

/// Reason a style object could not be rewritten.
#[derive(Debug, thiserror::Error)]
enum MalformedStyle {
    #[error("unterminated {0} quote")]
    UnterminatedQuote(char),
    #[error("unbalanced parentheses")]
    UnbalancedParens,
}

/// Rewrite every `style={{ ... }}` object in `content` into a `style="..."` attribute.
///
/// The object body ends at the first `}`, so values containing braces are not
/// supported. Commas inside parentheses or quotes do not split declarations.
/// One layer of quotes is stripped from each value; double quotes left inside
/// a value become single quotes so the attribute stays well-formed.
/// Objects that cannot be parsed are left untouched.
///
/// Returns the input unchanged (borrowed) when it contains no style objects.
///
/// # Examples
///
/// ```
/// use o24_renderer::repair_inline_styles;
///
/// let html = r#"<div style={{ border: "1px solid red", width: "100%" }}>"#;
/// assert_eq!(
///     repair_inline_styles(html),
///     r#"<div style="border: 1px solid red; width: 100%">"#
/// );
/// ```
pub fn repair_inline_styles(content: &str) -> Cow<'_, str> {
    if !content.contains(OPEN) {
        return Cow::Borrowed(content);
    }

    let mut out = String::with_capacity(content.len());
    let mut rest = content;

    while let Some(start) = rest.find(OPEN) {
        let after = &rest[start + OPEN.len()..];
        // No `}` left means no later occurrence can close either.
        let Some(body_len) = after.find('}') else {
            break;
        };

        if body_len == 0 || !after[body_len..].starts_with(CLOSE) {
            let skip = start + 1;
            out.push_str(&rest[..skip]);
            rest = &rest[skip..];
            continue;
        }

        let body = &after[..body_len];
        let end = start + OPEN.len() + body_len + CLOSE.len();
        out.push_str(&rest[..start]);
        match repair_style_body(body) {
            Ok(css) => {
                out.push_str("style=\"");
                out.push_str(&css);
                out.push('"');
            }
            Err(e) => {
                tracing::debug!(body, error = %e, "Leaving malformed style object as is");
                out.push_str(&rest[start..end]);
            }
        }
        rest = &rest[end..];
    }

    out.push_str(rest);
    Cow::Owned(out)
}

fn repair_style_body(body: &str) -> Result<String, MalformedStyle> {
    let declarations: Vec<String> = split_top_level(body)?
        .into_iter()
        .filter_map(repair_declaration)
        .collect();
    Ok(declarations.join("; "))
}

/// Split on commas that sit outside quotes and parentheses.
fn split_top_level(body: &str) -> Result<Vec<&str>, MalformedStyle> {
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in body.char_indices() {
        match quote {
            Some(q) if q == c => quote = None,
            Some(_) => {}
            None => match c {
                '"' | '\'' => quote = Some(c),
                '(' => depth += 1,
                ')' => depth = depth.checked_sub(1).ok_or(MalformedStyle::UnbalancedParens)?,
                ',' if depth == 0 => {
                    segments.push(&body[start..i]);
                    start = i + 1;
                }
                _ => {}
            },
        }
    }

    if let Some(q) = quote {
        return Err(MalformedStyle::UnterminatedQuote(q));
    }
    if depth != 0 {
        return Err(MalformedStyle::UnbalancedParens);
    }
    segments.push(&body[start..]);
    Ok(segments)
}

fn repair_declaration(segment: &str) -> Option<String> {
    let (key, value) = segment.split_once(':')?;
    let property = kebab_case(key.trim());
    // The result lands inside a double-quoted attribute.
    let value = strip_quotes(value.trim()).replace('"', "'");
    Some(format!("{property}: {value}"))
}

/// `backgroundColor` -> `background-color`, `zIndex2X` -> `z-index2-x`.
fn kebab_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    let mut prev: Option<char> = None;
    for c in key.chars() {
        if c.is_ascii_uppercase()
            && prev.is_some_and(|p| p.is_ascii_lowercase() || p.is_ascii_digit())
        {
            out.push('-');
        }
        out.push(c);
        prev = Some(c);
    }
    out.to_lowercase()
}

fn strip_quotes(value: &str) -> &str {
    for q in ['"', '\''] {
        if value.starts_with(q) && value.ends_with(q) {
            return value.get(1..value.len().saturating_sub(1)).unwrap_or_default();
        }
    }
    value
}
