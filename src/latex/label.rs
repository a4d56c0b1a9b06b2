//! Cross-reference label generation.
//!
//! Every chapter gets a label derived from its identifier, and every element
//! with an `id` gets `<chapter>-<id>`. Underscores become hyphens so the
//! labels survive LaTeX's `\label`/`\ref` machinery unchanged, and the result
//! is lite-escaped.

use percent_encoding::percent_decode_str;

use super::escape::escape_tex_lite;

/// Derive a chapter identifier from an href by stripping the file extension.
///
/// # Examples
///
/// ```
/// use folio::latex::chapter_id;
///
/// assert_eq!(chapter_id("ch1.html"), "ch1");
/// assert_eq!(chapter_id("part/ch2.html"), "part/ch2");
/// assert_eq!(chapter_id("README"), "README");
/// ```
pub fn chapter_id(href: &str) -> &str {
    let name_start = href.rfind('/').map_or(0, |i| i + 1);
    match href[name_start..].rfind('.') {
        Some(0) | None => href,
        Some(dot) => &href[..name_start + dot],
    }
}

/// Build the label for `(doc, id)`. An empty `id` names the document itself.
///
/// # Examples
///
/// ```
/// use folio::latex::label;
///
/// assert_eq!(label("ch1", ""), "ch1");
/// assert_eq!(label("ch1", "te_form"), "ch1-te-form");
/// ```
pub fn label(doc: &str, id: &str) -> String {
    let key = if id.is_empty() {
        doc.replace('_', "-")
    } else {
        format!("{doc}-{id}").replace('_', "-")
    };
    escape_tex_lite(&key)
}

/// Anchor/label pair for `(doc, id)`, wrapping `text`.
pub fn hyper_target(doc: &str, id: &str, text: &str) -> String {
    let target = label(doc, id);
    format!("\\hypertarget{{{target}}}{{\\label{{{target}}}{text}}}")
}

/// Resolve a non-external href to the label it points at.
///
/// `page.html#frag` points at `label(chapter_id("page.html"), "frag")`, a
/// bare `#frag` at the same label within `current_doc`, and `page.html` at
/// the chapter's own label. The document part is percent-decoded first.
pub fn internal_target(current_doc: &str, href: &str) -> String {
    let (path, fragment) = href.split_once('#').unwrap_or((href, ""));
    if path.is_empty() {
        return label(current_doc, fragment);
    }
    let path = percent_decode_str(path).decode_utf8_lossy();
    label(chapter_id(&path), fragment)
}

/// Whether an href leaves the book.
pub fn is_external(href: &str) -> bool {
    href.contains("http")
}
