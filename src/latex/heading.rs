//! Sectioning commands by nesting depth.

use crate::error::{Error, Result};

const SECTIONING: [&str; 6] = [
    "chapter",
    "section",
    "subsection",
    "subsubsection",
    "paragraph",
    "subparagraph",
];

/// Emit the sectioning command for `depth` (1 = `\chapter`).
///
/// `title` is inserted verbatim; callers escape it.
///
/// # Examples
///
/// ```
/// use folio::latex::make_heading;
///
/// assert_eq!(make_heading(1, "Intro").unwrap(), "\\chapter{Intro}\n");
/// assert_eq!(make_heading(3, "Verbs").unwrap(), "\\subsection{Verbs}\n");
/// assert!(make_heading(0, "x").is_err());
/// ```
pub fn make_heading(depth: usize, title: &str) -> Result<String> {
    let command = depth
        .checked_sub(1)
        .and_then(|i| SECTIONING.get(i))
        .ok_or(Error::HeadingDepth(depth))?;
    Ok(format!("\\{command}{{{title}}}\n"))
}
