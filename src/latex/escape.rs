//! Pure LaTeX escaping utilities.
//!
//! Both escapers work in a single left-to-right pass, so text inserted for
//! one character (e.g. the braces of `\textbackslash{}`) is never escaped
//! again by a later rule.

/// Escape prose text for LaTeX.
///
/// Besides the LaTeX metacharacters this brackets the Japanese comma and
/// corner quotes with `{\jpb}`, a break hint macro defined by the document
/// preamble, and maps `< > |` to their text-mode commands.
///
/// # Examples
///
/// ```
/// use folio::latex::escape_tex;
///
/// assert_eq!(escape_tex("50% off"), "50\\% off");
/// assert_eq!(escape_tex("「です」"), "{\\jpb}「です」{\\jpb}");
/// assert_eq!(escape_tex("a < b"), "a {\\textless} b");
/// ```
pub fn escape_tex(text: &str) -> String {
    let mut result = String::with_capacity(text.len() + text.len() / 8);

    for c in text.chars() {
        match c {
            '\\' => result.push_str("\\textbackslash{}"),
            '、' => result.push_str("、{\\jpb}"),
            '「' => result.push_str("{\\jpb}「"),
            '」' => result.push_str("」{\\jpb}"),
            '~' => result.push_str("\\~{}"),
            '&' => result.push_str("\\&"),
            '>' => result.push_str("{\\textgreater}"),
            '<' => result.push_str("{\\textless}"),
            '|' => result.push_str("{\\textbar}"),
            _ => push_lite(&mut result, c),
        }
    }

    result
}

/// Escape only the characters that break LaTeX syntax outright.
///
/// Used for labels, link targets and section titles, where the typographic
/// substitutions of [`escape_tex`] would corrupt the argument.
///
/// # Examples
///
/// ```
/// use folio::latex::escape_tex_lite;
///
/// assert_eq!(escape_tex_lite("a_b#c"), "a\\_b\\#c");
/// assert_eq!(escape_tex_lite("a<b"), "a<b");
/// ```
pub fn escape_tex_lite(text: &str) -> String {
    let mut result = String::with_capacity(text.len() + text.len() / 8);
    for c in text.chars() {
        push_lite(&mut result, c);
    }
    result
}

fn push_lite(out: &mut String, c: char) {
    match c {
        '{' | '}' | '%' | '#' | '_' | '$' => {
            out.push('\\');
            out.push(c);
        }
        '^' => out.push_str("\\^{}"),
        _ => out.push(c),
    }
}

/// Whether `text` contains anything [`escape_tex`] would rewrite.
pub fn needs_escape(text: &str) -> bool {
    text.chars().any(|c| {
        matches!(
            c,
            '\\' | '{'
                | '}'
                | '%'
                | '#'
                | '_'
                | '$'
                | '^'
                | '~'
                | '&'
                | '<'
                | '>'
                | '|'
                | '、'
                | '「'
                | '」'
        )
    })
}
