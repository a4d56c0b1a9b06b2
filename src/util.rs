//! Page decoding and image sniffing.

use std::borrow::Cow;

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};

/// How far into a page the charset declaration is looked for.
const SNIFF_LEN: usize = 1024;

/// Decode a chapter page.
///
/// Valid UTF-8 wins. Otherwise the charset declared by the page (`<meta
/// charset>` or an XML declaration) is used, and Windows-1252 when there is
/// none.
pub fn decode_page(bytes: &[u8]) -> Cow<'_, str> {
    let (text, malformed) = UTF_8.decode_with_bom_removal(bytes);
    if !malformed {
        return text;
    }

    let encoding = sniff_charset(bytes)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(WINDOWS_1252);
    encoding.decode(bytes).0
}

/// Charset label declared near the start of a page.
///
/// Recognizes `charset=...` (meta tags, quoted or not) and `encoding="..."`
/// (XML declarations).
pub fn sniff_charset(bytes: &[u8]) -> Option<&str> {
    let head = &bytes[..bytes.len().min(SNIFF_LEN)];

    for key in [&b"charset="[..], &b"encoding="[..]] {
        let Some(at) = head
            .windows(key.len())
            .position(|w| w.eq_ignore_ascii_case(key))
        else {
            continue;
        };
        let value = &head[at + key.len()..];
        let value = match value.first() {
            Some(&(quote @ (b'"' | b'\''))) => {
                let rest = &value[1..];
                &rest[..rest.iter().position(|&b| b == quote)?]
            }
            _ => {
                let end = value
                    .iter()
                    .position(|&b| matches!(b, b'"' | b'\'' | b';' | b'>' | b'/') || b.is_ascii_whitespace())
                    .unwrap_or(value.len());
                &value[..end]
            }
        };
        if let Ok(label) = std::str::from_utf8(value)
            && !label.is_empty()
        {
            return Some(label);
        }
    }
    None
}

/// Whether an image needs GIF → PNG conversion: a `.gif` name, or GIF magic
/// bytes behind a name without an image extension.
pub fn is_gif(name: &str, data: &[u8]) -> bool {
    let extension = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.contains('/'));

    match extension.as_deref() {
        Some("gif") => true,
        Some("png" | "jpg" | "jpeg" | "svg" | "pdf" | "eps") => false,
        _ => data.starts_with(b"GIF8"),
    }
}
