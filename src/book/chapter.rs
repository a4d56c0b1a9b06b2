//! Conversion of a single chapter file.

use std::fs;

use log::info;
use percent_encoding::percent_decode_str;

use crate::config::Config;
use crate::dom::parse_html_bytes;
use crate::error::{Error, Result};
use crate::latex::{
    Diagnostic, TranslationContext, Translator, chapter_id, escape_tex_lite, hyper_target,
    make_heading,
};

use super::assets::FsAssets;
use super::create_parent_dir;
use super::toc::{TocEntry, indent};

/// Result of converting one chapter.
#[derive(Debug, Clone)]
pub struct ChapterOutput {
    /// Chapter identifier, also the output file stem.
    pub id: String,
    /// Line to append to the master document.
    pub input_line: String,
    pub diagnostics: Vec<Diagnostic>,
}

/// Chapter identifier for a TOC href: fragment dropped, percent-decoded,
/// extension stripped.
pub fn entry_id(href: &str) -> String {
    let path = href.split('#').next().unwrap_or_default();
    chapter_id(&percent_decode_str(path).decode_utf8_lossy()).to_string()
}

/// Render the LaTeX for a parsed chapter without touching the output tree.
///
/// The chapter starts at its first `h1`; everything before it (navigation,
/// page chrome) is ignored.
pub fn render_chapter(
    config: &Config,
    entry: &TocEntry,
    id: &str,
    html: &[u8],
) -> Result<(String, Vec<Diagnostic>)> {
    let dom = parse_html_bytes(html);
    let h1 = dom
        .find_by_tag("h1")
        .ok_or_else(|| Error::MissingElement(format!("<h1> in {}", entry.href)))?;

    let mut latex = make_heading(entry.depth, &escape_tex_lite(&entry.title))?;
    latex.push_str(&hyper_target(id, "", ""));

    let mut assets = FsAssets::new(config);
    let mut translator = Translator::new(&dom, id, &config.markers, &mut assets);
    latex.push_str(&translator.translate(
        Some(h1),
        entry.depth + 1,
        TranslationContext::default(),
    )?);

    Ok((latex, translator.into_diagnostics()))
}

/// Convert the chapter behind `entry` and write `<chapter_dir><id>.tex`.
pub fn convert_chapter(config: &Config, entry: &TocEntry) -> Result<ChapterOutput> {
    info!("{}- {} {}", indent(entry.depth), entry.title, entry.href);

    let id = entry_id(&entry.href);
    let source = config.source_path(&entry.href);
    let html = fs::read(&source).map_err(|e| Error::io(&source, e))?;
    let (latex, diagnostics) = render_chapter(config, entry, &id, &html)?;

    let relative = config.chapter_relative(&id);
    let dest = config.output_path(&format!("{relative}.tex"));
    create_parent_dir(&dest)?;
    fs::write(&dest, latex).map_err(|e| Error::io(&dest, e))?;

    Ok(ChapterOutput {
        input_line: format!("\\input{{{relative}}}\n"),
        id,
        diagnostics,
    })
}
