//! Whole-book conversion.
//!
//! [`convert_book`] reads the table of contents from `index.html`, converts
//! every listed chapter into its own `.tex` file and writes a master
//! `body.tex` that `\input`s them in reading order.

mod assets;
mod chapter;
mod toc;

pub use assets::FsAssets;
pub use chapter::{ChapterOutput, convert_chapter, entry_id, render_chapter};
pub use toc::{Toc, TocEntry, collect_toc};

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use log::warn;

use crate::config::Config;
use crate::dom::parse_html_bytes;
use crate::error::{Error, Result};
use crate::latex::Diagnostic;

/// Summary of a conversion run.
#[derive(Debug, Clone, Default)]
pub struct ConversionReport {
    /// Identifiers of the converted chapters, in master-document order.
    pub chapters: Vec<String>,
    /// Exercise sections left out of the book.
    pub skipped: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Convert the book in `config.source_dir`.
///
/// Any I/O, image or structural error aborts the run; files written up to
/// that point are left in place.
pub fn convert_book(config: &Config) -> Result<ConversionReport> {
    let index = config.index_path();
    let html = fs::read(&index).map_err(|e| Error::io(&index, e))?;
    let toc = collect_toc(&parse_html_bytes(&html), &config.markers)?;

    let master_path = config.master_path();
    create_parent_dir(&master_path)?;
    let file = File::create(&master_path).map_err(|e| Error::io(&master_path, e))?;
    let mut master = BufWriter::new(file);

    let mut report = ConversionReport {
        skipped: toc.skipped,
        ..Default::default()
    };
    let mut seen = HashSet::new();

    for entry in &toc.entries {
        if !seen.insert(entry_id(&entry.href)) {
            warn!("{} listed twice in the table of contents; keeping the first", entry.href);
            continue;
        }

        let chapter = convert_chapter(config, entry)?;
        master
            .write_all(chapter.input_line.as_bytes())
            .map_err(|e| Error::io(&master_path, e))?;
        report.chapters.push(chapter.id);
        report.diagnostics.extend(chapter.diagnostics);
    }

    master.flush().map_err(|e| Error::io(&master_path, e))?;
    Ok(report)
}

/// Create the directory that will hold `path`.
pub(crate) fn create_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))
        }
        _ => Ok(()),
    }
}
