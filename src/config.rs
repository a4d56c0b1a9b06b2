//! Conversion configuration.
//!
//! Every component that touches the filesystem receives a [`Config`]; there
//! is no global path state.

use std::path::{Path, PathBuf};

use percent_encoding::percent_decode_str;

/// Default prefix for chapter files and copied images, relative to the
/// output directory.
pub const DEFAULT_CHAPTER_DIR: &str = "out/";

/// Name of the master document in the output directory.
pub const MASTER_FILE: &str = "body.tex";

/// Name of the table-of-contents page in the source directory.
pub const INDEX_FILE: &str = "index.html";

/// Literal strings the converter recognizes in this book's markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markers {
    /// Text of the `h2` that introduces the table of contents.
    pub toc_heading: String,
    /// Link text marking exercise sections, which are left out.
    pub exercise: String,
    /// Paragraph text identifying the author attribution line.
    pub attribution: String,
    /// Callout box title used when the box has no summary span.
    pub callout_title: String,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            toc_heading: "目录".to_string(),
            exercise: "练习".to_string(),
            attribution: "作者：Tae Kim".to_string(),
            callout_title: "提示".to_string(),
        }
    }
}

/// Paths and markers for one conversion run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding `index.html`, the chapters and their images.
    pub source_dir: PathBuf,
    /// Directory receiving `body.tex`.
    pub output_dir: PathBuf,
    /// Prefix (relative to `output_dir`) for chapter files and images. Also
    /// the prefix of every `\input` line, so it must stay relative.
    pub chapter_dir: String,
    pub markers: Markers,
}

impl Config {
    /// Create a configuration writing into the current directory.
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            output_dir: PathBuf::from("."),
            chapter_dir: DEFAULT_CHAPTER_DIR.to_string(),
            markers: Markers::default(),
        }
    }

    /// Set the output directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Set the chapter prefix. A trailing `/` is added when missing.
    pub fn with_chapter_dir(mut self, prefix: impl Into<String>) -> Self {
        let mut prefix = prefix.into();
        if !prefix.is_empty() && !prefix.ends_with('/') {
            prefix.push('/');
        }
        self.chapter_dir = prefix;
        self
    }

    /// Set the book markers.
    pub fn with_markers(mut self, markers: Markers) -> Self {
        self.markers = markers;
        self
    }

    /// Filesystem path of a page or asset referenced by `href`.
    ///
    /// The href is percent-decoded and any fragment is dropped.
    pub fn source_path(&self, href: &str) -> PathBuf {
        let path = href.split('#').next().unwrap_or_default();
        self.source_dir
            .join(percent_decode_str(path).decode_utf8_lossy().as_ref())
    }

    /// Path of the table-of-contents page.
    pub fn index_path(&self) -> PathBuf {
        self.source_dir.join(INDEX_FILE)
    }

    /// Path of the master document.
    pub fn master_path(&self) -> PathBuf {
        self.output_dir.join(MASTER_FILE)
    }

    /// Output-relative name of a chapter or asset: `chapter_dir + name`.
    pub fn chapter_relative(&self, name: &str) -> String {
        format!("{}{name}", self.chapter_dir)
    }

    /// Filesystem path of an output-relative name.
    pub fn output_path(&self, relative: &str) -> PathBuf {
        self.output_dir.join(relative)
    }
}

/// Resolve the source directory from a command-line argument.
///
/// A path naming a file (typically `index.html`) resolves to its directory.
pub fn resolve_source_dir(arg: &Path) -> PathBuf {
    if arg.is_file() {
        arg.parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
    } else {
        arg.to_path_buf()
    }
}
