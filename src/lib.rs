//! # folio
//!
//! Converts a directory-based HTML book (an `index.html` table of contents
//! plus one HTML file per chapter) into a LaTeX tree: one `.tex` file per
//! chapter and a master `body.tex` that `\input`s them in reading order.
//!
//! ## Quick Start
//!
//! ```no_run
//! use folio::{Config, convert_book};
//!
//! let config = Config::new("book/").with_output_dir("latex/");
//! let report = convert_book(&config).unwrap();
//! println!("{} chapters", report.chapters.len());
//! ```
//!
//! The generated LaTeX relies on macros defined by the book's own preamble
//! (`tkbasebox`, `tabincell`, `linktarget`, `jpb` and friends); folio only
//! produces the body.
//!
//! ## Modules
//!
//! - [`dom`]: HTML parsing into an arena tree
//! - [`latex`]: escaping, labels, tables and the node translator
//! - [`book`]: table of contents, chapter files and image assets

pub mod book;
pub mod config;
pub mod dom;
mod error;
pub mod latex;
pub(crate) mod util;

pub use book::{ConversionReport, TocEntry, convert_book};
pub use config::{Config, Markers};
pub use error::{Error, Result};
