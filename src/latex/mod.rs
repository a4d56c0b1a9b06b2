//! LaTeX generation.
//!
//! This module contains the pure parts of the converter: escaping, label
//! naming, sectioning commands, table geometry and the node translator.
//! Nothing here touches the filesystem except through [`AssetStore`].
//!
//! # Example
//!
//! ```
//! use folio::dom::parse_html;
//! use folio::latex::{AssetStore, TranslationContext, Translator};
//! use folio::{Markers, Result};
//!
//! struct NoImages;
//!
//! impl AssetStore for NoImages {
//!     fn store_image(&mut self, src: &str) -> Result<String> {
//!         Ok(src.to_string())
//!     }
//! }
//!
//! let dom = parse_html("<h1>Intro</h1><p>Hello <b>world</b></p>");
//! let h1 = dom.find_by_tag("h1").unwrap();
//! let markers = Markers::default();
//! let mut assets = NoImages;
//! let mut translator = Translator::new(&dom, "intro", &markers, &mut assets);
//!
//! let latex = translator
//!     .translate(Some(h1), 2, TranslationContext::default())
//!     .unwrap();
//! assert_eq!(latex, "Hello\\textbf{world}\n\n");
//! ```

mod escape;
mod heading;
mod label;
mod render;
mod table;

pub use escape::{escape_tex, escape_tex_lite, needs_escape};
pub use heading::make_heading;
pub use label::{chapter_id, hyper_target, internal_target, is_external, label};
pub use render::{AssetStore, Diagnostic, DiagnosticKind, TranslationContext, Translator};
pub use table::{
    MAX_COLSPAN, TableGeometry, cell_span, column_count, column_spec, needs_hline, parse_colspan,
};
