//! HTML parsing into an arena DOM.
//!
//! html5ever does the parsing; [`PageSink`] collects its output into a
//! [`Dom`] whose nodes carry parent, child and sibling links.
//!
//! ```
//! use folio::dom::parse_html;
//!
//! let dom = parse_html("<h1>Title</h1><p>Body</p>");
//! let h1 = dom.find_by_tag("h1").unwrap();
//! assert_eq!(dom.leading_text(h1), "Title");
//! ```

mod arena;
mod tree_sink;

pub use arena::{Attribute, Dom, Node, NodeData, NodeId};
pub use tree_sink::PageSink;

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;

/// Parse an HTML document.
pub fn parse_html(html: &str) -> Dom {
    parse_document(PageSink::new(), ParseOpts::default())
        .from_utf8()
        .one(html.as_bytes())
        .into_dom()
}

/// Parse raw HTML bytes, decoding them first.
///
/// See [`decode_page`](crate::util::decode_page) for the encoding rules.
pub fn parse_html_bytes(bytes: &[u8]) -> Dom {
    parse_html(&crate::util::decode_page(bytes))
}
