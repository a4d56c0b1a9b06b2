//! Table-of-contents discovery.

use log::{info, warn};

use crate::config::Markers;
use crate::dom::{Dom, NodeId};
use crate::error::{Error, Result};

/// One chapter link from the table of contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    /// List nesting depth; top-level entries are at depth 1.
    pub depth: usize,
    pub title: String,
    pub href: String,
}

/// Entries found in `index.html`, in reading order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Toc {
    pub entries: Vec<TocEntry>,
    /// Titles of exercise sections that were left out.
    pub skipped: Vec<String>,
}

/// Collect the table of contents that follows the TOC heading.
pub fn collect_toc(dom: &Dom, markers: &Markers) -> Result<Toc> {
    let heading = dom
        .find_within(dom.document(), |dom, id| {
            dom.is_tag(id, "h2") && dom.leading_text(id).trim() == markers.toc_heading
        })
        .ok_or_else(|| {
            Error::MissingElement(format!("table of contents heading <h2>{}</h2>", markers.toc_heading))
        })?;

    let mut toc = Toc::default();
    walk(dom, markers, dom.next_sibling(heading), 0, &mut toc);
    Ok(toc)
}

fn walk(dom: &Dom, markers: &Markers, start: Option<NodeId>, depth: usize, toc: &mut Toc) {
    let mut current = start;

    while let Some(id) = current {
        match dom.tag(id) {
            Some("li") => walk(dom, markers, dom.first_child(id), depth, toc),
            Some("ol" | "ul") => walk(dom, markers, dom.first_child(id), depth + 1, toc),
            Some("a") => {
                let title = dom.leading_text(id).trim();
                if title.contains(&markers.exercise) {
                    // The exercise list nested after this link goes with it.
                    info!("{}- skipping {title}", indent(depth));
                    toc.skipped.push(title.to_string());
                    return;
                }
                match dom.attr(id, "href").filter(|h| !h.is_empty()) {
                    Some(href) => toc.entries.push(TocEntry {
                        depth,
                        title: title.to_string(),
                        href: href.to_string(),
                    }),
                    None => warn!("table of contents link {title:?} has no href"),
                }
            }
            Some(other) => warn!("unrecognized element in table of contents: <{other}>"),
            None => {}
        }
        current = dom.next_sibling(id);
    }
}

/// Progress-log indentation for a TOC depth.
pub(crate) fn indent(depth: usize) -> String {
    "  ".repeat(depth.saturating_sub(1))
}
