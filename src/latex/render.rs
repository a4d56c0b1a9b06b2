//! HTML → LaTeX translation.
//!
//! [`Translator`] walks a parsed chapter one sibling chain at a time and
//! returns the LaTeX for the whole chain, recursing into children. Table
//! geometry travels down the recursion in a [`TranslationContext`]; nodes
//! that were already emitted elsewhere (remarks turned into footnotes) are
//! remembered in a consumed set so the tree itself is never modified.

use std::collections::HashSet;
use std::fmt;

use log::warn;

use crate::config::Markers;
use crate::dom::{Dom, NodeData, NodeId};
use crate::error::Result;

use super::escape::{escape_tex, escape_tex_lite};
use super::heading::make_heading;
use super::label::{hyper_target, internal_target, is_external};
use super::table::{TableGeometry, cell_span, column_spec};

/// Destination for images referenced by a chapter.
pub trait AssetStore {
    /// Store the image referenced by `src` and return the path LaTeX should
    /// use to include it.
    fn store_image(&mut self, src: &str) -> Result<String>;
}

/// Table state inherited by a sibling chain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TranslationContext {
    /// Column count of the enclosing table; 0 outside tables.
    pub columns: usize,
    /// Rows of the enclosing table end with `\hline`.
    pub hline: bool,
}

impl TranslationContext {
    pub fn in_table(&self) -> bool {
        self.columns > 0
    }
}

/// A content-shape surprise that does not stop the conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Chapter identifier the node belongs to.
    pub doc: String,
    pub kind: DiagnosticKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    UnknownTag(String),
    UnknownSpanClass(String),
    UnknownDivClass(String),
    FontWithoutSize,
    ImageWithoutSource,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::UnknownTag(tag) => write!(f, "unknown tag <{tag}>"),
            DiagnosticKind::UnknownSpanClass(class) => write!(f, "unknown span class {class:?}"),
            DiagnosticKind::UnknownDivClass(class) => write!(f, "unknown div class {class:?}"),
            DiagnosticKind::FontWithoutSize => f.write_str("<font> without size"),
            DiagnosticKind::ImageWithoutSource => f.write_str("<img> without src"),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.doc, self.kind)
    }
}

/// Translates the nodes of one chapter.
pub struct Translator<'a> {
    dom: &'a Dom,
    doc: &'a str,
    markers: &'a Markers,
    assets: &'a mut dyn AssetStore,
    consumed: HashSet<NodeId>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Translator<'a> {
    /// Create a translator for the chapter `doc` parsed into `dom`.
    pub fn new(
        dom: &'a Dom,
        doc: &'a str,
        markers: &'a Markers,
        assets: &'a mut dyn AssetStore,
    ) -> Self {
        Self {
            dom,
            doc,
            markers,
            assets,
            consumed: HashSet::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Translate `start` and all of its following siblings.
    ///
    /// `depth` is the sectioning depth an `h2` maps to.
    pub fn translate(
        &mut self,
        start: Option<NodeId>,
        depth: usize,
        ctx: TranslationContext,
    ) -> Result<String> {
        let ctx = if ctx.in_table() {
            ctx
        } else {
            TranslationContext::default()
        };

        let dom = self.dom;
        let mut out = String::new();
        // Element position in the chain; drives the cell separators.
        let mut position = 0;
        let mut current = start;

        while let Some(id) = current {
            current = dom.next_sibling(id);
            if self.consumed.contains(&id) {
                // Only the content moved into a footnote; links may still
                // point at the anchor.
                self.anchor(id, &mut out);
                continue;
            }
            let Some(node) = dom.get(id) else {
                continue;
            };
            match &node.data {
                NodeData::Text(text) => out.push_str(&escape_tex(text.trim())),
                NodeData::Element { .. } => {
                    position += 1;
                    self.translate_element(id, depth, ctx, &mut position, &mut out)?;
                }
                _ => {}
            }
        }

        Ok(out)
    }

    /// Diagnostics recorded so far.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    fn anchor(&self, id: NodeId, out: &mut String) {
        if let Some(anchor) = self.dom.element_id(id).filter(|a| !a.is_empty()) {
            out.push_str(&hyper_target(self.doc, anchor, ""));
        }
    }

    fn translate_element(
        &mut self,
        id: NodeId,
        depth: usize,
        ctx: TranslationContext,
        position: &mut usize,
        out: &mut String,
    ) -> Result<()> {
        let dom = self.dom;
        let tag = dom.tag(id).unwrap_or_default();
        let class = dom.attr_or_empty(id, "class");

        self.anchor(id, out);

        match tag {
            "h1" | "script" | "nav" | "iframe" | "audio" => {}
            "h2" => out.push_str(&make_heading(depth, &self.title(id))?),
            "h3" => out.push_str(&make_heading(depth + 1, &self.title(id))?),
            "b" | "strong" => out.push_str(&self.wrap(id, depth, ctx, "\\textbf{", "}")?),
            "i" => out.push_str(&self.wrap(id, depth, ctx, "\\textit{", "}")?),
            "em" => out.push_str(&self.wrap(id, depth, ctx, "\\emph{", "}")?),
            "u" => out.push_str(&self.wrap(id, depth, ctx, "\\uline{", "}")?),
            "strike" => out.push_str(&self.wrap(id, depth, ctx, "\\sout{", "}")?),
            "br" if ctx.in_table() => out.push_str("\\\\"),
            "br" => out.push_str("\\\\\n"),
            "span" => self.span(id, class, depth, ctx, out)?,
            "div" => self.div(id, class, depth, ctx, out)?,
            "img" => self.image(id, out)?,
            "ul" if class == "menu" => {}
            "ul" => out.push_str(&self.environment(id, depth, ctx, "itemize")?),
            "ol" => out.push_str(&self.environment(id, depth, ctx, "enumerate")?),
            "center" => out.push_str(&self.environment(id, depth, ctx, "center")?),
            "li" => out.push_str(&self.wrap(id, depth, ctx, "\\item ", "\n")?),
            "p" if dom.leading_text(id).contains(&self.markers.attribution) => {}
            "p" => out.push_str(&self.wrap(id, depth, ctx, "", "\n\n")?),
            "font" if dom.attr(id, "size").is_some_and(|s| !s.is_empty()) => {
                out.push_str(&self.wrap(id, depth, ctx, "\\small{", "}")?);
            }
            "font" => {
                self.diagnose(DiagnosticKind::FontWithoutSize);
                out.push_str(&self.children(id, depth, ctx)?);
            }
            "table" => self.table(id, class, depth, ctx, out)?,
            "caption" => {
                let open = format!("\\multicolumn{{{}}}{{c}}{{\\cellcolor{{tablecaption}}", ctx.columns);
                out.push_str(&self.wrap(id, depth, ctx, &open, "} \\\\\n\\hline ")?);
            }
            "tr" => {
                out.push_str(&self.children(id, depth, ctx)?);
                out.push_str("\\\\\n");
                if ctx.hline {
                    out.push_str("\\hline\n");
                }
            }
            "td" | "th" => self.cell(id, tag, depth, ctx, position, out)?,
            "a" => self.link(id, class, depth, ctx, out)?,
            "sup" => self.superscript(id, out),
            "tbody" => out.push_str(&self.children(id, depth, ctx)?),
            other => {
                self.diagnose(DiagnosticKind::UnknownTag(other.to_string()));
                out.push_str(&self.children(id, depth, ctx)?);
            }
        }

        Ok(())
    }

    fn children(&mut self, id: NodeId, depth: usize, ctx: TranslationContext) -> Result<String> {
        self.translate(self.dom.first_child(id), depth, ctx)
    }

    fn wrap(
        &mut self,
        id: NodeId,
        depth: usize,
        ctx: TranslationContext,
        open: &str,
        close: &str,
    ) -> Result<String> {
        let body = self.children(id, depth, ctx)?;
        Ok(format!("{open}{body}{close}"))
    }

    fn environment(
        &mut self,
        id: NodeId,
        depth: usize,
        ctx: TranslationContext,
        name: &str,
    ) -> Result<String> {
        let body = self.children(id, depth, ctx)?;
        Ok(format!("\\begin{{{name}}}\n{body}\\end{{{name}}}\n"))
    }

    /// Section title: all descendant text, lite-escaped.
    fn title(&self, id: NodeId) -> String {
        escape_tex_lite(self.dom.text_content(id).trim())
    }

    fn span(
        &mut self,
        id: NodeId,
        class: &str,
        depth: usize,
        ctx: TranslationContext,
        out: &mut String,
    ) -> Result<()> {
        let body = match class {
            "summary" => self.wrap(id, depth, ctx, "\\textbf{", "}")?,
            "remark" => self.wrap(id, depth, ctx, "\\footnote{", "}")?,
            "" | "popup" => self.children(id, depth, ctx)?,
            other => {
                self.diagnose(DiagnosticKind::UnknownSpanClass(other.to_string()));
                self.children(id, depth, ctx)?
            }
        };
        out.push_str(&body);
        Ok(())
    }

    fn div(
        &mut self,
        id: NodeId,
        class: &str,
        depth: usize,
        ctx: TranslationContext,
        out: &mut String,
    ) -> Result<()> {
        if self.dom.element_id(id) == Some("basic-modal-content") {
            return Ok(());
        }
        match class {
            "sumbox" | "note" => out.push_str(&self.callout(id, depth, ctx)?),
            "book-navigation" => {}
            other => {
                self.diagnose(DiagnosticKind::UnknownDivClass(other.to_string()));
                out.push_str(&self.children(id, depth, ctx)?);
            }
        }
        Ok(())
    }

    /// Boxed callout. The title comes from the first `span.summary`, and the
    /// body is whatever follows that span.
    fn callout(&mut self, id: NodeId, depth: usize, ctx: TranslationContext) -> Result<String> {
        let dom = self.dom;
        let summary = dom.find_within(id, |dom, n| {
            dom.is_tag(n, "span") && dom.attr_or_empty(n, "class") == "summary"
        });

        let (title, body_start) = match summary {
            Some(span) => (
                escape_tex(dom.text_content(span).trim()),
                dom.next_sibling(span),
            ),
            None => (escape_tex(&self.markers.callout_title), dom.first_child(id)),
        };

        let body = self.translate(skip_leading_break(dom, body_start), depth, ctx)?;
        Ok(format!(
            "\\begin{{tkbasebox}}%\n\\node[tkbox](box){{%\n\\begin{{tkinsidebox}}%\n\
             {body}%\n\\end{{tkinsidebox}}%\n}};%\n\\tkboxheader{{{title}}}%\n\
             \\end{{tkbasebox}}\n\n"
        ))
    }

    fn image(&mut self, id: NodeId, out: &mut String) -> Result<()> {
        match self.dom.attr(id, "src").filter(|s| !s.is_empty()) {
            Some(src) => {
                let path = self.assets.store_image(src)?;
                out.push_str(&format!(
                    "\\begin{{center}}\\includegraphics[width=0.5\\textwidth]{{{path}}}\\end{{center}}"
                ));
            }
            None => self.diagnose(DiagnosticKind::ImageWithoutSource),
        }
        Ok(())
    }

    fn table(
        &mut self,
        id: NodeId,
        class: &str,
        depth: usize,
        ctx: TranslationContext,
        out: &mut String,
    ) -> Result<()> {
        let geometry = TableGeometry::resolve(self.dom, id)?;
        let border = self
            .dom
            .attr(id, "border")
            .is_some_and(|b| !b.is_empty() && b != "0");
        let inner = TranslationContext {
            columns: geometry.columns,
            hline: geometry.hline,
        };

        let body = self.children(id, depth, inner)?;
        let tabular = format!(
            "\\begin{{tabular}}{{{}}}\n{body}\\end{{tabular}}\n",
            column_spec(geometry.columns, border)
        );

        if class == "scale-to-page-width" {
            out.push_str("\\resizebox{\\textwidth}{!}{");
            out.push_str(&tabular);
            out.push_str("}\n");
        } else if ctx.in_table() {
            out.push_str(&tabular);
        } else {
            out.push_str("\\begin{center}\n");
            out.push_str(&tabular);
            out.push_str("\\end{center}\n\n");
        }
        Ok(())
    }

    /// Table cell. A `colspan` advances the chain position by the extra
    /// columns it covers, so the last cell of every row drops its separator.
    fn cell(
        &mut self,
        id: NodeId,
        tag: &str,
        depth: usize,
        ctx: TranslationContext,
        position: &mut usize,
        out: &mut String,
    ) -> Result<()> {
        let span = cell_span(self.dom, id)?;
        *position += span - 1;

        let body = self.children(id, depth, ctx)?;
        let content = if tag == "th" {
            format!("\\cellcolor{{tableheader}}\\textbf{{{body}}}")
        } else {
            format!("\\tabincell{{c}}{{{body}}}")
        };

        if self.dom.attr(id, "colspan").is_some_and(|s| !s.trim().is_empty()) {
            out.push_str(&format!("\\multicolumn{{{span}}}{{c}}{{{content}}}"));
        } else {
            out.push_str(&content);
        }
        if *position < ctx.columns {
            out.push_str(" & ");
        }
        Ok(())
    }

    fn link(
        &mut self,
        id: NodeId,
        class: &str,
        depth: usize,
        ctx: TranslationContext,
        out: &mut String,
    ) -> Result<()> {
        let dom = self.dom;
        if class == "playIcon" || dom.leading_text(id).contains(&self.markers.exercise) {
            return Ok(());
        }

        let body = self.children(id, depth, ctx)?;
        match dom.attr(id, "href").filter(|h| !h.is_empty()) {
            None => out.push_str(&body),
            Some(href) if is_external(href) => {
                let target = escape_tex_lite(href);
                out.push_str(&format!(
                    "\\href{{{target}}}{{{body}}}\\linktarget{{\\footnote{{\\url{{{target}}}}}}}"
                ));
            }
            Some(href) => {
                let target = internal_target(self.doc, href);
                out.push_str(&format!(
                    "\\hyperlink{{{target}}}{{{body}}}\\linktarget{{ (P\\pageref{{{target}}})}}"
                ));
            }
        }
        Ok(())
    }

    /// Turn a superscript marker into a footnote.
    ///
    /// The matching remark is the first later `span.remark` holding a `sup`
    /// with the same key; its text becomes the footnote and the remark is
    /// not rendered again where it stands.
    fn superscript(&mut self, id: NodeId, out: &mut String) {
        let dom = self.dom;
        let key = dom.leading_text(id).trim();
        let consumed = &self.consumed;

        let remark = dom
            .parent(id)
            .and_then(|parent| dom.next_sibling(parent))
            .and_then(|start| {
                dom.find_forward(start, |dom, n| {
                    !consumed.contains(&n)
                        && dom.is_tag(n, "span")
                        && dom.attr_or_empty(n, "class") == "remark"
                        && dom.children(n).any(|child| {
                            dom.find_within(child, |dom, s| {
                                dom.is_tag(s, "sup") && dom.leading_text(s).trim() == key
                            })
                            .is_some()
                        })
                })
            });

        if let Some(remark) = remark {
            let text = escape_tex(dom.first_text_child(remark).trim());
            out.push_str(&format!("\\footnote{{{text}}}"));
            self.consumed.insert(remark);
        }
    }

    fn diagnose(&mut self, kind: DiagnosticKind) {
        let diagnostic = Diagnostic {
            doc: self.doc.to_string(),
            kind,
        };
        warn!("{diagnostic}");
        self.diagnostics.push(diagnostic);
    }
}

/// Skip whitespace-only text and then a single `br`.
fn skip_leading_break(dom: &Dom, start: Option<NodeId>) -> Option<NodeId> {
    let mut current = start;
    while let Some(id) = current {
        match dom.text(id) {
            Some(text) if text.trim().is_empty() => current = dom.next_sibling(id),
            _ => break,
        }
    }
    match current {
        Some(id) if dom.is_tag(id, "br") => dom.next_sibling(id),
        other => other,
    }
}
