//! Feeds html5ever's tree builder into a [`Dom`].

use std::borrow::Cow;
use std::cell::RefCell;

use html5ever::tendril::StrTendril;
use html5ever::tree_builder::{ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{QualName, local_name, ns};

use super::arena::{Attribute, Dom, NodeData, NodeId};

/// Tree builder target. Handles are plain [`NodeId`]s.
///
/// The builder only hands out `&self`, hence the `RefCell`.
#[derive(Default)]
pub struct PageSink {
    dom: RefCell<Dom>,
}

impl PageSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_dom(self) -> Dom {
        self.dom.into_inner()
    }

    fn edit<R>(&self, f: impl FnOnce(&mut Dom) -> R) -> R {
        f(&mut self.dom.borrow_mut())
    }
}

fn convert_attrs(attrs: Vec<html5ever::Attribute>) -> impl Iterator<Item = Attribute> {
    attrs.into_iter().map(|attr| Attribute {
        name: attr.name,
        value: attr.value.to_string(),
    })
}

/// Turn builder output into a node, creating a text node when needed.
fn into_node(dom: &mut Dom, child: NodeOrText<NodeId>) -> NodeId {
    match child {
        NodeOrText::AppendNode(node) => node,
        NodeOrText::AppendText(text) => dom.create_text(text.to_string()),
    }
}

fn append_child(dom: &mut Dom, parent: NodeId, child: NodeOrText<NodeId>) {
    match child {
        NodeOrText::AppendText(text) => dom.append_text(parent, &text),
        node => {
            let node = into_node(dom, node);
            dom.append(parent, node);
        }
    }
}

impl TreeSink for PageSink {
    type Handle = NodeId;
    type Output = Self;
    type ElemName<'a>
        = &'a QualName
    where
        Self: 'a;

    fn finish(self) -> Self {
        self
    }

    fn parse_error(&self, msg: Cow<'static, str>) {
        log::trace!("recovered from malformed html: {msg}");
    }

    fn get_document(&self) -> NodeId {
        self.dom.borrow().document()
    }

    fn elem_name<'a>(&'a self, target: &'a NodeId) -> &'a QualName {
        static UNNAMED: QualName = QualName {
            prefix: None,
            ns: ns!(),
            local: local_name!(""),
        };

        let dom = self.dom.borrow();
        let Some(NodeData::Element { name, .. }) = dom.get(*target).map(|node| &node.data) else {
            return &UNNAMED;
        };
        // SAFETY: the arena only grows and element names are never rewritten,
        // so `name` stays put for as long as `self` lives even after the
        // `Ref` guard is dropped.
        unsafe { &*(name as *const QualName) }
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<html5ever::Attribute>,
        _flags: ElementFlags,
    ) -> NodeId {
        self.edit(|dom| dom.create_element(name, convert_attrs(attrs).collect()))
    }

    fn create_comment(&self, text: StrTendril) -> NodeId {
        self.edit(|dom| dom.create_comment(text.to_string()))
    }

    fn create_pi(&self, target: StrTendril, _data: StrTendril) -> NodeId {
        self.edit(|dom| dom.create_comment(target.to_string()))
    }

    fn append(&self, parent: &NodeId, child: NodeOrText<NodeId>) {
        self.edit(|dom| append_child(dom, *parent, child));
    }

    fn append_based_on_parent_node(
        &self,
        element: &NodeId,
        prev_element: &NodeId,
        child: NodeOrText<NodeId>,
    ) {
        self.edit(|dom| {
            let parent = dom.parent(*element).unwrap_or(*prev_element);
            append_child(dom, parent, child);
        });
    }

    fn append_doctype_to_document(
        &self,
        name: StrTendril,
        _public_id: StrTendril,
        _system_id: StrTendril,
    ) {
        self.edit(|dom| {
            let doctype = dom.create_doctype(name.to_string());
            dom.append(dom.document(), doctype);
        });
    }

    fn get_template_contents(&self, target: &NodeId) -> NodeId {
        *target
    }

    fn same_node(&self, x: &NodeId, y: &NodeId) -> bool {
        x == y
    }

    fn set_quirks_mode(&self, _mode: QuirksMode) {}

    fn append_before_sibling(&self, sibling: &NodeId, new_node: NodeOrText<NodeId>) {
        self.edit(|dom| {
            let node = into_node(dom, new_node);
            dom.insert_before(*sibling, node);
        });
    }

    fn add_attrs_if_missing(&self, target: &NodeId, attrs: Vec<html5ever::Attribute>) {
        self.edit(|dom| {
            let Some(NodeData::Element { attrs: present, .. }) =
                dom.get_mut(*target).map(|node| &mut node.data)
            else {
                return;
            };
            for attr in convert_attrs(attrs) {
                if present.iter().all(|p| p.name != attr.name) {
                    present.push(attr);
                }
            }
        });
    }

    fn remove_from_parent(&self, target: &NodeId) {
        self.edit(|dom| dom.detach(*target));
    }

    fn reparent_children(&self, node: &NodeId, new_parent: &NodeId) {
        self.edit(|dom| {
            while let Some(child) = dom.first_child(*node) {
                dom.append(*new_parent, child);
            }
        });
    }
}
