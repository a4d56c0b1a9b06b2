//! Arena-based DOM for parsed book pages.
//!
//! Nodes live in one vector and refer to each other by [`NodeId`]. The tree
//! is built once by the html5ever sink and then only read: translation keeps
//! its own bookkeeping (e.g. consumed nodes) keyed by id.

use std::iter;

use html5ever::QualName;

/// Index of a node in its [`Dom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
pub enum NodeData {
    Document,
    Element {
        name: QualName,
        attrs: Vec<Attribute>,
    },
    Text(String),
    Comment(String),
    Doctype(String),
}

#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: QualName,
    pub value: String,
}

/// Tree links of one node.
#[derive(Debug, Clone, Copy, Default)]
struct Links {
    parent: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
    prev: Option<NodeId>,
    next: Option<NodeId>,
}

#[derive(Debug)]
pub struct Node {
    pub data: NodeData,
    links: Links,
}

/// A parsed page.
#[derive(Debug)]
pub struct Dom {
    nodes: Vec<Node>,
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

/// Construction, used by the tree sink.
impl Dom {
    /// Create a DOM holding only the document node.
    pub fn new() -> Self {
        let mut dom = Self { nodes: Vec::new() };
        dom.push(NodeData::Document);
        dom
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            data,
            links: Links::default(),
        });
        id
    }

    pub fn create_element(&mut self, name: QualName, attrs: Vec<Attribute>) -> NodeId {
        self.push(NodeData::Element { name, attrs })
    }

    pub fn create_text(&mut self, text: String) -> NodeId {
        self.push(NodeData::Text(text))
    }

    pub fn create_comment(&mut self, text: String) -> NodeId {
        self.push(NodeData::Comment(text))
    }

    pub fn create_doctype(&mut self, name: String) -> NodeId {
        self.push(NodeData::Doctype(name))
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    fn links(&self, id: NodeId) -> Links {
        self.nodes[id.index()].links
    }

    fn links_mut(&mut self, id: NodeId) -> &mut Links {
        &mut self.nodes[id.index()].links
    }

    /// Make `child` the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        let last = self.links(parent).last_child;
        self.attach(child, parent, last, None);
    }

    /// Insert `node` right before `sibling`. Does nothing if `sibling` has no
    /// parent.
    pub fn insert_before(&mut self, sibling: NodeId, node: NodeId) {
        if node == sibling {
            return;
        }
        self.detach(node);
        let Links { parent, prev, .. } = self.links(sibling);
        if let Some(parent) = parent {
            self.attach(node, parent, prev, Some(sibling));
        }
    }

    /// Link a detached `node` between `prev` and `next` under `parent`.
    fn attach(&mut self, node: NodeId, parent: NodeId, prev: Option<NodeId>, next: Option<NodeId>) {
        let links = self.links_mut(node);
        links.parent = Some(parent);
        links.prev = prev;
        links.next = next;

        match prev {
            Some(prev) => self.links_mut(prev).next = Some(node),
            None => self.links_mut(parent).first_child = Some(node),
        }
        match next {
            Some(next) => self.links_mut(next).prev = Some(node),
            None => self.links_mut(parent).last_child = Some(node),
        }
    }

    /// Append text to `parent`, merging with a trailing text child.
    pub fn append_text(&mut self, parent: NodeId, text: &str) {
        if let Some(last) = self.links(parent).last_child
            && let Some(Node {
                data: NodeData::Text(existing),
                ..
            }) = self.get_mut(last)
        {
            existing.push_str(text);
            return;
        }
        let node = self.create_text(text.to_string());
        self.append(parent, node);
    }

    /// Unlink `node` from its parent and siblings. Its subtree stays intact.
    pub fn detach(&mut self, node: NodeId) {
        let Links {
            parent, prev, next, ..
        } = self.links(node);
        let Some(parent) = parent else {
            return;
        };

        match prev {
            Some(prev) => self.links_mut(prev).next = next,
            None => self.links_mut(parent).first_child = next,
        }
        match next {
            Some(next) => self.links_mut(next).prev = prev,
            None => self.links_mut(parent).last_child = prev,
        }

        let links = self.links_mut(node);
        links.parent = None;
        links.prev = None;
        links.next = None;
    }
}

/// Structural queries used by the translator.
impl Dom {
    pub fn document(&self) -> NodeId {
        NodeId(0)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Number of nodes, the document included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the document node has no children.
    pub fn is_empty(&self) -> bool {
        self.first_child(self.document()).is_none()
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.links.first_child
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.links.next
    }

    /// Non-owning back-reference, only used for lookahead searches.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.links.parent
    }

    /// Direct children of `id`, in order.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        iter::successors(self.first_child(id), |&child| self.next_sibling(child))
    }

    /// `root` and everything below it, in document order.
    pub fn descendants(&self, root: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let mut next = self.get(root).map(|_| root);
        iter::from_fn(move || {
            let current = next?;
            next = self.first_child(current).or_else(|| {
                let mut node = current;
                loop {
                    if node == root {
                        return None;
                    }
                    if let Some(sibling) = self.next_sibling(node) {
                        return Some(sibling);
                    }
                    node = self.parent(node)?;
                }
            });
            Some(current)
        })
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match &self.get(id)?.data {
            NodeData::Element { name, .. } => Some(&*name.local),
            _ => None,
        }
    }

    pub fn is_tag(&self, id: NodeId, tag: &str) -> bool {
        self.tag(id) == Some(tag)
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        self.tag(id).is_some()
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        match &self.get(id)?.data {
            NodeData::Element { attrs, .. } => attrs
                .iter()
                .find(|a| &*a.name.local == name)
                .map(|a| a.value.as_str()),
            _ => None,
        }
    }

    /// Attribute value, with a missing attribute read as empty.
    pub fn attr_or_empty(&self, id: NodeId, name: &str) -> &str {
        self.attr(id, name).unwrap_or_default()
    }

    pub fn element_id(&self, id: NodeId) -> Option<&str> {
        self.attr(id, "id")
    }

    /// Content of a text node.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.get(id)?.data {
            NodeData::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Text of the first child, if that child is a text node.
    pub fn leading_text(&self, id: NodeId) -> &str {
        self.first_child(id)
            .and_then(|child| self.text(child))
            .unwrap_or_default()
    }

    /// First direct text child, skipping leading elements.
    pub fn first_text_child(&self, id: NodeId) -> &str {
        self.children(id)
            .find_map(|child| self.text(child))
            .unwrap_or_default()
    }

    /// All text below `id`, concatenated.
    pub fn text_content(&self, id: NodeId) -> String {
        self.descendants(id)
            .filter_map(|node| self.text(node))
            .collect()
    }

    /// First node in `root`'s subtree (`root` included) matching `predicate`.
    pub fn find_within<F>(&self, root: NodeId, predicate: F) -> Option<NodeId>
    where
        F: Fn(&Dom, NodeId) -> bool,
    {
        self.descendants(root).find(|&id| predicate(self, id))
    }

    /// Like [`find_within`](Self::find_within), continuing through each
    /// following sibling of `start` and its subtree.
    pub fn find_forward<F>(&self, start: NodeId, predicate: F) -> Option<NodeId>
    where
        F: Fn(&Dom, NodeId) -> bool,
    {
        iter::successors(Some(start), |&node| self.next_sibling(node))
            .find_map(|node| self.find_within(node, &predicate))
    }

    /// First element with the given tag in the document.
    pub fn find_by_tag(&self, tag: &str) -> Option<NodeId> {
        self.find_within(self.document(), |dom, id| dom.is_tag(id, tag))
    }
}

#[cfg(test)]
mod tests {
    use html5ever::{LocalName, ns};

    use super::*;

    fn qname(local: &str) -> QualName {
        QualName::new(None, ns!(html), LocalName::from(local))
    }

    fn element(dom: &mut Dom, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let attrs = attrs
            .iter()
            .map(|(k, v)| Attribute {
                name: qname(k),
                value: v.to_string(),
            })
            .collect();
        dom.create_element(qname(tag), attrs)
    }

    /// `<ul><li/><li/><li/></ul>` under the document.
    fn list(dom: &mut Dom) -> (NodeId, Vec<NodeId>) {
        let ul = element(dom, "ul", &[]);
        dom.append(dom.document(), ul);
        let items: Vec<_> = (0..3)
            .map(|_| {
                let li = element(dom, "li", &[]);
                dom.append(ul, li);
                li
            })
            .collect();
        (ul, items)
    }

    #[test]
    fn test_element_queries() {
        let mut dom = Dom::new();
        let div = element(&mut dom, "div", &[("id", "main"), ("class", "note")]);
        dom.append(dom.document(), div);

        assert!(dom.is_element(div));
        assert!(dom.is_tag(div, "div"));
        assert_eq!(dom.element_id(div), Some("main"));
        assert_eq!(dom.attr(div, "class"), Some("note"));
        assert_eq!(dom.attr_or_empty(div, "size"), "");
        assert!(!dom.is_element(dom.document()));
    }

    #[test]
    fn test_links() {
        let mut dom = Dom::new();
        assert!(dom.is_empty());
        let (ul, items) = list(&mut dom);

        assert_eq!(dom.first_child(ul), Some(items[0]));
        assert_eq!(dom.next_sibling(items[0]), Some(items[1]));
        assert_eq!(dom.next_sibling(items[2]), None);
        assert_eq!(dom.parent(items[2]), Some(ul));
        assert_eq!(dom.children(ul).collect::<Vec<_>>(), items);
        assert!(!dom.is_empty());
    }

    #[test]
    fn test_insert_before_first_and_middle() {
        let mut dom = Dom::new();
        let (ul, items) = list(&mut dom);
        let head = element(&mut dom, "li", &[]);
        let middle = element(&mut dom, "li", &[]);

        dom.insert_before(items[0], head);
        dom.insert_before(items[2], middle);

        assert_eq!(
            dom.children(ul).collect::<Vec<_>>(),
            vec![head, items[0], items[1], middle, items[2]]
        );
    }

    #[test]
    fn test_detach_keeps_siblings_linked() {
        let mut dom = Dom::new();
        let (ul, items) = list(&mut dom);

        dom.detach(items[1]);
        assert_eq!(dom.children(ul).collect::<Vec<_>>(), vec![items[0], items[2]]);
        assert_eq!(dom.parent(items[1]), None);

        dom.detach(items[2]);
        dom.append(ul, items[1]);
        assert_eq!(dom.children(ul).collect::<Vec<_>>(), vec![items[0], items[1]]);
    }

    #[test]
    fn test_text_merging() {
        let mut dom = Dom::new();
        let p = element(&mut dom, "p", &[]);
        dom.append(dom.document(), p);

        dom.append_text(p, "Hello, ");
        dom.append_text(p, "World!");

        assert_eq!(dom.children(p).count(), 1);
        assert_eq!(dom.leading_text(p), "Hello, World!");
    }

    #[test]
    fn test_descendants_stay_inside_root() {
        let mut dom = Dom::new();
        let (_, items) = list(&mut dom);
        let inner = element(&mut dom, "b", &[]);
        dom.append(items[1], inner);

        assert_eq!(dom.descendants(items[1]).collect::<Vec<_>>(), vec![items[1], inner]);
        assert_eq!(dom.descendants(items[2]).collect::<Vec<_>>(), vec![items[2]]);
        assert_eq!(dom.descendants(dom.document()).count(), dom.len());
    }

    #[test]
    fn test_find_forward_covers_following_siblings() {
        let mut dom = Dom::new();
        let body = element(&mut dom, "body", &[]);
        let first = element(&mut dom, "p", &[]);
        let second = element(&mut dom, "div", &[]);
        let nested = element(&mut dom, "span", &[("class", "remark")]);
        dom.append(dom.document(), body);
        dom.append(body, first);
        dom.append(body, second);
        dom.append(second, nested);

        let is_remark = |dom: &Dom, id: NodeId| dom.attr(id, "class") == Some("remark");
        assert_eq!(dom.find_forward(first, is_remark), Some(nested));
        assert_eq!(dom.find_within(first, is_remark), None);
    }

    #[test]
    fn test_text_queries() {
        let mut dom = Dom::new();
        let span = element(&mut dom, "span", &[]);
        let sup = element(&mut dom, "sup", &[]);
        dom.append(dom.document(), span);
        dom.append(span, sup);
        dom.append_text(sup, "1");
        dom.append_text(span, "note body");

        assert_eq!(dom.leading_text(span), "");
        assert_eq!(dom.first_text_child(span), "note body");
        assert_eq!(dom.text_content(span), "1note body");
    }
}
