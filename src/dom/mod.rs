//! Owned XML tree built once per file.
//!
//! The parser boundary for the whole crate: raw text goes in, an immutable
//! [`Document`] comes out. All traversal and lookup operate over this owned
//! structure — there are no live handles into the parser.
//!
//! Tags are used verbatim as written; XML namespaces are not interpreted.

mod parse;

pub use parse::parse_document;

/// Index of a node within its [`Document`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

/// One element node: tag, attributes in document order, accumulated own
/// text, and child elements.
#[derive(Debug, Clone)]
pub struct Element {
    pub tag: String,
    pub attributes: Vec<(String, String)>,
    /// Text directly inside this element (descendants excluded), trimmed.
    pub text: String,
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
}

/// A parsed XML document as an arena of element nodes.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Element>,
    root: NodeId,
}

impl Document {
    pub(crate) fn new(nodes: Vec<Element>, root: NodeId) -> Self {
        Self { nodes, root }
    }

    /// The document element.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Look up a node by id.
    pub fn node(&self, id: NodeId) -> &Element {
        &self.nodes[id.0]
    }

    /// Tag name of a node.
    pub fn tag(&self, id: NodeId) -> &str {
        &self.node(id).tag
    }

    /// Trimmed text directly inside the node, excluding descendants.
    pub fn own_text(&self, id: NodeId) -> &str {
        &self.node(id).text
    }

    /// Concatenated text of the node and all its descendants, in document
    /// order (DOM `textContent` semantics).
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        let node = self.node(id);
        out.push_str(&node.text);
        for &child in &node.children {
            self.collect_text(child, out);
        }
    }

    /// Child elements of a node.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.node(id).children.iter().copied()
    }

    /// First direct child with the given tag.
    pub fn child_by_tag(&self, id: NodeId, tag: &str) -> Option<NodeId> {
        self.children(id).find(|&c| self.tag(c) == tag)
    }

    /// The node itself and all descendants, pre-order (document order).
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            doc: self,
            stack: vec![id],
        }
    }

    /// First node (the start node included) with the given tag, searching
    /// pre-order below `id`.
    pub fn first_by_tag(&self, id: NodeId, tag: &str) -> Option<NodeId> {
        self.descendants(id).find(|&n| self.tag(n) == tag)
    }

    /// Every node below (and including) `id` with the given tag, in
    /// document order.
    pub fn all_by_tag(&self, id: NodeId, tag: &str) -> Vec<NodeId> {
        self.descendants(id)
            .filter(|&n| self.tag(n) == tag)
            .collect()
    }

    /// Trimmed text of the first descendant with the given tag, or empty.
    pub fn first_text(&self, id: NodeId, tag: &str) -> &str {
        self.first_by_tag(id, tag)
            .map(|n| self.own_text(n))
            .unwrap_or("")
    }

    /// Resolve a dotted tag-name path starting at `start`.
    ///
    /// A leading segment equal to the root tag re-anchors the search at the
    /// document root. Each remaining segment prefers a direct child, then
    /// falls back to a recursive descendant search (the current node itself
    /// qualifies).
    pub fn find_by_path(&self, start: NodeId, path: &str) -> Option<NodeId> {
        let mut parts = path.split('.');
        let mut current = start;

        let mut first = parts.next()?;
        if first == self.tag(self.root) {
            current = self.root;
            first = match parts.next() {
                Some(p) => p,
                None => return Some(current),
            };
        }

        let mut remaining = vec![first];
        remaining.extend(parts);

        for part in remaining {
            let next = self
                .child_by_tag(current, part)
                .or_else(|| self.first_by_tag(current, part))?;
            current = next;
        }
        Some(current)
    }

    /// Total number of element nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Pre-order traversal over a subtree.
pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        let node = self.doc.node(id);
        // Reverse push so children pop in document order
        for &child in node.children.iter().rev() {
            self.stack.push(child);
        }
        Some(id)
    }
}
