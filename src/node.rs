// The tree-mode node tree.
//
// Modeled as an arena: `Document` owns a flat `Vec<NodeRecord>`, children
// reference siblings by index, and the parent back-reference is a plain
// index rather than an `Rc`/`Weak` pair. The tree is acyclic by
// construction (nodes are only ever appended, never reparented), and the
// whole arena drops together when `Document` drops — there is no separate
// ownership story for the "weak" parent pointer to get wrong.

use crate::attrs::OwnedAttributes;
use crate::selector::ElementView;

pub type NodeId = usize;

#[derive(Debug, Clone, PartialEq)]
pub enum NodeData {
    Document,
    Element {
        tag_name: String,
        attributes: OwnedAttributes,
    },
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone)]
pub struct NodeRecord {
    pub data: NodeData,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// An HTML document tree rooted at a `Document` node (always index 0).
pub struct Document {
    nodes: Vec<NodeRecord>,
}

impl Document {
    pub(crate) fn new() -> Self {
        Self {
            nodes: vec![NodeRecord {
                data: NodeData::Document,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        0
    }

    pub fn node(&self, id: NodeId) -> &NodeRecord {
        &self.nodes[id]
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].parent
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.nodes[id].data, NodeData::Element { .. })
    }

    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id].data {
            NodeData::Element { tag_name, .. } => Some(tag_name),
            _ => None,
        }
    }

    pub fn attributes(&self, id: NodeId) -> Option<&OwnedAttributes> {
        match &self.nodes[id].data {
            NodeData::Element { attributes, .. } => Some(attributes),
            _ => None,
        }
    }

    /// Depth-first traversal, single-space-joined trimmed text, comments
    /// skipped. Leading/trailing whitespace is trimmed per text segment;
    /// the final string is not further trimmed.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        match &self.nodes[id].data {
            NodeData::Text(text) => {
                let trimmed = text.trim_matches(|c: char| c.is_ascii_whitespace());
                if !trimmed.is_empty() {
                    if !out.is_empty() && !out.ends_with(' ') {
                        out.push(' ');
                    }
                    out.push_str(trimmed);
                }
            }
            NodeData::Comment(_) => {}
            NodeData::Document | NodeData::Element { .. } => {
                for &child in &self.nodes[id].children {
                    self.collect_text(child, out);
                }
            }
        }
    }

    pub(crate) fn push_child(&mut self, parent: NodeId, data: NodeData) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(NodeRecord {
            data,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent].children.push(id);
        id
    }
}

/// Adapter so `Selector::matches_element` can run against a tree node.
pub(crate) struct TreeElement<'a> {
    doc: &'a Document,
    id: NodeId,
}

impl<'a> TreeElement<'a> {
    pub(crate) fn new(doc: &'a Document, id: NodeId) -> Self {
        Self { doc, id }
    }
}

impl<'a> ElementView for TreeElement<'a> {
    fn tag_name(&self) -> &str {
        self.doc.tag_name(self.id).unwrap_or("")
    }
    fn attribute(&self, name: &str) -> Option<&str> {
        self.doc.attributes(self.id)?.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_has_no_parent_and_starts_empty() {
        let doc = Document::new();
        assert_eq!(doc.parent(doc.root()), None);
        assert!(doc.children(doc.root()).is_empty());
    }

    #[test]
    fn pushed_child_is_reachable_from_parent() {
        let mut doc = Document::new();
        let id = doc.push_child(
            doc.root(),
            NodeData::Element {
                tag_name: "div".into(),
                attributes: OwnedAttributes::new(),
            },
        );
        assert_eq!(doc.children(doc.root()), &[id]);
        assert_eq!(doc.parent(id), Some(doc.root()));
    }

    #[test]
    fn text_content_joins_with_single_space() {
        let mut doc = Document::new();
        let div = doc.push_child(
            doc.root(),
            NodeData::Element {
                tag_name: "div".into(),
                attributes: OwnedAttributes::new(),
            },
        );
        doc.push_child(div, NodeData::Text("  Hello  ".into()));
        doc.push_child(div, NodeData::Comment("skip me".into()));
        doc.push_child(div, NodeData::Text("World".into()));
        assert_eq!(doc.text_content(div), "Hello World");
    }
}
