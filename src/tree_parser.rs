// Drives the tokenizer and builds a `node::Document`.
//
// Tolerance rules live here rather than in the tokenizer: an unmatched end
// tag is silently dropped, and mismatched nesting is repaired by walking up
// the ancestor chain rather than raising an error (see `close_tag`).

use crate::attrs::OwnedAttributes;
use crate::node::{Document, NodeData, NodeId};
use crate::token::{ascii_eq_ignore_case, Token, Tokenizer};

/// Tags whose start tag never opens a child scope.
const VOID_ELEMENTS: &[&[u8]] = &[
    b"area", b"base", b"br", b"col", b"embed", b"hr", b"img", b"input", b"link", b"meta",
    b"param", b"source", b"track", b"wbr",
];

fn is_void_element(name: &[u8]) -> bool {
    VOID_ELEMENTS.iter().any(|v| ascii_eq_ignore_case(name, v))
}

/// Parse a full HTML byte buffer into a node tree.
pub fn parse(html: &[u8]) -> Document {
    let mut doc = Document::new();
    let mut insertion_point = doc.root();
    let mut tokenizer = Tokenizer::new(html);

    loop {
        match tokenizer.next() {
            Token::StartTag { name, attributes } => {
                let tag_name = String::from_utf8_lossy(name).into_owned();
                let owned_attrs = OwnedAttributes::from_borrowed(&attributes);
                let id = doc.push_child(
                    insertion_point,
                    NodeData::Element {
                        tag_name,
                        attributes: owned_attrs,
                    },
                );
                if !is_void_element(name) {
                    insertion_point = id;
                }
            }
            Token::EndTag { name } => {
                match close_tag(&doc, insertion_point, name) {
                    Some(new_point) => insertion_point = new_point,
                    None => {
                        #[cfg(feature = "tracing")]
                        tracing::debug!(
                            end_tag = %String::from_utf8_lossy(name),
                            "discarding end tag with no matching ancestor"
                        );
                    }
                }
            }
            Token::Text(text) => {
                let trimmed = text.trim_ascii();
                if !trimmed.is_empty() {
                    let value = String::from_utf8_lossy(text).into_owned();
                    doc.push_child(insertion_point, NodeData::Text(value));
                }
            }
            Token::Comment(text) => {
                let value = String::from_utf8_lossy(text).into_owned();
                doc.push_child(insertion_point, NodeData::Comment(value));
            }
            Token::Doctype(_) => {}
            Token::Eof => break,
        }
    }

    doc
}

/// Finds where the insertion point should move to after an end tag, per
/// the tolerance rule: exact match on the current insertion point closes
/// it; otherwise walk ancestors for the nearest byte-exact name match.
/// Returns `None` if the end tag matches nothing (silently ignored).
fn close_tag(doc: &Document, insertion_point: NodeId, end_name: &[u8]) -> Option<NodeId> {
    if let Some(tag) = doc.tag_name(insertion_point) {
        if tag.as_bytes() == end_name {
            return doc.parent(insertion_point);
        }
    }
    let mut cursor = doc.parent(insertion_point);
    while let Some(id) = cursor {
        if let Some(tag) = doc.tag_name(id) {
            if tag.as_bytes() == end_name {
                return doc.parent(id);
            }
        }
        cursor = doc.parent(id);
    }
    None
}

trait TrimAscii {
    fn trim_ascii(&self) -> &Self;
}

impl TrimAscii for [u8] {
    fn trim_ascii(&self) -> &[u8] {
        let start = self
            .iter()
            .position(|b| !b.is_ascii_whitespace())
            .unwrap_or(self.len());
        let end = self
            .iter()
            .rposition(|b| !b.is_ascii_whitespace())
            .map(|i| i + 1)
            .unwrap_or(start);
        &self[start..end]
    }
}
