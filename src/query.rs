// Depth-first, pre-order query engine over a `node::Document`.

use crate::node::{Document, NodeId, TreeElement};
use crate::selector::Selector;

fn matches(doc: &Document, id: NodeId, selector: &Selector) -> bool {
    doc.is_element(id) && selector.matches_element(&TreeElement::new(doc, id))
}

/// First match in pre-order, including the root itself.
pub fn query_selector_from(doc: &Document, root: NodeId, selector: &Selector) -> Option<NodeId> {
    if matches(doc, root, selector) {
        return Some(root);
    }
    for &child in doc.children(root) {
        if let Some(found) = query_selector_from(doc, child, selector) {
            return Some(found);
        }
    }
    None
}

pub fn query_selector(doc: &Document, selector: &Selector) -> Option<NodeId> {
    query_selector_from(doc, doc.root(), selector)
}

pub fn query_selector_all_from(doc: &Document, root: NodeId, selector: &Selector) -> Vec<NodeId> {
    let mut out = Vec::new();
    collect(doc, root, selector, &mut out);
    out
}

pub fn query_selector_all(doc: &Document, selector: &Selector) -> Vec<NodeId> {
    query_selector_all_from(doc, doc.root(), selector)
}

fn collect(doc: &Document, id: NodeId, selector: &Selector, out: &mut Vec<NodeId>) {
    if matches(doc, id, selector) {
        out.push(id);
    }
    for &child in doc.children(id) {
        collect(doc, child, selector, out);
    }
}

pub fn query_selector_all_text(doc: &Document, selector: &Selector) -> Vec<String> {
    query_selector_all(doc, selector)
        .into_iter()
        .map(|id| doc.text_content(id))
        .collect()
}

pub fn query_selector_attribute(
    doc: &Document,
    selector: &Selector,
    attr_name: &str,
) -> Vec<String> {
    query_selector_all(doc, selector)
        .into_iter()
        .filter_map(|id| {
            doc.attributes(id)
                .and_then(|attrs| attrs.get(attr_name))
                .map(|v| v.to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree_parser::parse;

    #[test]
    fn query_selector_equals_first_of_query_selector_all() {
        let doc = parse(b"<ul><li>a</li><li>b</li></ul>");
        let sel = Selector::parse("li").unwrap();
        let first = query_selector(&doc, &sel);
        let all = query_selector_all(&doc, &sel);
        assert_eq!(first, all.first().copied());
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn attribute_lookup_across_matches() {
        let doc = parse(br#"<a href="one.html">One</a><a href="two.html">Two</a>"#);
        let sel = Selector::parse("a").unwrap();
        let hrefs = query_selector_attribute(&doc, &sel, "href");
        assert_eq!(hrefs, vec!["one.html", "two.html"]);
    }

    #[test]
    fn text_extraction_across_matches() {
        let doc = parse(b"<div><p>Hello</p></div>");
        let sel = Selector::parse("p").unwrap();
        let texts = query_selector_all_text(&doc, &sel);
        assert_eq!(texts, vec!["Hello".to_string()]);
    }
}
