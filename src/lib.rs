// html-extract — a lenient HTML extraction library for web-scraping
// workloads.
//
// Architecture:
//   bytes → tokenizer → { tree mode: node tree → query engine
//                        { streaming mode: element stack → match results
//
// The tokenizer, selector matcher, and streaming extractor are the core;
// tree mode is the tokenizer plus a DOM-like tree and a depth-first query
// engine over it. Both modes share the same tokenizer and selector code —
// see `token`, `selector`.

mod attrs;
mod error;
mod node;
mod query;
mod selector;
mod streaming;
mod token;
mod tree_parser;

pub use error::SelectorError;
pub use node::{Document, NodeId};
pub use selector::{Selector, SelectorKind};
pub use streaming::{MatchResult, StreamingExtractor, StreamingOptions};

/// Parse an HTML byte buffer into a node tree (tree mode).
///
/// # Examples
///
/// ```
/// let doc = html_extract::parse(b"<div><p>Hello</p></div>");
/// let text = html_extract::query_selector_text(&doc, "p").unwrap();
/// assert_eq!(text.as_deref(), Some("Hello"));
/// ```
pub fn parse(html: &[u8]) -> Document {
    tree_parser::parse(html)
}

/// First element (pre-order, including the root) matching `selector`.
pub fn query_selector(doc: &Document, selector: &str) -> Result<Option<NodeId>, SelectorError> {
    let selector = Selector::parse(selector)?;
    Ok(query::query_selector(doc, &selector))
}

/// Convenience wrapper returning the matched element's extracted text.
pub fn query_selector_text(
    doc: &Document,
    selector: &str,
) -> Result<Option<String>, SelectorError> {
    Ok(query_selector(doc, selector)?.map(|id| doc.text_content(id)))
}

/// All elements (pre-order) matching `selector`.
pub fn query_selector_all(doc: &Document, selector: &str) -> Result<Vec<NodeId>, SelectorError> {
    let selector = Selector::parse(selector)?;
    Ok(query::query_selector_all(doc, &selector))
}

/// Extracted text content for every match of `selector`, in document order.
pub fn query_selector_all_text(
    doc: &Document,
    selector: &str,
) -> Result<Vec<String>, SelectorError> {
    let selector = Selector::parse(selector)?;
    Ok(query::query_selector_all_text(doc, &selector))
}

/// Named attribute value for every match of `selector` that has it.
pub fn query_selector_attribute(
    doc: &Document,
    selector: &str,
    attr_name: &str,
) -> Result<Vec<String>, SelectorError> {
    let selector = Selector::parse(selector)?;
    Ok(query::query_selector_attribute(doc, &selector, attr_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_one_hello_world() {
        let doc = parse(b"<div><p>Hello</p></div>");
        assert_eq!(
            query_selector_text(&doc, "p").unwrap().as_deref(),
            Some("Hello")
        );
        assert_eq!(query_selector_all(&doc, "div").unwrap().len(), 1);
    }

    #[test]
    fn scenario_two_attribute_extraction() {
        let doc = parse(br#"<a href="test.html" class='link'>Link</a>"#);
        let hrefs = query_selector_attribute(&doc, "a", "href").unwrap();
        assert_eq!(hrefs, vec!["test.html".to_string()]);
    }

    #[test]
    fn invalid_selector_surfaces_as_error() {
        let doc = parse(b"<div></div>");
        assert!(query_selector(&doc, "#").is_err());
        assert!(query_selector(&doc, "").is_err());
    }
}
