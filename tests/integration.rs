// End-to-end API tests for tree-mode extraction.

use pretty_assertions::assert_eq;

use html_extract::{parse, query_selector, query_selector_all, query_selector_all_text,
    query_selector_attribute, query_selector_text};

#[test]
fn scenario_simple_paragraph() {
    let doc = parse(b"<div><p>Hello</p></div>");
    assert_eq!(query_selector_text(&doc, "p").unwrap().as_deref(), Some("Hello"));
    assert_eq!(query_selector_all(&doc, "div").unwrap().len(), 1);
}

#[test]
fn scenario_attribute_extraction() {
    let doc = parse(br#"<a href="test.html" class='link'>Link</a>"#);
    let hrefs = query_selector_attribute(&doc, "a", "href").unwrap();
    assert_eq!(hrefs, vec!["test.html".to_string()]);
}

#[test]
fn scenario_void_elements_stay_childless() {
    let doc = parse(br#"<div><img src="x.png"/><br/><input type="text"/></div>"#);
    let div = query_selector(&doc, "div").unwrap().unwrap();
    assert_eq!(doc.children(div).len(), 3);
}

#[test]
fn scenario_malformed_unclosed_p_is_repaired() {
    let doc = parse(b"<div><p>Hi</div>");
    assert_eq!(query_selector_text(&doc, "p").unwrap().as_deref(), Some("Hi"));
}

#[test]
fn empty_input_has_no_matches() {
    let doc = parse(b"");
    assert_eq!(query_selector(&doc, "*").unwrap(), None);
}

#[test]
fn query_selector_all_text_preserves_document_order() {
    let doc = parse(b"<ul><li>One</li><li>Two</li><li>Three</li></ul>");
    let texts = query_selector_all_text(&doc, "li").unwrap();
    assert_eq!(texts, vec!["One", "Two", "Three"]);
}

#[test]
fn class_selector_matches_one_token_among_several() {
    let doc = parse(br#"<span class="item price sale">$1</span>"#);
    assert!(query_selector(&doc, ".price").unwrap().is_some());
    assert!(query_selector(&doc, ".missing").unwrap().is_none());
}

#[test]
fn id_selector_is_byte_exact() {
    let doc = parse(br#"<div id="Title">x</div>"#);
    assert!(query_selector(&doc, "#Title").unwrap().is_some());
    assert!(query_selector(&doc, "#title").unwrap().is_none());
}

#[test]
fn attribute_presence_selector() {
    let doc = parse(br#"<input disabled><input>"#);
    assert_eq!(query_selector_all(&doc, "[disabled]").unwrap().len(), 1);
}

#[test]
fn invalid_selector_is_an_error_not_a_panic() {
    let doc = parse(b"<div></div>");
    assert!(query_selector(&doc, "").is_err());
    assert!(query_selector(&doc, "#").is_err());
    assert!(query_selector(&doc, ".").is_err());
    assert!(query_selector(&doc, "[a").is_err());
}
