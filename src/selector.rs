// Selector grammar: universal, tag, class, id, attribute.
//
// Parsed once at registration time, immutable thereafter. `matches` is
// expressed against an `ElementView` rather than directly against a tree
// node, so the same predicate serves both the tree query engine (views a
// `node::Document` node) and the streaming extractor (views a live,
// not-yet-finalized open-tag state) without duplicating matching logic.

use crate::error::SelectorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorKind {
    Universal,
    Tag,
    Class,
    Id,
    Attribute,
}

/// A parsed selector. `value` holds the tag/class/id/attribute-value text
/// depending on `kind`; `attr_name` is only populated for `Attribute`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    pub kind: SelectorKind,
    pub value: String,
    pub attr_name: Option<String>,
}

/// A read-only view of a single element, independent of how it's stored
/// (arena node vs. an in-flight streaming tag).
pub trait ElementView {
    fn tag_name(&self) -> &str;
    fn attribute(&self, name: &str) -> Option<&str>;
}

fn trim_ascii(s: &str) -> &str {
    s.trim_matches(|c: char| c.is_ascii_whitespace())
}

impl Selector {
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let trimmed = trim_ascii(input);
        if trimmed.is_empty() {
            return Err(SelectorError::Empty);
        }

        if trimmed == "*" {
            return Ok(Self {
                kind: SelectorKind::Universal,
                value: String::new(),
                attr_name: None,
            });
        }

        if let Some(rest) = trimmed.strip_prefix('#') {
            if rest.is_empty() {
                return Err(SelectorError::Invalid(input.to_string()));
            }
            return Ok(Self {
                kind: SelectorKind::Id,
                value: rest.to_string(),
                attr_name: None,
            });
        }

        if let Some(rest) = trimmed.strip_prefix('.') {
            if rest.is_empty() {
                return Err(SelectorError::Invalid(input.to_string()));
            }
            return Ok(Self {
                kind: SelectorKind::Class,
                value: rest.to_string(),
                attr_name: None,
            });
        }

        if let Some(rest) = trimmed.strip_prefix('[') {
            let close = rest
                .find(']')
                .ok_or_else(|| SelectorError::Invalid(input.to_string()))?;
            let body = trim_ascii(&rest[..close]);
            return Self::parse_attribute(body, input);
        }

        Ok(Self {
            kind: SelectorKind::Tag,
            value: trimmed.to_string(),
            attr_name: None,
        })
    }

    fn parse_attribute(body: &str, original: &str) -> Result<Self, SelectorError> {
        match body.find('=') {
            None => {
                let name = trim_ascii(body);
                if name.is_empty() {
                    return Err(SelectorError::Invalid(original.to_string()));
                }
                Ok(Self {
                    kind: SelectorKind::Attribute,
                    value: String::new(),
                    attr_name: Some(name.to_string()),
                })
            }
            Some(eq) => {
                let name = trim_ascii(&body[..eq]);
                let raw_value = trim_ascii(&body[eq + 1..]);
                if name.is_empty() {
                    return Err(SelectorError::Invalid(original.to_string()));
                }
                let value = strip_matching_quotes(raw_value);
                Ok(Self {
                    kind: SelectorKind::Attribute,
                    value: value.to_string(),
                    attr_name: Some(name.to_string()),
                })
            }
        }
    }

    pub fn matches_element(&self, view: &dyn ElementView) -> bool {
        match self.kind {
            SelectorKind::Universal => true,
            SelectorKind::Tag => view.tag_name().eq_ignore_ascii_case(&self.value),
            SelectorKind::Class => view
                .attribute("class")
                .map(|classes| classes.split_ascii_whitespace().any(|c| c == self.value))
                .unwrap_or(false),
            SelectorKind::Id => view.attribute("id") == Some(self.value.as_str()),
            SelectorKind::Attribute => {
                let name = self.attr_name.as_deref().unwrap_or("");
                match view.attribute(name) {
                    None => false,
                    Some(v) => self.value.is_empty() || v == self.value,
                }
            }
        }
    }

    /// Canonical textual form, used as the streaming result-bucket key.
    pub fn canonical_key(&self) -> String {
        match self.kind {
            SelectorKind::Universal => "*".to_string(),
            SelectorKind::Tag => self.value.clone(),
            SelectorKind::Class => format!(".{}", self.value),
            SelectorKind::Id => format!("#{}", self.value),
            SelectorKind::Attribute => {
                let name = self.attr_name.as_deref().unwrap_or("");
                if self.value.is_empty() {
                    format!("[{name}]")
                } else {
                    format!("[{name}={}]", self.value)
                }
            }
        }
    }
}

fn strip_matching_quotes(s: &str) -> &str {
    let bytes = s.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        let last = bytes[bytes.len() - 1];
        if (first == b'"' || first == b'\'') && first == last {
            return &s[1..s.len() - 1];
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture<'a> {
        tag: &'a str,
        attrs: Vec<(&'a str, &'a str)>,
    }
    impl<'a> ElementView for Fixture<'a> {
        fn tag_name(&self) -> &str {
            self.tag
        }
        fn attribute(&self, name: &str) -> Option<&str> {
            self.attrs
                .iter()
                .find(|(n, _)| n.eq_ignore_ascii_case(name))
                .map(|(_, v)| *v)
        }
    }

    #[test]
    fn universal_parses_with_whitespace() {
        assert_eq!(Selector::parse("*").unwrap().kind, SelectorKind::Universal);
        assert_eq!(
            Selector::parse("  *  ").unwrap().kind,
            SelectorKind::Universal
        );
    }

    #[test]
    fn class_parses_with_leading_whitespace() {
        let s = Selector::parse(".a").unwrap();
        assert_eq!(s.kind, SelectorKind::Class);
        assert_eq!(s.value, "a");
        let s = Selector::parse("  .a").unwrap();
        assert_eq!(s.value, "a");
    }

    #[test]
    fn empty_input_is_empty_selector() {
        assert_eq!(Selector::parse(""), Err(SelectorError::Empty));
        assert_eq!(Selector::parse("   "), Err(SelectorError::Empty));
    }

    #[test]
    fn bare_hash_or_dot_is_invalid() {
        assert!(matches!(
            Selector::parse("#"),
            Err(SelectorError::Invalid(_))
        ));
        assert!(matches!(
            Selector::parse("."),
            Err(SelectorError::Invalid(_))
        ));
    }

    #[test]
    fn attribute_presence_only() {
        let s = Selector::parse("[a]").unwrap();
        assert_eq!(s.kind, SelectorKind::Attribute);
        assert_eq!(s.attr_name.as_deref(), Some("a"));
        assert_eq!(s.value, "");
    }

    #[test]
    fn attribute_value_all_quoting_styles_equal() {
        let double = Selector::parse(r#"[a="b"]"#).unwrap();
        let single = Selector::parse("[a='b']").unwrap();
        let bare = Selector::parse("[a=b]").unwrap();
        assert_eq!(double.attr_name.as_deref(), Some("a"));
        assert_eq!(double.value, "b");
        assert_eq!(single.value, "b");
        assert_eq!(bare.value, "b");
    }

    #[test]
    fn missing_closing_bracket_is_invalid() {
        assert!(matches!(
            Selector::parse("[a"),
            Err(SelectorError::Invalid(_))
        ));
    }

    #[test]
    fn tag_matches_case_insensitively() {
        let sel = Selector::parse("DIV").unwrap();
        let el = Fixture { tag: "div", attrs: vec![] };
        assert!(sel.matches_element(&el));
    }

    #[test]
    fn class_matches_one_token_among_several() {
        let sel = Selector::parse(".price").unwrap();
        let el = Fixture {
            tag: "span",
            attrs: vec![("class", "item price sale")],
        };
        assert!(sel.matches_element(&el));
    }

    #[test]
    fn canonical_keys() {
        assert_eq!(Selector::parse("*").unwrap().canonical_key(), "*");
        assert_eq!(Selector::parse("div").unwrap().canonical_key(), "div");
        assert_eq!(Selector::parse(".a").unwrap().canonical_key(), ".a");
        assert_eq!(Selector::parse("#a").unwrap().canonical_key(), "#a");
        assert_eq!(Selector::parse("[a]").unwrap().canonical_key(), "[a]");
        assert_eq!(
            Selector::parse("[a=b]").unwrap().canonical_key(),
            "[a=b]"
        );
    }
}
