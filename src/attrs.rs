// Owned, insertion-order-preserving attribute map.
//
// The tokenizer borrows attribute name/value slices straight out of the
// input buffer (see `token::AttributeMap`); everything downstream of the
// tokenizer (the node tree, streaming match results) needs an owned copy
// that outlives a single `feed`/`parse` call, so this is the owned sibling
// of that type, with the same last-value-wins insertion semantics.

use crate::token::AttributeMap as BorrowedAttributeMap;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OwnedAttributes {
    entries: Vec<(String, String)>,
}

impl OwnedAttributes {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(slot) = self
            .entries
            .iter_mut()
            .find(|(n, _)| n.eq_ignore_ascii_case(&name))
        {
            slot.1 = value;
        } else {
            self.entries.push((name, value));
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn from_borrowed(map: &BorrowedAttributeMap<'_>) -> Self {
        let mut out = Self::new();
        for (name, value) in map.iter() {
            out.insert(
                String::from_utf8_lossy(name).into_owned(),
                String::from_utf8_lossy(value).into_owned(),
            );
        }
        out
    }
}
