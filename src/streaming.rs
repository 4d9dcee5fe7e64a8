// Incremental, DOM-free extraction over arbitrary byte chunks.
//
// The central invariant is the chunk boundary rule: a start tag is only
// committed once its closing `>` has been observed in the buffer. `drain`
// re-tokenizes from the front of the (still-unconsumed) buffer on every
// call; since `Tokenizer` is a cheap cursor over a borrowed slice, this
// costs nothing beyond the bytes actually scanned, and there is no token
// re-parsing: whatever `drain` commits is removed from the buffer before
// the caller feeds more.

use crate::attrs::OwnedAttributes;
use crate::error::SelectorError;
use crate::selector::{ElementView, Selector};
use crate::token::{ascii_eq_ignore_case, Token, Tokenizer};

const VOID_ELEMENTS: &[&[u8]] = &[
    b"area", b"base", b"br", b"col", b"embed", b"hr", b"img", b"input", b"link", b"meta",
    b"param", b"source", b"track", b"wbr",
];

fn is_void_element(name: &[u8]) -> bool {
    VOID_ELEMENTS.iter().any(|v| ascii_eq_ignore_case(name, v))
}

/// A finalized, owned match — appended to its selector's result bucket
/// once the matched element's start tag's scope closes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    pub text: String,
    pub attributes: OwnedAttributes,
}

/// Tunables left to the caller's discretion (not dictated by the
/// extraction semantics).
#[derive(Debug, Clone)]
pub struct StreamingOptions {
    /// Logs a warning (via `tracing`, when enabled) once the unconsumed
    /// buffer exceeds this many bytes without finding a token boundary —
    /// e.g. an attacker feeding an endless unterminated start tag. Purely
    /// observational: it does not change extraction results.
    pub max_buffer_bytes: Option<usize>,
}

impl Default for StreamingOptions {
    fn default() -> Self {
        Self {
            max_buffer_bytes: Some(8 * 1024 * 1024),
        }
    }
}

struct ElementState {
    tag_name: String,
    attributes: OwnedAttributes,
    /// Finalized, trimmed-and-joined text accumulated so far.
    text: String,
    /// Raw, untrimmed text collected since the last flush. Kept separate
    /// from `text` because a single original text run can arrive as
    /// several `Text` tokens purely due to chunk boundaries (see
    /// `drain`'s boundary rule) — those must be concatenated verbatim
    /// before trimming, or the chunk split would itself inject or erase
    /// whitespace that was never there. `flush_pending` is what turns this
    /// into a genuine "separate segment" join into `text`.
    pending_text: String,
    matched: bool,
    selector_index: Option<usize>,
}

impl ElementState {
    fn flush_pending(&mut self) {
        if self.pending_text.is_empty() {
            return;
        }
        let trimmed = self
            .pending_text
            .trim_matches(|c: char| c.is_ascii_whitespace());
        if !trimmed.is_empty() {
            if !self.text.is_empty() && !self.text.ends_with(' ') {
                self.text.push(' ');
            }
            self.text.push_str(trimmed);
        }
        self.pending_text.clear();
    }
}

struct LiveElement<'a> {
    tag_name: &'a str,
    attributes: &'a OwnedAttributes,
}

impl<'a> ElementView for LiveElement<'a> {
    fn tag_name(&self) -> &str {
        self.tag_name
    }
    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name)
    }
}

/// Owned, already-detached token contents — produced inside `drain` so the
/// borrow of `self.buffer` ends before we go on to mutate `self`.
enum Committed {
    StartTag {
        name: String,
        attributes: OwnedAttributes,
    },
    EndTag {
        name: String,
    },
    Text(String),
    Ignored,
}

pub struct StreamingExtractor {
    options: StreamingOptions,
    selectors: Vec<Selector>,
    results: Vec<Vec<MatchResult>>,
    buffer: Vec<u8>,
    stack: Vec<ElementState>,
    current: Option<ElementState>,
    depth: usize,
}

impl Default for StreamingExtractor {
    fn default() -> Self {
        Self::new(StreamingOptions::default())
    }
}

impl StreamingExtractor {
    pub fn new(options: StreamingOptions) -> Self {
        Self {
            options,
            selectors: Vec::new(),
            results: Vec::new(),
            buffer: Vec::new(),
            stack: Vec::new(),
            current: None,
            depth: 0,
        }
    }

    /// Must be called before any `feed`.
    pub fn add_selector(&mut self, source: &str) -> Result<(), SelectorError> {
        let selector = Selector::parse(source)?;
        #[cfg(feature = "tracing")]
        tracing::debug!(selector = %selector.canonical_key(), "registered streaming selector");
        self.selectors.push(selector);
        self.results.push(Vec::new());
        Ok(())
    }

    pub fn feed(&mut self, chunk: &[u8]) {
        self.buffer.extend_from_slice(chunk);
        self.drain();
        if let Some(max) = self.options.max_buffer_bytes {
            if self.buffer.len() > max {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    buffered = self.buffer.len(),
                    limit = max,
                    "streaming buffer exceeds configured limit without a token boundary"
                );
            }
        }
    }

    pub fn finish(&mut self) {
        self.drain();
        if let Some(el) = self.current.take() {
            self.finalize(el);
        }
        while let Some(el) = self.stack.pop() {
            self.finalize(el);
        }
        self.buffer.clear();
        self.depth = 0;
    }

    fn drain(&mut self) {
        let mut pos = 0usize;
        loop {
            let committed = {
                let mut tokenizer = Tokenizer::new(&self.buffer[pos..]);
                let tok = tokenizer.next();
                if tok.is_eof() {
                    break;
                }
                if matches!(tok, Token::StartTag { .. }) && tokenizer.start_tag_incomplete() {
                    // Boundary rule: a start tag with no closing `>`
                    // observed yet. Leave it in the buffer.
                    break;
                }
                let advance = tokenizer.checkpoint();
                let committed = to_owned_token(tok);
                pos += advance;
                committed
            };
            self.apply(committed);
        }
        if pos > 0 {
            #[cfg(feature = "tracing")]
            tracing::trace!(bytes = pos, remaining = self.buffer.len() - pos, "compacting streaming buffer");
            self.buffer.drain(0..pos);
        }
    }

    fn apply(&mut self, token: Committed) {
        match token {
            Committed::StartTag { name, attributes } => self.handle_start_tag(name, attributes),
            Committed::EndTag { name } => self.handle_end_tag(&name),
            Committed::Text(text) => self.handle_text(&text),
            Committed::Ignored => {}
        }
    }

    fn handle_start_tag(&mut self, name: String, attributes: OwnedAttributes) {
        if let Some(mut prev) = self.current.take() {
            // `prev` stops being "current" here, so whatever it has seen
            // so far is a complete segment — flush it now, before this
            // child potentially resumes it later as a "separate segment".
            prev.flush_pending();
            self.stack.push(prev);
        }

        let selector_index = self.first_matching_selector(&name, &attributes);
        let is_void = is_void_element(name.as_bytes());
        let state = ElementState {
            tag_name: name,
            attributes,
            text: String::new(),
            pending_text: String::new(),
            matched: selector_index.is_some(),
            selector_index,
        };

        if is_void {
            self.finalize(state);
        } else {
            self.current = Some(state);
            self.depth += 1;
        }
    }

    fn handle_end_tag(&mut self, name: &str) {
        if let Some(cur) = &self.current {
            if cur.tag_name == name {
                let el = self.current.take().unwrap();
                self.finalize(el);
                self.current = self.stack.pop();
                self.depth = self.depth.saturating_sub(1);
                return;
            }
        }
        if let Some(pos) = self.stack.iter().rposition(|e| e.tag_name == name) {
            let el = self.stack.remove(pos);
            self.finalize(el);
            self.depth = self.depth.saturating_sub(1);
        }
        // Otherwise: unmatched end tag, silently ignored.
    }

    fn handle_text(&mut self, text: &str) {
        if let Some(cur) = &mut self.current {
            if cur.matched {
                cur.pending_text.push_str(text);
            }
        }
    }

    fn finalize(&mut self, mut state: ElementState) {
        state.flush_pending();
        let Some(idx) = state.selector_index else {
            return;
        };
        self.results[idx].push(MatchResult {
            text: state.text,
            attributes: state.attributes,
        });
    }

    fn first_matching_selector(&self, tag_name: &str, attributes: &OwnedAttributes) -> Option<usize> {
        let view = LiveElement { tag_name, attributes };
        self.selectors.iter().position(|s| s.matches_element(&view))
    }

    fn index_of_key(&self, key: &str) -> Option<usize> {
        self.selectors
            .iter()
            .position(|s| s.canonical_key() == key)
    }

    pub fn get_matches(&self, key: &str) -> Option<&[MatchResult]> {
        self.index_of_key(key).map(|i| self.results[i].as_slice())
    }

    pub fn get_matches_text(&self, key: &str) -> Option<Vec<&str>> {
        self.get_matches(key)
            .map(|m| m.iter().map(|r| r.text.as_str()).collect())
    }

    pub fn get_match_attribute(&self, key: &str, index: usize, attr_name: &str) -> Option<&str> {
        self.get_matches(key)?.get(index)?.attributes.get(attr_name)
    }

    /// Current nesting depth (ignoring void elements, which never open a
    /// scope). Exposed mainly for tests of the boundary rule.
    pub fn depth(&self) -> usize {
        self.depth
    }
}

fn to_owned_token(token: Token<'_>) -> Committed {
    match token {
        Token::StartTag { name, attributes } => Committed::StartTag {
            name: String::from_utf8_lossy(name).into_owned(),
            attributes: OwnedAttributes::from_borrowed(&attributes),
        },
        Token::EndTag { name } => Committed::EndTag {
            name: String::from_utf8_lossy(name).into_owned(),
        },
        Token::Text(text) => Committed::Text(String::from_utf8_lossy(text).into_owned()),
        Token::Comment(_) | Token::Doctype(_) | Token::Eof => Committed::Ignored,
    }
}
