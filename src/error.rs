/// Errors raised while parsing a selector string.
///
/// Malformed HTML is never an error (see the tokenizer and tree parser,
/// which absorb it into text or silently ignore it); only selector parsing
/// is fallible at the Rust API.
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
#[non_exhaustive]
pub enum SelectorError {
    #[error("selector string is empty")]
    Empty,
    #[error("invalid selector: {0}")]
    Invalid(String),
}
