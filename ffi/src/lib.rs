// Manual ptr+len C ABI for embedding html-extract in a host that can't link
// Rust types directly. Exactly one tree-mode document and one streaming
// extractor are live at a time, process-wide — see `TREE`/`STREAM`. Strings
// crossing the boundary are raw UTF-8 byte slices (ptr + len pairs), never
// null-terminated.
//
// Every result-returning function here owns a small cache (`last_texts`)
// that the accessor functions below it index into; the cache is replaced,
// not appended to, on every query call, so pointers it hands out are only
// valid until the next query on the same state.

use std::slice;
use std::sync::Mutex;

use html_extract::{
    parse as parse_html, query_selector as query_selector_html,
    query_selector_all_text as query_selector_all_text_html,
    query_selector_attribute as query_selector_attribute_html, Document, StreamingExtractor,
    StreamingOptions,
};

struct TreeState {
    doc: Document,
    last_texts: Vec<String>,
}

static TREE: Mutex<Option<TreeState>> = Mutex::new(None);
static STREAM: Mutex<Option<StreamingExtractor>> = Mutex::new(None);

unsafe fn byte_slice<'a>(ptr: *const u8, len: usize) -> &'a [u8] {
    if ptr.is_null() || len == 0 {
        &[]
    } else {
        slice::from_raw_parts(ptr, len)
    }
}

unsafe fn str_arg<'a>(ptr: *const u8, len: usize) -> Option<&'a str> {
    std::str::from_utf8(byte_slice(ptr, len)).ok()
}

/// Allocate a `len`-byte buffer the host can copy input bytes into before
/// calling `parse`, `query_selector`, etc. Ownership transfers to the
/// caller, who must release it with `dealloc`.
#[no_mangle]
pub extern "C" fn alloc(len: usize) -> *mut u8 {
    let mut buf = vec![0u8; len].into_boxed_slice();
    let ptr = buf.as_mut_ptr();
    std::mem::forget(buf);
    ptr
}

/// # Safety
/// `ptr` must have been returned by `alloc` with this same `len`, and must
/// not already have been freed.
#[no_mangle]
pub unsafe extern "C" fn dealloc(ptr: *mut u8, len: usize) {
    if ptr.is_null() {
        return;
    }
    drop(Vec::from_raw_parts(ptr, len, len));
}

/// Parse an HTML buffer into the process-wide tree-mode document, replacing
/// whatever document was parsed previously.
///
/// # Safety
/// `html_ptr`/`html_len` must describe a valid, readable byte range.
#[no_mangle]
pub unsafe extern "C" fn parse(html_ptr: *const u8, html_len: usize) {
    let doc = parse_html(byte_slice(html_ptr, html_len));
    *TREE.lock().unwrap() = Some(TreeState {
        doc,
        last_texts: Vec::new(),
    });
}

/// Run a selector against the current document, caching the first match's
/// text for `get_result_text`/`get_result_text_len`.
///
/// Returns `1` if a match was found, `0` if not, `-1` on invalid UTF-8
/// selector input or invalid selector syntax, `-2` if `parse` was never
/// called.
///
/// # Safety
/// `selector_ptr`/`selector_len` must describe a valid, readable byte range.
#[no_mangle]
pub unsafe extern "C" fn query_selector(selector_ptr: *const u8, selector_len: usize) -> i32 {
    let Some(selector) = str_arg(selector_ptr, selector_len) else {
        return -1;
    };
    let mut guard = TREE.lock().unwrap();
    let Some(state) = guard.as_mut() else {
        return -2;
    };
    let Ok(found) = query_selector_html(&state.doc, selector) else {
        return -1;
    };
    match found {
        Some(id) => {
            state.last_texts = vec![state.doc.text_content(id)];
            1
        }
        None => {
            state.last_texts.clear();
            0
        }
    }
}

/// Pointer to the text cached by the most recent `query_selector` call that
/// found a match. Valid until the next `query_selector`/`query_selector_all_text`/
/// `query_selector_attribute`/`parse` call.
#[no_mangle]
pub extern "C" fn get_result_text() -> *const u8 {
    get_text_at(0)
}

#[no_mangle]
pub extern "C" fn get_result_text_len() -> usize {
    get_text_len_at(0)
}

/// Run a selector against the current document, caching every match's text.
/// Returns the match count, or `-1`/`-2` as in `query_selector`.
///
/// # Safety
/// `selector_ptr`/`selector_len` must describe a valid, readable byte range.
#[no_mangle]
pub unsafe extern "C" fn query_selector_all_text(
    selector_ptr: *const u8,
    selector_len: usize,
) -> i32 {
    let Some(selector) = str_arg(selector_ptr, selector_len) else {
        return -1;
    };
    let mut guard = TREE.lock().unwrap();
    let Some(state) = guard.as_mut() else {
        return -2;
    };
    match query_selector_all_text_html(&state.doc, selector) {
        Ok(texts) => {
            let count = texts.len() as i32;
            state.last_texts = texts;
            count
        }
        Err(_) => -1,
    }
}

/// Run a selector against the current document, caching the named
/// attribute's value for every match that has it. Returns the count, or
/// `-1`/`-2` as above.
///
/// # Safety
/// All four pointer/length pairs must describe valid, readable byte ranges.
#[no_mangle]
pub unsafe extern "C" fn query_selector_attribute(
    selector_ptr: *const u8,
    selector_len: usize,
    attr_ptr: *const u8,
    attr_len: usize,
) -> i32 {
    let (Some(selector), Some(attr_name)) = (
        str_arg(selector_ptr, selector_len),
        str_arg(attr_ptr, attr_len),
    ) else {
        return -1;
    };
    let mut guard = TREE.lock().unwrap();
    let Some(state) = guard.as_mut() else {
        return -2;
    };
    match query_selector_attribute_html(&state.doc, selector, attr_name) {
        Ok(values) => {
            let count = values.len() as i32;
            state.last_texts = values;
            count
        }
        Err(_) => -1,
    }
}

/// Pointer to cached result string `index`, from the most recent
/// `query_selector_all_text`/`query_selector_attribute` call. Null if out
/// of range or nothing was cached.
#[no_mangle]
pub extern "C" fn get_text_at(index: usize) -> *const u8 {
    let guard = TREE.lock().unwrap();
    match guard.as_ref().and_then(|s| s.last_texts.get(index)) {
        Some(s) => s.as_ptr(),
        None => std::ptr::null(),
    }
}

#[no_mangle]
pub extern "C" fn get_text_len_at(index: usize) -> usize {
    let guard = TREE.lock().unwrap();
    guard
        .as_ref()
        .and_then(|s| s.last_texts.get(index))
        .map(|s| s.len())
        .unwrap_or(0)
}

/// Drop the process-wide tree-mode document.
#[no_mangle]
pub extern "C" fn cleanup() {
    *TREE.lock().unwrap() = None;
}

/// Replace the process-wide streaming extractor with a fresh one.
#[no_mangle]
pub extern "C" fn streaming_init() {
    *STREAM.lock().unwrap() = Some(StreamingExtractor::new(StreamingOptions::default()));
}

/// Register a selector on the current streaming extractor. Returns `0` on
/// success, `-1` on invalid UTF-8 or invalid selector syntax, `-2` if
/// `streaming_init` was never called.
///
/// # Safety
/// `selector_ptr`/`selector_len` must describe a valid, readable byte range.
#[no_mangle]
pub unsafe extern "C" fn streaming_add_selector(
    selector_ptr: *const u8,
    selector_len: usize,
) -> i32 {
    let Some(selector) = str_arg(selector_ptr, selector_len) else {
        return -1;
    };
    let mut guard = STREAM.lock().unwrap();
    let Some(extractor) = guard.as_mut() else {
        return -2;
    };
    match extractor.add_selector(selector) {
        Ok(()) => 0,
        Err(_) => -1,
    }
}

/// Feed a chunk of bytes to the current streaming extractor. No-op if
/// `streaming_init` was never called.
///
/// # Safety
/// `chunk_ptr`/`chunk_len` must describe a valid, readable byte range.
#[no_mangle]
pub unsafe extern "C" fn streaming_feed(chunk_ptr: *const u8, chunk_len: usize) {
    let chunk = byte_slice(chunk_ptr, chunk_len);
    if let Some(extractor) = STREAM.lock().unwrap().as_mut() {
        extractor.feed(chunk);
    }
}

/// Flush any elements left open at end of input.
#[no_mangle]
pub extern "C" fn streaming_finish() {
    if let Some(extractor) = STREAM.lock().unwrap().as_mut() {
        extractor.finish();
    }
}

/// Number of matches recorded for the selector registered under `key`
/// (its canonical form, e.g. `.price`, `#title`, `div`, `[href]`). Returns
/// `-1` if the key was never registered or `streaming_init` was never
/// called.
///
/// # Safety
/// `key_ptr`/`key_len` must describe a valid, readable byte range.
#[no_mangle]
pub unsafe extern "C" fn streaming_get_match_count(key_ptr: *const u8, key_len: usize) -> i32 {
    let Some(key) = str_arg(key_ptr, key_len) else {
        return -1;
    };
    let guard = STREAM.lock().unwrap();
    guard
        .as_ref()
        .and_then(|e| e.get_matches(key))
        .map(|m| m.len() as i32)
        .unwrap_or(-1)
}

/// # Safety
/// `key_ptr`/`key_len` must describe a valid, readable byte range.
#[no_mangle]
pub unsafe extern "C" fn streaming_get_match_text(
    key_ptr: *const u8,
    key_len: usize,
    index: usize,
) -> *const u8 {
    let Some(key) = str_arg(key_ptr, key_len) else {
        return std::ptr::null();
    };
    let guard = STREAM.lock().unwrap();
    guard
        .as_ref()
        .and_then(|e| e.get_matches(key))
        .and_then(|m| m.get(index))
        .map(|m| m.text.as_ptr())
        .unwrap_or(std::ptr::null())
}

/// # Safety
/// `key_ptr`/`key_len` must describe a valid, readable byte range.
#[no_mangle]
pub unsafe extern "C" fn streaming_get_match_text_len(
    key_ptr: *const u8,
    key_len: usize,
    index: usize,
) -> usize {
    let Some(key) = str_arg(key_ptr, key_len) else {
        return 0;
    };
    let guard = STREAM.lock().unwrap();
    guard
        .as_ref()
        .and_then(|e| e.get_matches(key))
        .and_then(|m| m.get(index))
        .map(|m| m.text.len())
        .unwrap_or(0)
}

/// # Safety
/// All pointer/length pairs must describe valid, readable byte ranges.
#[no_mangle]
pub unsafe extern "C" fn streaming_get_match_attribute(
    key_ptr: *const u8,
    key_len: usize,
    index: usize,
    attr_ptr: *const u8,
    attr_len: usize,
) -> *const u8 {
    let (Some(key), Some(attr_name)) = (
        str_arg(key_ptr, key_len),
        str_arg(attr_ptr, attr_len),
    ) else {
        return std::ptr::null();
    };
    let guard = STREAM.lock().unwrap();
    guard
        .as_ref()
        .and_then(|e| e.get_match_attribute(key, index, attr_name))
        .map(|v| v.as_ptr())
        .unwrap_or(std::ptr::null())
}

/// # Safety
/// All pointer/length pairs must describe valid, readable byte ranges.
#[no_mangle]
pub unsafe extern "C" fn streaming_get_match_attribute_len(
    key_ptr: *const u8,
    key_len: usize,
    index: usize,
    attr_ptr: *const u8,
    attr_len: usize,
) -> usize {
    let (Some(key), Some(attr_name)) = (
        str_arg(key_ptr, key_len),
        str_arg(attr_ptr, attr_len),
    ) else {
        return 0;
    };
    let guard = STREAM.lock().unwrap();
    guard
        .as_ref()
        .and_then(|e| e.get_match_attribute(key, index, attr_name))
        .map(|v| v.len())
        .unwrap_or(0)
}

/// Drop the process-wide streaming extractor.
#[no_mangle]
pub extern "C" fn streaming_cleanup() {
    *STREAM.lock().unwrap() = None;
}
