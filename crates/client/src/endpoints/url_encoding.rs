//! Percent-encoding for URL path segments.
//!
//! Dashboard uids are opaque strings chosen upstream; encoding them keeps a
//! hostile or merely unusual uid (slashes, spaces, `?`) from rewriting the
//! request path.

use percent_encoding::{AsciiSet, CONTROLS, percent_encode};

/// Characters percent-encoded in path segments, per RFC 3986 section 3.3
/// plus the separators that would change the URL's meaning.
const PATH_SEGMENT_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'|')
    .add(b'\\')
    .add(b'^')
    .add(b'%')
    .add(b'/')
    .add(b'?')
    .add(b'#');

/// Percent-encode a value for safe use as one URL path segment.
pub fn encode_path_segment(segment: &str) -> String {
    percent_encode(segment.as_bytes(), PATH_SEGMENT_ENCODE_SET).to_string()
}
