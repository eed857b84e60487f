//! Response body rewriting.
//!
//! Splices a rendered fragment into an HTML payload immediately ahead of
//! the first closing body tag. The search runs over the fully concatenated
//! body bytes, so a marker straddling chunk boundaries is still found, and
//! everything outside the replaced marker stays byte-for-byte identical.
//!
//! A body without the marker is returned unchanged - a silent no-op, not
//! an error. Binary bodies are unsupported input; the byte-level search
//! simply leaves them alone unless the marker bytes happen to occur.

use bytes::Bytes;

/// The closing-body marker the fragment is spliced ahead of.
pub const BODY_CLOSE_TAG: &str = "</body>";

/// Splices `fragment` immediately ahead of the first [`BODY_CLOSE_TAG`]
/// in `body`.
///
/// Returns `None` when the marker is absent; only the first of several
/// markers is rewritten.
#[must_use]
pub fn inject(body: &[u8], fragment: &str) -> Option<Bytes> {
    let at = find(body, BODY_CLOSE_TAG.as_bytes())?;

    let mut rewritten = Vec::with_capacity(body.len() + fragment.len());
    rewritten.extend_from_slice(&body[..at]);
    rewritten.extend_from_slice(fragment.as_bytes());
    rewritten.extend_from_slice(&body[at..]);
    Some(Bytes::from(rewritten))
}

/// Concatenates `chunks` into one blob and splices `fragment` ahead of the
/// first marker, returning the single-chunk result.
///
/// Without a marker the concatenated body is returned unchanged.
#[must_use]
pub fn inject_chunks<'a, I>(chunks: I, fragment: &str) -> Bytes
where
    I: IntoIterator<Item = &'a [u8]>,
{
    let mut body = Vec::new();
    for chunk in chunks {
        body.extend_from_slice(chunk);
    }
    inject(&body, fragment).unwrap_or_else(|| Bytes::from(body))
}

/// First occurrence of `needle` in `haystack`.
fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
