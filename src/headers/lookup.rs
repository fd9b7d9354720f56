//! Header lookup over chunked header storage.
//!
//! # Responsibilities
//! - Present request headers as one ordered sequence of (name, value) pairs
//! - Scan for a named header case-insensitively, first match wins
//! - Tolerate empty chunks and a terminal chunk without error
//!
//! # Design Decisions
//! - Names compared with ASCII case folding (per HTTP spec)
//! - Values kept as raw bytes; interpretation belongs to the policy
//! - Lookup is allocation-free and linear in the number of headers

use axum::http::HeaderMap;

/// A single request header as seen by the classifier.
///
/// Borrows from storage owned by the request; the lookup never mutates or
/// copies header data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderEntry<'a> {
    /// Header name, ASCII, compared case-insensitively.
    pub name: &'a str,

    /// Raw header value bytes.
    pub value: &'a [u8],
}

impl<'a> HeaderEntry<'a> {
    /// Create a new entry.
    pub fn new(name: &'a str, value: &'a [u8]) -> Self {
        Self { name, value }
    }
}

/// An ordered view of request headers materialized as a chain of chunks.
///
/// Hosts that deliver headers in linked segments push one chunk per segment;
/// hosts with a contiguous map produce a single chunk. Traversal visits
/// chunks in insertion order and entries within a chunk by index.
#[derive(Debug, Default)]
pub struct HeaderView<'a> {
    chunks: Vec<Vec<HeaderEntry<'a>>>,
}

impl<'a> HeaderView<'a> {
    /// Create an empty view.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk of entries. Empty chunks are legal and skipped
    /// during traversal.
    pub fn push_chunk(&mut self, entries: Vec<HeaderEntry<'a>>) {
        self.chunks.push(entries);
    }

    /// Iterate all entries lazily, chunk by chunk.
    pub fn entries(&self) -> impl Iterator<Item = &HeaderEntry<'a>> {
        self.chunks.iter().flat_map(|chunk| chunk.iter())
    }

    /// Total number of entries across all chunks.
    pub fn len(&self) -> usize {
        self.chunks.iter().map(|chunk| chunk.len()).sum()
    }

    /// True if no chunk contains any entry.
    pub fn is_empty(&self) -> bool {
        self.chunks.iter().all(|chunk| chunk.is_empty())
    }

    /// Return the value of the first header named `name`, compared
    /// case-insensitively. Scanning stops at the first match, both within
    /// and across chunks; later duplicates are ignored.
    pub fn find(&self, name: &str) -> Option<&'a [u8]> {
        self.entries()
            .find(|entry| entry.name.eq_ignore_ascii_case(name))
            .map(|entry| entry.value)
    }
}

impl<'a> From<&'a HeaderMap> for HeaderView<'a> {
    /// Adapt the host's contiguous header map as a single-chunk view.
    fn from(map: &'a HeaderMap) -> Self {
        let entries = map
            .iter()
            .map(|(name, value)| HeaderEntry::new(name.as_str(), value.as_bytes()))
            .collect();
        Self {
            chunks: vec![entries],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn view_of<'a>(chunks: Vec<Vec<(&'a str, &'a [u8])>>) -> HeaderView<'a> {
        let mut view = HeaderView::new();
        for chunk in chunks {
            view.push_chunk(
                chunk
                    .into_iter()
                    .map(|(name, value)| HeaderEntry::new(name, value))
                    .collect(),
            );
        }
        view
    }

    #[test]
    fn test_absent_header() {
        let view = view_of(vec![vec![("host", b"example.com"), ("accept", b"*/*")]]);
        assert_eq!(view.find("X-Priority"), None);
    }

    #[test]
    fn test_empty_view() {
        let view = HeaderView::new();
        assert!(view.is_empty());
        assert_eq!(view.find("X-Priority"), None);
    }

    #[test]
    fn test_case_insensitive_match() {
        let view = view_of(vec![vec![("x-priority", b"high")]]);
        assert_eq!(view.find("X-Priority"), Some(b"high".as_slice()));
        assert_eq!(view.find("X-PRIORITY"), Some(b"high".as_slice()));

        let view = view_of(vec![vec![("X-PrIoRiTy", b"low")]]);
        assert_eq!(view.find("x-priority"), Some(b"low".as_slice()));
    }

    #[test]
    fn test_value_returned_unchanged() {
        let view = view_of(vec![vec![("x-priority", b"HiGhEsT")]]);
        assert_eq!(view.find("x-priority"), Some(b"HiGhEsT".as_slice()));
    }

    #[test]
    fn test_first_duplicate_wins_within_chunk() {
        let view = view_of(vec![vec![
            ("x-priority", b"first"),
            ("x-priority", b"second"),
        ]]);
        assert_eq!(view.find("x-priority"), Some(b"first".as_slice()));
    }

    #[test]
    fn test_first_duplicate_wins_across_chunks() {
        let view = view_of(vec![
            vec![("host", b"example.com")],
            vec![("x-priority", b"early")],
            vec![("x-priority", b"late")],
        ]);
        assert_eq!(view.find("x-priority"), Some(b"early".as_slice()));
    }

    #[test]
    fn test_empty_chunks_skipped() {
        let view = view_of(vec![
            vec![],
            vec![("host", b"example.com")],
            vec![],
            vec![("x-premium-user", b"true")],
        ]);
        assert_eq!(view.find("X-Premium-User"), Some(b"true".as_slice()));
        assert_eq!(view.len(), 2);
    }

    #[test]
    fn test_from_header_map() {
        let mut map = HeaderMap::new();
        map.insert("x-priority", HeaderValue::from_static("high"));
        map.insert("host", HeaderValue::from_static("example.com"));

        let view = HeaderView::from(&map);
        assert_eq!(view.find("X-Priority"), Some(b"high".as_slice()));
        assert_eq!(view.find("HOST"), Some(b"example.com".as_slice()));
        assert_eq!(view.find("x-missing"), None);
    }
}
