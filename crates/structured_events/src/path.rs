//! Name path codec for dot-delimited event namespaces.
//!
//! Event names are separator-delimited paths (`"user.profile.update"`) that
//! address nodes in the namespace tree. A single name argument may also carry
//! several whitespace-separated paths (`"change blur"`), each of which expands
//! to its own registration or dispatch. A trailing `"*"` segment is the
//! wildcard suffix: it addresses a namespace's descendants rather than the
//! namespace itself.

use compact_str::CompactString;
use smallvec::SmallVec;

/// Path segments split out of a single event name.
///
/// Most paths are shallow, so segments are kept inline.
pub(crate) type Segments = SmallVec<[CompactString; 4]>;

/// Splits a single event name into path segments on `separator`.
///
/// Empty segments are dropped, so `"a..b"` and `".a.b."` both resolve to
/// `["a", "b"]`. An empty name yields no segments.
pub(crate) fn split(name: &str, separator: &str) -> Segments {
    name.split(separator)
        .filter(|segment| !segment.is_empty())
        .map(CompactString::new)
        .collect()
}

/// Expands a name argument into its whitespace-separated single names.
///
/// `"change blur"` yields `"change"` then `"blur"`; a single path yields
/// itself; an empty or all-whitespace name yields nothing.
pub(crate) fn expand(name: &str) -> std::str::SplitWhitespace<'_> {
    name.split_whitespace()
}

/// Consumes a trailing `"*"` wildcard segment if present.
///
/// Returns `true` and pops the marker when the last segment is exactly `"*"`,
/// leaving `segments` as the path used for lookup. The effective terminal
/// segment is then the former second-to-last segment.
pub(crate) fn strip_wildcard(segments: &mut Segments) -> bool {
    if segments.last().map(CompactString::as_str) == Some("*") {
        segments.pop();
        true
    } else {
        false
    }
}
