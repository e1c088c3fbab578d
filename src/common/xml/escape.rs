use aho_corasick::{AhoCorasick, MatchKind};
use once_cell::sync::Lazy;
use std::borrow::Cow;

// Built once, shared by every serializer
static XML_ESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .build(["&", "<", ">", "\"", "'"])
        .expect("Failed to build XML escaper")
});

// LeftmostLongest so "&amp;lt;" decodes to "&lt;" and not "<"
static XML_UNESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .match_kind(MatchKind::LeftmostLongest)
        .build(["&amp;", "&lt;", "&gt;", "&quot;", "&apos;"])
        .expect("Failed to build XML unescaper")
});

/// Escape XML special characters for use in text or attribute values.
///
/// # Examples
///
/// ```
/// use sdlppx::common::xml::escape_xml;
/// assert_eq!(escape_xml("de-DE/a & b.sdlxliff"), "de-DE/a &amp; b.sdlxliff");
/// assert_eq!(escape_xml("<tag>\"hello\"</tag>"), "&lt;tag&gt;&quot;hello&quot;&lt;/tag&gt;");
/// ```
#[inline]
pub fn escape_xml(s: &str) -> String {
    XML_ESCAPER.replace_all(s, &["&amp;", "&lt;", "&gt;", "&quot;", "&apos;"])
}

/// Unescape the five predefined XML entities.
///
/// Unknown or malformed entities, including character references, are left
/// unchanged.
///
/// # Examples
///
/// ```
/// use sdlppx::common::xml::unescape_xml;
/// assert_eq!(unescape_xml("&lt;a &amp; b&gt;"), "<a & b>");
/// assert_eq!(unescape_xml("&amp;lt;"), "&lt;");
/// assert_eq!(unescape_xml("&invalid;"), "&invalid;");
/// ```
#[inline]
pub fn unescape_xml(s: &str) -> String {
    XML_UNESCAPER.replace_all(s, &["&", "<", ">", "\"", "'"])
}

/// Normalize a raw attribute value so it can be written between double quotes.
///
/// Values read from single-quoted attributes may legally contain `"`.
pub(crate) fn quote_safe(raw: &str) -> Cow<'_, str> {
    if memchr::memchr(b'"', raw.as_bytes()).is_some() {
        Cow::Owned(raw.replace('"', "&quot;"))
    } else {
        Cow::Borrowed(raw)
    }
}
