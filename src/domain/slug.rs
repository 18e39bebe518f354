//! Canonical, locale-independent content identifiers.
//!
//! Posts exist once per locale (`es/my-post`, `en/my-post`) but share every
//! counter. Storage is keyed by the canonical form, so the only way to build a
//! key is through [`CanonicalSlug::normalize`].

use std::fmt;

use serde::Serialize;

use super::locale::Locale;

/// Strip leading `<code>/` segments for every supported locale code.
///
/// Nested prefixes (`en/es/foo`) are stripped until none remain, which keeps
/// the function idempotent.
pub fn normalize_slug(raw: &str) -> &str {
    let mut current = raw;
    while let Some(rest) = strip_one_prefix(current) {
        current = rest;
    }
    current
}

fn strip_one_prefix(value: &str) -> Option<&str> {
    Locale::ALL.into_iter().find_map(|locale| {
        value
            .strip_prefix(locale.code())
            .and_then(|rest| rest.strip_prefix('/'))
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CanonicalSlug(String);

impl CanonicalSlug {
    pub fn normalize(raw: &str) -> Self {
        Self(normalize_slug(raw).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `raw` differs from its canonical form.
    pub fn is_prefixed(raw: &str) -> bool {
        normalize_slug(raw).len() != raw.len()
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for CanonicalSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalSlug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_locale_prefixes() {
        assert_eq!(normalize_slug("en/foo"), "foo");
        assert_eq!(normalize_slug("es/foo"), "foo");
        assert_eq!(normalize_slug("foo"), "foo");
        assert_eq!(normalize_slug("es/2024/foo"), "2024/foo");
    }

    #[test]
    fn leaves_lookalike_prefixes_untouched() {
        assert_eq!(normalize_slug("english/foo"), "english/foo");
        assert_eq!(normalize_slug("fr/foo"), "fr/foo");
        assert_eq!(normalize_slug("/en/foo"), "/en/foo");
        assert_eq!(normalize_slug("en"), "en");
    }

    #[test]
    fn empty_input_is_valid() {
        assert_eq!(normalize_slug(""), "");
        assert!(CanonicalSlug::normalize("en/").is_empty());
    }

    #[test]
    fn normalization_is_idempotent() {
        let samples = [
            "",
            "foo",
            "en/foo",
            "es/foo",
            "en/es/foo",
            "es/en/es/bar/baz",
            "en/",
            "es",
            "EN/foo",
            "ñandú/es/x",
        ];
        for sample in samples {
            let once = normalize_slug(sample);
            assert_eq!(normalize_slug(once), once, "input `{sample}`");
            assert!(!CanonicalSlug::is_prefixed(once), "input `{sample}`");
        }
    }

    #[test]
    fn canonical_slug_never_keeps_a_prefix() {
        assert_eq!(CanonicalSlug::normalize("en/es/foo").as_str(), "foo");
        assert!(CanonicalSlug::is_prefixed("en/foo"));
        assert!(!CanonicalSlug::is_prefixed("foo"));
    }
}
