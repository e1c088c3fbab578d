//! Matching requested languages against a package's directions.

use super::descriptor::PackageLanguages;
use crate::common::{Error, LanguageRole, Result};

/// Canonical source and target codes selected for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLanguages {
    pub source: String,
    pub target: String,
}

/// Resolve `requested` against the codes valid for `role`.
///
/// An exact match wins; otherwise the first code equal ignoring ASCII case is
/// returned in the package's own casing.
pub fn resolve_language(requested: Option<&str>, valid: &[String], role: LanguageRole) -> Result<String> {
    let found = requested.and_then(|requested| {
        valid
            .iter()
            .find(|code| code.as_str() == requested)
            .or_else(|| valid.iter().find(|code| code.eq_ignore_ascii_case(requested)))
    });

    match found {
        Some(code) => Ok(code.clone()),
        None => Err(Error::InvalidLanguageSelection {
            role,
            requested: requested.map(str::to_string),
            valid: valid.to_vec(),
        }),
    }
}

impl PackageLanguages {
    /// Resolve both languages of a run. The target is checked first.
    pub fn resolve(&self, source: Option<&str>, target: Option<&str>) -> Result<ResolvedLanguages> {
        let target = resolve_language(target, self.target(), LanguageRole::Target)?;
        let source = resolve_language(source, self.source(), LanguageRole::Source)?;
        Ok(ResolvedLanguages { source, target })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn targets() -> Vec<String> {
        vec!["de-DE".to_string(), "fr-FR".to_string()]
    }

    #[rstest]
    #[case("de-DE", "de-DE")]
    #[case("DE-de", "de-DE")]
    #[case("de-de", "de-DE")]
    #[case("FR-FR", "fr-FR")]
    fn test_resolves_to_canonical_casing(#[case] requested: &str, #[case] expected: &str) {
        let resolved = resolve_language(Some(requested), &targets(), LanguageRole::Target).unwrap();
        assert_eq!(resolved, expected);
    }

    #[test]
    fn test_exact_match_preferred_over_case_insensitive() {
        let valid = vec!["EN-us".to_string(), "en-US".to_string()];
        assert_eq!(resolve_language(Some("en-US"), &valid, LanguageRole::Source).unwrap(), "en-US");
        assert_eq!(resolve_language(Some("en-us"), &valid, LanguageRole::Source).unwrap(), "EN-us");
    }

    #[rstest]
    #[case(Some("xx-XX"))]
    #[case(Some("de"))]
    #[case(None)]
    fn test_invalid_selection_carries_all_options(#[case] requested: Option<&str>) {
        match resolve_language(requested, &targets(), LanguageRole::Target) {
            Err(Error::InvalidLanguageSelection { role, valid, .. }) => {
                assert_eq!(role, LanguageRole::Target);
                assert_eq!(valid, vec!["de-DE", "fr-FR"]);
            },
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_resolve_checks_target_first() {
        let languages = PackageLanguages::from_descriptor(
            br#"<Project><LanguageDirections>
                <LanguageDirection SourceLanguageCode="en-US" TargetLanguageCode="de-DE"/>
                <LanguageDirection SourceLanguageCode="en-US" TargetLanguageCode="fr-FR"/>
            </LanguageDirections></Project>"#,
        )
        .unwrap();

        let resolved = languages.resolve(Some("EN-us"), Some("DE-de")).unwrap();
        assert_eq!(resolved.source, "en-US");
        assert_eq!(resolved.target, "de-DE");

        let err = languages.resolve(Some("xx"), Some("yy")).unwrap_err();
        assert_eq!(err.to_string(), "Incorrect target language. Valid options: de-DE fr-FR");

        let err = languages.resolve(Some("xx"), Some("fr-FR")).unwrap_err();
        assert_eq!(err.to_string(), "Incorrect source language. Valid options: en-US");
    }
}
