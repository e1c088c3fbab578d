//! Run configuration.

use super::converter::ConversionRequest;
use crate::common::{Error, Result};
use crate::package::ResolvedLanguages;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Parameter keys of the string-map entry point.
pub mod keys {
    pub const SOURCE: &str = "source";
    pub const XLIFF: &str = "xliff";
    pub const SKELETON: &str = "skeleton";
    pub const SOURCE_LANGUAGE: &str = "srcLang";
    pub const TARGET_LANGUAGE: &str = "tgtLang";
    pub const CATALOG: &str = "catalog";
    pub const SOURCE_ENCODING: &str = "srcEncoding";
    pub const PARAGRAPH: &str = "paragraph";
    pub const SRX: &str = "srxFile";
    pub const FORMAT: &str = "format";
    pub const WORK_DIR: &str = "workDir";
}

/// Options for converting one package.
///
/// # Examples
///
/// ```rust
/// use sdlppx::convert::PackageOptions;
///
/// let options = PackageOptions::new("Sample.sdlppx", "Sample.xlf", "Sample.sdlppx.skl")
///     .with_source_language("en-US")
///     .with_target_language("de-DE")
///     .with_paragraph_segmentation(true);
/// assert_eq!(options.target_language.as_deref(), Some("de-DE"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageOptions {
    /// Input package
    pub package: PathBuf,
    /// Composite XLIFF document to write
    pub xliff: PathBuf,
    /// Output archive holding skeletons and passthrough entries
    pub skeleton: PathBuf,
    pub source_language: Option<String>,
    pub target_language: Option<String>,
    pub catalog: Option<String>,
    pub source_encoding: Option<String>,
    /// Segment by paragraph instead of by sentence
    pub paragraph_segmentation: bool,
    /// Segmentation rules file
    pub srx: Option<String>,
    /// Format hint passed to the converter
    pub format: Option<String>,
    /// Parent of the per-run scratch directory; the system temp dir if unset
    pub work_dir: Option<PathBuf>,
}

impl PackageOptions {
    pub fn new(package: impl Into<PathBuf>, xliff: impl Into<PathBuf>, skeleton: impl Into<PathBuf>) -> Self {
        Self {
            package: package.into(),
            xliff: xliff.into(),
            skeleton: skeleton.into(),
            source_language: None,
            target_language: None,
            catalog: None,
            source_encoding: None,
            paragraph_segmentation: false,
            srx: None,
            format: None,
            work_dir: None,
        }
    }

    /// Build options from the string parameter map.
    ///
    /// `source`, `xliff` and `skeleton` are required. Values are taken as
    /// given; only empty values count as absent. `paragraph` is on for `yes`
    /// or `true`, in any case.
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self> {
        let get = |key: &str| params.get(key).map(String::as_str).filter(|v| !v.is_empty());
        let owned = |key: &str| get(key).map(str::to_string);
        let required = |key: &'static str| get(key).ok_or(Error::MissingParameter(key));

        let mut options = Self::new(
            required(keys::SOURCE)?,
            required(keys::XLIFF)?,
            required(keys::SKELETON)?,
        );
        options.source_language = owned(keys::SOURCE_LANGUAGE);
        options.target_language = owned(keys::TARGET_LANGUAGE);
        options.catalog = owned(keys::CATALOG);
        options.source_encoding = owned(keys::SOURCE_ENCODING);
        options.paragraph_segmentation = get(keys::PARAGRAPH)
            .is_some_and(|v| v.eq_ignore_ascii_case("yes") || v.eq_ignore_ascii_case("true"));
        options.srx = owned(keys::SRX);
        options.format = owned(keys::FORMAT);
        options.work_dir = get(keys::WORK_DIR).map(PathBuf::from);
        Ok(options)
    }

    #[inline]
    pub fn with_source_language(mut self, code: impl Into<String>) -> Self {
        self.source_language = Some(code.into());
        self
    }

    #[inline]
    pub fn with_target_language(mut self, code: impl Into<String>) -> Self {
        self.target_language = Some(code.into());
        self
    }

    #[inline]
    pub fn with_catalog(mut self, catalog: impl Into<String>) -> Self {
        self.catalog = Some(catalog.into());
        self
    }

    #[inline]
    pub fn with_source_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.source_encoding = Some(encoding.into());
        self
    }

    /// Set paragraph segmentation.
    #[inline]
    pub fn with_paragraph_segmentation(mut self, paragraph: bool) -> Self {
        self.paragraph_segmentation = paragraph;
        self
    }

    #[inline]
    pub fn with_srx(mut self, srx: impl Into<String>) -> Self {
        self.srx = Some(srx.into());
        self
    }

    #[inline]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Set the directory the run's scratch directory is created in.
    #[inline]
    pub fn with_work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = Some(dir.into());
        self
    }

    /// Conversion request for one extracted entry.
    ///
    /// Languages are the resolved, canonical codes rather than the requested ones.
    pub fn request_for(
        &self,
        languages: &ResolvedLanguages,
        source: &Path,
        xliff: &Path,
        skeleton: &Path,
    ) -> ConversionRequest {
        ConversionRequest {
            source: source.to_path_buf(),
            xliff: xliff.to_path_buf(),
            skeleton: skeleton.to_path_buf(),
            catalog: self.catalog.clone(),
            source_language: languages.source.clone(),
            target_language: Some(languages.target.clone()),
            source_encoding: self.source_encoding.clone(),
            paragraph_segmentation: self.paragraph_segmentation,
            srx: self.srx.clone(),
            format: self.format.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_from_params() {
        let options = PackageOptions::from_params(&params(&[
            ("source", "/in/Sample.sdlppx"),
            ("xliff", "/out/Sample.xlf"),
            ("skeleton", "/out/Sample.skl"),
            ("srcLang", "en-US"),
            ("tgtLang", "de-DE"),
            ("catalog", "/etc/catalog.xml"),
            ("srcEncoding", ""),
            ("workDir", "/scratch"),
        ]))
        .unwrap();
        assert_eq!(options.package, PathBuf::from("/in/Sample.sdlppx"));
        assert_eq!(options.source_language.as_deref(), Some("en-US"));
        assert_eq!(options.catalog.as_deref(), Some("/etc/catalog.xml"));
        assert_eq!(options.source_encoding, None);
        assert!(!options.paragraph_segmentation);
        assert_eq!(options.work_dir, Some(PathBuf::from("/scratch")));
    }

    #[test]
    fn test_values_are_not_trimmed() {
        let options = PackageOptions::from_params(&params(&[
            ("source", " /in/Sample.sdlppx"),
            ("xliff", "/out/Sample.xlf "),
            ("skeleton", "/out/Sample.skl"),
            ("srcLang", "en-US "),
            ("catalog", ""),
        ]))
        .unwrap();
        assert_eq!(options.package, PathBuf::from(" /in/Sample.sdlppx"));
        assert_eq!(options.xliff, PathBuf::from("/out/Sample.xlf "));
        assert_eq!(options.source_language.as_deref(), Some("en-US "));
        assert_eq!(options.catalog, None);
    }

    #[rstest]
    #[case("source")]
    #[case("xliff")]
    #[case("skeleton")]
    fn test_missing_required_parameter(#[case] missing: &str) {
        let mut map = params(&[("source", "a"), ("xliff", "b"), ("skeleton", "c")]);
        map.remove(missing);
        match PackageOptions::from_params(&map) {
            Err(Error::MissingParameter(key)) => assert_eq!(key, missing),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[rstest]
    #[case("yes", true)]
    #[case("TRUE", true)]
    #[case("Yes", true)]
    #[case("no", false)]
    #[case("1", false)]
    fn test_paragraph_flag(#[case] value: &str, #[case] expected: bool) {
        let map = params(&[("source", "a"), ("xliff", "b"), ("skeleton", "c"), ("paragraph", value)]);
        assert_eq!(PackageOptions::from_params(&map).unwrap().paragraph_segmentation, expected);
    }

    #[test]
    fn test_request_uses_resolved_languages() {
        let options = PackageOptions::new("p", "x", "s")
            .with_source_language("EN-us")
            .with_target_language("de-de")
            .with_srx("rules.srx");
        let languages = ResolvedLanguages {
            source: "en-US".to_string(),
            target: "de-DE".to_string(),
        };
        let request = options.request_for(&languages, Path::new("a"), Path::new("a.xlf"), Path::new("a.skl"));
        assert_eq!(request.source_language, "en-US");
        assert_eq!(request.target_language.as_deref(), Some("de-DE"));
        assert_eq!(request.srx.as_deref(), Some("rules.srx"));
        assert_eq!(request.skeleton, PathBuf::from("a.skl"));
    }
}
