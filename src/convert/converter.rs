//! The document converter seam.
//!
//! Turning one `.sdlxliff` document into XLIFF plus skeleton is delegated to
//! an external [`DocumentConverter`]. The pipeline only reacts to its status
//! and checks that both output files exist.

use super::options::keys;
use crate::common::Result;
use std::collections::HashMap;
use std::path::PathBuf;

/// Arguments for converting one package entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    /// Extracted copy of the entry
    pub source: PathBuf,
    /// Where the converted document must be written
    pub xliff: PathBuf,
    /// Where the skeleton must be written
    pub skeleton: PathBuf,
    pub catalog: Option<String>,
    pub source_language: String,
    pub target_language: Option<String>,
    pub source_encoding: Option<String>,
    pub paragraph_segmentation: bool,
    pub srx: Option<String>,
    pub format: Option<String>,
}

impl ConversionRequest {
    /// Render the request as a string parameter map, for converters that use
    /// the same keys as the package entry point.
    pub fn to_params(&self) -> HashMap<String, String> {
        let mut params = HashMap::new();
        params.insert(keys::SOURCE.to_string(), self.source.to_string_lossy().into_owned());
        params.insert(keys::XLIFF.to_string(), self.xliff.to_string_lossy().into_owned());
        params.insert(keys::SKELETON.to_string(), self.skeleton.to_string_lossy().into_owned());
        params.insert(keys::SOURCE_LANGUAGE.to_string(), self.source_language.clone());
        params.insert(
            keys::PARAGRAPH.to_string(),
            if self.paragraph_segmentation { "yes" } else { "no" }.to_string(),
        );

        let optional = [
            (keys::CATALOG, &self.catalog),
            (keys::TARGET_LANGUAGE, &self.target_language),
            (keys::SOURCE_ENCODING, &self.source_encoding),
            (keys::SRX, &self.srx),
            (keys::FORMAT, &self.format),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                params.insert(key.to_string(), value.clone());
            }
        }
        params
    }
}

/// Converts a single document to XLIFF plus skeleton.
///
/// On success both `request.xliff` and `request.skeleton` must exist. An
/// error makes the pipeline copy the entry through unchanged instead.
pub trait DocumentConverter {
    fn convert(&self, request: &ConversionRequest) -> Result<()>;
}

impl<F> DocumentConverter for F
where
    F: Fn(&ConversionRequest) -> Result<()>,
{
    fn convert(&self, request: &ConversionRequest) -> Result<()> {
        self(request)
    }
}
