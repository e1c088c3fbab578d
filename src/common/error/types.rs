//! Error taxonomy for package conversion.
use std::fmt;
use thiserror::Error;

/// Role a language code plays in a translation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LanguageRole {
    Source,
    Target,
}

impl fmt::Display for LanguageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LanguageRole::Source => f.write_str("source"),
            LanguageRole::Target => f.write_str("target"),
        }
    }
}

/// Main error type for package operations.
///
/// Only [`Error::Conversion`] is recoverable during a run: the entry that
/// produced it is copied through unchanged. Every other variant aborts the run.
#[derive(Error, Debug)]
pub enum Error {
    /// The package has no `.sdlproj` entry
    #[error("Project file not found in package {0}")]
    MissingProjectDescriptor(String),

    /// The project descriptor is not valid XML or has no language directions
    #[error("Invalid project file: {0}")]
    DescriptorParse(String),

    /// Requested language is not one of the package's directions
    #[error("Incorrect {role} language. Valid options: {}", valid.join(" "))]
    InvalidLanguageSelection {
        role: LanguageRole,
        requested: Option<String>,
        valid: Vec<String>,
    },

    /// Reading the input package or writing the output archive failed
    #[error("Archive error: {0}")]
    Archive(String),

    /// The external converter rejected a single document
    #[error("Conversion failed: {0}")]
    Conversion(String),

    /// Assembling the composite XLIFF document failed
    #[error("Merge error: {0}")]
    Merge(String),

    /// A required invocation parameter is absent
    #[error("Missing parameter: {0}")]
    MissingParameter(&'static str),

    /// XML parsing or structure error
    #[error("XML error: {0}")]
    Xml(String),

    /// IO error outside the archive streams
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the run may continue after this error.
    #[inline]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::Conversion(_))
    }

    /// Wrap an IO error raised on one of the archive streams.
    pub(crate) fn archive(err: std::io::Error) -> Self {
        Error::Archive(err.to_string())
    }
}

/// Result type for package operations.
pub type Result<T> = std::result::Result<T, Error>;
