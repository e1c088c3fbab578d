//! Entry classification.
//!
//! Entries in the target-language folder with the document extension are
//! converted. Entries in the source-language folder and the project file are
//! copied through. Everything else, including other languages' folders and
//! directory records, is left out of the output archive.

use super::language::ResolvedLanguages;
use super::reader::EntryView;
use crate::common::constants::{DOCUMENT_EXTENSION, PROJECT_EXTENSION};

/// What happens to an entry during traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// Translatable document of the target language
    Convert,
    /// Copied unchanged into the output archive
    Passthrough,
    /// Dropped from the output archive
    Excluded,
}

/// Classifies entries for one pair of resolved languages.
#[derive(Debug, Clone)]
pub struct EntryClassifier {
    source: String,
    target: String,
}

impl EntryClassifier {
    pub fn new(languages: &ResolvedLanguages) -> Self {
        Self {
            source: languages.source.clone(),
            target: languages.target.clone(),
        }
    }

    /// Classify an entry view.
    pub fn classify(&self, entry: &EntryView) -> EntryKind {
        if entry.is_dir() {
            return EntryKind::Excluded;
        }
        self.classify_parts(entry.parent(), entry.file_name())
    }

    fn classify_parts(&self, parent: Option<&str>, name: &str) -> EntryKind {
        if parent == Some(self.target.as_str()) && name.ends_with(DOCUMENT_EXTENSION) {
            EntryKind::Convert
        } else if parent == Some(self.source.as_str()) || name.ends_with(PROJECT_EXTENSION) {
            EntryKind::Passthrough
        } else {
            EntryKind::Excluded
        }
    }
}
