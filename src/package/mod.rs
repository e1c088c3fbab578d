//! SDL translation package handling.
//!
//! A package (`.sdlppx`) is a ZIP archive holding a project descriptor
//! (`*.sdlproj`) and one folder per language with bilingual `.sdlxliff`
//! documents. This module reads the descriptor, resolves the language pair,
//! classifies entries and writes the output archive.

mod classify;
mod descriptor;
mod language;
mod reader;
mod scratch;
mod writer;

pub use classify::{EntryClassifier, EntryKind};
pub use descriptor::{
    LanguageDirection, PackageLanguages, package_languages, package_languages_json, read_package_languages,
};
pub use language::{ResolvedLanguages, resolve_language};
pub use reader::{EntryStream, EntryView};
pub use scratch::Scratch;
pub use writer::{ArchiveWriter, skeleton_entry_name};
