//! sdlppx - Convert SDL Trados translation packages to XLIFF 1.2
//!
//! An SDL package (`.sdlppx`) is a ZIP archive with a project descriptor and
//! one folder of bilingual `.sdlxliff` documents per language. This library
//! extracts the documents of one target language, hands each one to a
//! document converter, and produces two artifacts:
//!
//! - a composite XLIFF document holding one `<file>` per converted entry, in
//!   archive order, each tagged with its origin;
//! - an output archive mirroring the package, where every converted document
//!   is replaced by its skeleton (`<entry>.skl`).
//!
//! The archive is read and written in a single streaming pass. A document the
//! converter cannot handle is copied through unchanged and the run goes on.
//!
//! # Features
//!
//! - **Language discovery**: Read the language directions of a package
//! - **Streaming traversal**: One forward pass over the input archive
//! - **Pluggable conversion**: Any `Fn(&ConversionRequest) -> Result<()>` is a converter
//! - **Deterministic output**: Identical inputs give byte-identical results
//!
//! # Example - Listing package languages
//!
//! ```no_run
//! use sdlppx::package::package_languages;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let languages = package_languages("Sample.sdlppx")?;
//! println!("Sources: {:?}", languages.source());
//! println!("Targets: {:?}", languages.target());
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Converting with a parameter map
//!
//! ```no_run
//! use std::collections::HashMap;
//! use sdlppx::convert::{ConversionRequest, run};
//!
//! let params: HashMap<String, String> = [
//!     ("source", "Sample.sdlppx"),
//!     ("xliff", "Sample.xlf"),
//!     ("skeleton", "Sample.sdlppx.skl"),
//!     ("srcLang", "en-US"),
//!     ("tgtLang", "de-DE"),
//! ]
//! .into_iter()
//! .map(|(k, v)| (k.to_string(), v.to_string()))
//! .collect();
//!
//! let converter = |request: &ConversionRequest| -> sdlppx::Result<()> {
//!     Err(sdlppx::Error::Conversion(format!("no filter for {}", request.source.display())))
//! };
//! let status = run(&params, &converter);
//! println!("{:?}", status.into_vec());
//! ```

/// Shared infrastructure: errors, constants and the XML tree
pub mod common;

/// Package reading, language resolution and output archive writing
pub mod package;

/// Provenance patching and merging of XLIFF documents
pub mod xliff;

/// The conversion pipeline
pub mod convert;

// Re-export commonly used types for convenience
pub use common::{Error, LanguageRole, Result};
pub use convert::{
    ConversionRequest, DocumentConverter, PackageOptions, RunStatus, RunSummary, Session, Stage, convert_package,
};
pub use package::{PackageLanguages, ResolvedLanguages, package_languages, package_languages_json};
pub use xliff::{DocumentMerger, XliffJoiner};
