//! Package to XLIFF conversion.
//!
//! A run reads the package descriptor, resolves the language pair, then walks
//! the archive once. Target-language documents go through the
//! [`DocumentConverter`]; their skeletons land in the output archive and the
//! converted documents are merged, in archive order, into one XLIFF file.
//! Source-language entries and the project file are copied unchanged.
//!
//! # Examples
//!
//! ```no_run
//! use sdlppx::convert::{ConversionRequest, PackageOptions, convert_package};
//! use sdlppx::xliff::XliffJoiner;
//!
//! let options = PackageOptions::new("Sample.sdlppx", "Sample.xlf", "Sample.sdlppx.skl")
//!     .with_source_language("en-US")
//!     .with_target_language("de-DE");
//! let converter = |request: &ConversionRequest| -> sdlppx::Result<()> {
//!     // hand the document to an XLIFF filter here
//!     std::fs::copy(&request.source, &request.xliff)?;
//!     std::fs::write(&request.skeleton, b"")?;
//!     Ok(())
//! };
//! let summary = convert_package(options, &converter, &XliffJoiner)?;
//! println!("{} documents converted", summary.converted);
//! # Ok::<(), sdlppx::Error>(())
//! ```

mod converter;
pub mod options;
mod session;
mod status;


pub use converter::{ConversionRequest, DocumentConverter};
pub use options::PackageOptions;
pub use session::{RunSummary, Session, Stage};
pub use status::RunStatus;

use crate::common::Result;
use crate::xliff::{DocumentMerger, XliffJoiner};
use std::collections::HashMap;

/// Convert a package with explicit options.
pub fn convert_package<C, M>(options: PackageOptions, converter: &C, merger: &M) -> Result<RunSummary>
where
    C: DocumentConverter + ?Sized,
    M: DocumentMerger + ?Sized,
{
    let mut session = Session::new(options)?;
    session.run(converter, merger)
}

/// Convert a package described by a string parameter map.
///
/// See [`options::keys`] for the recognized keys. Converted documents are
/// merged with [`XliffJoiner`].
pub fn run<C>(params: &HashMap<String, String>, converter: &C) -> RunStatus
where
    C: DocumentConverter + ?Sized,
{
    let options = match PackageOptions::from_params(params) {
        Ok(options) => options,
        Err(e) => {
            log::error!("Invalid conversion parameters: {}", e);
            return RunStatus::Error(e.to_string());
        },
    };
    RunStatus::from(convert_package(options, converter, &XliffJoiner))
}
