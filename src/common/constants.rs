//! Tool identification and status codes.

/// Short tool identifier written into logs.
pub const TOOL_ID: &str = "sdlppx";

/// Human-readable tool name.
pub const TOOL_NAME: &str = "SDL Package to XLIFF Converter";

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Status code reported for a successful run.
pub const SUCCESS: &str = "0";

/// Status code reported for a failed run.
pub const ERROR: &str = "1";

/// Extension of the project descriptor inside a package.
pub const PROJECT_EXTENSION: &str = ".sdlproj";

/// Extension of translatable documents inside a package.
pub const DOCUMENT_EXTENSION: &str = ".sdlxliff";

/// Suffix appended to an entry name for its converted skeleton.
pub const SKELETON_SUFFIX: &str = ".skl";

/// `datatype` marker for XLIFF files extracted from a package.
pub const PACKAGE_DATATYPE: &str = "x-sdlpackage";

/// Namespace of XLIFF 1.2 documents.
pub const XLIFF_NAMESPACE: &str = "urn:oasis:names:tc:xliff:document:1.2";

/// XLIFF version written by the merger when no input supplies one.
pub const XLIFF_VERSION: &str = "1.2";
