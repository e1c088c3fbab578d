//! XLIFF post-processing: provenance patching and ordered merging.

mod join;
mod patch;

pub use join::{DocumentMerger, MergeUnit, XliffJoiner};
pub use patch::{INDENT, Provenance, apply_provenance, patch_header};
