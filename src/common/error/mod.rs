//! Unified error types for the package pipeline.
//!
//! Every stage (descriptor reading, language resolution, archive traversal,
//! header patching and merging) reports through the same [`Error`] type so a
//! run can be turned into a single status message.

// Submodule declarations
pub mod conversions;
pub mod types;

// Re-exports
pub use types::{Error, LanguageRole, Result};
