//! Common types and utilities shared across the pipeline stages.

// Submodule declarations
pub mod constants;
pub mod error;
pub mod xml;

// Re-exports for convenience
pub use error::{Error, LanguageRole, Result};
