//! Status tuple of the string-map entry point.

use crate::common::Result;
use crate::common::constants::{ERROR, SUCCESS};

/// Outcome of a run as reported to string-based callers: a status code,
/// followed by a message on error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    Success,
    Error(String),
}

impl RunStatus {
    /// `"0"` on success, `"1"` on error.
    pub fn code(&self) -> &'static str {
        match self {
            RunStatus::Success => SUCCESS,
            RunStatus::Error(_) => ERROR,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            RunStatus::Success => None,
            RunStatus::Error(message) => Some(message.as_str()),
        }
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        matches!(self, RunStatus::Success)
    }

    /// The status as a list: `["0"]` or `["1", message]`.
    pub fn into_vec(self) -> Vec<String> {
        match self {
            RunStatus::Success => vec![SUCCESS.to_string()],
            RunStatus::Error(message) => vec![ERROR.to_string(), message],
        }
    }
}

impl<T> From<Result<T>> for RunStatus {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(_) => RunStatus::Success,
            Err(e) => RunStatus::Error(e.to_string()),
        }
    }
}
