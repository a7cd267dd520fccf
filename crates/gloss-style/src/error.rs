#![forbid(unsafe_code)]

//! Parse errors for colours and styles.

use thiserror::Error;

/// Errors from colour and style parsing.
///
/// Both variants are recoverable: callers usually substitute a default
/// colour or drop the offending token and render unstyled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StyleError {
    /// Malformed hex string, colour name, or colour function.
    #[error("invalid color: {0:?}")]
    InvalidColor(String),
    /// A style word that is neither an attribute nor a colour.
    #[error("unknown style attribute: {0:?}")]
    UnknownAttribute(String),
}

/// Result alias for this crate.
pub type Result<T, E = StyleError> = std::result::Result<T, E>;
