#![forbid(unsafe_code)]

//! Segment errors.

use thiserror::Error;

/// Errors raised by segment operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SegmentError {
    /// A split column past the segment's cell length. Indicates a
    /// measurement bug upstream, so it is propagated rather than clamped.
    #[error("column {column} is out of bounds for a segment {length} cells wide")]
    OutOfBounds { column: usize, length: usize },
}

/// Result alias for this crate.
pub type Result<T, E = SegmentError> = std::result::Result<T, E>;
