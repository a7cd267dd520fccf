#![forbid(unsafe_code)]

//! Cell-width measurement and styled segments.
//!
//! - [`width`]: per-code-point terminal widths, measuring and truncation
//! - [`segment`]: [`Segment`], the styled render unit, and line helpers
//!
//! Some helpers are not used by the gloss widgets themselves and are public
//! for callers that build their own renderables:
//! [`width::pad_to_width`], [`width::has_wide_chars`] and
//! [`segment::simplify`].

pub mod error;
pub mod segment;
pub mod width;

pub use error::{Result, SegmentError};
pub use segment::{
    ControlCode, Segment, adjust_line_length, line_length, set_shape, simplify, split_lines,
    strip_styles,
};
pub use width::{
    byte_index_for_column, char_width, has_wide_chars, measure, measure_bytes, pad_to_width, truncate,
};
