#![forbid(unsafe_code)]

//! Style types for gloss with override-wins combination.
//!
//! This crate provides:
//! - [`Color`] with depth downgrade, blending, and SGR codes
//! - [`ColorDepth`] resolved from render configuration
//! - [`Style`] with tri-state attributes and override-wins [`Style::combine`]

/// Color types, palettes, and downgrade utilities.
pub mod color;
/// Parse errors.
pub mod error;
/// Style types with override-wins semantics.
pub mod style;

pub use color::{Color, ColorDepth, Rgb, StandardColor};
pub use error::{Result, StyleError};
pub use style::{Attribute, Style, StyleFlags};
