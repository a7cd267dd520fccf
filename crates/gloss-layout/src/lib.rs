#![forbid(unsafe_code)]

//! Width allocation for gloss.
//!
//! One allocator serves the grid, text columns, pane splits and progress
//! rows; see [`allocator`] for the resolution rules.

pub mod allocator;
pub mod geometry;

pub use allocator::{
    Constrained, Region, RegionSet, SizeConstraint, Sizing, allocate_widths, offsets,
};
pub use geometry::Rect;
