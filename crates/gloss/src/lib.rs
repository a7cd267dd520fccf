#![forbid(unsafe_code)]

//! gloss: terminal rich-text styling and layout.
//!
//! This crate re-exports the workspace so applications depend on one name:
//!
//! - [`core`]: render configuration read from the environment, scoped
//!   overrides, logging setup
//! - [`style`]: colours, depth downgrade, tri-state text styles
//! - [`text`]: cell widths and styled [`Segment`]s
//! - [`layout`]: the width allocator every multi-region layout uses
//! - [`widgets`]: grid, table, columns, pane splits, progress rows
//! - [`render`]: segments to ANSI text
//!
//! # Example
//!
//! ```
//! use gloss::prelude::*;
//!
//! let mut table = Table::new([
//!     Column::new("name").sizing(SizeConstraint::Fixed(6)),
//!     Column::new("size").sizing(SizeConstraint::Ratio(1)),
//! ])
//! .border_type(BorderType::Ascii);
//! table.add_row(["a.txt", "4k"]);
//!
//! let segments = table.render(20);
//! let text = Presenter::new(ColorDepth::NoColor).render_plain(&segments);
//! assert!(text.starts_with("+------+-----------+"));
//! assert_eq!(count_lines(&segments), 5);
//! ```

pub use gloss_core as core;
pub use gloss_layout as layout;
pub use gloss_render as render;
pub use gloss_style as style;
pub use gloss_text as text;
pub use gloss_widgets as widgets;

pub use gloss_core::{ConfigOverride, RenderConfig, with_config_override};
pub use gloss_layout::{Rect, SizeConstraint, Sizing, allocate_widths};
pub use gloss_render::{Presenter, count_lines};
pub use gloss_style::{Attribute, Color, ColorDepth, Style, StyleError};
pub use gloss_text::{ControlCode, Segment, SegmentError, measure};
pub use gloss_widgets::Renderable;

/// Everything needed to build and present a renderable.
pub mod prelude {
    pub use gloss_core::{ConfigOverride, RenderConfig, with_config_override};
    pub use gloss_layout::{Region, RegionSet, SizeConstraint, Sizing, allocate_widths};
    pub use gloss_render::{Presenter, count_lines};
    pub use gloss_style::{Attribute, Color, ColorDepth, Style};
    pub use gloss_text::{ControlCode, Segment, measure};
    pub use gloss_widgets::{
        BorderType, Column, Columns, Field, GridCell, Pane, ProgressRow, Renderable, Table,
    };
}
