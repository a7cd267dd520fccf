#![forbid(unsafe_code)]

//! Layout consumers built on the gloss width allocator.
//!
//! Every widget here turns its content into a flat stream of [`Segment`]s
//! through the [`Renderable`] trait. Widths always come from
//! [`gloss_layout::allocate_widths`], so a table column, a pane and a
//! progress bar resolve space the same way.
//!
//! - [`grid`]: the cell grid with column and row spanning
//! - [`table`]: headers and borders on top of the grid
//! - [`columns`]: items flowed into as many columns as fit
//! - [`split`]: named pane trees
//! - [`progress`]: one-line progress rows
//! - [`borders`]: border glyph sets and junction selection

pub mod borders;
pub mod columns;
pub mod grid;
pub mod progress;
pub mod split;
pub mod table;

use gloss_core::RenderConfig;
use gloss_text::Segment;

pub use borders::{Arms, BorderSet, BorderType};
pub use columns::Columns;
pub use grid::{GridBorders, GridCell, RowSpanTracker, render_grid};
pub use progress::{Field, ProgressField, ProgressRow};
pub use split::{Pane, SplitDirection};
pub use table::{Column, Table};

/// Something that renders to segments at a given width.
///
/// Output is line oriented: every line ends with a line-break segment.
pub trait Renderable {
    fn render(&self, width: usize) -> Vec<Segment>;

    /// Render at the configured width (`COLUMNS`, an override, or
    /// [`gloss_core::DEFAULT_WIDTH`]).
    fn render_current(&self) -> Vec<Segment> {
        self.render(RenderConfig::current().render_width())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gloss_core::{ConfigOverride, DEFAULT_WIDTH, with_config_override};
    use gloss_text::segment::{line_length, split_lines};

    fn line_widths(segments: &[Segment]) -> Vec<usize> {
        split_lines(segments.iter().cloned()).iter().map(|line| line_length(line)).collect()
    }

    #[test]
    fn render_current_uses_the_configured_width() {
        let row = ProgressRow::new("sync", 10);
        let narrow = with_config_override(ConfigOverride::new().width(Some(Some(30))), || {
            row.render_current()
        });
        assert_eq!(line_widths(&narrow), [30]);
    }

    #[test]
    fn render_current_falls_back_to_default_width() {
        let row = ProgressRow::new("sync", 10);
        let out = with_config_override(ConfigOverride::new().width(Some(None)), || {
            row.render_current()
        });
        assert_eq!(line_widths(&out), [DEFAULT_WIDTH]);
    }
}
