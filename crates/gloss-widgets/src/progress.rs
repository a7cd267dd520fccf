#![forbid(unsafe_code)]

//! Single-line progress rows.
//!
//! A [`ProgressRow`] is a row of [`Field`]s (description, bar, percentage,
//! counter, free text) laid out with the width allocator. The bar draws at
//! half-cell precision with `━`, `╸` and `╺`; under the ASCII fallback it
//! uses `#` for the complete part and `-` for the rest.

use gloss_core::RenderConfig;
use gloss_layout::{Sizing, allocate_widths};
use gloss_style::{Color, Style};
use gloss_text::segment::{Segment, adjust_line_length, line_length};
use gloss_text::width::measure;
use tracing::{debug, debug_span};

use crate::Renderable;

const BAR: &str = "━";
const HALF_BAR_RIGHT: &str = "╸";
const HALF_BAR_LEFT: &str = "╺";

/// One piece of a progress row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    Description,
    Bar,
    /// Whole percent, right aligned, e.g. ` 42%`.
    Percentage,
    /// `completed/total`, right aligned.
    Counter,
    Text(String),
}

/// A field and how wide it may be. Without an explicit sizing the bar
/// takes the leftover space and every other field its natural width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressField {
    pub field: Field,
    pub sizing: Option<Sizing>,
}

impl From<Field> for ProgressField {
    fn from(field: Field) -> Self {
        Self {
            field,
            sizing: None,
        }
    }
}

/// A task's progress rendered as one line.
///
/// # Example
/// ```
/// use gloss_widgets::{ProgressRow, Renderable};
///
/// let mut row = ProgressRow::new("copy", 10);
/// row.advance(5);
/// let out = row.render(30);
/// assert!(out.iter().any(|s| s.text.contains("50%")));
/// ```
#[derive(Debug, Clone)]
pub struct ProgressRow {
    description: String,
    completed: u64,
    total: u64,
    fields: Vec<ProgressField>,
    padding: usize,
    complete_style: Style,
    remaining_style: Style,
    finished_style: Style,
    percentage_style: Style,
}

impl ProgressRow {
    /// Description, bar and percentage.
    pub fn new(description: impl Into<String>, total: u64) -> Self {
        Self {
            description: description.into(),
            completed: 0,
            total,
            fields: vec![
                Field::Description.into(),
                Field::Bar.into(),
                Field::Percentage.into(),
            ],
            padding: 1,
            complete_style: Style::new().with_color(Color::from_rgb(249, 38, 114)),
            remaining_style: Style::new().with_color(Color::Indexed(237)),
            finished_style: Style::new().with_color(Color::from_rgb(114, 156, 31)),
            percentage_style: Style::new().with_color(Color::Indexed(5)),
        }
    }

    /// Replace the fields, each with its natural sizing.
    #[must_use]
    pub fn fields(mut self, fields: impl IntoIterator<Item = Field>) -> Self {
        self.fields = fields.into_iter().map(ProgressField::from).collect();
        self
    }

    #[must_use]
    pub fn field(mut self, field: Field, sizing: impl Into<Sizing>) -> Self {
        self.fields.push(ProgressField {
            field,
            sizing: Some(sizing.into()),
        });
        self
    }

    /// Set the sizing of every field of this kind.
    #[must_use]
    pub fn sizing(mut self, field: &Field, sizing: impl Into<Sizing>) -> Self {
        let sizing = sizing.into();
        for entry in self.fields.iter_mut().filter(|entry| entry.field == *field) {
            entry.sizing = Some(sizing);
        }
        self
    }

    #[must_use]
    pub fn padding(mut self, padding: usize) -> Self {
        self.padding = padding;
        self
    }

    #[must_use]
    pub fn complete_style(mut self, style: Style) -> Self {
        self.complete_style = style;
        self
    }

    #[must_use]
    pub fn remaining_style(mut self, style: Style) -> Self {
        self.remaining_style = style;
        self
    }

    #[must_use]
    pub fn finished_style(mut self, style: Style) -> Self {
        self.finished_style = style;
        self
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Set the completed count, capped at the total.
    pub fn update(&mut self, completed: u64) {
        self.completed = completed.min(self.total);
    }

    pub fn advance(&mut self, steps: u64) {
        self.update(self.completed.saturating_add(steps));
    }

    pub fn completed(&self) -> u64 {
        self.completed
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn is_finished(&self) -> bool {
        self.total > 0 && self.completed >= self.total
    }

    /// Whole percent done, rounded down.
    pub fn percentage(&self) -> u64 {
        if self.total == 0 {
            return 0;
        }
        (u128::from(self.completed) * 100 / u128::from(self.total)) as u64
    }

    fn natural_text(&self, field: &Field) -> String {
        match field {
            Field::Description => self.description.clone(),
            Field::Bar => String::new(),
            Field::Percentage => format!("{:>3}%", self.percentage()),
            Field::Counter => format!("{}/{}", self.completed, self.total),
            Field::Text(text) => text.clone(),
        }
    }

    fn resolved_sizing(&self, entry: &ProgressField) -> Sizing {
        match (entry.sizing, &entry.field) {
            (Some(sizing), _) => sizing,
            (None, Field::Bar) => Sizing::automatic(),
            (None, field) => Sizing::fixed(measure(&self.natural_text(field))),
        }
    }

    /// Bar segments exactly `width` cells wide.
    fn bar(&self, width: usize, ascii: bool) -> Vec<Segment> {
        if width == 0 {
            return Vec::new();
        }
        if self.is_finished() {
            let glyph = if ascii { "#" } else { BAR };
            return vec![Segment::styled(glyph.repeat(width), self.finished_style.clone())];
        }

        let halves = if self.total == 0 {
            0
        } else {
            (width as u128 * 2 * u128::from(self.completed) / u128::from(self.total)) as usize
        };
        let full = halves / 2;
        let mut out = Vec::new();

        if ascii {
            if full > 0 {
                out.push(Segment::styled("#".repeat(full), self.complete_style.clone()));
            }
            if width > full {
                out.push(Segment::styled("-".repeat(width - full), self.remaining_style.clone()));
            }
            return out;
        }

        let half = halves % 2;
        if full > 0 || half > 0 {
            let mut complete = BAR.repeat(full);
            if half > 0 {
                complete.push_str(HALF_BAR_RIGHT);
            }
            out.push(Segment::styled(complete, self.complete_style.clone()));
        }
        let mut remaining_cells = width - full - half;
        if remaining_cells > 0 {
            let mut remaining = String::new();
            if half == 0 && full > 0 {
                remaining.push_str(HALF_BAR_LEFT);
                remaining_cells -= 1;
            }
            remaining.push_str(&BAR.repeat(remaining_cells));
            out.push(Segment::styled(remaining, self.remaining_style.clone()));
        }
        out
    }

    fn field_segments(&self, field: &Field, width: usize, ascii: bool) -> Vec<Segment> {
        let (segment, right_align) = match field {
            Field::Bar => return self.bar(width, ascii),
            Field::Percentage => (
                Segment::styled(self.natural_text(field), self.percentage_style.clone()),
                true,
            ),
            Field::Counter => (Segment::text(self.natural_text(field)), true),
            Field::Description | Field::Text(_) => (Segment::text(self.natural_text(field)), false),
        };
        let line = [segment];
        let length = line_length(&line);
        if right_align && length < width {
            let [segment] = line;
            vec![Segment::blank(width - length, None), segment]
        } else {
            adjust_line_length(&line, width, None, true)
        }
    }
}

impl Renderable for ProgressRow {
    fn render(&self, width: usize) -> Vec<Segment> {
        let _span = debug_span!("widget_render", widget = "ProgressRow", width).entered();
        if self.fields.is_empty() {
            return Vec::new();
        }
        let ascii = RenderConfig::current().ascii_only;
        let sizings: Vec<Sizing> = self
            .fields
            .iter()
            .map(|entry| self.resolved_sizing(entry))
            .collect();
        let gaps = self.padding * (self.fields.len() - 1);
        let widths = allocate_widths(&sizings, width.saturating_sub(gaps));
        debug!(completed = self.completed, total = self.total, ?widths, "progress layout");

        let mut out = Vec::new();
        for (index, (entry, field_width)) in self.fields.iter().zip(widths).enumerate() {
            if index > 0 && self.padding > 0 {
                out.push(Segment::blank(self.padding, None));
            }
            out.extend(self.field_segments(&entry.field, field_width, ascii));
        }
        out.push(Segment::line());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gloss_core::{ConfigOverride, with_config_override};
    use gloss_layout::SizeConstraint;

    fn text(segments: &[Segment]) -> String {
        segments
            .iter()
            .filter(|s| !s.is_control())
            .map(|s| s.text.as_ref())
            .collect()
    }

    fn bar_only(completed: u64, total: u64) -> ProgressRow {
        let mut row = ProgressRow::new("", total).fields([Field::Bar]);
        row.update(completed);
        row
    }

    #[test]
    fn empty_bar_is_all_remaining() {
        let out = bar_only(0, 10).render(10);
        assert_eq!(text(&out), "━".repeat(10));
        assert_eq!(out[0].style, Some(Style::new().with_color(Color::Indexed(237))));
    }

    #[test]
    fn half_done_starts_remaining_with_left_half() {
        let out = bar_only(5, 10).render(10);
        assert_eq!(out[0].text, "━━━━━");
        assert_eq!(out[1].text, "╺━━━━");
    }

    #[test]
    fn odd_halves_end_with_right_half() {
        // 1/4 of 10 cells is 5 half cells.
        let out = bar_only(1, 4).render(10);
        assert_eq!(out[0].text, "━━╸");
        assert_eq!(out[1].text, "━━━━━━━");
    }

    #[test]
    fn finished_uses_finished_style() {
        let out = bar_only(10, 10).render(6);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].text, "━━━━━━");
        assert_eq!(out[0].style, Some(Style::new().with_color(Color::from_rgb(114, 156, 31))));
    }

    #[test]
    fn ascii_fallback() {
        let out = with_config_override(ConfigOverride::new().ascii_only(Some(true)), || {
            bar_only(5, 10).render(10)
        });
        assert_eq!(text(&out), "#####-----");
    }

    #[test]
    fn update_caps_at_total() {
        let mut row = ProgressRow::new("x", 3);
        row.advance(7);
        assert_eq!(row.completed(), 3);
        assert!(row.is_finished());
        assert_eq!(row.percentage(), 100);
    }

    #[test]
    fn zero_total_never_finishes() {
        let row = ProgressRow::new("x", 0);
        assert!(!row.is_finished());
        assert_eq!(row.percentage(), 0);
        assert_eq!(text(&bar_only(0, 0).render(4)), "━━━━");
    }

    #[test]
    fn default_row_layout() {
        let mut row = ProgressRow::new("copy", 10);
        row.update(5);
        let out = text(&row.render(20));
        // "copy" + gap + 10-cell bar + gap + " 50%"
        assert_eq!(gloss_text::width::measure(&out), 20);
        assert!(out.starts_with("copy ━━━━━╺━━━━ "));
        assert!(out.ends_with(" 50%"));
    }

    #[test]
    fn counter_and_text_fields() {
        let mut row = ProgressRow::new("t", 12)
            .fields([Field::Counter, Field::Text("files".into())])
            .sizing(&Field::Counter, SizeConstraint::Fixed(6));
        row.update(3);
        assert_eq!(text(&row.render(20)), "  3/12 files");
    }

    #[test]
    fn explicit_bar_width() {
        let row = ProgressRow::new("d", 2)
            .fields([Field::Description])
            .field(Field::Bar, SizeConstraint::Fixed(4));
        assert_eq!(text(&row.render(40)), "d ━━━━");
    }

    #[test]
    fn description_is_cropped_to_its_width() {
        let row = ProgressRow::new("long description", 1)
            .fields([Field::Description])
            .sizing(&Field::Description, SizeConstraint::Fixed(4));
        assert_eq!(text(&row.render(40)), "long");
    }
}
