#![forbid(unsafe_code)]

//! Flow items into as many text columns as fit.

use gloss_layout::{SizeConstraint, allocate_widths};
use gloss_text::segment::{Segment, line_length, set_shape, split_lines};
use tracing::{debug, debug_span};

use crate::Renderable;

/// Items laid out in columns, like `ls` output.
#[derive(Debug, Clone)]
pub struct Columns {
    items: Vec<Vec<Segment>>,
    padding: usize,
    expand: bool,
    column_first: bool,
    width: Option<usize>,
}

impl Default for Columns {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            padding: 1,
            expand: false,
            column_first: false,
            width: None,
        }
    }
}

impl Columns {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: impl IntoIterator<Item = Segment>) {
        self.items.push(item.into_iter().collect());
    }

    #[must_use]
    pub fn item(mut self, item: impl IntoIterator<Item = Segment>) -> Self {
        self.push(item);
        self
    }

    /// Add one plain-text item per string.
    #[must_use]
    pub fn texts<S: Into<String>>(mut self, texts: impl IntoIterator<Item = S>) -> Self {
        for text in texts {
            self.push([Segment::text(text.into())]);
        }
        self
    }

    /// Blank cells between columns.
    #[must_use]
    pub fn padding(mut self, padding: usize) -> Self {
        self.padding = padding;
        self
    }

    /// Share the whole width equally instead of sizing to the widest item.
    #[must_use]
    pub fn expand(mut self, expand: bool) -> Self {
        self.expand = expand;
        self
    }

    /// Fill top to bottom, then left to right.
    #[must_use]
    pub fn column_first(mut self, column_first: bool) -> Self {
        self.column_first = column_first;
        self
    }

    #[must_use]
    pub fn width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Item index at (`row`, `col`) for a layout of `rows` x `columns`.
    fn index(&self, row: usize, col: usize, rows: usize, columns: usize) -> usize {
        if self.column_first {
            col * rows + row
        } else {
            row * columns + col
        }
    }

    /// Widest item in each column for `columns` columns.
    fn column_widths(&self, item_widths: &[usize], columns: usize) -> Vec<usize> {
        let rows = item_widths.len().div_ceil(columns);
        let mut widths = vec![0; columns];
        for row in 0..rows {
            for (col, width) in widths.iter_mut().enumerate() {
                if let Some(&w) = item_widths.get(self.index(row, col, rows, columns)) {
                    *width = (*width).max(w);
                }
            }
        }
        widths
    }

    /// The most columns whose natural widths fit in `total`. Always at least 1.
    fn fit_columns(&self, item_widths: &[usize], total: usize) -> usize {
        (1..=item_widths.len())
            .rev()
            .find(|&columns| {
                let natural: usize = self.column_widths(item_widths, columns).iter().sum();
                natural + self.padding * (columns - 1) <= total
            })
            .unwrap_or(1)
    }
}

impl Renderable for Columns {
    fn render(&self, width: usize) -> Vec<Segment> {
        let total = self.width.unwrap_or(width);
        let _span = debug_span!("widget_render", widget = "Columns", width = total).entered();
        if self.items.is_empty() {
            return Vec::new();
        }

        let item_lines: Vec<Vec<Vec<Segment>>> = self
            .items
            .iter()
            .map(|item| split_lines(item.iter().cloned()))
            .collect();
        let item_widths: Vec<usize> = item_lines
            .iter()
            .map(|lines| lines.iter().map(|l| line_length(l)).max().unwrap_or(0))
            .collect();

        let columns = self.fit_columns(&item_widths, total);
        let rows = self.items.len().div_ceil(columns);
        let sizing: Vec<SizeConstraint> = if self.expand {
            vec![SizeConstraint::Automatic; columns]
        } else {
            // Only the one-column fallback can be wider than `total`; it is cropped.
            self.column_widths(&item_widths, columns)
                .into_iter()
                .map(|widest| SizeConstraint::Fixed(widest.min(total)))
                .collect()
        };
        let widths = allocate_widths(&sizing, total.saturating_sub(self.padding * (columns - 1)));
        debug!(items = self.items.len(), columns, rows, ?widths, "columns layout");

        let mut out = Vec::new();
        for row in 0..rows {
            let cells: Vec<(usize, Vec<Vec<Segment>>)> = (0..columns)
                .map(|col| {
                    let lines = item_lines
                        .get(self.index(row, col, rows, columns))
                        .map_or_else(Vec::new, Clone::clone);
                    (widths[col], lines)
                })
                .collect();
            let height = cells.iter().map(|(_, lines)| lines.len()).max().unwrap_or(0).max(1);
            let shaped: Vec<Vec<Vec<Segment>>> = cells
                .iter()
                .map(|(w, lines)| set_shape(lines, *w, Some(height), None))
                .collect();

            for line in 0..height {
                for (col, cell) in shaped.iter().enumerate() {
                    if col > 0 && self.padding > 0 {
                        out.push(Segment::blank(self.padding, None));
                    }
                    out.extend(cell[line].iter().cloned());
                }
                out.push(Segment::line());
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(segments: &[Segment]) -> Vec<String> {
        let mut out = vec![String::new()];
        for segment in segments {
            if segment.control.is_some() {
                out.push(String::new());
            } else if let Some(last) = out.last_mut() {
                last.push_str(&segment.text);
            }
        }
        out.pop();
        out
    }

    #[test]
    fn fits_as_many_columns_as_possible() {
        let columns = Columns::new().texts(["aa", "bb", "cc", "dd", "ee"]);
        // 3 columns: 2 + 1 + 2 + 1 + 2 = 8 fits in 9; 4 needs 11.
        assert_eq!(lines(&columns.render(9)), ["aa bb cc", "dd ee   "]);
    }

    #[test]
    fn column_first_order() {
        let columns = Columns::new()
            .texts(["a", "b", "c", "d"])
            .column_first(true);
        assert_eq!(lines(&columns.render(3)), ["a c", "b d"]);
    }

    #[test]
    fn narrow_width_falls_back_to_one_column() {
        let columns = Columns::new().texts(["abcdef", "gh"]);
        assert_eq!(lines(&columns.render(3)), ["abc", "gh "]);
    }

    #[test]
    fn oversized_items_never_exceed_the_width() {
        let columns = Columns::new().texts(["abcdef", "日本語テキスト", "x"]);
        for width in 1..10 {
            let rendered = columns.render(width);
            for line in split_lines(rendered) {
                assert!(line_length(&line) <= width, "width {width}: {line:?}");
            }
        }
    }

    #[test]
    fn expand_shares_width_equally() {
        let columns = Columns::new().texts(["a", "b"]).expand(true);
        let rendered = lines(&columns.render(9));
        assert_eq!(rendered, ["a    b   "]);
    }

    #[test]
    fn multi_line_items_set_row_height() {
        let columns = Columns::new().item([Segment::text("x\ny")]).texts(["z"]);
        assert_eq!(lines(&columns.render(10)), ["x z", "y  "]);
    }

    #[test]
    fn empty_renders_nothing() {
        assert!(Columns::new().render(10).is_empty());
        assert!(Columns::new().is_empty());
    }
}
