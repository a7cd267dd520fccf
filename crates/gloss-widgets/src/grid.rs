#![forbid(unsafe_code)]

//! Grid rendering with column and row spanning.
//!
//! [`render_grid`] lays a matrix of [`GridCell`]s over column widths that
//! came out of the width allocator and produces the final segment stream,
//! separators and rules included.
//!
//! Rendering runs in two passes:
//!
//! 1. Placement. Rows are walked left to right with a [`RowSpanTracker`].
//!    A column still owned by a cell from an earlier row becomes a
//!    continuation of that cell; otherwise the next cell is consumed, its
//!    colspan clamped to the free columns, and its rowspan registered.
//! 2. Drawing. Each row is as tall as its tallest single-row cell. A
//!    row-spanning cell's lines flow down through the rows it covers and the
//!    last covered row grows to fit whatever is left. Rules between rows pick
//!    each junction glyph from the lines that actually meet there.
//!
//! # Example
//!
//! ```
//! use gloss_widgets::grid::{GridBorders, GridCell, render_grid};
//! use gloss_widgets::borders::BorderSet;
//!
//! let rows = vec![
//!     vec![GridCell::text("X").with_colspan(2), GridCell::text("Y")],
//! ];
//! let borders = GridBorders::new(BorderSet::ASCII);
//! let out = render_grid(&rows, &[3, 3, 3], &borders);
//! let text: String = out.iter().map(|s| s.text.as_ref()).collect();
//! assert_eq!(text, "+-------+---+\n|X      |Y  |\n+-------+---+\n");
//! ```

use gloss_style::Style;
use gloss_text::segment::{Segment, adjust_line_length, split_lines};
use smallvec::SmallVec;
use tracing::{debug, debug_span};

use crate::borders::{Arms, BorderSet};

/// Width of the vertical separator between columns.
const SEPARATOR_WIDTH: usize = 1;

/// One cell of a grid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridCell {
    pub content: Vec<Segment>,
    /// Base columns covered; at least 1.
    pub colspan: usize,
    /// Rows covered; at least 1.
    pub rowspan: usize,
    /// Applied underneath the content and used for padding.
    pub style: Option<Style>,
}

impl GridCell {
    pub fn new(content: impl IntoIterator<Item = Segment>) -> Self {
        Self {
            content: content.into_iter().collect(),
            colspan: 1,
            rowspan: 1,
            style: None,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new([Segment::text(text.into())])
    }

    pub fn empty() -> Self {
        Self::new([])
    }

    #[must_use]
    pub fn with_colspan(mut self, colspan: usize) -> Self {
        self.colspan = colspan.max(1);
        self
    }

    #[must_use]
    pub fn with_rowspan(mut self, rowspan: usize) -> Self {
        self.rowspan = rowspan.max(1);
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = Some(style);
        self
    }
}

impl From<&str> for GridCell {
    fn from(text: &str) -> Self {
        GridCell::text(text)
    }
}

impl From<String> for GridCell {
    fn from(text: String) -> Self {
        GridCell::text(text)
    }
}

/// A vertical span still holding columns in later rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveSpan {
    /// Rows still covered, counting the row being laid out.
    pub remaining_rows: usize,
    /// Slot of the spanning cell in the render's content arena.
    pub owner: usize,
    pub origin_col: usize,
    pub colspan: usize,
}

/// Which columns are held by cells from earlier rows.
///
/// Lives for one render call.
#[derive(Debug, Clone)]
pub struct RowSpanTracker {
    columns: Vec<Option<ActiveSpan>>,
}

impl RowSpanTracker {
    pub fn new(columns: usize) -> Self {
        Self {
            columns: vec![None; columns],
        }
    }

    #[inline]
    pub fn columns(&self) -> usize {
        self.columns.len()
    }

    /// Hold `colspan` columns from `origin_col` for `rowspan` rows, the
    /// current row included. Single-row cells are not tracked.
    pub fn register(&mut self, origin_col: usize, colspan: usize, rowspan: usize, owner: usize) {
        if rowspan <= 1 {
            return;
        }
        let end = origin_col.saturating_add(colspan).min(self.columns.len());
        let span = ActiveSpan {
            remaining_rows: rowspan,
            owner,
            origin_col,
            colspan: end.saturating_sub(origin_col),
        };
        for slot in self.columns.iter_mut().take(end).skip(origin_col) {
            *slot = Some(span);
        }
    }

    #[inline]
    pub fn is_blocked(&self, col: usize) -> bool {
        self.owner(col).is_some()
    }

    #[inline]
    pub fn owner(&self, col: usize) -> Option<&ActiveSpan> {
        self.columns.get(col).and_then(Option::as_ref)
    }

    /// Finish a row: every span loses one row and frees its columns at zero.
    pub fn advance(&mut self) {
        for slot in &mut self.columns {
            if let Some(span) = slot {
                span.remaining_rows = span.remaining_rows.saturating_sub(1);
                if span.remaining_rows == 0 {
                    *slot = None;
                }
            }
        }
    }

    /// Consecutive unblocked columns starting at `col`.
    pub fn free_run(&self, col: usize) -> usize {
        self.columns
            .get(col..)
            .map_or(0, |rest| rest.iter().take_while(|slot| slot.is_none()).count())
    }
}

/// Separator glyphs and which rules to draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridBorders {
    pub set: BorderSet,
    pub style: Option<Style>,
    /// Outer frame: left and right edges plus top and bottom rules.
    pub edges: bool,
    /// A rule between every pair of rows.
    pub row_rules: bool,
    /// Leading rows followed by a rule even without `row_rules`.
    pub header_rows: usize,
    /// Blank cells on each side of the content inside every cell.
    pub padding: usize,
}

impl GridBorders {
    /// Edges on, no inner rules, no padding.
    pub fn new(set: BorderSet) -> Self {
        Self {
            set,
            style: None,
            edges: true,
            row_rules: false,
            header_rows: 0,
            padding: 0,
        }
    }

    #[must_use]
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = Some(style);
        self
    }

    #[must_use]
    pub fn edges(mut self, edges: bool) -> Self {
        self.edges = edges;
        self
    }

    #[must_use]
    pub fn row_rules(mut self, row_rules: bool) -> Self {
        self.row_rules = row_rules;
        self
    }

    #[must_use]
    pub fn header_rows(mut self, rows: usize) -> Self {
        self.header_rows = rows;
        self
    }

    #[must_use]
    pub fn padding(mut self, padding: usize) -> Self {
        self.padding = padding;
        self
    }

    /// Cells taken by separators and edges around `columns` columns.
    pub fn chrome_width(&self, columns: usize) -> usize {
        let inner = columns.saturating_sub(1) * SEPARATOR_WIDTH;
        if self.edges {
            inner + 2 * SEPARATOR_WIDTH
        } else {
            inner
        }
    }

    fn segment(&self, text: String) -> Segment {
        Segment {
            text: text.into(),
            style: self.style.clone(),
            control: None,
        }
    }
}

/// Width of `span` columns from `start`, separators included.
fn span_width(widths: &[usize], start: usize, span: usize) -> usize {
    let end = (start + span).min(widths.len());
    let sum: usize = widths[start..end].iter().sum();
    sum + end.saturating_sub(start).saturating_sub(1) * SEPARATOR_WIDTH
}

/// One placed item in a row: a cell, a continuation of a spanning cell from
/// above, or filler for a column the row left empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Placed {
    start: usize,
    span: usize,
    content: Option<usize>,
    continuation: bool,
}

impl Placed {
    #[inline]
    fn covers(&self, col: usize) -> bool {
        self.start <= col && col < self.start + self.span
    }
}

type RowPlacement = SmallVec<[Placed; 8]>;

/// A consumed cell's lines and its flow cursor.
#[derive(Debug)]
struct CellBlock {
    lines: Vec<Vec<Segment>>,
    width: usize,
    style: Option<Style>,
    last_row: usize,
    next_line: usize,
}

impl CellBlock {
    fn new(cell: &GridCell, width: usize, last_row: usize) -> Self {
        let content = cell.content.iter().map(|segment| match &cell.style {
            Some(style) => segment.apply_style(style),
            None => segment.clone(),
        });
        Self {
            lines: split_lines(content),
            width,
            style: cell.style.clone(),
            last_row,
            next_line: 0,
        }
    }

    fn remaining_lines(&self) -> usize {
        self.lines.len().saturating_sub(self.next_line)
    }

    /// Line `offset` below the cursor, padded to the block width.
    fn line(&self, offset: usize, padding: usize, out: &mut Vec<Segment>) {
        let pad = padding.min(self.width / 2);
        let inner = self.width - 2 * pad;
        if pad > 0 {
            out.push(Segment::blank(pad, self.style.clone()));
        }
        match self.lines.get(self.next_line + offset) {
            Some(line) => out.extend(adjust_line_length(line, inner, self.style.as_ref(), true)),
            None => out.push(Segment::blank(inner, self.style.clone())),
        }
        if pad > 0 {
            out.push(Segment::blank(pad, self.style.clone()));
        }
    }
}

/// Render `rows` over the resolved column `widths`.
///
/// Each output line ends with [`Segment::line`]. A cell whose colspan is
/// larger than the free columns left in its row is clamped to them; cells
/// beyond the last column are dropped. Neither is an error.
pub fn render_grid(rows: &[Vec<GridCell>], widths: &[usize], borders: &GridBorders) -> Vec<Segment> {
    let _span = debug_span!("render_grid", rows = rows.len(), columns = widths.len()).entered();
    if rows.is_empty() || widths.is_empty() {
        return Vec::new();
    }

    let (placements, mut blocks) = place(rows, widths);
    let mut out = Vec::new();

    if borders.edges {
        out.push(rule(widths, None, placements.first(), borders));
        out.push(Segment::line());
    }

    for (r, row) in placements.iter().enumerate() {
        if r > 0 && (borders.row_rules || r == borders.header_rows) {
            out.push(rule(widths, placements.get(r - 1), Some(row), borders));
            out.push(Segment::line());
        }

        let height = row
            .iter()
            .filter_map(|item| item.content.map(|id| &blocks[id]))
            .filter(|block| block.last_row == r)
            .map(CellBlock::remaining_lines)
            .fold(1, usize::max);

        for offset in 0..height {
            if borders.edges {
                out.push(borders.segment(borders.set.vertical.to_string()));
            }
            for (i, item) in row.iter().enumerate() {
                if i > 0 {
                    out.push(borders.segment(borders.set.vertical.to_string()));
                }
                match item.content {
                    Some(id) => blocks[id].line(offset, borders.padding, &mut out),
                    None => out.push(Segment::blank(span_width(widths, item.start, item.span), None)),
                }
            }
            if borders.edges {
                out.push(borders.segment(borders.set.vertical.to_string()));
            }
            out.push(Segment::line());
        }

        for id in row.iter().filter_map(|item| item.content) {
            blocks[id].next_line += height;
        }
    }

    if borders.edges {
        out.push(rule(widths, placements.last(), None, borders));
        out.push(Segment::line());
    }
    out
}

/// Placement pass: decide which cell owns which columns in every row.
fn place(rows: &[Vec<GridCell>], widths: &[usize]) -> (Vec<RowPlacement>, Vec<CellBlock>) {
    let columns = widths.len();
    let last_row = rows.len() - 1;
    let mut tracker = RowSpanTracker::new(columns);
    let mut blocks: Vec<CellBlock> = Vec::new();
    let mut placements = Vec::with_capacity(rows.len());
    let mut clamped = 0usize;
    let mut dropped = 0usize;

    for (r, row) in rows.iter().enumerate() {
        let mut placed = RowPlacement::new();
        let mut cells = row.iter();
        let mut col = 0;
        while col < columns {
            if let Some(span) = tracker.owner(col).copied() {
                placed.push(Placed {
                    start: span.origin_col,
                    span: span.colspan,
                    content: Some(span.owner),
                    continuation: true,
                });
                col = span.origin_col + span.colspan;
                continue;
            }
            let Some(cell) = cells.next() else {
                placed.push(Placed {
                    start: col,
                    span: 1,
                    content: None,
                    continuation: false,
                });
                col += 1;
                continue;
            };

            let free = tracker.free_run(col);
            let requested = cell.colspan.max(1);
            let span = requested.min(free);
            if span < requested {
                clamped += 1;
                debug!(row = r, column = col, requested, available = free, "clamped colspan");
            }
            let id = blocks.len();
            let rowspan = cell.rowspan.max(1);
            blocks.push(CellBlock::new(
                cell,
                span_width(widths, col, span),
                (r + rowspan - 1).min(last_row),
            ));
            tracker.register(col, span, rowspan, id);
            placed.push(Placed {
                start: col,
                span,
                content: Some(id),
                continuation: false,
            });
            col += span;
        }

        let extra = cells.count();
        if extra > 0 {
            dropped += extra;
            debug!(row = r, extra, "dropped cells past the last column");
        }
        tracker.advance();
        placements.push(placed);
    }

    debug!(rows = rows.len(), columns, clamped, dropped, "placed grid");
    (placements, blocks)
}

/// A horizontal rule between `above` and `below` (either may be absent for
/// the outer edges).
fn rule(
    widths: &[usize],
    above: Option<&RowPlacement>,
    below: Option<&RowPlacement>,
    borders: &GridBorders,
) -> Segment {
    let columns = widths.len();
    let continuing = |col: usize| {
        below.is_some_and(|row| row.iter().any(|item| item.continuation && item.covers(col)))
    };
    let separator = |row: &RowPlacement, boundary: usize| {
        if boundary == 0 || boundary == columns {
            borders.edges
        } else {
            row.iter().any(|item| item.start == boundary)
        }
    };

    let mut text = String::new();
    for boundary in 0..=columns {
        let edge = boundary == 0 || boundary == columns;
        if !edge || borders.edges {
            let arms = Arms::from_sides(
                above.is_some_and(|row| separator(row, boundary)),
                below.is_some_and(|row| separator(row, boundary)),
                boundary > 0 && !continuing(boundary - 1),
                boundary < columns && !continuing(boundary),
            );
            text.push(borders.set.junction(arms));
        }
        if boundary < columns {
            let fill = if continuing(boundary) {
                ' '
            } else {
                borders.set.horizontal
            };
            text.extend(std::iter::repeat_n(fill, widths[boundary]));
        }
    }
    borders.segment(text)
}
