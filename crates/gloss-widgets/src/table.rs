#![forbid(unsafe_code)]

//! Bordered tables with column and row spanning.

use gloss_core::RenderConfig;
use gloss_layout::{Sizing, allocate_widths};
use gloss_style::Style;
use gloss_text::segment::Segment;
use tracing::debug_span;

use crate::Renderable;
use crate::borders::BorderType;
use crate::grid::{GridBorders, GridCell, render_grid};

/// A table column: header text and how wide it wants to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub header: String,
    pub sizing: Sizing,
    pub header_style: Option<Style>,
}

impl Column {
    /// An automatically sized column.
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            sizing: Sizing::automatic(),
            header_style: None,
        }
    }

    #[must_use]
    pub fn sizing(mut self, sizing: impl Into<Sizing>) -> Self {
        self.sizing = sizing.into();
        self
    }

    #[must_use]
    pub fn header_style(mut self, style: Style) -> Self {
        self.header_style = Some(style);
        self
    }
}

/// A table rendered through the grid renderer.
///
/// # Example
/// ```
/// use gloss_widgets::{Column, Renderable, Table};
/// use gloss_widgets::borders::BorderType;
///
/// let mut table = Table::new([Column::new("A"), Column::new("B")])
///     .border_type(BorderType::Ascii);
/// table.add_row(["1", "2"]);
///
/// let out = table.render(11);
/// let lines = out.iter().filter(|s| s.is_control()).count();
/// // top, header, header rule, row, bottom
/// assert_eq!(lines, 5);
/// ```
#[derive(Debug, Clone)]
pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Vec<GridCell>>,
    border_type: BorderType,
    border_style: Option<Style>,
    header_style: Style,
    show_header: bool,
    show_lines: bool,
    show_edge: bool,
    padding: usize,
    width: Option<usize>,
}

impl Table {
    pub fn new(columns: impl IntoIterator<Item = Column>) -> Self {
        Self {
            columns: columns.into_iter().collect(),
            rows: Vec::new(),
            border_type: BorderType::default(),
            border_style: None,
            header_style: Style::new().bold(),
            show_header: true,
            show_lines: false,
            show_edge: true,
            padding: 1,
            width: None,
        }
    }

    pub fn add_row<C: Into<GridCell>>(&mut self, cells: impl IntoIterator<Item = C>) {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }

    #[must_use]
    pub fn row<C: Into<GridCell>>(mut self, cells: impl IntoIterator<Item = C>) -> Self {
        self.add_row(cells);
        self
    }

    #[must_use]
    pub fn border_type(mut self, border_type: BorderType) -> Self {
        self.border_type = border_type;
        self
    }

    #[must_use]
    pub fn border_style(mut self, style: Style) -> Self {
        self.border_style = Some(style);
        self
    }

    /// Style under every header; a column's own header style goes on top.
    #[must_use]
    pub fn header_style(mut self, style: Style) -> Self {
        self.header_style = style;
        self
    }

    #[must_use]
    pub fn show_header(mut self, show: bool) -> Self {
        self.show_header = show;
        self
    }

    /// Rules between body rows.
    #[must_use]
    pub fn show_lines(mut self, show: bool) -> Self {
        self.show_lines = show;
        self
    }

    /// The outer frame.
    #[must_use]
    pub fn show_edge(mut self, show: bool) -> Self {
        self.show_edge = show;
        self
    }

    #[must_use]
    pub fn padding(mut self, padding: usize) -> Self {
        self.padding = padding;
        self
    }

    /// Fixed total width; otherwise the width passed to `render`.
    #[must_use]
    pub fn width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn borders(&self) -> GridBorders {
        let mut borders = GridBorders::new(self.border_type.resolve(&RenderConfig::current()))
            .edges(self.show_edge)
            .row_rules(self.show_lines)
            .header_rows(usize::from(self.show_header))
            .padding(self.padding);
        borders.style = self.border_style.clone();
        borders
    }

    fn header_row(&self) -> Vec<GridCell> {
        self.columns
            .iter()
            .map(|column| {
                let style = match &column.header_style {
                    Some(own) => self.header_style.combine(own),
                    None => self.header_style.clone(),
                };
                GridCell::text(column.header.clone()).with_style(style)
            })
            .collect()
    }

    /// Resolved column widths for a total width, borders excluded.
    pub fn column_widths(&self, total: usize) -> Vec<usize> {
        let chrome = self.borders().chrome_width(self.columns.len());
        let sizings: Vec<Sizing> = self.columns.iter().map(|c| c.sizing).collect();
        allocate_widths(&sizings, total.saturating_sub(chrome))
    }
}

impl Renderable for Table {
    fn render(&self, width: usize) -> Vec<Segment> {
        let total = self.width.unwrap_or(width);
        let _span = debug_span!(
            "widget_render",
            widget = "Table",
            width = total,
            columns = self.columns.len(),
            rows = self.rows.len()
        )
        .entered();
        if self.columns.is_empty() {
            return Vec::new();
        }

        let widths = self.column_widths(total);
        let mut rows = Vec::with_capacity(self.rows.len() + 1);
        if self.show_header {
            rows.push(self.header_row());
        }
        rows.extend(self.rows.iter().cloned());
        render_grid(&rows, &widths, &self.borders())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gloss_core::{ConfigOverride, with_config_override};
    use gloss_layout::SizeConstraint;

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

    fn ascii_table() -> Table {
        Table::new([
            Column::new("A").sizing(SizeConstraint::Fixed(3)),
            Column::new("B").sizing(SizeConstraint::Fixed(3)),
            Column::new("C").sizing(SizeConstraint::Fixed(3)),
        ])
        .border_type(BorderType::Ascii)
        .padding(0)
    }

    #[test]
    fn renders_header_and_rows() {
        let table = ascii_table().row(["1", "2", "3"]);
        assert_eq!(
            lines(&table.render(40)),
            [
                "+---+---+---+",
                "|A  |B  |C  |",
                "+---+---+---+",
                "|1  |2  |3  |",
                "+---+---+---+",
            ]
        );
    }

    #[test]
    fn colspan_row_spans_two_columns_and_separator() {
        let table = ascii_table()
            .show_header(false)
            .row([GridCell::text("X").with_colspan(2), GridCell::text("Y")]);
        assert_eq!(
            lines(&table.render(40)),
            ["+-------+---+", "|X      |Y  |", "+-------+---+"]
        );
    }

    #[test]
    fn widths_come_from_the_allocator() {
        let table = Table::new([
            Column::new("a").sizing(SizeConstraint::Fixed(10)),
            Column::new("b").sizing(SizeConstraint::Ratio(1)),
            Column::new("c").sizing(SizeConstraint::Ratio(2)),
        ]);
        // 44 total minus 4 border cells leaves the 40 of the scenario.
        assert_eq!(table.column_widths(44), vec![10, 10, 20]);
    }

    #[test]
    fn show_lines_adds_body_rules() {
        let table = ascii_table().row(["1", "2", "3"]).row(["4", "5", "6"]).show_lines(true);
        assert_eq!(lines(&table.render(40)).len(), 7);
        let table = ascii_table().row(["1", "2", "3"]).row(["4", "5", "6"]);
        assert_eq!(lines(&table.render(40)).len(), 6);
    }

    #[test]
    fn no_edge() {
        let table = ascii_table().show_edge(false).show_header(false).row(["1", "2", "3"]);
        assert_eq!(lines(&table.render(40)), ["1  |2  |3  "]);
    }

    #[test]
    fn header_style_combines() {
        let table = Table::new([Column::new("A").header_style(Style::new().italic())])
            .padding(0)
            .show_edge(false);
        let out = table.render(5);
        let style = out[0].style.clone().unwrap_or_default();
        assert!(style.is_on(gloss_style::Attribute::Bold));
        assert!(style.is_on(gloss_style::Attribute::Italic));
    }

    #[test]
    fn ascii_config_forces_ascii_borders() {
        let table = Table::new([Column::new("A")]).border_type(BorderType::Rounded);
        let out = with_config_override(ConfigOverride::new().ascii_only(Some(true)), || {
            table.render(10)
        });
        assert!(lines(&out).iter().all(|line| line.is_ascii()));
    }

    #[test]
    fn fixed_width_overrides_render_width() {
        let table = Table::new([Column::new("A"), Column::new("B")]).width(21);
        for line in lines(&table.render(80)) {
            assert_eq!(gloss_text::width::measure(&line), 21);
        }
    }

    #[test]
    fn no_columns_render_nothing() {
        assert!(Table::new([]).render(40).is_empty());
    }
}
