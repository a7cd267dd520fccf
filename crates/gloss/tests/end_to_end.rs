#![forbid(unsafe_code)]

//! Styles, layouts and presentation working together.

use gloss::core::logging::init_test_logging;
use gloss::Rect;
use gloss::prelude::*;
use gloss::text::segment::strip_styles;
use proptest::prelude::*;

fn plain_lines(segments: &[Segment]) -> Vec<String> {
    let text = Presenter::new(ColorDepth::NoColor).render_plain(segments);
    text.lines().map(str::to_owned).collect()
}

fn dashboard() -> Pane {
    let mut files = Table::new([
        Column::new("file").sizing(SizeConstraint::Ratio(1)),
        Column::new("size").sizing(SizeConstraint::Fixed(4)),
    ]);
    files.add_row(["a.rs", "1k"]);
    files.add_row([GridCell::text("total 1k").with_colspan(2)]);

    let mut copy = ProgressRow::new("copy", 4);
    copy.advance(2);

    let mut root = Pane::new().named("root");
    root.split_column([
        Pane::new().named("files"),
        Pane::new().named("status").size(1),
    ]);
    let width = 24;
    root.update("files", files.render(width));
    root.update("status", copy.render(width));
    root
}

#[test]
fn pane_layout_is_an_exact_block() {
    init_test_logging();
    let segments = dashboard().render(24, 9);
    assert_eq!(count_lines(&segments), 9);
    let lines = plain_lines(&segments);
    assert_eq!(lines.len(), 9);
    for line in &lines {
        assert_eq!(measure(line), 24, "{line:?}");
    }
    assert!(lines[8].starts_with("copy "));
    assert!(lines[8].ends_with(" 50%"));
}

#[test]
fn region_map_reports_every_named_pane() {
    let regions = dashboard().region_map(24, 9);
    assert_eq!(regions["root"], Rect::new(0, 0, 24, 9));
    assert_eq!(regions["files"], Rect::new(0, 0, 24, 8));
    assert_eq!(regions["status"], Rect::new(0, 8, 24, 1));
}

#[test]
fn parsed_styles_reach_the_terminal() {
    let style: Style = "bold #ff0000 on blue".parse().unwrap_or_default();
    let segments = [Segment::styled("hot", style), Segment::line()];

    let mut true_color = Presenter::new(ColorDepth::TrueColor);
    assert_eq!(true_color.render(&segments), "\x1b[1;38;2;255;0;0;44mhot\x1b[0m\n");

    let mut eight_bit = Presenter::new(ColorDepth::EightBit);
    assert_eq!(eight_bit.render(&segments), "\x1b[1;38;5;9;44mhot\x1b[0m\n");

    assert_eq!(strip_styles(&segments)[0].style, None);
}

#[test]
fn ascii_override_changes_table_borders() {
    let table = Table::new([Column::new("k"), Column::new("v")]).row(["1", "2"]);
    let unicode = plain_lines(&table.render(12));
    let ascii = with_config_override(ConfigOverride::new().ascii_only(Some(true)), || {
        plain_lines(&table.render(12))
    });
    assert!(unicode[0].starts_with('┌'));
    assert!(ascii[0].starts_with('+'));
    assert_eq!(unicode.len(), ascii.len());
}

#[test]
fn cjk_override_widens_ambiguous_characters() {
    assert_eq!(measure("±"), 1);
    let wide = with_config_override(ConfigOverride::new().cjk_width(Some(true)), || measure("±"));
    assert_eq!(wide, 2);
}

#[test]
fn columns_flow_within_width() {
    let columns = Columns::new().texts(["one", "two", "three", "four"]);
    let lines = plain_lines(&columns.render(12));
    assert_eq!(lines, ["one   two ", "three four"]);
}

fn table_strategy() -> impl Strategy<Value = (Table, usize)> {
    (1usize..4).prop_flat_map(|columns| {
        let row = proptest::collection::vec("[a-z ]{0,12}", 0..=columns);
        (
            proptest::collection::vec(row, 0..5),
            any::<bool>(),
            (4 * columns + 1)..60,
        )
            .prop_map(move |(rows, show_lines, width)| {
                let mut table = Table::new((0..columns).map(|index| Column::new(format!("c{index}"))))
                    .show_lines(show_lines);
                for row in rows {
                    table.add_row(row);
                }
                (table, width)
            })
    })
}

proptest! {
    #[test]
    fn table_lines_fill_the_requested_width((table, width) in table_strategy()) {
        let segments = table.render(width);
        let lines = plain_lines(&segments);
        prop_assert_eq!(lines.len(), count_lines(&segments));
        for line in &lines {
            prop_assert_eq!(measure(line), width, "{:?}", line);
        }
    }
}
