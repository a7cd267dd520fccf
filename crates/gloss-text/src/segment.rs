#![forbid(unsafe_code)]

//! Styled text segments and line helpers.
//!
//! A [`Segment`] is the unit every renderable produces: a run of text with an
//! optional [`Style`], or a zero-width control marker. Renderers build a
//! `Vec<Segment>` and the presenter turns it into terminal bytes.

use std::borrow::Cow;
use std::ops::Range;

use gloss_style::Style;
use tracing::trace;

use crate::error::{Result, SegmentError};
use crate::width::{byte_index_for_column, measure};

/// Non-printing terminal actions carried by a control segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ControlCode {
    LineBreak,
    CarriageReturn,
    Bell,
    CursorUp(u16),
    EraseLine,
    Home,
}

/// A piece of text with an optional style, or a control marker.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Segment {
    pub text: Cow<'static, str>,
    pub style: Option<Style>,
    pub control: Option<ControlCode>,
}

impl Segment {
    /// Plain text, no style.
    pub fn text(text: impl Into<Cow<'static, str>>) -> Self {
        Self {
            text: text.into(),
            style: None,
            control: None,
        }
    }

    pub fn styled(text: impl Into<Cow<'static, str>>, style: Style) -> Self {
        Self {
            text: text.into(),
            style: Some(style),
            control: None,
        }
    }

    /// A control marker with no printable text.
    pub fn control(code: ControlCode) -> Self {
        Self {
            text: Cow::Borrowed(""),
            style: None,
            control: Some(code),
        }
    }

    /// The forced line break.
    pub fn line() -> Self {
        Self {
            text: Cow::Borrowed("\n"),
            style: None,
            control: Some(ControlCode::LineBreak),
        }
    }

    /// `width` spaces.
    pub fn blank(width: usize, style: Option<Style>) -> Self {
        Self {
            text: Cow::Owned(" ".repeat(width)),
            style,
            control: None,
        }
    }

    #[inline]
    pub const fn is_control(&self) -> bool {
        self.control.is_some()
    }

    /// Cells occupied on screen; 0 for control segments.
    #[inline]
    pub fn cell_length(&self) -> usize {
        if self.is_control() {
            0
        } else {
            measure(&self.text)
        }
    }

    /// Split into two segments at `column`, style kept on both halves.
    ///
    /// When `column` falls inside a double-width character, that character
    /// becomes one space on each side so both halves keep exact widths.
    pub fn split_at(&self, column: usize) -> Result<(Segment, Segment)> {
        let length = self.cell_length();
        if column > length {
            return Err(SegmentError::OutOfBounds { column, length });
        }
        Ok(self.split_within(column))
    }

    /// Split where `column <= cell_length()` is already known.
    fn split_within(&self, column: usize) -> (Segment, Segment) {
        if self.is_control() || column == 0 {
            let empty = Segment {
                text: Cow::Borrowed(""),
                style: self.style.clone(),
                control: None,
            };
            return (empty, self.clone());
        }
        let idx = byte_index_for_column(&self.text, column);
        if measure(&self.text[..idx]) == column {
            let len = self.text.len();
            return (
                self.with_text(self.slice(0..idx)),
                self.with_text(self.slice(idx..len)),
            );
        }

        // A wide character straddles the cut.
        let after = self.text[idx..]
            .chars()
            .next()
            .map_or(self.text.len(), |ch| idx + ch.len_utf8());
        trace!(column, "splitting inside a wide character");
        let mut left = String::with_capacity(idx + 1);
        left.push_str(&self.text[..idx]);
        left.push(' ');
        let mut right = String::with_capacity(self.text.len() - after + 1);
        right.push(' ');
        right.push_str(&self.text[after..]);
        (
            self.with_text(Cow::Owned(left)),
            self.with_text(Cow::Owned(right)),
        )
    }

    fn slice(&self, range: Range<usize>) -> Cow<'static, str> {
        match &self.text {
            Cow::Borrowed(s) => Cow::Borrowed(&s[range]),
            Cow::Owned(s) => Cow::Owned(s[range].to_string()),
        }
    }

    fn with_text(&self, text: Cow<'static, str>) -> Segment {
        Segment {
            text,
            style: self.style.clone(),
            control: self.control,
        }
    }

    /// Same text and control, no style.
    #[must_use]
    pub fn strip_style(&self) -> Segment {
        Segment {
            text: self.text.clone(),
            style: None,
            control: self.control,
        }
    }

    /// Replace the style.
    #[must_use]
    pub fn with_style(&self, style: Style) -> Segment {
        Segment {
            style: Some(style),
            ..self.clone()
        }
    }

    /// Put `base` underneath the segment's own style. Control segments are
    /// returned unchanged.
    #[must_use]
    pub fn apply_style(&self, base: &Style) -> Segment {
        if self.is_control() {
            return self.clone();
        }
        let style = match &self.style {
            Some(own) => base.combine(own),
            None => base.clone(),
        };
        self.with_style(style)
    }
}

impl From<&'static str> for Segment {
    fn from(text: &'static str) -> Self {
        Segment::text(text)
    }
}

impl From<String> for Segment {
    fn from(text: String) -> Self {
        Segment::text(text)
    }
}

/// Total cell length of a line.
pub fn line_length(line: &[Segment]) -> usize {
    line.iter().map(Segment::cell_length).sum()
}

/// Break a segment stream into lines at line-break markers and at `\n`
/// inside text. A trailing newline does not start an extra empty line.
pub fn split_lines(segments: impl IntoIterator<Item = Segment>) -> Vec<Vec<Segment>> {
    let mut lines = Vec::new();
    let mut line = Vec::new();
    for segment in segments {
        if segment.control == Some(ControlCode::LineBreak) {
            lines.push(std::mem::take(&mut line));
            continue;
        }
        if segment.is_control() || !segment.text.contains('\n') {
            line.push(segment);
            continue;
        }
        let mut parts = segment.text.split('\n').peekable();
        while let Some(part) = parts.next() {
            if !part.is_empty() {
                line.push(segment.with_text(Cow::Owned(part.to_string())));
            }
            if parts.peek().is_some() {
                lines.push(std::mem::take(&mut line));
            }
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Crop or pad `line` to exactly `width` cells.
///
/// Cropping cuts through the segment that crosses `width`; padding appends
/// spaces in `pad_style` when `pad` is set.
pub fn adjust_line_length(
    line: &[Segment],
    width: usize,
    pad_style: Option<&Style>,
    pad: bool,
) -> Vec<Segment> {
    let length = line_length(line);
    if length < width {
        let mut out = line.to_vec();
        if pad {
            out.push(Segment::blank(width - length, pad_style.cloned()));
        }
        return out;
    }
    if length == width {
        return line.to_vec();
    }

    let mut out = Vec::with_capacity(line.len());
    let mut used = 0;
    for segment in line {
        let cells = segment.cell_length();
        if used + cells <= width {
            out.push(segment.clone());
            used += cells;
            continue;
        }
        let (left, _) = segment.split_within(width - used);
        out.push(left);
        break;
    }
    out
}

/// Merge neighbouring text segments that share a style.
pub fn simplify(segments: impl IntoIterator<Item = Segment>) -> Vec<Segment> {
    let mut out: Vec<Segment> = Vec::new();
    for segment in segments {
        match out.last_mut() {
            Some(last)
                if !last.is_control() && !segment.is_control() && last.style == segment.style =>
            {
                last.text.to_mut().push_str(&segment.text);
            }
            _ => out.push(segment),
        }
    }
    out
}

/// Force `lines` into a `width` x `height` block: every line cropped or
/// padded to `width`, blank lines added (or extra lines dropped) to reach
/// `height`. `height` defaults to the number of lines.
pub fn set_shape(
    lines: &[Vec<Segment>],
    width: usize,
    height: Option<usize>,
    style: Option<&Style>,
) -> Vec<Vec<Segment>> {
    let height = height.unwrap_or(lines.len());
    let mut shaped: Vec<Vec<Segment>> = lines
        .iter()
        .take(height)
        .map(|line| adjust_line_length(line, width, style, true))
        .collect();
    while shaped.len() < height {
        shaped.push(vec![Segment::blank(width, style.cloned())]);
    }
    shaped
}

/// Drop every style, keeping text and control markers.
pub fn strip_styles(segments: &[Segment]) -> Vec<Segment> {
    segments.iter().map(Segment::strip_style).collect()
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn split_halves_sum_to_whole(text in "[a-z日本é ]{0,20}", column in 0usize..45) {
            let seg = Segment::text(text);
            let length = seg.cell_length();
            match seg.split_at(column) {
                Ok((left, right)) => {
                    prop_assert!(column <= length);
                    prop_assert_eq!(left.cell_length(), column);
                    prop_assert_eq!(left.cell_length() + right.cell_length(), length);
                }
                Err(SegmentError::OutOfBounds { .. }) => prop_assert!(column > length),
            }
        }

        #[test]
        fn adjust_hits_exact_width(text in "[a-z日]{0,20}", width in 0usize..30) {
            let line = vec![Segment::text(text)];
            prop_assert_eq!(line_length(&adjust_line_length(&line, width, None, true)), width);
        }
    }
}
