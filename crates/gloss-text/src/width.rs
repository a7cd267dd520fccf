#![forbid(unsafe_code)]

//! Terminal cell widths.
//!
//! Every measurement here is a per-code-point sum: each `char` is 0, 1 or 2
//! cells wide and a string is as wide as the sum of its chars. Ambiguous
//! East-Asian characters count as 2 only when the render configuration has
//! `cjk_width` switched on.

use std::borrow::Cow;

use gloss_core::config::cjk_width_enabled;
use tracing::debug;
use unicode_width::UnicodeWidthChar;

/// Code points that render as nothing even where `unicode-width` says 1:
/// controls, combining marks, variation selectors, joiners and bidi marks.
#[inline]
fn is_zero_width_codepoint(c: char) -> bool {
    let u = c as u32;
    matches!(u, 0x0000..=0x001F | 0x007F..=0x009F)
        || matches!(u, 0x0300..=0x036F | 0x1AB0..=0x1AFF | 0x1DC0..=0x1DFF | 0x20D0..=0x20FF)
        || matches!(u, 0xFE20..=0xFE2F)
        || matches!(u, 0xFE00..=0xFE0F | 0xE0100..=0xE01EF)
        || matches!(
            u,
            0x00AD
                | 0x034F
                | 0x180E
                | 0x200B
                | 0x200C
                | 0x200D
                | 0x200E
                | 0x200F
                | 0x2060
                | 0xFEFF
        )
        || matches!(u, 0x202A..=0x202E | 0x2066..=0x2069 | 0x206A..=0x206F)
}

/// Width of a single code point under an explicit CJK policy.
#[inline]
#[must_use]
pub fn char_width_with(ch: char, cjk_width: bool) -> usize {
    if ch.is_ascii() {
        return usize::from(matches!(ch, ' '..='~'));
    }
    if is_zero_width_codepoint(ch) {
        return 0;
    }
    let width = if cjk_width {
        ch.width_cjk()
    } else {
        ch.width()
    };
    width.unwrap_or(0).min(2)
}

/// Width of a single code point: 0, 1 or 2 cells.
#[inline]
#[must_use]
pub fn char_width(ch: char) -> usize {
    char_width_with(ch, cjk_width_enabled())
}

/// `Some(len)` when `text` is printable ASCII only, where width equals length.
#[inline]
#[must_use]
pub fn ascii_width(text: &str) -> Option<usize> {
    if is_ascii_printable(text) {
        Some(text.len())
    } else {
        None
    }
}

/// True when every byte is printable ASCII (0x20 to 0x7E).
#[inline]
#[must_use]
pub fn is_ascii_printable(text: &str) -> bool {
    text.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

/// Total cell width of `text`.
#[must_use]
pub fn measure(text: &str) -> usize {
    if let Some(width) = ascii_width(text) {
        return width;
    }
    let cjk_width = cjk_width_enabled();
    text.chars().map(|c| char_width_with(c, cjk_width)).sum()
}

/// Cell width of raw bytes. Each invalid UTF-8 sequence counts as one cell,
/// the width of the replacement glyph a terminal would draw.
#[must_use]
pub fn measure_bytes(bytes: &[u8]) -> usize {
    bytes
        .utf8_chunks()
        .map(|chunk| measure(chunk.valid()) + usize::from(!chunk.invalid().is_empty()))
        .sum()
}

/// Byte offset of the end of the longest prefix of `text` whose width is at
/// most `target` columns.
///
/// Never splits a code point. A wide character that would straddle `target`
/// is left out, and zero-width code points that follow the prefix stay
/// attached to it.
#[must_use]
pub fn byte_index_for_column(text: &str, target: usize) -> usize {
    let cjk_width = cjk_width_enabled();
    let mut width = 0;
    for (idx, ch) in text.char_indices() {
        let w = char_width_with(ch, cjk_width);
        if width + w > target {
            return idx;
        }
        width += w;
    }
    text.len()
}

/// Fit `text` into `max` columns, ending in `ellipsis` when it had to be cut.
///
/// Returns the input unchanged (borrowed) when it already fits. When even
/// the ellipsis is wider than `max`, the ellipsis alone is returned, clipped
/// to `max`, so the result never overflows.
///
/// # Example
/// ```
/// use gloss_text::width::{measure, truncate};
///
/// let out = truncate("hello world", 8, "...");
/// assert_eq!(out, "hello...");
/// assert_eq!(measure(&out), 8);
/// assert_eq!(truncate("short", 8, "..."), "short");
/// ```
#[must_use]
pub fn truncate<'a>(text: &'a str, max: usize, ellipsis: &str) -> Cow<'a, str> {
    if measure(text) <= max {
        return Cow::Borrowed(text);
    }
    let ellipsis_width = measure(ellipsis);
    if max < ellipsis_width {
        debug!(max, ellipsis_width, "ellipsis wider than budget; clipping ellipsis");
        let end = byte_index_for_column(ellipsis, max);
        return Cow::Owned(ellipsis[..end].to_string());
    }
    let cut = byte_index_for_column(text, max - ellipsis_width);
    let mut out = String::with_capacity(cut + ellipsis.len());
    out.push_str(&text[..cut]);
    out.push_str(ellipsis);
    Cow::Owned(out)
}

/// Right-pad `text` with spaces to `width` columns. Wider text is returned
/// unchanged.
#[must_use]
pub fn pad_to_width(text: &str, width: usize) -> Cow<'_, str> {
    let current = measure(text);
    if current >= width {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + width - current);
    out.push_str(text);
    out.extend(std::iter::repeat_n(' ', width - current));
    Cow::Owned(out)
}

/// Check if a string contains any double-width character.
#[must_use]
pub fn has_wide_chars(text: &str) -> bool {
    if text.is_ascii() {
        return false;
    }
    let cjk_width = cjk_width_enabled();
    text.chars().any(|c| char_width_with(c, cjk_width) > 1)
}
