#![forbid(unsafe_code)]

//! Sparse text styles with override-wins combination.

use std::fmt;
use std::ops::Add;
use std::str::FromStr;
use std::sync::Arc;

use tracing::{instrument, trace};

use crate::color::{Color, ColorDepth};
use crate::error::{Result, StyleError};

/// A single text attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Attribute {
    Bold,
    Dim,
    Italic,
    Underline,
    Blink,
    RapidBlink,
    Reverse,
    Conceal,
    Strike,
}

impl Attribute {
    /// Every attribute, in SGR order.
    pub const ALL: [Self; 9] = [
        Self::Bold,
        Self::Dim,
        Self::Italic,
        Self::Underline,
        Self::Blink,
        Self::RapidBlink,
        Self::Reverse,
        Self::Conceal,
        Self::Strike,
    ];

    /// SGR parameter that switches this attribute on.
    #[inline]
    #[must_use]
    pub const fn sgr(self) -> u8 {
        match self {
            Self::Bold => 1,
            Self::Dim => 2,
            Self::Italic => 3,
            Self::Underline => 4,
            Self::Blink => 5,
            Self::RapidBlink => 6,
            Self::Reverse => 7,
            Self::Conceal => 8,
            Self::Strike => 9,
        }
    }

    #[inline]
    #[must_use]
    pub const fn flag(self) -> StyleFlags {
        StyleFlags(1 << (self.sgr() - 1))
    }

    /// Canonical style-string word.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bold => "bold",
            Self::Dim => "dim",
            Self::Italic => "italic",
            Self::Underline => "underline",
            Self::Blink => "blink",
            Self::RapidBlink => "blink2",
            Self::Reverse => "reverse",
            Self::Conceal => "conceal",
            Self::Strike => "strike",
        }
    }

    /// Look up an attribute word or its short alias.
    #[must_use]
    pub fn from_name(word: &str) -> Option<Self> {
        let attr = match word.to_ascii_lowercase().as_str() {
            "bold" | "b" => Self::Bold,
            "dim" | "d" => Self::Dim,
            "italic" | "i" => Self::Italic,
            "underline" | "u" => Self::Underline,
            "blink" => Self::Blink,
            "blink2" | "rapid_blink" => Self::RapidBlink,
            "reverse" | "r" => Self::Reverse,
            "conceal" | "c" => Self::Conceal,
            "strike" | "strikethrough" | "s" => Self::Strike,
            _ => return None,
        };
        Some(attr)
    }
}

/// Attribute bit set, one bit per [`Attribute`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct StyleFlags(pub u16);

impl StyleFlags {
    /// No attributes.
    pub const NONE: Self = Self(0);
    /// Every attribute bit.
    pub const ALL: Self = Self((1 << 9) - 1);

    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    #[inline]
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    #[inline]
    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    #[inline]
    #[must_use]
    pub const fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }
}

impl core::ops::BitOr for StyleFlags {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl core::ops::BitOrAssign for StyleFlags {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// A sparse set of text attributes plus foreground and background colors.
///
/// Every field can be unset. Attributes are tri-state: unset, explicitly on,
/// or explicitly off; an explicit "off" survives [`combine`](Self::combine)
/// and overrides an "on" underneath it.
///
/// Styles are values: the `with_*` methods return a new style.
///
/// # Example
/// ```
/// use gloss_style::{Attribute, Color, Style};
///
/// let base = Style::parse("bold red").unwrap();
/// let over = Style::new().with_attribute(Attribute::Bold, false);
/// let merged = base.combine(&over);
/// assert_eq!(merged.attribute(Attribute::Bold), Some(false));
/// assert_eq!(merged.color(), Some(Color::named("red").unwrap()));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Style {
    color: Option<Color>,
    bgcolor: Option<Color>,
    /// Attribute values; always a subset of `set_attributes`.
    attributes: StyleFlags,
    /// Which attributes are set at all.
    set_attributes: StyleFlags,
    link: Option<Arc<str>>,
}

impl Style {
    /// Create an empty style (nothing set).
    #[inline]
    pub const fn new() -> Self {
        Self {
            color: None,
            bgcolor: None,
            attributes: StyleFlags::NONE,
            set_attributes: StyleFlags::NONE,
            link: None,
        }
    }

    /// The identity for [`combine`](Self::combine).
    #[inline]
    pub const fn null() -> Self {
        Self::new()
    }

    /// Parse a space-separated style definition such as
    /// `"bold not italic #ff8800 on blue link https://example.com"`.
    pub fn parse(definition: &str) -> Result<Self> {
        let trimmed = definition.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
            return Ok(Self::null());
        }

        let mut style = Self::null();
        let mut words = trimmed.split_whitespace();
        while let Some(word) = words.next() {
            match word.to_ascii_lowercase().as_str() {
                "on" => {
                    let color = words
                        .next()
                        .ok_or_else(|| StyleError::InvalidColor(String::new()))?;
                    style = style.with_bgcolor(Color::parse(color)?);
                }
                "not" => {
                    let name = words
                        .next()
                        .ok_or_else(|| StyleError::UnknownAttribute(word.to_string()))?;
                    let attr = Attribute::from_name(name)
                        .ok_or_else(|| StyleError::UnknownAttribute(name.to_string()))?;
                    style = style.with_attribute(attr, false);
                }
                "link" => {
                    let url = words
                        .next()
                        .ok_or_else(|| StyleError::UnknownAttribute(word.to_string()))?;
                    style = style.with_link(url);
                }
                _ => {
                    if let Some(attr) = Attribute::from_name(word) {
                        style = style.with_attribute(attr, true);
                    } else if let Ok(color) = Color::parse(word) {
                        style = style.with_color(color);
                    } else {
                        return Err(StyleError::UnknownAttribute(word.to_string()));
                    }
                }
            }
        }
        trace!(definition, "parsed style");
        Ok(style)
    }

    #[inline]
    pub const fn color(&self) -> Option<Color> {
        self.color
    }

    #[inline]
    pub const fn bgcolor(&self) -> Option<Color> {
        self.bgcolor
    }

    #[inline]
    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }

    /// Tri-state attribute lookup: `None` when unset.
    #[inline]
    pub const fn attribute(&self, attr: Attribute) -> Option<bool> {
        if self.set_attributes.contains(attr.flag()) {
            Some(self.attributes.contains(attr.flag()))
        } else {
            None
        }
    }

    /// True only when the attribute is explicitly on.
    #[inline]
    pub const fn is_on(&self, attr: Attribute) -> bool {
        self.attributes.contains(attr.flag())
    }

    /// Attributes explicitly switched on.
    #[inline]
    pub const fn enabled(&self) -> StyleFlags {
        self.attributes
    }

    /// Attributes that are set (on or off).
    #[inline]
    pub const fn set_mask(&self) -> StyleFlags {
        self.set_attributes
    }

    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    #[must_use]
    pub fn with_bgcolor(mut self, color: Color) -> Self {
        self.bgcolor = Some(color);
        self
    }

    #[must_use]
    pub fn without_color(mut self) -> Self {
        self.color = None;
        self
    }

    #[must_use]
    pub fn without_bgcolor(mut self) -> Self {
        self.bgcolor = None;
        self
    }

    #[must_use]
    pub fn with_link(mut self, url: impl Into<Arc<str>>) -> Self {
        self.link = Some(url.into());
        self
    }

    #[must_use]
    pub fn without_link(mut self) -> Self {
        self.link = None;
        self
    }

    /// Set an attribute explicitly on or off.
    #[must_use]
    pub fn with_attribute(mut self, attr: Attribute, value: bool) -> Self {
        let flag = attr.flag();
        self.set_attributes.insert(flag);
        if value {
            self.attributes.insert(flag);
        } else {
            self.attributes.remove(flag);
        }
        self
    }

    /// Return the attribute to the unset state.
    #[must_use]
    pub fn without_attribute(mut self, attr: Attribute) -> Self {
        let flag = attr.flag();
        self.set_attributes.remove(flag);
        self.attributes.remove(flag);
        self
    }

    #[inline]
    #[must_use]
    pub fn bold(self) -> Self {
        self.with_attribute(Attribute::Bold, true)
    }

    #[inline]
    #[must_use]
    pub fn dim(self) -> Self {
        self.with_attribute(Attribute::Dim, true)
    }

    #[inline]
    #[must_use]
    pub fn italic(self) -> Self {
        self.with_attribute(Attribute::Italic, true)
    }

    #[inline]
    #[must_use]
    pub fn underline(self) -> Self {
        self.with_attribute(Attribute::Underline, true)
    }

    #[inline]
    #[must_use]
    pub fn reverse(self) -> Self {
        self.with_attribute(Attribute::Reverse, true)
    }

    #[inline]
    #[must_use]
    pub fn strike(self) -> Self {
        self.with_attribute(Attribute::Strike, true)
    }

    /// Override-wins merge: every field `other` sets (including an explicit
    /// "off") replaces the value in `self`; everything else is kept.
    #[instrument(skip(self, other), level = "trace")]
    pub fn combine(&self, other: &Style) -> Style {
        trace!("Combining style over base");
        Style {
            color: other.color.or(self.color),
            bgcolor: other.bgcolor.or(self.bgcolor),
            attributes: self
                .attributes
                .difference(other.set_attributes)
                .union(other.attributes),
            set_attributes: self.set_attributes.union(other.set_attributes),
            link: other.link.clone().or_else(|| self.link.clone()),
        }
    }

    /// Combine a sequence of styles left to right.
    pub fn combine_all<'a>(styles: impl IntoIterator<Item = &'a Style>) -> Style {
        styles
            .into_iter()
            .fold(Style::null(), |acc, style| acc.combine(style))
    }

    /// Check if nothing is set.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.color.is_none()
            && self.bgcolor.is_none()
            && self.set_attributes.is_empty()
            && self.link.is_none()
    }

    /// Downgrade both colors to `depth`. At [`ColorDepth::NoColor`] the
    /// colors are dropped and only attributes and the link remain.
    #[must_use]
    pub fn downgrade(&self, depth: ColorDepth) -> Style {
        if depth == ColorDepth::NoColor {
            return Style {
                color: None,
                bgcolor: None,
                ..self.clone()
            };
        }
        Style {
            color: self.color.map(|c| c.downgrade(depth)),
            bgcolor: self.bgcolor.map(|c| c.downgrade(depth)),
            ..self.clone()
        }
    }

    /// Semicolon-joined SGR parameters for every explicitly-set field.
    ///
    /// Attributes that are unset or explicitly off emit nothing, and no
    /// reset codes are produced; the caller wraps the result in `ESC[...m`.
    #[must_use]
    pub fn to_ansi_sequence(&self) -> String {
        let mut out = String::new();
        let mut push = |param: &str| {
            if !out.is_empty() {
                out.push(';');
            }
            out.push_str(param);
        };
        for attr in Attribute::ALL {
            if self.is_on(attr) {
                push(&attr.sgr().to_string());
            }
        }
        if let Some(color) = self.color {
            push(&color.to_ansi_code(true));
        }
        if let Some(color) = self.bgcolor {
            push(&color.to_ansi_code(false));
        }
        out
    }
}

impl Add for Style {
    type Output = Style;

    fn add(self, rhs: Style) -> Style {
        self.combine(&rhs)
    }
}

impl Add<&Style> for &Style {
    type Output = Style;

    fn add(self, rhs: &Style) -> Style {
        self.combine(rhs)
    }
}

impl FromStr for Style {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Canonical style definition; parses back to an equal style.
impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        let mut words: Vec<String> = Vec::new();
        for attr in Attribute::ALL {
            match self.attribute(attr) {
                Some(true) => words.push(attr.name().to_string()),
                Some(false) => words.push(format!("not {}", attr.name())),
                None => {}
            }
        }
        if let Some(color) = self.color {
            words.push(color.to_string());
        }
        if let Some(color) = self.bgcolor {
            words.push(format!("on {color}"));
        }
        if let Some(link) = &self.link {
            words.push(format!("link {link}"));
        }
        f.write_str(&words.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::StandardColor;

    fn red() -> Color {
        Color::Standard(StandardColor::Red)
    }

    fn blue() -> Color {
        Color::Standard(StandardColor::Blue)
    }

    #[test]
    fn default_is_empty() {
        let s = Style::default();
        assert!(s.is_empty());
        assert_eq!(s, Style::null());
        for attr in Attribute::ALL {
            assert_eq!(s.attribute(attr), None);
        }
    }

    #[test]
    fn builder_colors() {
        let s = Style::new().with_color(red()).with_bgcolor(blue());
        assert_eq!(s.color(), Some(red()));
        assert_eq!(s.bgcolor(), Some(blue()));
        assert!(!s.is_empty());
    }

    #[test]
    fn tri_state_attributes() {
        let s = Style::new()
            .with_attribute(Attribute::Bold, true)
            .with_attribute(Attribute::Italic, false);
        assert_eq!(s.attribute(Attribute::Bold), Some(true));
        assert_eq!(s.attribute(Attribute::Italic), Some(false));
        assert_eq!(s.attribute(Attribute::Dim), None);
        assert!(!s.is_empty());

        let cleared = s.without_attribute(Attribute::Italic);
        assert_eq!(cleared.attribute(Attribute::Italic), None);
    }

    #[test]
    fn explicit_false_is_not_empty() {
        let s = Style::new().with_attribute(Attribute::Strike, false);
        assert!(!s.is_empty());
        assert_eq!(s.to_ansi_sequence(), "");
    }

    #[test]
    fn combine_override_wins_on_conflict() {
        let base = Style::new().with_color(red()).bold();
        let over = Style::new()
            .with_color(blue())
            .with_attribute(Attribute::Bold, false);
        let merged = base.combine(&over);
        assert_eq!(merged.color(), Some(blue()));
        assert_eq!(merged.attribute(Attribute::Bold), Some(false));
    }

    #[test]
    fn combine_base_fills_gaps() {
        let base = Style::new().with_color(red()).with_bgcolor(blue()).italic();
        let over = Style::new().bold();
        let merged = base.combine(&over);
        assert_eq!(merged.color(), Some(red()));
        assert_eq!(merged.bgcolor(), Some(blue()));
        assert!(merged.is_on(Attribute::Bold));
        assert!(merged.is_on(Attribute::Italic));
    }

    #[test]
    fn combine_link() {
        let base = Style::new().with_link("https://a.example");
        let over = Style::new().with_link("https://b.example");
        assert_eq!(base.combine(&Style::null()).link(), Some("https://a.example"));
        assert_eq!(base.combine(&over).link(), Some("https://b.example"));
    }

    #[test]
    fn add_operator_matches_combine() {
        let a = Style::new().bold();
        let b = Style::new().with_color(red());
        assert_eq!(&a + &b, a.combine(&b));
        assert_eq!(a.clone() + b.clone(), a.combine(&b));
    }

    #[test]
    fn combine_all_folds_left_to_right() {
        let styles = [
            Style::new().bold(),
            Style::new().with_color(red()),
            Style::new().with_attribute(Attribute::Bold, false),
        ];
        let merged = Style::combine_all(&styles);
        assert_eq!(merged.attribute(Attribute::Bold), Some(false));
        assert_eq!(merged.color(), Some(red()));
    }

    #[test]
    fn parse_words() {
        let s = Style::parse("bold not italic #ff8800 on blue").unwrap();
        assert_eq!(s.attribute(Attribute::Bold), Some(true));
        assert_eq!(s.attribute(Attribute::Italic), Some(false));
        assert_eq!(s.color(), Some(Color::from_rgb(255, 136, 0)));
        assert_eq!(s.bgcolor(), Some(blue()));
    }

    #[test]
    fn parse_aliases_and_link() {
        let s = Style::parse("b u s link https://example.com").unwrap();
        assert!(s.is_on(Attribute::Bold));
        assert!(s.is_on(Attribute::Underline));
        assert!(s.is_on(Attribute::Strike));
        assert_eq!(s.link(), Some("https://example.com"));
    }

    #[test]
    fn parse_empty_and_none() {
        assert_eq!(Style::parse(""), Ok(Style::null()));
        assert_eq!(Style::parse("  none "), Ok(Style::null()));
    }

    #[test]
    fn parse_unknown_attribute() {
        assert_eq!(
            Style::parse("bold sparkly"),
            Err(StyleError::UnknownAttribute("sparkly".to_string()))
        );
        assert_eq!(
            Style::parse("not sparkly"),
            Err(StyleError::UnknownAttribute("sparkly".to_string()))
        );
    }

    #[test]
    fn parse_invalid_background() {
        assert_eq!(
            Style::parse("on #12"),
            Err(StyleError::InvalidColor("#12".to_string()))
        );
        assert!(matches!(Style::parse("on"), Err(StyleError::InvalidColor(_))));
    }

    #[test]
    fn ansi_sequence_order() {
        let s = Style::parse("underline bold color(208) on #000000").unwrap();
        assert_eq!(s.to_ansi_sequence(), "1;4;38;5;208;48;2;0;0;0");
    }

    #[test]
    fn ansi_sequence_all_attributes() {
        let s = Style::parse("bold dim italic underline blink blink2 reverse conceal strike")
            .unwrap();
        assert_eq!(s.to_ansi_sequence(), "1;2;3;4;5;6;7;8;9");
    }

    #[test]
    fn ansi_sequence_skips_unset_and_false() {
        let s = Style::new()
            .with_attribute(Attribute::Bold, false)
            .with_color(Color::Default);
        assert_eq!(s.to_ansi_sequence(), "39");
        assert_eq!(Style::null().to_ansi_sequence(), "");
    }

    #[test]
    fn downgrade_maps_both_colors() {
        let s = Style::new()
            .with_color(Color::from_rgb(255, 136, 0))
            .with_bgcolor(Color::from_rgb(255, 0, 0))
            .bold();
        let down = s.downgrade(ColorDepth::EightBit);
        assert_eq!(down.color(), Some(Color::Indexed(208)));
        assert_eq!(down.bgcolor(), Some(Color::Indexed(9)));
        assert!(down.is_on(Attribute::Bold));
    }

    #[test]
    fn no_color_drops_colors() {
        let s = Style::new().with_color(Color::from_rgb(1, 2, 3)).italic();
        let down = s.downgrade(ColorDepth::NoColor);
        assert_eq!(down.color(), None);
        assert_eq!(down.to_ansi_sequence(), "3");
    }

    #[test]
    fn display_round_trips() {
        let s = Style::parse("bold not dim red on color(17) link https://x.example").unwrap();
        assert_eq!(s.to_string().parse::<Style>(), Ok(s));
        assert_eq!(Style::null().to_string(), "none");
    }

    #[test]
    fn style_flags_operations() {
        let mut flags = StyleFlags::NONE;
        assert!(flags.is_empty());
        flags.insert(Attribute::Bold.flag());
        flags |= Attribute::Italic.flag();
        assert!(flags.contains(Attribute::Bold.flag()));
        assert!(flags.contains(Attribute::Italic.flag()));
        flags.remove(Attribute::Bold.flag());
        assert!(!flags.contains(Attribute::Bold.flag()));
        assert!(StyleFlags::ALL.contains(Attribute::Strike.flag()));
    }
}
