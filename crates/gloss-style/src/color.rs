#![forbid(unsafe_code)]

//! Terminal colors, color depths, and downgrade utilities.
//!
//! A [`Color`] is one of four closed variants: the terminal's own default,
//! one of the 16 standard colors, a 256-color palette index, or a 24-bit RGB
//! triplet. Downgrading to a coarser [`ColorDepth`] is a pure function:
//!
//! - RGB → 256: nearest entry of [`EIGHT_BIT_PALETTE`] by Euclidean distance
//! - RGB / 256 → 16: nearest entry of [`STANDARD_PALETTE`]
//!
//! Ties go to the lowest palette index, so results are stable across runs.
//!
//! ```
//! use gloss_style::{Color, ColorDepth};
//!
//! let orange = Color::from_hex("#FF8800").unwrap();
//! assert_eq!(orange.downgrade(ColorDepth::EightBit), Color::Indexed(208));
//! ```

use std::fmt;
use std::str::FromStr;

use gloss_core::RenderConfig;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StyleError};

/// Color depth a terminal can display, ordered coarse to fine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorDepth {
    /// No color at all; every color becomes the terminal default.
    NoColor,
    /// The 16 standard ANSI colors.
    Standard,
    /// The 256-color palette.
    EightBit,
    /// 24-bit RGB.
    TrueColor,
}

impl ColorDepth {
    /// Choose the best available depth from detection flags.
    ///
    /// `no_color` should reflect explicit user intent (e.g. NO_COLOR).
    #[must_use]
    pub const fn from_flags(true_color: bool, colors_256: bool, no_color: bool) -> Self {
        if no_color {
            Self::NoColor
        } else if true_color {
            Self::TrueColor
        } else if colors_256 {
            Self::EightBit
        } else {
            Self::Standard
        }
    }

    #[must_use]
    pub const fn from_config(config: &RenderConfig) -> Self {
        Self::from_flags(config.true_color, config.colors_256, config.no_color)
    }

    /// Depth for the current thread's effective configuration.
    #[must_use]
    pub fn current() -> Self {
        Self::from_config(&RenderConfig::current())
    }

    #[must_use]
    pub const fn supports_true_color(self) -> bool {
        matches!(self, Self::TrueColor)
    }
}

/// RGB color (opaque).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Squared Euclidean distance in RGB space.
    #[must_use]
    pub const fn distance_sq(self, other: Self) -> u32 {
        let dr = self.r.abs_diff(other.r) as u32;
        let dg = self.g.abs_diff(other.g) as u32;
        let db = self.b.abs_diff(other.b) as u32;
        dr * dr + dg * dg + db * db
    }

    /// Lowercase `#rrggbb`.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// The 16 standard ANSI colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum StandardColor {
    Black = 0,
    Red = 1,
    Green = 2,
    Yellow = 3,
    Blue = 4,
    Magenta = 5,
    Cyan = 6,
    White = 7,
    BrightBlack = 8,
    BrightRed = 9,
    BrightGreen = 10,
    BrightYellow = 11,
    BrightBlue = 12,
    BrightMagenta = 13,
    BrightCyan = 14,
    BrightWhite = 15,
}

impl StandardColor {
    pub const ALL: [Self; 16] = [
        Self::Black,
        Self::Red,
        Self::Green,
        Self::Yellow,
        Self::Blue,
        Self::Magenta,
        Self::Cyan,
        Self::White,
        Self::BrightBlack,
        Self::BrightRed,
        Self::BrightGreen,
        Self::BrightYellow,
        Self::BrightBlue,
        Self::BrightMagenta,
        Self::BrightCyan,
        Self::BrightWhite,
    ];

    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        if value < 16 {
            Some(Self::ALL[value as usize])
        } else {
            None
        }
    }

    /// Canonical lowercase name, as accepted by [`Color::named`].
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Black => "black",
            Self::Red => "red",
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Blue => "blue",
            Self::Magenta => "magenta",
            Self::Cyan => "cyan",
            Self::White => "white",
            Self::BrightBlack => "bright_black",
            Self::BrightRed => "bright_red",
            Self::BrightGreen => "bright_green",
            Self::BrightYellow => "bright_yellow",
            Self::BrightBlue => "bright_blue",
            Self::BrightMagenta => "bright_magenta",
            Self::BrightCyan => "bright_cyan",
            Self::BrightWhite => "bright_white",
        }
    }

    #[must_use]
    pub const fn to_rgb(self) -> Rgb {
        STANDARD_PALETTE[self as usize]
    }
}

/// A terminal color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    /// The terminal's own foreground or background.
    #[default]
    Default,
    /// One of the 16 standard colors.
    Standard(StandardColor),
    /// A 256-color palette index.
    Indexed(u8),
    /// A 24-bit color.
    Rgb(Rgb),
}

impl Color {
    #[must_use]
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self::Rgb(Rgb::new(r, g, b))
    }

    #[must_use]
    pub const fn from_triplet(rgb: Rgb) -> Self {
        Self::Rgb(rgb)
    }

    /// Parse `#rrggbb` (the `#` is optional).
    pub fn from_hex(hex: &str) -> Result<Self> {
        let invalid = || StyleError::InvalidColor(hex.to_string());
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| invalid())
        };
        Ok(Self::from_rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Look up a named color (`red`, `bright_blue`, `grey`, `default`, ...).
    ///
    /// Names are case-insensitive; `-` and spaces are accepted in place of `_`.
    #[must_use]
    pub fn named(name: &str) -> Option<Self> {
        let normalized: String = name
            .trim()
            .chars()
            .map(|c| match c {
                '-' | ' ' => '_',
                c => c.to_ascii_lowercase(),
            })
            .collect();
        match normalized.as_str() {
            "default" => Some(Self::Default),
            "grey" | "gray" => Some(Self::Standard(StandardColor::BrightBlack)),
            other => StandardColor::ALL
                .iter()
                .find(|color| color.name() == other)
                .map(|&color| Self::Standard(color)),
        }
    }

    /// Parse any supported color syntax: a name, `#rrggbb`, `color(n)`, or
    /// `rgb(r,g,b)`.
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        let invalid = || StyleError::InvalidColor(text.to_string());
        if let Some(color) = Self::named(trimmed) {
            return Ok(color);
        }
        if trimmed.starts_with('#') {
            return Self::from_hex(trimmed);
        }
        let lower = trimmed.to_ascii_lowercase();
        if let Some(inner) = function_args(&lower, "color") {
            return inner.parse::<u8>().map(Self::Indexed).map_err(|_| invalid());
        }
        if let Some(inner) = function_args(&lower, "rgb") {
            let channels: Vec<&str> = inner.split(',').map(str::trim).collect();
            if let [r, g, b] = channels.as_slice() {
                let parse = |s: &str| s.parse::<u8>().map_err(|_| invalid());
                return Ok(Self::from_rgb(parse(r)?, parse(g)?, parse(b)?));
            }
        }
        Err(invalid())
    }

    #[must_use]
    pub const fn is_default(self) -> bool {
        matches!(self, Self::Default)
    }

    /// Promote to RGB via the fixed palettes. `Default` promotes to black.
    #[must_use]
    pub const fn to_rgb(self) -> Rgb {
        match self {
            Self::Default => Rgb::new(0, 0, 0),
            Self::Standard(color) => color.to_rgb(),
            Self::Indexed(index) => EIGHT_BIT_PALETTE[index as usize],
            Self::Rgb(rgb) => rgb,
        }
    }

    /// The finest depth needed to display this color exactly.
    #[must_use]
    pub const fn depth(self) -> ColorDepth {
        match self {
            Self::Default => ColorDepth::NoColor,
            Self::Standard(_) => ColorDepth::Standard,
            Self::Indexed(_) => ColorDepth::EightBit,
            Self::Rgb(_) => ColorDepth::TrueColor,
        }
    }

    /// Convert to a color representable at `depth`.
    ///
    /// Downgrading is idempotent, and asking for a finer depth than the
    /// color already has returns it unchanged.
    #[must_use]
    pub fn downgrade(self, depth: ColorDepth) -> Self {
        if depth >= self.depth() {
            return self;
        }
        match (self, depth) {
            (_, ColorDepth::NoColor) => Self::Default,
            (Self::Rgb(rgb), ColorDepth::EightBit) => Self::Indexed(rgb_to_eight_bit(rgb)),
            (Self::Rgb(rgb), ColorDepth::Standard) => Self::Standard(rgb_to_standard(rgb)),
            (Self::Indexed(index), ColorDepth::Standard) => {
                Self::Standard(eight_bit_to_standard(index))
            }
            _ => self,
        }
    }

    /// Linear interpolation between two colors in RGB space.
    ///
    /// `factor` is clamped to `[0, 1]` (NaN counts as 0); 0 yields `self`,
    /// 1 yields `other`. The result is always an RGB color.
    #[must_use]
    pub fn blend(self, other: Self, factor: f32) -> Self {
        let factor = if factor.is_nan() {
            0.0
        } else {
            factor.clamp(0.0, 1.0)
        };
        let from = self.to_rgb();
        let to = other.to_rgb();
        let mix = |a: u8, b: u8| -> u8 {
            let a = f32::from(a);
            let b = f32::from(b);
            (a + (b - a) * factor).round() as u8
        };
        Self::from_rgb(mix(from.r, to.r), mix(from.g, to.g), mix(from.b, to.b))
    }

    /// SGR parameter body for this color, e.g. `38;2;255;128;0`.
    ///
    /// Does not include the `ESC[` prefix or the `m` terminator.
    #[must_use]
    pub fn to_ansi_code(self, is_foreground: bool) -> String {
        match self {
            Self::Default => String::from(if is_foreground { "39" } else { "49" }),
            Self::Standard(color) => {
                let n = color.as_u8();
                let code = match (n < 8, is_foreground) {
                    (true, true) => 30 + n,
                    (true, false) => 40 + n,
                    (false, true) => 90 + (n - 8),
                    (false, false) => 100 + (n - 8),
                };
                code.to_string()
            }
            Self::Indexed(index) => {
                format!("{};5;{}", if is_foreground { 38 } else { 48 }, index)
            }
            Self::Rgb(Rgb { r, g, b }) => {
                format!("{};2;{};{};{}", if is_foreground { 38 } else { 48 }, r, g, b)
            }
        }
    }
}

fn function_args<'a>(text: &'a str, name: &str) -> Option<&'a str> {
    text.strip_prefix(name)?
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')
        .map(str::trim)
}

impl FromStr for Color {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("default"),
            Self::Standard(color) => f.write_str(color.name()),
            Self::Indexed(index) => write!(f, "color({index})"),
            Self::Rgb(rgb) => f.write_str(&rgb.to_hex()),
        }
    }
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Self::Rgb(rgb)
    }
}

impl From<StandardColor> for Color {
    fn from(color: StandardColor) -> Self {
        Self::Standard(color)
    }
}

/// Fixed RGB values for the 16 standard colors.
pub const STANDARD_PALETTE: [Rgb; 16] = [
    Rgb::new(0, 0, 0),       // Black
    Rgb::new(205, 0, 0),     // Red
    Rgb::new(0, 205, 0),     // Green
    Rgb::new(205, 205, 0),   // Yellow
    Rgb::new(0, 0, 238),     // Blue
    Rgb::new(205, 0, 205),   // Magenta
    Rgb::new(0, 205, 205),   // Cyan
    Rgb::new(229, 229, 229), // White
    Rgb::new(127, 127, 127), // Bright Black
    Rgb::new(255, 0, 0),     // Bright Red
    Rgb::new(0, 255, 0),     // Bright Green
    Rgb::new(255, 255, 0),   // Bright Yellow
    Rgb::new(92, 92, 255),   // Bright Blue
    Rgb::new(255, 0, 255),   // Bright Magenta
    Rgb::new(0, 255, 255),   // Bright Cyan
    Rgb::new(255, 255, 255), // Bright White
];

/// RGB values for the full 256-color palette: the 16 standard colors, the
/// 6x6x6 cube, then the 24-step grey ramp.
pub const EIGHT_BIT_PALETTE: [Rgb; 256] = build_eight_bit_palette();

const fn build_eight_bit_palette() -> [Rgb; 256] {
    const LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];
    let mut table = [Rgb::new(0, 0, 0); 256];
    let mut i = 0;
    while i < 16 {
        table[i] = STANDARD_PALETTE[i];
        i += 1;
    }
    while i < 232 {
        let idx = i - 16;
        table[i] = Rgb::new(LEVELS[idx / 36], LEVELS[(idx / 6) % 6], LEVELS[idx % 6]);
        i += 1;
    }
    while i < 256 {
        let gray = (8 + 10 * (i - 232)) as u8;
        table[i] = Rgb::new(gray, gray, gray);
        i += 1;
    }
    table
}

/// Index of the nearest palette entry; ties go to the lowest index.
fn nearest(target: Rgb, palette: &[Rgb]) -> usize {
    let mut best = 0;
    let mut best_dist = u32::MAX;
    for (idx, candidate) in palette.iter().enumerate() {
        let dist = target.distance_sq(*candidate);
        if dist < best_dist {
            best = idx;
            best_dist = dist;
            if dist == 0 {
                break;
            }
        }
    }
    best
}

#[must_use]
pub fn rgb_to_eight_bit(rgb: Rgb) -> u8 {
    nearest(rgb, &EIGHT_BIT_PALETTE) as u8
}

#[must_use]
pub fn rgb_to_standard(rgb: Rgb) -> StandardColor {
    StandardColor::ALL[nearest(rgb, &STANDARD_PALETTE)]
}

#[must_use]
pub fn eight_bit_to_standard(index: u8) -> StandardColor {
    match StandardColor::from_u8(index) {
        Some(color) => color,
        None => rgb_to_standard(EIGHT_BIT_PALETTE[index as usize]),
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_color() -> impl Strategy<Value = Color> {
        prop_oneof![
            Just(Color::Default),
            (0u8..16).prop_map(|n| Color::Standard(StandardColor::ALL[n as usize])),
            any::<u8>().prop_map(Color::Indexed),
            any::<(u8, u8, u8)>().prop_map(|(r, g, b)| Color::from_rgb(r, g, b)),
        ]
    }

    fn arb_depth() -> impl Strategy<Value = ColorDepth> {
        prop_oneof![
            Just(ColorDepth::NoColor),
            Just(ColorDepth::Standard),
            Just(ColorDepth::EightBit),
            Just(ColorDepth::TrueColor),
        ]
    }

    proptest! {
        #[test]
        fn downgrade_is_idempotent(color in arb_color(), depth in arb_depth()) {
            let once = color.downgrade(depth);
            prop_assert_eq!(once.downgrade(depth), once);
        }

        #[test]
        fn downgrade_is_representable(color in arb_color(), depth in arb_depth()) {
            prop_assert!(color.downgrade(depth).depth() <= depth);
        }

        #[test]
        fn coarser_after_finer_is_stable(color in arb_color(), a in arb_depth(), b in arb_depth()) {
            let (fine, coarse) = if a >= b { (a, b) } else { (b, a) };
            let twice = color.downgrade(fine).downgrade(coarse);
            prop_assert_eq!(twice.downgrade(coarse), twice);
            prop_assert!(twice.depth() <= coarse);
        }

        #[test]
        fn blend_stays_between_channels(
            a in any::<(u8, u8, u8)>(),
            b in any::<(u8, u8, u8)>(),
            factor in 0.0f32..=1.0,
        ) {
            let mixed = Color::from_rgb(a.0, a.1, a.2)
                .blend(Color::from_rgb(b.0, b.1, b.2), factor)
                .to_rgb();
            prop_assert!(mixed.r >= a.0.min(b.0) && mixed.r <= a.0.max(b.0));
            prop_assert!(mixed.g >= a.1.min(b.1) && mixed.g <= a.1.max(b.1));
            prop_assert!(mixed.b >= a.2.min(b.2) && mixed.b <= a.2.max(b.2));
        }

        #[test]
        fn hex_round_trip(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
            let color = Color::from_rgb(r, g, b);
            prop_assert_eq!(Color::from_hex(&Rgb::new(r, g, b).to_hex()), Ok(color));
        }
    }
}
