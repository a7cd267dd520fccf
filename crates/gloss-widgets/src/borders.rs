#![forbid(unsafe_code)]

//! Box-drawing glyph sets and junction selection.

use gloss_core::RenderConfig;

/// Border characters for drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderSet {
    /// Vertical border character.
    pub vertical: char,
    /// Horizontal border character.
    pub horizontal: char,
    /// Top-left corner character.
    pub top_left: char,
    /// Top-right corner character.
    pub top_right: char,
    /// Bottom-left corner character.
    pub bottom_left: char,
    /// Bottom-right corner character.
    pub bottom_right: char,
    /// Upward tee junction character.
    pub tee_up: char,
    /// Downward tee junction character.
    pub tee_down: char,
    /// Leftward tee junction character.
    pub tee_left: char,
    /// Rightward tee junction character.
    pub tee_right: char,
    /// Cross junction character.
    pub cross: char,
}

impl BorderSet {
    /// ASCII fallback border (+, -, |).
    pub const ASCII: Self = Self {
        vertical: '|',
        horizontal: '-',
        top_left: '+',
        top_right: '+',
        bottom_left: '+',
        bottom_right: '+',
        tee_up: '+',
        tee_down: '+',
        tee_left: '+',
        tee_right: '+',
        cross: '+',
    };

    /// Rounded corners (╭, ╮, ╯, ╰).
    pub const ROUNDED: Self = Self {
        vertical: '│',
        horizontal: '─',
        top_left: '╭',
        top_right: '╮',
        bottom_left: '╰',
        bottom_right: '╯',
        tee_up: '┴',
        tee_down: '┬',
        tee_left: '┤',
        tee_right: '├',
        cross: '┼',
    };

    /// Square single-line border.
    pub const SQUARE: Self = Self {
        vertical: '│',
        horizontal: '─',
        top_left: '┌',
        top_right: '┐',
        bottom_left: '└',
        bottom_right: '┘',
        tee_up: '┴',
        tee_down: '┬',
        tee_left: '┤',
        tee_right: '├',
        cross: '┼',
    };

    /// Double lines (║, ═).
    pub const DOUBLE: Self = Self {
        vertical: '║',
        horizontal: '═',
        top_left: '╔',
        top_right: '╗',
        bottom_left: '╚',
        bottom_right: '╝',
        tee_up: '╩',
        tee_down: '╦',
        tee_left: '╣',
        tee_right: '╠',
        cross: '╬',
    };

    /// Heavy lines (┃, ━).
    pub const HEAVY: Self = Self {
        vertical: '┃',
        horizontal: '━',
        top_left: '┏',
        top_right: '┓',
        bottom_left: '┗',
        bottom_right: '┛',
        tee_up: '┻',
        tee_down: '┳',
        tee_left: '┫',
        tee_right: '┣',
        cross: '╋',
    };
}

/// Border style presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderType {
    #[default]
    Square,
    Ascii,
    Rounded,
    Double,
    Heavy,
}

impl BorderType {
    /// Glyphs for this preset, ignoring configuration.
    pub const fn to_border_set(self) -> BorderSet {
        match self {
            BorderType::Square => BorderSet::SQUARE,
            BorderType::Ascii => BorderSet::ASCII,
            BorderType::Rounded => BorderSet::ROUNDED,
            BorderType::Double => BorderSet::DOUBLE,
            BorderType::Heavy => BorderSet::HEAVY,
        }
    }

    /// Glyphs for this preset under `config`; `ascii_only` forces
    /// [`BorderSet::ASCII`].
    pub const fn resolve(self, config: &RenderConfig) -> BorderSet {
        if config.ascii_only {
            BorderSet::ASCII
        } else {
            self.to_border_set()
        }
    }
}

bitflags::bitflags! {
    /// Which lines meet at a junction.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Arms: u8 {
        const UP    = 0b0001;
        const DOWN  = 0b0010;
        const LEFT  = 0b0100;
        const RIGHT = 0b1000;
        const VERTICAL = Self::UP.bits() | Self::DOWN.bits();
        const HORIZONTAL = Self::LEFT.bits() | Self::RIGHT.bits();
    }
}

impl Arms {
    pub fn from_sides(up: bool, down: bool, left: bool, right: bool) -> Self {
        let mut arms = Arms::empty();
        arms.set(Arms::UP, up);
        arms.set(Arms::DOWN, down);
        arms.set(Arms::LEFT, left);
        arms.set(Arms::RIGHT, right);
        arms
    }
}

impl BorderSet {
    /// The glyph joining `arms`. A lone arm draws a straight line; no arms
    /// draws a space.
    pub const fn junction(&self, arms: Arms) -> char {
        let up = arms.contains(Arms::UP);
        let down = arms.contains(Arms::DOWN);
        let left = arms.contains(Arms::LEFT);
        let right = arms.contains(Arms::RIGHT);
        match (up, down, left, right) {
            (true, true, true, true) => self.cross,
            (true, true, true, false) => self.tee_left,
            (true, true, false, true) => self.tee_right,
            (true, false, true, true) => self.tee_up,
            (false, true, true, true) => self.tee_down,
            (false, true, false, true) => self.top_left,
            (false, true, true, false) => self.top_right,
            (true, false, false, true) => self.bottom_left,
            (true, false, true, false) => self.bottom_right,
            (true, _, false, false) | (_, true, false, false) => self.vertical,
            (false, false, true, _) | (false, false, _, true) => self.horizontal,
            (false, false, false, false) => ' ',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_SETS: [BorderSet; 5] = [
        BorderSet::ASCII,
        BorderSet::ROUNDED,
        BorderSet::SQUARE,
        BorderSet::DOUBLE,
        BorderSet::HEAVY,
    ];

    fn glyphs(set: BorderSet) -> [char; 11] {
        [
            set.vertical,
            set.horizontal,
            set.top_left,
            set.top_right,
            set.bottom_left,
            set.bottom_right,
            set.tee_up,
            set.tee_down,
            set.tee_left,
            set.tee_right,
            set.cross,
        ]
    }

    #[test]
    fn ascii_is_ascii_only() {
        assert!(glyphs(BorderSet::ASCII).iter().all(char::is_ascii));
    }

    #[test]
    fn box_drawing_sets_have_no_ascii() {
        for set in &ALL_SETS[1..] {
            assert!(glyphs(*set).iter().all(|c| !c.is_ascii()));
        }
    }

    #[test]
    fn every_set_draws_one_cell_glyphs() {
        for set in ALL_SETS {
            for ch in glyphs(set) {
                assert_eq!(gloss_text::width::char_width_with(ch, false), 1, "{ch:?}");
            }
        }
    }

    #[test]
    fn junction_by_arms() {
        let set = BorderSet::SQUARE;
        assert_eq!(set.junction(Arms::all()), '┼');
        assert_eq!(set.junction(Arms::VERTICAL | Arms::RIGHT), '├');
        assert_eq!(set.junction(Arms::VERTICAL | Arms::LEFT), '┤');
        assert_eq!(set.junction(Arms::HORIZONTAL | Arms::DOWN), '┬');
        assert_eq!(set.junction(Arms::HORIZONTAL | Arms::UP), '┴');
        assert_eq!(set.junction(Arms::DOWN | Arms::RIGHT), '┌');
        assert_eq!(set.junction(Arms::DOWN | Arms::LEFT), '┐');
        assert_eq!(set.junction(Arms::UP | Arms::RIGHT), '└');
        assert_eq!(set.junction(Arms::UP | Arms::LEFT), '┘');
    }

    #[test]
    fn junction_straight_and_empty() {
        let set = BorderSet::HEAVY;
        assert_eq!(set.junction(Arms::VERTICAL), '┃');
        assert_eq!(set.junction(Arms::UP), '┃');
        assert_eq!(set.junction(Arms::HORIZONTAL), '━');
        assert_eq!(set.junction(Arms::RIGHT), '━');
        assert_eq!(set.junction(Arms::empty()), ' ');
    }

    #[test]
    fn arms_from_sides() {
        assert_eq!(Arms::from_sides(true, true, false, false), Arms::VERTICAL);
        assert_eq!(Arms::from_sides(false, false, false, false), Arms::empty());
    }

    #[test]
    fn ascii_only_forces_ascii() {
        let mut config = RenderConfig::new();
        assert_eq!(BorderType::Rounded.resolve(&config), BorderSet::ROUNDED);
        config.ascii_only = true;
        assert_eq!(BorderType::Rounded.resolve(&config), BorderSet::ASCII);
        assert_eq!(BorderType::default(), BorderType::Square);
    }
}
