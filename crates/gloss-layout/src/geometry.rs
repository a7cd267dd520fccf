#![forbid(unsafe_code)]

//! Cell rectangles.

use serde::{Deserialize, Serialize};

/// A rectangle of terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Rect {
    #[inline]
    pub const fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// One past the last column.
    #[inline]
    pub const fn right(&self) -> usize {
        self.x.saturating_add(self.width)
    }

    /// One past the last row.
    #[inline]
    pub const fn bottom(&self) -> usize {
        self.y.saturating_add(self.height)
    }

    #[inline]
    pub const fn area(&self) -> usize {
        self.width.saturating_mul(self.height)
    }

    /// Whether `other` lies entirely inside `self`.
    pub const fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}
