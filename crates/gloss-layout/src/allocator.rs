#![forbid(unsafe_code)]

//! The width allocator.
//!
//! Every renderable that divides a row of cells between several pieces of
//! content (grid columns, text columns, split panes, progress fields) goes
//! through [`allocate_widths`], so they all round the same way.
//!
//! Resolution runs in four passes:
//!
//! 1. `Fixed(w)` and `Minimum(w)` regions take `w`; their total is taken off
//!    the available width to give `remaining`.
//! 2. Each `Ratio(n)` region takes `floor(remaining * n / total_weight)`.
//! 3. `Automatic` regions split what is left equally (floor); the last one
//!    absorbs the integer-division leftover.
//! 4. Per-region `min_width`/`max_width` clamps are applied. Clamping may push
//!    the sum past the available width; that overflow is accepted.
//!
//! # Example
//!
//! ```
//! use gloss_layout::{SizeConstraint, allocate_widths};
//!
//! let widths = allocate_widths(
//!     &[SizeConstraint::Fixed(10), SizeConstraint::Ratio(1), SizeConstraint::Ratio(2)],
//!     40,
//! );
//! assert_eq!(widths, vec![10, 10, 20]);
//! ```

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How a region wants to be sized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeConstraint {
    /// Share of the space left after fixed and minimum regions.
    Ratio(u32),
    /// Exactly this many cells.
    Fixed(usize),
    /// Reserve this many cells up front.
    Minimum(usize),
    /// Equal share of whatever the ratio regions leave.
    #[default]
    Automatic,
}

/// A constraint plus optional clamps applied after resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Sizing {
    pub constraint: SizeConstraint,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_width: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_width: Option<usize>,
}

impl Sizing {
    #[inline]
    #[must_use]
    pub const fn new(constraint: SizeConstraint) -> Self {
        Self {
            constraint,
            min_width: None,
            max_width: None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn fixed(width: usize) -> Self {
        Self::new(SizeConstraint::Fixed(width))
    }

    #[inline]
    #[must_use]
    pub const fn ratio(weight: u32) -> Self {
        Self::new(SizeConstraint::Ratio(weight))
    }

    #[inline]
    #[must_use]
    pub const fn minimum(width: usize) -> Self {
        Self::new(SizeConstraint::Minimum(width))
    }

    #[inline]
    #[must_use]
    pub const fn automatic() -> Self {
        Self::new(SizeConstraint::Automatic)
    }

    /// Never resolve below `width`.
    #[must_use]
    pub const fn with_min(mut self, width: usize) -> Self {
        self.min_width = Some(width);
        self
    }

    /// Never resolve above `width`.
    #[must_use]
    pub const fn with_max(mut self, width: usize) -> Self {
        self.max_width = Some(width);
        self
    }

    /// Apply the clamps. A minimum larger than the maximum wins.
    #[inline]
    #[must_use]
    pub fn clamp(&self, width: usize) -> usize {
        let width = self.max_width.map_or(width, |max| width.min(max));
        self.min_width.map_or(width, |min| width.max(min))
    }

    #[inline]
    pub const fn has_clamps(&self) -> bool {
        self.min_width.is_some() || self.max_width.is_some()
    }
}

impl From<SizeConstraint> for Sizing {
    fn from(constraint: SizeConstraint) -> Self {
        Self::new(constraint)
    }
}

/// Anything the allocator can size.
pub trait Constrained {
    fn sizing(&self) -> Sizing;
}

impl Constrained for SizeConstraint {
    fn sizing(&self) -> Sizing {
        Sizing::new(*self)
    }
}

impl Constrained for Sizing {
    fn sizing(&self) -> Sizing {
        *self
    }
}

impl<C: Constrained + ?Sized> Constrained for &C {
    fn sizing(&self) -> Sizing {
        (**self).sizing()
    }
}

/// A sizeable unit of content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region<T> {
    pub content: T,
    pub sizing: Sizing,
    pub name: Option<String>,
}

impl<T> Region<T> {
    pub fn new(content: T, sizing: impl Into<Sizing>) -> Self {
        Self {
            content,
            sizing: sizing.into(),
            name: None,
        }
    }

    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl<T> Constrained for Region<T> {
    fn sizing(&self) -> Sizing {
        self.sizing
    }
}

/// Resolve one width per region out of `total` cells.
///
/// Zero regions give an empty result. With `total == 0` every region except
/// `Fixed` resolves to 0 before clamps. Ratio regions whose weights sum to 0
/// resolve to 0.
pub fn allocate_widths<C: Constrained>(regions: &[C], total: usize) -> Vec<usize> {
    if regions.is_empty() {
        return Vec::new();
    }
    let sizings: Vec<Sizing> = regions.iter().map(Constrained::sizing).collect();
    let mut widths = vec![0usize; sizings.len()];

    // Pass 1: fixed and minimum reservations.
    let mut reserved = 0usize;
    for (width, sizing) in widths.iter_mut().zip(&sizings) {
        match sizing.constraint {
            SizeConstraint::Fixed(w) => {
                *width = w;
                reserved = reserved.saturating_add(w);
            }
            SizeConstraint::Minimum(w) if total > 0 => {
                *width = w;
                reserved = reserved.saturating_add(w);
            }
            _ => {}
        }
    }
    let remaining = total.saturating_sub(reserved);

    // Pass 2: ratio shares.
    let total_weight: u64 = sizings
        .iter()
        .filter_map(|s| match s.constraint {
            SizeConstraint::Ratio(weight) => Some(u64::from(weight)),
            _ => None,
        })
        .sum();
    let mut used = 0usize;
    if total_weight == 0 {
        if sizings
            .iter()
            .any(|s| matches!(s.constraint, SizeConstraint::Ratio(_)))
        {
            debug!("ratio weights sum to zero; ratio regions resolve to 0");
        }
    } else {
        for (width, sizing) in widths.iter_mut().zip(&sizings) {
            if let SizeConstraint::Ratio(weight) = sizing.constraint {
                let share = remaining as u128 * u128::from(weight) / u128::from(total_weight);
                // share <= remaining, so the conversion cannot fail.
                *width = usize::try_from(share).unwrap_or(remaining);
                used += *width;
            }
        }
    }

    // Pass 3: automatic regions split the rest, the last takes the leftover.
    let automatic: Vec<usize> = sizings
        .iter()
        .enumerate()
        .filter(|(_, s)| s.constraint == SizeConstraint::Automatic)
        .map(|(i, _)| i)
        .collect();
    if let Some((&last, rest)) = automatic.split_last() {
        let pool = remaining.saturating_sub(used);
        let share = pool / automatic.len();
        for &i in rest {
            widths[i] = share;
        }
        widths[last] = pool - share * rest.len();
    }

    // Pass 4: clamps.
    for (width, sizing) in widths.iter_mut().zip(&sizings) {
        *width = sizing.clamp(*width);
    }

    debug!(
        regions = sizings.len(),
        total,
        ?widths,
        "allocated widths"
    );
    widths
}

/// Cumulative start offsets for `widths` laid out with `gap` cells between
/// neighbours.
pub fn offsets(widths: &[usize], gap: usize) -> Vec<usize> {
    let mut positions = Vec::with_capacity(widths.len());
    let mut pos = 0usize;
    for (i, &width) in widths.iter().enumerate() {
        positions.push(pos);
        pos = pos.saturating_add(width);
        if i + 1 < widths.len() {
            pos = pos.saturating_add(gap);
        }
    }
    positions
}

/// Ordered regions with lookup by name.
#[derive(Debug, Clone)]
pub struct RegionSet<T> {
    regions: Vec<Region<T>>,
    by_name: FxHashMap<String, usize>,
}

impl<T> Default for RegionSet<T> {
    fn default() -> Self {
        Self {
            regions: Vec::new(),
            by_name: FxHashMap::default(),
        }
    }
}

impl<T> RegionSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a region and return its position. A name already in use now
    /// refers to the new region.
    pub fn push(&mut self, region: Region<T>) -> usize {
        let index = self.regions.len();
        if let Some(name) = &region.name {
            self.by_name.insert(name.clone(), index);
        }
        self.regions.push(region);
        index
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub fn get(&self, name: &str) -> Option<&Region<T>> {
        self.position(name).map(|i| &self.regions[i])
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Region<T>> {
        self.position(name).map(move |i| &mut self.regions[i])
    }

    /// Modify a named region in place. Returns `false` when no region has
    /// that name.
    pub fn update(&mut self, name: &str, f: impl FnOnce(&mut Region<T>)) -> bool {
        match self.get_mut(name) {
            Some(region) => {
                f(region);
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Region<T>> {
        self.regions.iter()
    }

    pub fn as_slice(&self) -> &[Region<T>] {
        &self.regions
    }

    /// Resolve widths and pair each with its region.
    pub fn allocate(&self, total: usize) -> Vec<(usize, &Region<T>)> {
        allocate_widths(&self.regions, total)
            .into_iter()
            .zip(&self.regions)
            .collect()
    }
}

impl<T> FromIterator<Region<T>> for RegionSet<T> {
    fn from_iter<I: IntoIterator<Item = Region<T>>>(iter: I) -> Self {
        let mut set = Self::new();
        for region in iter {
            set.push(region);
        }
        set
    }
}
