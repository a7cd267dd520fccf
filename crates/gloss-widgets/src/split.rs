#![forbid(unsafe_code)]

//! Named pane layouts.
//!
//! A [`Pane`] is either a leaf holding content or a split into child panes
//! arranged side by side ([`Pane::split_row`]) or stacked
//! ([`Pane::split_column`]). Sizes along the split axis come from the width
//! allocator: `size` becomes `Fixed`, otherwise `ratio` becomes `Ratio`, and
//! `minimum_size` is a lower clamp.
//!
//! # Example
//!
//! ```
//! use gloss_widgets::split::Pane;
//! use gloss_text::Segment;
//!
//! let mut root = Pane::new().named("root");
//! root.split_row([
//!     Pane::new().named("nav").size(10),
//!     Pane::new().named("body"),
//! ]);
//! root.update("body", [Segment::text("hello")]);
//!
//! let regions = root.region_map(40, 5);
//! assert_eq!(regions["nav"].width, 10);
//! assert_eq!(regions["body"].width, 30);
//! ```

use gloss_layout::{Rect, Sizing, allocate_widths};
use gloss_text::segment::{Segment, adjust_line_length, set_shape, split_lines};
use rustc_hash::FxHashMap;
use tracing::{debug, debug_span};

/// How a split arranges its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitDirection {
    /// Side by side.
    Row,
    /// Stacked top to bottom.
    Column,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PaneBody {
    Leaf(Vec<Segment>),
    Split {
        direction: SplitDirection,
        children: Vec<Pane>,
    },
}

/// A node in a pane layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pane {
    pub name: Option<String>,
    /// Fixed size along the parent's split axis.
    pub size: Option<usize>,
    /// Share of the parent's free space when `size` is unset.
    pub ratio: u32,
    pub minimum_size: usize,
    pub visible: bool,
    body: PaneBody,
}

impl Default for Pane {
    fn default() -> Self {
        Self {
            name: None,
            size: None,
            ratio: 1,
            minimum_size: 1,
            visible: true,
            body: PaneBody::Leaf(Vec::new()),
        }
    }
}

impl Pane {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_content(content: impl IntoIterator<Item = Segment>) -> Self {
        Self {
            body: PaneBody::Leaf(content.into_iter().collect()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn size(mut self, size: usize) -> Self {
        self.size = Some(size);
        self
    }

    #[must_use]
    pub fn ratio(mut self, ratio: u32) -> Self {
        self.ratio = ratio;
        self
    }

    #[must_use]
    pub fn minimum_size(mut self, minimum_size: usize) -> Self {
        self.minimum_size = minimum_size;
        self
    }

    #[must_use]
    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Turn this pane into a side-by-side split.
    pub fn split_row(&mut self, children: impl IntoIterator<Item = Pane>) {
        self.split(SplitDirection::Row, children);
    }

    /// Turn this pane into a top-to-bottom split.
    pub fn split_column(&mut self, children: impl IntoIterator<Item = Pane>) {
        self.split(SplitDirection::Column, children);
    }

    pub fn split(&mut self, direction: SplitDirection, children: impl IntoIterator<Item = Pane>) {
        self.body = PaneBody::Split {
            direction,
            children: children.into_iter().collect(),
        };
    }

    /// Child panes; empty for a leaf.
    pub fn children(&self) -> &[Pane] {
        match &self.body {
            PaneBody::Leaf(_) => &[],
            PaneBody::Split { children, .. } => children,
        }
    }

    pub fn content(&self) -> Option<&[Segment]> {
        match &self.body {
            PaneBody::Leaf(content) => Some(content),
            PaneBody::Split { .. } => None,
        }
    }

    /// Find a pane by name, depth first.
    pub fn get(&self, name: &str) -> Option<&Pane> {
        if self.name.as_deref() == Some(name) {
            return Some(self);
        }
        self.children().iter().find_map(|child| child.get(name))
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Pane> {
        if self.name.as_deref() == Some(name) {
            return Some(self);
        }
        match &mut self.body {
            PaneBody::Leaf(_) => None,
            PaneBody::Split { children, .. } => {
                children.iter_mut().find_map(|child| child.get_mut(name))
            }
        }
    }

    /// Replace a named pane's content, making it a leaf. Returns `false` when
    /// no pane has that name.
    pub fn update(&mut self, name: &str, content: impl IntoIterator<Item = Segment>) -> bool {
        match self.get_mut(name) {
            Some(pane) => {
                pane.body = PaneBody::Leaf(content.into_iter().collect());
                true
            }
            None => false,
        }
    }

    fn sizing(&self) -> Sizing {
        match self.size {
            Some(size) => Sizing::fixed(size),
            None => Sizing::ratio(self.ratio).with_min(self.minimum_size),
        }
    }

    /// Rectangles of the visible children inside `area`.
    fn child_areas(&self, area: Rect) -> Vec<(&Pane, Rect)> {
        let PaneBody::Split {
            direction,
            children,
        } = &self.body
        else {
            return Vec::new();
        };
        let visible: Vec<&Pane> = children.iter().filter(|c| c.visible).collect();
        let sizings: Vec<Sizing> = visible.iter().map(|c| c.sizing()).collect();
        let extent = match direction {
            SplitDirection::Row => area.width,
            SplitDirection::Column => area.height,
        };
        let sizes = allocate_widths(&sizings, extent);

        let mut offset = 0;
        visible
            .into_iter()
            .zip(sizes)
            .map(|(child, size)| {
                let rect = match direction {
                    SplitDirection::Row => Rect::new(area.x + offset, area.y, size, area.height),
                    SplitDirection::Column => Rect::new(area.x, area.y + offset, area.width, size),
                };
                offset += size;
                (child, rect)
            })
            .collect()
    }

    /// Every named visible pane's rectangle for a `width` x `height` area.
    pub fn region_map(&self, width: usize, height: usize) -> FxHashMap<String, Rect> {
        let mut map = FxHashMap::default();
        self.collect_regions(Rect::new(0, 0, width, height), &mut map);
        map
    }

    fn collect_regions(&self, area: Rect, map: &mut FxHashMap<String, Rect>) {
        if let Some(name) = &self.name {
            map.insert(name.clone(), area);
        }
        for (child, rect) in self.child_areas(area) {
            child.collect_regions(rect, map);
        }
    }

    /// Render into exactly `height` lines of exactly `width` cells.
    pub fn render(&self, width: usize, height: usize) -> Vec<Segment> {
        let _span = debug_span!("widget_render", widget = "Split", width, height).entered();
        let lines = self.render_lines(Rect::new(0, 0, width, height));
        let mut out = Vec::new();
        for line in set_shape(&lines, width, Some(height), None) {
            out.extend(line);
            out.push(Segment::line());
        }
        out
    }

    fn render_lines(&self, area: Rect) -> Vec<Vec<Segment>> {
        match &self.body {
            PaneBody::Leaf(content) => {
                let lines = split_lines(content.iter().cloned());
                set_shape(&lines, area.width, Some(area.height), None)
            }
            PaneBody::Split { direction, .. } => {
                let children = self.child_areas(area);
                debug!(
                    name = self.name.as_deref(),
                    children = children.len(),
                    "rendering split"
                );
                let lines: Vec<Vec<Segment>> = match direction {
                    SplitDirection::Column => children
                        .into_iter()
                        .flat_map(|(child, rect)| child.render_lines(rect))
                        .collect(),
                    SplitDirection::Row => {
                        let mut lines = vec![Vec::new(); area.height];
                        for (child, rect) in children {
                            let child_lines = child.render_lines(rect);
                            for (line, child_line) in lines.iter_mut().zip(child_lines) {
                                line.extend(adjust_line_length(&child_line, rect.width, None, true));
                            }
                        }
                        lines
                    }
                };
                // Ratio rounding can leave the children short of the area.
                set_shape(&lines, area.width, Some(area.height), None)
            }
        }
    }
}
