#![forbid(unsafe_code)]

//! Turn segments into terminal text.
//!
//! The presenter only builds strings; writing them is the caller's job.
//! Every styled segment is emitted self-contained: its SGR parameters, the
//! text, then a reset. Styles are downgraded to the presenter's
//! [`ColorDepth`] first. Hyperlinks become OSC 8 sequences with an `id=`
//! from the presenter's [`LinkRegistry`]; ids are valid for one frame, and
//! the registry is cleared at the start of every [`Presenter::render`].
//!
//! ```
//! use gloss_render::Presenter;
//! use gloss_style::{ColorDepth, Style};
//! use gloss_text::Segment;
//!
//! let mut presenter = Presenter::new(ColorDepth::Standard);
//! let style = Style::parse("bold red").unwrap();
//! let out = presenter.render(&[Segment::styled("hi", style), Segment::line()]);
//! assert_eq!(out, "\x1b[1;31mhi\x1b[0m\n");
//! ```

use std::borrow::Cow;
use std::fmt::Write as _;

use gloss_core::RenderConfig;
use gloss_style::{ColorDepth, Style};
use gloss_text::{ControlCode, Segment};
use tracing::{debug, debug_span, trace};

use crate::link_registry::LinkRegistry;
use crate::sanitize::strip_control_sequences;

const RESET: &str = "\x1b[0m";
const LINK_END: &str = "\x1b]8;;\x1b\\";

/// Bytes for a control code.
pub fn control_sequence(code: ControlCode) -> String {
    match code {
        ControlCode::LineBreak => "\n".to_owned(),
        ControlCode::CarriageReturn => "\r".to_owned(),
        ControlCode::Bell => "\x07".to_owned(),
        ControlCode::CursorUp(0) => String::new(),
        ControlCode::CursorUp(n) => format!("\x1b[{n}A"),
        ControlCode::EraseLine => "\x1b[2K".to_owned(),
        ControlCode::Home => "\x1b[H".to_owned(),
    }
}

/// Segment-to-string converter for one output stream.
#[derive(Debug, Clone)]
pub struct Presenter {
    pub depth: ColorDepth,
    /// Emit OSC 8 hyperlinks for linked styles.
    pub hyperlinks: bool,
    /// Strip control sequences embedded in segment text and link URLs.
    pub sanitize: bool,
    links: LinkRegistry,
}

impl Presenter {
    pub fn new(depth: ColorDepth) -> Self {
        Self {
            depth,
            hyperlinks: true,
            sanitize: true,
            links: LinkRegistry::new(),
        }
    }

    /// A presenter for the colour depth the configuration allows.
    pub fn from_config(config: &RenderConfig) -> Self {
        Self::new(ColorDepth::from_config(config))
    }

    /// A presenter for the current thread's effective configuration.
    pub fn current() -> Self {
        Self::from_config(&RenderConfig::current())
    }

    #[must_use]
    pub fn hyperlinks(mut self, enabled: bool) -> Self {
        self.hyperlinks = enabled;
        self
    }

    #[must_use]
    pub fn sanitize(mut self, enabled: bool) -> Self {
        self.sanitize = enabled;
        self
    }

    pub fn links(&self) -> &LinkRegistry {
        &self.links
    }

    /// Styled terminal text for `segments`.
    pub fn render(&mut self, segments: &[Segment]) -> String {
        let _span = debug_span!("present", segments = segments.len(), depth = ?self.depth).entered();
        self.links.clear();
        let mut out = String::new();
        for segment in segments {
            self.render_segment(segment, &mut out);
        }
        trace!(bytes = out.len(), "presented");
        out
    }

    fn render_segment(&mut self, segment: &Segment, out: &mut String) {
        if let Some(code) = segment.control {
            out.push_str(&control_sequence(code));
            return;
        }
        let text = self.clean(&segment.text);
        let Some(style) = segment.style.as_ref().filter(|style| !style.is_empty()) else {
            out.push_str(&text);
            return;
        };

        let link = match style.link() {
            Some(url) if self.hyperlinks => self.link_target(url),
            _ => None,
        };
        if let Some(url) = &link {
            let id = self.links.register(url);
            let _ = write!(out, "\x1b]8;id={id};{url}\x1b\\");
        }
        let sequence = self.sgr(style);
        if sequence.is_empty() {
            out.push_str(&text);
        } else {
            let _ = write!(out, "\x1b[{sequence}m{text}{RESET}");
        }
        if link.is_some() {
            out.push_str(LINK_END);
        }
    }

    fn sgr(&self, style: &Style) -> String {
        style.downgrade(self.depth).to_ansi_sequence()
    }

    /// URL as written inside OSC 8. When sanitizing, a URL is reduced to
    /// printable characters and dropped if nothing is left.
    fn link_target<'a>(&self, url: &'a str) -> Option<Cow<'a, str>> {
        if !self.sanitize {
            return Some(Cow::Borrowed(url));
        }
        let url = match strip_control_sequences(url) {
            Cow::Borrowed(url) if !url.contains(['\t', '\n', '\r']) => Cow::Borrowed(url),
            stripped => Cow::Owned(stripped.chars().filter(|ch| !ch.is_control()).collect()),
        };
        if url.is_empty() {
            debug!("hyperlink dropped: url is empty after sanitizing");
            None
        } else {
            Some(url)
        }
    }

    fn clean<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if self.sanitize {
            strip_control_sequences(text)
        } else {
            Cow::Borrowed(text)
        }
    }

    /// Text only: no styling, no links. Line breaks and carriage returns
    /// are kept; other controls are dropped.
    pub fn render_plain(&self, segments: &[Segment]) -> String {
        let mut out = String::new();
        for segment in segments {
            match segment.control {
                Some(code @ (ControlCode::LineBreak | ControlCode::CarriageReturn)) => {
                    out.push_str(&control_sequence(code));
                }
                Some(_) => {}
                None => out.push_str(&self.clean(&segment.text)),
            }
        }
        out
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::current()
    }
}

/// Terminal lines `segments` occupy: every line break ends a line, and
/// trailing text after the last break is one more.
pub fn count_lines(segments: &[Segment]) -> usize {
    let mut lines = 0;
    let mut open = false;
    for segment in segments {
        match segment.control {
            Some(ControlCode::LineBreak) => {
                lines += 1;
                open = false;
            }
            Some(_) => {}
            None => {
                for piece in segment.text.split_inclusive('\n') {
                    if piece.ends_with('\n') {
                        lines += 1;
                        open = false;
                    } else if !piece.is_empty() {
                        open = true;
                    }
                }
            }
        }
    }
    lines + usize::from(open)
}
