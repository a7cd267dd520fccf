#![forbid(unsafe_code)]

//! Presentation: segments to terminal text.
//!
//! # Role in gloss
//! Everything upstream produces `Vec<Segment>`. This crate is the last step:
//! it downgrades styles to the terminal's colour depth, emits SGR and OSC 8
//! sequences, maps control segments to their bytes and strips anything
//! executable that leaked into segment text. It never writes to a terminal.

pub mod link_registry;
pub mod presenter;
pub mod sanitize;

pub use link_registry::LinkRegistry;
pub use presenter::{Presenter, control_sequence, count_lines};
pub use sanitize::strip_control_sequences;
