#![forbid(unsafe_code)]

//! Core: render configuration and logging setup.
//!
//! # Role in gloss
//! `gloss-core` is the ambient layer every other crate reads from. It owns
//! the environment-derived [`RenderConfig`](config::RenderConfig), the
//! thread-local override stack used by tests and embedders, and the helpers
//! that install `tracing` subscribers.
//!
//! # How it fits in the system
//! `gloss-style` maps the colour flags to a colour depth, `gloss-text` reads
//! the CJK width policy when measuring text, and `gloss-widgets` reads the
//! ASCII fallback when choosing border glyphs.

pub mod config;
pub mod config_override;
pub mod logging;

pub use config::{DEFAULT_WIDTH, RenderConfig};
pub use config_override::{ConfigOverride, OverrideGuard, push_override, with_config_override};
