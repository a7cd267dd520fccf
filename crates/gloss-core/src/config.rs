#![forbid(unsafe_code)]

//! Render configuration resolved from the environment.
//!
//! Everything downstream (colour depth selection, CJK ambiguous width,
//! box-drawing fallback, default render width) reads a [`RenderConfig`].
//! The process-wide value is computed once from the environment; tests and
//! embedders layer scoped changes on top with
//! [`config_override`](crate::config_override).
//!
//! # Environment
//!
//! | Variable            | Effect                                               |
//! |---------------------|------------------------------------------------------|
//! | `NO_COLOR`          | any value disables colour output                     |
//! | `GLOSS_COLOR_DEPTH` | `none`, `16`/`standard`, `256`/`eight_bit`, `truecolor`/`24bit` |
//! | `COLORTERM`         | `truecolor` or `24bit` enables 24-bit colour         |
//! | `TERM`              | `*256color*` enables the 256-colour palette          |
//! | `GLOSS_CJK_WIDTH`   | boolean; otherwise inferred from `LC_CTYPE`/`LANG`   |
//! | `COLUMNS`           | default render width                                 |
//! | `GLOSS_ASCII`       | boolean; box drawing falls back to ASCII             |

use std::sync::OnceLock;

/// Render width used when neither `COLUMNS` nor an override sets one.
pub const DEFAULT_WIDTH: usize = 80;

/// Resolved render configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderConfig {
    /// Colour output disabled entirely.
    pub no_color: bool,
    /// 24-bit colour supported.
    pub true_color: bool,
    /// 256-colour palette supported.
    pub colors_256: bool,
    /// Treat East Asian ambiguous-width characters as double width.
    pub cjk_width: bool,
    /// Default render width in cells, if known.
    pub width: Option<usize>,
    /// Restrict decorative glyphs to ASCII.
    pub ascii_only: bool,
}

#[inline]
fn env_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[inline]
fn is_cjk_locale(locale: &str) -> bool {
    let lower = locale.trim().to_ascii_lowercase();
    lower.starts_with("ja") || lower.starts_with("zh") || lower.starts_with("ko")
}

impl RenderConfig {
    /// Plain configuration: 16 colours, narrow ambiguous width, no width hint.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            no_color: false,
            true_color: false,
            colors_256: false,
            cjk_width: false,
            width: None,
            ascii_only: false,
        }
    }

    /// Resolve configuration using a custom environment lookup.
    pub fn from_env_with<F>(get_env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new();

        if let Some(term) = get_env("TERM") {
            config.colors_256 = term.contains("256color");
        }
        if let Some(colorterm) = get_env("COLORTERM") {
            let lower = colorterm.trim().to_ascii_lowercase();
            if lower == "truecolor" || lower == "24bit" {
                config.true_color = true;
                config.colors_256 = true;
            }
        }
        if let Some(depth) = get_env("GLOSS_COLOR_DEPTH") {
            match depth.trim().to_ascii_lowercase().as_str() {
                "none" | "mono" => config.no_color = true,
                "16" | "standard" => {
                    config.true_color = false;
                    config.colors_256 = false;
                }
                "256" | "eight_bit" => {
                    config.true_color = false;
                    config.colors_256 = true;
                }
                "truecolor" | "24bit" => {
                    config.true_color = true;
                    config.colors_256 = true;
                }
                other => tracing::debug!(value = other, "ignoring unknown GLOSS_COLOR_DEPTH"),
            }
        }
        // NO_COLOR wins over everything, including an explicit depth.
        if get_env("NO_COLOR").is_some() {
            config.no_color = true;
        }

        config.cjk_width = match get_env("GLOSS_CJK_WIDTH") {
            Some(value) => env_flag(&value),
            None => get_env("LC_CTYPE")
                .or_else(|| get_env("LANG"))
                .is_some_and(|locale| is_cjk_locale(&locale)),
        };

        config.width = get_env("COLUMNS")
            .and_then(|value| value.trim().parse::<usize>().ok())
            .filter(|&width| width > 0);

        config.ascii_only = get_env("GLOSS_ASCII").is_some_and(|value| env_flag(&value));

        config
    }

    /// Resolve configuration from the process environment (uncached).
    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Process-wide configuration, resolved once from the environment.
    pub fn global() -> Self {
        static GLOBAL: OnceLock<RenderConfig> = OnceLock::new();
        *GLOBAL.get_or_init(Self::from_env)
    }

    /// Effective configuration: the global value with any active
    /// thread-local overrides applied.
    pub fn current() -> Self {
        crate::config_override::apply_overrides(Self::global())
    }

    /// Width to render at, falling back to `default` when unknown.
    #[inline]
    #[must_use]
    pub fn width_or(&self, default: usize) -> usize {
        self.width.unwrap_or(default)
    }

    /// Width to render at, or [`DEFAULT_WIDTH`].
    #[inline]
    #[must_use]
    pub fn render_width(&self) -> usize {
        self.width_or(DEFAULT_WIDTH)
    }
}

/// Cached CJK width policy for the current thread's effective configuration.
#[inline]
pub fn cjk_width_enabled() -> bool {
    RenderConfig::current().cjk_width
}
