#![forbid(unsafe_code)]

//! Scoped, thread-local overrides of [`RenderConfig`].
//!
//! Width measurement and colour depth selection consult
//! [`RenderConfig::current`], which starts from the environment and applies
//! every override pushed on the current thread, bottom to top. Overrides are
//! removed when their guard drops, so parallel tests stay isolated.
//!
//! # Invariants
//!
//! 1. **Thread isolation**: overrides on one thread never affect another.
//! 2. **Stack ordering**: later pushes win; dropping a guard restores the
//!    previous effective configuration.
//! 3. **Cleanup**: guards pop on drop, including during unwinding.
//!
//! # Example
//!
//! ```
//! use gloss_core::config::RenderConfig;
//! use gloss_core::config_override::{with_config_override, ConfigOverride};
//!
//! with_config_override(ConfigOverride::new().cjk_width(Some(true)), || {
//!     assert!(RenderConfig::current().cjk_width);
//! });
//! ```

use crate::config::RenderConfig;
use std::cell::RefCell;

/// Override specification for [`RenderConfig`].
///
/// Each field is tri-state: `Some(v)` forces the value, `None` leaves the
/// base (or an earlier override) in place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfigOverride {
    pub no_color: Option<bool>,
    pub true_color: Option<bool>,
    pub colors_256: Option<bool>,
    pub cjk_width: Option<bool>,
    pub width: Option<Option<usize>>,
    pub ascii_only: Option<bool>,
}

impl ConfigOverride {
    /// Create an empty override (nothing changed).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            no_color: None,
            true_color: None,
            colors_256: None,
            cjk_width: None,
            width: None,
            ascii_only: None,
        }
    }

    /// Simulate a terminal with no colour and ASCII-only glyphs.
    #[must_use]
    pub const fn dumb() -> Self {
        Self {
            no_color: Some(true),
            true_color: Some(false),
            colors_256: Some(false),
            cjk_width: Some(false),
            width: None,
            ascii_only: Some(true),
        }
    }

    /// Simulate a modern 24-bit terminal.
    #[must_use]
    pub const fn modern() -> Self {
        Self {
            no_color: Some(false),
            true_color: Some(true),
            colors_256: Some(true),
            cjk_width: None,
            width: None,
            ascii_only: Some(false),
        }
    }

    #[must_use]
    pub const fn no_color(mut self, value: Option<bool>) -> Self {
        self.no_color = value;
        self
    }

    #[must_use]
    pub const fn true_color(mut self, value: Option<bool>) -> Self {
        self.true_color = value;
        self
    }

    #[must_use]
    pub const fn colors_256(mut self, value: Option<bool>) -> Self {
        self.colors_256 = value;
        self
    }

    #[must_use]
    pub const fn cjk_width(mut self, value: Option<bool>) -> Self {
        self.cjk_width = value;
        self
    }

    /// Force a render width (`Some(None)` forces "unknown").
    #[must_use]
    pub const fn width(mut self, value: Option<Option<usize>>) -> Self {
        self.width = value;
        self
    }

    #[must_use]
    pub const fn ascii_only(mut self, value: Option<bool>) -> Self {
        self.ascii_only = value;
        self
    }

    /// Check if nothing is overridden.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.no_color.is_none()
            && self.true_color.is_none()
            && self.colors_256.is_none()
            && self.cjk_width.is_none()
            && self.width.is_none()
            && self.ascii_only.is_none()
    }

    /// Apply this override on top of a base configuration.
    #[must_use]
    pub fn apply_to(&self, mut config: RenderConfig) -> RenderConfig {
        if let Some(v) = self.no_color {
            config.no_color = v;
        }
        if let Some(v) = self.true_color {
            config.true_color = v;
        }
        if let Some(v) = self.colors_256 {
            config.colors_256 = v;
        }
        if let Some(v) = self.cjk_width {
            config.cjk_width = v;
        }
        if let Some(v) = self.width {
            config.width = v;
        }
        if let Some(v) = self.ascii_only {
            config.ascii_only = v;
        }
        config
    }
}

thread_local! {
    static OVERRIDE_STACK: RefCell<Vec<ConfigOverride>> = const { RefCell::new(Vec::new()) };
}

/// RAII guard that pops its override when dropped.
#[must_use]
pub struct OverrideGuard {
    // Not Send: the override lives in this thread's stack.
    _marker: std::marker::PhantomData<*const ()>,
}

impl Drop for OverrideGuard {
    fn drop(&mut self) {
        OVERRIDE_STACK.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

/// Push an override onto the thread-local stack.
#[must_use = "the override is removed when the guard is dropped"]
pub fn push_override(over: ConfigOverride) -> OverrideGuard {
    OVERRIDE_STACK.with(|stack| {
        stack.borrow_mut().push(over);
    });
    tracing::trace!(?over, "config override pushed");
    OverrideGuard {
        _marker: std::marker::PhantomData,
    }
}

/// Run a closure with an override active.
pub fn with_config_override<F, R>(over: ConfigOverride, f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = push_override(over);
    f()
}

/// Apply every active override on this thread to `base`.
#[must_use]
pub fn apply_overrides(base: RenderConfig) -> RenderConfig {
    OVERRIDE_STACK.with(|stack| {
        let stack = stack.borrow();
        stack.iter().fold(base, |config, over| over.apply_to(config))
    })
}

/// Number of active overrides on this thread.
#[must_use]
pub fn override_depth() -> usize {
    OVERRIDE_STACK.with(|stack| stack.borrow().len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_is_empty() {
        assert!(ConfigOverride::new().is_empty());
        assert!(!ConfigOverride::dumb().is_empty());
    }

    #[test]
    fn apply_only_touches_set_fields() {
        let base = RenderConfig {
            colors_256: true,
            width: Some(100),
            ..RenderConfig::new()
        };
        let out = ConfigOverride::new().cjk_width(Some(true)).apply_to(base);
        assert!(out.cjk_width);
        assert!(out.colors_256);
        assert_eq!(out.width, Some(100));
    }

    #[test]
    fn width_can_be_forced_unknown() {
        let base = RenderConfig {
            width: Some(100),
            ..RenderConfig::new()
        };
        let out = ConfigOverride::new().width(Some(None)).apply_to(base);
        assert_eq!(out.width, None);
    }

    #[test]
    fn guard_restores_on_drop() {
        assert_eq!(override_depth(), 0);
        {
            let _outer = push_override(ConfigOverride::new().cjk_width(Some(true)));
            assert!(RenderConfig::current().cjk_width);
            {
                let _inner = push_override(ConfigOverride::new().cjk_width(Some(false)));
                assert!(!RenderConfig::current().cjk_width);
                assert_eq!(override_depth(), 2);
            }
            assert!(RenderConfig::current().cjk_width);
        }
        assert_eq!(override_depth(), 0);
    }

    #[test]
    fn with_override_returns_value() {
        let width = with_config_override(ConfigOverride::new().width(Some(Some(42))), || {
            RenderConfig::current().width_or(80)
        });
        assert_eq!(width, 42);
    }

    #[test]
    fn overrides_do_not_leak_across_threads() {
        let _guard = push_override(ConfigOverride::dumb());
        let depth = std::thread::spawn(override_depth).join().unwrap_or(usize::MAX);
        assert_eq!(depth, 0);
    }

    #[test]
    fn guard_pops_during_unwind() {
        let result = std::panic::catch_unwind(|| {
            let _guard = push_override(ConfigOverride::modern());
            panic!("boom");
        });
        assert!(result.is_err());
        assert_eq!(override_depth(), 0);
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_override() -> impl Strategy<Value = ConfigOverride> {
        (
            proptest::option::of(any::<bool>()),
            proptest::option::of(any::<bool>()),
            proptest::option::of(any::<bool>()),
            proptest::option::of(any::<bool>()),
            proptest::option::of(proptest::option::of(0usize..500)),
            proptest::option::of(any::<bool>()),
        )
            .prop_map(
                |(no_color, true_color, colors_256, cjk_width, width, ascii_only)| {
                    ConfigOverride {
                        no_color,
                        true_color,
                        colors_256,
                        cjk_width,
                        width,
                        ascii_only,
                    }
                },
            )
    }

    proptest! {
        #[test]
        fn empty_override_is_identity(over in arb_override()) {
            let base = over.apply_to(RenderConfig::new());
            prop_assert_eq!(ConfigOverride::new().apply_to(base), base);
        }

        #[test]
        fn applying_twice_is_idempotent(over in arb_override()) {
            let once = over.apply_to(RenderConfig::new());
            prop_assert_eq!(over.apply_to(once), once);
        }
    }
}
