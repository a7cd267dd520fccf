#![forbid(unsafe_code)]

//! OSC 8 hyperlink ids.
//!
//! Terminals group the cells of one hyperlink by its `id=` parameter, so a
//! link broken across lines or table cells still highlights as one. The
//! registry hands out a stable id per distinct URL. It only grows until
//! [`LinkRegistry::clear`]; a `Presenter` clears its registry every frame.
//!
//! ```
//! use gloss_render::link_registry::LinkRegistry;
//!
//! let mut registry = LinkRegistry::new();
//! let id = registry.register("https://example.com");
//! assert_eq!(registry.register("https://example.com"), id);
//! assert_eq!(registry.get(id), Some("https://example.com"));
//! ```

use std::sync::Arc;

use rustc_hash::FxHashMap;

/// URL to id map. Ids start at 1.
#[derive(Debug, Clone, Default)]
pub struct LinkRegistry {
    urls: Vec<Arc<str>>,
    ids: FxHashMap<Arc<str>, u32>,
}

impl LinkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id for `url`, allocating one the first time it is seen.
    pub fn register(&mut self, url: &str) -> u32 {
        if let Some(&id) = self.ids.get(url) {
            return id;
        }
        let url: Arc<str> = Arc::from(url);
        self.urls.push(Arc::clone(&url));
        let id = u32::try_from(self.urls.len()).unwrap_or(u32::MAX);
        self.ids.insert(url, id);
        id
    }

    pub fn get(&self, id: u32) -> Option<&str> {
        let index = usize::try_from(id).ok()?.checked_sub(1)?;
        self.urls.get(index).map(AsRef::as_ref)
    }

    pub fn clear(&mut self) {
        self.urls.clear();
        self.ids.clear();
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}
