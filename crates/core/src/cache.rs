//! Per-page memoization of extracted layouts.
//!
//! Extraction runs once per page; every later query against that page reuses
//! the cached [`PageTextLayout`]. Each entry remembers which source it was
//! extracted from (a document id, a render generation, anything the caller
//! uses to tell renders apart) and is rebuilt when that source changes.

use std::collections::HashMap;
use std::sync::Arc;

use crate::geometry::ViewportTransform;
use crate::layout::{extract, PageTextLayout, TextRun};

#[derive(Debug, Clone)]
struct CachedLayout {
    source: String,
    layout: Arc<PageTextLayout>,
}

/// Layouts keyed by page number.
///
/// Layouts are handed out as `Arc`s so queries on different pages can run on
/// other threads while the cache itself stays with its owner.
#[derive(Debug, Default)]
pub struct LayoutCache {
    layouts: HashMap<u32, CachedLayout>,
}

impl LayoutCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached layout for `page`, whatever source it came from.
    pub fn get(&self, page: u32) -> Option<Arc<PageTextLayout>> {
        self.layouts.get(&page).map(|entry| Arc::clone(&entry.layout))
    }

    /// Cached layout for `page` if it was extracted from `source`.
    pub fn get_current(&self, page: u32, source: &str) -> Option<Arc<PageTextLayout>> {
        self.layouts
            .get(&page)
            .filter(|entry| entry.source == source)
            .map(|entry| Arc::clone(&entry.layout))
    }

    /// Return the layout for `page`, building it with `build` when the page
    /// is not cached or was cached from a different source.
    pub fn get_or_insert_with<F>(&mut self, page: u32, source: &str, build: F) -> Arc<PageTextLayout>
    where
        F: FnOnce() -> PageTextLayout,
    {
        if let Some(layout) = self.get_current(page, source) {
            return layout;
        }

        log::debug!("building layout for page {page} from source {source:?}");
        let layout = Arc::new(build());
        self.layouts.insert(
            page,
            CachedLayout {
                source: source.to_string(),
                layout: Arc::clone(&layout),
            },
        );
        layout
    }

    /// Return the layout for `page`, extracting it from `runs` if needed.
    pub fn get_or_extract<V>(
        &mut self,
        page: u32,
        source: &str,
        runs: &[TextRun],
        viewport: &V,
    ) -> Arc<PageTextLayout>
    where
        V: ViewportTransform + ?Sized,
    {
        self.get_or_insert_with(page, source, || extract(runs, viewport))
    }

    /// Drop the cached layout for `page`. Returns whether one was cached.
    pub fn invalidate(&mut self, page: u32) -> bool {
        self.layouts.remove(&page).is_some()
    }

    pub fn clear(&mut self) {
        self.layouts.clear();
    }

    pub fn is_cached(&self, page: u32) -> bool {
        self.layouts.contains_key(&page)
    }

    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }

    /// Cached page numbers, ascending.
    pub fn pages(&self) -> Vec<u32> {
        let mut pages: Vec<u32> = self.layouts.keys().copied().collect();
        pages.sort_unstable();
        pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Viewport, IDENTITY_MATRIX};

    fn runs(text: &str) -> Vec<TextRun> {
        vec![TextRun::new(text, IDENTITY_MATRIX, 10.0, 10.0)]
    }

    #[test]
    fn test_extracts_once_per_source() {
        let mut cache = LayoutCache::new();
        let viewport = Viewport::new(100.0, 100.0);

        let first = cache.get_or_extract(1, "doc-a", &runs("first"), &viewport);
        // Same page and source: the cached layout is returned, new runs ignored.
        let second = cache.get_or_extract(1, "doc-a", &runs("second"), &viewport);

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.plain_text, "first");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_source_change_rebuilds() {
        let mut cache = LayoutCache::new();
        let viewport = Viewport::new(100.0, 100.0);

        cache.get_or_extract(1, "render-1", &runs("old"), &viewport);
        let layout = cache.get_or_extract(1, "render-2", &runs("new"), &viewport);

        assert_eq!(layout.plain_text, "new");
        assert!(cache.get_current(1, "render-1").is_none());
        assert!(cache.get_current(1, "render-2").is_some());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_builder_not_called_when_cached() {
        let mut cache = LayoutCache::new();
        let mut calls = 0;
        for _ in 0..3 {
            cache.get_or_insert_with(4, "doc", || {
                calls += 1;
                PageTextLayout::default()
            });
        }
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_invalidate_and_clear() {
        let mut cache = LayoutCache::new();
        let viewport = Viewport::new(100.0, 100.0);
        cache.get_or_extract(3, "doc", &runs("three"), &viewport);
        cache.get_or_extract(1, "doc", &runs("one"), &viewport);

        assert_eq!(cache.pages(), vec![1, 3]);
        assert!(cache.invalidate(3));
        assert!(!cache.invalidate(3));
        assert!(!cache.is_cached(3));
        assert!(cache.get(1).is_some());

        cache.clear();
        assert!(cache.is_empty());
    }
}
