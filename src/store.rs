//! Per-page annotation storage.
//!
//! Annotations are kept per 1-based page number in insertion order, which is
//! also their drawing order within a layer. A page's list is created on its
//! first annotation; the whole store is cleared when a new document opens.

use std::collections::BTreeMap;

use crate::model::{Annotation, Point};

/// Storage for the annotations of one open document.
#[derive(Debug, Clone, Default)]
pub struct AnnotationStore {
    pages: BTreeMap<u32, Vec<Annotation>>,
    /// Set when annotations change, cleared after the overlay is rebuilt
    dirty: bool,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear the dirty flag. Call after rebuilding the overlay.
    #[inline]
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Append an annotation to a page and return its index on that page.
    pub fn add(&mut self, page: u32, annotation: Annotation) -> usize {
        let entries = self.pages.entry(page).or_default();
        entries.push(annotation);
        self.dirty = true;
        log::debug!("📌 Page {}: stored annotation #{}", page, entries.len() - 1);
        entries.len() - 1
    }

    /// Annotations of a page in insertion order (empty if none).
    pub fn page(&self, page: u32) -> &[Annotation] {
        self.pages.get(&page).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn get(&self, page: u32, index: usize) -> Option<&Annotation> {
        self.pages.get(&page)?.get(index)
    }

    /// Replace an annotation in place, keeping its position. Returns the old one.
    pub fn replace(
        &mut self,
        page: u32,
        index: usize,
        annotation: Annotation,
    ) -> Option<Annotation> {
        let slot = self.pages.get_mut(&page)?.get_mut(index)?;
        self.dirty = true;
        Some(std::mem::replace(slot, annotation))
    }

    /// Remove an annotation, shifting later ones down.
    pub fn remove(&mut self, page: u32, index: usize) -> Option<Annotation> {
        let entries = self.pages.get_mut(&page)?;
        if index >= entries.len() {
            return None;
        }
        let removed = entries.remove(index);
        if entries.is_empty() {
            self.pages.remove(&page);
        }
        self.dirty = true;
        Some(removed)
    }

    /// Index of the topmost text note on `page` containing `point`.
    pub fn text_at(&self, page: u32, point: Point) -> Option<usize> {
        self.page(page)
            .iter()
            .enumerate()
            .rev()
            .find(|(_, ann)| ann.as_text().is_some_and(|text| text.bounds().contains(point)))
            .map(|(index, _)| index)
    }

    /// Pages that have at least one annotation, ascending.
    pub fn pages(&self) -> impl Iterator<Item = u32> + '_ {
        self.pages.keys().copied()
    }

    /// Total number of annotations across all pages.
    pub fn len(&self) -> usize {
        self.pages.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Drop every annotation, e.g. when another document is opened.
    pub fn clear(&mut self) {
        if !self.pages.is_empty() {
            log::debug!("🗑️ Cleared {} annotations", self.len());
            self.dirty = true;
        }
        self.pages.clear();
    }
}
