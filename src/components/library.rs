//! eBook list shown by the library overlay.

use bevy_ecs::prelude::Component;
use serde::{Deserialize, Serialize};

/// Rows visible at once; wheel scrolling stops when the last one shows.
pub const LIBRARY_VISIBLE_ROWS: usize = 4;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ebook {
    pub path: String,
    pub title: String,
}

impl Ebook {
    pub fn new(path: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            title: title.into(),
        }
    }
}

#[derive(Component, Clone, Debug, Default)]
pub struct LibraryData {
    pub ebooks: Vec<Ebook>,
    pub selected: Option<usize>,
    pub scroll_offset: usize,
    pub is_showing_ui: bool,
    pub search_buffer: String,
}

impl LibraryData {
    pub fn new(ebooks: Vec<Ebook>) -> Self {
        Self {
            ebooks,
            ..Default::default()
        }
    }

    /// Built-in catalogue used when nothing could be loaded.
    pub fn default_ebooks() -> Vec<Ebook> {
        vec![
            Ebook::new("books/sample1.pdf", "Introduction to Programming"),
            Ebook::new("books/sample2.pdf", "Game Development Basics"),
        ]
    }

    pub fn add_ebook(&mut self, ebook: Ebook) {
        self.ebooks.push(ebook);
    }

    pub fn select(&mut self, index: usize) {
        if index < self.ebooks.len() {
            self.selected = Some(index);
        }
    }

    /// Indices of books whose title contains the search text, ignoring case.
    pub fn matching_indices(&self) -> Vec<usize> {
        let needle = self.search_buffer.trim().to_lowercase();
        self.ebooks
            .iter()
            .enumerate()
            .filter(|(_, book)| needle.is_empty() || book.title.to_lowercase().contains(&needle))
            .map(|(i, _)| i)
            .collect()
    }

    /// Apply a mouse wheel delta; positive wheel scrolls up. The range is
    /// the list as filtered by the search text.
    pub fn scroll_by(&mut self, wheel: f32) {
        let max = self.matching_indices().len().saturating_sub(LIBRARY_VISIBLE_ROWS);
        self.scroll_offset = scroll_clamped(self.scroll_offset, wheel, max);
    }

    pub fn close(&mut self) {
        self.is_showing_ui = false;
    }
}

/// Shift `offset` against the wheel direction, clamped to `[0, max]`.
pub fn scroll_clamped(offset: usize, wheel: f32, max: usize) -> usize {
    let step = wheel as i64;
    let next = offset as i64 - step;
    next.clamp(0, max as i64) as usize
}
