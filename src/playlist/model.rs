//! The ordered list of tracks plus the row selection and search filter.

use std::collections::BTreeSet;

use crate::library::TrackRef;

/// Tracks in playback order. Indices are 0-based and contiguous.
#[derive(Debug, Default, Clone)]
pub struct Playlist {
    tracks: Vec<TrackRef>,
    /// Rows marked for deletion.
    selected: BTreeSet<usize>,
    /// Lowercased search query; empty shows every row.
    query: String,
}

impl Playlist {
    pub fn push(&mut self, track: TrackRef) {
        self.tracks.push(track);
    }

    pub fn get(&self, index: usize) -> Option<&TrackRef> {
        self.tracks.get(index)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = &TrackRef> {
        self.tracks.iter()
    }

    /// Remove the rows in `sorted_desc` (strictly descending, all in range).
    ///
    /// The selection is rebuilt so it keeps pointing at the same tracks.
    pub(super) fn remove_descending(&mut self, sorted_desc: &[usize]) {
        for &index in sorted_desc {
            self.tracks.remove(index);
        }
        let removed: BTreeSet<usize> = sorted_desc.iter().copied().collect();
        self.selected = self
            .selected
            .iter()
            .filter(|&&i| !removed.contains(&i))
            .map(|&i| i - removed.range(..i).count())
            .filter(|&i| i < self.tracks.len())
            .collect();
    }

    pub fn is_visible(&self, index: usize) -> bool {
        self.tracks
            .get(index)
            .is_some_and(|t| t.matches(&self.query))
    }

    /// Indices of the rows the search filter lets through, in order.
    pub fn visible_indices(&self) -> Vec<usize> {
        (0..self.tracks.len())
            .filter(|&i| self.is_visible(i))
            .collect()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Replace the search query and unselect rows it hides.
    pub fn set_query(&mut self, query: &str) {
        self.query = query.trim().to_lowercase();
        let hidden: Vec<usize> = self
            .selected
            .iter()
            .copied()
            .filter(|&i| !self.is_visible(i))
            .collect();
        for i in hidden {
            self.selected.remove(&i);
        }
    }

    pub fn toggle_selected(&mut self, index: usize) {
        if !self.is_visible(index) {
            return;
        }
        if !self.selected.remove(&index) {
            self.selected.insert(index);
        }
    }

    pub fn select_all_visible(&mut self) {
        let visible = self.visible_indices();
        self.selected.extend(visible);
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.contains(&index)
    }

    pub fn selected(&self) -> Vec<usize> {
        self.selected.iter().copied().collect()
    }
}
