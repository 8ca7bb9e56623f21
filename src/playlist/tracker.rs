use std::collections::BTreeSet;

use crate::backend::MediaBackend;
use crate::config::SettingsProvider;
use crate::error::{PlayerError, Result};
use crate::library::TrackRef;
use crate::player::Coordinator;
use crate::tasks::{DURATION_POLL_INTERVAL, Task, Tasks};
use crate::ui::{NO_SONG_ARTIST, NO_SONG_TITLE, UiSink};

use super::model::Playlist;

/// Owns the playlist and which of its rows is active.
///
/// `current` is `None` when nothing is loaded, otherwise always a valid
/// index into the playlist.
#[derive(Debug, Default)]
pub struct Tracker {
    playlist: Playlist,
    current: Option<usize>,
}

impl Tracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn playlist_mut(&mut self) -> &mut Playlist {
        &mut self.playlist
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    #[cfg(test)]
    pub fn current_track(&self) -> Option<&TrackRef> {
        self.current.and_then(|i| self.playlist.get(i))
    }

    /// Append `track`. Autoplay is queued, never run inline.
    pub fn append(
        &mut self,
        track: TrackRef,
        settings: &dyn SettingsProvider,
        tasks: &mut Tasks,
        ui: &mut dyn UiSink,
    ) {
        let was_empty = self.playlist.is_empty();
        let title = track.title().to_string();
        self.playlist.push(track);

        if settings.autoplay() && was_empty && self.current.is_none() {
            ui.show_toast(&format!("Auto-playing: {title}"));
            tasks.idle(Task::Activate(0));
        }
    }

    /// Make `index` the active row and start it from zero.
    pub fn activate<B: MediaBackend>(
        &mut self,
        index: usize,
        coord: &mut Coordinator<B>,
        tasks: &mut Tasks,
        ui: &mut dyn UiSink,
    ) -> Result<()> {
        let Some(track) = self.playlist.get(index) else {
            let err = PlayerError::InvalidIndex {
                index,
                len: self.playlist.len(),
            };
            log::warn!("{err}");
            return Err(err);
        };
        coord.ensure_available()?;

        self.current = Some(index);
        let poll = coord.load_and_play(track, ui);
        tasks.after(DURATION_POLL_INTERVAL, Task::PollDuration(poll));
        ui.set_now_playing(track.title(), track.artist());
        Ok(())
    }

    /// Following row, if any. No wrap-around.
    pub fn next<B: MediaBackend>(
        &mut self,
        coord: &mut Coordinator<B>,
        tasks: &mut Tasks,
        ui: &mut dyn UiSink,
    ) -> Result<()> {
        match self.current {
            Some(i) if i + 1 < self.playlist.len() => self.activate(i + 1, coord, tasks, ui),
            _ => Ok(()),
        }
    }

    /// Preceding row, if any. No wrap-around.
    pub fn previous<B: MediaBackend>(
        &mut self,
        coord: &mut Coordinator<B>,
        tasks: &mut Tasks,
        ui: &mut dyn UiSink,
    ) -> Result<()> {
        match self.current {
            Some(i) if i > 0 => self.activate(i - 1, coord, tasks, ui),
            _ => Ok(()),
        }
    }

    /// Play button: start the first row when idle, otherwise toggle.
    pub fn play_pressed<B: MediaBackend>(
        &mut self,
        coord: &mut Coordinator<B>,
        tasks: &mut Tasks,
        ui: &mut dyn UiSink,
    ) -> Result<()> {
        if self.current.is_none() {
            if self.playlist.is_empty() {
                return Ok(());
            }
            return self.activate(0, coord, tasks, ui);
        }
        coord.toggle_playback(ui);
        Ok(())
    }

    /// Delete the given rows. Returns how many were removed.
    ///
    /// Duplicates and out-of-range indices are ignored. Removing the active
    /// row stops playback; otherwise the active index follows its track.
    pub fn remove_set<B: MediaBackend>(
        &mut self,
        indices: &[usize],
        coord: &mut Coordinator<B>,
        ui: &mut dyn UiSink,
    ) -> usize {
        let len = self.playlist.len();
        let set: BTreeSet<usize> = indices.iter().copied().filter(|&i| i < len).collect();
        if set.is_empty() {
            return 0;
        }

        if let Some(cur) = self.current.filter(|c| set.contains(c)) {
            log::info!("removing active row {cur}; stopping");
            coord.stop(ui);
            self.current = None;
            ui.set_now_playing(NO_SONG_TITLE, NO_SONG_ARTIST);
        }

        let descending: Vec<usize> = set.iter().rev().copied().collect();
        self.playlist.remove_descending(&descending);

        if let Some(cur) = self.current {
            self.current = Some(cur - set.range(..cur).count());
        }

        let removed = set.len();
        let noun = if removed == 1 { "song" } else { "songs" };
        ui.show_toast(&format!("Removed {removed} {noun}"));
        removed
    }

    /// The backend finished the active row: stop, then move on if possible.
    pub fn end_of_stream<B: MediaBackend>(
        &mut self,
        coord: &mut Coordinator<B>,
        tasks: &mut Tasks,
        ui: &mut dyn UiSink,
    ) -> Result<()> {
        coord.on_end_of_stream(ui);
        self.next(coord, tasks, ui)
    }
}
