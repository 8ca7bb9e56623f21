use crate::backend::{BackendEvent, MediaBackend, SourceEvent};
use crate::config::{LibrarySettings, Preferences, SettingsProvider, Settings};
use crate::error::Result;
use crate::library;
use crate::player::{Coordinator, TransportSnapshot};
use crate::playlist::Tracker;
use crate::tasks::{Scheduled, Task, Tasks, TimerFlow};
use crate::ui::{UiSink, View};

use super::events::UiEvent;

/// Everything one run of the player owns.
///
/// Handlers take the session by `&mut` and run to completion; anything
/// that must happen later is queued on `tasks` and collected by the loop
/// through [`AppSession::take_scheduled`].
pub struct AppSession<B: MediaBackend> {
    tracker: Tracker,
    coordinator: Coordinator<B>,
    prefs: Preferences,
    library: LibrarySettings,
    tasks: Tasks,
}

impl<B: MediaBackend> AppSession<B> {
    pub fn new(backend: B, settings: &Settings) -> Self {
        Self {
            tracker: Tracker::new(),
            coordinator: Coordinator::new(backend, settings.playback.initial_volume),
            prefs: Preferences::from_settings(settings),
            library: settings.library.clone(),
            tasks: Tasks::default(),
        }
    }

    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    pub fn coordinator(&self) -> &Coordinator<B> {
        &self.coordinator
    }

    pub fn prefs(&self) -> &Preferences {
        &self.prefs
    }

    pub fn snapshot(&self) -> TransportSnapshot {
        self.coordinator.snapshot(self.tracker.current())
    }

    /// A view showing this session's transport, ready for the first draw.
    pub fn new_view(&self) -> View {
        let mut view = View::default();
        self.coordinator.sync_ui(&mut view);
        view
    }

    pub fn mark_backend_unavailable(&mut self, reason: String, ui: &mut dyn UiSink) {
        self.coordinator.mark_unavailable(reason, ui);
    }

    /// Tasks queued since the last call. `delay: None` means idle.
    pub fn take_scheduled(&mut self) -> Vec<Scheduled> {
        self.tasks.drain()
    }

    /// Resolve `paths` (expanding directories) and append the results.
    ///
    /// Returns how many tracks were added.
    pub fn add_files(&mut self, paths: &[std::path::PathBuf], ui: &mut dyn UiSink) -> usize {
        let files = library::expand_paths(paths, &self.library);
        if files.is_empty() {
            if !paths.is_empty() {
                ui.show_toast("No audio files found");
            }
            return 0;
        }

        let added = files.len();
        for path in files {
            let track = library::describe(&path);
            self.tracker.append(track, &self.prefs, &mut self.tasks, ui);
        }
        log::info!("added {added} file(s) to the playlist");
        if added > 1 {
            ui.show_toast(&format!("Added {added} songs to playlist"));
        }
        added
    }

    pub fn handle(&mut self, event: UiEvent, ui: &mut dyn UiSink) -> Result<()> {
        let coord = &mut self.coordinator;
        let tasks = &mut self.tasks;

        match event {
            UiEvent::AddFiles(paths) => {
                self.add_files(&paths, ui);
            }
            UiEvent::Activate(index) => self.tracker.activate(index, coord, tasks, ui)?,
            UiEvent::PlayPause => self.tracker.play_pressed(coord, tasks, ui)?,
            UiEvent::Stop => coord.stop(ui),
            UiEvent::Next => self.tracker.next(coord, tasks, ui)?,
            UiEvent::Previous => self.tracker.previous(coord, tasks, ui)?,
            UiEvent::SeekTo(secs) => {
                coord.seek(secs, ui)?;
            }
            UiEvent::SeekBy(delta) => {
                let target = coord.position_secs() + delta;
                coord.seek(target, ui)?;
            }
            UiEvent::SetVolume(v) => coord.set_volume(v, ui),
            UiEvent::VolumeStep(delta) => {
                let v = coord.volume() + delta;
                coord.set_volume(v, ui);
            }
            UiEvent::ToggleMute => coord.toggle_mute(ui),
            UiEvent::RemoveSelected => {
                let selected = self.tracker.playlist().selected();
                if !selected.is_empty() {
                    self.tracker.remove_set(&selected, coord, ui);
                }
            }
            UiEvent::RemoveIndices(indices) => {
                self.tracker.remove_set(&indices, coord, ui);
            }
            UiEvent::ToggleSelected(index) => self.tracker.playlist_mut().toggle_selected(index),
            UiEvent::SelectAll => self.tracker.playlist_mut().select_all_visible(),
            UiEvent::ClearSelection => self.tracker.playlist_mut().clear_selection(),
            UiEvent::SetSearch(query) => self.tracker.playlist_mut().set_query(&query),
            UiEvent::TogglePreference(pref) => {
                self.prefs.toggle(pref);
                let state = if self.prefs.get(pref) { "on" } else { "off" };
                log::info!("preference {} {state}", pref.key());
                ui.show_toast(&format!("{}: {state}", pref.title()));
            }
        }
        Ok(())
    }

    /// Route a backend notice. Notices about a source that has since been
    /// replaced are dropped.
    pub fn on_backend_event(&mut self, notice: SourceEvent, ui: &mut dyn UiSink) {
        let SourceEvent { serial, event } = notice;
        if !self.coordinator.is_current_source(serial) {
            log::debug!("dropping stale backend event {event:?} (source {serial})");
            return;
        }
        match event {
            BackendEvent::EndOfStream => {
                if let Err(e) =
                    self.tracker
                        .end_of_stream(&mut self.coordinator, &mut self.tasks, ui)
                {
                    log::warn!("could not advance after end of stream: {e}");
                }
            }
            BackendEvent::Error { message, debug } => {
                self.coordinator.on_error(&message, debug.as_deref(), ui)
            }
            BackendEvent::AsyncDone => self.coordinator.on_async_done(ui),
            BackendEvent::DurationChanged => self.coordinator.on_duration_changed(ui),
            BackendEvent::TagUpdated { title } => {
                self.coordinator.on_tags_updated(title.as_deref(), ui)
            }
        }
    }

    /// Run a queued task. Only duration polls ever ask to run again.
    pub fn run_task(&mut self, task: Task, ui: &mut dyn UiSink) -> TimerFlow {
        match task {
            Task::Activate(index) => {
                if let Err(e) =
                    self.tracker
                        .activate(index, &mut self.coordinator, &mut self.tasks, ui)
                {
                    log::warn!("deferred activation of {index} failed: {e}");
                }
                TimerFlow::Break
            }
            Task::PollDuration(poll) => self.coordinator.poll_duration(poll, ui),
        }
    }

    pub fn position_tick(&mut self, ui: &mut dyn UiSink) -> TimerFlow {
        self.coordinator.on_position_tick(ui)
    }
}
