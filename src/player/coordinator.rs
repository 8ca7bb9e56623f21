use std::path::PathBuf;

use crate::backend::{BackendState, MediaBackend, nanos_to_secs, secs_to_nanos};
use crate::error::{PlayerError, Result};
use crate::library::TrackRef;
use crate::tasks::{DurationPoll, TimerFlow};
use crate::ui::UiSink;

use super::format::{VolumeIcon, format_secs};
use super::model::{PlaybackState, TransportSnapshot};

/// Owns the backend handle and keeps the transport state consistent with it.
///
/// Every method runs to completion on the event loop. Backend commands are
/// fire-and-forget; results come back later through the `on_*` handlers.
pub struct Coordinator<B: MediaBackend> {
    backend: B,
    current_file: Option<PathBuf>,
    state: PlaybackState,

    volume: f64,
    muted: bool,
    volume_before_mute: f64,

    duration_secs: f64,
    position_secs: f64,
    duration_known: bool,

    /// Bumped on every load (and on errors) to retire outstanding duration polls.
    generation: u64,

    /// Cleared by a playback error until the next load.
    transport_enabled: bool,
    /// Set when no output device exists; nothing can ever play.
    unavailable: Option<String>,
}

impl<B: MediaBackend> Coordinator<B> {
    pub fn new(mut backend: B, initial_volume: f64) -> Self {
        let volume = initial_volume.clamp(0.0, 1.0);
        backend.set_volume(volume);
        Self {
            backend,
            current_file: None,
            state: PlaybackState::Stopped,
            volume,
            muted: false,
            volume_before_mute: volume,
            duration_secs: 0.0,
            position_secs: 0.0,
            duration_known: false,
            generation: 0,
            transport_enabled: true,
            unavailable: None,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    #[cfg(test)]
    pub fn current_file(&self) -> Option<&std::path::Path> {
        self.current_file.as_deref()
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    #[cfg(test)]
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn duration_secs(&self) -> f64 {
        self.duration_secs
    }

    pub fn position_secs(&self) -> f64 {
        self.position_secs
    }

    #[cfg(test)]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a backend notice tagged `serial` concerns the loaded source.
    pub fn is_current_source(&self, serial: u64) -> bool {
        self.backend.source_serial() == serial
    }

    pub fn transport_enabled(&self) -> bool {
        self.transport_enabled && self.unavailable.is_none()
    }

    /// `Err(BackendUnavailable)` when no output device exists.
    pub fn ensure_available(&self) -> Result<()> {
        match &self.unavailable {
            Some(reason) => Err(PlayerError::BackendUnavailable(reason.clone())),
            None => Ok(()),
        }
    }

    pub fn snapshot(&self, current_index: Option<usize>) -> TransportSnapshot {
        TransportSnapshot {
            current_index,
            state: self.state,
            volume: self.volume,
            muted: self.muted,
            volume_before_mute: self.volume_before_mute,
            duration_secs: self.duration_secs,
            position_secs: self.position_secs,
        }
    }

    fn effective_volume(&self) -> f64 {
        if self.muted { 0.0 } else { self.volume }
    }

    fn refresh_mute_icon(&self, ui: &mut dyn UiSink) {
        ui.set_mute_icon(VolumeIcon::for_volume(self.volume, self.muted));
    }

    /// Push the whole transport to a freshly created view.
    pub fn sync_ui(&self, ui: &mut dyn UiSink) {
        ui.set_play_icon(self.state == PlaybackState::Playing);
        ui.set_position_label(&format_secs(self.position_secs));
        ui.set_duration_label(&format_secs(self.duration_secs));
        ui.set_slider_range(0.0, self.duration_secs);
        ui.set_slider_value(self.position_secs);
        ui.set_volume_slider(self.effective_volume());
        self.refresh_mute_icon(ui);
        ui.set_transport_enabled(self.transport_enabled());
    }

    /// Record that no output device exists and disable the transport for good.
    pub fn mark_unavailable(&mut self, reason: String, ui: &mut dyn UiSink) {
        log::error!("audio backend unavailable: {reason}");
        ui.set_status(Some(&format!("No audio output: {reason}")));
        ui.set_transport_enabled(false);
        self.unavailable = Some(reason);
    }

    /// Flush whatever is loaded, load `track` and start playing it from zero.
    ///
    /// Returns the duration poll the caller must schedule.
    pub fn load_and_play(&mut self, track: &TrackRef, ui: &mut dyn UiSink) -> DurationPoll {
        self.backend.set_state(BackendState::Stopped);
        self.backend.set_source(&track.uri());
        self.current_file = Some(track.path().to_path_buf());

        self.position_secs = 0.0;
        self.duration_secs = 0.0;
        self.duration_known = false;
        ui.set_position_label("00:00");
        ui.set_duration_label("00:00");
        ui.set_slider_range(0.0, 0.0);
        ui.set_slider_value(0.0);

        self.backend.set_volume(self.effective_volume());
        self.generation += 1;

        self.backend.set_state(BackendState::Playing);
        self.state = PlaybackState::Playing;
        ui.set_play_icon(true);

        if !self.transport_enabled {
            self.transport_enabled = true;
            ui.set_transport_enabled(true);
            ui.set_status(None);
        }

        log::info!("playing {}", track.path().display());
        DurationPoll {
            generation: self.generation,
        }
    }

    /// Pause when playing, otherwise play. Ignored while the transport is disabled.
    pub fn toggle_playback(&mut self, ui: &mut dyn UiSink) {
        if !self.transport_enabled() {
            log::debug!("toggle ignored: transport disabled");
            return;
        }
        if self.state == PlaybackState::Playing {
            self.backend.set_state(BackendState::Paused);
            self.state = PlaybackState::Paused;
            ui.set_play_icon(false);
        } else {
            self.backend.set_state(BackendState::Playing);
            self.state = PlaybackState::Playing;
            ui.set_play_icon(true);
        }
    }

    /// Full reset, not a pause.
    pub fn stop(&mut self, ui: &mut dyn UiSink) {
        self.backend.set_state(BackendState::Stopped);
        self.state = PlaybackState::Stopped;
        self.position_secs = 0.0;
        ui.set_play_icon(false);
        ui.set_slider_value(0.0);
        ui.set_position_label("00:00");
    }

    pub fn set_volume(&mut self, volume: f64, ui: &mut dyn UiSink) {
        self.volume = volume.clamp(0.0, 1.0);
        if !self.muted {
            self.backend.set_volume(self.volume);
            ui.set_volume_slider(self.volume);
        }
        self.refresh_mute_icon(ui);
    }

    pub fn toggle_mute(&mut self, ui: &mut dyn UiSink) {
        if self.muted {
            self.muted = false;
            self.volume = self.volume_before_mute;
            self.backend.set_volume(self.volume_before_mute);
            ui.set_volume_slider(self.volume_before_mute);
        } else {
            self.volume_before_mute = self.volume;
            self.backend.set_volume(0.0);
            ui.set_volume_slider(0.0);
            self.muted = true;
        }
        self.refresh_mute_icon(ui);
    }

    /// Seek to `target_secs`, clamped into `[0, duration]`.
    ///
    /// Returns the applied position, or `SeekRejected` while stopped or
    /// before the duration is known.
    pub fn seek(&mut self, target_secs: f64, ui: &mut dyn UiSink) -> Result<f64> {
        if self.state == PlaybackState::Stopped || self.duration_secs <= 0.0 {
            log::debug!("seek to {target_secs:.1}s rejected");
            return Err(PlayerError::SeekRejected);
        }

        let target = if target_secs.is_nan() { 0.0 } else { target_secs };
        let pos = target.clamp(0.0, self.duration_secs);
        self.position_secs = pos;
        ui.set_position_label(&format_secs(pos));
        ui.set_slider_value(pos);
        self.backend.seek(true, secs_to_nanos(pos));
        Ok(pos)
    }

    /// Duration poll issued by [`Coordinator::load_and_play`].
    ///
    /// A poll from an older load is dropped without touching state.
    pub fn poll_duration(&mut self, poll: DurationPoll, ui: &mut dyn UiSink) -> TimerFlow {
        if poll.generation != self.generation {
            log::debug!(
                "dropping stale duration poll (generation {} != {})",
                poll.generation,
                self.generation
            );
            return TimerFlow::Break;
        }
        if self.duration_known {
            return TimerFlow::Break;
        }
        match self.backend.query_duration() {
            Some(ns) if ns > 0 => {
                self.on_duration_known(nanos_to_secs(ns), ui);
                TimerFlow::Break
            }
            _ => TimerFlow::Continue,
        }
    }

    pub fn on_duration_known(&mut self, duration_secs: f64, ui: &mut dyn UiSink) {
        self.duration_secs = duration_secs.max(0.0);
        self.duration_known = true;
        if self.position_secs > self.duration_secs {
            self.position_secs = self.duration_secs;
        }
        ui.set_slider_range(0.0, self.duration_secs);
        ui.set_duration_label(&format_secs(self.duration_secs));
    }

    /// Re-read the duration of the current source.
    pub fn on_duration_changed(&mut self, ui: &mut dyn UiSink) {
        if self.current_file.is_none() {
            return;
        }
        if let Some(ns) = self.backend.query_duration().filter(|&ns| ns > 0) {
            let secs = nanos_to_secs(ns);
            if !self.duration_known || secs != self.duration_secs {
                self.on_duration_known(secs, ui);
            }
        }
    }

    /// A state change or seek completed; the duration may be readable now.
    pub fn on_async_done(&mut self, ui: &mut dyn UiSink) {
        self.on_duration_changed(ui);
    }

    /// Position refresh; always asks to be rescheduled.
    pub fn on_position_tick(&mut self, ui: &mut dyn UiSink) -> TimerFlow {
        if self.state != PlaybackState::Playing {
            return TimerFlow::Continue;
        }
        let Some(ns) = self.backend.query_position() else {
            return TimerFlow::Continue;
        };

        let mut pos = nanos_to_secs(ns);
        if self.duration_known {
            pos = pos.min(self.duration_secs);
        }
        self.position_secs = pos;
        ui.set_position_label(&format_secs(pos));
        if self.duration_secs > 0.0 {
            ui.set_slider_value(pos);
        }
        TimerFlow::Continue
    }

    pub fn on_end_of_stream(&mut self, ui: &mut dyn UiSink) {
        self.stop(ui);
    }

    /// Stop, surface `message` and keep play disabled until the next load.
    pub fn on_error(&mut self, message: &str, debug: Option<&str>, ui: &mut dyn UiSink) {
        log::error!(
            "playback error: {message} ({})",
            debug.unwrap_or("no detail")
        );
        self.backend.set_state(BackendState::Stopped);
        self.state = PlaybackState::Stopped;
        self.position_secs = 0.0;
        self.generation += 1;
        self.transport_enabled = false;

        ui.set_play_icon(false);
        ui.set_slider_value(0.0);
        ui.set_position_label("00:00");
        ui.set_transport_enabled(false);
        ui.set_status(Some(message));
        ui.show_toast(message);
    }

    pub fn on_tags_updated(&mut self, title: Option<&str>, ui: &mut dyn UiSink) {
        if let Some(t) = title.map(str::trim).filter(|t| !t.is_empty()) {
            ui.set_title(t);
        }
    }
}
