use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::player::VolumeIcon;

use super::sink::UiSink;

pub const NO_SONG_TITLE: &str = "No song playing";
pub const NO_SONG_ARTIST: &str = "Select a song to play";

const TOAST_HISTORY: usize = 8;

/// Everything the player core has asked the screen to show.
#[derive(Debug, Clone)]
pub struct View {
    pub position_label: String,
    pub duration_label: String,
    pub slider_min: f64,
    pub slider_max: f64,
    pub slider_value: f64,
    pub playing: bool,
    pub title: String,
    pub artist: String,
    pub mute_icon: VolumeIcon,
    pub volume: f64,
    pub status: Option<String>,
    pub transport_enabled: bool,
    toasts: VecDeque<(String, Instant)>,
}

/// Placeholder labels at full volume. `AppSession::new_view` syncs one to
/// the actual transport.
impl Default for View {
    fn default() -> Self {
        Self {
            position_label: "00:00".to_string(),
            duration_label: "00:00".to_string(),
            slider_min: 0.0,
            slider_max: 0.0,
            slider_value: 0.0,
            playing: false,
            title: NO_SONG_TITLE.to_string(),
            artist: NO_SONG_ARTIST.to_string(),
            mute_icon: VolumeIcon::High,
            volume: 1.0,
            status: None,
            transport_enabled: true,
            toasts: VecDeque::new(),
        }
    }
}

impl View {
    /// Most recent toast, if it is younger than `ttl`.
    pub fn current_toast(&self, ttl: Duration) -> Option<&str> {
        self.toasts
            .back()
            .filter(|(_, at)| at.elapsed() < ttl)
            .map(|(t, _)| t.as_str())
    }

    /// All toasts still queued, oldest first.
    #[cfg(test)]
    pub fn toasts(&self) -> impl Iterator<Item = &str> {
        self.toasts.iter().map(|(t, _)| t.as_str())
    }

    /// Fraction of the progress bar to fill.
    pub fn progress_ratio(&self) -> f64 {
        let span = self.slider_max - self.slider_min;
        if span <= 0.0 {
            0.0
        } else {
            ((self.slider_value - self.slider_min) / span).clamp(0.0, 1.0)
        }
    }

    /// Seconds left according to the slider, once a range is known.
    pub fn remaining_secs(&self) -> Option<f64> {
        (self.slider_max > 0.0).then(|| (self.slider_max - self.slider_value).max(0.0))
    }
}

impl UiSink for View {
    fn set_position_label(&mut self, text: &str) {
        self.position_label = text.to_string();
    }

    fn set_duration_label(&mut self, text: &str) {
        self.duration_label = text.to_string();
    }

    fn set_slider_range(&mut self, min: f64, max: f64) {
        self.slider_min = min;
        self.slider_max = max;
    }

    fn set_slider_value(&mut self, value: f64) {
        self.slider_value = value;
    }

    fn set_play_icon(&mut self, playing: bool) {
        self.playing = playing;
    }

    fn set_now_playing(&mut self, title: &str, artist: &str) {
        self.title = title.to_string();
        self.artist = artist.to_string();
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn show_toast(&mut self, text: &str) {
        self.toasts.push_back((text.to_string(), Instant::now()));
        while self.toasts.len() > TOAST_HISTORY {
            self.toasts.pop_front();
        }
    }

    fn set_mute_icon(&mut self, icon: VolumeIcon) {
        self.mute_icon = icon;
    }

    fn set_volume_slider(&mut self, volume: f64) {
        self.volume = volume;
    }

    fn set_status(&mut self, text: Option<&str>) {
        self.status = text.map(str::to_string);
    }

    fn set_transport_enabled(&mut self, enabled: bool) {
        self.transport_enabled = enabled;
    }
}
