use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/oscillate/config.toml` or `~/.config/oscillate/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `OSCILLATE__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub playback: PlaybackSettings,
    pub ui: UiSettings,
    pub controls: ControlsSettings,
    pub library: LibrarySettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Start playing automatically when songs are added to an empty playlist.
    pub autoplay: bool,
    /// Resume from the last position when reopening songs.
    pub remember_position: bool,
    /// Remove silence between tracks.
    pub gapless_playback: bool,
    /// Volume applied at startup, in `0.0..=1.0`.
    pub initial_volume: f64,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            autoplay: true,
            remember_position: false,
            gapless_playback: false,
            initial_volume: 1.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
    /// Display album artwork when available.
    pub show_album_art: bool,
    /// Show the remaining time instead of the total duration.
    pub show_time_remaining: bool,
    /// How long toasts stay on screen.
    pub toast_seconds: u64,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ oscillate ~ ".to_string(),
            show_album_art: true,
            show_time_remaining: false,
            toast_seconds: 3,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Number of seconds to scrub when pressing `H` / `L`.
    pub scrub_seconds: u64,
    /// Volume change per `Up` / `Down` press.
    pub volume_step: f64,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            scrub_seconds: 5,
            volume_step: 0.05,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks when expanding directories.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: vec!["mp3".into(), "flac".into(), "wav".into(), "ogg".into()],
            follow_links: true,
            include_hidden: false,
            recursive: true,
            max_depth: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter when `RUST_LOG` is not set.
    pub level: String,
    /// Log file. Defaults to `$XDG_STATE_HOME/oscillate/oscillate.log`.
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

/// The five user-facing preference switches.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Preference {
    Autoplay,
    RememberPosition,
    GaplessPlayback,
    ShowAlbumArt,
    ShowTimeRemaining,
}

impl Preference {
    pub const ALL: [Preference; 5] = [
        Preference::Autoplay,
        Preference::RememberPosition,
        Preference::GaplessPlayback,
        Preference::ShowAlbumArt,
        Preference::ShowTimeRemaining,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Preference::Autoplay => "autoplay",
            Preference::RememberPosition => "remember-position",
            Preference::GaplessPlayback => "gapless-playback",
            Preference::ShowAlbumArt => "show-album-art",
            Preference::ShowTimeRemaining => "show-time-remaining",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Preference::Autoplay => "Auto-play",
            Preference::RememberPosition => "Remember Position",
            Preference::GaplessPlayback => "Gapless Playback",
            Preference::ShowAlbumArt => "Show Album Art",
            Preference::ShowTimeRemaining => "Show Time Remaining",
        }
    }
}

/// Read access to the preference switches.
pub trait SettingsProvider {
    fn autoplay(&self) -> bool;
    fn remember_position(&self) -> bool;
    fn gapless_playback(&self) -> bool;
    fn show_album_art(&self) -> bool;
    fn show_time_remaining(&self) -> bool;

    fn get(&self, pref: Preference) -> bool {
        match pref {
            Preference::Autoplay => self.autoplay(),
            Preference::RememberPosition => self.remember_position(),
            Preference::GaplessPlayback => self.gapless_playback(),
            Preference::ShowAlbumArt => self.show_album_art(),
            Preference::ShowTimeRemaining => self.show_time_remaining(),
        }
    }
}

/// Live, in-memory copy of the preference switches.
///
/// Seeded from [`Settings`] at startup; toggles are never written back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preferences {
    pub autoplay: bool,
    pub remember_position: bool,
    pub gapless_playback: bool,
    pub show_album_art: bool,
    pub show_time_remaining: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl Preferences {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            autoplay: settings.playback.autoplay,
            remember_position: settings.playback.remember_position,
            gapless_playback: settings.playback.gapless_playback,
            show_album_art: settings.ui.show_album_art,
            show_time_remaining: settings.ui.show_time_remaining,
        }
    }

    pub fn toggle(&mut self, pref: Preference) {
        let flag = match pref {
            Preference::Autoplay => &mut self.autoplay,
            Preference::RememberPosition => &mut self.remember_position,
            Preference::GaplessPlayback => &mut self.gapless_playback,
            Preference::ShowAlbumArt => &mut self.show_album_art,
            Preference::ShowTimeRemaining => &mut self.show_time_remaining,
        };
        *flag = !*flag;
    }
}

impl SettingsProvider for Preferences {
    fn autoplay(&self) -> bool {
        self.autoplay
    }
    fn remember_position(&self) -> bool {
        self.remember_position
    }
    fn gapless_playback(&self) -> bool {
        self.gapless_playback
    }
    fn show_album_art(&self) -> bool {
        self.show_album_art
    }
    fn show_time_remaining(&self) -> bool {
        self.show_time_remaining
    }
}
