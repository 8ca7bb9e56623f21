use super::load::{default_config_path, default_log_path, resolve_config_path};
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|e| e.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_oscillate_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("OSCILLATE_CONFIG_PATH", "/tmp/oscillate-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/oscillate-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("oscillate")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("oscillate")
            .join("config.toml")
    );
}

#[test]
fn default_log_path_uses_xdg_state_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_STATE_HOME", "/tmp/xdg-state");

    assert_eq!(
        default_log_path().unwrap(),
        std::path::PathBuf::from("/tmp/xdg-state")
            .join("oscillate")
            .join("oscillate.log")
    );
}

#[test]
fn settings_load_from_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[playback]
autoplay = false
gapless_playback = true
initial_volume = 0.4

[ui]
header_text = "hello"
show_time_remaining = true
toast_seconds = 5

[controls]
scrub_seconds = 9
volume_step = 0.1

[library]
extensions = ["mp3"]
recursive = false
include_hidden = true
follow_links = false

[logging]
level = "debug"
file = "/tmp/oscillate.log"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("OSCILLATE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("OSCILLATE__PLAYBACK__AUTOPLAY");

    let s = Settings::load().unwrap();
    assert!(!s.playback.autoplay);
    assert!(s.playback.gapless_playback);
    assert!(!s.playback.remember_position);
    assert_eq!(s.playback.initial_volume, 0.4);
    assert_eq!(s.ui.header_text, "hello");
    assert!(s.ui.show_time_remaining);
    assert!(s.ui.show_album_art);
    assert_eq!(s.ui.toast_seconds, 5);
    assert_eq!(s.controls.scrub_seconds, 9);
    assert_eq!(s.controls.volume_step, 0.1);
    assert_eq!(s.library.extensions, vec!["mp3".to_string()]);
    assert!(!s.library.recursive);
    assert!(s.library.include_hidden);
    assert!(!s.library.follow_links);
    assert_eq!(s.logging.level, "debug");
    assert_eq!(
        s.logging.file.as_deref(),
        Some(std::path::Path::new("/tmp/oscillate.log"))
    );
    assert!(s.validate().is_ok());
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[playback]
autoplay = true
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("OSCILLATE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("OSCILLATE__PLAYBACK__AUTOPLAY", "false");

    let s = Settings::load().unwrap();
    assert!(!s.playback.autoplay);
}

#[test]
fn validate_rejects_out_of_range_values() {
    let mut s = Settings::default();
    assert!(s.validate().is_ok());

    s.playback.initial_volume = 1.5;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.controls.volume_step = 0.0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.ui.toast_seconds = 0;
    assert!(s.validate().is_err());
}

#[test]
fn preferences_seed_from_settings_and_toggle_in_memory() {
    let mut s = Settings::default();
    s.playback.autoplay = false;
    s.ui.show_time_remaining = true;

    let mut prefs = Preferences::from_settings(&s);
    assert!(!prefs.autoplay());
    assert!(prefs.show_time_remaining());

    prefs.toggle(Preference::Autoplay);
    assert!(prefs.get(Preference::Autoplay));
    assert!(!s.playback.autoplay);

    prefs.toggle(Preference::GaplessPlayback);
    prefs.toggle(Preference::GaplessPlayback);
    assert!(!prefs.gapless_playback());
}

#[test]
fn preference_keys_match_settings_schema_names() {
    let keys: Vec<&str> = Preference::ALL.iter().map(|p| p.key()).collect();
    assert_eq!(
        keys,
        vec![
            "autoplay",
            "remember-position",
            "gapless-playback",
            "show-album-art",
            "show-time-remaining"
        ]
    );
}
