use std::path::PathBuf;
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crate::error::PlayerError;

use super::thread::spawn_audio_thread;
use super::types::{BackendState, MediaBackend, SourceEvent, duration_to_nanos};

#[derive(Debug)]
pub(super) enum AudioCmd {
    /// Replace the current source. `serial` matches `PlaybackInfo::serial`.
    Load { path: PathBuf, serial: u64 },
    SetState(BackendState),
    SetVolume(f32),
    /// Flushing seek to an absolute position.
    Seek(Duration),
    Quit,
}

/// Playback status published by the audio thread and read by queries.
#[derive(Debug, Clone, Default)]
pub struct PlaybackInfo {
    /// Bumped by every `set_source`; the audio thread only publishes while
    /// its loaded source carries the latest serial.
    pub serial: u64,
    pub state: BackendState,
    pub source: Option<PathBuf>,
    pub duration: Option<Duration>,
    /// Position accumulated up to the last pause or seek.
    pub accumulated: Duration,
    /// When playback last resumed; `None` while not playing.
    pub started_at: Option<Instant>,
}

impl PlaybackInfo {
    pub fn position(&self) -> Duration {
        self.accumulated + self.started_at.map_or(Duration::ZERO, |st| st.elapsed())
    }
}

pub type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;

/// `rodio` implementation of [`MediaBackend`], driven by an audio thread.
pub struct RodioBackend {
    tx: Sender<AudioCmd>,
    playback: PlaybackHandle,
    join: Option<JoinHandle<()>>,
}

impl RodioBackend {
    /// Open the default output device and start the audio thread.
    ///
    /// Notifications are posted to `events`.
    pub fn spawn(events: Sender<SourceEvent>) -> Result<Self, PlayerError> {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let playback: PlaybackHandle = Arc::new(Mutex::new(PlaybackInfo::default()));
        let join = spawn_audio_thread(rx, playback.clone(), events)?;

        Ok(Self {
            tx,
            playback,
            join: Some(join),
        })
    }

    fn send(&self, cmd: AudioCmd) {
        if self.tx.send(cmd).is_err() {
            log::warn!("audio thread is gone; command dropped");
        }
    }
}

fn uri_to_path(uri: &str) -> PathBuf {
    PathBuf::from(uri.strip_prefix("file://").unwrap_or(uri))
}

impl MediaBackend for RodioBackend {
    fn set_source(&mut self, uri: &str) {
        let path = uri_to_path(uri);
        // Forget the old source right away so queries never report it
        // for the new one.
        let serial = match self.playback.lock() {
            Ok(mut info) => {
                info.serial += 1;
                info.source = Some(path.clone());
                info.duration = None;
                info.accumulated = Duration::ZERO;
                info.started_at = None;
                info.serial
            }
            Err(_) => return,
        };
        self.send(AudioCmd::Load { path, serial });
    }

    fn source_serial(&self) -> u64 {
        self.playback
            .lock()
            .map(|info| info.serial)
            .unwrap_or_default()
    }

    fn set_state(&mut self, state: BackendState) {
        if let Ok(mut info) = self.playback.lock() {
            info.state = state;
        }
        self.send(AudioCmd::SetState(state));
    }

    fn state(&self) -> BackendState {
        self.playback
            .lock()
            .map(|info| info.state)
            .unwrap_or_default()
    }

    fn set_volume(&mut self, volume: f64) {
        self.send(AudioCmd::SetVolume(volume.clamp(0.0, 1.0) as f32));
    }

    fn query_duration(&self) -> Option<u64> {
        let info = self.playback.lock().ok()?;
        info.duration.map(duration_to_nanos)
    }

    fn query_position(&self) -> Option<u64> {
        let info = self.playback.lock().ok()?;
        info.source.as_ref()?;
        Some(duration_to_nanos(info.position()))
    }

    fn seek(&mut self, _flushing: bool, position_ns: u64) {
        // Seeks rebuild the sink, so they are always flushing.
        let to = Duration::from_nanos(position_ns);
        if let Ok(mut info) = self.playback.lock() {
            info.accumulated = to;
            if info.started_at.is_some() {
                info.started_at = Some(Instant::now());
            }
        }
        self.send(AudioCmd::Seek(to));
    }
}

impl Drop for RodioBackend {
    fn drop(&mut self) {
        self.send(AudioCmd::Quit);
        if let Some(h) = self.join.take() {
            let _ = h.join();
        }
    }
}
