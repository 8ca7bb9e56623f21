use std::path::PathBuf;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rodio::{OutputStream, OutputStreamBuilder, Sink};

use crate::error::PlayerError;
use crate::library;

use super::sink::create_sink_at;
use super::player::{AudioCmd, PlaybackHandle, PlaybackInfo};
use super::types::{BackendEvent, BackendState, SourceEvent};

/// Everything the audio thread owns besides the output stream.
struct Engine {
    info: PlaybackHandle,
    events: Sender<SourceEvent>,
    /// Serial of the source this thread has loaded (see `PlaybackInfo::serial`).
    serial: u64,
    path: Option<PathBuf>,
    sink: Option<Sink>,
    state: BackendState,
    volume: f32,
    started_at: Option<Instant>,
    accumulated: Duration,
    eos_sent: bool,
}

impl Engine {
    /// Post `event` tagged with the serial of the source we have loaded.
    fn emit(&self, event: BackendEvent) {
        let _ = self.events.send(SourceEvent {
            serial: self.serial,
            event,
        });
    }

    /// Publish our view of playback unless a newer source is already queued.
    fn publish(&self, f: impl FnOnce(&mut PlaybackInfo)) {
        if let Ok(mut info) = self.info.lock() {
            if info.serial == self.serial {
                f(&mut info);
            }
        }
    }

    fn is_current(&self) -> bool {
        self.info
            .lock()
            .map(|info| info.serial == self.serial)
            .unwrap_or(false)
    }

    fn elapsed(&self) -> Duration {
        self.accumulated + self.started_at.map_or(Duration::ZERO, |st| st.elapsed())
    }

    fn drop_sink(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
    }

    fn fail(&mut self, err: PlayerError) {
        self.drop_sink();
        self.state = BackendState::Stopped;
        self.started_at = None;
        self.accumulated = Duration::ZERO;
        self.publish(|info| {
            info.state = BackendState::Stopped;
            info.started_at = None;
            info.accumulated = Duration::ZERO;
        });
        if !self.is_current() {
            log::debug!("dropping error for replaced source: {err}");
            return;
        }
        match err {
            PlayerError::Playback { message, debug } => {
                self.emit(BackendEvent::Error { message, debug })
            }
            other => self.emit(BackendEvent::Error {
                message: other.to_string(),
                debug: None,
            }),
        }
    }

    /// Build a paused sink for the loaded path at `start_at`.
    fn open_at(&mut self, stream: &OutputStream, start_at: Duration) -> bool {
        let Some(path) = self.path.clone() else {
            return false;
        };
        self.drop_sink();
        match create_sink_at(stream, &path, start_at, self.volume) {
            Ok((sink, total)) => {
                self.sink = Some(sink);
                if let Some(total) = total {
                    self.publish(|info| info.duration = Some(total));
                }
                true
            }
            Err(e) => {
                self.fail(e);
                false
            }
        }
    }

    fn load(&mut self, stream: &OutputStream, path: PathBuf, serial: u64) {
        self.drop_sink();
        self.serial = serial;
        self.path = Some(path.clone());
        self.state = BackendState::Stopped;
        self.started_at = None;
        self.accumulated = Duration::ZERO;
        self.eos_sent = false;

        if !self.open_at(stream, Duration::ZERO) {
            return;
        }

        // The decoder does not always know the length; ask the tags.
        let tags = library::read_tags(&path).unwrap_or_default();
        let mut known = false;
        self.publish(|info| {
            if info.duration.is_none() {
                info.duration = tags.duration;
            }
            known = info.duration.is_some();
        });
        if !self.is_current() {
            return;
        }
        if known {
            self.emit(BackendEvent::DurationChanged);
        }
        self.emit(BackendEvent::TagUpdated { title: tags.title });
    }

    fn set_state(&mut self, stream: &OutputStream, target: BackendState) {
        match target {
            BackendState::Playing => {
                if self.sink.is_none() && !self.open_at(stream, Duration::ZERO) {
                    return;
                }
                if let Some(s) = self.sink.as_ref() {
                    s.play();
                }
                if self.state != BackendState::Playing {
                    self.started_at = Some(Instant::now());
                }
            }
            BackendState::Paused => {
                if let Some(s) = self.sink.as_ref() {
                    s.pause();
                }
                if let Some(st) = self.started_at.take() {
                    self.accumulated += st.elapsed();
                }
            }
            BackendState::Stopped => {
                self.drop_sink();
                self.started_at = None;
                self.accumulated = Duration::ZERO;
                self.eos_sent = false;
            }
        }

        self.state = target;
        let (started_at, accumulated) = (self.started_at, self.accumulated);
        self.publish(|info| {
            info.state = target;
            info.started_at = started_at;
            info.accumulated = accumulated;
        });
        self.emit(BackendEvent::AsyncDone);
    }

    fn seek(&mut self, stream: &OutputStream, to: Duration) {
        if self.state == BackendState::Stopped {
            return;
        }
        // Rebuild the sink and skip into the file.
        if !self.open_at(stream, to) {
            return;
        }
        self.accumulated = to;
        self.eos_sent = false;
        if self.state == BackendState::Playing {
            if let Some(s) = self.sink.as_ref() {
                s.play();
            }
            self.started_at = Some(Instant::now());
        } else {
            self.started_at = None;
        }
        let (started_at, accumulated) = (self.started_at, self.accumulated);
        self.publish(|info| {
            info.started_at = started_at;
            info.accumulated = accumulated;
        });
        self.emit(BackendEvent::AsyncDone);
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        if let Some(s) = self.sink.as_ref() {
            s.set_volume(volume);
        }
    }

    /// Periodic check for the end of the current source.
    fn tick(&mut self) {
        if self.state != BackendState::Playing || self.eos_sent {
            return;
        }
        let finished = self.sink.as_ref().map(Sink::empty).unwrap_or(false);
        if finished && self.is_current() {
            self.eos_sent = true;
            let elapsed = self.elapsed();
            self.publish(|info| {
                info.started_at = None;
                info.accumulated = info.duration.unwrap_or(elapsed);
            });
            self.emit(BackendEvent::EndOfStream);
        }
    }
}

/// Spawn the thread that owns the output stream.
///
/// Blocks until the output device has been opened (or failed to open) so
/// the caller can report `BackendUnavailable` at startup.
pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    info: PlaybackHandle,
    events: Sender<SourceEvent>,
) -> Result<JoinHandle<()>, PlayerError> {
    let (ready_tx, ready_rx) = std::sync::mpsc::channel::<Result<(), String>>();

    let handle = thread::Builder::new()
        .name("oscillate-audio".into())
        .spawn(move || {
            let mut stream = match OutputStreamBuilder::open_default_stream() {
                Ok(s) => {
                    let _ = ready_tx.send(Ok(()));
                    s
                }
                Err(e) => {
                    let _ = ready_tx.send(Err(e.to_string()));
                    return;
                }
            };
            // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
            // but noisy for a TUI app.
            stream.log_on_drop(false);

            let mut engine = Engine {
                info,
                events,
                serial: 0,
                path: None,
                sink: None,
                state: BackendState::Stopped,
                volume: 1.0,
                started_at: None,
                accumulated: Duration::ZERO,
                eos_sent: false,
            };

            loop {
                match rx.recv_timeout(Duration::from_millis(50)) {
                    Ok(AudioCmd::Load { path, serial }) => engine.load(&stream, path, serial),
                    Ok(AudioCmd::SetState(s)) => engine.set_state(&stream, s),
                    Ok(AudioCmd::SetVolume(v)) => engine.set_volume(v),
                    Ok(AudioCmd::Seek(to)) => engine.seek(&stream, to),
                    Ok(AudioCmd::Quit) => {
                        engine.drop_sink();
                        break;
                    }
                    Err(RecvTimeoutError::Timeout) => engine.tick(),
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
        })?;

    match ready_rx.recv() {
        Ok(Ok(())) => Ok(handle),
        Ok(Err(msg)) => {
            let _ = handle.join();
            Err(PlayerError::BackendUnavailable(msg))
        }
        Err(_) => {
            let _ = handle.join();
            Err(PlayerError::BackendUnavailable(
                "audio thread exited during startup".to_string(),
            ))
        }
    }
}
