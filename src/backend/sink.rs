//! Utilities for creating `rodio` sinks from files.
//!
//! The helper here encapsulates opening/decoding a file and preparing a
//! paused `Sink` at the requested start position.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink, Source};

use crate::error::PlayerError;

/// Create a paused `Sink` for `path` that starts playback at `start_at`.
///
/// Also returns the total duration when the decoder knows it up front.
pub(super) fn create_sink_at(
    handle: &OutputStream,
    path: &Path,
    start_at: Duration,
    volume: f32,
) -> Result<(Sink, Option<Duration>), PlayerError> {
    let file = File::open(path).map_err(|e| PlayerError::Playback {
        message: format!("Could not open {}", display_name(path)),
        debug: Some(e.to_string()),
    })?;

    let decoder = Decoder::new(BufReader::new(file)).map_err(|e| PlayerError::Playback {
        message: format!("Could not decode {}", display_name(path)),
        debug: Some(e.to_string()),
    })?;
    let total = decoder.total_duration();

    // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
    let source = decoder.skip_duration(start_at);

    let sink = Sink::connect_new(handle.mixer());
    sink.set_volume(volume);
    sink.append(source);
    sink.pause();
    Ok((sink, total))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
