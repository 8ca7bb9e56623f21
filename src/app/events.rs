use std::path::PathBuf;

use crate::config::Preference;

/// User intents produced by the shell's key handling.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// Files or directories to resolve and append, in order.
    AddFiles(Vec<PathBuf>),
    /// Row activation (Enter / double click).
    Activate(usize),
    PlayPause,
    Stop,
    Next,
    Previous,
    /// Absolute seek in seconds.
    SeekTo(f64),
    /// Relative seek in seconds; negative scrubs back.
    SeekBy(f64),
    SetVolume(f64),
    VolumeStep(f64),
    ToggleMute,
    /// Delete every selected row.
    RemoveSelected,
    RemoveIndices(Vec<usize>),
    ToggleSelected(usize),
    SelectAll,
    ClearSelection,
    SetSearch(String),
    TogglePreference(Preference),
}
