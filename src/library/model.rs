use std::path::{Path, PathBuf};

/// Artist shown when a file carries no artist tag.
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// An immutable playlist entry: where the file lives and what to call it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackRef {
    path: PathBuf,
    title: String,
    artist: String,
}

impl TrackRef {
    pub fn new(path: impl Into<PathBuf>, title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            title: title.into(),
            artist: artist.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn artist(&self) -> &str {
        &self.artist
    }

    /// The `file://` URI handed to the media backend.
    pub fn uri(&self) -> String {
        format!("file://{}", self.path.display())
    }

    /// Case-insensitive substring match against title or artist.
    pub fn matches(&self, query_lower: &str) -> bool {
        query_lower.is_empty()
            || self.title.to_lowercase().contains(query_lower)
            || self.artist.to_lowercase().contains(query_lower)
    }
}
