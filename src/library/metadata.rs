use std::path::Path;
use std::time::Duration;

use lofty::prelude::{Accessor, AudioFile, TaggedFileExt};

use crate::error::{PlayerError, Result};

use super::model::{TrackRef, UNKNOWN_ARTIST};

/// Tags read from a file. Missing fields stay `None`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Tags {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub duration: Option<Duration>,
}

fn non_empty(v: Option<std::borrow::Cow<'_, str>>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Read title, artist and duration from `path`.
pub fn read_tags(path: &Path) -> Result<Tags> {
    let tagged = lofty::read_from_path(path).map_err(|e| PlayerError::MetadataUnreadable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let mut tags = Tags {
        duration: Some(tagged.properties().duration()).filter(|d| !d.is_zero()),
        ..Tags::default()
    };

    if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
        tags.title = non_empty(tag.title());
        tags.artist = non_empty(tag.artist());
    }

    Ok(tags)
}

/// Best-effort `(title, artist)` for `path`.
///
/// Falls back to the file stem and [`UNKNOWN_ARTIST`] for whichever tag is
/// missing. Fails only when the file cannot be parsed at all.
pub fn resolve(path: &Path) -> Result<(String, String)> {
    let tags = read_tags(path)?;
    Ok((
        tags.title.unwrap_or_else(|| file_stem(path)),
        tags.artist.unwrap_or_else(|| UNKNOWN_ARTIST.to_string()),
    ))
}

/// Build a [`TrackRef`] for `path`, never failing.
pub fn describe(path: &Path) -> TrackRef {
    let (title, artist) = match resolve(path) {
        Ok(v) => v,
        Err(e) => {
            log::debug!("{e}; using file name");
            (file_stem(path), UNKNOWN_ARTIST.to_string())
        }
    };
    TrackRef::new(path, title, artist)
}

pub(crate) fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("UNKNOWN")
        .to_string()
}
