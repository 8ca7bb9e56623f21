use std::fs::{self, OpenOptions};
use std::io;
use std::path::PathBuf;

use env_logger::{Builder, Env, Target};

use crate::config::{self, LoggingSettings};

/// Send log records to a file; the terminal belongs to the UI.
///
/// `RUST_LOG` wins over `logging.level`. Returns the file in use, or
/// `None` when no location could be determined (logging stays off).
pub fn init(settings: &LoggingSettings) -> io::Result<Option<PathBuf>> {
    let Some(path) = settings.file.clone().or_else(config::default_log_path) else {
        return Ok(None);
    };
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    Builder::from_env(Env::default().default_filter_or(settings.level.as_str()))
        .target(Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init()
        .map_err(io::Error::other)?;

    Ok(Some(path))
}
