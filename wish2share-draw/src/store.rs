use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Write as _};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::StoreError;
use crate::event::Event;

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> StoreError + '_ {
    move |source| StoreError::Io {
        path: path.to_owned(),
        source,
    }
}

pub fn load_event(path: &Path) -> Result<Event, StoreError> {
    let file = File::open(path).map_err(io_error(path))?;
    let event = serde_json::from_reader(BufReader::new(file)).map_err(|source| {
        StoreError::Json {
            path: path.to_owned(),
            source,
        }
    })?;
    debug!(path = %path.display(), "event loaded");
    Ok(event)
}

/// Writes the event next to `path` and renames it into place, so readers never
/// see a partially written file.
pub fn save_event(path: &Path, event: &Event) -> Result<(), StoreError> {
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let temporary = NamedTempFile::new_in(directory).map_err(io_error(path))?;
    {
        let mut writer = BufWriter::new(temporary.as_file());
        serde_json::to_writer_pretty(&mut writer, event).map_err(|source| StoreError::Json {
            path: path.to_owned(),
            source,
        })?;
        writer.write_all(b"\n").map_err(io_error(path))?;
        writer.flush().map_err(io_error(path))?;
    }
    temporary
        .as_file()
        .sync_all()
        .map_err(io_error(path))?;
    temporary
        .persist(path)
        .map_err(|error| io_error(path)(error.error))?;
    debug!(path = %path.display(), "event saved");
    Ok(())
}

/// `event.json` is guarded by `event.json.lock`.
fn lock_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map_or_else(|| OsString::from("event"), ToOwned::to_owned);
    name.push(".lock");
    path.with_file_name(name)
}

/// Exclusive lock on an event file, released on drop.
pub struct EventLock {
    file: File,
}

impl EventLock {
    /// Blocks until no other process or thread holds the lock for `path`.
    pub fn acquire(path: &Path) -> Result<Self, StoreError> {
        let lock_path = lock_path(path);
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(io_error(&lock_path))?;
        FileExt::lock_exclusive(&file).map_err(io_error(&lock_path))?;
        debug!(path = %lock_path.display(), "event locked");
        Ok(Self { file })
    }
}

impl Drop for EventLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

/// Loads, changes and saves an event while holding its lock.
///
/// The event is read only after the lock is held, so a second concurrent draw
/// sees the first one's result and is refused. Nothing is written when
/// `change` fails.
pub fn update_event<T, E>(
    path: &Path,
    change: impl FnOnce(&mut Event) -> Result<T, E>,
) -> Result<T, E>
where
    E: From<StoreError>,
{
    let _lock = EventLock::acquire(path)?;
    let mut event = load_event(path)?;
    let value = change(&mut event)?;
    save_event(path, &event)?;
    Ok(value)
}
