//! One-shot playback handoff across restarts.
//!
//! On shutdown the controller writes a `Handoff` into a slot; on the next
//! start it takes the slot, which empties it. A blob is therefore restored
//! at most once.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PlayerError, Result};
use crate::track::TrackRef;

use super::types::SourceTag;

/// Serialized playback state: `{ track, currentTime, isPlaying, queue, queueIndex, source }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Handoff {
    pub track: Option<TrackRef>,
    /// Seconds into `track`.
    #[serde(default)]
    pub current_time: f64,
    #[serde(default)]
    pub is_playing: bool,
    #[serde(default)]
    pub queue: Vec<TrackRef>,
    /// Queue cursor, `-1` before any playback.
    #[serde(default = "before_start")]
    pub queue_index: i64,
    #[serde(default)]
    pub source: Option<SourceTag>,
}

fn before_start() -> i64 {
    -1
}

impl Handoff {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| PlayerError::MalformedHandoff(e.to_string()))
    }

    /// Parse a slot blob. A blob without a playable track is rejected.
    pub fn from_json(blob: &str) -> Result<Self> {
        let handoff: Handoff =
            serde_json::from_str(blob).map_err(|e| PlayerError::MalformedHandoff(e.to_string()))?;
        match &handoff.track {
            None => Err(PlayerError::MalformedHandoff("no track".to_string())),
            Some(t) if t.is_missing_url() => {
                Err(PlayerError::MalformedHandoff("track has no url".to_string()))
            }
            Some(_) => Ok(handoff),
        }
    }
}

/// Storage for a single handoff blob.
pub trait HandoffSlot {
    /// Overwrite the slot.
    fn put(&mut self, blob: &str) -> Result<()>;
    /// Read and clear the slot in one step.
    fn take(&mut self) -> Result<Option<String>>;
}

/// Slot backed by `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    pub fn new(dir: &Path, key: &str) -> Self {
        Self {
            path: dir.join(format!("{key}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(suffix);
        PathBuf::from(name)
    }
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> PlayerError + '_ {
    move |source| PlayerError::Io {
        path: path.display().to_string(),
        source,
    }
}

impl HandoffSlot for FileSlot {
    fn put(&mut self, blob: &str) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(io_err(dir))?;
        }
        // Write aside and rename so a reader never sees half a blob.
        let tmp = self.sibling(".tmp");
        fs::write(&tmp, blob).map_err(io_err(&tmp))?;
        fs::rename(&tmp, &self.path).map_err(io_err(&self.path))
    }

    fn take(&mut self) -> Result<Option<String>> {
        // Claim the file first; only one taker can win the rename.
        let claimed = self.sibling(".taking");
        match fs::rename(&self.path, &claimed) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_err(&self.path)(e)),
        }
        let blob = fs::read_to_string(&claimed);
        if let Err(e) = fs::remove_file(&claimed) {
            log::warn!("segue: could not remove {}: {e}", claimed.display());
        }
        blob.map(Some).map_err(io_err(&claimed))
    }
}

/// In-process slot.
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    blob: Option<String>,
}

impl MemorySlot {
    pub fn is_empty(&self) -> bool {
        self.blob.is_none()
    }
}

impl HandoffSlot for MemorySlot {
    fn put(&mut self, blob: &str) -> Result<()> {
        self.blob = Some(blob.to_string());
        Ok(())
    }

    fn take(&mut self) -> Result<Option<String>> {
        Ok(self.blob.take())
    }
}

/// Cursor as stored in the handoff: `-1` for "before any playback".
pub(super) fn cursor_to_index(cursor: Option<usize>) -> i64 {
    cursor.map_or(-1, |c| c as i64)
}

/// Inverse of `cursor_to_index`, clamped into `[-1, queue_len]`.
pub(super) fn index_to_cursor(index: i64, queue_len: usize) -> Option<usize> {
    if index < 0 {
        None
    } else {
        Some((index as usize).min(queue_len))
    }
}
