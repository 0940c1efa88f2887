use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/segue/config.toml` or `~/.config/segue/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `SEGUE__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub remote: RemoteSettings,
    pub playback: PlaybackSettings,
    pub handoff: HandoffSettings,
    pub ui: UiSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RemoteSettings {
    /// Base url of the catalog REST API (`/tracks/{id}`, `/playlists/{id}`, ...).
    pub api_base_url: String,
    /// Remote base that storage-relative track paths are appended to.
    pub storage_base_url: String,
    /// Prefix stripped from storage-relative paths before they are resolved.
    pub storage_prefix: String,
    /// Per-request timeout (seconds) for API lookups and media downloads.
    pub timeout_secs: u64,
    /// Upper bound on a single downloaded track (bytes).
    pub max_track_bytes: u64,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8000".to_string(),
            storage_base_url:
                "https://files.freemusicarchive.org/storage-freemusicarchive-org/music/"
                    .to_string(),
            storage_prefix: "music/".to_string(),
            timeout_secs: 20,
            max_track_bytes: 64 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// "Previous" restarts the current track when we are further in than this (seconds).
    pub restart_threshold_secs: f64,
    /// Volume used at startup, 0.0 ..= 1.0.
    pub volume: f32,
    /// How often the event loop refreshes progress and checks for end of media (milliseconds).
    pub tick_ms: u64,
    /// Number of seconds to scrub when pressing `H` / `L`.
    pub scrub_seconds: u64,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            restart_threshold_secs: 3.0,
            volume: 0.5,
            tick_ms: 250,
            scrub_seconds: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HandoffSettings {
    /// Directory holding the handoff slot. Defaults to the data directory.
    pub dir: Option<PathBuf>,
    /// Name of the slot (the file is `<key>.json`).
    pub key: String,
}

impl Default for HandoffSettings {
    fn default() -> Self {
        Self {
            dir: None,
            key: "playerState".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
    /// Separator between title and artist in the now-playing line.
    pub now_playing_separator: String,
    /// Shown when a track reference carries no title.
    pub unknown_title: String,
    /// Shown when a track reference carries no artist.
    pub unknown_artist: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ segue: one track into the next ~ ".to_string(),
            now_playing_separator: " — ".to_string(),
            unknown_title: "Unknown title".to_string(),
            unknown_artist: "Unknown artist".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LogSettings {
    /// Default filter when `RUST_LOG` is unset (`error`, `warn`, `info`, `debug`, `trace`).
    pub level: String,
    /// Log file. Defaults to `segue.log` in the data directory.
    pub file: Option<PathBuf>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}
