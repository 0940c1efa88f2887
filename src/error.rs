//! Error types shared by the playback controller and the catalog client.

use thiserror::Error;

/// Convenient result alias for controller and output operations.
pub type Result<T> = std::result::Result<T, PlayerError>;

/// Errors raised while loading, controlling or handing off playback.
#[derive(Debug, Error)]
pub enum PlayerError {
    /// The track reference carried no url.
    #[error("no track URL provided")]
    MissingUrl,
    /// An operation needed a loaded source but none is loaded.
    #[error("no source loaded")]
    NoSource,
    /// Downloading the media failed.
    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: ureq::Error,
    },
    /// Reading a local file or the handoff slot failed.
    #[error("i/o error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// The media bytes could not be decoded.
    #[error("could not decode {url}: {reason}")]
    Decode { url: String, reason: String },
    /// The audio device could not be opened.
    #[error("audio output unavailable: {0}")]
    Output(String),
    /// The decoder refused to seek.
    #[error("seek failed: {0}")]
    Seek(String),
    /// The handoff slot held something we could not use.
    #[error("malformed handoff state: {0}")]
    MalformedHandoff(String),
}

/// Errors raised while talking to the catalog REST API.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: ureq::Error,
    },
    #[error("unexpected response from {url}: {source}")]
    Json {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("{0} collections cannot be listed by the catalog")]
    Unsupported(&'static str),
    #[error("catalog worker is gone")]
    Disconnected,
}
