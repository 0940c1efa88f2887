//! Audio-related small types.
//!
//! This module defines the explicit playback state, the results of queue
//! movement and the source tag that records where the current queue came from.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::track::TrackId;

/// Where the controller is in its lifecycle.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum PlaybackState {
    /// Nothing has been loaded yet.
    #[default]
    Idle,
    /// A source is loaded but not playing (fresh restore, or after `stop`).
    Loaded,
    Playing,
    Paused,
}

impl PlaybackState {
    pub fn is_playing(self) -> bool {
        self == Self::Playing
    }

    pub fn has_source(self) -> bool {
        self != Self::Idle
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Loaded => "Stopped",
            Self::Playing => "Playing",
            Self::Paused => "Paused",
        }
    }
}

/// Result of moving forward through the controller's own queue.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Advance {
    /// The cursor moved and the next track was loaded.
    Advanced,
    /// The cursor is parked at the past-end sentinel.
    NoMore,
}

/// What a skip or end-of-track transition did, as seen by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Advanced,
    NoMore,
    /// The installed policy wants to play a track whose details must be
    /// looked up first.
    Lookup(TrackId),
    /// The policy handled the transition without needing anything else.
    Handled,
}

impl From<Advance> for Step {
    fn from(a: Advance) -> Self {
        match a {
            Advance::Advanced => Step::Advanced,
            Advance::NoMore => Step::NoMore,
        }
    }
}

/// Kind of collection a queue was built from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Playlist,
    Album,
    Artist,
}

impl SourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Playlist => "playlist",
            Self::Album => "album",
            Self::Artist => "artist",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies the logical collection the current queue came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceTag {
    #[serde(rename = "type")]
    pub kind: SourceKind,
    pub id: i64,
    pub name: String,
}

impl SourceTag {
    pub fn new(kind: SourceKind, id: i64, name: impl Into<String>) -> Self {
        Self {
            kind,
            id,
            name: name.into(),
        }
    }
}
