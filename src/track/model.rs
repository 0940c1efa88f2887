use serde::{Deserialize, Serialize};

/// Catalog identifier of a track.
pub type TrackId = i64;

/// Minimal playable unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackRef {
    /// Storage-relative path, absolute url or local file path.
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track_id: Option<TrackId>,
}

impl TrackRef {
    pub fn new(url: impl Into<String>, title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: Some(title.into()),
            artist: Some(artist.into()),
            track_id: None,
        }
    }

    pub fn with_id(mut self, id: TrackId) -> Self {
        self.track_id = Some(id);
        self
    }

    /// True when the reference cannot be played at all.
    pub fn is_missing_url(&self) -> bool {
        self.url.trim().is_empty()
    }

    /// Title to display, falling back to `unknown`.
    pub fn display_title<'a>(&'a self, unknown: &'a str) -> &'a str {
        non_blank(self.title.as_deref()).unwrap_or(unknown)
    }

    /// Artist to display, falling back to `unknown`.
    pub fn display_artist<'a>(&'a self, unknown: &'a str) -> &'a str {
        non_blank(self.artist.as_deref()).unwrap_or(unknown)
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}
