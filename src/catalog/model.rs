//! Response bodies of the catalog API and their conversion into the
//! player's own types.

use std::time::Duration;

use serde::Deserialize;

use crate::audio::{OrderEntry, SourceKind, SourceTag};
use crate::track::{TrackId, TrackRef};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ArtistInfo {
    #[serde(default)]
    pub artist_name: Option<String>,
}

/// `GET /tracks/{id}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TrackDetail {
    pub track_id: TrackId,
    #[serde(default)]
    pub track_title: Option<String>,
    /// Storage-relative media path.
    #[serde(default)]
    pub track_file: Option<String>,
    #[serde(default)]
    pub artist_info: Option<ArtistInfo>,
}

impl TrackDetail {
    pub fn to_track_ref(&self) -> TrackRef {
        TrackRef {
            url: self.track_file.clone().unwrap_or_default(),
            title: self.track_title.clone(),
            artist: self
                .artist_info
                .as_ref()
                .and_then(|a| a.artist_name.clone()),
            track_id: Some(self.track_id),
        }
    }
}

/// A row of a playlist or album listing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CollectionTrack {
    pub track_id: TrackId,
    #[serde(default)]
    pub track_title: Option<String>,
    #[serde(default)]
    pub artist_names: Option<String>,
    /// Seconds.
    #[serde(default)]
    pub track_duration: Option<f64>,
}

impl CollectionTrack {
    pub fn duration(&self) -> Option<Duration> {
        self.track_duration
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
    }

    pub fn to_entry(&self) -> OrderEntry {
        OrderEntry::new(
            self.track_id,
            self.track_title.clone(),
            self.artist_names.clone(),
        )
    }
}

/// `GET /playlists/{id}`.
#[derive(Debug, Deserialize)]
pub(super) struct PlaylistBody {
    pub playlist_id: i64,
    #[serde(default)]
    pub playlist_name: Option<String>,
    #[serde(default)]
    pub tracks: Vec<CollectionTrack>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct AlbumInfo {
    #[serde(default)]
    pub album_title: Option<String>,
}

/// `GET /albums/{id}/tracks`.
#[derive(Debug, Deserialize)]
pub(super) struct AlbumBody {
    #[serde(default)]
    pub album: Option<AlbumInfo>,
    #[serde(default)]
    pub tracks: Vec<CollectionTrack>,
}

/// An opened playlist or album.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    pub source: SourceTag,
    pub tracks: Vec<CollectionTrack>,
}

impl Collection {
    pub(super) fn from_playlist(body: PlaylistBody) -> Self {
        let name = body
            .playlist_name
            .unwrap_or_else(|| format!("Playlist {}", body.playlist_id));
        Self {
            source: SourceTag::new(SourceKind::Playlist, body.playlist_id, name),
            tracks: body.tracks,
        }
    }

    pub(super) fn from_album(id: i64, body: AlbumBody) -> Self {
        let name = body
            .album
            .and_then(|a| a.album_title)
            .unwrap_or_else(|| format!("Album {id}"));
        Self {
            source: SourceTag::new(SourceKind::Album, id, name),
            tracks: body.tracks,
        }
    }

    pub fn entries(&self) -> Vec<OrderEntry> {
        self.tracks.iter().map(CollectionTrack::to_entry).collect()
    }
}
