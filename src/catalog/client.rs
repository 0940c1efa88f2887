use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::audio::SourceKind;
use crate::config::RemoteSettings;
use crate::error::CatalogError;
use crate::track::TrackId;

use super::model::{AlbumBody, Collection, PlaylistBody, TrackDetail};

/// Source of track details and collection listings.
pub trait TrackLookup: Send + 'static {
    fn track(&self, id: TrackId) -> Result<TrackDetail, CatalogError>;
    fn collection(&self, kind: SourceKind, id: i64) -> Result<Collection, CatalogError>;
}

/// Blocking client for the catalog REST API.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    agent: ureq::Agent,
    base: String,
}

impl CatalogClient {
    pub fn new(remote: &RemoteSettings) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(remote.timeout_secs)))
            .build();
        Self {
            agent: ureq::Agent::new_with_config(config),
            base: remote.api_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Path of the listing endpoint for a collection kind.
    pub(super) fn collection_path(kind: SourceKind, id: i64) -> Result<String, CatalogError> {
        match kind {
            SourceKind::Playlist => Ok(format!("/playlists/{id}")),
            SourceKind::Album => Ok(format!("/albums/{id}/tracks")),
            SourceKind::Artist => Err(CatalogError::Unsupported(kind.as_str())),
        }
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, CatalogError> {
        let url = format!("{}{path}", self.base);
        log::debug!("segue: GET {url}");
        let http_err = |source| CatalogError::Http {
            url: url.clone(),
            source,
        };
        let mut response = self.agent.get(&url).call().map_err(http_err)?;
        let bytes = response.body_mut().read_to_vec().map_err(http_err)?;
        serde_json::from_slice(&bytes).map_err(|source| CatalogError::Json {
            url: url.clone(),
            source,
        })
    }
}

impl TrackLookup for CatalogClient {
    fn track(&self, id: TrackId) -> Result<TrackDetail, CatalogError> {
        self.get_json(&format!("/tracks/{id}"))
    }

    fn collection(&self, kind: SourceKind, id: i64) -> Result<Collection, CatalogError> {
        let path = Self::collection_path(kind, id)?;
        match kind {
            SourceKind::Playlist => self.get_json::<PlaylistBody>(&path).map(Collection::from_playlist),
            SourceKind::Album => self
                .get_json::<AlbumBody>(&path)
                .map(|body| Collection::from_album(id, body)),
            SourceKind::Artist => Err(CatalogError::Unsupported(kind.as_str())),
        }
    }
}
