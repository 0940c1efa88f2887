//! Track references and storage-url resolution.
//!
//! A `TrackRef` is the minimal playable descriptor passed between the
//! collection view and the playback controller. Its `url` is usually a
//! storage-relative path that `UrlResolver` turns into a remote url.

mod model;
mod url;

pub use model::*;
pub(crate) use url::local_path;
pub use url::UrlResolver;

#[cfg(test)]
mod tests;
