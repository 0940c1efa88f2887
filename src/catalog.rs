//! Catalog module: REST models, the blocking HTTP client and the background
//! worker that keeps lookups off the terminal thread.

mod client;
mod fetcher;
mod model;

pub use client::{CatalogClient, TrackLookup};
pub use fetcher::{Fetcher, Reply};
pub use model::*;
