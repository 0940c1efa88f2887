use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use crate::audio::SourceKind;
use crate::error::CatalogError;
use crate::track::TrackId;

use super::client::TrackLookup;
use super::model::{Collection, TrackDetail};

enum Request {
    Track {
        id: TrackId,
        generation: Option<u64>,
    },
    Collection {
        kind: SourceKind,
        id: i64,
    },
}

/// Result of a lookup, as handed back to the event loop.
#[derive(Debug)]
pub enum Reply {
    Track {
        id: TrackId,
        /// Set for play requests, `None` for prefetches.
        generation: Option<u64>,
        result: Result<TrackDetail, CatalogError>,
    },
    Collection {
        kind: SourceKind,
        id: i64,
        result: Result<Collection, CatalogError>,
    },
}

/// Runs catalog lookups on a worker thread.
///
/// Every play request gets a new generation. Only the reply carrying the
/// latest generation should be played; older ones are still useful for the
/// cache. Dropping the fetcher closes the request channel and the worker
/// exits after its current lookup.
pub struct Fetcher {
    tx: Sender<Request>,
    rx: Receiver<Reply>,
    latest_play: u64,
}

impl Fetcher {
    pub fn spawn<L: TrackLookup>(lookup: L) -> Self {
        let (req_tx, req_rx) = mpsc::channel::<Request>();
        let (reply_tx, reply_rx) = mpsc::channel::<Reply>();

        thread::spawn(move || {
            for request in req_rx {
                let reply = match request {
                    Request::Track { id, generation } => Reply::Track {
                        id,
                        generation,
                        result: lookup.track(id),
                    },
                    Request::Collection { kind, id } => Reply::Collection {
                        kind,
                        id,
                        result: lookup.collection(kind, id),
                    },
                };
                if reply_tx.send(reply).is_err() {
                    break;
                }
            }
            log::debug!("segue: catalog worker exiting");
        });

        Self {
            tx: req_tx,
            rx: reply_rx,
            latest_play: 0,
        }
    }

    /// Look up `id` in order to play it. Supersedes any earlier play request.
    pub fn request_play(&mut self, id: TrackId) -> Result<u64, CatalogError> {
        self.latest_play += 1;
        let generation = self.latest_play;
        self.send(Request::Track {
            id,
            generation: Some(generation),
        })?;
        Ok(generation)
    }

    /// Look up `id` only to warm the cache.
    pub fn prefetch(&self, id: TrackId) -> Result<(), CatalogError> {
        self.send(Request::Track {
            id,
            generation: None,
        })
    }

    pub fn open_collection(&self, kind: SourceKind, id: i64) -> Result<(), CatalogError> {
        self.send(Request::Collection { kind, id })
    }

    /// Forget outstanding play requests; their replies will no longer be current.
    pub fn cancel_play(&mut self) {
        self.latest_play += 1;
    }

    /// Whether `reply` answers the most recent play request.
    pub fn is_current(&self, reply: &Reply) -> bool {
        matches!(reply, Reply::Track { generation: Some(g), .. } if *g == self.latest_play)
    }

    /// Drain every reply that has arrived so far.
    pub fn poll(&self) -> Vec<Reply> {
        self.rx.try_iter().collect()
    }

    fn send(&self, request: Request) -> Result<(), CatalogError> {
        self.tx.send(request).map_err(|_| CatalogError::Disconnected)
    }
}
