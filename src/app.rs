//! Application module: exposes the app model used by the TUI and runtime.
//!
//! `App` holds the open collection view and the footer status; the playback
//! controller itself is owned by the runtime and lent to the model per call.

mod model;

pub use model::*;

#[cfg(test)]
mod tests;
