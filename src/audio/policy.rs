//! Pluggable play-order strategy.
//!
//! A view that keeps its own play order (a playlist overlay playing
//! sequentially or shuffled) installs a `PlaybackPolicy` on the controller.
//! While installed, skip buttons and the natural end of a track ask the
//! policy what to do before the controller falls back to its own queue.

use std::time::Duration;

use crate::track::{TrackId, TrackRef};

/// Snapshot handed to the policy on every decision.
#[derive(Debug, Copy, Clone)]
pub struct PolicyContext {
    /// Position inside the current track.
    pub position: Duration,
    /// "Previous" restarts the current track past this point.
    pub restart_threshold: Duration,
}

impl PolicyContext {
    pub fn past_restart_threshold(&self) -> bool {
        self.position > self.restart_threshold
    }
}

/// What the controller should do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyDecision {
    /// Use the controller's own queue behavior.
    Fallback,
    /// Load and play this track.
    Play(TrackRef),
    /// Play this track once its details have been looked up.
    Lookup(TrackId),
    /// Seek back to the start of the current track.
    Restart,
    /// Uninstall the policy and stop.
    Release,
    /// Do nothing.
    Ignore,
}

pub trait PlaybackPolicy {
    fn on_track_end(&mut self, ctx: &PolicyContext) -> PolicyDecision;
    fn on_next(&mut self, ctx: &PolicyContext) -> PolicyDecision;
    fn on_prev(&mut self, ctx: &PolicyContext) -> PolicyDecision;
}
