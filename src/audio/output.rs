use std::time::Duration;

use crate::error::Result;

/// The single audio resource a controller drives.
///
/// Implementations only move bytes and report timing; queueing, state and
/// display bookkeeping stay in `PlaybackController`.
pub trait AudioOutput {
    /// Replace the active source with `url`, leaving it paused at zero.
    fn load(&mut self, url: &str) -> Result<()>;
    fn play(&mut self);
    fn pause(&mut self);
    fn seek(&mut self, position: Duration) -> Result<()>;
    /// Current playback position of the active source.
    fn position(&self) -> Duration;
    /// Total length, once the media metadata is known.
    fn duration(&self) -> Option<Duration>;
    /// True when the active source has played to its end.
    fn is_finished(&self) -> bool;
    fn set_volume(&mut self, volume: f32);
}
