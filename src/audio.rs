//! Audio playback: the controller, its output backends and helpers.
//!
//! `PlaybackController` owns one `AudioOutput`, the play queue and the
//! now-playing display. Views steer it directly, or install a
//! `PlaybackPolicy` to impose their own play order for a while.

mod controller;
mod handoff;
mod now_playing;
mod order;
mod output;
mod policy;
mod sink;
mod types;

pub use controller::{ControllerSettings, PlaybackController};
pub use handoff::{FileSlot, Handoff, HandoffSlot, MemorySlot};
pub use now_playing::{NowPlaying, VolumeIcon, format_clock};
pub use order::{LocalOrder, OrderEntry, SharedOrder, shuffled_order};
pub use output::AudioOutput;
pub use policy::{PlaybackPolicy, PolicyContext, PolicyDecision};
pub use sink::RodioOutput;
pub use types::{Advance, PlaybackState, SourceKind, SourceTag, Step};

#[cfg(test)]
pub(crate) mod fake;
