use std::time::Duration;

use crate::config::Settings;
use crate::error::{PlayerError, Result};
use crate::track::{TrackRef, UrlResolver};

use super::handoff::{Handoff, HandoffSlot, cursor_to_index, index_to_cursor};
use super::now_playing::{NowPlaying, VolumeIcon};
use super::output::AudioOutput;
use super::policy::{PlaybackPolicy, PolicyContext, PolicyDecision};
use super::types::{Advance, PlaybackState, SourceTag, Step};

/// Volume restored by unmute when the user volume was zero.
const UNMUTE_VOLUME: f32 = 0.5;

const DEFAULT_RESTART_THRESHOLD: Duration = Duration::from_secs(3);

/// Controller knobs taken from `Settings`.
#[derive(Debug, Clone)]
pub struct ControllerSettings {
    pub restart_threshold: Duration,
    pub volume: f32,
    pub unknown_title: String,
    pub unknown_artist: String,
}

impl ControllerSettings {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            restart_threshold: Duration::try_from_secs_f64(
                settings.playback.restart_threshold_secs,
            )
            .unwrap_or_else(|e| {
                log::warn!(
                    "segue: bad restart threshold {}: {e}; using {}s",
                    settings.playback.restart_threshold_secs,
                    DEFAULT_RESTART_THRESHOLD.as_secs()
                );
                DEFAULT_RESTART_THRESHOLD
            }),
            volume: settings.playback.volume,
            unknown_title: settings.ui.unknown_title.clone(),
            unknown_artist: settings.ui.unknown_artist.clone(),
        }
    }
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// Seek/resume to apply once the restored media reports its duration.
#[derive(Debug, Copy, Clone)]
struct PendingResume {
    position: Duration,
    play: bool,
}

/// Owns the audio output, the play queue and the now-playing display.
pub struct PlaybackController<O: AudioOutput> {
    output: O,
    resolver: UrlResolver,
    settings: ControllerSettings,

    state: PlaybackState,
    current: Option<TrackRef>,
    queue: Vec<TrackRef>,
    /// `None` before any playback; `Some(queue.len())` once past the end.
    cursor: Option<usize>,
    source: Option<SourceTag>,

    policy: Option<Box<dyn PlaybackPolicy>>,
    now_playing: NowPlaying,

    volume: f32,
    muted: bool,

    /// Set on load, cleared once the output reported a duration.
    awaiting_metadata: bool,
    /// The end of the loaded media was already acted on; cleared by the next load.
    end_handled: bool,
    pending_resume: Option<PendingResume>,
}

impl<O: AudioOutput> PlaybackController<O> {
    pub fn new(mut output: O, resolver: UrlResolver, settings: ControllerSettings) -> Self {
        let volume = settings.volume.clamp(0.0, 1.0);
        output.set_volume(volume);
        Self {
            output,
            resolver,
            settings,
            state: PlaybackState::Idle,
            current: None,
            queue: Vec::new(),
            cursor: None,
            source: None,
            policy: None,
            now_playing: NowPlaying::default(),
            volume,
            muted: false,
            awaiting_metadata: false,
            end_handled: false,
            pending_resume: None,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn current_track(&self) -> Option<&TrackRef> {
        self.current.as_ref()
    }

    pub fn queue(&self) -> &[TrackRef] {
        &self.queue
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn source(&self) -> Option<&SourceTag> {
        self.source.as_ref()
    }

    pub fn now_playing(&self) -> &NowPlaying {
        &self.now_playing
    }

    pub fn position(&self) -> Duration {
        self.output.position()
    }

    pub fn duration(&self) -> Option<Duration> {
        self.output.duration()
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn volume_icon(&self) -> VolumeIcon {
        VolumeIcon::for_volume(self.effective_volume())
    }

    pub fn has_policy(&self) -> bool {
        self.policy.is_some()
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    // ---- loading & transport -------------------------------------------

    /// Load `track` and start playing it.
    ///
    /// A reference without a url is logged and ignored; the controller is
    /// left exactly as it was.
    pub fn play_track(&mut self, track: TrackRef) -> Result<()> {
        self.load_track(track)?;
        self.play();
        Ok(())
    }

    fn load_track(&mut self, track: TrackRef) -> Result<()> {
        let Some(url) = self.resolver.resolve(&track.url) else {
            log::error!("segue: no track URL provided");
            return Err(PlayerError::MissingUrl);
        };

        if let Err(e) = self.output.load(&url) {
            log::error!("segue: could not load {url}: {e}");
            return Err(e);
        }
        log::info!("segue: loaded {url}");

        let title = track.display_title(&self.settings.unknown_title).to_string();
        let artist = track.display_artist(&self.settings.unknown_artist).to_string();
        self.now_playing.show_track(&title, &artist);
        self.now_playing.progress_enabled = false;

        self.current = Some(track);
        self.state = PlaybackState::Loaded;
        self.awaiting_metadata = true;
        self.end_handled = false;
        self.pending_resume = None;
        Ok(())
    }

    /// Load the current track again. A source that played to its end has
    /// nothing left to rewind.
    fn reload_current(&mut self) -> Result<()> {
        let url = self
            .current
            .as_ref()
            .and_then(|t| self.resolver.resolve(&t.url))
            .ok_or(PlayerError::NoSource)?;
        self.output.load(&url)?;
        log::debug!("segue: reloaded {url}");
        self.awaiting_metadata = true;
        self.end_handled = false;
        self.pending_resume = None;
        Ok(())
    }

    fn media_spent(&self) -> bool {
        self.end_handled || self.output.is_finished()
    }

    pub fn play(&mut self) {
        match self.state {
            PlaybackState::Idle => {
                log::debug!("segue: play ignored, nothing loaded");
                return;
            }
            PlaybackState::Playing => return,
            PlaybackState::Loaded | PlaybackState::Paused => {}
        }
        if self.media_spent() {
            if let Err(e) = self.reload_current() {
                log::error!("segue: could not reload finished track: {e}");
                return;
            }
        }
        self.output.play();
        self.state = PlaybackState::Playing;
        self.now_playing.controls_enabled = true;
        if self.output.duration().is_some() {
            self.now_playing.progress_enabled = true;
        }
    }

    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            self.output.pause();
            self.state = PlaybackState::Paused;
        }
    }

    /// Play/pause button.
    pub fn toggle(&mut self) {
        if self.state.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Pause, rewind to zero and stop reporting progress.
    pub fn stop(&mut self) {
        self.output.pause();
        if self.state.has_source() {
            let rewound = if self.media_spent() {
                self.reload_current()
            } else {
                self.output.seek(Duration::ZERO)
            };
            if let Err(e) = rewound {
                log::debug!("segue: rewind on stop failed: {e}");
            }
            self.state = PlaybackState::Loaded;
        }
        self.pending_resume = None;
        self.now_playing.reset_time();
        self.now_playing.progress_enabled = false;
    }

    pub fn seek_to(&mut self, position: Duration) -> Result<()> {
        if !self.state.has_source() {
            return Err(PlayerError::NoSource);
        }
        let duration = self.output.duration();
        let position = duration.map_or(position, |d| position.min(d));
        self.output.seek(position)?;
        self.now_playing.update_time(position, duration);
        Ok(())
    }

    /// Seek-bar input: jump to `fraction` of the track.
    pub fn seek_fraction(&mut self, fraction: f64) -> Result<()> {
        let Some(total) = self.output.duration() else {
            return Err(PlayerError::Seek("duration not known yet".to_string()));
        };
        let fraction = if fraction.is_finite() {
            fraction.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.seek_to(total.mul_f64(fraction))
    }

    /// Move the position by `delta_secs` (negative scrubs backwards).
    pub fn scrub(&mut self, delta_secs: i64) -> Result<()> {
        let now = self.output.position();
        let delta = Duration::from_secs(delta_secs.unsigned_abs());
        let target = if delta_secs < 0 {
            now.saturating_sub(delta)
        } else {
            now + delta
        };
        self.seek_to(target)
    }

    fn restart(&mut self) {
        let restarted = if self.media_spent() {
            self.reload_current().map(|()| {
                if self.state.is_playing() {
                    self.output.play();
                }
                self.now_playing.reset_time();
            })
        } else {
            self.seek_to(Duration::ZERO)
        };
        if let Err(e) = restarted {
            log::debug!("segue: restart failed: {e}");
        }
    }

    // ---- volume ----------------------------------------------------------

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = if volume.is_finite() {
            volume.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.muted = false;
        self.output.set_volume(self.volume);
    }

    pub fn toggle_mute(&mut self) {
        if self.effective_volume() > 0.0 {
            self.muted = true;
        } else {
            self.muted = false;
            if self.volume <= 0.0 {
                self.volume = UNMUTE_VOLUME;
            }
        }
        self.output.set_volume(self.effective_volume());
    }

    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.volume }
    }

    // ---- queue -------------------------------------------------------------

    /// Replace the queue and cursor together.
    pub fn set_queue(&mut self, tracks: Vec<TrackRef>, start_index: usize) {
        let start = start_index.min(tracks.len());
        self.queue = tracks;
        self.cursor = Some(start);
    }

    /// Advance the cursor and play what is there.
    pub fn play_next(&mut self) -> Advance {
        let next = self.cursor.map_or(0, |c| c + 1);
        if next >= self.queue.len() {
            self.cursor = Some(self.queue.len());
            return Advance::NoMore;
        }
        self.cursor = Some(next);
        let track = self.queue[next].clone();
        // Failures are logged by `play_track`; the cursor still moved.
        let _ = self.play_track(track);
        Advance::Advanced
    }

    /// Restart the current track, or step back one when close to its start.
    ///
    /// Returns `Step::Advanced` when a queue track was loaded and
    /// `Step::Handled` for a restart.
    pub fn play_prev(&mut self) -> Step {
        if self.output.position() > self.settings.restart_threshold || self.queue.is_empty() {
            self.restart();
            return Step::Handled;
        }
        let prev = self
            .cursor
            .map_or(0, |c| c.saturating_sub(1))
            .min(self.queue.len() - 1);
        self.cursor = Some(prev);
        let track = self.queue[prev].clone();
        match self.play_track(track) {
            Ok(()) => Step::Advanced,
            Err(_) => Step::Handled,
        }
    }

    pub fn set_source(&mut self, source: SourceTag) {
        self.source = Some(source);
    }

    pub fn clear_source(&mut self) {
        self.source = None;
    }

    // ---- policy --------------------------------------------------------------

    pub fn install_policy(&mut self, policy: Box<dyn PlaybackPolicy>) {
        self.policy = Some(policy);
    }

    pub fn uninstall_policy(&mut self) -> Option<Box<dyn PlaybackPolicy>> {
        self.policy.take()
    }

    /// "Next" button.
    pub fn skip_forward(&mut self) -> Step {
        match self.consult(|p, ctx| p.on_next(ctx)) {
            PolicyDecision::Fallback => self.play_next().into(),
            decision => self.apply(decision),
        }
    }

    /// "Previous" button.
    pub fn skip_back(&mut self) -> Step {
        match self.consult(|p, ctx| p.on_prev(ctx)) {
            PolicyDecision::Fallback => self.play_prev(),
            decision => self.apply(decision),
        }
    }

    /// Natural end of the current media. Acted on once per load.
    pub fn handle_track_end(&mut self) -> Step {
        self.end_handled = true;
        match self.consult(|p, ctx| p.on_track_end(ctx)) {
            PolicyDecision::Fallback => match self.play_next() {
                Advance::Advanced => Step::Advanced,
                Advance::NoMore => {
                    self.stop();
                    Step::NoMore
                }
            },
            decision => self.apply(decision),
        }
    }

    fn consult(
        &mut self,
        ask: impl FnOnce(&mut dyn PlaybackPolicy, &PolicyContext) -> PolicyDecision,
    ) -> PolicyDecision {
        let ctx = PolicyContext {
            position: self.output.position(),
            restart_threshold: self.settings.restart_threshold,
        };
        match self.policy.as_mut() {
            Some(policy) => ask(policy.as_mut(), &ctx),
            None => PolicyDecision::Fallback,
        }
    }

    fn apply(&mut self, decision: PolicyDecision) -> Step {
        match decision {
            PolicyDecision::Play(track) => {
                let _ = self.play_track(track);
                Step::Advanced
            }
            PolicyDecision::Lookup(id) => Step::Lookup(id),
            PolicyDecision::Restart => {
                self.restart();
                Step::Handled
            }
            PolicyDecision::Release => {
                self.policy = None;
                self.stop();
                Step::NoMore
            }
            PolicyDecision::Ignore | PolicyDecision::Fallback => Step::Handled,
        }
    }

    // ---- event pump ----------------------------------------------------------

    /// Refresh progress, apply a pending resume once the media reports its
    /// duration, and react to the end of the media.
    pub fn tick(&mut self) -> Option<Step> {
        let duration = self.output.duration();

        if duration.is_some() && self.awaiting_metadata {
            self.awaiting_metadata = false;
            if let Some(resume) = self.pending_resume.take() {
                self.apply_resume(resume, duration);
            }
            if matches!(self.state, PlaybackState::Playing | PlaybackState::Paused) {
                self.now_playing.progress_enabled = true;
            }
        }

        if self.now_playing.progress_enabled {
            self.now_playing
                .update_time(self.output.position(), duration);
        } else if let Some(total) = duration {
            self.now_playing.update_time(Duration::ZERO, Some(total));
        }

        if self.state.is_playing() && !self.end_handled && self.output.is_finished() {
            log::debug!("segue: track ended");
            return Some(self.handle_track_end());
        }
        None
    }

    fn apply_resume(&mut self, resume: PendingResume, duration: Option<Duration>) {
        let target = duration.map_or(resume.position, |d| resume.position.min(d));
        if let Err(e) = self.output.seek(target) {
            log::warn!("segue: could not resume at {target:?}: {e}");
        }
        if resume.play {
            self.play();
        } else {
            self.state = PlaybackState::Paused;
        }
    }

    // ---- handoff -------------------------------------------------------------

    /// Write the current playback state into `slot`. Nothing is written
    /// when no track was ever loaded.
    pub fn save_state(&self, slot: &mut dyn HandoffSlot) -> Result<()> {
        let Some(track) = &self.current else {
            return Ok(());
        };
        let (position, playing) = match self.pending_resume {
            Some(r) => (r.position, r.play),
            None => (self.output.position(), self.state.is_playing()),
        };
        let handoff = Handoff {
            track: Some(track.clone()),
            current_time: position.as_secs_f64(),
            is_playing: playing,
            queue: self.queue.clone(),
            queue_index: cursor_to_index(self.cursor),
            source: self.source.clone(),
        };
        slot.put(&handoff.to_json()?)
    }

    /// Take the handoff from `slot` and rehydrate from it.
    ///
    /// The slot is emptied whether or not its content was usable. Returns
    /// `true` when a track was restored; playback position and the playing
    /// flag are applied by `tick` once the media reports its duration.
    pub fn restore_state(&mut self, slot: &mut dyn HandoffSlot) -> bool {
        let blob = match slot.take() {
            Ok(Some(blob)) => blob,
            Ok(None) => return false,
            Err(e) => {
                log::warn!("segue: could not read saved playback state: {e}");
                return false;
            }
        };
        let handoff = match Handoff::from_json(&blob) {
            Ok(h) => h,
            Err(e) => {
                log::warn!("segue: ignoring saved playback state: {e}");
                return false;
            }
        };
        let Some(track) = handoff.track else {
            return false;
        };

        if let Err(e) = self.load_track(track) {
            log::warn!("segue: could not restore saved track: {e}");
            return false;
        }

        self.cursor = index_to_cursor(handoff.queue_index, handoff.queue.len());
        self.queue = handoff.queue;
        self.source = handoff.source;
        self.pending_resume = Some(PendingResume {
            position: Duration::try_from_secs_f64(handoff.current_time).unwrap_or(Duration::ZERO),
            play: handoff.is_playing,
        });
        log::info!("segue: restored playback state");
        true
    }
}
