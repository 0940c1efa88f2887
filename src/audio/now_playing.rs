use std::time::Duration;

/// Text shown before anything has been loaded.
pub const NOTHING_SELECTED: &str = "No track selected";

/// What the now-playing bar shows. The controller writes it; the UI only reads.
#[derive(Debug, Clone, PartialEq)]
pub struct NowPlaying {
    pub title: String,
    pub artist: String,
    /// Elapsed time, `m:ss`.
    pub elapsed: String,
    /// Total time, `m:ss`; stays `0:00` until the duration is known.
    pub total: String,
    /// Progress through the track, 0.0 ..= 1.0.
    pub progress: f64,
    /// Play/pause and stop buttons.
    pub controls_enabled: bool,
    /// Progress reporting and the seek bar.
    pub progress_enabled: bool,
}

impl Default for NowPlaying {
    fn default() -> Self {
        Self {
            title: NOTHING_SELECTED.to_string(),
            artist: String::new(),
            elapsed: format_clock(Duration::ZERO),
            total: format_clock(Duration::ZERO),
            progress: 0.0,
            controls_enabled: false,
            progress_enabled: false,
        }
    }
}

impl NowPlaying {
    pub(super) fn show_track(&mut self, title: &str, artist: &str) {
        self.title = title.to_string();
        self.artist = artist.to_string();
        self.elapsed = format_clock(Duration::ZERO);
        self.total = format_clock(Duration::ZERO);
        self.progress = 0.0;
        self.controls_enabled = true;
    }

    pub(super) fn update_time(&mut self, position: Duration, duration: Option<Duration>) {
        self.elapsed = format_clock(position);
        if let Some(total) = duration.filter(|d| !d.is_zero()) {
            self.total = format_clock(total);
            self.progress = (position.as_secs_f64() / total.as_secs_f64()).clamp(0.0, 1.0);
        }
    }

    pub(super) fn reset_time(&mut self) {
        self.elapsed = format_clock(Duration::ZERO);
        self.progress = 0.0;
    }
}

/// Format a duration as `m:ss` (minutes are not padded).
pub fn format_clock(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Which speaker glyph matches the current volume.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum VolumeIcon {
    Muted,
    Low,
    High,
}

impl VolumeIcon {
    pub fn for_volume(volume: f32) -> Self {
        if volume <= 0.0 {
            Self::Muted
        } else if volume < 0.5 {
            Self::Low
        } else {
            Self::High
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Self::Muted => "🔇",
            Self::Low => "🔈",
            Self::High => "🔊",
        }
    }
}
