use std::time::Duration;

use crate::error::{PlayerError, Result};

use super::output::AudioOutput;

/// Scriptable stand-in for a real output device.
#[derive(Debug)]
pub struct FakeOutput {
    pub loaded: Vec<String>,
    pub playing: bool,
    pub position: Duration,
    pub duration: Option<Duration>,
    pub finished: bool,
    pub volume: f32,
    pub fail_loads: bool,
    /// Duration reported after the next load; `None` mimics media still loading.
    pub next_duration: Option<Duration>,
    pub seeks: Vec<Duration>,
}

impl Default for FakeOutput {
    fn default() -> Self {
        Self {
            loaded: Vec::new(),
            playing: false,
            position: Duration::ZERO,
            duration: None,
            finished: false,
            volume: 1.0,
            fail_loads: false,
            next_duration: Some(Duration::from_secs(180)),
            seeks: Vec::new(),
        }
    }
}

impl FakeOutput {
    pub fn last_loaded(&self) -> Option<&str> {
        self.loaded.last().map(String::as_str)
    }

    /// Pretend the media metadata just arrived.
    pub fn metadata_arrives(&mut self, duration: Duration) {
        self.duration = Some(duration);
    }
}

impl AudioOutput for FakeOutput {
    fn load(&mut self, url: &str) -> Result<()> {
        if self.fail_loads {
            return Err(PlayerError::Decode {
                url: url.to_string(),
                reason: "fake failure".to_string(),
            });
        }
        self.loaded.push(url.to_string());
        self.playing = false;
        self.position = Duration::ZERO;
        self.finished = false;
        self.duration = self.next_duration;
        Ok(())
    }

    fn play(&mut self) {
        self.playing = true;
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn seek(&mut self, position: Duration) -> Result<()> {
        if self.loaded.is_empty() {
            return Err(PlayerError::NoSource);
        }
        self.position = position;
        self.seeks.push(position);
        Ok(())
    }

    fn position(&self) -> Duration {
        self.position
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn is_finished(&self) -> bool {
        self.finished
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }
}
