//! `rodio`-backed audio output.
//!
//! Loading behaves like a media element: `load` swaps in a fresh paused
//! `Sink` immediately and a loader thread downloads (or reads) and decodes the
//! media in the background. Duration becomes known once the loader finishes,
//! which is the controller's cue to apply any pending resume.

use std::fs;
use std::io::Cursor;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use lofty::file::AudioFile;
use lofty::probe::Probe;
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};

use crate::config::RemoteSettings;
use crate::error::{PlayerError, Result};
use crate::track::local_path;

use super::output::AudioOutput;

#[derive(Debug, Default)]
struct LoadStatus {
    generation: u64,
    ready: bool,
    failed: bool,
    duration: Option<Duration>,
}

pub struct RodioOutput {
    stream: OutputStream,
    sink: Option<Arc<Sink>>,
    status: Arc<Mutex<LoadStatus>>,
    agent: ureq::Agent,
    max_bytes: u64,
    volume: f32,
}

impl RodioOutput {
    /// Open the default output device.
    pub fn open(remote: &RemoteSettings) -> Result<Self> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| PlayerError::Output(e.to_string()))?;
        // rodio logs to stderr when OutputStream is dropped, which would land
        // on top of the TUI.
        stream.log_on_drop(false);

        let config = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(remote.timeout_secs)))
            .build();

        Ok(Self {
            stream,
            sink: None,
            status: Arc::new(Mutex::new(LoadStatus::default())),
            agent: ureq::Agent::new_with_config(config),
            max_bytes: remote.max_track_bytes,
            volume: 1.0,
        })
    }

    fn status_snapshot(&self) -> (bool, bool, Option<Duration>) {
        self.status
            .lock()
            .map(|s| (s.ready, s.failed, s.duration))
            .unwrap_or((false, true, None))
    }
}

impl AudioOutput for RodioOutput {
    fn load(&mut self, url: &str) -> Result<()> {
        if let Some(old) = self.sink.take() {
            old.stop();
        }

        let sink = Arc::new(Sink::connect_new(self.stream.mixer()));
        sink.pause();
        sink.set_volume(self.volume);
        self.sink = Some(sink.clone());

        let generation = match self.status.lock() {
            Ok(mut s) => {
                s.generation += 1;
                s.ready = false;
                s.failed = false;
                s.duration = None;
                s.generation
            }
            Err(_) => return Err(PlayerError::Output("loader state poisoned".to_string())),
        };

        let status = self.status.clone();
        let agent = self.agent.clone();
        let max_bytes = self.max_bytes;
        let url = url.to_string();
        thread::spawn(move || {
            let loaded = fetch_bytes(&agent, &url, max_bytes).and_then(|bytes| decode(&url, bytes));

            let Ok(mut s) = status.lock() else {
                return;
            };
            if s.generation != generation {
                // Superseded by a newer load; the sink has already been stopped.
                return;
            }
            match loaded {
                Ok((source, duration)) => {
                    sink.append(source);
                    s.duration = duration;
                    s.ready = true;
                }
                Err(e) => {
                    log::error!("segue: {e}");
                    s.failed = true;
                }
            }
        });

        Ok(())
    }

    fn play(&mut self) {
        if let Some(s) = &self.sink {
            s.play();
        }
    }

    fn pause(&mut self) {
        if let Some(s) = &self.sink {
            s.pause();
        }
    }

    fn seek(&mut self, position: Duration) -> Result<()> {
        let sink = self.sink.as_ref().ok_or(PlayerError::NoSource)?;
        let (ready, _, _) = self.status_snapshot();
        if !ready {
            return Err(PlayerError::Seek("media is still loading".to_string()));
        }
        sink.try_seek(position)
            .map_err(|e| PlayerError::Seek(e.to_string()))
    }

    fn position(&self) -> Duration {
        self.sink.as_ref().map_or(Duration::ZERO, |s| s.get_pos())
    }

    fn duration(&self) -> Option<Duration> {
        self.status_snapshot().2
    }

    fn is_finished(&self) -> bool {
        let Some(sink) = &self.sink else {
            return false;
        };
        let (ready, failed, _) = self.status_snapshot();
        failed || (ready && sink.empty())
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        if let Some(s) = &self.sink {
            s.set_volume(volume);
        }
    }
}

fn fetch_bytes(agent: &ureq::Agent, url: &str, max_bytes: u64) -> Result<Vec<u8>> {
    if let Some(path) = local_path(url) {
        return fs::read(path).map_err(|source| PlayerError::Io {
            path: path.to_string(),
            source,
        });
    }

    let fetch_err = |source| PlayerError::Fetch {
        url: url.to_string(),
        source,
    };
    let mut response = agent.get(url).call().map_err(fetch_err)?;
    response
        .body_mut()
        .with_config()
        .limit(max_bytes)
        .read_to_vec()
        .map_err(fetch_err)
}

fn decode(url: &str, bytes: Vec<u8>) -> Result<(Decoder<Cursor<Vec<u8>>>, Option<Duration>)> {
    let from_tags = tag_duration(&bytes);
    let source = Decoder::new(Cursor::new(bytes)).map_err(|e| PlayerError::Decode {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    let duration = from_tags.or_else(|| source.total_duration());
    Ok((source, duration))
}

/// Read the duration from the container headers; decoders often cannot
/// report it for VBR mp3.
fn tag_duration(bytes: &[u8]) -> Option<Duration> {
    let tagged = Probe::new(Cursor::new(bytes))
        .guess_file_type()
        .ok()?
        .read()
        .ok()?;
    let d = tagged.properties().duration();
    (!d.is_zero()).then_some(d)
}
