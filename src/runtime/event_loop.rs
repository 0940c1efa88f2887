use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::audio::{AudioOutput, PlaybackController, Step};
use crate::catalog::{Fetcher, Reply};
use crate::config;
use crate::ui;

const VOLUME_STEP: f32 = 0.1;

/// Main terminal event loop: drains catalog replies, pumps the controller,
/// draws and handles input. Returns `Ok(())` when quit is requested.
pub fn run<O: AudioOutput>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    controller: &mut PlaybackController<O>,
    fetcher: &mut Fetcher,
) -> Result<(), Box<dyn std::error::Error>> {
    let tick = Duration::from_millis(settings.playback.tick_ms);
    let mut rng = rand::rng();

    loop {
        for reply in fetcher.poll() {
            handle_reply(reply, app, controller, fetcher);
        }

        if let Some(step) = controller.tick() {
            follow_step(step, app, fetcher);
        }

        terminal.draw(|f| {
            ui::draw(
                f,
                app,
                controller,
                &settings.ui,
                settings.playback.scrub_seconds,
            )
        })?;

        if event::poll(tick)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                handle_key_event(key, settings, app, controller, fetcher, &mut rng);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn handle_reply<O: AudioOutput>(
    reply: Reply,
    app: &mut App,
    controller: &mut PlaybackController<O>,
    fetcher: &mut Fetcher,
) {
    let current = fetcher.is_current(&reply);
    match reply {
        Reply::Track { id, result, .. } => match result {
            Ok(detail) => {
                app.track_resolved(controller, &detail, current);
                if current {
                    follow_step(Step::Handled, app, fetcher);
                }
            }
            Err(e) => {
                log::warn!("segue: lookup of track {id} failed: {e}");
                if current {
                    app.set_status(format!("could not load track {id}"));
                }
            }
        },
        Reply::Collection { kind, id, result } => match result {
            Ok(collection) => app.open_collection(controller, collection),
            Err(e) => {
                log::error!("segue: could not open {kind} {id}: {e}");
                app.set_status(format!("could not open {kind} {id}"));
            }
        },
    }
}

/// Act on what a skip, an end of track or a view action asked for.
fn follow_step(step: Step, app: &mut App, fetcher: &mut Fetcher) {
    match step {
        Step::Lookup(id) => {
            if let Err(e) = fetcher.request_play(id) {
                log::error!("segue: {e}");
                app.set_status(e.to_string());
            }
        }
        // Something else is playing now; an older lookup must not take over.
        Step::Advanced | Step::NoMore => fetcher.cancel_play(),
        Step::Handled => {}
    }

    for id in app.take_prefetch() {
        if let Err(e) = fetcher.prefetch(id) {
            log::warn!("segue: prefetch stopped: {e}");
            break;
        }
    }
}

fn handle_key_event<O: AudioOutput, R: rand::Rng + ?Sized>(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    controller: &mut PlaybackController<O>,
    fetcher: &mut Fetcher,
    rng: &mut R,
) {
    let scrub = settings.playback.scrub_seconds.min(i64::MAX as u64) as i64;
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('j') => {
            if let Some(view) = app.view_mut() {
                view.select_next();
            }
        }
        KeyCode::Char('k') => {
            if let Some(view) = app.view_mut() {
                view.select_prev();
            }
        }
        KeyCode::Enter => {
            let step = app.play_selected(controller);
            follow_step(step, app, fetcher);
        }
        KeyCode::Char('a') => {
            let step = app.play_all(controller);
            follow_step(step, app, fetcher);
        }
        KeyCode::Char('s') => {
            let step = app.shuffle_play(controller, rng);
            follow_step(step, app, fetcher);
        }
        KeyCode::Esc => app.close_view(controller),
        KeyCode::Char('p') | KeyCode::Char(' ') => controller.toggle(),
        KeyCode::Char('x') => controller.stop(),
        KeyCode::Char('l') => {
            let step = controller.skip_forward();
            follow_step(step, app, fetcher);
        }
        KeyCode::Char('h') => {
            let step = controller.skip_back();
            follow_step(step, app, fetcher);
        }
        KeyCode::Char('L') => {
            if let Err(e) = controller.scrub(scrub) {
                log::debug!("segue: scrub: {e}");
            }
        }
        KeyCode::Char('H') => {
            if let Err(e) = controller.scrub(-scrub) {
                log::debug!("segue: scrub: {e}");
            }
        }
        KeyCode::Char(c @ '0'..='9') => {
            let fraction = f64::from(c as u8 - b'0') / 10.0;
            if let Err(e) = controller.seek_fraction(fraction) {
                log::debug!("segue: seek: {e}");
            }
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            controller.set_volume(controller.volume() + VOLUME_STEP);
        }
        KeyCode::Char('-') => {
            controller.set_volume(controller.volume() - VOLUME_STEP);
        }
        KeyCode::Char('m') => controller.toggle_mute(),
        _ => {}
    }
}
