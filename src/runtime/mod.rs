use std::env;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::audio::{ControllerSettings, FileSlot, HandoffSlot, PlaybackController, RodioOutput};
use crate::catalog::{CatalogClient, Fetcher};
use crate::track::UrlResolver;

mod event_loop;
mod settings;
mod startup;

#[cfg(test)]
mod tests;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let command = startup::parse_args(env::args().skip(1))?;
    let settings = settings::load_settings();

    if command == startup::Command::PrintConfig {
        print!("{}", toml::to_string_pretty(&settings)?);
        return Ok(());
    }

    startup::init_logging(&settings);
    log::info!("segue: starting ({command:?})");

    let output = RodioOutput::open(&settings.remote)?;
    let mut controller = PlaybackController::new(
        output,
        UrlResolver::from_settings(&settings.remote),
        ControllerSettings::from_settings(&settings),
    );
    let mut fetcher = Fetcher::spawn(CatalogClient::new(&settings.remote));
    let mut slot = settings
        .handoff_dir()
        .map(|dir| FileSlot::new(&dir, &settings.handoff.key));
    let mut app = App::new();

    startup::apply_command(
        &command,
        &mut app,
        &mut controller,
        &mut fetcher,
        slot.as_mut().map(|s| s as &mut dyn HandoffSlot),
    );

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result =
        event_loop::run(&mut terminal, &settings, &mut app, &mut controller, &mut fetcher);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Some(slot) = slot.as_mut() {
        match controller.save_state(slot) {
            Ok(()) => log::info!("segue: saved playback state to {}", slot.path().display()),
            Err(e) => log::error!("segue: could not save playback state: {e}"),
        }
    }

    run_result
}
