use std::fs::{self, OpenOptions};

use crate::app::App;
use crate::audio::{AudioOutput, HandoffSlot, PlaybackController, SourceKind};
use crate::catalog::Fetcher;
use crate::config;
use crate::track::TrackId;

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// No arguments: pick up where the last session stopped.
    Resume,
    Open(SourceKind, i64),
    Track(TrackId),
    PrintConfig,
}

pub const USAGE: &str = "usage: segue [playlist <id> | album <id> | track <id> | config]";

pub fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Command, String> {
    let args: Vec<String> = args.into_iter().collect();
    let id = |raw: Option<&String>| -> Result<i64, String> {
        let raw = raw.ok_or_else(|| USAGE.to_string())?;
        raw.parse::<i64>()
            .map_err(|_| format!("segue: not a valid id: {raw}\n{USAGE}"))
    };
    let command = match args.first().map(String::as_str) {
        None => Command::Resume,
        Some("config") => Command::PrintConfig,
        Some("playlist") => Command::Open(SourceKind::Playlist, id(args.get(1))?),
        Some("album") => Command::Open(SourceKind::Album, id(args.get(1))?),
        Some("track") => Command::Track(id(args.get(1))?),
        Some(_) => return Err(USAGE.to_string()),
    };
    let expected = if command == Command::Resume || command == Command::PrintConfig {
        1
    } else {
        2
    };
    if args.len() > expected {
        return Err(USAGE.to_string());
    }
    Ok(command)
}

/// Send log records to the configured file. The terminal belongs to the UI,
/// so when the file cannot be opened logging stays off.
pub fn init_logging(settings: &config::Settings) {
    let Some(path) = settings.log_file() else {
        return;
    };
    if let Some(dir) = path.parent() {
        if fs::create_dir_all(dir).is_err() {
            return;
        }
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };
    let env = env_logger::Env::default().default_filter_or(settings.log.level.as_str());
    let _ = env_logger::Builder::from_env(env)
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init();
}

/// Restore the previous session, then act on the command line.
pub fn apply_command<O: AudioOutput>(
    command: &Command,
    app: &mut App,
    controller: &mut PlaybackController<O>,
    fetcher: &mut Fetcher,
    slot: Option<&mut dyn HandoffSlot>,
) {
    // The slot is consumed on every start, even when the command line
    // replaces what it held.
    if let Some(slot) = slot {
        if controller.restore_state(slot) {
            app.set_status("resumed previous session");
        }
    }

    let sent = match *command {
        Command::Resume | Command::PrintConfig => Ok(()),
        Command::Open(kind, id) => fetcher.open_collection(kind, id),
        Command::Track(id) => fetcher.request_play(id).map(|_| ()),
    };
    if let Err(e) = sent {
        log::error!("segue: {e}");
        app.set_status(e.to_string());
    }
}
