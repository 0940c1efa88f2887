use super::startup::{Command, parse_args};
use crate::audio::SourceKind;

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn no_arguments_resumes() {
    assert_eq!(parse_args(args(&[])), Ok(Command::Resume));
}

#[test]
fn collection_and_track_commands() {
    assert_eq!(
        parse_args(args(&["playlist", "12"])),
        Ok(Command::Open(SourceKind::Playlist, 12))
    );
    assert_eq!(
        parse_args(args(&["album", "3"])),
        Ok(Command::Open(SourceKind::Album, 3))
    );
    assert_eq!(parse_args(args(&["track", "99"])), Ok(Command::Track(99)));
    assert_eq!(parse_args(args(&["config"])), Ok(Command::PrintConfig));
}

#[test]
fn bad_command_lines_are_rejected() {
    assert!(parse_args(args(&["playlist"])).is_err());
    assert!(parse_args(args(&["album", "x"])).is_err());
    assert!(parse_args(args(&["artist", "1"])).is_err());
    assert!(parse_args(args(&["track", "1", "2"])).is_err());
    assert!(parse_args(args(&["config", "now"])).is_err());
}
