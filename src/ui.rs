//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Modifier, Style, Stylize},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock};

use crate::app::{App, CollectionView};
use crate::audio::{AudioOutput, NowPlaying, PlaybackController, format_clock};
use crate::catalog::CollectionTrack;
use crate::config::UiSettings;

static CONTROLS_MAP: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = BTreeMap::new();
    map.insert("j/k", "up/down");
    map.insert("enter", "play selected");
    map.insert("a", "play all");
    map.insert("s", "shuffle play");
    map.insert("esc", "close list");
    map.insert("space/p", "play/pause");
    map.insert("x", "stop");
    map.insert("h/l", "prev/next");
    // H/L is filled dynamically from config.
    map.insert("0-9", "seek 0-90%");
    map.insert("+/-", "volume");
    map.insert("m", "mute");
    map.insert("q", "quit");
    map
});

/// Render the controls help text, incorporating scrub seconds.
fn controls_text(scrub_seconds: u64) -> String {
    let order = [
        "j/k", "enter", "a", "s", "esc", "space/p", "x", "h/l", "H/L", "0-9", "+/-", "m", "q",
    ];
    order
        .iter()
        .filter_map(|k| {
            if *k == "H/L" {
                Some(format!("[H/L] scrub -/+{scrub_seconds}s"))
            } else {
                CONTROLS_MAP.get(k).map(|v| format!("[{k}] {v}"))
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

fn volume_text(glyph: &str, volume: f32, muted: bool) -> String {
    if muted {
        format!("{glyph} muted")
    } else {
        format!("{glyph} {:.0}%", volume * 100.0)
    }
}

/// `title — artist`, or just the title when no artist is shown.
fn now_playing_text(np: &NowPlaying, ui: &UiSettings) -> String {
    if np.artist.is_empty() {
        np.title.clone()
    } else {
        format!("{}{}{}", np.title, ui.now_playing_separator, np.artist)
    }
}

fn row_text(track: &CollectionTrack, ui: &UiSettings, playing: bool) -> String {
    let marker = if playing { "♪ " } else { "  " };
    let title = track
        .track_title
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(&ui.unknown_title);
    let artist = track
        .artist_names
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(&ui.unknown_artist);
    let duration = track.duration().map(format_clock).unwrap_or_default();
    format!("{marker}{title}{}{artist}  {duration}", ui.now_playing_separator)
}

/// Render the entire UI into the provided `frame`.
pub fn draw<O: AudioOutput>(
    frame: &mut Frame,
    app: &App,
    controller: &PlaybackController<O>,
    ui_settings: &UiSettings,
    scrub_seconds: u64,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" segue ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Now playing
    let np = controller.now_playing();
    let status = {
        let mut parts: Vec<String> = vec![now_playing_text(np, ui_settings)];
        parts.push(controller.state().label().to_string());
        parts.push(volume_text(
            controller.volume_icon().glyph(),
            controller.volume(),
            controller.is_muted(),
        ));
        if let Some(source) = controller.source() {
            parts.push(format!("From {}: {}", source.kind, source.name));
        }
        if let Some(msg) = &app.status {
            parts.push(msg.clone());
        }
        parts.join(" • ")
    };
    let mut status_par = Paragraph::new(status)
        .block(
            Block::bordered()
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                })
                .title(" now playing "),
        )
        .wrap(Wrap { trim: true });
    if !np.controls_enabled {
        status_par = status_par.dim();
    }
    frame.render_widget(status_par, chunks[1]);

    let ratio = if np.progress_enabled {
        np.progress.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL))
        .gauge_style(Style::default().add_modifier(Modifier::BOLD))
        .ratio(ratio)
        .label(format!("{} / {}", np.elapsed, np.total));
    frame.render_widget(gauge, chunks[2]);

    match app.view() {
        Some(view) => draw_collection(frame, view, ui_settings, chunks[3]),
        None => {
            let hint = Paragraph::new("No list open. Start with `segue playlist <id>` or `segue album <id>`.")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title(" tracks "));
            frame.render_widget(hint, chunks[3]);
        }
    }

    let footer = Paragraph::new(controls_text(scrub_seconds))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[4]);
}

fn draw_collection(
    frame: &mut Frame,
    view: &CollectionView,
    ui: &UiSettings,
    area: ratatui::layout::Rect,
) {
    let total = view.tracks().len();
    let list_height = area.height.saturating_sub(2) as usize;
    let sel = view.selected();
    // Only build items for the visible window, centred on the selection.
    let (start, end) = if total <= list_height || list_height == 0 {
        (0, total)
    } else {
        let half = list_height / 2;
        let start = sel.saturating_sub(half).min(total - list_height);
        (start, start + list_height)
    };

    let playing = view.playing_row();
    let items: Vec<ListItem> = view.tracks()[start..end]
        .iter()
        .enumerate()
        .map(|(offset, track)| ListItem::new(row_text(track, ui, playing == Some(start + offset))))
        .collect();

    let title = format!(
        " {} · {}{} ",
        view.source().kind,
        view.source().name,
        if view.is_shuffled() { " · shuffled" } else { "" }
    );
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if total > 0 {
        state.select(Some(sel - start));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn controls_text_includes_scrub_step() {
        let text = controls_text(7);
        assert!(text.contains("[H/L] scrub -/+7s"));
        assert!(text.contains("[0-9] seek 0-90%"));
        assert!(text.starts_with("[j/k] up/down"));
        assert!(text.ends_with("[q] quit"));
    }

    #[test]
    fn volume_text_shows_muted_instead_of_level() {
        assert_eq!(volume_text("v", 0.5, false), "v 50%");
        assert_eq!(volume_text("m", 0.5, true), "m muted");
    }

    #[test]
    fn now_playing_text_joins_title_and_artist() {
        let ui = UiSettings::default();
        let mut np = NowPlaying::default();
        assert_eq!(now_playing_text(&np, &ui), "No track selected");
        np.title = "Song".into();
        np.artist = "Band".into();
        assert_eq!(now_playing_text(&np, &ui), format!("Song{}Band", ui.now_playing_separator));
    }

    #[test]
    fn row_text_marks_playing_row_and_falls_back() {
        let ui = UiSettings::default();
        let track = CollectionTrack {
            track_id: 1,
            track_title: None,
            artist_names: Some("  ".into()),
            track_duration: Some(61.0),
        };
        let text = row_text(&track, &ui, true);
        assert!(text.starts_with("♪ "));
        assert!(text.contains(&ui.unknown_title));
        assert!(text.contains(&ui.unknown_artist));
        assert!(text.ends_with("1:01"));
    }
}
