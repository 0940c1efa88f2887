use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;
use crate::audio::fake::FakeOutput;
use crate::audio::{ControllerSettings, PlaybackController, PlaybackState, SourceKind, SourceTag, Step};
use crate::catalog::{ArtistInfo, Collection, CollectionTrack, TrackDetail};
use crate::track::{TrackRef, UrlResolver};

fn controller() -> PlaybackController<FakeOutput> {
    PlaybackController::new(
        FakeOutput::default(),
        UrlResolver::new("https://cdn.test/music/", "music/"),
        ControllerSettings::default(),
    )
}

fn row(id: i64) -> CollectionTrack {
    CollectionTrack {
        track_id: id,
        track_title: Some(format!("Song {id}")),
        artist_names: Some("Band".into()),
        track_duration: Some(200.0),
    }
}

fn collection(ids: &[i64]) -> Collection {
    Collection {
        source: SourceTag::new(SourceKind::Playlist, 77, "Mix"),
        tracks: ids.iter().copied().map(row).collect(),
    }
}

fn detail(id: i64) -> TrackDetail {
    TrackDetail {
        track_id: id,
        track_title: Some(format!("Song {id}")),
        track_file: Some(format!("music/{id}.mp3")),
        artist_info: Some(ArtistInfo {
            artist_name: Some("Band".into()),
        }),
    }
}

fn opened(ids: &[i64]) -> (App, PlaybackController<FakeOutput>) {
    let mut app = App::new();
    let mut c = controller();
    app.open_collection(&mut c, collection(ids));
    (app, c)
}

#[test]
fn open_collection_starts_at_the_top() {
    let (app, _) = opened(&[1, 2, 3]);
    let view = app.view().unwrap();
    assert_eq!(view.selected(), 0);
    assert_eq!(view.tracks().len(), 3);
    assert_eq!(view.source().name, "Mix");
    assert!(view.playing_row().is_none());
    assert!(!view.is_started());
}

#[test]
fn selection_is_clamped() {
    let (mut app, _) = opened(&[1, 2]);
    let view = app.view_mut().unwrap();
    view.select_prev();
    assert_eq!(view.selected(), 0);
    view.select_next();
    view.select_next();
    view.select_next();
    assert_eq!(view.selected(), 1);
}

#[test]
fn play_selected_looks_up_then_plays_with_policy_installed() {
    let (mut app, mut c) = opened(&[10, 11, 12]);
    app.view_mut().unwrap().select_next();

    assert_eq!(app.play_selected(&mut c), Step::Lookup(11));
    assert!(c.has_policy());
    assert_eq!(c.source().map(|s| s.id), Some(77));
    assert_eq!(c.state(), PlaybackState::Idle);

    app.track_resolved(&mut c, &detail(11), true);
    assert_eq!(c.state(), PlaybackState::Playing);
    assert_eq!(c.current_track().and_then(|t| t.track_id), Some(11));
    assert_eq!(app.view().unwrap().playing_row(), Some(1));
}

#[test]
fn stale_detail_is_cached_but_not_played() {
    let (mut app, mut c) = opened(&[10, 11]);
    app.track_resolved(&mut c, &detail(10), false);
    assert_eq!(c.state(), PlaybackState::Idle);

    // cached now, so playing the row needs no lookup
    assert_eq!(app.play_selected(&mut c), Step::Advanced);
    assert_eq!(c.output().last_loaded(), Some("https://cdn.test/music/10.mp3"));
}

#[test]
fn installed_order_asks_for_the_next_row() {
    let (mut app, mut c) = opened(&[10, 11]);
    app.play_selected(&mut c);
    app.track_resolved(&mut c, &detail(10), true);

    assert_eq!(c.skip_forward(), Step::Lookup(11));
    app.track_resolved(&mut c, &detail(11), true);
    assert_eq!(c.current_track().and_then(|t| t.track_id), Some(11));

    // past the last row the view lets go of the controller
    c.output_mut().finished = true;
    assert_eq!(c.tick(), Some(Step::NoMore));
    assert!(!c.has_policy());
}

#[test]
fn shuffle_play_starts_with_first_shuffled_row() {
    let ids = [1, 2, 3, 4, 5, 6];
    let (mut app, mut c) = opened(&ids);
    let mut rng = StdRng::seed_from_u64(3);

    let step = app.shuffle_play(&mut c, &mut rng);
    let view = app.view().unwrap();
    assert!(view.is_shuffled());
    let first = view.order().0.borrow().order()[0];
    assert_eq!(step, Step::Lookup(ids[first]));
    assert_eq!(view.playing_row(), Some(first));
}

#[test]
fn play_selected_resets_shuffle() {
    let (mut app, mut c) = opened(&[1, 2, 3]);
    let mut rng = StdRng::seed_from_u64(9);
    app.shuffle_play(&mut c, &mut rng);
    app.play_selected(&mut c);
    assert!(!app.view().unwrap().is_shuffled());
}

#[test]
fn closing_a_playing_view_reconciles_the_queue() {
    let (mut app, mut c) = opened(&[1, 2, 3, 4]);
    for id in [1, 2, 4] {
        app.track_resolved(&mut c, &detail(id), false);
    }
    let view = app.view_mut().unwrap();
    view.select_next();
    view.select_next();
    view.select_next();
    assert_eq!(app.play_selected(&mut c), Step::Advanced);

    app.close_view(&mut c);
    assert!(app.view().is_none());
    assert!(!c.has_policy());

    let ids: Vec<_> = c.queue().iter().filter_map(|t: &TrackRef| t.track_id).collect();
    assert_eq!(ids, vec![1, 2, 4]);
    assert_eq!(c.cursor(), Some(2));

    // the controller's own queue takes over
    c.output_mut().finished = true;
    assert_eq!(c.tick(), Some(Step::NoMore));
}

#[test]
fn closing_an_idle_view_leaves_queue_alone() {
    let (mut app, mut c) = opened(&[1, 2]);
    c.set_queue(vec![TrackRef::new("music/x.mp3", "X", "Y")], 0);
    app.close_view(&mut c);
    assert_eq!(c.queue().len(), 1);
    assert_eq!(c.cursor(), Some(0));
}

#[test]
fn opening_another_collection_closes_the_first() {
    let (mut app, mut c) = opened(&[1]);
    app.track_resolved(&mut c, &detail(1), false);
    app.play_all(&mut c);
    assert!(c.has_policy());

    app.open_collection(&mut c, collection(&[5, 6]));
    assert!(!c.has_policy());
    assert_eq!(c.queue().len(), 1);
    assert_eq!(app.view().unwrap().tracks().len(), 2);
}

#[test]
fn prefetch_is_offered_once_after_playback_starts() {
    let (mut app, mut c) = opened(&[1, 2, 3]);
    assert!(app.take_prefetch().is_empty());

    app.track_resolved(&mut c, &detail(2), false);
    app.play_all(&mut c);
    assert_eq!(app.take_prefetch(), vec![1, 3]);
    assert!(app.take_prefetch().is_empty());
}

#[test]
fn resolved_detail_without_view_plays_directly() {
    let mut app = App::new();
    let mut c = controller();
    app.track_resolved(&mut c, &detail(8), true);
    assert_eq!(c.state(), PlaybackState::Playing);
    assert!(app.status.is_none());

    let broken = TrackDetail {
        track_file: None,
        ..detail(9)
    };
    app.track_resolved(&mut c, &broken, true);
    assert!(app.status.is_some());
    assert_eq!(c.current_track().and_then(|t| t.track_id), Some(8));
}
