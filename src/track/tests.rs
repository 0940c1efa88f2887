use super::url::local_path;
use super::*;

fn resolver() -> UrlResolver {
    UrlResolver::new("https://cdn.example.org/storage/music/", "music/")
}

#[test]
fn resolve_strips_prefix_and_prepends_base() {
    assert_eq!(
        resolver().resolve("music/000/123.mp3").as_deref(),
        Some("https://cdn.example.org/storage/music/000/123.mp3")
    );
}

#[test]
fn resolve_keeps_paths_without_prefix() {
    assert_eq!(
        resolver().resolve("000/123.mp3").as_deref(),
        Some("https://cdn.example.org/storage/music/000/123.mp3")
    );
}

#[test]
fn resolve_is_idempotent_for_absolute_urls() {
    let r = resolver();
    let once = r.resolve("music/a.mp3").unwrap();
    assert_eq!(r.resolve(&once).as_deref(), Some(once.as_str()));
    assert_eq!(
        r.resolve("/home/me/a.flac").as_deref(),
        Some("/home/me/a.flac")
    );
}

#[test]
fn resolve_rejects_blank_urls() {
    assert_eq!(resolver().resolve(""), None);
    assert_eq!(resolver().resolve("   "), None);
}

#[test]
fn base_without_trailing_slash_is_joined_cleanly() {
    let r = UrlResolver::new("https://cdn.example.org/m", "music/");
    assert_eq!(
        r.resolve("music/x.mp3").as_deref(),
        Some("https://cdn.example.org/m/x.mp3")
    );
}

#[test]
fn local_path_detects_files() {
    assert_eq!(local_path("file:///tmp/a.mp3"), Some("/tmp/a.mp3"));
    assert_eq!(local_path("/tmp/a.mp3"), Some("/tmp/a.mp3"));
    assert_eq!(local_path("https://x/a.mp3"), None);
}

#[test]
fn display_fields_fall_back_when_blank() {
    let t = TrackRef {
        url: "music/a.mp3".into(),
        title: Some("  ".into()),
        artist: None,
        track_id: None,
    };
    assert_eq!(t.display_title("Unknown title"), "Unknown title");
    assert_eq!(t.display_artist("Unknown artist"), "Unknown artist");

    let t = TrackRef::new("music/a.mp3", "Song", "Band");
    assert_eq!(t.display_title("?"), "Song");
    assert_eq!(t.display_artist("?"), "Band");
}

#[test]
fn track_ref_serializes_with_camel_case_id() {
    let t = TrackRef::new("music/a.mp3", "Song", "Band").with_id(42);
    let json = serde_json::to_value(&t).unwrap();
    assert_eq!(json["trackId"], 42);
    assert_eq!(json["url"], "music/a.mp3");

    let back: TrackRef = serde_json::from_value(json).unwrap();
    assert_eq!(back, t);
}
