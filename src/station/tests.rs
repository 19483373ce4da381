use super::*;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn t(id: &str) -> Track {
    Track {
        id: id.to_string(),
        title: id.to_string(),
        artist: None,
        album: None,
        genre: None,
        duration: Some(10),
        url: format!("https://example.org/{id}.aac"),
    }
}

fn ordered(repeat: bool) -> StationSettings {
    StationSettings {
        shuffle: false,
        repeat,
        ..StationSettings::default()
    }
}

#[test]
fn station_without_repeat_ends_the_queue() {
    let mut station = Station::new("test", vec![t("a"), t("b")], &ordered(false));
    assert_eq!(station.next_track().unwrap().id, "a");
    assert_eq!(station.next_track().unwrap().id, "b");
    assert_eq!(station.next_track(), Err(SourceError::EndOfQueue));
    assert_eq!(station.next_track(), Err(SourceError::EndOfQueue));
}

#[test]
fn station_with_repeat_starts_over() {
    let mut station = Station::new("test", vec![t("a"), t("b")], &ordered(true));
    let ids: Vec<String> = (0..5).map(|_| station.next_track().unwrap().id).collect();
    assert_eq!(ids, vec!["a", "b", "a", "b", "a"]);
}

#[test]
fn shuffled_station_plays_every_track_once_per_round() {
    let tracks: Vec<Track> = (0..20).map(|i| t(&i.to_string())).collect();
    let settings = StationSettings {
        shuffle: true,
        repeat: false,
        ..StationSettings::default()
    };
    let mut station = Station::new("test", tracks, &settings);
    let seen: HashSet<String> = (0..20).map(|_| station.next_track().unwrap().id).collect();
    assert_eq!(seen.len(), 20);
    assert!(station.next_track().is_err());
}

#[test]
fn empty_station_reports_end_of_queue() {
    let mut station = Station::new("empty", Vec::new(), &ordered(true));
    assert_eq!(station.next_track(), Err(SourceError::EndOfQueue));
}

#[test]
fn down_vote_drops_the_track_from_the_rotation() {
    let mut station = Station::new("test", vec![t("a"), t("b"), t("c")], &ordered(true));
    let a = station.next_track().unwrap();
    station.vote(&a, Vote::Down).unwrap();
    assert_eq!(station.len(), 2);

    let ids: Vec<String> = (0..4).map(|_| station.next_track().unwrap().id).collect();
    assert_eq!(ids, vec!["b", "c", "b", "c"]);
}

#[test]
fn down_vote_on_an_upcoming_track_keeps_the_order() {
    let mut station = Station::new("test", vec![t("a"), t("b"), t("c")], &ordered(false));
    assert_eq!(station.next_track().unwrap().id, "a");
    station.vote(&t("b"), Vote::Down).unwrap();
    assert_eq!(station.next_track().unwrap().id, "c");
    assert_eq!(station.next_track(), Err(SourceError::EndOfQueue));
}

#[test]
fn up_vote_and_unknown_tracks_leave_the_station_alone() {
    let mut station = Station::new("test", vec![t("a"), t("b")], &ordered(false));
    let a = station.next_track().unwrap();
    station.vote(&a, Vote::Up).unwrap();
    station.vote(&t("zz"), Vote::Down).unwrap();
    assert_eq!(station.len(), 2);
    assert_eq!(station.next_track().unwrap().id, "b");
}

#[test]
fn down_voting_every_track_empties_the_station() {
    let mut station = Station::new("test", vec![t("a")], &ordered(true));
    let a = station.next_track().unwrap();
    station.vote(&a, Vote::Down).unwrap();
    assert_eq!(station.next_track(), Err(SourceError::EndOfQueue));
}

#[test]
fn sources_ignore_votes_unless_they_handle_them() {
    struct Fixed;
    impl TrackSource for Fixed {
        fn next_track(&mut self) -> Result<Track, SourceError> {
            Ok(t("a"))
        }
        fn name(&self) -> &str {
            "fixed"
        }
    }

    let mut source = Fixed;
    assert_eq!(source.vote(&t("a"), Vote::Down), Ok(()));
    assert_eq!(source.next_track().unwrap().id, "a");
}

#[test]
fn station_file_parses_tracks_and_name() {
    let file = parse_station_file(
        r#"
name = "Late night"

[[track]]
id = "1024"
title = "So What"
artist = "Miles Davis"
album = "Kind of Blue"
genre = "Jazz"
duration = 562
url = "https://example.org/stream/1024.aac"

[[track]]
id = "1025"
title = "Untitled"
url = "https://example.org/stream/1025.aac"
"#,
        Path::new("late.toml"),
    )
    .unwrap();

    assert_eq!(file.name.as_deref(), Some("Late night"));
    assert_eq!(file.tracks.len(), 2);
    assert_eq!(file.tracks[0].artist.as_deref(), Some("Miles Davis"));
    assert_eq!(file.tracks[0].duration, Some(562));
    assert_eq!(file.tracks[1].artist, None);
    assert_eq!(file.tracks[1].duration, None);
}

#[test]
fn station_file_without_url_is_rejected() {
    let err = parse_station_file(
        r#"
[[track]]
id = "1"
title = "No url"
"#,
        Path::new("bad.toml"),
    )
    .unwrap_err();
    assert!(matches!(err, StationError::Toml { .. }));
}

#[test]
fn open_reads_station_file_from_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("jazz.toml");
    fs::write(
        &path,
        r#"
[[track]]
id = "1"
title = "One"
url = "https://example.org/1.aac"
"#,
    )
    .unwrap();

    let mut station = Station::open(&path, &ordered(false)).unwrap();
    assert_eq!(station.len(), 1);
    assert_eq!(station.name(), path.display().to_string());
    assert_eq!(station.next_track().unwrap().url, "https://example.org/1.aac");
}

#[test]
fn open_rejects_missing_and_empty_stations() {
    let dir = tempdir().unwrap();
    assert!(matches!(
        Station::open(&dir.path().join("missing.toml"), &ordered(false)),
        Err(StationError::Io { .. })
    ));
    assert!(matches!(
        Station::open(dir.path(), &ordered(false)),
        Err(StationError::Empty(_))
    ));
}

#[test]
fn scan_filters_non_audio_and_sorts_by_path() {
    let dir = tempdir().unwrap();

    fs::write(dir.path().join("b.MP3"), b"not a real mp3").unwrap();
    fs::write(dir.path().join("A.ogg"), b"not a real ogg").unwrap();
    fs::write(dir.path().join("c.txt"), b"ignore me").unwrap();

    let tracks = scan(dir.path(), &StationSettings::default());
    assert_eq!(tracks.len(), 2);
    assert_eq!(tracks[0].title, "A");
    assert_eq!(tracks[0].id, "A.ogg");
    assert_eq!(tracks[1].title, "b");
    assert!(tracks[1].url.ends_with("b.MP3"));
    assert_eq!(tracks[1].duration, None);
}

#[test]
fn scan_skips_hidden_by_default() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(".hidden.mp3"), b"not real").unwrap();
    fs::write(dir.path().join("visible.mp3"), b"not real").unwrap();

    let tracks = scan(dir.path(), &StationSettings::default());
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].title, "visible");

    let settings = StationSettings {
        include_hidden: true,
        ..StationSettings::default()
    };
    assert_eq!(scan(dir.path(), &settings).len(), 2);
}

#[test]
fn scan_respects_recursive_false_and_max_depth() {
    let dir = tempdir().unwrap();
    let d1 = dir.path().join("d1");
    let d2 = d1.join("d2");
    fs::create_dir_all(&d2).unwrap();
    fs::write(dir.path().join("root.mp3"), b"not real").unwrap();
    fs::write(d1.join("one.mp3"), b"not real").unwrap();
    fs::write(d2.join("two.mp3"), b"not real").unwrap();

    let flat = StationSettings {
        recursive: false,
        ..StationSettings::default()
    };
    let names: Vec<String> = scan(dir.path(), &flat).into_iter().map(|t| t.title).collect();
    assert_eq!(names, vec!["root".to_string()]);

    // WalkDir depth counts root as 0, children as 1, grandchildren as 2.
    let capped = StationSettings {
        max_depth: Some(2),
        ..StationSettings::default()
    };
    let names: Vec<String> = scan(dir.path(), &capped).into_iter().map(|t| t.title).collect();
    assert!(names.contains(&"root".to_string()));
    assert!(names.contains(&"one".to_string()));
    assert!(!names.contains(&"two".to_string()));
}

#[test]
fn missing_local_files_are_skipped() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.mp3"), b"not real").unwrap();
    fs::write(dir.path().join("b.mp3"), b"not real").unwrap();

    let mut station = Station::open(dir.path(), &ordered(true)).unwrap();
    fs::remove_file(dir.path().join("a.mp3")).unwrap();

    assert_eq!(station.next_track().unwrap().title, "b");
    assert_eq!(station.next_track().unwrap().title, "b");
}

#[test]
fn station_with_no_files_left_is_unavailable() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.mp3"), b"not real").unwrap();

    let mut station = Station::open(dir.path(), &ordered(true)).unwrap();
    fs::remove_file(dir.path().join("a.mp3")).unwrap();

    assert!(matches!(
        station.next_track(),
        Err(SourceError::Unavailable(_))
    ));
}
