use super::metadata::resolve;
use super::model::UNKNOWN_ARTIST;
use super::scan::{is_audio_file, scan_dir};
use super::*;
use crate::config::LibrarySettings;
use crate::error::PlayerError;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

#[test]
fn is_audio_file_matches_configured_extensions_case_insensitive() {
    let settings = LibrarySettings::default();
    assert!(is_audio_file(Path::new("/tmp/a.mp3"), &settings));
    assert!(is_audio_file(Path::new("/tmp/a.MP3"), &settings));
    assert!(is_audio_file(Path::new("/tmp/a.flac"), &settings));
    assert!(is_audio_file(Path::new("/tmp/a.ogg"), &settings));
    assert!(!is_audio_file(Path::new("/tmp/a.txt"), &settings));
    assert!(!is_audio_file(Path::new("/tmp/a"), &settings));
}

#[test]
fn describe_falls_back_to_file_stem_and_unknown_artist() {
    let dir = tempdir().unwrap();
    let p = dir.path().join("My Song.mp3");
    fs::write(&p, b"not a real mp3").unwrap();

    let t = describe(&p);
    assert_eq!(t.title(), "My Song");
    assert_eq!(t.artist(), UNKNOWN_ARTIST);
    assert_eq!(t.path(), p.as_path());
}

#[test]
fn resolve_reports_unreadable_metadata() {
    let dir = tempdir().unwrap();
    let p = dir.path().join("garbage.mp3");
    fs::write(&p, b"nope").unwrap();

    match resolve(&p) {
        Err(PlayerError::MetadataUnreadable { path, .. }) => assert_eq!(path, p),
        other => panic!("expected MetadataUnreadable, got {other:?}"),
    }
}

#[test]
fn track_ref_uri_and_search_match() {
    let t = TrackRef::new("/music/a b.mp3", "Blackened", "Metallica");
    assert_eq!(t.uri(), "file:///music/a b.mp3");
    assert!(t.matches(""));
    assert!(t.matches("black"));
    assert!(t.matches("metal"));
    assert!(!t.matches("sabbath"));
}

#[test]
fn scan_dir_filters_non_audio_and_hidden() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("b.MP3"), b"x").unwrap();
    fs::write(dir.path().join("a.ogg"), b"x").unwrap();
    fs::write(dir.path().join("c.txt"), b"x").unwrap();
    fs::write(dir.path().join(".hidden.mp3"), b"x").unwrap();

    let files = scan_dir(dir.path(), &LibrarySettings::default());
    let names: Vec<String> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["a.ogg".to_string(), "b.MP3".to_string()]);
}

#[test]
fn scan_dir_respects_recursive_false() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("root.mp3"), b"x").unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir_all(&sub).unwrap();
    fs::write(sub.join("child.mp3"), b"x").unwrap();

    let settings = LibrarySettings {
        recursive: false,
        ..LibrarySettings::default()
    };
    let files = scan_dir(dir.path(), &settings);
    assert_eq!(files, vec![dir.path().join("root.mp3")]);
}

#[test]
fn expand_paths_keeps_argument_order_and_skips_missing() {
    let dir = tempdir().unwrap();
    let album = dir.path().join("album");
    fs::create_dir_all(&album).unwrap();
    fs::write(album.join("01.mp3"), b"x").unwrap();
    fs::write(album.join("02.mp3"), b"x").unwrap();
    let single = dir.path().join("single.wav");
    fs::write(&single, b"x").unwrap();

    let files = expand_paths(
        &[single.clone(), PathBuf::from("/definitely/missing.mp3"), album.clone()],
        &LibrarySettings::default(),
    );
    assert_eq!(files, vec![single, album.join("01.mp3"), album.join("02.mp3")]);
}
