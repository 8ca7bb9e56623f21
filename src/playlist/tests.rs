use super::*;
use crate::backend::BackendState;
use crate::config::Preferences;
use crate::error::PlayerError;
use crate::library::TrackRef;
use crate::player::testing::{FakeBackend, Recorder};
use crate::player::{Coordinator, PlaybackState};
use crate::tasks::{Scheduled, Task, Tasks};
use crate::ui::View;

fn t(title: &str) -> TrackRef {
    TrackRef::new(format!("/music/{title}.flac"), title, "Band")
}

struct Rig {
    tracker: Tracker,
    coord: Coordinator<FakeBackend>,
    recorder: Recorder,
    tasks: Tasks,
    view: View,
    prefs: Preferences,
}

impl Rig {
    fn new() -> Self {
        let (backend, recorder) = FakeBackend::new();
        let coord = Coordinator::new(backend, 1.0);
        recorder.clear();
        Self {
            tracker: Tracker::new(),
            coord,
            recorder,
            tasks: Tasks::default(),
            view: View::default(),
            prefs: Preferences {
                autoplay: false,
                ..Preferences::default()
            },
        }
    }

    fn with(titles: &[&str]) -> Self {
        let mut rig = Self::new();
        for title in titles {
            rig.append(t(title));
        }
        rig
    }

    fn append(&mut self, track: TrackRef) {
        self.tracker
            .append(track, &self.prefs, &mut self.tasks, &mut self.view);
    }

    fn activate(&mut self, index: usize) -> Result<(), PlayerError> {
        self.tracker
            .activate(index, &mut self.coord, &mut self.tasks, &mut self.view)
    }

    fn next(&mut self) {
        self.tracker
            .next(&mut self.coord, &mut self.tasks, &mut self.view)
            .unwrap();
    }

    fn previous(&mut self) {
        self.tracker
            .previous(&mut self.coord, &mut self.tasks, &mut self.view)
            .unwrap();
    }

    fn remove(&mut self, indices: &[usize]) -> usize {
        self.tracker
            .remove_set(indices, &mut self.coord, &mut self.view)
    }

    fn titles(&self) -> Vec<String> {
        self.tracker
            .playlist()
            .iter()
            .map(|t| t.title().to_string())
            .collect()
    }
}

#[test]
fn append_keeps_current_none_without_autoplay() {
    let mut rig = Rig::with(&["a", "b", "c"]);
    assert_eq!(rig.tracker.current(), None);
    assert_eq!(rig.tracker.playlist().len(), 3);
    assert!(rig.tasks.pending().is_empty());
    assert!(rig.recorder.sources().is_empty());

    rig.activate(2).unwrap();
    rig.append(t("d"));
    assert_eq!(rig.tracker.current(), Some(2));
}

#[test]
fn duplicates_are_allowed() {
    let rig = Rig::with(&["same", "same"]);
    assert_eq!(rig.titles(), vec!["same", "same"]);
}

#[test]
fn autoplay_queues_one_idle_activation() {
    let mut rig = Rig::new();
    rig.prefs.autoplay = true;
    rig.append(t("first"));
    rig.append(t("second"));

    // Nothing starts synchronously.
    assert!(rig.recorder.sources().is_empty());
    assert_eq!(rig.tracker.current(), None);
    assert_eq!(
        rig.tasks.drain(),
        vec![Scheduled {
            task: Task::Activate(0),
            delay: None,
        }]
    );
    assert_eq!(rig.view.toasts().last(), Some("Auto-playing: first"));

    rig.activate(0).unwrap();
    assert_eq!(rig.recorder.sources().len(), 1);
    assert_eq!(rig.tracker.current(), Some(0));
}

#[test]
fn autoplay_skipped_when_playlist_was_not_empty() {
    let mut rig = Rig::with(&["a"]);
    rig.prefs.autoplay = true;
    rig.append(t("b"));
    assert!(rig.tasks.pending().is_empty());
}

#[test]
fn activate_loads_and_schedules_duration_poll() {
    let mut rig = Rig::with(&["a", "b"]);
    rig.activate(1).unwrap();

    assert_eq!(rig.tracker.current(), Some(1));
    assert_eq!(rig.coord.state(), PlaybackState::Playing);
    assert_eq!(rig.recorder.sources(), vec!["file:///music/b.flac".to_string()]);
    assert_eq!(rig.view.title, "b");
    assert_eq!(rig.view.artist, "Band");

    let scheduled = rig.tasks.drain();
    assert_eq!(scheduled.len(), 1);
    assert_eq!(scheduled[0].delay, Some(crate::tasks::DURATION_POLL_INTERVAL));
    assert!(matches!(
        scheduled[0].task,
        Task::PollDuration(p) if p.generation == rig.coord.generation()
    ));
}

#[test]
fn activate_out_of_range_changes_nothing() {
    let mut rig = Rig::with(&["a"]);
    rig.activate(0).unwrap();
    rig.tasks.drain();
    rig.recorder.clear();

    let err = rig.activate(5).unwrap_err();
    assert!(matches!(err, PlayerError::InvalidIndex { index: 5, len: 1 }));
    assert_eq!(rig.tracker.current(), Some(0));
    assert!(rig.recorder.calls().is_empty());
    assert!(rig.tasks.pending().is_empty());
}

#[test]
fn activate_refused_without_output_device() {
    let mut rig = Rig::with(&["a"]);
    rig.coord.mark_unavailable("no device".into(), &mut rig.view);
    assert!(matches!(
        rig.activate(0),
        Err(PlayerError::BackendUnavailable(_))
    ));
    assert_eq!(rig.tracker.current(), None);
    assert!(rig.recorder.sources().is_empty());
}

#[test]
fn next_and_previous_do_not_wrap() {
    let mut rig = Rig::with(&["a", "b", "c"]);

    // Nothing active: both are no-ops.
    rig.next();
    rig.previous();
    assert_eq!(rig.tracker.current(), None);
    assert!(rig.recorder.sources().is_empty());

    rig.activate(0).unwrap();
    rig.previous();
    assert_eq!(rig.tracker.current(), Some(0));

    rig.next();
    rig.next();
    assert_eq!(rig.tracker.current(), Some(2));
    rig.recorder.clear();
    rig.next();
    assert_eq!(rig.tracker.current(), Some(2));
    assert!(rig.recorder.calls().is_empty());

    rig.previous();
    assert_eq!(rig.tracker.current(), Some(1));
}

#[test]
fn removing_active_row_stops_and_clears() {
    let mut rig = Rig::with(&["a", "b", "c"]);
    rig.activate(1).unwrap();

    assert_eq!(rig.remove(&[1]), 1);

    assert_eq!(rig.tracker.current(), None);
    assert_eq!(rig.coord.state(), PlaybackState::Stopped);
    assert_eq!(rig.recorder.state(), BackendState::Stopped);
    assert_eq!(rig.view.title, crate::ui::NO_SONG_TITLE);
    assert_eq!(rig.view.artist, crate::ui::NO_SONG_ARTIST);
    assert_eq!(rig.view.toasts().last(), Some("Removed 1 song"));
    assert_eq!(rig.titles(), vec!["a", "c"]);
}

#[test]
fn removing_rows_below_current_shifts_it() {
    let mut rig = Rig::with(&["a", "b", "c", "d", "e"]);
    rig.activate(3).unwrap();
    rig.recorder.clear();

    assert_eq!(rig.remove(&[0, 2, 4]), 3);

    assert_eq!(rig.tracker.current(), Some(1));
    assert_eq!(rig.tracker.current_track().unwrap().title(), "d");
    assert_eq!(rig.coord.state(), PlaybackState::Playing);
    assert!(rig.recorder.calls().is_empty());
    assert_eq!(rig.view.toasts().last(), Some("Removed 3 songs"));
}

#[test]
fn removing_first_row_while_second_plays() {
    let mut rig = Rig::with(&["a", "b"]);
    rig.activate(1).unwrap();
    rig.remove(&[0]);
    assert_eq!(rig.tracker.current(), Some(0));
    assert_eq!(rig.coord.state(), PlaybackState::Playing);
}

#[test]
fn remove_ignores_duplicates_and_out_of_range() {
    let mut rig = Rig::with(&["a", "b", "c"]);
    assert_eq!(rig.remove(&[2, 2, 9, 0]), 2);
    assert_eq!(rig.titles(), vec!["b"]);
    assert_eq!(rig.remove(&[7]), 0);
    assert_eq!(rig.titles(), vec!["b"]);
}

#[test]
fn end_of_stream_advances() {
    let mut rig = Rig::with(&["a", "b"]);
    rig.activate(0).unwrap();
    rig.tracker
        .end_of_stream(&mut rig.coord, &mut rig.tasks, &mut rig.view)
        .unwrap();
    assert_eq!(rig.tracker.current(), Some(1));
    assert_eq!(rig.coord.state(), PlaybackState::Playing);
    assert_eq!(rig.recorder.sources().len(), 2);
}

#[test]
fn end_of_stream_at_last_row_stops_in_place() {
    let mut rig = Rig::with(&["a", "b"]);
    rig.activate(1).unwrap();
    rig.tracker
        .end_of_stream(&mut rig.coord, &mut rig.tasks, &mut rig.view)
        .unwrap();
    assert_eq!(rig.tracker.current(), Some(1));
    assert_eq!(rig.coord.state(), PlaybackState::Stopped);
    assert!(!rig.view.playing);
}

#[test]
fn play_pressed_starts_first_row_then_toggles() {
    let mut rig = Rig::new();
    rig.tracker
        .play_pressed(&mut rig.coord, &mut rig.tasks, &mut rig.view)
        .unwrap();
    assert!(rig.recorder.sources().is_empty());

    rig.append(t("a"));
    rig.tracker
        .play_pressed(&mut rig.coord, &mut rig.tasks, &mut rig.view)
        .unwrap();
    assert_eq!(rig.tracker.current(), Some(0));
    assert_eq!(rig.coord.state(), PlaybackState::Playing);

    rig.tracker
        .play_pressed(&mut rig.coord, &mut rig.tasks, &mut rig.view)
        .unwrap();
    assert_eq!(rig.coord.state(), PlaybackState::Paused);
    assert_eq!(rig.recorder.sources().len(), 1);
}

#[test]
fn search_filters_title_and_artist() {
    let mut pl = Playlist::default();
    pl.push(TrackRef::new("/a.mp3", "Paranoid", "Black Sabbath"));
    pl.push(TrackRef::new("/b.mp3", "Blackened", "Metallica"));
    pl.push(TrackRef::new("/c.mp3", "Hurt", "Johnny Cash"));

    assert_eq!(pl.visible_indices(), vec![0, 1, 2]);
    pl.set_query("BLACK");
    assert_eq!(pl.visible_indices(), vec![0, 1]);
    pl.set_query("  cash ");
    assert_eq!(pl.visible_indices(), vec![2]);
    pl.set_query("");
    assert_eq!(pl.visible_indices(), vec![0, 1, 2]);
}

#[test]
fn hidden_rows_lose_selection() {
    let mut pl = Playlist::default();
    pl.push(t("alpha"));
    pl.push(t("beta"));
    pl.select_all_visible();
    assert_eq!(pl.selected(), vec![0, 1]);

    pl.set_query("alp");
    assert_eq!(pl.selected(), vec![0]);

    // Hidden rows cannot be toggled back in.
    pl.toggle_selected(1);
    assert!(!pl.is_selected(1));
    pl.toggle_selected(0);
    assert!(pl.selected().is_empty());
}

#[test]
fn selection_follows_tracks_after_removal() {
    let mut rig = Rig::with(&["a", "b", "c", "d"]);
    rig.tracker.playlist_mut().toggle_selected(1);
    rig.tracker.playlist_mut().toggle_selected(3);

    rig.remove(&[0]);
    assert_eq!(rig.tracker.playlist().selected(), vec![0, 2]);

    let selected = rig.tracker.playlist().selected();
    rig.remove(&selected);
    assert_eq!(rig.titles(), vec!["c"]);
    assert!(rig.tracker.playlist().selected().is_empty());
}
