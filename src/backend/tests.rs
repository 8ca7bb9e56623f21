use super::player::PlaybackInfo;
use super::*;
use std::time::{Duration, Instant};

#[test]
fn time_conversions_round_trip_whole_seconds() {
    assert_eq!(secs_to_nanos(2.5), 2_500_000_000);
    assert_eq!(secs_to_nanos(-3.0), 0);
    assert_eq!(nanos_to_secs(1_500_000_000), 1.5);
    assert_eq!(duration_to_nanos(Duration::from_millis(1200)), 1_200_000_000);
}

#[test]
fn playback_info_position_adds_running_time() {
    let mut info = PlaybackInfo {
        accumulated: Duration::from_secs(10),
        ..PlaybackInfo::default()
    };
    assert_eq!(info.position(), Duration::from_secs(10));

    info.started_at = Some(Instant::now() - Duration::from_secs(2));
    assert!(info.position() >= Duration::from_secs(12));
}

#[test]
fn detached_backend_never_reports_progress() {
    let mut b = DetachedBackend;
    b.set_source("file:///tmp/x.mp3");
    b.set_state(BackendState::Playing);
    assert_eq!(b.state(), BackendState::Stopped);
    assert_eq!(b.query_duration(), None);
    assert_eq!(b.query_position(), None);
}

#[test]
fn boxed_backend_forwards_calls() {
    let mut b: Box<dyn MediaBackend> = Box::new(DetachedBackend);
    b.set_volume(0.5);
    assert_eq!(b.state(), BackendState::Stopped);
    assert_eq!(b.query_duration(), None);
}

#[test]
fn detached_backend_has_no_source_serial() {
    let mut b = DetachedBackend;
    b.set_source("file:///tmp/x.mp3");
    assert_eq!(b.source_serial(), 0);
}
