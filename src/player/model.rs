/// Transport state of the player.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Paused,
    Playing,
}

/// Point-in-time copy of the transport, for display and tests.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportSnapshot {
    pub current_index: Option<usize>,
    pub state: PlaybackState,
    pub volume: f64,
    pub muted: bool,
    pub volume_before_mute: f64,
    pub duration_secs: f64,
    pub position_secs: f64,
}
