use crate::player::VolumeIcon;

/// Display commands issued by the player core.
///
/// The core never reads anything back; the terminal view stores what it
/// is told and draws it on the next frame.
pub trait UiSink {
    fn set_position_label(&mut self, text: &str);
    fn set_duration_label(&mut self, text: &str);
    fn set_slider_range(&mut self, min: f64, max: f64);
    fn set_slider_value(&mut self, value: f64);
    /// `true` shows the pause glyph, `false` the start glyph.
    fn set_play_icon(&mut self, playing: bool);
    fn set_now_playing(&mut self, title: &str, artist: &str);
    /// Replace only the displayed title (stream/tag metadata).
    fn set_title(&mut self, title: &str);
    fn show_toast(&mut self, text: &str);
    fn set_mute_icon(&mut self, icon: VolumeIcon);
    fn set_volume_slider(&mut self, volume: f64);
    /// Persistent status line; `None` clears it.
    fn set_status(&mut self, text: Option<&str>);
    fn set_transport_enabled(&mut self, enabled: bool);
}
