use crate::backend::{NANOS_PER_SEC, secs_to_nanos};

/// Render a backend time as `MM:SS`; `"00:00"` for zero.
///
/// Minutes are not wrapped into hours.
pub fn format_time(nanos: u64) -> String {
    if nanos == 0 {
        return "00:00".to_string();
    }
    let secs = nanos / NANOS_PER_SEC;
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

pub fn format_secs(secs: f64) -> String {
    format_time(secs_to_nanos(secs))
}

/// Volume indicator category.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum VolumeIcon {
    Muted,
    Low,
    Medium,
    High,
}

impl VolumeIcon {
    pub fn for_volume(volume: f64, muted: bool) -> Self {
        if muted || volume <= 0.0 {
            VolumeIcon::Muted
        } else if volume < 0.3 {
            VolumeIcon::Low
        } else if volume < 0.7 {
            VolumeIcon::Medium
        } else {
            VolumeIcon::High
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            VolumeIcon::Muted => "🔇",
            VolumeIcon::Low => "🔈",
            VolumeIcon::Medium => "🔉",
            VolumeIcon::High => "🔊",
        }
    }
}
