//! Playback configuration

use crate::types::LatLng;
use std::time::Duration;

/// Delay between two consecutive reveals
pub const DEFAULT_REVEAL_DELAY: Duration = Duration::from_millis(100);
/// Zoom used while the view follows the newest marker
pub const DEFAULT_FOLLOW_ZOOM: u8 = 10;
pub const DEFAULT_INITIAL_ZOOM: u8 = 12;
pub const DEFAULT_INITIAL_CENTER: LatLng = LatLng {
    latitude: 51.40712,
    longitude: 4.75869,
};

/// Unit carried by the export's `timestampMs` field
///
/// Defaults to milliseconds, as the field name says. The web map this
/// playback mirrors fed the value to `setUTCSeconds`; `Seconds` reproduces
/// the dates it showed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimestampUnit {
    #[default]
    Milliseconds,
    Seconds,
}

/// Options controlling playback
#[derive(Debug, Clone)]
pub struct PlaybackOptions {
    pub reveal_delay: Duration,
    pub follow_zoom: u8,
    pub initial_center: LatLng,
    pub initial_zoom: u8,
    /// Fit the view to the whole trail once the last reveal fires
    pub fit_on_complete: bool,
    pub timestamp_unit: TimestampUnit,
}

impl Default for PlaybackOptions {
    fn default() -> Self {
        Self {
            reveal_delay: DEFAULT_REVEAL_DELAY,
            follow_zoom: DEFAULT_FOLLOW_ZOOM,
            initial_center: DEFAULT_INITIAL_CENTER,
            initial_zoom: DEFAULT_INITIAL_ZOOM,
            fit_on_complete: true,
            timestamp_unit: TimestampUnit::Milliseconds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playback_defaults() {
        let options = PlaybackOptions::default();
        assert_eq!(options.reveal_delay, Duration::from_millis(100));
        assert_eq!(options.follow_zoom, 10);
        assert_eq!(options.initial_zoom, 12);
        assert!(options.fit_on_complete);
        assert_eq!(options.timestamp_unit, TimestampUnit::Milliseconds);
    }
}
