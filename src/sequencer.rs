//! Staggered one-at-a-time marker reveal
//!
//! `start` schedules one reveal per record on the shared [`Timeline`]; each
//! reveal, when it fires, decodes its record, drops a marker, links it to the
//! previously revealed marker and pans the view onto it.

use crate::codec::{decode_position, DecodedPosition};
use crate::config::{PlaybackOptions, TimestampUnit};
use crate::error::TrailError;
use crate::info::build_info_html;
use crate::scheduler::{Generation, ScheduledReveal, Timeline};
use crate::store::{Advance, LocationStore};
use crate::surface::{ArrivalAnimation, MapSurface, MarkerHandle};
use crate::types::{LocationRecord, LocationSequence};
use std::time::Duration;

/// What `start` queued
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealPlan {
    pub generation: Generation,
    pub scheduled: usize,
    pub last_due: Option<Duration>,
}

/// A record that made it onto the map
#[derive(Debug, Clone)]
pub struct RevealedMarker {
    pub index: usize,
    pub handle: MarkerHandle,
    pub record: LocationRecord,
    pub position: DecodedPosition,
    pub info_html: String,
}

/// A record whose reveal was skipped
#[derive(Debug)]
pub struct RevealFailure {
    pub index: usize,
    pub error: TrailError,
}

/// Result of one fired reveal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealOutcome {
    Revealed { index: usize, handle: MarkerHandle },
    /// The record could not be decoded; later reveals are unaffected
    Skipped { index: usize },
    /// Task belonged to an earlier generation and was ignored
    Stale,
    /// Nothing left to reveal
    Exhausted,
}

#[derive(Debug)]
pub struct MarkerSequencer {
    generation: Generation,
    reveal_delay: Duration,
    follow_zoom: u8,
    timestamp_unit: TimestampUnit,
    markers: Vec<RevealedMarker>,
    failures: Vec<RevealFailure>,
}

impl MarkerSequencer {
    pub fn new(options: &PlaybackOptions) -> Self {
        Self {
            generation: Generation::default(),
            reveal_delay: options.reveal_delay,
            follow_zoom: options.follow_zoom,
            timestamp_unit: options.timestamp_unit,
            markers: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Cancel any earlier schedule, load `sequence` and queue its reveals
    ///
    /// Record `i` comes due at `i * reveal_delay` from now. An empty sequence
    /// schedules nothing.
    pub fn start(
        &mut self,
        sequence: LocationSequence,
        store: &mut LocationStore,
        timeline: &mut Timeline,
    ) -> RevealPlan {
        self.generation = timeline.begin_generation();
        self.markers.clear();
        self.failures.clear();

        let count = sequence.len();
        store.load(sequence);
        let last_due = timeline.schedule_reveals(self.generation, count, self.reveal_delay);

        if count == 0 {
            log::info!("Empty location sequence, nothing to reveal");
        } else {
            log::info!(
                "Scheduled {} reveal(s) every {:?} under {}",
                count,
                self.reveal_delay,
                self.generation
            );
        }

        RevealPlan {
            generation: self.generation,
            scheduled: count,
            last_due,
        }
    }

    /// Run one fired reveal against the surface
    pub fn reveal<S: MapSurface + ?Sized>(
        &mut self,
        task: ScheduledReveal,
        store: &mut LocationStore,
        surface: &mut S,
    ) -> RevealOutcome {
        if task.generation != self.generation {
            log::trace!("Ignoring reveal {} of stale {}", task.index, task.generation);
            return RevealOutcome::Stale;
        }

        let (index, record) = match store.next() {
            Advance::Record { index, record } => (index, record.clone()),
            Advance::End => return RevealOutcome::Exhausted,
        };
        if index != task.index {
            log::warn!(
                "Reveal task {} fired with cursor at {}, revealing in cursor order",
                task.index,
                index
            );
        }

        let position = match decode_position(&record) {
            Ok(position) => position,
            Err(error) => {
                log::warn!("Skipping record {}: {}", index, error);
                self.failures.push(RevealFailure { index, error });
                return RevealOutcome::Skipped { index };
            }
        };

        let lat_lng = position.lat_lng();
        store.push_revealed(lat_lng);

        let handle = surface.create_marker(lat_lng, Some(ArrivalAnimation::Drop));
        if let Some(previous) = self.markers.last() {
            surface.create_path_segment(previous.handle, handle);
        }
        surface.pan_and_zoom_to(lat_lng, self.follow_zoom);

        log::debug!(
            "Revealed record {} at {}, {} as {}",
            index,
            position.latitude.text,
            position.longitude.text,
            handle
        );

        let info_html = build_info_html(&record, self.timestamp_unit);
        self.markers.push(RevealedMarker {
            index,
            handle,
            record,
            position,
            info_html,
        });

        RevealOutcome::Revealed { index, handle }
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn markers(&self) -> &[RevealedMarker] {
        &self.markers
    }

    pub fn failures(&self) -> &[RevealFailure] {
        &self.failures
    }

    pub fn marker(&self, handle: MarkerHandle) -> Option<&RevealedMarker> {
        self.markers.iter().find(|marker| marker.handle == handle)
    }

    /// Path segments drawn so far; one less than the marker count
    pub fn segment_count(&self) -> usize {
        self.markers.len().saturating_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{RecordingSurface, SurfaceCall};
    use crate::types::LatLng;

    fn records(values: &[(i64, &str, &str)]) -> LocationSequence {
        values
            .iter()
            .map(|(ts, lat, lon)| LocationRecord::new(*ts, *lat, *lon))
            .collect()
    }

    fn fire_all(
        sequencer: &mut MarkerSequencer,
        store: &mut LocationStore,
        timeline: &mut Timeline,
        surface: &mut RecordingSurface,
    ) -> Vec<RevealOutcome> {
        let mut outcomes = Vec::new();
        while let Some(task) = timeline.pop_due(Duration::from_secs(3600)) {
            outcomes.push(sequencer.reveal(task, store, surface));
        }
        outcomes
    }

    #[test]
    fn test_reveal_draws_marker_segment_and_follows() {
        let options = PlaybackOptions::default();
        let mut sequencer = MarkerSequencer::new(&options);
        let mut store = LocationStore::new();
        let mut timeline = Timeline::new();
        let mut surface = RecordingSurface::new();

        let plan = sequencer.start(
            records(&[(1, "514071200", "47586900"), (2, "514081200", "47596900")]),
            &mut store,
            &mut timeline,
        );
        assert_eq!(plan.scheduled, 2);
        assert_eq!(plan.last_due, Some(Duration::from_millis(100)));

        fire_all(&mut sequencer, &mut store, &mut timeline, &mut surface);

        let first = LatLng::new(51.40712, 4.75869);
        let second = LatLng::new(51.40812, 4.75969);
        assert_eq!(
            surface.calls(),
            &[
                SurfaceCall::CreateMarker {
                    handle: MarkerHandle(0),
                    position: first,
                    arrival: Some(ArrivalAnimation::Drop),
                },
                SurfaceCall::PanAndZoom {
                    position: first,
                    zoom: 10
                },
                SurfaceCall::CreateMarker {
                    handle: MarkerHandle(1),
                    position: second,
                    arrival: Some(ArrivalAnimation::Drop),
                },
                SurfaceCall::CreatePathSegment {
                    from: MarkerHandle(0),
                    to: MarkerHandle(1)
                },
                SurfaceCall::PanAndZoom {
                    position: second,
                    zoom: 10
                },
            ]
        );
        assert_eq!(store.revealed(), &[first, second]);
        assert_eq!(sequencer.segment_count(), 1);
    }

    #[test]
    fn test_malformed_record_is_skipped_and_chain_continues() {
        let options = PlaybackOptions::default();
        let mut sequencer = MarkerSequencer::new(&options);
        let mut store = LocationStore::new();
        let mut timeline = Timeline::new();
        let mut surface = RecordingSurface::new();

        sequencer.start(
            records(&[
                (1, "514071200", "47586900"),
                (2, "north", "47596900"),
                (3, "514091200", "47606900"),
            ]),
            &mut store,
            &mut timeline,
        );
        let outcomes = fire_all(&mut sequencer, &mut store, &mut timeline, &mut surface);

        assert_eq!(
            outcomes,
            vec![
                RevealOutcome::Revealed {
                    index: 0,
                    handle: MarkerHandle(0)
                },
                RevealOutcome::Skipped { index: 1 },
                RevealOutcome::Revealed {
                    index: 2,
                    handle: MarkerHandle(1)
                },
            ]
        );
        assert_eq!(sequencer.failures().len(), 1);
        assert_eq!(sequencer.failures()[0].index, 1);
        assert!(sequencer.failures()[0].error.is_malformed_coordinate());
        assert_eq!(surface.segments(), vec![(MarkerHandle(0), MarkerHandle(1))]);
        assert_eq!(store.revealed().len(), 2);
    }

    #[test]
    fn test_stale_task_is_ignored() {
        let options = PlaybackOptions::default();
        let mut sequencer = MarkerSequencer::new(&options);
        let mut store = LocationStore::new();
        let mut timeline = Timeline::new();
        let mut surface = RecordingSurface::new();

        let old = sequencer.start(records(&[(1, "514071200", "47586900")]), &mut store, &mut timeline);
        sequencer.start(records(&[(2, "514081200", "47596900")]), &mut store, &mut timeline);

        let stale = ScheduledReveal {
            generation: old.generation,
            index: 0,
            due: Duration::ZERO,
        };
        assert_eq!(
            sequencer.reveal(stale, &mut store, &mut surface),
            RevealOutcome::Stale
        );
        assert!(surface.calls().is_empty());
        assert_eq!(store.next_index(), 0);
    }

    #[test]
    fn test_empty_sequence_schedules_nothing() {
        let options = PlaybackOptions::default();
        let mut sequencer = MarkerSequencer::new(&options);
        let mut store = LocationStore::new();
        let mut timeline = Timeline::new();

        let plan = sequencer.start(LocationSequence::default(), &mut store, &mut timeline);
        assert_eq!(plan.scheduled, 0);
        assert_eq!(plan.last_due, None);
        assert_eq!(timeline.pending(), 0);
    }

    #[test]
    fn test_custom_delay_and_zoom() {
        let options = PlaybackOptions {
            reveal_delay: Duration::from_millis(250),
            follow_zoom: 14,
            ..PlaybackOptions::default()
        };
        let mut sequencer = MarkerSequencer::new(&options);
        let mut store = LocationStore::new();
        let mut timeline = Timeline::new();
        let mut surface = RecordingSurface::new();

        let plan = sequencer.start(
            records(&[
                (1, "514071200", "47586900"),
                (2, "514071200", "47586900"),
                (3, "514071200", "47586900"),
            ]),
            &mut store,
            &mut timeline,
        );
        assert_eq!(plan.last_due, Some(Duration::from_millis(500)));

        fire_all(&mut sequencer, &mut store, &mut timeline, &mut surface);
        assert_eq!(surface.last_view().map(|(_, zoom)| zoom), Some(14));
    }
}
