//! Upload-scoped playback session and the map host that drives it
//!
//! A [`VisualizationSession`] is built for each upload and owns the store,
//! the sequencer and the fitter for that upload only. The [`MapViewer`] owns
//! what outlives uploads: the surface and the shared timeline. Replacing the
//! session starts a new timeline generation, so reveals queued for the old
//! upload can never touch the new one.

use crate::config::PlaybackOptions;
use crate::scheduler::{Generation, ScheduledReveal, Timeline};
use crate::sequencer::{MarkerSequencer, RevealFailure, RevealOutcome, RevealPlan, RevealedMarker};
use crate::store::LocationStore;
use crate::surface::{MapSurface, MarkerHandle};
use crate::types::{BoundingRegion, LatLng, LocationSequence};
use crate::viewport::{bounding_region, ViewportFitter};
use std::time::Duration;

/// Counts for one session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackSummary {
    pub total: usize,
    pub revealed: usize,
    pub skipped: usize,
    pub markers: usize,
    pub segments: usize,
    pub bounds: Option<BoundingRegion>,
}

/// Store, sequencer and fitter for one uploaded sequence
#[derive(Debug)]
pub struct VisualizationSession {
    store: LocationStore,
    sequencer: MarkerSequencer,
    fitter: ViewportFitter,
    plan: RevealPlan,
    fit_on_complete: bool,
}

impl VisualizationSession {
    /// Load `sequence` and schedule its reveals on `timeline`
    pub fn start(
        sequence: LocationSequence,
        timeline: &mut Timeline,
        options: &PlaybackOptions,
    ) -> Self {
        let mut store = LocationStore::new();
        let mut sequencer = MarkerSequencer::new(options);
        let plan = sequencer.start(sequence, &mut store, timeline);

        Self {
            store,
            sequencer,
            fitter: ViewportFitter::new(),
            plan,
            fit_on_complete: options.fit_on_complete,
        }
    }

    pub fn generation(&self) -> Generation {
        self.plan.generation
    }

    pub fn plan(&self) -> &RevealPlan {
        &self.plan
    }

    /// Run a fired task; fits the view after the final reveal when enabled
    pub fn handle<S: MapSurface + ?Sized>(
        &mut self,
        task: ScheduledReveal,
        surface: &mut S,
    ) -> RevealOutcome {
        let outcome = self.sequencer.reveal(task, &mut self.store, surface);

        let consumed = matches!(
            outcome,
            RevealOutcome::Revealed { .. } | RevealOutcome::Skipped { .. }
        );
        if consumed && self.store.is_finished() {
            let summary = self.summary();
            log::info!(
                "Playback finished: {} of {} record(s) revealed, {} skipped",
                summary.revealed,
                summary.total,
                summary.skipped
            );
            if self.fit_on_complete {
                self.fit_viewport(surface);
            }
        }

        outcome
    }

    /// Fit the surface to everything revealed so far
    pub fn fit_viewport<S: MapSurface + ?Sized>(&self, surface: &mut S) -> Option<BoundingRegion> {
        self.fitter.fit(self.store.revealed(), surface)
    }

    /// Info content of the marker this session created
    pub fn info_for(&self, marker: MarkerHandle) -> Option<&str> {
        self.sequencer
            .marker(marker)
            .map(|revealed| revealed.info_html.as_str())
    }

    pub fn revealed_coordinates(&self) -> &[LatLng] {
        self.store.revealed()
    }

    pub fn revealed_markers(&self) -> &[RevealedMarker] {
        self.sequencer.markers()
    }

    pub fn failures(&self) -> &[RevealFailure] {
        self.sequencer.failures()
    }

    pub fn is_finished(&self) -> bool {
        self.store.is_finished()
    }

    pub fn summary(&self) -> PlaybackSummary {
        let markers = self.sequencer.markers().len();
        PlaybackSummary {
            total: self.store.len(),
            revealed: markers,
            skipped: self.sequencer.failures().len(),
            markers,
            segments: self.sequencer.segment_count(),
            bounds: bounding_region(self.store.revealed()),
        }
    }
}

/// What one `advance` call fired
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub revealed: usize,
    pub skipped: usize,
    /// The current session revealed its final record during this tick
    pub finished: bool,
}

/// Map host: surface, shared timeline and the current upload's session
pub struct MapViewer<S: MapSurface> {
    surface: S,
    timeline: Timeline,
    options: PlaybackOptions,
    session: Option<VisualizationSession>,
}

impl<S: MapSurface> MapViewer<S> {
    /// Wrap `surface` and show the initial view
    pub fn new(mut surface: S, options: PlaybackOptions) -> Self {
        surface.pan_and_zoom_to(options.initial_center, options.initial_zoom);
        Self {
            surface,
            timeline: Timeline::new(),
            options,
            session: None,
        }
    }

    /// Replace the current upload with `sequence` and schedule its playback
    pub fn upload(&mut self, sequence: LocationSequence) -> RevealPlan {
        if let Some(previous) = &self.session {
            if !previous.is_finished() {
                log::info!(
                    "New upload interrupts {} with {} reveal(s) pending",
                    previous.generation(),
                    self.timeline.pending()
                );
            }
        }

        let session = VisualizationSession::start(sequence, &mut self.timeline, &self.options);
        let plan = *session.plan();
        self.session = Some(session);
        plan
    }

    /// Move the clock forward by `elapsed` and fire every reveal that came due
    pub fn advance(&mut self, elapsed: Duration) -> TickReport {
        let until = self.timeline.now().saturating_add(elapsed);
        let mut report = TickReport::default();

        while let Some(task) = self.timeline.pop_due(until) {
            let session = match self.session.as_mut() {
                Some(session) if session.generation() == task.generation => session,
                _ => {
                    log::trace!("No session for {}, dropping reveal", task.generation);
                    continue;
                }
            };

            match session.handle(task, &mut self.surface) {
                RevealOutcome::Revealed { .. } => report.revealed += 1,
                RevealOutcome::Skipped { .. } => report.skipped += 1,
                RevealOutcome::Stale | RevealOutcome::Exhausted => continue,
            }
            if session.is_finished() {
                report.finished = true;
            }
        }

        self.timeline.advance_to(until);
        report
    }

    /// Fire everything still scheduled for the current upload
    pub fn run_to_completion(&mut self) -> TickReport {
        match self.timeline.last_due() {
            Some(last) => {
                let remaining = last.saturating_sub(self.timeline.now());
                self.advance(remaining)
            }
            None => TickReport::default(),
        }
    }

    /// Time until the next reveal of the current upload
    pub fn next_due_in(&self) -> Option<Duration> {
        self.timeline
            .next_due()
            .map(|due| due.saturating_sub(self.timeline.now()))
    }

    pub fn fit_viewport(&mut self) -> Option<BoundingRegion> {
        self.session
            .as_ref()
            .and_then(|session| session.fit_viewport(&mut self.surface))
    }

    /// Show the clicked marker's own info content
    ///
    /// Returns `false` without touching the surface for markers that do not
    /// belong to the current upload.
    pub fn click(&mut self, marker: MarkerHandle) -> bool {
        let html = match self.session.as_ref().and_then(|s| s.info_for(marker)) {
            Some(html) => html,
            None => return false,
        };
        self.surface.show_info(marker, html);
        true
    }

    pub fn session(&self) -> Option<&VisualizationSession> {
        self.session.as_ref()
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn options(&self) -> &PlaybackOptions {
        &self.options
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}
