//! Map rendering surface boundary
//!
//! The playback core never draws anything itself. It drives a [`MapSurface`]
//! supplied by the host (a web map binding, a native widget, or the
//! [`RecordingSurface`] used by the CLI and the tests).

use crate::types::{BoundingRegion, LatLng};
use std::fmt;

/// Opaque handle to a marker created by the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerHandle(pub usize);

impl fmt::Display for MarkerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "marker#{}", self.0)
    }
}

/// Animation cue played when a marker appears
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrivalAnimation {
    Drop,
}

/// Operations the playback core needs from a map backend
pub trait MapSurface {
    fn create_marker(&mut self, position: LatLng, arrival: Option<ArrivalAnimation>)
        -> MarkerHandle;

    /// Straight (non-geodesic) line between two existing markers
    fn create_path_segment(&mut self, from: MarkerHandle, to: MarkerHandle);

    fn pan_and_zoom_to(&mut self, position: LatLng, zoom: u8);

    /// A point region asks the surface to center on it at its own default zoom
    fn fit_to_region(&mut self, region: BoundingRegion);

    fn show_info(&mut self, marker: MarkerHandle, html: &str);
}

/// One call made against a [`RecordingSurface`]
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    CreateMarker {
        handle: MarkerHandle,
        position: LatLng,
        arrival: Option<ArrivalAnimation>,
    },
    CreatePathSegment {
        from: MarkerHandle,
        to: MarkerHandle,
    },
    PanAndZoom {
        position: LatLng,
        zoom: u8,
    },
    FitToRegion(BoundingRegion),
    ShowInfo {
        marker: MarkerHandle,
        html: String,
    },
}

/// Headless surface that records every call in order
#[derive(Debug, Default)]
pub struct RecordingSurface {
    calls: Vec<SurfaceCall>,
    markers: Vec<LatLng>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[SurfaceCall] {
        &self.calls
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    pub fn segments(&self) -> Vec<(MarkerHandle, MarkerHandle)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                SurfaceCall::CreatePathSegment { from, to } => Some((*from, *to)),
                _ => None,
            })
            .collect()
    }

    pub fn last_view(&self) -> Option<(LatLng, u8)> {
        self.calls.iter().rev().find_map(|call| match call {
            SurfaceCall::PanAndZoom { position, zoom } => Some((*position, *zoom)),
            _ => None,
        })
    }

    pub fn fitted_regions(&self) -> Vec<BoundingRegion> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                SurfaceCall::FitToRegion(region) => Some(*region),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl MapSurface for RecordingSurface {
    fn create_marker(
        &mut self,
        position: LatLng,
        arrival: Option<ArrivalAnimation>,
    ) -> MarkerHandle {
        let handle = MarkerHandle(self.markers.len());
        self.markers.push(position);
        log::debug!("Surface: {} at {}", handle, position);
        self.calls.push(SurfaceCall::CreateMarker {
            handle,
            position,
            arrival,
        });
        handle
    }

    fn create_path_segment(&mut self, from: MarkerHandle, to: MarkerHandle) {
        log::debug!("Surface: segment {} -> {}", from, to);
        self.calls.push(SurfaceCall::CreatePathSegment { from, to });
    }

    fn pan_and_zoom_to(&mut self, position: LatLng, zoom: u8) {
        self.calls.push(SurfaceCall::PanAndZoom { position, zoom });
    }

    fn fit_to_region(&mut self, region: BoundingRegion) {
        log::debug!("Surface: fit to {}", region);
        self.calls.push(SurfaceCall::FitToRegion(region));
    }

    fn show_info(&mut self, marker: MarkerHandle, html: &str) {
        self.calls.push(SurfaceCall::ShowInfo {
            marker,
            html: html.to_string(),
        });
    }
}
