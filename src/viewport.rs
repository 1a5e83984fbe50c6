//! Fit the map view around revealed coordinates

use crate::surface::MapSurface;
use crate::types::{BoundingRegion, LatLng};

/// Minimal region covering every coordinate, `None` when there are none
pub fn bounding_region(coordinates: &[LatLng]) -> Option<BoundingRegion> {
    let (first, rest) = coordinates.split_first()?;
    let mut region = BoundingRegion::from_point(*first);
    for position in rest {
        region.extend(*position);
    }
    Some(region)
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ViewportFitter;

impl ViewportFitter {
    pub fn new() -> Self {
        Self
    }

    /// Ask the surface to show all `coordinates`
    ///
    /// Makes no surface call for an empty slice. Safe to call mid-playback
    /// with whatever has been revealed so far.
    pub fn fit<S: MapSurface + ?Sized>(
        &self,
        coordinates: &[LatLng],
        surface: &mut S,
    ) -> Option<BoundingRegion> {
        let region = bounding_region(coordinates)?;
        log::info!(
            "Fitting viewport to {} coordinate(s): {}",
            coordinates.len(),
            region
        );
        surface.fit_to_region(region);
        Some(region)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{RecordingSurface, SurfaceCall};

    #[test]
    fn test_empty_fit_makes_no_call() {
        let mut surface = RecordingSurface::new();
        assert_eq!(ViewportFitter::new().fit(&[], &mut surface), None);
        assert!(surface.calls().is_empty());
    }

    #[test]
    fn test_single_coordinate_is_point_region() {
        let mut surface = RecordingSurface::new();
        let point = LatLng::new(51.40712, 4.75869);
        let region = ViewportFitter::new()
            .fit(&[point], &mut surface)
            .expect("one coordinate should fit");

        assert!(region.is_point());
        assert_eq!(region.center(), point);
        assert_eq!(surface.calls(), &[SurfaceCall::FitToRegion(region)]);
    }

    #[test]
    fn test_region_covers_all_coordinates() {
        let coordinates = [
            LatLng::new(51.4, 4.7),
            LatLng::new(-33.9, 151.2),
            LatLng::new(40.7, -74.0),
        ];
        let region = bounding_region(&coordinates).unwrap();

        assert_eq!(region.south, -33.9);
        assert_eq!(region.north, 51.4);
        assert_eq!(region.west, -74.0);
        assert_eq!(region.east, 151.2);
        assert!(coordinates.iter().all(|c| region.contains(*c)));
        assert!(!region.is_point());
    }
}
