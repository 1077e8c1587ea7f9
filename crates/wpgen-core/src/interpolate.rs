//! Evenly spaced waypoints between two endpoints.

use crate::error::CoreError;
use crate::models::{AltitudeSpec, Coordinate, Waypoint};

/// Generate `segments + 1` waypoints from `a` to `b`.
///
/// Latitude and longitude are blended linearly in degree space. This is not
/// the geodesic path; mission consumers expect exactly this spacing.
pub fn interpolate(
    a: &Coordinate,
    b: &Coordinate,
    segments: u32,
    altitudes: &AltitudeSpec,
) -> Result<Vec<Waypoint>, CoreError> {
    if segments == 0 {
        return Err(CoreError::InvalidSegmentCount("0".to_string()));
    }

    let d_lat = b.latitude() - a.latitude();
    let d_lon = b.longitude() - a.longitude();
    let total = f64::from(segments);

    let waypoints = (0..=segments as usize)
        .map(|index| {
            let fraction = index as f64 / total;
            Waypoint {
                index,
                lat: a.latitude() + d_lat * fraction,
                lon: a.longitude() + d_lon * fraction,
                altitude_m: altitudes.altitude_for(index),
            }
        })
        .collect();

    Ok(waypoints)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    #[test]
    fn produces_segments_plus_one_points_hitting_both_ends() {
        let a = coord(41.311081, 69.240562);
        let b = coord(41.327546, 69.281003);
        for segments in [1u32, 2, 5, 17, 100] {
            let points = interpolate(&a, &b, segments, &AltitudeSpec::constant(50)).unwrap();
            assert_eq!(points.len(), segments as usize + 1);

            let first = points.first().unwrap();
            let last = points.last().unwrap();
            assert_eq!(first.index, 0);
            assert_eq!(last.index, segments as usize);
            assert!((first.lat - a.latitude()).abs() < 1e-12);
            assert!((first.lon - a.longitude()).abs() < 1e-12);
            assert!((last.lat - b.latitude()).abs() < 1e-9);
            assert!((last.lon - b.longitude()).abs() < 1e-9);
        }
    }

    #[test]
    fn points_are_evenly_spaced_in_degrees() {
        let points = interpolate(
            &coord(10.0, 20.0),
            &coord(12.0, 24.0),
            4,
            &AltitudeSpec::constant(0),
        )
        .unwrap();
        let lats: Vec<f64> = points.iter().map(|p| p.lat).collect();
        let lons: Vec<f64> = points.iter().map(|p| p.lon).collect();
        assert_eq!(lats, vec![10.0, 10.5, 11.0, 11.5, 12.0]);
        assert_eq!(lons, vec![20.0, 21.0, 22.0, 23.0, 24.0]);
    }

    #[test]
    fn altitudes_cycle_over_three_values() {
        let altitudes = AltitudeSpec::new(vec![50, 60, 70]).unwrap();
        let points = interpolate(&coord(0.0, 0.0), &coord(1.0, 1.0), 5, &altitudes).unwrap();
        let alts: Vec<u32> = points.iter().map(|p| p.altitude_m).collect();
        assert_eq!(alts, vec![50, 60, 70, 50, 60, 70]);
    }

    #[test]
    fn zero_segments_is_rejected() {
        let err = interpolate(&coord(0.0, 0.0), &coord(1.0, 1.0), 0, &AltitudeSpec::constant(10))
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidSegmentCount(_)));
    }
}
