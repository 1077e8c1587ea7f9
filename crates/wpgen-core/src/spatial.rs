//! Distance math between two coordinates.

use crate::models::Coordinate;
use serde::{Deserialize, Serialize};

/// Mean Earth radius used by the spherical model.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// WGS84 semi-major axis in meters.
const WGS84_A: f64 = 6_378_137.0;
/// WGS84 flattening.
const WGS84_F: f64 = 1.0 / 298.257_223_563;

const VINCENTY_MAX_ITERATIONS: usize = 200;
const VINCENTY_TOLERANCE: f64 = 1e-12;

/// Earth model used for distance reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceModel {
    /// WGS84 ellipsoid (Vincenty inverse formula).
    #[default]
    Ellipsoidal,
    /// Great-circle distance on a sphere of [`EARTH_RADIUS_M`].
    Spherical,
}

impl std::str::FromStr for DistanceModel {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ellipsoidal" | "wgs84" | "vincenty" => Ok(Self::Ellipsoidal),
            "spherical" | "haversine" => Ok(Self::Spherical),
            other => Err(format!("unknown distance model: {other}")),
        }
    }
}

impl DistanceModel {
    /// Distance between two points in meters.
    pub fn distance_m(self, a: &Coordinate, b: &Coordinate) -> f64 {
        self.distance_between_m(a.latitude(), a.longitude(), b.latitude(), b.longitude())
    }

    /// Distance between two points in kilometers.
    pub fn distance_km(self, a: &Coordinate, b: &Coordinate) -> f64 {
        self.distance_m(a, b) / 1000.0
    }

    /// Same as [`DistanceModel::distance_m`] on raw degrees.
    pub fn distance_between_m(self, lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
        match self {
            DistanceModel::Spherical => haversine_distance(lat1, lon1, lat2, lon2),
            DistanceModel::Ellipsoidal => vincenty_distance(lat1, lon1, lat2, lon2)
                .unwrap_or_else(|| haversine_distance(lat1, lon1, lat2, lon2)),
        }
    }
}

/// Calculate distance between two points in meters using Haversine formula.
///
/// # Arguments
/// * `lat1`, `lon1` - First point coordinates in decimal degrees
/// * `lat2`, `lon2` - Second point coordinates in decimal degrees
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();
    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Distance on the WGS84 ellipsoid in meters (Vincenty inverse).
///
/// Returns `None` when the iteration does not converge, which happens for
/// nearly antipodal points.
pub fn vincenty_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> Option<f64> {
    if lat1 == lat2 && lon1 == lon2 {
        return Some(0.0);
    }

    let b = WGS84_A * (1.0 - WGS84_F);
    let l = (lon2 - lon1).to_radians();
    let u1 = ((1.0 - WGS84_F) * lat1.to_radians().tan()).atan();
    let u2 = ((1.0 - WGS84_F) * lat2.to_radians().tan()).atan();
    let (sin_u1, cos_u1) = u1.sin_cos();
    let (sin_u2, cos_u2) = u2.sin_cos();

    let mut lambda = l;
    for _ in 0..VINCENTY_MAX_ITERATIONS {
        let (sin_lambda, cos_lambda) = lambda.sin_cos();
        let sin_sigma = ((cos_u2 * sin_lambda).powi(2)
            + (cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda).powi(2))
        .sqrt();
        if sin_sigma == 0.0 {
            return Some(0.0);
        }
        let cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;
        let sigma = sin_sigma.atan2(cos_sigma);
        let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
        let cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;
        // Equatorial lines have cos_sq_alpha == 0.
        let cos_2sigma_m = if cos_sq_alpha == 0.0 {
            0.0
        } else {
            cos_sigma - 2.0 * sin_u1 * sin_u2 / cos_sq_alpha
        };
        let c = WGS84_F / 16.0 * cos_sq_alpha * (4.0 + WGS84_F * (4.0 - 3.0 * cos_sq_alpha));
        let previous = lambda;
        lambda = l
            + (1.0 - c)
                * WGS84_F
                * sin_alpha
                * (sigma
                    + c * sin_sigma
                        * (cos_2sigma_m + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m.powi(2))));

        if (lambda - previous).abs() < VINCENTY_TOLERANCE {
            let u_sq = cos_sq_alpha * (WGS84_A * WGS84_A - b * b) / (b * b);
            let big_a =
                1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
            let big_b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));
            let delta_sigma = big_b
                * sin_sigma
                * (cos_2sigma_m
                    + big_b / 4.0
                        * (cos_sigma * (-1.0 + 2.0 * cos_2sigma_m.powi(2))
                            - big_b / 6.0
                                * cos_2sigma_m
                                * (-3.0 + 4.0 * sin_sigma.powi(2))
                                * (-3.0 + 4.0 * cos_2sigma_m.powi(2))));
            return Some(b * big_a * (sigma - delta_sigma));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    #[test]
    fn test_haversine_known_distance() {
        // ~111km between these points (1 degree latitude)
        let dist = haversine_distance(0.0, 0.0, 1.0, 0.0);
        assert!((dist - 111_194.0).abs() < 100.0);
    }

    #[test]
    fn test_haversine_same_point() {
        let dist = haversine_distance(33.6846, -117.8265, 33.6846, -117.8265);
        assert!(dist < 0.001);
    }

    #[test]
    fn vincenty_one_degree_of_latitude_at_equator() {
        // Meridian arc from 0 to 1 degree on WGS84 is 110574.4 m.
        let dist = vincenty_distance(0.0, 0.0, 1.0, 0.0).unwrap();
        assert!((dist - 110_574.4).abs() < 1.0, "got {dist}");
    }

    #[test]
    fn vincenty_falls_back_near_antipodes() {
        let model = DistanceModel::Ellipsoidal;
        let dist = model.distance_between_m(0.0, 0.0, 0.5, 179.7);
        assert!(dist.is_finite());
        assert!(dist > 19_000_000.0);
    }

    #[test]
    fn distance_is_symmetric_and_zero_on_same_point() {
        let points = [
            coord(41.311081, 69.240562),
            coord(41.327546, 69.281003),
            coord(-33.8688, 151.2093),
            coord(51.5074, -0.1278),
            coord(0.0, 0.0),
        ];
        for model in [DistanceModel::Ellipsoidal, DistanceModel::Spherical] {
            for a in &points {
                assert_eq!(model.distance_m(a, a), 0.0);
                for b in &points {
                    let ab = model.distance_m(a, b);
                    let ba = model.distance_m(b, a);
                    assert!((ab - ba).abs() < 1e-6, "{model:?} asymmetric: {ab} vs {ba}");
                    if a != b {
                        assert!(ab > 0.0);
                    }
                }
            }
        }
    }

    #[test]
    fn models_agree_on_short_distances() {
        let a = coord(41.311081, 69.240562);
        let b = coord(41.327546, 69.281003);
        let ellipsoidal = DistanceModel::Ellipsoidal.distance_km(&a, &b);
        let spherical = DistanceModel::Spherical.distance_km(&a, &b);
        assert!((ellipsoidal - 3.84).abs() < 0.02, "got {ellipsoidal}");
        assert!((spherical - 3.84).abs() < 0.02, "got {spherical}");
    }

    #[test]
    fn distance_model_parses_from_text() {
        assert_eq!("spherical".parse::<DistanceModel>(), Ok(DistanceModel::Spherical));
        assert_eq!(" WGS84 ".parse::<DistanceModel>(), Ok(DistanceModel::Ellipsoidal));
        assert!("flat".parse::<DistanceModel>().is_err());
    }
}
