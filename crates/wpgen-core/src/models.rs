//! Core data models for waypoint generation.

use serde::{Deserialize, Serialize};

/// A validated geographic position in decimal degrees.
///
/// Only constructed through [`Coordinate::new`] or the text parser, so both
/// fields are always finite and within range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Create a coordinate, returning `None` when either value is out of range.
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);
        valid.then_some(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl std::fmt::Display for Coordinate {
    /// Renders as a `(lat, lon)` tuple, the form stored in calculation history.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:?}, {:?})", self.latitude, self.longitude)
    }
}

/// Altitudes in meters assigned to waypoints by index.
///
/// Waypoint `i` gets `values[i % values.len()]`. The dialogue only accepts
/// one or three values; the cycling itself works for any non-empty list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AltitudeSpec {
    values: Vec<u32>,
}

impl AltitudeSpec {
    /// Returns `None` for an empty list.
    pub fn new(values: Vec<u32>) -> Option<Self> {
        (!values.is_empty()).then_some(Self { values })
    }

    /// Same altitude for every waypoint.
    pub fn constant(altitude_m: u32) -> Self {
        Self {
            values: vec![altitude_m],
        }
    }

    pub fn values(&self) -> &[u32] {
        &self.values
    }

    pub fn altitude_for(&self, index: usize) -> u32 {
        self.values[index % self.values.len()]
    }
}

impl std::fmt::Display for AltitudeSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{value}")?;
        }
        write!(f, "]")
    }
}

/// A generated 3-D route point. Index 0 is the start endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub index: usize,
    pub lat: f64,
    pub lon: f64,
    pub altitude_m: u32,
}

/// Inputs accumulated across the dialogue steps.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CalculationRequest {
    pub coord_a: Option<Coordinate>,
    pub coord_b: Option<Coordinate>,
    pub segments: Option<u32>,
    pub altitudes: Option<AltitudeSpec>,
}

impl CalculationRequest {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Distances and waypoints derived from one completed request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub total_distance_km: f64,
    pub avg_segment_km: f64,
    pub waypoints: Vec<Waypoint>,
    /// Distance from waypoint `i` to waypoint `i + 1`, in meters.
    pub per_segment_distances_m: Vec<f64>,
}
