//! Validators for the raw text collected by the dialogue.

use crate::error::CoreError;
use crate::models::{AltitudeSpec, Coordinate};

/// Parse `"lat, lon"` into a [`Coordinate`].
///
/// Exactly two comma-separated numeric tokens are required and both must be
/// within range.
pub fn parse_coordinate(text: &str) -> Result<Coordinate, CoreError> {
    let invalid = || CoreError::InvalidCoordinateFormat(text.trim().to_string());

    let tokens: Vec<&str> = text.split(',').map(str::trim).collect();
    let [lat, lon] = tokens.as_slice() else {
        return Err(invalid());
    };

    let lat: f64 = lat.parse().map_err(|_| invalid())?;
    let lon: f64 = lon.parse().map_err(|_| invalid())?;

    Coordinate::new(lat, lon).ok_or_else(invalid)
}

/// Parse a positive segment count no larger than `max_segments`.
pub fn parse_segments(text: &str, max_segments: u32) -> Result<u32, CoreError> {
    let trimmed = text.trim();
    match trimmed.parse::<u32>() {
        Ok(segments) if (1..=max_segments).contains(&segments) => Ok(segments),
        _ => Err(CoreError::InvalidSegmentCount(trimmed.to_string())),
    }
}

/// Parse one or three non-negative integer altitudes, e.g. `"50"` or `"50, 60, 70"`.
pub fn parse_altitudes(text: &str) -> Result<AltitudeSpec, CoreError> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let invalid = || CoreError::InvalidAltitudeSpec(text.trim().to_string());

    let values = compact
        .split(',')
        .map(|token| token.parse::<u32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| invalid())?;

    if !matches!(values.len(), 1 | 3) {
        return Err(invalid());
    }

    AltitudeSpec::new(values).ok_or_else(invalid)
}
