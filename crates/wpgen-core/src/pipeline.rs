//! Waypoint generation pipeline: interpolate, measure, report, export.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::interpolate::interpolate;
use crate::mission::MissionDocument;
use crate::models::{AltitudeSpec, CalculationResult, Coordinate};
use crate::report::{format_report, format_summary, DEFAULT_CHUNK_CHARS};
use crate::spatial::DistanceModel;

/// Tunables for a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineOptions {
    pub distance_model: DistanceModel,
    pub chunk_chars: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            distance_model: DistanceModel::default(),
            chunk_chars: DEFAULT_CHUNK_CHARS,
        }
    }
}

/// Everything one completed request produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Calculation {
    pub coord_a: Coordinate,
    pub coord_b: Coordinate,
    pub segments: u32,
    pub altitudes: AltitudeSpec,
    pub result: CalculationResult,
    pub report: Vec<String>,
    pub summary: String,
    pub mission: MissionDocument,
    pub mission_xml: String,
}

/// Summary row handed to calculation history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationRecord {
    pub user_id: i64,
    pub coord_a: String,
    pub coord_b: String,
    pub segments: u32,
    pub result: String,
}

impl Calculation {
    /// `"<km> km | Altitudes: [..]"`, the stored result string.
    pub fn result_summary(&self) -> String {
        format!(
            "{:.3} km | Altitudes: {}",
            self.result.total_distance_km, self.altitudes
        )
    }

    pub fn record(&self, user_id: i64) -> CalculationRecord {
        CalculationRecord {
            user_id,
            coord_a: self.coord_a.to_string(),
            coord_b: self.coord_b.to_string(),
            segments: self.segments,
            result: self.result_summary(),
        }
    }
}

/// Interpolate waypoints and measure total and per-segment distances.
pub fn calculate(
    a: &Coordinate,
    b: &Coordinate,
    segments: u32,
    altitudes: &AltitudeSpec,
    model: DistanceModel,
) -> Result<CalculationResult, CoreError> {
    let waypoints = interpolate(a, b, segments, altitudes)?;

    let total_distance_km = model.distance_km(a, b);
    let avg_segment_km = total_distance_km / f64::from(segments);

    let per_segment_distances_m = waypoints
        .windows(2)
        .map(|pair| model.distance_between_m(pair[0].lat, pair[0].lon, pair[1].lat, pair[1].lon))
        .collect();

    Ok(CalculationResult {
        total_distance_km,
        avg_segment_km,
        waypoints,
        per_segment_distances_m,
    })
}

/// Run the full pipeline for one request.
pub fn run(
    a: Coordinate,
    b: Coordinate,
    segments: u32,
    altitudes: AltitudeSpec,
    options: &PipelineOptions,
) -> Result<Calculation, CoreError> {
    let result = calculate(&a, &b, segments, &altitudes, options.distance_model)?;
    let report = format_report(&result, options.chunk_chars);
    let summary = format_summary(&result);
    let mission = MissionDocument::build(&result.waypoints);
    let mission_xml = mission.to_xml()?;

    Ok(Calculation {
        coord_a: a,
        coord_b: b,
        segments,
        altitudes,
        result,
        report,
        summary,
        mission,
        mission_xml,
    })
}
