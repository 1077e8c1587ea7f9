//! One-shot route planning.

use anyhow::{Context, Result};
use wpgen_core::{
    parse_altitudes, parse_coordinate, parse_segments, run, Calculation, DistanceModel,
    PipelineOptions,
};

/// Raw flag values, parsed with the dialogue's validators.
#[derive(Debug, Clone)]
pub struct PlanInput {
    pub from: String,
    pub to: String,
    pub segments: String,
    pub altitude: String,
    pub max_segments: u32,
    pub distance_model: DistanceModel,
}

pub fn plan(input: &PlanInput) -> Result<Calculation> {
    let a = parse_coordinate(&input.from).with_context(|| format!("--from {:?}", input.from))?;
    let b = parse_coordinate(&input.to).with_context(|| format!("--to {:?}", input.to))?;
    let segments = parse_segments(&input.segments, input.max_segments)
        .with_context(|| format!("--segments {:?}", input.segments))?;
    let altitudes = parse_altitudes(&input.altitude)
        .with_context(|| format!("--altitude {:?}", input.altitude))?;
    let options = PipelineOptions {
        distance_model: input.distance_model,
        ..Default::default()
    };
    Ok(run(a, b, segments, altitudes, &options)?)
}
