//! Waypoint generation core.
//!
//! Parses two endpoints, interpolates evenly spaced waypoints with cycled
//! altitudes, measures distances and exports an INAV mission file. The
//! [`dialogue`] module drives the four-step input flow that feeds it.

pub mod dialogue;
pub mod error;
pub mod interpolate;
pub mod mission;
pub mod models;
pub mod parse;
pub mod pipeline;
pub mod report;
pub mod spatial;

pub use dialogue::{
    completion_replies, greeting, history_replies, new_user_notice, Command, DialogueLimits,
    Keyboard, Outcome, Reply, Session, Step,
};
pub use error::{CoreError, MissionError};
pub use interpolate::interpolate;
pub use mission::{mission_file_name, MissionDocument, MissionItem, MISSION_CAPTION};
pub use models::{AltitudeSpec, CalculationRequest, CalculationResult, Coordinate, Waypoint};
pub use parse::{parse_altitudes, parse_coordinate, parse_segments};
pub use pipeline::{calculate, run, Calculation, CalculationRecord, PipelineOptions};
pub use report::{format_report, format_summary, DEFAULT_CHUNK_CHARS};
pub use spatial::{haversine_distance, vincenty_distance, DistanceModel};
