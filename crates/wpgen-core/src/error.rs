//! Error types for the waypoint pipeline.

use thiserror::Error;

/// Errors raised by the pipeline and the dialogue validators.
///
/// The three input variants are recoverable: the dialogue re-prompts the
/// same step and keeps everything collected so far.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid coordinate format: {0}")]
    InvalidCoordinateFormat(String),

    #[error("invalid segment count: {0}")]
    InvalidSegmentCount(String),

    #[error("invalid altitude spec: {0}")]
    InvalidAltitudeSpec(String),

    #[error("mission export failed: {0}")]
    Export(#[from] MissionError),
}

/// Failures while serializing a mission document.
#[derive(Debug, Error)]
pub enum MissionError {
    #[error("xml write error: {0}")]
    Io(#[from] std::io::Error),

    #[error("xml encoding error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("mission xml is not valid utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
