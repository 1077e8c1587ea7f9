//! Server configuration from environment.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use wpgen_core::{DialogueLimits, DistanceModel, PipelineOptions, DEFAULT_CHUNK_CHARS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub database_path: String,
    pub database_max_connections: u32,
    pub export_dir: PathBuf,
    pub distance_model: DistanceModel,
    pub max_segments: u32,
    pub report_chunk_chars: usize,
    pub history_limit: u32,
    pub session_ttl_secs: u64,
    pub log_format: LogFormat,
    /// Seeded into the admin registry at startup.
    pub admin_ids: Vec<i64>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            server_port: parse_env("WPGEN_PORT", 3000),
            database_path: env::var("WPGEN_DATABASE_PATH")
                .unwrap_or_else(|_| "data/wpgen.db".to_string()),
            database_max_connections: parse_env("WPGEN_DATABASE_MAX_CONNECTIONS", 5),
            export_dir: env::var("WPGEN_EXPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("missions")),
            distance_model: parse_env("WPGEN_DISTANCE_MODEL", DistanceModel::Ellipsoidal),
            max_segments: parse_env("WPGEN_MAX_SEGMENTS", 1000).max(1),
            report_chunk_chars: parse_env("WPGEN_REPORT_CHUNK_CHARS", DEFAULT_CHUNK_CHARS).max(1),
            history_limit: parse_env("WPGEN_HISTORY_LIMIT", 3),
            session_ttl_secs: parse_env("WPGEN_SESSION_TTL_SECS", 1800),
            log_format: match env::var("WPGEN_LOG_FORMAT").as_deref() {
                Ok("json") => LogFormat::Json,
                _ => LogFormat::Text,
            },
            admin_ids: env::var("WPGEN_ADMIN_IDS")
                .map(|value| parse_id_list(&value))
                .unwrap_or_default(),
        }
    }

    /// Validation and pipeline knobs handed to each session.
    pub fn dialogue_limits(&self) -> DialogueLimits {
        DialogueLimits {
            max_segments: self.max_segments,
            pipeline: PipelineOptions {
                distance_model: self.distance_model,
                chunk_chars: self.report_chunk_chars,
            },
        }
    }
}

fn parse_env<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

/// Comma-separated ids; entries that are not integers are skipped.
fn parse_id_list(value: &str) -> Vec<i64> {
    value
        .split(',')
        .filter_map(|item| item.trim().parse().ok())
        .collect()
}
