//! Waypoint dialogue server: per-user sessions over HTTP, mission export and
//! calculation history.

pub mod api;
pub mod backoff;
pub mod config;
pub mod export;
pub mod loops;
pub mod persistence;
pub mod state;
