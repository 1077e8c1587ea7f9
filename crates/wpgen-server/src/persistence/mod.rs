//! Persistence layer for the waypoint service.
//!
//! SQLite storage for registered users, admins and calculation history. Dialogue
//! sessions themselves are never persisted.

pub mod admins;
pub mod calculations;
pub mod db;
pub mod users;

pub use db::{init_database, Database};
