//! Background loops.

pub mod persist_loop;
pub mod session_expiry_loop;
