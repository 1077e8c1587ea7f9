//! wpgen CLI - plan waypoint routes from the terminal.
//!
//! - `plan`: one-shot calculation from flags
//! - `interactive`: the same four-step dialogue the server runs, over stdin

pub mod interactive;
pub mod plan;
pub mod render;

pub use interactive::run_interactive;
pub use plan::{plan, PlanInput};
