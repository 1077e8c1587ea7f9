//! Four-step input dialogue feeding the waypoint pipeline.
//!
//! A [`Session`] holds one user's progress. Every inbound message is first
//! classified into a [`Command`], then [`Session::handle`] applies it:
//!
//! ```text
//! Idle -> AwaitingFirstCoordinate -> AwaitingSecondCoordinate
//!      -> AwaitingSegmentCount -> AwaitingAltitude -> (pipeline) -> Idle
//! ```
//!
//! Invalid input never advances the step and never touches stored fields.
//! Cancel returns to `Idle` from anywhere and discards the request.

use serde::Serialize;

use crate::error::CoreError;
use crate::models::CalculationRequest;
use crate::parse::{parse_altitudes, parse_coordinate, parse_segments};
use crate::pipeline::{self, Calculation, PipelineOptions};

pub const DEFAULT_MAX_SEGMENTS: u32 = 1000;

const START_LABEL: &str = "🧭 Coordinate calculation";
const HISTORY_LABEL: &str = "📜 Calculation history";
const CANCEL_LABEL: &str = "❌ Cancel";

const FIRST_COORDINATE_PROMPT: &str = "📍 Please enter the <b>first coordinate</b>:\n\
     <code>latitude, longitude</code>\n\
     Example: <b>41.311081, 69.240562</b>";
const SECOND_COORDINATE_PROMPT: &str = "📍 Now enter the <b>second coordinate</b>:\n\
     <code>latitude, longitude</code>\n\
     Example: <b>41.327546, 69.281003</b>";
const SEGMENTS_PROMPT: &str = "✳️ How many segments do you need?";
const ALTITUDE_PROMPT: &str = "🛫 Choose or enter altitude (meters).\n\
     Examples:\n\
     <b>50</b> or <b>50,60,70</b>";
const CANCELLED_TEXT: &str = "❌ Calculation cancelled.";
const IDLE_HINT: &str = "Please choose an option from the menu below 👇";
const HELP_TEXT: &str = "❓ <b>Help Center</b>\n\
     ────────────────────────────\n\
     <b>GeoCalculator Bot</b> computes distances between coordinates \
     and generates intermediate waypoints.\n\n\
     📘 <b>Available commands:</b>\n\
     • /start: open the main menu\n\
     • /coordinate: start a coordinate calculation 🧭\n\
     • /history: view your recent calculations 📜\n\
     • /about: information about the bot ℹ️\n\
     • /help: open this help window ❓\n\n\
     ────────────────────────────\n\
     🧭 <b>How to use:</b>\n\
     1️⃣ Tap <b>“🧭 Coordinate calculation”</b> or send /coordinate\n\
     2️⃣ Enter the first coordinate (example: <code>41.311081, 69.240562</code>)\n\
     3️⃣ Enter the second coordinate\n\
     4️⃣ Select the number of segments (5, 10, 15, ...)\n\
     5️⃣ Enter one altitude (<b>50</b>) or three repeated along the route (<b>50,60,70</b>)\n\
     6️⃣ The bot calculates the total distance, every intermediate point \
     and an INAV mission file\n\n\
     ────────────────────────────\n\
     💡 <b>Tips:</b>\n\
     • Always use the format: <code>latitude, longitude</code>\n\
     • To cancel the process, press <b>“❌ Cancel”</b>";
const ABOUT_TEXT: &str = "🤖 <b>GeoCalculator Bot</b>\n\
     ────────────────────────────\n\
     🧭 <b>Purpose:</b>\n\
     Calculates the distance between two geographic coordinates and \
     splits the route into equal segments with intermediate waypoints.\n\n\
     📍 <b>What you can do:</b>\n\
     • Quickly calculate distance between coordinates\n\
     • Generate intermediate points along the route\n\
     • Export the route as an INAV mission file\n\
     • Save and view calculation history\n\n\
     🏢 <b>Project:</b> <i>Developed for CyberPark</i>\n\
     🌐 <b>Author:</b> <i>CyberPark Development Team</i>\n\
     ────────────────────────────\n\
     ⚙️ <b>Technologies:</b>\n\
     Rust 🦀 | axum ⚙️ | SQLite 🗄️ | WGS84 geodesy 🌍";
const HISTORY_EMPTY_TEXT: &str = "📭 You have no calculation history yet.";

/// Dialogue position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    #[default]
    Idle,
    AwaitingFirstCoordinate,
    AwaitingSecondCoordinate,
    AwaitingSegmentCount,
    AwaitingAltitude,
}

/// A classified inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Cancel,
    History,
    Help,
    About,
    Text(String),
}

impl Command {
    pub fn classify(text: &str) -> Self {
        match text.trim() {
            "/coordinate" | START_LABEL | "🧭 Calculate Coordinates" => Command::Start,
            "/cancel" | CANCEL_LABEL => Command::Cancel,
            "/history" | HISTORY_LABEL | "📜 My Calculation History" => Command::History,
            "/help" => Command::Help,
            "/about" => Command::About,
            _ => Command::Text(text.to_string()),
        }
    }
}

/// Reply keyboard the transport should attach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Keyboard {
    MainMenu,
    Cancel,
    Segments,
    Altitude,
}

impl Keyboard {
    /// Button labels, row by row.
    pub fn buttons(&self) -> Vec<Vec<String>> {
        fn numbers(rows: &[[u32; 3]]) -> Vec<Vec<String>> {
            rows.iter()
                .map(|row| row.iter().map(u32::to_string).collect())
                .collect()
        }
        let cancel_row = vec![CANCEL_LABEL.to_string()];

        match self {
            Keyboard::MainMenu => vec![
                vec![START_LABEL.to_string()],
                vec![HISTORY_LABEL.to_string()],
            ],
            Keyboard::Cancel => vec![cancel_row],
            Keyboard::Segments => {
                let mut rows = numbers(&[[2, 3, 4], [5, 10, 15], [20, 25, 30], [35, 40, 45]]);
                rows.push(cancel_row);
                rows
            }
            Keyboard::Altitude => {
                let mut rows =
                    numbers(&[[20, 30, 40], [50, 70, 90], [100, 130, 150], [200, 250, 300]]);
                rows.push(cancel_row);
                rows
            }
        }
    }
}

/// Outbound text message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reply {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyboard: Option<Keyboard>,
}

impl Reply {
    fn new(text: impl Into<String>, keyboard: Option<Keyboard>) -> Self {
        Self {
            text: text.into(),
            keyboard,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, None)
    }

    pub fn with_keyboard(text: impl Into<String>, keyboard: Keyboard) -> Self {
        Self::new(text, Some(keyboard))
    }
}

/// Result of applying one command to a session.
#[derive(Debug)]
pub enum Outcome {
    /// Step advanced (or the dialogue started); prompt for the next input.
    Prompted(Reply),
    /// Input rejected; the step and stored fields are unchanged.
    Rejected {
        step: Step,
        error: CoreError,
        reply: Reply,
    },
    Cancelled(Reply),
    /// Free text or cancel while idle, or a help request.
    Info(Reply),
    /// Caller serves history; the session is untouched.
    History,
    /// Pipeline ran; the session is back to idle.
    Completed(Box<Calculation>),
}

/// Knobs applied while validating and running a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialogueLimits {
    pub max_segments: u32,
    pub pipeline: PipelineOptions,
}

impl Default for DialogueLimits {
    fn default() -> Self {
        Self {
            max_segments: DEFAULT_MAX_SEGMENTS,
            pipeline: PipelineOptions::default(),
        }
    }
}

/// One user's dialogue state and the inputs collected so far.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Session {
    step: Step,
    request: CalculationRequest,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn request(&self) -> &CalculationRequest {
        &self.request
    }

    pub fn is_idle(&self) -> bool {
        self.step == Step::Idle
    }

    /// Drop the request and return to idle.
    pub fn reset(&mut self) {
        self.step = Step::Idle;
        self.request.clear();
    }

    /// Abort the dialogue. While idle nothing changes and the reply is the
    /// menu hint.
    pub fn cancel(&mut self) -> Reply {
        if self.is_idle() {
            return Reply::with_keyboard(IDLE_HINT, Keyboard::MainMenu);
        }
        self.reset();
        Reply::with_keyboard(CANCELLED_TEXT, Keyboard::MainMenu)
    }

    /// Classify raw text and apply it.
    pub fn handle_text(&mut self, text: &str, limits: &DialogueLimits) -> Outcome {
        self.handle(Command::classify(text), limits)
    }

    pub fn handle(&mut self, command: Command, limits: &DialogueLimits) -> Outcome {
        match command {
            Command::Start => {
                self.reset();
                self.step = Step::AwaitingFirstCoordinate;
                Outcome::Prompted(Reply::with_keyboard(FIRST_COORDINATE_PROMPT, Keyboard::Cancel))
            }
            Command::Cancel if self.is_idle() => Outcome::Info(self.cancel()),
            Command::Cancel => Outcome::Cancelled(self.cancel()),
            Command::History => Outcome::History,
            Command::Help => Outcome::Info(Reply::with_keyboard(HELP_TEXT, Keyboard::MainMenu)),
            Command::About => Outcome::Info(Reply::plain(ABOUT_TEXT)),
            Command::Text(text) => self.accept(&text, limits),
        }
    }

    fn accept(&mut self, text: &str, limits: &DialogueLimits) -> Outcome {
        match self.step {
            Step::Idle => Outcome::Info(Reply::with_keyboard(IDLE_HINT, Keyboard::MainMenu)),
            Step::AwaitingFirstCoordinate => match parse_coordinate(text) {
                Ok(coord) => {
                    self.request.coord_a = Some(coord);
                    self.advance(Step::AwaitingSecondCoordinate)
                }
                Err(error) => self.reject(error),
            },
            Step::AwaitingSecondCoordinate => match parse_coordinate(text) {
                Ok(coord) => {
                    self.request.coord_b = Some(coord);
                    self.advance(Step::AwaitingSegmentCount)
                }
                Err(error) => self.reject(error),
            },
            Step::AwaitingSegmentCount => match parse_segments(text, limits.max_segments) {
                Ok(segments) => {
                    self.request.segments = Some(segments);
                    self.advance(Step::AwaitingAltitude)
                }
                Err(error) => self.reject(error),
            },
            Step::AwaitingAltitude => match parse_altitudes(text) {
                Ok(altitudes) => {
                    self.request.altitudes = Some(altitudes);
                    self.finish(&limits.pipeline)
                }
                Err(error) => self.reject(error),
            },
        }
    }

    fn finish(&mut self, options: &PipelineOptions) -> Outcome {
        let CalculationRequest {
            coord_a: Some(a),
            coord_b: Some(b),
            segments: Some(segments),
            altitudes: Some(altitudes),
        } = self.request.clone()
        else {
            // Steps only advance once their field is stored.
            self.reset();
            return Outcome::Info(Reply::with_keyboard(IDLE_HINT, Keyboard::MainMenu));
        };

        match pipeline::run(a, b, segments, altitudes, options) {
            Ok(calculation) => {
                self.reset();
                Outcome::Completed(Box::new(calculation))
            }
            Err(error) => {
                self.request.altitudes = None;
                self.reject(error)
            }
        }
    }

    fn advance(&mut self, next: Step) -> Outcome {
        self.step = next;
        let reply = match next {
            Step::AwaitingSecondCoordinate => {
                Reply::with_keyboard(SECOND_COORDINATE_PROMPT, Keyboard::Cancel)
            }
            Step::AwaitingSegmentCount => Reply::with_keyboard(SEGMENTS_PROMPT, Keyboard::Segments),
            Step::AwaitingAltitude => Reply::with_keyboard(ALTITUDE_PROMPT, Keyboard::Altitude),
            Step::AwaitingFirstCoordinate => {
                Reply::with_keyboard(FIRST_COORDINATE_PROMPT, Keyboard::Cancel)
            }
            Step::Idle => Reply::with_keyboard(IDLE_HINT, Keyboard::MainMenu),
        };
        Outcome::Prompted(reply)
    }

    fn reject(&self, error: CoreError) -> Outcome {
        let text = match (&error, self.step) {
            (CoreError::InvalidCoordinateFormat(_), Step::AwaitingSecondCoordinate) => {
                "⚠️ Invalid format!\nCorrect format: <b>41.327546, 69.281003</b>"
            }
            (CoreError::InvalidCoordinateFormat(_), _) => {
                "⚠️ Invalid format!\nCorrect format: <b>41.311081, 69.240562</b>"
            }
            (CoreError::InvalidSegmentCount(_), _) => "⚠️ Please enter a valid number.",
            (CoreError::InvalidAltitudeSpec(_) | CoreError::Export(_), _) => {
                "⚠️ Invalid altitude input.\nExamples: <b>50</b> or <b>50,60,70</b>"
            }
        };
        Outcome::Rejected {
            step: self.step,
            error,
            reply: Reply::plain(text),
        }
    }
}

/// Greeting for a newly started user, addressed by the first word of the name.
pub fn greeting(full_name: &str) -> Reply {
    let first_name = full_name.split_whitespace().next().unwrap_or("there");
    Reply::with_keyboard(
        format!(
            "Hello, <b>{first_name}</b> 👋\n\n\
             I am a geographic calculation bot.\n\
             {IDLE_HINT}"
        ),
        Keyboard::MainMenu,
    )
}

/// Notice for admins when a user registers for the first time.
pub fn new_user_notice(full_name: &str, username: Option<&str>, user_id: i64) -> Reply {
    Reply::plain(format!(
        "🆕 <b>New user joined</b>\n\n\
         👤 <b>Name:</b> {full_name}\n\
         🔗 <b>Username:</b> @{}\n\
         🆔 <b>ID:</b> <code>{user_id}</code>",
        username.unwrap_or("N/A")
    ))
}

/// Stored results, newest first, as a header plus one message per result.
pub fn history_replies(results: &[String]) -> Vec<Reply> {
    if results.is_empty() {
        return vec![Reply::with_keyboard(HISTORY_EMPTY_TEXT, Keyboard::MainMenu)];
    }

    std::iter::once(Reply::plain(format!(
        "📜 <b>Your last {} calculations:</b>",
        results.len()
    )))
    .chain(results.iter().enumerate().map(|(idx, result)| {
        Reply::plain(format!("📍 <b>Result {}:</b> <code>{}</code>", idx + 1, result))
    }))
    .collect()
}

/// Messages sent after a completed run: report chunks, then the summary.
pub fn completion_replies(calculation: &Calculation) -> Vec<Reply> {
    calculation
        .report
        .iter()
        .cloned()
        .chain(std::iter::once(calculation.summary.clone()))
        .map(Reply::plain)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Coordinate;

    fn limits() -> DialogueLimits {
        DialogueLimits::default()
    }

    fn text(value: &str) -> Command {
        Command::Text(value.to_string())
    }

    #[test]
    fn wire_names_are_snake_case() {
        assert_eq!(
            serde_json::to_value(Step::AwaitingSegmentCount).unwrap(),
            "awaiting_segment_count"
        );
        let reply = serde_json::to_value(Reply::with_keyboard("hi", Keyboard::MainMenu)).unwrap();
        assert_eq!(reply, serde_json::json!({ "text": "hi", "keyboard": "main_menu" }));
        let plain = serde_json::to_value(Reply::plain("hi")).unwrap();
        assert!(plain.get("keyboard").is_none());
    }

    #[test]
    fn about_and_help_carry_bot_information() {
        let mut session = session_at(Step::AwaitingSegmentCount);
        let Outcome::Info(about) = session.handle(Command::About, &limits()) else {
            panic!("about should be informational");
        };
        assert!(about.text.starts_with("🤖 <b>GeoCalculator Bot</b>"));
        assert_eq!(session.step(), Step::AwaitingSegmentCount);

        let Outcome::Info(help) = session.handle(Command::Help, &limits()) else {
            panic!("help should be informational");
        };
        for command in ["/start", "/coordinate", "/history", "/about", "/help"] {
            assert!(help.text.contains(command), "help lacks {command}");
        }
        assert!(help.text.contains("🧭 <b>How to use:</b>"));
        assert_eq!(help.keyboard, Some(Keyboard::MainMenu));
    }

    #[test]
    fn cancel_reply_depends_on_step() {
        let mut session = session_at(Step::AwaitingAltitude);
        assert_eq!(session.cancel().text, CANCELLED_TEXT);
        assert!(session.is_idle());
        assert!(session.request().is_empty());
        assert_eq!(session.cancel().text, IDLE_HINT);
    }

    #[test]
    fn history_replies_number_results() {
        let replies = history_replies(&[
            "3.848 km | Altitudes: [100]".to_string(),
            "1.200 km | Altitudes: [50, 60, 70]".to_string(),
        ]);
        assert_eq!(replies.len(), 3);
        assert_eq!(replies[0].text, "📜 <b>Your last 2 calculations:</b>");
        assert_eq!(
            replies[2].text,
            "📍 <b>Result 2:</b> <code>1.200 km | Altitudes: [50, 60, 70]</code>"
        );
    }

    #[test]
    fn empty_history_offers_menu() {
        let replies = history_replies(&[]);
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].text, HISTORY_EMPTY_TEXT);
        assert_eq!(replies[0].keyboard, Some(Keyboard::MainMenu));
    }

    #[test]
    fn new_user_notice_lists_identity() {
        let notice = new_user_notice("Ada Lovelace", None, 10);
        assert!(notice.text.starts_with("🆕 <b>New user joined</b>"));
        assert!(notice.text.contains("👤 <b>Name:</b> Ada Lovelace"));
        assert!(notice.text.contains("@N/A"));
        assert!(notice.text.ends_with("<code>10</code>"));
        assert!(new_user_notice("Ada", Some("ada"), 10).text.contains("@ada"));
    }

    #[test]
    fn greeting_uses_first_name() {
        let reply = greeting("Ada Lovelace");
        assert!(reply.text.starts_with("Hello, <b>Ada</b> 👋\n\n"));
        assert!(reply.text.ends_with(IDLE_HINT));
        assert_eq!(reply.keyboard, Some(Keyboard::MainMenu));
        assert!(greeting("  ").text.contains("<b>there</b>"));
    }

    /// Walk a fresh session up to `step` with valid inputs.
    fn session_at(step: Step) -> Session {
        let mut session = Session::new();
        let inputs = [
            (Step::AwaitingFirstCoordinate, Command::Start),
            (Step::AwaitingSecondCoordinate, text("41.311081, 69.240562")),
            (Step::AwaitingSegmentCount, text("41.327546, 69.281003")),
            (Step::AwaitingAltitude, text("5")),
        ];
        for (reached, command) in inputs {
            if session.step() == step {
                break;
            }
            assert!(matches!(session.handle(command, &limits()), Outcome::Prompted(_)));
            assert_eq!(session.step(), reached);
        }
        assert_eq!(session.step(), step);
        session
    }

    #[test]
    fn classifies_commands_and_labels() {
        assert_eq!(Command::classify("/coordinate"), Command::Start);
        assert_eq!(Command::classify(" 🧭 Coordinate calculation "), Command::Start);
        assert_eq!(Command::classify("❌ Cancel"), Command::Cancel);
        assert_eq!(Command::classify("/cancel"), Command::Cancel);
        assert_eq!(Command::classify("/history"), Command::History);
        assert_eq!(Command::classify("/help"), Command::Help);
        assert_eq!(Command::classify("/about"), Command::About);
        assert_eq!(Command::classify("41.3, 69.2"), text("41.3, 69.2"));
    }

    #[test]
    fn full_dialogue_completes_and_resets() {
        let mut session = session_at(Step::AwaitingAltitude);
        let stored = session.request().clone();
        assert_eq!(stored.coord_a, Coordinate::new(41.311081, 69.240562));
        assert_eq!(stored.coord_b, Coordinate::new(41.327546, 69.281003));
        assert_eq!(stored.segments, Some(5));

        let Outcome::Completed(calc) = session.handle(text("100"), &limits()) else {
            panic!("expected completion");
        };
        assert_eq!(calc.result.waypoints.len(), 6);
        assert!(calc.result.waypoints.iter().all(|wp| wp.altitude_m == 100));
        assert_eq!(calc.mission_xml.matches("<missionitem ").count(), 6);

        assert_eq!(session.step(), Step::Idle);
        assert!(session.request().is_empty());

        let replies = completion_replies(&calc);
        assert_eq!(replies.len(), calc.report.len() + 1);
        assert!(replies.last().unwrap().text.contains("Calculation completed"));
    }

    #[test]
    fn invalid_input_keeps_step_and_fields() {
        let cases = [
            (Step::AwaitingFirstCoordinate, "abc"),
            (Step::AwaitingFirstCoordinate, "95, 10"),
            (Step::AwaitingSecondCoordinate, "abc"),
            (Step::AwaitingSecondCoordinate, "41.3"),
            (Step::AwaitingSegmentCount, "0"),
            (Step::AwaitingSegmentCount, "-2"),
            (Step::AwaitingSegmentCount, "many"),
            (Step::AwaitingAltitude, "50,60"),
            (Step::AwaitingAltitude, "-5"),
            (Step::AwaitingAltitude, "high"),
        ];
        for (step, input) in cases {
            let mut session = session_at(step);
            let before = session.clone();
            let outcome = session.handle(text(input), &limits());
            let Outcome::Rejected { step: at, reply, .. } = outcome else {
                panic!("{input:?} at {step:?} was not rejected");
            };
            assert_eq!(at, step);
            assert!(reply.text.starts_with("⚠️"));
            assert_eq!(session, before, "{input:?} at {step:?} mutated the session");
        }
    }

    #[test]
    fn rejection_messages_match_step() {
        let mut session = session_at(Step::AwaitingSecondCoordinate);
        let Outcome::Rejected { error, reply, .. } = session.handle(text("x"), &limits()) else {
            panic!("expected rejection");
        };
        assert!(matches!(error, CoreError::InvalidCoordinateFormat(_)));
        assert!(reply.text.contains("41.327546, 69.281003"));

        let mut session = session_at(Step::AwaitingSegmentCount);
        let Outcome::Rejected { error, .. } = session.handle(text("0"), &limits()) else {
            panic!("expected rejection");
        };
        assert!(matches!(error, CoreError::InvalidSegmentCount(_)));
    }

    #[test]
    fn cancel_from_any_active_step_clears_request() {
        for step in [
            Step::AwaitingFirstCoordinate,
            Step::AwaitingSecondCoordinate,
            Step::AwaitingSegmentCount,
            Step::AwaitingAltitude,
        ] {
            let mut session = session_at(step);
            let outcome = session.handle_text("❌ Cancel", &limits());
            assert!(matches!(outcome, Outcome::Cancelled(_)), "{step:?}");
            assert_eq!(session.step(), Step::Idle);
            assert!(session.request().is_empty());
        }
    }

    #[test]
    fn idle_ignores_free_text_and_cancel() {
        let mut session = Session::new();
        assert!(matches!(session.handle(text("41.3, 69.2"), &limits()), Outcome::Info(_)));
        assert!(matches!(session.handle(Command::Cancel, &limits()), Outcome::Info(_)));
        assert_eq!(session, Session::new());
    }

    #[test]
    fn start_restarts_an_active_dialogue() {
        let mut session = session_at(Step::AwaitingAltitude);
        assert!(matches!(session.handle(Command::Start, &limits()), Outcome::Prompted(_)));
        assert_eq!(session.step(), Step::AwaitingFirstCoordinate);
        assert!(session.request().is_empty());
    }

    #[test]
    fn history_and_help_leave_session_alone() {
        let mut session = session_at(Step::AwaitingSegmentCount);
        let before = session.clone();
        assert!(matches!(session.handle(Command::History, &limits()), Outcome::History));
        assert!(matches!(session.handle(Command::Help, &limits()), Outcome::Info(_)));
        assert_eq!(session, before);
    }

    #[test]
    fn segment_limit_is_enforced() {
        let tight = DialogueLimits {
            max_segments: 10,
            ..Default::default()
        };
        let mut session = session_at(Step::AwaitingSegmentCount);
        assert!(matches!(
            session.handle(text("11"), &tight),
            Outcome::Rejected { .. }
        ));
        assert!(matches!(session.handle(text("10"), &tight), Outcome::Prompted(_)));
        assert_eq!(session.request().segments, Some(10));
    }

    #[test]
    fn keyboards_end_with_cancel() {
        for keyboard in [Keyboard::Cancel, Keyboard::Segments, Keyboard::Altitude] {
            let rows = keyboard.buttons();
            assert_eq!(rows.last().unwrap(), &vec![CANCEL_LABEL.to_string()]);
        }
        assert_eq!(Keyboard::Segments.buttons()[1], vec!["5", "10", "15"]);
        assert_eq!(
            Command::classify(&Keyboard::MainMenu.buttons()[0][0]),
            Command::Start
        );
    }
}
