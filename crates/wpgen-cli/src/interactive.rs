//! Line-by-line dialogue over any reader/writer pair.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use wpgen_core::{
    completion_replies, greeting, history_replies, mission_file_name, DialogueLimits, Keyboard,
    Outcome, Reply, Session, MISSION_CAPTION,
};

use crate::render;

const HISTORY_LIMIT: usize = 3;

/// Feed each input line through a [`Session`] and print the replies.
///
/// History only covers calculations finished during this run. Returns the
/// paths of the mission files written.
pub fn run_interactive<R: BufRead, W: Write>(
    input: R,
    output: &mut W,
    out_dir: &Path,
    user_id: i64,
    limits: &DialogueLimits,
) -> Result<Vec<PathBuf>> {
    let mut session = Session::new();
    let mut history: Vec<String> = Vec::new();
    let mut written = Vec::new();

    print_replies(output, &[greeting("")])?;

    for line in input.lines() {
        let line = line.context("failed to read input")?;
        if line.trim().is_empty() {
            continue;
        }

        match session.handle_text(&line, limits) {
            Outcome::Prompted(reply)
            | Outcome::Cancelled(reply)
            | Outcome::Info(reply)
            | Outcome::Rejected { reply, .. } => print_replies(output, &[reply])?,
            Outcome::History => print_replies(output, &history_replies(&history))?,
            Outcome::Completed(calculation) => {
                print_replies(output, &completion_replies(&calculation))?;

                std::fs::create_dir_all(out_dir)
                    .with_context(|| format!("failed to create {}", out_dir.display()))?;
                let path = out_dir.join(mission_file_name(user_id));
                std::fs::write(&path, &calculation.mission_xml)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                writeln!(output, "{MISSION_CAPTION} {}", path.display())?;
                writeln!(output, "{}\n", render::keyboard(Keyboard::MainMenu))?;

                history.insert(0, calculation.result_summary());
                history.truncate(HISTORY_LIMIT);
                written.push(path);
            }
        }
    }

    Ok(written)
}

fn print_replies<W: Write>(output: &mut W, replies: &[Reply]) -> Result<()> {
    for reply in replies {
        writeln!(output, "{}\n", render::reply(reply))?;
    }
    Ok(())
}
