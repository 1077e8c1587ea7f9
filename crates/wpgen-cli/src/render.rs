//! Terminal rendering of dialogue replies.

use wpgen_core::{Keyboard, Reply};

const MARKUP_TAGS: [&str; 6] = ["<b>", "</b>", "<code>", "</code>", "<i>", "</i>"];

/// Drop the HTML markup the chat transport would interpret.
pub fn strip_markup(text: &str) -> String {
    MARKUP_TAGS
        .iter()
        .fold(text.to_string(), |acc, tag| acc.replace(tag, ""))
}

pub fn keyboard(keyboard: Keyboard) -> String {
    keyboard
        .buttons()
        .iter()
        .map(|row| {
            row.iter()
                .map(|label| format!("[ {label} ]"))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn reply(reply: &Reply) -> String {
    let mut out = strip_markup(&reply.text);
    if let Some(kb) = reply.keyboard {
        out.push('\n');
        out.push_str(&keyboard(kb));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_known_tags_only() {
        assert_eq!(
            strip_markup("📍 <b>Point 0</b>: <code>1.000000, 2.000000</code> <x>"),
            "📍 Point 0: 1.000000, 2.000000 <x>"
        );
    }

    #[test]
    fn keyboard_rows_render_as_buttons() {
        let rendered = keyboard(Keyboard::Segments);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "[ 2 ] [ 3 ] [ 4 ]");
        assert_eq!(lines.last().copied(), Some("[ ❌ Cancel ]"));
    }
}
