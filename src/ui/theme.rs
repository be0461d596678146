// sls-logs - ui/theme.rs
//
// Terminal colour mapping for tones. No dependencies on app state or
// business logic.

use crate::core::model::Tone;
use colored::{ColoredString, Colorize};

/// Paint `text` in the colour for `tone`.
pub fn paint(text: &str, tone: Tone) -> ColoredString {
    match tone {
        Tone::Plain => text.normal(),
        Tone::Success => text.green(),
        Tone::Warning => text.yellow(),
        Tone::Error => text.red(),
    }
}

/// Emphasised variant used for tool-level messages (not relayed output).
pub fn paint_bright(text: &str, tone: Tone) -> ColoredString {
    match tone {
        Tone::Plain => text.bold(),
        Tone::Success => text.bright_green(),
        Tone::Warning => text.bright_yellow(),
        Tone::Error => text.bright_red(),
    }
}

/// Row markers for the multi-select prompt.
pub const POINTER: &str = "❯";
pub const CHECKED: &str = "◉";
pub const UNCHECKED: &str = "◯";
