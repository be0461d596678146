// sls-logs - ui/prompt.rs
//
// Terminal front end for the function picker and the install confirmation.
//
// On a real terminal the picker is a redrawn checkbox list driven by single
// key presses. When stdin or the output is not a terminal (pipes, CI) it
// falls back to a numbered list and one typed line of indices.

use crate::app::install::Confirmer;
use crate::app::select::{parse_index_list, MultiSelectState, SelectKey, SelectStep, Selector};
use crate::core::model::{FunctionName, Tone};
use crate::ui::theme::{paint, paint_bright, CHECKED, POINTER, UNCHECKED};
use crate::util::error::PromptError;
use colored::Colorize;
use console::{Key, Term};
use std::io::{self, BufRead, IsTerminal, Write};

/// Key help shown under the picker header.
const KEY_HELP: &str = "space: toggle, a: all, enter: confirm, esc: cancel";

/// Map a terminal key to a picker action.
pub fn map_key(key: &Key) -> SelectKey {
    match key {
        Key::ArrowUp | Key::BackTab | Key::Char('k') => SelectKey::Up,
        Key::ArrowDown | Key::Tab | Key::Char('j') => SelectKey::Down,
        Key::Char(' ') => SelectKey::Toggle,
        Key::Char('a') => SelectKey::ToggleAll,
        Key::Enter => SelectKey::Confirm,
        Key::Escape | Key::CtrlC | Key::Char('q') => SelectKey::Cancel,
        _ => SelectKey::Other,
    }
}

/// Lines drawn for one frame of the picker. The count is fixed for a given
/// item list so the previous frame can be cleared by line count.
pub fn render_rows(message: &str, state: &MultiSelectState) -> Vec<String> {
    let mut rows = Vec::with_capacity(state.items().len() + 2);
    rows.push(format!(
        "{} {} {}",
        "?".cyan().bold(),
        message.bold(),
        format!("({KEY_HELP})").dimmed()
    ));
    for (index, name) in state.items().iter().enumerate() {
        let pointer = if index == state.cursor() { POINTER } else { " " };
        let row = if state.is_chosen(index) {
            format!("{} {}", CHECKED, name).green().to_string()
        } else {
            format!("{} {}", UNCHECKED, name)
        };
        rows.push(format!("{} {}", pointer.cyan(), row));
    }
    rows.push(match state.notice() {
        Some(notice) => paint(notice, Tone::Warning).to_string(),
        None => String::new(),
    });
    rows
}

/// Terminal whose cursor can be shown again.
trait ShowCursor {
    fn show_cursor(&self) -> io::Result<()>;
}

impl ShowCursor for Term {
    fn show_cursor(&self) -> io::Result<()> {
        Term::show_cursor(self)
    }
}

/// Shows the cursor when dropped, on every path out of the picker
/// (including `?` returns on terminal errors).
struct CursorGuard<'a, T: ShowCursor + ?Sized> {
    term: &'a T,
}

impl<T: ShowCursor + ?Sized> Drop for CursorGuard<'_, T> {
    fn drop(&mut self) {
        if let Err(e) = self.term.show_cursor() {
            tracing::debug!(error = %e, "Failed to restore the cursor");
        }
    }
}

/// `Selector` and `Confirmer` backed by the user's terminal.
pub struct TerminalPrompt {
    term: Term,
}

impl Default for TerminalPrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalPrompt {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
        }
    }

    fn interactive(&self) -> bool {
        self.term.is_term() && io::stdin().is_terminal()
    }

    fn select_interactive(
        &mut self,
        message: &str,
        candidates: &[FunctionName],
    ) -> Result<Vec<FunctionName>, PromptError> {
        let mut state = MultiSelectState::new(candidates.to_vec());
        let mut drawn = 0usize;

        self.term.hide_cursor()?;
        let cursor = CursorGuard { term: &self.term };
        let outcome = loop {
            if drawn > 0 {
                self.term.clear_last_lines(drawn)?;
            }
            let rows = render_rows(message, &state);
            for row in &rows {
                self.term.write_line(row)?;
            }
            drawn = rows.len();

            let key = match self.term.read_key() {
                Ok(key) => key,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => break Err(PromptError::Cancelled),
                Err(e) => break Err(PromptError::Terminal(e)),
            };
            match state.handle(map_key(&key)) {
                SelectStep::Continue => {}
                SelectStep::Done(names) => break Ok(names),
                SelectStep::Cancelled => break Err(PromptError::Cancelled),
            }
        };

        self.term.clear_last_lines(drawn)?;
        drop(cursor);
        if let Ok(names) = &outcome {
            self.term.write_line(&format!(
                "{} {} {}",
                "✔".green(),
                message.bold(),
                names.join(", ").cyan()
            ))?;
        }
        outcome
    }

    fn select_by_number(
        &mut self,
        message: &str,
        candidates: &[FunctionName],
    ) -> Result<Vec<FunctionName>, PromptError> {
        self.term.write_line(&format!("{} {}", "?".cyan().bold(), message.bold()))?;
        for (index, name) in candidates.iter().enumerate() {
            self.term.write_line(&format!("  {:>3}) {}", index + 1, name))?;
        }

        let stdin = io::stdin();
        loop {
            let mut out = io::stdout();
            write!(out, "Enter numbers (e.g. 1,3) or 'all': ")?;
            out.flush()?;

            let mut answer = String::new();
            if stdin.lock().read_line(&mut answer)? == 0 {
                return Err(PromptError::Cancelled);
            }
            match parse_index_list(&answer, candidates) {
                Ok(names) => return Ok(names),
                Err(e) => {
                    tracing::debug!(error = %e, "Rejected selection answer");
                    eprintln!("{}", paint(&e.to_string(), Tone::Warning));
                }
            }
        }
    }
}

impl Selector for TerminalPrompt {
    fn select(&mut self, message: &str, candidates: &[FunctionName]) -> Result<Vec<FunctionName>, PromptError> {
        if self.interactive() {
            self.select_interactive(message, candidates)
        } else {
            tracing::debug!("Not a terminal, using numbered selection");
            self.select_by_number(message, candidates)
        }
    }
}

impl Confirmer for TerminalPrompt {
    fn ask(&mut self, question: &str) -> Result<String, PromptError> {
        let mut out = io::stdout();
        write!(out, "{}", paint_bright(question, Tone::Plain))?;
        out.flush()?;

        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer)? == 0 {
            return Err(PromptError::Cancelled);
        }
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(rows: Vec<String>) -> Vec<String> {
        rows.iter()
            .map(|r| console::strip_ansi_codes(r).into_owned())
            .collect()
    }

    #[derive(Default)]
    struct FakeTerm {
        shown: std::cell::Cell<usize>,
    }

    impl ShowCursor for FakeTerm {
        fn show_cursor(&self) -> io::Result<()> {
            self.shown.set(self.shown.get() + 1);
            Ok(())
        }
    }

    fn failing_draw(term: &FakeTerm) -> Result<(), PromptError> {
        let _cursor = CursorGuard { term };
        let write: io::Result<()> = Err(io::Error::new(io::ErrorKind::BrokenPipe, "gone"));
        write?;
        Ok(())
    }

    #[test]
    fn test_cursor_restored_on_error_return() {
        let term = FakeTerm::default();
        assert!(matches!(failing_draw(&term), Err(PromptError::Terminal(_))));
        assert_eq!(term.shown.get(), 1);
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(map_key(&Key::ArrowUp), SelectKey::Up);
        assert_eq!(map_key(&Key::Char('j')), SelectKey::Down);
        assert_eq!(map_key(&Key::Char(' ')), SelectKey::Toggle);
        assert_eq!(map_key(&Key::Char('a')), SelectKey::ToggleAll);
        assert_eq!(map_key(&Key::Enter), SelectKey::Confirm);
        assert_eq!(map_key(&Key::Escape), SelectKey::Cancel);
        assert_eq!(map_key(&Key::Char('x')), SelectKey::Other);
    }

    #[test]
    fn test_render_rows_is_stable_in_height() {
        let mut state = MultiSelectState::new(vec!["alpha".into(), "beta".into()]);
        let first = plain(render_rows("Pick", &state));
        assert_eq!(first.len(), 4);
        assert!(first[1].starts_with(POINTER));
        assert!(first[1].contains(&format!("{UNCHECKED} alpha")));
        assert_eq!(first[3], "");

        state.handle(SelectKey::Toggle);
        state.handle(SelectKey::Down);
        state.handle(SelectKey::Confirm);
        let second = plain(render_rows("Pick", &state));
        assert_eq!(second.len(), 4);
        assert!(second[1].contains(&format!("{CHECKED} alpha")));
        assert!(second[2].starts_with(POINTER));
        assert_eq!(second[3], "");
    }

    #[test]
    fn test_render_rows_shows_notice() {
        let mut state = MultiSelectState::new(vec!["alpha".into()]);
        state.handle(SelectKey::Confirm);
        let rows = plain(render_rows("Pick", &state));
        assert_eq!(rows.last().map(String::as_str), Some(crate::app::select::EMPTY_SELECTION_HINT));
    }
}
