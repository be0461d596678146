// sls-logs - app/select.rs
//
// Interactive selection of the functions to watch.
//
// The selection logic is a plain state machine (`MultiSelectState`) driven by
// abstract keys, so it can be tested without a terminal. ui::prompt feeds it
// real key presses and draws it; the `Selector` trait is the seam the run
// loop depends on.

use crate::core::model::FunctionName;
use crate::util::error::PromptError;

/// Something that can ask the user to pick a non-empty subset of names.
pub trait Selector {
    /// Return the chosen names in the order they were chosen.
    fn select(&mut self, message: &str, candidates: &[FunctionName]) -> Result<Vec<FunctionName>, PromptError>;
}

// =============================================================================
// Multi-select state machine
// =============================================================================

/// Abstract key presses understood by the multi-select.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectKey {
    Up,
    Down,
    Toggle,
    ToggleAll,
    Confirm,
    Cancel,
    Other,
}

/// What the prompt should do after a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectStep {
    Continue,
    Done(Vec<FunctionName>),
    Cancelled,
}

/// Hint shown when confirming with nothing selected.
pub const EMPTY_SELECTION_HINT: &str = "Select at least one function (space to toggle)";

/// Cursor position and toggled rows of a multi-select prompt.
#[derive(Debug, Clone)]
pub struct MultiSelectState {
    items: Vec<FunctionName>,
    cursor: usize,
    /// Indices into `items`, in the order they were toggled on.
    chosen: Vec<usize>,
    notice: Option<&'static str>,
}

impl MultiSelectState {
    pub fn new(items: Vec<FunctionName>) -> Self {
        Self {
            items,
            cursor: 0,
            chosen: Vec::new(),
            notice: None,
        }
    }

    pub fn items(&self) -> &[FunctionName] {
        &self.items
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_chosen(&self, index: usize) -> bool {
        self.chosen.contains(&index)
    }

    /// One-shot message for the next render (cleared by the next key).
    pub fn notice(&self) -> Option<&'static str> {
        self.notice
    }

    /// Currently chosen names, in toggle order.
    pub fn chosen_names(&self) -> Vec<FunctionName> {
        self.chosen.iter().map(|&i| self.items[i].clone()).collect()
    }

    /// Apply one key press.
    pub fn handle(&mut self, key: SelectKey) -> SelectStep {
        self.notice = None;
        let len = self.items.len();
        match key {
            SelectKey::Up if len > 0 => {
                self.cursor = (self.cursor + len - 1) % len;
            }
            SelectKey::Down if len > 0 => {
                self.cursor = (self.cursor + 1) % len;
            }
            SelectKey::Toggle if len > 0 => {
                let index = self.cursor;
                match self.chosen.iter().position(|&i| i == index) {
                    Some(pos) => {
                        self.chosen.remove(pos);
                    }
                    None => self.chosen.push(index),
                }
            }
            SelectKey::ToggleAll => {
                if self.chosen.len() == len {
                    self.chosen.clear();
                } else {
                    for index in 0..len {
                        if !self.chosen.contains(&index) {
                            self.chosen.push(index);
                        }
                    }
                }
            }
            SelectKey::Confirm => {
                if self.chosen.is_empty() {
                    self.notice = Some(EMPTY_SELECTION_HINT);
                } else {
                    return SelectStep::Done(self.chosen_names());
                }
            }
            SelectKey::Cancel => return SelectStep::Cancelled,
            _ => {}
        }
        SelectStep::Continue
    }
}

// =============================================================================
// Line-based fallback
// =============================================================================

/// Parse a typed answer of 1-based indices (comma and/or whitespace
/// separated) into names, in the order typed. Repeated indices count once.
/// `all` (or `*`) selects everything.
pub fn parse_index_list(answer: &str, candidates: &[FunctionName]) -> Result<Vec<FunctionName>, PromptError> {
    let trimmed = answer.trim();
    if trimmed.eq_ignore_ascii_case("all") || trimmed == "*" {
        return Ok(candidates.to_vec());
    }

    let invalid = |reason: String| PromptError::InvalidAnswer {
        answer: trimmed.to_string(),
        reason,
    };

    let mut indices: Vec<usize> = Vec::new();
    for token in trimmed
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
    {
        let number: usize = token
            .parse()
            .map_err(|_| invalid(format!("'{token}' is not a number")))?;
        if number == 0 || number > candidates.len() {
            return Err(invalid(format!(
                "{number} is out of range (1-{})",
                candidates.len()
            )));
        }
        if !indices.contains(&(number - 1)) {
            indices.push(number - 1);
        }
    }

    if indices.is_empty() {
        return Err(invalid("no function selected".to_string()));
    }
    Ok(indices.into_iter().map(|i| candidates[i].clone()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names() -> Vec<FunctionName> {
        vec!["a".into(), "b".into(), "c".into()]
    }

    #[test]
    fn test_selection_follows_toggle_order() {
        let mut s = MultiSelectState::new(names());
        s.handle(SelectKey::Down);
        s.handle(SelectKey::Down);
        s.handle(SelectKey::Toggle); // c
        s.handle(SelectKey::Up);
        s.handle(SelectKey::Up);
        s.handle(SelectKey::Toggle); // a
        assert_eq!(
            s.handle(SelectKey::Confirm),
            SelectStep::Done(vec!["c".into(), "a".into()])
        );
    }

    #[test]
    fn test_toggle_twice_unselects() {
        let mut s = MultiSelectState::new(names());
        s.handle(SelectKey::Toggle);
        s.handle(SelectKey::Toggle);
        assert!(!s.is_chosen(0));
    }

    #[test]
    fn test_cursor_wraps() {
        let mut s = MultiSelectState::new(names());
        s.handle(SelectKey::Up);
        assert_eq!(s.cursor(), 2);
        s.handle(SelectKey::Down);
        assert_eq!(s.cursor(), 0);
    }

    #[test]
    fn test_confirm_with_nothing_chosen_is_refused() {
        let mut s = MultiSelectState::new(names());
        assert_eq!(s.handle(SelectKey::Confirm), SelectStep::Continue);
        assert_eq!(s.notice(), Some(EMPTY_SELECTION_HINT));
        s.handle(SelectKey::Other);
        assert_eq!(s.notice(), None);
    }

    #[test]
    fn test_toggle_all_keeps_existing_order_then_clears() {
        let mut s = MultiSelectState::new(names());
        s.handle(SelectKey::Down);
        s.handle(SelectKey::Toggle); // b
        s.handle(SelectKey::ToggleAll);
        assert_eq!(s.chosen_names(), vec!["b", "a", "c"]);
        s.handle(SelectKey::ToggleAll);
        assert!(s.chosen_names().is_empty());
    }

    #[test]
    fn test_cancel() {
        let mut s = MultiSelectState::new(names());
        assert_eq!(s.handle(SelectKey::Cancel), SelectStep::Cancelled);
    }

    #[test]
    fn test_empty_items_never_panic() {
        let mut s = MultiSelectState::new(Vec::new());
        for key in [SelectKey::Up, SelectKey::Down, SelectKey::Toggle, SelectKey::ToggleAll] {
            assert_eq!(s.handle(key), SelectStep::Continue);
        }
    }

    #[test]
    fn test_parse_index_list() {
        assert_eq!(parse_index_list("3, 1", &names()).unwrap(), vec!["c", "a"]);
        assert_eq!(parse_index_list("2 2 1", &names()).unwrap(), vec!["b", "a"]);
        assert_eq!(parse_index_list(" all ", &names()).unwrap(), names());
    }

    #[test]
    fn test_parse_index_list_rejects_bad_input() {
        for bad in ["", "0", "4", "x", "1,,y"] {
            assert!(
                matches!(parse_index_list(bad, &names()), Err(PromptError::InvalidAnswer { .. })),
                "{bad:?} should be rejected"
            );
        }
    }
}
