//! Bounded per-policy action history.

use std::collections::VecDeque;

use kanto_types::Button;

/// How many actions a policy remembers.
const HISTORY_CAP: usize = 20;

/// A FIFO of the most recent actions a single policy instance chose.
///
/// Each policy instance owns exactly one history; instances never share
/// or inspect each other's. At capacity (20 entries) the oldest is
/// evicted, so the window always covers the latest actions in order.
#[derive(Debug, Clone, Default)]
pub struct ActionHistory {
    entries: VecDeque<Button>,
}

impl ActionHistory {
    /// Creates an empty history.
    pub const fn new() -> Self {
        Self {
            entries: VecDeque::new(),
        }
    }

    /// Appends `action`, evicting the oldest entry at capacity.
    pub fn push(&mut self, action: Button) {
        if self.entries.len() >= HISTORY_CAP {
            self.entries.pop_front();
        }
        self.entries.push_back(action);
    }

    /// Number of remembered actions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no action has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remembered actions, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = Button> + '_ {
        self.entries.iter().copied()
    }

    /// The most recently recorded action, if any.
    pub fn last(&self) -> Option<Button> {
        self.entries.back().copied()
    }

    /// Whether `action` appears among the last `window` entries.
    pub fn contains_recent(&self, action: Button, window: usize) -> bool {
        self.entries
            .iter()
            .rev()
            .take(window)
            .any(|&recent| recent == action)
    }
}

impl<'a> IntoIterator for &'a ActionHistory {
    type Item = Button;
    type IntoIter = std::iter::Copied<std::collections::vec_deque::Iter<'a, Button>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter().copied()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn push_keeps_insertion_order() {
        let mut history = ActionHistory::new();
        history.push(Button::A);
        history.push(Button::Up);
        history.push(Button::B);

        let entries: Vec<Button> = history.iter().collect();
        assert_eq!(entries, vec![Button::A, Button::Up, Button::B]);
        assert_eq!(history.last(), Some(Button::B));
    }

    #[test]
    fn twenty_first_push_evicts_the_oldest() {
        let mut history = ActionHistory::new();
        history.push(Button::Start);
        for _ in 0..19 {
            history.push(Button::Up);
        }
        assert_eq!(history.len(), 20);
        assert_eq!(history.iter().next(), Some(Button::Start));

        history.push(Button::Down);
        assert_eq!(history.len(), 20);
        // Start was the oldest entry and is gone; the window now opens
        // with the first Up and closes with the new Down.
        assert_eq!(history.iter().next(), Some(Button::Up));
        assert_eq!(history.last(), Some(Button::Down));
        assert!(!history.contains_recent(Button::Start, 20));
    }

    #[test]
    fn contains_recent_only_looks_inside_the_window() {
        let mut history = ActionHistory::new();
        history.push(Button::Left);
        history.push(Button::A);
        history.push(Button::A);

        assert!(history.contains_recent(Button::A, 1));
        assert!(!history.contains_recent(Button::Left, 2));
        assert!(history.contains_recent(Button::Left, 3));
    }

    #[test]
    fn empty_history_reports_empty() {
        let history = ActionHistory::new();
        assert!(history.is_empty());
        assert_eq!(history.last(), None);
        assert!(!history.contains_recent(Button::A, 20));
    }
}
