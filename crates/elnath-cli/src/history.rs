//! Per-role output history for the interactive session.

use std::collections::{BTreeMap, VecDeque};

use elnath_core::{OutputEvent, Role};

/// Lines kept per role.
pub const MAX_HISTORY_LINES: usize = 5000;

/// Ring buffer of recent output for one role.
#[derive(Debug)]
pub struct RoleHistory {
    lines: VecDeque<OutputEvent>,
    capacity: usize,
}

impl RoleHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(capacity.min(MAX_HISTORY_LINES)),
            capacity: capacity.max(1),
        }
    }

    /// Add a line, removing the oldest if at capacity
    pub fn push(&mut self, event: OutputEvent) {
        if self.lines.len() >= self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(event);
    }

    /// The most recent `n` lines, oldest first.
    pub fn tail(&self, n: usize) -> impl Iterator<Item = &OutputEvent> {
        self.lines.iter().skip(self.lines.len().saturating_sub(n))
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Output history for every role.
#[derive(Debug)]
pub struct OutputHistory {
    roles: BTreeMap<Role, RoleHistory>,
}

impl OutputHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            roles: Role::ALL
                .into_iter()
                .map(|role| (role, RoleHistory::new(capacity)))
                .collect(),
        }
    }

    pub fn record(&mut self, event: &OutputEvent) {
        self.roles
            .entry(event.role)
            .or_insert_with(|| RoleHistory::new(MAX_HISTORY_LINES))
            .push(event.clone());
    }

    pub fn role(&self, role: Role) -> Option<&RoleHistory> {
        self.roles.get(&role)
    }
}

impl Default for OutputHistory {
    fn default() -> Self {
        Self::new(MAX_HISTORY_LINES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(role: Role, text: &str) -> OutputEvent {
        OutputEvent::line(role, text, false)
    }

    #[test]
    fn drops_oldest_at_capacity() {
        let mut history = RoleHistory::new(3);
        for text in ["a", "b", "c", "d"] {
            history.push(line(Role::Map, text));
        }
        let kept: Vec<_> = history.tail(10).map(|e| e.text.as_str()).collect();
        assert_eq!(kept, ["b", "c", "d"]);
    }

    #[test]
    fn tail_returns_most_recent_in_order() {
        let mut history = RoleHistory::new(10);
        for text in ["a", "b", "c", "d"] {
            history.push(line(Role::Map, text));
        }
        let tail: Vec<_> = history.tail(2).map(|e| e.text.as_str()).collect();
        assert_eq!(tail, ["c", "d"]);
    }

    #[test]
    fn roles_are_kept_apart() {
        let mut history = OutputHistory::default();
        history.record(&line(Role::Login, "hello"));
        history.record(&line(Role::Map, "world"));

        assert_eq!(history.role(Role::Login).unwrap().len(), 1);
        assert_eq!(history.role(Role::Map).unwrap().len(), 1);
        assert!(history.role(Role::Char).unwrap().is_empty());
    }
}
