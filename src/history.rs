use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<String>,
    capacity: usize,
    /// Position for Up/Down recall; `len()` means "past the newest entry".
    cursor: usize,
}

impl History {
    pub fn new(capacity: usize) -> Self {
        Self { entries: VecDeque::new(), capacity, cursor: 0 }
    }

    /// Restore persisted entries, keeping only the newest `capacity`.
    pub fn from_entries(entries: Vec<String>, capacity: usize) -> Self {
        let skip = entries.len().saturating_sub(capacity);
        let entries: VecDeque<String> = entries.into_iter().skip(skip).collect();
        let cursor = entries.len();
        Self { entries, capacity, cursor }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.entries.iter().cloned().collect()
    }

    /// Append unconditionally, evicting the oldest entries past capacity.
    pub fn push(&mut self, line: &str) {
        self.entries.push_back(line.to_string());
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        self.cursor = self.entries.len();
    }

    /// Record a line typed at the prompt. Repeats of the last entry and `history`
    /// invocations are skipped, except into an empty history. Returns whether the
    /// entries changed.
    pub fn record(&mut self, line: &str) -> bool {
        let accept = match self.entries.back() {
            None => true,
            Some(last) => last != line && !line.starts_with("history"),
        };
        if accept {
            self.push(line);
        }
        self.cursor = self.entries.len();
        accept
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }

    /// Remove the 1-based entry `index`. Returns false when out of range.
    pub fn delete(&mut self, index: usize) -> bool {
        if index == 0 || index > self.entries.len() {
            return false;
        }
        self.entries.remove(index - 1);
        self.cursor = self.entries.len();
        true
    }

    /// Step back (Up). Stays on the oldest entry once reached.
    pub fn prev(&mut self) -> Option<&str> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        self.entries.get(self.cursor).map(String::as_str)
    }

    /// Step forward (Down). Past the newest entry yields an empty line.
    pub fn next(&mut self) -> &str {
        if self.cursor + 1 < self.entries.len() {
            self.cursor += 1;
            self.entries[self.cursor].as_str()
        } else {
            self.cursor = self.entries.len();
            ""
        }
    }

    /// Alt+. recall: step back and return that entry's last argument unless it is a flag.
    pub fn last_argument(&mut self) -> Option<String> {
        let entry = self.prev()?;
        let parts: Vec<&str> = entry.split_whitespace().collect();
        match parts.as_slice() {
            [_, .., last] if !last.starts_with('-') => Some(last.to_string()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut history = History::new(100);
        for i in 0..101 {
            history.push(&format!("echo {i}"));
        }
        assert_eq!(history.len(), 100);
        assert_eq!(history.entries().next(), Some("echo 1"));
        assert_eq!(history.entries().last(), Some("echo 100"));
    }

    #[test]
    fn test_record_skips_repeats_and_history() {
        let mut history = History::new(10);
        assert!(history.record("history"));
        assert!(history.record("ls"));
        assert!(!history.record("ls"));
        assert!(!history.record("history -c"));
        assert!(history.record("pwd"));
        assert_eq!(history.to_vec(), vec!["history", "ls", "pwd"]);
    }

    #[test]
    fn test_from_entries_truncates() {
        let entries: Vec<String> = (0..5).map(|i| i.to_string()).collect();
        let history = History::from_entries(entries, 3);
        assert_eq!(history.to_vec(), vec!["2", "3", "4"]);
    }

    #[test]
    fn test_delete_is_one_based() {
        let mut history = History::from_entries(vec!["a".into(), "b".into(), "c".into()], 10);
        assert!(!history.delete(0));
        assert!(!history.delete(4));
        assert!(history.delete(2));
        assert_eq!(history.to_vec(), vec!["a", "c"]);
    }

    #[test]
    fn test_navigation() {
        let mut history = History::from_entries(vec!["ls".into(), "pwd".into()], 10);
        assert_eq!(history.prev(), Some("pwd"));
        assert_eq!(history.prev(), Some("ls"));
        assert_eq!(history.prev(), None);
        assert_eq!(history.next(), "pwd");
        assert_eq!(history.next(), "");
        assert_eq!(history.prev(), Some("pwd"));
    }

    #[test]
    fn test_last_argument() {
        let mut history =
            History::from_entries(vec!["cat about.txt".into(), "ls -l".into(), "pwd".into()], 10);
        assert_eq!(history.last_argument(), None);
        assert_eq!(history.last_argument(), None);
        assert_eq!(history.last_argument().as_deref(), Some("about.txt"));
    }
}
