// dashboard/session/history.rs - Bounded recent-search history

use std::collections::VecDeque;

use serde::Serialize;

/// Default number of remembered searches
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// Most-recent-first list of search queries with a fixed capacity
#[derive(Clone, Debug, Serialize)]
pub struct RecentSearches {
    entries: VecDeque<String>,
    capacity: usize,
}

impl Default for RecentSearches {
    fn default() -> Self {
        RecentSearches::with_capacity(DEFAULT_HISTORY_LIMIT)
    }
}

impl RecentSearches {
    pub fn with_capacity(capacity: usize) -> Self {
        RecentSearches {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record a query at the front
    ///
    /// Blank queries are ignored. An exact duplicate moves to the front.
    /// The oldest entry falls off once capacity is reached.
    pub fn record(&mut self, query: &str) {
        let query = query.trim();
        if query.is_empty() || self.capacity == 0 {
            return;
        }

        if let Some(pos) = self.entries.iter().position(|q| q == query) {
            self.entries.remove(pos);
        }
        self.entries.push_front(query.to_string());
        self.entries.truncate(self.capacity);
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn latest(&self) -> Option<&str> {
        self.entries.front().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_most_recent_first() {
        let mut history = RecentSearches::default();
        history.record("tôm");
        history.record("cá hồi");
        assert_eq!(history.iter().collect::<Vec<_>>(), vec!["cá hồi", "tôm"]);
        assert_eq!(history.latest(), Some("cá hồi"));
    }

    #[test]
    fn test_duplicate_moves_to_front() {
        let mut history = RecentSearches::default();
        history.record("a");
        history.record("b");
        history.record("a");
        assert_eq!(history.iter().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_dedup_is_case_sensitive() {
        let mut history = RecentSearches::default();
        history.record("Milk");
        history.record("milk");
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let mut history = RecentSearches::with_capacity(3);
        for q in ["1", "2", "3", "4"] {
            history.record(q);
        }
        assert_eq!(history.iter().collect::<Vec<_>>(), vec!["4", "3", "2"]);
    }

    #[test]
    fn test_blank_queries_ignored() {
        let mut history = RecentSearches::default();
        history.record("");
        history.record("   ");
        assert!(history.is_empty());
    }
}
