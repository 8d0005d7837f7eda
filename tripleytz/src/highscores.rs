use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// How many entries a high-score list keeps unless configured otherwise.
pub const DEFAULT_CAPACITY: usize = 20;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScore {
    pub score: u32,
    pub when: DateTime<Local>,
    pub name: String,
}

impl HighScore {
    /// Ranking key: higher scores first, and among equal scores the more recent one.
    fn outranks(&self, score: u32, when: &DateTime<Local>) -> bool {
        (self.score, &self.when) > (score, when)
    }
}

/// The narrow interface the game needs from whoever keeps the high scores.
pub trait HighScoreLedger {
    /// Would `score` make it onto the list?
    fn is_high_score(&self, score: u32) -> bool;

    /// Returns `false` if the score does not qualify, in which case nothing changes.
    fn insert(&mut self, score: u32, name: &str, when: DateTime<Local>) -> bool;

    /// Persists the list. Failures must not reach the game.
    fn save(&mut self) {}

    /// Suggestion for the name prompt.
    fn last_used_name(&self) -> Option<&str> {
        None
    }
}

/// A high-score list ordered by score (descending), ties broken by the more
/// recent entry first, never longer than its capacity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HighScores {
    capacity: usize,
    entries: Vec<HighScore>,
}

impl HighScores {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Vec::new(),
        }
    }

    /// Builds a list from entries in any order. Surplus entries are dropped.
    pub fn from_entries(capacity: usize, mut entries: Vec<HighScore>) -> Self {
        entries.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| b.when.cmp(&a.when)));
        entries.truncate(capacity);
        Self { capacity, entries }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Shrinking the capacity drops the lowest entries.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        self.entries.truncate(capacity);
    }

    pub fn entries(&self) -> &[HighScore] {
        &self.entries
    }

    /// Entries with their 1-based rank.
    pub fn ranked(&self) -> impl Iterator<Item = (usize, &HighScore)> + '_ {
        self.entries.iter().enumerate().map(|(i, hs)| (i + 1, hs))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    pub fn lowest(&self) -> Option<&HighScore> {
        self.entries.last()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for HighScores {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl HighScoreLedger for HighScores {
    fn is_high_score(&self, score: u32) -> bool {
        if self.capacity == 0 {
            return false;
        }
        match self.lowest() {
            Some(lowest) if self.is_full() => score > lowest.score,
            _ => true,
        }
    }

    fn insert(&mut self, score: u32, name: &str, when: DateTime<Local>) -> bool {
        if !self.is_high_score(score) {
            return false;
        }
        let pos = self
            .entries
            .iter()
            .position(|hs| !hs.outranks(score, &when))
            .unwrap_or(self.entries.len());
        self.entries.insert(
            pos,
            HighScore {
                score,
                when,
                name: String::from(name),
            },
        );
        self.entries.truncate(self.capacity);
        true
    }
}
