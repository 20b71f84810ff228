//! High score list persisted as JSON
//!
//! Keeps the top 10 scores, best first. The file is a plain array of
//! `{name, score, timestamp}` records.

use anyhow::{Context, ensure};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Maximum number of entries kept
pub const MAX_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub name: String,
    pub score: u32,
    /// RFC 3339 local time the score was recorded
    pub timestamp: String,
}

impl HighScoreEntry {
    /// Create an entry; the name must not be empty
    pub fn new(name: impl Into<String>, score: u32, timestamp: impl Into<String>) -> anyhow::Result<Self> {
        let entry = Self {
            name: name.into(),
            score,
            timestamp: timestamp.into(),
        };
        entry.validate()?;
        Ok(entry)
    }

    fn validate(&self) -> anyhow::Result<()> {
        ensure!(!self.name.is_empty(), "high score name must not be empty");
        Ok(())
    }
}

/// Ranked high score list bound to a file
#[derive(Debug, Clone)]
pub struct HighScores {
    path: PathBuf,
    scores: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Load the list from `path`.
    ///
    /// A missing file gives an empty list. A file that cannot be read or
    /// parsed is logged and also gives an empty list.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let scores = match Self::read_entries(&path) {
            Ok(Some(mut scores)) => {
                sort_and_truncate(&mut scores);
                info!(path = %path.display(), count = scores.len(), "loaded high scores");
                scores
            }
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(path = %path.display(), "ignoring corrupted high score file: {e:#}");
                Vec::new()
            }
        };
        Self { path, scores }
    }

    fn read_entries(path: &Path) -> anyhow::Result<Option<Vec<HighScoreEntry>>> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e).context("failed to read high score file"),
        };
        let scores: Vec<HighScoreEntry> =
            serde_json::from_str(&contents).context("failed to parse high score file")?;
        for entry in &scores {
            entry.validate()?;
        }
        Ok(Some(scores))
    }

    /// Write the list to its file, creating parent directories as needed
    pub fn save(&self) -> anyhow::Result<()> {
        if let Some(dir) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create directory {}", dir.display()))?;
        }
        let contents =
            serde_json::to_string_pretty(&self.scores).context("failed to serialize high scores")?;
        fs::write(&self.path, contents)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        info!(path = %self.path.display(), count = self.scores.len(), "saved high scores");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if `score` would make it into the list
    pub fn is_high_score(&self, score: u32) -> bool {
        match self.scores.last() {
            Some(lowest) if self.scores.len() >= MAX_SCORES => score > lowest.score,
            _ => true,
        }
    }

    /// Record a score with the current time if it qualifies
    pub fn add_score(&mut self, name: &str, score: u32) -> anyhow::Result<()> {
        if !self.is_high_score(score) {
            return Ok(());
        }
        let timestamp = chrono::Local::now().to_rfc3339();
        let entry = HighScoreEntry::new(name, score, timestamp)?;
        self.scores.push(entry);
        sort_and_truncate(&mut self.scores);
        Ok(())
    }

    /// The best `n` entries, best first
    pub fn top_scores(&self, n: usize) -> &[HighScoreEntry] {
        &self.scores[..n.min(self.scores.len())]
    }
}

/// Sort best first; stable so earlier entries win ties
fn sort_and_truncate(scores: &mut Vec<HighScoreEntry>) {
    scores.sort_by(|a, b| b.score.cmp(&a.score));
    scores.truncate(MAX_SCORES);
}
