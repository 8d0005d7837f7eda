use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::{debug, info, warn};
use tripleytz::{HighScoreLedger, HighScores};

use crate::record::Record;

/// Name of the config file inside the user's config directory.
pub const CONFIG_FILE_NAME: &str = ".tripleytz";

/// The persisted settings: the last name entered for a high score, and the
/// high-score list with its capacity.
///
/// Reading and writing are best effort. A missing or broken file gives the
/// defaults, and a failed save is logged and otherwise ignored.
#[derive(Clone, Debug)]
pub struct Config {
    path: PathBuf,
    last_used_name: String,
    high_scores: HighScores,
}

impl Config {
    /// A config with default settings that will be saved to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::from_record(path.into(), Record::default())
    }

    /// `$XDG_CONFIG_HOME/.tripleytz`, falling back to `$HOME/.config/.tripleytz`.
    pub fn default_path() -> Option<PathBuf> {
        let config_dir = std::env::var_os("XDG_CONFIG_HOME")
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))?;
        Some(config_dir.join(CONFIG_FILE_NAME))
    }

    /// Loads the config, falling back to defaults on any problem.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if !path.is_file() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Self::new(path);
        }
        match Self::try_load(&path) {
            Ok(config) => config,
            Err(err) => {
                warn!(path = %path.display(), "Could not read config, using defaults: {:#}", err);
                Self::new(path)
            }
        }
    }

    pub fn try_load(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let record = Record::parse(&json)?;
        info!(
            path = %path.display(),
            high_scores = record.high_scores.len(),
            "Loaded config"
        );
        Ok(Self::from_record(path.to_path_buf(), record))
    }

    pub fn try_save(&self) -> anyhow::Result<()> {
        let json = self.to_record().to_json()?;
        if let Some(dir) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(&self.path, json)?;
        debug!(path = %self.path.display(), "Saved config");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn last_used_name(&self) -> &str {
        &self.last_used_name
    }

    pub fn set_last_used_name(&mut self, name: &str) {
        self.last_used_name = String::from(name);
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    pub fn max_high_scores(&self) -> usize {
        self.high_scores.capacity()
    }

    pub fn set_max_high_scores(&mut self, max: usize) {
        self.high_scores.set_capacity(max);
    }

    pub fn clear_high_scores(&mut self) {
        self.high_scores.clear();
    }

    fn from_record(path: PathBuf, record: Record) -> Self {
        Self {
            path,
            last_used_name: record.last_used_name,
            high_scores: HighScores::from_entries(record.max_high_scores, record.high_scores),
        }
    }

    fn to_record(&self) -> Record {
        Record {
            last_used_name: self.last_used_name.clone(),
            max_high_scores: self.high_scores.capacity(),
            high_scores: self.high_scores.entries().to_vec(),
        }
    }
}

impl HighScoreLedger for Config {
    fn is_high_score(&self, score: u32) -> bool {
        self.high_scores.is_high_score(score)
    }

    /// Also remembers `name` as the last used name, even if the score doesn't qualify.
    fn insert(&mut self, score: u32, name: &str, when: DateTime<Local>) -> bool {
        self.set_last_used_name(name);
        let inserted = self.high_scores.insert(score, name, when);
        if inserted {
            info!(score, name, "New high score");
        }
        inserted
    }

    fn save(&mut self) {
        if let Err(err) = self.try_save() {
            warn!(path = %self.path.display(), "Could not save config: {:#}", err);
        }
    }

    fn last_used_name(&self) -> Option<&str> {
        Some(self.last_used_name.as_str()).filter(|name| !name.is_empty())
    }
}
