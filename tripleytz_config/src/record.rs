use chrono::{DateTime, Local, NaiveDateTime, SecondsFormat};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;
use tripleytz::{HighScore, DEFAULT_CAPACITY};

const LAST_USED_NAME: &str = "last_used_name";
const MAX_HIGH_SCORES: &str = "max_high_scores";
const HIGH_SCORES: &str = "high_scores";

/// The contents of the config file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    pub last_used_name: String,
    pub max_high_scores: usize,
    /// In file order, not necessarily sorted.
    pub high_scores: Vec<HighScore>,
}

impl Default for Record {
    fn default() -> Self {
        Self {
            last_used_name: String::new(),
            max_high_scores: DEFAULT_CAPACITY,
            high_scores: Vec::new(),
        }
    }
}

/// A single high score as it appears in the file.
#[derive(Serialize, Deserialize)]
struct EntryRecord {
    score: u32,
    when: String,
    name: String,
}

#[derive(Serialize)]
struct RecordOut<'a> {
    last_used_name: &'a str,
    max_high_scores: usize,
    high_scores: Vec<EntryRecord>,
}

impl Record {
    /// Parses the config file contents.
    ///
    /// Only a document that is not a JSON object is an error. Members that are
    /// missing or have the wrong type keep their defaults, and high-score
    /// entries that can't be read are skipped one by one.
    pub fn parse(json: &str) -> anyhow::Result<Self> {
        let doc: Value = serde_json::from_str(json)?;
        let Value::Object(obj) = doc else {
            anyhow::bail!("config document is not a JSON object");
        };
        let mut record = Record::default();

        if let Some(name) = obj.get(LAST_USED_NAME).and_then(Value::as_str) {
            record.last_used_name = String::from(name);
        }
        if let Some(max) = obj.get(MAX_HIGH_SCORES).and_then(Value::as_u64) {
            record.max_high_scores = max as usize;
        }
        record.high_scores = parse_high_scores(&obj);
        Ok(record)
    }

    /// Serializes the record, writing at most `max_high_scores` entries.
    pub fn to_json(&self) -> anyhow::Result<String> {
        let out = RecordOut {
            last_used_name: &self.last_used_name,
            max_high_scores: self.max_high_scores,
            high_scores: self
                .high_scores
                .iter()
                .take(self.max_high_scores)
                .map(|hs| EntryRecord {
                    score: hs.score,
                    when: hs.when.to_rfc3339_opts(SecondsFormat::Secs, false),
                    name: hs.name.clone(),
                })
                .collect(),
        };
        Ok(serde_json::to_string_pretty(&out)?)
    }
}

fn parse_high_scores(obj: &Map<String, Value>) -> Vec<HighScore> {
    let Some(entries) = obj.get(HIGH_SCORES).and_then(Value::as_array) else {
        return Vec::new();
    };
    entries
        .iter()
        .enumerate()
        .filter_map(|(idx, value)| {
            let entry = match EntryRecord::deserialize(value) {
                Ok(entry) => entry,
                Err(err) => {
                    debug!(idx, %err, "Skipping malformed high score");
                    return None;
                }
            };
            let Some(when) = parse_timestamp(&entry.when) else {
                debug!(idx, when = %entry.when, "Skipping high score with unreadable timestamp");
                return None;
            };
            Some(HighScore {
                score: entry.score,
                when,
                name: entry.name,
            })
        })
        .collect()
}

/// Reads an ISO-8601 timestamp. Timestamps without an offset are local time.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Local>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local));
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .into_iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .and_then(|naive| naive.and_local_timezone(Local).earliest())
}
