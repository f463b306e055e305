//! File formats for the CLI.
//!
//! Recommendations are JSON lines, one user per line:
//!
//! ```text
//! {"user":"u1","items":[{"id":"i7","score":0.93},{"id":"i2","score":0.81}]}
//! ```
//!
//! The intent model is a single JSON document. `users` is optional; users
//! missing from it get a uniform distribution over their candidates' aspects.
//!
//! ```text
//! {"items":{"i7":["jazz","live"],"i2":["rock"]},"users":{"u1":{"jazz":0.7,"rock":0.3}}}
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use serde::Deserialize;

use crate::intent::StaticIntentModel;
use crate::rerank::Recommendation;

pub type TextRecommendation = Recommendation<String, String>;
pub type TextIntentModel = StaticIntentModel<String, String, String>;

#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed recommendation on line {line}: {source}")]
    Line {
        line: usize,
        source: serde_json::Error,
    },
    #[error("malformed intent model: {0}")]
    Intents(serde_json::Error),
    #[error("serialization error: {0}")]
    Serde(serde_json::Error),
}

#[derive(Debug, Default, Deserialize)]
struct IntentFile {
    #[serde(default)]
    items: HashMap<String, Vec<String>>,
    // BTreeMap keeps each user's aspect order stable across runs.
    #[serde(default)]
    users: HashMap<String, BTreeMap<String, f64>>,
}

/// Read JSONL recommendations, skipping blank lines.
pub fn read_recommendations(path: impl AsRef<Path>) -> Result<Vec<TextRecommendation>, DataError> {
    let reader = BufReader::new(File::open(path)?);
    let mut out = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let rec = serde_json::from_str(&line).map_err(|source| DataError::Line {
            line: idx + 1,
            source,
        })?;
        out.push(rec);
    }
    Ok(out)
}

pub fn write_recommendations<'a>(
    path: impl AsRef<Path>,
    recommendations: impl IntoIterator<Item = &'a TextRecommendation>,
) -> Result<usize, DataError> {
    let mut writer = BufWriter::new(File::create(path)?);
    let mut written = 0;
    for rec in recommendations {
        let line = serde_json::to_string(rec).map_err(DataError::Serde)?;
        writeln!(writer, "{line}")?;
        written += 1;
    }
    writer.flush()?;
    Ok(written)
}

pub fn load_intent_model(path: impl AsRef<Path>) -> Result<TextIntentModel, DataError> {
    let raw = std::fs::read_to_string(path)?;
    parse_intent_model(&raw)
}

pub fn parse_intent_model(raw: &str) -> Result<TextIntentModel, DataError> {
    let file: IntentFile = serde_json::from_str(raw).map_err(DataError::Intents)?;
    let mut model = StaticIntentModel::new();
    for (item, aspects) in file.items {
        model.insert_item(item, aspects);
    }
    for (user, weights) in file.users {
        model.insert_user(user, weights.into_iter().collect());
    }
    Ok(model)
}
