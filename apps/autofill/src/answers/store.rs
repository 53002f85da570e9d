//! Answer Store — durable question→answer memory with fuzzy recall.
//!
//! Records are keyed by a truncated, normalized form of the question and kept
//! in a single JSON document on disk. Every mutation (a hit bumping usage
//! counters, a new answer, a reset) rewrites the whole document through a
//! temp file + rename, so a reported answer or use count is always durable.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info};

use crate::answers::field::FieldType;
use crate::answers::similarity::similarity_ratio;

/// Minimum similarity for a fuzzy hit.
pub const DEFAULT_FUZZY_THRESHOLD: f64 = 0.8;

/// Record keys are cut to this many characters.
const MAX_KEY_CHARS: usize = 50;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read answer store {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("answer store {path} is not valid JSON: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write answer store {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize answer store: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("question must not be empty")]
    EmptyQuestion,
}

/// Lowercases, strips `?` and `.`, and trims surrounding whitespace.
pub fn normalize_question(question: &str) -> String {
    question
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, '?' | '.'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Storage key for a question: normalized, spaces as underscores, truncated.
pub fn question_key(question: &str) -> String {
    normalize_question(question)
        .replace(' ', "_")
        .chars()
        .take(MAX_KEY_CHARS)
        .collect()
}

/// One memorized question/answer pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question: String,
    pub answer: String,
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    pub created: DateTime<Utc>,
    pub last_used: DateTime<Utc>,
    #[serde(default)]
    pub use_count: u32,
}

impl AnswerRecord {
    fn new(question: &str, answer: &str, field_type: FieldType) -> Self {
        let now = Utc::now();
        Self {
            question: question.to_string(),
            answer: answer.to_string(),
            field_type,
            created: now,
            last_used: now,
            use_count: 1,
        }
    }

    pub fn normalized_question(&self) -> String {
        normalize_question(&self.question)
    }

    fn touch(&mut self) {
        self.last_used = Utc::now();
        self.use_count += 1;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreMetadata {
    pub created: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl Default for StoreMetadata {
    fn default() -> Self {
        Self {
            created: Utc::now(),
            last_updated: None,
        }
    }
}

/// On-disk shape of the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoreDocument {
    #[serde(default)]
    questions: BTreeMap<String, AnswerRecord>,
    #[serde(default)]
    metadata: StoreMetadata,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum MatchKind {
    Exact,
    Fuzzy(f64),
}

/// File-backed answer memory. Not internally synchronized: share it behind a
/// mutex and hold the lock across a whole lookup.
#[derive(Debug)]
pub struct AnswerStore {
    path: PathBuf,
    doc: StoreDocument,
}

impl AnswerStore {
    /// Loads the store at `path`, or starts an empty one if the file does not
    /// exist yet. The parent directory is created if needed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let doc = if path.exists() {
            let raw = fs::read_to_string(&path).map_err(|source| StoreError::Read {
                path: path.clone(),
                source,
            })?;
            serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
                path: path.clone(),
                source,
            })?
        } else {
            StoreDocument::default()
        };

        info!(
            "Answer store opened at {} ({} answers)",
            path.display(),
            doc.questions.len()
        );

        Ok(Self { path, doc })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.doc.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doc.questions.is_empty()
    }

    pub fn metadata(&self) -> &StoreMetadata {
        &self.doc.metadata
    }

    /// Looks up a memorized answer, exact match first, then the best fuzzy
    /// match scoring at least `threshold`. A hit bumps the record's usage
    /// counters and is flushed before the answer is returned.
    pub fn get(&mut self, question: &str, threshold: f64) -> Result<Option<String>, StoreError> {
        let normalized = normalize_question(question);
        if normalized.is_empty() {
            return Ok(None);
        }

        let Some((key, kind)) = self.find_match(&normalized, threshold) else {
            debug!(question, "No memorized answer");
            return Ok(None);
        };

        let Some(record) = self.doc.questions.get_mut(&key) else {
            return Ok(None);
        };
        let previous = record.clone();
        record.touch();
        let answer = record.answer.clone();

        match kind {
            MatchKind::Exact => debug!(question, key = %key, "Exact answer match"),
            MatchKind::Fuzzy(score) => {
                debug!(question, key = %key, score, "Fuzzy answer match")
            }
        }

        if let Err(e) = self.save() {
            self.doc.questions.insert(key, previous);
            return Err(e);
        }
        Ok(Some(answer))
    }

    /// Memorizes an answer, replacing any record with the same key.
    pub fn store(
        &mut self,
        question: &str,
        answer: &str,
        field_type: FieldType,
    ) -> Result<(), StoreError> {
        let key = question_key(question);
        if key.is_empty() {
            return Err(StoreError::EmptyQuestion);
        }

        let replaced = self
            .doc
            .questions
            .insert(key.clone(), AnswerRecord::new(question, answer, field_type));
        if let Err(e) = self.save() {
            match replaced {
                Some(record) => self.doc.questions.insert(key, record),
                None => self.doc.questions.remove(&key),
            };
            return Err(e);
        }

        info!("Stored: '{}' → '{}'", question, answer);
        Ok(())
    }

    pub fn get_all(&self) -> &BTreeMap<String, AnswerRecord> {
        &self.doc.questions
    }

    /// Drops every record and persists the empty store.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        let previous = std::mem::take(&mut self.doc);
        if let Err(e) = self.save() {
            self.doc = previous;
            return Err(e);
        }
        info!("Answer store cleared");
        Ok(())
    }

    fn find_match(&self, normalized: &str, threshold: f64) -> Option<(String, MatchKind)> {
        // Keys are truncated, so exact matching compares full normalized text.
        if let Some(key) = self
            .doc
            .questions
            .iter()
            .find(|(_, record)| record.normalized_question() == normalized)
            .map(|(key, _)| key.clone())
        {
            return Some((key, MatchKind::Exact));
        }

        let mut best: Option<(&String, f64)> = None;
        for (key, record) in &self.doc.questions {
            let score = similarity_ratio(normalized, &record.normalized_question());
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((key, score));
            }
        }

        best.filter(|(_, score)| *score >= threshold)
            .map(|(key, score)| (key.clone(), MatchKind::Fuzzy(score)))
    }

    /// Flushes the document. On failure the in-memory document is left as it
    /// was before the call; callers undo their own mutation.
    fn save(&mut self) -> Result<(), StoreError> {
        let previous = self.doc.metadata.last_updated.replace(Utc::now());
        let result = self.write();
        if result.is_err() {
            self.doc.metadata.last_updated = previous;
        }
        result
    }

    fn write(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&self.doc)?;

        let write_err = |source: std::io::Error| StoreError::Write {
            path: self.path.clone(),
            source,
        };

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
        tmp.write_all(json.as_bytes()).map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(&self.path).map_err(|e| write_err(e.error))?;

        Ok(())
    }
}
