use std::path::PathBuf;

use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde::Serialize;

/// Column name → raw cell value, in header order.
pub type Fields = IndexMap<String, String>;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One parsed batch row, keyed by its normalized email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriberRecord {
    pub email: String,
    pub fields: Fields,
    /// `NaiveDateTime::MIN` when the row had no usable timestamp.
    pub timestamp: NaiveDateTime,
}

// ---------------------------------------------------------------------------
// Merge state
// ---------------------------------------------------------------------------

/// The current winning row for one email.
///
/// The timestamp is kept beside the fields, never inside them, so the writer
/// has nothing to strip before serializing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeEntry {
    pub timestamp: NaiveDateTime,
    pub fields: Fields,
}

impl From<SubscriberRecord> for MergeEntry {
    fn from(record: SubscriberRecord) -> Self {
        Self {
            timestamp: record.timestamp,
            fields: record.fields,
        }
    }
}

/// Classification of a sticky-boolean cell after trim + lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StickyValue {
    True,
    False,
    /// Empty, whitespace-only, or column absent.
    Unset,
    Other,
}

impl StickyValue {
    pub fn classify(raw: Option<&str>) -> Self {
        let normalized = raw.unwrap_or("").trim().to_lowercase();
        match normalized.as_str() {
            "true" => Self::True,
            "false" => Self::False,
            "" => Self::Unset,
            _ => Self::Other,
        }
    }

    /// Whether an equal-or-older incoming value may overwrite `prev`.
    pub fn overwrites(self, prev: StickyValue) -> bool {
        match (prev, self) {
            (_, Self::True) | (Self::Unset, _) => true,
            (prev, Self::False) => prev != Self::True,
            _ => false,
        }
    }
}

/// What a single fold step did to the merge state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoldOutcome {
    /// First row seen for this email.
    Inserted,
    /// Strictly newer row replaced the stored one wholesale.
    Replaced,
    /// Equal or older row; only the sticky columns were considered.
    StickyMerged,
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeCounts {
    pub rows_read: usize,
    pub rows_skipped: usize,
    pub inserted: usize,
    pub replaced: usize,
    pub sticky_merged: usize,
}

impl MergeCounts {
    pub fn record(&mut self, outcome: FoldOutcome) {
        match outcome {
            FoldOutcome::Inserted => self.inserted += 1,
            FoldOutcome::Replaced => self.replaced += 1,
            FoldOutcome::StickyMerged => self.sticky_merged += 1,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MergeSummary {
    pub folder: PathBuf,
    pub output: PathBuf,
    pub batches: Vec<String>,
    pub counts: MergeCounts,
    pub unique_subscribers: usize,
    pub engine_version: String,
}
