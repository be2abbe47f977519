//! The fold at the heart of a run: one entry per normalized email, the newest
//! row wins wholesale, and sticky consent columns only move toward `"true"`
//! unless a strictly newer row replaces them.

use indexmap::IndexMap;
use tracing::trace;

use crate::model::{Fields, FoldOutcome, MergeEntry, StickyValue, SubscriberRecord};

/// Winning row per normalized email, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeState {
    entries: IndexMap<String, MergeEntry>,
}

impl MergeState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, email: &str) -> Option<&MergeEntry> {
        self.entries.get(email)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MergeEntry)> {
        self.entries.iter().map(|(email, entry)| (email.as_str(), entry))
    }

    /// Fold one record into the state. Never fails.
    pub fn fold(&mut self, record: SubscriberRecord, sticky_columns: [&str; 2]) -> FoldOutcome {
        trace!(email = %record.email, timestamp = %record.timestamp, "fold");

        match self.entries.get_mut(&record.email) {
            Some(stored) if record.timestamp > stored.timestamp => {
                *stored = record.into();
                FoldOutcome::Replaced
            }
            Some(stored) => {
                for column in sticky_columns {
                    merge_sticky(&mut stored.fields, &record.fields, column);
                }
                FoldOutcome::StickyMerged
            }
            None => {
                self.entries.insert(record.email.clone(), record.into());
                FoldOutcome::Inserted
            }
        }
    }
}

/// Apply the sticky-boolean rule to one column of an equal-or-older row.
///
/// A missing cell on either side counts as `""`.
fn merge_sticky(stored: &mut Fields, incoming: &Fields, column: &str) {
    let curr_raw = incoming.get(column).map_or("", String::as_str);
    let prev = StickyValue::classify(stored.get(column).map(String::as_str));
    let curr = StickyValue::classify(Some(curr_raw));

    if curr.overwrites(prev) {
        stored.insert(column.to_string(), curr_raw.to_string());
    }
}
