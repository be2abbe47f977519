//! Suppression lists: drop addresses that appear in an exclusion list.
//!
//! Both inputs are plain text, one address per line. Matching uses the same
//! trim + lowercase normalization as the merge key.

use std::collections::HashSet;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::error::MergeError;
use crate::record::normalize_email;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuppressOutcome {
    /// Surviving lines, original text without line terminators.
    pub kept: Vec<String>,
    pub removed: usize,
}

/// Filter `list` against `exclusions`. Blank lines are dropped from the result.
pub fn suppress_lines(list: &str, exclusions: &str) -> SuppressOutcome {
    let (kept, removed) = filter_lines(list, exclusions);
    SuppressOutcome {
        kept: kept.into_iter().map(strip_terminator).map(String::from).collect(),
        removed,
    }
}

/// Kept lines with their own terminators, plus the removed count.
fn filter_lines<'a>(list: &'a str, exclusions: &str) -> (Vec<&'a str>, usize) {
    let excluded: HashSet<String> = exclusions
        .lines()
        .map(normalize_email)
        .filter(|e| !e.is_empty())
        .collect();

    let mut kept = Vec::new();
    let mut removed = 0;
    for line in list.split_inclusive('\n') {
        let key = normalize_email(line);
        if key.is_empty() {
            continue;
        }
        if excluded.contains(&key) {
            removed += 1;
        } else {
            kept.push(line);
        }
    }
    (kept, removed)
}

fn strip_terminator(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

/// Suppress `list_path` against `exclusions_path`, writing to `output`
/// (or back over `list_path` when `output` is `None`).
///
/// Kept lines are written byte-for-byte, terminators included.
pub fn suppress_file(
    list_path: &Path,
    exclusions_path: &Path,
    output: Option<&Path>,
) -> Result<SuppressOutcome, MergeError> {
    let list = std::fs::read_to_string(list_path).map_err(|e| MergeError::io(list_path, e))?;
    let exclusions = std::fs::read_to_string(exclusions_path)
        .map_err(|e| MergeError::io(exclusions_path, e))?;

    let (kept, removed) = filter_lines(&list, &exclusions);

    let target = output.unwrap_or(list_path);
    std::fs::write(target, kept.concat()).map_err(|e| MergeError::io(target, e))?;

    let outcome = SuppressOutcome {
        kept: kept.into_iter().map(strip_terminator).map(String::from).collect(),
        removed,
    };
    info!(
        removed = outcome.removed,
        kept = outcome.kept.len(),
        output = %target.display(),
        "suppression applied"
    );
    Ok(outcome)
}
