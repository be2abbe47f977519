//! Discovery and ordering of indexed batch files (`001-export.csv`, `002.csv`, ...).

use std::path::Path;

use tracing::{debug, warn};

use crate::error::MergeError;

/// Width of the numeric index prefix on a batch file name.
pub const INDEX_WIDTH: usize = 3;

pub const BATCH_EXTENSION: &str = ".csv";

/// Parse the batch index from a file name, or `None` if it is not a batch.
pub fn batch_index(file_name: &str) -> Option<u32> {
    if !file_name.ends_with(BATCH_EXTENSION) {
        return None;
    }
    let prefix = file_name.get(..INDEX_WIDTH)?;
    if !prefix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    prefix.parse().ok()
}

fn in_range(index: u32, start: Option<u32>, end: Option<u32>) -> bool {
    start.map_or(true, |s| index >= s) && end.map_or(true, |e| index <= e)
}

/// Filter and order candidate names by parsed index (ties by name).
pub fn select_batches<I, S>(names: I, start: Option<u32>, end: Option<u32>) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut batches: Vec<(u32, String)> = names
        .into_iter()
        .map(Into::into)
        .filter_map(|name| {
            let index = batch_index(&name)?;
            in_range(index, start, end).then_some((index, name))
        })
        .collect();
    batches.sort();
    batches.into_iter().map(|(_, name)| name).collect()
}

/// List batch files in `dir` within `[start, end]`, ordered by index.
pub fn enumerate_batches(
    dir: &Path,
    start: Option<u32>,
    end: Option<u32>,
) -> Result<Vec<String>, MergeError> {
    if let (Some(s), Some(e)) = (start, end) {
        if s > e {
            warn!(start = s, end = e, "batch range is empty");
        }
    }

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(MergeError::BatchDirNotFound(dir.to_path_buf()));
        }
        Err(e) => return Err(MergeError::io(dir, e)),
    };

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| MergeError::io(dir, e))?;
        // Non-UTF-8 names cannot carry an ASCII index prefix we recognize.
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(name) => debug!(?name, "skipping non-UTF-8 file name"),
        }
    }

    let batches = select_batches(names, start, end);
    debug!(dir = %dir.display(), count = batches.len(), "enumerated batches");
    Ok(batches)
}
