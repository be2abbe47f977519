use std::fs::File;
use std::io;
use std::path::Path;

use tracing::{debug, info};

use crate::batch::enumerate_batches;
use crate::config::{MergeConfig, BATCH_DIR_NAME};
use crate::error::MergeError;
use crate::merge::MergeState;
use crate::model::{MergeCounts, MergeSummary};
use crate::record::RecordParser;
use crate::writer::write_table_to_path;

/// Merge every batch under `<folder>/subscribers` and write `<folder>/<output_file>`.
pub fn run(folder: &Path, config: &MergeConfig) -> Result<MergeSummary, MergeError> {
    let batch_dir = folder.join(BATCH_DIR_NAME);
    let output = folder.join(&config.output_file);

    let batches = enumerate_batches(&batch_dir, config.start_index, config.end_index)?;
    let (state, counts) = merge_batches(&batch_dir, &batches, config)?;

    write_table_to_path(&output, &state, config)?;
    info!(
        unique = state.len(),
        rows = counts.rows_read,
        output = %output.display(),
        "merge complete"
    );

    Ok(MergeSummary {
        folder: folder.to_path_buf(),
        output,
        batches,
        counts,
        unique_subscribers: state.len(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Fold the named batches in order. Each file is closed before the next opens.
pub fn merge_batches(
    batch_dir: &Path,
    batches: &[String],
    config: &MergeConfig,
) -> Result<(MergeState, MergeCounts), MergeError> {
    let mut state = MergeState::new();
    let mut counts = MergeCounts::default();

    for name in batches {
        let path = batch_dir.join(name);
        let file = File::open(&path).map_err(|e| MergeError::io(&path, e))?;
        let before = counts.rows_read;
        fold_batch(file, config, &mut state, &mut counts).map_err(|e| MergeError::csv(&path, e))?;
        info!(batch = %name, rows = counts.rows_read - before, unique = state.len(), "merged batch");
    }

    Ok((state, counts))
}

/// Stream one batch's rows into `state`.
pub fn fold_batch<R: io::Read>(
    input: R,
    config: &MergeConfig,
    state: &mut MergeState,
    counts: &mut MergeCounts,
) -> Result<(), csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);

    let headers = reader.headers()?.clone();
    let parser = RecordParser::new(&headers, config);
    let sticky = config.sticky_columns();

    let mut row = csv::StringRecord::new();
    while reader.read_record(&mut row)? {
        counts.rows_read += 1;
        match parser.parse(&row) {
            Some(record) => counts.record(state.fold(record, sticky)),
            None => {
                counts.rows_skipped += 1;
                debug!(line = ?row.position().map(|p| p.line()), "skipping row without email");
            }
        }
    }

    Ok(())
}
