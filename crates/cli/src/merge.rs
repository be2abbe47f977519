//! `roster merge` and `roster suppress`.

use std::path::{Path, PathBuf};

use roster_merge::batch::INDEX_WIDTH;
use roster_merge::config::{BATCH_DIR_NAME, CONFIG_FILE_NAME};
use roster_merge::suppress::suppress_file;
use roster_merge::{MergeConfig, MergeError};
use tracing::debug;

use crate::exit_codes::{merge_exit_code, ErrorOutput, EXIT_ERROR};
use crate::CliError;

impl CliError {
    /// Error from the merge engine, with a hint where one helps.
    pub fn merge(err: &MergeError) -> Self {
        let hint = match err {
            MergeError::BatchDirNotFound(path) => Some(format!(
                "create {} and add exports named like {:0width$}-<label>.csv",
                path.display(),
                1,
                width = INDEX_WIDTH,
            )),
            MergeError::ConfigParse(_) | MergeError::ConfigValidation(_) => {
                Some(format!("check the [columns] table in {CONFIG_FILE_NAME}"))
            }
            _ => None,
        };
        Self { code: merge_exit_code(err), message: err.to_string(), hint }
    }
}

/// Report an engine failure. In JSON mode the structured error goes to stderr
/// and the plain message is suppressed.
fn fail(err: MergeError, json: bool) -> CliError {
    if json {
        if let Ok(body) = serde_json::to_string(&ErrorOutput::from_merge_error(&err)) {
            eprintln!("{body}");
        }
        return CliError { code: merge_exit_code(&err), message: String::new(), hint: None };
    }
    CliError::merge(&err)
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, CliError> {
    serde_json::to_string_pretty(value).map_err(|e| CliError {
        code: EXIT_ERROR,
        message: format!("JSON serialization error: {e}"),
        hint: None,
    })
}

pub fn cmd_merge(
    folder: PathBuf,
    start: Option<u32>,
    end: Option<u32>,
    config_path: Option<PathBuf>,
    json: bool,
) -> Result<(), CliError> {
    let config_path = config_path.unwrap_or_else(|| folder.join(CONFIG_FILE_NAME));
    let config = MergeConfig::load(&config_path)
        .map_err(|e| fail(e, json))?
        .with_range(start, end);
    debug!(?config, batch_dir = %folder.join(BATCH_DIR_NAME).display(), "resolved merge config");

    let summary = roster_merge::run(&folder, &config).map_err(|e| fail(e, json))?;

    if json {
        println!("{}", to_json(&summary)?);
    }
    eprintln!(
        "merged {} unique subscribers to {}",
        summary.unique_subscribers,
        summary.output.display()
    );
    Ok(())
}

pub fn cmd_suppress(
    list: &Path,
    exclusions: &Path,
    output: Option<&Path>,
    json: bool,
) -> Result<(), CliError> {
    let outcome = suppress_file(list, exclusions, output).map_err(|e| fail(e, json))?;

    if json {
        println!("{}", to_json(&outcome)?);
    }
    eprintln!("removed {}, kept {}", outcome.removed, outcome.kept.len());
    Ok(())
}
