//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain           | Description                              |
//! |---------|------------------|------------------------------------------|
//! | 0       | Universal        | Success                                  |
//! | 1       | Universal        | General error (unspecified)              |
//! | 2       | Universal        | CLI usage error (bad args)               |
//! | 3-9     | merge            | Batch merge codes                        |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into `merge_exit_code`

use roster_merge::MergeError;

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
/// clap exits with this code on its own for parse failures.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Merge (3-9)
// =============================================================================

/// Config file is malformed or has an empty required value.
pub const EXIT_CONFIG_INVALID: u8 = 3;

/// The `subscribers` directory does not exist under the run folder.
pub const EXIT_BATCH_DIR_MISSING: u8 = 4;

/// Reading a batch, list, or writing output failed.
pub const EXIT_IO: u8 = 5;

/// Map a MergeError to its exit code.
pub fn merge_exit_code(err: &MergeError) -> u8 {
    match err {
        MergeError::ConfigParse(_) | MergeError::ConfigValidation(_) => EXIT_CONFIG_INVALID,
        MergeError::BatchDirNotFound(_) => EXIT_BATCH_DIR_MISSING,
        MergeError::Csv { .. } | MergeError::Io { .. } => EXIT_IO,
    }
}

/// Structured error output for `--json` runs.
#[derive(Debug, serde::Serialize)]
pub struct ErrorOutput {
    pub error: &'static str,
    pub message: String,
    pub exit_code: u8,
}

impl ErrorOutput {
    pub fn from_merge_error(err: &MergeError) -> Self {
        let error = match err {
            MergeError::ConfigParse(_) => "config_parse",
            MergeError::ConfigValidation(_) => "config_validation",
            MergeError::BatchDirNotFound(_) => "batch_dir_not_found",
            MergeError::Csv { .. } => "csv",
            MergeError::Io { .. } => "io",
        };
        Self {
            error,
            message: err.to_string(),
            exit_code: merge_exit_code(err),
        }
    }
}
