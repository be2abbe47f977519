//! `roster-merge`: subscriber batch merge engine.
//!
//! Folds indexed CSV exports into one deduplicated subscriber table.
//! No CLI dependencies; the binary lives in `roster-cli`.

pub mod batch;
pub mod config;
pub mod engine;
pub mod error;
pub mod merge;
pub mod model;
pub mod record;
pub mod suppress;
pub mod writer;

pub use config::MergeConfig;
pub use engine::run;
pub use error::MergeError;
pub use merge::MergeState;
pub use model::{FoldOutcome, MergeEntry, MergeSummary, StickyValue, SubscriberRecord};
