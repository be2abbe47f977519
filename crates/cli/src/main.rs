// roster CLI - merge subscriber export batches into one recipient list

mod exit_codes;
mod logging;
mod merge;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};

use exit_codes::{EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "roster")]
#[command(about = "Merge and deduplicate subscriber export batches")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge every indexed batch under FOLDER/subscribers into one table
    #[command(after_help = "\
Examples:
  roster merge campaign/
  roster merge campaign/ --start 2 --end 4
  roster merge campaign/ --config shared/merger.toml --json")]
    Merge {
        /// Folder holding merger.toml and the subscribers/ directory
        #[arg(default_value = ".")]
        folder: PathBuf,

        /// First batch index to include (e.g. 2 for 002-*.csv)
        #[arg(long)]
        start: Option<u32>,

        /// Last batch index to include (inclusive)
        #[arg(long)]
        end: Option<u32>,

        /// Config file to use instead of FOLDER/merger.toml
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print the run summary as JSON on stdout
        #[arg(long)]
        json: bool,
    },

    /// Remove addresses listed in EXCLUSIONS from a one-per-line LIST
    #[command(after_help = "\
Examples:
  roster suppress recipients.txt unsubscribed.txt
  roster suppress recipients.txt unsubscribed.txt -o clean.txt")]
    Suppress {
        /// Address list, one per line (rewritten in place unless --output is given)
        list: PathBuf,

        /// Addresses to remove, one per line
        exclusions: PathBuf,

        /// Write the filtered list here instead
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Print the outcome as JSON on stdout
        #[arg(long)]
        json: bool,
    },
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\nengine:  roster-merge ", env!("CARGO_PKG_VERSION"),
        "\ntarget:  ", env!("TARGET"),
    )
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // --help and --version land here too
            return ExitCode::from(if e.use_stderr() { EXIT_USAGE } else { EXIT_SUCCESS });
        }
    };
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Merge { folder, start, end, config, json } => {
            merge::cmd_merge(folder, start, end, config, json)
        }
        Commands::Suppress { list, exclusions, output, json } => {
            merge::cmd_suppress(&list, &exclusions, output.as_deref(), json)
        }
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn merge_defaults_to_current_folder() {
        let cli = Cli::try_parse_from(["roster", "merge"]).unwrap();
        match cli.command {
            Commands::Merge { folder, start, end, config, json } => {
                assert_eq!(folder, PathBuf::from("."));
                assert_eq!((start, end), (None, None));
                assert!(config.is_none());
                assert!(!json);
            }
            _ => panic!("expected merge"),
        }
    }

    #[test]
    fn verbose_is_global_and_counted() {
        let cli = Cli::try_parse_from(["roster", "merge", "x", "-vv", "--start", "2"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn negative_index_is_rejected() {
        assert!(Cli::try_parse_from(["roster", "merge", "--start", "-1"]).is_err());
    }
}
