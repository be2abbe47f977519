use std::io;
use std::path::Path;

use crate::config::MergeConfig;
use crate::error::MergeError;
use crate::merge::MergeState;

/// Header of the output table.
///
/// Taken from the first surviving entry's columns; an empty merge falls back
/// to the email column plus the two sticky columns.
pub fn output_header(state: &MergeState, config: &MergeConfig) -> Vec<String> {
    match state.iter().next() {
        Some((_, entry)) => entry.fields.keys().cloned().collect(),
        None => vec![
            config.email_column.clone(),
            config.updates_column.clone(),
            config.survey_column.clone(),
        ],
    }
}

/// Write the merged table. Cells an entry lacks are written empty.
pub fn write_table<W: io::Write>(
    out: W,
    state: &MergeState,
    config: &MergeConfig,
) -> Result<(), csv::Error> {
    let header = output_header(state, config);
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(&header)?;

    for (_, entry) in state.iter() {
        writer.write_record(
            header
                .iter()
                .map(|column| entry.fields.get(column).map_or("", String::as_str)),
        )?;
    }

    writer.flush()?;
    Ok(())
}

/// Write the merged table to `path`, replacing any existing file.
pub fn write_table_to_path(
    path: &Path,
    state: &MergeState,
    config: &MergeConfig,
) -> Result<(), MergeError> {
    let file = std::fs::File::create(path).map_err(|e| MergeError::io(path, e))?;
    write_table(io::BufWriter::new(file), state, config).map_err(|e| MergeError::csv(path, e))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;

    use super::*;
    use crate::model::SubscriberRecord;

    fn render(state: &MergeState) -> String {
        let mut buf = Vec::new();
        write_table(&mut buf, state, &MergeConfig::default()).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn record(email: &str, pairs: &[(&str, &str)]) -> SubscriberRecord {
        SubscriberRecord {
            email: email.into(),
            fields: pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            timestamp: NaiveDateTime::MIN,
        }
    }

    #[test]
    fn empty_state_writes_default_header() {
        assert_eq!(render(&MergeState::new()), "Email,subscrube,subscribe_survey\n");
    }

    #[test]
    fn header_comes_from_first_entry() {
        let mut state = MergeState::new();
        let sticky = ["subscrube", "subscribe_survey"];
        state.fold(record("a@x.com", &[("Email", "a@x.com"), ("name", "Ann"), ("Timestamp", "2024-01-01")]), sticky);
        state.fold(record("b@x.com", &[("name", "Bob"), ("Email", "b@x.com")]), sticky);
        let out = render(&state);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Email,name,Timestamp");
        assert_eq!(lines[1], "a@x.com,Ann,2024-01-01");
        assert_eq!(lines[2], "b@x.com,Bob,");
    }

    #[test]
    fn values_needing_quotes_are_quoted() {
        let mut state = MergeState::new();
        state.fold(record("a@x.com", &[("Email", "a@x.com"), ("name", "Doe, Jane")]), ["x", "y"]);
        let out = render(&state);
        assert!(out.contains("\"Doe, Jane\""), "{out}");
    }

    #[test]
    fn write_to_path_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        std::fs::write(&path, "stale contents that are longer than the new table\n").unwrap();
        write_table_to_path(&path, &MergeState::new(), &MergeConfig::default()).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "Email,subscrube,subscribe_survey\n"
        );
    }

    #[test]
    fn unwritable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("out.csv");
        let err = write_table_to_path(&path, &MergeState::new(), &MergeConfig::default()).unwrap_err();
        assert!(matches!(err, MergeError::Io { .. }), "{err}");
    }
}
