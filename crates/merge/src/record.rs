use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use csv::StringRecord;
use tracing::debug;

use crate::config::MergeConfig;
use crate::model::{Fields, SubscriberRecord};

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M%:z",
];

/// Parse an ISO-8601 style date-time. Offsets are normalized to UTC.
///
/// Surrounding whitespace is not accepted.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    if value.is_empty() || value.trim() != value {
        return None;
    }

    let zoned = value
        .strip_suffix('Z')
        .or_else(|| value.strip_suffix('z'))
        .map(|rest| format!("{rest}+00:00"));
    let zoned = zoned.as_deref().unwrap_or(value);
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(zoned, fmt) {
            return Some(dt.naive_utc());
        }
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

/// Trim + lowercase, the key every email is deduplicated on.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Turns batch rows into [`SubscriberRecord`]s for one header layout.
#[derive(Debug, Clone)]
pub struct RecordParser<'a> {
    headers: Vec<String>,
    email_column: &'a str,
    timestamp_column: &'a str,
}

impl<'a> RecordParser<'a> {
    pub fn new(headers: &StringRecord, config: &'a MergeConfig) -> Self {
        let headers = headers
            .iter()
            .enumerate()
            .map(|(i, h)| {
                if i == 0 {
                    h.trim_start_matches('\u{feff}').to_string()
                } else {
                    h.to_string()
                }
            })
            .collect();
        Self {
            headers,
            email_column: &config.email_column,
            timestamp_column: &config.timestamp_column,
        }
    }

    /// Map a row onto the header. Short rows pad with `""`; surplus cells are dropped.
    pub fn fields(&self, row: &StringRecord) -> Fields {
        let mut fields = Fields::with_capacity(self.headers.len());
        for (i, name) in self.headers.iter().enumerate() {
            fields.insert(name.clone(), row.get(i).unwrap_or("").to_string());
        }
        fields
    }

    /// Returns `None` for rows without an email.
    pub fn parse(&self, row: &StringRecord) -> Option<SubscriberRecord> {
        let fields = self.fields(row);

        let email = normalize_email(fields.get(self.email_column).map_or("", String::as_str));
        if email.is_empty() {
            return None;
        }

        let raw_ts = fields.get(self.timestamp_column).map_or("", String::as_str);
        let timestamp = parse_timestamp(raw_ts).unwrap_or_else(|| {
            if !raw_ts.trim().is_empty() {
                debug!(email = %email, value = raw_ts, "unparseable timestamp");
            }
            NaiveDateTime::MIN
        });

        Some(SubscriberRecord {
            email,
            fields,
            timestamp,
        })
    }
}
