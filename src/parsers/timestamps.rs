//! Date and time handling for potting and gluing logs
//!
//! Potting lines carry a 12-hour timestamp before a `>>>` marker, e.g.
//! `15/03/2019 10:22:33 AM >>> Pot has been executed successfully`.
//! Gluing logs carry `Label: value` lines with either a US-ordered date or a
//! day-first date-time joined by `-`.

use chrono::{NaiveDate, NaiveDateTime};

use super::types::TimingInfo;

const POTTING_FORMAT: &str = "%d/%m/%Y %I:%M:%S %p";
const GLUING_DATE_FORMAT: &str = "%m/%d/%Y";
const GLUING_DATETIME_FORMAT: &str = "%d/%m/%Y-%H:%M:%S";

const OUTPUT_DATETIME_FORMAT: &str = "%d/%m/%Y-%H:%M:%S";
const OUTPUT_DATE_FORMAT: &str = "%d/%m/%Y";

/// Parse the timestamp prefix of a potting log line
pub fn parse_potting_datetime(line: &str) -> Option<NaiveDateTime> {
    let stamp = line.split(">>>").next()?.trim();
    NaiveDateTime::parse_from_str(stamp, POTTING_FORMAT).ok()
}

/// Text after the first colon of a `Label: value` line
fn field_value(line: &str) -> &str {
    match line.find(':') {
        Some(pos) => line[pos + 1..].trim(),
        None => line.trim(),
    }
}

pub fn parse_gluing_date(line: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(field_value(line), GLUING_DATE_FORMAT)
}

pub fn parse_gluing_datetime(line: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(field_value(line), GLUING_DATETIME_FORMAT)
}

pub fn format_datetime(dt: &NaiveDateTime) -> String {
    dt.format(OUTPUT_DATETIME_FORMAT).to_string()
}

pub fn format_date(date: &NaiveDate) -> String {
    date.format(OUTPUT_DATE_FORMAT).to_string()
}

/// First and last parseable timestamps of a potting log
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LogTiming {
    pub start: NaiveDateTime,
    pub finish: NaiveDateTime,
}

impl LogTiming {
    /// Scan forward for the first timestamp and backward for the last one.
    /// Trailing lines without a timestamp (blank lines, footers) are skipped.
    pub fn scan<S: AsRef<str>>(lines: &[S]) -> Option<Self> {
        let start = lines
            .iter()
            .find_map(|line| parse_potting_datetime(line.as_ref()))?;
        let finish = lines
            .iter()
            .rev()
            .find_map(|line| parse_potting_datetime(line.as_ref()))?;
        Some(Self { start, finish })
    }

    /// Whole minutes between first and last timestamp, never negative
    pub fn elapsed_minutes(&self) -> u64 {
        let seconds = (self.finish - self.start).num_seconds().max(0);
        (seconds / 60) as u64
    }

    pub fn info(&self) -> TimingInfo {
        TimingInfo {
            time_start: format_datetime(&self.start),
            time_end: format_datetime(&self.finish),
            time_taken: self.elapsed_minutes(),
            date: format_date(&self.start.date()),
        }
    }
}
