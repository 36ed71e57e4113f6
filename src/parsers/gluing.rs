//! Gluing log parser
//!
//! Gluing logs have a fixed line layout. Header values sit on known lines as
//! `Label: value`, and lines 22..30 list the BBM and HDI id of each of the
//! four slots, BBM first. Placeholder ids (`glass`, `kapton`, `---`) mark
//! slots that were not used.

use super::timestamps::{format_date, format_datetime, parse_gluing_date, parse_gluing_datetime};
use super::types::{GluingModule, GluingRecord, Parseable};
use crate::error::ParseError;
use crate::lookup::ModuleIdResolver;

const DATE_LINE: usize = 4;
const START_TIME_LINE: usize = 5;
const OPERATOR_LINE: usize = 6;
const SOFTWARE_VERSION_LINE: usize = 7;
const FINISH_TIME_LINE: usize = 10;
const PRESSURE_LINE: usize = 11;
const ARALDITE_BATCH_LINE: usize = 12;
const CHUCK_LINE: usize = 18;
const SLOT_LINES: std::ops::Range<usize> = 22..30;

const UNUSED_BBM: [&str; 2] = ["glass", "---"];
const UNUSED_HDI: [&str; 2] = ["kapton", "---"];

fn line<S: AsRef<str>>(lines: &[S], index: usize) -> Result<&str, ParseError> {
    lines
        .get(index)
        .map(|l| l.as_ref())
        .ok_or(ParseError::MissingLine(index))
}

/// Second `:`-separated field, trimmed
fn value<S: AsRef<str>>(lines: &[S], index: usize) -> Result<String, ParseError> {
    let text = line(lines, index)?;
    Ok(text.split(':').nth(1).unwrap_or("").trim().to_string())
}

fn datetime<S: AsRef<str>>(lines: &[S], index: usize) -> Result<String, ParseError> {
    parse_gluing_datetime(line(lines, index)?)
        .map(|dt| format_datetime(&dt))
        .map_err(|source| ParseError::InvalidTimestamp {
            line: index,
            source,
        })
}

/// Gluing log parser; resolves each HDI id to a module id
pub struct Gluing<'a> {
    resolver: &'a dyn ModuleIdResolver,
}

impl<'a> Gluing<'a> {
    pub fn new(resolver: &'a dyn ModuleIdResolver) -> Self {
        Self { resolver }
    }
}

impl Parseable for Gluing<'_> {
    type Output = Vec<GluingModule>;

    fn parse<S: AsRef<str>>(&self, lines: &[S]) -> Result<Vec<GluingModule>, ParseError> {
        let date = parse_gluing_date(line(lines, DATE_LINE)?)
            .map(|d| format_date(&d))
            .map_err(|source| ParseError::InvalidTimestamp {
                line: DATE_LINE,
                source,
            })?;
        let start_time = datetime(lines, START_TIME_LINE)?;
        let finish_time = datetime(lines, FINISH_TIME_LINE)?;
        let operator = value(lines, OPERATOR_LINE)?;
        let software_version = value(lines, SOFTWARE_VERSION_LINE)?;
        let pressure = value(lines, PRESSURE_LINE)?;
        let araldite_batch = value(lines, ARALDITE_BATCH_LINE)?;
        let chuck = value(lines, CHUCK_LINE)?;

        let ids = SLOT_LINES
            .map(|i| line(lines, i).map(str::trim))
            .collect::<Result<Vec<_>, _>>()?;

        let mut modules = Vec::new();
        for (i, pair) in ids.chunks(2).enumerate() {
            let (bbm_id, hdi_id) = (pair[0], pair[1]);
            if UNUSED_BBM.contains(&bbm_id) || UNUSED_HDI.contains(&hdi_id) {
                continue;
            }
            modules.push(GluingModule {
                module_id: self.resolver.resolve(hdi_id),
                record: GluingRecord {
                    hdi_id: hdi_id.to_string(),
                    bbm_id: bbm_id.to_string(),
                    date: date.clone(),
                    start_time: start_time.clone(),
                    finish_time: finish_time.clone(),
                    operator: operator.clone(),
                    software_version: software_version.clone(),
                    pressure: pressure.clone(),
                    araldite_batch: araldite_batch.clone(),
                    chuck: chuck.clone(),
                    slot: (i + 1) as u8,
                },
            });
        }
        Ok(modules)
    }
}
