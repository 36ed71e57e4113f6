//! Potting log parser
//!
//! A potting log is split into sections (see [`super::sections`]) and four of
//! them are read:
//! - `Configure Tester`: table state, one line per chuck/slot
//! - `Review Fiducials`: fiducial measurements and per-surface alignment
//! - `Pot`: pot-line geometry
//! - `Finish`: operator, Sylgard batch and pressure
//!
//! Every extractor works on the same [`PottingContext`], which owns the
//! module builders of the log being parsed. A line that names a chuck/slot
//! not seen in the table state aborts the whole log.

use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::OnceLock;
use strum::EnumString;

use super::sections::{split_sections_with, RepeatPolicy, Section};
use super::timestamps::LogTiming;
use super::types::{
    Fiducial, LineState, ModuleBuilder, Orient3d, Parseable, PotLine, PottingModule, Segment,
    SlotKey, Surface, SurfaceAlignment, Vec3d,
};
use crate::error::ParseError;

const EMPTY_STATE: &str = "Empty";

struct Patterns {
    table_state: Regex,
    fiducial: Regex,
    alignment: Regex,
    pot_line: Regex,
    finish: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        table_state: Regex::new(r"Chuck: (\d+), Slot: (\d+), S/N: (.*), State: (.*)$")
            .expect("Failed to compile table state regex"),
        fiducial: Regex::new(concat!(
            r"Chuck (\d+) Slot (\d+): , (BBM|HDI) Fiducial (.*): Source: (.*), ",
            r"Image Position: ([\d.]*),([\d.]*),([\d.]*), ",
            r"Image Coor?dinate: ([\d.]*),([\d.]*),([\d.]*), ",
            r"Fiducial Position: ([\d.]*),([\d.]*),([\d.]*)",
        ))
        .expect("Failed to compile fiducial regex"),
        alignment: Regex::new(concat!(
            r"Chuck (\d+) Slot (\d+): , (BBM|HDI) ",
            r"Center:([\d.]*),([\d.]*),([\d.]*) ",
            r"Orientation:([\d.-]*),([\d.-]*),([\d.-]*),([\d.-]*) ",
            r"Rotation:([\d.-]*) degrees",
        ))
        .expect("Failed to compile alignment regex"),
        pot_line: Regex::new(concat!(
            r"Chuck (\d+) Slot (\d+): : (.*), ",
            r"Global: ([\d.-]*),([\d.-]*),([\d.-]*)->([\d.-]*),([\d.-]*),([\d.-]*), ",
            r"Local: ([\d.-]*),([\d.-]*),([\d.-]*)->([\d.-]*),([\d.-]*),([\d.-]*), ",
            r"(Enabled|Disabled)",
        ))
        .expect("Failed to compile pot line regex"),
        finish: Regex::new(r"(Operator Name|Sylgard Batch|Pressure):(.*)$")
            .expect("Failed to compile finish regex"),
    })
}

fn vec3d(caps: &Captures, first: usize) -> Vec3d {
    Vec3d::new(&caps[first], &caps[first + 1], &caps[first + 2])
}

fn orient3d(caps: &Captures, first: usize) -> Orient3d {
    Orient3d::new(
        &caps[first],
        &caps[first + 1],
        &caps[first + 2],
        &caps[first + 3],
    )
}

/// Per-log processing state threaded through the extractors
#[derive(Debug)]
pub struct PottingContext {
    pub timing: LogTiming,
    modules: Vec<ModuleBuilder>,
    index: BTreeMap<SlotKey, usize>,
}

impl PottingContext {
    pub fn new(timing: LogTiming) -> Self {
        Self {
            timing,
            modules: Vec::new(),
            index: BTreeMap::new(),
        }
    }

    /// Register a module; a repeated chuck/slot replaces the earlier one in place
    pub fn insert(&mut self, builder: ModuleBuilder) {
        match self.index.get(&builder.key) {
            Some(&i) => self.modules[i] = builder,
            None => {
                self.index.insert(builder.key.clone(), self.modules.len());
                self.modules.push(builder);
            }
        }
    }

    pub fn module_mut(&mut self, chuck: &str, slot: &str) -> Result<&mut ModuleBuilder, ParseError> {
        let key = SlotKey::new(chuck, slot);
        match self.index.get(&key) {
            Some(&i) => Ok(&mut self.modules[i]),
            None => Err(ParseError::UnknownSlot {
                chuck: key.chuck,
                slot: key.slot,
            }),
        }
    }

    pub fn modules(&self) -> &[ModuleBuilder] {
        &self.modules
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Finalize every builder in table-state order
    pub fn into_modules(self) -> Vec<PottingModule> {
        let info = self.timing.info();
        self.modules
            .into_iter()
            .map(|builder| builder.build(&info))
            .collect()
    }
}

/// Create one builder per occupied slot of the `Configure Tester` section
pub fn parse_table_state<S: AsRef<str>>(lines: &[S], ctx: &mut PottingContext) {
    let reg = &patterns().table_state;
    for line in lines {
        let Some(caps) = reg.captures(line.as_ref().trim()) else {
            continue;
        };
        if &caps[4] == EMPTY_STATE {
            continue;
        }
        ctx.insert(ModuleBuilder::new(
            &caps[3],
            SlotKey::new(&caps[1], &caps[2]),
        ));
    }
}

/// Attach fiducials and surface alignment from the `Review Fiducials` section
pub fn parse_alignment<S: AsRef<str>>(
    lines: &[S],
    ctx: &mut PottingContext,
) -> Result<(), ParseError> {
    let pats = patterns();
    for line in lines {
        let line = line.as_ref();

        if let Some(caps) = pats.fiducial.captures(line) {
            let surface = surface(&caps[3])?;
            let fid = Fiducial {
                name: caps[4].to_string(),
                source: caps[5].to_string(),
                img_pos: vec3d(&caps, 6),
                img_crd: vec3d(&caps, 9),
                fid_pos: vec3d(&caps, 12),
            };
            ctx.module_mut(&caps[1], &caps[2])?
                .fiducials_mut(surface)
                .insert(fid.name.clone(), fid);
        }

        if let Some(caps) = pats.alignment.captures(line) {
            let surface = surface(&caps[3])?;
            let alignment = SurfaceAlignment {
                center: vec3d(&caps, 4),
                orient: orient3d(&caps, 7),
                rotation: caps[11].to_string(),
            };
            ctx.module_mut(&caps[1], &caps[2])?
                .set_alignment(surface, alignment);
        }
    }
    Ok(())
}

fn surface(tag: &str) -> Result<Surface, ParseError> {
    Surface::from_str(tag).map_err(|_| ParseError::UnexpectedValue {
        field: "surface",
        value: tag.to_string(),
    })
}

/// Attach pot-line geometry from the `Pot` section
pub fn parse_pot_lines<S: AsRef<str>>(
    lines: &[S],
    ctx: &mut PottingContext,
) -> Result<(), ParseError> {
    let reg = &patterns().pot_line;
    for line in lines {
        let Some(caps) = reg.captures(line.as_ref()) else {
            continue;
        };
        let state =
            LineState::from_str(&caps[16]).map_err(|_| ParseError::UnexpectedValue {
                field: "pot line state",
                value: caps[16].to_string(),
            })?;
        let pot_line = PotLine {
            global: Segment {
                start: vec3d(&caps, 4),
                end: vec3d(&caps, 7),
            },
            local: Segment {
                start: vec3d(&caps, 10),
                end: vec3d(&caps, 13),
            },
            state,
        };
        ctx.module_mut(&caps[1], &caps[2])?
            .pot_lines
            .insert(caps[3].to_string(), pot_line);
    }
    Ok(())
}

/// Labels accepted by the finish pattern
#[derive(Clone, Copy, Debug, EnumString, PartialEq, Eq)]
pub enum FinishField {
    #[strum(serialize = "Operator Name")]
    OperatorName,
    #[strum(serialize = "Sylgard Batch")]
    SylgardBatch,
    #[strum(serialize = "Pressure")]
    Pressure,
}

/// Broadcast finish values onto every module, last line wins
pub fn parse_finish<S: AsRef<str>>(
    lines: &[S],
    ctx: &mut PottingContext,
) -> Result<(), ParseError> {
    let reg = &patterns().finish;
    for line in lines {
        let Some(caps) = reg.captures(line.as_ref()) else {
            continue;
        };
        let field = FinishField::from_str(&caps[1]).map_err(|_| ParseError::UnexpectedValue {
            field: "finish label",
            value: caps[1].to_string(),
        })?;
        let value = caps[2].trim().to_string();
        for module in ctx.modules.iter_mut() {
            let slot = match field {
                FinishField::OperatorName => &mut module.finish.operator_name,
                FinishField::SylgardBatch => &mut module.finish.sylgard_batch,
                FinishField::Pressure => &mut module.finish.pressure,
            };
            *slot = Some(value.clone());
        }
    }
    Ok(())
}

/// Modules parsed from one potting log
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedPottingLog {
    pub modules: Vec<PottingModule>,
    /// Whole minutes between first and last timestamp of the log
    pub elapsed_minutes: u64,
}

/// Potting log parser
#[derive(Clone, Copy, Debug, Default)]
pub struct Potting {
    pub repeat_policy: RepeatPolicy,
}

impl Parseable for Potting {
    type Output = ParsedPottingLog;

    fn parse<S: AsRef<str>>(&self, lines: &[S]) -> Result<ParsedPottingLog, ParseError> {
        let timing = LogTiming::scan(lines).ok_or(ParseError::NoTimestamp)?;
        let sections = split_sections_with(lines, self.repeat_policy);
        if !sections.trailing.is_empty() {
            tracing::debug!(
                "Ignoring {} lines after the last banner",
                sections.trailing.len()
            );
        }

        let mut ctx = PottingContext::new(timing);
        parse_table_state(sections.require(Section::ConfigureTester)?, &mut ctx);
        parse_alignment(sections.require(Section::ReviewFiducials)?, &mut ctx)?;
        parse_pot_lines(sections.require(Section::Pot)?, &mut ctx)?;
        parse_finish(sections.require(Section::Finish)?, &mut ctx)?;

        let elapsed_minutes = ctx.timing.elapsed_minutes();
        Ok(ParsedPottingLog {
            modules: ctx.into_modules(),
            elapsed_minutes,
        })
    }
}

/// Parse one potting log with the default repeat policy
pub fn parse_potting_log<S: AsRef<str>>(lines: &[S]) -> Result<ParsedPottingLog, ParseError> {
    Potting::default().parse(lines)
}
