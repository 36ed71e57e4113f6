//! Section splitting for potting logs
//!
//! A potting log is a flat list of lines. Each processing step ends with a
//! banner such as `Review Fiducials has been executed successfully`. The
//! scanner below walks the log once, accumulating lines until a banner
//! closes the current section:
//!
//! ```text
//!   Unassigned --(non-banner)--> Unassigned   (line appended)
//!   Unassigned --(banner S)----> Unassigned   (lines committed to S)
//! ```
//!
//! Banner lines belong to no section. Lines after the final banner are kept
//! as `trailing` and never committed.

use regex::Regex;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::OnceLock;
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

/// The fixed vocabulary of potting process steps
#[derive(AsRefStr, Clone, Copy, Debug, Display, EnumIter, EnumString, PartialEq, Eq, Hash)]
pub enum Section {
    #[strum(serialize = "Configure Tester")]
    ConfigureTester,
    #[strum(serialize = "Inspect Fiducials")]
    InspectFiducials,
    #[strum(serialize = "Review Fiducials")]
    ReviewFiducials,
    #[strum(serialize = "Inspect Modules")]
    InspectModules,
    #[strum(serialize = "Review Modules")]
    ReviewModules,
    #[strum(serialize = "Load Sylgard")]
    LoadSylgard,
    #[strum(serialize = "Align Needle")]
    AlignNeedle,
    Purge,
    Pot,
    Finish,
}

const BANNER_SUFFIX: &str = "has been executed successfully";

fn banner_regex() -> &'static Regex {
    static BANNER: OnceLock<Regex> = OnceLock::new();
    BANNER.get_or_init(|| {
        let names: Vec<String> = Section::iter()
            .map(|s| regex::escape(s.as_ref()))
            .collect();
        let pattern = format!("({}) {}", names.join("|"), BANNER_SUFFIX);
        Regex::new(&pattern).expect("Failed to compile banner regex")
    })
}

/// Recognize a completion banner anywhere in the line
pub fn banner_section(line: &str) -> Option<Section> {
    let captures = banner_regex().captures(line)?;
    Section::from_str(&captures[1]).ok()
}

/// What to do when the same section banner appears more than once
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RepeatPolicy {
    /// A repeated banner replaces the earlier section's lines
    #[default]
    LastWins,
    /// A repeated banner's lines are discarded
    FirstWins,
}

/// Lines of each completed section
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SectionMap {
    sections: HashMap<Section, Vec<String>>,
    /// Lines after the last banner
    pub trailing: Vec<String>,
}

impl SectionMap {
    pub fn get(&self, section: Section) -> Option<&[String]> {
        self.sections.get(&section).map(Vec::as_slice)
    }

    /// Lines of a section the caller cannot do without
    pub fn require(&self, section: Section) -> Result<&[String], crate::error::ParseError> {
        self.get(section)
            .ok_or(crate::error::ParseError::MissingSection(section))
    }

    pub fn contains(&self, section: Section) -> bool {
        self.sections.contains_key(&section)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// Single-pass banner scanner
#[derive(Debug, Default)]
pub struct SectionScanner {
    policy: RepeatPolicy,
    current: Vec<String>,
    sections: HashMap<Section, Vec<String>>,
}

impl SectionScanner {
    pub fn new(policy: RepeatPolicy) -> Self {
        Self {
            policy,
            ..Default::default()
        }
    }

    /// Feed one line, returning the section it closed, if any
    pub fn push(&mut self, line: &str) -> Option<Section> {
        let Some(section) = banner_section(line) else {
            self.current.push(line.to_string());
            return None;
        };

        let lines = std::mem::take(&mut self.current);
        match self.policy {
            RepeatPolicy::LastWins => {
                if self.sections.insert(section, lines).is_some() {
                    tracing::debug!("Section {} repeated, keeping the later one", section);
                }
            }
            RepeatPolicy::FirstWins => {
                if self.sections.contains_key(&section) {
                    tracing::debug!("Section {} repeated, keeping the earlier one", section);
                } else {
                    self.sections.insert(section, lines);
                }
            }
        }
        Some(section)
    }

    pub fn finish(self) -> SectionMap {
        SectionMap {
            sections: self.sections,
            trailing: self.current,
        }
    }
}

/// Split a log with the default repeat policy
pub fn split_sections<S: AsRef<str>>(lines: &[S]) -> SectionMap {
    split_sections_with(lines, RepeatPolicy::default())
}

pub fn split_sections_with<S: AsRef<str>>(lines: &[S], policy: RepeatPolicy) -> SectionMap {
    let mut scanner = SectionScanner::new(policy);
    for line in lines {
        scanner.push(line.as_ref());
    }
    scanner.finish()
}
