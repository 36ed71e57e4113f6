pub mod gluing;
pub mod potting;
pub mod sections;
pub mod timestamps;
pub mod types;

pub use gluing::Gluing;
pub use potting::{parse_potting_log, ParsedPottingLog, Potting, PottingContext};
pub use sections::{split_sections, RepeatPolicy, Section, SectionMap, SectionScanner};
pub use types::{CombinedLog, GluingModule, Parseable, PottingModule};
