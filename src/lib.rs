//! potlog - Manufacturing log to JSON conversion
//!
//! This library parses potting-machine and gluing-process logs, bundled in
//! zip archives, into one structured record per manufactured module.
//!
//! ## Module Structure
//!
//! - [`archive`] - Reading (nested) zip archives into raw log lines
//! - [`parsers`] - Section splitting and per-section extractors
//!   - `sections` - Banner-driven section scanner
//!   - `potting` - Table state, alignment, pot-line and finish extractors
//!   - `gluing` - Fixed-layout gluing log parser
//!   - `timestamps` - Log date/time formats
//!   - `types` - Geometry, module builder and output record types
//! - [`lookup`] - HDI id to module id resolution over HTTP
//! - [`batch`] - Per-archive processing, combining and JSON output
//! - [`settings`] - User settings persistence
//! - [`error`] - Error types

pub mod archive;
pub mod batch;
pub mod error;
pub mod lookup;
pub mod parsers;
pub mod settings;
