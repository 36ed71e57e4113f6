//! Error types for archive loading, log parsing, module-id lookup and output.
//!
//! Archive and parse errors are scoped to a single log: the batch driver
//! catches them, discards that log and moves on. Lookup errors never leave
//! the [`crate::lookup`] module; they degrade to an absent module id.

use std::path::PathBuf;
use thiserror::Error;

use crate::parsers::sections::Section;

// ============================================================================
// Archive Errors
// ============================================================================

/// Errors that can occur while opening container archives
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Failed to open or read an archive file
    #[error("Failed to read archive {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The zip structure itself is unreadable
    #[error("Invalid zip archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// A nested archive does not contain the fixed-name log entry
    #[error("{archive} has no {entry} entry")]
    MissingEntry { archive: String, entry: String },

    /// A nested archive could not be opened
    #[error("{archive} is not a readable zip archive: {source}")]
    InvalidNestedArchive {
        archive: String,
        #[source]
        source: zip::result::ZipError,
    },

    /// Entry content is not valid UTF-8 text
    #[error("{entry} is not valid UTF-8 text")]
    Encoding { entry: String },

    /// Reading entry bytes failed
    #[error("Failed to read {entry}: {source}")]
    Read {
        entry: String,
        #[source]
        source: std::io::Error,
    },
}

// ============================================================================
// Parse Errors
// ============================================================================

/// Errors that abort processing of one log
#[derive(Debug, Error)]
pub enum ParseError {
    /// A required section has no completion banner
    #[error("Missing section: {0}")]
    MissingSection(Section),

    /// A data line references a chuck/slot not listed in the table state
    #[error("Unknown module at chuck {chuck}, slot {slot}")]
    UnknownSlot { chuck: String, slot: String },

    /// The log contains no parseable timestamp line
    #[error("No timestamp found in log")]
    NoTimestamp,

    /// A fixed-layout log is shorter than expected
    #[error("Log is missing line {0}")]
    MissingLine(usize),

    /// A captured tag has no matching variant
    #[error("Unexpected {field} value: {value}")]
    UnexpectedValue { field: &'static str, value: String },

    /// A fixed-layout timestamp field could not be parsed
    #[error("Invalid timestamp on line {line}: {source}")]
    InvalidTimestamp {
        line: usize,
        #[source]
        source: chrono::ParseError,
    },
}

// ============================================================================
// Lookup Errors
// ============================================================================

/// Errors that can occur when resolving an HDI id to a module id
#[derive(Debug, Error)]
pub enum LookupError {
    /// Network error during request
    #[error("Network error: {0}")]
    Network(String),

    /// Server returned a non-success status
    #[error("Lookup returned status {0}")]
    Status(u16),

    /// Response body could not be read
    #[error("Failed to read response body: {0}")]
    Body(String),

    /// Response did not mention a module id
    #[error("No module id found for {0}")]
    NoMatch(String),
}

// ============================================================================
// Output Errors
// ============================================================================

/// Errors that can occur while writing the output document
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
