//! Loading raw log text out of zip archives.
//!
//! Potting archives are zips of `Config-<label>.zip` files, each of which
//! holds a fixed-name log (normally `Potting.log`). Gluing archives are a
//! single level of text logs. Item names are sorted before reading so the
//! result does not depend on the order the archiver wrote them in.

use regex::Regex;
use std::fs::File;
use std::io::{Cursor, Read, Seek};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use zip::ZipArchive;

use crate::error::ArchiveError;

/// Fixed-name entry inside each nested potting archive
pub const DEFAULT_POTTING_ENTRY: &str = "Potting.log";

/// One log read from an archive
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogEntry {
    /// Short identifying label (e.g. the `<label>` of `Config-<label>.zip`)
    pub label: String,
    /// Name of the archive item the log came from
    pub source: String,
    pub lines: Vec<String>,
}

/// An archive item that could not be turned into a log
#[derive(Debug)]
pub struct SkippedEntry {
    pub name: String,
    pub reason: ArchiveError,
}

/// All logs of one container archive, in sorted item order
#[derive(Debug, Default)]
pub struct LogBundle {
    pub logs: Vec<LogEntry>,
    pub skipped: Vec<SkippedEntry>,
}

impl LogBundle {
    pub fn len(&self) -> usize {
        self.logs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.logs.is_empty()
    }

    fn skip(&mut self, name: &str, reason: ArchiveError) {
        tracing::warn!("Skipping {}: {}", name, reason);
        self.skipped.push(SkippedEntry {
            name: name.to_string(),
            reason,
        });
    }
}

fn open(path: &Path) -> Result<File, ArchiveError> {
    File::open(path).map_err(|source| ArchiveError::Io {
        path: PathBuf::from(path),
        source,
    })
}

/// Sorted names of the non-directory items of an archive
fn sorted_file_names<R: Read + Seek>(archive: &ZipArchive<R>) -> Vec<String> {
    let mut names: Vec<String> = archive
        .file_names()
        .filter(|name| !name.ends_with('/'))
        .map(String::from)
        .collect();
    names.sort();
    names
}

fn read_entry<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<Vec<u8>, ArchiveError> {
    let mut file = archive.by_name(name)?;
    // The header size is untrusted; let the buffer grow with the data read
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|source| ArchiveError::Read {
            entry: name.to_string(),
            source,
        })?;
    Ok(bytes)
}

fn decode_lines(bytes: Vec<u8>, entry: &str) -> Result<Vec<String>, ArchiveError> {
    let text = String::from_utf8(bytes).map_err(|_| ArchiveError::Encoding {
        entry: entry.to_string(),
    })?;
    Ok(text.lines().map(String::from).collect())
}

fn config_name_regex() -> &'static Regex {
    static CONFIG_NAME: OnceLock<Regex> = OnceLock::new();
    CONFIG_NAME.get_or_init(|| Regex::new(r"Config-(.*)\.zip").expect("Failed to compile regex"))
}

/// `Config-2019_03_15.zip` -> `2019_03_15`; other names fall back to their stem
pub fn potting_label(item_name: &str) -> String {
    if let Some(caps) = config_name_regex().captures(item_name) {
        return caps[1].to_string();
    }
    Path::new(item_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| item_name.to_string())
}

/// Open one nested archive in memory and pull out its fixed-name entry
fn read_nested_log(bytes: Vec<u8>, item_name: &str, entry_name: &str) -> Result<Vec<String>, ArchiveError> {
    let mut inner = ZipArchive::new(Cursor::new(bytes)).map_err(|source| {
        ArchiveError::InvalidNestedArchive {
            archive: item_name.to_string(),
            source,
        }
    })?;
    let bytes = match read_entry(&mut inner, entry_name) {
        Err(ArchiveError::Zip(zip::result::ZipError::FileNotFound)) => {
            return Err(ArchiveError::MissingEntry {
                archive: item_name.to_string(),
                entry: entry_name.to_string(),
            })
        }
        other => other?,
    };
    decode_lines(bytes, entry_name)
}

/// Load every nested potting log from a container archive on disk
pub fn load_potting_logs(path: &Path, entry_name: &str) -> Result<LogBundle, ArchiveError> {
    tracing::info!("Loading potting logs from {:?}", path);
    load_potting_logs_from_reader(open(path)?, entry_name)
}

pub fn load_potting_logs_from_reader<R: Read + Seek>(
    reader: R,
    entry_name: &str,
) -> Result<LogBundle, ArchiveError> {
    let mut outer = ZipArchive::new(reader)?;
    let mut bundle = LogBundle::default();

    for item_name in sorted_file_names(&outer) {
        let bytes = match read_entry(&mut outer, &item_name) {
            Ok(bytes) => bytes,
            Err(e) => {
                bundle.skip(&item_name, e);
                continue;
            }
        };
        match read_nested_log(bytes, &item_name, entry_name) {
            Ok(lines) => bundle.logs.push(LogEntry {
                label: potting_label(&item_name),
                source: item_name,
                lines,
            }),
            Err(e) => bundle.skip(&item_name, e),
        }
    }

    tracing::debug!(
        "Read {} potting logs, skipped {}",
        bundle.logs.len(),
        bundle.skipped.len()
    );
    Ok(bundle)
}

/// Load every text log from a single-level gluing archive on disk
pub fn load_gluing_logs(path: &Path) -> Result<LogBundle, ArchiveError> {
    tracing::info!("Loading gluing logs from {:?}", path);
    load_gluing_logs_from_reader(open(path)?)
}

pub fn load_gluing_logs_from_reader<R: Read + Seek>(reader: R) -> Result<LogBundle, ArchiveError> {
    let mut archive = ZipArchive::new(reader)?;
    let mut bundle = LogBundle::default();

    for name in sorted_file_names(&archive) {
        match read_entry(&mut archive, &name).and_then(|bytes| decode_lines(bytes, &name)) {
            Ok(lines) => bundle.logs.push(LogEntry {
                label: name.clone(),
                source: name,
                lines,
            }),
            Err(e) => bundle.skip(&name, e),
        }
    }
    Ok(bundle)
}
