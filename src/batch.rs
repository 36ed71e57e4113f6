//! Batch processing of whole archives.
//!
//! Each log is parsed on its own. A structural or lookup error discards that
//! log's output entirely and processing continues with the next one.

use serde::Serialize;
use std::path::Path;

use crate::archive::{load_gluing_logs, load_potting_logs, LogBundle};
use crate::error::{ArchiveError, OutputError};
use crate::lookup::ModuleIdResolver;
use crate::parsers::gluing::Gluing;
use crate::parsers::potting::Potting;
use crate::parsers::types::{CombinedLog, GluingModule, Parseable, PottingModule};
use crate::settings::Settings;

/// Parse every potting log of a bundle and tag the surviving modules
pub fn process_potting_bundle(bundle: &LogBundle, parser: &Potting) -> Vec<PottingModule> {
    let mut modules = Vec::new();

    for entry in &bundle.logs {
        let parsed = match parser.parse(&entry.lines) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("file: {} has invalid format, skipping: {}", entry.label, e);
                continue;
            }
        };

        let count = parsed.modules.len();
        if count == 0 {
            tracing::warn!("file: {} lists no modules, skipping", entry.label);
            continue;
        }

        let per_module = parsed.elapsed_minutes / count as u64;
        for mut module in parsed.modules {
            module.record.time = Some(per_module);
            module.record.source_file = Some(entry.label.clone());
            modules.push(module);
        }
        tracing::info!("parsed {} modules from {}", count, entry.label);
    }

    modules
}

pub fn process_potting_logs(
    path: &Path,
    settings: &Settings,
) -> Result<Vec<PottingModule>, ArchiveError> {
    let bundle = load_potting_logs(path, &settings.potting_entry)?;
    Ok(process_potting_bundle(&bundle, &Potting::default()))
}

/// Parse the last `window` gluing logs of a bundle.
///
/// Records are keyed by module id; a later log replaces an earlier record
/// with the same id, and records whose id could not be resolved share one
/// slot in the same way.
pub fn process_gluing_bundle(
    bundle: &LogBundle,
    window: usize,
    resolver: &dyn ModuleIdResolver,
) -> Vec<GluingModule> {
    let parser = Gluing::new(resolver);
    let start = bundle.logs.len().saturating_sub(window);
    let mut modules: Vec<GluingModule> = Vec::new();

    for entry in &bundle.logs[start..] {
        let parsed = match parser.parse(&entry.lines) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("file: {} has invalid format, skipping: {}", entry.label, e);
                continue;
            }
        };
        tracing::info!("parsed {} modules from {}", parsed.len(), entry.label);

        for module in parsed {
            match modules.iter_mut().find(|m| m.module_id == module.module_id) {
                Some(existing) => *existing = module,
                None => modules.push(module),
            }
        }
    }

    modules
}

pub fn process_gluing_logs(
    path: &Path,
    settings: &Settings,
    resolver: &dyn ModuleIdResolver,
) -> Result<Vec<GluingModule>, ArchiveError> {
    let bundle = load_gluing_logs(path)?;
    Ok(process_gluing_bundle(&bundle, settings.gluing_window, resolver))
}

/// Merge potting and gluing records under uppercased module ids
pub fn combine(potting: Vec<PottingModule>, gluing: Vec<GluingModule>) -> CombinedLog {
    let mut logs = CombinedLog::new();

    for module in potting {
        logs.entry(module.module_id.to_uppercase())
            .or_default()
            .potting = Some(module.record);
    }
    for module in gluing {
        let Some(id) = module.module_id else {
            continue;
        };
        logs.entry(id.to_uppercase()).or_default().gluing = Some(module.record);
    }

    logs
}

/// Serialize as two-space indented JSON and write to `path`
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), OutputError> {
    let content = serde_json::to_string_pretty(value)?;
    std::fs::write(path, content).map_err(|source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!("Wrote {:?}", path);
    Ok(())
}
