//! Common test utilities shared across all test modules
//!
//! This module provides builders for synthetic potting and gluing logs and
//! for the (nested) zip archives they are shipped in.

#![allow(dead_code)]

use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

pub const BANNER: &str = "has been executed successfully";

/// Prefix a line the way the potting machine does
pub fn stamped(time: &str, text: &str) -> String {
    format!("15/03/2019 {} >>> {}", time, text)
}

pub fn banner(time: &str, section: &str) -> String {
    stamped(time, &format!("{} {}", section, BANNER))
}

/// Builder for a synthetic potting log with every section present
#[derive(Clone, Debug, Default)]
pub struct PottingLogBuilder {
    pub table: Vec<String>,
    pub review: Vec<String>,
    pub pot: Vec<String>,
    pub finish: Vec<String>,
    pub trailing: Vec<String>,
    pub omit: Vec<&'static str>,
    pub start: Option<String>,
    pub end: Option<String>,
}

impl PottingLogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slot(mut self, chuck: u32, slot: u32, serial: &str, state: &str) -> Self {
        self.table.push(stamped(
            "10:01:00 AM",
            &format!("Chuck: {}, Slot: {}, S/N: {}, State: {}", chuck, slot, serial, state),
        ));
        self
    }

    pub fn review(mut self, line: &str) -> Self {
        self.review.push(stamped("10:10:00 AM", line));
        self
    }

    pub fn fiducial(self, chuck: u32, slot: u32, surface: &str, name: &str, pos: &str) -> Self {
        let line = format!(
            "Chuck {} Slot {}: , {} Fiducial {}: Source: Cam1, Image Position: {}, Image Coordinate: 4.0,5.0,6.0, Fiducial Position: 7.0,8.0,9.0",
            chuck, slot, surface, name, pos
        );
        self.review(&line)
    }

    pub fn center(self, chuck: u32, slot: u32, surface: &str) -> Self {
        let line = format!(
            "Chuck {} Slot {}: , {} Center:100.5,50.25,1.0 Orientation:0.0,0.0,-0.0012,1.0 Rotation:-0.069 degrees",
            chuck, slot, surface
        );
        self.review(&line)
    }

    pub fn pot_line(mut self, chuck: u32, slot: u32, name: &str, state: &str) -> Self {
        self.pot.push(stamped(
            "10:20:00 AM",
            &format!(
                "Chuck {} Slot {}: : {}, Global: 1.0,2.0,3.0->4.0,5.0,6.0, Local: -1.0,-2.0,-3.0->-4.0,-5.0,-6.0, {}",
                chuck, slot, name, state
            ),
        ));
        self
    }

    pub fn finish_line(mut self, line: &str) -> Self {
        self.finish.push(line.to_string());
        self
    }

    pub fn trailing(mut self, line: &str) -> Self {
        self.trailing.push(line.to_string());
        self
    }

    pub fn without(mut self, section: &'static str) -> Self {
        self.omit.push(section);
        self
    }

    pub fn times(mut self, start: &str, end: &str) -> Self {
        self.start = Some(start.to_string());
        self.end = Some(end.to_string());
        self
    }

    fn section(&self, out: &mut Vec<String>, name: &'static str, lines: &[String]) {
        self.section_at(out, "10:30:00 AM", name, lines);
    }

    fn section_at(&self, out: &mut Vec<String>, time: &str, name: &'static str, lines: &[String]) {
        out.extend(lines.iter().cloned());
        if !self.omit.contains(&name) {
            out.push(banner(time, name));
        }
    }

    pub fn build(&self) -> Vec<String> {
        let start = self.start.as_deref().unwrap_or("10:00:00 AM");
        let end = self.end.as_deref().unwrap_or("11:00:00 AM");

        let mut out = vec![stamped(start, "Potting started")];
        self.section(&mut out, "Configure Tester", &self.table);
        self.section(&mut out, "Inspect Fiducials", &[stamped("10:05:00 AM", "camera ok")]);
        self.section(&mut out, "Review Fiducials", &self.review);
        self.section(&mut out, "Inspect Modules", &[]);
        self.section(&mut out, "Review Modules", &[]);
        self.section(&mut out, "Load Sylgard", &[]);
        self.section(&mut out, "Align Needle", &[]);
        self.section(&mut out, "Purge", &[]);
        self.section(&mut out, "Pot", &self.pot);
        self.section_at(&mut out, end, "Finish", &self.finish);
        out.extend(self.trailing.iter().cloned());
        out
    }

    pub fn text(&self) -> String {
        self.build().join("\n")
    }
}

/// Builder for a fixed-layout gluing log
pub fn gluing_log(date: &str, chuck: &str, slots: [&str; 8]) -> Vec<String> {
    let mut lines: Vec<String> = vec![
        "Gluing Log".to_string(),
        String::new(),
        String::new(),
        String::new(),
        format!("Date: {}", date),
        "Start Time: 15/03/2019-10:22:33".to_string(),
        "Operator: Jane".to_string(),
        "Software Version: 2.1".to_string(),
        String::new(),
        String::new(),
        "Finish Time: 15/03/2019-11:02:00".to_string(),
        "Pressure: 60".to_string(),
        "Araldite Batch: AR-77".to_string(),
    ];
    lines.resize(18, String::new());
    lines.push(format!("Chuck: {}", chuck));
    lines.resize(22, String::new());
    lines.extend(slots.iter().map(|s| s.to_string()));
    lines.push(String::new());
    lines
}

/// Build an in-memory zip archive
pub fn zip_bytes(entries: &[(&str, Vec<u8>)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    for (name, data) in entries {
        writer
            .start_file(*name, options)
            .unwrap_or_else(|e| panic!("Failed to start zip entry '{}': {}", name, e));
        writer.write_all(data).expect("Failed to write zip entry");
    }
    writer.finish().expect("Failed to finish zip").into_inner()
}

/// Potting container: one `Config-<label>.zip` per log, each holding `Potting.log`
pub fn potting_archive(logs: &[(&str, String)]) -> Vec<u8> {
    let nested: Vec<(String, Vec<u8>)> = logs
        .iter()
        .map(|(label, text)| {
            let inner = zip_bytes(&[("Potting.log", text.as_bytes().to_vec())]);
            (format!("Config-{}.zip", label), inner)
        })
        .collect();
    let entries: Vec<(&str, Vec<u8>)> = nested
        .iter()
        .map(|(name, bytes)| (name.as_str(), bytes.clone()))
        .collect();
    zip_bytes(&entries)
}

/// Write archive bytes to a file in a temporary directory
pub fn write_archive(dir: &tempfile::TempDir, name: &str, bytes: &[u8]) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, bytes)
        .unwrap_or_else(|e| panic!("Failed to write archive '{}': {}", path.display(), e));
    path
}
