use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::{AsRefStr, Display, EnumString};

use crate::error::ParseError;

/// Three-component coordinate, kept as the decimal text found in the log
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[String; 3]", into = "[String; 3]")]
pub struct Vec3d {
    pub x: String,
    pub y: String,
    pub z: String,
}

impl Vec3d {
    pub fn new(x: &str, y: &str, z: &str) -> Self {
        Self {
            x: x.to_string(),
            y: y.to_string(),
            z: z.to_string(),
        }
    }
}

impl From<[String; 3]> for Vec3d {
    fn from([x, y, z]: [String; 3]) -> Self {
        Self { x, y, z }
    }
}

impl From<Vec3d> for [String; 3] {
    fn from(v: Vec3d) -> Self {
        [v.x, v.y, v.z]
    }
}

/// Four-component orientation (quaternion-like), kept as decimal text
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[String; 4]", into = "[String; 4]")]
pub struct Orient3d {
    pub x: String,
    pub y: String,
    pub z: String,
    pub q: String,
}

impl Orient3d {
    pub fn new(x: &str, y: &str, z: &str, q: &str) -> Self {
        Self {
            x: x.to_string(),
            y: y.to_string(),
            z: z.to_string(),
            q: q.to_string(),
        }
    }
}

impl From<[String; 4]> for Orient3d {
    fn from([x, y, z, q]: [String; 4]) -> Self {
        Self { x, y, z, q }
    }
}

impl From<Orient3d> for [String; 4] {
    fn from(o: Orient3d) -> Self {
        [o.x, o.y, o.z, o.q]
    }
}

/// The two independently aligned sub-assemblies of a module
#[derive(AsRefStr, Clone, Copy, Debug, Display, EnumString, PartialEq, Eq)]
pub enum Surface {
    #[strum(serialize = "BBM")]
    Bbm,
    #[strum(serialize = "HDI")]
    Hdi,
}

/// A single fiducial measurement from the review section
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fiducial {
    pub name: String,
    pub source: String,
    pub img_pos: Vec3d,
    pub img_crd: Vec3d,
    pub fid_pos: Vec3d,
}

/// Center, orientation and rotation (degrees) of one surface
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SurfaceAlignment {
    pub center: Vec3d,
    pub orient: Orient3d,
    pub rotation: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Vec3d,
    pub end: Vec3d,
}

#[derive(AsRefStr, Clone, Copy, Debug, EnumString, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineState {
    Enabled,
    Disabled,
}

/// A pot line in global and chuck-local coordinates
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PotLine {
    pub global: Segment,
    pub local: Segment,
    pub state: LineState,
}

/// Values broadcast onto every module by the finish section
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FinishInfo {
    pub operator_name: Option<String>,
    pub sylgard_batch: Option<String>,
    pub pressure: Option<String>,
}

/// Fixture position of a module while it is being potted
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotKey {
    pub chuck: String,
    pub slot: String,
}

impl SlotKey {
    pub fn new(chuck: &str, slot: &str) -> Self {
        Self {
            chuck: chuck.to_string(),
            slot: slot.to_string(),
        }
    }
}

/// Timing fields shared by every module of one potting log
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TimingInfo {
    pub time_start: String,
    pub time_end: String,
    pub time_taken: u64,
    pub date: String,
}

/// Mutable module state while the extractors of one log run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModuleBuilder {
    pub module_id: String,
    pub key: SlotKey,
    pub bbm_fids: BTreeMap<String, Fiducial>,
    pub hdi_fids: BTreeMap<String, Fiducial>,
    pub bbm: Option<SurfaceAlignment>,
    pub hdi: Option<SurfaceAlignment>,
    pub pot_lines: BTreeMap<String, PotLine>,
    pub finish: FinishInfo,
}

impl ModuleBuilder {
    pub fn new(module_id: &str, key: SlotKey) -> Self {
        Self {
            module_id: module_id.to_string(),
            key,
            bbm_fids: BTreeMap::new(),
            hdi_fids: BTreeMap::new(),
            bbm: None,
            hdi: None,
            pot_lines: BTreeMap::new(),
            finish: FinishInfo::default(),
        }
    }

    pub fn fiducials_mut(&mut self, surface: Surface) -> &mut BTreeMap<String, Fiducial> {
        match surface {
            Surface::Bbm => &mut self.bbm_fids,
            Surface::Hdi => &mut self.hdi_fids,
        }
    }

    pub fn set_alignment(&mut self, surface: Surface, alignment: SurfaceAlignment) {
        match surface {
            Surface::Bbm => self.bbm = Some(alignment),
            Surface::Hdi => self.hdi = Some(alignment),
        }
    }

    /// Freeze the builder into an output record
    pub fn build(self, timing: &TimingInfo) -> PottingModule {
        let (bbm_center, bbm_orient, bbm_rotatn) = split_alignment(self.bbm);
        let (hdi_center, hdi_orient, hdi_rotatn) = split_alignment(self.hdi);

        PottingModule {
            module_id: self.module_id,
            record: PottingRecord {
                chuck: self.key.chuck,
                slot: self.key.slot,
                hdi_fids: self.hdi_fids,
                bbm_fids: self.bbm_fids,
                pot_lines: self.pot_lines,
                time_start: timing.time_start.clone(),
                time_end: timing.time_end.clone(),
                time_taken: timing.time_taken,
                date: timing.date.clone(),
                bbm_center,
                bbm_orient,
                bbm_rotatn,
                hdi_center,
                hdi_orient,
                hdi_rotatn,
                operator_name: self.finish.operator_name,
                sylgard_batch: self.finish.sylgard_batch,
                pressure: self.finish.pressure,
                time: None,
                source_file: None,
            },
        }
    }
}

fn split_alignment(
    alignment: Option<SurfaceAlignment>,
) -> (Option<Vec3d>, Option<Orient3d>, Option<String>) {
    match alignment {
        Some(a) => (Some(a.center), Some(a.orient), Some(a.rotation)),
        None => (None, None, None),
    }
}

/// Potting output for one module, without its serial id
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PottingRecord {
    pub chuck: String,
    pub slot: String,
    #[serde(rename = "HDI_fids")]
    pub hdi_fids: BTreeMap<String, Fiducial>,
    #[serde(rename = "BBM_fids")]
    pub bbm_fids: BTreeMap<String, Fiducial>,
    pub pot_lines: BTreeMap<String, PotLine>,
    pub time_start: String,
    pub time_end: String,
    pub time_taken: u64,
    pub date: String,
    #[serde(rename = "BBM_center", default, skip_serializing_if = "Option::is_none")]
    pub bbm_center: Option<Vec3d>,
    #[serde(rename = "BBM_orient", default, skip_serializing_if = "Option::is_none")]
    pub bbm_orient: Option<Orient3d>,
    #[serde(rename = "BBM_rotatn", default, skip_serializing_if = "Option::is_none")]
    pub bbm_rotatn: Option<String>,
    #[serde(rename = "HDI_center", default, skip_serializing_if = "Option::is_none")]
    pub hdi_center: Option<Vec3d>,
    #[serde(rename = "HDI_orient", default, skip_serializing_if = "Option::is_none")]
    pub hdi_orient: Option<Orient3d>,
    #[serde(rename = "HDI_rotatn", default, skip_serializing_if = "Option::is_none")]
    pub hdi_rotatn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sylgard_batch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure: Option<String>,
    /// Minutes attributed to this module (log duration / module count)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
}

/// A potting record together with the module serial id
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PottingModule {
    pub module_id: String,
    #[serde(flatten)]
    pub record: PottingRecord,
}

/// Gluing output for one module, without its module id
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GluingRecord {
    pub hdi_id: String,
    pub bbm_id: String,
    pub date: String,
    pub start_time: String,
    pub finish_time: String,
    pub operator: String,
    pub software_version: String,
    pub pressure: String,
    pub araldite_batch: String,
    pub chuck: String,
    pub slot: u8,
}

/// A gluing record and the module id resolved for its HDI, if any
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GluingModule {
    pub module_id: Option<String>,
    #[serde(flatten)]
    pub record: GluingRecord,
}

/// Per-module entry of the combined output document
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinedEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub potting: Option<PottingRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gluing: Option<GluingRecord>,
}

/// Combined output keyed by uppercased module id
pub type CombinedLog = BTreeMap<String, CombinedEntry>;

/// Trait for line-oriented log parsers
pub trait Parseable {
    type Output;

    fn parse<S: AsRef<str>>(&self, lines: &[S]) -> Result<Self::Output, ParseError>;
}
