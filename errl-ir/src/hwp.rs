//! Hardware procedure FFDC as produced by an HWP decoder.
//!
//! Priorities are kept as the procedure reports them ("HIGH", "MEDIUM",
//! ...); normalizing them to PEL priorities is the converter's job.

use serde::{Deserialize, Serialize};

/// Kind of FFDC the decoder recognized in a package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FfdcKind {
    #[default]
    None,
    /// Not a known procedure FFDC, but the error info fields are populated.
    Unsupported,
    Hwp,
    SpareClockInfo,
}

/// Chip type passed through to the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChipType {
    #[default]
    Proc,
    Ocmb,
}

impl std::str::FromStr for ChipType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "proc" => Ok(ChipType::Proc),
            "ocmb" => Ok(ChipType::Ocmb),
            other => Err(format!("unknown chip type: {other}. Use proc or ocmb")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HwCalloutInfo {
    pub hw_id: String,
    pub priority: String,
    /// Physical binary path of the target the part belongs to.
    pub target_entity_path: Vec<u8>,
    pub clock_position: u32,
    pub is_planar: bool,
}

/// Callout / deconfigure / guard request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CdgTargetInfo {
    pub target_entity_path: Vec<u8>,
    pub callout: bool,
    pub priority: String,
    pub deconfigure: bool,
    pub guard: bool,
    pub guard_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProcedureCalloutInfo {
    pub procedure: String,
    pub priority: String,
}

/// Decoded FFDC of one package.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HwpFfdc {
    pub kind: FfdcKind,
    pub message: String,
    pub rc: String,
    pub rc_desc: String,
    pub ffdc_data: Vec<(String, String)>,
    pub hw_callouts: Vec<HwCalloutInfo>,
    pub cdg_targets: Vec<CdgTargetInfo>,
    pub procedure_callouts: Vec<ProcedureCalloutInfo>,
}
