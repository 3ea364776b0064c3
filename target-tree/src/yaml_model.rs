//! Serde-deserializable types for the target tree YAML document.
//!
//! ```yaml
//! targets:
//!   - name: proc0
//!     phys_bin_path: "2301000200000000"
//!     location_code: "U78DA.ND0.WZS0001-P0-C15"
//!     children:
//!       - name: core0
//!         phys_bin_path: "2301000200070000"
//! ```

use serde::{Deserialize, Serialize};

/// Root document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TreeDocument {
    #[serde(default)]
    pub location_code: Option<String>,
    #[serde(default)]
    pub targets: Vec<YamlTarget>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YamlTarget {
    pub name: String,
    /// Physical binary path as a hex string.
    #[serde(default)]
    pub phys_bin_path: Option<String>,
    #[serde(default)]
    pub phys_dev_path: Option<String>,
    #[serde(default)]
    pub location_code: Option<String>,
    #[serde(default)]
    pub mru_id: Option<u32>,
    #[serde(default)]
    pub children: Vec<YamlTarget>,
}
