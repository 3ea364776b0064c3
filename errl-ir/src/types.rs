use sbe_format::Severity;
use serde::{Deserialize, Serialize};

/// Inventory path called out for planar (motherboard) hardware callouts.
pub const MOTHERBOARD_INVENTORY_PATH: &str =
    "/xyz/openbmc_project/inventory/system/chassis/motherboard";

/// Key of the positional marker appended last to every entry's user data.
pub const SRC6_KEY: &str = "SRC6";

// --- Callouts ---

/// PEL callout priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    H,
    M,
    L,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::H => "H",
            Priority::M => "M",
            Priority::L => "L",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed-location hardware callout (planar).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardwareCallout {
    #[serde(rename = "InventoryPath")]
    pub inventory_path: String,
    #[serde(rename = "Deconfigured")]
    pub deconfigured: bool,
    #[serde(rename = "Guarded")]
    pub guarded: bool,
    #[serde(rename = "Priority")]
    pub priority: Priority,
}

impl HardwareCallout {
    pub fn planar(priority: Priority) -> Self {
        Self {
            inventory_path: MOTHERBOARD_INVENTORY_PATH.to_string(),
            deconfigured: false,
            guarded: false,
            priority,
        }
    }
}

/// Maintenance replaceable unit attached to a target callout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mru {
    #[serde(rename = "ID")]
    pub id: u32,
    #[serde(rename = "Priority")]
    pub priority: Priority,
}

/// Callout / deconfigure / guard request against a target in the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetCallout {
    #[serde(rename = "Priority")]
    pub priority: Priority,
    #[serde(rename = "Deconfigured")]
    pub deconfigured: bool,
    #[serde(rename = "Guarded")]
    pub guarded: bool,
    #[serde(rename = "GuardType")]
    pub guard_type: String,
    /// Physical binary path of the target.
    #[serde(rename = "EntityPath")]
    pub entity_path: Vec<u8>,
    #[serde(rename = "MRUs", default, skip_serializing_if = "Vec::is_empty")]
    pub mrus: Vec<Mru>,
}

/// Maintenance procedure callout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcedureCallout {
    #[serde(rename = "Procedure")]
    pub procedure: String,
    #[serde(rename = "Priority")]
    pub priority: Priority,
}

/// One callout of a diagnostic entry.
///
/// Serialized untagged: the field set identifies the variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CalloutRecord {
    Hardware(HardwareCallout),
    Target(TargetCallout),
    Procedure(ProcedureCallout),
}

impl CalloutRecord {
    pub fn priority(&self) -> Priority {
        match self {
            CalloutRecord::Hardware(c) => c.priority,
            CalloutRecord::Target(c) => c.priority,
            CalloutRecord::Procedure(c) => c.priority,
        }
    }
}

// --- Entries ---

/// Ordered key/value user data. Keys may repeat.
pub type UserData = Vec<(String, String)>;

/// One error-log entry, built from one SLID group of FFDC packages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticEntry {
    message: String,
    severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    log_id: Option<u16>,
    user_data: UserData,
    callouts: Vec<CalloutRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    attachment: Option<Vec<u8>>,
}

impl DiagnosticEntry {
    pub fn new(
        message: impl Into<String>,
        severity: Severity,
        user_data: UserData,
        callouts: Vec<CalloutRecord>,
    ) -> Self {
        Self {
            message: message.into(),
            severity,
            log_id: None,
            user_data,
            callouts,
            attachment: None,
        }
    }

    pub fn with_log_id(mut self, log_id: u16) -> Self {
        self.log_id = Some(log_id);
        self
    }

    pub fn with_attachment(mut self, attachment: Vec<u8>) -> Self {
        self.attachment = Some(attachment);
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn log_id(&self) -> Option<u16> {
        self.log_id
    }

    pub fn user_data(&self) -> &[(String, String)] {
        &self.user_data
    }

    /// All values recorded under `key`, in order.
    pub fn user_data_values<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.user_data
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn callouts(&self) -> &[CalloutRecord] {
        &self.callouts
    }

    pub fn attachment(&self) -> Option<&[u8]> {
        self.attachment.as_deref()
    }
}

/// Ordered, append-only collection of entries produced for one response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiagnosticHandle {
    entries: Vec<DiagnosticEntry>,
}

impl DiagnosticHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_entry(&mut self, entry: DiagnosticEntry) {
        self.entries.push(entry);
    }

    pub fn has_entries(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[DiagnosticEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DiagnosticEntry> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a DiagnosticHandle {
    type Item = &'a DiagnosticEntry;
    type IntoIter = std::slice::Iter<'a, DiagnosticEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl IntoIterator for DiagnosticHandle {
    type Item = DiagnosticEntry;
    type IntoIter = std::vec::IntoIter<DiagnosticEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
