use serde::{Deserialize, Serialize};

/// FAPI2 error-log severity as carried in byte 2 of FFDC header word 2.
///
/// Variants are declared in ascending order so the derived `Ord` matches the
/// wire encoding: a greater value is more severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum Severity {
    /// Used internally by the FFDC mechanism; never reported by a package.
    #[default]
    Undefined,
    /// Not seen by the customer.
    Recovered,
    /// Error recovered but the customer will see it.
    Predictive,
    Unrecoverable,
}

impl Severity {
    pub const fn raw(self) -> u8 {
        match self {
            Severity::Undefined => 0x00,
            Severity::Recovered => 0x10,
            Severity::Predictive => 0x20,
            Severity::Unrecoverable => 0x40,
        }
    }

    /// Decode a wire severity. Unknown values are treated as the worst case.
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            0x00 => Severity::Undefined,
            0x10 => Severity::Recovered,
            0x20 => Severity::Predictive,
            0x40 => Severity::Unrecoverable,
            other => {
                log::warn!("unknown FFDC severity 0x{other:02x}, treating as unrecoverable");
                Severity::Unrecoverable
            }
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Severity::Undefined => "undefined",
            Severity::Recovered => "recovered",
            Severity::Predictive => "predictive",
            Severity::Unrecoverable => "unrecoverable",
        };
        f.write_str(name)
    }
}
