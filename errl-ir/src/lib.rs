pub mod hwp;
pub mod target;
pub mod types;
pub mod validate;

pub use hwp::*;
pub use target::{EmptyTargets, TargetHandle, TargetProvider};
pub use types::*;
pub use validate::{validate_entry, validate_handle};

pub use sbe_format::Severity;
