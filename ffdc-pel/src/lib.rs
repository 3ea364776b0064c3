//! SBE FFDC to PEL-style error log conversion.
//!
//! [`process_sbe_ffdc`] runs the whole pipeline on one response buffer:
//! framing and package parsing (`sbe-format`), per-package HWP decoding
//! ([`HwpDecoder`]), conversion to user data and callouts ([`convert`]) and
//! per-SLID aggregation ([`aggregate`]).

pub mod aggregate;
pub mod attachment;
pub mod convert;
pub mod decoder;
pub mod factory;
pub mod pipeline;

pub use aggregate::{AggregateOptions, SeverityMerge, aggregate, merge_severity};
pub use attachment::{FfdcFile, FfdcFileList};
pub use convert::{ConvertError, ConvertedFfdc, convert_ffdc, normalize_priority};
pub use decoder::{DecodeError, HwpDecoder, RawDataDecoder};
pub use factory::{ChipInfo, no_functional_target, sbe_boot_failure};
pub use pipeline::{ProcessError, ProcessedResponse, process_sbe_ffdc};
