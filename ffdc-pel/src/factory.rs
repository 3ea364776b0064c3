//! Error log factories for specific failure events.

use crate::aggregate::{AggregateOptions, SeverityMerge};
use crate::decoder::HwpDecoder;
use crate::pipeline::{ProcessError, process_sbe_ffdc};
use errl_ir::{
    ChipType, DiagnosticEntry, DiagnosticHandle, SRC6_KEY, Severity, TargetProvider,
};

pub const SBE_BOOT_FAILURE: &str = "org.open_power.Processor.Error.SbeBootFailure";
pub const NO_FUNCTIONAL_BOOT_PROC: &str = "org.open_power.PHAL.Error.NoFunctionalBootProc";

/// Chip the FFDC was collected from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChipInfo {
    /// Position index of the chip target.
    pub position: u32,
    pub chip_type: ChipType,
}

/// Error logs for an SBE that failed to boot, from the FFDC it returned.
pub fn sbe_boot_failure(
    chip: &ChipInfo,
    response: &[u8],
    decoder: &dyn HwpDecoder,
    targets: &dyn TargetProvider,
    severity_merge: SeverityMerge,
) -> Result<DiagnosticHandle, ProcessError> {
    let options = AggregateOptions {
        message: SBE_BOOT_FAILURE.into(),
        chip_position: chip.position,
        chip_type: chip.chip_type,
        severity_merge,
        attach_raw_ffdc: true,
    };

    let processed = process_sbe_ffdc(response, decoder, targets, &options).inspect_err(|e| {
        log::error!("SBE boot failure on chip {}: failed to process FFDC: {e}", chip.position);
    })?;
    Ok(processed.handle)
}

/// Error log for a system with no functional boot processor.
///
/// Informational: there is no FFDC or callout, only the position of the
/// processor that was expected to boot.
pub fn no_functional_target(chip: &ChipInfo) -> DiagnosticHandle {
    log::info!("no functional boot processor (expected chip {})", chip.position);
    let user_data = vec![(SRC6_KEY.to_string(), (chip.position << 16).to_string())];
    let mut handle = DiagnosticHandle::new();
    handle.add_entry(DiagnosticEntry::new(
        NO_FUNCTIONAL_BOOT_PROC,
        Severity::Recovered,
        user_data,
        Vec::new(),
    ));
    handle
}
