//! Per-SLID aggregation of converted FFDC into error log entries.
//!
//! Each SLID group becomes one entry. Its user data and callouts are those of
//! the packages in buffer order, followed by the `SRC6` chip position pair.

use crate::convert::convert_ffdc;
use crate::decoder::HwpDecoder;
use crate::factory::SBE_BOOT_FAILURE;
use errl_ir::{
    CalloutRecord, ChipType, DiagnosticEntry, DiagnosticHandle, SRC6_KEY, Severity, TargetProvider,
    UserData,
};
use sbe_format::writer::encode_package;
use sbe_format::{FfdcMap, FfdcPackage};

/// FAPI2 "platform error, see attached data": the package carries platform
/// data, not procedure FFDC.
pub const FAPI2_RC_PLAT_ERR_SEE_DATA: u32 = 0x0200_0001;

/// How package severities combine into the entry severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeverityMerge {
    /// Keep the most severe package severity.
    #[default]
    Worst,
    /// Keep a package severity only when it is numerically lower than the
    /// running value. Starting from `Undefined` this never replaces it.
    Legacy,
}

/// Combine the running group severity with one package severity.
pub fn merge_severity(policy: SeverityMerge, running: Severity, candidate: Severity) -> Severity {
    let take = match policy {
        SeverityMerge::Worst => candidate > running,
        SeverityMerge::Legacy => candidate < running,
    };
    if take { candidate } else { running }
}

#[derive(Debug, Clone)]
pub struct AggregateOptions {
    /// Message id of every produced entry.
    pub message: String,
    /// Position of the chip that returned the FFDC; reported in `SRC6`.
    pub chip_position: u32,
    pub chip_type: ChipType,
    pub severity_merge: SeverityMerge,
    /// Attach the group's packages, in wire format, to each entry.
    pub attach_raw_ffdc: bool,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            message: SBE_BOOT_FAILURE.into(),
            chip_position: 0,
            chip_type: ChipType::Proc,
            severity_merge: SeverityMerge::Worst,
            attach_raw_ffdc: false,
        }
    }
}

/// Build one entry per SLID group, in map order.
pub fn aggregate(
    map: &FfdcMap,
    decoder: &dyn HwpDecoder,
    targets: &dyn TargetProvider,
    options: &AggregateOptions,
) -> DiagnosticHandle {
    let mut handle = DiagnosticHandle::new();
    for (log_id, packages) in map.iter() {
        log::info!("SLID {log_id}: {} FFDC packages", packages.len());
        handle.add_entry(aggregate_group(log_id, packages, decoder, targets, options));
    }
    handle
}

fn aggregate_group(
    log_id: u16,
    packages: &[FfdcPackage],
    decoder: &dyn HwpDecoder,
    targets: &dyn TargetProvider,
    options: &AggregateOptions,
) -> DiagnosticEntry {
    let mut severity = Severity::Undefined;
    let mut user_data = UserData::new();
    let mut callouts: Vec<CalloutRecord> = Vec::new();

    for package in packages {
        if package.return_code == FAPI2_RC_PLAT_ERR_SEE_DATA {
            log::debug!("SLID {log_id}: skipping see-data package {}", package.sequence_id);
            continue;
        }

        let ffdc = match decoder.decode(
            package.return_code,
            &package.data,
            options.chip_position,
            options.chip_type,
        ) {
            Ok(ffdc) => ffdc,
            Err(e) => {
                log::warn!("SLID {log_id}: skipping package {}: {e}", package.sequence_id);
                continue;
            }
        };

        let converted = match convert_ffdc(&ffdc, targets) {
            Ok(converted) => converted,
            Err(e) => {
                log::warn!("SLID {log_id}: skipping package {}: {e}", package.sequence_id);
                continue;
            }
        };

        user_data.extend(converted.user_data);
        callouts.extend(converted.callouts);
        severity = merge_severity(options.severity_merge, severity, package.severity);
    }

    user_data.push((SRC6_KEY.to_string(), (options.chip_position << 16).to_string()));

    let mut entry = DiagnosticEntry::new(options.message.as_str(), severity, user_data, callouts)
        .with_log_id(log_id);
    if options.attach_raw_ffdc {
        entry = entry.with_attachment(raw_packages(log_id, packages));
    }
    entry
}

fn raw_packages(log_id: u16, packages: &[FfdcPackage]) -> Vec<u8> {
    let mut raw = Vec::new();
    for package in packages {
        match encode_package(package) {
            Ok(bytes) => raw.extend(bytes),
            Err(e) => log::warn!(
                "SLID {log_id}: package {} not attached: {e}",
                package.sequence_id
            ),
        }
    }
    raw
}
