//! HWP FFDC -> PEL user data and callouts.
//!
//! User data keys follow the PEL conventions of the BMC error log:
//! `HWP_RC`, `HWP_RC_DESC`, `HWP_FFDC_<key>`, and per-callout prefixes
//! `HWP_HW_CO_<nn>_`, `HWP_CDG_TGT_<nn>_`, `HWP_PROC_CO_<nn>_` numbered
//! from 01.

use errl_ir::{
    CalloutRecord, CdgTargetInfo, FfdcKind, HardwareCallout, HwCalloutInfo, HwpFfdc, Mru,
    Priority, ProcedureCallout, ProcedureCalloutInfo, TargetCallout, TargetHandle, TargetProvider,
    UserData,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("unsupported FFDC kind {kind:?} for PEL conversion: {message}")]
    UnsupportedPayloadKind { kind: FfdcKind, message: String },
}

/// User data and callouts contributed by one package.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConvertedFfdc {
    pub user_data: UserData,
    pub callouts: Vec<CalloutRecord>,
}

impl ConvertedFfdc {
    fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.user_data.push((key.into(), value.into()));
    }
}

/// Map an HWP priority to a PEL priority. Unknown values are called out
/// at high priority.
pub fn normalize_priority(hwp_priority: &str) -> Priority {
    match hwp_priority {
        "HIGH" => Priority::H,
        "MEDIUM" => Priority::M,
        "LOW" | "NONE" => Priority::L,
        other => {
            log::warn!("unsupported HWP priority '{other}', using high priority");
            Priority::H
        }
    }
}

fn flag(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

/// Convert one decoded FFDC into user data and callouts.
///
/// Callouts whose target cannot be found in the tree are logged and left out;
/// missing location codes and device paths only drop the matching fields.
pub fn convert_ffdc(
    ffdc: &HwpFfdc,
    targets: &dyn TargetProvider,
) -> Result<ConvertedFfdc, ConvertError> {
    if !matches!(ffdc.kind, FfdcKind::None | FfdcKind::Unsupported) {
        log::error!("unsupported FFDC kind {:?} for PEL conversion: {}", ffdc.kind, ffdc.message);
        return Err(ConvertError::UnsupportedPayloadKind {
            kind: ffdc.kind,
            message: ffdc.message.clone(),
        });
    }

    let mut out = ConvertedFfdc::default();
    out.push("HWP_RC", ffdc.rc.as_str());
    out.push("HWP_RC_DESC", ffdc.rc_desc.as_str());

    for (key, value) in &ffdc.ffdc_data {
        out.push(format!("HWP_FFDC_{key}"), value.as_str());
    }

    for (i, callout) in ffdc.hw_callouts.iter().enumerate() {
        add_hw_callout(&mut out, &format!("HWP_HW_CO_{:02}_", i + 1), callout, targets);
    }

    for (i, cdg) in ffdc.cdg_targets.iter().enumerate() {
        add_cdg_target(&mut out, &format!("HWP_CDG_TGT_{:02}_", i + 1), cdg, targets);
    }

    for (i, proc) in ffdc.procedure_callouts.iter().enumerate() {
        add_procedure_callout(&mut out, &format!("HWP_PROC_CO_{:02}_", i + 1), proc);
    }

    Ok(out)
}

fn resolve(targets: &dyn TargetProvider, path: &[u8], prefix: &str) -> Option<TargetHandle> {
    let found = targets.find_by_physical_path(targets.root(), path);
    if found.is_none() {
        log::warn!("{prefix}: no target with entity path {path:02x?}");
    }
    found
}

/// LOC_CODE and PHYS_PATH of a resolved target, each only when known.
fn add_target_location(
    out: &mut ConvertedFfdc,
    prefix: &str,
    target: TargetHandle,
    targets: &dyn TargetProvider,
) {
    match targets.location_code(target) {
        Some(code) => out.push(format!("{prefix}LOC_CODE"), code),
        None => log::warn!("{prefix}: location code not found"),
    }
    if let Some(path) = targets.physical_device_path(target) {
        out.push(format!("{prefix}PHYS_PATH"), path);
    }
}

fn add_hw_callout(
    out: &mut ConvertedFfdc,
    prefix: &str,
    callout: &HwCalloutInfo,
    targets: &dyn TargetProvider,
) {
    out.push(format!("{prefix}HW_ID"), callout.hw_id.as_str());
    out.push(format!("{prefix}PRIORITY"), callout.priority.as_str());

    let Some(target) = resolve(targets, &callout.target_entity_path, prefix) else {
        return;
    };
    add_target_location(out, prefix, target, targets);

    out.push(format!("{prefix}CLK_POS"), callout.clock_position.to_string());
    out.push(format!("{prefix}CALLOUT_PLANAR"), flag(callout.is_planar));

    // The planar has a fixed inventory path; the resolved target only
    // contributes user data.
    if callout.is_planar {
        out.callouts.push(CalloutRecord::Hardware(HardwareCallout::planar(
            normalize_priority(&callout.priority),
        )));
    }
}

fn add_cdg_target(
    out: &mut ConvertedFfdc,
    prefix: &str,
    cdg: &CdgTargetInfo,
    targets: &dyn TargetProvider,
) {
    let Some(target) = resolve(targets, &cdg.target_entity_path, prefix) else {
        return;
    };
    add_target_location(out, prefix, target, targets);

    out.push(format!("{prefix}CO_REQ"), flag(cdg.callout));
    out.push(format!("{prefix}CO_PRIORITY"), cdg.priority.as_str());
    out.push(format!("{prefix}DECONF_REQ"), flag(cdg.deconfigure));
    out.push(format!("{prefix}GUARD_REQ"), flag(cdg.guard));
    out.push(format!("{prefix}GUARD_TYPE"), cdg.guard_type.as_str());

    let priority = normalize_priority(&cdg.priority);
    let mrus = targets
        .mru_id(target)
        .map(|id| vec![Mru { id, priority }])
        .unwrap_or_default();

    out.callouts.push(CalloutRecord::Target(TargetCallout {
        priority,
        deconfigured: cdg.deconfigure,
        guarded: cdg.guard,
        guard_type: cdg.guard_type.clone(),
        entity_path: cdg.target_entity_path.clone(),
        mrus,
    }));
}

fn add_procedure_callout(out: &mut ConvertedFfdc, prefix: &str, proc: &ProcedureCalloutInfo) {
    out.push(format!("{prefix}PRIORITY"), proc.priority.as_str());
    out.push(format!("{prefix}MAINT_PROCEDURE"), proc.procedure.as_str());
    out.callouts.push(CalloutRecord::Procedure(ProcedureCallout {
        procedure: proc.procedure.clone(),
        priority: normalize_priority(&proc.priority),
    }));
}
