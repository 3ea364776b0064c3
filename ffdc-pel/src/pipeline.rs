use crate::aggregate::{AggregateOptions, aggregate};
use crate::decoder::HwpDecoder;
use errl_ir::{DiagnosticHandle, TargetProvider};
use sbe_format::{FfdcError, PrimaryStatus, SecondaryStatus, parse_response_with_ffdc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("malformed SBE response: {0}")]
    Response(#[from] FfdcError),
    #[error("no FFDC data found in SBE response")]
    NoFfdcData,
}

/// Result of processing one response buffer.
#[derive(Debug, Clone)]
pub struct ProcessedResponse {
    pub primary_status: PrimaryStatus,
    pub secondary_status: SecondaryStatus,
    pub value: Vec<u8>,
    pub handle: DiagnosticHandle,
}

/// Parse a chip-op response and turn its FFDC into error log entries.
///
/// Malformed framing or a malformed FFDC region fails the whole buffer.
/// Packages that cannot be decoded or converted are skipped.
pub fn process_sbe_ffdc(
    buf: &[u8],
    decoder: &dyn HwpDecoder,
    targets: &dyn TargetProvider,
    options: &AggregateOptions,
) -> Result<ProcessedResponse, ProcessError> {
    let (frame, map) = parse_response_with_ffdc(buf)?;
    log::debug!(
        "response status {:?}/{:?}, {} value bytes, {} FFDC packages",
        frame.primary_status,
        frame.secondary_status,
        frame.value.len(),
        map.package_count()
    );

    if map.is_empty() {
        log::error!("no FFDC data found in SBE response");
        return Err(ProcessError::NoFfdcData);
    }

    let handle = aggregate(&map, decoder, targets, options);
    Ok(ProcessedResponse {
        primary_status: frame.primary_status,
        secondary_status: frame.secondary_status,
        value: frame.value,
        handle,
    })
}
