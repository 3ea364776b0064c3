use errl_ir::{ChipType, FfdcKind, HwpFfdc};
use std::fmt::Write;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("no FFDC definition for return code 0x{0:08x}")]
    UnknownReturnCode(u32),
    #[error("malformed FFDC data for return code 0x{return_code:08x}: {reason}")]
    Malformed { return_code: u32, reason: String },
}

/// Turns the raw data of one FFDC package into structured HWP FFDC.
///
/// Implemented by the hardware procedure library binding; closures with the
/// same signature implement it too.
pub trait HwpDecoder: Sync {
    fn decode(
        &self,
        return_code: u32,
        data: &[u8],
        chip_position: u32,
        chip_type: ChipType,
    ) -> Result<HwpFfdc, DecodeError>;
}

impl<F> HwpDecoder for F
where
    F: Fn(u32, &[u8], u32, ChipType) -> Result<HwpFfdc, DecodeError> + Sync,
{
    fn decode(
        &self,
        return_code: u32,
        data: &[u8],
        chip_position: u32,
        chip_type: ChipType,
    ) -> Result<HwpFfdc, DecodeError> {
        self(return_code, data, chip_position, chip_type)
    }
}

/// Decoder for systems without procedure FFDC definitions.
///
/// Every package becomes an `Unsupported` FFDC carrying the return code and
/// a hex dump of the package data, with no callouts.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawDataDecoder;

impl HwpDecoder for RawDataDecoder {
    fn decode(
        &self,
        return_code: u32,
        data: &[u8],
        chip_position: u32,
        chip_type: ChipType,
    ) -> Result<HwpFfdc, DecodeError> {
        let mut ffdc_data = vec![
            ("CHIP_POS".to_string(), chip_position.to_string()),
            ("CHIP_TYPE".to_string(), format!("{chip_type:?}").to_lowercase()),
        ];
        if !data.is_empty() {
            ffdc_data.push(("RAW_DATA".to_string(), hex_dump(data)));
        }

        Ok(HwpFfdc {
            kind: FfdcKind::Unsupported,
            message: format!("no FFDC definition for return code 0x{return_code:08x}"),
            rc: format!("0x{return_code:08X}"),
            rc_desc: "Unrecognized hardware procedure return code".to_string(),
            ffdc_data,
            ..Default::default()
        })
    }
}

/// Upper-case hex, one space between words.
fn hex_dump(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len() * 2 + data.len() / 4);
    for (i, byte) in data.iter().enumerate() {
        if i > 0 && i % 4 == 0 {
            out.push(' ');
        }
        let _ = write!(out, "{byte:02X}");
    }
    out
}
