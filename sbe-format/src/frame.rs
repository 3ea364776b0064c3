//! Outer framing of an SBE FIFO response.
//!
//! ```text
//! | value ... | header word | status word | FFDC packages ... | distance |
//!             ^ header_offset                                  ^ L - 4
//! ```
//!
//! The trailing word holds the distance, in words, from the header to the
//! end of the buffer (the trailing word itself included).

use crate::WORD_SIZE;
use byteorder::{BigEndian, ByteOrder};
use std::ops::Range;
use thiserror::Error;

/// Header word, top 16 bits: 0xC0DE. The low half carries class and command.
pub const MAGIC_HEADER: u32 = 0xC0DE_0000;
pub const MAGIC_MASK: u32 = 0xFFFF_0000;

/// Header word + status word + trailing distance word.
pub const MIN_RESPONSE_LEN: usize = 3 * WORD_SIZE;

/// Header word + status word.
const HEADER_LEN: usize = 2 * WORD_SIZE;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    #[error("response buffer too small: {len} bytes (minimum {MIN_RESPONSE_LEN})")]
    BufferTooSmall { len: usize },
    #[error("invalid header offset: distance of {distance_words} words in a {len} byte buffer")]
    InvalidHeaderOffset { distance_words: u32, len: usize },
    #[error("invalid response magic header 0x{header:08x}")]
    InvalidMagic { header: u32 },
}

/// Primary response code (status word bits 31..16).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryStatus {
    OperationSuccessful,
    InvalidCommand,
    InvalidData,
    UserError,
    InternalError,
    UnsecureAccessDenied,
    GenericExecutionFailure,
    Other(u16),
}

impl PrimaryStatus {
    pub fn from_raw(raw: u16) -> Self {
        match raw {
            0x00 => Self::OperationSuccessful,
            0x01 => Self::InvalidCommand,
            0x02 => Self::InvalidData,
            0x03 => Self::UserError,
            0x04 => Self::InternalError,
            0x05 => Self::UnsecureAccessDenied,
            0xFE => Self::GenericExecutionFailure,
            other => Self::Other(other),
        }
    }

    pub fn raw(self) -> u16 {
        match self {
            Self::OperationSuccessful => 0x00,
            Self::InvalidCommand => 0x01,
            Self::InvalidData => 0x02,
            Self::UserError => 0x03,
            Self::InternalError => 0x04,
            Self::UnsecureAccessDenied => 0x05,
            Self::GenericExecutionFailure => 0xFE,
            Self::Other(raw) => raw,
        }
    }
}

/// Secondary response code (status word bits 15..0).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecondaryStatus {
    OperationSuccessful,
    CommandClassNotSupported,
    CommandNotSupported,
    InvalidAddressPassed,
    InvalidTargetTypePassed,
    InvalidChipletIdPassed,
    SpecifiedTargetNotPresent,
    SpecifiedTargetNotFunctional,
    CommandNotAllowedInThisState,
    FunctionalityNotSupported,
    GenericFailureInExecution,
    Other(u16),
}

impl SecondaryStatus {
    pub fn from_raw(raw: u16) -> Self {
        match raw {
            0x00 => Self::OperationSuccessful,
            0x01 => Self::CommandClassNotSupported,
            0x02 => Self::CommandNotSupported,
            0x03 => Self::InvalidAddressPassed,
            0x04 => Self::InvalidTargetTypePassed,
            0x05 => Self::InvalidChipletIdPassed,
            0x06 => Self::SpecifiedTargetNotPresent,
            0x07 => Self::SpecifiedTargetNotFunctional,
            0x08 => Self::CommandNotAllowedInThisState,
            0x09 => Self::FunctionalityNotSupported,
            0x0A => Self::GenericFailureInExecution,
            other => Self::Other(other),
        }
    }

    pub fn raw(self) -> u16 {
        match self {
            Self::OperationSuccessful => 0x00,
            Self::CommandClassNotSupported => 0x01,
            Self::CommandNotSupported => 0x02,
            Self::InvalidAddressPassed => 0x03,
            Self::InvalidTargetTypePassed => 0x04,
            Self::InvalidChipletIdPassed => 0x05,
            Self::SpecifiedTargetNotPresent => 0x06,
            Self::SpecifiedTargetNotFunctional => 0x07,
            Self::CommandNotAllowedInThisState => 0x08,
            Self::FunctionalityNotSupported => 0x09,
            Self::GenericFailureInExecution => 0x0A,
            Self::Other(raw) => raw,
        }
    }
}

/// Decoded response framing. `ffdc_region` indexes into the buffer the frame
/// was parsed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseFrame {
    pub value: Vec<u8>,
    pub primary_status: PrimaryStatus,
    pub secondary_status: SecondaryStatus,
    pub header_offset: usize,
    pub ffdc_region: Option<Range<usize>>,
}

impl ResponseFrame {
    pub fn is_success(&self) -> bool {
        self.primary_status == PrimaryStatus::OperationSuccessful
            && self.secondary_status == SecondaryStatus::OperationSuccessful
    }
}

/// Split a status word into its primary and secondary halves.
pub fn split_status(status: u32) -> (PrimaryStatus, SecondaryStatus) {
    let primary = (status >> 16) as u16;
    let secondary = (status & 0xFFFF) as u16;
    (PrimaryStatus::from_raw(primary), SecondaryStatus::from_raw(secondary))
}

/// Decode the framing of a response buffer.
///
/// When `want_ffdc` is set and bytes follow the status word, the returned
/// frame carries the FFDC region `[header + 8, len - 4)`.
pub fn parse_response(buf: &[u8], want_ffdc: bool) -> Result<ResponseFrame, FrameError> {
    let len = buf.len();
    if len < MIN_RESPONSE_LEN {
        log::error!("response buffer too small: {len}");
        return Err(FrameError::BufferTooSmall { len });
    }

    let distance_words = BigEndian::read_u32(&buf[len - WORD_SIZE..]);
    let header_offset = (distance_words as usize)
        .checked_mul(WORD_SIZE)
        .and_then(|distance| len.checked_sub(distance))
        .filter(|offset| offset + HEADER_LEN <= len)
        .ok_or_else(|| {
            log::error!(
                "invalid header offset: distance {distance_words} words, buffer {len} bytes"
            );
            FrameError::InvalidHeaderOffset { distance_words, len }
        })?;

    let header = BigEndian::read_u32(&buf[header_offset..]);
    if header & MAGIC_MASK != MAGIC_HEADER {
        log::error!("invalid magic header 0x{header:08x}");
        return Err(FrameError::InvalidMagic { header });
    }

    let status = BigEndian::read_u32(&buf[header_offset + WORD_SIZE..]);
    let (primary_status, secondary_status) = split_status(status);

    let ffdc_start = header_offset + HEADER_LEN;
    let ffdc_region = (want_ffdc && ffdc_start < len).then(|| ffdc_start..len - WORD_SIZE);

    Ok(ResponseFrame {
        value: buf[..header_offset].to_vec(),
        primary_status,
        secondary_status,
        header_offset,
        ffdc_region,
    })
}
