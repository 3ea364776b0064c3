//! FFDC package region of an SBE response.
//!
//! ```text
//!           Byte 0 | Byte 1     | Byte 2         | Byte 3
//! Word 0:   magic 0xFBAD        | length in words (header included)
//! Word 1:   sequence id         | command class  | command
//! Word 2:   SLID                | severity       | chip id
//! Word 3:   return code
//! Word 4..: procedure specific FFDC data
//! ```

use crate::frame::{FrameError, ResponseFrame, parse_response};
use crate::{Severity, WORD_SIZE};
use byteorder::{BigEndian, ByteOrder};
use std::ops::Range;
use thiserror::Error;

pub const FFDC_MAGIC: u16 = 0xFBAD;

/// Fixed package header size in words.
pub const FFDC_HEADER_WORDS: u16 = 4;
pub const FFDC_HEADER_LEN: usize = FFDC_HEADER_WORDS as usize * WORD_SIZE;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FfdcError {
    #[error("invalid FFDC package magic 0x{magic:04x} at offset {offset}")]
    InvalidPackageMagic { offset: usize, magic: u16 },
    #[error("FFDC package at offset {offset} declares {length_words} words, less than the header")]
    PackageTooShort { offset: usize, length_words: u16 },
    #[error("FFDC package at offset {offset} ({size} bytes) overruns region end {end}")]
    PackageOverrunsBuffer { offset: usize, size: usize, end: usize },
    #[error("FFDC region {start}..{end} lies outside the {len} byte buffer")]
    RegionOutOfBounds { start: usize, end: usize, len: usize },
    #[error(transparent)]
    Frame(#[from] FrameError),
}

/// One FFDC package as found on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FfdcPackage {
    pub log_id: u16,
    pub sequence_id: u16,
    pub command_class: u8,
    pub command: u8,
    pub severity: Severity,
    pub chip_id: u8,
    pub return_code: u32,
    pub data: Vec<u8>,
}

/// Packages grouped by SLID.
///
/// Groups keep the order in which their SLID first appeared in the buffer;
/// packages inside a group keep buffer order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FfdcMap {
    groups: Vec<(u16, Vec<FfdcPackage>)>,
}

impl FfdcMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, package: FfdcPackage) {
        match self.groups.iter_mut().find(|(id, _)| *id == package.log_id) {
            Some((_, packages)) => packages.push(package),
            None => self.groups.push((package.log_id, vec![package])),
        }
    }

    pub fn get(&self, log_id: u16) -> Option<&[FfdcPackage]> {
        self.groups
            .iter()
            .find(|(id, _)| *id == log_id)
            .map(|(_, packages)| packages.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (u16, &[FfdcPackage])> {
        self.groups.iter().map(|(id, packages)| (*id, packages.as_slice()))
    }

    pub fn log_ids(&self) -> impl Iterator<Item = u16> + '_ {
        self.groups.iter().map(|(id, _)| *id)
    }

    /// Number of SLID groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn package_count(&self) -> usize {
        self.groups.iter().map(|(_, packages)| packages.len()).sum()
    }
}

fn decode_package(buf: &[u8], offset: usize, end: usize) -> Result<FfdcPackage, FfdcError> {
    let header = &buf[offset..offset + FFDC_HEADER_LEN];

    let magic = BigEndian::read_u16(&header[0..2]);
    if magic != FFDC_MAGIC {
        log::error!("invalid FFDC magic 0x{magic:04x} at offset {offset}");
        return Err(FfdcError::InvalidPackageMagic { offset, magic });
    }

    let length_words = BigEndian::read_u16(&header[2..4]);
    if length_words < FFDC_HEADER_WORDS {
        log::error!("invalid FFDC length {length_words} at offset {offset}");
        return Err(FfdcError::PackageTooShort { offset, length_words });
    }

    let size = length_words as usize * WORD_SIZE;
    if offset + size > end {
        log::error!("FFDC package overruns buffer: offset={offset}, size={size}, end={end}");
        return Err(FfdcError::PackageOverrunsBuffer { offset, size, end });
    }

    Ok(FfdcPackage {
        sequence_id: BigEndian::read_u16(&header[4..6]),
        command_class: header[6],
        command: header[7],
        log_id: BigEndian::read_u16(&header[8..10]),
        severity: Severity::from_raw(header[10]),
        chip_id: header[11],
        return_code: BigEndian::read_u32(&header[12..16]),
        data: buf[offset + FFDC_HEADER_LEN..offset + size].to_vec(),
    })
}

/// Decode every FFDC package in `region` of `buf`.
///
/// Bytes left over at the end of the region that cannot hold another header
/// are ignored. A malformed package fails the whole region: later offsets
/// depend on it, so nothing already decoded is returned.
pub fn parse_ffdc_packages(buf: &[u8], region: Range<usize>) -> Result<FfdcMap, FfdcError> {
    let Range { start, end } = region;
    if start > end || end > buf.len() {
        return Err(FfdcError::RegionOutOfBounds {
            start,
            end,
            len: buf.len(),
        });
    }

    let mut map = FfdcMap::new();
    let mut offset = start;
    while offset + FFDC_HEADER_LEN <= end {
        let package = decode_package(buf, offset, end)?;
        let size = package.data.len() + FFDC_HEADER_LEN;
        log::debug!(
            "FFDC package at {offset}: slid={} rc=0x{:08x} severity={} {} bytes",
            package.log_id,
            package.return_code,
            package.severity,
            size
        );
        map.insert(package);
        offset += size;
    }

    if offset < end {
        log::debug!("ignoring {} trailing bytes in FFDC region", end - offset);
    }

    Ok(map)
}

/// Decode a response frame and the FFDC packages it carries.
pub fn parse_response_with_ffdc(buf: &[u8]) -> Result<(ResponseFrame, FfdcMap), FfdcError> {
    let frame = parse_response(buf, true)?;
    let map = match &frame.ffdc_region {
        Some(region) => parse_ffdc_packages(buf, region.clone()).inspect_err(|e| {
            log::error!("response carries malformed FFDC: {e}");
        })?,
        None => FfdcMap::new(),
    };
    Ok((frame, map))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn package(log_id: u16, return_code: u32) -> FfdcPackage {
        FfdcPackage {
            log_id,
            sequence_id: 1,
            command_class: 0xA8,
            command: 0x01,
            severity: Severity::Recovered,
            chip_id: 0,
            return_code,
            data: vec![],
        }
    }

    #[test]
    fn test_map_keeps_first_appearance_order() {
        let mut map = FfdcMap::new();
        map.insert(package(9, 1));
        map.insert(package(2, 2));
        map.insert(package(9, 3));

        let ids: Vec<u16> = map.log_ids().collect();
        assert_eq!(ids, vec![9, 2]);
        assert_eq!(map.len(), 2);
        assert_eq!(map.package_count(), 3);
        let rcs: Vec<u32> = map.get(9).unwrap().iter().map(|p| p.return_code).collect();
        assert_eq!(rcs, vec![1, 3]);
        assert!(map.get(4).is_none());
    }

    #[test]
    fn test_region_out_of_bounds() {
        let buf = [0u8; 8];
        assert_eq!(
            parse_ffdc_packages(&buf, 4..12),
            Err(FfdcError::RegionOutOfBounds {
                start: 4,
                end: 12,
                len: 8
            })
        );
    }

    #[test]
    fn test_short_tail_is_not_an_error() {
        let buf = [0xFFu8; 15];
        let map = parse_ffdc_packages(&buf, 0..15).unwrap();
        assert!(map.is_empty());
    }
}
