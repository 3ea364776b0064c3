use crate::ffdc::{FFDC_HEADER_LEN, FFDC_MAGIC, FfdcPackage};
use crate::frame::{MAGIC_HEADER, PrimaryStatus, SecondaryStatus};
use crate::WORD_SIZE;
use byteorder::{BigEndian, ByteOrder};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncodeError {
    #[error("FFDC data of {0} bytes is not a whole number of words")]
    UnalignedData(usize),
    #[error("FFDC package of {0} bytes exceeds the 16-bit word length field")]
    PackageTooLarge(usize),
}

/// Encode one FFDC package. The data must be word aligned.
pub fn encode_package(package: &FfdcPackage) -> Result<Vec<u8>, EncodeError> {
    let data_len = package.data.len();
    if data_len % WORD_SIZE != 0 {
        return Err(EncodeError::UnalignedData(data_len));
    }
    let size = FFDC_HEADER_LEN + data_len;
    let length_words =
        u16::try_from(size / WORD_SIZE).map_err(|_| EncodeError::PackageTooLarge(size))?;

    let mut header = [0u8; FFDC_HEADER_LEN];
    BigEndian::write_u16(&mut header[0..2], FFDC_MAGIC);
    BigEndian::write_u16(&mut header[2..4], length_words);
    BigEndian::write_u16(&mut header[4..6], package.sequence_id);
    header[6] = package.command_class;
    header[7] = package.command;
    BigEndian::write_u16(&mut header[8..10], package.log_id);
    header[10] = package.severity.raw();
    header[11] = package.chip_id;
    BigEndian::write_u32(&mut header[12..16], package.return_code);

    let mut out = Vec::with_capacity(size);
    out.extend_from_slice(&header);
    out.extend_from_slice(&package.data);
    Ok(out)
}

/// Builds a chip-op response buffer in SBE FIFO layout.
#[derive(Debug, Clone)]
pub struct ResponseBuilder {
    pub value: Vec<u8>,
    pub command_class: u8,
    pub command: u8,
    pub primary: PrimaryStatus,
    pub secondary: SecondaryStatus,
    pub packages: Vec<FfdcPackage>,
}

impl Default for ResponseBuilder {
    fn default() -> Self {
        Self {
            value: Vec::new(),
            command_class: 0xA8,
            command: 0x01,
            primary: PrimaryStatus::OperationSuccessful,
            secondary: SecondaryStatus::OperationSuccessful,
            packages: Vec::new(),
        }
    }
}

impl ResponseBuilder {
    pub fn build(&self) -> Result<Vec<u8>, EncodeError> {
        let mut ffdc = Vec::new();
        for package in &self.packages {
            ffdc.extend(encode_package(package)?);
        }
        Ok(self.assemble(&ffdc))
    }

    /// Assemble a buffer around an already encoded (possibly malformed)
    /// FFDC region.
    pub fn assemble(&self, ffdc: &[u8]) -> Vec<u8> {
        let mut out = self.value.clone();
        let header = MAGIC_HEADER | (u32::from(self.command_class) << 8) | u32::from(self.command);
        let status = (u32::from(self.primary.raw()) << 16) | u32::from(self.secondary.raw());
        out.extend_from_slice(&header.to_be_bytes());
        out.extend_from_slice(&status.to_be_bytes());
        out.extend_from_slice(ffdc);

        let distance = (2 * WORD_SIZE + ffdc.len()).div_ceil(WORD_SIZE) + 1;
        // Pad so the distance lands exactly on the header.
        let padded = (distance - 1) * WORD_SIZE - 2 * WORD_SIZE;
        out.resize(out.len() + padded - ffdc.len(), 0);
        out.extend_from_slice(&(distance as u32).to_be_bytes());
        out
    }
}
