//! The 32-byte .dbf main header.
//!
//! ```text
//! Byte 0      Version
//! Byte 1-3    Last update (YY since 1900, MM, DD)
//! Byte 4      Record count           u32 little
//! Byte 8      Header length          u16 little
//! Byte 10     Record length          u16 little
//! Byte 12     Reserved (2)
//! Byte 14     Incomplete transaction
//! Byte 15     Encryption flag
//! Byte 16     Free record thread (4)
//! Byte 20     Reserved (8)
//! Byte 28     MDX flag
//! Byte 29     Language driver
//! Byte 30     Reserved (2)
//! ```
//!
//! The header length covers the main header, every 32-byte field descriptor
//! and the one-byte terminator, so the field count is derived from it.

use std::fmt;
use std::io::{Read, Seek};

use byteorder::{ByteOrder, LittleEndian};
use chrono::NaiveDate;
use encoding_rs::Encoding;

use super::version::DbfVersion;
use crate::error::{Result, ShapefileError};
use crate::io::stream::expect_position;

/// Size of the main header on disk.
pub const DBF_HEADER_SIZE: usize = 32;

/// Size of each field descriptor on disk.
pub const FIELD_DESCRIPTOR_SIZE: usize = 32;

/// Byte closing the field descriptor block.
pub const FIELD_TERMINATOR: u8 = 0x0d;

/// Decoded .dbf main header.
#[derive(Debug, Clone, PartialEq)]
pub struct DbfHeader {
    pub version: DbfVersion,
    /// Raw `[year - 1900, month, day]` bytes.
    pub update_bytes: [u8; 3],
    /// Last update date, `None` when the bytes do not form a valid date.
    pub last_update: Option<NaiveDate>,
    pub record_count: u32,
    /// Header length in bytes, terminator included.
    pub header_length: u16,
    /// Bytes per record, delete flag included.
    pub record_size: u16,
    /// Number of field descriptors, derived from `header_length`.
    pub field_count: usize,
    pub incomplete_transaction: u8,
    pub encryption_flag: u8,
    pub mdx_flag: u8,
    pub language_driver: u8,
}

impl DbfHeader {
    /// Decode the header from its 32 raw bytes without validating the version.
    pub fn from_bytes(raw: &[u8; DBF_HEADER_SIZE]) -> Result<Self> {
        let header_length = LittleEndian::read_u16(&raw[8..10]);
        let field_count = (usize::from(header_length) / FIELD_DESCRIPTOR_SIZE)
            .checked_sub(1)
            .ok_or(ShapefileError::InvalidDbfHeaderLength {
                value: header_length,
            })?;

        let update_bytes = [raw[1], raw[2], raw[3]];
        let last_update = NaiveDate::from_ymd_opt(
            1900 + i32::from(raw[1]),
            u32::from(raw[2]),
            u32::from(raw[3]),
        );

        Ok(Self {
            version: DbfVersion::from(raw[0]),
            update_bytes,
            last_update,
            record_count: LittleEndian::read_u32(&raw[4..8]),
            header_length,
            record_size: LittleEndian::read_u16(&raw[10..12]),
            field_count,
            incomplete_transaction: raw[14],
            encryption_flag: raw[15],
            mdx_flag: raw[28],
            language_driver: raw[29],
        })
    }

    /// Read and validate the header. The stream must be at offset 0.
    pub fn read<R: Read + Seek>(stream: &mut R) -> Result<Self> {
        expect_position(stream, 0, "before reading main header")?;

        let mut raw = [0u8; DBF_HEADER_SIZE];
        stream.read_exact(&mut raw)?;

        expect_position(stream, DBF_HEADER_SIZE as u64, "after reading main header")?;

        let header = Self::from_bytes(&raw)?;
        if !header.version.is_supported() {
            return Err(ShapefileError::NotSupportedVersion(header.version));
        }

        Ok(header)
    }

    /// Offset where the field descriptors start.
    pub fn main_header_end(&self) -> u64 {
        DBF_HEADER_SIZE as u64
    }

    /// Offset right after the last field descriptor.
    pub fn field_descriptors_end(&self) -> u64 {
        u64::from(self.header_length) - 1
    }

    /// Offset right after the terminator, where records start.
    pub fn terminator_end(&self) -> u64 {
        u64::from(self.header_length)
    }

    /// Text encoding named by the language driver byte, for the code pages
    /// `encoding_rs` knows.
    pub fn encoding(&self) -> Option<&'static Encoding> {
        encoding_for_language_driver(self.language_driver)
    }
}

impl fmt::Display for DbfHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [y, m, d] = self.update_bytes;
        write!(
            f,
            "ver:{} updated: {}-{}-{} records:{} hdrsize:{} recsize:{}",
            self.version,
            1900 + u32::from(y),
            m,
            d,
            self.record_count,
            self.header_length,
            self.record_size
        )
    }
}

/// Map a dBase language driver id to an encoding.
pub fn encoding_for_language_driver(id: u8) -> Option<&'static Encoding> {
    let encoding = match id {
        0x03 | 0x57 | 0x58 | 0x59 => encoding_rs::WINDOWS_1252,
        0x04 => encoding_rs::MACINTOSH,
        0x13 | 0x7b => encoding_rs::SHIFT_JIS,
        0x26 | 0x65 => encoding_rs::IBM866,
        0x4d | 0x7a => encoding_rs::GBK,
        0x4e | 0x79 => encoding_rs::EUC_KR,
        0x4f | 0x78 => encoding_rs::BIG5,
        0x50 | 0x7c => encoding_rs::WINDOWS_874,
        0x7d => encoding_rs::WINDOWS_1255,
        0x7e => encoding_rs::WINDOWS_1256,
        0x96 => encoding_rs::X_MAC_CYRILLIC,
        0xc8 => encoding_rs::WINDOWS_1250,
        0xc9 => encoding_rs::WINDOWS_1251,
        0xca => encoding_rs::WINDOWS_1254,
        0xcb => encoding_rs::WINDOWS_1253,
        0xcc => encoding_rs::WINDOWS_1257,
        _ => return None,
    };
    Some(encoding)
}

/// Read the byte closing the field descriptor block.
pub fn read_terminator<R: Read + Seek>(stream: &mut R, header: &DbfHeader) -> Result<()> {
    expect_position(
        stream,
        header.field_descriptors_end(),
        "starting to read terminator character",
    )?;

    let mut terminator = [0u8; 1];
    stream.read_exact(&mut terminator)?;
    if terminator[0] != FIELD_TERMINATOR {
        return Err(ShapefileError::InvalidTerminator {
            value: terminator[0],
        });
    }

    expect_position(stream, header.terminator_end(), "after terminator character")
}
