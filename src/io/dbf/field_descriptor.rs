//! 32-byte field descriptors following the .dbf main header.
//!
//! ```text
//! Byte 0      Name, NUL padded (11)
//! Byte 11     Type (ASCII letter)
//! Byte 12     Reserved (4)
//! Byte 16     Length
//! Byte 17     Decimal count
//! Byte 18     Field flags
//! Byte 19     Reserved
//! Byte 20     Work area id
//! Byte 21     Reserved (2)
//! Byte 23     Set fields flag
//! Byte 24     Reserved (7)
//! Byte 31     Index field flag
//! ```

use std::fmt;
use std::io::{Read, Seek};

use bitflags::bitflags;

use super::data_type::DataType;
use super::header::{DbfHeader, FIELD_DESCRIPTOR_SIZE};
use crate::error::Result;
use crate::io::stream::expect_position;

/// Maximum length of a field name.
pub const FIELD_NAME_SIZE: usize = 11;

bitflags! {
    /// Column flags (byte 18), as written by FoxPro.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FieldFlags: u8 {
        /// Hidden system column
        const SYSTEM = 0x01;
        /// Column can store null
        const NULLABLE = 0x02;
        /// Binary column (no code page translation)
        const BINARY = 0x04;
        /// Auto incrementing column
        const AUTO_INCREMENT = 0x0c;
    }
}

/// Describes one column, e.g. `STREETNAME`, Character, 200 bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    pub data_type: DataType,
    /// Width of the field inside a record, in bytes.
    pub length: u8,
    /// Digits after the decimal point, for numeric types.
    pub decimal_count: u8,
    pub flags: FieldFlags,
    pub work_area_id: u8,
    pub set_fields_flag: u8,
    pub index_field_flag: u8,
}

impl FieldDescriptor {
    /// Decode one descriptor from its raw bytes.
    pub fn from_bytes(raw: &[u8; FIELD_DESCRIPTOR_SIZE]) -> Self {
        let name_bytes = &raw[..FIELD_NAME_SIZE];
        let name_end = name_bytes
            .iter()
            .rposition(|&b| b != 0)
            .map_or(0, |last| last + 1);

        Self {
            name: String::from_utf8_lossy(&name_bytes[..name_end]).into_owned(),
            data_type: DataType::from(raw[11]),
            length: raw[16],
            decimal_count: raw[17],
            flags: FieldFlags::from_bits_retain(raw[18]),
            work_area_id: raw[20],
            set_fields_flag: raw[23],
            index_field_flag: raw[31],
        }
    }

    /// Read the `header.field_count` descriptors that follow the main header.
    pub fn read_all<R: Read + Seek>(stream: &mut R, header: &DbfHeader) -> Result<Vec<Self>> {
        expect_position(
            stream,
            header.main_header_end(),
            "starting to read field descriptions",
        )?;

        let mut fields = Vec::with_capacity(header.field_count);
        let mut raw = [0u8; FIELD_DESCRIPTOR_SIZE];
        for _ in 0..header.field_count {
            stream.read_exact(&mut raw)?;
            fields.push(Self::from_bytes(&raw));
        }

        expect_position(
            stream,
            header.field_descriptors_end(),
            "after reading field descriptions",
        )?;

        Ok(fields)
    }
}

impl fmt::Display for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} len:{} deccount:{} waID:{}",
            self.name, self.data_type, self.length, self.decimal_count, self.work_area_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ShapefileError;
    use std::io::Cursor;

    fn raw_field(name: &[u8], data_type: u8, length: u8, decimals: u8) -> [u8; 32] {
        let mut raw = [0u8; 32];
        raw[..name.len()].copy_from_slice(name);
        raw[11] = data_type;
        raw[16] = length;
        raw[17] = decimals;
        raw
    }

    fn header_for(field_count: usize) -> DbfHeader {
        let mut raw = [0u8; 32];
        raw[0] = 0x03;
        raw[8..10].copy_from_slice(&((32 + 32 * field_count + 1) as u16).to_le_bytes());
        DbfHeader::from_bytes(&raw).unwrap()
    }

    #[test]
    fn test_from_bytes() {
        let mut raw = raw_field(b"STREETNAME", b'C', 200, 0);
        raw[18] = 0x02;
        raw[20] = 9;
        let field = FieldDescriptor::from_bytes(&raw);
        assert_eq!(field.name, "STREETNAME");
        assert_eq!(field.data_type, DataType::Character);
        assert_eq!(field.length, 200);
        assert_eq!(field.work_area_id, 9);
        assert!(field.flags.contains(FieldFlags::NULLABLE));
    }

    #[test]
    fn test_name_uses_all_eleven_bytes() {
        let field = FieldDescriptor::from_bytes(&raw_field(b"ABCDEFGHIJK", b'N', 10, 2));
        assert_eq!(field.name, "ABCDEFGHIJK");
        assert_eq!(field.decimal_count, 2);
    }

    #[test]
    fn test_read_all() {
        let header = header_for(2);
        let mut data = vec![0u8; 32];
        data.extend_from_slice(&raw_field(b"ID", b'N', 9, 0));
        data.extend_from_slice(&raw_field(b"NAME", b'C', 20, 0));
        let mut cursor = Cursor::new(data);
        cursor.set_position(32);

        let fields = FieldDescriptor::read_all(&mut cursor, &header).unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[1].name, "NAME");
        assert_eq!(cursor.position(), header.field_descriptors_end());
    }

    #[test]
    fn test_read_all_truncated() {
        let header = header_for(2);
        let mut data = vec![0u8; 32];
        data.extend_from_slice(&raw_field(b"ID", b'N', 9, 0));
        let mut cursor = Cursor::new(data);
        cursor.set_position(32);
        assert!(FieldDescriptor::read_all(&mut cursor, &header)
            .unwrap_err()
            .is_unexpected_eof());
    }

    #[test]
    fn test_read_all_header_length_not_on_descriptor_boundary() {
        let mut raw = [0u8; 32];
        raw[0] = 0x03;
        raw[8..10].copy_from_slice(&70u16.to_le_bytes());
        let header = DbfHeader::from_bytes(&raw).unwrap();
        assert_eq!(header.field_count, 1);

        let mut data = vec![0u8; 32];
        data.extend_from_slice(&raw_field(b"ID", b'N', 4, 0));
        data.extend_from_slice(&[0u8; 8]);
        let mut cursor = Cursor::new(data);
        cursor.set_position(32);
        match FieldDescriptor::read_all(&mut cursor, &header) {
            Err(ShapefileError::UnexpectedOffset {
                context,
                expected,
                actual,
            }) => {
                assert_eq!(context, "after reading field descriptions");
                assert_eq!(expected, 69);
                assert_eq!(actual, 64);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_display() {
        let field = FieldDescriptor::from_bytes(&raw_field(b"ID", b'N', 9, 0));
        assert_eq!(field.to_string(), "ID Numerical len:9 deccount:0 waID:0");
    }
}
