//! Property-based tests for the fixed-size blocks of the three file kinds.

mod common;

use std::io::Cursor;

use byteorder::{BigEndian, LittleEndian, WriteBytesExt};
use proptest::prelude::*;
use shapefile_tools::io::common::FileHeader;
use shapefile_tools::io::dbf::{DbfHeader, FieldDescriptor};
use shapefile_tools::{IndexEntry, IndexReader, ShapeType, ShapefileError};

fn encode_file_header(header: &FileHeader) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.write_u32::<BigEndian>(9994).unwrap();
    for _ in 0..5 {
        bytes.write_u32::<BigEndian>(0).unwrap();
    }
    bytes.write_u32::<BigEndian>(header.file_length).unwrap();
    bytes.write_u32::<LittleEndian>(header.version).unwrap();
    bytes.write_i32::<LittleEndian>(header.shape_type.code()).unwrap();
    let b = &header.bounds;
    for v in [
        b.xy.min_x, b.xy.min_y, b.xy.max_x, b.xy.max_y, b.z.min, b.z.max, b.m.min, b.m.max,
    ] {
        bytes.write_f64::<LittleEndian>(v).unwrap();
    }
    bytes
}

fn encode_dbf_header(header: &DbfHeader) -> Vec<u8> {
    let mut bytes = vec![header.version.byte()];
    bytes.extend_from_slice(&header.update_bytes);
    bytes.write_u32::<LittleEndian>(header.record_count).unwrap();
    bytes.write_u16::<LittleEndian>(header.header_length).unwrap();
    bytes.write_u16::<LittleEndian>(header.record_size).unwrap();
    bytes.extend_from_slice(&[0, 0]);
    bytes.push(header.incomplete_transaction);
    bytes.push(header.encryption_flag);
    bytes.extend_from_slice(&[0; 12]);
    bytes.push(header.mdx_flag);
    bytes.push(header.language_driver);
    bytes.extend_from_slice(&[0, 0]);
    bytes
}

fn arb_shape_type() -> impl Strategy<Value = ShapeType> {
    prop::sample::select(ShapeType::ALL.to_vec())
}

fn arb_double() -> impl Strategy<Value = f64> {
    prop::num::f64::NORMAL | prop::num::f64::ZERO
}

proptest! {
    #[test]
    fn file_header_round_trip(
        length in 1u32..,
        shape_type in arb_shape_type(),
        bounds in prop::array::uniform8(arb_double()),
    ) {
        let raw = common::file_header(shape_type.code(), length, bounds);
        let mut cursor = Cursor::new(raw.clone());
        let header = FileHeader::read(&mut cursor).unwrap();
        prop_assert_eq!(cursor.position(), 100);
        prop_assert_eq!(header.shape_type, shape_type);
        prop_assert_eq!(encode_file_header(&header), raw);
    }

    #[test]
    fn file_code_error_carries_value(code in any::<u32>().prop_filter("valid code", |c| *c != 9994)) {
        let mut raw = common::file_header(13, 50, [0.0; 8]);
        raw[..4].copy_from_slice(&code.to_be_bytes());
        match FileHeader::read(&mut Cursor::new(raw)) {
            Err(ShapefileError::InvalidFileCode { code: found }) => prop_assert_eq!(found, code),
            other => prop_assert!(false, "unexpected {:?}", other),
        }
    }

    #[test]
    fn unused_error_reports_first_index(
        index in 0usize..5,
        value in 1u32..,
        later in any::<u32>(),
    ) {
        let mut raw = common::file_header(13, 50, [0.0; 8]);
        let at = 4 + 4 * index;
        raw[at..at + 4].copy_from_slice(&value.to_be_bytes());
        if index < 4 {
            raw[at + 4..at + 8].copy_from_slice(&later.to_be_bytes());
        }
        match FileHeader::read(&mut Cursor::new(raw)) {
            Err(ShapefileError::InvalidHeaderUnused { index: found, value: v }) => {
                prop_assert_eq!(found, index);
                prop_assert_eq!(v, value);
            }
            other => prop_assert!(false, "unexpected {:?}", other),
        }
    }

    #[test]
    fn dbf_header_round_trip(
        date in (0u8..=255, 1u8..=12, 1u8..=28),
        record_count in any::<u32>(),
        header_length in 32u16..,
        record_size in any::<u16>(),
        flags in any::<(u8, u8, u8, u8)>(),
    ) {
        let mut raw = [0u8; 32];
        raw[0] = 0x03;
        raw[1] = date.0;
        raw[2] = date.1;
        raw[3] = date.2;
        raw[4..8].copy_from_slice(&record_count.to_le_bytes());
        raw[8..10].copy_from_slice(&header_length.to_le_bytes());
        raw[10..12].copy_from_slice(&record_size.to_le_bytes());
        raw[14] = flags.0;
        raw[15] = flags.1;
        raw[28] = flags.2;
        raw[29] = flags.3;

        let header = DbfHeader::from_bytes(&raw).unwrap();
        prop_assert_eq!(header.field_count, usize::from(header_length) / 32 - 1);
        prop_assert!(header.last_update.is_some());
        prop_assert_eq!(encode_dbf_header(&header), raw.to_vec());
    }

    #[test]
    fn field_descriptor_round_trip(
        name in "[A-Z_]{1,11}",
        kind in prop::sample::select(b"CDFNLM".to_vec()),
        length in any::<u8>(),
        decimals in any::<u8>(),
    ) {
        let mut raw = [0u8; 32];
        raw[..name.len()].copy_from_slice(name.as_bytes());
        raw[11] = kind;
        raw[16] = length;
        raw[17] = decimals;

        let field = FieldDescriptor::from_bytes(&raw);
        prop_assert_eq!(&field.name, &name);
        prop_assert_eq!(field.data_type.code(), kind);

        let mut encoded = [0u8; 32];
        encoded[..field.name.len()].copy_from_slice(field.name.as_bytes());
        encoded[11] = field.data_type.code();
        encoded[16] = field.length;
        encoded[17] = field.decimal_count;
        prop_assert_eq!(encoded, raw);
    }

    #[test]
    fn index_entries_double(pairs in prop::collection::vec((any::<u32>(), any::<u32>()), 0..20)) {
        let mut raw = common::file_header(13, 50 + 4 * pairs.len() as u32, [0.0; 8]);
        for &(offset, length) in &pairs {
            raw.write_u32::<BigEndian>(offset).unwrap();
            raw.write_u32::<BigEndian>(length).unwrap();
        }

        let mut reader = IndexReader::new(Cursor::new(raw));
        reader.initialize().unwrap();
        let mut expected_total = 100u64;
        for &(offset, length) in &pairs {
            let entry = reader.read_record().unwrap().unwrap();
            prop_assert_eq!(entry, IndexEntry {
                offset: u64::from(offset) * 2,
                length: u64::from(length) * 2,
            });
            expected_total += u64::from(length) * 2 + 8;
            prop_assert_eq!(reader.total_file_size(), expected_total);
        }
        prop_assert!(reader.read_record().unwrap().is_none());
        prop_assert_eq!(reader.record_count(), pairs.len() as u64);
    }
}

#[test]
fn test_index_doubling_example() {
    let mut raw = common::file_header(13, 54, [0.0; 8]);
    raw.extend_from_slice(&[0, 0, 0, 50, 0, 0, 0, 10]);
    let mut reader = IndexReader::new(Cursor::new(raw));
    reader.initialize().unwrap();

    let entry = reader.read_record().unwrap().unwrap();
    assert_eq!(entry.offset, 100);
    assert_eq!(entry.length, 20);
    assert_eq!(reader.total_file_size(), 100 + 28);
}

#[test]
fn test_empty_header_is_end_of_stream() {
    let err = FileHeader::read(&mut Cursor::new(Vec::new())).unwrap_err();
    assert!(err.is_unexpected_eof());
}
