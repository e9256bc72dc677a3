//! Byte-exact fixture builders shared by the integration tests.

#![allow(dead_code)]

use byteorder::{BigEndian, LittleEndian, WriteBytesExt};

/// 100-byte .shp/.shx header.
pub fn file_header(shape_type: i32, length_words: u32, bounds: [f64; 8]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(100);
    bytes.write_u32::<BigEndian>(9994).unwrap();
    for _ in 0..5 {
        bytes.write_u32::<BigEndian>(0).unwrap();
    }
    bytes.write_u32::<BigEndian>(length_words).unwrap();
    bytes.write_u32::<LittleEndian>(1000).unwrap();
    bytes.write_i32::<LittleEndian>(shape_type).unwrap();
    for v in bounds {
        bytes.write_f64::<LittleEndian>(v).unwrap();
    }
    bytes
}

/// A PolyLineZ line through `points`, with z and m equal to the point index.
pub struct Line {
    pub parts: Vec<u32>,
    pub points: Vec<(f64, f64)>,
}

impl Line {
    pub fn new(parts: &[u32], points: &[(f64, f64)]) -> Self {
        Self {
            parts: parts.to_vec(),
            points: points.to_vec(),
        }
    }

    /// Shape payload, shape type tag included.
    pub fn payload(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.write_i32::<LittleEndian>(13).unwrap();
        let (min_x, min_y, max_x, max_y) = self.points.iter().fold(
            (f64::MAX, f64::MAX, f64::MIN, f64::MIN),
            |(a, b, c, d), &(x, y)| (a.min(x), b.min(y), c.max(x), d.max(y)),
        );
        for v in [min_x, min_y, max_x, max_y] {
            bytes.write_f64::<LittleEndian>(v).unwrap();
        }
        bytes.write_u32::<LittleEndian>(self.parts.len() as u32).unwrap();
        bytes.write_u32::<LittleEndian>(self.points.len() as u32).unwrap();
        for &part in &self.parts {
            bytes.write_u32::<LittleEndian>(part).unwrap();
        }
        for &(x, y) in &self.points {
            bytes.write_f64::<LittleEndian>(x).unwrap();
            bytes.write_f64::<LittleEndian>(y).unwrap();
        }
        let last = self.points.len().saturating_sub(1) as f64;
        for _ in 0..2 {
            bytes.write_f64::<LittleEndian>(0.0).unwrap();
            bytes.write_f64::<LittleEndian>(last).unwrap();
            for i in 0..self.points.len() {
                bytes.write_f64::<LittleEndian>(i as f64).unwrap();
            }
        }
        bytes
    }
}

/// Record header plus payload.
pub fn shp_record(number: u32, payload: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(8 + payload.len());
    bytes.write_u32::<BigEndian>(number).unwrap();
    bytes.write_u32::<BigEndian>((payload.len() / 2) as u32).unwrap();
    bytes.extend_from_slice(payload);
    bytes
}

/// Matching .shp and .shx contents for a list of lines.
pub fn shp_and_shx(lines: &[Line]) -> (Vec<u8>, Vec<u8>) {
    let mut records = Vec::new();
    let mut index = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        let payload = line.payload();
        index.push((100 + records.len() as u32) / 2);
        index.push((payload.len() / 2) as u32);
        records.extend(shp_record(i as u32 + 1, &payload));
    }

    let bounds = [0.0, 0.0, 10.0, 10.0, 0.0, 5.0, 0.0, 5.0];
    let mut shp = file_header(13, (100 + records.len() as u32) / 2, bounds);
    shp.extend(records);

    let mut shx = file_header(13, (100 + 4 * index.len() as u32) / 2, bounds);
    for word in index {
        shx.write_u32::<BigEndian>(word).unwrap();
    }

    (shp, shx)
}

/// One .dbf column.
pub struct Column {
    pub name: &'static str,
    pub kind: u8,
    pub length: u8,
    pub decimals: u8,
}

impl Column {
    pub fn new(name: &'static str, kind: u8, length: u8, decimals: u8) -> Self {
        Self {
            name,
            kind,
            length,
            decimals,
        }
    }
}

/// A dBase III file. Each record is a status byte and its values, padded
/// or cut to the column widths.
pub fn dbf_file(columns: &[Column], records: &[(u8, Vec<&str>)], with_end_marker: bool) -> Vec<u8> {
    let header_length = 32 + 32 * columns.len() as u16 + 1;
    let record_size = 1 + columns.iter().map(|c| u16::from(c.length)).sum::<u16>();

    let mut bytes = Vec::new();
    bytes.write_u8(0x03).unwrap();
    bytes.extend_from_slice(&[124, 2, 29]);
    bytes.write_u32::<LittleEndian>(records.len() as u32).unwrap();
    bytes.write_u16::<LittleEndian>(header_length).unwrap();
    bytes.write_u16::<LittleEndian>(record_size).unwrap();
    bytes.resize(29, 0);
    bytes.write_u8(0x57).unwrap();
    bytes.resize(32, 0);

    for column in columns {
        let mut descriptor = [0u8; 32];
        descriptor[..column.name.len()].copy_from_slice(column.name.as_bytes());
        descriptor[11] = column.kind;
        descriptor[16] = column.length;
        descriptor[17] = column.decimals;
        bytes.extend_from_slice(&descriptor);
    }
    bytes.write_u8(0x0d).unwrap();

    for (status, values) in records {
        bytes.write_u8(*status).unwrap();
        for (column, value) in columns.iter().zip(values) {
            let mut field = value.as_bytes().to_vec();
            field.resize(usize::from(column.length), b' ');
            bytes.extend(field);
        }
    }

    if with_end_marker {
        bytes.write_u8(0x1a).unwrap();
    }
    bytes
}

/// Write `data` to a fresh file in the temp directory.
pub fn temp_file(name: &str, data: &[u8]) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(format!(
        "shapefile-tools-{}-{}",
        std::process::id(),
        name
    ));
    std::fs::write(&path, data).unwrap();
    path
}
