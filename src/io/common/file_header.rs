//! The 100-byte header at the start of every .shp and .shx file.
//!
//! ```text
//! Byte 0   File Code     9994         Integer  Big
//! Byte 4   Unused        0            Integer  Big   (x5)
//! Byte 24  File Length   in 16-bit    Integer  Big
//! Byte 28  Version       1000         Integer  Little
//! Byte 32  Shape Type                 Integer  Little
//! Byte 36  Xmin Ymin Xmax Ymax        Double   Little
//! Byte 68  Zmin Zmax Mmin Mmax        Double   Little
//! ```
//!
//! The byte order flips after byte 28. The two parts are read separately so
//! that each is decoded with its own endianness.

use std::fmt;
use std::io::{Read, Seek};

use byteorder::{BigEndian, LittleEndian, ReadBytesExt};

use crate::error::{Result, ShapefileError};
use crate::io::stream::expect_position;
use crate::types::{HeaderBounds, ShapeType};

/// Magic number at byte 0.
pub const FILE_CODE: u32 = 9994;

/// Version number at byte 28.
pub const FILE_VERSION: u32 = 1000;

/// Size of the big-endian part (file code, unused words, length).
pub const HEADER_PREFIX_SIZE: u64 = 28;

/// Size of the little-endian part (version, shape type, bounds).
pub const HEADER_BODY_SIZE: u64 = 72;

/// Total header size; records start right after it.
pub const FILE_HEADER_SIZE: u64 = HEADER_PREFIX_SIZE + HEADER_BODY_SIZE;

/// Validated .shp/.shx file header.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FileHeader {
    /// File length in 16-bit words, header included.
    pub file_length: u32,
    /// Always [`FILE_VERSION`] once validated.
    pub version: u32,
    /// Shape type of every non-null record in the file.
    pub shape_type: ShapeType,
    /// Bounding box and Z/M ranges of all shapes.
    pub bounds: HeaderBounds,
}

impl FileHeader {
    /// Read and validate the header. The stream must be at offset 0 and is
    /// left at offset 100.
    pub fn read<R: Read + Seek>(stream: &mut R) -> Result<Self> {
        expect_position(stream, 0, "before reading file header")?;

        let file_length = read_prefix(stream)?;
        let (version, shape_type, bounds) = read_body(stream)?;

        expect_position(stream, FILE_HEADER_SIZE, "after reading file header")?;

        Ok(Self {
            file_length,
            version,
            shape_type,
            bounds,
        })
    }

    /// File length in bytes.
    pub fn file_length_bytes(&self) -> u64 {
        u64::from(self.file_length) * 2
    }
}

impl fmt::Display for FileHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} v{} length {} bytes box({}) z({}) m({})",
            self.shape_type,
            self.version,
            self.file_length_bytes(),
            self.bounds.xy,
            self.bounds.z,
            self.bounds.m
        )
    }
}

/// Read and validate the big-endian part, returning the file length in words.
fn read_prefix<R: Read>(reader: &mut R) -> Result<u32> {
    let code = reader.read_u32::<BigEndian>()?;
    let mut unused = [0u32; 5];
    for word in unused.iter_mut() {
        *word = reader.read_u32::<BigEndian>()?;
    }
    let length = reader.read_u32::<BigEndian>()?;

    if code != FILE_CODE {
        return Err(ShapefileError::InvalidFileCode { code });
    }

    if let Some(index) = unused.iter().position(|&v| v != 0) {
        return Err(ShapefileError::InvalidHeaderUnused {
            index,
            value: unused[index],
        });
    }

    if length == 0 {
        return Err(ShapefileError::InvalidHeaderLength { value: length });
    }

    Ok(length)
}

/// Read and validate the little-endian part.
fn read_body<R: Read>(reader: &mut R) -> Result<(u32, ShapeType, HeaderBounds)> {
    let version = reader.read_u32::<LittleEndian>()?;
    let shape_code = reader.read_i32::<LittleEndian>()?;
    let bounds = HeaderBounds::read(reader)?;

    if version != FILE_VERSION {
        return Err(ShapefileError::InvalidHeaderVersion { version });
    }

    let shape_type = ShapeType::try_from(shape_code)?;

    Ok((version, shape_type, bounds))
}
