//! Shape payload decoding.
//!
//! Only PolyLineZ has a decoder. Headers accept every known shape type, so a
//! file of another type opens fine and fails on its first record.

use std::fmt;
use std::io::Read;

use byteorder::{LittleEndian, ReadBytesExt};

use crate::error::{Result, ShapefileError};
use crate::types::{BoundingBox, Point, ShapeType, ValueRange};

/// A decoded shape payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    PolyLineZ(PolyLineZ),
}

impl Shape {
    /// Decode a record payload: a little-endian shape type tag followed by
    /// the shape-specific body.
    pub fn decode(payload: &[u8]) -> Result<Self> {
        let mut reader = payload;
        let tag = reader.read_i32::<LittleEndian>()?;

        let shape = match ShapeType::from_code(tag) {
            Some(ShapeType::PolyLineZ) => Shape::PolyLineZ(PolyLineZ::read(&mut reader)?),
            _ => return Err(ShapefileError::UnknownShape { shape_type: tag }),
        };

        shape.validate()?;
        Ok(shape)
    }

    /// The shape type of this payload.
    pub fn shape_type(&self) -> ShapeType {
        match self {
            Shape::PolyLineZ(_) => ShapeType::PolyLineZ,
        }
    }

    /// Check the declared counts against the decoded arrays.
    pub fn validate(&self) -> Result<()> {
        match self {
            Shape::PolyLineZ(line) => line.validate(),
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::PolyLineZ(line) => write!(f, "{}", line),
        }
    }
}

/// A polyline with Z values and measures.
///
/// ```text
/// Byte 0        Box        4 doubles
/// Byte 32       NumParts   int
/// Byte 36       NumPoints  int
/// Byte 40       Parts      NumParts ints
/// Byte X        Points     NumPoints point        X = 40 + 4 * NumParts
/// Byte Y        Zmin Zmax  2 doubles              Y = X + 16 * NumPoints
/// Byte Y + 16   Zarray     NumPoints doubles
/// Byte Z        Mmin Mmax  2 doubles              Z = Y + 16 + 8 * NumPoints
/// Byte Z + 16   Marray     NumPoints doubles
/// ```
///
/// Offsets are relative to the end of the shape type tag.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PolyLineZ {
    pub bbox: BoundingBox,
    pub num_parts: u32,
    pub num_points: u32,
    /// Index into `points` where each part starts.
    pub parts: Vec<u32>,
    pub points: Vec<Point>,
    pub z_range: ValueRange,
    pub z_values: Vec<f64>,
    pub m_range: ValueRange,
    pub m_values: Vec<f64>,
}

impl PolyLineZ {
    /// Size of the fixed part: box plus the two counts.
    const FIXED_SIZE: u64 = 40;

    /// Bytes the body needs for the given counts.
    pub fn body_size(num_parts: u32, num_points: u32) -> u64 {
        let parts = u64::from(num_parts);
        let points = u64::from(num_points);
        Self::FIXED_SIZE + 4 * parts + 16 * points + 16 + 8 * points + 16 + 8 * points
    }

    fn read(reader: &mut &[u8]) -> Result<Self> {
        let bbox = BoundingBox::read(reader)?;
        let num_parts = reader.read_u32::<LittleEndian>()?;
        let num_points = reader.read_u32::<LittleEndian>()?;

        // counts come straight from the file; refuse them before allocating
        let needed = Self::body_size(num_parts, num_points) - Self::FIXED_SIZE;
        if (reader.len() as u64) < needed {
            return Err(ShapefileError::SizeMismatch {
                context: "reading PolyLineZ arrays",
                expected: needed,
                found: reader.len() as u64,
            });
        }

        let parts = (0..num_parts)
            .map(|_| reader.read_u32::<LittleEndian>())
            .collect::<std::io::Result<Vec<_>>>()?;
        let points = (0..num_points)
            .map(|_| Point::read(reader))
            .collect::<std::io::Result<Vec<_>>>()?;
        let z_range = ValueRange::read(reader)?;
        let z_values = read_doubles(reader, num_points)?;
        let m_range = ValueRange::read(reader)?;
        let m_values = read_doubles(reader, num_points)?;

        Ok(Self {
            bbox,
            num_parts,
            num_points,
            parts,
            points,
            z_range,
            z_values,
            m_range,
            m_values,
        })
    }

    /// Check that `parts` and `points` hold exactly the declared counts.
    pub fn validate(&self) -> Result<()> {
        if self.points.len() != self.num_points as usize {
            return Err(ShapefileError::CountMismatch {
                item_type: "PolyLineZ points",
                expected: u64::from(self.num_points),
                found: self.points.len() as u64,
            });
        }

        if self.parts.len() != self.num_parts as usize {
            return Err(ShapefileError::CountMismatch {
                item_type: "PolyLineZ parts",
                expected: u64::from(self.num_parts),
                found: self.parts.len() as u64,
            });
        }

        Ok(())
    }

    /// Points of part `index`, from its start index up to the next part.
    pub fn part_points(&self, index: usize) -> Option<&[Point]> {
        let start = *self.parts.get(index)? as usize;
        let end = self
            .parts
            .get(index + 1)
            .map_or(self.points.len(), |&next| next as usize);
        self.points.get(start..end)
    }
}

impl fmt::Display for PolyLineZ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} parts {} points Box({})",
            self.num_parts, self.num_points, self.bbox
        )
    }
}

fn read_doubles<R: Read>(reader: &mut R, count: u32) -> std::io::Result<Vec<f64>> {
    (0..count).map(|_| reader.read_f64::<LittleEndian>()).collect()
}
