//! Points, boxes and value ranges as stored in shapefiles

use std::fmt;
use std::io::Read;

use byteorder::{LittleEndian, ReadBytesExt};

/// A 2D point (two little-endian doubles)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub(crate) fn read<R: Read>(reader: &mut R) -> std::io::Result<Self> {
        let x = reader.read_f64::<LittleEndian>()?;
        let y = reader.read_f64::<LittleEndian>()?;
        Ok(Self { x, y })
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {}", self.x, self.y)
    }
}

/// Axis aligned 2D bounding box: Xmin, Ymin, Xmax, Ymax
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a new bounding box
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    pub(crate) fn read<R: Read>(reader: &mut R) -> std::io::Result<Self> {
        let min_x = reader.read_f64::<LittleEndian>()?;
        let min_y = reader.read_f64::<LittleEndian>()?;
        let max_x = reader.read_f64::<LittleEndian>()?;
        let max_y = reader.read_f64::<LittleEndian>()?;
        Ok(Self::new(min_x, min_y, max_x, max_y))
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.6}, {:.6} x {:.6}, {:.6}",
            self.min_x, self.min_y, self.max_x, self.max_y
        )
    }
}

/// A min/max pair, used for Z and M ranges
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    /// Create a new range
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub(crate) fn read<R: Read>(reader: &mut R) -> std::io::Result<Self> {
        let min = reader.read_f64::<LittleEndian>()?;
        let max = reader.read_f64::<LittleEndian>()?;
        Ok(Self { min, max })
    }
}

impl fmt::Display for ValueRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.min, self.max)
    }
}

/// The eight bounding doubles of a .shp/.shx file header
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HeaderBounds {
    /// Xmin, Ymin, Xmax, Ymax
    pub xy: BoundingBox,
    /// Zmin, Zmax
    pub z: ValueRange,
    /// Mmin, Mmax
    pub m: ValueRange,
}

impl HeaderBounds {
    pub(crate) fn read<R: Read>(reader: &mut R) -> std::io::Result<Self> {
        let xy = BoundingBox::read(reader)?;
        let z = ValueRange::read(reader)?;
        let m = ValueRange::read(reader)?;
        Ok(Self { xy, z, m })
    }
}
