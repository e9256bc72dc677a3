//! .shp geometry files: the common header followed by variable-length
//! records, each an 8-byte big-endian record header and a little-endian
//! shape payload.

mod geometry;
mod shape_reader;

pub use geometry::{PolyLineZ, Shape};
pub use shape_reader::{ShapeReader, ShapeRecord, ShapeRecords, RECORD_HEADER_SIZE};
