//! # shapefile-tools-rs
//!
//! A pure Rust library for reading ESRI Shapefiles.
//!
//! A shapefile is a trio of files sharing a base name:
//!
//! - `.shp` geometry records, read with [`ShapeReader`]
//! - `.shx` fixed-size offsets into the `.shp`, read with [`IndexReader`]
//! - `.dbf` attribute records, read with [`DbfReader`]
//!
//! Each reader owns one seekable stream, validates the file header in
//! `initialize` and then hands out records until the end of the stream.
//!
//! ```no_run
//! use shapefile_tools::{DbfReader, DbfReaderConfiguration, IndexReader, ShapeReader};
//!
//! # fn main() -> shapefile_tools::Result<()> {
//! let mut index = IndexReader::open("roads.shx")?;
//! let mut shapes = ShapeReader::open("roads.shp")?;
//! for entry in index.entries() {
//!     let record = shapes.read_indexed(&entry?)?;
//!     println!("#{} {}", record.index, record.shape);
//! }
//!
//! let mut attributes = DbfReader::open("roads.dbf", DbfReaderConfiguration::default())?;
//! for record in attributes.records() {
//!     match record {
//!         Ok(record) => println!("{:?}", record.get("NAME")),
//!         Err(e) if e.is_recoverable() => continue,
//!         Err(e) => return Err(e),
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod io;
pub mod types;

pub use error::{ConversionError, Result, ShapefileError};
pub use io::dbf::{DbfReader, DbfReaderConfiguration, DbfRecord, FieldFilter, FieldValue};
pub use io::shp::{Shape, ShapeReader, ShapeRecord};
pub use io::shx::{IndexEntry, IndexReader};
pub use types::{BoundingBox, Point, ShapeType};
