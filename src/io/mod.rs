//! Readers for the three files of a shapefile

pub mod common;
pub mod dbf;
pub mod shp;
pub mod shx;
pub mod stream;

pub use common::FileHeader;
pub use dbf::{DbfReader, DbfReaderConfiguration};
pub use shp::ShapeReader;
pub use shx::IndexReader;
