//! .shx index files: the common header followed by fixed 8-byte records
//! locating each geometry record in the .shp file.

mod index_reader;

pub use index_reader::{IndexEntries, IndexEntry, IndexReader, INDEX_RECORD_SIZE};
