//! Structures shared by the .shp and .shx files.

mod file_header;

pub use file_header::{
    FileHeader, FILE_CODE, FILE_HEADER_SIZE, FILE_VERSION, HEADER_BODY_SIZE, HEADER_PREFIX_SIZE,
};
