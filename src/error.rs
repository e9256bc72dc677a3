//! Error types for shapefile-tools-rs

use thiserror::Error;

use crate::io::dbf::{DataType, DbfVersion};

/// Error raised by a value converter while turning raw `.dbf` field bytes
/// into a [`FieldValue`](crate::io::dbf::FieldValue).
#[derive(Debug, Error)]
pub enum ConversionError {
    /// Digits could not be parsed as an integer.
    #[error("invalid integer {text:?}: {source}")]
    InvalidInteger {
        text: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// Digits could not be parsed as a floating point number.
    #[error("invalid number {text:?}: {source}")]
    InvalidFloat {
        text: String,
        #[source]
        source: std::num::ParseFloatError,
    },

    /// Logical fields only allow `YyNnTtFf?`.
    #[error("invalid logical value {0:?}")]
    InvalidLogical(char),

    /// Date fields are `YYYYMMDD`.
    #[error("invalid date {0:?}")]
    InvalidDate(String),

    /// Bytes are not valid in the configured text encoding.
    #[error("text is not valid {encoding}")]
    InvalidText { encoding: &'static str },

    /// The converter refuses this field outright.
    #[error("{0}")]
    Rejected(String),
}

/// Main error type for shapefile-tools-rs
#[derive(Debug, Error)]
pub enum ShapefileError {
    /// I/O error; `UnexpectedEof` when a fixed-size structure is cut short
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File code of a .shp/.shx header is not 9994
    #[error("invalid file code: {code}")]
    InvalidFileCode { code: u32 },

    /// One of the five reserved header words is not zero
    #[error("invalid unused {value} at index: {index}")]
    InvalidHeaderUnused { index: usize, value: u32 },

    /// Header file length is zero
    #[error("invalid length: {value}")]
    InvalidHeaderLength { value: u32 },

    /// Header version is not 1000
    #[error("invalid version: {version}")]
    InvalidHeaderVersion { version: u32 },

    /// Shape type code is not one of the known codes
    #[error("invalid shape type: {shape_type}")]
    InvalidShapeType { shape_type: i32 },

    /// A geometry record carries a shape type without a decoder
    #[error("unknown shape style: {shape_type}")]
    UnknownShape { shape_type: i32 },

    /// Stream cursor is not where the file layout says it must be
    #[error("offset is {actual}, should be {expected} {context}")]
    UnexpectedOffset {
        context: &'static str,
        expected: u64,
        actual: u64,
    },

    /// A read returned fewer bytes than the declared length
    #[error("size mismatch {context}: expected {expected} bytes, read {found}")]
    SizeMismatch {
        context: &'static str,
        expected: u64,
        found: u64,
    },

    /// A declared count does not match what was decoded
    #[error("count mismatch for {item_type}: expected {expected}, found {found}")]
    CountMismatch {
        item_type: &'static str,
        expected: u64,
        found: u64,
    },

    /// A .shp record numbered 0 (numbering starts at 1)
    #[error("invalid record number: {number}")]
    InvalidRecordNumber { number: u32 },

    /// .dbf header length too small to hold the main header
    #[error("invalid dbf header length: {value}")]
    InvalidDbfHeaderLength { value: u16 },

    /// .dbf version outside the supported allowlist
    #[error("not supported version: {0}")]
    NotSupportedVersion(DbfVersion),

    /// Field descriptor block is not closed by 0x0D
    #[error("invalid terminator: {value:#04x}")]
    InvalidTerminator { value: u8 },

    /// Field descriptor declares a data type without conversion support
    #[error("not supported data type: {data_type} (field {field})")]
    NotSupportedDataType { field: String, data_type: DataType },

    /// No converter registered for the field and defaults are disabled
    #[error("no such converter: {data_type} {field}")]
    ConverterNotFound { field: String, data_type: DataType },

    /// A converter failed on the field's raw bytes
    #[error("cannot convert field {field}: {source}")]
    Conversion {
        field: String,
        #[source]
        source: ConversionError,
    },

    /// Record status byte is 0x2A
    #[error("deleted record {index}")]
    DeletedRecord { index: u64 },

    /// Record status byte is neither 0x20 nor 0x2A
    #[error("weird first byte {value:#04x} in record {index}")]
    InvalidRecordFlag { index: u64, value: u8 },

    /// A record was requested before the header was read
    #[error("not initialized")]
    NotInitialized,
}

impl ShapefileError {
    /// Whether the reader is still positioned on a record boundary, so the
    /// caller may skip this record and keep reading.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ShapefileError::DeletedRecord { .. }
                | ShapefileError::ConverterNotFound { .. }
                | ShapefileError::Conversion { .. }
                | ShapefileError::NotSupportedDataType { .. }
        )
    }

    /// Whether this is a premature end of stream inside a fixed-size structure.
    pub fn is_unexpected_eof(&self) -> bool {
        matches!(self, ShapefileError::Io(e) if e.kind() == std::io::ErrorKind::UnexpectedEof)
    }
}

/// Result type alias for shapefile-tools-rs
pub type Result<T> = std::result::Result<T, ShapefileError>;
