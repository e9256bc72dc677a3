//! .dbf attribute files: a 32-byte main header, one 32-byte descriptor per
//! field, a `0x0D` terminator and fixed-size records, each starting with a
//! status byte.

mod converter;
mod data_type;
mod dbf_reader;
mod dbf_reader_configuration;
mod field_descriptor;
mod header;
mod value;
mod version;

pub use converter::{
    DateConverter, FloatConverter, IntegerConverter, LogicalConverter, TextConverter,
    TypedConverter, ValueConverter,
};
pub use data_type::DataType;
pub use dbf_reader::{DbfReader, DbfRecords, END_OF_FILE, RECORD_ACTIVE, RECORD_DELETED};
pub use dbf_reader_configuration::{DbfReaderConfiguration, FieldFilter};
pub use field_descriptor::{FieldDescriptor, FieldFlags, FIELD_NAME_SIZE};
pub use header::{
    encoding_for_language_driver, read_terminator, DbfHeader, DBF_HEADER_SIZE,
    FIELD_DESCRIPTOR_SIZE, FIELD_TERMINATOR,
};
pub use value::{DbfRecord, FieldValue};
pub use version::DbfVersion;
