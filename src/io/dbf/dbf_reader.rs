//! Reader for .dbf attribute records.
//!
//! [`DbfReader::initialize`] reads the main header, the field descriptors and
//! the terminator, checking the stream offset after each step. Records are
//! then read one `record_size` block at a time until the `0x1A` end marker
//! or the end of the stream.

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::ops::Range;
use std::path::Path;

use log::{debug, trace, warn};

use super::dbf_reader_configuration::DbfReaderConfiguration;
use super::field_descriptor::FieldDescriptor;
use super::header::{read_terminator, DbfHeader};
use super::value::DbfRecord;
use crate::error::{Result, ShapefileError};
use crate::io::stream::{position, read_up_to};

/// Status byte of an active record.
pub const RECORD_ACTIVE: u8 = 0x20;

/// Status byte of a deleted record.
pub const RECORD_DELETED: u8 = 0x2a;

/// Single byte closing the record stream.
pub const END_OF_FILE: u8 = 0x1a;

/// State established by a successful initialization.
struct DbfLayout {
    header: DbfHeader,
    fields: Vec<FieldDescriptor>,
    /// Byte range of each field inside a record, status byte included.
    slices: Vec<Range<usize>>,
}

/// Sequential reader over a .dbf file.
pub struct DbfReader<R: Read + Seek> {
    stream: R,
    configuration: DbfReaderConfiguration,
    layout: Option<DbfLayout>,
    buffer: Vec<u8>,
    records_read: u64,
}

impl DbfReader<BufReader<File>> {
    /// Open a .dbf file and read its header and field descriptors.
    pub fn open(path: impl AsRef<Path>, configuration: DbfReaderConfiguration) -> Result<Self> {
        let path = path.as_ref();
        debug!("loading .dbf file {}", path.display());
        let mut reader = Self::new(BufReader::new(File::open(path)?), configuration);
        reader.initialize()?;
        Ok(reader)
    }
}

impl<R: Read + Seek> DbfReader<R> {
    /// Wrap a stream positioned at the start of a .dbf file.
    pub fn new(stream: R, configuration: DbfReaderConfiguration) -> Self {
        Self {
            stream,
            configuration,
            layout: None,
            buffer: Vec::new(),
            records_read: 0,
        }
    }

    /// Read the header, field descriptors and terminator. Must be called
    /// before reading records.
    pub fn initialize(&mut self) -> Result<&DbfHeader> {
        let header = DbfHeader::read(&mut self.stream)?;
        debug!("header read successfully: {}", header);

        let fields = FieldDescriptor::read_all(&mut self.stream, &header)?;
        for field in &fields {
            trace!("field: {}", field);
        }

        read_terminator(&mut self.stream, &header)?;

        if fields.len() != header.field_count {
            return Err(ShapefileError::CountMismatch {
                item_type: "field descriptors",
                expected: header.field_count as u64,
                found: fields.len() as u64,
            });
        }

        let mut slices = Vec::with_capacity(fields.len());
        let mut start = 1usize;
        for field in &fields {
            let end = start + usize::from(field.length);
            slices.push(start..end);
            start = end;
        }
        let record_size = usize::from(header.record_size);
        if start > record_size {
            return Err(ShapefileError::SizeMismatch {
                context: "field lengths exceed record size",
                expected: start as u64,
                found: record_size as u64,
            });
        }
        if start != record_size {
            debug!(
                "field lengths add up to {} bytes, record size is {}",
                start, header.record_size
            );
        }

        self.buffer = vec![0u8; record_size];
        self.records_read = 0;
        debug!("{} fields, records start at {}", fields.len(), header.terminator_end());

        let layout = self.layout.insert(DbfLayout {
            header,
            fields,
            slices,
        });
        Ok(&layout.header)
    }

    /// The validated header, once [`initialize`](Self::initialize) succeeded.
    pub fn header(&self) -> Option<&DbfHeader> {
        self.layout.as_ref().map(|layout| &layout.header)
    }

    /// Field descriptors in declaration order; empty before initialization.
    pub fn fields(&self) -> &[FieldDescriptor] {
        self.layout
            .as_ref()
            .map_or(&[][..], |layout| layout.fields.as_slice())
    }

    /// Configuration the reader was created with.
    pub fn configuration(&self) -> &DbfReaderConfiguration {
        &self.configuration
    }

    /// Current byte offset in the stream.
    pub fn offset(&mut self) -> Result<u64> {
        position(&mut self.stream)
    }

    /// Records consumed so far, deleted ones included.
    pub fn records_read(&self) -> u64 {
        self.records_read
    }

    /// Read the next record. `Ok(None)` marks the end of the file.
    ///
    /// Deleted records and conversion failures are returned as errors for
    /// which [`ShapefileError::is_recoverable`] holds; the stream is then
    /// already on the next record.
    pub fn read_record(&mut self) -> Result<Option<DbfRecord>> {
        let layout = self.layout.as_ref().ok_or(ShapefileError::NotInitialized)?;

        let read = read_up_to(&mut self.stream, &mut self.buffer)?;
        if read == 0 {
            return Ok(None);
        }
        if read != self.buffer.len() {
            if read == 1 && self.buffer[0] == END_OF_FILE {
                if self.records_read != u64::from(layout.header.record_count) {
                    warn!(
                        "end of records after {} records, header declares {}",
                        self.records_read, layout.header.record_count
                    );
                }
                return Ok(None);
            }
            return Err(ShapefileError::SizeMismatch {
                context: "reading record",
                expected: self.buffer.len() as u64,
                found: read as u64,
            });
        }

        let index = self.records_read;
        self.records_read += 1;

        match self.buffer[0] {
            RECORD_ACTIVE => {}
            RECORD_DELETED => return Err(ShapefileError::DeletedRecord { index }),
            value => return Err(ShapefileError::InvalidRecordFlag { index, value }),
        }

        trace!("read record #{}", index);

        let configuration = &self.configuration;
        let mut record = DbfRecord::with_capacity(layout.fields.len());
        for (field, slice) in layout.fields.iter().zip(&layout.slices) {
            if !field.data_type.is_supported() {
                return Err(ShapefileError::NotSupportedDataType {
                    field: field.name.clone(),
                    data_type: field.data_type,
                });
            }

            if !configuration.filter.keeps(&field.name) {
                continue;
            }

            let raw = self
                .buffer
                .get(slice.clone())
                .ok_or(ShapefileError::SizeMismatch {
                    context: "slicing field from record",
                    expected: slice.end as u64,
                    found: self.buffer.len() as u64,
                })?;

            let converter = configuration.converter_for(&field.name).ok_or_else(|| {
                ShapefileError::ConverterNotFound {
                    field: field.name.clone(),
                    data_type: field.data_type,
                }
            })?;

            let value = converter
                .convert(field, raw)
                .map_err(|source| ShapefileError::Conversion {
                    field: field.name.clone(),
                    source,
                })?;

            record.insert(field.name.clone(), value);
        }

        Ok(Some(record))
    }

    /// Iterate over the remaining records.
    pub fn records(&mut self) -> DbfRecords<'_, R> {
        DbfRecords {
            reader: self,
            done: false,
        }
    }

    /// Give back the underlying stream.
    pub fn into_inner(self) -> R {
        self.stream
    }
}

/// Iterator returned by [`DbfReader::records`].
///
/// Recoverable errors are yielded and reading continues with the next
/// record; any other error ends the iteration.
pub struct DbfRecords<'a, R: Read + Seek> {
    reader: &'a mut DbfReader<R>,
    done: bool,
}

impl<'a, R: Read + Seek> Iterator for DbfRecords<'a, R> {
    type Item = Result<DbfRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.reader.read_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = !e.is_recoverable();
                Some(Err(e))
            }
        }
    }
}
