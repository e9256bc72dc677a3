//! Reader for .shp geometry records.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use byteorder::{BigEndian, ByteOrder};
use log::{debug, trace};

use super::geometry::Shape;
use crate::error::{Result, ShapefileError};
use crate::io::common::FileHeader;
use crate::io::shx::IndexEntry;
use crate::io::stream::{position, read_up_to};

/// Size of the big-endian `{number, length}` header before each record.
pub const RECORD_HEADER_SIZE: usize = 8;

/// One decoded .shp record.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeRecord {
    /// Zero-based record index (the on-disk number minus one).
    pub index: u32,
    /// Payload length in bytes.
    pub content_length: u64,
    pub shape: Shape,
}

/// Sequential (and seekable) reader over an .shp file.
#[derive(Debug)]
pub struct ShapeReader<R: Read + Seek> {
    stream: R,
    header: Option<FileHeader>,
}

impl ShapeReader<BufReader<File>> {
    /// Open an .shp file and read its header.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("loading .shp file {}", path.display());
        let mut reader = Self::new(BufReader::new(File::open(path)?));
        reader.initialize()?;
        Ok(reader)
    }
}

impl<R: Read + Seek> ShapeReader<R> {
    /// Wrap a stream positioned at the start of an .shp file.
    pub fn new(stream: R) -> Self {
        Self {
            stream,
            header: None,
        }
    }

    /// Read and validate the file header. Must be called before reading records.
    pub fn initialize(&mut self) -> Result<&FileHeader> {
        let header = FileHeader::read(&mut self.stream)?;
        debug!("header read successfully: {}", header);
        Ok(self.header.insert(header))
    }

    /// The validated header, once [`initialize`](Self::initialize) succeeded.
    pub fn header(&self) -> Option<&FileHeader> {
        self.header.as_ref()
    }

    /// Seek to `offset` (in bytes) and read the record starting there.
    pub fn read_record_at(&mut self, offset: u64) -> Result<Option<ShapeRecord>> {
        if self.header.is_none() {
            return Err(ShapefileError::NotInitialized);
        }
        self.stream.seek(SeekFrom::Start(offset))?;
        self.read_record()
    }

    /// Read the record an .shx entry points at, checking both agree on its length.
    pub fn read_indexed(&mut self, entry: &IndexEntry) -> Result<ShapeRecord> {
        let record = self
            .read_record_at(entry.offset)?
            .ok_or(ShapefileError::SizeMismatch {
                context: "reading indexed record",
                expected: RECORD_HEADER_SIZE as u64,
                found: 0,
            })?;

        if record.content_length != entry.length {
            return Err(ShapefileError::SizeMismatch {
                context: "record length differs from index",
                expected: entry.length,
                found: record.content_length,
            });
        }

        Ok(record)
    }

    /// Read the next record. `Ok(None)` marks the end of the file.
    pub fn read_record(&mut self) -> Result<Option<ShapeRecord>> {
        if self.header.is_none() {
            return Err(ShapefileError::NotInitialized);
        }

        let offset = position(&mut self.stream)?;

        let mut raw = [0u8; RECORD_HEADER_SIZE];
        let read = read_up_to(&mut self.stream, &mut raw)?;
        if read == 0 {
            return Ok(None);
        }
        if read != RECORD_HEADER_SIZE {
            return Err(ShapefileError::SizeMismatch {
                context: "reading record header",
                expected: RECORD_HEADER_SIZE as u64,
                found: read as u64,
            });
        }

        let number = BigEndian::read_u32(&raw[0..4]);
        let content_length = u64::from(BigEndian::read_u32(&raw[4..8])) * 2;
        let index = number
            .checked_sub(1)
            .ok_or(ShapefileError::InvalidRecordNumber { number })?;

        let mut payload = Vec::new();
        (&mut self.stream)
            .take(content_length)
            .read_to_end(&mut payload)?;
        if payload.len() as u64 != content_length {
            return Err(ShapefileError::SizeMismatch {
                context: "reading record content",
                expected: content_length,
                found: payload.len() as u64,
            });
        }

        trace!(
            "read shape #{} with len {:#06x} ({:06}) at offset {:#06x} ({:06})",
            index,
            content_length,
            content_length,
            offset,
            offset
        );

        let shape = Shape::decode(&payload)?;

        Ok(Some(ShapeRecord {
            index,
            content_length,
            shape,
        }))
    }

    /// Iterate over the remaining records.
    pub fn records(&mut self) -> ShapeRecords<'_, R> {
        ShapeRecords {
            reader: self,
            done: false,
        }
    }

    /// Give back the underlying stream.
    pub fn into_inner(self) -> R {
        self.stream
    }
}

/// Iterator returned by [`ShapeReader::records`]. Stops after the first error.
pub struct ShapeRecords<'a, R: Read + Seek> {
    reader: &'a mut ShapeReader<R>,
    done: bool,
}

impl<'a, R: Read + Seek> Iterator for ShapeRecords<'a, R> {
    type Item = Result<ShapeRecord>;

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
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
