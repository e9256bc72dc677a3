//! Reader for the .shx offset table.

use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use byteorder::{BigEndian, ByteOrder};
use log::{debug, trace};

use crate::error::{Result, ShapefileError};
use crate::io::common::{FileHeader, FILE_HEADER_SIZE};
use crate::io::stream::read_up_to;

/// Size of one index record on disk.
pub const INDEX_RECORD_SIZE: usize = 8;

/// Location of one .shp record, converted from 16-bit words to bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexEntry {
    /// Byte offset of the record header in the .shp file.
    pub offset: u64,
    /// Content length in bytes, excluding the 8-byte record header.
    pub length: u64,
}

impl IndexEntry {
    /// Decode a raw big-endian `{offset, length}` pair given in words.
    pub fn from_bytes(raw: &[u8; INDEX_RECORD_SIZE]) -> Self {
        let offset = BigEndian::read_u32(&raw[0..4]);
        let length = BigEndian::read_u32(&raw[4..8]);
        Self {
            offset: u64::from(offset) * 2,
            length: u64::from(length) * 2,
        }
    }
}

impl fmt::Display for IndexEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "offset {:#06x} ({:06}) with len {:#06x} ({:06})",
            self.offset, self.offset, self.length, self.length
        )
    }
}

/// Sequential reader over an .shx file.
pub struct IndexReader<R: Read + Seek> {
    stream: R,
    header: Option<FileHeader>,
    total_file_size: u64,
    record_count: u64,
}

impl IndexReader<BufReader<File>> {
    /// Open an .shx file and read its header.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("loading .shx file {}", path.display());
        let mut reader = Self::new(BufReader::new(File::open(path)?));
        reader.initialize()?;
        Ok(reader)
    }
}

impl<R: Read + Seek> IndexReader<R> {
    /// Wrap a stream positioned at the start of an .shx file.
    pub fn new(stream: R) -> Self {
        Self {
            stream,
            header: None,
            total_file_size: 0,
            record_count: 0,
        }
    }

    /// Read and validate the file header. Must be called before reading records.
    pub fn initialize(&mut self) -> Result<&FileHeader> {
        let header = FileHeader::read(&mut self.stream)?;
        self.total_file_size = FILE_HEADER_SIZE;
        self.record_count = 0;
        debug!("header read successfully: {}", header);
        Ok(self.header.insert(header))
    }

    /// The validated header, once [`initialize`](Self::initialize) succeeded.
    pub fn header(&self) -> Option<&FileHeader> {
        self.header.as_ref()
    }

    /// Read the next index record. `Ok(None)` marks the end of the table.
    pub fn read_record(&mut self) -> Result<Option<IndexEntry>> {
        if self.header.is_none() {
            return Err(ShapefileError::NotInitialized);
        }

        let mut raw = [0u8; INDEX_RECORD_SIZE];
        let read = read_up_to(&mut self.stream, &mut raw)?;
        if read == 0 {
            debug!("index table ended after {} records", self.record_count);
            return Ok(None);
        }
        if read != INDEX_RECORD_SIZE {
            return Err(ShapefileError::SizeMismatch {
                context: "reading index record",
                expected: INDEX_RECORD_SIZE as u64,
                found: read as u64,
            });
        }

        let entry = IndexEntry::from_bytes(&raw);
        // each record also carries an 8-byte header in the .shp file
        self.total_file_size += entry.length + 8;
        self.record_count += 1;
        trace!("index #{}: {}", self.record_count, entry);

        Ok(Some(entry))
    }

    /// Iterate over the remaining index records.
    pub fn entries(&mut self) -> IndexEntries<'_, R> {
        IndexEntries {
            reader: self,
            done: false,
        }
    }

    /// Size the .shp file should have, given the records read so far.
    pub fn total_file_size(&self) -> u64 {
        self.total_file_size
    }

    /// Number of index records read so far.
    pub fn record_count(&self) -> u64 {
        self.record_count
    }

    /// Give back the underlying stream.
    pub fn into_inner(self) -> R {
        self.stream
    }
}

/// Iterator returned by [`IndexReader::entries`].
pub struct IndexEntries<'a, R: Read + Seek> {
    reader: &'a mut IndexReader<R>,
    done: bool,
}

impl<'a, R: Read + Seek> Iterator for IndexEntries<'a, R> {
    type Item = Result<IndexEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.reader.read_record() {
            Ok(Some(entry)) => Some(Ok(entry)),
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
