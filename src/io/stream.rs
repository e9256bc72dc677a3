//! Stream position tracking shared by the .shp, .shx and .dbf readers.
//!
//! Every structural boundary in these formats sits at an offset that can be
//! computed from earlier fields. The readers re-check the cursor against that
//! offset after each structural read; a mismatch means the stream is out of
//! step and nothing after it can be trusted.

use std::io::{self, Read, Seek, SeekFrom};

use crate::error::{Result, ShapefileError};

/// Current byte offset of the stream.
pub fn position<S: Seek + ?Sized>(stream: &mut S) -> Result<u64> {
    Ok(stream.seek(SeekFrom::Current(0))?)
}

/// Fail with [`ShapefileError::UnexpectedOffset`] unless the stream sits at
/// `expected`.
pub fn expect_position<S: Seek + ?Sized>(
    stream: &mut S,
    expected: u64,
    context: &'static str,
) -> Result<()> {
    let actual = position(stream)?;
    if actual != expected {
        return Err(ShapefileError::UnexpectedOffset {
            context,
            expected,
            actual,
        });
    }
    Ok(())
}

/// Fill `buf` until it is full or the stream ends, returning the byte count.
///
/// Unlike `read_exact`, a short read is not an error here: callers need the
/// exact count to tell a sentinel byte or a clean end from a truncated record.
pub fn read_up_to<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
