//! Seekable reader trait and positioned reads

use std::io::{self, Read, Seek, SeekFrom};

/// Trait for readers that can both read and seek
///
/// Lets the raster reader accept files and in-memory cursors alike.
pub trait SeekableReader: Read + Seek {}

impl<T: Read + Seek> SeekableReader for T {}

/// Read exactly `len` bytes starting at absolute `offset`
pub fn read_bytes_at(reader: &mut dyn SeekableReader, offset: u64, len: usize) -> io::Result<Vec<u8>> {
    reader.seek(SeekFrom::Start(offset))?;
    let mut buffer = vec![0u8; len];
    reader.read_exact(&mut buffer)?;
    Ok(buffer)
}

/// Total length of the underlying stream
pub fn stream_len(reader: &mut dyn SeekableReader) -> io::Result<u64> {
    let len = reader.seek(SeekFrom::End(0))?;
    reader.seek(SeekFrom::Start(0))?;
    Ok(len)
}
