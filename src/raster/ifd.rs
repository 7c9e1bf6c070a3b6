//! TIFF Image File Directory parsing
//!
//! Reads the header and first directory of a classic or BigTIFF stream and
//! resolves tag values, inline or at their offset.

use std::collections::HashMap;

use log::debug;

use crate::errors::{ZonalError, ZonalResult};
use crate::io::byte_order::{ByteOrder, ByteOrderHandler};
use crate::io::seekable::{read_bytes_at, stream_len, SeekableReader};
use super::constants::{field_types, header};

/// One directory entry with its raw value slot
#[derive(Debug, Clone)]
pub struct IfdEntry {
    pub tag: u16,
    pub field_type: u16,
    pub count: u64,
    /// The 4 (classic) or 8 (BigTIFF) bytes after the count
    value_slot: Vec<u8>,
}

impl IfdEntry {
    /// Total size of the entry's values in bytes
    pub fn byte_len(&self) -> u64 {
        self.count.saturating_mul(field_types::size_of(self.field_type) as u64)
    }
}

/// A parsed Image File Directory
#[derive(Debug, Clone, Default)]
pub struct Ifd {
    entries: HashMap<u16, IfdEntry>,
}

impl Ifd {
    pub fn get_entry(&self, tag: u16) -> Option<&IfdEntry> {
        self.entries.get(&tag)
    }

    pub fn has_tag(&self, tag: u16) -> bool {
        self.entries.contains_key(&tag)
    }
}

/// An open TIFF stream: byte order handler, flavour and total length
pub struct TiffStream<'r> {
    reader: &'r mut dyn SeekableReader,
    handler: Box<dyn ByteOrderHandler>,
    big_tiff: bool,
    len: u64,
    first_ifd_offset: u64,
}

impl<'r> TiffStream<'r> {
    /// Parse the header
    pub fn open(reader: &'r mut dyn SeekableReader) -> ZonalResult<Self> {
        let len = stream_len(reader)?;
        if len < 8 {
            return Err(ZonalError::InvalidHeader);
        }

        let head = read_bytes_at(reader, 0, 8)?;
        let byte_order = ByteOrder::detect([head[0], head[1]])?;
        let handler = byte_order.create_handler();

        let (big_tiff, first_ifd_offset) = match handler.u16_from(&head[2..4]) {
            header::TIFF_VERSION => (false, handler.u32_from(&head[4..8]) as u64),
            header::BIG_TIFF_VERSION => {
                if handler.u16_from(&head[4..6]) != header::BIGTIFF_OFFSET_SIZE || len < 16 {
                    return Err(ZonalError::InvalidHeader);
                }
                let offset = read_bytes_at(reader, 8, 8)?;
                (true, handler.u64_from(&offset))
            },
            _ => return Err(ZonalError::InvalidHeader),
        };

        debug!("TIFF header: {}, {}, first IFD at {}",
               byte_order.name(), if big_tiff { "BigTIFF" } else { "classic" }, first_ifd_offset);

        Ok(TiffStream { reader, handler, big_tiff, len, first_ifd_offset })
    }

    pub fn handler(&self) -> &dyn ByteOrderHandler {
        self.handler.as_ref()
    }

    /// Total length of the stream in bytes
    pub fn stream_len(&self) -> u64 {
        self.len
    }

    /// Read the first directory; later directories (overviews, masks) are ignored
    pub fn read_first_ifd(&mut self) -> ZonalResult<Ifd> {
        let offset = self.first_ifd_offset;
        let (count_size, entry_size, slot_size): (usize, usize, usize) =
            if self.big_tiff { (8, 20, 8) } else { (2, 12, 4) };

        let count_bytes = self.read_at(offset, count_size as u64)?;
        let entry_count = self.handler.uint_from(&count_bytes, count_size);
        let table = self.read_at(offset + count_size as u64, entry_count.saturating_mul(entry_size as u64))?;

        let mut entries = HashMap::new();
        for raw in table.chunks_exact(entry_size) {
            let entry = IfdEntry {
                tag: self.handler.u16_from(&raw[0..2]),
                field_type: self.handler.u16_from(&raw[2..4]),
                count: if self.big_tiff {
                    self.handler.u64_from(&raw[4..12])
                } else {
                    self.handler.u32_from(&raw[4..8]) as u64
                },
                value_slot: raw[entry_size - slot_size..].to_vec(),
            };
            entries.insert(entry.tag, entry);
        }

        debug!("IFD at {} holds {} entries", offset, entries.len());
        Ok(Ifd { entries })
    }

    /// Raw value bytes of an entry, inline or at its offset
    pub fn entry_bytes(&mut self, entry: &IfdEntry) -> ZonalResult<Vec<u8>> {
        let len = entry.byte_len();
        if len <= entry.value_slot.len() as u64 {
            return Ok(entry.value_slot[..len as usize].to_vec());
        }

        let offset = self.handler.uint_from(&entry.value_slot, entry.value_slot.len());
        self.read_at(offset, len)
    }

    /// Integer values of a tag
    pub fn uints(&mut self, ifd: &Ifd, tag: u16) -> ZonalResult<Option<Vec<u64>>> {
        let entry = match ifd.get_entry(tag) {
            Some(entry) => entry,
            None => return Ok(None),
        };

        let size = match entry.field_type {
            field_types::BYTE | field_types::UNDEFINED => 1,
            field_types::SHORT => 2,
            field_types::LONG => 4,
            field_types::LONG8 | field_types::IFD8 => 8,
            other => return Err(ZonalError::InvalidRaster(
                format!("Tag {} has type {}, expected an unsigned integer", tag, other)
            )),
        };

        let bytes = self.entry_bytes(entry)?;
        Ok(Some(bytes.chunks_exact(size).map(|value| self.handler.uint_from(value, size)).collect()))
    }

    /// First integer value of a tag
    pub fn uint(&mut self, ifd: &Ifd, tag: u16) -> ZonalResult<Option<u64>> {
        Ok(self.uints(ifd, tag)?.and_then(|values| values.first().copied()))
    }

    /// First integer value of a tag that must be present
    pub fn required_uint(&mut self, ifd: &Ifd, tag: u16) -> ZonalResult<u64> {
        self.uint(ifd, tag)?.ok_or(ZonalError::TagNotFound(tag))
    }

    /// Floating-point values of a tag; integer types are widened
    pub fn doubles(&mut self, ifd: &Ifd, tag: u16) -> ZonalResult<Option<Vec<f64>>> {
        let entry = match ifd.get_entry(tag) {
            Some(entry) => entry,
            None => return Ok(None),
        };

        match entry.field_type {
            field_types::DOUBLE => {
                let bytes = self.entry_bytes(entry)?;
                Ok(Some(bytes.chunks_exact(8).map(|v| self.handler.f64_from(v)).collect()))
            },
            field_types::FLOAT => {
                let bytes = self.entry_bytes(entry)?;
                Ok(Some(bytes.chunks_exact(4).map(|v| self.handler.f32_from(v) as f64).collect()))
            },
            _ => Ok(self.uints(ifd, tag)?.map(|values| values.into_iter().map(|v| v as f64).collect())),
        }
    }

    /// ASCII value of a tag with trailing NULs removed
    pub fn ascii(&mut self, ifd: &Ifd, tag: u16) -> ZonalResult<Option<String>> {
        let entry = match ifd.get_entry(tag) {
            Some(entry) => entry,
            None => return Ok(None),
        };

        let bytes = self.entry_bytes(entry)?;
        let text = String::from_utf8_lossy(&bytes);
        Ok(Some(text.trim_end_matches('\0').to_string()))
    }

    /// Read `len` bytes at `offset`, failing cleanly past the end of the stream
    pub fn read_at(&mut self, offset: u64, len: u64) -> ZonalResult<Vec<u8>> {
        if offset.checked_add(len).map_or(true, |end| end > self.len) {
            return Err(ZonalError::InvalidRaster(format!(
                "Read of {} bytes at offset {} runs past the end of the file ({} bytes)",
                len, offset, self.len
            )));
        }
        Ok(read_bytes_at(&mut *self.reader, offset, len as usize)?)
    }
}
