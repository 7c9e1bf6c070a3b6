//! Handler for TIFF LZW compressed data
//!
//! Codes are packed MSB-first and the code width grows one code early
//! ("early change"), as libtiff writes them.

use log::debug;

use crate::errors::{ZonalError, ZonalResult};
use super::handler::CompressionHandler;

const CLEAR_CODE: usize = 256;
const END_OF_INFORMATION: usize = 257;
const FIRST_FREE_CODE: usize = 258;
const MIN_CODE_WIDTH: u32 = 9;
const MAX_CODE_WIDTH: u32 = 12;
const MAX_TABLE_SIZE: usize = 1 << MAX_CODE_WIDTH;

/// LZW compression handler (compression code 5)
pub struct LzwHandler;

impl CompressionHandler for LzwHandler {
    fn decompress(&self, data: &[u8]) -> ZonalResult<Vec<u8>> {
        let mut table = initial_table();
        let mut bits = MsbBitReader::new(data);
        let mut width = MIN_CODE_WIDTH;
        let mut previous: Option<usize> = None;
        let mut output = Vec::with_capacity(data.len() * 2);

        while let Some(code) = bits.read(width) {
            if code == CLEAR_CODE {
                table.truncate(FIRST_FREE_CODE);
                width = MIN_CODE_WIDTH;
                previous = None;
                continue;
            }
            if code == END_OF_INFORMATION {
                break;
            }

            let entry = match previous {
                None => table.get(code).cloned().ok_or_else(|| invalid_code(code, table.len()))?,
                Some(prev) => {
                    let entry = if code < table.len() {
                        table[code].clone()
                    } else if code == table.len() {
                        // KwKwK: the code being defined by this very step
                        let mut entry = table[prev].clone();
                        entry.push(table[prev][0]);
                        entry
                    } else {
                        return Err(invalid_code(code, table.len()));
                    };

                    if table.len() < MAX_TABLE_SIZE {
                        let mut added = table[prev].clone();
                        added.push(entry[0]);
                        table.push(added);
                    }
                    entry
                }
            };

            output.extend_from_slice(&entry);
            if table.len() + 1 >= (1 << width) && width < MAX_CODE_WIDTH {
                width += 1;
            }
            previous = Some(code);
        }

        debug!("LZW decompressed {} bytes to {}", data.len(), output.len());
        Ok(output)
    }

    fn name(&self) -> &'static str {
        "LZW"
    }

    fn code(&self) -> u64 {
        5
    }
}

fn initial_table() -> Vec<Vec<u8>> {
    let mut table: Vec<Vec<u8>> = (0..=255u8).map(|byte| vec![byte]).collect();
    // Clear and end-of-information have no string
    table.push(Vec::new());
    table.push(Vec::new());
    table
}

fn invalid_code(code: usize, table_len: usize) -> ZonalError {
    ZonalError::InvalidRaster(format!("LZW code {} outside table of {} entries", code, table_len))
}

/// Reads variable-width codes, most significant bit first
struct MsbBitReader<'a> {
    data: &'a [u8],
    position: usize,
    buffer: u32,
    buffered: u32,
}

impl<'a> MsbBitReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        MsbBitReader { data, position: 0, buffer: 0, buffered: 0 }
    }

    /// Next code of `width` bits, `None` once the input is exhausted
    fn read(&mut self, width: u32) -> Option<usize> {
        while self.buffered < width {
            let byte = *self.data.get(self.position)?;
            self.position += 1;
            self.buffer = (self.buffer << 8) | byte as u32;
            self.buffered += 8;
        }

        self.buffered -= width;
        let code = (self.buffer >> self.buffered) & ((1 << width) - 1);
        self.buffer &= (1 << self.buffered) - 1;
        Some(code as usize)
    }
}
