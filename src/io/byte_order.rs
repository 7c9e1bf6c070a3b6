//! Byte order handling for TIFF files
//!
//! This module implements the Strategy pattern for handling different
//! byte orders (little-endian vs big-endian) when decoding TIFF data.

use std::marker::PhantomData;

use byteorder::{BigEndian, ByteOrder as Endian, LittleEndian};

use crate::errors::{ZonalError, ZonalResult};

/// Represents the byte order of a TIFF file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// Little-endian byte order (II)
    LittleEndian,
    /// Big-endian byte order (MM)
    BigEndian,
}

impl ByteOrder {
    /// Detects the byte order from the first two header bytes
    pub fn detect(marker: [u8; 2]) -> ZonalResult<Self> {
        match &marker {
            b"II" => Ok(ByteOrder::LittleEndian),
            b"MM" => Ok(ByteOrder::BigEndian),
            _ => Err(ZonalError::InvalidByteOrder(u16::from_le_bytes(marker))),
        }
    }

    /// Returns a string representation of this byte order
    pub fn name(&self) -> &'static str {
        match self {
            ByteOrder::LittleEndian => "Little Endian (II)",
            ByteOrder::BigEndian => "Big Endian (MM)",
        }
    }

    /// Creates the appropriate handler for this byte order
    pub fn create_handler(&self) -> Box<dyn ByteOrderHandler> {
        match self {
            ByteOrder::LittleEndian => Box::new(LittleEndianHandler::default()),
            ByteOrder::BigEndian => Box::new(BigEndianHandler::default()),
        }
    }
}

/// Numeric interpretation of raster samples
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleType {
    /// Unsigned integer with the given bit width
    Unsigned(u16),
    /// Two's complement integer with the given bit width
    Signed(u16),
    /// IEEE float with the given bit width
    Float(u16),
}

impl SampleType {
    /// Bit width of one sample
    pub fn bits(&self) -> u16 {
        match self {
            SampleType::Unsigned(bits) | SampleType::Signed(bits) | SampleType::Float(bits) => *bits,
        }
    }

    /// Size of one sample in bytes
    pub fn bytes(&self) -> usize {
        self.bits() as usize / 8
    }

    /// Whether the bit width is one the decoder handles
    pub fn is_supported(&self) -> bool {
        match self {
            SampleType::Unsigned(bits) | SampleType::Signed(bits) => matches!(bits, 8 | 16 | 32 | 64),
            SampleType::Float(bits) => matches!(bits, 32 | 64),
        }
    }
}

/// Trait for byte order handling strategies
///
/// All methods decode from the start of `bytes`; callers guarantee the
/// slice holds at least one value of the requested width.
pub trait ByteOrderHandler: Send + Sync {
    fn u16_from(&self, bytes: &[u8]) -> u16;

    fn u32_from(&self, bytes: &[u8]) -> u32;

    fn u64_from(&self, bytes: &[u8]) -> u64;

    fn f32_from(&self, bytes: &[u8]) -> f32;

    fn f64_from(&self, bytes: &[u8]) -> f64;

    /// Unsigned integer of `nbytes` bytes (1 to 8)
    fn uint_from(&self, bytes: &[u8], nbytes: usize) -> u64;

    /// Write an unsigned integer of `nbytes` bytes, truncating `value`
    fn write_uint(&self, bytes: &mut [u8], value: u64, nbytes: usize);

    /// Decode one sample and widen it to f64
    fn sample_from(&self, bytes: &[u8], sample_type: SampleType) -> f64;

    /// Whether this handler reads big-endian data
    fn is_big_endian(&self) -> bool;
}

/// Handler generic over the `byteorder` endianness marker
pub struct EndianHandler<E: Endian> {
    endian: PhantomData<E>,
}

impl<E: Endian> Default for EndianHandler<E> {
    fn default() -> Self {
        EndianHandler { endian: PhantomData }
    }
}

/// Little-endian byte order handler
pub type LittleEndianHandler = EndianHandler<LittleEndian>;

/// Big-endian byte order handler
pub type BigEndianHandler = EndianHandler<BigEndian>;

impl<E: Endian + Send + Sync + 'static> ByteOrderHandler for EndianHandler<E> {
    fn u16_from(&self, bytes: &[u8]) -> u16 {
        E::read_u16(bytes)
    }

    fn u32_from(&self, bytes: &[u8]) -> u32 {
        E::read_u32(bytes)
    }

    fn u64_from(&self, bytes: &[u8]) -> u64 {
        E::read_u64(bytes)
    }

    fn f32_from(&self, bytes: &[u8]) -> f32 {
        E::read_f32(bytes)
    }

    fn f64_from(&self, bytes: &[u8]) -> f64 {
        E::read_f64(bytes)
    }

    fn uint_from(&self, bytes: &[u8], nbytes: usize) -> u64 {
        if nbytes == 1 {
            return bytes[0] as u64;
        }
        E::read_uint(bytes, nbytes)
    }

    fn write_uint(&self, bytes: &mut [u8], value: u64, nbytes: usize) {
        if nbytes == 1 {
            bytes[0] = value as u8;
            return;
        }
        let mask = if nbytes == 8 { u64::MAX } else { (1u64 << (nbytes * 8)) - 1 };
        E::write_uint(bytes, value & mask, nbytes);
    }

    fn sample_from(&self, bytes: &[u8], sample_type: SampleType) -> f64 {
        match sample_type {
            SampleType::Unsigned(8) => bytes[0] as f64,
            SampleType::Unsigned(16) => E::read_u16(bytes) as f64,
            SampleType::Unsigned(32) => E::read_u32(bytes) as f64,
            SampleType::Unsigned(64) => E::read_u64(bytes) as f64,
            SampleType::Signed(8) => bytes[0] as i8 as f64,
            SampleType::Signed(16) => E::read_i16(bytes) as f64,
            SampleType::Signed(32) => E::read_i32(bytes) as f64,
            SampleType::Signed(64) => E::read_i64(bytes) as f64,
            SampleType::Float(32) => E::read_f32(bytes) as f64,
            SampleType::Float(64) => E::read_f64(bytes),
            _ => f64::NAN,
        }
    }

    fn is_big_endian(&self) -> bool {
        E::read_u16(&[0, 1]) == 1
    }
}
