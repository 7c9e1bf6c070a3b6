//! Tests for strip and tile decompression

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::compression::{CompressionFactory, CompressionHandler, LzwHandler};
use crate::errors::ZonalError;
use super::test_utils::lzw_encode;

fn sample_payload() -> Vec<u8> {
    // Repetitive enough to grow the LZW table past the 9-, 10- and 11-bit limits
    (0..6000u32).map(|i| ((i * 7) % 251) as u8 ^ ((i / 13) % 3) as u8).collect()
}

#[test]
fn test_factory_selects_handler_by_code() {
    for code in [1, 5, 8, 14, 32946] {
        let handler = CompressionFactory::create_handler(code).unwrap();
        assert_eq!(handler.code(), code);
    }
    assert_eq!(CompressionFactory::create_handler(5).unwrap().name(), "LZW");
}

#[test]
fn test_unknown_code_is_unsupported() {
    assert!(matches!(
        CompressionFactory::create_handler(7),
        Err(ZonalError::UnsupportedCompression(7))
    ));
}

#[test]
fn test_lzw_decodes_known_stream() {
    // Clear, 'A', 'B', 258 ("AB"), EOI at 9 bits
    let codes = [256u16, 65, 66, 258, 257];
    let mut bits = String::new();
    for code in codes {
        bits.push_str(&format!("{:09b}", code));
    }
    while bits.len() % 8 != 0 {
        bits.push('0');
    }
    let data: Vec<u8> = bits.as_bytes()
        .chunks(8)
        .map(|byte| u8::from_str_radix(std::str::from_utf8(byte).unwrap(), 2).unwrap())
        .collect();

    assert_eq!(LzwHandler.decompress(&data).unwrap(), b"ABAB".to_vec());
}

#[test]
fn test_lzw_handles_kwkwk_sequences() {
    let payload = vec![b'x'; 300];
    assert_eq!(LzwHandler.decompress(&lzw_encode(&payload)).unwrap(), payload);
}

#[test]
fn test_lzw_decodes_across_code_widths_and_table_resets() {
    let payload = sample_payload();
    assert_eq!(LzwHandler.decompress(&lzw_encode(&payload)).unwrap(), payload);
}

#[test]
fn test_lzw_rejects_code_beyond_table() {
    // Clear, then code 300 before any entry exists
    let codes = [256u16, 300];
    let mut bits = String::new();
    for code in codes {
        bits.push_str(&format!("{:09b}", code));
    }
    while bits.len() % 8 != 0 {
        bits.push('0');
    }
    let data: Vec<u8> = bits.as_bytes()
        .chunks(8)
        .map(|byte| u8::from_str_radix(std::str::from_utf8(byte).unwrap(), 2).unwrap())
        .collect();

    assert!(matches!(LzwHandler.decompress(&data), Err(ZonalError::InvalidRaster(_))));
}

#[test]
fn test_deflate_and_zstd_decode() {
    let payload = sample_payload();

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&payload).unwrap();
    let deflated = encoder.finish().unwrap();
    assert_eq!(CompressionFactory::create_handler(8).unwrap().decompress(&deflated).unwrap(), payload);

    let zstd_data = zstd::encode_all(payload.as_slice(), 3).unwrap();
    assert_eq!(CompressionFactory::create_handler(14).unwrap().decompress(&zstd_data).unwrap(), payload);
}

#[test]
fn test_corrupt_deflate_is_an_error() {
    let handler = CompressionFactory::create_handler(8).unwrap();
    assert!(handler.decompress(&[0xde, 0xad, 0xbe, 0xef]).is_err());
}
