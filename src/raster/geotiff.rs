//! GeoTIFF raster source
//!
//! Loads band 1 of a single-image GeoTIFF into a [`Raster`]. Handles classic
//! TIFF and BigTIFF in either byte order, stripped and tiled layouts, chunky
//! and planar sample organisation, the common compressions and predictors,
//! and integer or floating-point samples of 8 to 64 bits.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::compression::CompressionFactory;
use crate::config::RasterConfig;
use crate::coordinate::CoordinateSystemFactory;
use crate::errors::{ZonalError, ZonalResult};
use crate::io::byte_order::{ByteOrderHandler, SampleType};
use crate::io::seekable::SeekableReader;
use super::constants::{geo_keys, planar, predictor, sample_format, tags};
use super::ifd::{Ifd, TiffStream};
use super::{GeoTransform, Raster, RasterSource};

/// Upper bound on decoded cells per byte of input file
const MAX_EXPANSION_PER_BYTE: u64 = 1 << 16;

/// Reads a GeoTIFF file as a single-band raster
#[derive(Debug, Clone)]
pub struct GeoTiffReader {
    path: PathBuf,
    crs_override: Option<String>,
    nodata_override: Option<f64>,
}

impl GeoTiffReader {
    pub fn new(path: impl AsRef<Path>) -> Self {
        GeoTiffReader {
            path: path.as_ref().to_path_buf(),
            crs_override: None,
            nodata_override: None,
        }
    }

    /// Build a reader from the `[raster]` configuration section
    pub fn from_config(config: &RasterConfig) -> ZonalResult<Self> {
        let path = config.path.as_ref()
            .ok_or_else(|| ZonalError::Config("No raster path configured".to_string()))?;

        Ok(GeoTiffReader::new(path)
            .with_crs(config.crs.clone())
            .with_nodata(config.nodata))
    }

    /// Reference frame used instead of the file's GeoKeys
    pub fn with_crs(mut self, crs: Option<String>) -> Self {
        self.crs_override = crs;
        self
    }

    /// No-data sentinel used instead of the file's GDAL_NODATA tag
    pub fn with_nodata(mut self, nodata: Option<f64>) -> Self {
        self.nodata_override = nodata;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Decode a raster from any seekable stream
    pub fn read_from(&self, reader: &mut dyn SeekableReader) -> ZonalResult<Raster> {
        let mut stream = TiffStream::open(reader)?;
        let ifd = stream.read_first_ifd()?;

        let layout = ImageLayout::from_ifd(&mut stream, &ifd)?;
        debug!("Image {}x{}, {:?}, {} sample(s) per pixel, {} {} {}x{} chunks, compression {}, predictor {}",
               layout.width, layout.height, layout.sample_type, layout.samples_per_pixel,
               layout.chunks_per_band(), if layout.tiled { "tiled" } else { "strip" },
               layout.chunk_width, layout.chunk_height, layout.compression, layout.predictor);

        let data = decode_band(&mut stream, &layout)?;
        let transform = read_geotransform(&mut stream, &ifd)?;

        let crs = match &self.crs_override {
            Some(crs) => {
                CoordinateSystemFactory::from_string(crs)?;
                crs.clone()
            },
            None => read_epsg_code(&mut stream, &ifd)?
                .map(|code| format!("EPSG:{}", code))
                .ok_or_else(|| ZonalError::UnsupportedCrs(
                    "GeoTIFF carries no EPSG code; set raster.crs in the configuration".to_string()
                ))?,
        };

        let nodata = match self.nodata_override {
            Some(nodata) => Some(nodata),
            None => read_nodata(&mut stream, &ifd)?,
        };

        Raster::new(layout.width, layout.height, data, transform, crs)
            .map(|raster| raster.with_nodata(nodata))
    }
}

impl RasterSource for GeoTiffReader {
    fn load_raster(&self) -> ZonalResult<Raster> {
        info!("Reading raster {}", self.path.display());
        let file = File::open(&self.path)?;
        let mut reader = BufReader::new(file);
        let raster = self.read_from(&mut reader)?;

        info!("Loaded {}x{} raster in {} (nodata {:?})",
              raster.width(), raster.height(), raster.crs(), raster.nodata());
        Ok(raster)
    }
}

/// How the image's samples are stored
#[derive(Debug, Clone)]
struct ImageLayout {
    width: usize,
    height: usize,
    sample_type: SampleType,
    samples_per_pixel: usize,
    planar_configuration: u16,
    compression: u64,
    predictor: u16,
    tiled: bool,
    /// Stored width of one chunk in pixels (image width for strips)
    chunk_width: usize,
    /// Stored height of one chunk in rows (rows per strip for strips)
    chunk_height: usize,
    offsets: Vec<u64>,
    byte_counts: Vec<u64>,
}

impl ImageLayout {
    fn from_ifd(stream: &mut TiffStream<'_>, ifd: &Ifd) -> ZonalResult<Self> {
        let width = stream.required_uint(ifd, tags::IMAGE_WIDTH)? as usize;
        let height = stream.required_uint(ifd, tags::IMAGE_LENGTH)? as usize;
        let bits = stream.uint(ifd, tags::BITS_PER_SAMPLE)?.unwrap_or(1) as u16;
        let format = stream.uint(ifd, tags::SAMPLE_FORMAT)?.unwrap_or(sample_format::UNSIGNED as u64) as u16;
        let samples_per_pixel = stream.uint(ifd, tags::SAMPLES_PER_PIXEL)?.unwrap_or(1).max(1) as usize;
        let planar_configuration = stream.uint(ifd, tags::PLANAR_CONFIGURATION)?
            .unwrap_or(planar::CHUNKY as u64) as u16;
        let compression = stream.uint(ifd, tags::COMPRESSION)?.unwrap_or(1);
        let predictor = stream.uint(ifd, tags::PREDICTOR)?.unwrap_or(predictor::NONE as u64) as u16;

        let sample_type = match format {
            sample_format::UNSIGNED => SampleType::Unsigned(bits),
            sample_format::SIGNED => SampleType::Signed(bits),
            sample_format::IEEE_FLOAT => SampleType::Float(bits),
            other => return Err(ZonalError::InvalidRaster(format!("Unsupported sample format {}", other))),
        };
        if !sample_type.is_supported() {
            return Err(ZonalError::InvalidRaster(format!("Unsupported sample type {:?}", sample_type)));
        }

        let tiled = ifd.has_tag(tags::TILE_WIDTH);
        let (chunk_width, chunk_height, offsets, byte_counts) = if tiled {
            (
                stream.required_uint(ifd, tags::TILE_WIDTH)? as usize,
                stream.required_uint(ifd, tags::TILE_LENGTH)? as usize,
                stream.uints(ifd, tags::TILE_OFFSETS)?.ok_or(ZonalError::TagNotFound(tags::TILE_OFFSETS))?,
                stream.uints(ifd, tags::TILE_BYTE_COUNTS)?.ok_or(ZonalError::TagNotFound(tags::TILE_BYTE_COUNTS))?,
            )
        } else {
            let rows_per_strip = stream.uint(ifd, tags::ROWS_PER_STRIP)?.unwrap_or(height as u64);
            (
                width,
                (rows_per_strip as usize).min(height),
                stream.uints(ifd, tags::STRIP_OFFSETS)?.ok_or(ZonalError::TagNotFound(tags::STRIP_OFFSETS))?,
                stream.uints(ifd, tags::STRIP_BYTE_COUNTS)?.ok_or(ZonalError::TagNotFound(tags::STRIP_BYTE_COUNTS))?,
            )
        };

        if width == 0 || height == 0 || chunk_width == 0 || chunk_height == 0 {
            return Err(ZonalError::InvalidRaster(format!(
                "Degenerate image layout: {}x{} pixels in {}x{} chunks", width, height, chunk_width, chunk_height
            )));
        }

        let sample_bytes = sample_type.bytes();
        let samples_in_chunk = if planar_configuration == planar::SEPARATE { 1 } else { samples_per_pixel };
        let chunk_bytes = chunk_width.checked_mul(samples_in_chunk)
            .and_then(|n| n.checked_mul(sample_bytes))
            .and_then(|row_bytes| row_bytes.checked_mul(chunk_height));

        let cells = match (width.checked_mul(height), chunk_bytes) {
            (Some(cells), Some(_)) => cells,
            _ => return Err(ZonalError::InvalidRaster(format!(
                "Image layout overflows: {}x{} pixels in {}x{} chunks of {} byte samples",
                width, height, chunk_width, chunk_height, sample_bytes
            ))),
        };

        // Dimensions beyond this are forged; no codec expands that far
        let limit = stream.stream_len().saturating_mul(MAX_EXPANSION_PER_BYTE);
        if cells as u64 > limit {
            return Err(ZonalError::InvalidRaster(format!(
                "{}x{} pixels is implausible for a file of {} bytes", width, height, stream.stream_len()
            )));
        }

        let layout = ImageLayout {
            width,
            height,
            sample_type,
            samples_per_pixel,
            planar_configuration,
            compression,
            predictor,
            tiled,
            chunk_width,
            chunk_height,
            offsets,
            byte_counts,
        };

        let needed = layout.chunks_per_band();
        if layout.offsets.len() < needed || layout.byte_counts.len() < needed {
            return Err(ZonalError::InvalidRaster(format!(
                "Expected {} chunks per band, found {} offsets and {} byte counts",
                needed, layout.offsets.len(), layout.byte_counts.len()
            )));
        }

        Ok(layout)
    }

    fn chunks_across(&self) -> usize {
        self.width.div_ceil(self.chunk_width)
    }

    fn chunks_down(&self) -> usize {
        self.height.div_ceil(self.chunk_height)
    }

    /// Chunks holding band 1; with separate planes they come first
    fn chunks_per_band(&self) -> usize {
        self.chunks_across() * self.chunks_down()
    }

    /// Samples interleaved per pixel inside one chunk
    fn samples_in_chunk(&self) -> usize {
        if self.planar_configuration == planar::SEPARATE {
            1
        } else {
            self.samples_per_pixel
        }
    }

    /// Bytes in one stored chunk row
    fn row_bytes(&self) -> usize {
        self.chunk_width * self.samples_in_chunk() * self.sample_type.bytes()
    }

    /// Stored rows of chunk `index`; the last strip may be short, tiles never are
    fn stored_rows(&self, index: usize) -> usize {
        if self.tiled {
            self.chunk_height
        } else {
            let top = (index / self.chunks_across()) * self.chunk_height;
            self.chunk_height.min(self.height - top)
        }
    }
}

/// Decode band 1 into a row-major grid
fn decode_band(stream: &mut TiffStream<'_>, layout: &ImageLayout) -> ZonalResult<Vec<f64>> {
    let codec = CompressionFactory::create_handler(layout.compression)?;
    debug!("Decoding {} chunks with {} compression", layout.chunks_per_band(), codec.name());

    let sample_bytes = layout.sample_type.bytes();
    let pixel_stride = layout.samples_in_chunk() * sample_bytes;
    let row_bytes = layout.row_bytes();
    let across = layout.chunks_across();

    let mut data = vec![f64::NAN; layout.width * layout.height];

    for index in 0..layout.chunks_per_band() {
        let (offset, byte_count) = (layout.offsets[index], layout.byte_counts[index]);
        if byte_count == 0 {
            debug!("Chunk {} is sparse, leaving its cells missing", index);
            continue;
        }

        let raw = stream.read_at(offset, byte_count)?;
        let mut bytes = codec.decompress(&raw)?;

        let rows = layout.stored_rows(index);
        let expected = rows * row_bytes;
        if bytes.len() < expected {
            return Err(ZonalError::InvalidRaster(format!(
                "Chunk {} decoded to {} bytes, expected {}", index, bytes.len(), expected
            )));
        }
        bytes.truncate(expected);

        undo_predictor(&mut bytes, layout, stream.handler())?;

        let x0 = (index % across) * layout.chunk_width;
        let y0 = (index / across) * layout.chunk_height;
        let cols = layout.chunk_width.min(layout.width - x0);
        let valid_rows = rows.min(layout.height - y0);

        for row in 0..valid_rows {
            let line = &bytes[row * row_bytes..];
            let target = (y0 + row) * layout.width + x0;
            for col in 0..cols {
                let at = col * pixel_stride;
                data[target + col] = stream.handler().sample_from(&line[at..at + sample_bytes], layout.sample_type);
            }
        }
    }

    Ok(data)
}

/// Reverse the predictor row by row
fn undo_predictor(bytes: &mut [u8], layout: &ImageLayout, handler: &dyn ByteOrderHandler) -> ZonalResult<()> {
    let row_bytes = layout.row_bytes();
    let samples = layout.samples_in_chunk();
    let sample_bytes = layout.sample_type.bytes();

    match layout.predictor {
        predictor::NONE => Ok(()),
        predictor::HORIZONTAL_DIFFERENCING => {
            if matches!(layout.sample_type, SampleType::Float(_)) {
                return Err(ZonalError::InvalidRaster(
                    "Horizontal differencing predictor on floating-point samples".to_string()
                ));
            }
            for row in bytes.chunks_exact_mut(row_bytes) {
                undo_horizontal_differencing(row, samples, sample_bytes, handler);
            }
            Ok(())
        },
        predictor::FLOATING_POINT => {
            if !matches!(layout.sample_type, SampleType::Float(_)) {
                return Err(ZonalError::InvalidRaster(
                    "Floating-point predictor on integer samples".to_string()
                ));
            }
            for row in bytes.chunks_exact_mut(row_bytes) {
                undo_floating_point(row, samples, sample_bytes, handler.is_big_endian());
            }
            Ok(())
        },
        other => {
            warn!("Unknown predictor {}", other);
            Err(ZonalError::InvalidRaster(format!("Unsupported predictor {}", other)))
        },
    }
}

/// Each sample stores its difference to the same sample of the previous pixel
fn undo_horizontal_differencing(row: &mut [u8], samples: usize, sample_bytes: usize, handler: &dyn ByteOrderHandler) {
    let stride = samples * sample_bytes;

    if sample_bytes == 1 {
        for i in stride..row.len() {
            row[i] = row[i].wrapping_add(row[i - stride]);
        }
        return;
    }

    for i in (stride..row.len()).step_by(sample_bytes) {
        let previous = handler.uint_from(&row[i - stride..], sample_bytes);
        let current = handler.uint_from(&row[i..], sample_bytes);
        handler.write_uint(&mut row[i..], current.wrapping_add(previous), sample_bytes);
    }
}

/// Bytes are differenced across the row, then split into planes from the
/// most significant byte down
fn undo_floating_point(row: &mut [u8], samples: usize, sample_bytes: usize, big_endian: bool) {
    for i in samples..row.len() {
        row[i] = row[i].wrapping_add(row[i - samples]);
    }

    let planes = row.to_vec();
    let count = row.len() / sample_bytes;
    for sample in 0..count {
        for significance in 0..sample_bytes {
            let position = if big_endian { significance } else { sample_bytes - 1 - significance };
            row[sample * sample_bytes + position] = planes[significance * count + sample];
        }
    }
}

/// Pixel-to-map transform from ModelTransformation or tiepoint and scale
fn read_geotransform(stream: &mut TiffStream<'_>, ifd: &Ifd) -> ZonalResult<GeoTransform> {
    let transform = match stream.doubles(ifd, tags::MODEL_TRANSFORMATION_TAG)? {
        Some(m) if m.len() >= 16 => GeoTransform::from_gdal([m[3], m[0], m[1], m[7], m[4], m[5]]),
        _ => {
            let tiepoint = stream.doubles(ifd, tags::MODEL_TIEPOINT_TAG)?;
            let scale = stream.doubles(ifd, tags::MODEL_PIXEL_SCALE_TAG)?;
            match (tiepoint, scale) {
                (Some(t), Some(s)) if t.len() >= 6 && s.len() >= 2 => {
                    GeoTransform::new(t[3] - t[0] * s[0], t[4] + t[1] * s[1], s[0], -s[1])
                },
                _ => return Err(ZonalError::InvalidRaster(
                    "GeoTIFF has neither ModelTransformation nor tiepoint and pixel scale".to_string()
                )),
            }
        },
    };

    let keys = read_geo_keys(stream, ifd)?;
    if geo_key(&keys, geo_keys::GT_RASTER_TYPE) == Some(geo_keys::RASTER_PIXEL_IS_POINT) {
        // Tiepoints reference cell centers; move the origin to the corner
        let (origin_x, origin_y) = transform.pixel_to_geo(-0.5, -0.5);
        debug!("PixelIsPoint raster, origin shifted to ({}, {})", origin_x, origin_y);
        return Ok(GeoTransform { origin_x, origin_y, ..transform });
    }

    Ok(transform)
}

/// Inline GeoKey values as (key, value) pairs
fn read_geo_keys(stream: &mut TiffStream<'_>, ifd: &Ifd) -> ZonalResult<Vec<(u16, u16)>> {
    let directory = match stream.uints(ifd, tags::GEO_KEY_DIRECTORY_TAG)? {
        Some(directory) if directory.len() >= 4 => directory,
        _ => return Ok(Vec::new()),
    };

    let declared = directory[3] as usize;
    let keys = directory[4..].chunks_exact(4)
        .take(declared)
        .filter(|key| key[1] == 0)
        .map(|key| (key[0] as u16, key[3] as u16))
        .collect();
    Ok(keys)
}

fn geo_key(keys: &[(u16, u16)], id: u16) -> Option<u16> {
    keys.iter().find(|(key, _)| *key == id).map(|(_, value)| *value)
}

/// EPSG code of the projected system, else of the geographic one
fn read_epsg_code(stream: &mut TiffStream<'_>, ifd: &Ifd) -> ZonalResult<Option<u16>> {
    let keys = read_geo_keys(stream, ifd)?;
    let usable = |code: &u16| *code != 0 && *code != geo_keys::USER_DEFINED;

    Ok(geo_key(&keys, geo_keys::PROJECTED_CS_TYPE).filter(usable)
        .or_else(|| geo_key(&keys, geo_keys::GEOGRAPHIC_TYPE).filter(usable)))
}

/// No-data sentinel from the GDAL_NODATA ASCII tag; NaN means none
fn read_nodata(stream: &mut TiffStream<'_>, ifd: &Ifd) -> ZonalResult<Option<f64>> {
    let text = match stream.ascii(ifd, tags::GDAL_NODATA)? {
        Some(text) => text,
        None => return Ok(None),
    };

    match text.trim().parse::<f64>() {
        Ok(value) if value.is_nan() => Ok(None),
        Ok(value) => Ok(Some(value)),
        Err(_) => {
            warn!("Ignoring unparsable GDAL_NODATA value {:?}", text);
            Ok(None)
        },
    }
}
