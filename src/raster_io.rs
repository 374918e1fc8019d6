//! Raster loading
//!
//! Decodes TIFF/GeoTIFF files into `(rows, columns, bands)` arrays of `f32`.
//! Geospatial tags are not interpreted; only the pixel grid, band count and
//! sample format are consumed.

use crate::errors::{BandStatsError, Result};
use ndarray::Array3;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use tiff::decoder::{Decoder, DecodingResult, Limits};
use tiff::tags::Tag;
use tiff::ColorType;

/// One decoded image, ready for accumulation
#[derive(Debug, Clone)]
pub struct RasterSample {
    /// Pixel values indexed `(row, column, band)`
    pub data: Array3<f32>,
    /// Sample type as stored in the file, before the cast to f32
    pub source_type: &'static str,
}

impl RasterSample {
    #[must_use]
    pub fn new(data: Array3<f32>, source_type: &'static str) -> Self {
        Self { data, source_type }
    }

    #[must_use]
    pub fn bands(&self) -> usize {
        self.data.dim().2
    }
}

/// Source of image samples for the batch driver
pub trait SampleLoader {
    /// Read the file at `path` into memory
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or decoded, or if the
    /// decoded buffer does not match the declared shape.
    fn load(&self, path: &Path) -> Result<RasterSample>;
}

/// Loader backed by the `tiff` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct TiffLoader;

impl SampleLoader for TiffLoader {
    fn load(&self, path: &Path) -> Result<RasterSample> {
        read_tiff_sample(path)
    }
}

/// Storage order of multi-band pixel data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandLayout {
    /// Band values of a pixel are adjacent (`PlanarConfiguration = 1`)
    Interleaved,
    /// Each band is stored as a full plane (`PlanarConfiguration = 2`)
    Planar,
}

/// Read a TIFF file from disk
///
/// # Errors
///
/// See [`decode_tiff_sample`].
pub fn read_tiff_sample(path: impl AsRef<Path>) -> Result<RasterSample> {
    let file = File::open(path.as_ref())?;
    decode_tiff_sample(BufReader::new(file))
}

/// Decode a TIFF from any `Read + Seek` source
///
/// All planes of band-sequential files are read and reordered to
/// pixel-interleaved.
///
/// # Errors
///
/// Returns a `TiffError` for corrupt or unsupported input,
/// `UnsupportedFormat` when not every plane could be decoded, and
/// `ReshapeError` when the pixel buffer does not fit `rows * cols * bands`.
pub fn decode_tiff_sample<R: Read + Seek>(reader: R) -> Result<RasterSample> {
    let mut decoder = Decoder::new(reader)?.with_limits(Limits::unlimited());

    let (width, height) = decoder.dimensions()?;
    let color_type = decoder.colortype()?;
    let bands = band_count(color_type);
    let layout = match decoder.get_tag_u32(Tag::PlanarConfiguration) {
        Ok(2) => BandLayout::Planar,
        _ => BandLayout::Interleaved,
    };

    let stored: Option<usize> = decoder.find_tag_unsigned(Tag::SamplesPerPixel)?;
    if let Some(stored) = stored.filter(|&n| n > bands) {
        log::warn!(
            "{:?} image stores {} samples per pixel, only {} are decoded",
            color_type,
            stored,
            bands
        );
    }

    let mut result = DecodingResult::F32(Vec::new());
    let buffer = decoder.read_image_to_buffer(&mut result)?;
    if result.as_buffer(0).as_bytes().len() < buffer.complete_len {
        return Err(BandStatsError::UnsupportedFormat(format!(
            "only the first of {} planes could be decoded",
            bands
        )));
    }

    let (values, source_type) = decoded_to_f32(result)?;
    let data = sample_from_vec(values, height as usize, width as usize, bands, layout)?;

    Ok(RasterSample::new(data, source_type))
}

/// Samples per pixel in the decoded buffer
fn band_count(color_type: ColorType) -> usize {
    usize::from(color_type.num_samples())
}

/// Cast any numeric decoding result to f32, returning the stored type name
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn decoded_to_f32(result: DecodingResult) -> Result<(Vec<f32>, &'static str)> {
    let converted = match result {
        DecodingResult::U8(buf) => (buf.into_iter().map(f32::from).collect(), "uint8"),
        DecodingResult::U16(buf) => (buf.into_iter().map(f32::from).collect(), "uint16"),
        DecodingResult::U32(buf) => (buf.into_iter().map(|v| v as f32).collect(), "uint32"),
        DecodingResult::U64(buf) => (buf.into_iter().map(|v| v as f32).collect(), "uint64"),
        DecodingResult::I8(buf) => (buf.into_iter().map(f32::from).collect(), "int8"),
        DecodingResult::I16(buf) => (buf.into_iter().map(f32::from).collect(), "int16"),
        DecodingResult::I32(buf) => (buf.into_iter().map(|v| v as f32).collect(), "int32"),
        DecodingResult::I64(buf) => (buf.into_iter().map(|v| v as f32).collect(), "int64"),
        DecodingResult::F32(buf) => (buf, "float32"),
        DecodingResult::F64(buf) => (buf.into_iter().map(|v| v as f32).collect(), "float64"),
        #[allow(unreachable_patterns)]
        _ => {
            return Err(BandStatsError::UnsupportedFormat(
                "unsupported TIFF sample format".to_string(),
            ))
        }
    };
    Ok(converted)
}

/// Shape a flat pixel buffer into `(rows, cols, bands)`
///
/// Planar buffers are reordered from band-sequential to pixel-interleaved.
///
/// # Errors
///
/// Returns `ReshapeError` if `values.len() != rows * cols * bands`.
pub fn sample_from_vec(
    values: Vec<f32>,
    rows: usize,
    cols: usize,
    bands: usize,
    layout: BandLayout,
) -> Result<Array3<f32>> {
    if values.len() != rows * cols * bands {
        return Err(BandStatsError::ReshapeError {
            len: values.len(),
            rows,
            cols,
            bands,
        });
    }

    match layout {
        BandLayout::Interleaved => Ok(Array3::from_shape_vec((rows, cols, bands), values)?),
        BandLayout::Planar => {
            let planes = Array3::from_shape_vec((bands, rows, cols), values)?;
            Ok(planes
                .permuted_axes([1, 2, 0])
                .as_standard_layout()
                .into_owned())
        }
    }
}
