//! Conversion of frame samples into 8-bit raster buffers and JPEG files.

use std::path::Path;

use image::{GrayImage, ImageBuffer, Luma, Rgb, RgbImage};
use jpeg_encoder::{ColorType, Encoder, EncodingError, SamplingFactor};
use ndarray::{ArrayView2, ArrayView3, Axis};
use rayon::prelude::*;

use crate::{enums::ColorRamp, window::DisplayRange};

/// Quality used for color frames, the encoder's upper bound
pub const MAX_JPEG_QUALITY: u8 = 100;

// Anchors of the viridis ramp at 0, 0.25, 0.5, 0.75 and 1
const VIRIDIS: [[f32; 3]; 5] = [
    [68.0, 1.0, 84.0],
    [59.0, 82.0, 139.0],
    [33.0, 145.0, 140.0],
    [94.0, 201.0, 98.0],
    [253.0, 231.0, 37.0],
];

/// Position of `value` within `range`, clamped to [0, 1]
#[inline]
fn normalize(value: i32, range: DisplayRange) -> f32 {
    if range.max <= range.min {
        return 0.0;
    }
    let span = range.max as f64 - range.min as f64;
    ((value as f64 - range.min as f64) / span).clamp(0.0, 1.0) as f32
}

#[inline]
fn to_u8(unit: f32) -> u8 {
    (unit * 255.0).round().clamp(0.0, 255.0) as u8
}

#[inline]
fn viridis(unit: f32) -> [u8; 3] {
    let scaled = unit * (VIRIDIS.len() - 1) as f32;
    let lower = (scaled.floor() as usize).min(VIRIDIS.len() - 2);
    let t = scaled - lower as f32;
    let (from, to) = (VIRIDIS[lower], VIRIDIS[lower + 1]);
    [0, 1, 2].map(|c| (from[c] + (to[c] - from[c]) * t).round().clamp(0.0, 255.0) as u8)
}

/// Map a scalar frame onto a grayscale ramp, clamping to `range`
pub fn grayscale(
    frame: &ArrayView2<'_, i32>,
    range: DisplayRange,
    ramp: ColorRamp,
) -> Option<GrayImage> {
    let (height, width) = frame.dim();
    let pixel_data: Vec<u8> = frame
        .into_par_iter()
        .map(|&v| {
            let unit = normalize(v, range);
            match ramp {
                ColorRamp::Binary => to_u8(1.0 - unit),
                ColorRamp::BinaryReversed => to_u8(unit),
            }
        })
        .collect();
    ImageBuffer::<Luma<u8>, _>::from_raw(width as u32, height as u32, pixel_data)
}

/// Map a scalar frame onto the viridis ramp, scaled to its own extent
pub fn viridis_ramp(frame: &ArrayView2<'_, i32>) -> Option<RgbImage> {
    let (height, width) = frame.dim();
    let min = frame.iter().copied().min().unwrap_or_default();
    let max = frame.iter().copied().max().unwrap_or_default();
    let range = DisplayRange::new(min, max);
    let pixel_data: Vec<u8> = frame
        .into_par_iter()
        .flat_map_iter(|&v| viridis(normalize(v, range)))
        .collect();
    ImageBuffer::<Rgb<u8>, _>::from_raw(width as u32, height as u32, pixel_data)
}

/// Show the first three channels of a frame as RGB, clamped to [0, 255]
pub fn clamped_rgb(frame: &ArrayView3<'_, i32>) -> Option<RgbImage> {
    let (height, width, _) = frame.dim();
    let pixel_data: Vec<u8> = frame
        .lanes(Axis(2))
        .into_iter()
        .flat_map(|pixel| [0, 1, 2].map(|c| pixel[c].clamp(0, 255) as u8))
        .collect();
    ImageBuffer::from_raw(width as u32, height as u32, pixel_data)
}

/// Reinterpret three-channel samples as bytes, keeping the low eight bits
pub fn truncated_bytes(frame: &ArrayView3<'_, i32>) -> Vec<u8> {
    frame.iter().map(|&v| v as u8).collect()
}

/// Write interleaved 8-bit triplets as a maximum quality JPEG
///
/// `color_type` is either [`ColorType::Rgb`] or [`ColorType::Ycbcr`]. YCbCr
/// triplets become the JPEG components unchanged and chroma is never
/// subsampled.
pub fn write_max_quality_jpeg(
    path: &Path,
    bytes: &[u8],
    width: u16,
    height: u16,
    color_type: ColorType,
) -> Result<(), EncodingError> {
    let mut encoder = Encoder::new_file(path, MAX_JPEG_QUALITY)?;
    encoder.set_sampling_factor(SamplingFactor::F_1_1);
    encoder.set_optimized_huffman_tables(true);
    encoder.encode(bytes, width, height, color_type)
}
