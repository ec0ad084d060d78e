use std::{
    fs,
    path::{Path, PathBuf},
};

use dicom_dictionary_std::tags;
use jpeg_encoder::ColorType;
use log::{debug, info};
use ndarray::{Array2, ArrayViewD, Axis, Ix2, Ix3};

use crate::{
    enums::{ColorRamp, FrameNaming, PhotometricFormat, TrimScope},
    error::{ConversionError, Result},
    raster,
    volume::Volume,
    window::{self, DisplayRange, WindowSpec},
};

/// Options that change how frames are named and windowed
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    pub naming: FrameNaming,
    pub trim_scope: TrimScope,
}

/// A frame that has been written to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFrame {
    /// Zero-based position of the frame in the volume
    pub index: usize,
    pub path: PathBuf,
    /// Display range the samples were clamped to, monochrome frames only
    pub range: Option<DisplayRange>,
}

pub struct FrameRenderer;

impl FrameRenderer {
    /// Render every frame of a volume into `output_dir` with default options
    ///
    /// Frames are written lazily as the returned iterator is advanced.
    pub fn render(
        volume: &Volume,
        format: PhotometricFormat,
        output_dir: impl AsRef<Path>,
    ) -> RenderFrames<'_> {
        Self::render_with_options(volume, format, output_dir, RenderOptions::default())
    }

    pub fn render_with_options(
        volume: &Volume,
        format: PhotometricFormat,
        output_dir: impl AsRef<Path>,
        options: RenderOptions,
    ) -> RenderFrames<'_> {
        RenderFrames::new(volume, format, output_dir.as_ref().to_path_buf(), options)
    }
}

/// Iterator writing one JPEG per frame, in frame order
///
/// The iterator stops after the first error.
pub struct RenderFrames<'a> {
    volume: &'a Volume,
    format: PhotometricFormat,
    output_dir: PathBuf,
    options: RenderOptions,
    ramp: ColorRamp,
    shift: Option<u32>,
    window: Option<WindowSpec>,
    first_frame_range: Option<DisplayRange>,
    next_index: usize,
    failed: bool,
}

impl<'a> RenderFrames<'a> {
    fn new(
        volume: &'a Volume,
        format: PhotometricFormat,
        output_dir: PathBuf,
        options: RenderOptions,
    ) -> Self {
        let ramp = match volume.tag(tags::PHOTOMETRIC_INTERPRETATION) {
            Some(photometric) if photometric.contains("MONOCHROME1") => ColorRamp::Binary,
            _ => ColorRamp::BinaryReversed,
        };
        let window = WindowSpec::from_volume(volume);
        if let Some(window) = window {
            debug!("Using window center {} width {}", window.center, window.width);
        }
        Self {
            volume,
            format,
            output_dir,
            options,
            ramp,
            shift: window::bit_shift(volume),
            window,
            first_frame_range: None,
            next_index: 0,
            failed: false,
        }
    }

    fn output_path(&self, index: usize) -> PathBuf {
        let name = match self.options.naming {
            FrameNaming::Sequential => index,
            FrameNaming::Overwrite => 0,
        };
        self.output_dir.join(format!("{name}.jpg"))
    }

    fn render_frame(&mut self, index: usize) -> Result<RenderedFrame> {
        let volume = self.volume;
        let frame = volume.frame(index).ok_or_else(|| {
            ConversionError::UnsupportedPixelBuffer(format!("frame {index} is out of range"))
        })?;
        if index == 0 {
            fs::create_dir_all(&self.output_dir)?;
        }
        let path = self.output_path(index);

        let range = match self.format {
            PhotometricFormat::Monochrome => Some(self.render_monochrome(frame, &path)?),
            PhotometricFormat::Palette => {
                Self::render_palette(frame, &path)?;
                None
            }
            format => {
                Self::render_color(format, frame, &path)?;
                None
            }
        };

        info!("Wrote frame {index} to {}", path.display());
        Ok(RenderedFrame { index, path, range })
    }

    fn render_monochrome(
        &mut self,
        frame: ArrayViewD<'_, i32>,
        path: &Path,
    ) -> Result<DisplayRange> {
        let samples = window::shift_samples(frame, self.shift)
            .into_dimensionality::<Ix2>()
            .map_err(|_| {
                ConversionError::UnsupportedPixelBuffer(
                    "monochrome frame is not two-dimensional".to_string(),
                )
            })?;
        let range = self.display_range(&samples)?;
        let image = raster::grayscale(&samples.view(), range, self.ramp).ok_or_else(|| {
            ConversionError::UnsupportedPixelBuffer("frame does not fit an image".to_string())
        })?;
        image.save(path)?;
        Ok(range)
    }

    fn display_range(&mut self, samples: &Array2<i32>) -> Result<DisplayRange> {
        if let Some(window) = self.window {
            return Ok(window.range());
        }
        match self.options.trim_scope {
            TrimScope::CurrentFrame => window::trimmed_range(samples),
            TrimScope::FirstFrame => {
                if let Some(range) = self.first_frame_range {
                    return Ok(range);
                }
                let first = self
                    .volume
                    .frame(0)
                    .ok_or(ConversionError::EmptySampleRange)?;
                let range = window::trimmed_range(&window::shift_samples(first, self.shift))?;
                self.first_frame_range = Some(range);
                Ok(range)
            }
        }
    }

    fn render_palette(frame: ArrayViewD<'_, i32>, path: &Path) -> Result<()> {
        let shape = frame.shape().to_vec();
        let unsupported = || {
            ConversionError::UnsupportedPixelBuffer(format!("palette frame of shape {shape:?}"))
        };
        match shape.as_slice() {
            [_, _] | [_, _, 1] => {
                let scalar = if frame.ndim() == 3 {
                    frame.index_axis_move(Axis(2), 0)
                } else {
                    frame
                };
                let scalar = scalar
                    .into_dimensionality::<Ix2>()
                    .map_err(|_| unsupported())?;
                raster::viridis_ramp(&scalar)
                    .ok_or_else(unsupported)?
                    .save(path)?;
            }
            [_, _, 3] | [_, _, 4] => {
                let color = frame
                    .into_dimensionality::<Ix3>()
                    .map_err(|_| unsupported())?;
                raster::clamped_rgb(&color)
                    .ok_or_else(unsupported)?
                    .save(path)?;
            }
            _ => return Err(unsupported()),
        }
        Ok(())
    }

    fn render_color(
        format: PhotometricFormat,
        frame: ArrayViewD<'_, i32>,
        path: &Path,
    ) -> Result<()> {
        if !(format.is_ybr() || format == PhotometricFormat::Rgb) {
            return Err(ConversionError::UnsupportedPixelBuffer(format!(
                "{format:?} frames have no color buffer"
            )));
        }
        let frame = match frame.into_dimensionality::<Ix3>() {
            Ok(frame) if frame.dim().2 == 3 => frame,
            _ => {
                return Err(ConversionError::UnsupportedPixelBuffer(format!(
                    "{format:?} frame needs three channels"
                )));
            }
        };
        let (height, width, _) = frame.dim();
        let (Ok(width), Ok(height)) = (u16::try_from(width), u16::try_from(height)) else {
            return Err(ConversionError::UnsupportedPixelBuffer(format!(
                "{width}x{height} frame exceeds the JPEG size limit"
            )));
        };
        let color_type = if format.is_ybr() {
            ColorType::Ycbcr
        } else {
            ColorType::Rgb
        };
        let bytes = raster::truncated_bytes(&frame);
        raster::write_max_quality_jpeg(path, &bytes, width, height, color_type)?;
        Ok(())
    }
}

impl Iterator for RenderFrames<'_> {
    type Item = Result<RenderedFrame>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.next_index >= self.volume.frame_count() {
            return None;
        }
        let index = self.next_index;
        self.next_index += 1;

        let result = self.render_frame(index);
        self.failed = result.is_err();
        Some(result)
    }
}
