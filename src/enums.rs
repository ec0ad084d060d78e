/// Pixel encoding of a volume, resolved once from its sample layout and
/// photometric interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotometricFormat {
    Monochrome,
    Palette,
    Rgb,
    YbrFull,
    YbrPartial,
    YbrIct,
    YbrRct,
}

impl PhotometricFormat {
    /// Whether frames of this format are luma/chroma triplets
    pub fn is_ybr(&self) -> bool {
        matches!(
            self,
            Self::YbrFull | Self::YbrPartial | Self::YbrIct | Self::YbrRct
        )
    }
}

/// Grayscale ramp used to map monochrome samples onto display intensities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorRamp {
    /// Low values bright, high values dark (MONOCHROME1)
    Binary,
    /// Low values dark, high values bright
    BinaryReversed,
}

/// How output files are numbered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FrameNaming {
    /// `<frame index>.jpg`, counting from zero across the volume
    #[default]
    Sequential,
    /// Every frame is written to `0.jpg`, the last frame wins
    Overwrite,
}

/// Which samples the outlier-trimmed display range is computed from when
/// the volume carries no usable window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TrimScope {
    /// Computed once from the first frame and reused for every frame
    #[default]
    FirstFrame,
    /// Computed from each frame being rendered
    CurrentFrame,
}
