use thiserror::Error;

/// Result type for frame conversion
pub type Result<T> = std::result::Result<T, ConversionError>;

#[derive(Debug, Error)]
pub enum ConversionError {
    /// The photometric format of the volume could not be resolved
    #[error("Photometric format could not be determined: {0}")]
    FormatUndetermined(String),

    /// A frame could not be mapped into a renderable pixel buffer
    #[error("Unsupported pixel buffer: {0}")]
    UnsupportedPixelBuffer(String),

    /// Outlier trimming left no samples to derive a display range from
    #[error("No samples left to compute a display range")]
    EmptySampleRange,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("DICOM error: {0}")]
    Dicom(#[from] dicom::object::ReadError),

    #[error("Pixel data error: {0}")]
    PixelData(#[from] dicom::pixeldata::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JPEG encoding error: {0}")]
    JpegEncoding(#[from] jpeg_encoder::EncodingError),
}
