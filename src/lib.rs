//! # DICOM-frames library
//!
//! This crate converts a single DICOM object into one JPEG image per frame.
//!
//! The pixel encoding is resolved once per volume from the shape of the
//! decoded samples and the Photometric Interpretation:
//!  - Volumes without a channel axis are monochrome
//!  - Volumes with a channel axis are palette, RGB or one of the YBR
//!    luma/chroma encodings
//!
//! Monochrome frames are corrected for padding bits and clamped to the
//! window stored in the object. Without a usable window the display range is
//! estimated from the samples, ignoring values more than three standard
//! deviations away from the mean. Palette frames are shown through a default
//! color ramp, RGB and YBR frames are written as stored at maximum JPEG
//! quality.
//!
//! # Examples
//!
//! ## Converting a file into a directory of JPEG files
//!
//! ```no_run
//! # use dicom_frames::{FormatClassifier, FrameRenderer, VolumeLoader};
//! let volume = VolumeLoader::load_from_file("dicom/CT-MONO2-16-ankle.dcm")
//!     .expect("should have loaded the DICOM file");
//! let format = FormatClassifier::classify(&volume)
//!     .expect("should have determined the photometric format");
//! for frame in FrameRenderer::render(&volume, format, "jpg") {
//!     let frame = frame.expect("should have written the frame");
//!     println!("{}", frame.path.display());
//! }
//! ```

pub mod classifier;
pub mod enums;
pub mod error;
pub mod raster;
pub mod renderer;
pub mod volume;
pub mod volume_loader;
pub mod window;

pub use classifier::FormatClassifier;
pub use enums::{ColorRamp, FrameNaming, PhotometricFormat, TrimScope};
pub use error::{ConversionError, Result};
pub use renderer::{FrameRenderer, RenderFrames, RenderOptions, RenderedFrame};
pub use volume::Volume;
pub use volume_loader::VolumeLoader;
pub use window::{DisplayRange, WindowSpec};
