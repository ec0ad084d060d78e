use dicom_dictionary_std::tags;
use log::debug;

use crate::{
    enums::PhotometricFormat,
    error::{ConversionError, Result},
    volume::Volume,
};

/// Photometric interpretation fragments in match order, first hit wins.
///
/// `YBR_FULL` also matches `YBR_FULL_422`.
const PHOTOMETRIC_TABLE: [(&str, PhotometricFormat); 7] = [
    ("PALETTE", PhotometricFormat::Palette),
    ("RGB", PhotometricFormat::Rgb),
    ("YBR_FULL", PhotometricFormat::YbrFull),
    ("YBR_PARTIAL_422", PhotometricFormat::YbrPartial),
    ("YBR_PARTIAL_420", PhotometricFormat::YbrPartial),
    ("YBR_ICT", PhotometricFormat::YbrIct),
    ("YBR_RCT", PhotometricFormat::YbrRct),
];

pub struct FormatClassifier;

impl FormatClassifier {
    /// Resolve the photometric format of a volume
    ///
    /// A volume without a channel axis is always monochrome. A volume with a
    /// channel axis is resolved through its photometric interpretation.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::FormatUndetermined`] if the sample array has
    /// neither 3 nor 4 axes, or the photometric interpretation is missing or
    /// not recognized
    pub fn classify(volume: &Volume) -> Result<PhotometricFormat> {
        let format = match volume.ndim() {
            3 => PhotometricFormat::Monochrome,
            4 => {
                let photometric = volume.tag(tags::PHOTOMETRIC_INTERPRETATION).ok_or_else(|| {
                    ConversionError::FormatUndetermined(
                        "missing photometric interpretation".to_string(),
                    )
                })?;
                Self::match_photometric(photometric).ok_or_else(|| {
                    ConversionError::FormatUndetermined(format!(
                        "unrecognized photometric interpretation `{photometric}`"
                    ))
                })?
            }
            ndim => {
                return Err(ConversionError::FormatUndetermined(format!(
                    "sample array has {ndim} axes"
                )));
            }
        };
        debug!("Classified volume as {format:?}");
        Ok(format)
    }

    fn match_photometric(photometric: &str) -> Option<PhotometricFormat> {
        PHOTOMETRIC_TABLE
            .iter()
            .find(|(fragment, _)| photometric.contains(fragment))
            .map(|&(_, format)| format)
    }
}
