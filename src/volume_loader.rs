use crate::{error::Result, volume::Volume};

use dicom::{
    core::Tag,
    object::{FileDicomObject, InMemDicomObject, open_file},
    pixeldata::{ConvertOptions, ModalityLutOption, PixelDecoder},
};
use dicom_dictionary_std::tags;
use log::debug;
use ndarray::{ArrayD, Axis};
use std::{collections::BTreeMap, path::Path};

/// Tags copied from the DICOM object into the volume
const VOLUME_TAGS: [Tag; 9] = [
    tags::PHOTOMETRIC_INTERPRETATION,
    tags::SAMPLES_PER_PIXEL,
    tags::NUMBER_OF_FRAMES,
    tags::BITS_ALLOCATED,
    tags::BITS_STORED,
    tags::HIGH_BIT,
    tags::PIXEL_REPRESENTATION,
    tags::WINDOW_CENTER,
    tags::WINDOW_WIDTH,
];

pub struct VolumeLoader;

impl VolumeLoader {
    /// Load a volume from a DICOM file
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or its pixel data cannot be
    /// decoded
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Volume> {
        let dicom_object = open_file(path.as_ref())?;
        Self::load_from_dicom_object(&dicom_object)
    }

    /// Load a volume from a DICOM object
    ///
    /// Samples are kept as stored, without rescale or VOI LUT. Volumes with a
    /// single sample per pixel drop their channel axis, except palette ones.
    pub fn load_from_dicom_object(
        dicom_object: &FileDicomObject<InMemDicomObject>,
    ) -> Result<Volume> {
        let tags = Self::extract_tags(dicom_object);
        let samples = Self::decode_samples(dicom_object)?;
        let is_palette = tags
            .get(&tags::PHOTOMETRIC_INTERPRETATION)
            .is_some_and(|photometric| photometric.contains("PALETTE"));
        let samples = Self::drop_single_channel(samples, is_palette);
        debug!("Loaded samples with shape {:?}", samples.shape());

        Ok(Volume::new(samples, tags))
    }

    fn extract_tags(dicom_object: &FileDicomObject<InMemDicomObject>) -> BTreeMap<Tag, String> {
        VOLUME_TAGS
            .iter()
            .filter_map(|&tag| {
                let value = dicom_object.element(tag).ok()?.to_str().ok()?;
                Some((tag, value.trim().to_string()))
            })
            .collect()
    }

    fn decode_samples(dicom_object: &FileDicomObject<InMemDicomObject>) -> Result<ArrayD<i32>> {
        let pixel_data = dicom_object.decode_pixel_data()?;
        let options = ConvertOptions::new().with_modality_lut(ModalityLutOption::None);
        Ok(pixel_data.to_ndarray_with_options::<i32>(&options)?.into_dyn())
    }

    /// (frame, row, column, sample) to (frame, row, column) for single
    /// sample volumes
    fn drop_single_channel(samples: ArrayD<i32>, keep_channel: bool) -> ArrayD<i32> {
        if !keep_channel && samples.ndim() == 4 && samples.shape()[3] == 1 {
            samples.index_axis_move(Axis(3), 0)
        } else {
            samples
        }
    }
}
