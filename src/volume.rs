use std::collections::BTreeMap;

use dicom::core::Tag;
use ndarray::{ArrayD, ArrayViewD, Axis};

/// Raw samples of one DICOM object plus the tags needed to render them.
///
/// Samples are laid out as (frame, row, column) for single-sample volumes
/// and (frame, row, column, channel) otherwise.
#[derive(Debug, Clone, Default)]
pub struct Volume {
    pub samples: ArrayD<i32>,
    pub tags: BTreeMap<Tag, String>,
}

impl Volume {
    pub fn new(samples: ArrayD<i32>, tags: BTreeMap<Tag, String>) -> Self {
        Self { samples, tags }
    }

    /// Number of axes of the sample array
    pub fn ndim(&self) -> usize {
        self.samples.ndim()
    }

    /// Number of frames in the volume
    pub fn frame_count(&self) -> usize {
        if self.samples.ndim() == 0 {
            return 0;
        }
        self.samples.len_of(Axis(0))
    }

    /// Get a view of the frame at `index`, or `None` when out of range
    pub fn frame(&self, index: usize) -> Option<ArrayViewD<'_, i32>> {
        (index < self.frame_count()).then(|| self.samples.index_axis(Axis(0), index))
    }

    /// Get the trimmed string value of a tag
    pub fn tag(&self, tag: Tag) -> Option<&str> {
        self.tags.get(&tag).map(|value| value.trim())
    }

    /// Get a tag value parsed as an integer
    pub fn int_tag(&self, tag: Tag) -> Option<i32> {
        self.tag(tag).and_then(|value| value.parse().ok())
    }

    /// Get a tag value parsed as a floating point number
    pub fn float_tag(&self, tag: Tag) -> Option<f64> {
        self.tag(tag)
            .and_then(|value| value.parse::<f64>().ok())
            .filter(|value| value.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dicom_dictionary_std::tags;
    use ndarray::{Array3, Array4};

    #[test]
    fn frames_are_indexed_along_the_first_axis() {
        let mut samples = Array3::<i32>::zeros((2, 3, 4));
        samples[[1, 2, 3]] = 7;
        let volume = Volume::new(samples.into_dyn(), BTreeMap::new());

        assert_eq!(volume.ndim(), 3);
        assert_eq!(volume.frame_count(), 2);
        let frame = volume.frame(1).unwrap();
        assert_eq!(frame.shape(), &[3, 4]);
        assert_eq!(frame[[2, 3]], 7);
        assert!(volume.frame(2).is_none());
    }

    #[test]
    fn color_frames_keep_their_channel_axis() {
        let samples = Array4::<i32>::zeros((1, 2, 2, 3));
        let volume = Volume::new(samples.into_dyn(), BTreeMap::new());

        assert_eq!(volume.frame(0).unwrap().shape(), &[2, 2, 3]);
    }

    #[test]
    fn numeric_tags_are_parsed_after_trimming() {
        let tags = BTreeMap::from([
            (tags::BITS_STORED, "12 ".to_string()),
            (tags::WINDOW_CENTER, " 40.5".to_string()),
            (tags::WINDOW_WIDTH, "40\\400".to_string()),
        ]);
        let volume = Volume::new(ArrayD::zeros(vec![1, 1, 1]), tags);

        assert_eq!(volume.int_tag(tags::BITS_STORED), Some(12));
        assert_eq!(volume.float_tag(tags::WINDOW_CENTER), Some(40.5));
        assert_eq!(volume.float_tag(tags::WINDOW_WIDTH), None);
        assert_eq!(volume.tag(tags::HIGH_BIT), None);
    }
}
