//! Display range selection for monochrome frames.
//!
//! A frame is clamped either to the window stored in the volume or, when the
//! volume has no usable window, to the range of its samples with outliers
//! beyond three standard deviations removed.

use dicom_dictionary_std::tags;
use log::debug;
use ndarray::{ArrayBase, ArrayD, ArrayViewD, Data, Dimension};

use crate::{
    error::{ConversionError, Result},
    volume::Volume,
};

const OUTLIER_SIGMAS: f64 = 3.0;

/// Inclusive range of sample values mapped onto the color ramp
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayRange {
    pub min: i32,
    pub max: i32,
}

impl DisplayRange {
    pub fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }
}

/// Window center and width read from the volume, both rounded to integers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSpec {
    pub center: i64,
    pub width: i64,
}

impl WindowSpec {
    /// Read the window from the volume tags
    ///
    /// Returns `None` unless both center and width are present and numeric.
    pub fn from_volume(volume: &Volume) -> Option<Self> {
        let center = volume.float_tag(tags::WINDOW_CENTER).map(round_half_even);
        let width = volume.float_tag(tags::WINDOW_WIDTH).map(round_half_even);
        match (center, width) {
            (Some(center), Some(width)) => Some(Self {
                center: center as i64,
                width: width as i64,
            }),
            _ => None,
        }
    }

    pub fn range(&self) -> DisplayRange {
        let half = self.width as f64 / 2.0;
        let center = self.center as f64;
        DisplayRange::new(
            saturate(round_half_even(center - half)),
            saturate(round_half_even(center + half)),
        )
    }
}

/// Number of low-order padding bits to drop, if any
///
/// Computed as `high_bit + 1 - bits_stored`. Missing or non-numeric tags
/// disable the correction.
pub fn bit_shift(volume: &Volume) -> Option<u32> {
    let bits_stored = volume.int_tag(tags::BITS_STORED);
    let high_bit = volume.int_tag(tags::HIGH_BIT);
    match (bits_stored, high_bit) {
        (Some(bits_stored), Some(high_bit)) => {
            let shift = i64::from(high_bit) + 1 - i64::from(bits_stored);
            u32::try_from(shift).ok().filter(|&shift| shift > 0)
        }
        _ => {
            debug!("Bits stored or high bit missing, samples are not shifted");
            None
        }
    }
}

/// Arithmetic right shift of every sample by `shift` bits
pub fn shift_samples(samples: ArrayViewD<'_, i32>, shift: Option<u32>) -> ArrayD<i32> {
    match shift {
        Some(shift) => samples.mapv(|value| value >> shift.min(31)),
        None => samples.to_owned(),
    }
}

/// Minimum and maximum of the samples within three standard deviations of
/// the mean
///
/// # Errors
///
/// Returns [`ConversionError::EmptySampleRange`] for an empty input or when no
/// sample survives the trimming
pub fn trimmed_range<S, D>(samples: &ArrayBase<S, D>) -> Result<DisplayRange>
where
    S: Data<Elem = i32>,
    D: Dimension,
{
    if samples.is_empty() {
        return Err(ConversionError::EmptySampleRange);
    }
    let count = samples.len() as f64;
    let mean = samples.iter().map(|&v| v as f64).sum::<f64>() / count;
    let variance = samples
        .iter()
        .map(|&v| {
            let delta = v as f64 - mean;
            delta * delta
        })
        .sum::<f64>()
        / count;
    let deviation = variance.sqrt();
    if !mean.is_finite() || !deviation.is_finite() {
        return Err(ConversionError::EmptySampleRange);
    }

    let lower = mean - OUTLIER_SIGMAS * deviation;
    let upper = mean + OUTLIER_SIGMAS * deviation;
    let (min, max) = samples
        .iter()
        .copied()
        .filter(|&v| (lower..=upper).contains(&(v as f64)))
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((min, max)) => Some((v.min(min), v.max(max))),
        })
        .ok_or(ConversionError::EmptySampleRange)?;

    debug!("Trimmed range [{min}, {max}] (mean {mean:.2}, sd {deviation:.2})");
    Ok(DisplayRange::new(min, max))
}

/// Round to the nearest integer, ties to even
fn round_half_even(value: f64) -> f64 {
    value.round_ties_even()
}

fn saturate(value: f64) -> i32 {
    value.clamp(i32::MIN as f64, i32::MAX as f64) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use dicom::core::Tag;
    use ndarray::{Array1, Array2, array};
    use std::collections::BTreeMap;

    fn volume_with_tags(entries: &[(Tag, &str)]) -> Volume {
        let tags = entries
            .iter()
            .map(|&(tag, value)| (tag, value.to_string()))
            .collect::<BTreeMap<_, _>>();
        Volume::new(ArrayD::zeros(vec![1, 2, 2]), tags)
    }

    #[test]
    fn constant_samples_give_degenerate_range() {
        let samples = Array2::from_elem((4, 4), 37);
        assert_eq!(trimmed_range(&samples).unwrap(), DisplayRange::new(37, 37));
    }

    #[test]
    fn extreme_outlier_is_excluded() {
        let mut samples = Array1::<i32>::zeros(20);
        samples[19] = 100;
        let range = trimmed_range(&samples).unwrap();
        assert_eq!(range.min, 0);
        assert!(range.max < 100);
    }

    #[test]
    fn five_sample_outlier_stays_within_three_sigma() {
        // With only four low samples the outlier sits at exactly 2 sigma.
        let samples = array![0, 0, 0, 0, 100];
        assert_eq!(trimmed_range(&samples).unwrap(), DisplayRange::new(0, 100));
    }

    #[test]
    fn empty_samples_fail() {
        let samples = Array1::<i32>::zeros(0);
        assert!(matches!(
            trimmed_range(&samples),
            Err(ConversionError::EmptySampleRange)
        ));
    }

    #[test]
    fn window_defines_range() {
        let volume =
            volume_with_tags(&[(tags::WINDOW_CENTER, "50"), (tags::WINDOW_WIDTH, "100")]);
        let window = WindowSpec::from_volume(&volume).unwrap();
        assert_eq!(window.range(), DisplayRange::new(0, 100));
    }

    #[test]
    fn window_values_round_half_to_even() {
        let volume =
            volume_with_tags(&[(tags::WINDOW_CENTER, "40.5"), (tags::WINDOW_WIDTH, "401")]);
        let window = WindowSpec::from_volume(&volume).unwrap();
        assert_eq!(window, WindowSpec { center: 40, width: 401 });
        // 40 +/- 200.5
        assert_eq!(window.range(), DisplayRange::new(-160, 240));
    }

    #[test]
    fn partial_window_is_ignored() {
        let only_center = volume_with_tags(&[(tags::WINDOW_CENTER, "50")]);
        let bad_width =
            volume_with_tags(&[(tags::WINDOW_CENTER, "50"), (tags::WINDOW_WIDTH, "wide")]);
        assert!(WindowSpec::from_volume(&only_center).is_none());
        assert!(WindowSpec::from_volume(&bad_width).is_none());
    }

    #[test]
    fn padding_bits_are_shifted_out() {
        let volume = volume_with_tags(&[(tags::BITS_STORED, "12"), (tags::HIGH_BIT, "15")]);
        let shift = bit_shift(&volume);
        assert_eq!(shift, Some(4));

        let samples = ArrayD::from_elem(vec![1, 1], 4096);
        assert_eq!(shift_samples(samples.view(), shift)[[0, 0]], 256);
    }

    #[test]
    fn aligned_samples_are_not_shifted() {
        let aligned = volume_with_tags(&[(tags::BITS_STORED, "12"), (tags::HIGH_BIT, "11")]);
        let missing = volume_with_tags(&[(tags::BITS_STORED, "12")]);
        assert_eq!(bit_shift(&aligned), None);
        assert_eq!(bit_shift(&missing), None);
    }

    #[test]
    fn extreme_bit_tags_do_not_overflow() {
        let huge_high_bit = volume_with_tags(&[
            (tags::BITS_STORED, "-2147483648"),
            (tags::HIGH_BIT, "2147483647"),
        ]);
        let huge_bits_stored = volume_with_tags(&[
            (tags::BITS_STORED, "2147483647"),
            (tags::HIGH_BIT, "-2147483648"),
        ]);

        assert_eq!(bit_shift(&huge_high_bit), None);
        assert_eq!(bit_shift(&huge_bits_stored), None);
    }

    #[test]
    fn shift_is_arithmetic() {
        let samples = ArrayD::from_elem(vec![1], -32);
        assert_eq!(shift_samples(samples.view(), Some(4))[[0]], -2);
    }
}
