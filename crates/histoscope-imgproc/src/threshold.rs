use num_traits::Zero;
use std::cmp::PartialOrd;

use histoscope_image::{Image, ImageError};

use crate::histogram::{compute_histogram, NUM_BINS};
use crate::parallel;

/// The outcome of a binary threshold applied to a grayscale image.
///
/// `black_count` counts the pixels at or below the threshold and
/// `white_count` the pixels above it, so that
/// `black_count + white_count` equals the pixel count of the image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BinaryPartition {
    /// The threshold value separating the two classes.
    pub threshold: u8,
    /// Number of pixels with intensity at or below the threshold.
    pub black_count: usize,
    /// Number of pixels with intensity above the threshold.
    pub white_count: usize,
}

/// Apply a binary threshold to an image.
///
/// # Arguments
///
/// * `src` - The input image of an arbitrary number of channels and type.
/// * `dst` - The output image of an arbitrary number of channels and type.
/// * `threshold` - The threshold value. Must be the same type as the image.
/// * `max_value` - The maximum value to use when the input value is greater than the threshold.
///
/// # Returns
///
/// The thresholded image with the same number of channels as the input image.
///
/// # Examples
///
/// ```
/// use histoscope_image::{Image, ImageSize};
/// use histoscope_imgproc::threshold::threshold_binary;
///
/// let data = vec![100u8, 200, 50, 150, 200, 250];
/// let image = Image::<_, 1>::new(ImageSize { width: 2, height: 3 }, data).unwrap();
///
/// let mut thresholded = Image::<_, 1>::from_size_val(image.size(), 0).unwrap();
///
/// threshold_binary(&image, &mut thresholded, 100, 255).unwrap();
/// assert_eq!(thresholded.as_slice(), [0, 255, 0, 255, 255, 255]);
/// ```
pub fn threshold_binary<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    threshold: T,
    max_value: T,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync + PartialOrd + Zero,
{
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    // run the thresholding operation in parallel
    parallel::par_iter_rows_val(src, dst, |src_pixel, dst_pixel| {
        *dst_pixel = if *src_pixel > threshold {
            max_value
        } else {
            T::zero()
        };
    });

    Ok(())
}

/// Apply Otsu's thresholding to a grayscale image.
///
/// Selects the threshold that maximizes the inter-class intensity variance
/// between the pixel classes {<= t} and {> t}, using the image's own
/// histogram as the input distribution. When several thresholds reach the
/// same maximal variance, the midpoint of that plateau is used. A constant
/// image has no separable classes and keeps threshold 0 with every pixel
/// in the white class (or black, for an all-zero image).
///
/// # Arguments
///
/// * `src` - The input grayscale image.
/// * `dst` - The output binarized image.
/// * `max_value` - The value assigned to pixels above the threshold.
///
/// # Returns
///
/// The selected threshold together with the black/white pixel counts.
///
/// # Examples
///
/// ```
/// use histoscope_image::{Image, ImageSize};
/// use histoscope_imgproc::threshold::otsu_threshold;
///
/// let data = vec![100u8, 200, 50, 150, 200, 250];
/// let image = Image::<_, 1>::new(
///    ImageSize {
///       width: 2,
///     height: 3,
///   },
///   data,
/// ).unwrap();
///
/// let mut thresholded = Image::<_, 1>::from_size_val(image.size(), 0).unwrap();
///
/// let partition = otsu_threshold(&image, &mut thresholded, 255).unwrap();
///
/// assert_eq!(partition.black_count + partition.white_count, 6);
/// assert_eq!(thresholded.as_slice(), [0, 255, 0, 255, 255, 255]);
/// ```
pub fn otsu_threshold(
    src: &Image<u8, 1>,
    dst: &mut Image<u8, 1>,
    max_value: u8,
) -> Result<BinaryPartition, ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let mut histogram = [0usize; NUM_BINS];
    compute_histogram(src, &mut histogram, NUM_BINS)?;

    let total_pixels = (src.width() * src.height()) as f64;

    // Calculate total sum for mean computation
    let mut sum_total = 0.0;
    for (i, &count) in histogram.iter().enumerate() {
        sum_total += i as f64 * count as f64;
    }

    let mut best_variance = 0.0;
    let mut plateau_first = 0usize;
    let mut plateau_last = 0usize;

    // Initialize accumulators
    let mut weight_back = 0.0;
    let mut sum_back = 0.0;

    // Iterate through all possible thresholds
    for (current_threshold, &hist_count) in histogram.iter().enumerate() {
        // Update background class accumulators
        weight_back += hist_count as f64;
        sum_back += current_threshold as f64 * hist_count as f64;

        // Skip empty classes
        if weight_back == 0.0 || weight_back == total_pixels {
            continue;
        }

        // Calculate means for both classes
        let mean_back = sum_back / weight_back;
        let weight_fore = total_pixels - weight_back;
        let sum_fore = sum_total - sum_back;
        let mean_fore = sum_fore / weight_fore;

        // Calculate between-class variance
        let variance = weight_back * weight_fore * (mean_back - mean_fore).powi(2);

        // Track the plateau of maximal variance
        if variance > best_variance {
            best_variance = variance;
            plateau_first = current_threshold;
            plateau_last = current_threshold;
        } else if variance == best_variance && best_variance > 0.0 {
            plateau_last = current_threshold;
        }
    }

    let best_threshold = ((plateau_first + plateau_last) / 2) as u8;

    // Apply the threshold to the image
    threshold_binary(src, dst, best_threshold, max_value)?;

    let black_count = histogram[..=best_threshold as usize].iter().sum::<usize>();
    let white_count = src.width() * src.height() - black_count;

    Ok(BinaryPartition {
        threshold: best_threshold,
        black_count,
        white_count,
    })
}

#[cfg(test)]
mod tests {
    use histoscope_image::{Image, ImageError, ImageSize};

    #[test]
    fn threshold_binary() -> Result<(), ImageError> {
        let data = vec![100u8, 200, 50, 150, 200, 250];
        let data_expected = [0u8, 255, 0, 255, 255, 255];
        let image = Image::<_, 1>::new(
            ImageSize {
                width: 2,
                height: 3,
            },
            data,
        )?;

        let mut thresholded = Image::<_, 1>::from_size_val(image.size(), 0)?;

        super::threshold_binary(&image, &mut thresholded, 100, 255)?;

        assert_eq!(thresholded.num_channels(), 1);
        assert_eq!(thresholded.size().width, 2);
        assert_eq!(thresholded.size().height, 3);

        assert_eq!(thresholded.as_slice(), data_expected);

        Ok(())
    }

    #[test]
    fn test_otsu_threshold() -> Result<(), ImageError> {
        let data = vec![100u8, 200, 50, 150, 200, 250];
        let data_expected = [0u8, 255, 0, 255, 255, 255];
        let image = Image::<_, 1>::new(
            ImageSize {
                width: 2,
                height: 3,
            },
            data,
        )?;

        let mut thresholded = Image::<_, 1>::from_size_val(image.size(), 0)?;

        let partition = super::otsu_threshold(&image, &mut thresholded, 255)?;

        assert_eq!(thresholded.as_slice(), data_expected);
        assert_eq!(partition.black_count, 2);
        assert_eq!(partition.white_count, 4);

        Ok(())
    }

    #[test]
    fn test_otsu_bimodal() -> Result<(), ImageError> {
        // two well separated clusters: half the pixels at 10, half at 240
        let mut data = vec![10u8; 32];
        data.extend(vec![240u8; 32]);
        let image = Image::<_, 1>::new(
            ImageSize {
                width: 8,
                height: 8,
            },
            data,
        )?;

        let mut thresholded = Image::<_, 1>::from_size_val(image.size(), 0)?;

        let partition = super::otsu_threshold(&image, &mut thresholded, 255)?;

        // the threshold falls strictly between the cluster means
        assert!(partition.threshold > 10);
        assert!(partition.threshold < 240);

        // the partition splits exactly along the cluster boundary
        assert_eq!(partition.black_count, 32);
        assert_eq!(partition.white_count, 32);
        assert_eq!(
            partition.black_count + partition.white_count,
            image.numel()
        );

        let n_white = thresholded.as_slice().iter().filter(|&&p| p == 255).count();
        assert_eq!(n_white, 32);

        Ok(())
    }

    #[test]
    fn test_otsu_constant_image() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::from_size_val(
            ImageSize {
                width: 4,
                height: 4,
            },
            42,
        )?;

        let mut thresholded = Image::<_, 1>::from_size_val(image.size(), 0)?;

        let partition = super::otsu_threshold(&image, &mut thresholded, 255)?;

        // degenerate variance case: defined threshold, all pixels in one class
        assert_eq!(partition.threshold, 0);
        assert_eq!(partition.black_count, 0);
        assert_eq!(partition.white_count, 16);

        Ok(())
    }

    #[test]
    fn test_otsu_all_zero_image() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::from_size_val(
            ImageSize {
                width: 4,
                height: 4,
            },
            0,
        )?;

        let mut thresholded = Image::<_, 1>::from_size_val(image.size(), 0)?;

        let partition = super::otsu_threshold(&image, &mut thresholded, 255)?;

        assert_eq!(partition.threshold, 0);
        assert_eq!(partition.black_count, 16);
        assert_eq!(partition.white_count, 0);
        assert!(thresholded.as_slice().iter().all(|&p| p == 0));

        Ok(())
    }
}
