use histoscope_image::{Image, ImageError};

use crate::histogram::{compute_histogram, cumulative_histogram, NUM_BINS};
use crate::parallel;

/// Equalize the histogram of a grayscale image.
///
/// Remaps each intensity level through the cumulative distribution function
/// of the input histogram, scaled to the full [0, 255] range:
///
/// lut\[i\] = round((cdf\[i\] - cdf_min) / (total - cdf_min) * 255)
///
/// where `cdf_min` is the first non-zero value of the cumulative histogram.
/// A constant image has `total == cdf_min` and is copied through unchanged.
///
/// # Arguments
///
/// * `src` - The input grayscale image.
/// * `dst` - The output equalized image.
///
/// Precondition: the input and output images must have the same size.
///
/// # Example
///
/// ```
/// use histoscope_image::{Image, ImageSize};
/// use histoscope_imgproc::enhance::equalize_histogram;
///
/// let image = Image::<u8, 1>::new(
///     ImageSize {
///         width: 2,
///         height: 2,
///     },
///     vec![100, 100, 101, 102],
/// )
/// .unwrap();
///
/// let mut equalized = Image::<u8, 1>::from_size_val(image.size(), 0).unwrap();
///
/// equalize_histogram(&image, &mut equalized).unwrap();
/// assert_eq!(equalized.as_slice(), [0, 0, 128, 255]);
/// ```
pub fn equalize_histogram(src: &Image<u8, 1>, dst: &mut Image<u8, 1>) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let mut hist = [0usize; NUM_BINS];
    compute_histogram(src, &mut hist, NUM_BINS)?;

    let mut cdf = [0usize; NUM_BINS];
    cumulative_histogram(&hist, &mut cdf)?;

    let total = src.width() * src.height();
    let cdf_min = cdf.iter().find(|&&c| c > 0).copied().unwrap_or(0);

    // constant (or empty) image: the remap degenerates to the identity
    if total == cdf_min {
        dst.as_slice_mut().copy_from_slice(src.as_slice());
        return Ok(());
    }

    let scale = 255.0 / (total - cdf_min) as f64;
    let mut lut = [0u8; NUM_BINS];
    for (i, out) in lut.iter_mut().enumerate() {
        *out = ((cdf[i].saturating_sub(cdf_min)) as f64 * scale).round() as u8;
    }

    parallel::par_iter_rows_val(src, dst, |src_pixel, dst_pixel| {
        *dst_pixel = lut[*src_pixel as usize];
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use histoscope_image::{Image, ImageError, ImageSize};

    use crate::histogram::{compute_histogram, NUM_BINS};
    use crate::metrics::histogram_std;

    fn clustered_image() -> Result<Image<u8, 1>, ImageError> {
        // low contrast image: intensities packed into [100, 110]
        let mut data = Vec::with_capacity(11 * 16);
        for v in 100u8..=110 {
            data.extend(std::iter::repeat(v).take(16));
        }
        Image::new(
            ImageSize {
                width: 11,
                height: 16,
            },
            data,
        )
    }

    #[test]
    fn test_equalize_spreads_clustered_histogram() -> Result<(), ImageError> {
        let image = clustered_image()?;
        let mut equalized = Image::<u8, 1>::from_size_val(image.size(), 0)?;

        super::equalize_histogram(&image, &mut equalized)?;

        let mut hist_src = [0usize; NUM_BINS];
        compute_histogram(&image, &mut hist_src, NUM_BINS)?;

        let mut hist_eq = [0usize; NUM_BINS];
        compute_histogram(&equalized, &mut hist_eq, NUM_BINS)?;

        // pixel count is preserved by the remap
        assert_eq!(hist_eq.iter().sum::<usize>(), image.numel());

        // the output distribution is strictly more spread out
        let spread_src = histogram_std(&hist_src)?;
        let spread_eq = histogram_std(&hist_eq)?;
        assert!(spread_eq > spread_src);

        // the full dynamic range is used
        assert!(equalized.as_slice().contains(&0));
        assert!(equalized.as_slice().contains(&255));

        Ok(())
    }

    #[test]
    fn test_equalize_twice_is_stable() -> Result<(), ImageError> {
        let image = clustered_image()?;
        let mut once = Image::<u8, 1>::from_size_val(image.size(), 0)?;
        super::equalize_histogram(&image, &mut once)?;

        let mut twice = Image::<u8, 1>::from_size_val(image.size(), 0)?;
        super::equalize_histogram(&once, &mut twice)?;

        let mut hist_once = [0usize; NUM_BINS];
        compute_histogram(&once, &mut hist_once, NUM_BINS)?;

        let mut hist_twice = [0usize; NUM_BINS];
        compute_histogram(&twice, &mut hist_twice, NUM_BINS)?;

        let l1_dist = hist_once
            .iter()
            .zip(hist_twice.iter())
            .map(|(&a, &b)| a.abs_diff(b))
            .sum::<usize>();
        assert!(l1_dist <= image.numel() / 20);

        Ok(())
    }

    #[test]
    fn test_equalize_constant_image_is_identity() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::from_size_val(
            ImageSize {
                width: 4,
                height: 4,
            },
            200,
        )?;

        let mut equalized = Image::<u8, 1>::from_size_val(image.size(), 0)?;
        super::equalize_histogram(&image, &mut equalized)?;

        assert_eq!(equalized.as_slice(), image.as_slice());

        Ok(())
    }
}
