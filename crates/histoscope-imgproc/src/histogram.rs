use histoscope_image::{Image, ImageError};
use rayon::prelude::*;

/// Number of intensity levels of an 8-bit image.
pub const NUM_BINS: usize = 256;

/// Compute the pixel intensity histogram of an image.
///
/// NOTE: this is limited to 8-bit 1-channel images.
///
/// # Arguments
///
/// * `src` - The input image to compute the histogram.
/// * `hist` - The output histogram.
/// * `num_bins` - The number of bins to use for the histogram.
///
/// # Returns
///
/// A vector of size `num_bins` containing the histogram.
///
/// # Errors
///
/// Returns an error if the number of bins is invalid.
///
/// # Example
///
/// ```
/// use histoscope_image::{Image, ImageSize};
/// use histoscope_imgproc::histogram::compute_histogram;
///
/// let image = Image::<u8, 1>::new(
///   ImageSize {
///     width: 3,
///     height: 3,
///   },
///   vec![0, 2, 4, 128, 130, 132, 254, 255, 255],
/// ).unwrap();
///
/// let mut histogram = vec![0; 3];
///
/// compute_histogram(&image, &mut histogram, 3).unwrap();
/// assert_eq!(histogram, vec![3, 3, 3]);
/// ```
pub fn compute_histogram(
    src: &Image<u8, 1>,
    hist: &mut [usize],
    num_bins: usize,
) -> Result<(), ImageError> {
    if num_bins == 0 || num_bins > NUM_BINS {
        return Err(ImageError::InvalidHistogramBins(num_bins));
    }

    if hist.len() != num_bins {
        return Err(ImageError::InvalidHistogramBins(num_bins));
    }

    let mut bin_lut = [0usize; NUM_BINS];
    for (i, bin) in bin_lut.iter_mut().enumerate() {
        *bin = (i * num_bins) >> 8;
    }

    let counts = src
        .as_slice()
        .par_chunks(4096)
        .fold(
            || vec![0usize; num_bins],
            |mut local, chunk| {
                for &px in chunk {
                    let idx = bin_lut[px as usize];
                    local[idx] += 1;
                }
                local
            },
        )
        .reduce(
            || vec![0usize; num_bins],
            |mut a, b| {
                for (i, val) in b.iter().enumerate() {
                    a[i] += val;
                }
                a
            },
        );

    for i in 0..num_bins {
        hist[i] += counts[i];
    }

    Ok(())
}

/// Normalize a histogram into a per-bin probability distribution.
///
/// Each bin count is divided by `total_pixels` so that the output sums to 1.
///
/// # Arguments
///
/// * `hist` - The input histogram counts.
/// * `total_pixels` - The number of pixels the histogram was computed over.
/// * `normalized` - The output probabilities, same length as `hist`.
///
/// # Errors
///
/// Returns an error if `total_pixels` is zero or the slice lengths differ.
///
/// # Example
///
/// ```
/// use histoscope_imgproc::histogram::normalize_histogram;
///
/// let hist = [2usize, 1, 1];
/// let mut normalized = [0.0; 3];
///
/// normalize_histogram(&hist, 4, &mut normalized).unwrap();
/// assert_eq!(normalized, [0.5, 0.25, 0.25]);
/// ```
pub fn normalize_histogram(
    hist: &[usize],
    total_pixels: usize,
    normalized: &mut [f64],
) -> Result<(), ImageError> {
    if total_pixels == 0 {
        return Err(ImageError::DivisionByZero);
    }

    if normalized.len() != hist.len() {
        return Err(ImageError::InvalidHistogramBins(normalized.len()));
    }

    let total = total_pixels as f64;
    for (out, &count) in normalized.iter_mut().zip(hist.iter()) {
        *out = count as f64 / total;
    }

    Ok(())
}

/// Compute the cumulative distribution of a histogram.
///
/// `cdf[i]` holds the number of pixels with intensity less than or equal to `i`.
///
/// # Arguments
///
/// * `hist` - The input histogram counts.
/// * `cdf` - The output running sums, same length as `hist`.
///
/// # Errors
///
/// Returns an error if the slice lengths differ.
pub fn cumulative_histogram(hist: &[usize], cdf: &mut [usize]) -> Result<(), ImageError> {
    if cdf.len() != hist.len() {
        return Err(ImageError::InvalidHistogramBins(cdf.len()));
    }

    let mut sum = 0;
    for (out, &count) in cdf.iter_mut().zip(hist.iter()) {
        sum += count;
        *out = sum;
    }

    Ok(())
}
