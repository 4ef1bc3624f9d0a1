use histoscope_image::{Image, ImageError, ImageSize};

use crate::color::gray_from_rgb_u8;
use crate::enhance::equalize_histogram;
use crate::histogram::{compute_histogram, normalize_histogram, NUM_BINS};
use crate::threshold::{otsu_threshold, BinaryPartition};

/// A histogram of one image plane, in raw-count and probability form.
#[derive(Clone, Debug)]
pub struct ChannelHistogram {
    /// Per-intensity pixel counts.
    pub counts: Vec<usize>,
    /// Per-intensity probabilities, counts divided by the pixel count.
    pub normalized: Vec<f64>,
}

impl ChannelHistogram {
    fn from_plane(plane: &Image<u8, 1>) -> Result<Self, ImageError> {
        let mut counts = vec![0usize; NUM_BINS];
        compute_histogram(plane, &mut counts, NUM_BINS)?;

        let mut normalized = vec![0.0; NUM_BINS];
        normalize_histogram(&counts, plane.width() * plane.height(), &mut normalized)?;

        Ok(Self { counts, normalized })
    }
}

/// The Otsu binarization outcome with class probabilities.
#[derive(Clone, Copy, Debug)]
pub struct BinaryAnalysis {
    /// The selected threshold and black/white pixel counts.
    pub partition: BinaryPartition,
    /// Fraction of pixels at or below the threshold.
    pub black_ratio: f64,
    /// Fraction of pixels above the threshold.
    pub white_ratio: f64,
}

/// Per-channel histograms of an RGB image.
#[derive(Clone, Debug)]
pub struct ColorHistograms {
    /// Histogram of the red channel.
    pub red: ChannelHistogram,
    /// Histogram of the green channel.
    pub green: ChannelHistogram,
    /// Histogram of the blue channel.
    pub blue: ChannelHistogram,
}

/// Every distribution derived from one input image.
///
/// Holds the grayscale histogram, the Otsu binary partition, the histogram
/// of the equalized grayscale image, and (for color input) the per-channel
/// histograms, each in raw-count and normalized form.
#[derive(Clone, Debug)]
pub struct HistogramReport {
    /// Histogram of the grayscale representation.
    pub grayscale: ChannelHistogram,
    /// Otsu threshold outcome over the grayscale representation.
    pub binary: BinaryAnalysis,
    /// Histogram of the equalized grayscale representation.
    pub equalized: ChannelHistogram,
    /// Per-channel histograms, present for color input.
    pub color: Option<ColorHistograms>,
}

/// Analyze a grayscale image.
///
/// Computes the grayscale histogram (raw and normalized), the Otsu binary
/// partition with class probabilities, and the histogram of the equalized
/// image.
///
/// # Errors
///
/// Returns an error if the image contains no pixels.
pub fn analyze_gray8(src: &Image<u8, 1>) -> Result<HistogramReport, ImageError> {
    if src.numel() == 0 {
        return Err(ImageError::EmptyImage);
    }

    let total_pixels = src.width() * src.height();
    let grayscale = ChannelHistogram::from_plane(src)?;

    let mut binarized = Image::<u8, 1>::from_size_val(src.size(), 0)?;
    let partition = otsu_threshold(src, &mut binarized, 255)?;
    let binary = BinaryAnalysis {
        partition,
        black_ratio: partition.black_count as f64 / total_pixels as f64,
        white_ratio: partition.white_count as f64 / total_pixels as f64,
    };

    let mut equalized_image = Image::<u8, 1>::from_size_val(src.size(), 0)?;
    equalize_histogram(src, &mut equalized_image)?;
    let equalized = ChannelHistogram::from_plane(&equalized_image)?;

    Ok(HistogramReport {
        grayscale,
        binary,
        equalized,
        color: None,
    })
}

/// Analyze an RGB8 image.
///
/// Converts to grayscale and computes everything [`analyze_gray8`] does,
/// plus the per-channel histograms of the red, green and blue planes.
///
/// # Errors
///
/// Returns an error if the image contains no pixels.
///
/// # Example
///
/// ```
/// use histoscope_image::{Image, ImageSize};
/// use histoscope_imgproc::analyze::analyze_rgb8;
///
/// let image = Image::<u8, 3>::from_size_val(
///     ImageSize {
///         width: 4,
///         height: 4,
///     },
///     0,
/// )
/// .unwrap();
///
/// let report = analyze_rgb8(&image).unwrap();
/// assert_eq!(report.grayscale.counts[0], 16);
/// assert!(report.color.is_some());
/// ```
pub fn analyze_rgb8(src: &Image<u8, 3>) -> Result<HistogramReport, ImageError> {
    if src.numel() == 0 {
        return Err(ImageError::EmptyImage);
    }

    let mut gray = Image::<u8, 1>::from_size_val(src.size(), 0)?;
    gray_from_rgb_u8(src, &mut gray)?;

    let mut report = analyze_gray8(&gray)?;

    let channels = src.split_channels()?;
    report.color = Some(ColorHistograms {
        red: ChannelHistogram::from_plane(&channels[0])?,
        green: ChannelHistogram::from_plane(&channels[1])?,
        blue: ChannelHistogram::from_plane(&channels[2])?,
    });

    Ok(report)
}

/// Analyze a raw pixel buffer with a runtime channel count.
///
/// Dispatches to [`analyze_gray8`] or [`analyze_rgb8`] depending on
/// `num_channels`.
///
/// # Arguments
///
/// * `data` - The pixel data in row-major (H, W, C) order.
/// * `size` - The image size in pixels.
/// * `num_channels` - The number of interleaved channels, 1 or 3.
///
/// # Errors
///
/// Returns an error for channel counts other than 1 or 3, for data whose
/// length does not match the image size, or for zero-pixel images.
pub fn analyze_raw(
    data: &[u8],
    size: ImageSize,
    num_channels: usize,
) -> Result<HistogramReport, ImageError> {
    match num_channels {
        1 => analyze_gray8(&Image::<u8, 1>::new(size, data.to_vec())?),
        3 => analyze_rgb8(&Image::<u8, 3>::new(size, data.to_vec())?),
        c => Err(ImageError::UnsupportedChannelCount(c)),
    }
}
