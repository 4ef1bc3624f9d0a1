/// An error type for the image module.
#[derive(thiserror::Error, Debug)]
pub enum ImageError {
    /// Error when channel and shape are not valid.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when the image sizes of two images do not match.
    #[error("Image size mismatch ({0}x{1} vs {2}x{3})")]
    InvalidImageSize(usize, usize, usize, usize),

    /// Error when the channel index is out of bounds.
    #[error("Channel index {0} is out of bounds ({1} channels)")]
    ChannelIndexOutOfBounds(usize, usize),

    /// Error when the pixel index is out of bounds.
    #[error("Pixel index ({0}, {1}) is out of bounds for image size ({2}, {3})")]
    PixelIndexOutOfBounds(usize, usize, usize, usize),

    /// Error when the number of histogram bins is invalid.
    #[error("Invalid number of histogram bins: {0}")]
    InvalidHistogramBins(usize),

    /// Error when the number of channels is not supported by an operation.
    #[error("Unsupported number of channels: {0} (expected 1 or 3)")]
    UnsupportedChannelCount(usize),

    /// Error when an operation receives an image with no pixels.
    #[error("Image contains no pixels")]
    EmptyImage,

    /// Error when a histogram is normalized over zero pixels.
    #[error("Cannot normalize a histogram over zero pixels")]
    DivisionByZero,

    /// Error when the cast operation fails.
    #[error("Failed to cast image data")]
    CastError,
}
