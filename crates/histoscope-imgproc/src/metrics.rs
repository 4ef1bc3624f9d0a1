use histoscope_image::ImageError;

/// Compute the Shannon entropy of a histogram, in bits.
///
/// The entropy is taken over the normalized distribution:
///
/// $ H = -\sum_{i} p_i \log_2 p_i $
///
/// where `p_i` is the probability of intensity `i`. A single-spike
/// histogram has entropy 0; a uniform 256-bin histogram has entropy 8.
///
/// # Arguments
///
/// * `hist` - The input histogram counts.
///
/// # Returns
///
/// The entropy of the distribution in bits.
///
/// # Errors
///
/// Returns an error if the histogram contains no pixels.
///
/// # Example
///
/// ```
/// use histoscope_imgproc::metrics::histogram_entropy;
///
/// let hist = [4usize, 4, 0, 0];
/// let entropy = histogram_entropy(&hist).unwrap();
/// assert!((entropy - 1.0).abs() < 1e-12);
/// ```
pub fn histogram_entropy(hist: &[usize]) -> Result<f64, ImageError> {
    let total = hist.iter().sum::<usize>();
    if total == 0 {
        return Err(ImageError::DivisionByZero);
    }

    let total = total as f64;
    let entropy = hist
        .iter()
        .filter(|&&count| count > 0)
        .map(|&count| {
            let p = count as f64 / total;
            -p * p.log2()
        })
        .sum();

    Ok(entropy)
}

/// Compute the mean intensity of a histogram.
///
/// # Arguments
///
/// * `hist` - The input histogram counts, indexed by intensity.
///
/// # Errors
///
/// Returns an error if the histogram contains no pixels.
pub fn histogram_mean(hist: &[usize]) -> Result<f64, ImageError> {
    let total = hist.iter().sum::<usize>();
    if total == 0 {
        return Err(ImageError::DivisionByZero);
    }

    let sum = hist
        .iter()
        .enumerate()
        .map(|(i, &count)| i as f64 * count as f64)
        .sum::<f64>();

    Ok(sum / total as f64)
}

/// Compute the intensity standard deviation of a histogram.
///
/// Measures how far the distribution spreads across the intensity axis,
/// which serves as a contrast measure: equalizing a low-contrast image
/// increases it.
///
/// # Arguments
///
/// * `hist` - The input histogram counts, indexed by intensity.
///
/// # Errors
///
/// Returns an error if the histogram contains no pixels.
pub fn histogram_std(hist: &[usize]) -> Result<f64, ImageError> {
    let mean = histogram_mean(hist)?;
    let total = hist.iter().sum::<usize>() as f64;

    let variance = hist
        .iter()
        .enumerate()
        .map(|(i, &count)| count as f64 * (i as f64 - mean).powi(2))
        .sum::<f64>()
        / total;

    Ok(variance.sqrt())
}

#[cfg(test)]
mod tests {
    use histoscope_image::ImageError;

    #[test]
    fn test_entropy_uniform() -> Result<(), ImageError> {
        let hist = [4usize; 256];
        let entropy = super::histogram_entropy(&hist)?;
        assert!((entropy - 8.0).abs() < 1e-12);

        Ok(())
    }

    #[test]
    fn test_entropy_spike() -> Result<(), ImageError> {
        let mut hist = [0usize; 256];
        hist[77] = 1000;
        let entropy = super::histogram_entropy(&hist)?;
        assert_eq!(entropy, 0.0);

        Ok(())
    }

    #[test]
    fn test_entropy_empty() {
        let hist = [0usize; 256];
        assert!(matches!(
            super::histogram_entropy(&hist),
            Err(ImageError::DivisionByZero)
        ));
    }

    #[test]
    fn test_mean_and_std() -> Result<(), ImageError> {
        let mut hist = [0usize; 256];
        hist[0] = 1;
        hist[200] = 1;

        assert_eq!(super::histogram_mean(&hist)?, 100.0);
        assert_eq!(super::histogram_std(&hist)?, 100.0);

        Ok(())
    }

    #[test]
    fn test_std_constant() -> Result<(), ImageError> {
        let mut hist = [0usize; 256];
        hist[42] = 99;

        assert_eq!(super::histogram_std(&hist)?, 0.0);

        Ok(())
    }
}
