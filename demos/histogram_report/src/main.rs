use argh::FromArgs;
use std::path::PathBuf;

use histoscope::image::{Image, ImageSize};
use histoscope::imgproc::analyze::{analyze_rgb8, ChannelHistogram};
use histoscope::imgproc::metrics::{histogram_entropy, histogram_std};

#[derive(FromArgs)]
/// Analyze the intensity histograms of an image
struct Args {
    /// path to an input image
    #[argh(option, short = 'i')]
    image_path: PathBuf,
}

fn histogram_peak(hist: &ChannelHistogram) -> (usize, usize) {
    hist.counts
        .iter()
        .copied()
        .enumerate()
        .max_by_key(|&(_, count)| count)
        .unwrap_or((0, 0))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Args = argh::from_env();

    // read and decode the image as RGB8
    let decoded = image::open(&args.image_path)?.into_rgb8();
    let size = ImageSize {
        width: decoded.width() as usize,
        height: decoded.height() as usize,
    };
    let rgb = Image::<u8, 3>::new(size, decoded.into_raw())?;

    log::info!("loaded {} ({})", args.image_path.display(), size);

    let report = analyze_rgb8(&rgb)?;

    let (peak_intensity, peak_count) = histogram_peak(&report.grayscale);
    log::info!(
        "grayscale histogram peak: intensity {} with {} pixels (probability {:.4})",
        peak_intensity,
        peak_count,
        report.grayscale.normalized[peak_intensity]
    );

    let partition = report.binary.partition;
    log::info!(
        "otsu threshold: {} -> {} black ({:.2}%), {} white ({:.2}%)",
        partition.threshold,
        partition.black_count,
        report.binary.black_ratio * 100.0,
        partition.white_count,
        report.binary.white_ratio * 100.0,
    );

    let entropy_before = histogram_entropy(&report.grayscale.counts)?;
    let entropy_after = histogram_entropy(&report.equalized.counts)?;
    let spread_before = histogram_std(&report.grayscale.counts)?;
    let spread_after = histogram_std(&report.equalized.counts)?;
    log::info!(
        "equalization: entropy {:.3} -> {:.3} bits, intensity spread {:.1} -> {:.1}",
        entropy_before,
        entropy_after,
        spread_before,
        spread_after,
    );

    if let Some(color) = &report.color {
        for (name, hist) in [
            ("red", &color.red),
            ("green", &color.green),
            ("blue", &color.blue),
        ] {
            let (intensity, count) = histogram_peak(hist);
            log::info!(
                "{} channel peak: intensity {} with {} pixels",
                name,
                intensity,
                count
            );
        }
    }

    Ok(())
}
