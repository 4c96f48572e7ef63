use anyhow::{Context, Result, bail};
use shadow_gauge::{Calibration, CommitOutcome, Frame, GaugeConfig, ShadowPipeline};
use std::env;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const FRAME_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp"];

fn main() -> Result<()> {
    // --- 1. Argument Parsing & Setup ---
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        println!("Usage: shadow_tester <frames_dir> <mask_output_dir> [config.toml]");
        println!("Set SG_LIGHT_DISTANCE to print height estimates after calibration.");
        return Ok(());
    }
    let input_dir = PathBuf::from(&args[1]);
    let output_dir = PathBuf::from(&args[2]);
    let config = match args.get(3) {
        Some(path) => GaugeConfig::load(Path::new(path))
            .with_context(|| format!("loading config from {path}"))?,
        None => GaugeConfig::default(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.level.parse().unwrap_or_default()),
        )
        .init();

    let light_distance = match env::var("SG_LIGHT_DISTANCE") {
        Ok(value) => Some(
            value
                .parse::<f64>()
                .with_context(|| format!("SG_LIGHT_DISTANCE is not a number: {value}"))?,
        ),
        Err(_) => None,
    };

    // --- 2. Frame Source ---
    let frames = list_frames(&input_dir)?;
    if frames.is_empty() {
        bail!("no frames found in {}", input_dir.display());
    }
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("creating {}", output_dir.display()))?;
    info!(
        frames = frames.len(),
        input = %input_dir.display(),
        output = %output_dir.display(),
        "starting shadow tester"
    );

    // --- 3. Pipeline Initialization ---
    let mut pipeline = ShadowPipeline::new(&config);
    let mut calibration = Calibration::new(config.calibration.clone());

    // --- 4. Main Processing Loop ---
    for path in &frames {
        let image = image::open(path).with_context(|| format!("decoding {}", path.display()))?;
        let frame = Frame::from_dynamic_image(&image)
            .with_context(|| format!("converting {}", path.display()))?;

        let (report, mask) = pipeline.process_frame_visualized(&frame);

        // --- 5. Calibration & Estimation ---
        if !calibration.is_calibrated() {
            if let CommitOutcome::Committed(baseline) = calibration.try_commit(&report) {
                info!(area = baseline.area, frame = %path.display(), "calibrated");
            }
        } else if let Some(light_distance) = light_distance {
            match calibration.estimate_height(light_distance, report.pixel_count()) {
                Some(height) => info!(
                    frame = %path.display(),
                    area = report.pixel_count(),
                    stable = report.is_stable(),
                    height,
                    "height estimate"
                ),
                None => warn!(frame = %path.display(), "no height estimate for this frame"),
            }
        }

        info!(
            frame = %path.display(),
            pixel_count = report.pixel_count(),
            threshold = report.threshold.applied,
            stable = report.is_stable(),
            "processed frame"
        );

        // --- 6. Write Mask ---
        let file_name = path
            .file_stem()
            .map(|stem| format!("{}_mask.png", stem.to_string_lossy()))
            .unwrap_or_else(|| format!("frame_{}_mask.png", report.frame_index));
        let mask_path = output_dir.join(file_name);
        mask.save(&mask_path)
            .with_context(|| format!("writing {}", mask_path.display()))?;
    }

    match calibration.baseline() {
        Some(baseline) => println!("Baseline area: {} px", baseline.area),
        None => println!("No stable baseline was captured."),
    }
    println!("Processing complete. Masks saved to {}", output_dir.display());
    Ok(())
}

/// Image files in `dir`, sorted by name so frames play in capture order.
fn list_frames(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut frames = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))? {
        let path = entry?.path();
        let is_frame = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| FRAME_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
            .unwrap_or(false);
        if is_frame {
            frames.push(path);
        }
    }
    frames.sort();
    Ok(frames)
}
