// THEORY:
// The `Segmenter` turns one frame into a `ShadowSummary` (and, on request, a
// black/white mask for display). It is a stateless utility: the same frame
// always produces the same summary, and no frame influences the next.
//
// Algorithm, in order:
// 1.  **Grayscale**: Rec. 601 luma per pixel, rounded to 0..255.
// 2.  **Otsu**: pick the gray level that best separates the frame's histogram
//     into two classes. This tracks ambient lighting instead of a fixed cutoff.
// 3.  **Clamp**: bound the Otsu threshold to `[threshold_floor, threshold_ceiling]`.
//     Under extreme lighting Otsu alone either swallows noise (too high) or misses
//     the shadow entirely (too low).
// 4.  **Saturation gate**: a pixel is shadow iff it is darker than the threshold
//     AND either weakly saturated or near-black. Dark saturated objects (a deep
//     red mug) are rejected, while the darkest shadow core is kept even where its
//     hue has become unreliable.
// 5.  **Aggregate**: count, mean intensity and bounding box of shadow pixels.
// 6.  **Visualize** (optional): shadow pixels black, everything else white.

use crate::core_modules::frame::Frame;
use crate::core_modules::histogram::Histogram;
use crate::core_modules::pixel::{Gray, Pixel};
use crate::core_modules::shadow_summary::{ShadowSummary, SummaryAccumulator};
use image::{Rgba, RgbaImage};
use serde::Deserialize;
use tracing::debug;

pub const DEFAULT_THRESHOLD_FLOOR: u8 = 30;
pub const DEFAULT_THRESHOLD_CEILING: u8 = 80;
pub const DEFAULT_SATURATION_LIMIT: f64 = 60.0;
pub const DEFAULT_DARK_FLOOR: u8 = 30;

const SHADOW_RGBA: Rgba<u8> = Rgba([0, 0, 0, 255]);
const BACKGROUND_RGBA: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Tunable constants of the shadow classifier.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SegmenterConfig {
    /// Lowest threshold Otsu is allowed to select.
    pub threshold_floor: u8,
    /// Highest threshold Otsu is allowed to select.
    pub threshold_ceiling: u8,
    /// Pixels at or above this saturation (0..255) are dark objects, not shadow.
    pub saturation_limit: f64,
    /// Pixels darker than this are shadow regardless of saturation.
    pub dark_floor: u8,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            threshold_floor: DEFAULT_THRESHOLD_FLOOR,
            threshold_ceiling: DEFAULT_THRESHOLD_CEILING,
            saturation_limit: DEFAULT_SATURATION_LIMIT,
            dark_floor: DEFAULT_DARK_FLOOR,
        }
    }
}

/// The raw Otsu choice and the clamped value actually applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Threshold {
    pub otsu: Gray,
    pub applied: Gray,
}

/// Full output of one segmentation pass.
#[derive(Debug, Clone)]
pub struct Segmentation {
    pub summary: ShadowSummary,
    pub threshold: Threshold,
    /// Same dimensions as the input frame; advisory, never read back.
    pub mask: RgbaImage,
}

/// Stateless frame-to-shadow classifier.
#[derive(Debug, Clone, Default)]
pub struct Segmenter {
    config: SegmenterConfig,
}

impl Segmenter {
    pub fn new(config: SegmenterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SegmenterConfig {
        &self.config
    }

    /// Segments `frame` and renders the visualization mask.
    pub fn segment(&self, frame: &Frame) -> Segmentation {
        let mut mask = RgbaImage::from_pixel(frame.width(), frame.height(), BACKGROUND_RGBA);
        let (summary, threshold) = self.classify(frame, |x, y| {
            mask.put_pixel(x, y, SHADOW_RGBA);
        });
        Segmentation {
            summary,
            threshold,
            mask,
        }
    }

    /// Segments `frame` without building a mask.
    pub fn summarize(&self, frame: &Frame) -> (ShadowSummary, Threshold) {
        self.classify(frame, |_, _| {})
    }

    /// Otsu threshold of the gray levels, clamped to the configured bounds.
    pub fn threshold(&self, gray: &[Gray]) -> Threshold {
        let otsu = Histogram::from_gray(gray).otsu_threshold();
        let applied = otsu
            .max(self.config.threshold_floor)
            .min(self.config.threshold_ceiling);
        Threshold { otsu, applied }
    }

    /// Shadow iff darker than `threshold` and either desaturated or near-black.
    pub fn is_shadow(&self, pixel: Pixel, gray: Gray, threshold: Gray) -> bool {
        gray < threshold
            && (pixel.saturation() < self.config.saturation_limit || gray < self.config.dark_floor)
    }

    fn classify(
        &self,
        frame: &Frame,
        mut on_shadow: impl FnMut(u32, u32),
    ) -> (ShadowSummary, Threshold) {
        let gray: Vec<Gray> = frame.pixels().map(|pixel| pixel.gray()).collect();
        let threshold = self.threshold(&gray);

        let width = frame.width() as usize;
        let mut accumulator = SummaryAccumulator::default();
        for (index, (pixel, &level)) in frame.pixels().zip(&gray).enumerate() {
            if self.is_shadow(pixel, level, threshold.applied) {
                let x = (index % width) as u32;
                let y = (index / width) as u32;
                accumulator.add(x, y, level);
                on_shadow(x, y);
            }
        }
        let summary = accumulator.finish();

        debug!(
            otsu = threshold.otsu,
            applied = threshold.applied,
            pixel_count = summary.pixel_count,
            average_intensity = summary.average_intensity,
            "segmented frame"
        );
        (summary, threshold)
    }
}
