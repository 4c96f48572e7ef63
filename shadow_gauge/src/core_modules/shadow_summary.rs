// THEORY:
// `ShadowSummary` is the per-frame handoff between the segmenter and everything
// downstream. It is deliberately tiny: a pixel count (the shadow's area, the
// only number the distance estimator needs), a tight bounding box and the mean
// gray level of the shadow pixels.
//
// An empty summary is a valid result, not an error. Its box and intensity are
// defined as all-zero so consumers never need an `Option`.
//
// `ShadowMetrics` is the same information reshaped for the stability tracker:
// everything as `f64`, with box width/height and centroid precomputed.

/// Tight box over shadow pixels, inclusive pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoundingBox {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl BoundingBox {
    pub fn new(min_x: u32, min_y: u32, max_x: u32, max_y: u32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// `max_x - min_x`; a single-column shadow has width 0.
    pub fn width(&self) -> u32 {
        self.max_x.saturating_sub(self.min_x)
    }

    /// `max_y - min_y`; a single-row shadow has height 0.
    pub fn height(&self) -> u32 {
        self.max_y.saturating_sub(self.min_y)
    }

    pub fn centroid(&self) -> (f64, f64) {
        (
            self.min_x as f64 + self.width() as f64 / 2.0,
            self.min_y as f64 + self.height() as f64 / 2.0,
        )
    }
}

/// The segmenter's verdict for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ShadowSummary {
    /// Number of pixels classified as shadow.
    pub pixel_count: u64,
    /// All-zero when `pixel_count == 0`.
    pub bounding_box: BoundingBox,
    /// Mean gray level of shadow pixels, 0 when there are none.
    pub average_intensity: f64,
}

impl ShadowSummary {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.pixel_count == 0
    }

    pub fn metrics(&self) -> ShadowMetrics {
        ShadowMetrics::from(self)
    }
}

/// Per-observation values tracked over the stability window.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ShadowMetrics {
    pub area: f64,
    pub width: f64,
    pub height: f64,
    pub centroid_x: f64,
    pub centroid_y: f64,
    pub intensity: f64,
}

impl From<&ShadowSummary> for ShadowMetrics {
    fn from(summary: &ShadowSummary) -> Self {
        let (centroid_x, centroid_y) = summary.bounding_box.centroid();
        Self {
            area: summary.pixel_count as f64,
            width: summary.bounding_box.width() as f64,
            height: summary.bounding_box.height() as f64,
            centroid_x,
            centroid_y,
            intensity: summary.average_intensity,
        }
    }
}

/// Running totals while the segmenter walks the frame.
#[derive(Debug, Clone)]
pub(crate) struct SummaryAccumulator {
    pixel_count: u64,
    intensity_sum: u64,
    min_x: u32,
    min_y: u32,
    max_x: u32,
    max_y: u32,
}

impl Default for SummaryAccumulator {
    fn default() -> Self {
        Self {
            pixel_count: 0,
            intensity_sum: 0,
            min_x: u32::MAX,
            min_y: u32::MAX,
            max_x: 0,
            max_y: 0,
        }
    }
}

impl SummaryAccumulator {
    pub(crate) fn add(&mut self, x: u32, y: u32, gray: u8) {
        self.pixel_count += 1;
        self.intensity_sum += gray as u64;
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    pub(crate) fn finish(self) -> ShadowSummary {
        if self.pixel_count == 0 {
            return ShadowSummary::empty();
        }
        ShadowSummary {
            pixel_count: self.pixel_count,
            bounding_box: BoundingBox::new(self.min_x, self.min_y, self.max_x, self.max_y),
            average_intensity: self.intensity_sum as f64 / self.pixel_count as f64,
        }
    }
}
