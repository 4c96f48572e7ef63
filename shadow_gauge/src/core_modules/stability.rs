// THEORY:
// The `StabilityTracker` decides when the live shadow signal is trustworthy
// enough to commit as a calibration or measurement sample. It is the stateful
// counterpart of the stateless segmenter: one tracker per sampling session,
// owning a `FrameHistory` of derived metrics and nothing else.
//
// Key principles:
// 1.  **Learning first**: until the window is full the verdict is `Acquiring`
//     and reads as "not stable", whatever the values look like.
// 2.  **Multi-factor lock**: any single statistic can look calm while the shape
//     drifts. The verdict is the conjunction of six checks covering presence,
//     area, box size, position, frame-to-frame jitter and photometric quality.
// 3.  **Jitter vs deviation**: a width that flips between two values every frame
//     has a modest windowed standard deviation around a steady mean; the mean
//     absolute frame-to-frame delta exposes it.
// 4.  **Tuned constants as configuration**: every threshold lives in
//     `StabilityConfig`, with the contract values as defaults.

use crate::core_modules::frame_history::FrameHistory;
use crate::core_modules::shadow_summary::{ShadowMetrics, ShadowSummary};
use crate::core_modules::stats::{MetricStats, mean_abs_delta};
use serde::Deserialize;
use tracing::{debug, info};

pub const DEFAULT_WINDOW_SIZE: usize = 25;
pub const DEFAULT_MIN_MEAN_AREA: f64 = 150.0;
pub const DEFAULT_MAX_AREA_RELATIVE_STD_DEV: f64 = 0.05;
pub const DEFAULT_MAX_DIMENSION_STD_DEV: f64 = 3.0;
pub const DEFAULT_MAX_CENTROID_STD_DEV: f64 = 2.0;
pub const DEFAULT_MAX_DIMENSION_JITTER: f64 = 1.5;
pub const DEFAULT_MAX_MEAN_INTENSITY: f64 = 65.0;

/// Thresholds of the stability predicate.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StabilityConfig {
    /// Observations required before any verdict is evaluated.
    pub window_size: usize,
    /// Mean area must exceed this many pixels.
    pub min_mean_area: f64,
    /// Area standard deviation must stay below this fraction of the mean.
    pub max_area_relative_std_dev: f64,
    /// Width and height standard deviation ceiling, in pixels.
    pub max_dimension_std_dev: f64,
    /// Centroid standard deviation ceiling on each axis, in pixels.
    pub max_centroid_std_dev: f64,
    /// Mean absolute frame-to-frame change of width and height, in pixels.
    pub max_dimension_jitter: f64,
    /// Mean shadow gray level must stay below this.
    pub max_mean_intensity: f64,
}

impl Default for StabilityConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            min_mean_area: DEFAULT_MIN_MEAN_AREA,
            max_area_relative_std_dev: DEFAULT_MAX_AREA_RELATIVE_STD_DEV,
            max_dimension_std_dev: DEFAULT_MAX_DIMENSION_STD_DEV,
            max_centroid_std_dev: DEFAULT_MAX_CENTROID_STD_DEV,
            max_dimension_jitter: DEFAULT_MAX_DIMENSION_JITTER,
            max_mean_intensity: DEFAULT_MAX_MEAN_INTENSITY,
        }
    }
}

/// Window statistics behind a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WindowStatistics {
    pub area: MetricStats,
    pub width: MetricStats,
    pub height: MetricStats,
    pub centroid_x: MetricStats,
    pub centroid_y: MetricStats,
    pub intensity: MetricStats,
    /// Mean absolute change of width between consecutive frames.
    pub width_jitter: f64,
    /// Mean absolute change of height between consecutive frames.
    pub height_jitter: f64,
}

impl WindowStatistics {
    pub fn from_window<I>(window: I) -> Self
    where
        I: Iterator<Item = ShadowMetrics> + Clone,
    {
        Self {
            area: MetricStats::from_values(window.clone().map(|m| m.area)),
            width: MetricStats::from_values(window.clone().map(|m| m.width)),
            height: MetricStats::from_values(window.clone().map(|m| m.height)),
            centroid_x: MetricStats::from_values(window.clone().map(|m| m.centroid_x)),
            centroid_y: MetricStats::from_values(window.clone().map(|m| m.centroid_y)),
            intensity: MetricStats::from_values(window.clone().map(|m| m.intensity)),
            width_jitter: mean_abs_delta(window.clone().map(|m| m.width)),
            height_jitter: mean_abs_delta(window.map(|m| m.height)),
        }
    }
}

/// Outcome of each factor of the stability predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StabilityChecks {
    pub area_present: bool,
    pub area_stable: bool,
    pub dimensions_stable: bool,
    pub position_stable: bool,
    pub jitter_low: bool,
    pub shadow_quality: bool,
}

impl StabilityChecks {
    pub fn evaluate(statistics: &WindowStatistics, config: &StabilityConfig) -> Self {
        Self {
            area_present: statistics.area.mean > config.min_mean_area,
            area_stable: statistics.area.std_dev
                < config.max_area_relative_std_dev * statistics.area.mean,
            dimensions_stable: statistics.width.std_dev < config.max_dimension_std_dev
                && statistics.height.std_dev < config.max_dimension_std_dev,
            position_stable: statistics.centroid_x.std_dev < config.max_centroid_std_dev
                && statistics.centroid_y.std_dev < config.max_centroid_std_dev,
            jitter_low: statistics.width_jitter < config.max_dimension_jitter
                && statistics.height_jitter < config.max_dimension_jitter,
            shadow_quality: statistics.intensity.mean < config.max_mean_intensity,
        }
    }

    pub fn all_passed(&self) -> bool {
        self.area_present
            && self.area_stable
            && self.dimensions_stable
            && self.position_stable
            && self.jitter_low
            && self.shadow_quality
    }

    /// Names of the checks that failed, for readouts and logs.
    pub fn failing(&self) -> Vec<&'static str> {
        [
            ("area_present", self.area_present),
            ("area_stable", self.area_stable),
            ("dimensions_stable", self.dimensions_stable),
            ("position_stable", self.position_stable),
            ("jitter_low", self.jitter_low),
            ("shadow_quality", self.shadow_quality),
        ]
        .into_iter()
        .filter_map(|(name, passed)| (!passed).then_some(name))
        .collect()
    }
}

/// Current reading of the tracker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StabilityVerdict {
    /// The window is still filling; no statistic is trusted yet.
    Acquiring { observed: usize, required: usize },
    /// The window is full and the predicate was evaluated.
    Evaluated {
        stable: bool,
        statistics: WindowStatistics,
        checks: StabilityChecks,
    },
}

impl StabilityVerdict {
    pub fn is_stable(&self) -> bool {
        matches!(self, StabilityVerdict::Evaluated { stable: true, .. })
    }

    pub fn statistics(&self) -> Option<&WindowStatistics> {
        match self {
            StabilityVerdict::Evaluated { statistics, .. } => Some(statistics),
            StabilityVerdict::Acquiring { .. } => None,
        }
    }

    pub fn checks(&self) -> Option<&StabilityChecks> {
        match self {
            StabilityVerdict::Evaluated { checks, .. } => Some(checks),
            StabilityVerdict::Acquiring { .. } => None,
        }
    }
}

/// Sliding-window stability detector for one sampling session.
#[derive(Debug, Clone)]
pub struct StabilityTracker {
    config: StabilityConfig,
    history: FrameHistory<ShadowMetrics>,
    verdict: StabilityVerdict,
}

impl Default for StabilityTracker {
    fn default() -> Self {
        Self::new(StabilityConfig::default())
    }
}

impl StabilityTracker {
    pub fn new(config: StabilityConfig) -> Self {
        let history = FrameHistory::with_capacity(config.window_size);
        let verdict = StabilityVerdict::Acquiring {
            observed: 0,
            required: history.capacity(),
        };
        Self {
            config,
            history,
            verdict,
        }
    }

    pub fn config(&self) -> &StabilityConfig {
        &self.config
    }

    /// Adds one frame's summary to the window and refreshes the verdict.
    pub fn observe(&mut self, summary: &ShadowSummary) {
        self.history.push(summary.metrics());

        if !self.history.is_full() {
            self.verdict = StabilityVerdict::Acquiring {
                observed: self.history.len(),
                required: self.history.capacity(),
            };
            return;
        }

        let was_stable = self.verdict.is_stable();
        let statistics = WindowStatistics::from_window(self.history.iter());
        let checks = StabilityChecks::evaluate(&statistics, &self.config);
        let stable = checks.all_passed();

        debug!(
            area_mean = statistics.area.mean,
            area_std_dev = statistics.area.std_dev,
            width_jitter = statistics.width_jitter,
            height_jitter = statistics.height_jitter,
            intensity_mean = statistics.intensity.mean,
            stable,
            "stability window evaluated"
        );
        if stable != was_stable {
            if stable {
                info!(area = statistics.area.mean, "shadow signal locked");
            } else {
                info!(failing = ?checks.failing(), "shadow signal lost lock");
            }
        }

        self.verdict = StabilityVerdict::Evaluated {
            stable,
            statistics,
            checks,
        };
    }

    pub fn current_verdict(&self) -> StabilityVerdict {
        self.verdict
    }

    pub fn is_stable(&self) -> bool {
        self.verdict.is_stable()
    }

    /// Observations currently held in the window.
    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Drops the whole history; the next verdict starts acquiring again.
    pub fn reset(&mut self) {
        self.history.clear();
        self.verdict = StabilityVerdict::Acquiring {
            observed: 0,
            required: self.history.capacity(),
        };
    }
}
