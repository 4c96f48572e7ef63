// THEORY:
// The calibration step is the consumer that makes the stability verdict matter.
// It watches per-frame `(pixel_count, stable)` pairs and commits a baseline
// area only when both hold:
// - the tracker reports a stable lock, and
// - the shadow is larger than a workflow-defined minimum.
// The core never enforces that minimum itself; it lives here.
//
// A committed baseline is kept until `clear`; later commits overwrite it.

use crate::core_modules::estimator::estimate_height;
use crate::pipeline::FrameReport;
use serde::Deserialize;
use tracing::{info, warn};

pub const DEFAULT_MIN_BASELINE_AREA: u64 = 150;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    /// A baseline must cover strictly more pixels than this.
    pub min_baseline_area: u64,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            min_baseline_area: DEFAULT_MIN_BASELINE_AREA,
        }
    }
}

/// The reference shadow area captured with the object on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Baseline {
    pub area: u64,
    pub frame_index: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    Committed(Baseline),
    NotStable,
    BelowMinimum { area: u64, minimum: u64 },
}

#[derive(Debug, Clone, Default)]
pub struct Calibration {
    config: CalibrationConfig,
    baseline: Option<Baseline>,
}

impl Calibration {
    pub fn new(config: CalibrationConfig) -> Self {
        Self {
            config,
            baseline: None,
        }
    }

    /// Commits `report` as the baseline if it is stable and large enough.
    pub fn try_commit(&mut self, report: &FrameReport) -> CommitOutcome {
        if !report.is_stable() {
            return CommitOutcome::NotStable;
        }
        let area = report.pixel_count();
        if area <= self.config.min_baseline_area {
            warn!(
                area,
                minimum = self.config.min_baseline_area,
                "stable shadow too small for a baseline"
            );
            return CommitOutcome::BelowMinimum {
                area,
                minimum: self.config.min_baseline_area,
            };
        }
        let baseline = Baseline {
            area,
            frame_index: report.frame_index,
        };
        info!(area, frame_index = report.frame_index, "baseline committed");
        self.baseline = Some(baseline);
        CommitOutcome::Committed(baseline)
    }

    pub fn baseline(&self) -> Option<Baseline> {
        self.baseline
    }

    pub fn is_calibrated(&self) -> bool {
        self.baseline.is_some()
    }

    pub fn clear(&mut self) {
        self.baseline = None;
    }

    /// Height above the surface implied by `observed_area` against the baseline.
    pub fn estimate_height(&self, light_distance: f64, observed_area: u64) -> Option<f64> {
        let baseline = self.baseline?;
        estimate_height(light_distance, baseline.area as f64, observed_area as f64)
    }
}
