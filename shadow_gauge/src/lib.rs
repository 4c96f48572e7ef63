// THEORY:
// This file is the entry point for the `shadow_gauge` library crate. It exposes
// the engine as a small set of high-level types:
//
// - `Frame`: one validated RGB frame from the camera surface.
// - `Segmenter`: stateless frame -> `ShadowSummary` (+ display mask).
// - `StabilityTracker`: sliding-window multi-factor "is the signal locked?" test.
// - `ShadowPipeline`: the two wired together behind a single `process_frame`.
// - `SamplingController`: the pipeline on its own tokio task, dropping frames
//   it cannot keep up with.
// - `Calibration` and `estimator`: the consumers of the verdict and the area.
//
// The building blocks stay public under `core_modules` for callers that want to
// drive a stage on its own.

pub mod calibration;
pub mod config;
pub mod core_modules;
pub mod error;
pub mod pipeline;
pub mod sampler;

pub use calibration::{Baseline, Calibration, CalibrationConfig, CommitOutcome};
pub use config::{ConfigError, GaugeConfig, LoggingConfig};
pub use core_modules::estimator::{estimate_height, expected_area};
pub use core_modules::frame::Frame;
pub use core_modules::pixel::Pixel;
pub use core_modules::segmenter::{Segmentation, Segmenter, SegmenterConfig, Threshold};
pub use core_modules::shadow_summary::{BoundingBox, ShadowMetrics, ShadowSummary};
pub use core_modules::stability::{
    StabilityChecks, StabilityConfig, StabilityTracker, StabilityVerdict, WindowStatistics,
};
pub use core_modules::stats::MetricStats;
pub use error::{FrameError, GaugeError, SamplerError};
pub use pipeline::{FrameReport, SamplingState, ShadowPipeline};
pub use sampler::SamplingController;
