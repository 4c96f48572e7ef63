// THEORY:
// The `pipeline` module is the top-level synchronous API of the engine. It
// wires the stateless `Segmenter` to one session's `StabilityTracker` and
// exposes a single entry point, `process_frame`.
//
// Sequencing contract: frames must be handed over one at a time, in capture
// order. The tracker's window is order-sensitive, and `&mut self` on
// `process_frame` makes interleaving impossible for a single pipeline. A caller
// that cannot keep up drops frames before they reach this type (see
// `sampler`), it never queues them re-entrantly.
//
// Sampling can be paused. Pausing clears the history, and while paused frames
// are still segmented for live readouts but never reach the tracker.

use crate::config::GaugeConfig;
use crate::core_modules::frame::Frame;
use crate::core_modules::segmenter::{Segmenter, Threshold};
use crate::core_modules::shadow_summary::ShadowSummary;
use crate::core_modules::stability::{StabilityTracker, StabilityVerdict};
use image::RgbaImage;
use tracing::{debug, info};

/// Everything consumers need about one processed frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    /// Zero-based index of the frame within this pipeline's lifetime.
    pub frame_index: u64,
    pub summary: ShadowSummary,
    pub threshold: Threshold,
    pub verdict: StabilityVerdict,
}

impl FrameReport {
    /// The shadow area, the only number the estimator consumes.
    pub fn pixel_count(&self) -> u64 {
        self.summary.pixel_count
    }

    pub fn is_stable(&self) -> bool {
        self.verdict.is_stable()
    }

    /// The `(pixel_count, stable)` pair polled by the calibration workflow.
    pub fn calibration_sample(&self) -> (u64, bool) {
        (self.pixel_count(), self.is_stable())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplingState {
    Active,
    Paused,
}

/// Segmenter plus stability tracker for one sampling session.
pub struct ShadowPipeline {
    segmenter: Segmenter,
    tracker: StabilityTracker,
    state: SamplingState,
    frames_processed: u64,
    last_report: Option<FrameReport>,
}

impl ShadowPipeline {
    pub fn new(config: &GaugeConfig) -> Self {
        info!(
            window_size = config.stability.window_size,
            threshold_floor = config.segmenter.threshold_floor,
            threshold_ceiling = config.segmenter.threshold_ceiling,
            "shadow pipeline created"
        );
        Self {
            segmenter: Segmenter::new(config.segmenter.clone()),
            tracker: StabilityTracker::new(config.stability.clone()),
            state: SamplingState::Active,
            frames_processed: 0,
            last_report: None,
        }
    }

    /// Segments `frame` and, while active, feeds the tracker.
    pub fn process_frame(&mut self, frame: &Frame) -> FrameReport {
        let (summary, threshold) = self.segmenter.summarize(frame);
        self.record(summary, threshold)
    }

    /// Like `process_frame`, also returning the black/white mask for display.
    pub fn process_frame_visualized(&mut self, frame: &Frame) -> (FrameReport, RgbaImage) {
        let segmentation = self.segmenter.segment(frame);
        let report = self.record(segmentation.summary, segmentation.threshold);
        (report, segmentation.mask)
    }

    fn record(&mut self, summary: ShadowSummary, threshold: Threshold) -> FrameReport {
        if self.state == SamplingState::Active {
            self.tracker.observe(&summary);
        }
        let report = FrameReport {
            frame_index: self.frames_processed,
            summary,
            threshold,
            verdict: self.tracker.current_verdict(),
        };
        self.frames_processed += 1;
        self.last_report = Some(report.clone());
        report
    }

    /// Stops feeding the tracker and clears its history.
    pub fn pause(&mut self) {
        if self.state == SamplingState::Paused {
            return;
        }
        debug!(frames_processed = self.frames_processed, "sampling paused");
        self.state = SamplingState::Paused;
        self.tracker.reset();
    }

    /// Restarts sampling with an empty history.
    pub fn resume(&mut self) {
        if self.state == SamplingState::Active {
            return;
        }
        debug!(frames_processed = self.frames_processed, "sampling resumed");
        self.tracker.reset();
        self.state = SamplingState::Active;
    }

    /// Clears the history without changing the sampling state.
    pub fn reset(&mut self) {
        self.tracker.reset();
    }

    pub fn state(&self) -> SamplingState {
        self.state
    }

    pub fn current_verdict(&self) -> StabilityVerdict {
        self.tracker.current_verdict()
    }

    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }

    pub fn get_last_report(&self) -> Option<&FrameReport> {
        self.last_report.as_ref()
    }

    pub fn segmenter(&self) -> &Segmenter {
        &self.segmenter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::pixel::Pixel;

    /// A 40x40 white frame with a neutral dark square.
    fn square_frame() -> Frame {
        Frame::from_fn(40, 40, |x, y| {
            if (10..30).contains(&x) && (10..30).contains(&y) {
                Pixel::new(35, 35, 35)
            } else {
                Pixel::WHITE
            }
        })
        .unwrap()
    }

    #[test]
    fn locks_after_a_full_window_of_steady_frames() {
        let mut pipeline = ShadowPipeline::new(&GaugeConfig::default());
        let frame = square_frame();
        for _ in 0..24 {
            assert!(!pipeline.process_frame(&frame).is_stable());
        }
        let report = pipeline.process_frame(&frame);
        assert!(report.is_stable());
        assert_eq!(report.calibration_sample(), (400, true));
        assert_eq!(report.frame_index, 24);
        assert_eq!(pipeline.frames_processed(), 25);
    }

    #[test]
    fn pausing_clears_history_and_stops_observing() {
        let mut pipeline = ShadowPipeline::new(&GaugeConfig::default());
        let frame = square_frame();
        for _ in 0..25 {
            pipeline.process_frame(&frame);
        }
        assert!(pipeline.current_verdict().is_stable());

        pipeline.pause();
        assert_eq!(pipeline.state(), SamplingState::Paused);
        let report = pipeline.process_frame(&frame);
        assert_eq!(report.pixel_count(), 400);
        assert_eq!(
            report.verdict,
            StabilityVerdict::Acquiring {
                observed: 0,
                required: 25
            }
        );

        pipeline.resume();
        let report = pipeline.process_frame(&frame);
        assert_eq!(
            report.verdict,
            StabilityVerdict::Acquiring {
                observed: 1,
                required: 25
            }
        );
    }

    #[test]
    fn visualized_report_matches_plain_report() {
        let frame = square_frame();
        let mut plain = ShadowPipeline::new(&GaugeConfig::default());
        let mut visual = ShadowPipeline::new(&GaugeConfig::default());
        let (report, mask) = visual.process_frame_visualized(&frame);
        assert_eq!(plain.process_frame(&frame), report);
        assert_eq!(mask.dimensions(), (40, 40));
        assert_eq!(mask.get_pixel(15, 15).0, [0, 0, 0, 255]);
        assert_eq!(mask.get_pixel(0, 0).0, [255, 255, 255, 255]);
        assert_eq!(visual.get_last_report(), Some(&report));
    }
}
