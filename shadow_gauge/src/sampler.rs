// THEORY:
// The `SamplingController` is the thin asynchronous shell around a
// `ShadowPipeline`. A camera callback or render loop pushes frames at its own
// cadence; the controller owns the pipeline on a dedicated tokio task and
// guarantees the sequencing contract:
//
// 1.  **Actor ownership**: only the task touches the pipeline, so `observe`
//     calls can never interleave. Frames and control commands share one
//     ordered channel.
// 2.  **Drop, don't queue**: the channel holds a single message. `submit` uses
//     `try_send`, so a frame arriving while the previous one is still being
//     processed is dropped (and counted) instead of piling up behind it.
//     `process` waits for capacity instead, for callers that prefer to
//     serialize.
// 3.  **Latest-value publication**: every report is published on a `watch`
//     channel. Consumers (calibration step, live readouts) read the newest
//     report whenever they like without slowing down the producer.
// 4.  **Explicit teardown**: `shutdown` stops the task and drops the tracker's
//     history with it. Dropping the controller does the same, best effort.

use crate::config::GaugeConfig;
use crate::core_modules::frame::Frame;
use crate::error::{GaugeError, SamplerError};
use crate::pipeline::{FrameReport, ShadowPipeline};
use futures::{Stream, StreamExt};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Message type for the sampling task.
enum SamplerMessage {
    Frame {
        frame: Frame,
        reply: Option<oneshot::Sender<FrameReport>>,
    },
    Pause(oneshot::Sender<()>),
    Resume(oneshot::Sender<()>),
    Reset(oneshot::Sender<()>),
    Shutdown,
}

/// Owns a `ShadowPipeline` on a background task and serializes access to it.
pub struct SamplingController {
    sender: mpsc::Sender<SamplerMessage>,
    reports: watch::Receiver<Option<FrameReport>>,
    dropped_frames: Arc<AtomicU64>,
    task: Option<JoinHandle<()>>,
}

impl SamplingController {
    /// Spawns the sampling task. Must be called from within a tokio runtime.
    pub fn spawn(config: &GaugeConfig) -> Self {
        let (sender, mut receiver) = mpsc::channel::<SamplerMessage>(1);
        let (report_tx, reports) = watch::channel::<Option<FrameReport>>(None);
        let mut pipeline = ShadowPipeline::new(config);

        let task = tokio::spawn(async move {
            while let Some(message) = receiver.recv().await {
                match message {
                    SamplerMessage::Frame { frame, reply } => {
                        let report = pipeline.process_frame(&frame);
                        report_tx.send_replace(Some(report.clone()));
                        if let Some(reply) = reply {
                            let _ = reply.send(report);
                        }
                    }
                    SamplerMessage::Pause(ack) => {
                        pipeline.pause();
                        let _ = ack.send(());
                    }
                    SamplerMessage::Resume(ack) => {
                        pipeline.resume();
                        let _ = ack.send(());
                    }
                    SamplerMessage::Reset(ack) => {
                        pipeline.reset();
                        let _ = ack.send(());
                    }
                    SamplerMessage::Shutdown => break,
                }
            }
            debug!(
                frames_processed = pipeline.frames_processed(),
                "sampling task stopped"
            );
        });

        info!("sampling controller started");
        Self {
            sender,
            reports,
            dropped_frames: Arc::new(AtomicU64::new(0)),
            task: Some(task),
        }
    }

    /// Offers a frame without waiting. Returns `Ok(false)` if the task was busy
    /// and the frame was dropped.
    pub fn submit(&self, frame: Frame) -> Result<bool, SamplerError> {
        match self
            .sender
            .try_send(SamplerMessage::Frame { frame, reply: None })
        {
            Ok(()) => Ok(true),
            Err(mpsc::error::TrySendError::Full(_)) => {
                let dropped = self.dropped_frames.fetch_add(1, Ordering::Relaxed) + 1;
                warn!(dropped, "sampler busy, frame dropped");
                Ok(false)
            }
            Err(mpsc::error::TrySendError::Closed(_)) => Err(SamplerError::Closed),
        }
    }

    /// Processes a frame, waiting for the task to accept it, and returns its report.
    pub async fn process(&self, frame: Frame) -> Result<FrameReport, SamplerError> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(SamplerMessage::Frame {
                frame,
                reply: Some(reply),
            })
            .await
            .map_err(|_| SamplerError::Closed)?;
        response.await.map_err(|_| SamplerError::Closed)
    }

    /// Validates a raw RGBA buffer from the camera surface and processes it.
    pub async fn process_rgba(
        &self,
        width: u32,
        height: u32,
        rgba: &[u8],
    ) -> Result<FrameReport, GaugeError> {
        let frame = Frame::from_rgba(width, height, rgba)?;
        Ok(self.process(frame).await?)
    }

    /// Feeds every frame of `frames` through `process`, in order.
    /// Returns the number of frames processed.
    pub async fn run_stream<S>(&self, frames: S) -> Result<u64, SamplerError>
    where
        S: Stream<Item = Frame>,
    {
        let mut frames = std::pin::pin!(frames);
        let mut processed = 0u64;
        while let Some(frame) = frames.next().await {
            self.process(frame).await?;
            processed += 1;
        }
        Ok(processed)
    }

    pub async fn pause(&self) -> Result<(), SamplerError> {
        self.command(SamplerMessage::Pause).await
    }

    pub async fn resume(&self) -> Result<(), SamplerError> {
        self.command(SamplerMessage::Resume).await
    }

    pub async fn reset(&self) -> Result<(), SamplerError> {
        self.command(SamplerMessage::Reset).await
    }

    async fn command(
        &self,
        message: impl FnOnce(oneshot::Sender<()>) -> SamplerMessage,
    ) -> Result<(), SamplerError> {
        let (ack, done) = oneshot::channel();
        self.sender
            .send(message(ack))
            .await
            .map_err(|_| SamplerError::Closed)?;
        done.await.map_err(|_| SamplerError::Closed)
    }

    /// The most recent report, if any frame has been processed.
    pub fn latest(&self) -> Option<FrameReport> {
        self.reports.borrow().clone()
    }

    /// A receiver that observes every newly published report.
    pub fn subscribe(&self) -> watch::Receiver<Option<FrameReport>> {
        self.reports.clone()
    }

    pub fn dropped_frames(&self) -> u64 {
        self.dropped_frames.load(Ordering::Relaxed)
    }

    /// Stops the task and waits for it to exit.
    pub async fn shutdown(mut self) {
        let _ = self.sender.send(SamplerMessage::Shutdown).await;
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for SamplingController {
    fn drop(&mut self) {
        // Best effort shutdown on drop
        if self.task.is_some() {
            let _ = self.sender.try_send(SamplerMessage::Shutdown);
        }
    }
}
