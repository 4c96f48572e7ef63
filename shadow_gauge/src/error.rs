// THEORY:
// The engine has exactly one kind of input failure: a frame whose declared shape
// does not match its buffer. Everything else (no shadow, low contrast, a jittery
// signal) is an ordinary result and travels through `ShadowSummary` and
// `StabilityVerdict`, never through `Err`.

use crate::config::ConfigError;

/// Raised when a frame buffer cannot describe a valid `width x height` image.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    #[error("frame has zero area ({width}x{height})")]
    EmptyFrame { width: u32, height: u32 },
    #[error(
        "frame buffer holds {actual} bytes but a {width}x{height} frame with {channels} channels needs {expected}"
    )]
    BufferLength {
        width: u32,
        height: u32,
        channels: usize,
        expected: usize,
        actual: usize,
    },
    #[error("frame dimensions {width}x{height} overflow the addressable buffer size")]
    DimensionOverflow { width: u32, height: u32 },
}

/// Raised by the asynchronous sampling controller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SamplerError {
    #[error("sampling task has shut down")]
    Closed,
}

/// Umbrella error for callers that drive the whole engine.
#[derive(Debug, thiserror::Error)]
pub enum GaugeError {
    #[error(transparent)]
    Frame(#[from] FrameError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Sampler(#[from] SamplerError),
}
