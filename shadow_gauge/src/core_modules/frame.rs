// THEORY:
// A `Frame` is the immutable input for one sampling instant: a packed, row-major
// RGB buffer plus its dimensions. Like `Pixel`, it is a "dumb" data container.
//
// The only validation in the whole engine happens here, at construction. A frame
// that exists is guaranteed to have `width * height >= 1` pixels and exactly
// `width * height * 3` bytes, so every downstream stage can index it without
// checks and without returning errors.
//
// Camera and browser surfaces usually hand over RGBA; `from_rgba` drops the alpha
// channel, which carries no information about shadows.

use crate::core_modules::pixel::{Pixel, RGB_CHANNELS, RGBA_CHANNELS};
use crate::error::FrameError;
use image::{DynamicImage, RgbImage};

/// One validated RGB frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Frame {
    /// Wraps a packed RGB buffer, failing fast on a shape mismatch.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self, FrameError> {
        let expected = expected_len(width, height, RGB_CHANNELS)?;
        if data.len() != expected {
            return Err(FrameError::BufferLength {
                width,
                height,
                channels: RGB_CHANNELS,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Builds a frame from a packed RGBA buffer, discarding alpha.
    pub fn from_rgba(width: u32, height: u32, rgba: &[u8]) -> Result<Self, FrameError> {
        let expected = expected_len(width, height, RGBA_CHANNELS)?;
        if rgba.len() != expected {
            return Err(FrameError::BufferLength {
                width,
                height,
                channels: RGBA_CHANNELS,
                expected,
                actual: rgba.len(),
            });
        }
        let mut data = Vec::with_capacity(expected / RGBA_CHANNELS * RGB_CHANNELS);
        for pixel in rgba.chunks_exact(RGBA_CHANNELS) {
            data.extend_from_slice(&pixel[..RGB_CHANNELS]);
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A frame where every pixel has the same color.
    pub fn filled(width: u32, height: u32, pixel: Pixel) -> Result<Self, FrameError> {
        Self::from_fn(width, height, |_, _| pixel)
    }

    /// Builds a frame by evaluating `pixel_at(x, y)` in row-major order.
    pub fn from_fn(
        width: u32,
        height: u32,
        mut pixel_at: impl FnMut(u32, u32) -> Pixel,
    ) -> Result<Self, FrameError> {
        let expected = expected_len(width, height, RGB_CHANNELS)?;
        let mut data = Vec::with_capacity(expected);
        for y in 0..height {
            for x in 0..width {
                let channels: [u8; RGB_CHANNELS] = pixel_at(x, y).into();
                data.extend_from_slice(&channels);
            }
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Converts any decoded image into an RGB frame.
    pub fn from_dynamic_image(image: &DynamicImage) -> Result<Self, FrameError> {
        Self::try_from(&image.to_rgb8())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of pixels (`width * height`).
    pub fn area(&self) -> usize {
        self.data.len() / RGB_CHANNELS
    }

    /// The packed RGB bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// The pixel at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Pixel> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * RGB_CHANNELS;
        Some(Pixel::new(
            self.data[offset],
            self.data[offset + 1],
            self.data[offset + 2],
        ))
    }

    /// All pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = Pixel> + '_ {
        self.data
            .chunks_exact(RGB_CHANNELS)
            .map(|bytes| Pixel::new(bytes[0], bytes[1], bytes[2]))
    }
}

impl TryFrom<&RgbImage> for Frame {
    type Error = FrameError;

    fn try_from(image: &RgbImage) -> Result<Self, Self::Error> {
        Frame::new(image.width(), image.height(), image.as_raw().clone())
    }
}

fn expected_len(width: u32, height: u32, channels: usize) -> Result<usize, FrameError> {
    if width == 0 || height == 0 {
        return Err(FrameError::EmptyFrame { width, height });
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|area| area.checked_mul(channels))
        .ok_or(FrameError::DimensionOverflow { width, height })
}
