// THEORY (1D Pixel Heuristics):
// The `Pixel` is a "dumb" data container for one RGB sample plus the handful of
// single-pixel heuristics the segmenter needs. Nothing here looks at neighbors or
// at previous frames; anything spatial lives in the segmenter, anything temporal
// in the stability tracker.
//
// Heuristic families:
// - Brightness: Rec. 601 luma, rounded to an 8-bit gray level.
// - Color strength: chroma (max - min) and HSV saturation rescaled to 0..255.
//
// Saturation is what separates a cast shadow from a dark *colored* object. A
// shadow darkens the surface underneath it but keeps its (mostly neutral) hue,
// while a deep red mug is dark and strongly saturated.

pub type Channel = u8;
pub type Gray = u8;
pub type Luminance = f64;
pub type Saturation = f64;

/// Number of bytes per pixel in a packed RGB buffer.
pub const RGB_CHANNELS: usize = 3;
/// Number of bytes per pixel in a packed RGBA buffer.
pub const RGBA_CHANNELS: usize = 4;

/// A single 8-bit RGB sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pixel {
    pub red: Channel,
    pub green: Channel,
    pub blue: Channel,
}

impl Pixel {
    pub const BLACK: Pixel = Pixel::new(0, 0, 0);
    pub const WHITE: Pixel = Pixel::new(255, 255, 255);

    pub const fn new(red: Channel, green: Channel, blue: Channel) -> Self {
        Self { red, green, blue }
    }

    /// Rec. 601 luma on the 0..255 scale, unrounded.
    pub fn luminance(&self) -> Luminance {
        0.299_f64 * self.red as f64 + 0.587_f64 * self.green as f64 + 0.114_f64 * self.blue as f64
    }

    /// Luma rounded to the nearest gray level and clamped to `[0, 255]`.
    pub fn gray(&self) -> Gray {
        self.luminance().round().clamp(0.0, 255.0) as Gray
    }

    /// HSV value: the brightest channel.
    pub fn value(&self) -> Channel {
        self.red.max(self.green).max(self.blue)
    }

    /// Color purity: `max(R,G,B) - min(R,G,B)`.
    pub fn chroma(&self) -> Channel {
        self.value() - self.red.min(self.green).min(self.blue)
    }

    /// HSV saturation on the 0..255 scale (`255 * chroma / value`).
    ///
    /// Pure black has no defined hue and reports 0.
    pub fn saturation(&self) -> Saturation {
        let value = self.value();
        if value == 0 {
            return 0.0;
        }
        255.0 * self.chroma() as f64 / value as f64
    }
}

impl From<[Channel; RGB_CHANNELS]> for Pixel {
    fn from(bytes: [Channel; RGB_CHANNELS]) -> Self {
        Pixel::new(bytes[0], bytes[1], bytes[2])
    }
}

impl From<Pixel> for [Channel; RGB_CHANNELS] {
    fn from(pixel: Pixel) -> Self {
        [pixel.red, pixel.green, pixel.blue]
    }
}

impl From<image::Rgb<u8>> for Pixel {
    fn from(rgb: image::Rgb<u8>) -> Self {
        Pixel::from(rgb.0)
    }
}
