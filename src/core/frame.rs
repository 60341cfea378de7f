//! In-memory animation model: an ordered list of RGBA frames with durations.
use image::RgbaImage;

/// Duration assumed when a source frame carries no usable delay.
pub const DEFAULT_FRAME_DURATION_MS: u32 = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub image: RgbaImage,
    pub duration_ms: u32,
}

impl Frame {
    pub fn new(image: RgbaImage, duration_ms: u32) -> Self {
        Self { image, duration_ms }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

/// Ordered frame sequence. Frame order is display order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimatedAsset {
    pub frames: Vec<Frame>,
}

impl AnimatedAsset {
    pub fn new(frames: Vec<Frame>) -> Self {
        Self { frames }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Canvas size, taken from the first frame
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.frames.first().map(Frame::dimensions)
    }

    pub fn durations(&self) -> Vec<u32> {
        self.frames.iter().map(|f| f.duration_ms).collect()
    }
}
