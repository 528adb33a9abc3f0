/// 0-based position of a frame in playback order.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u32);

impl FrameIndex {
    /// Index as a `usize` for slice access.
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for FrameIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Straight-alpha RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    /// Fully opaque color.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// `[r, g, b, a]` byte order.
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Portrait "shorts" canvas every frame is rendered at.
pub const SHORTS_CANVAS: Canvas = Canvas {
    width: 1080,
    height: 1920,
};

/// Background fill of every frame (`#0f0f0f`).
pub const BACKGROUND: Rgba8 = Rgba8::opaque(0x0f, 0x0f, 0x0f);

/// Fill color of both the script line and the topic caption.
pub const TEXT_COLOR: Rgba8 = Rgba8::opaque(255, 255, 255);

/// Script line font size in pixels (bold face).
pub const LINE_FONT_PX: f32 = 70.0;

/// Topic caption font size in pixels (regular face).
pub const CAPTION_FONT_PX: f32 = 50.0;

/// Distance from the bottom edge to the caption baseline.
pub const CAPTION_BOTTOM_OFFSET_PX: u32 = 200;

/// Display time of every non-terminal frame in the concat manifest.
pub const FRAME_DURATION_SECS: u32 = 5;

/// Output frame rate forced on the encoder.
pub const OUTPUT_FPS: u32 = 30;

/// Hard cap on the encoded output duration.
pub const MAX_OUTPUT_SECS: u32 = 20;
