use xxhash_rust::xxh3::xxh3_64_with_seed;

use crate::foundation::core::{
    BACKGROUND, CAPTION_BOTTOM_OFFSET_PX, CAPTION_FONT_PX, Canvas, FrameIndex, LINE_FONT_PX,
    SHORTS_CANVAS, TEXT_COLOR,
};
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::surface::{CpuSurface, DrawSurface, FontFace, TextStyle};
use crate::render::text::FontSet;

const XXH3_SEED: u64 = 0x5d1c_0f0f_0f0f_7a11;

/// A finished still image, PNG-encoded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    /// Lossless PNG bytes.
    pub png: Vec<u8>,
}

impl RasterImage {
    /// Stable hash of the encoded bytes, for golden comparisons.
    pub fn fingerprint(&self) -> u64 {
        xxh3_64_with_seed(&self.png, XXH3_SEED)
    }

    /// Decode back to tightly packed RGBA8 pixels.
    pub fn decode_rgba(&self) -> ReelResult<Vec<u8>> {
        let img = image::load_from_memory_with_format(&self.png, image::ImageFormat::Png)
            .map_err(|e| ReelError::validation(format!("frame is not a valid png: {e}")))?;
        Ok(img.to_rgba8().into_raw())
    }
}

/// One rendered script line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub index: FrameIndex,
    pub image: RasterImage,
    /// The script line drawn in the middle of the frame.
    pub line: String,
    /// The topic drawn near the bottom edge.
    pub caption: String,
}

/// Turns a `(line, caption)` pair into a raster image.
pub trait Rasterize {
    fn render(&mut self, line: &str, caption: &str) -> ReelResult<RasterImage>;

    /// Render and tag the result with its playback position.
    fn render_frame(&mut self, index: FrameIndex, line: &str, caption: &str) -> ReelResult<Frame> {
        Ok(Frame {
            index,
            image: self.render(line, caption)?,
            line: line.to_owned(),
            caption: caption.to_owned(),
        })
    }
}

/// Fixed shorts layout over any [`DrawSurface`].
///
/// Dark background; the line bold at 70 px with its baseline on the vertical center; the caption
/// regular at 50 px with its baseline 200 px above the bottom edge; both white and horizontally
/// centered.
pub struct FrameRasterizer<S> {
    surface: S,
}

impl FrameRasterizer<CpuSurface> {
    /// Software rasterizer at the shorts canvas size.
    pub fn cpu(fonts: &FontSet) -> ReelResult<Self> {
        Ok(Self::new(CpuSurface::new(SHORTS_CANVAS, fonts)?))
    }
}

impl<S: DrawSurface> FrameRasterizer<S> {
    /// Lay frames out on `surface`.
    pub fn new(surface: S) -> Self {
        Self { surface }
    }

    /// The underlying drawing surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }
}

impl<S: DrawSurface> Rasterize for FrameRasterizer<S> {
    fn render(&mut self, line: &str, caption: &str) -> ReelResult<RasterImage> {
        let Canvas { width, height } = self.surface.canvas();
        let center_x = width as f32 / 2.0;

        self.surface.fill_background(BACKGROUND)?;
        self.surface.draw_text(
            line,
            TextStyle {
                face: FontFace::Bold,
                size_px: LINE_FONT_PX,
                color: TEXT_COLOR,
            },
            center_x,
            height as f32 / 2.0,
        )?;
        self.surface.draw_text(
            caption,
            TextStyle {
                face: FontFace::Regular,
                size_px: CAPTION_FONT_PX,
                color: TEXT_COLOR,
            },
            center_x,
            height.saturating_sub(CAPTION_BOTTOM_OFFSET_PX) as f32,
        )?;
        let png = self.surface.encode_png()?;

        Ok(RasterImage { width, height, png })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
