use crate::foundation::core::{Canvas, Rgba8};
use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::flatten_premul_over_bg;
use crate::render::text::{FontSet, TextBrushRgba8, TextLayoutEngine, first_baseline};

/// Which of the two faces of a [`FontSet`] to draw with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontFace {
    Bold,
    Regular,
}

/// How a run of text is drawn: face, size, fill.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    pub face: FontFace,
    pub size_px: f32,
    pub color: Rgba8,
}

/// Drawing capability a frame is rasterized through.
///
/// One surface is reused for every frame of a run; [`DrawSurface::encode_png`] ends a frame and
/// leaves the surface ready for the next one.
pub trait DrawSurface {
    /// Size of the drawable area.
    fn canvas(&self) -> Canvas;

    /// Cover the whole canvas with an opaque color.
    fn fill_background(&mut self, color: Rgba8) -> ReelResult<()>;

    /// Draw `text` on one line, horizontally centered on `center_x`, with its baseline at
    /// `baseline_y`.
    fn draw_text(
        &mut self,
        text: &str,
        style: TextStyle,
        center_x: f32,
        baseline_y: f32,
    ) -> ReelResult<()>;

    /// Finish the frame and return it as PNG bytes.
    fn encode_png(&mut self) -> ReelResult<Vec<u8>>;
}

/// [`DrawSurface`] backed by the `vello_cpu` software rasterizer.
pub struct CpuSurface {
    canvas: Canvas,
    width: u16,
    height: u16,
    ctx: vello_cpu::RenderContext,
    bold: TextLayoutEngine,
    regular: TextLayoutEngine,
    background: Rgba8,
}

impl CpuSurface {
    pub fn new(canvas: Canvas, fonts: &FontSet) -> ReelResult<Self> {
        if canvas.width == 0 || canvas.height == 0 {
            return Err(ReelError::rasterization(
                "surface width/height must be non-zero",
            ));
        }
        let width: u16 = canvas.width.try_into().map_err(|_| {
            ReelError::rasterization(format!("surface width exceeds u16: {}", canvas.width))
        })?;
        let height: u16 = canvas.height.try_into().map_err(|_| {
            ReelError::rasterization(format!("surface height exceeds u16: {}", canvas.height))
        })?;

        Ok(Self {
            canvas,
            width,
            height,
            ctx: vello_cpu::RenderContext::new(width, height),
            bold: TextLayoutEngine::new(&fonts.bold)?,
            regular: TextLayoutEngine::new(&fonts.regular)?,
            background: Rgba8::opaque(0, 0, 0),
        })
    }

    fn engine_mut(&mut self, face: FontFace) -> &mut TextLayoutEngine {
        match face {
            FontFace::Bold => &mut self.bold,
            FontFace::Regular => &mut self.regular,
        }
    }
}

impl DrawSurface for CpuSurface {
    fn canvas(&self) -> Canvas {
        self.canvas
    }

    fn fill_background(&mut self, color: Rgba8) -> ReelResult<()> {
        self.background = Rgba8 { a: 255, ..color };
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx
            .set_paint(vello_cpu::peniko::Color::from_rgba8(color.r, color.g, color.b, 255));
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(self.canvas.width),
            f64::from(self.canvas.height),
        ));
        Ok(())
    }

    fn draw_text(
        &mut self,
        text: &str,
        style: TextStyle,
        center_x: f32,
        baseline_y: f32,
    ) -> ReelResult<()> {
        let brush = TextBrushRgba8 {
            r: style.color.r,
            g: style.color.g,
            b: style.color.b,
            a: style.color.a,
        };
        let engine = self.engine_mut(style.face);
        let layout = engine.layout_line(text, style.size_px, brush)?;
        let font = engine.font().clone();

        let tx = f64::from(center_x - layout.width() / 2.0);
        let ty = f64::from(baseline_y - first_baseline(&layout));
        self.ctx
            .set_transform(vello_cpu::kurbo::Affine::translate((tx, ty)));

        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                self.ctx
                    .glyph_run(&font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        Ok(())
    }

    fn encode_png(&mut self) -> ReelResult<Vec<u8>> {
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);
        self.ctx.reset();

        let premul = pixmap.data_as_u8_slice();
        let mut rgba = vec![0u8; premul.len()];
        flatten_premul_over_bg(&mut rgba, premul, self.background.to_array())
            .map_err(|e| ReelError::rasterization(e.to_string()))?;

        encode_png_rgba8(&rgba, self.canvas.width, self.canvas.height)
    }
}

/// Losslessly encode tightly packed RGBA8 pixels as PNG.
pub(crate) fn encode_png_rgba8(rgba: &[u8], width: u32, height: u32) -> ReelResult<Vec<u8>> {
    use image::ImageEncoder as _;

    let mut out = Vec::new();
    image::codecs::png::PngEncoder::new(&mut out)
        .write_image(rgba, width, height, image::ExtendedColorType::Rgba8)
        .map_err(|e| ReelError::rasterization(format!("png encoding failed: {e}")))?;
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
