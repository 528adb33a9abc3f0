use std::path::{Path, PathBuf};

use crate::foundation::error::{ReelError, ReelResult};

/// Font files probed by [`FontSet::discover`], as `(bold, regular)` pairs.
const SYSTEM_FONT_CANDIDATES: &[(&str, &str)] = &[
    (
        "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    ),
    (
        "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    ),
    (
        "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    ),
    (
        "/Library/Fonts/Arial Bold.ttf",
        "/Library/Fonts/Arial.ttf",
    ),
    (
        "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
    ),
    ("C:\\Windows\\Fonts\\arialbd.ttf", "C:\\Windows\\Fonts\\arial.ttf"),
];

/// Raw font bytes for the two faces a frame uses.
#[derive(Clone)]
pub struct FontSet {
    /// Face for the script line.
    pub bold: Vec<u8>,
    /// Face for the topic caption.
    pub regular: Vec<u8>,
}

impl std::fmt::Debug for FontSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontSet")
            .field("bold_bytes", &self.bold.len())
            .field("regular_bytes", &self.regular.len())
            .finish()
    }
}

impl FontSet {
    pub fn from_bytes(bold: Vec<u8>, regular: Vec<u8>) -> Self {
        Self { bold, regular }
    }

    /// Read both faces from disk.
    pub fn from_paths(bold: &Path, regular: &Path) -> ReelResult<Self> {
        let read = |p: &Path| {
            std::fs::read(p).map_err(|e| {
                ReelError::rasterization(format!("failed to read font '{}': {e}", p.display()))
            })
        };
        Ok(Self {
            bold: read(bold)?,
            regular: read(regular)?,
        })
    }

    /// First pair of [`SYSTEM_FONT_CANDIDATES`] present on this machine.
    pub fn discover_paths() -> Option<(PathBuf, PathBuf)> {
        SYSTEM_FONT_CANDIDATES
            .iter()
            .map(|(b, r)| (PathBuf::from(b), PathBuf::from(r)))
            .find(|(b, r)| b.is_file() && r.is_file())
    }

    pub fn discover() -> ReelResult<Self> {
        let (bold, regular) = Self::discover_paths().ok_or_else(|| {
            ReelError::rasterization("no usable system font found; pass font paths explicitly")
        })?;
        tracing::debug!(bold = %bold.display(), regular = %regular.display(), "discovered fonts");
        Self::from_paths(&bold, &regular)
    }
}

/// RGBA8 brush color used by Parley text layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct TextBrushRgba8 {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

/// Parley contexts bound to a single registered font face.
pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    family_name: String,
    font: vello_cpu::peniko::FontData,
}

impl TextLayoutEngine {
    /// Register `font_bytes` in a fresh font collection.
    pub(crate) fn new(font_bytes: &[u8]) -> ReelResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.to_vec()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            ReelError::rasterization("no font families registered from font bytes")
        })?;

        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| ReelError::rasterization("registered font family has no name"))?
            .to_string();

        let font = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(font_bytes.to_vec()),
            0,
        );

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            font,
        })
    }

    pub(crate) fn family_name(&self) -> &str {
        &self.family_name
    }

    pub(crate) fn font(&self) -> &vello_cpu::peniko::FontData {
        &self.font
    }

    /// Shape `text` on a single unwrapped line.
    pub(crate) fn layout_line(
        &mut self,
        text: &str,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> ReelResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(ReelError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        layout.align(
            None,
            parley::Alignment::Start,
            parley::AlignmentOptions::default(),
        );
        Ok(layout)
    }
}

/// Baseline of the first line, measured from the layout's top edge.
pub(crate) fn first_baseline(layout: &parley::Layout<TextBrushRgba8>) -> f32 {
    layout
        .lines()
        .next()
        .map(|line| line.metrics().baseline)
        .unwrap_or(0.0)
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
