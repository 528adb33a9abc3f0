use crate::foundation::core::FrameIndex;
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::raster::Frame;
use crate::stage::area::WorkArea;
use crate::stage::manifest::Manifest;

/// Slot the concat manifest is written to.
pub const MANIFEST_NAME: &str = "concat.txt";

/// Slot name of the frame at `index`.
pub fn frame_slot_name(index: FrameIndex) -> String {
    format!("frame{}.png", index.0)
}

/// Write `frames` and their manifest into `area`, returning the manifest.
///
/// `frames` must be in playback order with dense indices starting at 0; the input is checked
/// completely before the first write, so a rejected call leaves `area` untouched. Slots of the
/// same name from an earlier staging are overwritten.
#[tracing::instrument(skip_all, fields(frames = frames.len()))]
pub fn stage(frames: &[Frame], area: &mut dyn WorkArea) -> ReelResult<Manifest> {
    if frames.is_empty() {
        return Err(ReelError::EmptyScript);
    }
    for (expected, frame) in frames.iter().enumerate() {
        if frame.index.as_usize() != expected {
            return Err(ReelError::validation(format!(
                "frame indices must be dense and ordered: expected {expected}, got {}",
                frame.index
            )));
        }
    }

    let names: Vec<String> = frames.iter().map(|f| frame_slot_name(f.index)).collect();
    let manifest = Manifest::for_frames(&names)?;

    for (frame, name) in frames.iter().zip(&names) {
        area.write(name, &frame.image.png)?;
        tracing::debug!(slot = %name, bytes = frame.image.png.len(), "staged frame");
    }
    area.write(MANIFEST_NAME, manifest.to_text().as_bytes())?;

    Ok(manifest)
}

#[cfg(test)]
#[path = "../../tests/unit/stage/writer.rs"]
mod tests;
