use crate::encode::engine::EncodingEngine;
use crate::foundation::core::{MAX_OUTPUT_SECS, OUTPUT_FPS};
use crate::foundation::error::{ReelError, ReelResult};

/// Slot the engine writes its container to.
pub const OUTPUT_NAME: &str = "output.mp4";

/// H.264 encoder requested from the engine.
pub const VIDEO_CODEC: &str = "libx264";

/// Encoded MP4/H.264 container bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedVideo {
    bytes: Vec<u8>,
}

impl std::fmt::Debug for EncodedVideo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncodedVideo")
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl EncodedVideo {
    pub const MIME_TYPE: &'static str = "video/mp4";

    /// Wrap container bytes read back from the engine.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Fixed engine arguments: concat demuxer input, H.264 in yuv420p, 30 fps, capped at 20 s.
pub fn encode_args(manifest: &str, output: &str) -> Vec<String> {
    let fps = OUTPUT_FPS.to_string();
    let cap = MAX_OUTPUT_SECS.to_string();
    [
        "-f",
        "concat",
        "-safe",
        "0",
        "-i",
        manifest,
        "-c:v",
        VIDEO_CODEC,
        "-pix_fmt",
        "yuv420p",
        "-r",
        fps.as_str(),
        "-t",
        cap.as_str(),
        output,
    ]
    .into_iter()
    .map(str::to_owned)
    .collect()
}

/// Encode the manifest staged at `manifest` in the engine's area and read the container back.
///
/// Any failure other than [`ReelError::EngineUnavailable`] is reported as
/// [`ReelError::EncodingFailed`] with the underlying diagnostic.
#[tracing::instrument(skip(engine))]
pub fn encode(engine: &mut dyn EncodingEngine, manifest: &str) -> ReelResult<EncodedVideo> {
    if !engine.area().contains(manifest) {
        return Err(ReelError::encoding(format!(
            "manifest '{manifest}' is not staged"
        )));
    }

    let args = encode_args(manifest, OUTPUT_NAME);
    tracing::debug!(args = %args.join(" "), "invoking engine");
    engine.run(&args).map_err(into_encoding_error)?;

    let area = engine.area();
    if !area.contains(OUTPUT_NAME) {
        return Err(ReelError::encoding(format!(
            "engine finished without writing '{OUTPUT_NAME}'"
        )));
    }
    let bytes = area.read(OUTPUT_NAME).map_err(into_encoding_error)?;
    if bytes.is_empty() {
        return Err(ReelError::encoding(format!(
            "engine wrote an empty '{OUTPUT_NAME}'"
        )));
    }

    tracing::info!(bytes = bytes.len(), "encoded video");
    Ok(EncodedVideo::new(bytes))
}

fn into_encoding_error(err: ReelError) -> ReelError {
    match err {
        e @ (ReelError::EncodingFailed(_) | ReelError::EngineUnavailable(_)) => e,
        other => ReelError::encoding(other.to_string()),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/invoke.rs"]
mod tests;
