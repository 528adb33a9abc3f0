//! Shortreel turns a short script into a vertical "shorts" video.
//!
//! Each script line becomes one 1080x1920 frame with the topic as caption. Frames are staged
//! next to a concat manifest and handed to an external `ffmpeg` engine, which produces an
//! MP4/H.264 container capped at 20 seconds.
//!
//! - Split a script into [`ScriptLine`]s (or generate one with a [`ScriptGenerator`])
//! - Build a [`Pipeline`] from an [`EngineLoader`] and a [`Rasterize`] implementation
//! - Call [`Pipeline::run`] and save the resulting [`Artifact`]
#![forbid(unsafe_code)]

mod foundation;

/// Encoding engine loading and invocation.
pub mod encode;
/// Trend prediction feed.
pub mod feed;
/// Run controller.
pub mod pipeline;
/// Frame rasterization.
pub mod render;
/// Script lines and templates.
pub mod script;
/// Working area and concat manifest.
pub mod stage;

pub use crate::foundation::core::{
    BACKGROUND, CAPTION_BOTTOM_OFFSET_PX, CAPTION_FONT_PX, Canvas, FRAME_DURATION_SECS,
    FrameIndex, LINE_FONT_PX, MAX_OUTPUT_SECS, OUTPUT_FPS, Rgba8, SHORTS_CANVAS, TEXT_COLOR,
};
pub use crate::foundation::error::{ReelError, ReelResult};

pub use crate::encode::engine::{
    EncodingEngine, EngineLoader, FfmpegEngine, FfmpegLoader, FfmpegLoaderOpts,
    is_ffmpeg_on_path,
};
pub use crate::encode::invoke::{EncodedVideo, OUTPUT_NAME, encode, encode_args};
pub use crate::feed::{ShapContribution, TopicPrediction, load_feed, parse_feed};
pub use crate::pipeline::{
    Artifact, Pipeline, PipelineState, RunOutcome, StateObserver, download_file_name,
};
pub use crate::render::raster::{Frame, FrameRasterizer, RasterImage, Rasterize};
pub use crate::render::surface::{CpuSurface, DrawSurface, FontFace, TextStyle};
pub use crate::render::text::FontSet;
pub use crate::script::{
    LongOutlineTemplate, ScriptGenerator, ScriptLine, ShortsTemplate, script_lines,
};
pub use crate::stage::area::{DirWorkArea, MemWorkArea, WorkArea};
pub use crate::stage::manifest::{Manifest, ManifestEntry};
pub use crate::stage::writer::{MANIFEST_NAME, frame_slot_name, stage};
