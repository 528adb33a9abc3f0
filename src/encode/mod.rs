//! Encoding: loading the external engine and invoking it on a staged manifest.
//!
//! The engine is the system `ffmpeg` binary, used through its concat demuxer.

/// Engine loading and process execution.
pub mod engine;
/// Fixed argument set and output read-back.
pub mod invoke;
