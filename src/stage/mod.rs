//! Staging: the working area frames are written to and the concat manifest describing them.

/// Named byte slots (in memory or in a scratch directory).
pub mod area;
/// Concat manifest model and text format.
pub mod manifest;
/// Writes frames plus manifest into a work area.
pub mod writer;
