//! Frame rasterization: text layout, drawing surfaces, and the fixed shorts frame layout.

/// Frame layout and PNG output.
pub mod raster;
/// Drawing surface capability and its `vello_cpu` implementation.
pub mod surface;
/// Font loading and Parley text layout.
pub mod text;
