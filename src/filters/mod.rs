//! Pixel-domain filters.
//!
//! ## Image Formats
//!
//! | Format | Shape | Type | Description |
//! |--------|-------|------|-------------|
//! | Grayscale | (H, W) | f64 | Intensity, any range (0-255 for 8-bit sources) |
//! | Grayscale8 | (H, W) | u8 | Intensity, 0-255 |
//! | BGR | (H, W, 3) | f64 | Blue, green, red, 0.0-255.0 |
//! | BGR8 | (H, W, 3) | u8 | Blue, green, red, 0-255 |
//!
//! Colour channels are stored **[B, G, R]**; see [`color_science`].
//!
//! ## Layers
//!
//! - **Math**: [`core`] (Gaussian, distances), [`color_science`] (sRGB <-> L*ab)
//! - **Borders**: [`boundary`] pads by edge replication and removes padding
//! - **Kernels**: [`bilateral`], [`blur`], [`edge`] compute interior pixels only
//!   and leave a zero border
//! - **Pipelines**: [`pipeline`] plus the padded entry points in [`blur`] and
//!   [`edge`] validate once, pad, filter and unpad
//!
//! Kernels split output rows across the rayon global pool.

pub mod core;
pub mod color_science;
pub mod params;
pub mod boundary;
pub mod bilateral;
pub mod pipeline;
pub mod blur;
pub mod edge;
