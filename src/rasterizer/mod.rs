//! Software triangle-strip rasterizer
//!
//! Features:
//! - 2D affine transforms with a push/pop matrix stack
//! - Edge-function coverage with a shadow rule for shared edges
//! - Gouraud (barycentric) color interpolation
//! - Bounding-box restricted, clipped pixel iteration

mod context;
mod error;
mod math;
mod types;
mod render;

pub use context::*;
pub use error::*;
pub use math::*;
pub use types::*;
pub use render::*;

/// Default target dimensions (the classic assignment window)
pub const WIDTH: usize = 512;
pub const HEIGHT: usize = 512;
