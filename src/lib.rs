//! SGL: a small software graphics library
//!
//! Immediate-mode 2D triangle strips rasterized on the CPU:
//! - `load_identity` / `translate` / `rotate` / `scale` / `push_matrix` / `pop_matrix`
//! - `set_color`, then `begin_triangle_strip`, `vertex`..., `end`
//! - Output goes to any [`rasterizer::PixelTarget`], usually a [`rasterizer::Framebuffer`]

pub mod demo;
pub mod rasterizer;

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
