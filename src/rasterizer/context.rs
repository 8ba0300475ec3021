//! Immediate-mode drawing context
//!
//! Owns everything a fixed-function 2D pipeline keeps between calls:
//! - current transform and the push/pop matrix stack
//! - current vertex color
//! - the triangle strip being accumulated
//! - the bound pixel target
//!
//! Vertices are transformed and colored the moment `vertex()` is called;
//! `end()` rasterizes the whole strip synchronously.
//!
//! Misuse (`vertex()`/`end()` outside a strip, popping an empty stack)
//! returns `SglError` in every build profile and leaves state untouched.

use log::{debug, warn};
use super::error::SglError;
use super::math::{Transform2, Vec2};
use super::render::{rasterize_strip, Framebuffer, PixelTarget, RasterStats};
use super::types::{Color4, Vertex};

/// Strip accumulation state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StripState {
    Idle,
    Accumulating,
}

pub struct Rasterizer<T: PixelTarget = Framebuffer> {
    target: T,
    transform: Transform2,
    stack: Vec<Transform2>,
    color: Color4,
    strip: Vec<Vertex>,
    state: StripState,
}

impl<T: PixelTarget> Rasterizer<T> {
    pub fn new(target: T) -> Self {
        Self {
            target,
            transform: Transform2::IDENTITY,
            stack: Vec::new(),
            color: Color4::WHITE,
            strip: Vec::new(),
            state: StripState::Idle,
        }
    }

    // --- Output surface ---

    /// Bind a new output surface, returning the previous one
    pub fn set_target(&mut self, target: T) -> T {
        std::mem::replace(&mut self.target, target)
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }

    pub fn into_target(self) -> T {
        self.target
    }

    // --- Matrix state ---

    pub fn load_identity(&mut self) {
        self.transform.load_identity();
    }

    pub fn scale(&mut self, sx: f32, sy: f32) {
        self.transform.scale(sx, sy);
    }

    pub fn translate(&mut self, tx: f32, ty: f32) {
        self.transform.translate(tx, ty);
    }

    /// Counter-clockwise, in degrees
    pub fn rotate(&mut self, angle_degrees: f32) {
        self.transform.rotate(angle_degrees);
    }

    pub fn push_matrix(&mut self) {
        self.stack.push(self.transform);
    }

    pub fn pop_matrix(&mut self) -> Result<(), SglError> {
        self.transform = self.stack.pop().ok_or(SglError::MatrixStackUnderflow)?;
        Ok(())
    }

    pub fn transform(&self) -> &Transform2 {
        &self.transform
    }

    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    // --- Vertex state ---

    /// Set the color for subsequent vertices (alpha = 1). Valid in any state.
    pub fn set_color(&mut self, r: f32, g: f32, b: f32) {
        self.color = Color4::rgb(r, g, b);
    }

    pub fn set_color_rgba(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.color = Color4::rgba(r, g, b, a);
    }

    pub fn current_color(&self) -> Color4 {
        self.color
    }

    pub fn state(&self) -> StripState {
        self.state
    }

    pub fn is_accumulating(&self) -> bool {
        self.state == StripState::Accumulating
    }

    /// Vertices recorded since `begin_triangle_strip()`
    pub fn pending_vertices(&self) -> &[Vertex] {
        &self.strip
    }

    /// Start a new strip. An unfinished strip is discarded without drawing.
    pub fn begin_triangle_strip(&mut self) {
        if self.is_accumulating() && !self.strip.is_empty() {
            warn!("begin_triangle_strip discarded {} unfinished vertices", self.strip.len());
        }
        self.strip.clear();
        self.state = StripState::Accumulating;
    }

    pub fn vertex(&mut self, x: f32, y: f32) -> Result<(), SglError> {
        if !self.is_accumulating() {
            return Err(SglError::NoActiveStrip { op: "vertex" });
        }
        let pos = self.transform.apply(Vec2::new(x, y));
        self.strip.push(Vertex::new(pos, self.color));
        Ok(())
    }

    /// Rasterize the accumulated strip into the target and return to idle
    pub fn end(&mut self) -> Result<RasterStats, SglError> {
        if !self.is_accumulating() {
            return Err(SglError::NoActiveStrip { op: "end" });
        }
        let stats = rasterize_strip(&mut self.target, &self.strip);
        debug!(
            "strip of {} vertices: {} triangles ({} degenerate), {} pixels",
            self.strip.len(),
            stats.triangles,
            stats.degenerate,
            stats.pixels
        );
        self.strip.clear();
        self.state = StripState::Idle;
        Ok(stats)
    }
}

impl Default for Rasterizer<Framebuffer> {
    fn default() -> Self {
        Self::new(Framebuffer::new(super::WIDTH, super::HEIGHT))
    }
}
