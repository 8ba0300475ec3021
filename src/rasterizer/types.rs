//! Core types for the rasterizer

use serde::{Deserialize, Serialize};
use super::math::Vec2;

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };
    pub const RED: Color = Color { r: 255, g: 0, b: 0, a: 255 };
    pub const GREEN: Color = Color { r: 0, g: 255, b: 0, a: 255 };
    pub const BLUE: Color = Color { r: 0, g: 0, b: 255, a: 255 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn with_alpha(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Convert to [u8; 4] for framebuffer
    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Floating point RGBA color, nominally 0.0-1.0 per channel
///
/// Channels are not clamped until the color is quantized with [`Color4::to_rgba8`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color4 {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color4 {
    pub const BLACK: Color4 = Color4 { r: 0.0, g: 0.0, b: 0.0, a: 1.0 };
    pub const WHITE: Color4 = Color4 { r: 1.0, g: 1.0, b: 1.0, a: 1.0 };

    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Linear blend: `self * (1 - t) + other * t`
    pub fn lerp(self, other: Color4, t: f32) -> Self {
        Self {
            r: self.r * (1.0 - t) + other.r * t,
            g: self.g * (1.0 - t) + other.g * t,
            b: self.b * (1.0 - t) + other.b * t,
            a: self.a * (1.0 - t) + other.a * t,
        }
    }

    /// Barycentric combination of three colors
    pub fn weighted(c0: Color4, w0: f32, c1: Color4, w1: f32, c2: Color4, w2: f32) -> Self {
        Self {
            r: c0.r * w0 + c1.r * w1 + c2.r * w2,
            g: c0.g * w0 + c1.g * w1 + c2.g * w2,
            b: c0.b * w0 + c1.b * w1 + c2.b * w2,
            a: c0.a * w0 + c1.a * w1 + c2.a * w2,
        }
    }

    /// Quantize to 8 bits per channel: `round(clamp(v, 0, 1) * 255)`
    pub fn to_rgba8(self) -> Color {
        Color::with_alpha(
            quantize(self.r),
            quantize(self.g),
            quantize(self.b),
            quantize(self.a),
        )
    }
}

impl Default for Color4 {
    fn default() -> Self {
        Self::WHITE
    }
}

impl From<Color> for Color4 {
    fn from(c: Color) -> Self {
        Self {
            r: c.r as f32 / 255.0,
            g: c.g as f32 / 255.0,
            b: c.b as f32 / 255.0,
            a: c.a as f32 / 255.0,
        }
    }
}

/// NaN quantizes to 0
fn quantize(v: f32) -> u8 {
    if v.is_nan() {
        return 0;
    }
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// A strip vertex: position already transformed into device space, plus its color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub pos: Vec2,
    pub color: Color4,
}

impl Vertex {
    pub fn new(pos: Vec2, color: Color4) -> Self {
        Self { pos, color }
    }
}
