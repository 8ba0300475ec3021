//! Animated flower scene
//!
//! A central white flower with arms of progressively scaled, shifted and
//! wobbling flowers. Every flower is a ring of single-triangle strips whose
//! colors blend between two endpoint colors around the rim.

use std::f32::consts::PI;
use crate::rasterizer::{Color4, PixelTarget, RasterStats, Rasterizer, SglError};
use super::settings::DemoSettings;

pub struct FlowerScene {
    pub settings: DemoSettings,
    /// Degrees of rotation of the whole scene; advances one per frame
    frame: u32,
}

impl FlowerScene {
    pub fn new(settings: DemoSettings) -> Self {
        Self { settings, frame: 0 }
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// Draw one frame into the rasterizer's target and advance the animation
    ///
    /// The target is not cleared first. The matrix stack is left as it was found.
    pub fn draw<T: PixelTarget>(&mut self, r: &mut Rasterizer<T>) -> Result<RasterStats, SglError> {
        let mut stats = RasterStats::default();
        let s = &self.settings;

        let angle = self.frame as f32;
        self.frame = self.frame.wrapping_add(1);
        let wobble_time = self.frame as f32;

        r.load_identity();
        r.translate(r.target().width() as f32 / 2.0, r.target().height() as f32 / 2.0);
        r.rotate(angle);
        r.scale(s.scene_scale, s.scene_scale);
        stats += draw_flower(r, s.petals, s.radius, Color4::WHITE, Color4::WHITE)?;

        let n = s.flowers_per_arm;
        for arm in 0..s.arms {
            // Arms sit on the diagonals for the default four
            let dir = (45.0 + 360.0 * arm as f32 / s.arms as f32).to_radians();
            let reach = s.arm_offset * std::f32::consts::SQRT_2;
            let (tx, ty) = (reach * dir.cos(), reach * dir.sin());

            let mut last = Color4::WHITE;
            r.push_matrix();

            for i in 0..n {
                let frac = i as f32 / n as f32;

                if i < 2 * n / 3 {
                    r.scale(s.step_scale, s.step_scale);
                } else {
                    r.scale(1.0 / s.step_scale, 1.0 / s.step_scale);
                }
                r.translate(tx, ty);
                let phase = (arm + 1) as f32 * 3.0 * wobble_time / 180.0 * PI + arm as f32;
                r.rotate(8.0 * phase.cos());

                let next = arm_color(i, frac);
                stats += draw_flower(r, s.petals, s.radius, last, next)?;
                last = next;
            }

            r.pop_matrix()?;
        }

        Ok(stats)
    }
}

/// Color cycle along an arm: rotates through the primaries while fading out
fn arm_color(i: usize, frac: f32) -> Color4 {
    let phase = i % 3;
    let sel = |k: usize| if phase == k { 1.0 } else { 0.0 };
    let fade = 1.0 - frac;
    Color4::rgb(
        (sel(0) * frac + fade * sel(1)) * fade,
        (sel(1) * frac + fade * sel(2)) * fade,
        (sel(2) * frac + fade * sel(0)) * fade,
    )
}

/// Blend weight around the rim: 0.5 + 0.5 sin(theta)
fn rim_weight(theta: f32) -> f32 {
    0.5 + 0.5 * theta.sin()
}

/// One flower centered at the local origin, `petals` triangles, one strip each
pub fn draw_flower<T: PixelTarget>(
    r: &mut Rasterizer<T>,
    petals: usize,
    radius: f32,
    inner: Color4,
    outer: Color4,
) -> Result<RasterStats, SglError> {
    let mut stats = RasterStats::default();

    for i in 0..petals {
        let theta = i as f32 / petals as f32 * 2.0 * PI;
        let theta_next = (i + 1) as f32 / petals as f32 * 2.0 * PI;

        r.begin_triangle_strip();

        let c = inner.lerp(outer, 0.5);
        r.set_color(c.r, c.g, c.b);
        r.vertex(0.0, 0.0)?;

        let c = inner.lerp(outer, rim_weight(theta));
        r.set_color(c.r, c.g, c.b);
        r.vertex(radius * theta.cos(), radius * theta.sin())?;

        let c = inner.lerp(outer, rim_weight(theta_next));
        r.set_color(c.r, c.g, c.b);
        r.vertex(radius * theta_next.cos(), radius * theta_next.sin())?;

        stats += r.end()?;
    }

    Ok(stats)
}
