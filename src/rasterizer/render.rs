//! Core rendering functions
//! Triangle-strip rasterization with edge functions and Gouraud color interpolation

use std::path::Path;
use log::trace;
use super::math::{Barycentric, Vec2};
use super::types::{Color, Color4, Vertex};

/// Anything the rasterizer can write pixels into
///
/// The rasterizer clips every write to `0..width()` x `0..height()`, so
/// implementations never see out-of-range coordinates.
pub trait PixelTarget {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn set_pixel(&mut self, x: usize, y: usize, color: Color);
}

/// Framebuffer for software rendering
#[derive(Debug, Clone)]
pub struct Framebuffer {
    pub pixels: Vec<u8>, // RGBA, 4 bytes per pixel
    pub width: usize,
    pub height: usize,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![0; width * height * 4],
            width,
            height,
        }
    }

    pub fn clear(&mut self, color: Color) {
        let bytes = color.to_bytes();
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&bytes);
        }
    }

    /// Reallocate for a new size; contents are reset to transparent black
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pixels = vec![0; width * height * 4];
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, color: Color) {
        if x < self.width && y < self.height {
            let idx = (y * self.width + x) * 4;
            self.pixels[idx..idx + 4].copy_from_slice(&color.to_bytes());
        }
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x < self.width && y < self.height {
            let idx = (y * self.width + x) * 4;
            let p = &self.pixels[idx..idx + 4];
            Some(Color::with_alpha(p[0], p[1], p[2], p[3]))
        } else {
            None
        }
    }

    /// Copy with row order reversed (y-up scene to y-down image)
    pub fn flip_vertical(&self) -> Framebuffer {
        let row = self.width * 4;
        let mut pixels = Vec::with_capacity(self.pixels.len());
        if row > 0 {
            for line in self.pixels.chunks_exact(row).rev() {
                pixels.extend_from_slice(line);
            }
        }
        Framebuffer {
            pixels,
            width: self.width,
            height: self.height,
        }
    }

    /// Write the buffer as a PNG, row 0 at the top of the image
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<(), image::ImageError> {
        image::save_buffer_with_format(
            path,
            &self.pixels,
            self.width as u32,
            self.height as u32,
            image::ExtendedColorType::Rgba8,
            image::ImageFormat::Png,
        )
    }
}

impl PixelTarget for Framebuffer {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: Color) {
        Framebuffer::set_pixel(self, x, y, color);
    }
}

/// Implicit line equation `a*x + b*y + c` through two points
///
/// `e < 0` is inside, `e > 0` outside. A point exactly on the line is
/// inside unless the edge is a shadow edge, so a shared edge between two
/// adjacent triangles belongs to exactly one of them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl Edge {
    pub fn new(p0: Vec2, p1: Vec2) -> Self {
        let a = p1.y - p0.y;
        let b = p0.x - p1.x;
        let c = -(a * p0.x + b * p0.y);
        Self { a, b, c }
    }

    pub fn eval(&self, x: f32, y: f32) -> f32 {
        self.a * x + self.b * y + self.c
    }

    /// Positive-facing edge: `a > 0`, or horizontal with `b > 0`
    pub fn is_shadow(&self) -> bool {
        self.a > 0.0 || (self.a == 0.0 && self.b > 0.0)
    }

    pub fn inside(&self, e: f32) -> bool {
        if e == 0.0 {
            !self.is_shadow()
        } else {
            e < 0.0
        }
    }
}

/// Per-`end()` rasterization counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RasterStats {
    /// Triangles formed by the strip
    pub triangles: usize,
    /// Triangles skipped for zero area or non-finite coordinates
    pub degenerate: usize,
    /// Pixel writes issued
    pub pixels: usize,
}

impl std::ops::AddAssign for RasterStats {
    fn add_assign(&mut self, other: RasterStats) {
        self.triangles += other.triangles;
        self.degenerate += other.degenerate;
        self.pixels += other.pixels;
    }
}

/// Integer sample range `[ceil(min), ceil(max)]` clipped to `0..limit`,
/// `None` when the span misses the target entirely
fn sample_range(v0: f32, v1: f32, v2: f32, limit: usize) -> Option<(usize, usize)> {
    if limit == 0 {
        return None;
    }
    let lo = v0.min(v1).min(v2).ceil().max(0.0);
    let hi = v0.max(v1).max(v2).ceil().min((limit - 1) as f32);
    if lo > hi {
        return None;
    }
    Some((lo as usize, hi as usize))
}

/// Rasterize a single triangle into `target`
///
/// Returns the number of pixels written, or `None` if the triangle was
/// skipped as degenerate. Both windings fill the same pixels.
pub fn rasterize_triangle<T: PixelTarget + ?Sized>(
    target: &mut T,
    va: &Vertex,
    vb: &Vertex,
    vc: &Vertex,
) -> Option<usize> {
    let (a, b, c) = (va.pos, vb.pos, vc.pos);

    // NaN edge values read as "outside" on every edge, which the
    // reversed-winding test would accept
    if !(a.is_finite() && b.is_finite() && c.is_finite()) {
        return None;
    }
    let bary = Barycentric::new(a, b, c)?;

    // Each edge is opposite its vertex
    let e0 = Edge::new(b, c);
    let e1 = Edge::new(c, a);
    let e2 = Edge::new(a, b);

    let (Some((x_min, x_max)), Some((y_min, y_max))) = (
        sample_range(a.x, b.x, c.x, target.width()),
        sample_range(a.y, b.y, c.y, target.height()),
    ) else {
        return Some(0);
    };

    let mut written = 0;
    for y in y_min..=y_max {
        let fy = y as f32;
        for x in x_min..=x_max {
            let fx = x as f32;
            let i0 = e0.inside(e0.eval(fx, fy));
            let i1 = e1.inside(e1.eval(fx, fy));
            let i2 = e2.inside(e2.eval(fx, fy));

            if (i0 && i1 && i2) || (!i0 && !i1 && !i2) {
                let (wa, wb, wc) = bary.weights(Vec2::new(fx, fy));
                let color = Color4::weighted(va.color, wa, vb.color, wb, vc.color, wc);
                target.set_pixel(x, y, color.to_rgba8());
                written += 1;
            }
        }
    }

    Some(written)
}

/// Rasterize `vertices` as a triangle strip: (0,1,2), (1,2,3), (2,3,4), ...
///
/// Fewer than three vertices draws nothing.
pub fn rasterize_strip<T: PixelTarget + ?Sized>(target: &mut T, vertices: &[Vertex]) -> RasterStats {
    let mut stats = RasterStats::default();

    for (i, tri) in vertices.windows(3).enumerate() {
        stats.triangles += 1;
        match rasterize_triangle(target, &tri[0], &tri[1], &tri[2]) {
            Some(n) => stats.pixels += n,
            None => {
                trace!("skipping degenerate strip triangle {}", i);
                stats.degenerate += 1;
            }
        }
    }

    stats
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Records how many times each pixel was written
    pub(crate) struct CountingTarget {
        pub width: usize,
        pub height: usize,
        pub counts: Vec<u32>,
        pub colors: Vec<Color>,
    }

    impl CountingTarget {
        pub fn new(width: usize, height: usize) -> Self {
            Self {
                width,
                height,
                counts: vec![0; width * height],
                colors: vec![Color::BLACK; width * height],
            }
        }

        pub fn count(&self, x: usize, y: usize) -> u32 {
            self.counts[y * self.width + x]
        }

        pub fn color(&self, x: usize, y: usize) -> Color {
            self.colors[y * self.width + x]
        }

        pub fn total(&self) -> u32 {
            self.counts.iter().sum()
        }
    }

    impl PixelTarget for CountingTarget {
        fn width(&self) -> usize {
            self.width
        }

        fn height(&self) -> usize {
            self.height
        }

        fn set_pixel(&mut self, x: usize, y: usize, color: Color) {
            assert!(x < self.width && y < self.height, "write outside target at ({}, {})", x, y);
            self.counts[y * self.width + x] += 1;
            self.colors[y * self.width + x] = color;
        }
    }

    fn v(x: f32, y: f32, color: Color4) -> Vertex {
        Vertex::new(Vec2::new(x, y), color)
    }

    fn white(x: f32, y: f32) -> Vertex {
        v(x, y, Color4::WHITE)
    }

    #[test]
    fn test_edge_shadow_rule() {
        let right = Edge::new(Vec2::new(0.0, 0.0), Vec2::new(0.0, 10.0));
        assert!(right.is_shadow());
        assert!(!right.inside(0.0));
        let left = Edge::new(Vec2::new(0.0, 10.0), Vec2::new(0.0, 0.0));
        assert!(!left.is_shadow());
        assert!(left.inside(0.0));
        let horizontal = Edge::new(Vec2::new(10.0, 0.0), Vec2::new(0.0, 0.0));
        assert!(horizontal.is_shadow());
        assert!(left.inside(-1.0) && !left.inside(1.0));
    }

    #[test]
    fn test_right_triangle_coverage() {
        for tri in [
            [white(0.0, 0.0), white(10.0, 0.0), white(0.0, 10.0)],
            [white(0.0, 0.0), white(0.0, 10.0), white(10.0, 0.0)],
        ] {
            let mut t = CountingTarget::new(16, 16);
            let n = rasterize_triangle(&mut t, &tri[0], &tri[1], &tri[2]).unwrap();
            for y in 0..16 {
                for x in 0..16 {
                    let expected = if x + y < 10 { 1 } else { 0 };
                    assert_eq!(t.count(x, y), expected, "pixel ({}, {})", x, y);
                    if expected == 1 {
                        assert_eq!(t.color(x, y), Color::WHITE);
                    }
                }
            }
            assert_eq!(n, 55);
        }
    }

    #[test]
    fn test_square_strip_covers_each_pixel_once() {
        let orders = [
            [(0.0, 0.0), (10.0, 0.0), (0.0, 10.0), (10.0, 10.0)],
            [(0.0, 0.0), (0.0, 10.0), (10.0, 0.0), (10.0, 10.0)],
            [(10.0, 10.0), (0.0, 10.0), (10.0, 0.0), (0.0, 0.0)],
        ];
        for order in orders {
            let strip: Vec<Vertex> = order.iter().map(|&(x, y)| white(x, y)).collect();
            let mut t = CountingTarget::new(16, 16);
            let stats = rasterize_strip(&mut t, &strip);
            assert_eq!(stats.triangles, 2);
            assert_eq!(stats.degenerate, 0);
            for y in 0..16 {
                for x in 0..16 {
                    let expected = if x < 10 && y < 10 { 1 } else { 0 };
                    assert_eq!(t.count(x, y), expected, "pixel ({}, {}) order {:?}", x, y, order);
                }
            }
        }
    }

    #[test]
    fn test_fan_shares_spokes_without_overlap() {
        let center = (20.0, 20.0);
        let rim = [
            (30.0, 20.0),
            (27.0, 27.0),
            (20.0, 30.0),
            (13.0, 27.0),
            (10.0, 20.0),
            (13.0, 13.0),
            (20.0, 10.0),
            (27.0, 13.0),
        ];
        let mut t = CountingTarget::new(40, 40);
        for i in 0..rim.len() {
            let p = rim[i];
            let q = rim[(i + 1) % rim.len()];
            rasterize_strip(&mut t, &[white(center.0, center.1), white(p.0, p.1), white(q.0, q.1)]);
        }

        let strictly_inside = |x: f32, y: f32| {
            (0..rim.len()).all(|i| {
                let p = Vec2::new(rim[i].0, rim[i].1);
                let q = Vec2::new(rim[(i + 1) % rim.len()].0, rim[(i + 1) % rim.len()].1);
                (q - p).cross(Vec2::new(x, y) - p) > 0.0
            })
        };

        for y in 0..40 {
            for x in 0..40 {
                if (x, y) == (20, 20) {
                    continue;
                }
                assert!(t.count(x, y) <= 1, "pixel ({}, {}) drawn twice", x, y);
                if strictly_inside(x as f32, y as f32) {
                    assert_eq!(t.count(x, y), 1, "pixel ({}, {}) missed", x, y);
                }
            }
        }
    }

    #[test]
    fn test_gouraud_interpolation() {
        let red = Color4::rgb(1.0, 0.0, 0.0);
        let green = Color4::rgb(0.0, 1.0, 0.0);
        let blue = Color4::rgb(0.0, 0.0, 1.0);
        let mut t = CountingTarget::new(16, 16);
        rasterize_triangle(&mut t, &v(0.0, 0.0, red), &v(10.0, 0.0, green), &v(0.0, 10.0, blue));

        // Nearest pixel to the centroid (3.33, 3.33): weights (0.4, 0.3, 0.3)
        let c = t.color(3, 3);
        assert!((c.r as i32 - 102).abs() <= 1);
        assert!((c.g as i32 - 77).abs() <= 1);
        assert!((c.b as i32 - 77).abs() <= 1);
        for ch in [c.r, c.g, c.b] {
            assert!((ch as i32 - 85).abs() < 20);
        }
        assert_eq!(c.a, 255);

        assert_eq!(t.color(0, 0), Color::RED);
    }

    #[test]
    fn test_clips_to_target() {
        let mut t = CountingTarget::new(8, 8);
        let n = rasterize_triangle(&mut t, &white(-20.0, -20.0), &white(40.0, -20.0), &white(-20.0, 40.0)).unwrap();
        assert_eq!(n, 64);
        assert_eq!(t.total(), 64);

        let mut t = CountingTarget::new(8, 8);
        let n = rasterize_triangle(&mut t, &white(100.0, 100.0), &white(110.0, 100.0), &white(100.0, 110.0)).unwrap();
        assert_eq!(n, 0);
        let n = rasterize_triangle(&mut t, &white(-30.0, -30.0), &white(-10.0, -30.0), &white(-30.0, -10.0)).unwrap();
        assert_eq!(n, 0);
        assert_eq!(t.total(), 0);
    }

    #[test]
    fn test_degenerate_and_nan_skipped() {
        let mut t = CountingTarget::new(16, 16);
        assert!(rasterize_triangle(&mut t, &white(0.0, 0.0), &white(5.0, 5.0), &white(10.0, 10.0)).is_none());
        assert!(rasterize_triangle(&mut t, &white(f32::NAN, 0.0), &white(10.0, 0.0), &white(0.0, 10.0)).is_none());
        assert!(rasterize_triangle(&mut t, &white(f32::INFINITY, 0.0), &white(10.0, 0.0), &white(0.0, 10.0)).is_none());
        assert_eq!(t.total(), 0);

        let strip = [white(0.0, 0.0), white(4.0, 4.0), white(8.0, 8.0), white(0.0, 8.0)];
        let stats = rasterize_strip(&mut t, &strip);
        assert_eq!(stats.triangles, 2);
        assert_eq!(stats.degenerate, 1);
        assert!(stats.pixels > 0);
    }

    #[test]
    fn test_short_strips_draw_nothing() {
        let mut t = CountingTarget::new(8, 8);
        for len in 0..3 {
            let strip: Vec<Vertex> = (0..len).map(|i| white(i as f32 * 4.0, 1.0)).collect();
            assert_eq!(rasterize_strip(&mut t, &strip), RasterStats::default());
        }
        assert_eq!(t.total(), 0);
    }

    #[test]
    fn test_framebuffer_pixels() {
        let mut fb = Framebuffer::new(4, 3);
        fb.clear(Color::BLUE);
        assert_eq!(fb.get_pixel(3, 2), Some(Color::BLUE));
        assert_eq!(fb.get_pixel(4, 0), None);

        rasterize_triangle(&mut fb, &white(0.0, 0.0), &white(3.0, 0.0), &white(0.0, 3.0));
        assert_eq!(fb.get_pixel(0, 0), Some(Color::WHITE));
        assert_eq!(fb.get_pixel(3, 2), Some(Color::BLUE));

        let flipped = fb.flip_vertical();
        assert_eq!(flipped.get_pixel(0, 2), Some(Color::WHITE));
        assert_eq!(flipped.get_pixel(3, 0), Some(Color::BLUE));

        fb.resize(2, 2);
        assert_eq!(fb.pixels.len(), 16);
        assert_eq!(fb.get_pixel(1, 1), Some(Color::with_alpha(0, 0, 0, 0)));
    }
}
