//! Persistent CPU drawing surface.
//!
//! The surface owns one RGBA framebuffer for the lifetime of an effect. Each
//! frame the driver calls [`Surface::clear`] and redraws every sprite; the
//! buffer is only reallocated by [`Surface::resize`] when the dimensions
//! actually change.

use glam::Vec2;
use image::{Rgba, RgbaImage};

use crate::sprite::Sprite;

/// Width and height of the area the chain collides against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Centre point, used as the initial anchor.
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// RGBA framebuffer that sprites are composited onto.
#[derive(Debug, Clone)]
pub struct Surface {
    pixels: RgbaImage,
}

impl Surface {
    /// Create a transparent surface. Zero dimensions are bumped to one pixel.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::new(width.max(1), height.max(1)),
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.width() as f32, self.height() as f32)
    }

    /// Reset every pixel to transparent black, keeping the allocation.
    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    /// Change dimensions. Returns `false` if nothing changed.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        let (width, height) = (width.max(1), height.max(1));
        if width == self.width() && height == self.height() {
            return false;
        }
        self.pixels = RgbaImage::new(width, height);
        true
    }

    /// Raw RGBA bytes, row-major, for GPU upload.
    pub fn as_raw(&self) -> &[u8] {
        self.pixels.as_raw()
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.pixels.get_pixel(x, y).0
    }

    /// Draw a sprite centred on `center` at its natural size.
    pub fn draw_centered(&mut self, sprite: &Sprite, center: Vec2) {
        self.draw_sprite(sprite, center - sprite.size() / 2.0, Vec2::ONE);
    }

    /// Composite `sprite` with its top-left corner at `top_left`, stretched by
    /// `scale` per axis. Pixels falling outside the surface are clipped;
    /// non-positive or non-finite scales draw nothing.
    pub fn draw_sprite(&mut self, sprite: &Sprite, top_left: Vec2, scale: Vec2) {
        if !(top_left.is_finite() && scale.is_finite()) || scale.x <= 0.0 || scale.y <= 0.0 {
            return;
        }
        let dest = sprite.size() * scale;
        let x0 = top_left.x.round().max(0.0);
        let y0 = top_left.y.round().max(0.0);
        let x1 = (top_left.x + dest.x).round().min(self.width() as f32);
        let y1 = (top_left.y + dest.y).round().min(self.height() as f32);
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        let src = sprite.image();
        let (sw, sh) = (src.width(), src.height());
        for y in y0 as u32..y1 as u32 {
            // Nearest sample at the destination pixel centre
            let v = ((y as f32 + 0.5 - top_left.y) / scale.y).floor();
            let sy = (v.max(0.0) as u32).min(sh - 1);
            for x in x0 as u32..x1 as u32 {
                let u = ((x as f32 + 0.5 - top_left.x) / scale.x).floor();
                let sx = (u.max(0.0) as u32).min(sw - 1);
                let s = src.get_pixel(sx, sy);
                if s[3] == 0 {
                    continue;
                }
                let d = self.pixels.get_pixel_mut(x, y);
                *d = blend_over(*s, *d);
            }
        }
    }
}

/// Source-over compositing of straight-alpha colours.
fn blend_over(src: Rgba<u8>, dst: Rgba<u8>) -> Rgba<u8> {
    if src[3] == 255 {
        return src;
    }
    let sa = src[3] as f32 / 255.0;
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }
    let channel = |i: usize| {
        let c = (src[i] as f32 * sa + dst[i] as f32 * da * (1.0 - sa)) / out_a;
        c.round().clamp(0.0, 255.0) as u8
    };
    Rgba([channel(0), channel(1), channel(2), (out_a * 255.0).round() as u8])
}
