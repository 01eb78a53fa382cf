//! Sprite bitmaps drawn at every chain node and fade particle.
//!
//! A [`Sprite`] is an immutable RGBA bitmap behind an `Arc`, so every node of
//! a chain can hold the same pixels without copying them. Sprites come from
//! three places:
//!
//! - [`Sprite::from_glyph`] - one of the built-in emoji faces, rasterized at
//!   the requested pixel size
//! - [`Sprite::from_file`] - any PNG or JPEG, scaled so its larger side
//!   matches the requested size
//! - [`Sprite::from_rgba`] - raw pixel data
//!
//! # Example
//!
//! ```ignore
//! let sprite = Sprite::from_glyph(Glyph::Zany, 16)?;
//! let custom = Sprite::from_file("assets/star.png", 24)?;
//! ```

use std::convert::Infallible;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use glam::Vec2;
use image::imageops::FilterType;
use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::error::SpriteError;

/// Built-in emoji glyphs with a procedural rasterization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Glyph {
    /// 🤪
    Zany,
    /// 😀
    Grin,
    /// 😂
    Joy,
    /// 😆
    Laugh,
    /// 😊
    Blush,
}

impl Glyph {
    /// Every built-in glyph.
    pub const ALL: [Glyph; 5] = [Glyph::Zany, Glyph::Grin, Glyph::Joy, Glyph::Laugh, Glyph::Blush];

    /// The emoji this glyph stands in for.
    pub fn emoji(self) -> &'static str {
        match self {
            Glyph::Zany => "🤪",
            Glyph::Grin => "😀",
            Glyph::Joy => "😂",
            Glyph::Laugh => "😆",
            Glyph::Blush => "😊",
        }
    }

    /// Look up the built-in glyph for an emoji string.
    pub fn from_emoji(emoji: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.emoji() == emoji.trim())
    }
}

/// Where a sprite's pixels come from, as written in configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GlyphSource {
    /// An emoji with a built-in rasterization.
    Emoji(String),
    /// An image file on disk.
    File(PathBuf),
}

impl GlyphSource {
    pub fn emoji(glyph: Glyph) -> Self {
        GlyphSource::Emoji(glyph.emoji().to_string())
    }

    /// Rasterize this source into a sprite `size` pixels across.
    pub fn load(&self, size: u32) -> Result<Sprite, SpriteError> {
        match self {
            GlyphSource::Emoji(e) => {
                let glyph =
                    Glyph::from_emoji(e).ok_or_else(|| SpriteError::UnknownGlyph(e.clone()))?;
                Sprite::from_glyph(glyph, size)
            }
            GlyphSource::File(path) => Sprite::from_file(path, size),
        }
    }
}

/// Known emoji parse to [`GlyphSource::Emoji`], anything else is a path.
impl FromStr for GlyphSource {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match Glyph::from_emoji(s) {
            Some(glyph) => GlyphSource::emoji(glyph),
            None => GlyphSource::File(PathBuf::from(s)),
        })
    }
}

/// Immutable, shareable RGBA bitmap.
#[derive(Debug, Clone)]
pub struct Sprite {
    pixels: Arc<RgbaImage>,
}

impl Sprite {
    /// Create a sprite from raw RGBA data (4 bytes per pixel).
    pub fn from_rgba(data: Vec<u8>, width: u32, height: u32) -> Result<Self, SpriteError> {
        let expected = width as usize * height as usize * 4;
        let found = data.len();
        if width == 0 || height == 0 {
            return Err(SpriteError::ZeroSize);
        }
        if found != expected {
            return Err(SpriteError::SizeMismatch { expected, found });
        }
        let img = RgbaImage::from_raw(width, height, data)
            .ok_or(SpriteError::SizeMismatch { expected, found })?;
        Ok(Self::from_image(img))
    }

    /// Wrap an already decoded image.
    pub fn from_image(img: RgbaImage) -> Self {
        Self {
            pixels: Arc::new(img),
        }
    }

    /// Load an image file, scaled so that its larger side is `size` pixels.
    pub fn from_file<P: AsRef<Path>>(path: P, size: u32) -> Result<Self, SpriteError> {
        if size == 0 {
            return Err(SpriteError::ZeroSize);
        }
        let img = image::open(path.as_ref())?.into_rgba8();
        let (w, h) = img.dimensions();
        let longest = w.max(h).max(1) as f32;
        let scale = size as f32 / longest;
        let nw = ((w as f32 * scale).round() as u32).max(1);
        let nh = ((h as f32 * scale).round() as u32).max(1);
        let resized = image::imageops::resize(&img, nw, nh, FilterType::Triangle);
        Ok(Self::from_image(resized))
    }

    /// Rasterize a built-in glyph into a `size` x `size` sprite.
    pub fn from_glyph(glyph: Glyph, size: u32) -> Result<Self, SpriteError> {
        if size == 0 {
            return Err(SpriteError::ZeroSize);
        }
        Ok(Self::from_image(rasterize(glyph, size)))
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Dimensions as a vector.
    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width() as f32, self.height() as f32)
    }

    /// The underlying pixels.
    pub fn image(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Whether two handles share the same pixel storage.
    pub fn ptr_eq(&self, other: &Sprite) -> bool {
        Arc::ptr_eq(&self.pixels, &other.pixels)
    }
}

// ========== Procedural glyphs ==========

const FACE: [u8; 4] = [255, 204, 77, 255];
const OUTLINE: [u8; 4] = [214, 140, 30, 255];
const FEATURE: [u8; 4] = [102, 69, 0, 255];
const WHITE: [u8; 4] = [255, 255, 255, 255];
const TONGUE: [u8; 4] = [240, 98, 146, 255];
const TEAR: [u8; 4] = [93, 173, 236, 255];
const CHEEK: [u8; 4] = [255, 138, 128, 255];

/// Supersampling grid per pixel edge.
const SAMPLES: u32 = 3;

fn rasterize(glyph: Glyph, size: u32) -> RgbaImage {
    let mut img = RgbaImage::new(size, size);
    let n = (SAMPLES * SAMPLES) as f32;
    for y in 0..size {
        for x in 0..size {
            // Premultiplied accumulation so transparent samples don't darken edges
            let mut acc = [0.0f32; 4];
            for sy in 0..SAMPLES {
                for sx in 0..SAMPLES {
                    let fx = x as f32 + (sx as f32 + 0.5) / SAMPLES as f32;
                    let fy = y as f32 + (sy as f32 + 0.5) / SAMPLES as f32;
                    // Map to [-1, 1] with y pointing down
                    let u = fx / size as f32 * 2.0 - 1.0;
                    let v = fy / size as f32 * 2.0 - 1.0;
                    if let Some(c) = shade(glyph, u, v) {
                        let a = c[3] as f32 / 255.0;
                        acc[0] += c[0] as f32 * a;
                        acc[1] += c[1] as f32 * a;
                        acc[2] += c[2] as f32 * a;
                        acc[3] += a;
                    }
                }
            }
            let alpha = acc[3] / n;
            if alpha > 0.0 {
                let inv = 1.0 / acc[3];
                img.put_pixel(
                    x,
                    y,
                    Rgba([
                        (acc[0] * inv).round() as u8,
                        (acc[1] * inv).round() as u8,
                        (acc[2] * inv).round() as u8,
                        (alpha * 255.0).round() as u8,
                    ]),
                );
            }
        }
    }
    img
}

fn disc(u: f32, v: f32, cx: f32, cy: f32, r: f32) -> bool {
    let (du, dv) = (u - cx, v - cy);
    du * du + dv * dv <= r * r
}

fn ring(u: f32, v: f32, cx: f32, cy: f32, r: f32, thickness: f32) -> bool {
    let d = ((u - cx).powi(2) + (v - cy).powi(2)).sqrt();
    (d - r).abs() <= thickness
}

fn segment(u: f32, v: f32, a: (f32, f32), b: (f32, f32), thickness: f32) -> bool {
    let (px, py) = (u - a.0, v - a.1);
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let t = ((px * dx + py * dy) / (dx * dx + dy * dy)).clamp(0.0, 1.0);
    let (ex, ey) = (px - dx * t, py - dy * t);
    ex * ex + ey * ey <= thickness * thickness
}

fn shade(glyph: Glyph, u: f32, v: f32) -> Option<[u8; 4]> {
    // Tears sit partly outside the face
    if glyph == Glyph::Joy && (disc(u, v, -0.82, 0.1, 0.17) || disc(u, v, 0.82, 0.1, 0.17)) {
        return Some(TEAR);
    }

    let r = (u * u + v * v).sqrt();
    if r > 0.95 {
        return None;
    }
    let mut c = if r > 0.88 { OUTLINE } else { FACE };

    let open_mouth = disc(u, v, 0.0, 0.2, 0.45) && v > 0.2;

    match glyph {
        Glyph::Zany => {
            if open_mouth {
                c = FEATURE;
            }
            if disc(u, v, 0.12, 0.52, 0.17) && v > 0.3 {
                c = TONGUE;
            }
            // Mismatched eyes
            if disc(u, v, -0.33, -0.3, 0.19) {
                c = WHITE;
            }
            if disc(u, v, -0.3, -0.28, 0.08) {
                c = FEATURE;
            }
            if disc(u, v, 0.35, -0.22, 0.09) {
                c = FEATURE;
            }
        }
        Glyph::Grin => {
            if open_mouth {
                c = if v < 0.34 { WHITE } else { FEATURE };
            }
            if disc(u, v, -0.3, -0.25, 0.1) || disc(u, v, 0.3, -0.25, 0.1) {
                c = FEATURE;
            }
        }
        Glyph::Joy => {
            if open_mouth {
                c = if v < 0.32 { WHITE } else { FEATURE };
            }
            let eye = |cx: f32| ring(u, v, cx, -0.15, 0.15, 0.045) && v < -0.15;
            if eye(-0.33) || eye(0.33) {
                c = FEATURE;
            }
        }
        Glyph::Laugh => {
            if open_mouth {
                c = FEATURE;
            }
            let t = 0.045;
            let left = segment(u, v, (-0.52, -0.42), (-0.2, -0.25), t)
                || segment(u, v, (-0.2, -0.25), (-0.52, -0.08), t);
            let right = segment(u, v, (0.52, -0.42), (0.2, -0.25), t)
                || segment(u, v, (0.2, -0.25), (0.52, -0.08), t);
            if left || right {
                c = FEATURE;
            }
        }
        Glyph::Blush => {
            if disc(u, v, -0.55, 0.18, 0.14) || disc(u, v, 0.55, 0.18, 0.14) {
                c = CHEEK;
            }
            if ring(u, v, 0.0, 0.0, 0.5, 0.05) && v > 0.28 {
                c = FEATURE;
            }
            let eye = |cx: f32| ring(u, v, cx, -0.15, 0.15, 0.045) && v < -0.15;
            if eye(-0.33) || eye(0.33) {
                c = FEATURE;
            }
        }
    }
    Some(c)
}
