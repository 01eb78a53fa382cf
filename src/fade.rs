//! Fade trail: short-lived sprites that drop away from the pointer.
//!
//! Every pointer sample spawns one particle carrying a random sprite. A
//! particle drifts sideways, falls with a small constant pull, shrinks as its
//! life runs down and is removed once the life counter goes negative. There
//! is no interaction between particles.
//!
//! Lifetimes and velocities are measured in frames, not seconds.

use std::ops::Range;

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::error::ConfigError;
use crate::sprite::Sprite;
use crate::surface::Surface;

/// Lifetime range in frames.
const LIFE_FRAMES: Range<i32> = 80..140;
/// Largest sideways speed in either direction.
const MAX_DRIFT: f32 = 0.5;
/// Range of the initial downward speed.
const FALL_SPEED: Range<f32> = 0.8..1.2;
/// Downward speed gained per frame.
const FALL_ACCEL: f32 = 0.05;

/// One fading sprite.
#[derive(Debug, Clone)]
pub struct FadeParticle {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Frames left; the particle dies when this drops below zero.
    pub life: i32,
    pub initial_life: i32,
    sprite: usize,
}

impl FadeParticle {
    /// Size multiplier, 1.0 at birth shrinking to 0.0.
    pub fn scale(&self) -> f32 {
        (self.life as f32 / self.initial_life as f32).max(0.0)
    }

    fn step(&mut self) {
        self.position += self.velocity;
        self.life -= 1;
        self.velocity.y += FALL_ACCEL;
    }
}

/// The set of live fade particles.
#[derive(Debug, Clone)]
pub struct FadeTrail {
    sprites: Vec<Sprite>,
    particles: Vec<FadeParticle>,
    rng: SmallRng,
}

impl FadeTrail {
    /// Create an empty trail that picks from `sprites` when spawning.
    pub fn new(sprites: Vec<Sprite>, seed: u64) -> Result<Self, ConfigError> {
        if sprites.is_empty() {
            return Err(ConfigError::NoSprites);
        }
        Ok(Self {
            sprites,
            particles: Vec::new(),
            rng: SmallRng::seed_from_u64(seed),
        })
    }

    /// Spawn one particle at `position`. Non-finite positions are dropped.
    pub fn spawn(&mut self, position: Vec2) {
        if !position.is_finite() {
            log::warn!("ignoring non-finite spawn position {:?}", position);
            return;
        }
        let life = self.rng.gen_range(LIFE_FRAMES);
        let side = if self.rng.gen_bool(0.5) { -1.0 } else { 1.0 };
        let velocity = Vec2::new(
            side * self.rng.gen_range(0.0..MAX_DRIFT),
            self.rng.gen_range(FALL_SPEED),
        );
        let sprite = self.rng.gen_range(0..self.sprites.len());
        self.particles.push(FadeParticle {
            position,
            velocity,
            life,
            initial_life: life,
            sprite,
        });
    }

    /// Move every particle one frame and drop the expired ones.
    pub fn advance(&mut self) {
        for p in &mut self.particles {
            p.step();
        }
        self.particles.retain(|p| p.life >= 0);
    }

    /// Draw every live particle. Width and height shrink with life, and the
    /// sprite stays horizontally centred while its top edge stays put.
    pub fn draw(&self, surface: &mut Surface) {
        for p in &self.particles {
            let sprite = &self.sprites[p.sprite];
            let scale = p.scale();
            let size = sprite.size();
            let top_left = Vec2::new(
                p.position.x - size.x / 2.0 * scale,
                p.position.y - size.y / 2.0,
            );
            surface.draw_sprite(sprite, top_left, Vec2::splat(scale));
        }
    }

    pub fn particles(&self) -> &[FadeParticle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sprite::Glyph;

    fn trail(seed: u64) -> FadeTrail {
        let sprites = Glyph::ALL
            .iter()
            .map(|g| Sprite::from_glyph(*g, 8).unwrap())
            .collect();
        FadeTrail::new(sprites, seed).unwrap()
    }

    #[test]
    fn test_requires_sprites() {
        assert_eq!(FadeTrail::new(Vec::new(), 1).unwrap_err(), ConfigError::NoSprites);
    }

    #[test]
    fn test_spawn_ranges() {
        let mut t = trail(7);
        for _ in 0..200 {
            t.spawn(Vec2::new(50.0, 50.0));
        }
        for p in t.particles() {
            assert!(LIFE_FRAMES.contains(&p.life));
            assert_eq!(p.life, p.initial_life);
            assert!(p.velocity.x.abs() < MAX_DRIFT);
            assert!(FALL_SPEED.contains(&p.velocity.y));
            assert_eq!(p.scale(), 1.0);
        }
    }

    #[test]
    fn test_particle_expires_after_life_plus_one_frames() {
        let mut t = trail(3);
        t.spawn(Vec2::ZERO);
        let life = t.particles()[0].initial_life;
        for _ in 0..life {
            t.advance();
        }
        // life == 0 is still alive
        assert_eq!(t.len(), 1);
        assert_eq!(t.particles()[0].scale(), 0.0);
        t.advance();
        assert!(t.is_empty());
    }

    #[test]
    fn test_fall_accelerates() {
        let mut t = trail(11);
        t.spawn(Vec2::ZERO);
        let vy0 = t.particles()[0].velocity.y;
        t.advance();
        t.advance();
        let p = &t.particles()[0];
        assert!((p.velocity.y - (vy0 + 2.0 * FALL_ACCEL)).abs() < 1e-5);
        assert!(p.position.y > 0.0);
    }

    #[test]
    fn test_seeded_runs_match() {
        let mut a = trail(42);
        let mut b = trail(42);
        for i in 0..20 {
            let pos = Vec2::new(i as f32, 2.0 * i as f32);
            a.spawn(pos);
            b.spawn(pos);
            a.advance();
            b.advance();
        }
        let pa: Vec<_> = a.particles().iter().map(|p| (p.position, p.life)).collect();
        let pb: Vec<_> = b.particles().iter().map(|p| (p.position, p.life)).collect();
        assert_eq!(pa, pb);
    }

    #[test]
    fn test_draw_marks_surface() {
        let mut t = trail(5);
        t.spawn(Vec2::new(16.0, 16.0));
        let mut surface = Surface::new(32, 32);
        t.draw(&mut surface);
        assert!(surface.as_raw().chunks(4).any(|px| px[3] > 0));
    }

    #[test]
    fn test_non_finite_spawn_dropped() {
        let mut t = trail(5);
        t.spawn(Vec2::new(f32::NAN, 0.0));
        assert!(t.is_empty());
    }
}
