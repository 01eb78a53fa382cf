//! The two pointer-trail effects behind a common trait.
//!
//! [`Effect`] is the seam between the frame driver and an effect: the driver
//! hands over one [`FrameInput`] and the current surface bounds per frame,
//! then asks the effect to draw itself onto the cleared surface.

use std::fmt;
use std::str::FromStr;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::chain::{Chain, ChainNode};
use crate::fade::FadeTrail;
use crate::input::FrameInput;
use crate::surface::{Bounds, Surface};

/// A frame-driven trail effect.
pub trait Effect {
    /// Short name used in log output.
    fn name(&self) -> &'static str;

    /// Step the effect by one frame.
    fn advance(&mut self, input: &FrameInput, bounds: Bounds);

    /// Draw the current state onto `surface`, which has just been cleared.
    fn draw(&self, surface: &mut Surface);
}

/// Which effect to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectKind {
    /// A spring chain hanging off the pointer.
    #[default]
    Springy,
    /// Sprites that fall away from the pointer and shrink.
    Fade,
}

impl EffectKind {
    pub fn name(self) -> &'static str {
        match self {
            EffectKind::Springy => "springy",
            EffectKind::Fade => "fade",
        }
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EffectKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "springy" | "spring" | "chain" => Ok(EffectKind::Springy),
            "fade" | "trail" => Ok(EffectKind::Fade),
            other => Err(format!("unknown effect '{}', expected 'springy' or 'fade'", other)),
        }
    }
}

/// Spring chain pinned to the latest pointer position.
///
/// Until the first pointer event arrives the anchor stays where the chain
/// was created.
#[derive(Debug, Clone)]
pub struct SpringyChain {
    chain: Chain,
    anchor: Vec2,
}

impl SpringyChain {
    pub fn new(chain: Chain) -> Self {
        let anchor = chain.anchor();
        Self { chain, anchor }
    }

    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    pub fn nodes(&self) -> &[ChainNode] {
        self.chain.nodes()
    }
}

impl Effect for SpringyChain {
    fn name(&self) -> &'static str {
        EffectKind::Springy.name()
    }

    fn advance(&mut self, input: &FrameInput, bounds: Bounds) {
        if let Some(pointer) = input.pointer {
            self.anchor = pointer;
        }
        self.chain.advance(self.anchor, bounds);
    }

    fn draw(&self, surface: &mut Surface) {
        for (sprite, center) in self.chain.draw_list() {
            surface.draw_centered(sprite, center);
        }
    }
}

impl Effect for FadeTrail {
    fn name(&self) -> &'static str {
        EffectKind::Fade.name()
    }

    fn advance(&mut self, input: &FrameInput, _bounds: Bounds) {
        for &sample in &input.samples {
            self.spawn(sample);
        }
        FadeTrail::advance(self);
    }

    fn draw(&self, surface: &mut Surface) {
        FadeTrail::draw(self, surface);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::ChainConfig;
    use crate::sprite::{Glyph, Sprite};

    fn springy(anchor: Vec2) -> SpringyChain {
        let sprite = Sprite::from_glyph(Glyph::Zany, 16).unwrap();
        SpringyChain::new(Chain::new(ChainConfig::default(), sprite, anchor).unwrap())
    }

    #[test]
    fn test_effect_kind_parse() {
        assert_eq!("springy".parse::<EffectKind>(), Ok(EffectKind::Springy));
        assert_eq!("Fade".parse::<EffectKind>(), Ok(EffectKind::Fade));
        assert!("sparkle".parse::<EffectKind>().is_err());
        assert_eq!(EffectKind::default(), EffectKind::Springy);
    }

    #[test]
    fn test_springy_keeps_anchor_without_pointer() {
        let mut effect = springy(Vec2::new(250.0, 250.0));
        effect.advance(&FrameInput::default(), Bounds::new(500.0, 500.0));
        assert_eq!(effect.chain().anchor(), Vec2::new(250.0, 250.0));

        let input = FrameInput {
            pointer: Some(Vec2::new(10.0, 20.0)),
            samples: vec![Vec2::new(10.0, 20.0)],
        };
        effect.advance(&input, Bounds::new(500.0, 500.0));
        assert_eq!(effect.chain().anchor(), Vec2::new(10.0, 20.0));

        // Pointer gone quiet: the anchor stays put
        effect.advance(&FrameInput::default(), Bounds::new(500.0, 500.0));
        assert_eq!(effect.chain().anchor(), Vec2::new(10.0, 20.0));
    }

    #[test]
    fn test_springy_draws_free_nodes() {
        let mut effect = springy(Vec2::new(50.0, 50.0));
        let mut surface = Surface::new(100, 100);
        effect.advance(&FrameInput::default(), surface.bounds());
        effect.draw(&mut surface);
        assert!(surface.as_raw().chunks(4).any(|px| px[3] > 0));
    }

    #[test]
    fn test_fade_spawns_per_sample() {
        let sprites = vec![Sprite::from_glyph(Glyph::Grin, 21).unwrap()];
        let mut trail = FadeTrail::new(sprites, 9).unwrap();
        let input = FrameInput {
            pointer: Some(Vec2::new(3.0, 3.0)),
            samples: vec![Vec2::new(1.0, 1.0), Vec2::new(2.0, 2.0), Vec2::new(3.0, 3.0)],
        };
        Effect::advance(&mut trail, &input, Bounds::new(100.0, 100.0));
        assert_eq!(trail.len(), 3);

        Effect::advance(&mut trail, &FrameInput::default(), Bounds::new(100.0, 100.0));
        assert_eq!(trail.len(), 3);
    }
}
