//! Serializable configuration for a trail window.
//!
//! Every field has a default, so an empty JSON object is a valid config.
//! Glyphs and glyph size left unset resolve to the defaults of the selected
//! effect.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::chain::{Chain, ChainConfig};
use crate::effect::{Effect, EffectKind, SpringyChain};
use crate::error::{ConfigError, TrailError};
use crate::fade::FadeTrail;
use crate::input::HostRegion;
use crate::sprite::{Glyph, GlyphSource, Sprite};
use crate::surface::Bounds;

/// Default glyph size of the spring chain in pixels.
pub const CHAIN_GLYPH_SIZE: u32 = 16;
/// Default glyph size of the fade trail in pixels.
pub const FADE_GLYPH_SIZE: u32 = 21;
/// Default fade trail seed.
pub const DEFAULT_SEED: u64 = 0x5EED;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailConfig {
    /// Effect to run.
    pub effect: EffectKind,
    /// Sprite sources. Empty means the effect's built-in glyphs.
    pub glyphs: Vec<GlyphSource>,
    /// Sprite size in pixels. `None` means the effect's default.
    pub glyph_size: Option<u32>,
    /// Confine the effect to part of the window.
    pub host_surface: Option<HostRegion>,
    /// Spring chain parameters, used by the springy effect.
    pub chain: ChainConfig,
    /// Random seed of the fade trail.
    pub seed: u64,
    /// Window clear colour, straight RGBA in 0..=1.
    pub background: [f32; 4],
    /// Opacity applied to the whole trail when presenting, in 0..=1.
    pub opacity: f32,
    /// Initial window size in pixels, `[width, height]`.
    pub window_size: [u32; 2],
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            effect: EffectKind::Springy,
            glyphs: Vec::new(),
            glyph_size: None,
            host_surface: None,
            chain: ChainConfig::default(),
            seed: DEFAULT_SEED,
            background: [0.0, 0.0, 0.0, 0.0],
            opacity: 1.0,
            window_size: [1280, 720],
        }
    }
}

impl TrailConfig {
    pub fn with_effect(mut self, effect: EffectKind) -> Self {
        self.effect = effect;
        self
    }

    pub fn with_glyphs(mut self, glyphs: Vec<GlyphSource>) -> Self {
        self.glyphs = glyphs;
        self
    }

    pub fn with_glyph_size(mut self, size: u32) -> Self {
        self.glyph_size = Some(size);
        self
    }

    pub fn with_host_surface(mut self, host: HostRegion) -> Self {
        self.host_surface = Some(host);
        self
    }

    pub fn with_chain(mut self, chain: ChainConfig) -> Self {
        self.chain = chain;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), TrailError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, TrailError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String, TrailError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, TrailError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Glyph sources after applying the effect's defaults.
    pub fn resolved_glyphs(&self) -> Vec<GlyphSource> {
        if !self.glyphs.is_empty() {
            return self.glyphs.clone();
        }
        match self.effect {
            EffectKind::Springy => vec![GlyphSource::emoji(Glyph::Zany)],
            EffectKind::Fade => [Glyph::Grin, Glyph::Joy, Glyph::Laugh, Glyph::Blush]
                .into_iter()
                .map(GlyphSource::emoji)
                .collect(),
        }
    }

    /// Glyph size after applying the effect's default.
    pub fn resolved_glyph_size(&self) -> u32 {
        self.glyph_size.unwrap_or(match self.effect {
            EffectKind::Springy => CHAIN_GLYPH_SIZE,
            EffectKind::Fade => FADE_GLYPH_SIZE,
        })
    }

    /// Same config with every defaulted field filled in.
    pub fn resolved(&self) -> Self {
        Self {
            glyphs: self.resolved_glyphs(),
            glyph_size: Some(self.resolved_glyph_size()),
            ..self.clone()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(host) = self.host_surface {
            if host.width == 0 || host.height == 0 {
                return Err(ConfigError::EmptyHostRegion);
            }
        }
        if !(self.opacity.is_finite() && (0.0..=1.0).contains(&self.opacity)) {
            return Err(ConfigError::InvalidParameter {
                name: "opacity",
                value: self.opacity,
            });
        }
        match self.effect {
            EffectKind::Springy => self.chain.validate(),
            EffectKind::Fade => Ok(()),
        }
    }

    /// Load the sprites for the configured glyphs.
    pub fn load_sprites(&self) -> Result<Vec<Sprite>, TrailError> {
        let size = self.resolved_glyph_size();
        let sprites = self
            .resolved_glyphs()
            .iter()
            .map(|g| g.load(size))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(sprites)
    }

    /// Build the configured effect for a surface of size `bounds`.
    ///
    /// The chain starts with every node at the centre of the surface.
    pub fn build_effect(&self, bounds: Bounds) -> Result<Box<dyn Effect>, TrailError> {
        self.validate()?;
        let sprites = self.load_sprites()?;
        match self.effect {
            EffectKind::Springy => {
                // The chain uses a single sprite
                if sprites.len() > 1 {
                    log::warn!("springy effect uses only the first of {} glyphs", sprites.len());
                }
                let sprite = sprites.into_iter().next().ok_or(ConfigError::NoSprites)?;
                let chain = Chain::new(self.chain, sprite, bounds.center())?;
                Ok(Box::new(SpringyChain::new(chain)))
            }
            EffectKind::Fade => Ok(Box::new(FadeTrail::new(sprites, self.seed)?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_is_default() {
        let config = TrailConfig::from_json("{}").unwrap();
        assert_eq!(config, TrailConfig::default());
    }

    #[test]
    fn test_partial_chain_json() {
        let config =
            TrailConfig::from_json(r#"{"effect":"fade","chain":{"nodes":3}}"#).unwrap();
        assert_eq!(config.effect, EffectKind::Fade);
        assert_eq!(config.chain.nodes, 3);
        assert_eq!(config.chain.gravity, 50.0);
    }

    #[test]
    fn test_effect_names_match_cli() {
        let config = TrailConfig::from_json(r#"{"effect":"springy"}"#).unwrap();
        assert_eq!(config.effect, EffectKind::Springy);

        let json = TrailConfig::default().with_effect(EffectKind::Fade).to_json().unwrap();
        assert!(json.contains(r#""effect": "fade""#), "{}", json);
        assert!(TrailConfig::from_json(r#"{"effect":"Fade"}"#).is_err());
    }

    #[test]
    fn test_resolved_defaults_per_effect() {
        let springy = TrailConfig::default();
        assert_eq!(springy.resolved_glyph_size(), 16);
        assert_eq!(springy.resolved_glyphs(), vec![GlyphSource::emoji(Glyph::Zany)]);

        let fade = TrailConfig::default().with_effect(EffectKind::Fade);
        assert_eq!(fade.resolved_glyph_size(), 21);
        assert_eq!(fade.resolved_glyphs().len(), 4);

        let custom = fade.with_glyph_size(30);
        assert_eq!(custom.resolved().glyph_size, Some(30));
    }

    #[test]
    fn test_validate_host_region() {
        let config = TrailConfig::default().with_host_surface(HostRegion::new(0, 0, 0, 10));
        assert_eq!(config.validate(), Err(ConfigError::EmptyHostRegion));
    }

    #[test]
    fn test_validate_opacity() {
        let config = TrailConfig {
            opacity: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidParameter { name: "opacity", .. })
        ));
    }

    #[test]
    fn test_build_effect() {
        let bounds = Bounds::new(200.0, 100.0);
        let effect = TrailConfig::default().build_effect(bounds).unwrap();
        assert_eq!(effect.name(), "springy");

        let effect = TrailConfig::default()
            .with_effect(EffectKind::Fade)
            .build_effect(bounds)
            .unwrap();
        assert_eq!(effect.name(), "fade");
    }

    #[test]
    fn test_build_effect_unknown_glyph() {
        let config = TrailConfig::default().with_glyphs(vec![GlyphSource::Emoji("🦀".into())]);
        let err = config.build_effect(Bounds::new(10.0, 10.0)).err().unwrap();
        assert!(matches!(err, TrailError::Sprite(_)));
    }

    #[test]
    fn test_build_effect_invalid_chain() {
        let config = TrailConfig::default().with_chain(ChainConfig::default().with_nodes(0));
        let err = config.build_effect(Bounds::new(10.0, 10.0)).err().unwrap();
        assert!(matches!(err, TrailError::Config(ConfigError::EmptyChain)));
    }
}
