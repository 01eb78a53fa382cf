//! # Cursor Trails
//!
//! Sprites that follow the mouse pointer around a window.
//!
//! Two effects are provided:
//!
//! - **Springy**: a chain of sprites hanging off the pointer by one-sided
//!   springs, swinging under gravity and bouncing off the floor and side walls
//! - **Fade**: every pointer movement drops a sprite that drifts downward and
//!   shrinks away
//!
//! Effects are simulated and drawn on the CPU into a [`Surface`], one fixed
//! step per displayed frame. The window layer uploads the surface to the GPU
//! and presents it, optionally confined to a sub-rectangle of the window.
//!
//! ## Quick Start
//!
//! ```ignore
//! use cursor_trails::prelude::*;
//!
//! fn main() -> Result<(), TrailError> {
//!     let config = TrailConfig::default()
//!         .with_effect(EffectKind::Springy)
//!         .with_chain(ChainConfig::default().with_nodes(9));
//!     cursor_trails::run(config)
//! }
//! ```
//!
//! ## Headless Use
//!
//! The simulation does not need a window. Drive a [`Chain`] directly:
//!
//! ```ignore
//! let sprite = Sprite::from_glyph(Glyph::Zany, 16)?;
//! let mut chain = Chain::new(ChainConfig::default(), sprite, Vec2::new(250.0, 250.0))?;
//! let bounds = Bounds::new(500.0, 500.0);
//!
//! for frame in 0..100 {
//!     let pointer = Vec2::new(250.0 + frame as f32, 250.0);
//!     chain.advance(pointer, bounds);
//! }
//! ```
//!
//! or a [`Driver`], which owns the effect, the surface and the input state.
//!
//! ## Physics
//!
//! | Constant | Default | Meaning |
//! |----------|---------|---------|
//! | `nodes` | 7 | chain length including the anchor |
//! | `delta_t` | 0.01 | velocity integration step |
//! | `rest_length` | 10 | spring rest length in pixels |
//! | `stiffness` | 10 | spring constant |
//! | `mass` | 1 | node mass |
//! | `gravity` | 50 | downward acceleration |
//! | `resistance` | 10 | linear drag |
//! | `stop_velocity` | 0.1 | rest clamp velocity threshold |
//! | `stop_acceleration` | 0.1 | rest clamp acceleration threshold |
//! | `dot_size` | 11 | collision footprint |
//! | `bounce` | 0.7 | velocity kept after a bounce |

pub mod chain;
pub mod config;
pub mod driver;
pub mod effect;
pub mod error;
pub mod fade;
mod gpu;
pub mod input;
pub mod spring;
pub mod sprite;
pub mod surface;
pub mod time;
mod window;

pub use chain::{Chain, ChainConfig, ChainNode};
pub use config::TrailConfig;
pub use driver::Driver;
pub use effect::{Effect, EffectKind, SpringyChain};
pub use error::{ConfigError, GpuError, SpriteError, TrailError};
pub use fade::{FadeParticle, FadeTrail};
pub use glam::Vec2;
pub use gpu::Presenter;
pub use input::{FrameInput, HostRegion, Input, KeyCode, PointerSlot};
pub use sprite::{Glyph, GlyphSource, Sprite};
pub use surface::{Bounds, Surface};
pub use time::FrameClock;
pub use window::run;

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use cursor_trails::prelude::*;
/// ```
pub mod prelude {
    pub use crate::chain::{Chain, ChainConfig, ChainNode};
    pub use crate::config::TrailConfig;
    pub use crate::driver::Driver;
    pub use crate::effect::{Effect, EffectKind};
    pub use crate::error::TrailError;
    pub use crate::fade::FadeTrail;
    pub use crate::input::{FrameInput, HostRegion};
    pub use crate::sprite::{Glyph, GlyphSource, Sprite};
    pub use crate::surface::{Bounds, Surface};
    pub use crate::Vec2;
}
