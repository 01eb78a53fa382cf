//! Spring chain simulator.
//!
//! A chain is an open sequence of point masses. Node 0 is the anchor and is
//! pinned to the pointer every frame; the remaining nodes hang off it through
//! one-sided springs (see [`crate::spring`]) and fall under gravity, slowed by
//! linear drag, until they bounce off the floor or the side walls.
//!
//! # Stepping
//!
//! [`Chain::advance`] moves every free node by one fixed timestep. Nodes are
//! visited in ascending index order and each node reads the positions its
//! neighbours have *right now*, so node `i` sees node `i - 1` already moved
//! this frame while node `i + 1` is still where it was last frame. That
//! ordering produces the follow-the-leader whip and must stay sequential.
//!
//! Velocity integrates with `delta_t`, but position adds the raw velocity
//! each frame. The two timescales differ on purpose: the default constants
//! were tuned against exactly this integrator.
//!
//! # Example
//!
//! ```ignore
//! let sprite = Sprite::from_glyph(Glyph::Zany, 16)?;
//! let mut chain = Chain::new(ChainConfig::default(), sprite, Vec2::new(400.0, 300.0))?;
//!
//! // Once per frame:
//! let nodes = chain.advance(pointer, surface.bounds());
//! ```

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::spring;
use crate::sprite::Sprite;
use crate::surface::Bounds;

/// Physical constants of a chain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Number of nodes including the anchor.
    pub nodes: usize,
    /// Timestep used for velocity integration.
    pub delta_t: f32,
    /// Spring rest length in pixels.
    pub rest_length: f32,
    /// Spring stiffness.
    pub stiffness: f32,
    /// Mass of every free node.
    pub mass: f32,
    /// Downward acceleration.
    pub gravity: f32,
    /// Linear drag coefficient.
    pub resistance: f32,
    /// Velocity below which a node may come to rest.
    pub stop_velocity: f32,
    /// Acceleration below which a node may come to rest.
    pub stop_acceleration: f32,
    /// Sprite footprint used for collisions.
    pub dot_size: f32,
    /// Fraction of velocity kept after bouncing off a wall.
    pub bounce: f32,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            nodes: 7,
            delta_t: 0.01,
            rest_length: 10.0,
            stiffness: 10.0,
            mass: 1.0,
            gravity: 50.0,
            resistance: 10.0,
            stop_velocity: 0.1,
            stop_acceleration: 0.1,
            dot_size: 11.0,
            bounce: 0.7,
        }
    }
}

impl ChainConfig {
    pub fn with_nodes(mut self, nodes: usize) -> Self {
        self.nodes = nodes;
        self
    }

    pub fn with_delta_t(mut self, delta_t: f32) -> Self {
        self.delta_t = delta_t;
        self
    }

    pub fn with_spring(mut self, rest_length: f32, stiffness: f32) -> Self {
        self.rest_length = rest_length;
        self.stiffness = stiffness;
        self
    }

    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_resistance(mut self, resistance: f32) -> Self {
        self.resistance = resistance;
        self
    }

    pub fn with_rest_thresholds(mut self, velocity: f32, acceleration: f32) -> Self {
        self.stop_velocity = velocity;
        self.stop_acceleration = acceleration;
        self
    }

    pub fn with_dot_size(mut self, dot_size: f32) -> Self {
        self.dot_size = dot_size;
        self
    }

    pub fn with_bounce(mut self, bounce: f32) -> Self {
        self.bounce = bounce;
        self
    }

    /// Reject configurations that could divide by zero or go non-finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.nodes == 0 {
            return Err(ConfigError::EmptyChain);
        }
        if !(self.mass.is_finite() && self.mass > 0.0) {
            return Err(ConfigError::NonPositiveMass(self.mass));
        }
        if !(self.delta_t.is_finite() && self.delta_t > 0.0) {
            return Err(ConfigError::NonPositiveTimestep(self.delta_t));
        }
        let non_negative = [
            ("rest_length", self.rest_length),
            ("stiffness", self.stiffness),
            ("resistance", self.resistance),
            ("stop_velocity", self.stop_velocity),
            ("stop_acceleration", self.stop_acceleration),
            ("dot_size", self.dot_size),
            ("bounce", self.bounce),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::InvalidParameter { name, value });
            }
        }
        // Gravity may point either way, it only has to be finite
        if !self.gravity.is_finite() {
            return Err(ConfigError::InvalidParameter {
                name: "gravity",
                value: self.gravity,
            });
        }
        Ok(())
    }
}

/// One point mass of the chain.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChainNode {
    pub position: Vec2,
    pub velocity: Vec2,
}

impl ChainNode {
    fn at(position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
        }
    }
}

/// A pointer-anchored spring chain.
#[derive(Debug, Clone)]
pub struct Chain {
    config: ChainConfig,
    nodes: Vec<ChainNode>,
    sprite: Sprite,
}

impl Chain {
    /// Build a chain with every node resting at `anchor`.
    pub fn new(config: ChainConfig, sprite: Sprite, anchor: Vec2) -> Result<Self, ConfigError> {
        config.validate()?;
        if !anchor.is_finite() {
            return Err(ConfigError::NonFinitePosition { index: 0 });
        }
        Ok(Self {
            nodes: vec![ChainNode::at(anchor); config.nodes],
            config,
            sprite,
        })
    }

    /// Build a chain from explicit initial positions, one per node.
    pub fn from_positions(
        config: ChainConfig,
        sprite: Sprite,
        positions: &[Vec2],
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if positions.len() != config.nodes {
            return Err(ConfigError::NodeCountMismatch {
                expected: config.nodes,
                found: positions.len(),
            });
        }
        if let Some(index) = positions.iter().position(|p| !p.is_finite()) {
            return Err(ConfigError::NonFinitePosition { index });
        }
        Ok(Self {
            nodes: positions.iter().copied().map(ChainNode::at).collect(),
            config,
            sprite,
        })
    }

    /// Advance the chain by one timestep with the anchor pinned at `anchor`.
    ///
    /// A non-finite anchor is ignored for this frame and the previous anchor
    /// position is kept; the free nodes still step.
    pub fn advance(&mut self, anchor: Vec2, bounds: Bounds) -> &[ChainNode] {
        if anchor.is_finite() {
            self.nodes[0].position = anchor;
        } else {
            log::warn!("ignoring non-finite anchor position {:?}", anchor);
        }

        for i in 1..self.nodes.len() {
            let spring = net_spring_force(&self.nodes, i, &self.config);
            integrate(&mut self.nodes[i], spring, &self.config);
            collide(&mut self.nodes[i], &self.config, bounds);
        }

        &self.nodes
    }

    pub fn nodes(&self) -> &[ChainNode] {
        &self.nodes
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    pub fn sprite(&self) -> &Sprite {
        &self.sprite
    }

    /// Current anchor position.
    pub fn anchor(&self) -> Vec2 {
        self.nodes[0].position
    }

    /// True once every free node has been clamped to rest.
    pub fn is_settled(&self) -> bool {
        self.nodes[1..].iter().all(|n| n.velocity == Vec2::ZERO)
    }

    /// Sprites to draw this frame, centred on each free node in index order.
    ///
    /// The anchor sits under the pointer and is not drawn.
    pub fn draw_list(&self) -> impl Iterator<Item = (&Sprite, Vec2)> + '_ {
        self.nodes[1..].iter().map(move |n| (&self.sprite, n.position))
    }
}

/// Net pull of node `i`'s neighbours, using their current positions.
fn net_spring_force(nodes: &[ChainNode], i: usize, config: &ChainConfig) -> Vec2 {
    let mut spring = Vec2::ZERO;
    let here = nodes[i].position;
    if i > 0 {
        spring::accumulate(&mut spring, nodes[i - 1].position, here, config.rest_length, config.stiffness);
    }
    if i + 1 < nodes.len() {
        spring::accumulate(&mut spring, nodes[i + 1].position, here, config.rest_length, config.stiffness);
    }
    spring
}

/// Drag, gravity, Euler velocity step, rest clamp, then unit position step.
fn integrate(node: &mut ChainNode, spring: Vec2, config: &ChainConfig) {
    let resist = -node.velocity * config.resistance;
    let accel = Vec2::new(
        (spring.x + resist.x) / config.mass,
        (spring.y + resist.y) / config.mass + config.gravity,
    );

    node.velocity += config.delta_t * accel;

    if node.velocity.x.abs() < config.stop_velocity
        && node.velocity.y.abs() < config.stop_velocity
        && accel.x.abs() < config.stop_acceleration
        && accel.y.abs() < config.stop_acceleration
    {
        node.velocity = Vec2::ZERO;
    }

    node.position += node.velocity;
}

/// Floor, then right wall, then left wall. There is no ceiling.
fn collide(node: &mut ChainNode, config: &ChainConfig, bounds: Bounds) {
    let floor = bounds.height - config.dot_size - 1.0;
    if node.position.y >= floor {
        if node.velocity.y > 0.0 {
            node.velocity.y = -config.bounce * node.velocity.y;
        }
        node.position.y = floor;
    }

    if node.position.x >= bounds.width - config.dot_size {
        if node.velocity.x > 0.0 {
            node.velocity.x = -config.bounce * node.velocity.x;
        }
        node.position.x = bounds.width - config.dot_size - 1.0;
    }

    if node.position.x < 0.0 {
        if node.velocity.x < 0.0 {
            node.velocity.x = -config.bounce * node.velocity.x;
        }
        node.position.x = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sprite::Glyph;

    fn sprite() -> Sprite {
        Sprite::from_glyph(Glyph::Zany, 4).unwrap()
    }

    fn bounds() -> Bounds {
        Bounds::new(500.0, 500.0)
    }

    #[test]
    fn test_default_constants() {
        let c = ChainConfig::default();
        assert_eq!(c.nodes, 7);
        assert_eq!(c.delta_t, 0.01);
        assert_eq!(c.rest_length, 10.0);
        assert_eq!(c.stiffness, 10.0);
        assert_eq!(c.gravity, 50.0);
        assert_eq!(c.bounce, 0.7);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_config() {
        let c = ChainConfig::default().with_nodes(0);
        assert_eq!(c.validate(), Err(ConfigError::EmptyChain));

        let c = ChainConfig::default().with_mass(0.0);
        assert_eq!(c.validate(), Err(ConfigError::NonPositiveMass(0.0)));

        let c = ChainConfig::default().with_delta_t(-0.01);
        assert!(matches!(c.validate(), Err(ConfigError::NonPositiveTimestep(_))));

        let c = ChainConfig::default().with_bounce(f32::NAN);
        assert!(matches!(
            c.validate(),
            Err(ConfigError::InvalidParameter { name: "bounce", .. })
        ));
    }

    #[test]
    fn test_new_starts_all_nodes_at_anchor() {
        let anchor = Vec2::new(40.0, 60.0);
        let chain = Chain::new(ChainConfig::default(), sprite(), anchor).unwrap();
        assert_eq!(chain.nodes().len(), 7);
        assert!(chain.nodes().iter().all(|n| n.position == anchor));
        assert!(chain.is_settled());
    }

    #[test]
    fn test_from_positions_length_mismatch() {
        let err = Chain::from_positions(
            ChainConfig::default().with_nodes(3),
            sprite(),
            &[Vec2::ZERO, Vec2::ZERO],
        )
        .unwrap_err();
        assert_eq!(err, ConfigError::NodeCountMismatch { expected: 3, found: 2 });
    }

    #[test]
    fn test_single_node_chain_only_tracks_anchor() {
        let config = ChainConfig::default().with_nodes(1);
        let mut chain = Chain::new(config, sprite(), Vec2::ZERO).unwrap();
        let nodes = chain.advance(Vec2::new(5.0, 6.0), bounds());
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].position, Vec2::new(5.0, 6.0));
        assert_eq!(chain.draw_list().count(), 0);
    }

    #[test]
    fn test_non_finite_anchor_keeps_previous() {
        let mut chain = Chain::new(ChainConfig::default(), sprite(), Vec2::new(10.0, 10.0)).unwrap();
        chain.advance(Vec2::new(100.0, 50.0), bounds());
        chain.advance(Vec2::new(f32::NAN, 3.0), bounds());
        assert_eq!(chain.anchor(), Vec2::new(100.0, 50.0));
        chain.advance(Vec2::new(f32::INFINITY, 3.0), bounds());
        assert_eq!(chain.anchor(), Vec2::new(100.0, 50.0));
        assert!(chain.nodes().iter().all(|n| n.position.is_finite() && n.velocity.is_finite()));
    }

    #[test]
    fn test_rest_clamp_zeroes_small_motion() {
        let config = ChainConfig::default().with_gravity(0.0);
        let mut node = ChainNode {
            position: Vec2::new(10.0, 10.0),
            velocity: Vec2::new(0.05, -0.05),
        };
        // Drag-only acceleration is 10 * 0.05 = 0.5, above the 0.1 threshold
        integrate(&mut node, Vec2::ZERO, &config);
        assert_ne!(node.velocity, Vec2::ZERO);

        let mut node = ChainNode {
            position: Vec2::new(10.0, 10.0),
            velocity: Vec2::new(0.005, -0.005),
        };
        integrate(&mut node, Vec2::ZERO, &config);
        assert_eq!(node.velocity, Vec2::ZERO);
        assert_eq!(node.position, Vec2::new(10.0, 10.0));
    }

    #[test]
    fn test_floor_reflects_and_clamps() {
        let config = ChainConfig::default();
        let mut node = ChainNode {
            position: Vec2::new(100.0, 495.0),
            velocity: Vec2::new(0.0, 4.0),
        };
        collide(&mut node, &config, bounds());
        assert_eq!(node.position.y, 500.0 - 11.0 - 1.0);
        assert!((node.velocity.y + 0.7 * 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_floor_clamps_without_reflecting_upward_motion() {
        let config = ChainConfig::default();
        let mut node = ChainNode {
            position: Vec2::new(100.0, 499.0),
            velocity: Vec2::new(0.0, -2.0),
        };
        collide(&mut node, &config, bounds());
        assert_eq!(node.position.y, 488.0);
        assert_eq!(node.velocity.y, -2.0);
    }

    #[test]
    fn test_walls_reflect_and_clamp() {
        let config = ChainConfig::default();
        let mut right = ChainNode {
            position: Vec2::new(495.0, 100.0),
            velocity: Vec2::new(3.0, 0.0),
        };
        collide(&mut right, &config, bounds());
        assert_eq!(right.position.x, 500.0 - 11.0 - 1.0);
        assert!((right.velocity.x + 2.1).abs() < 1e-6);

        let mut left = ChainNode {
            position: Vec2::new(-4.0, 100.0),
            velocity: Vec2::new(-2.0, 0.0),
        };
        collide(&mut left, &config, bounds());
        assert_eq!(left.position.x, 0.0);
        assert!((left.velocity.x - 1.4).abs() < 1e-6);
    }

    #[test]
    fn test_no_ceiling() {
        let config = ChainConfig::default();
        let mut node = ChainNode {
            position: Vec2::new(100.0, -250.0),
            velocity: Vec2::new(0.0, -3.0),
        };
        collide(&mut node, &config, bounds());
        assert_eq!(node.position.y, -250.0);
        assert_eq!(node.velocity.y, -3.0);
    }

    #[test]
    fn test_draw_list_skips_anchor() {
        let chain = Chain::new(ChainConfig::default(), sprite(), Vec2::new(1.0, 2.0)).unwrap();
        let drawn: Vec<_> = chain.draw_list().collect();
        assert_eq!(drawn.len(), 6);
        assert!(drawn.iter().all(|(s, _)| s.ptr_eq(chain.sprite())));
    }
}
