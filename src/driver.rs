//! Headless frame loop.
//!
//! [`Driver`] owns the effect, the drawing surface, the input state and the
//! frame clock. It knows nothing about windows or GPUs: the window layer
//! forwards events into [`Driver::handle_event`] and presents whatever
//! [`Driver::frame`] returns. Tests drive it directly.

use winit::event::WindowEvent;

use crate::config::TrailConfig;
use crate::effect::Effect;
use crate::error::TrailError;
use crate::input::{HostRegion, Input, KeyCode};
use crate::surface::Surface;
use crate::time::FrameClock;

pub struct Driver {
    effect: Box<dyn Effect>,
    surface: Surface,
    input: Input,
    clock: FrameClock,
    host: Option<HostRegion>,
}

impl Driver {
    /// Build the configured effect for a window of `window_size` pixels.
    ///
    /// The surface covers the host region when one is set, otherwise the
    /// whole window.
    pub fn new(config: &TrailConfig, window_size: (u32, u32)) -> Result<Self, TrailError> {
        config.validate()?;
        let host = config.host_surface;
        let (width, height) = surface_size(host, window_size);
        let surface = Surface::new(width, height);
        let effect = config.build_effect(surface.bounds())?;

        log::info!(
            "starting {} effect on a {}x{} surface",
            effect.name(),
            surface.width(),
            surface.height()
        );

        Ok(Self {
            effect,
            surface,
            input: Input::new(host),
            clock: FrameClock::new(),
            host,
        })
    }

    /// Feed a window event into the input state.
    pub fn handle_event(&mut self, event: &WindowEvent) {
        if let WindowEvent::Resized(size) = event {
            self.resize(size.width, size.height);
        }
        self.input.handle_event(event);
    }

    /// Run one frame: read input, step unless paused, redraw.
    pub fn frame(&mut self) -> &Surface {
        if self.input.key_pressed(KeyCode::Space) {
            self.clock.toggle_pause();
            log::info!("{}", if self.clock.is_paused() { "paused" } else { "resumed" });
        }

        let frame_input = self.input.snapshot();
        self.input.begin_frame();

        if let Some(fps) = self.clock.tick() {
            log::debug!("frame {}: {:.1} fps", self.clock.frame(), fps);
        }

        if !self.clock.is_paused() {
            self.effect.advance(&frame_input, self.surface.bounds());
        }

        self.surface.clear();
        self.effect.draw(&mut self.surface);
        &self.surface
    }

    /// Follow a window resize. A host region keeps its own size.
    pub fn resize(&mut self, window_width: u32, window_height: u32) {
        let (width, height) = surface_size(self.host, (window_width, window_height));
        if self.surface.resize(width, height) {
            log::debug!("surface resized to {}x{}", width, height);
        }
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn input(&self) -> &Input {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut Input {
        &mut self.input
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn effect(&self) -> &dyn Effect {
        self.effect.as_ref()
    }

    pub fn host(&self) -> Option<HostRegion> {
        self.host
    }
}

fn surface_size(host: Option<HostRegion>, window_size: (u32, u32)) -> (u32, u32) {
    match host {
        Some(h) => (h.width, h.height),
        None => window_size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::EffectKind;
    use glam::Vec2;

    #[test]
    fn test_surface_follows_window() {
        let mut driver = Driver::new(&TrailConfig::default(), (300, 200)).unwrap();
        assert_eq!((driver.surface().width(), driver.surface().height()), (300, 200));
        driver.resize(400, 100);
        assert_eq!((driver.surface().width(), driver.surface().height()), (400, 100));
    }

    #[test]
    fn test_host_region_fixes_surface_size() {
        let config = TrailConfig::default().with_host_surface(HostRegion::new(10, 10, 120, 80));
        let mut driver = Driver::new(&config, (800, 600)).unwrap();
        assert_eq!(driver.host(), Some(HostRegion::new(10, 10, 120, 80)));
        assert_eq!((driver.surface().width(), driver.surface().height()), (120, 80));
        driver.resize(1000, 1000);
        assert_eq!((driver.surface().width(), driver.surface().height()), (120, 80));
    }

    #[test]
    fn test_space_toggles_pause() {
        let mut driver = Driver::new(&TrailConfig::default(), (100, 100)).unwrap();
        driver.input_mut().press(KeyCode::Space);
        driver.frame();
        assert!(driver.clock().is_paused());
        assert_eq!(driver.clock().steps(), 0);

        driver.frame();
        assert!(driver.clock().is_paused());

        driver.input_mut().press(KeyCode::Space);
        driver.frame();
        assert!(!driver.clock().is_paused());
        assert_eq!(driver.clock().steps(), 1);
    }

    #[test]
    fn test_fade_frame_draws_pointer_samples() {
        let config = TrailConfig::default().with_effect(EffectKind::Fade);
        let mut driver = Driver::new(&config, (100, 100)).unwrap();
        assert_eq!(driver.effect().name(), "fade");
        driver.input_mut().pointer_moved(Vec2::new(50.0, 50.0));
        let surface = driver.frame();
        assert!(surface.as_raw().chunks(4).any(|px| px[3] > 0));
    }
}
