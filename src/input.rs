//! Pointer, touch and key input for trail effects.
//!
//! Window events land in an [`Input`] as they arrive. The driver reads it
//! exactly once per frame through [`Input::snapshot`], which is the only
//! point where pointer state crosses into the simulation, then clears the
//! per-frame state with [`Input::begin_frame`].
//!
//! Two views of the pointer are kept:
//!
//! - the [`PointerSlot`], holding only the most recent position, which the
//!   spring chain pins its anchor to
//! - the list of samples seen since the last frame, which the fade trail
//!   spawns a particle for each
//!
//! When a [`HostRegion`] is configured all coordinates are relative to its
//! top-left corner.

use std::collections::HashSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use winit::event::{ElementState, TouchPhase, WindowEvent};
use winit::keyboard::{KeyCode as WinitKeyCode, PhysicalKey};

/// Keys the trail window reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Space,
    Escape,
    Other,
}

impl From<WinitKeyCode> for KeyCode {
    fn from(key: WinitKeyCode) -> Self {
        match key {
            WinitKeyCode::Space => KeyCode::Space,
            WinitKeyCode::Escape => KeyCode::Escape,
            _ => KeyCode::Other,
        }
    }
}

/// Rectangle of the window that the effect is confined to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl HostRegion {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.x as f32, self.y as f32)
    }

    /// Window coordinates to region-local coordinates.
    pub fn to_local(&self, window_pos: Vec2) -> Vec2 {
        window_pos - self.origin()
    }
}

/// Single-value handoff of the latest pointer position.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerSlot {
    latest: Option<Vec2>,
}

impl PointerSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `pos` if it is finite. Returns whether it was accepted.
    pub fn write(&mut self, pos: Vec2) -> bool {
        if pos.is_finite() {
            self.latest = Some(pos);
            true
        } else {
            false
        }
    }

    /// Most recent accepted position, if any has been written.
    pub fn latest(&self) -> Option<Vec2> {
        self.latest
    }
}

/// Everything the effect may read about input for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameInput {
    /// Latest pointer position, carried over from earlier frames.
    pub pointer: Option<Vec2>,
    /// Every pointer or touch position seen since the previous frame.
    pub samples: Vec<Vec2>,
}

/// Input state accumulated between frames.
#[derive(Debug, Default)]
pub struct Input {
    slot: PointerSlot,
    samples: Vec<Vec2>,
    // Active touches in the order they started
    touches: Vec<(u64, Vec2)>,
    keys_pressed: HashSet<KeyCode>,
    host: Option<HostRegion>,
}

impl Input {
    pub fn new(host: Option<HostRegion>) -> Self {
        Self {
            host,
            ..Default::default()
        }
    }

    pub fn host(&self) -> Option<HostRegion> {
        self.host
    }

    /// Latest pointer position.
    pub fn pointer(&self) -> Option<Vec2> {
        self.slot.latest()
    }

    /// Check if a key was pressed since the last frame.
    pub fn key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Copy out this frame's input.
    pub fn snapshot(&self) -> FrameInput {
        FrameInput {
            pointer: self.slot.latest(),
            samples: self.samples.clone(),
        }
    }

    /// Clear per-frame state. The pointer slot and active touches persist.
    pub fn begin_frame(&mut self) {
        self.samples.clear();
        self.keys_pressed.clear();
    }

    /// Process a winit window event.
    pub fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.pointer_moved(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::Touch(touch) => {
                let pos = Vec2::new(touch.location.x as f32, touch.location.y as f32);
                self.touch(touch.id, touch.phase, pos);
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed && !event.repeat {
                    if let PhysicalKey::Code(code) = event.physical_key {
                        self.keys_pressed.insert(KeyCode::from(code));
                    }
                }
            }
            _ => {}
        }
    }

    fn local(&self, window_pos: Vec2) -> Vec2 {
        match self.host {
            Some(host) => host.to_local(window_pos),
            None => window_pos,
        }
    }

    /// Record a pointer move in window coordinates.
    pub fn pointer_moved(&mut self, window_pos: Vec2) {
        let pos = self.local(window_pos);
        if self.slot.write(pos) {
            self.samples.push(pos);
        }
    }

    /// Record a touch event in window coordinates.
    pub fn touch(&mut self, id: u64, phase: TouchPhase, window_pos: Vec2) {
        let pos = self.local(window_pos);
        match phase {
            TouchPhase::Started | TouchPhase::Moved => {
                if !pos.is_finite() {
                    return;
                }
                match self.touches.iter_mut().find(|(tid, _)| *tid == id) {
                    Some(entry) => entry.1 = pos,
                    None => self.touches.push((id, pos)),
                }
                // The chain follows the first finger, the fade trail every finger
                if let Some(&(_, first)) = self.touches.first() {
                    self.slot.write(first);
                }
                self.samples.extend(self.touches.iter().map(|(_, p)| *p));
            }
            TouchPhase::Ended | TouchPhase::Cancelled => {
                self.touches.retain(|(tid, _)| *tid != id);
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn press(&mut self, key: KeyCode) {
        self.keys_pressed.insert(key);
    }
}
