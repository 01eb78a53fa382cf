//! Error types for cursor trails.
//!
//! Construction-time configuration errors, sprite loading errors, GPU
//! initialization errors, and the umbrella error returned by the window
//! runner.

use std::fmt;

/// Invalid effect configuration, reported once at construction.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The chain must have at least one node (the anchor).
    EmptyChain,
    /// Node mass must be finite and strictly positive.
    NonPositiveMass(f32),
    /// The fixed timestep must be finite and strictly positive.
    NonPositiveTimestep(f32),
    /// A physical constant is negative or not finite.
    InvalidParameter { name: &'static str, value: f32 },
    /// Initial positions do not match the configured node count.
    NodeCountMismatch { expected: usize, found: usize },
    /// An initial node position is not finite.
    NonFinitePosition { index: usize },
    /// The fade trail needs at least one sprite to spawn.
    NoSprites,
    /// The host region has zero width or height.
    EmptyHostRegion,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyChain => write!(f, "Chain needs at least one node"),
            ConfigError::NonPositiveMass(m) => {
                write!(f, "Node mass must be finite and > 0, got {}", m)
            }
            ConfigError::NonPositiveTimestep(dt) => {
                write!(f, "Timestep must be finite and > 0, got {}", dt)
            }
            ConfigError::InvalidParameter { name, value } => {
                write!(f, "Parameter '{}' must be finite and >= 0, got {}", name, value)
            }
            ConfigError::NodeCountMismatch { expected, found } => write!(
                f,
                "Expected {} initial node positions, found {}",
                expected, found
            ),
            ConfigError::NonFinitePosition { index } => {
                write!(f, "Initial position of node {} is not finite", index)
            }
            ConfigError::NoSprites => write!(f, "Fade trail needs at least one sprite"),
            ConfigError::EmptyHostRegion => write!(f, "Host region must have a non-zero size"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors that can occur while building a sprite.
#[derive(Debug)]
pub enum SpriteError {
    /// The emoji has no built-in rasterization.
    UnknownGlyph(String),
    /// The requested raster size is zero.
    ZeroSize,
    /// Failed to decode an image file.
    ImageLoad(image::ImageError),
    /// RGBA buffer length does not match the dimensions.
    SizeMismatch { expected: usize, found: usize },
}

impl fmt::Display for SpriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpriteError::UnknownGlyph(g) => write!(f, "No built-in sprite for glyph '{}'", g),
            SpriteError::ZeroSize => write!(f, "Sprite size must be at least 1 pixel"),
            SpriteError::ImageLoad(e) => write!(f, "Failed to load sprite image: {}", e),
            SpriteError::SizeMismatch { expected, found } => write!(
                f,
                "RGBA data size mismatch: expected {} bytes, found {}",
                expected, found
            ),
        }
    }
}

impl std::error::Error for SpriteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SpriteError::ImageLoad(e) => Some(e),
            _ => None,
        }
    }
}

impl From<image::ImageError> for SpriteError {
    fn from(e: image::ImageError) -> Self {
        SpriteError::ImageLoad(e)
    }
}

/// Errors that can occur during GPU initialization.
#[derive(Debug)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    NoAdapter,
    /// Failed to create GPU device.
    DeviceCreation(wgpu::RequestDeviceError),
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::SurfaceCreation(e) => write!(f, "Failed to create GPU surface: {}", e),
            GpuError::NoAdapter => write!(f, "No compatible GPU adapter found"),
            GpuError::DeviceCreation(e) => write!(f, "Failed to create GPU device: {}", e),
        }
    }
}

impl std::error::Error for GpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpuError::SurfaceCreation(e) => Some(e),
            GpuError::DeviceCreation(e) => Some(e),
            GpuError::NoAdapter => None,
        }
    }
}

impl From<wgpu::CreateSurfaceError> for GpuError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        GpuError::SurfaceCreation(e)
    }
}

impl From<wgpu::RequestDeviceError> for GpuError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        GpuError::DeviceCreation(e)
    }
}

/// Errors surfaced to the caller when starting or running an effect.
#[derive(Debug)]
pub enum TrailError {
    /// Invalid configuration.
    Config(ConfigError),
    /// Sprite could not be built.
    Sprite(SpriteError),
    /// GPU initialization failed.
    Gpu(GpuError),
    /// Failed to create or run the event loop.
    EventLoop(winit::error::EventLoopError),
    /// Failed to create the window.
    Window(winit::error::OsError),
    /// Failed to read or write a configuration file.
    Io(std::io::Error),
    /// Configuration file is not valid JSON for `TrailConfig`.
    Json(serde_json::Error),
}

impl fmt::Display for TrailError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrailError::Config(e) => write!(f, "Invalid configuration: {}", e),
            TrailError::Sprite(e) => write!(f, "Sprite error: {}", e),
            TrailError::Gpu(e) => write!(f, "GPU error: {}", e),
            TrailError::EventLoop(e) => write!(f, "Failed to create event loop: {}", e),
            TrailError::Window(e) => write!(f, "Failed to create window: {}", e),
            TrailError::Io(e) => write!(f, "Failed to access config file: {}", e),
            TrailError::Json(e) => write!(f, "Failed to parse config file: {}", e),
        }
    }
}

impl std::error::Error for TrailError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TrailError::Config(e) => Some(e),
            TrailError::Sprite(e) => Some(e),
            TrailError::Gpu(e) => Some(e),
            TrailError::EventLoop(e) => Some(e),
            TrailError::Window(e) => Some(e),
            TrailError::Io(e) => Some(e),
            TrailError::Json(e) => Some(e),
        }
    }
}

impl From<ConfigError> for TrailError {
    fn from(e: ConfigError) -> Self {
        TrailError::Config(e)
    }
}

impl From<SpriteError> for TrailError {
    fn from(e: SpriteError) -> Self {
        TrailError::Sprite(e)
    }
}

impl From<GpuError> for TrailError {
    fn from(e: GpuError) -> Self {
        TrailError::Gpu(e)
    }
}

impl From<winit::error::EventLoopError> for TrailError {
    fn from(e: winit::error::EventLoopError) -> Self {
        TrailError::EventLoop(e)
    }
}

impl From<winit::error::OsError> for TrailError {
    fn from(e: winit::error::OsError) -> Self {
        TrailError::Window(e)
    }
}

impl From<std::io::Error> for TrailError {
    fn from(e: std::io::Error) -> Self {
        TrailError::Io(e)
    }
}

impl From<serde_json::Error> for TrailError {
    fn from(e: serde_json::Error) -> Self {
        TrailError::Json(e)
    }
}
