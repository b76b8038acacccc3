//! Error types for the sakura engine.
//!
//! This module provides error types for GPU initialization, sprite loading,
//! configuration parsing, and running the windowed animation.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during GPU initialization.
#[derive(Debug, Error)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    #[error("failed to create GPU surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    #[error("no compatible GPU adapter found; ensure your system has a GPU with WebGPU/Vulkan/Metal/DX12 support")]
    NoAdapter,
    /// Failed to create GPU device.
    #[error("failed to create GPU device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),
}

/// Errors that can occur while loading the petal sprite.
#[derive(Debug, Error)]
pub enum SpriteError {
    /// Failed to decode the image.
    #[error("failed to decode sprite image: {0}")]
    ImageLoad(#[from] image::ImageError),
    /// Failed to read the file from disk.
    #[error("failed to read sprite file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The image decoded but has no pixels.
    #[error("sprite image is empty ({width}x{height})")]
    Empty { width: u32, height: u32 },
    /// The GPU cannot hold a texture this large.
    #[error("sprite image {width}x{height} exceeds the GPU texture limit of {max}")]
    TooLarge { width: u32, height: u32, max: u32 },
    /// The background loader thread could not be started.
    #[error("could not start sprite loader thread: {0}")]
    LoaderSpawn(#[source] std::io::Error),
    /// The background loader went away without delivering a result.
    #[error("sprite loader thread exited without a result")]
    LoaderDisconnected,
}

/// Errors that can occur when loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("could not read config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid RON for [`SakuraConfig`](crate::SakuraConfig).
    #[error("could not parse RON: {0}")]
    Parse(#[from] ron::error::SpannedError),
    /// A random range would be empty.
    #[error("range `{field}` is empty ({start}..{end})")]
    EmptyRange {
        field: &'static str,
        start: f32,
        end: f32,
    },
    /// A random range has a non-finite bound or span.
    #[error("range `{field}` is not finite ({start}..{end})")]
    UnboundedRange {
        field: &'static str,
        start: f32,
        end: f32,
    },
    /// A clamp limit has `min > max`.
    #[error("limit `{field}` is inverted (min {min} > max {max})")]
    InvertedLimit {
        field: &'static str,
        min: f32,
        max: f32,
    },
    /// Any other out-of-range value.
    #[error("invalid value for `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Errors that can occur when running the animation window.
#[derive(Debug, Error)]
pub enum SakuraError {
    /// Failed to create event loop.
    #[error("failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    /// Failed to create window.
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    /// GPU initialization failed.
    #[error("GPU error: {0}")]
    Gpu(#[from] GpuError),
    /// Configuration was rejected.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}
