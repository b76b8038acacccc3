//! Petal sprite image loading.
//!
//! The sprite is decoded off the event-loop thread by [`SpriteLoader`]; the
//! engine populates its petals only once the image has arrived. When no
//! image path is configured a procedural petal is generated instead.
//!
//! # Supported Formats
//!
//! - PNG (recommended, keeps the alpha channel)
//! - JPEG

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use serde::{Deserialize, Serialize};

use crate::error::SpriteError;

/// Filter mode for sprite sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterMode {
    /// Smooth linear filtering (default).
    #[default]
    Linear,
    /// Sharp nearest-neighbor filtering. Good for pixel art.
    Nearest,
}

/// A decoded sprite in RGBA8.
#[derive(Debug, Clone)]
pub struct SpriteImage {
    /// Raw RGBA pixel data (width * height * 4 bytes).
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub filter: FilterMode,
}

impl SpriteImage {
    /// Wrap raw RGBA data.
    ///
    /// # Panics
    ///
    /// Panics if `data.len() != width * height * 4`.
    pub fn from_rgba(data: Vec<u8>, width: u32, height: u32) -> Self {
        assert_eq!(
            data.len(),
            (width * height * 4) as usize,
            "RGBA data size mismatch"
        );
        Self {
            data,
            width,
            height,
            filter: FilterMode::Linear,
        }
    }

    /// Decode an encoded image held in memory.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SpriteError> {
        let img = image::load_from_memory(bytes)?.into_rgba8();
        Self::from_decoded(img)
    }

    /// Load and decode an image file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SpriteError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| SpriteError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(&bytes)
    }

    fn from_decoded(img: image::RgbaImage) -> Result<Self, SpriteError> {
        let (width, height) = img.dimensions();
        if width == 0 || height == 0 {
            return Err(SpriteError::Empty { width, height });
        }
        Ok(Self::from_rgba(img.into_raw(), width, height))
    }

    /// Set the filter mode.
    pub fn with_filter(mut self, filter: FilterMode) -> Self {
        self.filter = filter;
        self
    }

    /// Generate a soft pink petal: an ellipse with a notch at the top,
    /// fading out towards the edge.
    pub fn petal(size: u32) -> Self {
        let size = size.max(2);
        let mut data = Vec::with_capacity((size * size * 4) as usize);
        let half = size as f32 / 2.0;

        for y in 0..size {
            for x in 0..size {
                // -1..1 across the sprite, y up
                let u = (x as f32 + 0.5 - half) / half;
                let v = (half - (y as f32 + 0.5)) / half;

                // Petal body: narrower at the base
                let taper = 0.55 + 0.35 * (v + 1.0) / 2.0;
                let d = (u / taper).powi(2) + v.powi(2);

                // Notch cut out of the tip
                let notch = v > 0.6 && u.abs() < (v - 0.6) * 0.6;

                let alpha = if d >= 1.0 || notch {
                    0.0
                } else {
                    (1.0 - d).sqrt().min(1.0)
                };

                // Paler towards the tip
                let t = (v + 1.0) / 2.0;
                data.push(lerp_u8(244, 255, t));
                data.push(lerp_u8(170, 214, t));
                data.push(lerp_u8(190, 226, t));
                data.push((alpha * 255.0).round() as u8);
            }
        }

        Self::from_rgba(data, size, size)
    }

    /// Bytes per row of pixel data.
    pub fn stride(&self) -> u32 {
        self.width * 4
    }
}

/// Helper function for linear interpolation of u8 values.
fn lerp_u8(a: u8, b: u8, t: f32) -> u8 {
    let a = a as f32;
    let b = b as f32;
    (a + (b - a) * t.clamp(0.0, 1.0)).round() as u8
}

/// Where the sprite comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpriteSource {
    File(PathBuf),
    /// Procedural petal with the given edge length in pixels.
    Builtin(u32),
}

impl From<Option<PathBuf>> for SpriteSource {
    fn from(path: Option<PathBuf>) -> Self {
        match path {
            Some(path) => SpriteSource::File(path),
            None => SpriteSource::Builtin(64),
        }
    }
}

impl SpriteSource {
    /// Produce the image synchronously.
    pub fn load(&self) -> Result<SpriteImage, SpriteError> {
        match self {
            SpriteSource::File(path) => SpriteImage::from_file(path),
            SpriteSource::Builtin(size) => Ok(SpriteImage::petal(*size)),
        }
    }
}

/// Decodes the sprite on a background thread.
///
/// Poll once per event-loop iteration; the result is delivered exactly once.
#[derive(Debug)]
pub struct SpriteLoader {
    state: LoaderState,
}

#[derive(Debug)]
enum LoaderState {
    Pending(Receiver<Result<SpriteImage, SpriteError>>),
    /// The load never started; the error is reported on the next poll.
    Failed(SpriteError),
    Done,
}

impl SpriteLoader {
    /// Start loading `source` in the background, sampled with `filter`.
    pub fn spawn(source: SpriteSource, filter: FilterMode) -> Self {
        let (tx, rx) = mpsc::channel();
        let spawned = thread::Builder::new()
            .name("sprite-loader".into())
            .spawn(move || {
                log::debug!("Loading sprite from {:?}", source);
                let result = source.load().map(|sprite| sprite.with_filter(filter));
                // The receiver may be gone if the app shut down first
                let _ = tx.send(result);
            });

        match spawned {
            Ok(_) => Self {
                state: LoaderState::Pending(rx),
            },
            Err(e) => {
                log::error!("Could not start sprite loader thread: {}", e);
                Self::failed(SpriteError::LoaderSpawn(e))
            }
        }
    }

    /// A loader whose load could not start. The first poll returns `err`.
    pub(crate) fn failed(err: SpriteError) -> Self {
        Self {
            state: LoaderState::Failed(err),
        }
    }

    /// Whether a result is still outstanding.
    pub fn is_pending(&self) -> bool {
        !matches!(self.state, LoaderState::Done)
    }

    /// Take the result if the load has finished.
    ///
    /// Returns `None` while still loading and after the result was taken.
    pub fn poll(&mut self) -> Option<Result<SpriteImage, SpriteError>> {
        let result = match std::mem::replace(&mut self.state, LoaderState::Done) {
            LoaderState::Pending(rx) => match rx.try_recv() {
                Ok(result) => result,
                Err(TryRecvError::Empty) => {
                    self.state = LoaderState::Pending(rx);
                    return None;
                }
                Err(TryRecvError::Disconnected) => Err(SpriteError::LoaderDisconnected),
            },
            LoaderState::Failed(err) => Err(err),
            LoaderState::Done => return None,
        };
        Some(result)
    }
}
