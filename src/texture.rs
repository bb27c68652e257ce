//! Wall textures and their background loader.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use crate::error::TextureError;
use crate::surface::pack_rgb;

/// Read-only texture sampled by the ray caster.
pub trait Texture: Send + Sync {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    /// Packed `0RGB` colour at `(x, y)`. Callers keep coordinates in range.
    fn sample(&self, x: u32, y: u32) -> u32;
}

/// Texture held as packed pixels in row-major order.
pub struct PixelTexture {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl PixelTexture {
    pub fn new(width: u32, height: u32, pixels: Vec<u32>) -> Self {
        assert_eq!(pixels.len(), (width * height) as usize);
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Decodes an image file into packed pixels.
    pub fn load(path: &Path) -> Result<Self, TextureError> {
        let img = image::open(path)
            .map_err(|source| TextureError::Decode {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgb8();
        let (width, height) = img.dimensions();
        if width == 0 || height == 0 {
            return Err(TextureError::Empty {
                path: path.to_path_buf(),
            });
        }
        let pixels = img.pixels().map(|p| pack_rgb(p[0], p[1], p[2])).collect();
        Ok(Self::new(width, height, pixels))
    }

    /// Procedural red brick pattern, used when no image is available.
    pub fn bricks(size: u32) -> Self {
        let size = size.max(1);
        let mortar = pack_rgb(90, 90, 90);
        let brick_h = (size / 4).max(1);
        let brick_w = (size / 2).max(1);
        let mut pixels = Vec::with_capacity((size * size) as usize);
        for y in 0..size {
            let row = y / brick_h;
            let offset = if row % 2 == 0 { 0 } else { brick_w / 2 };
            for x in 0..size {
                let bx = (x + offset) % brick_w;
                let by = y % brick_h;
                let color = if bx == 0 || by == 0 {
                    mortar
                } else {
                    // Slight per-brick variation
                    let id = (x + offset) / brick_w + row * 7;
                    let shade = 150 + ((id * 37) % 40) as u8;
                    pack_rgb(shade, 40 + shade / 6, 30)
                };
                pixels.push(color);
            }
        }
        Self::new(size, size, pixels)
    }
}

impl Texture for PixelTexture {
    #[inline]
    fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn sample(&self, x: u32, y: u32) -> u32 {
        self.pixels[(y * self.width + x) as usize]
    }
}

/// A texture being decoded on a background thread.
pub struct PendingTexture {
    path: PathBuf,
    rx: Receiver<Result<PixelTexture, TextureError>>,
}

impl PendingTexture {
    pub fn spawn(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (tx, rx) = mpsc::channel();
        let load_path = path.clone();
        thread::spawn(move || {
            // Receiver may already be gone if the app quit during loading.
            let _ = tx.send(PixelTexture::load(&load_path));
        });
        Self { path, rx }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Non-blocking check; `None` while the loader is still running.
    pub fn try_take(&self) -> Option<Result<PixelTexture, TextureError>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(TextureError::LoaderDisconnected)),
        }
    }

    /// Like [`try_take`](Self::try_take) but substitutes procedural bricks on failure.
    pub fn poll_or_fallback(&self) -> Option<Arc<dyn Texture>> {
        let result = self.try_take()?;
        Some(match result {
            Ok(tex) => {
                tracing::info!(
                    path = %self.path.display(),
                    width = tex.width(),
                    height = tex.height(),
                    "wall texture loaded"
                );
                Arc::new(tex)
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.path().display(),
                    error = %e,
                    "using procedural brick texture"
                );
                Arc::new(PixelTexture::bricks(64))
            }
        })
    }
}
