//! 2D-surface / 3D-texture synchronization over SDL2.
//!
//! [`SurfaceSession`] owns the rendering context (window canvas); it is the
//! single explicit object standing in for what would otherwise be global
//! renderer state, and its lifecycle is caller-controlled.
//!
//! [`SurfaceBridge`] owns exactly one GPU target texture bound to the raster
//! buffer's dimensions and moves pixels across the CPU/GPU boundary:
//! `upload` (CPU→GPU through a lazily-created streaming texture), `clear`
//! (wipe the GPU texture), and `download` (round-trip the GPU texture
//! through the presentation surface back into the raster buffer).
//!
//! All GPU calls are synchronous submissions to the one context and execute
//! in exact call order. Anything that switches the active render target
//! switches it back before returning; `with_texture_canvas` guarantees the
//! restore even on error paths.

use log::error;
use sdl2::pixels::{Color, PixelFormatEnum};
use sdl2::rect::Rect;
use sdl2::render::{Canvas, Texture, TextureCreator};
use sdl2::video::{Window, WindowContext};

use crate::config::SurfaceConfig;
use crate::error::{Result, SurfaceError};
use crate::raster::RasterBuffer;

/// Texture format matching the raster buffer's `[A, R, G, B]` byte order on
/// little-endian hosts. Upload and download both use it so pixel bytes
/// round-trip losslessly.
pub const PIXEL_FORMAT: PixelFormatEnum = PixelFormatEnum::BGRA8888;

/// Owns the SDL2 rendering context for the simulation window.
pub struct SurfaceSession {
    canvas: Canvas<Window>,
    width: u32,
    height: u32,
}

impl SurfaceSession {
    /// Initialize SDL2 and create the window canvas. Any failure here is an
    /// environment error; there is no degraded mode without a context.
    pub fn new(config: &SurfaceConfig) -> Result<(Self, TextureCreator<WindowContext>)> {
        let sdl_context = sdl2::init().map_err(SurfaceError::Unrecoverable)?;
        let video_subsystem = sdl_context.video().map_err(SurfaceError::Unrecoverable)?;

        let window = video_subsystem
            .window("simsurface", config.width, config.height)
            .position_centered()
            .build()
            .map_err(|e| SurfaceError::Unrecoverable(e.to_string()))?;

        let mut canvas_builder = window.into_canvas().accelerated().target_texture();
        if config.vsync {
            canvas_builder = canvas_builder.present_vsync();
        }
        let canvas = canvas_builder
            .build()
            .map_err(|e| SurfaceError::Unrecoverable(e.to_string()))?;
        let texture_creator = canvas.texture_creator();

        Ok((
            Self {
                canvas,
                width: config.width,
                height: config.height,
            },
            texture_creator,
        ))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Direct canvas access for external collaborators (3D pass, presenters)
    pub fn canvas_mut(&mut self) -> &mut Canvas<Window> {
        &mut self.canvas
    }

    /// Present the default render target
    pub fn present(&mut self) {
        self.canvas.present();
    }
}

/// Bridges the CPU raster buffer to one GPU target texture of identical
/// dimensions.
///
/// The streaming (staging) texture is created on the first upload and reused
/// for the rest of the process lifetime; it is never resized, so the raster
/// dimensions must be fixed before the first upload.
pub struct SurfaceBridge<'a> {
    target: Texture<'a>,
    staging: Option<Texture<'a>>,
    width: u32,
    height: u32,
}

impl<'a> SurfaceBridge<'a> {
    /// Create the GPU target texture at the raster buffer's dimensions
    pub fn new(
        texture_creator: &'a TextureCreator<WindowContext>,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        let target = texture_creator
            .create_texture_target(PIXEL_FORMAT, width, height)
            .map_err(|e| SurfaceError::Unrecoverable(e.to_string()))?;
        Ok(Self {
            target,
            staging: None,
            width,
            height,
        })
    }

    #[inline]
    fn full_rect(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    /// Upload the raster buffer into the GPU target texture.
    ///
    /// The target texture is updated directly from the raster bytes, then
    /// the staging texture (created on first use) is filled line-by-line to
    /// respect its row pitch (one bulk copy when the pitches match) and
    /// drawn into the target. The raster stays locked for the duration of
    /// the copies.
    ///
    /// Graphics failures are logged and abort the upload early; prior
    /// texture contents are then stale and the caller should retry next
    /// frame.
    pub fn upload(
        &mut self,
        session: &mut SurfaceSession,
        texture_creator: &'a TextureCreator<WindowContext>,
        raster: &mut RasterBuffer,
    ) -> Result<()> {
        assert_eq!(raster.width(), self.width, "raster width mismatch");
        assert_eq!(raster.height(), self.height, "raster height mismatch");

        raster.lock();
        let result = self.upload_locked(session, texture_creator, raster);
        raster.unlock();
        result
    }

    fn upload_locked(
        &mut self,
        session: &mut SurfaceSession,
        texture_creator: &'a TextureCreator<WindowContext>,
        raster: &RasterBuffer,
    ) -> Result<()> {
        if let Err(e) = self.target.update(None, raster.pixels(), raster.pitch()) {
            error!("target texture update failed: {e}");
            return Err(SurfaceError::Graphics(e.to_string()));
        }

        if self.staging.is_none() {
            let staging = texture_creator
                .create_texture_streaming(PIXEL_FORMAT, self.width, self.height)
                .map_err(|e| SurfaceError::Graphics(e.to_string()))?;
            self.staging = Some(staging);
        }

        let src = raster.pixels();
        let src_pitch = raster.pitch();
        let rows = self.height as usize;
        if let Some(staging) = self.staging.as_mut() {
            staging
                .with_lock(None, |dst: &mut [u8], dst_pitch: usize| {
                    if dst_pitch != src_pitch {
                        // Copy line-wise to respect the destination row pitch
                        for y in 0..rows {
                            let to = y * dst_pitch;
                            let from = y * src_pitch;
                            dst[to..to + src_pitch].copy_from_slice(&src[from..from + src_pitch]);
                        }
                    } else {
                        // Matching pitches: copy as a whole
                        dst[..src.len()].copy_from_slice(src);
                    }
                })
                .map_err(|e| {
                    error!("staging texture lock failed: {e}");
                    SurfaceError::Graphics(e)
                })?;
        }

        // Draw the staging texture into the target; the previously active
        // render target is restored on return.
        let full = self.full_rect();
        let Self {
            target, staging, ..
        } = self;
        let staging_ref = staging.as_ref();
        let mut copy_result: Result<()> = Ok(());
        session
            .canvas
            .with_texture_canvas(target, |texture_canvas| {
                if let Some(staging) = staging_ref {
                    if let Err(e) = texture_canvas.copy(staging, None, Some(full)) {
                        copy_result = Err(SurfaceError::Graphics(e));
                    }
                }
            })
            .map_err(|e| SurfaceError::Graphics(e.to_string()))?;
        if let Err(e) = &copy_result {
            error!("staging copy into target failed: {e}");
        }
        copy_result
    }

    /// Clear the GPU target texture to transparent black
    pub fn clear(&mut self, session: &mut SurfaceSession) -> Result<()> {
        session
            .canvas
            .with_texture_canvas(&mut self.target, |texture_canvas| {
                texture_canvas.set_draw_color(Color::RGBA(0, 0, 0, 0));
                texture_canvas.clear();
            })
            .map_err(|e| SurfaceError::Graphics(e.to_string()))
    }

    /// Download the GPU target texture back into the raster buffer,
    /// replacing its contents.
    ///
    /// This is a deliberate round-trip through the presentation surface, not
    /// an off-screen copy: the target texture is drawn to the default
    /// target, presented, and the presented pixels are read back at the
    /// raster's exact format while it is locked, then presented again. The
    /// read depends on the just-presented frame, so the ordering is fixed.
    pub fn download(&mut self, session: &mut SurfaceSession, raster: &mut RasterBuffer) -> Result<()> {
        assert_eq!(raster.width(), self.width, "raster width mismatch");
        assert_eq!(raster.height(), self.height, "raster height mismatch");

        let full = self.full_rect();
        let canvas = &mut session.canvas;
        if let Err(e) = canvas.copy(&self.target, None, Some(full)) {
            error!("target copy to presentation surface failed: {e}");
            return Err(SurfaceError::Graphics(e));
        }
        canvas.present();

        raster.lock();
        let result = match canvas.read_pixels(full, PIXEL_FORMAT) {
            Ok(pixels) => {
                let dst = raster.pixels_mut();
                let n = dst.len().min(pixels.len());
                dst[..n].copy_from_slice(&pixels[..n]);
                Ok(())
            },
            Err(e) => {
                error!("presentation read-back failed: {e}");
                Err(SurfaceError::Graphics(e))
            },
        };
        raster.unlock();
        canvas.present();
        result
    }

    /// Download the GPU texture and blend it on top of the current raster
    /// contents instead of replacing them.
    ///
    /// Disabled: returns immediately without touching either surface. The
    /// overlay path is kept as a stub so call sites survive until product
    /// intent settles.
    pub fn download_overlay(
        &mut self,
        _session: &mut SurfaceSession,
        _raster: &mut RasterBuffer,
    ) -> Result<()> {
        Ok(())
    }
}
