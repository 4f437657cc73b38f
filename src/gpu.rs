//! GPU backend contract for the multi-image rotator.
//!
//! The rotator only needs a narrow slice of a rendering context: allocate
//! and free vertex/index buffers for a single textured quad, upload
//! single-channel texel data as a mipmapped texture, and issue a quad draw
//! through a shared shader program that renders textured quads. Context and
//! shader creation live outside this core, so the contract is a trait; tests
//! drive the rotator with a recording implementation.

use crate::error::Result;

/// Interleaved quad vertex data: 4 vertices of `[x, y, u, v]`.
/// Positions are normalized world coordinates in `[-0.5, 0.5]`.
pub type QuadVertices = [f32; 16];

/// Fixed draw list for a quad: 4 vertices, drawn as a fan/strip by the
/// backend's quad pipeline.
pub const QUAD_INDICES: [u32; 4] = [0, 1, 2, 3];

/// Opaque handle to a backend-owned vertex array + buffer pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GeometryHandle(pub u64);

/// Opaque handle to a backend-owned texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u64);

/// The quad-rendering capabilities the rotator drives.
///
/// All calls are synchronous submissions to a single rendering context; the
/// backend must not reorder them. A backend that changes the active render
/// target during `draw_quad` must restore the prior one before returning.
pub trait QuadGpu {
    /// Initialize shared draw state (shader program, vertex attribute
    /// bindings) exactly once; later calls are no-ops. A shader compile or
    /// link failure is an environment error
    /// ([`crate::SurfaceError::Unrecoverable`]).
    fn prepare(&mut self) -> Result<()>;

    /// Allocate vertex/index buffers for one quad
    fn create_quad_geometry(
        &mut self,
        vertices: &QuadVertices,
        indices: &[u32; 4],
    ) -> Result<GeometryHandle>;

    /// Release quad geometry. Must tolerate handles from any prior create.
    fn destroy_geometry(&mut self, handle: GeometryHandle);

    /// Upload single-channel (one byte per pixel) texel data as a mipmapped
    /// texture. `texels.len()` is `width * height`.
    fn upload_grayscale_texture(
        &mut self,
        width: u32,
        height: u32,
        texels: &[u8],
    ) -> Result<TextureHandle>;

    /// Release a texture
    fn destroy_texture(&mut self, handle: TextureHandle);

    /// Draw one textured quad with the shared shader program bound
    fn draw_quad(&mut self, geometry: GeometryHandle, texture: TextureHandle) -> Result<()>;
}
