//! Real-time image compositing and GPU synchronization core for an
//! interactive simulation.
//!
//! The CPU-side [`RasterBuffer`] is the 2D surface that particle and fluid
//! renderers paint into each frame, under an explicit lock/unlock
//! discipline. [`SurfaceBridge`] keeps it in sync with a GPU texture so
//! 3D-rendered content can be combined with the 2D layer and read back.
//! [`OffsetCompositor`] pans the 2D layer by an accumulated camera offset,
//! and [`compositor::blend_into`] hands the finished overlay off to the
//! presented frame with per-pixel source-over blending.
//!
//! Independently, [`MultiImageRotator`] manages a collection of transformed
//! flat image quads in 3D space with cached corner geometry and lazily
//! rebuilt GPU resources, driven through the [`QuadGpu`] backend contract.
//!
//! The whole core is single-threaded and synchronous; GPU work is submitted
//! in exact call order on one rendering context.

pub mod bridge;
pub mod clock;
pub mod compositor;
pub mod config;
pub mod error;
pub mod gpu;
pub mod offset;
pub mod raster;
pub mod rotator;
pub mod vec3;

pub use bridge::{SurfaceBridge, SurfaceSession, PIXEL_FORMAT};
pub use clock::StepClock;
pub use compositor::blend_into;
pub use config::SurfaceConfig;
pub use error::{Result, SurfaceError};
pub use gpu::{GeometryHandle, QuadGpu, QuadVertices, TextureHandle, QUAD_INDICES};
pub use offset::OffsetCompositor;
pub use raster::{RasterBuffer, BYTES_PER_PIXEL};
pub use rotator::MultiImageRotator;
pub use vec3::{Aabb, Vec3};
