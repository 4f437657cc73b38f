//! Multi-image rotator: a dynamic collection of independently transformed
//! flat image quads in 3D space.
//!
//! Each record carries a size, a world translation, and Euler rotation
//! angles. Corner positions are cached and lazily recomputed after any
//! transform mutation; GPU geometry and textures are rebuilt lazily on the
//! next draw or bounding-box query after they go stale. Quad positions are
//! normalized into `[-0.5, 0.5]` against the axis-aligned bounding box of
//! *all* records, so a per-record geometry rebuild has a global cost.

use crate::error::Result;
use crate::gpu::{GeometryHandle, QuadGpu, QuadVertices, TextureHandle, QUAD_INDICES};
use crate::vec3::{Aabb, Vec3};

/// Floor for quad dimensions; scaling below this clamps up
const MIN_SIZE: f64 = 0.00001;

/// A scale change smaller than this on both axes is treated as no change
const SCALE_EPSILON: f64 = 0.001;

/// One transformable image quad.
///
/// `center` is retained as a pivot placeholder; corner computation currently
/// uses only `offset` and `rotation`.
struct ImageRecord {
    id: u32,
    width: u32,
    height: u32,
    size_x: f64,
    size_y: f64,
    center: Vec3,
    offset: Vec3,
    rotation: Vec3,

    /// Cached world-space corner positions; None means stale
    corners: Option<[Vec3; 4]>,

    geometry: Option<GeometryHandle>,
    geometry_outdated: bool,

    /// Single-channel texel data, one byte per pixel, `width * height` bytes
    texels: Option<Vec<u8>>,
    texture: Option<TextureHandle>,
}

impl ImageRecord {
    fn new(id: u32, width: u32, height: u32) -> Self {
        Self {
            id,
            width,
            height,
            size_x: 1.0,
            size_y: 1.0,
            center: Vec3::zero(),
            offset: Vec3::zero(),
            rotation: Vec3::zero(),
            corners: None,
            geometry: None,
            geometry_outdated: true,
            texels: None,
            texture: None,
        }
    }

    /// Corner base positions mix the two size axes asymmetrically; that
    /// layout is part of the observed drawing contract and is kept as-is.
    fn corner_positions(&self) -> [Vec3; 4] {
        let (sx, sy) = (self.size_x, self.size_y);
        let bases = [
            Vec3::new(sy * 0.5, 0.0, sx * 0.5),
            Vec3::new(-sx * 0.5, 0.0, sy * 0.5),
            Vec3::new(-sx * 0.5, 0.0, -sy * 0.5),
            Vec3::new(sx * 0.5, 0.0, -sy * 0.5),
        ];
        bases.map(|p| {
            p.rotate_xyz(self.rotation.x, self.rotation.y, self.rotation.z) + self.offset
        })
    }

    fn cached_corners(&mut self) -> [Vec3; 4] {
        if let Some(c) = self.corners {
            return c;
        }
        let c = self.corner_positions();
        self.corners = Some(c);
        c
    }

    fn invalidate(&mut self) {
        self.corners = None;
        self.geometry_outdated = true;
    }

    fn release_gpu(&mut self, gpu: &mut dyn QuadGpu) {
        if let Some(h) = self.geometry.take() {
            gpu.destroy_geometry(h);
        }
        if let Some(t) = self.texture.take() {
            gpu.destroy_texture(t);
        }
    }
}

/// Owning collection of image records, newest first. Ids are strictly
/// increasing and never reused, even after removal.
pub struct MultiImageRotator {
    records: Vec<ImageRecord>,
    next_id: u32,
}

impl MultiImageRotator {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            next_id: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn record_mut(&mut self, id: u32) -> Option<&mut ImageRecord> {
        self.records.iter_mut().find(|r| r.id == id)
    }

    /// Add a record for a `width` x `height` texel image with default world
    /// size 1x1 and identity transform. Returns its id.
    pub fn add(&mut self, width: u32, height: u32) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.records.insert(0, ImageRecord::new(id, width, height));
        id
    }

    /// Change a record's world size. Both axes are floor-clamped to a small
    /// positive epsilon; if neither clamped axis moved by more than a
    /// threshold the call is a no-op and no caches are invalidated.
    /// Unknown ids are silently ignored.
    pub fn scale(&mut self, id: u32, size_x: f64, size_y: f64) {
        if let Some(rec) = self.record_mut(id) {
            let sx = size_x.max(MIN_SIZE);
            let sy = size_y.max(MIN_SIZE);
            if (sx - rec.size_x).abs() > SCALE_EPSILON || (sy - rec.size_y).abs() > SCALE_EPSILON {
                rec.size_x = sx;
                rec.size_y = sy;
                rec.invalidate();
            }
        }
    }

    /// Overwrite a record's center, world translation and Euler rotation.
    /// Always invalidates the corner cache and GPU geometry.
    /// Unknown ids are silently ignored.
    pub fn transform(&mut self, id: u32, center: Vec3, offset: Vec3, rotation: Vec3) {
        if let Some(rec) = self.record_mut(id) {
            rec.center = center;
            rec.offset = offset;
            rec.rotation = rotation;
            rec.invalidate();
        }
    }

    /// Copy `width * height` single-channel texels into the record's owned
    /// buffer and drop any uploaded GPU texture so the next draw re-uploads.
    /// Unknown ids are silently ignored; a wrong-sized slice is a
    /// programming error.
    pub fn set_image_data(&mut self, id: u32, texels: &[u8], gpu: &mut dyn QuadGpu) {
        if let Some(rec) = self.records.iter_mut().find(|r| r.id == id) {
            assert_eq!(
                texels.len(),
                rec.width as usize * rec.height as usize,
                "texel data must be width * height bytes"
            );
            match &mut rec.texels {
                Some(buf) => buf.copy_from_slice(texels),
                None => rec.texels = Some(texels.to_vec()),
            }
            if let Some(t) = rec.texture.take() {
                gpu.destroy_texture(t);
            }
        }
    }

    /// Remove a record and release its GPU resources. The id is never
    /// reused. Unknown ids are silently ignored.
    pub fn remove(&mut self, id: u32, gpu: &mut dyn QuadGpu) {
        if let Some(pos) = self.records.iter().position(|r| r.id == id) {
            let mut rec = self.records.remove(pos);
            rec.release_gpu(gpu);
        }
    }

    /// Teardown: release every record's GPU resources and drop all records
    pub fn clear_all(&mut self, gpu: &mut dyn QuadGpu) {
        for mut rec in self.records.drain(..) {
            rec.release_gpu(gpu);
        }
    }

    /// Current world-space corner positions for a record, computing and
    /// caching them if stale
    pub fn corner_positions(&mut self, id: u32) -> Option<[Vec3; 4]> {
        self.record_mut(id).map(ImageRecord::cached_corners)
    }

    /// Axis-aligned bounding box enclosing every record's corner points,
    /// filling corner caches along the way. With zero records this returns
    /// the unit box `[-0.5, 0.5]` on every axis, a stable sentinel rather
    /// than an error.
    pub fn world_boundaries(&mut self) -> Aabb {
        if self.records.is_empty() {
            return Aabb::unit();
        }
        let mut bounds = Aabb::empty();
        for rec in &mut self.records {
            for p in rec.cached_corners() {
                bounds.fold(p);
            }
        }
        bounds
    }

    /// Rebuild one record's quad geometry if it is stale. Recomputes the
    /// world bounds over all records and normalizes this record's corners
    /// into `[-0.5, 0.5]` within them.
    fn update_geometry_at(&mut self, index: usize, gpu: &mut dyn QuadGpu) -> Result<()> {
        {
            let rec = &self.records[index];
            if !rec.geometry_outdated && rec.geometry.is_some() {
                return Ok(());
            }
        }
        if let Some(h) = self.records[index].geometry.take() {
            gpu.destroy_geometry(h);
        }

        let bounds = self.world_boundaries();
        // Degenerate extents (single coplanar quad) map to the box center
        let ext_x = if bounds.size_x() > f64::EPSILON {
            bounds.size_x()
        } else {
            1.0
        };
        let ext_z = if bounds.size_z() > f64::EPSILON {
            bounds.size_z()
        } else {
            1.0
        };

        let rec = &mut self.records[index];
        let corners = rec.cached_corners();
        let map_x = |p: Vec3| (-0.5 + (p.x - bounds.min.x) / ext_x) as f32;
        let map_z = |p: Vec3| (-0.5 + (p.z - bounds.min.z) / ext_z) as f32;

        // Top-down 2D positions (z, x) with UVs winding around the quad
        #[rustfmt::skip]
        let vertices: QuadVertices = [
            map_z(corners[0]), map_x(corners[0]), 0.0, 1.0,
            map_z(corners[1]), map_x(corners[1]), 1.0, 1.0,
            map_z(corners[2]), map_x(corners[2]), 1.0, 0.0,
            map_z(corners[3]), map_x(corners[3]), 0.0, 0.0,
        ];

        rec.geometry = Some(gpu.create_quad_geometry(&vertices, &QUAD_INDICES)?);
        rec.geometry_outdated = false;
        Ok(())
    }

    /// Draw every record that has texel data set: geometry is brought up to
    /// date, the texture is uploaded if missing, and one quad draw is issued
    /// per record. Records without texel data are skipped entirely.
    pub fn draw(&mut self, gpu: &mut dyn QuadGpu) -> Result<()> {
        gpu.prepare()?;

        for index in 0..self.records.len() {
            if self.records[index].texels.is_none() {
                continue;
            }
            self.update_geometry_at(index, gpu)?;

            let rec = &mut self.records[index];
            if rec.texture.is_none() {
                if let Some(texels) = &rec.texels {
                    rec.texture =
                        Some(gpu.upload_grayscale_texture(rec.width, rec.height, texels)?);
                }
            }
            if let (Some(geometry), Some(texture)) = (rec.geometry, rec.texture) {
                gpu.draw_quad(geometry, texture)?;
            }
        }
        Ok(())
    }
}

impl Default for MultiImageRotator {
    fn default() -> Self {
        Self::new()
    }
}
