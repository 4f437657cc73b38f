//! CPU-side raster buffer for the simulation frame.
//!
//! This is the 2D surface that particle and fluid renderers paint into every
//! frame. Pixel memory may be mapped/unmapped by the graphics driver once the
//! buffer is bridged to a GPU texture, so all pixel reads and writes must
//! happen between `lock()` and `unlock()`. The lock is not a thread
//! synchronization primitive (the whole core is single-threaded); it is the
//! CPU/GPU memory-mapping discipline.
//!
//! Pixel format is fixed at 4 bytes per pixel in `[A, R, G, B]` byte order
//! (little-endian `BGRA8888`). That order must round-trip losslessly through
//! GPU upload and download; it is *not* interchangeable with 3-byte RGB
//! without explicit conversion.

/// Bytes per pixel. Fixed; every byte offset in this module assumes it.
pub const BYTES_PER_PIXEL: usize = 4;

/// CPU-addressable 2D grid of `[A, R, G, B]` pixel bytes with a lock flag
/// guarding all access.
pub struct RasterBuffer {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
    locked: bool,
}

impl RasterBuffer {
    /// Create a new raster buffer, all pixels transparent black
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: vec![0; width as usize * height as usize * BYTES_PER_PIXEL],
            width,
            height,
            locked: false,
        }
    }

    /// Recreate the buffer if the dimensions changed. A call with the current
    /// dimensions is a no-op (contents kept); a changed size discards all
    /// pixels. Returns true when the buffer was recreated.
    ///
    /// Must not be called while locked.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        assert!(!self.locked, "resize while surface is locked");
        if width == self.width && height == self.height {
            return false;
        }
        self.width = width;
        self.height = height;
        self.pixels = vec![0; width as usize * height as usize * BYTES_PER_PIXEL];
        true
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row stride in bytes (no padding: width * 4)
    #[inline]
    pub fn pitch(&self) -> usize {
        self.width as usize * BYTES_PER_PIXEL
    }

    // ========================================================================
    // Lock Discipline
    // ========================================================================

    /// Acquire pixel access. Idempotent: locking an already-locked buffer is
    /// a no-op, so callers that share the buffer must track nesting
    /// themselves; the matching `unlock()` releases fully.
    pub fn lock(&mut self) {
        if !self.locked {
            self.locked = true;
        }
    }

    /// Release pixel access. Idempotent.
    pub fn unlock(&mut self) {
        if self.locked {
            self.locked = false;
        }
    }

    #[inline]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    #[inline]
    fn assert_locked(&self) {
        assert!(self.locked, "pixel access on unlocked surface");
    }

    /// Check if coordinates are within bounds
    #[inline]
    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32
    }

    /// Calculate byte offset for pixel at (x, y)
    #[inline]
    fn pixel_offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL
    }

    // ========================================================================
    // Pixel Access (requires lock)
    // ========================================================================

    /// Raw pixel bytes, `[A, R, G, B]` per pixel, row-major
    pub fn pixels(&self) -> &[u8] {
        self.assert_locked();
        &self.pixels
    }

    /// Mutable raw pixel bytes
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        self.assert_locked();
        &mut self.pixels
    }

    /// Clear all pixels to a flat value.
    /// Optimized: uses u32 fill instead of byte-by-byte writes.
    pub fn fill(&mut self, a: u8, r: u8, g: u8, b: u8) {
        self.assert_locked();
        let pixel = u32::from_ne_bytes([a, r, g, b]);

        // Safety: pixels.len() is always divisible by 4 (width * height * 4).
        // write_unaligned avoids assuming alignment of Vec<u8>.
        let ptr = self.pixels.as_mut_ptr() as *mut u32;
        let len = self.pixels.len() / 4;
        for i in 0..len {
            // Safety: i < len keeps the write in bounds
            unsafe {
                ptr.add(i).write_unaligned(pixel);
            }
        }
    }

    /// Set a single pixel (bounds checked)
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, a: u8, r: u8, g: u8, b: u8) {
        self.assert_locked();
        if self.in_bounds(x, y) {
            let idx = self.pixel_offset(x as u32, y as u32);
            self.pixels[idx] = a;
            self.pixels[idx + 1] = r;
            self.pixels[idx + 2] = g;
            self.pixels[idx + 3] = b;
        }
    }

    /// Read a pixel (bounds checked).
    /// Returns (a, r, g, b) or None if out of bounds.
    #[inline]
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<(u8, u8, u8, u8)> {
        self.assert_locked();
        if self.in_bounds(x, y) {
            let idx = self.pixel_offset(x as u32, y as u32);
            Some((
                self.pixels[idx],     // A
                self.pixels[idx + 1], // R
                self.pixels[idx + 2], // G
                self.pixels[idx + 3], // B
            ))
        } else {
            None
        }
    }

    /// Additive splat at a flat pixel index: scales (r, g, b) by a/255, then
    /// adds per channel into the existing pixel, saturating at 255. Alpha
    /// accumulates the raw `a`, also saturating. This is how particle and
    /// fluid contributions pile up in the surface.
    ///
    /// Out-of-range indices are ignored.
    #[inline]
    pub fn blend_pixel_additive(&mut self, index: usize, r: u8, g: u8, b: u8, a: u8) {
        self.assert_locked();
        let idx = index * BYTES_PER_PIXEL;
        if idx + 3 >= self.pixels.len() {
            return;
        }
        let scale = a as f32 / 255.0;
        let r = (r as f32 * scale) as u8;
        let g = (g as f32 * scale) as u8;
        let b = (b as f32 * scale) as u8;

        self.pixels[idx] = self.pixels[idx].saturating_add(a);
        self.pixels[idx + 1] = self.pixels[idx + 1].saturating_add(r);
        self.pixels[idx + 2] = self.pixels[idx + 2].saturating_add(g);
        self.pixels[idx + 3] = self.pixels[idx + 3].saturating_add(b);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_then_read_back() {
        let mut buf = RasterBuffer::new(8, 6);
        buf.lock();
        buf.fill(255, 10, 20, 30);
        for y in 0..6 {
            for x in 0..8 {
                assert_eq!(buf.get_pixel(x, y), Some((255, 10, 20, 30)));
            }
        }
        buf.unlock();
    }

    #[test]
    fn test_set_get_round_trip() {
        let mut buf = RasterBuffer::new(4, 4);
        buf.lock();
        buf.set_pixel(2, 3, 128, 1, 2, 3);
        assert_eq!(buf.get_pixel(2, 3), Some((128, 1, 2, 3)));
        assert_eq!(buf.get_pixel(4, 0), None);
        assert_eq!(buf.get_pixel(-1, 0), None);
    }

    #[test]
    fn test_additive_blend_scales_by_alpha() {
        let mut buf = RasterBuffer::new(2, 1);
        buf.lock();
        // Half alpha: rgb contributions halve, alpha accumulates raw
        buf.blend_pixel_additive(1, 100, 200, 50, 127);
        let (a, r, g, b) = buf.get_pixel(1, 0).unwrap();
        assert_eq!(a, 127);
        assert_eq!(r, (100.0_f32 * 127.0 / 255.0) as u8);
        assert_eq!(g, (200.0_f32 * 127.0 / 255.0) as u8);
        assert_eq!(b, (50.0_f32 * 127.0 / 255.0) as u8);
    }

    #[test]
    fn test_additive_blend_saturates() {
        let mut buf = RasterBuffer::new(1, 1);
        buf.lock();
        for _ in 0..10 {
            buf.blend_pixel_additive(0, 200, 200, 200, 255);
        }
        assert_eq!(buf.get_pixel(0, 0), Some((255, 255, 255, 255)));
    }

    #[test]
    fn test_additive_blend_out_of_range_ignored() {
        let mut buf = RasterBuffer::new(2, 2);
        buf.lock();
        buf.blend_pixel_additive(4, 255, 255, 255, 255);
        assert_eq!(buf.get_pixel(1, 1), Some((0, 0, 0, 0)));
    }

    #[test]
    #[should_panic(expected = "unlocked")]
    fn test_pixel_access_requires_lock() {
        let mut buf = RasterBuffer::new(2, 2);
        buf.set_pixel(0, 0, 255, 1, 2, 3);
    }

    #[test]
    fn test_lock_is_idempotent() {
        let mut buf = RasterBuffer::new(2, 2);
        buf.lock();
        buf.lock();
        assert!(buf.is_locked());
        buf.unlock();
        assert!(!buf.is_locked());
        buf.unlock();
        assert!(!buf.is_locked());
    }

    #[test]
    fn test_resize_same_dimensions_is_noop() {
        let mut buf = RasterBuffer::new(4, 4);
        buf.lock();
        buf.set_pixel(1, 1, 255, 9, 9, 9);
        buf.unlock();
        assert!(!buf.resize(4, 4));
        buf.lock();
        assert_eq!(buf.get_pixel(1, 1), Some((255, 9, 9, 9)));
    }

    #[test]
    fn test_resize_changed_dimensions_recreates() {
        let mut buf = RasterBuffer::new(4, 4);
        assert!(buf.resize(8, 2));
        assert_eq!(buf.width(), 8);
        assert_eq!(buf.height(), 2);
        buf.lock();
        assert_eq!(buf.get_pixel(7, 1), Some((0, 0, 0, 0)));
    }
}
