//! Render offset compositor: camera-style panning of the 2D layer.
//!
//! External callers (camera movement) accumulate fractional (x, y) deltas
//! into the compositor; `apply()` shifts the raster buffer contents by the
//! rounded accumulated offset, copying through a same-sized scratch buffer.
//! The accumulator is deliberately never reset by `apply()`; repeated calls
//! compound the shift. A caller that wants a one-shot pan must subtract the
//! offset back out itself.

use crate::raster::{RasterBuffer, BYTES_PER_PIXEL};

/// Accumulating sub-pixel scroll offset plus the scratch buffer used to
/// reposition the raster contents.
pub struct OffsetCompositor {
    offset_x: f64,
    offset_y: f64,
    scratch: Vec<u8>,
}

impl OffsetCompositor {
    pub fn new() -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 0.0,
            scratch: Vec::new(),
        }
    }

    /// Accumulate a pan delta. Cumulative across calls.
    pub fn add_offset(&mut self, x: f64, y: f64) {
        self.offset_x += x;
        self.offset_y += y;
    }

    /// Current accumulated offset
    pub fn offset(&self) -> (f64, f64) {
        (self.offset_x, self.offset_y)
    }

    /// Shift the raster contents by the rounded accumulated offset. A pixel
    /// at (x, y) lands at (x + round(dx), y + round(dy)); destination cells
    /// with no source pixel become transparent black.
    ///
    /// The buffer must be unlocked on entry; the copy locks it internally.
    pub fn apply(&mut self, raster: &mut RasterBuffer) {
        assert!(
            !raster.is_locked(),
            "apply_offset requires an unlocked surface"
        );

        // Round half up: +0.5 then floor
        let dx = (self.offset_x + 0.5).floor() as i32;
        let dy = (self.offset_y + 0.5).floor() as i32;

        let w = raster.width() as i32;
        let h = raster.height() as i32;
        let len = w as usize * h as usize * BYTES_PER_PIXEL;
        self.scratch.resize(len, 0);
        self.scratch.fill(0);

        raster.lock();

        // Copy shifted rows into the scratch buffer; regions with no source
        // stay zeroed (transparent black).
        {
            let src = raster.pixels();
            for y in 0..h {
                let src_y = y - dy;
                if src_y < 0 || src_y >= h {
                    continue;
                }

                let x_start = 0.max(dx);
                let x_end = w.min(w + dx);
                if x_start >= x_end {
                    continue;
                }

                let src_row_start =
                    ((src_y * w + (x_start - dx)) as usize) * BYTES_PER_PIXEL;
                let dst_row_start = ((y * w + x_start) as usize) * BYTES_PER_PIXEL;
                let row_bytes = (x_end - x_start) as usize * BYTES_PER_PIXEL;

                self.scratch[dst_row_start..dst_row_start + row_bytes]
                    .copy_from_slice(&src[src_row_start..src_row_start + row_bytes]);
            }
        }

        // Scratch back in full: cleared surface, then the shifted image
        raster.pixels_mut().copy_from_slice(&self.scratch);
        raster.unlock();
    }
}

impl Default for OffsetCompositor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marked_buffer() -> RasterBuffer {
        let mut buf = RasterBuffer::new(8, 8);
        buf.lock();
        buf.set_pixel(3, 4, 255, 10, 20, 30);
        buf.unlock();
        buf
    }

    #[test]
    fn test_zero_offset_is_idempotent() {
        let mut buf = marked_buffer();
        let mut comp = OffsetCompositor::new();
        comp.apply(&mut buf);
        buf.lock();
        assert_eq!(buf.get_pixel(3, 4), Some((255, 10, 20, 30)));
        for y in 0..8 {
            for x in 0..8 {
                if (x, y) != (3, 4) {
                    assert_eq!(buf.get_pixel(x, y), Some((0, 0, 0, 0)));
                }
            }
        }
    }

    #[test]
    fn test_positive_offset_shifts_content() {
        let mut buf = marked_buffer();
        let mut comp = OffsetCompositor::new();
        comp.add_offset(2.2, 1.4);
        comp.apply(&mut buf);
        buf.lock();
        // round(2.2) = 2, round(1.4) = 1
        assert_eq!(buf.get_pixel(5, 5), Some((255, 10, 20, 30)));
        assert_eq!(buf.get_pixel(3, 4), Some((0, 0, 0, 0)));
    }

    #[test]
    fn test_negative_offset_shifts_content() {
        let mut buf = marked_buffer();
        let mut comp = OffsetCompositor::new();
        comp.add_offset(-2.0, -3.0);
        comp.apply(&mut buf);
        buf.lock();
        assert_eq!(buf.get_pixel(1, 1), Some((255, 10, 20, 30)));
    }

    #[test]
    fn test_vacated_cells_become_black() {
        let mut buf = RasterBuffer::new(4, 4);
        buf.lock();
        buf.fill(255, 50, 60, 70);
        buf.unlock();
        let mut comp = OffsetCompositor::new();
        comp.add_offset(2.0, 0.0);
        comp.apply(&mut buf);
        buf.lock();
        assert_eq!(buf.get_pixel(0, 0), Some((0, 0, 0, 0)));
        assert_eq!(buf.get_pixel(1, 0), Some((0, 0, 0, 0)));
        assert_eq!(buf.get_pixel(2, 0), Some((255, 50, 60, 70)));
    }

    #[test]
    fn test_accumulator_is_not_reset_by_apply() {
        let mut buf = marked_buffer();
        let mut comp = OffsetCompositor::new();
        comp.add_offset(1.0, 0.0);
        comp.apply(&mut buf);
        comp.apply(&mut buf);
        assert_eq!(comp.offset(), (1.0, 0.0));
        buf.lock();
        // Two applies compound: shifted by 1 twice
        assert_eq!(buf.get_pixel(5, 4), Some((255, 10, 20, 30)));
    }

    #[test]
    #[should_panic(expected = "unlocked")]
    fn test_apply_requires_unlocked_surface() {
        let mut buf = RasterBuffer::new(2, 2);
        buf.lock();
        OffsetCompositor::new().apply(&mut buf);
    }
}
