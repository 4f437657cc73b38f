//! Final compositing: merge the simulation surface into a presented frame.
//!
//! The raster buffer is treated as an RGBA overlay and source-over blended
//! into a caller-owned opaque frame (3 bytes RGB per pixel, row-major, no
//! padding). This is the hand-off point to whatever presents the final image.

use crate::raster::{RasterBuffer, BYTES_PER_PIXEL};

/// Per-pixel source-over blend of the raster overlay into `frame`.
///
/// For every pixel, `alpha = src_a / 255` and each of the three destination
/// color channels becomes `dst * (1 - alpha) + src * alpha`, truncated to
/// 8 bits. The blend is destructive on `frame`.
///
/// `width`/`height` must exactly match the raster buffer, and `frame` must
/// hold exactly `width * height * 3` bytes; both are programming-error
/// assertions, not runtime conditions. The raster is locked for the whole
/// pass and unlocked afterward.
pub fn blend_into(raster: &mut RasterBuffer, frame: &mut [u8], width: u32, height: u32) {
    assert_eq!(width, raster.width(), "frame width mismatch");
    assert_eq!(height, raster.height(), "frame height mismatch");
    assert_eq!(
        frame.len(),
        width as usize * height as usize * 3,
        "frame must be tightly packed 3-byte RGB"
    );

    raster.lock();
    let pitch = raster.pitch();
    let src = raster.pixels();

    for y in 0..height as usize {
        for x in 0..width as usize {
            let di = 3 * (x + y * width as usize);
            let si = BYTES_PER_PIXEL * x + y * pitch;

            let alpha = src[si] as f64 / 255.0;
            let inv = 1.0 - alpha;

            frame[di] = (frame[di] as f64 * inv + src[si + 1] as f64 * alpha) as u8;
            frame[di + 1] = (frame[di + 1] as f64 * inv + src[si + 2] as f64 * alpha) as u8;
            frame[di + 2] = (frame[di + 2] as f64 * inv + src[si + 3] as f64 * alpha) as u8;
        }
    }

    raster.unlock();
}
