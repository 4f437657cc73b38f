//! Error taxonomy for the compositing core.
//!
//! Three failure classes exist, and they are handled very differently:
//!
//! - [`SurfaceError::Unrecoverable`]: the graphics environment itself is
//!   broken (window/texture creation failed, shader program would not link).
//!   Nothing mid-frame can fix this; the caller decides whether to terminate.
//! - [`SurfaceError::Graphics`]: a single texture update/lock/read-pixels
//!   call failed. The operation aborts early, prior buffer contents are left
//!   unchanged, and the caller should treat the frame as stale and retry next
//!   frame.
//! - Caller-contract violations (dimension mismatch, touching an unlocked
//!   buffer) are programming errors and panic via assertions rather than
//!   returning an error.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SurfaceError {
    /// Broken graphics environment; cannot be recovered mid-frame.
    #[error("unrecoverable graphics environment failure: {0}")]
    Unrecoverable(String),

    /// A single graphics operation failed; retry next frame.
    #[error("graphics operation failed: {0}")]
    Graphics(String),

    /// Configuration file could not be read, written, or parsed.
    #[error("config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, SurfaceError>;
