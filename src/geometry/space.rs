//! Coordinate frame marker types.
//!
//! These are zero-sized types (ZSTs) used as type parameters to distinguish
//! between different coordinate frames at compile time.

use std::fmt;

/// Marker type for pixel coordinates (absolute values).
///
/// Pixel coordinates are absolute positions within an image, where (0, 0) is
/// the top-left corner.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pixel {}

/// Marker type for the canonical [-1, 1] frame.
///
/// Canonical coordinates place the crop center at the origin, with each axis
/// spanning [-1, 1] across the resized crop. Keypoints handed to the
/// downstream pipeline live in this frame.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Canonical {}

impl fmt::Debug for Pixel {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {} // This is unreachable since Pixel has no variants
    }
}

impl fmt::Debug for Canonical {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {} // This is unreachable since Canonical has no variants
    }
}
