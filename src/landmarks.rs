//! Face landmark detection adapter.
//!
//! The detection capability itself is external: callers inject anything
//! implementing [`AlignmentCapability`] (an ONNX model, a dlib wrapper, a
//! deterministic stub in tests). The [`Detector`] adapter narrows the
//! capability's candidate list to the single set the record stores, and the
//! readers apply the zero-sentinel policy when nothing is found.

use image::RgbImage;

/// Number of landmark points in a detection.
pub const LANDMARK_POINTS: usize = 68;

/// Width of a flattened landmark row (`x, y` interleaved).
pub const LANDMARK_DIM: usize = LANDMARK_POINTS * 2;

/// A fixed-count set of 2D landmarks in the pixel frame of the image the
/// detection ran on.
#[derive(Clone, Debug, PartialEq)]
pub struct Landmarks {
    points: Vec<(f32, f32)>,
}

impl Landmarks {
    /// Wraps a point list; returns `None` unless exactly
    /// [`LANDMARK_POINTS`] points are given.
    pub fn new(points: Vec<(f32, f32)>) -> Option<Self> {
        if points.len() == LANDMARK_POINTS {
            Some(Self { points })
        } else {
            None
        }
    }

    /// The landmark points, in detector order.
    pub fn points(&self) -> &[(f32, f32)] {
        &self.points
    }

    /// Flattens to an interleaved `x0, y0, x1, y1, ...` row, truncating
    /// each coordinate to `i16` the way the record stores landmarks.
    pub fn to_row(&self) -> [i16; LANDMARK_DIM] {
        let mut row = [0i16; LANDMARK_DIM];
        for (i, (x, y)) in self.points.iter().enumerate() {
            row[2 * i] = *x as i16;
            row[2 * i + 1] = *y as i16;
        }
        row
    }
}

/// The all-zero sentinel row written for samples where detection failed.
pub fn sentinel_row() -> [i16; LANDMARK_DIM] {
    [0i16; LANDMARK_DIM]
}

/// External face-alignment capability.
///
/// Implementations return zero or more candidate landmark sets for a single
/// normalized face image, best candidate first. They are stateless from the
/// caller's perspective and injected at reader construction so tests can
/// substitute a deterministic stub.
pub trait AlignmentCapability {
    fn candidates(&self, img: &RgbImage) -> Vec<Landmarks>;
}

/// Adapter over an [`AlignmentCapability`]: one image in, at most one
/// landmark set out.
///
/// When the capability returns several candidates (ambiguous detections),
/// the first is taken; when it returns none, `detect` yields `None` and the
/// caller leaves the landmark slot at its zero sentinel. A missing
/// detection never fails an extraction.
pub struct Detector {
    backend: Box<dyn AlignmentCapability>,
}

impl Detector {
    pub fn new(backend: Box<dyn AlignmentCapability>) -> Self {
        Self { backend }
    }

    /// Runs detection on one image, returning the first candidate if any.
    pub fn detect(&self, img: &RgbImage) -> Option<Landmarks> {
        self.backend.candidates(img).into_iter().next()
    }
}

/// A stand-in capability that never detects anything.
///
/// Useful when no real aligner is wired in: every sample keeps the
/// zero-sentinel landmark row, which is exactly the failed-detection
/// policy, so records stay well-formed.
pub struct NullAlignment;

impl AlignmentCapability for NullAlignment {
    fn candidates(&self, _img: &RgbImage) -> Vec<Landmarks> {
        Vec::new()
    }
}
