//! The uniform output record every dataset reader produces.
//!
//! This is the central data structure of the crate: each reader parses its
//! own raw layout and emits a [`Record`], which the downstream
//! representation-learning pipeline consumes as-is. Think of it as the hub
//! format in a converter: readers differ, the record does not.

use ndarray::{Array1, Array2, Array4};

use crate::error::UnisetError;

/// Pose/viewpoint content labels, orthogonal to the identity class.
///
/// Datasets with a discrete viewpoint enumeration use [`Content::Codes`];
/// datasets with keypoint-derived content use [`Content::Vectors`].
#[derive(Clone, Debug, PartialEq)]
pub enum Content {
    /// One discrete code per sample (e.g. `elevation * 24 + azimuth`).
    Codes(Array1<i64>),
    /// One fixed-width float vector per sample (e.g. flattened keypoints).
    Vectors(Array2<f32>),
}

impl Content {
    /// Number of samples covered by the content labels.
    pub fn len(&self) -> usize {
        match self {
            Content::Codes(codes) => codes.len(),
            Content::Vectors(vectors) => vectors.nrows(),
        }
    }

    /// Returns true if no samples are covered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The uniform in-memory record: aligned images plus per-sample labels.
///
/// All present sequences share the same length; [`Record::validate`]
/// enforces this and every reader runs it before returning. Class values
/// are dense in `[0, K)` for identity-style readers; the attribute-pair
/// reader intentionally keeps its raw rule ids instead (downstream
/// consumers tolerate that non-dense space).
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    /// `(N, H, W, 3)` 8-bit pixels, sample-major.
    pub imgs: Array4<u8>,
    /// N integer class labels.
    pub classes: Array1<i64>,
    /// Optional pose/viewpoint content labels.
    pub content: Option<Content>,
    /// Optional `(N, 40)` binary attribute vectors.
    pub attributes: Option<Array2<u8>>,
    /// Optional `(N, 136)` landmark vectors; all-zero rows mark samples
    /// where detection failed.
    pub landmarks: Option<Array2<i16>>,
}

impl Record {
    /// Number of samples in the record.
    pub fn len(&self) -> usize {
        self.imgs.shape()[0]
    }

    /// Returns true if the record holds no samples.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checks the alignment invariant: every present sequence has the same
    /// length as `imgs`.
    pub fn validate(&self) -> Result<(), UnisetError> {
        let n = self.len();

        let check = |name: &str, len: usize| -> Result<(), UnisetError> {
            if len != n {
                return Err(UnisetError::RecordMisaligned {
                    message: format!("'{name}' has {len} entries but 'imgs' has {n}"),
                });
            }
            Ok(())
        };

        check("class", self.classes.len())?;
        if let Some(content) = &self.content {
            check("content", content.len())?;
        }
        if let Some(attributes) = &self.attributes {
            check("attributes", attributes.nrows())?;
        }
        if let Some(landmarks) = &self.landmarks {
            check("landmarks", landmarks.nrows())?;
        }
        Ok(())
    }
}
