//! Dataset readers.
//!
//! One module per supported dataset. Each reader owns its raw layout
//! (array archives, MAT struct-of-arrays, flat annotation text files,
//! directory-per-class trees) and emits the same uniform [`Record`],
//! composing the geometry, landmark, and attribute modules as needed.
//!
//! Readers are a closed set: the [`Reader`] enum has one variant per
//! dataset and dispatches the shared `read()` capability. There is no open
//! extension mechanism; adding a dataset means adding a variant.

use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use image::RgbImage;
use ndarray::{Array1, Array4};

use crate::error::UnisetError;
use crate::record::Record;

pub mod afhq;
pub mod attr_pairs;
pub mod cars3d;
pub mod celeba;
pub mod cub;
pub mod pascal3d;

pub use afhq::{AfhqOptions, AfhqReader};
pub use attr_pairs::{AttrPairOptions, AttrPairReader};
pub use cars3d::Cars3dReader;
pub use celeba::{CelebAOptions, CelebAReader};
pub use cub::{CubOptions, CubReader};
pub use pascal3d::{Pascal3dOptions, Pascal3dReader, VehicleSource};

/// Dataset split selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Split {
    Train,
    Val,
}

impl Split {
    pub fn as_str(&self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Val => "val",
        }
    }
}

impl FromStr for Split {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "train" => Ok(Split::Train),
            "val" => Ok(Split::Val),
            other => Err(format!(
                "unrecognized split '{other}' (expected 'train' or 'val')"
            )),
        }
    }
}

impl std::fmt::Display for Split {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A constructed dataset reader, one variant per supported dataset.
pub enum Reader {
    Cars3d(Cars3dReader),
    Cub(CubReader),
    Pascal3d(Pascal3dReader),
    CelebA(CelebAReader),
    BeardGlasses(AttrPairReader),
    Afhq(AfhqReader),
}

impl Reader {
    /// Runs the extraction and returns the uniform record.
    pub fn read(&self) -> Result<Record, UnisetError> {
        match self {
            Reader::Cars3d(reader) => reader.read(),
            Reader::Cub(reader) => reader.read(),
            Reader::Pascal3d(reader) => reader.read(),
            Reader::CelebA(reader) => reader.read(),
            Reader::BeardGlasses(reader) => reader.read(),
            Reader::Afhq(reader) => reader.read(),
        }
    }
}

/// Decodes an image file to RGB, replicating grayscale sources to three
/// channels. A missing file is reported as a missing annotation (the maps
/// referenced it); any other failure is a decode error.
pub(crate) fn decode_rgb(path: &Path) -> Result<RgbImage, UnisetError> {
    let img = image::open(path).map_err(|source| match &source {
        image::ImageError::IoError(io) if io.kind() == std::io::ErrorKind::NotFound => {
            UnisetError::MissingAnnotation {
                key: path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                path: path.to_path_buf(),
            }
        }
        _ => UnisetError::ImageDecode {
            path: path.to_path_buf(),
            source,
        },
    })?;
    Ok(img.to_rgb8())
}

/// Copies one decoded image into row `i` of a sample-major pixel array.
pub(crate) fn copy_into(imgs: &mut Array4<u8>, i: usize, img: &RgbImage) {
    for (x, y, pixel) in img.enumerate_pixels() {
        for channel in 0..3 {
            imgs[[i, y as usize, x as usize, channel]] = pixel[channel];
        }
    }
}

/// Dense class mapping: assigns contiguous ids `[0, K)` to raw identifiers
/// in first-seen order.
pub(crate) fn dense_class_map(raw: &[String]) -> Array1<i64> {
    let mut seen: HashMap<&str, i64> = HashMap::new();
    let mut out = Array1::zeros(raw.len());
    for (i, name) in raw.iter().enumerate() {
        let next = seen.len() as i64;
        let id = *seen.entry(name.as_str()).or_insert(next);
        out[i] = id;
    }
    out
}
