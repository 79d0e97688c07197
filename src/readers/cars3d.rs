//! Multi-view object dataset reader.
//!
//! The raw data is a single `cars3d.npz` archive whose `imgs` array
//! enumerates renders as (elevation, azimuth, object) in row-major order.
//! Classes and viewpoint codes are derived from that enumeration alone;
//! the pixels pass through untouched.

use std::fs::File;
use std::path::{Path, PathBuf};

use ndarray::{Array1, Array4};
use ndarray_npy::NpzReader;
use tracing::info;

use crate::error::UnisetError;
use crate::record::{Content, Record};

/// The fixed render enumeration: 4 elevations × 24 azimuths × 183 objects.
pub const ELEVATIONS: usize = 4;
pub const AZIMUTHS: usize = 24;
pub const OBJECTS: usize = 183;

pub struct Cars3dReader {
    data_path: PathBuf,
}

impl Cars3dReader {
    pub fn new(base_dir: &Path) -> Self {
        Self {
            data_path: base_dir.join("cars3d.npz"),
        }
    }

    pub fn read(&self) -> Result<Record, UnisetError> {
        let file = File::open(&self.data_path)?;
        let mut npz = NpzReader::new(file).map_err(|source| UnisetError::NpzRead {
            path: self.data_path.clone(),
            source,
        })?;
        let imgs: Array4<u8> = npz.by_name("imgs.npy").map_err(|source| UnisetError::NpzRead {
            path: self.data_path.clone(),
            source,
        })?;

        let n = imgs.shape()[0];
        let expected = ELEVATIONS * AZIMUTHS * OBJECTS;
        if n != expected {
            return Err(UnisetError::Layout {
                path: self.data_path.clone(),
                message: format!(
                    "'imgs' holds {n} samples, expected {expected} \
                     ({ELEVATIONS} elevations x {AZIMUTHS} azimuths x {OBJECTS} objects)"
                ),
            });
        }

        let mut classes = Array1::<i64>::zeros(n);
        let mut contents = Array1::<i64>::zeros(n);
        for elevation in 0..ELEVATIONS {
            for azimuth in 0..AZIMUTHS {
                for object_id in 0..OBJECTS {
                    let idx = elevation * AZIMUTHS * OBJECTS + azimuth * OBJECTS + object_id;
                    classes[idx] = object_id as i64;
                    contents[idx] = (elevation * AZIMUTHS + azimuth) as i64;
                }
            }
        }

        let record = Record {
            imgs,
            classes,
            content: Some(Content::Codes(contents)),
            attributes: None,
            landmarks: None,
        };
        record.validate()?;
        info!(samples = record.len(), "read cars3d dataset");
        Ok(record)
    }
}
