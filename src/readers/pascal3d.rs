//! Vehicle-category dataset reader.
//!
//! The raw imagery comes from an external collaborator: anything
//! implementing [`VehicleSource`] supplies a channel-first image stack for
//! one category and split. The reader converts to channel-last, keeps the
//! first three channels, mirrors the width axis, resizes, and pairs the
//! stack with a precomputed class archive.

use std::fs::File;
use std::path::{Path, PathBuf};

use image::RgbImage;
use ndarray::{Array1, Array4};
use ndarray_npy::NpzReader;
use tracing::info;

use crate::error::UnisetError;
use crate::geometry::resize_square;
use crate::readers::{copy_into, Split};
use crate::record::Record;

/// External source of per-category vehicle image stacks.
///
/// Returned stacks are `(N, C, H, W)` with `C >= 3`; channels beyond the
/// first three are ignored. Injected at reader construction so the reader
/// never touches the collaborator's storage itself.
pub trait VehicleSource {
    fn category_images(&self, category: &str, split: Split) -> Result<Array4<u8>, UnisetError>;
}

#[derive(Clone, Debug)]
pub struct Pascal3dOptions {
    pub split: Split,
    pub category: String,
    pub classes_path: PathBuf,
    pub img_size: u32,
}

impl Pascal3dOptions {
    pub fn new(split: Split, category: impl Into<String>, classes_path: impl Into<PathBuf>) -> Self {
        Self {
            split,
            category: category.into(),
            classes_path: classes_path.into(),
            img_size: 128,
        }
    }
}

pub struct Pascal3dReader {
    source: Box<dyn VehicleSource>,
    opts: Pascal3dOptions,
}

impl Pascal3dReader {
    pub fn new(source: Box<dyn VehicleSource>, opts: Pascal3dOptions) -> Self {
        Self { source, opts }
    }

    pub fn read(&self) -> Result<Record, UnisetError> {
        let stack = self
            .source
            .category_images(&self.opts.category, self.opts.split)?;
        let (n, channels, height, width) = stack.dim();
        if channels < 3 {
            return Err(UnisetError::VehicleStack {
                category: self.opts.category.clone(),
                message: format!("stack has {channels} channels, expected at least 3"),
            });
        }

        let size = self.opts.img_size as usize;
        let mut imgs = Array4::<u8>::zeros((n, size, size, 3));
        for i in 0..n {
            // Channel-last with the width axis mirrored, first 3 channels.
            let mut img = RgbImage::new(width as u32, height as u32);
            for y in 0..height {
                for x in 0..width {
                    let source_x = width - 1 - x;
                    let pixel = image::Rgb([
                        stack[[i, 0, y, source_x]],
                        stack[[i, 1, y, source_x]],
                        stack[[i, 2, y, source_x]],
                    ]);
                    img.put_pixel(x as u32, y as u32, pixel);
                }
            }
            let resized = resize_square(&img, self.opts.img_size);
            copy_into(&mut imgs, i, &resized);
        }

        let classes = self.read_classes()?;
        if classes.len() != n {
            return Err(UnisetError::Layout {
                path: self.opts.classes_path.clone(),
                message: format!(
                    "'classes' holds {} labels but the vehicle stack holds {n} images",
                    classes.len()
                ),
            });
        }

        let record = Record {
            imgs,
            classes,
            content: None,
            attributes: None,
            landmarks: None,
        };
        record.validate()?;
        info!(
            samples = record.len(),
            category = %self.opts.category,
            split = %self.opts.split,
            "read pascal3d dataset"
        );
        Ok(record)
    }

    fn read_classes(&self) -> Result<Array1<i64>, UnisetError> {
        let file = File::open(&self.opts.classes_path)?;
        let mut npz = NpzReader::new(file).map_err(|source| UnisetError::NpzRead {
            path: self.opts.classes_path.clone(),
            source,
        })?;
        npz.by_name("classes.npy")
            .map_err(|source| UnisetError::NpzRead {
                path: self.opts.classes_path.clone(),
                source,
            })
    }
}
