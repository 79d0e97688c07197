//! Category-folder dataset reader.
//!
//! The raw layout is one subdirectory per class under a split directory.
//! Class ids are the folder's index in sorted listing order, and files are
//! visited in sorted order too, so repeated reads are byte-identical.

use std::fs;
use std::path::{Path, PathBuf};

use ndarray::{Array1, Array4};
use tracing::info;
use walkdir::WalkDir;

use crate::error::UnisetError;
use crate::geometry::resize_square;
use crate::readers::{copy_into, decode_rgb, Split};
use crate::record::Record;

const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "bmp"];

#[derive(Clone, Debug)]
pub struct AfhqOptions {
    pub split: Split,
    pub img_size: u32,
}

impl Default for AfhqOptions {
    fn default() -> Self {
        Self {
            split: Split::Train,
            img_size: 128,
        }
    }
}

pub struct AfhqReader {
    base_dir: PathBuf,
    opts: AfhqOptions,
}

impl AfhqReader {
    pub fn new(base_dir: &Path, opts: AfhqOptions) -> Self {
        Self {
            base_dir: base_dir.to_path_buf(),
            opts,
        }
    }

    pub fn read(&self) -> Result<Record, UnisetError> {
        let split_dir = self.base_dir.join(self.opts.split.as_str());

        let mut class_dirs: Vec<PathBuf> = fs::read_dir(&split_dir)?
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .collect();
        class_dirs.sort();
        if class_dirs.is_empty() {
            return Err(UnisetError::Layout {
                path: split_dir,
                message: "split directory holds no class directories".to_string(),
            });
        }

        let mut samples: Vec<(PathBuf, i64)> = Vec::new();
        for (class_id, class_dir) in class_dirs.iter().enumerate() {
            let mut files = collect_image_files(class_dir);
            files.sort();
            for file in files {
                samples.push((file, class_id as i64));
            }
        }

        let n = samples.len();
        let size = self.opts.img_size as usize;
        let mut imgs = Array4::<u8>::zeros((n, size, size, 3));
        let mut classes = Array1::<i64>::zeros(n);
        for (i, (path, class_id)) in samples.iter().enumerate() {
            let img = decode_rgb(path)?;
            let resized = resize_square(&img, self.opts.img_size);
            copy_into(&mut imgs, i, &resized);
            classes[i] = *class_id;
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
            classes = class_dirs.len(),
            split = %self.opts.split,
            "read category-folder dataset"
        );
        Ok(record)
    }
}

fn collect_image_files(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
                .unwrap_or(false)
        })
        .collect()
}
