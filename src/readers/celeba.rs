//! Face identity dataset reader.
//!
//! The raw layout is the aligned-face archive: PNG images under
//! `Img/img_align_celeba_png.7z/img_align_celeba_png`, a flat identity map
//! (`Anno/identity_CelebA.txt`, space-delimited `name id` rows), and an
//! attribute map (`Anno/list_attr_celeba.txt`, two header lines then a
//! name followed by 40 ±1 values). Every image is center-cropped, resized,
//! attributed, and run through the injected landmark detector; samples
//! where detection fails keep the zero-sentinel landmark row.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use indicatif::ProgressBar;
use ndarray::{Array2, Array4};
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use tracing::{debug, info};

use crate::attributes::Attributes;
use crate::error::UnisetError;
use crate::geometry::{center_crop, resize_to};
use crate::landmarks::{Detector, LANDMARK_DIM};
use crate::readers::{copy_into, decode_rgb, dense_class_map};
use crate::record::Record;

#[derive(Clone, Debug)]
pub struct CelebAOptions {
    /// Center-crop window as (width, height).
    pub crop_size: (u32, u32),
    /// Output size as (width, height).
    pub target_size: (u32, u32),
    /// Optional cap on the sample count; draws with replacement, so a cap
    /// larger than the pool repeats samples.
    pub n_images: Option<usize>,
    /// Seed for the subsampling draws; unseeded runs use OS entropy.
    pub seed: Option<u64>,
}

impl Default for CelebAOptions {
    fn default() -> Self {
        Self {
            crop_size: (128, 128),
            target_size: (128, 128),
            n_images: None,
            seed: None,
        }
    }
}

pub struct CelebAReader {
    base_dir: PathBuf,
    opts: CelebAOptions,
    detector: Detector,
}

impl CelebAReader {
    pub fn new(base_dir: &Path, opts: CelebAOptions, detector: Detector) -> Self {
        Self {
            base_dir: base_dir.to_path_buf(),
            opts,
            detector,
        }
    }

    pub fn read(&self) -> Result<Record, UnisetError> {
        let identity_path = identity_map_path(&self.base_dir);
        let attribute_path = attribute_map_path(&self.base_dir);
        let imgs_dir = aligned_imgs_dir(&self.base_dir);

        let mut entries = read_identity_map(&identity_path)?;
        if let Some(n) = self.opts.n_images {
            if entries.is_empty() {
                return Err(UnisetError::Layout {
                    path: identity_path.clone(),
                    message: "cannot subsample an empty identity map".to_string(),
                });
            }
            entries = subsample_with_replacement(&entries, n, self.opts.seed);
        }
        let attribute_map = read_attribute_map(&attribute_path)?;

        let n = entries.len();
        let (crop_w, crop_h) = self.opts.crop_size;
        let (target_w, target_h) = self.opts.target_size;

        let mut imgs = Array4::<u8>::zeros((n, target_h as usize, target_w as usize, 3));
        let mut attributes = Array2::<u8>::zeros((n, crate::attributes::ATTRIBUTE_COUNT));
        let mut landmarks = Array2::<i16>::zeros((n, LANDMARK_DIM));
        let identities: Vec<String> = entries.iter().map(|(_, id)| id.clone()).collect();

        let progress = ProgressBar::new(n as u64);
        for (i, (stem, _)) in entries.iter().enumerate() {
            let img_path = imgs_dir.join(format!("{stem}.png"));
            let img = decode_rgb(&img_path)?;
            let cropped = center_crop(&img, crop_w, crop_h);
            let resized = resize_to(&cropped, target_w, target_h);
            copy_into(&mut imgs, i, &resized);

            let attrs =
                attribute_map
                    .get(stem.as_str())
                    .ok_or_else(|| UnisetError::MissingAnnotation {
                        key: stem.clone(),
                        path: attribute_path.clone(),
                    })?;
            for (slot, &value) in attributes.row_mut(i).iter_mut().zip(attrs.as_row()) {
                *slot = value;
            }

            match self.detector.detect(&resized) {
                Some(found) => {
                    for (slot, value) in landmarks.row_mut(i).iter_mut().zip(found.to_row()) {
                        *slot = value;
                    }
                }
                None => debug!(sample = %stem, "no landmarks detected, keeping zero sentinel"),
            }
            progress.inc(1);
        }
        progress.finish_and_clear();

        let record = Record {
            imgs,
            classes: dense_class_map(&identities),
            content: None,
            attributes: Some(attributes),
            landmarks: Some(landmarks),
        };
        record.validate()?;
        info!(samples = record.len(), "read celeba dataset");
        Ok(record)
    }
}

pub(crate) fn aligned_imgs_dir(base_dir: &Path) -> PathBuf {
    base_dir
        .join("Img")
        .join("img_align_celeba_png.7z")
        .join("img_align_celeba_png")
}

pub(crate) fn identity_map_path(base_dir: &Path) -> PathBuf {
    base_dir.join("Anno").join("identity_CelebA.txt")
}

pub(crate) fn attribute_map_path(base_dir: &Path) -> PathBuf {
    base_dir.join("Anno").join("list_attr_celeba.txt")
}

pub(crate) fn read_identity_map(path: &Path) -> Result<Vec<(String, String)>, UnisetError> {
    let content = fs::read_to_string(path)?;
    parse_identity_map(&content, path)
}

pub(crate) fn read_attribute_map(
    path: &Path,
) -> Result<HashMap<String, Attributes>, UnisetError> {
    let content = fs::read_to_string(path)?;
    parse_attribute_map(&content, path)
}

/// Parses the identity map: one `name identity` pair per line. Returns
/// (file stem, identity) pairs in file order. `path` is error context.
pub fn parse_identity_map(
    content: &str,
    path: &Path,
) -> Result<Vec<(String, String)>, UnisetError> {
    let mut entries = Vec::new();
    for (line_idx, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let mut tokens = line.split_whitespace();
        let (Some(name), Some(identity), None) = (tokens.next(), tokens.next(), tokens.next())
        else {
            return Err(UnisetError::Layout {
                path: path.to_path_buf(),
                message: format!(
                    "line {} is not a 'name identity' pair: '{line}'",
                    line_idx + 1
                ),
            });
        };
        entries.push((file_stem(name), identity.to_string()));
    }
    Ok(entries)
}

/// Parses the attribute map: two header lines, then a name followed by 40
/// ±1 values per line. `-1` becomes `0`. `path` is error context.
pub fn parse_attribute_map(
    content: &str,
    path: &Path,
) -> Result<HashMap<String, Attributes>, UnisetError> {
    let mut map = HashMap::new();
    for (line_idx, line) in content.lines().enumerate().skip(2) {
        if line.trim().is_empty() {
            continue;
        }
        let mut tokens = line.split_whitespace();
        let name = tokens.next().unwrap_or_default();
        let values: Vec<i8> = tokens
            .map(str::parse)
            .collect::<Result<_, _>>()
            .map_err(|_| UnisetError::Layout {
                path: path.to_path_buf(),
                message: format!("line {} has non-numeric attribute values", line_idx + 1),
            })?;
        let attrs = Attributes::from_signed(&values).ok_or_else(|| UnisetError::Layout {
            path: path.to_path_buf(),
            message: format!(
                "line {} has {} attribute values, expected {}",
                line_idx + 1,
                values.len(),
                crate::attributes::ATTRIBUTE_COUNT
            ),
        })?;
        map.insert(file_stem(name), attrs);
    }
    Ok(map)
}

fn file_stem(name: &str) -> String {
    Path::new(name)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.to_string())
}

/// Draws `n` entries uniformly with replacement. A quantity larger than
/// the pool repeats samples; that is intentional for capped-size runs.
fn subsample_with_replacement<T: Clone>(items: &[T], n: usize, seed: Option<u64>) -> Vec<T> {
    let mut picks = Vec::with_capacity(n);
    if let Some(seed) = seed {
        let mut rng = StdRng::seed_from_u64(seed);
        for _ in 0..n {
            picks.push(items[rng.random_range(0..items.len())].clone());
        }
    } else {
        let mut rng = rand::rng();
        for _ in 0..n {
            picks.push(items[rng.random_range(0..items.len())].clone());
        }
    }
    picks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_subsample_is_reproducible() {
        let items: Vec<usize> = (0..10).collect();
        let a = subsample_with_replacement(&items, 6, Some(17));
        let b = subsample_with_replacement(&items, 6, Some(17));
        assert_eq!(a, b);
    }

    #[test]
    fn test_subsample_can_exceed_pool() {
        let items = vec!["only".to_string()];
        let picks = subsample_with_replacement(&items, 5, Some(1));
        assert_eq!(picks.len(), 5);
        assert!(picks.iter().all(|item| item == "only"));
    }

    #[test]
    fn test_file_stem_strips_extension() {
        assert_eq!(file_stem("000001.jpg"), "000001");
        assert_eq!(file_stem("000002"), "000002");
    }
}
