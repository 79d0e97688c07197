//! Attribute-pair dataset reader.
//!
//! Shares the face archive's raw layout with the identity reader but
//! derives its classes from the attribute rules instead of identities:
//! every image is classified before any pixel work, unclassified samples
//! are dropped, and only the survivors are decoded. Class ids stay the raw
//! rule ids, with deliberately no dense remap (downstream depends on the raw
//! {0, 1} encoding).

use std::path::{Path, PathBuf};

use indicatif::ProgressBar;
use ndarray::{Array1, Array4};
use tracing::info;

use crate::attributes::{beard_glasses_rules, classify, Rule};
use crate::error::UnisetError;
use crate::geometry::{center_crop, resize_to};
use crate::readers::celeba::{
    aligned_imgs_dir, attribute_map_path, identity_map_path, read_attribute_map,
    read_identity_map,
};
use crate::readers::{copy_into, decode_rgb};
use crate::record::Record;

#[derive(Clone, Debug)]
pub struct AttrPairOptions {
    /// Center-crop window as (width, height).
    pub crop_size: (u32, u32),
    /// Output size as (width, height).
    pub target_size: (u32, u32),
}

impl Default for AttrPairOptions {
    fn default() -> Self {
        Self {
            crop_size: (128, 128),
            target_size: (128, 128),
        }
    }
}

pub struct AttrPairReader {
    base_dir: PathBuf,
    opts: AttrPairOptions,
    rules: Vec<Rule>,
}

impl AttrPairReader {
    /// Reader with the built-in beard-versus-glasses rule pair.
    pub fn new(base_dir: &Path, opts: AttrPairOptions) -> Self {
        Self::with_rules(base_dir, opts, beard_glasses_rules())
    }

    /// Reader with a caller-supplied ordered rule list, evaluated
    /// first-match-wins.
    pub fn with_rules(base_dir: &Path, opts: AttrPairOptions, rules: Vec<Rule>) -> Self {
        Self {
            base_dir: base_dir.to_path_buf(),
            opts,
            rules,
        }
    }

    pub fn read(&self) -> Result<Record, UnisetError> {
        let identity_path = identity_map_path(&self.base_dir);
        let attribute_path = attribute_map_path(&self.base_dir);
        let imgs_dir = aligned_imgs_dir(&self.base_dir);

        let entries = read_identity_map(&identity_path)?;
        let attribute_map = read_attribute_map(&attribute_path)?;

        // Classify everything up front; only survivors get decoded.
        let mut selected: Vec<(String, i64)> = Vec::new();
        for (stem, _) in &entries {
            let attrs =
                attribute_map
                    .get(stem.as_str())
                    .ok_or_else(|| UnisetError::MissingAnnotation {
                        key: stem.clone(),
                        path: attribute_path.clone(),
                    })?;
            if let Some(class_id) = classify(&self.rules, attrs) {
                selected.push((stem.clone(), class_id));
            }
        }

        let n = selected.len();
        let (crop_w, crop_h) = self.opts.crop_size;
        let (target_w, target_h) = self.opts.target_size;
        let mut imgs = Array4::<u8>::zeros((n, target_h as usize, target_w as usize, 3));
        let mut classes = Array1::<i64>::zeros(n);

        let progress = ProgressBar::new(n as u64);
        for (i, (stem, class_id)) in selected.iter().enumerate() {
            let img = decode_rgb(&imgs_dir.join(format!("{stem}.png")))?;
            let cropped = center_crop(&img, crop_w, crop_h);
            let resized = resize_to(&cropped, target_w, target_h);
            copy_into(&mut imgs, i, &resized);
            classes[i] = *class_id;
            progress.inc(1);
        }
        progress.finish_and_clear();

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
            dropped = entries.len() - n,
            "read attribute-pair dataset"
        );
        Ok(record)
    }
}
