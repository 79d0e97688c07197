//! Bird-part dataset reader.
//!
//! Annotations are a MAT struct-of-arrays per split
//! (`from_cmr/data/{split}_cub_cleaned.mat`): each element references an
//! image on disk and carries a segmentation mask, a 1-based inclusive
//! bounding box, and a 3×15 keypoint matrix (x, y, visibility columns).
//! The reader composites image × mask, derives the square crop, remaps
//! visible keypoints into the canonical frame, and dense-maps the category
//! folder names into contiguous classes.

use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};
use ndarray::{Array2, Array4};
use tracing::info;

use crate::error::UnisetError;
use crate::geometry::{remap_keypoint, square_crop_and_resize, Coord, Region};
use crate::mat5::{MatFile, NumericArray, StructArray};
use crate::readers::{copy_into, decode_rgb, dense_class_map, Split};
use crate::record::{Content, Record};

/// Keypoints per sample and stored fields per keypoint (x, y, visibility).
pub const KEYPOINT_COUNT: usize = 15;
pub const KEYPOINT_FIELDS: usize = 3;

#[derive(Clone, Debug)]
pub struct CubOptions {
    pub split: Split,
    pub img_size: u32,
}

impl Default for CubOptions {
    fn default() -> Self {
        Self {
            split: Split::Train,
            img_size: 256,
        }
    }
}

pub struct CubReader {
    base_dir: PathBuf,
    opts: CubOptions,
}

impl CubReader {
    pub fn new(base_dir: &Path, opts: CubOptions) -> Self {
        Self {
            base_dir: base_dir.to_path_buf(),
            opts,
        }
    }

    fn annotation_path(&self) -> PathBuf {
        self.base_dir
            .join("from_cmr")
            .join("data")
            .join(format!("{}_cub_cleaned.mat", self.opts.split))
    }

    pub fn read(&self) -> Result<Record, UnisetError> {
        let mat_path = self.annotation_path();
        let mat = MatFile::open(&mat_path)?;
        let images = mat
            .var("images")
            .ok_or_else(|| UnisetError::MissingAnnotation {
                key: "images".to_string(),
                path: mat_path.clone(),
            })?
            .as_struct()
            .ok_or_else(|| layout(&mat_path, "'images' is not a struct array"))?;

        let n = images.len();
        let size = self.opts.img_size as usize;
        let mut imgs = Array4::<u8>::zeros((n, size, size, 3));
        let mut keypoints = Array2::<f32>::zeros((n, KEYPOINT_COUNT * KEYPOINT_FIELDS));
        let mut categories = Vec::with_capacity(n);

        for i in 0..n {
            let rel_path = char_field(images, i, "rel_path", &mat_path)?;
            let img_path = self.base_dir.join("images").join(&rel_path);
            let img = decode_rgb(&img_path)?;

            let mask = numeric_field(images, i, "mask", &mat_path)?;
            let masked = apply_mask(&img, mask, &mat_path)?;

            let bbox = images
                .field(i, "bbox")
                .and_then(|field| field.as_struct())
                .ok_or_else(|| layout(&mat_path, "element is missing its 'bbox' struct"))?;
            // Box coordinates are 1-based inclusive in the annotations.
            let region = Region::new(
                bbox_coord(bbox, "x1", &mat_path)? - 1,
                bbox_coord(bbox, "y1", &mat_path)? - 1,
                bbox_coord(bbox, "x2", &mat_path)? - 1,
                bbox_coord(bbox, "y2", &mat_path)? - 1,
            );

            let crop = square_crop_and_resize(&masked, &region, self.opts.img_size)?;
            copy_into(&mut imgs, i, &crop.image);

            let parts = numeric_field(images, i, "parts", &mat_path)?;
            if parts.dims() != [KEYPOINT_FIELDS, KEYPOINT_COUNT] {
                return Err(layout(
                    &mat_path,
                    format!(
                        "'parts' has dims {:?}, expected [{KEYPOINT_FIELDS}, {KEYPOINT_COUNT}]",
                        parts.dims()
                    ),
                ));
            }
            let mut row = keypoints.row_mut(i);
            for k in 0..KEYPOINT_COUNT {
                let x = parts.at2(0, k);
                let y = parts.at2(1, k);
                let visibility = parts.at2(2, k);
                if visibility > 0.0 {
                    // 1-based annotation coordinates.
                    let mapped = remap_keypoint(
                        Coord::new(x - 1.0, y - 1.0),
                        crop.origin,
                        crop.scale,
                        self.opts.img_size,
                    );
                    row[KEYPOINT_FIELDS * k] = mapped.x as f32;
                    row[KEYPOINT_FIELDS * k + 1] = mapped.y as f32;
                } else {
                    // Invisible keypoints keep their raw sentinel values;
                    // the visibility column gates their meaning.
                    row[KEYPOINT_FIELDS * k] = x as f32;
                    row[KEYPOINT_FIELDS * k + 1] = y as f32;
                }
                row[KEYPOINT_FIELDS * k + 2] = visibility as f32;
            }

            let category = rel_path
                .split('/')
                .next()
                .unwrap_or_default()
                .to_string();
            categories.push(category);
        }

        let record = Record {
            imgs,
            classes: dense_class_map(&categories),
            content: Some(Content::Vectors(keypoints)),
            attributes: None,
            landmarks: None,
        };
        record.validate()?;
        info!(
            samples = record.len(),
            split = %self.opts.split,
            "read cub dataset"
        );
        Ok(record)
    }
}

fn layout(path: &Path, message: impl Into<String>) -> UnisetError {
    UnisetError::Layout {
        path: path.to_path_buf(),
        message: message.into(),
    }
}

fn char_field(
    images: &StructArray,
    index: usize,
    name: &str,
    path: &Path,
) -> Result<String, UnisetError> {
    images
        .field(index, name)
        .and_then(|field| field.as_char())
        .map(|chars| chars.text().to_string())
        .ok_or_else(|| layout(path, format!("element {index} is missing char field '{name}'")))
}

fn numeric_field<'a>(
    images: &'a StructArray,
    index: usize,
    name: &str,
    path: &Path,
) -> Result<&'a NumericArray, UnisetError> {
    images
        .field(index, name)
        .and_then(|field| field.as_numeric())
        .ok_or_else(|| {
            layout(
                path,
                format!("element {index} is missing numeric field '{name}'"),
            )
        })
}

fn bbox_coord(bbox: &StructArray, name: &str, path: &Path) -> Result<i64, UnisetError> {
    bbox.field(0, name)
        .and_then(|field| field.as_numeric())
        .and_then(|field| field.scalar())
        .map(|value| value as i64)
        .ok_or_else(|| layout(path, format!("bbox is missing scalar '{name}'")))
}

/// Composites image × mask: pixels outside the mask go black. The mask is
/// stored column-major at the image's resolution.
fn apply_mask(
    img: &RgbImage,
    mask: &NumericArray,
    path: &Path,
) -> Result<RgbImage, UnisetError> {
    let (width, height) = img.dimensions();
    if mask.dims() != [height as usize, width as usize] {
        return Err(layout(
            path,
            format!(
                "mask dims {:?} do not match the {width}x{height} image",
                mask.dims()
            ),
        ));
    }
    let mut out = img.clone();
    for y in 0..height {
        for x in 0..width {
            if mask.at2(y as usize, x as usize) == 0.0 {
                out.put_pixel(x, y, Rgb([0, 0, 0]));
            }
        }
    }
    Ok(out)
}
