// Not every test binary uses every helper.
#![allow(dead_code)]

use std::fs;
use std::path::Path;

use image::{Rgb, RgbImage};
use uniset::landmarks::{AlignmentCapability, Landmarks, LANDMARK_POINTS};

/// A deterministic test image: tint in the red channel, position in the
/// other two.
pub fn patterned_image(width: u32, height: u32, tint: u8) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([tint, (x % 251) as u8, (y % 251) as u8])
    })
}

pub fn write_png(path: &Path, img: &RgbImage) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    img.save(path).expect("write png fixture");
}

/// An aligner stub that returns the same candidate list for every image.
pub struct StubAligner {
    pub sets: Vec<Landmarks>,
}

impl AlignmentCapability for StubAligner {
    fn candidates(&self, _img: &RgbImage) -> Vec<Landmarks> {
        self.sets.clone()
    }
}

/// A full landmark set at predictable coordinates.
pub fn grid_landmarks(offset: f32) -> Landmarks {
    let points = (0..LANDMARK_POINTS)
        .map(|i| (offset + i as f32, offset + i as f32 / 2.0))
        .collect();
    Landmarks::new(points).expect("68 points")
}

/// Hand-built MAT5 fixtures, little-endian framing throughout.
pub mod mat {
    pub const MI_INT8: u32 = 1;
    pub const MI_UINT8: u32 = 2;
    pub const MI_UINT16: u32 = 4;
    pub const MI_INT32: u32 = 5;
    pub const MI_UINT32: u32 = 6;
    pub const MI_DOUBLE: u32 = 9;
    pub const MI_MATRIX: u32 = 14;

    pub const MX_STRUCT: u8 = 2;
    pub const MX_CHAR: u8 = 4;
    pub const MX_DOUBLE: u8 = 6;
    pub const MX_UINT8: u8 = 9;

    /// 128-byte header with the little-endian indicator.
    pub fn header() -> Vec<u8> {
        let mut bytes = vec![0u8; 128];
        let text = b"MATLAB 5.0 MAT-file, uniset test fixture";
        bytes[..text.len()].copy_from_slice(text);
        bytes[124] = 0x00;
        bytes[125] = 0x01;
        bytes[126] = b'I';
        bytes[127] = b'M';
        bytes
    }

    /// A normal data element, padded to the 8-byte boundary.
    pub fn element(ty: u32, data: &[u8]) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&ty.to_le_bytes());
        bytes.extend_from_slice(&(data.len() as u32).to_le_bytes());
        bytes.extend_from_slice(data);
        while bytes.len() % 8 != 0 {
            bytes.push(0);
        }
        bytes
    }

    fn matrix_payload(class: u8, dims: &[i32], name: &str, body: &[u8]) -> Vec<u8> {
        let mut flags_data = Vec::new();
        flags_data.extend_from_slice(&u32::from(class).to_le_bytes());
        flags_data.extend_from_slice(&0u32.to_le_bytes());

        let dims_data: Vec<u8> = dims.iter().flat_map(|d| d.to_le_bytes()).collect();

        let mut payload = Vec::new();
        payload.extend_from_slice(&element(MI_UINT32, &flags_data));
        payload.extend_from_slice(&element(MI_INT32, &dims_data));
        payload.extend_from_slice(&element(MI_INT8, name.as_bytes()));
        payload.extend_from_slice(body);
        payload
    }

    /// A double-class matrix element, values in column-major order.
    pub fn double_matrix(dims: &[i32], name: &str, values: &[f64]) -> Vec<u8> {
        let data: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        let body = element(MI_DOUBLE, &data);
        element(MI_MATRIX, &matrix_payload(MX_DOUBLE, dims, name, &body))
    }

    /// A uint8-class matrix element, values in column-major order.
    pub fn u8_matrix(dims: &[i32], name: &str, values: &[u8]) -> Vec<u8> {
        let body = element(MI_UINT8, values);
        element(MI_MATRIX, &matrix_payload(MX_UINT8, dims, name, &body))
    }

    /// A 1×len char matrix element (UTF-16 storage).
    pub fn char_matrix(name: &str, text: &str) -> Vec<u8> {
        let data: Vec<u8> = text.encode_utf16().flat_map(|u| u.to_le_bytes()).collect();
        let body = element(MI_UINT16, &data);
        element(
            MI_MATRIX,
            &matrix_payload(MX_CHAR, &[1, text.encode_utf16().count() as i32], name, &body),
        )
    }

    /// A struct matrix element. `elements` is one field-matrix list per
    /// struct element (column-major), each list in `fields` order.
    pub fn struct_matrix(
        dims: &[i32],
        name: &str,
        fields: &[&str],
        elements: &[Vec<Vec<u8>>],
    ) -> Vec<u8> {
        let field_len = 32usize;
        let mut names_table = Vec::new();
        for field in fields {
            let mut padded = vec![0u8; field_len];
            padded[..field.len()].copy_from_slice(field.as_bytes());
            names_table.extend_from_slice(&padded);
        }

        let mut body = Vec::new();
        body.extend_from_slice(&element(MI_INT32, &(field_len as i32).to_le_bytes()));
        body.extend_from_slice(&element(MI_INT8, &names_table));
        for fields_of_element in elements {
            for field_matrix in fields_of_element {
                body.extend_from_slice(field_matrix);
            }
        }
        element(MI_MATRIX, &matrix_payload(MX_STRUCT, dims, name, &body))
    }

    /// A complete MAT file from top-level matrix elements.
    pub fn file(vars: &[Vec<u8>]) -> Vec<u8> {
        let mut bytes = header();
        for var in vars {
            bytes.extend_from_slice(var);
        }
        bytes
    }
}
