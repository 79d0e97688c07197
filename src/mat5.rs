//! Minimal reader for Level 5 MAT containers.
//!
//! The bird-part annotations ship as MATLAB v5 struct-of-arrays files, so
//! this module decodes exactly the subset that layout needs: numeric
//! arrays (any storage type), character arrays, and struct arrays, with
//! zlib-compressed top-level elements. Sparse, cell, and object classes are
//! rejected with a parse error. There is no writer.
//!
//! # Format Reference
//!
//! A v5 file is a 128-byte header followed by data elements. Each element
//! carries an 8-byte tag (`u32` type, `u32` byte count) and is padded to an
//! 8-byte boundary; elements of four bytes or fewer use the packed
//! small-element tag (type in the low half-word, size in the high one).
//! Matrices are `miMATRIX` elements whose payload is itself a sequence of
//! sub-elements: array flags, dimensions, name, then class-specific data.
//! Struct arrays store a field-name table followed by one `miMATRIX` per
//! field per element, elements in column-major order.
//!
//! All numeric data is column-major, and this module keeps it that way;
//! [`NumericArray::at2`] does the index arithmetic.

use std::io::Read;
use std::path::{Path, PathBuf};

use flate2::read::ZlibDecoder;

use crate::error::UnisetError;

const MI_INT8: u32 = 1;
const MI_UINT8: u32 = 2;
const MI_INT16: u32 = 3;
const MI_UINT16: u32 = 4;
const MI_INT32: u32 = 5;
const MI_UINT32: u32 = 6;
const MI_SINGLE: u32 = 7;
const MI_DOUBLE: u32 = 9;
const MI_INT64: u32 = 12;
const MI_UINT64: u32 = 13;
const MI_MATRIX: u32 = 14;
const MI_COMPRESSED: u32 = 15;
const MI_UTF8: u32 = 16;

const MX_STRUCT: u8 = 2;
const MX_CHAR: u8 = 4;
const MX_DOUBLE: u8 = 6;
const MX_UINT32: u8 = 13;

/// A parsed MAT container: top-level variables by name.
#[derive(Debug)]
pub struct MatFile {
    vars: Vec<(String, MatArray)>,
}

impl MatFile {
    /// Reads and parses a MAT file from disk.
    pub fn open(path: &Path) -> Result<Self, UnisetError> {
        let bytes = std::fs::read(path)?;
        Self::parse(&bytes, path)
    }

    /// Parses an in-memory MAT container. `path` is used for error context
    /// only.
    pub fn parse(bytes: &[u8], path: &Path) -> Result<Self, UnisetError> {
        if bytes.len() < 128 {
            return Err(parse_err(path, "file shorter than the 128-byte header"));
        }
        match &bytes[126..128] {
            b"IM" => {}
            b"MI" => {
                return Err(parse_err(path, "big-endian MAT files are not supported"));
            }
            _ => return Err(parse_err(path, "missing endian indicator")),
        }

        let mut cursor = Cursor::new(&bytes[128..], path);
        let mut vars = Vec::new();

        while !cursor.is_done() {
            let (ty, data) = cursor.read_element()?;
            match ty {
                MI_MATRIX => {
                    let (name, array) = parse_matrix(data, path, 0)?;
                    vars.push((name, array));
                }
                MI_COMPRESSED => {
                    let mut inflated = Vec::new();
                    ZlibDecoder::new(data)
                        .read_to_end(&mut inflated)
                        .map_err(|e| parse_err(path, format!("zlib inflate failed: {e}")))?;
                    let mut inner = Cursor::new(&inflated, path);
                    let (inner_ty, inner_data) = inner.read_element()?;
                    if inner_ty != MI_MATRIX {
                        return Err(parse_err(
                            path,
                            format!("compressed element holds type {inner_ty}, expected miMATRIX"),
                        ));
                    }
                    let (name, array) = parse_matrix(inner_data, path, 0)?;
                    vars.push((name, array));
                }
                other => {
                    return Err(parse_err(
                        path,
                        format!("unexpected top-level element type {other}"),
                    ));
                }
            }
        }

        Ok(Self { vars })
    }

    /// Looks up a top-level variable by name.
    pub fn var(&self, name: &str) -> Option<&MatArray> {
        self.vars
            .iter()
            .find(|(var_name, _)| var_name == name)
            .map(|(_, array)| array)
    }

    /// Names of all top-level variables, in file order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.vars.iter().map(|(name, _)| name.as_str())
    }
}

/// One MATLAB array.
#[derive(Debug)]
pub enum MatArray {
    Numeric(NumericArray),
    Char(CharArray),
    Struct(StructArray),
}

impl MatArray {
    pub fn as_numeric(&self) -> Option<&NumericArray> {
        match self {
            MatArray::Numeric(array) => Some(array),
            _ => None,
        }
    }

    pub fn as_char(&self) -> Option<&CharArray> {
        match self {
            MatArray::Char(array) => Some(array),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&StructArray> {
        match self {
            MatArray::Struct(array) => Some(array),
            _ => None,
        }
    }
}

/// Numeric array storage. Byte-wide data stays as bytes (masks are the
/// common case); everything else is promoted to f64.
#[derive(Debug)]
pub enum NumericData {
    U8(Vec<u8>),
    F64(Vec<f64>),
}

/// A numeric array with its MATLAB dims, data in column-major order.
#[derive(Debug)]
pub struct NumericArray {
    dims: Vec<usize>,
    data: NumericData,
}

impl NumericArray {
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    pub fn len(&self) -> usize {
        match &self.data {
            NumericData::U8(values) => values.len(),
            NumericData::F64(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value at a linear (column-major) index.
    pub fn get(&self, index: usize) -> f64 {
        match &self.data {
            NumericData::U8(values) => f64::from(values[index]),
            NumericData::F64(values) => values[index],
        }
    }

    /// Value at `(row, col)` of a 2-D array.
    pub fn at2(&self, row: usize, col: usize) -> f64 {
        let rows = self.dims.first().copied().unwrap_or(0);
        self.get(row + col * rows)
    }

    /// The single value of a 1×1 array, if that is what this is.
    pub fn scalar(&self) -> Option<f64> {
        if self.len() == 1 {
            Some(self.get(0))
        } else {
            None
        }
    }
}

/// A character array decoded to text. Multi-row char matrices are decoded
/// in storage order; the annotation layouts only use single-row strings.
#[derive(Debug)]
pub struct CharArray {
    dims: Vec<usize>,
    text: String,
}

impl CharArray {
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// A struct array: shared field table, one field list per element,
/// elements in column-major order.
#[derive(Debug)]
pub struct StructArray {
    dims: Vec<usize>,
    fields: Vec<String>,
    elements: Vec<Vec<MatArray>>,
}

impl StructArray {
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Number of elements in the array.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Field `name` of element `index`.
    pub fn field(&self, index: usize, name: &str) -> Option<&MatArray> {
        let slot = self.fields.iter().position(|field| field == name)?;
        self.elements.get(index)?.get(slot)
    }
}

fn total_len(dims: &[usize], path: &Path) -> Result<usize, UnisetError> {
    dims.iter()
        .try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
        .ok_or_else(|| parse_err(path, format!("dimension product overflows: {dims:?}")))
}

fn parse_err(path: &Path, message: impl Into<String>) -> UnisetError {
    UnisetError::MatParse {
        path: PathBuf::from(path),
        message: message.into(),
    }
}

/// Byte cursor over one element stream, tracking 8-byte alignment.
struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
    path: &'a Path,
}

impl<'a> Cursor<'a> {
    fn new(bytes: &'a [u8], path: &'a Path) -> Self {
        Self {
            bytes,
            pos: 0,
            path,
        }
    }

    fn is_done(&self) -> bool {
        // A trailing fragment shorter than a tag is padding.
        self.pos + 8 > self.bytes.len()
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], UnisetError> {
        if self.pos + n > self.bytes.len() {
            return Err(parse_err(
                self.path,
                format!(
                    "element overruns buffer (want {n} bytes at offset {}, have {})",
                    self.pos,
                    self.bytes.len() - self.pos
                ),
            ));
        }
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn u32(&mut self) -> Result<u32, UnisetError> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Reads one data element, handling the small-element tag and trailing
    /// padding. Returns the element type and its payload.
    fn read_element(&mut self) -> Result<(u32, &'a [u8]), UnisetError> {
        let tag = self.u32()?;
        if tag & 0xFFFF_0000 != 0 {
            // Small data element: size in the high half-word, payload packed
            // into the remaining 4 tag bytes.
            let ty = tag & 0xFFFF;
            let size = (tag >> 16) as usize;
            if size > 4 {
                return Err(parse_err(
                    self.path,
                    format!("small element claims {size} bytes"),
                ));
            }
            let data = self.take(4)?;
            return Ok((ty, &data[..size]));
        }

        let size = self.u32()? as usize;
        let data = self.take(size)?;
        let pad = (8 - size % 8) % 8;
        self.pos = (self.pos + pad).min(self.bytes.len());
        Ok((tag, data))
    }
}

/// Nesting bound for struct-in-struct payloads.
const MAX_DEPTH: usize = 32;

/// Parses one miMATRIX payload into a named array.
fn parse_matrix(data: &[u8], path: &Path, depth: usize) -> Result<(String, MatArray), UnisetError> {
    if depth > MAX_DEPTH {
        return Err(parse_err(path, "matrix nesting exceeds the supported depth"));
    }
    if data.is_empty() {
        // An empty miMATRIX element is MATLAB's empty array.
        return Ok((
            String::new(),
            MatArray::Numeric(NumericArray {
                dims: vec![0, 0],
                data: NumericData::F64(Vec::new()),
            }),
        ));
    }

    let mut cursor = Cursor::new(data, path);

    let (flags_ty, flags_data) = cursor.read_element()?;
    if flags_ty != MI_UINT32 || flags_data.len() < 4 {
        return Err(parse_err(path, "matrix is missing its array-flags element"));
    }
    let flags = u32::from_le_bytes([flags_data[0], flags_data[1], flags_data[2], flags_data[3]]);
    let class = (flags & 0xFF) as u8;

    let (dims_ty, dims_data) = cursor.read_element()?;
    if dims_ty != MI_INT32 {
        return Err(parse_err(path, "matrix is missing its dimensions element"));
    }
    let mut dims = Vec::new();
    for chunk in dims_data.chunks_exact(4) {
        let dim = i32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        if dim < 0 {
            return Err(parse_err(path, format!("negative dimension {dim}")));
        }
        dims.push(dim as usize);
    }

    let (name_ty, name_data) = cursor.read_element()?;
    if name_ty != MI_INT8 {
        return Err(parse_err(path, "matrix is missing its name element"));
    }
    let name = String::from_utf8_lossy(name_data)
        .trim_end_matches('\0')
        .to_string();

    let array = match class {
        MX_STRUCT => MatArray::Struct(parse_struct(&mut cursor, &dims, path, depth)?),
        MX_CHAR => MatArray::Char(parse_char(&mut cursor, &dims, path)?),
        class if (MX_DOUBLE..=MX_UINT32).contains(&class) => {
            MatArray::Numeric(parse_numeric(&mut cursor, &dims, path)?)
        }
        other => {
            return Err(parse_err(
                path,
                format!("unsupported array class {other} for '{name}'"),
            ));
        }
    };

    Ok((name, array))
}

fn parse_struct(
    cursor: &mut Cursor<'_>,
    dims: &[usize],
    path: &Path,
    depth: usize,
) -> Result<StructArray, UnisetError> {
    let (len_ty, len_data) = cursor.read_element()?;
    if len_ty != MI_INT32 || len_data.len() < 4 {
        return Err(parse_err(path, "struct is missing its field-name length"));
    }
    let field_len =
        i32::from_le_bytes([len_data[0], len_data[1], len_data[2], len_data[3]]) as usize;
    if field_len == 0 {
        return Err(parse_err(path, "struct declares zero-width field names"));
    }

    let (names_ty, names_data) = cursor.read_element()?;
    if names_ty != MI_INT8 {
        return Err(parse_err(path, "struct is missing its field-name table"));
    }
    let fields: Vec<String> = names_data
        .chunks(field_len)
        .map(|chunk| {
            String::from_utf8_lossy(chunk)
                .trim_end_matches('\0')
                .to_string()
        })
        .collect();

    let total = total_len(dims, path)?;
    let mut elements = Vec::with_capacity(total.min(1024));
    for _ in 0..total {
        let mut one = Vec::with_capacity(fields.len());
        for field in &fields {
            let (field_ty, field_data) = cursor.read_element()?;
            if field_ty != MI_MATRIX {
                return Err(parse_err(
                    path,
                    format!("struct field '{field}' holds element type {field_ty}"),
                ));
            }
            let (_, array) = parse_matrix(field_data, path, depth + 1)?;
            one.push(array);
        }
        elements.push(one);
    }

    Ok(StructArray {
        dims: dims.to_vec(),
        fields,
        elements,
    })
}

fn parse_char(
    cursor: &mut Cursor<'_>,
    dims: &[usize],
    path: &Path,
) -> Result<CharArray, UnisetError> {
    let (data_ty, data) = cursor.read_element()?;
    let text = match data_ty {
        MI_UINT16 => data
            .chunks_exact(2)
            .map(|chunk| u16::from_le_bytes([chunk[0], chunk[1]]))
            .map(|code| char::from_u32(u32::from(code)).unwrap_or('\u{fffd}'))
            .collect(),
        MI_UINT8 | MI_UTF8 => String::from_utf8_lossy(data).to_string(),
        other => {
            return Err(parse_err(
                path,
                format!("char array stored as element type {other}"),
            ));
        }
    };
    Ok(CharArray {
        dims: dims.to_vec(),
        text,
    })
}

fn parse_numeric(
    cursor: &mut Cursor<'_>,
    dims: &[usize],
    path: &Path,
) -> Result<NumericArray, UnisetError> {
    let (data_ty, data) = cursor.read_element()?;

    // The storage type may be narrower than the array class; decode by the
    // storage type and promote.
    let parsed = match data_ty {
        MI_UINT8 => NumericData::U8(data.to_vec()),
        MI_INT8 => NumericData::F64(data.iter().map(|&b| f64::from(b as i8)).collect()),
        MI_INT16 => NumericData::F64(
            data.chunks_exact(2)
                .map(|c| f64::from(i16::from_le_bytes([c[0], c[1]])))
                .collect(),
        ),
        MI_UINT16 => NumericData::F64(
            data.chunks_exact(2)
                .map(|c| f64::from(u16::from_le_bytes([c[0], c[1]])))
                .collect(),
        ),
        MI_INT32 => NumericData::F64(
            data.chunks_exact(4)
                .map(|c| f64::from(i32::from_le_bytes([c[0], c[1], c[2], c[3]])))
                .collect(),
        ),
        MI_UINT32 => NumericData::F64(
            data.chunks_exact(4)
                .map(|c| f64::from(u32::from_le_bytes([c[0], c[1], c[2], c[3]])))
                .collect(),
        ),
        MI_SINGLE => NumericData::F64(
            data.chunks_exact(4)
                .map(|c| f64::from(f32::from_le_bytes([c[0], c[1], c[2], c[3]])))
                .collect(),
        ),
        MI_DOUBLE => NumericData::F64(
            data.chunks_exact(8)
                .map(|c| f64::from_le_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]))
                .collect(),
        ),
        MI_INT64 => NumericData::F64(
            data.chunks_exact(8)
                .map(|c| {
                    i64::from_le_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]) as f64
                })
                .collect(),
        ),
        MI_UINT64 => NumericData::F64(
            data.chunks_exact(8)
                .map(|c| {
                    u64::from_le_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]) as f64
                })
                .collect(),
        ),
        other => {
            return Err(parse_err(
                path,
                format!("numeric array stored as element type {other}"),
            ));
        }
    };

    let count = match &parsed {
        NumericData::U8(values) => values.len(),
        NumericData::F64(values) => values.len(),
    };
    let expected = total_len(dims, path)?;
    if count != expected {
        return Err(parse_err(
            path,
            format!("numeric array holds {count} values but dims {dims:?} expect {expected}"),
        ));
    }

    Ok(NumericArray {
        dims: dims.to_vec(),
        data: parsed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    // Fixture builders: write the v5 framing by hand, the same way the raw
    // files lay it out.

    fn header() -> Vec<u8> {
        let mut bytes = vec![0u8; 128];
        let text = b"MATLAB 5.0 MAT-file, test fixture";
        bytes[..text.len()].copy_from_slice(text);
        bytes[124] = 0x00;
        bytes[125] = 0x01;
        bytes[126] = b'I';
        bytes[127] = b'M';
        bytes
    }

    fn element(ty: u32, data: &[u8]) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&ty.to_le_bytes());
        bytes.extend_from_slice(&(data.len() as u32).to_le_bytes());
        bytes.extend_from_slice(data);
        while bytes.len() % 8 != 0 {
            bytes.push(0);
        }
        bytes
    }

    fn small_element(ty: u32, data: &[u8]) -> Vec<u8> {
        assert!(data.len() <= 4);
        let tag = ty | ((data.len() as u32) << 16);
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&tag.to_le_bytes());
        let mut payload = [0u8; 4];
        payload[..data.len()].copy_from_slice(data);
        bytes.extend_from_slice(&payload);
        bytes
    }

    fn matrix_payload(class: u8, dims: &[i32], name: &str, body: &[u8]) -> Vec<u8> {
        let mut payload = Vec::new();
        let flags = u32::from(class);
        let mut flags_data = Vec::new();
        flags_data.extend_from_slice(&flags.to_le_bytes());
        flags_data.extend_from_slice(&0u32.to_le_bytes());
        payload.extend_from_slice(&element(MI_UINT32, &flags_data));

        let dims_data: Vec<u8> = dims.iter().flat_map(|d| d.to_le_bytes()).collect();
        payload.extend_from_slice(&element(MI_INT32, &dims_data));
        payload.extend_from_slice(&element(MI_INT8, name.as_bytes()));
        payload.extend_from_slice(body);
        payload
    }

    fn doubles(values: &[f64]) -> Vec<u8> {
        let data: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        element(MI_DOUBLE, &data)
    }

    fn double_matrix(dims: &[i32], name: &str, values: &[f64]) -> Vec<u8> {
        element(
            MI_MATRIX,
            &matrix_payload(MX_DOUBLE, dims, name, &doubles(values)),
        )
    }

    #[test]
    fn test_parse_double_matrix() {
        let mut bytes = header();
        bytes.extend_from_slice(&double_matrix(&[2, 2], "m", &[1.0, 2.0, 3.0, 4.0]));

        let mat = MatFile::parse(&bytes, Path::new("fixture.mat")).expect("parse fixture");
        let array = mat.var("m").expect("variable m").as_numeric().unwrap();
        assert_eq!(array.dims(), &[2, 2]);
        // Column-major: (row 1, col 0) is the second stored value.
        assert_eq!(array.at2(1, 0), 2.0);
        assert_eq!(array.at2(0, 1), 3.0);
    }

    #[test]
    fn test_parse_small_element_name() {
        let mut bytes = header();
        let mut flags_data = Vec::new();
        flags_data.extend_from_slice(&u32::from(MX_DOUBLE).to_le_bytes());
        flags_data.extend_from_slice(&0u32.to_le_bytes());
        let mut dims_data = Vec::new();
        dims_data.extend_from_slice(&1i32.to_le_bytes());
        dims_data.extend_from_slice(&1i32.to_le_bytes());
        let mut payload = Vec::new();
        payload.extend_from_slice(&element(MI_UINT32, &flags_data));
        payload.extend_from_slice(&element(MI_INT32, &dims_data));
        payload.extend_from_slice(&small_element(MI_INT8, b"x"));
        payload.extend_from_slice(&doubles(&[42.0]));
        bytes.extend_from_slice(&element(MI_MATRIX, &payload));

        let mat = MatFile::parse(&bytes, Path::new("fixture.mat")).expect("parse fixture");
        let array = mat.var("x").expect("variable x").as_numeric().unwrap();
        assert_eq!(array.scalar(), Some(42.0));
    }

    #[test]
    fn test_parse_char_array() {
        let mut bytes = header();
        let text: Vec<u8> = "abc/def.jpg"
            .encode_utf16()
            .flat_map(|u| u.to_le_bytes())
            .collect();
        let body = element(MI_UINT16, &text);
        bytes.extend_from_slice(&element(
            MI_MATRIX,
            &matrix_payload(MX_CHAR, &[1, 11], "p", &body),
        ));

        let mat = MatFile::parse(&bytes, Path::new("fixture.mat")).expect("parse fixture");
        let array = mat.var("p").expect("variable p").as_char().unwrap();
        assert_eq!(array.text(), "abc/def.jpg");
    }

    #[test]
    fn test_parse_struct_array() {
        // A 1x2 struct with fields a (scalar) and b (1x2 row).
        let mut body = Vec::new();
        body.extend_from_slice(&small_element(MI_INT32, &4i32.to_le_bytes()));
        body.extend_from_slice(&element(MI_INT8, b"a\0\0\0b\0\0\0"));
        body.extend_from_slice(&double_matrix(&[1, 1], "", &[1.0]));
        body.extend_from_slice(&double_matrix(&[1, 2], "", &[2.0, 3.0]));
        body.extend_from_slice(&double_matrix(&[1, 1], "", &[4.0]));
        body.extend_from_slice(&double_matrix(&[1, 2], "", &[5.0, 6.0]));

        let mut bytes = header();
        bytes.extend_from_slice(&element(
            MI_MATRIX,
            &matrix_payload(MX_STRUCT, &[1, 2], "s", &body),
        ));

        let mat = MatFile::parse(&bytes, Path::new("fixture.mat")).expect("parse fixture");
        let array = mat.var("s").expect("variable s").as_struct().unwrap();
        assert_eq!(array.len(), 2);
        assert_eq!(array.fields(), &["a".to_string(), "b".to_string()]);
        assert_eq!(
            array.field(0, "a").unwrap().as_numeric().unwrap().scalar(),
            Some(1.0)
        );
        assert_eq!(
            array.field(1, "b").unwrap().as_numeric().unwrap().at2(0, 1),
            6.0
        );
        assert!(array.field(0, "missing").is_none());
    }

    #[test]
    fn test_parse_compressed_element() {
        use flate2::write::ZlibEncoder;
        use flate2::Compression;
        use std::io::Write;

        let matrix = double_matrix(&[1, 3], "z", &[7.0, 8.0, 9.0]);
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&matrix).expect("compress fixture");
        let compressed = encoder.finish().expect("finish compression");

        let mut bytes = header();
        bytes.extend_from_slice(&element(MI_COMPRESSED, &compressed));

        let mat = MatFile::parse(&bytes, Path::new("fixture.mat")).expect("parse fixture");
        let array = mat.var("z").expect("variable z").as_numeric().unwrap();
        assert_eq!(array.len(), 3);
        assert_eq!(array.get(2), 9.0);
    }

    #[test]
    fn test_narrow_storage_is_promoted() {
        // A double-class array stored as uint16 values.
        let data: Vec<u8> = [300u16, 400]
            .iter()
            .flat_map(|v| v.to_le_bytes())
            .collect();
        let body = element(MI_UINT16, &data);
        let mut bytes = header();
        bytes.extend_from_slice(&element(
            MI_MATRIX,
            &matrix_payload(MX_DOUBLE, &[1, 2], "n", &body),
        ));

        let mat = MatFile::parse(&bytes, Path::new("fixture.mat")).expect("parse fixture");
        let array = mat.var("n").expect("variable n").as_numeric().unwrap();
        assert_eq!(array.get(0), 300.0);
        assert_eq!(array.get(1), 400.0);
    }

    #[test]
    fn test_truncated_file_is_rejected() {
        let err = MatFile::parse(&[0u8; 64], Path::new("short.mat")).unwrap_err();
        assert!(matches!(err, UnisetError::MatParse { .. }));
    }

    #[test]
    fn test_unsupported_class_is_rejected() {
        // Class 5 is sparse, which this reader does not handle.
        let body = doubles(&[0.0]);
        let mut bytes = header();
        bytes.extend_from_slice(&element(MI_MATRIX, &matrix_payload(5, &[1, 1], "sp", &body)));

        let err = MatFile::parse(&bytes, Path::new("sparse.mat")).unwrap_err();
        match err {
            UnisetError::MatParse { message, .. } => {
                assert!(message.contains("unsupported array class"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
