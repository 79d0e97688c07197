use std::path::PathBuf;
use thiserror::Error;

/// The main error type for uniset operations.
#[derive(Debug, Error)]
pub enum UnisetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown dataset: '{0}'")]
    UnknownDataset(String),

    #[error("Invalid region ({x1},{y1})-({x2},{y2}): expected x1 < x2 and y1 < y2 inside the image")]
    InvalidRegion { x1: i64, y1: i64, x2: i64, y2: i64 },

    #[error("Missing annotation for '{key}' in {path}")]
    MissingAnnotation { key: String, path: PathBuf },

    #[error("Malformed layout in {path}: {message}")]
    Layout { path: PathBuf, message: String },

    #[error("Failed to decode image {path}: {source}")]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to read array archive {path}: {source}")]
    NpzRead {
        path: PathBuf,
        #[source]
        source: ndarray_npy::ReadNpzError,
    },

    #[error("Failed to write array archive {path}: {source}")]
    NpzWrite {
        path: PathBuf,
        #[source]
        source: ndarray_npy::WriteNpzError,
    },

    #[error("Failed to parse MAT file {path}: {message}")]
    MatParse { path: PathBuf, message: String },

    #[error("Vehicle stack for '{category}' is malformed: {message}")]
    VehicleStack { category: String, message: String },

    #[error("Invalid option: {0}")]
    InvalidOption(String),

    #[error("Record sequences are misaligned: {message}")]
    RecordMisaligned { message: String },
}
