//! Integration tests for the multi-view object reader.

use std::fs::File;
use std::path::Path;

use ndarray::Array4;
use ndarray_npy::NpzWriter;

use uniset::readers::cars3d::{Cars3dReader, AZIMUTHS, ELEVATIONS, OBJECTS};
use uniset::record::Content;
use uniset::UnisetError;

fn write_archive(base_dir: &Path, samples: usize) {
    let mut imgs = Array4::<u8>::zeros((samples, 2, 2, 3));
    for i in 0..samples {
        imgs[[i, 0, 0, 0]] = (i % 251) as u8;
    }
    let file = File::create(base_dir.join("cars3d.npz")).expect("create archive");
    let mut npz = NpzWriter::new(file);
    npz.add_array("imgs.npy", &imgs).expect("add imgs array");
    npz.finish().expect("finish archive");
}

#[test]
fn read_derives_classes_and_viewpoints_from_the_enumeration() {
    let temp = tempfile::tempdir().expect("create temp dir");
    write_archive(temp.path(), ELEVATIONS * AZIMUTHS * OBJECTS);

    let record = Cars3dReader::new(temp.path()).read().expect("read cars3d");
    assert_eq!(record.len(), ELEVATIONS * AZIMUTHS * OBJECTS);

    let Some(Content::Codes(contents)) = &record.content else {
        panic!("cars3d must produce viewpoint codes");
    };

    // Spot-check the full enumeration contract on every border and a few
    // interior points.
    for (elevation, azimuth, object_id) in [
        (0, 0, 0),
        (0, 0, OBJECTS - 1),
        (0, AZIMUTHS - 1, 0),
        (ELEVATIONS - 1, 0, 0),
        (ELEVATIONS - 1, AZIMUTHS - 1, OBJECTS - 1),
        (1, 2, 3),
        (2, 13, 100),
    ] {
        let idx = elevation * AZIMUTHS * OBJECTS + azimuth * OBJECTS + object_id;
        assert_eq!(record.classes[idx], object_id as i64, "class at {idx}");
        assert_eq!(
            contents[idx],
            (elevation * AZIMUTHS + azimuth) as i64,
            "content at {idx}"
        );
    }

    // Pixels pass through untouched.
    assert_eq!(record.imgs[[7, 0, 0, 0]], 7);
}

#[test]
fn read_is_idempotent() {
    let temp = tempfile::tempdir().expect("create temp dir");
    write_archive(temp.path(), ELEVATIONS * AZIMUTHS * OBJECTS);

    let reader = Cars3dReader::new(temp.path());
    let first = reader.read().expect("first read");
    let second = reader.read().expect("second read");
    assert_eq!(first, second);
}

#[test]
fn read_rejects_wrong_sample_count() {
    let temp = tempfile::tempdir().expect("create temp dir");
    write_archive(temp.path(), 100);

    let err = Cars3dReader::new(temp.path()).read().unwrap_err();
    match err {
        UnisetError::Layout { message, .. } => {
            assert!(message.contains("expected 17568"), "message: {message}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn read_reports_missing_archive() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let err = Cars3dReader::new(temp.path()).read().unwrap_err();
    assert!(matches!(err, UnisetError::Io(_)));
}
