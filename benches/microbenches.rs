//! Criterion microbenches for uniset extraction primitives.
//!
//! Run with: `cargo bench`
//!
//! These benchmarks measure the performance of:
//! - square-crop derivation and resizing (the per-sample hot path)
//! - keypoint remapping into the canonical frame
//! - attribute rule classification

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use std::hint::black_box;

use image::RgbImage;
use uniset::attributes::{beard_glasses_rules, classify, Attributes, ATTRIBUTE_COUNT};
use uniset::geometry::{remap_keypoint, square_crop_and_resize, Coord, Region};

fn source_image(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    })
}

/// Benchmark the square crop over a typical source image.
fn bench_square_crop(c: &mut Criterion) {
    let img = source_image(500, 375);
    let region = Region::new(60, 40, 359, 239);

    let mut group = c.benchmark_group("square_crop");
    group.throughput(Throughput::Elements(1));

    group.bench_function("square_crop_and_resize_256", |b| {
        b.iter(|| {
            let crop =
                square_crop_and_resize(black_box(&img), black_box(&region), 256).unwrap();
            black_box(crop)
        })
    });

    group.finish();
}

/// Benchmark keypoint remapping over a full keypoint set.
fn bench_remap_keypoints(c: &mut Criterion) {
    let origin: Coord<uniset::geometry::Pixel> = Coord::new(60.0, 40.0);
    let points: Vec<Coord<uniset::geometry::Pixel>> = (0..15)
        .map(|i| Coord::new(100.0 + i as f64 * 3.0, 80.0 + i as f64 * 2.0))
        .collect();

    let mut group = c.benchmark_group("remap");
    group.throughput(Throughput::Elements(points.len() as u64));

    group.bench_function("remap_keypoint_x15", |b| {
        b.iter(|| {
            for point in &points {
                black_box(remap_keypoint(
                    black_box(*point),
                    origin,
                    256.0 / 300.0,
                    256,
                ));
            }
        })
    });

    group.finish();
}

/// Benchmark rule classification over a batch of attribute vectors.
fn bench_classify(c: &mut Criterion) {
    let rules = beard_glasses_rules();
    let vectors: Vec<Attributes> = (0..1000)
        .map(|i| {
            let mut row = [0u8; ATTRIBUTE_COUNT];
            row[i % ATTRIBUTE_COUNT] = 1;
            row[20] = (i % 2) as u8;
            Attributes::from_binary(row)
        })
        .collect();

    let mut group = c.benchmark_group("classify");
    group.throughput(Throughput::Elements(vectors.len() as u64));

    group.bench_function("beard_glasses_x1000", |b| {
        b.iter(|| {
            for attrs in &vectors {
                black_box(classify(black_box(&rules), attrs));
            }
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_square_crop,
    bench_remap_keypoints,
    bench_classify
);
criterion_main!(benches);
