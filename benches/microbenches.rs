//! Criterion microbenches for the hot sampling-path primitives.
//!
//! Run with: `cargo bench`
//!
//! These benchmarks measure:
//! - box-against-window clipping over a synthetic scene
//! - label text rendering
//! - positive window placement

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use std::hint::black_box;

use cropset::geom::{label_lines, CropWindow, PixelBox};
use cropset::sample::{place_positive_window, SampleParams};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// A deterministic spread of boxes across a 4000x4000 scene.
fn scene_boxes() -> Vec<PixelBox> {
    (0..512)
        .map(|i| {
            let left = (i * 37) % 4000;
            let top = (i * 59) % 4000;
            PixelBox::new(left, top, left + 40 + (i % 80), top + 40 + (i % 60))
        })
        .collect()
}

fn bench_clip(c: &mut Criterion) {
    let boxes = scene_boxes();
    let window = CropWindow::new(1200, 1400, 640, 640);

    let mut group = c.benchmark_group("clip");
    group.throughput(Throughput::Elements(boxes.len() as u64));

    group.bench_function("clip_scene_boxes", |b| {
        b.iter(|| {
            let clipped: Vec<PixelBox> = black_box(&boxes)
                .iter()
                .filter_map(|bx| bx.clip_to(black_box(&window)))
                .collect();
            black_box(clipped)
        })
    });

    group.finish();
}

fn bench_label_lines(c: &mut Criterion) {
    let window = CropWindow::new(0, 0, 640, 640);
    let boxes: Vec<PixelBox> = scene_boxes()
        .iter()
        .filter_map(|bx| bx.clip_to(&window))
        .collect();

    let mut group = c.benchmark_group("labels");
    group.throughput(Throughput::Elements(boxes.len().max(1) as u64));

    group.bench_function("label_lines", |b| {
        b.iter(|| {
            let text = label_lines(black_box(&boxes), 640, 640);
            black_box(text)
        })
    });

    group.finish();
}

fn bench_place_positive_window(c: &mut Criterion) {
    let target = PixelBox::new(1800, 1700, 1950, 1880);
    let params = SampleParams {
        target_width: 640,
        target_height: 640,
        negative_attempts: 100,
    };

    c.bench_function("place_positive_window", |b| {
        let mut rng = StdRng::seed_from_u64(17);
        b.iter(|| {
            let window =
                place_positive_window(black_box(&target), 4000, 4000, &params, &mut rng)
                    .expect("target fits the crop");
            black_box(window)
        })
    });
}

criterion_group!(
    benches,
    bench_clip,
    bench_label_lines,
    bench_place_positive_window,
);
criterion_main!(benches);
