// Run with:  cargo bench --bench fill

mod common;

use common::NullBus;
use criterion::{criterion_group, criterion_main, Criterion};
use embedded_graphics::draw_target::DrawTarget;
use ht16k33_matrix::{BiColor, BinaryColor, Backpack16x8, Matrix8x8x2, PixelMatrix, DEFAULT_ADDRESS};
use std::hint::black_box;

fn fill(c: &mut Criterion) {
    let mut group = c.benchmark_group("fill");

    group.bench_function("backpack_16x8", |b| {
        let mut matrix = PixelMatrix::<Backpack16x8, _>::new(NullBus, DEFAULT_ADDRESS).unwrap();

        b.iter(|| {
            black_box(&mut matrix).fill(black_box(BinaryColor::On)).unwrap();
        });
    });

    group.bench_function("matrix_8x8x2", |b| {
        let mut matrix = PixelMatrix::<Matrix8x8x2, _>::new(NullBus, DEFAULT_ADDRESS).unwrap();

        b.iter(|| {
            black_box(&mut matrix).fill(black_box(BiColor::Green)).unwrap();
        });
    });

    group.bench_function("draw_target_clear", |b| {
        let mut matrix = PixelMatrix::<Backpack16x8, _>::new(NullBus, DEFAULT_ADDRESS).unwrap();

        b.iter(|| {
            black_box(&mut matrix).clear(black_box(BinaryColor::Off)).unwrap();
        });
    });

    group.finish();
}

criterion_group!(benches, fill);
criterion_main!(benches);
