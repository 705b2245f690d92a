// Run with:  cargo bench --bench set_pixel

mod common;

use common::NullBus;
use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use ht16k33_matrix::{
    BiColor, BinaryColor, FlushMode, Matrix16x8, Matrix8x8x2, PixelMatrix, DEFAULT_ADDRESS,
};
use std::hint::black_box;

fn set_pixel(c: &mut Criterion) {
    let mut group = c.benchmark_group("set_pixel");
    group.throughput(Throughput::Elements(16 * 8));

    group.bench_function("matrix_16x8_eager", |b| {
        let mut matrix = PixelMatrix::<Matrix16x8, _>::new(NullBus, DEFAULT_ADDRESS).unwrap();

        b.iter(|| {
            for y in 0..8 {
                for x in 0..16 {
                    black_box(&mut matrix)
                        .set_pixel(black_box(x), black_box(y), black_box(BinaryColor::On))
                        .unwrap();
                }
            }
        });
    });

    group.bench_function("matrix_16x8_deferred", |b| {
        let mut matrix = PixelMatrix::<Matrix16x8, _>::new(NullBus, DEFAULT_ADDRESS).unwrap();
        matrix.set_flush_mode(FlushMode::Deferred);

        b.iter(|| {
            for y in 0..8 {
                for x in 0..16 {
                    black_box(&mut matrix)
                        .set_pixel(black_box(x), black_box(y), black_box(BinaryColor::On))
                        .unwrap();
                }
            }
            matrix.show().unwrap();
        });
    });

    group.finish();

    let mut group = c.benchmark_group("set_pixel_bicolor");
    group.throughput(Throughput::Elements(8 * 8));

    group.bench_function("matrix_8x8x2_deferred", |b| {
        let mut matrix = PixelMatrix::<Matrix8x8x2, _>::new(NullBus, DEFAULT_ADDRESS).unwrap();
        matrix.set_flush_mode(FlushMode::Deferred);

        b.iter(|| {
            for y in 0..8 {
                for x in 0..8 {
                    black_box(&mut matrix)
                        .set_pixel(black_box(x), black_box(y), black_box(BiColor::Yellow))
                        .unwrap();
                }
            }
        });
    });

    group.finish();
}

criterion_group!(benches, set_pixel);
criterion_main!(benches);
