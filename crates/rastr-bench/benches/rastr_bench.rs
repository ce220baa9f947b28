//! Benchmarks for rastr operations.
//!
//! Run with: `cargo bench`

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

use rastr_core::{BlendMode, LayerImage, NormalizeOptions, Rgb8, RgbaImage, to_rgba};
use rastr_io::gb7::{self, EncodeOptions};
use rastr_lut::{AlphaMode, ChannelLuts, GB7_MAX, HistogramOptions, apply_curves, apply_curves_gb7, build_lut, calc_histogram};
use rastr_ops::filter::{Kernel3x3, convolve_rgb_3x3};
use rastr_ops::render::{RenderOptions, render};
use rastr_ops::resize::{bilinear, nearest_neighbor};

const SIZES: [u32; 3] = [64, 256, 1024];

fn test_image(size: u32) -> RgbaImage {
    let data: Vec<u8> = (0..size * size)
        .flat_map(|i| {
            let v = (i % 251) as u8;
            [v, v.wrapping_mul(3), v.wrapping_add(90), if i % 7 == 0 { 0 } else { 255 }]
        })
        .collect();
    RgbaImage::from_raw(size, size, data).unwrap()
}

fn test_gb7(size: u32) -> LayerImage {
    let packed: Vec<u8> = (0..size * size).map(|i| (i % 256) as u8).collect();
    LayerImage::gb7(size, size, packed, true).unwrap()
}

/// GB7 encode/decode.
fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("gb7");

    for size in SIZES {
        let layer = test_gb7(size);
        let bytes = gb7::encode(&layer, EncodeOptions::default()).unwrap();
        let raster = test_image(size).into_layer().unwrap();
        group.throughput(Throughput::Elements((size * size) as u64));

        group.bench_with_input(BenchmarkId::new("decode", size), &bytes, |b, bytes| {
            b.iter(|| gb7::decode(black_box(bytes)).unwrap())
        });

        group.bench_with_input(BenchmarkId::new("encode_raster", size), &raster, |b, layer| {
            b.iter(|| gb7::encode(black_box(layer), EncodeOptions::default()).unwrap())
        });

        group.bench_with_input(BenchmarkId::new("to_rgba", size), &layer, |b, layer| {
            b.iter(|| to_rgba(black_box(layer), NormalizeOptions::default()))
        });
    }

    group.finish();
}

/// Curves and histograms.
fn bench_curves(c: &mut Criterion) {
    let mut group = c.benchmark_group("curves");
    let luts = ChannelLuts::rgb(build_lut(30.0, 10.0, 220.0, 250.0, 255));
    let y_lut = build_lut(0.0, 20.0, 100.0, 127.0, GB7_MAX);

    for size in SIZES {
        let img = test_image(size);
        let gb7 = test_gb7(size);
        let packed = gb7::packed_pixels(&gb7).unwrap().to_vec();
        group.throughput(Throughput::Elements((size * size) as u64));

        group.bench_with_input(BenchmarkId::new("apply_curves", size), &img, |b, img| {
            b.iter(|| apply_curves(black_box(img), &luts))
        });

        group.bench_with_input(BenchmarkId::new("apply_curves_gb7", size), &packed, |b, packed| {
            b.iter(|| apply_curves_gb7(black_box(packed), Some(&y_lut), AlphaMode::threshold(64)))
        });

        group.bench_with_input(BenchmarkId::new("histogram", size), &img, |b, img| {
            b.iter(|| calc_histogram(black_box(img), HistogramOptions::default()))
        });
    }

    group.finish();
}

/// 3x3 convolution.
fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter");

    for size in SIZES {
        let img = test_image(size);
        group.throughput(Throughput::Elements((size * size) as u64));

        group.bench_with_input(BenchmarkId::new("sharpen", size), &img, |b, img| {
            b.iter(|| convolve_rgb_3x3(black_box(img), &Kernel3x3::sharpen()))
        });

        group.bench_with_input(BenchmarkId::new("gaussian", size), &img, |b, img| {
            b.iter(|| convolve_rgb_3x3(black_box(img), &Kernel3x3::gaussian()))
        });
    }

    group.finish();
}

/// Resampling at 2x.
fn bench_resize(c: &mut Criterion) {
    let mut group = c.benchmark_group("resize");

    for size in SIZES {
        let img = test_image(size);
        group.throughput(Throughput::Elements((size * size * 4) as u64));

        group.bench_with_input(BenchmarkId::new("nearest_2x", size), &img, |b, img| {
            b.iter(|| nearest_neighbor(black_box(img), size * 2, size * 2).unwrap())
        });

        group.bench_with_input(BenchmarkId::new("bilinear_2x", size), &img, |b, img| {
            b.iter(|| bilinear(black_box(img), size * 2, size * 2).unwrap())
        });
    }

    group.finish();
}

/// Two-layer render.
fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");

    for size in SIZES {
        let layers = vec![
            LayerImage::flat(size, size, Rgb8::new(200, 180, 160)).unwrap(),
            test_gb7(size / 2).with_blend_mode(BlendMode::Multiply).with_opacity(0.8),
        ];
        let opts = RenderOptions {
            content_scale: 1.5,
            ..RenderOptions::default()
        };
        group.throughput(Throughput::Elements((size * size) as u64));

        group.bench_with_input(BenchmarkId::new("two_layers", size), &layers, |b, layers| {
            b.iter(|| render(black_box(layers), &opts).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_codec, bench_curves, bench_filter, bench_resize, bench_render);
criterion_main!(benches);
