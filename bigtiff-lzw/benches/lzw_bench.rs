//! Decompression benchmarks for bigtiff-lzw
//!
//! This benchmark suite evaluates:
//! - Decompression throughput across tile sizes and data patterns
//! - Cost of predictor reversal
//! - Comparison with weezl on the same TIFF streams

use bigtiff_lzw::{
    DecodeOptions, LzwConfig, LzwDecoder, OutputLimit, PredictorParams,
    apply_horizontal_differencing, decompress, decompress_tiff, reverse_predictor,
};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

#[path = "../tests/common/mod.rs"]
mod common;

/// Type alias for pattern generator functions
type PatternGenerator = fn(usize) -> Vec<u8>;

/// Generate test data patterns for benchmarking
mod test_data {
    /// Uniform data - all bytes are the same (best compression)
    pub fn uniform(size: usize) -> Vec<u8> {
        vec![0xAA; size]
    }

    /// Random data - no patterns (worst compression)
    pub fn random(size: usize) -> Vec<u8> {
        super::common::noise(size, 0x1234_5678_9ABC_DEF0)
    }

    /// Natural image-like data - grayscale tile with gradients
    pub fn image_like(size: usize) -> Vec<u8> {
        let side = (size as f64).sqrt() as usize;
        let mut data = super::common::image_like(side, side);
        data.resize(size, 128);
        data
    }
}

/// Standard tile sizes for GeoTIFF benchmarking
mod tile_sizes {
    /// Small tile: 256x256 pixels = 64KB
    pub const SMALL: usize = 256 * 256;

    /// Medium tile: 512x512 pixels = 256KB
    pub const MEDIUM: usize = 512 * 512;

    /// Large tile: 1024x1024 pixels = 1MB
    pub const LARGE: usize = 1024 * 1024;
}

const SIZES: [(&str, usize); 3] = [
    ("small_64KB", tile_sizes::SMALL),
    ("medium_256KB", tile_sizes::MEDIUM),
    ("large_1MB", tile_sizes::LARGE),
];

const PATTERNS: [(&str, PatternGenerator); 3] = [
    ("uniform", test_data::uniform as PatternGenerator),
    ("random", test_data::random as PatternGenerator),
    ("image", test_data::image_like as PatternGenerator),
];

/// Benchmark decompression speed
fn bench_decompression_speed(c: &mut Criterion) {
    let mut group = c.benchmark_group("decompression_speed");

    for (size_name, size) in SIZES {
        for (pattern_name, generator) in PATTERNS {
            let original = generator(size);
            let compressed = common::encode_tiff(&original);
            let id = format!("{}/{}", size_name, pattern_name);

            group.throughput(Throughput::Bytes(size as u64));
            group.bench_with_input(
                BenchmarkId::from_parameter(&id),
                &(compressed, size),
                |b, (compressed, size)| {
                    b.iter(|| {
                        let decompressed = decompress_tiff(black_box(compressed), *size).unwrap();
                        black_box(decompressed);
                    });
                },
            );
        }
    }

    group.finish();
}

/// Benchmark buffer reuse across tiles
fn bench_decoder_reuse(c: &mut Criterion) {
    let mut group = c.benchmark_group("decoder_reuse");
    let original = test_data::image_like(tile_sizes::SMALL);
    let compressed = common::encode_tiff(&original);
    group.throughput(Throughput::Bytes(original.len() as u64));

    group.bench_function("decode_into", |b| {
        let mut decoder = LzwDecoder::new(LzwConfig::TIFF);
        let mut buffer = Vec::new();
        b.iter(|| {
            decoder
                .decode_into(
                    black_box(&compressed),
                    OutputLimit::Exact(original.len()),
                    &mut buffer,
                )
                .unwrap();
            black_box(buffer.len());
        });
    });

    group.finish();
}

/// Benchmark predictor reversal alone and as part of decoding
fn bench_predictor(c: &mut Criterion) {
    let mut group = c.benchmark_group("predictor");

    for (name, bits, spp) in [("gray8", 8u16, 1u16), ("rgb8", 8, 3), ("gray16", 16, 1)] {
        let columns = 256;
        let params = PredictorParams::horizontal(columns, spp, bits);
        let len = params.row_bytes().unwrap() * 256;
        let original = test_data::image_like(len);
        let mut predicted = original.clone();
        apply_horizontal_differencing(&mut predicted, &params).unwrap();
        let compressed = common::encode_tiff(&predicted);

        group.throughput(Throughput::Bytes(len as u64));
        group.bench_with_input(BenchmarkId::new("reverse", name), &predicted, |b, data| {
            b.iter(|| {
                let mut data = data.clone();
                reverse_predictor(&mut data, &params).unwrap();
                black_box(data);
            });
        });

        let options = DecodeOptions::tiff(len).with_predictor(params);
        group.bench_with_input(
            BenchmarkId::new("decode_and_reverse", name),
            &compressed,
            |b, compressed| {
                b.iter(|| {
                    let decoded = decompress(black_box(compressed), &options).unwrap();
                    black_box(decoded);
                });
            },
        );
    }

    group.finish();
}

/// Compare with weezl on identical streams
fn bench_vs_weezl(c: &mut Criterion) {
    let mut group = c.benchmark_group("vs_weezl");

    for (pattern_name, generator) in PATTERNS {
        let original = generator(tile_sizes::MEDIUM);
        let compressed = common::encode_tiff(&original);

        group.throughput(Throughput::Bytes(original.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("bigtiff_lzw", pattern_name),
            &compressed,
            |b, compressed| {
                b.iter(|| {
                    let decompressed =
                        decompress_tiff(black_box(compressed), original.len()).unwrap();
                    black_box(decompressed);
                });
            },
        );
        group.bench_with_input(
            BenchmarkId::new("weezl", pattern_name),
            &compressed,
            |b, compressed| {
                b.iter(|| {
                    let decompressed =
                        weezl::decode::Decoder::with_tiff_size_switch(weezl::BitOrder::Msb, 8)
                            .decode(black_box(compressed))
                            .unwrap();
                    black_box(decompressed);
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_decompression_speed,
    bench_decoder_reuse,
    bench_predictor,
    bench_vs_weezl
);
criterion_main!(benches);
