//! Benchmark suite for the SAG codec and the quantizer
//!
//! Run with: cargo bench --manifest-path benches/Cargo.toml
//!
//! For flamegraph profiling:
//! cargo bench --manifest-path benches/Cargo.toml -- --profile-time=5

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use sag_benches::{generate_color_frames, generate_indexed_frames, generate_palette};
use sag_types::color::{ColorFrequency, Palette, nearest_index, quantize_animation};
use sag_types::file::sag::{DelayUnit, Header, decode, encode, identical_mask};
use std::hint::black_box;

/// Panel sizes commonly driven by SAG players
const SIZES: [(usize, usize); 3] = [(32, 16), (64, 32), (128, 64)];

/// Benchmark encoding indexed frames
fn bench_encode(c: &mut Criterion) {
	let mut group = c.benchmark_group("sag_encode");
	let palette = generate_palette();

	for (width, height) in SIZES {
		let frames = generate_indexed_frames(width, height, 32);
		let delays = vec![100; frames.len()];

		group.throughput(Throughput::Elements((width * height * frames.len()) as u64));
		group.bench_with_input(
			BenchmarkId::new("encode", format!("{width}x{height}")),
			&frames,
			|b, frames| {
				b.iter(|| {
					let result = encode(black_box(frames), &delays, DelayUnit::Milliseconds, &palette);
					black_box(result)
				});
			},
		);
	}

	group.finish();
}

/// Benchmark decoding complete streams
fn bench_decode(c: &mut Criterion) {
	let mut group = c.benchmark_group("sag_decode");
	let palette = generate_palette();

	for (width, height) in SIZES {
		let frames = generate_indexed_frames(width, height, 32);
		let data = encode(&frames, &[100], DelayUnit::Milliseconds, &palette).unwrap();

		group.throughput(Throughput::Bytes(data.len() as u64));
		group.bench_with_input(BenchmarkId::new("decode", format!("{width}x{height}")), &data, |b, data| {
			b.iter(|| {
				let result = decode(black_box(data), DelayUnit::Milliseconds);
				black_box(result)
			});
		});
	}

	group.finish();
}

/// Benchmark header parsing separately
fn bench_header_parsing(c: &mut Criterion) {
	let mut group = c.benchmark_group("sag_header");
	let data = Header::new(64, 32, 10, 100, generate_palette()).to_bytes();

	group.bench_function("parse_header", |b| {
		b.iter(|| {
			let result = Header::from_bytes(black_box(&data));
			black_box(result)
		});
	});

	group.finish();
}

/// Benchmark the per-block mask computation
fn bench_identical_mask(c: &mut Criterion) {
	let mut group = c.benchmark_group("sag_mask");
	let current: Vec<u8> = (0..4096).map(|i| (i % 7) as u8).collect();
	let previous: Vec<u8> = (0..4096).map(|i| (i % 5) as u8).collect();

	group.throughput(Throughput::Elements(current.len() as u64));
	group.bench_function("identical_mask", |b| {
		b.iter(|| {
			let mut acc = 0u32;
			for (cur, prev) in current.chunks(8).zip(previous.chunks(8)) {
				acc += u32::from(identical_mask(black_box(cur), Some(prev)));
			}
			black_box(acc)
		});
	});

	group.finish();
}

/// Benchmark frequency counting and palette extraction
fn bench_palette_extraction(c: &mut Criterion) {
	let mut group = c.benchmark_group("sag_palette");

	for distinct in [64u32, 1024, 16384] {
		let frames = generate_color_frames(64, 32, 16, distinct);

		group.bench_with_input(BenchmarkId::new("count_and_extract", distinct), &frames, |b, frames| {
			b.iter(|| {
				let mut table = ColorFrequency::new();
				for frame in frames {
					table.count_frame(frame);
				}
				black_box(Palette::from_frequency(&table, 256))
			});
		});
	}

	group.finish();
}

/// Benchmark nearest-color lookups against a full palette
fn bench_nearest_index(c: &mut Criterion) {
	let mut group = c.benchmark_group("sag_nearest");
	let palette = generate_palette();
	let frames = generate_color_frames(64, 32, 1, 4096);
	let pixels = frames[0].pixels();

	group.throughput(Throughput::Elements(pixels.len() as u64));
	group.bench_function("nearest_index", |b| {
		b.iter(|| {
			let mut acc = 0usize;
			for &color in pixels {
				acc += nearest_index(black_box(palette.colors()), color);
			}
			black_box(acc)
		});
	});

	group.finish();
}

/// Benchmark the full shared-palette quantization of an animation
fn bench_quantize_animation(c: &mut Criterion) {
	let mut group = c.benchmark_group("sag_quantize");

	for (width, height) in SIZES {
		let frames = generate_color_frames(width, height, 16, 2048);

		group.throughput(Throughput::Elements((width * height * frames.len()) as u64));
		group.bench_with_input(
			BenchmarkId::new("quantize_animation", format!("{width}x{height}")),
			&frames,
			|b, frames| {
				b.iter(|| {
					let result = quantize_animation(black_box(frames), 256);
					black_box(result)
				});
			},
		);
	}

	group.finish();
}

criterion_group!(
	benches,
	bench_encode,
	bench_decode,
	bench_header_parsing,
	bench_identical_mask,
	bench_palette_extraction,
	bench_nearest_index,
	bench_quantize_animation,
);

criterion_main!(benches);
