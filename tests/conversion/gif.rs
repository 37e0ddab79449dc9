//! Animated GIF sources

use std::fs;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, RgbaImage};
use pretty_assertions::assert_eq;
use sag_rs::prelude::*;
use sag_rs::sag_image::convert::{analyze_colors, decode_file, encode_file, verify_gif};
use sag_rs::sag_image::loader::GifLoader;

use crate::{COLORS, random_frames, temp_path};

fn write_gif(path: &Path, frames: &[RgbaImage], delays_ms: &[u32]) {
	let file = BufWriter::new(fs::File::create(path).unwrap());
	let mut encoder = GifEncoder::new(file);
	encoder.set_repeat(Repeat::Infinite).unwrap();
	for (buffer, &delay) in frames.iter().zip(delays_ms) {
		encoder
			.encode_frame(Frame::from_parts(buffer.clone(), 0, 0, Delay::from_numer_denom_ms(delay, 1)))
			.unwrap();
	}
}

fn rgba_frames(sag: &SagFile) -> Vec<Vec<u8>> {
	sag.iter().map(|frame| frame.to_rgba(sag.palette())).collect()
}

#[test_log::test]
fn test_gif_to_sag_and_back() {
	let source = random_frames(7, 13, 5, 4);
	let gif_path = temp_path("source.gif");
	let sag_path = temp_path("anim.sag");
	let out_path = temp_path("decoded.gif");
	write_gif(&gif_path, &source, &[100, 100, 300, 100]);

	let sag = encode_file(&gif_path, &sag_path, SourceFormat::Gif, ConvertOptions::default()).unwrap();
	assert_eq!(sag.width(), 13);
	assert_eq!(sag.height(), 5);
	assert_eq!(sag.frame_count(), 4);
	// only the first delay survives
	assert_eq!(sag.uniform_delay_ms(), 100);
	assert!(sag.palette().len() <= COLORS.len());

	// four exact colors fit the palette, so every pixel comes back unchanged
	let expected: Vec<Vec<u8>> = source.iter().map(|f| f.as_raw().clone()).collect();
	assert_eq!(rgba_frames(&sag), expected);

	let reloaded = SagFile::open(&sag_path).unwrap();
	assert_eq!(reloaded.frames(), sag.frames());
	assert_eq!(fs::metadata(&sag_path).unwrap().len() as usize, 780 + 4 * 5 * (13 + 2));

	decode_file(&sag_path, &out_path).unwrap();
	let decoded = GifLoader.load(&out_path).unwrap();
	assert_eq!(decoded.frame_count(), 4);
	assert_eq!(decoded.delays_ms, vec![100; 4]);
	for (frame, expected) in decoded.frames.iter().zip(&source) {
		let pixels: Vec<u8> =
			frame.pixels().iter().flat_map(|c| [c.r, c.g, c.b, c.a]).collect();
		assert_eq!(&pixels, expected.as_raw());
	}

	for path in [gif_path, sag_path, out_path] {
		fs::remove_file(path).unwrap();
	}
}

#[test_log::test]
fn test_gif_loader_reads_delays() {
	let source = random_frames(11, 4, 4, 3);
	let gif_path = temp_path("delays.gif");
	write_gif(&gif_path, &source, &[50, 120, 70]);

	let animation = GifLoader.load(&gif_path).unwrap();
	fs::remove_file(&gif_path).unwrap();

	assert_eq!(animation.delays_ms, vec![50, 120, 70]);
	assert!(!animation.has_uniform_delay());
	assert_eq!(animation.width(), 4);
	assert_eq!(animation.height(), 4);
}

#[test_log::test]
fn test_missing_source_is_io_error() {
	let err = encode_file(
		temp_path("missing.gif"),
		temp_path("missing.sag"),
		SourceFormat::Gif,
		ConvertOptions::default(),
	)
	.unwrap_err();
	assert!(matches!(err, ImageError::IOError(_)));
}

#[test_log::test]
fn test_decode_rejects_non_sag() {
	let path = temp_path("not_a.sag");
	fs::write(&path, vec![b'G'; 1024]).unwrap();

	let err = decode_file(&path, temp_path("never.gif")).unwrap_err();
	fs::remove_file(&path).unwrap();

	match err {
		ImageError::Sag(err) => assert_eq!(err.kind(), ErrorKind::Format),
		other => panic!("unexpected error: {other}"),
	}
}

#[test_log::test]
fn test_colors_report() {
	let [black, red, _, white] = COLORS;
	let first = RgbaImage::from_fn(2, 2, |x, y| if (x, y) == (1, 1) { black } else { red });
	let second = RgbaImage::from_fn(2, 2, |x, y| match (x, y) {
		(0, 0) => red,
		(1, 0) => white,
		_ => black,
	});
	let gif_path = temp_path("colors.gif");
	write_gif(&gif_path, &[first, second], &[80, 80]);

	let report = analyze_colors(&gif_path, SourceFormat::Gif, ConvertOptions::default(), 2).unwrap();
	assert_eq!(report.total_pixels, 8);
	assert_eq!(report.distinct_colors, 3);
	assert_eq!(report.top, vec![(Color::rgb(255, 0, 0), 4), (Color::BLACK, 3)]);
	assert_eq!(report.nearest(Color::rgb(255, 128, 0)), Some((0, Color::rgb(255, 0, 0))));

	let capped = ConvertOptions {
		max_colors: 2,
		..ConvertOptions::default()
	};
	let report = analyze_colors(&gif_path, SourceFormat::Gif, capped, 8).unwrap();
	fs::remove_file(&gif_path).unwrap();

	assert_eq!(report.top.len(), 3);
	assert_eq!(report.palette.len(), 2);
	assert_eq!(report.nearest(Color::rgb(250, 250, 250)), Some((0, Color::rgb(255, 0, 0))));
	assert_eq!(report.nearest(Color::rgb(40, 40, 40)), Some((1, Color::BLACK)));
}

#[test_log::test]
fn test_encoded_gif_renders_back() {
	let source = random_frames(3, 9, 3, 3);
	let gif_path = temp_path("render.gif");
	let sag_path = temp_path("render.sag");
	write_gif(&gif_path, &source, &[60, 60, 60]);

	let sag = encode_file(&gif_path, &sag_path, SourceFormat::Gif, ConvertOptions::default()).unwrap();
	for path in [gif_path, sag_path] {
		fs::remove_file(path).unwrap();
	}

	assert!(verify_gif(&sag).unwrap() > 6);
}
