//! Single-frame TIFF and WebP sources

use std::fs;

use image::ImageFormat;
use pretty_assertions::assert_eq;
use sag_rs::prelude::*;
use sag_rs::sag_image::convert::convert_to_sag;
use sag_rs::sag_image::loader::{DEFAULT_DELAY_MS, StillLoader};

use crate::{random_frames, temp_path};

fn options(dither: bool) -> ConvertOptions {
	ConvertOptions {
		load: LoadOptions {
			default_delay_ms: DEFAULT_DELAY_MS,
			dither_single_frame: dither,
		},
		..ConvertOptions::default()
	}
}

#[test_log::test]
fn test_tiff_single_frame() {
	let source = random_frames(3, 9, 6, 1).remove(0);
	let path = temp_path("still.tiff");
	source.save_with_format(&path, ImageFormat::Tiff).unwrap();

	let sag = convert_to_sag(&path, SourceFormat::Tiff, options(false)).unwrap();
	fs::remove_file(&path).unwrap();

	assert_eq!(sag.frame_count(), 1);
	assert_eq!(sag.uniform_delay_ms(), 100);
	assert_eq!(sag.frames()[0].to_rgba(sag.palette()), source.into_raw());
}

#[test_log::test]
fn test_webp_single_frame() {
	let source = random_frames(5, 8, 8, 1).remove(0);
	let path = temp_path("still.webp");
	source.save_with_format(&path, ImageFormat::WebP).unwrap();

	let sag = convert_to_sag(&path, SourceFormat::Webp, options(false)).unwrap();
	fs::remove_file(&path).unwrap();

	assert_eq!(sag.frame_count(), 1);
	assert_eq!(sag.width(), 8);
	assert_eq!(sag.frames()[0].to_rgba(sag.palette()), source.into_raw());
}

#[test_log::test]
fn test_dither_limits_colors() {
	// a smooth gradient has 256 distinct grays before dithering
	let gradient = image::RgbaImage::from_fn(256, 4, |x, _| image::Rgba([x as u8, x as u8, x as u8, 255]));
	let path = temp_path("gradient.tiff");
	gradient.save_with_format(&path, ImageFormat::Tiff).unwrap();

	let loader = StillLoader::new(ImageFormat::Tiff, LoadOptions::default());
	let animation = loader.load(&path).unwrap();
	fs::remove_file(&path).unwrap();

	let levels = [0u8, 51, 102, 153, 204, 255];
	assert_eq!(animation.delays_ms, vec![DEFAULT_DELAY_MS]);
	assert!(animation.frames[0].pixels().iter().all(|c| levels.contains(&c.r) && levels.contains(&c.g)));
}
