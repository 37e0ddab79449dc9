//! Benchmark helper utilities for sag-rs
//!
//! This module provides generators for synthetic animations used by the
//! benchmark suite. All data is deterministic so runs are comparable.

use sag_types::color::{Color, ColorFrame, Palette};
use sag_types::file::Frame;

/// Generates `count` indexed frames of a scrolling diagonal pattern.
///
/// Consecutive frames share most pixels, like a typical LED animation.
pub fn generate_indexed_frames(width: usize, height: usize, count: usize) -> Vec<Frame> {
	(0..count)
		.map(|n| {
			let indices = (0..width * height)
				.map(|i| {
					let (x, y) = (i % width, i / width);
					((x + y + n) / 4 % 16) as u8
				})
				.collect();
			Frame::new(width, height, indices).expect("pixel count matches")
		})
		.collect()
}

/// Generates a 256-entry palette with distinct colors.
pub fn generate_palette() -> Palette {
	let colors = (0..=255u8).map(|i| Color::rgb(i, i.wrapping_mul(3), i.wrapping_mul(7))).collect();
	Palette::new(colors).expect("256 colors fit")
}

/// Generates full-color frames with roughly `distinct` colors each.
///
/// A linear congruential sequence picks the colors, so the frequency table
/// sees a realistic mix of common and rare entries.
pub fn generate_color_frames(width: usize, height: usize, count: usize, distinct: u32) -> Vec<ColorFrame> {
	let mut state = 0x2545_F491u32;
	(0..count)
		.map(|_| {
			let pixels = (0..width * height)
				.map(|_| {
					state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
					// skew toward low values so some colors dominate
					let pick = (state >> 16) % distinct.max(1);
					let pick = pick * pick / distinct.max(1);
					Color::from_rgba32((pick.wrapping_mul(0x9E37_79B9) & 0xFFFF_FF00) | 0xFF)
				})
				.collect();
			ColorFrame::new(width, height, pixels).expect("pixel count matches")
		})
		.collect()
}
