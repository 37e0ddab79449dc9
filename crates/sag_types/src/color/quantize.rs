//! Nearest-color mapping and frame quantization.
//!
//! Distances are squared Euclidean in plain RGB, alpha is ignored. Every
//! pixel is mapped on its own (no dithering, no error diffusion), so running
//! the quantizer twice on the same frame and palette gives the same result.

use std::collections::HashMap;

use rayon::prelude::*;

use super::{Color, ColorFrame, ColorFrequency, Palette};
use crate::file::{SagError, sag::Frame};

/// Squared RGB distance between two colors.
#[inline]
pub fn distance_squared(a: Color, b: Color) -> u32 {
	let dr = a.r as i32 - b.r as i32;
	let dg = a.g as i32 - b.g as i32;
	let db = a.b as i32 - b.b as i32;
	(dr * dr + dg * dg + db * db) as u32
}

/// Returns the index of the palette entry closest to `color`.
///
/// The first entry reaching the minimum distance wins, so palette order
/// decides ties. An empty palette yields 0.
pub fn nearest_index(palette: &[Color], color: Color) -> usize {
	let mut best = 0;
	let mut best_distance = u32::MAX;

	for (i, &entry) in palette.iter().enumerate() {
		let distance = distance_squared(color, entry);
		if distance < best_distance {
			best_distance = distance;
			best = i;
			if distance == 0 {
				break;
			}
		}
	}

	best
}

/// Re-indexes every pixel of `frame` against `palette`.
pub fn quantize(frame: &ColorFrame, palette: &Palette) -> Frame {
	// frames usually repeat few colors, memoize lookups per frame
	let mut cache: HashMap<u32, u8> = HashMap::new();
	let indices = frame
		.pixels()
		.iter()
		.map(|&color| {
			*cache.entry(color.to_rgba32()).or_insert_with(|| palette.nearest_index(color))
		})
		.collect();

	Frame::from_parts(frame.width(), frame.height(), indices)
}

/// Counts colors over every pixel of every frame.
///
/// Frames are counted in parallel and the per-frame tables are summed into
/// one, so the result does not depend on scheduling.
///
/// # Errors
///
/// - [`SagError::EmptyAnimation`] if `frames` is empty
/// - [`SagError::FrameSizeMismatch`] if frames differ in size
pub fn animation_frequency(frames: &[ColorFrame]) -> Result<ColorFrequency, SagError> {
	let Some(first) = frames.first() else {
		return Err(SagError::EmptyAnimation);
	};

	let expected = (first.width(), first.height());
	for (index, frame) in frames.iter().enumerate() {
		let actual = (frame.width(), frame.height());
		if actual != expected {
			return Err(SagError::FrameSizeMismatch {
				index,
				expected,
				actual,
			});
		}
	}

	Ok(frames.par_iter().map(ColorFrequency::from_frame).reduce(ColorFrequency::new, |mut acc, table| {
		acc.merge(table);
		acc
	}))
}

/// Re-indexes every frame against the same palette, in parallel.
pub fn quantize_frames(frames: &[ColorFrame], palette: &Palette) -> Vec<Frame> {
	frames.par_iter().map(|frame| quantize(frame, palette)).collect()
}

/// Quantizes a whole animation against one shared palette.
///
/// Color counts are summed over all frames before the palette is extracted,
/// then every frame is mapped against that same palette. `max_colors` is
/// clamped to 256.
///
/// # Errors
///
/// Same as [`animation_frequency`].
pub fn quantize_animation(
	frames: &[ColorFrame],
	max_colors: usize,
) -> Result<(Palette, Vec<Frame>), SagError> {
	let frequency = animation_frequency(frames)?;
	let palette = Palette::from_frequency(&frequency, max_colors);
	let indexed = quantize_frames(frames, &palette);

	Ok((palette, indexed))
}
