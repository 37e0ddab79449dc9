//! Color frequency counting and palette extraction.
//!
//! SAG files carry a single 256-entry RGB palette shared by every frame.
//! The palette is built from exact color counts summed over the whole
//! animation, ordered by descending frequency. Colors with equal counts are
//! ordered by ascending `(R, G, B, A)` so the same input always yields the
//! same palette.

use std::collections::HashMap;
use std::fmt;

use super::{Color, ColorFrame, quantize};
use crate::file::SagError;

/// Exact-color occurrence counts.
///
/// Keys are packed RGBA values ([`Color::to_rgba32`]), no binning is done.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorFrequency {
	counts: HashMap<u32, u64>,
}

impl ColorFrequency {
	/// Creates an empty frequency table.
	pub fn new() -> Self {
		Self::default()
	}

	/// Builds a table from every pixel of one frame.
	pub fn from_frame(frame: &ColorFrame) -> Self {
		let mut table = Self::new();
		table.count_frame(frame);
		table
	}

	/// Adds one occurrence of `color`.
	#[inline]
	pub fn add(&mut self, color: Color) {
		*self.counts.entry(color.to_rgba32()).or_insert(0) += 1;
	}

	/// Adds every pixel of `frame` to the table.
	pub fn count_frame(&mut self, frame: &ColorFrame) {
		self.extend(frame.pixels().iter().copied());
	}

	/// Sums the counts of `other` into this table.
	pub fn merge(&mut self, other: ColorFrequency) {
		if self.counts.is_empty() {
			self.counts = other.counts;
			return;
		}
		for (key, count) in other.counts {
			*self.counts.entry(key).or_insert(0) += count;
		}
	}

	/// Returns the number of distinct colors seen.
	pub fn len(&self) -> usize {
		self.counts.len()
	}

	/// Returns `true` if no pixel has been counted.
	pub fn is_empty(&self) -> bool {
		self.counts.is_empty()
	}

	/// Returns how many pixels had exactly `color`.
	pub fn count(&self, color: Color) -> u64 {
		self.counts.get(&color.to_rgba32()).copied().unwrap_or(0)
	}

	/// Returns the total number of counted pixels.
	pub fn total(&self) -> u64 {
		self.counts.values().sum()
	}

	/// Returns every `(color, count)` pair in palette order.
	///
	/// Sorted by descending count, ties by ascending `(R, G, B, A)`.
	pub fn sorted(&self) -> Vec<(Color, u64)> {
		let mut colors: Vec<_> = self
			.counts
			.iter()
			.map(|(&key, &count)| (Color::from_rgba32(key), count))
			.collect();
		// keys are unique, so an unstable sort is still deterministic
		colors.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
		colors
	}

	/// Returns the `n` most frequent `(color, count)` pairs.
	pub fn top_colors(&self, n: usize) -> Vec<(Color, u64)> {
		let mut colors = self.sorted();
		colors.truncate(n);
		colors
	}

	/// Returns the most frequent colors, most frequent first.
	///
	/// `max_colors` of `None` returns every distinct color, otherwise exactly
	/// `min(max_colors, self.len())` colors are returned.
	pub fn extract_palette(&self, max_colors: Option<usize>) -> Vec<Color> {
		let mut colors = self.sorted();
		if let Some(max) = max_colors {
			colors.truncate(max);
		}
		colors.into_iter().map(|(color, _)| color).collect()
	}
}

impl Extend<Color> for ColorFrequency {
	fn extend<T: IntoIterator<Item = Color>>(&mut self, iter: T) {
		for color in iter {
			self.add(color);
		}
	}
}

impl FromIterator<Color> for ColorFrequency {
	fn from_iter<T: IntoIterator<Item = Color>>(iter: T) -> Self {
		let mut table = Self::new();
		table.extend(iter);
		table
	}
}

/// Ordered palette of up to 256 colors.
///
/// Entry order matters: [`Palette::nearest_index`] resolves distance ties to
/// the lowest index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Palette {
	colors: Vec<Color>,
}

impl Palette {
	/// Maximum number of palette entries
	pub const MAX_COLORS: usize = 256;

	/// Size of the palette as stored in a SAG header (256 entries × 3 bytes RGB)
	pub const HEADER_BYTES: usize = Self::MAX_COLORS * 3;

	/// Creates a palette from an ordered color list.
	///
	/// # Errors
	///
	/// Returns [`SagError::PaletteTooLarge`] for more than 256 colors.
	pub fn new(colors: Vec<Color>) -> Result<Self, SagError> {
		if colors.len() > Self::MAX_COLORS {
			return Err(SagError::PaletteTooLarge(colors.len()));
		}
		Ok(Self {
			colors,
		})
	}

	/// Builds a palette from the most frequent colors of `table`.
	///
	/// `max_colors` is clamped to 256.
	pub fn from_frequency(table: &ColorFrequency, max_colors: usize) -> Self {
		Self {
			colors: table.extract_palette(Some(max_colors.min(Self::MAX_COLORS))),
		}
	}

	/// Reads a palette from the 768-byte header block.
	///
	/// Always yields 256 opaque entries, unused slots come back as black.
	pub fn from_header_bytes(data: &[u8; Self::HEADER_BYTES]) -> Self {
		let colors =
			data.chunks_exact(3).map(|rgb| Color::rgb(rgb[0], rgb[1], rgb[2])).collect();
		Self {
			colors,
		}
	}

	/// Serializes the palette into the 768-byte header block.
	///
	/// Slots past [`Palette::len`] are zero-filled. Alpha is not stored.
	pub fn to_header_bytes(&self) -> [u8; Self::HEADER_BYTES] {
		let mut data = [0u8; Self::HEADER_BYTES];
		for (slot, color) in data.chunks_exact_mut(3).zip(&self.colors) {
			slot.copy_from_slice(&color.to_rgb());
		}
		data
	}

	/// Returns the number of colors in the palette.
	#[inline]
	pub fn len(&self) -> usize {
		self.colors.len()
	}

	/// Returns `true` if the palette has no colors.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.colors.is_empty()
	}

	/// Gets a color by index.
	#[inline]
	pub fn get(&self, index: u8) -> Option<Color> {
		self.colors.get(index as usize).copied()
	}

	/// Gets a color by index, falling back to black for unused slots.
	#[inline]
	pub fn color_or_black(&self, index: u8) -> Color {
		self.get(index).unwrap_or(Color::BLACK)
	}

	/// Returns the palette colors in order.
	#[inline]
	pub fn colors(&self) -> &[Color] {
		&self.colors
	}

	/// Returns an iterator over palette colors.
	pub fn iter(&self) -> impl Iterator<Item = &Color> {
		self.colors.iter()
	}

	/// Returns the index of the closest entry to `color`.
	///
	/// See [`quantize::nearest_index`]. An empty palette maps everything to 0.
	pub fn nearest_index(&self, color: Color) -> u8 {
		// at most 256 entries, the index always fits
		quantize::nearest_index(&self.colors, color) as u8
	}
}

impl fmt::Display for Palette {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Palette: {} of {} colors used", self.colors.len(), Self::MAX_COLORS)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const RED: Color = Color::rgb(255, 0, 0);
	const GREEN: Color = Color::rgb(0, 255, 0);
	const BLUE: Color = Color::rgb(0, 0, 255);

	fn table(pixels: &[(Color, usize)]) -> ColorFrequency {
		pixels.iter().flat_map(|&(color, n)| std::iter::repeat_n(color, n)).collect()
	}

	#[test]
	fn test_counts_exact_colors() {
		let freq = table(&[(RED, 3), (GREEN, 1), (Color::new(255, 0, 0, 0), 2)]);
		assert_eq!(freq.len(), 3);
		assert_eq!(freq.count(RED), 3);
		assert_eq!(freq.count(Color::new(255, 0, 0, 0)), 2);
		assert_eq!(freq.count(BLUE), 0);
		assert_eq!(freq.total(), 6);
	}

	#[test]
	fn test_extract_orders_by_frequency() {
		let freq = table(&[(RED, 1), (GREEN, 5), (BLUE, 3)]);
		assert_eq!(freq.extract_palette(None), vec![GREEN, BLUE, RED]);
		assert_eq!(freq.extract_palette(Some(2)), vec![GREEN, BLUE]);
	}

	#[test]
	fn test_extract_palette_cap() {
		let freq = table(&[(RED, 1), (GREEN, 2), (BLUE, 3)]);
		for max in 0..6 {
			assert_eq!(freq.extract_palette(Some(max)).len(), max.min(3));
		}
		assert_eq!(freq.extract_palette(None).len(), 3);
		assert!(ColorFrequency::new().extract_palette(Some(256)).is_empty());
	}

	#[test]
	fn test_extract_tie_break_is_deterministic() {
		// all three tie; ascending (R, G, B, A) puts blue, green, red
		let freq = table(&[(RED, 2), (GREEN, 2), (BLUE, 2)]);
		let expected = vec![BLUE, GREEN, RED];
		for _ in 0..16 {
			assert_eq!(freq.extract_palette(None), expected);
		}

		// insertion order must not leak into the result
		let reversed = table(&[(BLUE, 2), (GREEN, 2), (RED, 2)]);
		assert_eq!(reversed.extract_palette(None), expected);
	}

	#[test]
	fn test_tie_break_uses_alpha_last() {
		let opaque = Color::new(10, 10, 10, 255);
		let clear = Color::new(10, 10, 10, 0);
		let freq = table(&[(opaque, 1), (clear, 1)]);
		assert_eq!(freq.extract_palette(None), vec![clear, opaque]);
	}

	#[test]
	fn test_merge_sums_counts() {
		let mut a = table(&[(RED, 2), (GREEN, 1)]);
		let b = table(&[(GREEN, 4), (BLUE, 1)]);
		a.merge(b);

		assert_eq!(a.count(RED), 2);
		assert_eq!(a.count(GREEN), 5);
		assert_eq!(a.count(BLUE), 1);
		assert_eq!(a.extract_palette(None), vec![GREEN, RED, BLUE]);
	}

	#[test]
	fn test_top_colors() {
		let freq = table(&[(RED, 1), (GREEN, 5), (BLUE, 3)]);
		assert_eq!(freq.top_colors(2), vec![(GREEN, 5), (BLUE, 3)]);
	}

	#[test]
	fn test_palette_too_large() {
		assert!(Palette::new(vec![Color::BLACK; 256]).is_ok());
		assert!(matches!(Palette::new(vec![Color::BLACK; 257]), Err(SagError::PaletteTooLarge(257))));
	}

	#[test]
	fn test_palette_from_frequency_clamps() {
		let freq: ColorFrequency = (0..300u32).map(|i| Color::from_rgba32((i << 8) | 0xFF)).collect();
		assert_eq!(Palette::from_frequency(&freq, 1000).len(), 256);
		assert_eq!(Palette::from_frequency(&freq, 16).len(), 16);
	}

	#[test]
	fn test_header_bytes_zero_padded() {
		let palette = Palette::new(vec![RED, Color::rgb(1, 2, 3)]).unwrap();
		let bytes = palette.to_header_bytes();
		assert_eq!(&bytes[..6], &[255, 0, 0, 1, 2, 3]);
		assert!(bytes[6..].iter().all(|&b| b == 0));

		let loaded = Palette::from_header_bytes(&bytes);
		assert_eq!(loaded.len(), 256);
		assert_eq!(loaded.get(0), Some(RED));
		assert_eq!(loaded.get(1), Some(Color::rgb(1, 2, 3)));
		assert_eq!(loaded.get(255), Some(Color::BLACK));
	}

	#[test]
	fn test_color_or_black() {
		let palette = Palette::new(vec![RED]).unwrap();
		assert_eq!(palette.color_or_black(0), RED);
		assert_eq!(palette.color_or_black(7), Color::BLACK);
	}
}
