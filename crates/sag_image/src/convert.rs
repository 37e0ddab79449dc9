//! Conversion pipeline between source images and SAG files.
//!
//! ```text
//! source file -> SourceAnimation -> shared palette -> indexed frames -> SAG
//! SAG -> indexed frames + palette -> RGBA frames -> looping GIF
//! ```

use std::io::Cursor;
use std::path::Path;

use log::{debug, warn};
use sag_types::color::{Color, Palette, animation_frequency, quantize_frames};
use sag_types::file::{DelayUnit, SagFile, decode, encode};

use crate::ImageError;
use crate::loader::{GifLoader, LoadOptions, SourceAnimation, SourceFormat, SourceLoader, load};
use crate::writer::gif_bytes;

/// Settings for a source → SAG conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertOptions {
	/// Palette size cap, clamped to 256
	pub max_colors: usize,
	/// Options for still-image sources
	pub load: LoadOptions,
}

impl Default for ConvertOptions {
	fn default() -> Self {
		Self {
			max_colors: Palette::MAX_COLORS,
			load: LoadOptions::default(),
		}
	}
}

/// Quantizes decoded source frames into a SAG file.
///
/// Logs a warning when per-frame delays differ, since only the first one is
/// kept, and when the source has more distinct colors than the palette holds.
pub fn animation_to_sag(animation: &SourceAnimation, max_colors: usize) -> Result<SagFile, ImageError> {
	if animation.frames.is_empty() {
		return Err(ImageError::NoFrames);
	}

	if !animation.has_uniform_delay() {
		warn!(
			"Frame delays vary ({:?} ms), every frame will use {} ms",
			animation.delays_ms,
			animation.delays_ms.first().copied().unwrap_or(0)
		);
	}

	let frequency = animation_frequency(&animation.frames)?;
	let palette = Palette::from_frequency(&frequency, max_colors);
	if frequency.len() > palette.len() {
		warn!(
			"Source has {} distinct colors, reduced to {} palette entries",
			frequency.len(),
			palette.len()
		);
	}
	debug!(
		"Quantizing {} frames of {}x{} against {} colors",
		animation.frame_count(),
		animation.width(),
		animation.height(),
		palette.len()
	);

	let frames = quantize_frames(&animation.frames, &palette);
	Ok(SagFile::from_frames(frames, &animation.delays_ms, DelayUnit::Milliseconds, palette)?)
}

/// Loads `input` and converts it to a SAG file in memory.
pub fn convert_to_sag(
	input: impl AsRef<Path>,
	format: SourceFormat,
	options: ConvertOptions,
) -> Result<SagFile, ImageError> {
	let input = input.as_ref();
	debug!("Loading {} as {}", input.display(), format);
	let animation = load(input, format, options.load)?;
	animation_to_sag(&animation, options.max_colors)
}

/// Converts `input` to a SAG file and writes it to `output`.
pub fn encode_file(
	input: impl AsRef<Path>,
	output: impl AsRef<Path>,
	format: SourceFormat,
	options: ConvertOptions,
) -> Result<SagFile, ImageError> {
	let sag = convert_to_sag(input, format, options)?;
	sag.save(output)?;
	Ok(sag)
}

/// Converts the SAG file at `input` to a looping GIF at `output`.
pub fn decode_file(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<SagFile, ImageError> {
	let sag = SagFile::open(input)?;
	crate::writer::save_gif(&sag, output)?;
	Ok(sag)
}

/// Result of an in-memory encode → decode round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundTrip {
	/// Number of frames checked
	pub frame_count: usize,
	/// Size of the encoded SAG stream in bytes
	pub encoded_bytes: usize,
	/// Delay stored for every frame, in milliseconds
	pub delay_ms: u32,
	/// Source delays that differ from the stored one
	pub lost_delays: usize,
}

/// Encodes `sag` and decodes it again, checking every frame index.
///
/// # Errors
///
/// Any encode or decode failure, or [`ImageError::RoundTripMismatch`] if a
/// decoded frame differs from the original.
pub fn verify_roundtrip(sag: &SagFile, source_delays_ms: &[u32]) -> Result<RoundTrip, ImageError> {
	let data = encode(sag.frames(), source_delays_ms, DelayUnit::Milliseconds, sag.palette())?;
	let (frames, delays) = decode(&data, DelayUnit::Milliseconds)?;

	if let Some(index) = frames.iter().zip(sag.frames()).position(|(a, b)| a != b) {
		return Err(ImageError::RoundTripMismatch(index));
	}
	if frames.len() != sag.frame_count() {
		return Err(ImageError::RoundTripMismatch(frames.len().min(sag.frame_count())));
	}

	let delay_ms = delays.first().copied().unwrap_or(0);
	Ok(RoundTrip {
		frame_count: frames.len(),
		encoded_bytes: data.len(),
		delay_ms,
		lost_delays: source_delays_ms.iter().filter(|&&d| d != delay_ms).count(),
	})
}

/// Renders `sag` as GIF bytes, decodes them and compares every pixel.
///
/// Returns the size of the GIF stream.
///
/// # Errors
///
/// Any GIF encode or decode failure, or [`ImageError::RoundTripMismatch`]
/// naming the first frame that does not come back unchanged.
pub fn verify_gif(sag: &SagFile) -> Result<usize, ImageError> {
	let data = gif_bytes(sag)?;
	let decoded = GifLoader.decode(Cursor::new(data.as_slice()))?;

	for (index, (frame, gif_frame)) in sag.frames().iter().zip(&decoded.frames).enumerate() {
		let pixels: Vec<u8> = gif_frame.pixels().iter().flat_map(|c| [c.r, c.g, c.b, c.a]).collect();
		if pixels != frame.to_rgba(sag.palette()) {
			return Err(ImageError::RoundTripMismatch(index));
		}
	}
	if decoded.frame_count() != sag.frame_count() {
		return Err(ImageError::RoundTripMismatch(decoded.frame_count().min(sag.frame_count())));
	}

	debug!("GIF rendering of {} frames is {} bytes", sag.frame_count(), data.len());
	Ok(data.len())
}

/// Color statistics of a source animation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorReport {
	/// Pixels counted over all frames
	pub total_pixels: u64,
	/// Number of distinct RGBA values
	pub distinct_colors: usize,
	/// Most frequent colors with their counts, most frequent first
	pub top: Vec<(Color, u64)>,
	/// Palette an encode with the same cap would store
	pub palette: Palette,
}

impl ColorReport {
	/// Returns the palette index and entry `color` would be quantized to.
	pub fn nearest(&self, color: Color) -> Option<(u8, Color)> {
		if self.palette.is_empty() {
			return None;
		}
		let index = self.palette.nearest_index(color);
		self.palette.get(index).map(|entry| (index, entry))
	}
}

/// Counts the colors of `animation`, keeping the `top` most frequent ones.
pub fn color_report(animation: &SourceAnimation, top: usize, max_colors: usize) -> Result<ColorReport, ImageError> {
	if animation.frames.is_empty() {
		return Err(ImageError::NoFrames);
	}

	let frequency = animation_frequency(&animation.frames)?;
	Ok(ColorReport {
		total_pixels: frequency.total(),
		distinct_colors: frequency.len(),
		top: frequency.top_colors(top),
		palette: Palette::from_frequency(&frequency, max_colors),
	})
}

/// Loads `input` and reports its colors.
pub fn analyze_colors(
	input: impl AsRef<Path>,
	format: SourceFormat,
	options: ConvertOptions,
	top: usize,
) -> Result<ColorReport, ImageError> {
	let animation = load(input, format, options.load)?;
	color_report(&animation, top, options.max_colors)
}
