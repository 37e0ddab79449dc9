//! Source image loaders.
//!
//! Animated GIFs are decoded frame by frame into full-canvas RGBA frames with
//! their own delays. TIFF and WebP sources are read as a single still frame,
//! optionally dithered against a 6×6×6 color cube, and given a fixed delay.

use std::fmt::Display;
use std::fs;
use std::io::{BufRead, BufReader, Seek};
use std::path::Path;
use std::str::FromStr;

use image::codecs::gif::GifDecoder;
use image::imageops::{ColorMap, dither};
use image::{AnimationDecoder, ImageFormat, ImageReader, Rgba, RgbaImage};
use log::debug;
use sag_types::color::ColorFrame;

use crate::ImageError;

/// Delay given to frames of still images, in milliseconds
pub const DEFAULT_DELAY_MS: u32 = 100;

/// Supported source containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceFormat {
	/// Animated (or still) GIF
	Gif,
	/// Single-frame TIFF
	Tiff,
	/// Single-frame WebP
	Webp,
}

impl SourceFormat {
	/// All supported formats.
	pub const ALL: [SourceFormat; 3] = [SourceFormat::Gif, SourceFormat::Tiff, SourceFormat::Webp];

	/// Guesses the format from a file extension.
	///
	/// # Errors
	///
	/// Returns [`ImageError::UnsupportedFormat`] for unknown or missing extensions.
	pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ImageError> {
		let path = path.as_ref();
		let extension = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
			ImageError::UnsupportedFormat(format!("{} has no file extension", path.display()))
		})?;
		extension.parse()
	}

	/// Returns the matching `image` crate format.
	pub fn image_format(self) -> ImageFormat {
		match self {
			SourceFormat::Gif => ImageFormat::Gif,
			SourceFormat::Tiff => ImageFormat::Tiff,
			SourceFormat::Webp => ImageFormat::WebP,
		}
	}

	/// Returns `true` for containers that can hold several frames.
	pub fn is_animated(self) -> bool {
		matches!(self, SourceFormat::Gif)
	}
}

impl FromStr for SourceFormat {
	type Err = ImageError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"gif" => Ok(SourceFormat::Gif),
			"tif" | "tiff" => Ok(SourceFormat::Tiff),
			"webp" => Ok(SourceFormat::Webp),
			other => Err(ImageError::UnsupportedFormat(other.to_string())),
		}
	}
}

impl Display for SourceFormat {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let name = match self {
			SourceFormat::Gif => "gif",
			SourceFormat::Tiff => "tiff",
			SourceFormat::Webp => "webp",
		};
		f.write_str(name)
	}
}

/// Decoded source frames with their delays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceAnimation {
	/// Full-color frames, all the same size
	pub frames: Vec<ColorFrame>,
	/// One delay per frame, in milliseconds
	pub delays_ms: Vec<u32>,
}

impl SourceAnimation {
	/// Returns the frame width, or 0 without frames.
	pub fn width(&self) -> usize {
		self.frames.first().map_or(0, ColorFrame::width)
	}

	/// Returns the frame height, or 0 without frames.
	pub fn height(&self) -> usize {
		self.frames.first().map_or(0, ColorFrame::height)
	}

	/// Returns the number of frames.
	pub fn frame_count(&self) -> usize {
		self.frames.len()
	}

	/// Returns `true` if every frame has the same delay.
	pub fn has_uniform_delay(&self) -> bool {
		self.delays_ms.windows(2).all(|w| w[0] == w[1])
	}
}

/// Options for still-image sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
	/// Delay assigned to single-frame sources, in milliseconds
	pub default_delay_ms: u32,
	/// Dither single-frame sources against a 6×6×6 color cube
	pub dither_single_frame: bool,
}

impl Default for LoadOptions {
	fn default() -> Self {
		Self {
			default_delay_ms: DEFAULT_DELAY_MS,
			dither_single_frame: true,
		}
	}
}

/// A source of raw-color frames.
pub trait SourceLoader {
	/// Decodes an animation from a seekable reader.
	fn decode<R: BufRead + Seek>(&self, reader: R) -> Result<SourceAnimation, ImageError>;

	/// Opens and decodes the file at `path`.
	fn load(&self, path: impl AsRef<Path>) -> Result<SourceAnimation, ImageError> {
		let file = fs::File::open(path)?;
		self.decode(BufReader::new(file))
	}
}

/// Loader for animated GIF files.
#[derive(Debug, Clone, Copy, Default)]
pub struct GifLoader;

impl SourceLoader for GifLoader {
	fn decode<R: BufRead + Seek>(&self, reader: R) -> Result<SourceAnimation, ImageError> {
		let decoder = GifDecoder::new(reader)?;
		let decoded = decoder.into_frames().collect_frames()?;
		if decoded.is_empty() {
			return Err(ImageError::NoFrames);
		}

		let mut frames = Vec::with_capacity(decoded.len());
		let mut delays_ms = Vec::with_capacity(decoded.len());
		for frame in decoded {
			let (numer, denom) = frame.delay().numer_denom_ms();
			delays_ms.push(numer.checked_div(denom).unwrap_or(0));
			frames.push(to_color_frame(frame.into_buffer())?);
		}

		debug!("Decoded {} GIF frames", frames.len());
		Ok(SourceAnimation {
			frames,
			delays_ms,
		})
	}
}

/// Loader for single-frame TIFF and WebP files.
#[derive(Debug, Clone, Copy)]
pub struct StillLoader {
	format: ImageFormat,
	options: LoadOptions,
}

impl StillLoader {
	/// Creates a loader for the given container format.
	pub fn new(format: ImageFormat, options: LoadOptions) -> Self {
		Self {
			format,
			options,
		}
	}
}

impl SourceLoader for StillLoader {
	fn decode<R: BufRead + Seek>(&self, reader: R) -> Result<SourceAnimation, ImageError> {
		let image = ImageReader::with_format(reader, self.format).decode()?;
		let mut buffer = image.into_rgba8();

		if self.options.dither_single_frame {
			dither(&mut buffer, &ColorCube);
		}

		debug!("Decoded {:?} still image {}x{}", self.format, buffer.width(), buffer.height());
		Ok(SourceAnimation {
			frames: vec![to_color_frame(buffer)?],
			delays_ms: vec![self.options.default_delay_ms],
		})
	}
}

/// Loader picked at runtime from a [`SourceFormat`].
#[derive(Debug, Clone, Copy)]
pub enum Loader {
	/// Animated GIF
	Gif(GifLoader),
	/// TIFF or WebP
	Still(StillLoader),
}

impl Loader {
	/// Returns the loader for `format`.
	pub fn for_format(format: SourceFormat, options: LoadOptions) -> Self {
		match format {
			SourceFormat::Gif => Loader::Gif(GifLoader),
			SourceFormat::Tiff | SourceFormat::Webp => {
				Loader::Still(StillLoader::new(format.image_format(), options))
			}
		}
	}
}

impl SourceLoader for Loader {
	fn decode<R: BufRead + Seek>(&self, reader: R) -> Result<SourceAnimation, ImageError> {
		match self {
			Loader::Gif(loader) => loader.decode(reader),
			Loader::Still(loader) => loader.decode(reader),
		}
	}
}

/// Loads `path` as `format`.
pub fn load(
	path: impl AsRef<Path>,
	format: SourceFormat,
	options: LoadOptions,
) -> Result<SourceAnimation, ImageError> {
	Loader::for_format(format, options).load(path)
}

fn to_color_frame(buffer: RgbaImage) -> Result<ColorFrame, ImageError> {
	let (width, height) = buffer.dimensions();
	Ok(ColorFrame::from_rgba_bytes(width as usize, height as usize, buffer.as_raw())?)
}

/// Uniform 6×6×6 RGB cube (216 colors), alpha is left untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorCube;

impl ColorCube {
	const LEVELS: u16 = 6;
	const STEP: u16 = 255 / (Self::LEVELS - 1);

	#[inline]
	fn level(value: u8) -> u16 {
		(u16::from(value) + Self::STEP / 2) / Self::STEP
	}
}

impl ColorMap for ColorCube {
	type Color = Rgba<u8>;

	fn index_of(&self, color: &Rgba<u8>) -> usize {
		let [r, g, b, _] = color.0;
		let levels = Self::LEVELS as usize;
		(Self::level(r) as usize * levels + Self::level(g) as usize) * levels + Self::level(b) as usize
	}

	fn lookup(&self, index: usize) -> Option<Rgba<u8>> {
		let levels = Self::LEVELS as usize;
		if index >= levels * levels * levels {
			return None;
		}
		let channel = |level: usize| (level as u16 * Self::STEP) as u8;
		Some(Rgba([
			channel(index / (levels * levels)),
			channel(index / levels % levels),
			channel(index % levels),
			255,
		]))
	}

	fn has_lookup(&self) -> bool {
		true
	}

	fn map_color(&self, color: &mut Rgba<u8>) {
		for channel in &mut color.0[..3] {
			*channel = (Self::level(*channel) * Self::STEP) as u8;
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_source_format_parse() {
		assert_eq!("GIF".parse::<SourceFormat>().unwrap(), SourceFormat::Gif);
		assert_eq!("tif".parse::<SourceFormat>().unwrap(), SourceFormat::Tiff);
		assert_eq!("webp".parse::<SourceFormat>().unwrap(), SourceFormat::Webp);
		assert!(matches!("png".parse::<SourceFormat>(), Err(ImageError::UnsupportedFormat(_))));

		assert_eq!(SourceFormat::from_path("a/b/anim.gif").unwrap(), SourceFormat::Gif);
		assert!(SourceFormat::from_path("noext").is_err());

		for format in SourceFormat::ALL {
			assert_eq!(format.to_string().parse::<SourceFormat>().unwrap(), format);
		}
	}

	#[test]
	fn test_color_cube_levels() {
		let cube = ColorCube;
		let mut color = Rgba([0, 26, 255, 7]);
		cube.map_color(&mut color);
		assert_eq!(color, Rgba([0, 51, 255, 7]));

		assert_eq!(cube.index_of(&Rgba([0, 0, 0, 255])), 0);
		assert_eq!(cube.index_of(&Rgba([255, 255, 255, 255])), 215);
		assert_eq!(cube.lookup(215), Some(Rgba([255, 255, 255, 255])));
		assert_eq!(cube.lookup(216), None);
	}

	#[test]
	fn test_source_animation_delays() {
		let frame = ColorFrame::new(1, 1, vec![Default::default()]).unwrap();
		let animation = SourceAnimation {
			frames: vec![frame.clone(), frame],
			delays_ms: vec![50, 70],
		};
		assert!(!animation.has_uniform_delay());
		assert_eq!(animation.width(), 1);
		assert_eq!(animation.frame_count(), 2);
	}
}
