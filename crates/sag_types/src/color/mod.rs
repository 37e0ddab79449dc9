//! Color types and the palette quantization engine.
//!
//! This module reduces full-color animations to the 8-bit indexed
//! representation stored in SAG files:
//!
//! - [`ColorFrequency`] counts exact colors over every pixel of every frame
//! - [`ColorFrequency::extract_palette`] picks the most frequent colors
//! - [`nearest_index`] maps a color to its closest palette entry
//! - [`quantize`] / [`quantize_animation`] re-index whole frames
//!
//! # Examples
//!
//! ```
//! use sag_types::color::{Color, ColorFrame, quantize_animation};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let red = Color::rgb(255, 0, 0);
//! let blue = Color::rgb(0, 0, 255);
//! let frame = ColorFrame::new(2, 1, vec![red, blue])?;
//!
//! let (palette, indexed) = quantize_animation(&[frame], 256)?;
//! assert_eq!(palette.len(), 2);
//! assert_eq!(indexed[0].width(), 2);
//! # Ok(())
//! # }
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::file::SagError;

pub mod palette;
pub mod quantize;

pub use palette::{ColorFrequency, Palette};
pub use quantize::{
	animation_frequency, distance_squared, nearest_index, quantize, quantize_animation, quantize_frames,
};

/// RGBA color representation.
///
/// The derived ordering compares red, then green, then blue, then alpha.
/// Palette extraction relies on it to break frequency ties.
#[derive(
	Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Color {
	/// Red component (0-255)
	pub r: u8,
	/// Green component (0-255)
	pub g: u8,
	/// Blue component (0-255)
	pub b: u8,
	/// Alpha component (0-255)
	pub a: u8,
}

impl Color {
	/// Opaque black, used for unused palette slots.
	pub const BLACK: Color = Color::rgb(0, 0, 0);

	/// Creates a new RGBA color.
	pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
		Self {
			r,
			g,
			b,
			a,
		}
	}

	/// Creates a new RGB color with full opacity.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self::new(r, g, b, 255)
	}

	/// Creates a new grayscale color.
	pub const fn gray(value: u8) -> Self {
		Self::rgb(value, value, value)
	}

	/// Returns the color packed as a 32-bit RGBA value.
	///
	/// The packed value is the canonical key of the frequency table.
	pub const fn to_rgba32(&self) -> u32 {
		((self.r as u32) << 24) | ((self.g as u32) << 16) | ((self.b as u32) << 8) | (self.a as u32)
	}

	/// Creates a color from a 32-bit RGBA value.
	pub const fn from_rgba32(rgba: u32) -> Self {
		Self {
			r: ((rgba >> 24) & 0xFF) as u8,
			g: ((rgba >> 16) & 0xFF) as u8,
			b: ((rgba >> 8) & 0xFF) as u8,
			a: (rgba & 0xFF) as u8,
		}
	}

	/// Returns the red, green and blue components.
	pub const fn to_rgb(&self) -> [u8; 3] {
		[self.r, self.g, self.b]
	}
}

impl From<[u8; 4]> for Color {
	fn from(rgba: [u8; 4]) -> Self {
		Self::new(rgba[0], rgba[1], rgba[2], rgba[3])
	}
}

impl From<[u8; 3]> for Color {
	fn from(rgb: [u8; 3]) -> Self {
		Self::rgb(rgb[0], rgb[1], rgb[2])
	}
}

impl fmt::Display for Color {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "RGBA({}, {}, {}, {})", self.r, self.g, self.b, self.a)
	}
}

/// A decoded full-color frame, row-major.
///
/// This is what image loaders hand to the quantizer before any palette exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorFrame {
	width: usize,
	height: usize,
	pixels: Vec<Color>,
}

impl ColorFrame {
	/// Creates a frame from row-major pixels.
	///
	/// # Errors
	///
	/// Returns [`SagError::PixelCountMismatch`] if `pixels.len() != width * height`.
	pub fn new(width: usize, height: usize, pixels: Vec<Color>) -> Result<Self, SagError> {
		let expected = width * height;
		if pixels.len() != expected {
			return Err(SagError::PixelCountMismatch {
				expected,
				actual: pixels.len(),
			});
		}

		Ok(Self {
			width,
			height,
			pixels,
		})
	}

	/// Creates a frame from tightly packed RGBA bytes.
	///
	/// # Errors
	///
	/// Returns [`SagError::PixelCountMismatch`] if the buffer does not hold
	/// exactly `width * height` pixels.
	pub fn from_rgba_bytes(width: usize, height: usize, rgba: &[u8]) -> Result<Self, SagError> {
		if rgba.len() % 4 != 0 {
			return Err(SagError::PixelCountMismatch {
				expected: width * height * 4,
				actual: rgba.len(),
			});
		}

		let pixels = rgba.chunks_exact(4).map(|px| Color::new(px[0], px[1], px[2], px[3])).collect();
		Self::new(width, height, pixels)
	}

	/// Returns the frame width in pixels.
	#[inline]
	pub fn width(&self) -> usize {
		self.width
	}

	/// Returns the frame height in pixels.
	#[inline]
	pub fn height(&self) -> usize {
		self.height
	}

	/// Returns all pixels, row-major.
	#[inline]
	pub fn pixels(&self) -> &[Color] {
		&self.pixels
	}

	/// Returns the pixel at `(x, y)`, or `None` outside the frame.
	pub fn get(&self, x: usize, y: usize) -> Option<Color> {
		if x >= self.width || y >= self.height {
			return None;
		}
		Some(self.pixels[y * self.width + x])
	}
}
