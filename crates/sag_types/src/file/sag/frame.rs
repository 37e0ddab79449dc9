//! Indexed SAG frames.

use std::fmt;

use crate::color::Palette;
use crate::file::SagError;

/// One frame of palette indices, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
	width: usize,
	height: usize,
	indices: Vec<u8>,
}

impl Frame {
	/// Creates a frame from row-major palette indices.
	///
	/// # Errors
	///
	/// Returns [`SagError::PixelCountMismatch`] if `indices.len() != width * height`.
	pub fn new(width: usize, height: usize, indices: Vec<u8>) -> Result<Self, SagError> {
		let expected = width * height;
		if indices.len() != expected {
			return Err(SagError::PixelCountMismatch {
				expected,
				actual: indices.len(),
			});
		}

		Ok(Self::from_parts(width, height, indices))
	}

	/// Creates a frame with every pixel set to `index`.
	pub fn filled(width: usize, height: usize, index: u8) -> Self {
		Self::from_parts(width, height, vec![index; width * height])
	}

	pub(crate) fn from_parts(width: usize, height: usize, indices: Vec<u8>) -> Self {
		debug_assert_eq!(indices.len(), width * height);
		Self {
			width,
			height,
			indices,
		}
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

	/// Returns the palette indices, row-major.
	#[inline]
	pub fn pixels(&self) -> &[u8] {
		&self.indices
	}

	/// Returns the index at `(x, y)`, or `None` outside the frame.
	pub fn get(&self, x: usize, y: usize) -> Option<u8> {
		if x >= self.width || y >= self.height {
			return None;
		}
		Some(self.indices[y * self.width + x])
	}

	/// Sets the index at `(x, y)`. Returns `false` outside the frame.
	pub fn set(&mut self, x: usize, y: usize, index: u8) -> bool {
		if x >= self.width || y >= self.height {
			return false;
		}
		self.indices[y * self.width + x] = index;
		true
	}

	/// Returns one row of indices.
	///
	/// # Panics
	///
	/// Panics if `y >= height`.
	#[inline]
	pub fn row(&self, y: usize) -> &[u8] {
		let start = y * self.width;
		&self.indices[start..start + self.width]
	}

	/// Returns an iterator over the rows of the frame.
	pub fn rows(&self) -> impl ExactSizeIterator<Item = &[u8]> {
		// `chunks_exact(0)` panics, a zero-width frame simply has empty rows
		(0..self.height).map(move |y| self.row(y))
	}

	/// Resolves indices through `palette` into RGBA bytes.
	///
	/// Indices past the end of the palette render as opaque black.
	pub fn to_rgba(&self, palette: &Palette) -> Vec<u8> {
		let mut rgba = Vec::with_capacity(self.indices.len() * 4);
		for &index in &self.indices {
			let color = palette.color_or_black(index);
			rgba.extend_from_slice(&[color.r, color.g, color.b, 255]);
		}
		rgba
	}
}

impl fmt::Display for Frame {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}×{} indexed frame", self.width, self.height)
	}
}
