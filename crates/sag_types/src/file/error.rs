//! Error types for SAG parsing, encoding and quantization.

use thiserror::Error;

/// Broad classification of a [`SagError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	/// The byte stream is not a well-formed SAG file
	Format,
	/// A value does not fit the fixed-width fields of the format
	Bounds,
	/// The underlying reader or writer failed
	Io,
}

/// Errors that can occur when reading, writing or building SAG files
#[derive(Debug, Error)]
pub enum SagError {
	/// Not enough data to parse the header
	#[error("Insufficient data: expected {expected} bytes, got {actual} bytes")]
	InsufficientData {
		/// Expected number of bytes
		expected: usize,
		/// Actual number of bytes
		actual: usize,
	},

	/// Invalid signature
	#[error("Invalid signature: expected {expected:02X?}, got {actual:02X?}")]
	InvalidMagic {
		/// Expected signature bytes
		expected: [u8; 3],
		/// Signature bytes found in the stream
		actual: [u8; 3],
	},

	/// Frame data ended before a block was complete
	#[error("Truncated frame data: frame {frame}, row {row}, column {column}")]
	TruncatedFrame {
		/// Frame index (0-based)
		frame: usize,
		/// Row of the incomplete block
		row: usize,
		/// First column of the incomplete block
		column: usize,
	},

	/// Width or height does not fit in 1..=65535
	#[error("{dimension} {value} is out of range (1..=65535)")]
	DimensionOutOfRange {
		/// Name of the dimension ("width" or "height")
		dimension: &'static str,
		/// Offending value
		value: usize,
	},

	/// More frames than the 16-bit frame count can hold
	#[error("Frame count {0} exceeds 65535")]
	FrameCountOutOfRange(usize),

	/// Delay does not fit the 16-bit millisecond field
	#[error("Frame delay {0} ms exceeds 65535")]
	DelayOutOfRange(u64),

	/// Palette holds more than 256 colors
	#[error("Palette has {0} colors (maximum 256)")]
	PaletteTooLarge(usize),

	/// A frame's dimensions differ from the animation's
	#[error(
		"Frame {index} is {}x{}, expected {}x{}",
		.actual.0,
		.actual.1,
		.expected.0,
		.expected.1
	)]
	FrameSizeMismatch {
		/// Frame index (0-based)
		index: usize,
		/// Animation dimensions
		expected: (usize, usize),
		/// Frame dimensions
		actual: (usize, usize),
	},

	/// Pixel buffer length does not match `width * height`
	#[error("Pixel count mismatch: expected {expected}, got {actual}")]
	PixelCountMismatch {
		/// Expected number of pixels
		expected: usize,
		/// Actual number of pixels
		actual: usize,
	},

	/// An animation needs at least one frame and one delay
	#[error("Animation has no frames")]
	EmptyAnimation,

	/// IO error
	#[error(transparent)]
	IOError(#[from] std::io::Error),
}

impl SagError {
	/// Returns the category this error belongs to.
	pub fn kind(&self) -> ErrorKind {
		match self {
			SagError::InsufficientData {
				..
			}
			| SagError::InvalidMagic {
				..
			}
			| SagError::TruncatedFrame {
				..
			} => ErrorKind::Format,
			SagError::IOError(_) => ErrorKind::Io,
			_ => ErrorKind::Bounds,
		}
	}

	/// Checks that `value` can be stored as a width or height.
	pub(crate) fn check_dimension(dimension: &'static str, value: usize) -> Result<u16, SagError> {
		match u16::try_from(value) {
			Ok(v) if v > 0 => Ok(v),
			_ => Err(SagError::DimensionOutOfRange {
				dimension,
				value,
			}),
		}
	}
}
