//! Error types for loading source images and writing GIF output.

use sag_types::file::SagError;
use thiserror::Error;

/// Errors that can occur when converting between image containers and SAG files
#[derive(Debug, Error)]
pub enum ImageError {
	/// The `image` crate failed to decode or encode
	#[error("Image codec error: {0}")]
	Codec(#[from] image::ImageError),

	/// SAG encoding, decoding or quantization failed
	#[error(transparent)]
	Sag(#[from] SagError),

	/// Source format cannot be determined or is not supported
	#[error("Unsupported source format: {0}")]
	UnsupportedFormat(String),

	/// The source container holds no frames
	#[error("Source image contains no frames")]
	NoFrames,

	/// Frame dimensions do not fit an RGBA image buffer
	#[error("Cannot build a {width}x{height} image buffer")]
	FrameBuffer {
		/// Frame width in pixels
		width: usize,
		/// Frame height in pixels
		height: usize,
	},

	/// A decoded frame differs from the frame that was encoded
	#[error("Round trip mismatch at frame {0}")]
	RoundTripMismatch(usize),

	/// IO error
	#[error(transparent)]
	IOError(#[from] std::io::Error),
}
