//! SAG frame encoder.

use std::io::Write;

use super::{DelayUnit, Frame, Header, constants};
use crate::color::Palette;
use crate::file::SagError;

/// Size in bytes of one encoded row: index bytes plus one mask per block.
#[inline]
pub(crate) fn row_size(width: usize) -> usize {
	width + width.div_ceil(constants::BLOCK_WIDTH)
}

/// Size in bytes of one encoded frame.
#[inline]
pub(crate) fn frame_size(width: usize, height: usize) -> usize {
	row_size(width) * height
}

/// Returns the total size of an encoded animation, header included.
pub fn encoded_size(width: usize, height: usize, frame_count: usize) -> usize {
	constants::HEADER_SIZE + frame_size(width, height) * frame_count
}

/// Computes the identical-pixel mask of one block.
///
/// Bit `7 - i` is set when `current[i] == previous[i]`. Without a previous
/// frame the mask is 0. At most the first 8 pixels are considered.
pub fn identical_mask(current: &[u8], previous: Option<&[u8]>) -> u8 {
	let Some(previous) = previous else {
		return 0;
	};

	current
		.iter()
		.zip(previous)
		.take(constants::BLOCK_WIDTH)
		.enumerate()
		.filter(|(_, (a, b))| a == b)
		.fold(0u8, |mask, (i, _)| mask | (0x80 >> i))
}

/// Checks that every frame has the size of the first one.
fn check_frame_sizes(frames: &[Frame]) -> Result<(), SagError> {
	let Some(first) = frames.first() else {
		return Ok(());
	};

	let expected = (first.width(), first.height());
	for (index, frame) in frames.iter().enumerate().skip(1) {
		let actual = (frame.width(), frame.height());
		if actual != expected {
			return Err(SagError::FrameSizeMismatch {
				index,
				expected,
				actual,
			});
		}
	}
	Ok(())
}

/// Validates an animation and builds its header.
pub(crate) fn build_header(
	frames: &[Frame],
	delays: &[u32],
	unit: DelayUnit,
	palette: Palette,
) -> Result<Header, SagError> {
	let (Some(first), Some(&delay)) = (frames.first(), delays.first()) else {
		return Err(SagError::EmptyAnimation);
	};
	check_frame_sizes(frames)?;

	let expected = (first.width(), first.height());
	let width = SagError::check_dimension("width", expected.0)?;
	let height = SagError::check_dimension("height", expected.1)?;
	let frame_count =
		u16::try_from(frames.len()).map_err(|_| SagError::FrameCountOutOfRange(frames.len()))?;

	let delay_ms = unit.to_millis(delay);
	let frame_delay = u16::try_from(delay_ms).map_err(|_| SagError::DelayOutOfRange(delay_ms))?;

	Ok(Header::new(width, height, frame_count, frame_delay, palette))
}

/// Writes the frame data section for `frames`.
///
/// Each frame is compared against the one before it to fill the block masks.
/// Nothing is written unless all frames share the size of the first one.
///
/// # Errors
///
/// [`SagError::FrameSizeMismatch`] for a frame of a different size, or any
/// write error.
pub fn write_frames<W: Write>(writer: &mut W, frames: &[Frame]) -> Result<(), SagError> {
	check_frame_sizes(frames)?;

	let mut previous: Option<&Frame> = None;
	let mut row_buffer = Vec::new();

	for frame in frames {
		for (y, row) in frame.rows().enumerate() {
			let previous_row = previous.map(|p| p.row(y));

			row_buffer.clear();
			for (block, indices) in row.chunks(constants::BLOCK_WIDTH).enumerate() {
				let start = block * constants::BLOCK_WIDTH;
				let previous_block = previous_row.map(|r| &r[start..start + indices.len()]);
				row_buffer.push(identical_mask(indices, previous_block));
				row_buffer.extend_from_slice(indices);
			}
			writer.write_all(&row_buffer)?;
		}
		previous = Some(frame);
	}

	Ok(())
}

/// Encodes indexed frames into a complete SAG byte stream.
///
/// Only `delays[0]` is stored, converted from `unit` to milliseconds. Every
/// later delay is dropped.
///
/// # Errors
///
/// - [`SagError::EmptyAnimation`] if `frames` or `delays` is empty
/// - [`SagError::FrameSizeMismatch`] if frames differ in size
/// - [`SagError::DimensionOutOfRange`] for a width or height of 0 or above 65535
/// - [`SagError::FrameCountOutOfRange`] for more than 65535 frames
/// - [`SagError::DelayOutOfRange`] if the first delay exceeds 65535 ms
///
/// # Example
///
/// ```
/// use sag_types::color::{Color, Palette};
/// use sag_types::file::sag::{DelayUnit, Frame, encode};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let palette = Palette::new(vec![Color::BLACK, Color::rgb(255, 255, 255)])?;
/// let frames = vec![Frame::filled(8, 8, 0), Frame::filled(8, 8, 1)];
///
/// let data = encode(&frames, &[10, 10], DelayUnit::Centiseconds, &palette)?;
/// assert_eq!(data.len(), 780 + 2 * 8 * 9);
/// # Ok(())
/// # }
/// ```
pub fn encode(
	frames: &[Frame],
	delays: &[u32],
	unit: DelayUnit,
	palette: &Palette,
) -> Result<Vec<u8>, SagError> {
	let header = build_header(frames, delays, unit, palette.clone())?;

	let mut data =
		Vec::with_capacity(encoded_size(header.width() as usize, header.height() as usize, frames.len()));
	data.extend_from_slice(&header.to_bytes());
	write_frames(&mut data, frames)?;

	Ok(data)
}
