//! SAG frame decoder.

use std::io::{Cursor, Read};

use super::{DelayUnit, Frame, Header, constants, encode::row_size};
use crate::file::SagError;

/// Reads `header.frame_count()` frames from `reader`.
///
/// The reader must be positioned right after the header. Mask bytes are read
/// and discarded, a block always holds `min(8, width - x)` index bytes.
///
/// # Errors
///
/// Returns [`SagError::TruncatedFrame`] naming the first incomplete block if
/// the stream ends early.
pub fn read_frames<R: Read>(reader: &mut R, header: &Header) -> Result<Vec<Frame>, SagError> {
	let width = header.width() as usize;
	let height = header.height() as usize;
	let frame_count = header.frame_count() as usize;

	let row_len = row_size(width);
	let mut row_buffer = Vec::with_capacity(row_len);
	let mut frames = Vec::with_capacity(frame_count);

	for frame in 0..frame_count {
		let mut indices = Vec::new();

		for row in 0..height {
			row_buffer.clear();
			reader.by_ref().take(row_len as u64).read_to_end(&mut row_buffer)?;
			if row_buffer.len() < row_len {
				return Err(SagError::TruncatedFrame {
					frame,
					row,
					column: truncated_column(width, row_buffer.len()),
				});
			}

			for block in row_buffer.chunks(constants::BLOCK_WIDTH + 1) {
				indices.extend_from_slice(&block[1..]);
			}
		}

		frames.push(Frame::from_parts(width, height, indices));
	}

	Ok(frames)
}

/// First column of the block that `filled` bytes of a row did not complete.
fn truncated_column(width: usize, filled: usize) -> usize {
	let full_blocks = filled / (constants::BLOCK_WIDTH + 1);
	(full_blocks * constants::BLOCK_WIDTH).min(width.saturating_sub(1))
}

/// Decodes a complete SAG byte stream.
///
/// Returns the frames and one delay per frame, converted from the stored
/// milliseconds to `unit` with integer division. All delays are equal.
/// Bytes after the last frame are ignored.
///
/// # Errors
///
/// - [`SagError::InsufficientData`] if the header is incomplete
/// - [`SagError::InvalidMagic`] if the signature is not "SAG"
/// - [`SagError::TruncatedFrame`] if frame data ends early
pub fn decode(data: &[u8], unit: DelayUnit) -> Result<(Vec<Frame>, Vec<u32>), SagError> {
	let header = Header::from_bytes(data)?;
	let mut cursor = Cursor::new(&data[Header::SIZE..]);
	let frames = read_frames(&mut cursor, &header)?;

	let delay = unit.from_millis(u32::from(header.frame_delay()));
	let delays = vec![delay; frames.len()];

	Ok((frames, delays))
}
