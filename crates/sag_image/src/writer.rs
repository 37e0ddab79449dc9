//! Animated GIF output for decoded SAG frames.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, RgbaImage};
use log::debug;
use sag_types::color::Palette;
use sag_types::file::{DelayUnit, Frame, SagFile};

use crate::ImageError;

/// Writes indexed frames as an infinitely looping GIF.
///
/// `delays_cs` holds one delay per frame in hundredths of a second, missing
/// entries reuse the last one.
pub fn write_gif<W: Write>(
	writer: W,
	frames: &[Frame],
	delays_cs: &[u32],
	palette: &Palette,
) -> Result<(), ImageError> {
	if frames.is_empty() {
		return Err(ImageError::NoFrames);
	}

	let mut encoder = GifEncoder::new(writer);
	encoder.set_repeat(Repeat::Infinite)?;

	let mut delay_cs = delays_cs.first().copied().unwrap_or(0);
	for (index, frame) in frames.iter().enumerate() {
		if let Some(&delay) = delays_cs.get(index) {
			delay_cs = delay;
		}

		let buffer = to_rgba_image(frame, palette)?;
		let millis = u32::try_from(DelayUnit::Centiseconds.to_millis(delay_cs)).unwrap_or(u32::MAX);
		encoder.encode_frame(image::Frame::from_parts(buffer, 0, 0, Delay::from_numer_denom_ms(millis, 1)))?;
	}

	debug!("Encoded {} GIF frames", frames.len());
	Ok(())
}

/// Writes a SAG animation as a GIF to `path`.
pub fn save_gif(sag: &SagFile, path: impl AsRef<Path>) -> Result<(), ImageError> {
	let file = fs::File::create(path)?;
	let mut writer = BufWriter::new(file);
	write_gif(&mut writer, sag.frames(), &sag.delays(DelayUnit::Centiseconds), sag.palette())?;
	writer.flush()?;
	Ok(())
}

/// Writes a SAG animation as GIF bytes.
pub fn gif_bytes(sag: &SagFile) -> Result<Vec<u8>, ImageError> {
	let mut data = Vec::new();
	write_gif(&mut data, sag.frames(), &sag.delays(DelayUnit::Centiseconds), sag.palette())?;
	Ok(data)
}

fn to_rgba_image(frame: &Frame, palette: &Palette) -> Result<RgbaImage, ImageError> {
	let error = || ImageError::FrameBuffer {
		width: frame.width(),
		height: frame.height(),
	};
	let width = u32::try_from(frame.width()).map_err(|_| error())?;
	let height = u32::try_from(frame.height()).map_err(|_| error())?;
	RgbaImage::from_raw(width, height, frame.to_rgba(palette)).ok_or_else(error)
}
