//! `.SAG` file format support.
//!
//! SAG is a compact animation format for small LED matrix displays. It stores
//! a single 256-color RGB palette, one delay for the whole animation and a
//! sequence of 8-bit indexed frames.
//!
//! # File Structure
//!
//! ## Header (780 bytes, big-endian)
//!
//! | Offset | Size | Field          | Description                               |
//! |--------|------|----------------|-------------------------------------------|
//! | 0x000  | 3    | `signature`    | "SAG" (0x53, 0x41, 0x47)                  |
//! | 0x003  | 1    | `version`      | 0x01                                      |
//! | 0x004  | 2    | `width`        | Image width in pixels                     |
//! | 0x006  | 2    | `height`       | Image height in pixels                    |
//! | 0x008  | 2    | `frame_count`  | Number of frames                          |
//! | 0x00A  | 2    | `frame_delay`  | Delay of every frame in milliseconds      |
//! | 0x00C  | 768  | `palette`      | 256 × RGB, unused entries zero-filled     |
//!
//! ## Frame Data
//!
//! Frames follow the header back to back. Each frame is stored row by row,
//! each row as blocks of up to 8 pixels:
//!
//! ```text
//! +------+---------------------------+
//! | mask | index × min(8, width - x) |
//! +------+---------------------------+
//! ```
//!
//! Bit `7 - i` of the mask byte is set when pixel `x + i` has the same index
//! as in the previous frame. The mask is always zero for the first frame.
//! All index bytes are written regardless of the mask, and readers skip the
//! mask, so the mask carries information for players but saves no space.
//!
//! There is no compression, checksum or trailer.
//!
//! # Examples
//!
//! ```no_run
//! use sag_types::file::sag::{DelayUnit, File};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let sag = File::open("output.sag")?;
//! println!("{}", sag.header());
//!
//! // Every frame shares one delay, converted back to GIF centiseconds
//! let delays = sag.delays(DelayUnit::Centiseconds);
//! assert_eq!(delays.len(), sag.frame_count());
//! # Ok(())
//! # }
//! ```

mod decode;
mod encode;
mod frame;


use std::fmt::Display;
use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::color::Palette;
use crate::file::SagError;

pub use decode::{decode, read_frames};
pub use encode::{encode, encoded_size, identical_mask, write_frames};
pub use frame::Frame;

/// SAG file constants.
pub mod constants {
	/// Signature bytes for `.SAG` files
	pub const MAGIC: [u8; 3] = *b"SAG";

	/// Format revision written by this crate
	pub const VERSION: u8 = 0x01;

	/// Size of the fixed part of the header, before the palette
	pub const FIELDS_SIZE: usize = 12;

	/// Size of the palette block (256 entries × 3 bytes)
	pub const PALETTE_SIZE: usize = 768;

	/// Total header size in bytes
	pub const HEADER_SIZE: usize = FIELDS_SIZE + PALETTE_SIZE;

	/// Number of pixels covered by one mask byte
	pub const BLOCK_WIDTH: usize = 8;
}

/// Unit of a per-frame delay value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DelayUnit {
	/// Milliseconds, the unit stored in SAG headers
	#[default]
	Milliseconds,
	/// Hundredths of a second, the unit of GIF frame delays
	Centiseconds,
}

impl DelayUnit {
	/// Returns how many milliseconds one unit lasts.
	pub const fn millis_per_unit(self) -> u32 {
		match self {
			DelayUnit::Milliseconds => 1,
			DelayUnit::Centiseconds => 10,
		}
	}

	/// Converts a delay in this unit to milliseconds.
	pub fn to_millis(self, value: u32) -> u64 {
		u64::from(value) * u64::from(self.millis_per_unit())
	}

	/// Converts milliseconds to this unit, rounding down.
	pub fn from_millis(self, millis: u32) -> u32 {
		millis / self.millis_per_unit()
	}
}

/// Header structure for `.SAG` files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
	magic: [u8; 3],
	version: u8,
	width: u16,
	height: u16,
	frame_count: u16,
	frame_delay: u16,
	palette: Palette,
}

impl Default for Header {
	fn default() -> Self {
		Self {
			magic: constants::MAGIC,
			version: constants::VERSION,
			width: 0,
			height: 0,
			frame_count: 0,
			frame_delay: 0,
			palette: Palette::default(),
		}
	}
}

impl Header {
	/// Size of the header in bytes
	pub const SIZE: usize = constants::HEADER_SIZE;

	/// Creates a header for the given animation parameters.
	pub fn new(width: u16, height: u16, frame_count: u16, frame_delay: u16, palette: Palette) -> Self {
		Self {
			width,
			height,
			frame_count,
			frame_delay,
			palette,
			..Self::default()
		}
	}

	/// Returns the signature bytes.
	pub fn magic(&self) -> [u8; 3] {
		self.magic
	}

	/// Returns the format version.
	pub fn version(&self) -> u8 {
		self.version
	}

	/// Returns the width of the image in pixels.
	pub fn width(&self) -> u16 {
		self.width
	}

	/// Returns the height of the image in pixels.
	pub fn height(&self) -> u16 {
		self.height
	}

	/// Returns the number of frames.
	pub fn frame_count(&self) -> u16 {
		self.frame_count
	}

	/// Returns the delay shared by every frame, in milliseconds.
	///
	/// The format has no per-frame timing.
	pub fn frame_delay(&self) -> u16 {
		self.frame_delay
	}

	/// Returns the color palette.
	pub fn palette(&self) -> &Palette {
		&self.palette
	}

	/// Returns the size of one encoded frame in bytes.
	pub fn frame_size(&self) -> usize {
		encode::frame_size(self.width as usize, self.height as usize)
	}

	/// Parses a `.SAG` header from the given byte slice.
	///
	/// # Errors
	///
	/// - [`SagError::InsufficientData`] if fewer than 780 bytes are given
	/// - [`SagError::InvalidMagic`] if the signature is not "SAG"
	pub fn from_bytes(data: &[u8]) -> Result<Header, SagError> {
		if data.len() < constants::HEADER_SIZE {
			return Err(SagError::InsufficientData {
				expected: constants::HEADER_SIZE,
				actual: data.len(),
			});
		}

		let magic = [data[0], data[1], data[2]];
		if magic != constants::MAGIC {
			return Err(SagError::InvalidMagic {
				expected: constants::MAGIC,
				actual: magic,
			});
		}

		let version = data[3];
		let width = u16::from_be_bytes([data[4], data[5]]);
		let height = u16::from_be_bytes([data[6], data[7]]);
		let frame_count = u16::from_be_bytes([data[8], data[9]]);
		let frame_delay = u16::from_be_bytes([data[10], data[11]]);

		let mut palette_bytes = [0u8; constants::PALETTE_SIZE];
		palette_bytes.copy_from_slice(&data[constants::FIELDS_SIZE..constants::HEADER_SIZE]);

		Ok(Header {
			magic,
			version,
			width,
			height,
			frame_count,
			frame_delay,
			palette: Palette::from_header_bytes(&palette_bytes),
		})
	}

	/// Loads a `.SAG` header from any reader
	///
	/// This allows peeking at the dimensions without decoding any frame.
	///
	/// # Example
	///
	/// ```no_run
	/// use sag_types::file::sag::Header;
	/// use std::fs::File;
	///
	/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
	/// let mut file = File::open("output.sag")?;
	/// let header = Header::from_reader(&mut file)?;
	///
	/// if header.width() > 64 || header.height() > 64 {
	///     return Err("Animation does not fit the panel".into());
	/// }
	/// # Ok(())
	/// # }
	/// ```
	pub fn from_reader<R: Read>(reader: &mut R) -> Result<Self, SagError> {
		let mut buffer = Vec::with_capacity(constants::HEADER_SIZE);
		reader.by_ref().take(constants::HEADER_SIZE as u64).read_to_end(&mut buffer)?;
		Self::from_bytes(&buffer)
	}

	/// Converts the `Header` to bytes
	pub fn to_bytes(&self) -> [u8; constants::HEADER_SIZE] {
		let mut bytes = [0u8; constants::HEADER_SIZE];

		bytes[0..3].copy_from_slice(&self.magic);
		bytes[3] = self.version;
		bytes[4..6].copy_from_slice(&self.width.to_be_bytes());
		bytes[6..8].copy_from_slice(&self.height.to_be_bytes());
		bytes[8..10].copy_from_slice(&self.frame_count.to_be_bytes());
		bytes[10..12].copy_from_slice(&self.frame_delay.to_be_bytes());
		bytes[constants::FIELDS_SIZE..].copy_from_slice(&self.palette.to_header_bytes());

		bytes
	}
}

impl Display for Header {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			".SAG File Header:\n\
			- Signature: {}\n\
			- Version: {}\n\
			- Width: {} pixels\n\
			- Height: {} pixels\n\
			- Frame Count: {}\n\
			- Frame Delay: {} ms\n\
			- Palette: {} entries",
			String::from_utf8_lossy(&self.magic),
			self.version,
			self.width,
			self.height,
			self.frame_count,
			self.frame_delay,
			self.palette.len(),
		)
	}
}

/// Representation of a complete `.SAG` animation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
	/// Header of the `.SAG` file, `frame_count` tracks `frames`
	header: Header,

	/// Indexed frames in playback order
	frames: Vec<Frame>,
}

impl File {
	/// Creates an empty animation.
	///
	/// # Errors
	///
	/// Returns [`SagError::DimensionOutOfRange`] unless both dimensions are in
	/// `1..=65535`.
	pub fn new(width: usize, height: usize, palette: Palette, delay_ms: u16) -> Result<Self, SagError> {
		let width = SagError::check_dimension("width", width)?;
		let height = SagError::check_dimension("height", height)?;

		Ok(Self {
			header: Header::new(width, height, 0, delay_ms, palette),
			frames: Vec::new(),
		})
	}

	/// Builds an animation from indexed frames.
	///
	/// Only `delays[0]` is kept: it is converted from `unit` to milliseconds
	/// and used for every frame.
	///
	/// # Errors
	///
	/// Fails if there are no frames or delays, if frames differ in size, or
	/// if a dimension, the frame count or the delay does not fit 16 bits.
	pub fn from_frames(
		frames: Vec<Frame>,
		delays: &[u32],
		unit: DelayUnit,
		palette: Palette,
	) -> Result<Self, SagError> {
		let header = encode::build_header(&frames, delays, unit, palette)?;
		Ok(Self {
			header,
			frames,
		})
	}

	/// Returns a reference to the header of the `.SAG` file
	pub fn header(&self) -> &Header {
		&self.header
	}

	/// Returns the image width in pixels.
	pub fn width(&self) -> usize {
		self.header.width as usize
	}

	/// Returns the image height in pixels.
	pub fn height(&self) -> usize {
		self.header.height as usize
	}

	/// Returns the shared color palette.
	pub fn palette(&self) -> &Palette {
		&self.header.palette
	}

	/// Returns the number of frames.
	pub fn frame_count(&self) -> usize {
		self.frames.len()
	}

	/// Returns the single delay used by every frame, in milliseconds.
	pub fn uniform_delay_ms(&self) -> u16 {
		self.header.frame_delay
	}

	/// Returns one delay per frame, converted to `unit`.
	///
	/// All entries are equal since the format stores a single delay.
	pub fn delays(&self, unit: DelayUnit) -> Vec<u32> {
		vec![unit.from_millis(u32::from(self.header.frame_delay)); self.frames.len()]
	}

	/// Returns the frames in playback order.
	pub fn frames(&self) -> &[Frame] {
		&self.frames
	}

	/// Returns an iterator over the frames.
	pub fn iter(&self) -> std::slice::Iter<'_, Frame> {
		self.frames.iter()
	}

	/// Appends a frame.
	///
	/// # Errors
	///
	/// - [`SagError::FrameSizeMismatch`] if the frame size differs from the header
	/// - [`SagError::FrameCountOutOfRange`] if the animation already has 65535 frames
	pub fn add_frame(&mut self, frame: Frame) -> Result<(), SagError> {
		let expected = (self.width(), self.height());
		let actual = (frame.width(), frame.height());
		if actual != expected {
			return Err(SagError::FrameSizeMismatch {
				index: self.frames.len(),
				expected,
				actual,
			});
		}

		let count = self.frames.len() + 1;
		self.header.frame_count =
			u16::try_from(count).map_err(|_| SagError::FrameCountOutOfRange(count))?;
		self.frames.push(frame);
		Ok(())
	}

	/// Opens and parses a `.SAG` file from the specified path
	pub fn open(path: impl AsRef<Path>) -> Result<Self, SagError> {
		let file = std::fs::File::open(path)?;
		let mut reader = std::io::BufReader::new(file);
		Self::from_reader(&mut reader)
	}

	/// Parses a `.SAG` file from a byte slice
	pub fn from_bytes(data: &[u8]) -> Result<Self, SagError> {
		let mut cursor = std::io::Cursor::new(data);
		Self::from_reader(&mut cursor)
	}

	/// Parses a `.SAG` file from any reader in a single sequential pass
	pub fn from_reader<R: Read>(reader: &mut R) -> Result<Self, SagError> {
		let header = Header::from_reader(reader)?;
		let frames = read_frames(reader, &header)?;
		Ok(Self {
			header,
			frames,
		})
	}

	/// Writes the header and every frame to `writer`.
	pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), SagError> {
		writer.write_all(&self.header.to_bytes())?;
		write_frames(writer, &self.frames)
	}

	/// Serializes the `.SAG` file to bytes
	pub fn to_bytes(&self) -> Result<Vec<u8>, SagError> {
		let mut data = Vec::with_capacity(encoded_size(self.width(), self.height(), self.frames.len()));
		self.write_to(&mut data)?;
		Ok(data)
	}

	/// Saves the `.SAG` file to disk
	pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SagError> {
		let file = std::fs::File::create(path)?;
		let mut writer = std::io::BufWriter::new(file);
		self.write_to(&mut writer)?;
		writer.flush()?;
		Ok(())
	}
}

impl Display for File {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"SAG File: {}x{}, {} frames, {} ms per frame",
			self.header.width,
			self.header.height,
			self.frames.len(),
			self.header.frame_delay
		)
	}
}

impl<'a> IntoIterator for &'a File {
	type Item = &'a Frame;
	type IntoIter = std::slice::Iter<'a, Frame>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}
