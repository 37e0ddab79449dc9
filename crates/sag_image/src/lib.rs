//! Image container support for the `sag-rs` project.
//!
//! This crate connects the SAG codec in `sag_types` to common image formats
//! through the `image` crate:
//!
//! - [`loader`]: GIF, TIFF and WebP sources decoded to full-color frames
//! - [`writer`]: decoded SAG animations written back as looping GIFs
//! - [`convert`]: the quantize-and-encode pipeline tying both together
//!
//! # Examples
//!
//! ```no_run
//! use sag_image::convert::{ConvertOptions, decode_file, encode_file};
//! use sag_image::loader::SourceFormat;
//!
//! # fn main() -> Result<(), sag_image::ImageError> {
//! let sag = encode_file("input.gif", "output.sag", SourceFormat::Gif, ConvertOptions::default())?;
//! println!("{sag}");
//!
//! decode_file("output.sag", "preview.gif")?;
//! # Ok(())
//! # }
//! ```

mod error;

pub mod convert;
pub mod loader;
pub mod writer;

pub use error::ImageError;
