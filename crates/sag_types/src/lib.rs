//! This crate provides the core data types and the `.SAG` codec for the `sag-rs` project.
//!
//! # Modules
//!
//! - **`file::sag`**: `.SAG` header, indexed frames, encoder and decoder
//! - **`color`**: colors, exact-color frequency tables, palette extraction and
//!   nearest-color quantization
//!
//! This crate performs no logging and knows nothing about GIF, TIFF or WebP.
//! Loading source images and writing GIF output live in `sag_image`.
//!
//! # Examples
//!
//! Using the prelude (recommended):
//!
//! ```
//! use sag_types::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let black = Color::BLACK;
//! let white = Color::rgb(255, 255, 255);
//! let frames = [
//! 	ColorFrame::new(2, 1, vec![black, white])?,
//! 	ColorFrame::new(2, 1, vec![white, white])?,
//! ];
//!
//! let (palette, indexed) = quantize_animation(&frames, 256)?;
//! let data = encode(&indexed, &[100, 100], DelayUnit::Milliseconds, &palette)?;
//!
//! let (decoded, delays) = decode(&data, DelayUnit::Milliseconds)?;
//! assert_eq!(decoded, indexed);
//! assert_eq!(delays, vec![100, 100]);
//! # Ok(())
//! # }
//! ```
//!
//! Or use explicit paths:
//!
//! ```no_run
//! use sag_types::file::sag::File;
//!
//! let sag = File::open("animation.sag");
//! // ...
//! ```

pub mod color;
pub mod file;

/// `use sag_types::prelude::*;` to import commonly used items.
pub mod prelude;
