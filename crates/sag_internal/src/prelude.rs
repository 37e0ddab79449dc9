//! Prelude module for `sag_internal`.
//!
//! This module provides a convenient way to import commonly used types and traits.
//!
//! # Examples
//!
//! ```rust
//! use sag_internal::prelude::*;
//!
//! // Now you can use all common types directly
//! let palette = Palette::new(vec![Color::BLACK, Color::rgb(255, 255, 255)]).unwrap();
//! let sag = SagFile::from_frames(
//! 	vec![Frame::filled(8, 8, 0), Frame::filled(8, 8, 1)],
//! 	&[10],
//! 	DelayUnit::Centiseconds,
//! 	palette,
//! )
//! .unwrap();
//! assert_eq!(sag.uniform_delay_ms(), 100);
//!
//! // Image containers
//! let format: SourceFormat = "gif".parse().unwrap();
//! assert!(format.is_animated());
//! ```

// Re-export everything from sag_types::prelude
#[doc(inline)]
pub use sag_types::prelude::*;

// Image container support
#[doc(inline)]
pub use sag_image::{
	ImageError,
	convert::{ColorReport, ConvertOptions, RoundTrip},
	loader::{LoadOptions, SourceAnimation, SourceFormat, SourceLoader},
};

// Re-export the member crates for advanced usage
#[doc(inline)]
pub use {sag_image, sag_types};
