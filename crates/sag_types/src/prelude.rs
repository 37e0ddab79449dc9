//! Prelude module for `sag_types`.
//!
//! This module provides a convenient way to import commonly used types, traits, and constants.
//!
//! # Examples
//!
//! ```
//! use sag_types::prelude::*;
//!
//! // Now you can use all common types directly
//! let palette = Palette::new(vec![Color::BLACK]).unwrap();
//! let frame = Frame::filled(4, 4, 0);
//! assert_eq!(frame.to_rgba(&palette).len(), 64);
//! ```

// File module types
#[doc(inline)]
pub use crate::file::{
	// SAG codec
	DelayUnit,
	// Errors
	ErrorKind,
	Frame,
	SagError,
	SagFile,
	SagHeader,
	decode,
	encode,
};

// Color and quantization types
#[doc(inline)]
pub use crate::color::{
	Color, ColorFrame, ColorFrequency, Palette, animation_frequency, nearest_index, quantize,
	quantize_animation, quantize_frames,
};

// Re-export the modules for advanced usage
#[doc(inline)]
pub use crate::{color, file};
