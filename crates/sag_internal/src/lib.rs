//! This module is separated into its own crate to keep the facade of `sag-rs` thin, and should not be used directly.

/// `use sag_rs::prelude::*;` to import commonly used items.
pub mod prelude;

// Re-export the member crates for convenience
pub use sag_image;
pub use sag_types;

// Re-export commonly used types at crate root
pub use sag_image::ImageError;
pub use sag_image::convert::{
	ConvertOptions, analyze_colors, convert_to_sag, decode_file, encode_file, verify_gif, verify_roundtrip,
};
pub use sag_image::loader::{LoadOptions, SourceFormat};
pub use sag_types::file::{DelayUnit, ErrorKind, SagError, SagFile, SagHeader};
