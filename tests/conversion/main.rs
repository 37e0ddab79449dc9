//! Conversion tests for `sag-rs`: source images through SAG and back.

mod gif;
mod still;

use std::path::PathBuf;

use image::{Rgba, RgbaImage};
use rand::{Rng, SeedableRng, rngs::SmallRng};

/// Colors used to build test images
pub(crate) const COLORS: [Rgba<u8>; 4] =
	[Rgba([0, 0, 0, 255]), Rgba([255, 0, 0, 255]), Rgba([0, 255, 0, 255]), Rgba([255, 255, 255, 255])];

/// Returns a path in the temp directory unique to this test process.
pub(crate) fn temp_path(name: &str) -> PathBuf {
	std::env::temp_dir().join(format!("sag_rs_{}_{name}", std::process::id()))
}

/// Builds `count` random frames drawn from [`COLORS`].
pub(crate) fn random_frames(seed: u64, width: u32, height: u32, count: usize) -> Vec<RgbaImage> {
	let mut rng = SmallRng::seed_from_u64(seed);
	(0..count)
		.map(|_| RgbaImage::from_fn(width, height, |_, _| COLORS[rng.random_range(0..COLORS.len())]))
		.collect()
}
