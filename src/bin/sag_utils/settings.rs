//! Layered settings: built-in defaults, optional TOML file, `SAG_*` environment.

use std::path::Path;

use anyhow::{Context, Result, bail};
use sag_rs::prelude::{ConvertOptions, LoadOptions, Palette};
use serde::{Deserialize, Serialize};

/// Settings file read when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "sag.toml";

/// Conversion settings shared by every subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
	/// Palette size cap
	pub max_colors: usize,
	/// Delay for single-frame sources, in milliseconds
	pub default_delay_ms: u32,
	/// Dither single-frame sources before quantization
	pub dither_single_frame: bool,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			max_colors: Palette::MAX_COLORS,
			default_delay_ms: 100,
			dither_single_frame: true,
		}
	}
}

impl Settings {
	/// Loads settings from `path` (optional unless given explicitly) and the
	/// environment, on top of the defaults.
	pub fn load(path: Option<&Path>) -> Result<Self> {
		let file = match path {
			Some(path) => config::File::from(path).required(true),
			None => config::File::from(Path::new(DEFAULT_CONFIG_FILE)).required(false),
		};

		let config = config::Config::builder()
			.add_source(file)
			.add_source(config::Environment::with_prefix("SAG").try_parsing(true))
			.build()
			.context("Failed to read settings")?;

		Self::from_config(config)
	}

	/// Deserializes and validates settings from an assembled `config::Config`.
	pub fn from_config(config: config::Config) -> Result<Self> {
		let settings = config.try_deserialize::<Settings>().context("Invalid settings")?;
		settings.validate()?;
		Ok(settings)
	}

	/// Rejects values the pipeline would otherwise clamp or misuse.
	pub fn validate(&self) -> Result<()> {
		if !(1..=Palette::MAX_COLORS).contains(&self.max_colors) {
			bail!("max_colors must be between 1 and {}, got {}", Palette::MAX_COLORS, self.max_colors);
		}
		if self.default_delay_ms > u32::from(u16::MAX) {
			bail!("default_delay_ms must be at most {}, got {}", u16::MAX, self.default_delay_ms);
		}
		Ok(())
	}

	/// Returns the pipeline options for these settings.
	pub fn convert_options(&self) -> ConvertOptions {
		ConvertOptions {
			max_colors: self.max_colors,
			load: LoadOptions {
				default_delay_ms: self.default_delay_ms,
				dither_single_frame: self.dither_single_frame,
			},
		}
	}
}
