//! SAG animation CLI utility
//!
//! A command-line tool for converting animated images to SAG files and back.
//!
//! # Features
//!
//! - **encode**: Convert a GIF, TIFF or WebP file to SAG
//! - **decode**: Convert a SAG file to a looping GIF
//! - **info**: Print the header (and optionally the palette) of a SAG file
//! - **verify**: Check the SAG encoder/decoder round trip on a file
//! - **colors**: List the most frequent colors of a source image
//!
//! # Usage
//!
//! ```bash
//! # Encode an animated GIF, the format is taken from the extension
//! sag_utils encode input.gif output.sag
//!
//! # Encode a still image with an explicit format
//! sag_utils encode photo.img output.sag --format tiff
//!
//! # Decode back to GIF
//! sag_utils decode output.sag preview.gif
//!
//! # Dump the header as JSON
//! sag_utils info output.sag --json --palette
//!
//! # Show the 8 most common colors and where orange would land
//! sag_utils colors input.gif --top 8 --nearest ff8000
//! ```
//!
//! Settings are read from `sag.toml` (or `--config`) and `SAG_*` environment
//! variables, command-line flags win.

mod settings;

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use log::{info, warn};
use sag_rs::prelude::*;
use sag_rs::sag_image::convert::{
	analyze_colors, animation_to_sag, decode_file, encode_file, verify_gif, verify_roundtrip,
};
use sag_rs::sag_image::loader::load;
use serde::Serialize;

use crate::settings::Settings;

fn main() -> ExitCode {
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

	let cli = Cli::parse();
	match run(cli) {
		Ok(()) => ExitCode::SUCCESS,
		Err(err) => {
			eprintln!("error: {err:#}");
			ExitCode::FAILURE
		}
	}
}

#[derive(Parser)]
#[command(name = "sag_utils")]
#[command(author = "sag-rs project")]
#[command(version)]
#[command(about = "SAG animation utility - encode, decode, inspect and verify SAG files", long_about = None)]
struct Cli {
	/// Settings file (TOML)
	#[arg(short, long, global = true, value_name = "FILE", env = "SAG_CONFIG")]
	config: Option<PathBuf>,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand)]
enum Command {
	/// Encode a GIF, TIFF or WebP file to SAG
	Encode(EncodeArgs),
	/// Decode a SAG file to an animated GIF
	Decode(DecodeArgs),
	/// Print information about a SAG file
	Info(InfoArgs),
	/// Verify the encode/decode round trip for a source or SAG file
	Verify(VerifyArgs),
	/// List the most frequent colors of a GIF, TIFF or WebP file
	Colors(ColorsArgs),
}

#[derive(Args)]
struct EncodeArgs {
	/// Input image path
	#[arg(value_name = "INPUT")]
	input: PathBuf,

	/// Output SAG file path
	#[arg(value_name = "OUTPUT_SAG")]
	output: PathBuf,

	/// Source format (gif, tiff, webp), guessed from the extension if omitted
	#[arg(short, long, value_name = "FORMAT")]
	format: Option<SourceFormat>,

	/// Maximum palette size (1-256)
	#[arg(short, long, value_name = "COUNT", value_parser = clap::value_parser!(u16).range(1..=256))]
	max_colors: Option<u16>,

	/// Delay for single-frame sources, in milliseconds
	#[arg(long, value_name = "MS")]
	delay_ms: Option<u32>,

	/// Do not dither single-frame sources
	#[arg(long, default_value_t = false)]
	no_dither: bool,
}

#[derive(Args)]
struct DecodeArgs {
	/// Input SAG file path
	#[arg(value_name = "INPUT_SAG")]
	input: PathBuf,

	/// Output GIF file path
	#[arg(value_name = "OUTPUT_GIF")]
	output: PathBuf,
}

#[derive(Args)]
struct InfoArgs {
	/// Input SAG file path
	#[arg(value_name = "INPUT_SAG")]
	input: PathBuf,

	/// Print JSON instead of text
	#[arg(long, default_value_t = false)]
	json: bool,

	/// Include the palette colors
	#[arg(short, long, default_value_t = false)]
	palette: bool,
}

#[derive(Args)]
struct VerifyArgs {
	/// Input path, either a SAG file or a source image
	#[arg(value_name = "INPUT")]
	input: PathBuf,

	/// Source format for non-SAG inputs, guessed from the extension if omitted
	#[arg(short, long, value_name = "FORMAT")]
	format: Option<SourceFormat>,
}

#[derive(Args)]
struct ColorsArgs {
	/// Input image path
	#[arg(value_name = "INPUT")]
	input: PathBuf,

	/// Source format (gif, tiff, webp), guessed from the extension if omitted
	#[arg(short, long, value_name = "FORMAT")]
	format: Option<SourceFormat>,

	/// Number of colors to list
	#[arg(short, long, value_name = "COUNT", default_value_t = 16)]
	top: usize,

	/// Also print the palette entry this color maps to
	#[arg(short, long, value_name = "RRGGBB", value_parser = parse_rgb)]
	nearest: Option<Color>,
}

/// Parses `RRGGBB` or `#RRGGBB` into an opaque color.
fn parse_rgb(value: &str) -> Result<Color, String> {
	let digits = value.strip_prefix('#').unwrap_or(value);
	let bytes = hex::decode(digits).map_err(|err| format!("invalid color '{value}': {err}"))?;
	let rgb: [u8; 3] = bytes
		.try_into()
		.map_err(|_| format!("invalid color '{value}': expected 6 hex digits"))?;
	Ok(Color::from(rgb))
}

fn run(cli: Cli) -> Result<()> {
	let settings = Settings::load(cli.config.as_deref())?;

	match cli.command {
		Command::Encode(args) => run_encode(args, settings),
		Command::Decode(args) => run_decode(args),
		Command::Info(args) => run_info(args),
		Command::Verify(args) => run_verify(args, settings),
		Command::Colors(args) => run_colors(args, settings),
	}
}

fn resolve_format(input: &Path, format: Option<SourceFormat>) -> Result<SourceFormat> {
	match format {
		Some(format) => Ok(format),
		None => SourceFormat::from_path(input)
			.with_context(|| format!("Cannot guess the format of {}, use --format", input.display())),
	}
}

fn run_encode(args: EncodeArgs, mut settings: Settings) -> Result<()> {
	if let Some(max_colors) = args.max_colors {
		settings.max_colors = usize::from(max_colors);
	}
	if let Some(delay_ms) = args.delay_ms {
		settings.default_delay_ms = delay_ms;
	}
	if args.no_dither {
		settings.dither_single_frame = false;
	}
	settings.validate()?;

	let format = resolve_format(&args.input, args.format)?;
	let sag = encode_file(&args.input, &args.output, format, settings.convert_options())
		.with_context(|| format!("Failed to encode {}", args.input.display()))?;

	info!(
		"Encoded {} -> {} ({}x{}, {} frames, {} ms, {} colors)",
		args.input.display(),
		args.output.display(),
		sag.width(),
		sag.height(),
		sag.frame_count(),
		sag.uniform_delay_ms(),
		sag.palette().len()
	);
	Ok(())
}

fn run_decode(args: DecodeArgs) -> Result<()> {
	let sag = decode_file(&args.input, &args.output)
		.with_context(|| format!("Failed to decode {}", args.input.display()))?;

	info!(
		"Decoded {} -> {} ({}x{}, {} frames)",
		args.input.display(),
		args.output.display(),
		sag.width(),
		sag.height(),
		sag.frame_count()
	);
	Ok(())
}

/// Header summary printed by `info`.
#[derive(Serialize)]
struct InfoReport {
	file: String,
	version: u8,
	width: u16,
	height: u16,
	frame_count: u16,
	frame_delay_ms: u16,
	/// Header plus frame data as the header describes it
	encoded_size: usize,
	/// Size on disk, trailing bytes included
	file_size: u64,
	used_indices: usize,
	#[serde(skip_serializing_if = "Option::is_none")]
	palette: Option<Vec<String>>,
}

impl InfoReport {
	fn new(path: &Path, sag: &SagFile, with_palette: bool) -> Result<Self> {
		let file_size = fs::metadata(path).with_context(|| format!("Failed to stat {}", path.display()))?.len();
		let header = sag.header();
		let used: BTreeSet<u8> = sag.iter().flat_map(|frame| frame.pixels().iter().copied()).collect();

		// trailing black slots are padding, keep entries up to the last used index
		let palette = with_palette.then(|| {
			let count = used.last().map_or(0, |&max| max as usize + 1);
			sag.palette().iter().take(count).map(|color| hex::encode(color.to_rgb())).collect()
		});

		Ok(Self {
			file: path.display().to_string(),
			version: header.version(),
			width: header.width(),
			height: header.height(),
			frame_count: header.frame_count(),
			frame_delay_ms: header.frame_delay(),
			encoded_size: SagHeader::SIZE + header.frame_size() * sag.frame_count(),
			file_size,
			used_indices: used.len(),
			palette,
		})
	}
}

fn run_info(args: InfoArgs) -> Result<()> {
	let sag = SagFile::open(&args.input).with_context(|| format!("Failed to read {}", args.input.display()))?;
	let report = InfoReport::new(&args.input, &sag, args.palette)?;

	if args.json {
		println!("{}", serde_json::to_string_pretty(&report)?);
		return Ok(());
	}

	println!("{}", sag.header());
	println!("- Used Indices: {}", report.used_indices);
	println!("- Encoded Size: {} bytes", report.encoded_size);
	println!("- File Size: {} bytes", report.file_size);
	if let Some(palette) = &report.palette {
		for (index, color) in palette.iter().enumerate() {
			println!("  [{index:3}] #{color}");
		}
	}
	Ok(())
}

fn run_verify(args: VerifyArgs, settings: Settings) -> Result<()> {
	let is_sag = args.input.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("sag"));

	let (sag, source_delays) = if is_sag && args.format.is_none() {
		let sag = SagFile::open(&args.input).with_context(|| format!("Failed to read {}", args.input.display()))?;
		let delays = sag.delays(DelayUnit::Milliseconds);
		(sag, delays)
	} else {
		let format = resolve_format(&args.input, args.format)?;
		let options = settings.convert_options();
		let animation = load(&args.input, format, options.load)
			.with_context(|| format!("Failed to load {}", args.input.display()))?;
		let sag = animation_to_sag(&animation, options.max_colors)?;
		(sag, animation.delays_ms)
	};

	let report = verify_roundtrip(&sag, &source_delays).context("Round trip failed")?;
	if report.frame_count != source_delays.len() {
		bail!("Expected {} frames, decoded {}", source_delays.len(), report.frame_count);
	}
	if report.lost_delays > 0 {
		warn!("{} frame delays differ from the stored {} ms", report.lost_delays, report.delay_ms);
	}
	let gif_size = verify_gif(&sag).context("GIF rendering failed")?;

	info!(
		"Verified {}: {} frames, {} bytes ({} as GIF), {} ms per frame",
		args.input.display(),
		report.frame_count,
		report.encoded_bytes,
		gif_size,
		report.delay_ms
	);
	Ok(())
}

fn run_colors(args: ColorsArgs, settings: Settings) -> Result<()> {
	let format = resolve_format(&args.input, args.format)?;
	let report = analyze_colors(&args.input, format, settings.convert_options(), args.top)
		.with_context(|| format!("Failed to load {}", args.input.display()))?;

	println!(
		"{}: {} pixels, {} distinct colors, {} palette entries",
		args.input.display(),
		report.total_pixels,
		report.distinct_colors,
		report.palette.len()
	);
	for (rank, (color, count)) in report.top.iter().enumerate() {
		let share = *count as f64 * 100.0 / report.total_pixels.max(1) as f64;
		println!("  {:3}. #{} {:>10} {:6.2}%", rank + 1, hex::encode(color.to_rgb()), count, share);
	}

	if let Some(color) = args.nearest {
		match report.nearest(color) {
			Some((index, entry)) => {
				println!("#{} -> [{index}] #{}", hex::encode(color.to_rgb()), hex::encode(entry.to_rgb()))
			}
			None => warn!("Palette is empty, no nearest color"),
		}
	}
	Ok(())
}
