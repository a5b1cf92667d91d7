//! dehaze - dark-channel-prior haze removal for still images.
//!
//! Drives the streaming pipeline (or the offline two-pass path) over a
//! binary PPM image and writes the restored result.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use dehaze_core::{AirlightReset, DehazeConfig, FrameTiming, OverflowMode, DEFAULT_T0};
use dehaze_stream::{dehaze_frame_in_place, estimate_airlight, Dehazer};
use tracing_subscriber::EnvFilter;

mod ppm;

#[derive(Parser)]
#[command(name = "dehaze")]
#[command(author, version, about = "Dark-channel-prior dehazing (PPM in/out)")]
#[command(long_about = "
Removes atmospheric haze from 8-bit RGB images using the dark-channel
prior, with the same integer-only arithmetic as the streaming pipeline.

Examples:
  dehaze hazy.ppm clear.ppm
  dehaze hazy.ppm clear.ppm --t0 40 --overflow saturate
  dehaze hazy.ppm clear.ppm --engine frame     # offline two-pass path
")]
struct Cli {
    /// Input image (binary PPM, P6)
    input: PathBuf,

    /// Output image (binary PPM, P6)
    output: PathBuf,

    /// Minimum transmittance floor (1-255)
    #[arg(long, default_value_t = DEFAULT_T0)]
    t0: u8,

    /// Atmospheric-light accumulator lifetime
    #[arg(long, value_enum, default_value = "per-frame")]
    airlight_reset: ResetArg,

    /// Out-of-range handling for restored values
    #[arg(long, value_enum, default_value = "wrap")]
    overflow: OverflowArg,

    /// Processing engine
    #[arg(long, value_enum, default_value = "stream")]
    engine: EngineArg,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum ResetArg {
    /// Clear the estimate at each frame boundary
    PerFrame,
    /// Keep the estimate until pipeline reset
    Persistent,
}

impl From<ResetArg> for AirlightReset {
    fn from(v: ResetArg) -> Self {
        match v {
            ResetArg::PerFrame => AirlightReset::PerFrame,
            ResetArg::Persistent => AirlightReset::Persistent,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum OverflowArg {
    /// Bit-exact truncation; out-of-range values wrap
    Wrap,
    /// Clamp out-of-range values to 255
    Saturate,
}

impl From<OverflowArg> for OverflowMode {
    fn from(v: OverflowArg) -> Self {
        match v {
            OverflowArg::Wrap => OverflowMode::Wrap,
            OverflowArg::Saturate => OverflowMode::Saturate,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum EngineArg {
    /// Tick-accurate streaming pipeline with synthesized frame timing
    Stream,
    /// Offline two-pass path (frame-wide estimate, then restore)
    Frame,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    let config = DehazeConfig::new(cli.t0)
        .context("invalid --t0")?
        .with_airlight_reset(cli.airlight_reset.into())
        .with_overflow(cli.overflow.into());

    let mut img = ppm::read_ppm(&cli.input)?;
    tracing::info!(
        width = img.width,
        height = img.height,
        airlight = estimate_airlight(&img.pixels),
        "loaded image"
    );

    match cli.engine {
        EngineArg::Stream => {
            let timing = FrameTiming::new(img.width, img.height)
                .context("building frame timing")?;
            let mut dehazer = Dehazer::new(config);
            img.pixels = dehazer
                .process_frame(&img.pixels, timing)
                .context("streaming pipeline")?;
            tracing::info!(airlight = dehazer.airlight(), "stream pass complete");
        }
        EngineArg::Frame => {
            dehaze_frame_in_place(&mut img.pixels, &config);
        }
    }

    ppm::write_ppm(&cli.output, &img.pixels, img.width, img.height)?;
    tracing::info!(output = %cli.output.display(), "wrote restored image");
    Ok(())
}
