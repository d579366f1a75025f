use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use image::imageops::FilterType;
use photobooth::Effect;

/// Command line interface definition.
#[derive(Parser, Debug)]
#[command(author, version, about, propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug)]
pub struct GlobalOptions {
    /// Root directory of captured photos (one sub-directory per transaction)
    #[arg(long, env = "PHOTOBOOTH_SOURCE_DIR", default_value = "captures")]
    pub source_dir: PathBuf,
    /// Root directory of generated results (one sub-directory per transaction)
    #[arg(long, env = "PHOTOBOOTH_RESULT_DIR", default_value = "results")]
    pub result_dir: PathBuf,
    /// Directory holding the `frame-<id>.png` templates
    #[arg(long, env = "PHOTOBOOTH_FRAME_DIR", default_value = "frames")]
    pub frame_dir: PathBuf,
    /// Layout catalog JSON file
    #[arg(long, env = "PHOTOBOOTH_CATALOG", default_value = "catalog.json")]
    pub catalog: PathBuf,
    /// Effects to produce, comma separated (defaults to original,light_grayscale,sepia,summer)
    #[arg(long, env = "PHOTOBOOTH_EFFECTS", value_enum, value_delimiter = ',')]
    pub effects: Vec<EffectArg>,
    /// Filter used when scaling photos to the tile size
    #[arg(long = "resample-filter", value_enum, default_value_t = ResampleFilter::Lanczos3)]
    pub resample_filter: ResampleFilter,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply effects, compile frames and build animations for a transaction
    Generate(GenerateCommand),
    /// Recompile the frame of one effect directory
    Compile(CompileCommand),
    /// Build the preview animation of a directory
    Animate(AnimateCommand),
    /// List the frames known to the layout catalog
    Frames,
}

/// Resampling filters for image resizing.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ResampleFilter {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl From<ResampleFilter> for FilterType {
    /// Convert ResampleFilter to image::imageops::FilterType.
    fn from(value: ResampleFilter) -> Self {
        match value {
            ResampleFilter::Nearest => FilterType::Nearest,
            ResampleFilter::Triangle => FilterType::Triangle,
            ResampleFilter::CatmullRom => FilterType::CatmullRom,
            ResampleFilter::Gaussian => FilterType::Gaussian,
            ResampleFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Effects selectable from the command line, named like their result directories.
#[derive(Clone, Copy, Debug, ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum EffectArg {
    Original,
    LightGrayscale,
    Sepia,
    Summer,
    Winter,
    Invert,
}

impl From<EffectArg> for Effect {
    fn from(value: EffectArg) -> Self {
        match value {
            EffectArg::Original => Effect::Original,
            EffectArg::LightGrayscale => Effect::LightGrayscale,
            EffectArg::Sepia => Effect::Sepia,
            EffectArg::Summer => Effect::Summer,
            EffectArg::Winter => Effect::Winter,
            EffectArg::Invert => Effect::Invert,
        }
    }
}

#[derive(Args, Debug)]
pub struct GenerateCommand {
    /// Transaction id (name of the capture sub-directory)
    #[arg(long)]
    pub tx_id: String,
    /// Frame id to compile into
    #[arg(long)]
    pub frame_id: String,
}

#[derive(Args, Debug)]
pub struct CompileCommand {
    /// Transaction id
    #[arg(long)]
    pub tx_id: String,
    /// Effect directory to compile
    #[arg(long, value_enum)]
    pub effect: EffectArg,
    /// Frame id to compile into
    #[arg(long)]
    pub frame_id: String,
    /// Output path (defaults to `compiled.jpg` inside the effect directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct AnimateCommand {
    /// Directory of photos to animate
    pub input: PathBuf,
    /// Output GIF path (defaults to `compiled.gif` inside the directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Seconds each frame stays on screen
    #[arg(long, default_value = "1.5", value_parser = parse_delay)]
    pub delay: Duration,
}

fn parse_delay(value: &str) -> Result<Duration, String> {
    let seconds: f64 = value
        .parse()
        .map_err(|_| format!("`{value}` is not a number of seconds"))?;
    Duration::try_from_secs_f64(seconds).map_err(|e| format!("invalid delay `{value}`: {e}"))
}
