use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "refpipe",
    version,
    about = "Matte the near-white background of an animated image and save it as GIF + WebP"
)]
pub struct CliArgs {
    /// Input animated image (GIF, APNG, animated WebP) or still image
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output path; the GIF and WebP share its base name
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// RGB threshold: pixels with R, G and B all above it become transparent (0-255)
    #[arg(short, long)]
    pub threshold: Option<u8>,

    /// JSON file with conversion parameters; flags given here override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// WebP quality (0-100)
    #[arg(long)]
    pub webp_quality: Option<f32>,

    /// Encode the WebP losslessly
    #[arg(long, default_value_t = false)]
    pub webp_lossless: bool,

    /// Enable debug logging
    #[arg(long, default_value_t = false)]
    pub log: bool,
}
