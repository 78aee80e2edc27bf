use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pulsecam", about = "Estimate heart rate from recorded fingertip camera frames")]
pub struct Cli {
    /// Raw BGRA frame dump (width * height * 4 bytes per frame)
    pub input: Option<PathBuf>,

    /// Frame width in pixels
    #[arg(long, default_value_t = 192)]
    pub width: usize,

    /// Frame height in pixels
    #[arg(long, default_value_t = 144)]
    pub height: usize,

    /// Frames per second of the recording
    #[arg(long, default_value_t = 10)]
    pub fps: u32,

    /// Measurement length in seconds
    #[arg(short, long, default_value_t = 10)]
    pub duration: u32,

    /// Config file (defaults to ./pulsecam.toml or the user config dir)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write collected readings as JSON
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Synthesize frames pulsing at this rate instead of reading INPUT
    #[arg(long)]
    pub simulate_bpm: Option<f64>,

    /// Uncovered frames before the simulated finger is placed
    #[arg(long, default_value_t = 0)]
    pub lead_in: usize,

    /// Hide the progress bar
    #[arg(short, long)]
    pub quiet: bool,
}
