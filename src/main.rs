mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::mpsc::Receiver;
use std::thread;

use cli::Cli;
use pulsecam::config;
use pulsecam::replay::{RawFrameReader, SimulatedFinger};
use pulsecam::{
    DetectionSession, EventRelay, ReadingLog, SessionConfig, SessionEvent, SessionState,
};

type FrameSource = Box<dyn Iterator<Item = pulsecam::Result<Vec<u8>>>>;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let mut cli = Cli::parse();

    // Explicit --config path, or auto-detect pulsecam.toml / user config
    if let Some(path) = cli.config.clone().or_else(config::find_config) {
        let loaded = config::load_optional(&path)
            .with_context(|| format!("Invalid settings in {}", path.display()))?;
        if let Some(cfg) = loaded {
            log::info!("Loaded config from {}", path.display());
            // Config values apply only when the CLI is at its default
            if cli.fps == 10 { cli.fps = cfg.session.fps; }
            if cli.duration == 10 { cli.duration = cfg.session.duration_seconds; }
            if cli.width == 192 { cli.width = cfg.input.width; }
            if cli.height == 144 { cli.height = cfg.input.height; }
        }
    }

    let session_config =
        SessionConfig::new(cli.duration, cli.fps).context("Invalid session settings")?;
    let session = DetectionSession::new(session_config)?;

    let (frames, total_frames) = open_source(&cli, &session_config)?;

    log::info!("pulsecam - fingertip heart rate");
    log::info!(
        "Frames: {}x{} @ {}fps, measuring {}s",
        cli.width, cli.height, cli.fps, cli.duration
    );

    let (mut relay, receiver) = EventRelay::new(session);
    // Every run starts from a clean session, as when the camera is restarted
    relay.reset();
    let consumer = thread::spawn(move || consume_events(receiver));

    let pb = if cli.quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(total_frames)
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.red/white} {pos}/{len} frames")
            .context("Invalid progress template")?
            .progress_chars("=>-"),
    );

    let mut finished = false;
    for frame in frames {
        let frame = frame.context("Failed to read frame")?;
        match relay.submit_frame(&frame, cli.width, cli.height) {
            Ok(SessionState::Finished) => {
                finished = true;
                pb.inc(1);
                break;
            }
            Ok(_) => {}
            Err(err) if err.is_recoverable() => log::warn!("Skipping frame: {}", err),
            Err(err) => return Err(err.into()),
        }
        pb.inc(1);
    }

    if !finished {
        relay.stop();
    }
    drop(relay);
    pb.finish_and_clear();

    let readings = consumer
        .join()
        .map_err(|_| anyhow::anyhow!("Event consumer thread panicked"))?;

    if !finished {
        log::warn!("Input ended before the measurement completed");
    }
    match readings.last() {
        Some(last) => log::info!(
            "Heart rate: {} bpm ({} readings)",
            last.bpm,
            readings.readings().len()
        ),
        None => log::info!("No heart rate reading was produced"),
    }

    if let Some(ref output) = cli.output {
        readings
            .write_json(output)
            .with_context(|| format!("Failed to write readings to {}", output.display()))?;
        log::info!("Readings written to {}", output.display());
    }

    Ok(())
}

fn open_source(cli: &Cli, session_config: &SessionConfig) -> Result<(FrameSource, u64)> {
    if let Some(bpm) = cli.simulate_bpm {
        let covered = session_config.total_samples();
        let source =
            SimulatedFinger::new(cli.width, cli.height, cli.fps, bpm, cli.lead_in, covered)?;
        log::info!("Simulating a {:.0} bpm pulse", bpm);
        let frames: FrameSource = Box::new(source.map(Ok::<_, pulsecam::PulseError>));
        return Ok((frames, cli.lead_in.saturating_add(covered) as u64));
    }

    let input = cli
        .input
        .as_ref()
        .context("Input frame dump is required (or pass --simulate-bpm)")?;
    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    let file = std::fs::File::open(input)
        .with_context(|| format!("Failed to open frame dump: {}", input.display()))?;
    let bytes = file.metadata()?.len();
    let reader = RawFrameReader::new(std::io::BufReader::new(file), cli.width, cli.height)?;
    let frame_len = reader.frame_len() as u64;
    let total = if frame_len == 0 { 0 } else { bytes.div_ceil(frame_len) };
    log::info!("Input: {} ({} frames)", input.display(), total);

    let frames: FrameSource = Box::new(reader);
    Ok((frames, total))
}

fn consume_events(receiver: Receiver<SessionEvent>) -> ReadingLog {
    let mut readings = ReadingLog::new();
    for event in receiver {
        match event {
            SessionEvent::Started => log::info!("Detecting now... keep your finger in place"),
            SessionEvent::Waiting { at_time_ms } => log::debug!("Warming up: {}ms", at_time_ms),
            SessionEvent::Update(reading) => {
                log::info!("{} bpm  {}ms", reading.bpm, reading.at_time_ms)
            }
            SessionEvent::Interrupted => {
                log::warn!("Please cover the back camera and the flash with your finger")
            }
            SessionEvent::Finished { .. } => log::info!("Detection finished"),
        }
        readings.record(&event);
    }
    readings
}
