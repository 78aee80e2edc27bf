//! Per-measurement state machine.
//!
//! A `DetectionSession` consumes one color sample per camera frame and turns
//! the stream into `SessionEvent`s. Callers drive it from a single producer;
//! every method takes `&mut self` and runs to completion.

use serde::{Deserialize, Serialize};

use crate::config::SessionConfig;
use crate::error::Result;
use crate::signal::{self, BandpassFilter, ColorSample};

/// Seconds of signal collected before the first rate is reported.
pub const WARM_UP_SECONDS: u32 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BpmReading {
    pub bpm: u32,
    pub at_time_ms: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Detecting,
    Finished,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    /// A covered lens was seen while idle.
    Started,
    /// Still warming up; elapsed signal time only.
    Waiting { at_time_ms: u64 },
    Update(BpmReading),
    /// The finger was lifted mid-measurement; the session is idle again.
    Interrupted,
    /// Emitted once when the configured duration is reached.
    Finished { last_reading: Option<BpmReading> },
}

pub struct DetectionSession {
    config: SessionConfig,
    state: SessionState,
    hue_history: Vec<f64>,
    filtered: Vec<f64>,
    filter: BandpassFilter,
}

impl DetectionSession {
    pub fn new(config: SessionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            hue_history: Vec::with_capacity(config.total_samples()),
            filtered: Vec::with_capacity(config.total_samples()),
            config,
            state: SessionState::Idle,
            filter: BandpassFilter::new(),
        })
    }

    /// Average a raw BGRA frame and feed it to the session.
    ///
    /// A malformed frame is rejected with an error and leaves the session as
    /// it was; it is not treated as a lifted finger.
    pub fn submit_frame(
        &mut self,
        pixels: &[u8],
        width: usize,
        height: usize,
    ) -> Result<Vec<SessionEvent>> {
        if self.state == SessionState::Finished {
            return Ok(Vec::new());
        }
        let sample = signal::extract_color(pixels, width, height)?;
        Ok(self.submit_sample(sample))
    }

    pub fn submit_sample(&mut self, sample: ColorSample) -> Vec<SessionEvent> {
        let mut events = Vec::new();

        match (self.state, sample.is_valid()) {
            (SessionState::Finished, _) => {}
            (SessionState::Idle, false) => {}
            (SessionState::Detecting, false) => {
                log::warn!(
                    "Signal lost after {} samples, cover the camera and flash again",
                    self.hue_history.len()
                );
                self.clear();
                events.push(SessionEvent::Interrupted);
            }
            (SessionState::Idle, true) => {
                log::info!(
                    "Detection started ({}s at {} fps)",
                    self.config.duration_seconds,
                    self.config.fps
                );
                self.state = SessionState::Detecting;
                events.push(SessionEvent::Started);
                events.push(self.advance(sample.hue()));
            }
            (SessionState::Detecting, true) => {
                events.push(self.advance(sample.hue()));
            }
        }

        events
    }

    /// Force the session back to `Idle` with empty buffers.
    pub fn reset(&mut self) {
        if self.state != SessionState::Idle {
            log::debug!("Session reset from {:?}", self.state);
        }
        self.clear();
    }

    /// Like `reset`, but reports an interruption if a measurement was running.
    pub fn stop(&mut self) -> Option<SessionEvent> {
        let was_detecting = self.state == SessionState::Detecting;
        self.reset();
        was_detecting.then_some(SessionEvent::Interrupted)
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn sample_count(&self) -> usize {
        self.hue_history.len()
    }

    pub fn hue_history(&self) -> &[f64] {
        &self.hue_history
    }

    pub fn filter(&self) -> &BandpassFilter {
        &self.filter
    }

    /// Current rate over everything collected so far, ignoring warm-up.
    pub fn current_reading(&self) -> Option<BpmReading> {
        let bpm = signal::analyze_filtered(&self.filtered, self.config.fps)?;
        Some(BpmReading {
            bpm,
            at_time_ms: self.elapsed_ms(),
        })
    }

    fn advance(&mut self, hue: f64) -> SessionEvent {
        self.hue_history.push(hue);
        self.filtered.push(self.filter.process(hue));

        let n = self.hue_history.len();
        if n >= self.config.total_samples() {
            let last_reading = self.current_reading();
            log::info!(
                "Detection finished after {} samples: {}",
                n,
                last_reading.map_or_else(|| "no reading".to_string(), |r| format!("{} bpm", r.bpm))
            );
            self.state = SessionState::Finished;
            return SessionEvent::Finished { last_reading };
        }

        if n >= self.config.warm_up_samples() {
            if let Some(reading) = self.current_reading() {
                log::debug!("{} bpm at {}ms", reading.bpm, reading.at_time_ms);
                return SessionEvent::Update(reading);
            }
        }

        SessionEvent::Waiting {
            at_time_ms: self.elapsed_ms(),
        }
    }

    fn elapsed_ms(&self) -> u64 {
        (self.hue_history.len() as f64 * (1000.0 / self.config.fps as f64)) as u64
    }

    fn clear(&mut self) {
        self.hue_history.clear();
        self.filtered.clear();
        self.filter.reset();
        self.state = SessionState::Idle;
    }
}
