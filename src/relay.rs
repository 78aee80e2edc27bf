//! Hands session events to a consumer on another thread.
//!
//! `EventRelay` wraps a `DetectionSession` and pushes every event onto an
//! mpsc channel in the order the session emitted it. `ReadingLog` is the
//! consumer-side record of readings that graph and export code work from.

use serde::Serialize;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender};

use crate::error::Result;
use crate::session::{BpmReading, DetectionSession, SessionEvent, SessionState};
use crate::signal::ColorSample;

pub struct EventRelay {
    session: DetectionSession,
    sender: Sender<SessionEvent>,
    disconnected: bool,
}

impl EventRelay {
    pub fn new(session: DetectionSession) -> (Self, Receiver<SessionEvent>) {
        let (sender, receiver) = mpsc::channel();
        let relay = Self {
            session,
            sender,
            disconnected: false,
        };
        (relay, receiver)
    }

    /// Submit a frame and forward its events. Returns the session state
    /// after the frame was processed.
    pub fn submit_frame(
        &mut self,
        pixels: &[u8],
        width: usize,
        height: usize,
    ) -> Result<SessionState> {
        let events = self.session.submit_frame(pixels, width, height)?;
        self.forward(events);
        Ok(self.session.state())
    }

    pub fn submit_sample(&mut self, sample: ColorSample) -> SessionState {
        let events = self.session.submit_sample(sample);
        self.forward(events);
        self.session.state()
    }

    pub fn reset(&mut self) {
        self.session.reset();
    }

    pub fn stop(&mut self) {
        let event = self.session.stop();
        self.forward(event);
    }

    pub fn session(&self) -> &DetectionSession {
        &self.session
    }

    fn forward(&mut self, events: impl IntoIterator<Item = SessionEvent>) {
        for event in events {
            if self.sender.send(event).is_err() {
                if !self.disconnected {
                    log::warn!("Event receiver dropped, further session events are discarded");
                    self.disconnected = true;
                }
                return;
            }
        }
    }
}

/// Readings of the current run, in arrival order.
#[derive(Debug, Default, Serialize)]
pub struct ReadingLog {
    readings: Vec<BpmReading>,
}

impl ReadingLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one event into the log. `Started` begins a fresh run.
    pub fn record(&mut self, event: &SessionEvent) {
        match event {
            SessionEvent::Started => self.readings.clear(),
            SessionEvent::Update(reading) => self.readings.push(*reading),
            SessionEvent::Finished {
                last_reading: Some(reading),
            } => self.readings.push(*reading),
            _ => {}
        }
    }

    pub fn readings(&self) -> &[BpmReading] {
        &self.readings
    }

    pub fn last(&self) -> Option<&BpmReading> {
        self.readings.last()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn reset(&mut self) {
        self.readings.clear();
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        let mut writer = BufWriter::new(std::fs::File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self).map_err(std::io::Error::from)?;
        writer.flush()?;
        Ok(())
    }
}
