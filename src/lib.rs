//! pulsecam - heart rate from fingertip camera frames
//!
//! A fingertip pressed over a lit camera lens tints every frame red; the hue
//! of the averaged frame color rises and falls with each pulse. This crate
//! turns that per-frame color stream into timestamped BPM readings.
//!
//! - `signal`: frame averaging, hue, band-pass filter, median smoothing,
//!   peak counting and rate estimation
//! - `session`: the detection state machine and its events
//! - `relay`: ordered event delivery to another thread, reading log
//! - `replay`: raw-dump and synthetic frame sources
//! - `config`: session settings and TOML loading
//!
//! ```
//! use pulsecam::{ColorSample, DetectionSession, SessionConfig, SessionEvent};
//!
//! let mut session = DetectionSession::new(SessionConfig::default()).unwrap();
//! let events = session.submit_sample(ColorSample::new(200.0, 5.0, 30.0));
//! assert_eq!(events[0], SessionEvent::Started);
//! ```

pub mod config;
pub mod error;
pub mod relay;
pub mod replay;
pub mod session;
pub mod signal;

pub use config::SessionConfig;
pub use error::{PulseError, Result};
pub use relay::{EventRelay, ReadingLog};
pub use session::{BpmReading, DetectionSession, SessionEvent, SessionState};
pub use signal::ColorSample;
