use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{PulseError, Result};
use crate::session::WARM_UP_SECONDS;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub input: InputConfig,
}

/// Measurement length and sampling rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_duration_seconds")]
    pub duration_seconds: u32,
    #[serde(default = "default_fps")]
    pub fps: u32,
}

/// Geometry of raw frames fed to the replay tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct InputConfig {
    #[serde(default = "default_width")]
    pub width: usize,
    #[serde(default = "default_height")]
    pub height: usize,
}

impl SessionConfig {
    pub fn new(duration_seconds: u32, fps: u32) -> Result<Self> {
        let config = Self {
            duration_seconds,
            fps,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.fps == 0 {
            return Err(PulseError::InvalidConfiguration("fps must be positive".into()));
        }
        if self.duration_seconds == 0 {
            return Err(PulseError::InvalidConfiguration(
                "duration_seconds must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Samples after which the session finishes.
    pub fn total_samples(&self) -> usize {
        self.duration_seconds as usize * self.fps as usize
    }

    /// Samples collected before rates are reported.
    pub fn warm_up_samples(&self) -> usize {
        WARM_UP_SECONDS as usize * self.fps as usize
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            duration_seconds: default_duration_seconds(),
            fps: default_fps(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

fn default_duration_seconds() -> u32 { 10 }
fn default_fps() -> u32 { 10 }
fn default_width() -> usize { 192 }
fn default_height() -> usize { 144 }

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| PulseError::Config {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let config: Config = toml::from_str(&content).map_err(|e| PulseError::Config {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    config.session.validate()?;
    Ok(config)
}

/// Load a config file the binary can fall back from.
///
/// An unreadable or unparsable file is logged and skipped (`Ok(None)`); a
/// file that parses but holds invalid session values is an error.
pub fn load_optional(path: &Path) -> Result<Option<Config>> {
    match load_config(path) {
        Ok(config) => Ok(Some(config)),
        Err(err @ PulseError::Config { .. }) => {
            log::warn!("{}", err);
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

/// `./pulsecam.toml`, then the XDG-style and platform config directories.
pub fn find_config() -> Option<PathBuf> {
    let local = PathBuf::from("pulsecam.toml");
    if local.exists() {
        return Some(local);
    }
    if let Some(home) = dirs::home_dir() {
        let xdg = home.join(".config").join("pulsecam").join("config.toml");
        if xdg.exists() {
            return Some(xdg);
        }
    }
    if let Some(config_dir) = dirs::config_dir() {
        let platform = config_dir.join("pulsecam").join("config.toml");
        if platform.exists() {
            return Some(platform);
        }
    }
    None
}
