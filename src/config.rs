//! Connection and timing parameters for a [`RobotiqGripper`](crate::RobotiqGripper).
//!
//! Durations are stored in seconds so a config file reads naturally:
//!
//! ```json
//! {
//!     "host": "192.168.0.10",
//!     "port": 63352,
//!     "timeout": 2.0,
//!     "reset_timeout": null
//! }
//! ```
//!
//! Missing fields fall back to their defaults.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Result, RobotiqError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GripperConfig {
    /// IP address or hostname of the UR controller.
    pub host: String,
    /// TCP port of the URCap socket server.
    pub port: u16,
    /// Bound on every single socket read, write and connect, in seconds.
    pub timeout: f64,
    pub reset_poll_interval: f64,
    /// `None` lets the reset loop poll forever.
    pub reset_timeout: Option<f64>,
    pub activate_poll_interval: f64,
    pub move_poll_interval: f64,
}

impl GripperConfig {
    /// The default port of the URCap socket server.
    pub const DEFAULT_PORT: u16 = 63352;

    /// Config for `host` with every other field at its default.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Self::default()
        }
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout.as_secs_f64();
        self
    }

    pub fn reset_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.reset_timeout = timeout.map(|t| t.as_secs_f64());
        self
    }

    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Reject values the driver cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(RobotiqError::InvalidConfig("host is empty".into()));
        }
        if self.port == 0 {
            return Err(RobotiqError::InvalidConfig("port must be non-zero".into()));
        }
        seconds("timeout", self.timeout)?;
        seconds("reset_poll_interval", self.reset_poll_interval)?;
        seconds("activate_poll_interval", self.activate_poll_interval)?;
        seconds("move_poll_interval", self.move_poll_interval)?;
        if let Some(t) = self.reset_timeout {
            seconds("reset_timeout", t)?;
        }
        Ok(())
    }

    pub fn timeout_duration(&self) -> Result<Duration> {
        seconds("timeout", self.timeout)
    }

    pub fn reset_poll_duration(&self) -> Result<Duration> {
        seconds("reset_poll_interval", self.reset_poll_interval)
    }

    pub fn reset_timeout_duration(&self) -> Result<Option<Duration>> {
        self.reset_timeout
            .map(|t| seconds("reset_timeout", t))
            .transpose()
    }

    pub fn activate_poll_duration(&self) -> Result<Duration> {
        seconds("activate_poll_interval", self.activate_poll_interval)
    }

    pub fn move_poll_duration(&self) -> Result<Duration> {
        seconds("move_poll_interval", self.move_poll_interval)
    }
}

impl Default for GripperConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: Self::DEFAULT_PORT,
            timeout: 2.0,
            reset_poll_interval: 0.1,
            reset_timeout: Some(5.0),
            activate_poll_interval: 0.1,
            move_poll_interval: 0.01,
        }
    }
}

fn seconds(field: &str, value: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(value).map_err(|_| {
        RobotiqError::InvalidConfig(format!(
            "{field} must be a finite, non-negative number of seconds, got {value}"
        ))
    })
}
