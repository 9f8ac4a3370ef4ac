use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::GripperConfig;

/// A clamped "go to" command: target position, speed and force.
///
/// - `pos_req`: `0x00` fully open, `0xFF` fully closed, quasi-linear in between.
/// - `speed`: `0x00` minimum, `0xFF` maximum. Setting a speed alone does not start a motion.
/// - `force`: `0x00` minimum, `0xFF` maximum. Fixes the motor current limit; exceeding it
///   stops the fingers and triggers object detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GripperCommand {
    pub pos_req: u8,
    pub speed: u8,
    pub force: u8,
}

impl GripperCommand {
    /// Saturate each parameter into `0..=255`.
    pub fn clamped(position: i64, speed: i64, force: i64) -> Self {
        Self {
            pos_req: clamp_u8(position),
            speed: clamp_u8(speed),
            force: clamp_u8(force),
        }
    }

    /// The variable writes that program and start the motion.
    ///
    /// `GTO` comes last so `POS`, `SPE` and `FOR` are in effect when motion starts.
    pub fn to_requests(&self) -> [(&'static str, i64); 4] {
        [
            ("POS", self.pos_req.into()),
            ("SPE", self.speed.into()),
            ("FOR", self.force.into()),
            ("GTO", 1),
        ]
    }
}

/// Speed, force and waiting behaviour for a motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOptions {
    pub speed: i64,
    pub force: i64,
    /// Block until the gripper accepted the command and stopped moving.
    pub wait: bool,
    pub poll_interval: Duration,
}

impl Default for MoveOptions {
    fn default() -> Self {
        Self {
            speed: 128,
            force: 128,
            wait: true,
            poll_interval: Duration::from_millis(10),
        }
    }
}

impl MoveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults for opening: a light force of 1.
    pub fn opening() -> Self {
        Self {
            force: 1,
            ..Self::default()
        }
    }

    /// Defaults with the poll interval taken from `config`.
    ///
    /// Falls back to the default interval if the configured one is invalid.
    pub fn from_config(config: &GripperConfig) -> Self {
        let mut opts = Self::default();
        if let Ok(interval) = config.move_poll_duration() {
            opts.poll_interval = interval;
        }
        opts
    }

    pub fn speed(mut self, speed: i64) -> Self {
        self.speed = speed;
        self
    }

    pub fn force(mut self, force: i64) -> Self {
        self.force = force;
        self
    }

    pub fn wait(mut self, wait: bool) -> Self {
        self.wait = wait;
        self
    }

    pub fn poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

/// Map an opening percentage (0 % open, 100 % closed) onto `0..=255`.
///
/// Out of range values are clamped and halves round away from zero, so 50 % is 128.
pub fn percent_to_position(percent: f64) -> u8 {
    if percent.is_nan() {
        return 0;
    }
    let percent = percent.clamp(0.0, 100.0);
    (percent / 100.0 * 255.0).round() as u8
}

fn clamp_u8(value: i64) -> u8 {
    value.clamp(0, 255) as u8
}
