use std::io;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio::time::{sleep, timeout, Instant};
use tracing::{debug, info, trace, warn};

use crate::{
    percent_to_position, GripperCommand, GripperConfig, GripperStatus, MoveOptions,
    ObjectStatus, Result, RobotiqError,
};

/// Every reply of the URCap server is a single line that fits in this buffer.
const READ_BUFFER_SIZE: usize = 1024;

/// Data structure for interfacing with a robotiq gripper through the URCap socket server.
///
/// The stream lives behind a mutex that is held for exactly one request/reply
/// exchange, so the driver can be shared between tasks (e.g. in an `Arc`).
/// Multi-step operations such as [`move_to`](Self::move_to) are not atomic:
/// callers that share a gripper must serialize whole operations themselves.
///
/// Dropping the driver closes the stream.
pub struct RobotiqGripper<S = TcpStream> {
    config: GripperConfig,
    timeout: Duration,
    stream: Mutex<Option<S>>,
}

impl RobotiqGripper<TcpStream> {
    /// Constructor from a config. No connection is opened until [`connect`](Self::connect).
    pub fn new(config: GripperConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            timeout: config.timeout_duration()?,
            config,
            stream: Mutex::new(None),
        })
    }

    /// Constructor from the controller's host, with default port and timings.
    pub fn from_host(host: impl Into<String>) -> Result<Self> {
        Self::new(GripperConfig::new(host))
    }

    /// Open the TCP connection to the UR controller. Does nothing if already connected.
    pub async fn connect(&self) -> Result<&Self> {
        let mut stream = self.stream.lock().await;
        if stream.is_some() {
            return Ok(self);
        }
        let host = self.config.host.as_str();
        let port = self.config.port;
        let socket = timeout(self.timeout, TcpStream::connect((host, port)))
            .await
            .map_err(|_| timed_out("connect"))??;
        info!(host, port, "connected to URCap server");
        *stream = Some(socket);
        Ok(self)
    }
}

impl<S> RobotiqGripper<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    /// Constructor from an already open stream.
    pub fn with_stream(config: GripperConfig, stream: S) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            timeout: config.timeout_duration()?,
            config,
            stream: Mutex::new(Some(stream)),
        })
    }

    pub fn config(&self) -> &GripperConfig {
        &self.config
    }

    pub async fn is_connected(&self) -> bool {
        self.stream.lock().await.is_some()
    }

    /// Close the stream. Does nothing if not connected.
    ///
    /// The handle is released even when shutting the stream down fails, so a
    /// later `connect` can succeed; the shutdown error is still returned.
    pub async fn disconnect(&self) -> Result<()> {
        let stream = self.stream.lock().await.take();
        if let Some(mut stream) = stream {
            info!("disconnecting from URCap server");
            stream.shutdown().await?;
        }
        Ok(())
    }

    /// Send one command line and return the trimmed reply.
    ///
    /// Surrounding whitespace is stripped from `command` and a single newline appended.
    pub async fn send_raw(&self, command: &str) -> Result<String> {
        let mut guard = self.stream.lock().await;
        let stream = guard.as_mut().ok_or(RobotiqError::NotConnected)?;

        let command = command.trim();
        if !command.is_ascii() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("command '{command}' is not ASCII"),
            )
            .into());
        }
        let line = format!("{command}\n");

        timeout(self.timeout, stream.write_all(line.as_bytes()))
            .await
            .map_err(|_| timed_out("write"))??;
        let mut buf = [0u8; READ_BUFFER_SIZE];
        let n = timeout(self.timeout, stream.read(&mut buf))
            .await
            .map_err(|_| timed_out("read"))??;
        drop(guard);

        if n == 0 {
            return Err(RobotiqError::ConnectionClosed);
        }
        let reply = &buf[..n];
        if !reply.is_ascii() {
            return Err(
                io::Error::new(io::ErrorKind::InvalidData, "reply is not ASCII").into(),
            );
        }
        let reply = String::from_utf8_lossy(reply).trim().to_string();
        debug!(command, reply = reply.as_str(), "urcap exchange");
        Ok(reply)
    }

    /// Read a gripper variable, e.g. `POS`, `SPE`, `FOR`, `OBJ`, `STA`, `FLT`.
    pub async fn get_var(&self, name: &str) -> Result<i64> {
        let response = self.send_raw(&format!("GET {name}")).await?;
        parse_get_reply(name, &response)
    }

    /// Write a gripper variable, e.g. `POS`, `SPE`, `FOR`, `GTO`, `ACT`.
    ///
    /// Fails unless the server acknowledges with `ack`.
    pub async fn set_var(&self, name: &str, value: impl Into<i64>) -> Result<()> {
        let value = value.into();
        let reply = self.send_raw(&format!("SET {name} {value}")).await?;
        if reply != "ack" {
            warn!(name, value, reply = reply.as_str(), "write rejected");
            return Err(RobotiqError::WriteRejected {
                name: name.to_string(),
                reply,
            });
        }
        Ok(())
    }

    /// Current finger position (0 = open, 255 = closed).
    pub async fn get_position(&self) -> Result<i64> {
        self.get_var("POS").await
    }

    /// Echo of the last commanded position.
    pub async fn get_requested_position(&self) -> Result<i64> {
        self.get_var("PRE").await
    }

    pub async fn get_status(&self) -> Result<GripperStatus> {
        GripperStatus::decode(self.get_var("STA").await?)
    }

    pub async fn get_object_status(&self) -> Result<ObjectStatus> {
        ObjectStatus::decode(self.get_var("OBJ").await?)
    }

    /// Raw fault code, 0 means no fault. See [`GripperFault::from_code`](crate::GripperFault::from_code).
    pub async fn get_fault(&self) -> Result<i64> {
        self.get_var("FLT").await
    }

    /// Clear `ACT` and `ATR` until the gripper reports it is in reset.
    ///
    /// The clearing writes are repeated on every poll. With `timeout` set, the
    /// reset fails once a poll still shows the gripper out of reset and at least
    /// `timeout` has elapsed since polling began; `Some(Duration::ZERO)` thus
    /// allows exactly one poll. `None` polls forever.
    pub async fn reset(&self, poll_interval: Duration, timeout: Option<Duration>) -> Result<&Self> {
        self.clear_activation().await?;

        let start = Instant::now();
        loop {
            let act = self.get_var("ACT").await?;
            let sta = self.get_var("STA").await?;
            if act == 0 && GripperStatus::decode(sta)? == GripperStatus::Reset {
                break;
            }
            trace!(act, sta, "waiting for reset");

            if let Some(limit) = timeout {
                if start.elapsed() >= limit {
                    warn!(?limit, "gripper reset timed out");
                    return Err(RobotiqError::ResetTimeout(limit));
                }
            }

            self.clear_activation().await?;
            sleep(poll_interval).await;
        }
        debug!("gripper is in reset");
        Ok(self)
    }

    /// [`reset`](Self::reset) with the configured poll interval and timeout.
    pub async fn reset_default(&self) -> Result<&Self> {
        let poll_interval = self.config.reset_poll_duration()?;
        let timeout = self.config.reset_timeout_duration()?;
        self.reset(poll_interval, timeout).await
    }

    /// Activate the gripper, resetting it first unless it is already active.
    ///
    /// With `wait`, blocks until `ACT == 1` and the status is `Active`. That wait
    /// has no timeout; drop the future (e.g. with `tokio::time::timeout`) to give up.
    pub async fn activate(&self, wait: bool, poll_interval: Duration) -> Result<&Self> {
        if self.get_status().await? != GripperStatus::Active {
            let timeout = self.config.reset_timeout_duration()?;
            self.reset(poll_interval, timeout).await?;
        }

        self.set_var("ACT", 1).await?;

        if wait {
            while !(self.get_var("ACT").await? == 1
                && self.get_status().await? == GripperStatus::Active)
            {
                trace!("waiting for activation");
                sleep(poll_interval).await;
            }
            info!("gripper activated");
        }
        Ok(self)
    }

    /// [`activate`](Self::activate) with the configured poll interval.
    pub async fn activate_default(&self, wait: bool) -> Result<&Self> {
        let poll_interval = self.config.activate_poll_duration()?;
        self.activate(wait, poll_interval).await
    }

    /// Move the fingers to `position` with the given speed and force.
    ///
    /// Position, speed and force are saturated into `0..=255`. Without `wait`
    /// this returns `(requested position, Moving)` right after the command is
    /// written. Otherwise it returns the final position and the terminal object
    /// status, see [`await_go_to`](Self::await_go_to).
    pub async fn move_to(&self, position: i64, opts: MoveOptions) -> Result<(i64, ObjectStatus)> {
        let cmd = GripperCommand::clamped(position, opts.speed, opts.force);
        self.go_to(cmd).await?;

        if !opts.wait {
            return Ok((cmd.pos_req.into(), ObjectStatus::Moving));
        }
        self.await_go_to(cmd.pos_req, opts.poll_interval).await
    }

    /// Write a motion command: `POS`, `SPE`, `FOR`, then `GTO = 1`.
    pub async fn go_to(&self, cmd: GripperCommand) -> Result<&Self> {
        for (name, value) in cmd.to_requests() {
            self.set_var(name, value).await?;
        }
        debug!(?cmd, "motion started");
        Ok(self)
    }

    /// Wait until the gripper echoes `position` as requested, then until it stops moving.
    ///
    /// Returns the reported position with the object status; contact stops are
    /// valid outcomes, not errors. Neither wait has a timeout.
    pub async fn await_go_to(
        &self,
        position: u8,
        poll_interval: Duration,
    ) -> Result<(i64, ObjectStatus)> {
        let target = i64::from(position);
        while self.get_requested_position().await? != target {
            trace!(position, "waiting for command acceptance");
            sleep(poll_interval).await;
        }

        let obj = loop {
            let obj = self.get_object_status().await?;
            if obj != ObjectStatus::Moving {
                break obj;
            }
            sleep(poll_interval).await;
        };

        let final_position = self.get_position().await?;
        debug!(final_position, ?obj, "motion finished");
        Ok((final_position, obj))
    }

    /// Fully open the gripper. See [`MoveOptions::opening`] for the usual options.
    pub async fn open(&self, opts: MoveOptions) -> Result<(i64, ObjectStatus)> {
        self.move_to(0, opts).await
    }

    /// Fully close the gripper.
    pub async fn close(&self, opts: MoveOptions) -> Result<(i64, ObjectStatus)> {
        self.move_to(255, opts).await
    }

    /// Move to a position given in percent, 0 % fully open and 100 % fully closed.
    pub async fn move_percent(&self, percent: f64, opts: MoveOptions) -> Result<(i64, ObjectStatus)> {
        let position = percent_to_position(percent);
        self.move_to(position.into(), opts).await
    }

    async fn clear_activation(&self) -> Result<()> {
        self.set_var("ACT", 0).await?;
        self.set_var("ATR", 0).await
    }
}

impl<S> Drop for RobotiqGripper<S> {
    fn drop(&mut self) {
        if self.stream.get_mut().take().is_some() {
            debug!("gripper dropped while connected, closing stream");
        }
    }
}

/// Parse a `GET` reply of the form `<name> <value>`.
fn parse_get_reply(name: &str, response: &str) -> Result<i64> {
    let malformed = || RobotiqError::MalformedResponse {
        name: name.to_string(),
        response: response.to_string(),
    };
    let mut parts = response.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(echo), Some(value), None) if echo == name => value.parse().map_err(|_| malformed()),
        _ => Err(malformed()),
    }
}

fn timed_out(op: &str) -> io::Error {
    io::Error::new(io::ErrorKind::TimedOut, format!("socket {op} timed out"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_reply() {
        assert_eq!(parse_get_reply("POS", "POS 123").unwrap(), 123);
        assert_eq!(parse_get_reply("FLT", "FLT  0").unwrap(), 0);
    }

    #[test]
    fn rejects_malformed_replies() {
        for reply in ["ERR", "", "POS", "POS 1 2", "PRE 12", "POS abc", "pos 12"] {
            match parse_get_reply("POS", reply) {
                Err(RobotiqError::MalformedResponse { name, response }) => {
                    assert_eq!(name, "POS");
                    assert_eq!(response, reply);
                }
                other => panic!("reply {reply:?} gave {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn unconnected_gripper_refuses_exchanges() {
        let gripper = RobotiqGripper::from_host("10.0.0.1").unwrap();
        assert!(!gripper.is_connected().await);
        assert!(matches!(
            gripper.send_raw("GET POS").await,
            Err(RobotiqError::NotConnected)
        ));
        assert!(matches!(
            gripper.get_var("POS").await,
            Err(RobotiqError::NotConnected)
        ));
        gripper.disconnect().await.unwrap();
        assert!(!gripper.is_connected().await);
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let mut config = GripperConfig::new("10.0.0.1");
        config.timeout = f64::NAN;
        assert!(matches!(
            RobotiqGripper::new(config),
            Err(RobotiqError::InvalidConfig(_))
        ));
    }
}
