//! # Robotiq-urcap
//!
//! `robotiq-urcap` is a library for interfacing with a robotiq gripper mounted on a
//! Universal Robots arm, through the socket server of the Robotiq URCap
//! (default port `63352`).
//!
//! The server speaks a line based ASCII protocol:
//!
//! - `GET POS` is answered with `POS 123`
//! - `SET POS 100` is answered with `ack`
//!
//! ### Compatible product
//! - [x] Robotiq 2F-85
//! - [x] Robotiq 2F-140
//! - [x] HandE
//!
//! ## Example
//! ```no_run
//! use robotiq_urcap::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), RobotiqError> {
//!     // IP address of the UR controller
//!     let gripper = RobotiqGripper::from_host("192.168.0.10")?;
//!     gripper.connect().await?;
//!
//!     // Reset (if needed) and activate, waiting for the activation to finish.
//!     gripper.activate_default(true).await?;
//!
//!     // Open gently, then close harder.
//!     gripper.open(MoveOptions::opening()).await?;
//!     let (position, obj) = gripper
//!         .close(MoveOptions::new().speed(200).force(200))
//!         .await?;
//!     println!("closed at {position}, object detected: {}", obj.detected_object());
//!
//!     // Half way, without waiting for the motion to finish.
//!     gripper
//!         .move_percent(50.0, MoveOptions::new().wait(false))
//!         .await?;
//!
//!     gripper.disconnect().await?;
//!     Ok(())
//! }
//! ```
//!
//! Waiting for activation or motion has no timeout. To bound it, wrap the call
//! in [`tokio::time::timeout`] and reconnect afterwards, since a reply may be
//! left unread on the socket.

mod command;
mod config;
mod error;
mod gripper;
mod status;

pub use command::{percent_to_position, GripperCommand, MoveOptions};
pub use config::GripperConfig;
pub use error::{Result, RobotiqError};
pub use gripper::RobotiqGripper;
pub use status::{GripperFault, GripperStatus, ObjectStatus};
