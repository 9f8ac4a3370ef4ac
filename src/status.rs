use num::FromPrimitive;
use num_derive::FromPrimitive;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::RobotiqError;

/// The gripper's activation status, echo of the `STA` variable.
#[repr(u8)]
#[derive(Debug, Clone, Copy, FromPrimitive, PartialEq, Eq, Serialize, Deserialize)]
pub enum GripperStatus {
    /// Gripper is in reset (or automatic release). See `FLT` if the gripper was activated.
    Reset = 0,
    /// Activation in progress
    Activating = 1,
    /// Not used
    Unused = 2,
    /// Activation is completed
    Active = 3,
}

impl GripperStatus {
    /// Decode the integer reported for `STA`.
    pub fn decode(code: i64) -> Result<Self, RobotiqError> {
        Self::from_i64(code).ok_or(RobotiqError::UnrecognizedStatus {
            register: "STA",
            code,
        })
    }
}

/// Object detection status, echo of the `OBJ` variable.
///
/// A built-in feature that provides information on possible object pick-up.
/// Ignore if `GTO == 0`.
#[repr(u8)]
#[derive(Debug, Clone, Copy, FromPrimitive, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectStatus {
    /// Fingers are in motion towards requested position. No object detected.
    Moving = 0,
    /// Fingers have stopped due to a contact while opening before requested position.
    StoppedOuterObject = 1,
    /// Fingers have stopped due to a contact while closing before requested position.
    StoppedInnerObject = 2,
    /// Fingers are at requested position. No object detected or object has been lost/dropped.
    AtDest = 3,
}

impl ObjectStatus {
    /// Decode the integer reported for `OBJ`.
    pub fn decode(code: i64) -> Result<Self, RobotiqError> {
        Self::from_i64(code).ok_or(RobotiqError::UnrecognizedStatus {
            register: "OBJ",
            code,
        })
    }

    /// Whether the fingers stopped on contact with an object.
    pub fn detected_object(&self) -> bool {
        matches!(
            self,
            ObjectStatus::StoppedOuterObject | ObjectStatus::StoppedInnerObject
        )
    }
}

/// Fault codes reported through `FLT`, useful for troubleshooting.
///
/// `get_fault` hands back the raw integer; use [`GripperFault::from_code`] to
/// interpret it.
#[repr(u8)]
#[derive(Debug, Clone, Copy, FromPrimitive, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GripperFault {
    /// No fault (solid blue LED)
    #[error("no fault")]
    NoFault = 0x00,

    /// Action delayed, the activation (re-activation) must be completed prior to performing the action
    #[error("action delayed, activation must complete first")]
    ActionDelay = 0x05,
    /// The activation bit must be set prior to performing the action
    #[error("gripper is not activated")]
    NotActivated = 0x07,

    /// Maximum operating temperature exceeded (>= 85 degree celsius internally), let cool down (below 80 degree celsius)
    #[error("maximum operating temperature exceeded")]
    OverHeated = 0x08,
    /// No communication during at least 1 second.
    #[error("no communication during at least 1 second")]
    NoComm = 0x09,

    /// Under minimum operating voltage
    #[error("under minimum operating voltage")]
    UnderVoltage = 0x0A,
    /// Automatic release in progress
    #[error("automatic release in progress")]
    Releasing = 0x0B,
    /// Internal fault; contact support@robotiq.com
    #[error("internal fault")]
    InternalFault = 0x0C,
    /// Activation fault, verify that no interference or other error occurred.
    #[error("activation fault")]
    ActivationFault = 0x0D,
    /// Overcurrent triggered.
    #[error("overcurrent triggered")]
    OverCurrent = 0x0E,
    /// Automatic release completed
    #[error("automatic release completed")]
    AutomaticReleaseCompleted = 0x0F,
}

impl GripperFault {
    /// Interpret a raw `FLT` value. Codes outside the documented list give `None`.
    pub fn from_code(code: i64) -> Option<Self> {
        Self::from_i64(code)
    }

    /// For major faults (LED blinking red/blue) a reset is required (rising edge on `ACT`).
    pub fn reset_required(&self) -> bool {
        *self as u8 >= 0x0A
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_known_status_codes() {
        assert_eq!(GripperStatus::decode(0).unwrap(), GripperStatus::Reset);
        assert_eq!(GripperStatus::decode(3).unwrap(), GripperStatus::Active);
        assert_eq!(ObjectStatus::decode(0).unwrap(), ObjectStatus::Moving);
        assert_eq!(
            ObjectStatus::decode(2).unwrap(),
            ObjectStatus::StoppedInnerObject
        );
    }

    #[test]
    fn unknown_codes_are_rejected() {
        match GripperStatus::decode(4) {
            Err(RobotiqError::UnrecognizedStatus { register, code }) => {
                assert_eq!(register, "STA");
                assert_eq!(code, 4);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(
            ObjectStatus::decode(-1),
            Err(RobotiqError::UnrecognizedStatus { register: "OBJ", .. })
        ));
    }

    #[test]
    fn contact_stops_count_as_detection() {
        assert!(ObjectStatus::StoppedOuterObject.detected_object());
        assert!(ObjectStatus::StoppedInnerObject.detected_object());
        assert!(!ObjectStatus::AtDest.detected_object());
        assert!(!ObjectStatus::Moving.detected_object());
    }

    #[test]
    fn fault_codes() {
        assert_eq!(GripperFault::from_code(0), Some(GripperFault::NoFault));
        assert_eq!(GripperFault::from_code(0x0E), Some(GripperFault::OverCurrent));
        assert_eq!(GripperFault::from_code(0x06), None);
        assert_eq!(GripperFault::from_code(300), None);
        assert!(GripperFault::InternalFault.reset_required());
        assert!(!GripperFault::NotActivated.reset_required());
    }
}
