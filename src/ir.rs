//! Bytes seen by (and sendable from) the robot's IR receiver.
//!
//! These are the values [`read_ir`](crate::robot::Robot::read_ir) returns
//! while a stock remote or a home base is in view, and the values worth
//! handing to [`send_ir`](crate::robot::Robot::send_ir) when talking to
//! another robot's receiver.

/// No button is being pressed on the remote.
pub const REMOTE_NO_BUTTON: u8 = 255;
pub const REMOTE_LEFT: u8 = 129;
pub const REMOTE_FORWARD: u8 = 130;
pub const REMOTE_RIGHT: u8 = 131;
pub const REMOTE_SPOT: u8 = 132;
pub const REMOTE_MAX: u8 = 133;
pub const REMOTE_SMALL: u8 = 134;
pub const REMOTE_MEDIUM: u8 = 135;
pub const REMOTE_LARGE: u8 = 136;
/// Same byte as [`REMOTE_LARGE`]; newer remotes label the button "clean".
pub const REMOTE_CLEAN: u8 = 136;
pub const REMOTE_PAUSE: u8 = 137;
pub const REMOTE_POWER: u8 = 138;
pub const REMOTE_FORWARD_LEFT: u8 = 139;
pub const REMOTE_FORWARD_RIGHT: u8 = 140;
pub const REMOTE_STOP_DRIVING: u8 = 141;
/// Scheduling-remote code.
pub const REMOTE_SEND_ALL: u8 = 142;
/// Scheduling-remote code.
pub const REMOTE_SEEK_DOCK: u8 = 143;

// Home-base beacon bytes. The red and green buoys and the force field
// combine into one byte per visible mix.
pub const HOME_BASE_RESERVED: u8 = 240;
pub const HOME_BASE_RED: u8 = 248;
pub const HOME_BASE_GREEN: u8 = 244;
pub const HOME_BASE_FORCE_FIELD: u8 = 242;
pub const HOME_BASE_RED_GREEN: u8 = 252;
pub const HOME_BASE_RED_FORCE_FIELD: u8 = 250;
pub const HOME_BASE_GREEN_FORCE_FIELD: u8 = 246;
pub const HOME_BASE_RED_GREEN_FORCE_FIELD: u8 = 254;
