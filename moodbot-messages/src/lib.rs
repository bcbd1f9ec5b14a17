#![no_std]

//! Messages used by MoodBot for host <--> motor controller communication
//!
//! Everything here is shared by both ends of the serial links: the fixed 5 byte
//! motor frame with its CRC8, the telemetry line sent back after every frame,
//! and the text exchanged with the second controller when validating tokens.

use thiserror::Error;

pub mod comms;
pub mod crc;
pub mod motion;
pub mod packet;
pub mod telemetry;
pub mod token;
pub mod validation;

pub use comms::PacketDecoder;
pub use crc::crc8;
pub use motion::MotionCommand;
pub use packet::{Ctrl, Packet, SAFE_STOP};
pub use telemetry::{BatteryScale, TelemetryReading, decode_telemetry};
pub use token::Token;

/// Error type for frames that fail receiver-side checks
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    #[error("Frame is {0} bytes, expected 5")]
    Length(usize),
    #[error("Frame starts with {0:#04x}, expected 0xff")]
    BadStart(u8),
    #[error("CRC mismatch: frame carries {received:#04x}, payload hashes to {computed:#04x}")]
    Crc { received: u8, computed: u8 },
}

/// Error type for responses on the validation link
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerdictError {
    #[error("Response is not valid ASCII")]
    NotText,
    #[error("Response is neither \"True\" nor \"False\"")]
    Unrecognized,
}
