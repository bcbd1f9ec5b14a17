//! Fixed length motor frame
//!
//! ```text
//! [0xFF][right magnitude][left magnitude][ctrl][crc8]
//! ```
//!
//! Magnitudes are 0..=127, `ctrl` carries the wheel directions and the actuator
//! flags (bit 7 is reserved and always zero), and the CRC covers the three
//! bytes between the start byte and itself.

use bitflags::bitflags;

use crate::FrameError;
use crate::crc::crc8;

pub const START: u8 = 0xFF;
pub const FRAME_LEN: usize = 5;
pub const MAX_MAGNITUDE: u8 = 127;

bitflags! {
    /// Contents of the `ctrl` byte
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Ctrl: u8 {
        const LEFT_FORWARD = 1 << 0;
        const RIGHT_FORWARD = 1 << 1;
        const ROTATE_ENABLE = 1 << 2;
        /// Set for clockwise rotation when ROTATE_ENABLE is set
        const ROTATE_CW = 1 << 3;
        const MOVE_ENABLE = 1 << 4;
        /// Set for upward travel when MOVE_ENABLE is set
        const MOVE_UP = 1 << 5;
        const LED = 1 << 6;
    }
}

impl Ctrl {
    pub const DIRECTION: Ctrl = Ctrl::LEFT_FORWARD.union(Ctrl::RIGHT_FORWARD);
    pub const ACTUATORS: Ctrl = Ctrl::DIRECTION.complement();
}

/// Canonical halt: both magnitudes and every actuator flag cleared.
/// Serializes to `[0xFF, 0x00, 0x00, 0x01, 0x5E]`.
pub const SAFE_STOP: Packet = Packet::encode(0, 0, Ctrl::LEFT_FORWARD.bits());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Packet {
    right: u8,
    left: u8,
    ctrl: Ctrl,
    crc: u8,
}

impl Packet {
    /// Build a CRC-valid frame. Magnitudes above 127 saturate and the reserved
    /// ctrl bit is dropped, so the result is always well formed.
    pub const fn encode(right: u8, left: u8, ctrl: u8) -> Self {
        let right = if right > MAX_MAGNITUDE { MAX_MAGNITUDE } else { right };
        let left = if left > MAX_MAGNITUDE { MAX_MAGNITUDE } else { left };
        let ctrl = Ctrl::from_bits_truncate(ctrl);
        Self {
            right,
            left,
            ctrl,
            crc: crc8(&[right, left, ctrl.bits()]),
        }
    }

    /// Parse and check a frame on the receiving side
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FrameError> {
        let &[start, right, left, ctrl, received] = bytes else {
            return Err(FrameError::Length(bytes.len()));
        };
        if start != START {
            return Err(FrameError::BadStart(start));
        }
        let computed = crc8(&[right, left, ctrl]);
        if computed != received {
            return Err(FrameError::Crc { received, computed });
        }

        Ok(Self {
            right,
            left,
            ctrl: Ctrl::from_bits_retain(ctrl),
            crc: received,
        })
    }

    pub const fn to_bytes(&self) -> [u8; FRAME_LEN] {
        [START, self.right, self.left, self.ctrl.bits(), self.crc]
    }

    pub const fn right_magnitude(&self) -> u8 {
        self.right
    }

    pub const fn left_magnitude(&self) -> u8 {
        self.left
    }

    pub const fn ctrl(&self) -> Ctrl {
        self.ctrl
    }

    pub const fn crc(&self) -> u8 {
        self.crc
    }

    pub fn is_safe_stop(&self) -> bool {
        *self == SAFE_STOP
    }
}
