//! Wheel and actuator command before framing

use crate::packet::{Ctrl, MAX_MAGNITUDE, Packet};

pub const MAX_SPEED: i8 = MAX_MAGNITUDE as i8;

/// Signed wheel speeds in -127..=127 plus the actuator flags of the ctrl byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MotionCommand {
    pub left: i8,
    pub right: i8,
    pub actuators: Ctrl,
}

impl MotionCommand {
    /// Everything stopped
    pub const IDLE: MotionCommand = MotionCommand {
        left: 0,
        right: 0,
        actuators: Ctrl::empty(),
    };

    pub fn new(left: i8, right: i8, actuators: Ctrl) -> Self {
        Self {
            left: left.max(-MAX_SPEED),
            right: right.max(-MAX_SPEED),
            actuators: actuators & Ctrl::ACTUATORS,
        }
    }

    /// Direction bits for the ctrl byte. A wheel counts as forward when its
    /// speed is zero or positive.
    pub fn direction(&self) -> Ctrl {
        let mut direction = Ctrl::empty();
        direction.set(Ctrl::LEFT_FORWARD, self.left >= 0);
        direction.set(Ctrl::RIGHT_FORWARD, self.right >= 0);
        direction
    }

    pub fn to_packet(&self) -> Packet {
        let ctrl = self.direction() | (self.actuators & Ctrl::ACTUATORS);
        Packet::encode(
            self.right.unsigned_abs(),
            self.left.unsigned_abs(),
            ctrl.bits(),
        )
    }
}
