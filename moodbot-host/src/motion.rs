//! Joystick to differential drive mapping
//!
//! Each axis is centered at 0.5. Outside the dead zone the offset is scaled to
//! a coefficient in -127..=127, then mixed tank style:
//!
//! ```text
//! left  = -(throttle - steer)
//! right = -(throttle + steer)
//! ```
//!
//! The outer negation matches the motor wiring. The default calibration
//! inverts the throttle axis so that pushing the stick up drives forward.

use moodbot_messages::Ctrl;
use moodbot_messages::MotionCommand;
use moodbot_messages::motion::MAX_SPEED;
use serde::{Deserialize, Serialize};

pub const CENTER: f32 = 0.5;

/// Digger and LED buttons, in wiring order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Buttons {
    pub led: bool,
    pub dig_up: bool,
    pub dig_down: bool,
    pub dig_cw: bool,
    pub dig_ccw: bool,
}

impl From<[bool; 5]> for Buttons {
    fn from([led, dig_up, dig_down, dig_cw, dig_ccw]: [bool; 5]) -> Self {
        Self {
            led,
            dig_up,
            dig_down,
            dig_cw,
            dig_ccw,
        }
    }
}

impl Buttons {
    /// Actuator flags for the ctrl byte. Up wins over down and clockwise over
    /// counter clockwise when both are held.
    pub fn actuators(&self) -> Ctrl {
        let mut bits = Ctrl::empty();

        // Digger movement
        if self.dig_up || self.dig_down {
            bits |= Ctrl::MOVE_ENABLE;
            bits.set(Ctrl::MOVE_UP, self.dig_up);
        }

        // Digger rotation
        if self.dig_cw || self.dig_ccw {
            bits |= Ctrl::ROTATE_ENABLE;
            bits.set(Ctrl::ROTATE_CW, self.dig_cw);
        }

        bits.set(Ctrl::LED, self.led);
        bits
    }
}

/// One joystick sample. Axes are nominally in 0.0..=1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionInput {
    pub steer: f32,
    pub throttle: f32,
    pub buttons: Buttons,
}

impl MotionInput {
    pub const CENTERED: MotionInput = MotionInput {
        steer: CENTER,
        throttle: CENTER,
        buttons: Buttons {
            led: false,
            dig_up: false,
            dig_down: false,
            dig_cw: false,
            dig_ccw: false,
        },
    };
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct Calibration {
    /// Offsets from center smaller than this read as zero
    pub dead_zone: f32,
    pub steer_inverted: bool,
    pub throttle_inverted: bool,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            dead_zone: 0.1,
            steer_inverted: false,
            throttle_inverted: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MotionMapper {
    calibration: Calibration,
}

impl MotionMapper {
    pub fn new(calibration: Calibration) -> Self {
        Self { calibration }
    }

    /// Scale one axis to a signed coefficient, truncating toward zero
    pub fn coefficient(&self, axis: f32, inverted: bool) -> i32 {
        let offset = axis - CENTER;
        if offset.abs() < self.calibration.dead_zone {
            return 0;
        }
        let coefficient = (offset * 2.0 * f32::from(MAX_SPEED)) as i32;
        if inverted { -coefficient } else { coefficient }
    }

    pub fn map(&self, input: &MotionInput) -> MotionCommand {
        let steer = self.coefficient(input.steer, self.calibration.steer_inverted);
        let throttle = self.coefficient(input.throttle, self.calibration.throttle_inverted);

        let left = -(throttle - steer);
        let right = -(throttle + steer);

        MotionCommand::new(
            clamp_speed(left),
            clamp_speed(right),
            input.buttons.actuators(),
        )
    }
}

fn clamp_speed(raw: i32) -> i8 {
    let max = i32::from(MAX_SPEED);
    raw.clamp(-max, max) as i8
}
