//! Interfaces to the hardware around the control core

use moodbot_messages::Token;

use crate::motion::MotionInput;

/// RFID reader. Must not block: returns `None` when no card is in the field.
pub trait TokenReader {
    fn poll_once(&mut self) -> Option<Token>;
}

/// Joystick axes and digger buttons, sampled once per tick
pub trait MotionSource {
    fn read(&mut self) -> MotionInput;
}

/// Operator facing screen
pub trait StatusDisplay {
    fn show_countdown(&mut self, seconds: i32);
    fn show_message(&mut self, text: &str);
    fn show_battery_percent(&mut self, percent: i32, is_low: bool);
}

pub mod notices {
    pub const SCAN_CARD: &str = "Scan card!";
    pub const MISSION_COMPLETE: &str = "Mission complete!";
    pub const SCAN_AGAIN: &str = "Card already used, scan again!";
}
