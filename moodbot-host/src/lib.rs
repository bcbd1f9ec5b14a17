// Host side control core for MoodBot.
// Hardware drivers (RFID reader, joystick ADC, buttons, screen) are supplied by
// the consumer through the traits in `collaborators`. See ../src for the binary.

pub mod arming;
pub mod collaborators;
pub mod config;
pub mod error;
pub mod link;
pub mod motion;
pub mod scanner;
pub mod token_cache;

#[cfg(test)]
mod mock;

pub use arming::{ArmingConfig, ArmingController, Context, Session};
pub use collaborators::{MotionSource, StatusDisplay, TokenReader};
pub use config::Config;
pub use error::{Fault, LinkError, Unconfirmed};
pub use link::{LineLink, SerialLink};
pub use motion::{Buttons, Calibration, MotionInput, MotionMapper};
pub use scanner::{Scanner, TokenSlot};
pub use token_cache::{RemotePolicy, TokenCache, TokenValidator};

pub use moodbot_messages as messages;
