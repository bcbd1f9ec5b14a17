//! Bench stand-ins for the hardware collaborators
//!
//! Cards come from a keyboard-wedge RFID reader, which types either the decimal
//! token or the raw UID bytes in hex (`12:34:56:78:9A`) followed by Enter. The
//! joystick is held centered and the screen is the log.

use std::io::{self, BufRead};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use log::{info, warn};
use moodbot_host::messages::Token;
use moodbot_host::messages::token::UID_BYTES;
use moodbot_host::messages::validation::parse_token;
use moodbot_host::{MotionInput, MotionSource, StatusDisplay, TokenReader};

pub struct StdinTokenReader {
    lines: Receiver<String>,
}

impl StdinTokenReader {
    /// Start a thread that forwards stdin lines to the reader
    pub fn spawn() -> io::Result<Self> {
        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name("stdin-rfid".into())
            .spawn(move || {
                for line in io::stdin().lock().lines() {
                    match line {
                        Ok(line) => {
                            if tx.send(line).is_err() {
                                break;
                            }
                        }
                        Err(_) => break,
                    }
                }
            })?;
        Ok(Self::from_lines(rx))
    }

    pub fn from_lines(lines: Receiver<String>) -> Self {
        Self { lines }
    }
}

impl TokenReader for StdinTokenReader {
    fn poll_once(&mut self) -> Option<Token> {
        loop {
            match self.lines.try_recv() {
                Ok(line) => match parse_card(&line) {
                    Some(token) => return Some(token),
                    None => warn!("Unreadable card {line:?}"),
                },
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => return None,
            }
        }
    }
}

/// Decimal token, or colon separated hex UID bytes folded into a token
fn parse_card(line: &str) -> Option<Token> {
    let line = line.trim();
    if !line.contains(':') {
        return parse_token(line.as_bytes());
    }

    let mut uid = [0u8; UID_BYTES];
    let mut len = 0;
    for part in line.split(':') {
        let byte = u8::from_str_radix(part.trim(), 16).ok()?;
        // Bytes past the fifth do not contribute to the token
        if len < UID_BYTES {
            uid[len] = byte;
        }
        len += 1;
    }
    Some(Token::from_uid(&uid[..len.min(UID_BYTES)]))
}

pub struct CenteredJoystick;

impl MotionSource for CenteredJoystick {
    fn read(&mut self) -> MotionInput {
        MotionInput::CENTERED
    }
}

#[derive(Default)]
pub struct LogDisplay {
    battery: Option<(i32, bool)>,
}

impl StatusDisplay for LogDisplay {
    fn show_countdown(&mut self, seconds: i32) {
        info!("[screen] {seconds} s left");
    }

    fn show_message(&mut self, text: &str) {
        info!("[screen] {text}");
    }

    fn show_battery_percent(&mut self, percent: i32, is_low: bool) {
        // Telemetry arrives every tick; only changes are worth a line
        if self.battery == Some((percent, is_low)) {
            return;
        }
        self.battery = Some((percent, is_low));
        if is_low {
            warn!("[screen] Battery {percent}% LOW");
        } else {
            info!("[screen] Battery {percent}%");
        }
    }
}
