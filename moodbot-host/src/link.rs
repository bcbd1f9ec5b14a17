//! Line oriented serial links
//!
//! Both links carry short newline terminated replies: the motor controller
//! answers each frame with a telemetry line, and the validation controller
//! answers token lines with `True`/`False`. Reads are bounded by the port
//! timeout, and a timeout with nothing read is reported as
//! [LinkError::Timeout].

use std::io::{ErrorKind, Read, Write};
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use serialport::SerialPort;

use crate::error::LinkError;

pub const LINE_CAPACITY: usize = 64;

/// One received line, without its terminator
pub type Line = heapless::Vec<u8, LINE_CAPACITY>;

pub trait LineLink {
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), LinkError>;

    /// Read up to the next newline. A line cut short by the timeout is still
    /// returned; only an empty read is a timeout.
    fn read_line(&mut self) -> Result<Line, LinkError>;
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct PortConfig {
    pub path: String,
    pub baud: u32,
    pub timeout_ms: u64,
}

impl Default for PortConfig {
    fn default() -> Self {
        Self {
            path: "/dev/ttyUSB0".into(),
            baud: 38_400,
            timeout_ms: 100,
        }
    }
}

pub struct SerialLink<P = Box<dyn SerialPort>> {
    port: P,
}

impl SerialLink {
    pub fn open(config: &PortConfig) -> anyhow::Result<Self> {
        let port = serialport::new(&config.path, config.baud)
            .timeout(Duration::from_millis(config.timeout_ms))
            .open()
            .with_context(|| format!("Failed to open serial port {}", config.path))?;
        Ok(Self::new(port))
    }
}

impl<P: Read + Write> SerialLink<P> {
    pub fn new(port: P) -> Self {
        Self { port }
    }

    pub fn into_inner(self) -> P {
        self.port
    }
}

impl<P: Read + Write> LineLink for SerialLink<P> {
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), LinkError> {
        self.port.write_all(bytes)?;
        self.port.flush()?;
        Ok(())
    }

    fn read_line(&mut self) -> Result<Line, LinkError> {
        let mut line = Line::new();
        let mut byte = [0u8; 1];

        while !line.is_full() {
            match self.port.read(&mut byte) {
                Ok(0) => break,
                Ok(_) if byte[0] == b'\n' => return Ok(line),
                Ok(_) => {
                    let _ = line.push(byte[0]);
                }
                Err(err) if matches!(err.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock) => {
                    break;
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            }
        }

        if line.is_empty() {
            Err(LinkError::Timeout)
        } else {
            Ok(line)
        }
    }
}
