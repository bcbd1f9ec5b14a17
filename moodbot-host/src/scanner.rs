//! Background RFID polling
//!
//! The reader is polled on its own thread. Each read overwrites a single slot
//! that the tick loop drains; a read the loop never saw is simply replaced by
//! the next one.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use log::{debug, warn};
use moodbot_messages::Token;
use serde::{Deserialize, Serialize};

use crate::collaborators::TokenReader;

/// Latest scanned token, shared between the scanner thread and the tick loop
pub type TokenSlot = Signal<CriticalSectionRawMutex, Token>;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct ScannerConfig {
    /// Delay between polls while no card is present
    pub poll_ms: u64,
    /// Delay after a successful read
    pub hold_off_ms: u64,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            poll_ms: 50,
            hold_off_ms: 1000,
        }
    }
}

pub struct Scanner {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Scanner {
    pub fn spawn<R>(
        mut reader: R,
        slot: Arc<TokenSlot>,
        config: ScannerConfig,
    ) -> std::io::Result<Self>
    where
        R: TokenReader + Send + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = stop.clone();

        let handle = thread::Builder::new()
            .name("rfid-scanner".into())
            .spawn(move || {
                while !thread_stop.load(Ordering::Relaxed) {
                    match reader.poll_once() {
                        Some(token) => {
                            debug!("Scanned token {token}");
                            slot.signal(token);
                            thread::sleep(Duration::from_millis(config.hold_off_ms));
                        }
                        None => thread::sleep(Duration::from_millis(config.poll_ms)),
                    }
                }
            })?;

        Ok(Self {
            stop,
            handle: Some(handle),
        })
    }

    /// Stop polling and wait for the thread to exit
    pub fn shutdown(mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("RFID scanner thread panicked");
            }
        }
    }
}

impl Drop for Scanner {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}
