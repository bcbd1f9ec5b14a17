pub mod control;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

// Raised from the Ctrl-C handler thread
pub static SHUTDOWN: Signal<CriticalSectionRawMutex, ()> = Signal::new();
