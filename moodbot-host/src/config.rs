//! Runtime configuration
//!
//! Loaded from a JSON file. Every field has a default, so the file only needs
//! to list what differs from a standard MoodBot.

use std::path::Path;

use anyhow::Context;
use embassy_time::Duration;
use log::info;
use moodbot_messages::BatteryScale;
use serde::{Deserialize, Serialize};

use crate::arming::ArmingConfig;
use crate::link::PortConfig;
use crate::motion::Calibration;
use crate::scanner::ScannerConfig;
use crate::token_cache::RemotePolicy;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Serial link to the motor controller
    pub motor_port: PortConfig,
    /// Serial link to the second token validation controller
    pub validation_port: PortConfig,

    pub session_limit_secs: i32,
    pub slow_poll_ms: u64,
    pub fast_poll_ms: u64,
    pub countdown_step_ms: u64,
    pub notice_ms: u64,
    /// De-arm after this many transport faults in a row. Unset means the
    /// session only ends on its countdown.
    pub max_consecutive_faults: Option<u32>,

    pub token_epoch_secs: u64,
    pub remote_policy: RemotePolicy,

    pub scanner: ScannerConfig,
    pub calibration: Calibration,
    pub battery: BatteryScale,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            motor_port: PortConfig::default(),
            validation_port: PortConfig {
                path: "/dev/serial0".into(),
                baud: 38_400,
                timeout_ms: 10,
            },
            session_limit_secs: 120,
            slow_poll_ms: 1000,
            fast_poll_ms: 50,
            countdown_step_ms: 1000,
            notice_ms: 3000,
            max_consecutive_faults: None,
            token_epoch_secs: 8 * 60 * 60,
            remote_policy: RemotePolicy::default(),
            scanner: ScannerConfig::default(),
            calibration: Calibration::default(),
            battery: BatteryScale::default(),
        }
    }
}

impl Config {
    /// Read the config file, falling back to defaults if it does not exist
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn token_epoch(&self) -> Duration {
        Duration::from_secs(self.token_epoch_secs)
    }

    pub fn arming(&self) -> ArmingConfig {
        ArmingConfig {
            session_limit: self.session_limit_secs,
            slow_poll: Duration::from_millis(self.slow_poll_ms),
            fast_poll: Duration::from_millis(self.fast_poll_ms),
            countdown_step: Duration::from_millis(self.countdown_step_ms),
            notice: Duration::from_millis(self.notice_ms),
            max_consecutive_faults: self.max_consecutive_faults,
            battery: self.battery,
        }
    }
}
