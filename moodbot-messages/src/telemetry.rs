//! Telemetry line returned by the motor controller after each frame
//!
//! The line looks like `"<raw battery amplitude>:<anything>"`. Only the leading
//! integer is used.

use serde::{Deserialize, Serialize};

/// Conversion from raw battery amplitude to a display percentage
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct BatteryScale {
    /// Raw reading of an empty pack
    pub empty_raw: i32,
    pub raw_per_percent: f32,
    /// Readings below this are flagged as low
    pub low_raw: i32,
}

impl BatteryScale {
    pub const DEFAULT: BatteryScale = BatteryScale {
        empty_raw: 723,
        raw_per_percent: 2.5,
        low_raw: 801,
    };
}

impl Default for BatteryScale {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TelemetryReading {
    pub raw: i32,
}

impl TelemetryReading {
    /// Percentage truncated toward zero. Not clamped: a reading below the empty
    /// level gives a negative value and the display decides what to show.
    pub fn percent(&self, scale: &BatteryScale) -> i32 {
        // Raw comes straight off the wire, so the difference can exceed i32
        let above_empty = i64::from(self.raw) - i64::from(scale.empty_raw);
        (above_empty as f32 / scale.raw_per_percent) as i32
    }

    pub fn is_low(&self, scale: &BatteryScale) -> bool {
        self.raw < scale.low_raw
    }
}

/// Parse a telemetry line. Returns `None` for anything that does not start with
/// an integer field.
pub fn decode_telemetry(bytes: &[u8]) -> Option<TelemetryReading> {
    let field = bytes.split(|&b| b == b':').next()?;
    let text = core::str::from_utf8(field).ok()?;
    let raw = text.trim().parse::<i32>().ok()?;
    Some(TelemetryReading { raw })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_leading_field() {
        assert_eq!(
            decode_telemetry(b"812:17:ok\r\n"),
            Some(TelemetryReading { raw: 812 })
        );
        assert_eq!(decode_telemetry(b"950\n"), Some(TelemetryReading { raw: 950 }));
        assert_eq!(decode_telemetry(b" 800 :x"), Some(TelemetryReading { raw: 800 }));
    }

    #[test]
    fn rejects_malformed_lines() {
        assert_eq!(decode_telemetry(b""), None);
        assert_eq!(decode_telemetry(b":812"), None);
        assert_eq!(decode_telemetry(b"abc:1"), None);
        assert_eq!(decode_telemetry(b"8\xff2:1"), None);
        assert_eq!(decode_telemetry(b"99999999999:1"), None);
    }

    #[test]
    fn scales_to_percent_and_low_flag() {
        let scale = BatteryScale::default();

        let full = TelemetryReading { raw: 973 };
        assert_eq!(full.percent(&scale), 100);
        assert!(!full.is_low(&scale));

        let threshold = TelemetryReading { raw: 801 };
        assert_eq!(threshold.percent(&scale), 31);
        assert!(!threshold.is_low(&scale));

        let low = TelemetryReading { raw: 800 };
        assert_eq!(low.percent(&scale), 30);
        assert!(low.is_low(&scale));

        let flat = TelemetryReading { raw: 700 };
        assert_eq!(flat.percent(&scale), -9);
    }

    #[test]
    fn extreme_readings_saturate() {
        let scale = BatteryScale::default();

        let floor = decode_telemetry(b"-2147483648:x");
        assert_eq!(floor, Some(TelemetryReading { raw: i32::MIN }));
        let floor = TelemetryReading { raw: i32::MIN };
        assert!(floor.percent(&scale) < 0);
        assert!(floor.is_low(&scale));

        let ceiling = TelemetryReading { raw: i32::MAX };
        assert!(ceiling.percent(&scale) > 100);

        let odd_scale = BatteryScale {
            empty_raw: i32::MIN,
            ..scale
        };
        assert!(ceiling.percent(&odd_scale) > 0);
    }
}
