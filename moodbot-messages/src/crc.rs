//! CRC8 used on the motor link
//!
//! Reflected, right shifting CRC-8 with polynomial 0x8C and an initial value of
//! zero (the Dallas/Maxim 1-Wire variant). The motor controller recomputes it
//! over the three payload bytes of every frame.

pub const POLY: u8 = 0x8C;

/// Compute the CRC8 of `data`
pub const fn crc8(data: &[u8]) -> u8 {
    let mut crc: u8 = 0;
    let mut i = 0;
    while i < data.len() {
        crc ^= data[i];
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 0x01 != 0 {
                (crc >> 1) ^ POLY
            } else {
                crc >> 1
            };
            bit += 1;
        }
        i += 1;
    }
    crc
}
