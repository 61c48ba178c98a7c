/*
 *  inkstat Inky pHAT driver - waveform tables
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 */

use crate::Variant;

/// Length of a waveform table written with command 0x32.
pub const LUT_LEN: usize = 70;

/// Refresh waveform selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    /// Full clear-and-paint cycle, drives the accent plane.
    Full,
    /// Short black/white only cycle. Ghosts, but settles in well under a second.
    Fast,
}

// 35 bytes of phase voltages (5 groups x 7) followed by 7 x 5 phase timings.

const LUT_BLACK: [u8; LUT_LEN] = [
    0b0100_1000, 0b1010_0000, 0b0001_0000, 0b0001_0000, 0b0001_0011, 0b0000_0000, 0b0000_0000,
    0b0100_1000, 0b1010_0000, 0b1000_0000, 0b0000_0000, 0b0000_0011, 0b0000_0000, 0b0000_0000,
    0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000,
    0b0100_1000, 0b1010_0101, 0b0000_0000, 0b1011_1011, 0b0000_0000, 0b0000_0000, 0b0000_0000,
    0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000,
    0x10, 0x04, 0x04, 0x04, 0x04,
    0x10, 0x04, 0x04, 0x04, 0x04,
    0x04, 0x08, 0x08, 0x10, 0x10,
    0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00,
];

const LUT_RED: [u8; LUT_LEN] = [
    0b0100_1000, 0b1010_0000, 0b0001_0000, 0b0001_0000, 0b0001_0011, 0b0000_0000, 0b0000_0000,
    0b0100_1000, 0b1010_0000, 0b1000_0000, 0b0000_0000, 0b0000_0011, 0b0000_0000, 0b0000_0000,
    0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000,
    0b0100_1000, 0b1010_0101, 0b0000_0000, 0b1011_1011, 0b0000_0000, 0b0000_0000, 0b0000_0000,
    0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000,
    0x40, 0x0C, 0x20, 0x0C, 0x06,
    0x10, 0x08, 0x04, 0x04, 0x06,
    0x04, 0x08, 0x08, 0x10, 0x10,
    0x02, 0x02, 0x02, 0x40, 0x20,
    0x02, 0x02, 0x02, 0x02, 0x02,
    0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00,
];

const LUT_YELLOW: [u8; LUT_LEN] = [
    0b1111_1010, 0b1001_0100, 0b1000_1100, 0b1100_0000, 0b1101_0000, 0b0000_0000, 0b0000_0000,
    0b1111_1010, 0b1001_0100, 0b0010_1100, 0b1000_0000, 0b1110_0000, 0b0000_0000, 0b0000_0000,
    0b1111_1010, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000,
    0b1111_1010, 0b1001_0100, 0b1111_1000, 0b1000_0000, 0b0101_0000, 0b0000_0000, 0b1100_1100,
    0b1011_1111, 0b0101_1000, 0b1111_1100, 0b1000_0000, 0b1101_0000, 0b0000_0000, 0b0001_0001,
    0x40, 0x10, 0x40, 0x10, 0x08,
    0x08, 0x10, 0x04, 0x04, 0x10,
    0x08, 0x08, 0x03, 0x08, 0x20,
    0x08, 0x04, 0x00, 0x00, 0x10,
    0x10, 0x08, 0x08, 0x00, 0x20,
    0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00,
];

// Black-to-white and white-to-black transitions only, two short phases.
const LUT_FAST: [u8; LUT_LEN] = [
    0b1000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000,
    0b0001_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000,
    0b1000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000,
    0b0001_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000,
    0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000, 0b0000_0000,
    0x0A, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00,
];

/// Waveform table for a panel variant.
pub fn lut_for(variant: Variant, waveform: Waveform) -> &'static [u8; LUT_LEN] {
    match (waveform, variant) {
        (Waveform::Fast, _) => &LUT_FAST,
        (Waveform::Full, Variant::Red) => &LUT_RED,
        (Waveform::Full, Variant::Yellow) => &LUT_YELLOW,
        (Waveform::Full, Variant::Black) => &LUT_BLACK,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phase_ticks(lut: &[u8; LUT_LEN]) -> u32 {
        lut[35..].iter().map(|&b| b as u32).sum()
    }

    #[test]
    fn test_fast_waveform_is_shared_and_shorter() {
        let fast = lut_for(Variant::Red, Waveform::Fast);
        assert_eq!(fast, lut_for(Variant::Yellow, Waveform::Fast));
        for variant in [Variant::Red, Variant::Yellow, Variant::Black] {
            assert!(phase_ticks(fast) < phase_ticks(lut_for(variant, Waveform::Full)));
        }
    }

    #[test]
    fn test_accent_variants_have_extra_phases() {
        assert!(phase_ticks(&LUT_RED) > phase_ticks(&LUT_BLACK));
        assert!(phase_ticks(&LUT_YELLOW) > phase_ticks(&LUT_BLACK));
    }
}
