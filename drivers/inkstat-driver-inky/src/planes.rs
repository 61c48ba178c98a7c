/*
 *  inkstat Inky pHAT driver - plane packing
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 */

use crate::{Error, Ink, COLS, HEIGHT, PLANE_BYTES, ROWS, WIDTH};

/// The two controller RAM planes, in native (portrait) order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Planes {
    /// RAM 0x24: bit clear = black, bit set = white.
    pub black: Vec<u8>,
    /// RAM 0x26: bit set = accent.
    pub accent: Vec<u8>,
}

/// Pack a landscape, row-major 212x104 pixel slice into controller planes.
///
/// The controller scans 104-pixel lines along the short edge, so the
/// landscape image is turned a quarter clockwise: native row `r`, column `c`
/// is landscape `(x = r, y = HEIGHT - 1 - c)`. Bits are MSB first.
///
/// With `fold_accent` the accent ink is written as black and the accent
/// plane is left empty (waveforms that never drive the third pigment).
pub fn pack(pixels: &[Ink], fold_accent: bool) -> Result<Planes, Error> {
    if pixels.len() != WIDTH * HEIGHT {
        return Err(Error::BufferSize {
            expected: WIDTH * HEIGHT,
            actual: pixels.len(),
        });
    }

    let mut black = vec![0u8; PLANE_BYTES];
    let mut accent = vec![0u8; PLANE_BYTES];

    for r in 0..ROWS {
        for c in 0..COLS {
            let x = r;
            let y = HEIGHT - 1 - c;
            let ink = match pixels[y * WIDTH + x] {
                Ink::Accent if fold_accent => Ink::Black,
                ink => ink,
            };
            let bit = r * COLS + c;
            let (byte, mask) = (bit / 8, 0x80u8 >> (bit % 8));
            if ink != Ink::Black {
                black[byte] |= mask;
            }
            if ink == Ink::Accent {
                accent[byte] |= mask;
            }
        }
    }

    Ok(Planes { black, accent })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(ink: Ink) -> Vec<Ink> {
        vec![ink; WIDTH * HEIGHT]
    }

    #[test]
    fn test_white_frame() {
        let planes = pack(&solid(Ink::White), false).unwrap();
        assert!(planes.black.iter().all(|&b| b == 0xFF));
        assert!(planes.accent.iter().all(|&b| b == 0x00));
    }

    #[test]
    fn test_accent_frame_keeps_black_plane_clear() {
        let planes = pack(&solid(Ink::Accent), false).unwrap();
        assert!(planes.black.iter().all(|&b| b == 0xFF));
        assert!(planes.accent.iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn test_fold_accent_writes_black() {
        let planes = pack(&solid(Ink::Accent), true).unwrap();
        assert!(planes.black.iter().all(|&b| b == 0x00));
        assert!(planes.accent.iter().all(|&b| b == 0x00));
    }

    #[test]
    fn test_orientation_of_single_pixel() {
        // Landscape bottom-left lands at native row 0, column 0 (first bit).
        let mut pixels = solid(Ink::White);
        pixels[(HEIGHT - 1) * WIDTH] = Ink::Black;
        let planes = pack(&pixels, false).unwrap();
        assert_eq!(planes.black[0], 0x7F);
        assert!(planes.black[1..].iter().all(|&b| b == 0xFF));

        // Landscape top-left is the last column of native row 0.
        let mut pixels = solid(Ink::White);
        pixels[0] = Ink::Accent;
        let planes = pack(&pixels, false).unwrap();
        assert_eq!(planes.accent[COLS / 8 - 1], 0x01);
    }

    #[test]
    fn test_rejects_wrong_length() {
        let err = pack(&[Ink::White; 10], false).unwrap_err();
        assert!(matches!(err, Error::BufferSize { expected, actual: 10 } if expected == WIDTH * HEIGHT));
    }
}
