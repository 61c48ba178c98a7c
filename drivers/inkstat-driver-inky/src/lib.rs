/*
 *  inkstat Inky pHAT driver
 *
 *  SPI/GPIO protocol for the 212x104 tri-colour Inky pHAT panel
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 */

//! # inkstat Inky pHAT Display Driver
//!
//! Talks to the e-paper controller on the 212x104 Inky pHAT over a 4-wire
//! SPI bus with three GPIO lines (reset, data/command, busy).
//!
//! ## Features
//!
//! - red/black/white, yellow/black/white and black/white panels
//! - full ("slow") refresh with the accent plane driven
//! - fast refresh using a short black/white waveform
//! - border colour control
//!
//! ## Hardware Support
//!
//! - Inky pHAT v1 (212x104) on a Raspberry Pi header
//! - Default wiring: RESET BCM27, BUSY BCM17, DC BCM22, SPI0 CE0
//!
//! The driver is written against the `embedded-hal` 1.0 traits only, so the
//! host supplies `linux-embedded-hal` devices on a Pi and recording doubles
//! in tests.

mod bus;
mod lut;
mod planes;

pub use bus::{Error, Inky};
pub use lut::{Waveform, lut_for};
pub use planes::{pack, Planes};

/// Landscape width as drawn by the host.
pub const WIDTH: usize = 212;
/// Landscape height as drawn by the host.
pub const HEIGHT: usize = 104;

/// Controller source lines (the short native axis).
pub const COLS: usize = HEIGHT;
/// Controller gate lines (the long native axis).
pub const ROWS: usize = WIDTH;

/// Bytes in one packed plane.
pub const PLANE_BYTES: usize = COLS / 8 * ROWS;

/// Ink values the controller understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ink {
    White,
    Black,
    Accent,
}

/// Panel colour variant, printed on the back of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Red,
    Yellow,
    Black,
}

impl Variant {
    /// Source driving voltages (register 0x04).
    pub fn source_voltage(&self) -> [u8; 3] {
        match self {
            Variant::Red => [0x30, 0xAC, 0x22],
            Variant::Yellow => [0x07, 0xAC, 0x32],
            Variant::Black => [0x41, 0xAC, 0x32],
        }
    }

    /// Border waveform byte (register 0x3C) for an ink.
    ///
    /// Black/white panels cannot show the accent, so it falls back to black.
    pub fn border_byte(&self, ink: Ink) -> u8 {
        match (ink, self) {
            (Ink::Black, _) => 0b0000_0000,
            (Ink::White, _) => 0b0011_0001,
            (Ink::Accent, Variant::Red) => 0b0111_0011,
            (Ink::Accent, Variant::Yellow) => 0b0011_0011,
            (Ink::Accent, Variant::Black) => 0b0000_0000,
        }
    }
}
