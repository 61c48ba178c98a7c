/*
 *  inkstat Inky pHAT driver - SPI transport and refresh sequence
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 */

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;
use thiserror::Error;

use crate::lut::{lut_for, Waveform};
use crate::planes::Planes;
use crate::{Ink, Variant, COLS, PLANE_BYTES, ROWS};

const CMD_GATE_SETTING: u8 = 0x01;
const CMD_GATE_VOLTAGE: u8 = 0x03;
const CMD_SOURCE_VOLTAGE: u8 = 0x04;
const CMD_DEEP_SLEEP: u8 = 0x10;
const CMD_DATA_ENTRY_MODE: u8 = 0x11;
const CMD_SOFT_RESET: u8 = 0x12;
const CMD_MASTER_ACTIVATE: u8 = 0x20;
const CMD_UPDATE_SEQUENCE: u8 = 0x22;
const CMD_WRITE_BLACK: u8 = 0x24;
const CMD_WRITE_ACCENT: u8 = 0x26;
const CMD_VCOM: u8 = 0x2C;
const CMD_WRITE_LUT: u8 = 0x32;
const CMD_DUMMY_LINE_PERIOD: u8 = 0x3A;
const CMD_GATE_LINE_WIDTH: u8 = 0x3B;
const CMD_BORDER: u8 = 0x3C;
const CMD_RAM_X_RANGE: u8 = 0x44;
const CMD_RAM_Y_RANGE: u8 = 0x45;
const CMD_RAM_X_COUNTER: u8 = 0x4E;
const CMD_RAM_Y_COUNTER: u8 = 0x4F;
const CMD_ANALOG_BLOCK: u8 = 0x74;
const CMD_DIGITAL_BLOCK: u8 = 0x7E;

const BUSY_POLL_MS: u32 = 10;
const RESET_PULSE_MS: u32 = 100;

/// Transport and controller errors.
#[derive(Debug, Error)]
pub enum Error {
    #[error("SPI communication error: {0}")]
    Spi(String),
    #[error("GPIO error: {0}")]
    Gpio(String),
    #[error("buffer size mismatch: expected {expected} pixels, got {actual}")]
    BufferSize { expected: usize, actual: usize },
}

fn spi_err<E: core::fmt::Debug>(e: E) -> Error {
    Error::Spi(format!("{:?}", e))
}

fn gpio_err<E: core::fmt::Debug>(e: E) -> Error {
    Error::Gpio(format!("{:?}", e))
}

/// Inky pHAT controller on an SPI device plus reset, data/command and busy lines.
///
/// The busy line is high while the controller is working. There is no
/// timeout on it: an unresponsive panel blocks the caller.
pub struct Inky<SPI, DC, RST, BUSY> {
    spi: SPI,
    dc: DC,
    reset: RST,
    busy: BUSY,
    variant: Variant,
    border: Ink,
}

impl<SPI, DC, RST, BUSY> Inky<SPI, DC, RST, BUSY>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    BUSY: InputPin,
{
    pub fn new(spi: SPI, dc: DC, reset: RST, busy: BUSY, variant: Variant) -> Self {
        Self {
            spi,
            dc,
            reset,
            busy,
            variant,
            border: Ink::White,
        }
    }

    /// Border colour applied on the next `update`.
    pub fn set_border(&mut self, ink: Ink) {
        self.border = ink;
    }

    /// Reset, configure, load both planes and run one refresh, then deep sleep.
    pub fn update<D: DelayNs>(
        &mut self,
        planes: &Planes,
        waveform: Waveform,
        delay: &mut D,
    ) -> Result<(), Error> {
        for plane in [&planes.black, &planes.accent] {
            if plane.len() != PLANE_BYTES {
                return Err(Error::BufferSize {
                    expected: PLANE_BYTES,
                    actual: plane.len(),
                });
            }
        }

        self.hard_reset(delay)?;
        self.send_command(CMD_SOFT_RESET, &[])?;
        self.busy_wait(delay)?;

        let last_row = (ROWS - 1) as u16;
        let [row_lo, row_hi] = last_row.to_le_bytes();

        self.send_command(CMD_ANALOG_BLOCK, &[0x54])?;
        self.send_command(CMD_DIGITAL_BLOCK, &[0x3B])?;
        self.send_command(CMD_GATE_SETTING, &[row_lo, row_hi, 0x00])?;
        self.send_command(CMD_GATE_VOLTAGE, &[0x17])?;
        self.send_command(CMD_SOURCE_VOLTAGE, &self.variant.source_voltage())?;
        self.send_command(CMD_DUMMY_LINE_PERIOD, &[0x07])?;
        self.send_command(CMD_GATE_LINE_WIDTH, &[0x04])?;
        self.send_command(CMD_DATA_ENTRY_MODE, &[0x03])?;
        self.send_command(CMD_VCOM, &[0x3C])?;
        self.send_command(CMD_BORDER, &[self.variant.border_byte(self.border)])?;
        self.send_command(CMD_WRITE_LUT, lut_for(self.variant, waveform))?;

        self.send_command(CMD_RAM_X_RANGE, &[0x00, (COLS / 8 - 1) as u8])?;
        self.send_command(CMD_RAM_Y_RANGE, &[0x00, 0x00, row_lo, row_hi])?;

        self.send_command(CMD_RAM_X_COUNTER, &[0x00])?;
        self.send_command(CMD_RAM_Y_COUNTER, &[0x00, 0x00])?;
        self.send_command(CMD_WRITE_BLACK, &planes.black)?;

        self.send_command(CMD_RAM_X_COUNTER, &[0x00])?;
        self.send_command(CMD_RAM_Y_COUNTER, &[0x00, 0x00])?;
        self.send_command(CMD_WRITE_ACCENT, &planes.accent)?;

        self.send_command(CMD_UPDATE_SEQUENCE, &[0xC7])?;
        self.send_command(CMD_MASTER_ACTIVATE, &[])?;
        delay.delay_ms(50);
        self.busy_wait(delay)?;

        self.send_command(CMD_DEEP_SLEEP, &[0x01])?;

        #[cfg(feature = "debug-logging")]
        log::debug!("inky refresh complete ({:?}, border {:?})", waveform, self.border);

        Ok(())
    }

    fn hard_reset<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Error> {
        self.reset.set_low().map_err(gpio_err)?;
        delay.delay_ms(RESET_PULSE_MS);
        self.reset.set_high().map_err(gpio_err)?;
        delay.delay_ms(RESET_PULSE_MS);
        Ok(())
    }

    fn busy_wait<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Error> {
        while self.busy.is_high().map_err(gpio_err)? {
            delay.delay_ms(BUSY_POLL_MS);
        }
        Ok(())
    }

    fn send_command(&mut self, command: u8, data: &[u8]) -> Result<(), Error> {
        self.dc.set_low().map_err(gpio_err)?;
        self.spi.write(&[command]).map_err(spi_err)?;
        if !data.is_empty() {
            self.dc.set_high().map_err(gpio_err)?;
            self.spi.write(data).map_err(spi_err)?;
        }
        Ok(())
    }
}
