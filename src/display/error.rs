/*
 *  display/error.rs
 *
 *  inkstat - meeting room status on e-paper
 *  (c) 2020-26 Stuart Hunter
 *
 *  Unified error types for the panel subsystem
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use thiserror::Error;

/// Unified error type for all panel operations
///
/// Every variant is fatal for the current invocation, there is no retry.
#[derive(Debug, Error)]
pub enum DisplayError {
    /// Hardware initialization failed (opening the bus or GPIO lines)
    #[error("Panel initialization failed: {0}")]
    InitializationFailed(String),

    /// SPI communication error
    #[error("SPI communication error: {0}")]
    SpiError(String),

    /// GPIO pin error
    #[error("GPIO error: {0}")]
    GpioError(String),

    /// Framebuffer size mismatch
    #[error("Buffer size mismatch: expected {expected} pixels, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    /// `show` called before any `set_image`
    #[error("No image staged for display")]
    NothingStaged,

    /// Preview image could not be written
    #[error("Preview output error: {0}")]
    Preview(#[from] image::ImageError),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl From<inkstat_driver_inky::Error> for DisplayError {
    fn from(err: inkstat_driver_inky::Error) -> Self {
        match err {
            inkstat_driver_inky::Error::Spi(msg) => DisplayError::SpiError(msg),
            inkstat_driver_inky::Error::Gpio(msg) => DisplayError::GpioError(msg),
            inkstat_driver_inky::Error::BufferSize { expected, actual } =>
                DisplayError::BufferSizeMismatch { expected, actual },
        }
    }
}

// Conversion from Linux GPIO character device errors
impl From<linux_embedded_hal::gpio_cdev::Error> for DisplayError {
    fn from(err: linux_embedded_hal::gpio_cdev::Error) -> Self {
        DisplayError::GpioError(format!("{:?}", err))
    }
}

impl From<std::io::Error> for DisplayError {
    fn from(err: std::io::Error) -> Self {
        DisplayError::InitializationFailed(err.to_string())
    }
}
