/*
 *  display/traits.rs
 *
 *  inkstat - meeting room status on e-paper
 *  (c) 2020-26 Stuart Hunter
 *
 *  Core trait definitions for panel driver abstraction
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

use crate::display::color::{InkyColor, PanelColour};
use crate::display::error::DisplayError;
use crate::refresh::RefreshMode;
use crate::vframebuf::Frame;

/// Panel capabilities and metadata
#[derive(Debug, Clone)]
pub struct PanelCapabilities {
    /// Panel width in pixels
    pub width: u32,

    /// Panel height in pixels
    pub height: u32,

    /// Which third pigment the panel carries
    pub colour: PanelColour,

    /// Human readable name for logs
    pub name: &'static str,
}

/// Minimal hardware abstraction - every panel driver implements this
///
/// Both refresh strategies share the same capability set: stage a border
/// colour, stage an image, then push both to the glass with `show`.
/// Nothing reaches the hardware before `show`.
pub trait PanelDriver {
    /// Returns the capabilities of this panel
    fn capabilities(&self) -> &PanelCapabilities;

    /// Which refresh strategy this driver performs
    fn refresh_mode(&self) -> RefreshMode;

    /// Returns the panel dimensions as (width, height)
    fn dimensions(&self) -> (u32, u32) {
        let caps = self.capabilities();
        (caps.width, caps.height)
    }

    /// Border colour used on the next `show`
    fn set_border(&mut self, colour: InkyColor);

    /// Stage a frame for the next `show`
    ///
    /// The frame must match the panel dimensions exactly.
    fn set_image(&mut self, frame: &Frame) -> Result<(), DisplayError>;

    /// Transmit the staged frame and border to the panel
    ///
    /// Blocks until the panel reports the refresh finished.
    fn show(&mut self) -> Result<(), DisplayError>;
}

/// Shared size check for `set_image` implementations
pub fn check_frame_size(caps: &PanelCapabilities, frame: &Frame) -> Result<(), DisplayError> {
    let expected = (caps.width * caps.height) as usize;
    let actual = frame.width() * frame.height();
    if frame.width() != caps.width as usize || frame.height() != caps.height as usize {
        return Err(DisplayError::BufferSizeMismatch { expected, actual });
    }
    Ok(())
}
